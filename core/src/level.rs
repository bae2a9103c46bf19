use serde::{Deserialize, Serialize, Serializer, ser::Error as _};

use crate::*;

/// 49 kind codes followed by red, blue and green targets and the move budget.
pub const LEVEL_DESCRIPTOR_LEN: usize = CELL_COUNT + 4;

/// Per-color score targets and the move budget of a level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    pub red: u32,
    pub blue: u32,
    pub green: u32,
    pub max_moves: u32,
}

impl Targets {
    pub const fn for_color(&self, color: PlanetColor) -> u32 {
        match color {
            PlanetColor::Red => self.red,
            PlanetColor::Blue => self.blue,
            PlanetColor::Green => self.green,
        }
    }
}

/// Immutable level definition, serialized as the flat integer array levels are authored in.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<i32>")]
pub struct LevelDescriptor {
    kinds: [CellKind; CELL_COUNT],
    targets: Targets,
}

impl LevelDescriptor {
    pub const fn new(kinds: [CellKind; CELL_COUNT], targets: Targets) -> Self {
        Self { kinds, targets }
    }

    /// Parses a flat descriptor, rejecting unknown kind codes.
    pub fn from_codes(codes: &[i32]) -> Result<Self> {
        Self::parse(codes, true)
    }

    /// Parses a flat descriptor, decoding unknown kind codes as [`CellKind::Empty`].
    pub fn from_codes_lenient(codes: &[i32]) -> Result<Self> {
        Self::parse(codes, false)
    }

    fn parse(codes: &[i32], strict: bool) -> Result<Self> {
        if codes.len() != LEVEL_DESCRIPTOR_LEN {
            return Err(GameError::InvalidLevelLength {
                expected: LEVEL_DESCRIPTOR_LEN,
                actual: codes.len(),
            });
        }

        let mut kinds = [CellKind::Empty; CELL_COUNT];
        for (index, (&code, kind)) in codes.iter().zip(kinds.iter_mut()).enumerate() {
            let position = index as Position;
            *kind = match CellKind::from_code(code) {
                Some(decoded) => decoded,
                None if strict => return Err(GameError::UnknownKindCode { position, code }),
                None => {
                    log::warn!("Unknown kind code {} at position {}, using empty", code, position);
                    CellKind::Empty
                }
            };
        }

        let target = |index: usize| {
            let value = codes[index];
            u32::try_from(value).map_err(|_| GameError::InvalidTarget {
                index,
                value: value.into(),
            })
        };

        Ok(Self {
            kinds,
            targets: Targets {
                red: target(CELL_COUNT)?,
                blue: target(CELL_COUNT + 1)?,
                green: target(CELL_COUNT + 2)?,
                max_moves: target(CELL_COUNT + 3)?,
            },
        })
    }

    /// Flattens back into the authored format, targets must fit in an `i32`.
    pub fn to_codes(&self) -> Result<Vec<i32>> {
        let mut codes = Vec::with_capacity(LEVEL_DESCRIPTOR_LEN);
        codes.extend(self.kinds.iter().map(|kind| kind.code()));
        let targets = [
            self.targets.red,
            self.targets.blue,
            self.targets.green,
            self.targets.max_moves,
        ];
        for (offset, value) in targets.into_iter().enumerate() {
            let code = i32::try_from(value).map_err(|_| GameError::InvalidTarget {
                index: CELL_COUNT + offset,
                value: value.into(),
            })?;
            codes.push(code);
        }
        Ok(codes)
    }

    pub fn kind_at(&self, position: Position) -> CellKind {
        self.kinds[position as usize]
    }

    pub const fn targets(&self) -> Targets {
        self.targets
    }
}

impl TryFrom<Vec<i32>> for LevelDescriptor {
    type Error = GameError;

    fn try_from(codes: Vec<i32>) -> Result<Self> {
        Self::from_codes(&codes)
    }
}

impl Serialize for LevelDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        self.to_codes().map_err(S::Error::custom)?.serialize(serializer)
    }
}

/// Ordered list of levels, stored as a JSON array of flat descriptors.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LevelPack {
    levels: Vec<LevelDescriptor>,
}

impl LevelPack {
    pub fn new(levels: Vec<LevelDescriptor>) -> Self {
        Self { levels }
    }

    pub fn from_json(json: &str) -> core::result::Result<Self, LevelPackError> {
        Self::parse_json(json, LevelDescriptor::from_codes)
    }

    pub fn from_json_lenient(json: &str) -> core::result::Result<Self, LevelPackError> {
        Self::parse_json(json, LevelDescriptor::from_codes_lenient)
    }

    fn parse_json(
        json: &str,
        parse: fn(&[i32]) -> Result<LevelDescriptor>,
    ) -> core::result::Result<Self, LevelPackError> {
        let raw: Vec<Vec<i32>> = serde_json::from_str(json)?;
        let levels = raw
            .iter()
            .enumerate()
            .map(|(index, codes)| parse(codes).map_err(|source| LevelPackError::Level { index, source }))
            .collect::<core::result::Result<Vec<_>, _>>()?;
        log::debug!("Loaded level pack with {} levels", levels.len());
        Ok(Self { levels })
    }

    pub fn to_json(&self) -> core::result::Result<String, LevelPackError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn get(&self, index: usize) -> Option<&LevelDescriptor> {
        self.levels.get(index)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LevelDescriptor> {
        self.levels.iter()
    }
}
