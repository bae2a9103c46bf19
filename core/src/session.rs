use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelRecord {
    pub completed: bool,
    /// Moves used by the most recent completion.
    pub moves_used: Option<u32>,
}

/// Play-session state shared across levels: dark matter, its regeneration and level progression.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    #[serde(skip)]
    config: SessionConfig,
    lives: u32,
    regen_elapsed: Duration,
    current_level: usize,
    records: Vec<LevelRecord>,
}

impl Session {
    pub const STORAGE_KEY: &'static str = "gravity-grid.session";

    pub fn new(config: SessionConfig, level_count: usize) -> Self {
        Self {
            config,
            lives: config.max_lives,
            regen_elapsed: Duration::ZERO,
            current_level: 0,
            records: vec![LevelRecord::default(); level_count],
        }
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub const fn lives(&self) -> u32 {
        self.lives
    }

    pub const fn is_out_of_lives(&self) -> bool {
        self.lives == 0
    }

    pub const fn current_level(&self) -> usize {
        self.current_level
    }

    pub fn records(&self) -> &[LevelRecord] {
        &self.records
    }

    pub fn record(&self, index: usize) -> Option<&LevelRecord> {
        self.records.get(index)
    }

    /// The first level is always open, later ones once their predecessor is completed.
    pub fn is_unlocked(&self, index: usize) -> bool {
        match index {
            0 => !self.records.is_empty(),
            _ => {
                index < self.records.len()
                    && self.records.get(index - 1).is_some_and(|record| record.completed)
            }
        }
    }

    /// Switches the current level, only to unlocked ones.
    pub fn select_level(&mut self, index: usize) -> bool {
        if self.is_unlocked(index) {
            self.current_level = index;
            true
        } else {
            log::debug!("Level {} is locked", index);
            false
        }
    }

    /// Spends one unit of dark matter, returning how many are left.
    pub fn consume_life(&mut self) -> u32 {
        if self.lives >= self.config.max_lives {
            self.regen_elapsed = Duration::ZERO;
        }
        self.lives = self.lives.saturating_sub(1);
        log::debug!("Consumed a life, {} left", self.lives);
        self.lives
    }

    /// Advances the regeneration timer, returning how many lives were regained.
    pub fn tick(&mut self, elapsed: Duration) -> u32 {
        let max_lives = self.config.max_lives;
        if self.lives >= max_lives {
            self.regen_elapsed = Duration::ZERO;
            return 0;
        }

        let period = self.config.life_regen();
        let before = self.lives;
        if period.is_zero() {
            self.lives = max_lives;
        } else {
            self.regen_elapsed += elapsed;
            while self.regen_elapsed >= period && self.lives < max_lives {
                self.regen_elapsed -= period;
                self.lives += 1;
            }
        }
        if self.lives >= max_lives {
            self.regen_elapsed = Duration::ZERO;
        }

        let gained = self.lives - before;
        if gained > 0 {
            log::debug!("Regenerated {} lives, now {}", gained, self.lives);
        }
        gained
    }

    /// Time until the next life regenerates, `None` when already full.
    pub fn time_to_next_life(&self) -> Option<Duration> {
        (self.lives < self.config.max_lives)
            .then(|| self.config.life_regen().saturating_sub(self.regen_elapsed))
    }

    /// Marks a level as completed and moves on when it was the current one.
    pub fn complete_level(&mut self, index: usize, moves_used: u32) {
        if index >= self.records.len() {
            self.records.resize(index + 1, LevelRecord::default());
        }
        self.records[index] = LevelRecord {
            completed: true,
            moves_used: Some(moves_used),
        };
        if index == self.current_level && index + 1 < self.records.len() {
            self.current_level = index + 1;
        }
        log::debug!("Completed level {} in {} moves", index, moves_used);
    }

    pub fn save(&self, store: &mut impl SettingsStore) -> core::result::Result<(), PersistError> {
        store.set(Self::STORAGE_KEY, serde_json::to_string(self)?);
        Ok(())
    }

    /// Restores a saved session, starting fresh when nothing was saved yet.
    ///
    /// The given config always wins over the saved one; progress is fitted to `level_count`.
    pub fn load(
        store: &impl SettingsStore,
        config: SessionConfig,
        level_count: usize,
    ) -> core::result::Result<Self, PersistError> {
        let Some(saved) = store.get(Self::STORAGE_KEY) else {
            log::debug!("No saved session, starting fresh");
            return Ok(Self::new(config, level_count));
        };

        let mut session: Self = serde_json::from_str(&saved)?;
        session.config = config;
        session.lives = session.lives.min(config.max_lives);
        session.records.resize(level_count, LevelRecord::default());
        if session.current_level >= level_count {
            session.current_level = level_count.saturating_sub(1);
        }
        Ok(session)
    }
}
