use core::time::Duration;
use serde::{Deserialize, Serialize};

use crate::BoardGeometry;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Dark matter capacity, also the starting amount.
    pub max_lives: u32,
    /// Seconds needed to regenerate one unit of dark matter.
    pub life_regen_secs: u64,
    /// Number of cosmetic variants a planet may be drawn with.
    pub planet_variants: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_lives: 5,
            life_regen_secs: 30 * 60,
            planet_variants: 4,
        }
    }
}

impl SessionConfig {
    pub const fn life_regen(&self) -> Duration {
        Duration::from_secs(self.life_regen_secs)
    }
}

/// Everything a front end needs to set up a play session.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub session: SessionConfig,
    pub geometry: BoardGeometry,
    /// Force a seed instead of random
    pub seed: Option<u64>,
}
