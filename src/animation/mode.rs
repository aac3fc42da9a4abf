use std::fmt;
use std::str::FromStr;

use crate::foundation::error::BoatError;

/// Animation routine selected for the whole installation.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Pirate ship: waves, speckled rails, red scanner, collision lights.
    Boat,
    /// `Boat` at a faster tick rate.
    FastBoat,
    /// `Boat` at the fastest boat tick rate.
    SpeedBoat,
    /// Every LED random every tick.
    Disco,
    /// One random frame, then a hold.
    Slow,
    /// `Disco` at a frantic tick rate.
    Panic,
    /// No animation; cells are edited by hand through debug toggles.
    Debug,
    /// Every LED full white.
    Bright,
    /// Every LED black.
    Off,
    /// Red, white and blue parade routine.
    America,
    /// Starship: `Boat` with the scanner held white.
    Space,
}

impl Mode {
    /// Every mode, in keypad order.
    pub const ALL: [Mode; 11] = [
        Mode::Boat,
        Mode::FastBoat,
        Mode::SpeedBoat,
        Mode::Disco,
        Mode::Slow,
        Mode::Panic,
        Mode::Debug,
        Mode::Bright,
        Mode::Off,
        Mode::America,
        Mode::Space,
    ];

    /// Stable snake_case identifier.
    pub fn name(self) -> &'static str {
        match self {
            Mode::Boat => "boat",
            Mode::FastBoat => "fast_boat",
            Mode::SpeedBoat => "speed_boat",
            Mode::Disco => "disco",
            Mode::Slow => "slow",
            Mode::Panic => "panic",
            Mode::Debug => "debug",
            Mode::Bright => "bright",
            Mode::Off => "off",
            Mode::America => "america",
            Mode::Space => "space",
        }
    }

    /// Look a mode up by identifier; `None` for anything unrecognized.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Resolve a requested identifier, substituting `default` for unknown names.
    pub fn resolve(name: &str, default: Mode) -> Self {
        match Self::from_name(name) {
            Some(mode) => mode,
            None => {
                tracing::warn!(requested = name, fallback = %default, "mode not implemented");
                default
            }
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = BoatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| BoatError::command(format!("unknown mode '{s}'")))
    }
}
