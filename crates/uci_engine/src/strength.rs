//! Engine strength calibration.
//!
//! Strength is stored on the rating scale. Skill levels are converted at the
//! boundary in both directions:
//! - rating -> level: `round((rating - 1320) / (3000 - 1320) * 20)`
//! - level -> rating: `1320 + level * 84` (level 20 is 3000)
//!
//! At the top of the scale the engine runs unrestricted rather than at
//! "level 20 with strength limiting still on".

use std::fmt;

/// Lowest rating the engine can be limited to.
pub const MIN_RATING: u16 = 1320;
/// Rating at which strength limiting is switched off entirely.
pub const MAX_RATING: u16 = 3000;
/// Highest skill level.
pub const MAX_LEVEL: u8 = 20;

const RATING_PER_LEVEL: u16 = (MAX_RATING - MIN_RATING) / MAX_LEVEL as u16;

/// Normalized playing strength, clamped to `[MIN_RATING, MAX_RATING]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Strength {
    rating: u16,
}

/// Strength as a caller expresses it, before normalization.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrengthInput {
    Rating(i64),
    Level(i64),
}

impl Strength {
    /// Unrestricted play.
    pub const FULL: Strength = Strength { rating: MAX_RATING };

    pub fn from_rating(rating: i64) -> Self {
        let rating = rating.clamp(i64::from(MIN_RATING), i64::from(MAX_RATING));
        Self {
            rating: rating as u16,
        }
    }

    pub fn from_level(level: i64) -> Self {
        let level = level.clamp(0, i64::from(MAX_LEVEL)) as u16;
        Self {
            rating: MIN_RATING + level * RATING_PER_LEVEL,
        }
    }

    pub fn rating(self) -> u16 {
        self.rating
    }

    /// Nearest skill level for this rating.
    pub fn level(self) -> u8 {
        let level = (self.fraction() * f64::from(MAX_LEVEL)).round();
        level.clamp(0.0, f64::from(MAX_LEVEL)) as u8
    }

    /// Position on the rating scale, 0.0 at the bottom and 1.0 at the top.
    pub fn fraction(self) -> f64 {
        f64::from(self.rating - MIN_RATING) / f64::from(MAX_RATING - MIN_RATING)
    }

    pub fn is_full_strength(self) -> bool {
        self.rating >= MAX_RATING
    }

    /// Engine options that realize this strength.
    pub fn settings(self) -> StrengthSettings {
        if self.is_full_strength() {
            StrengthSettings {
                skill_level: MAX_LEVEL,
                limit_strength: false,
                elo: None,
            }
        } else {
            StrengthSettings {
                skill_level: self.level(),
                limit_strength: true,
                elo: Some(self.rating),
            }
        }
    }
}

impl Default for Strength {
    fn default() -> Self {
        Self::from_rating(1500)
    }
}

impl From<StrengthInput> for Strength {
    fn from(input: StrengthInput) -> Self {
        match input {
            StrengthInput::Rating(rating) => Strength::from_rating(rating),
            StrengthInput::Level(level) => Strength::from_level(level),
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_full_strength() {
            write!(f, "{} (full strength)", self.rating)
        } else {
            write!(f, "{} (level {})", self.rating, self.level())
        }
    }
}

/// UCI option values for a strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StrengthSettings {
    pub skill_level: u8,
    pub limit_strength: bool,
    /// Only sent while limiting is on.
    pub elo: Option<u16>,
}

impl StrengthSettings {
    pub fn uci_commands(&self) -> Vec<String> {
        let mut commands = vec![
            format!("setoption name Skill Level value {}", self.skill_level),
            format!(
                "setoption name UCI_LimitStrength value {}",
                self.limit_strength
            ),
        ];
        if let Some(elo) = self.elo {
            commands.push(format!("setoption name UCI_Elo value {elo}"));
        }
        commands
    }
}

#[cfg(test)]
#[path = "strength_tests.rs"]
mod strength_tests;
