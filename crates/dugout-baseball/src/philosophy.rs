// Philosophy profile registry.
//
// A profile is an immutable template: composite-score weights, age windows
// and hard constraints. The registry is an explicit value handed to the
// scorer and generator; custom profiles are layered on with `with_profile`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::Player;

/// Weights over the five composite sub-scores. Only their ratios matter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub current: f64,
    pub potential: f64,
    pub value: f64,
    pub age: f64,
    pub scarcity: f64,
}

impl ScoreWeights {
    pub fn sum(&self) -> f64 {
        self.current + self.potential + self.value + self.age + self.scarcity
    }

    fn named(&self) -> [(&'static str, f64); 5] {
        [
            ("current", self.current),
            ("potential", self.potential),
            ("value", self.value),
            ("age", self.age),
            ("scarcity", self.scarcity),
        ]
    }
}

/// Inclusive age window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeRange {
    pub min: u32,
    pub max: u32,
}

impl AgeRange {
    pub const fn new(min: u32, max: u32) -> Self {
        AgeRange { min, max }
    }

    pub fn contains(&self, age: u32) -> bool {
        (self.min..=self.max).contains(&age)
    }
}

/// Candidates failing these are never selected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HardConstraints {
    pub max_age: Option<u32>,
    /// Per-player salary cap in millions.
    pub max_salary: Option<f64>,
    /// Soft preference: cost-controlled players get a small score bonus.
    pub prefer_cost_controlled: bool,
}

impl HardConstraints {
    /// Whether `player` passes the age and salary caps. Unknown age passes.
    pub fn admits(&self, player: &Player) -> bool {
        let age_ok = match (self.max_age, player.age) {
            (Some(max), Some(age)) => age <= max,
            _ => true,
        };
        let salary_ok = self.max_salary.map_or(true, |max| player.salary() <= max);
        age_ok && salary_ok
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhilosophyProfile {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub weights: ScoreWeights,
    pub ideal_age: AgeRange,
    pub acceptable_age: AgeRange,
    #[serde(default)]
    pub constraints: HardConstraints,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("profile '{key}': weight '{field}' must be a non-negative number")]
    NegativeWeight { key: String, field: &'static str },

    #[error("profile '{key}': weights must sum to more than zero")]
    ZeroWeights { key: String },

    #[error("profile '{key}': ideal age window must sit inside the acceptable window")]
    AgeWindow { key: String },
}

impl PhilosophyProfile {
    /// Check weights and age windows.
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (field, w) in self.weights.named() {
            if !w.is_finite() || w < 0.0 {
                return Err(ProfileError::NegativeWeight {
                    key: self.key.clone(),
                    field,
                });
            }
        }
        if self.weights.sum() <= 0.0 {
            return Err(ProfileError::ZeroWeights {
                key: self.key.clone(),
            });
        }
        let (ideal, ok) = (self.ideal_age, self.acceptable_age);
        if ideal.min > ideal.max || ok.min > ideal.min || ideal.max > ok.max {
            return Err(ProfileError::AgeWindow {
                key: self.key.clone(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Built-in profiles
// ---------------------------------------------------------------------------

fn profile(
    key: &str,
    name: &str,
    description: &str,
    weights: ScoreWeights,
    ideal_age: AgeRange,
    acceptable_age: AgeRange,
    constraints: HardConstraints,
) -> PhilosophyProfile {
    PhilosophyProfile {
        key: key.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        weights,
        ideal_age,
        acceptable_age,
        constraints,
    }
}

fn builtin_profiles() -> Vec<PhilosophyProfile> {
    vec![
        profile(
            "balanced",
            "Balanced",
            "Weighs production, upside, cost and fit evenly.",
            ScoreWeights { current: 0.30, potential: 0.20, value: 0.20, age: 0.15, scarcity: 0.15 },
            AgeRange::new(25, 30),
            AgeRange::new(22, 33),
            HardConstraints::default(),
        ),
        profile(
            "win_now",
            "Win Now",
            "Maximize this season's production regardless of age or cost.",
            ScoreWeights { current: 0.50, potential: 0.05, value: 0.10, age: 0.15, scarcity: 0.20 },
            AgeRange::new(27, 32),
            AgeRange::new(24, 35),
            HardConstraints::default(),
        ),
        profile(
            "rebuild",
            "Rebuild",
            "Young, cheap and projectable; veterans need not apply.",
            ScoreWeights { current: 0.10, potential: 0.40, value: 0.20, age: 0.25, scarcity: 0.05 },
            AgeRange::new(20, 25),
            AgeRange::new(18, 28),
            HardConstraints {
                max_age: Some(30),
                max_salary: None,
                prefer_cost_controlled: true,
            },
        ),
        profile(
            "moneyball",
            "Moneyball",
            "Wins per dollar above all; no big contracts.",
            ScoreWeights { current: 0.25, potential: 0.10, value: 0.45, age: 0.10, scarcity: 0.10 },
            AgeRange::new(25, 30),
            AgeRange::new(23, 33),
            HardConstraints {
                max_age: None,
                max_salary: Some(10.0),
                prefer_cost_controlled: true,
            },
        ),
        profile(
            "development",
            "Development",
            "Bet on potential and give young players room to grow.",
            ScoreWeights { current: 0.15, potential: 0.45, value: 0.10, age: 0.20, scarcity: 0.10 },
            AgeRange::new(21, 26),
            AgeRange::new(19, 29),
            HardConstraints {
                max_age: Some(32),
                max_salary: None,
                prefer_cost_controlled: true,
            },
        ),
    ]
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Named profiles in registration order.
#[derive(Debug, Clone)]
pub struct PhilosophyRegistry {
    profiles: Vec<PhilosophyProfile>,
}

impl Default for PhilosophyRegistry {
    fn default() -> Self {
        PhilosophyRegistry {
            profiles: builtin_profiles(),
        }
    }
}

impl PhilosophyRegistry {
    /// A registry with no profiles at all.
    pub fn empty() -> Self {
        PhilosophyRegistry {
            profiles: Vec::new(),
        }
    }

    /// Add a profile, replacing any existing one with the same key.
    pub fn with_profile(mut self, profile: PhilosophyProfile) -> Self {
        match self.profiles.iter().position(|p| p.key == profile.key) {
            Some(i) => self.profiles[i] = profile,
            None => self.profiles.push(profile),
        }
        self
    }

    pub fn get(&self, key: &str) -> Option<&PhilosophyProfile> {
        self.profiles.iter().find(|p| p.key == key)
    }

    pub fn keys(&self) -> Vec<&str> {
        self.profiles.iter().map(|p| p.key.as_str()).collect()
    }

    pub fn profiles(&self) -> &[PhilosophyProfile] {
        &self.profiles
    }
}
