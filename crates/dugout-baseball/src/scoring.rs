// Composite player scorer.
//
// Blends five 0-100 sub-scores (current performance, potential, value
// efficiency, age-curve fit, positional scarcity) using the weights of the
// active philosophy profile.

use serde::{Deserialize, Serialize};

use crate::contract::ContractStatus;
use crate::philosophy::PhilosophyProfile;
use crate::player::{Player, PlayerDetails};
use crate::ratings::{band, SampleThresholds};
use crate::trade_value::ValuationSettings;

/// Everything the scorer needs besides the player and profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoringContext {
    pub thresholds: SampleThresholds,
    pub valuation: ValuationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompositeScore {
    pub current: f64,
    pub potential: f64,
    pub value: f64,
    pub age: f64,
    pub scarcity: f64,
    /// Weighted blend, 0-100.
    pub total: f64,
}

// ---------------------------------------------------------------------------
// Sub-scores
// ---------------------------------------------------------------------------

/// Stats-based when the sample is trusted, otherwise the overall rating.
///
/// Each present rate stat is mapped through a fixed band and the results are
/// averaged. Zero rate stats count as missing.
pub fn current_score(player: &Player, thresholds: &SampleThresholds) -> f64 {
    if !player.has_sufficient_sample(thresholds) {
        return player.ovr.percent();
    }

    let mut parts: Vec<f64> = Vec::with_capacity(4);
    match &player.details {
        PlayerDetails::Batter(b) => {
            let s = &b.stats;
            if s.obp > 0.0 {
                parts.push(band(s.obp, 0.280, 0.400));
            }
            if s.slg > 0.0 {
                parts.push(band(s.slg, 0.350, 0.550));
            }
            parts.push(band(s.war, 0.0, 6.0));
        }
        PlayerDetails::Pitcher(p) => {
            let s = &p.stats;
            if s.era > 0.0 {
                parts.push(band(s.era, 5.50, 2.50));
            }
            if s.whip > 0.0 {
                parts.push(band(s.whip, 1.50, 1.00));
            }
            if s.k_per_9 > 0.0 {
                parts.push(band(s.k_per_9, 6.0, 11.0));
            }
            parts.push(band(s.war, 0.0, 6.0));
        }
    }

    100.0 * parts.iter().sum::<f64>() / parts.len() as f64
}

/// 70% potential rating, 30% upside gap (full credit at 20 grade points).
pub fn potential_score(player: &Player) -> f64 {
    let gap = (player.upside_gap() / 20.0).clamp(0.0, 1.0);
    0.7 * player.pot.percent() + 30.0 * gap
}

/// WAR per million, full credit at two WAR per million, plus a bonus for
/// cost-controlled contracts.
pub fn value_score(player: &Player) -> f64 {
    let per_million = player.war() / player.salary().max(0.5);
    let efficiency = 80.0 * (per_million / 2.0).clamp(0.0, 1.0);
    let bonus = match player.contract_status() {
        ContractStatus::PreArb => 20.0,
        ContractStatus::Arbitration => 10.0,
        _ => 0.0,
    };
    (efficiency + bonus).clamp(0.0, 100.0)
}

/// Full marks inside the ideal window, sliding to 60 at the acceptable
/// bounds, then losing 10 per year beyond. Unknown age is neutral.
pub fn age_score(age: Option<u32>, profile: &PhilosophyProfile) -> f64 {
    let Some(age) = age else { return 50.0 };
    let (ideal, ok) = (profile.ideal_age, profile.acceptable_age);
    let age = age as f64;
    let (ideal_min, ideal_max) = (ideal.min as f64, ideal.max as f64);
    let (ok_min, ok_max) = (ok.min as f64, ok.max as f64);

    let slide = |distance: f64, span: f64| {
        if span <= 0.0 {
            60.0
        } else {
            100.0 - 40.0 * (distance / span)
        }
    };

    let score = if age >= ideal_min && age <= ideal_max {
        100.0
    } else if age < ideal_min {
        if age >= ok_min {
            slide(ideal_min - age, ideal_min - ok_min)
        } else {
            60.0 - 10.0 * (ok_min - age)
        }
    } else if age <= ok_max {
        slide(age - ideal_max, ok_max - ideal_max)
    } else {
        60.0 - 10.0 * (age - ok_max)
    };
    score.clamp(0.0, 100.0)
}

/// 50 at a neutral position, moved by the scarcity multiplier, plus 10 for
/// premium positions.
pub fn scarcity_score(player: &Player) -> f64 {
    let pos = player.position;
    let premium = if pos.is_premium() { 10.0 } else { 0.0 };
    (50.0 + (pos.scarcity_multiplier() - 1.0) * 100.0 + premium).clamp(0.0, 100.0)
}

// ---------------------------------------------------------------------------
// Composite
// ---------------------------------------------------------------------------

pub fn composite_score(
    player: &Player,
    profile: &PhilosophyProfile,
    ctx: &ScoringContext,
) -> CompositeScore {
    let current = current_score(player, &ctx.thresholds);
    let potential = potential_score(player);
    let value = value_score(player);
    let age = age_score(player.age, profile);
    let scarcity = scarcity_score(player);

    let w = &profile.weights;
    let weight_sum = w.sum();
    let total = if weight_sum > 0.0 {
        (w.current * current
            + w.potential * potential
            + w.value * value
            + w.age * age
            + w.scarcity * scarcity)
            / weight_sum
    } else {
        0.0
    };

    CompositeScore {
        current,
        potential,
        value,
        age,
        scarcity,
        total,
    }
}
