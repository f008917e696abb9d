// Trade value calculation.
//
// Produces one comparable 1-100 score per player from four independently
// bounded components (current production, future value, contract value,
// position scarcity), scaled by a contract-status multiplier. Extensions are
// graded separately against a WAR-based market estimate.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contract::ContractStatus;
use crate::player::Player;
use crate::ratings::band;

/// Component caps.
pub const MAX_CURRENT_PRODUCTION: f64 = 35.0;
pub const MAX_FUTURE_VALUE: f64 = 30.0;
pub const MAX_CONTRACT_VALUE: f64 = 25.0;
pub const MAX_POSITION_SCARCITY: f64 = 10.0;

/// WAR at which the production blend saturates.
const WAR_CEILING: f64 = 5.0;
/// Production blend: WAR carries most of the weight, OVR the rest.
const WAR_WEIGHT: f64 = 0.8;
const OVR_WEIGHT: f64 = 0.2;
/// Control-years points never exceed this.
const MAX_CONTROL_POINTS: f64 = 8.0;
/// Pre-arb players still have their arbitration years ahead of them.
const PRE_ARB_CONTROL_FLOOR: f64 = 6.0;
/// Surplus-value points: full at `SURPLUS_CEILING` millions of surplus.
const MAX_SURPLUS_POINTS: f64 = 4.0;
const SURPLUS_CEILING: f64 = 30.0;
/// AAV-efficiency points: full at the floor, zero at the ceiling.
const MAX_AAV_POINTS: f64 = 8.0;
const AAV_FLOOR: f64 = 0.5;
const AAV_CEILING: f64 = 30.0;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Market assumptions shared by trade value, surplus value and extension
/// grading. Passed in explicitly by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationSettings {
    /// League-average cost of one win, in millions.
    pub dollars_per_war: f64,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        ValuationSettings {
            dollars_per_war: 8.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeComponents {
    pub current_production: f64,
    pub future_value: f64,
    pub contract_value: f64,
    pub position_scarcity: f64,
}

impl TradeComponents {
    pub fn total(&self) -> f64 {
        self.current_production + self.future_value + self.contract_value + self.position_scarcity
    }
}

/// Tier labels, lowest first so that ordering follows value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Tier {
    Minimal,
    BelowAverage,
    Average,
    Solid,
    Star,
    Elite,
}

impl Tier {
    pub fn from_value(value: u8) -> Self {
        match value {
            85.. => Tier::Elite,
            70..=84 => Tier::Star,
            55..=69 => Tier::Solid,
            40..=54 => Tier::Average,
            25..=39 => Tier::BelowAverage,
            _ => Tier::Minimal,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::Elite => "Elite",
            Tier::Star => "Star",
            Tier::Solid => "Solid",
            Tier::Average => "Average",
            Tier::BelowAverage => "Below Average",
            Tier::Minimal => "Minimal",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionGrade {
    Steal,
    Fair,
    Risky,
    Overpay,
}

impl ExtensionGrade {
    fn from_ratio(ratio: f64) -> Self {
        if ratio <= 0.7 {
            ExtensionGrade::Steal
        } else if ratio <= 1.1 {
            ExtensionGrade::Fair
        } else if ratio <= 1.5 {
            ExtensionGrade::Risky
        } else {
            ExtensionGrade::Overpay
        }
    }

    /// One step worse; overpay stays overpay.
    pub fn downgrade(self) -> Self {
        match self {
            ExtensionGrade::Steal => ExtensionGrade::Fair,
            ExtensionGrade::Fair => ExtensionGrade::Risky,
            ExtensionGrade::Risky | ExtensionGrade::Overpay => ExtensionGrade::Overpay,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ExtensionGrade::Steal => "steal",
            ExtensionGrade::Fair => "fair",
            ExtensionGrade::Risky => "risky",
            ExtensionGrade::Overpay => "overpay",
        }
    }
}

impl fmt::Display for ExtensionGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedFlag {
    /// 32 or older with an extension of four or more years.
    AgeAndLength,
    /// Fragile or wrecked.
    Durability,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionAssessment {
    pub grade: ExtensionGrade,
    pub extension_aav: f64,
    pub expected_aav: f64,
    /// Extension AAV over expected AAV; `None` when expected is zero.
    pub ratio: Option<f64>,
    pub red_flags: Vec<RedFlag>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeValueResult {
    pub trade_value: u8,
    pub components: TradeComponents,
    pub tier: Tier,
    pub aav: f64,
    pub total_commitment: f64,
    pub surplus_value: f64,
    pub contract_status: ContractStatus,
    pub has_extension: bool,
    pub extension_grade: Option<ExtensionGrade>,
    pub extension: Option<ExtensionAssessment>,
}

// ---------------------------------------------------------------------------
// Components
// ---------------------------------------------------------------------------

/// Younger players get more credit for their potential.
pub fn age_multiplier(age: Option<u32>) -> f64 {
    match age {
        None => 0.75,
        Some(a) if a <= 23 => 1.0,
        Some(24..=25) => 0.9,
        Some(26..=27) => 0.75,
        Some(28..=29) => 0.6,
        Some(30..=32) => 0.4,
        Some(_) => 0.2,
    }
}

fn war_fraction(player: &Player) -> f64 {
    let f = player.war() / WAR_CEILING;
    if f.is_finite() {
        f.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn current_production(player: &Player) -> f64 {
    let blend = WAR_WEIGHT * war_fraction(player) + OVR_WEIGHT * player.ovr.fraction();
    MAX_CURRENT_PRODUCTION * blend
}

/// Potential, or demonstrated production when that is higher, discounted by
/// age.
fn future_value(player: &Player) -> f64 {
    let ceiling = player.pot.fraction().max(war_fraction(player));
    MAX_FUTURE_VALUE * ceiling * age_multiplier(player.age)
}

fn contract_value(player: &Player, status: ContractStatus, settings: &ValuationSettings) -> f64 {
    let terms = &player.contract;

    let per_year = if status.is_cost_controlled() { 2.0 } else { 1.0 };
    let mut control = terms.years_left.years as f64 * per_year;
    if status == ContractStatus::PreArb {
        control = control.max(PRE_ARB_CONTROL_FLOOR);
    }
    let control = control.min(MAX_CONTROL_POINTS);

    let aav = terms.aav();
    let efficiency = if aav <= 0.0 {
        // Unknown cost earns half credit.
        MAX_AAV_POINTS / 2.0
    } else {
        MAX_AAV_POINTS * band(aav, AAV_CEILING, AAV_FLOOR)
    };

    let extension = if terms.has_extension() {
        match terms.extension_aav() {
            a if a <= 10.0 => 2.0,
            a if a <= 20.0 => 1.0,
            a if a <= 30.0 => 0.0,
            _ => -3.0,
        }
    } else {
        0.0
    };

    let surplus = surplus_value(player, settings);
    let surplus_points = if surplus.is_finite() {
        MAX_SURPLUS_POINTS * (surplus / SURPLUS_CEILING).clamp(0.0, 1.0)
    } else {
        0.0
    };

    (control + status.contract_points() + efficiency + surplus_points + extension)
        .clamp(0.0, MAX_CONTRACT_VALUE)
}

fn position_scarcity(player: &Player) -> f64 {
    let mult = player.position.scarcity_multiplier();
    (4.0 + 6.0 * (mult - 0.8) / 0.5).clamp(0.0, MAX_POSITION_SCARCITY)
}

/// WAR value at market rate minus current salary, in millions.
pub fn surplus_value(player: &Player, settings: &ValuationSettings) -> f64 {
    player.war() * settings.dollars_per_war - player.salary()
}

// ---------------------------------------------------------------------------
// Extension grading
// ---------------------------------------------------------------------------

/// Grade a player's extension, if they have one.
///
/// The extension AAV is compared with `max(WAR, 0) * dollars_per_war`; each
/// red flag then knocks the grade down a step.
pub fn grade_extension(player: &Player, settings: &ValuationSettings) -> Option<ExtensionAssessment> {
    let terms = &player.contract;
    if !terms.has_extension() {
        return None;
    }

    let extension_aav = terms.extension_aav();
    let expected_aav = player.war().max(0.0) * settings.dollars_per_war;
    let ratio = (expected_aav > 0.0).then(|| extension_aav / expected_aav);
    let base = ratio.map_or(ExtensionGrade::Overpay, ExtensionGrade::from_ratio);

    let mut red_flags = Vec::new();
    if player.age.is_some_and(|a| a >= 32) && terms.extension_years >= 4 {
        red_flags.push(RedFlag::AgeAndLength);
    }
    if player.durability.is_concern() {
        red_flags.push(RedFlag::Durability);
    }

    let grade = red_flags.iter().fold(base, |g, _| g.downgrade());

    Some(ExtensionAssessment {
        grade,
        extension_aav,
        expected_aav,
        ratio,
        red_flags,
    })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Compute a player's trade value with its full breakdown.
pub fn calculate_trade_value(player: &Player, settings: &ValuationSettings) -> TradeValueResult {
    let status = player.contract_status();
    let components = TradeComponents {
        current_production: current_production(player),
        future_value: future_value(player),
        contract_value: contract_value(player, status, settings),
        position_scarcity: position_scarcity(player),
    };

    let scaled = components.total() * status.trade_multiplier();
    let trade_value = if scaled.is_finite() {
        scaled.round().clamp(1.0, 100.0) as u8
    } else {
        1
    };

    let extension = grade_extension(player, settings);

    TradeValueResult {
        trade_value,
        components,
        tier: Tier::from_value(trade_value),
        aav: player.contract.aav(),
        total_commitment: player.contract.total_commitment(),
        surplus_value: surplus_value(player, settings),
        contract_status: status,
        has_extension: player.contract.has_extension(),
        extension_grade: extension.as_ref().map(|e| e.grade),
        extension,
    }
}
