// Contract status derivation.
//
// A player's status comes from the years-left annotation ("1 (auto.)",
// "3 (arbitration)") and, failing that, from how many years remain. Exactly
// one status holds per player.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ratings::YearsLeft;

/// Contract-control stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    PreArb,
    Arbitration,
    Signed,
    Expiring,
    Unknown,
}

impl ContractStatus {
    /// Pre-arb and arbitration players cost well below market.
    pub fn is_cost_controlled(&self) -> bool {
        matches!(self, ContractStatus::PreArb | ContractStatus::Arbitration)
    }

    /// Scale applied to the summed trade-value components. Always within
    /// 0.9..=1.1.
    pub fn trade_multiplier(&self) -> f64 {
        let m: f64 = match self {
            ContractStatus::PreArb => 1.10,
            ContractStatus::Arbitration => 1.05,
            ContractStatus::Signed | ContractStatus::Unknown => 1.00,
            ContractStatus::Expiring => 0.95,
        };
        m.clamp(0.9, 1.1)
    }

    /// Points this status contributes to the contract-value component.
    pub fn contract_points(&self) -> f64 {
        match self {
            ContractStatus::PreArb => 7.0,
            ContractStatus::Arbitration => 5.0,
            ContractStatus::Signed => 3.0,
            ContractStatus::Unknown => 2.0,
            ContractStatus::Expiring => 1.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContractStatus::PreArb => "pre_arb",
            ContractStatus::Arbitration => "arbitration",
            ContractStatus::Signed => "signed",
            ContractStatus::Expiring => "expiring",
            ContractStatus::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Derive the contract status from a parsed years-left cell and the total
/// contract years (`TY`).
///
/// Annotations win: anything mentioning auto-renewal, pre-arb or a minimum
/// deal is pre-arb; anything else mentioning "arb" is arbitration. Without
/// an annotation, two or more years left is a signed deal, one year is
/// expiring, and zero years with a known contract length is still signed.
pub fn derive_status(years_left: &YearsLeft, total_years: u32) -> ContractStatus {
    let note = years_left.status.as_str();
    if note.contains("auto")
        || note.contains("pre-arb")
        || note.contains("pre arb")
        || note.contains("min")
    {
        return ContractStatus::PreArb;
    }
    if note.contains("arb") {
        return ContractStatus::Arbitration;
    }

    match years_left.years {
        0 if total_years > 0 => ContractStatus::Signed,
        0 => ContractStatus::Unknown,
        1 => ContractStatus::Expiring,
        _ => ContractStatus::Signed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yl(years: u32, status: &str) -> YearsLeft {
        YearsLeft {
            years,
            status: status.to_string(),
        }
    }

    #[test]
    fn annotations_take_priority() {
        assert_eq!(derive_status(&yl(1, "auto."), 0), ContractStatus::PreArb);
        assert_eq!(derive_status(&yl(2, "pre-arb"), 0), ContractStatus::PreArb);
        assert_eq!(derive_status(&yl(1, "min. contract"), 0), ContractStatus::PreArb);
        assert_eq!(derive_status(&yl(3, "arbitration"), 0), ContractStatus::Arbitration);
        assert_eq!(derive_status(&yl(1, "arb"), 0), ContractStatus::Arbitration);
    }

    #[test]
    fn bare_years_left() {
        assert_eq!(derive_status(&yl(5, ""), 0), ContractStatus::Signed);
        assert_eq!(derive_status(&yl(1, ""), 0), ContractStatus::Expiring);
        assert_eq!(derive_status(&yl(0, ""), 3), ContractStatus::Signed);
        assert_eq!(derive_status(&yl(0, ""), 0), ContractStatus::Unknown);
    }

    #[test]
    fn multiplier_rewards_control() {
        assert_eq!(ContractStatus::PreArb.trade_multiplier(), 1.10);
        assert_eq!(ContractStatus::Arbitration.trade_multiplier(), 1.05);
        assert_eq!(ContractStatus::Unknown.trade_multiplier(), 1.00);
        assert_eq!(ContractStatus::Expiring.trade_multiplier(), 0.95);
    }

    #[test]
    fn multiplier_is_bounded() {
        for s in [
            ContractStatus::PreArb,
            ContractStatus::Arbitration,
            ContractStatus::Signed,
            ContractStatus::Expiring,
            ContractStatus::Unknown,
        ] {
            let m = s.trade_multiplier();
            assert!((0.9..=1.1).contains(&m), "{s} multiplier {m}");
        }
    }

    #[test]
    fn cost_control() {
        assert!(ContractStatus::PreArb.is_cost_controlled());
        assert!(ContractStatus::Arbitration.is_cost_controlled());
        assert!(!ContractStatus::Signed.is_cost_controlled());
        assert!(!ContractStatus::Unknown.is_cost_controlled());
    }
}
