// Baseball positions, lineup order, scarcity table and grading groups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fielding positions a player can be listed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    Catcher,
    FirstBase,
    SecondBase,
    ThirdBase,
    ShortStop,
    LeftField,
    CenterField,
    RightField,
    DesignatedHitter,
    StartingPitcher,
    ReliefPitcher,
}

/// The nine lineup slots, in display order.
pub const LINEUP_POSITIONS: [Position; 9] = [
    Position::Catcher,
    Position::FirstBase,
    Position::SecondBase,
    Position::ThirdBase,
    Position::ShortStop,
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
    Position::DesignatedHitter,
];

/// Outfield spots are interchangeable for slot assignment.
pub const OUTFIELD: [Position; 3] = [
    Position::LeftField,
    Position::CenterField,
    Position::RightField,
];

impl Position {
    /// Parse a position code.
    ///
    /// Handles export-style abbreviations:
    /// - "1B" -> FirstBase, "2B" -> SecondBase, "3B" -> ThirdBase
    /// - "OF" -> CenterField (generic outfield maps to CenterField)
    /// - "CL", "MR", "P" -> ReliefPitcher
    pub fn from_str_pos(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "C" => Some(Position::Catcher),
            "1B" => Some(Position::FirstBase),
            "2B" => Some(Position::SecondBase),
            "3B" => Some(Position::ThirdBase),
            "SS" => Some(Position::ShortStop),
            "LF" => Some(Position::LeftField),
            "CF" => Some(Position::CenterField),
            "RF" => Some(Position::RightField),
            "OF" => Some(Position::CenterField),
            "DH" => Some(Position::DesignatedHitter),
            "SP" => Some(Position::StartingPitcher),
            "RP" | "CL" | "MR" | "P" => Some(Position::ReliefPitcher),
            _ => None,
        }
    }

    /// Return the display string for this position.
    pub fn display_str(&self) -> &'static str {
        match self {
            Position::Catcher => "C",
            Position::FirstBase => "1B",
            Position::SecondBase => "2B",
            Position::ThirdBase => "3B",
            Position::ShortStop => "SS",
            Position::LeftField => "LF",
            Position::CenterField => "CF",
            Position::RightField => "RF",
            Position::DesignatedHitter => "DH",
            Position::StartingPitcher => "SP",
            Position::ReliefPitcher => "RP",
        }
    }

    pub fn is_pitcher(&self) -> bool {
        matches!(self, Position::StartingPitcher | Position::ReliefPitcher)
    }

    pub fn is_outfield(&self) -> bool {
        OUTFIELD.contains(self)
    }

    pub fn is_lineup(&self) -> bool {
        !self.is_pitcher()
    }

    /// Fixed positional scarcity multiplier.
    ///
    /// Up-the-middle defenders and starting pitchers are the hardest to
    /// replace; DH is the easiest.
    pub fn scarcity_multiplier(&self) -> f64 {
        match self {
            Position::Catcher => 1.30,
            Position::ShortStop => 1.30,
            Position::StartingPitcher => 1.25,
            Position::CenterField => 1.20,
            Position::SecondBase => 1.10,
            Position::ThirdBase => 1.05,
            Position::RightField => 1.00,
            Position::LeftField => 0.95,
            Position::FirstBase => 0.90,
            Position::ReliefPitcher => 0.85,
            Position::DesignatedHitter => 0.80,
        }
    }

    /// Premium positions earn an extra bump in the composite scarcity score.
    pub fn is_premium(&self) -> bool {
        matches!(
            self,
            Position::Catcher
                | Position::ShortStop
                | Position::CenterField
                | Position::StartingPitcher
        )
    }

    /// Which grading group this position rolls up into.
    pub fn group(&self) -> PositionGroup {
        match self {
            Position::Catcher => PositionGroup::Catcher,
            Position::FirstBase | Position::ThirdBase => PositionGroup::CornerInfield,
            Position::SecondBase => PositionGroup::SecondBase,
            Position::ShortStop => PositionGroup::Shortstop,
            Position::LeftField | Position::CenterField | Position::RightField => {
                PositionGroup::Outfield
            }
            Position::DesignatedHitter => PositionGroup::DesignatedHitter,
            Position::StartingPitcher => PositionGroup::Rotation,
            Position::ReliefPitcher => PositionGroup::Bullpen,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Position groups (used by roster grading)
// ---------------------------------------------------------------------------

/// Positions merged for letter grading: corners, outfield and relievers
/// are graded together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PositionGroup {
    Catcher,
    CornerInfield,
    SecondBase,
    Shortstop,
    Outfield,
    DesignatedHitter,
    Rotation,
    Bullpen,
}

impl PositionGroup {
    pub fn label(&self) -> &'static str {
        match self {
            PositionGroup::Catcher => "Catcher",
            PositionGroup::CornerInfield => "Corner Infield",
            PositionGroup::SecondBase => "Second Base",
            PositionGroup::Shortstop => "Shortstop",
            PositionGroup::Outfield => "Outfield",
            PositionGroup::DesignatedHitter => "Designated Hitter",
            PositionGroup::Rotation => "Rotation",
            PositionGroup::Bullpen => "Bullpen",
        }
    }
}

impl fmt::Display for PositionGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Position; 11] = [
        Position::Catcher,
        Position::FirstBase,
        Position::SecondBase,
        Position::ThirdBase,
        Position::ShortStop,
        Position::LeftField,
        Position::CenterField,
        Position::RightField,
        Position::DesignatedHitter,
        Position::StartingPitcher,
        Position::ReliefPitcher,
    ];

    #[test]
    fn from_str_pos_standard_positions() {
        assert_eq!(Position::from_str_pos("C"), Some(Position::Catcher));
        assert_eq!(Position::from_str_pos("SS"), Some(Position::ShortStop));
        assert_eq!(Position::from_str_pos("SP"), Some(Position::StartingPitcher));
        assert_eq!(Position::from_str_pos("RP"), Some(Position::ReliefPitcher));
        assert_eq!(Position::from_str_pos("DH"), Some(Position::DesignatedHitter));
    }

    #[test]
    fn from_str_pos_aliases() {
        assert_eq!(Position::from_str_pos("OF"), Some(Position::CenterField));
        assert_eq!(Position::from_str_pos("CL"), Some(Position::ReliefPitcher));
        assert_eq!(Position::from_str_pos(" mr "), Some(Position::ReliefPitcher));
    }

    #[test]
    fn from_str_pos_invalid() {
        assert_eq!(Position::from_str_pos("XX"), None);
        assert_eq!(Position::from_str_pos(""), None);
        assert_eq!(Position::from_str_pos("4B"), None);
    }

    #[test]
    fn display_str_roundtrip() {
        for pos in ALL {
            let s = pos.display_str();
            assert_eq!(Position::from_str_pos(s), Some(pos), "Roundtrip failed for {}", s);
        }
    }

    #[test]
    fn lineup_positions_are_the_nine_non_pitchers() {
        assert_eq!(LINEUP_POSITIONS.len(), 9);
        assert!(LINEUP_POSITIONS.iter().all(|p| p.is_lineup()));
        assert!(!Position::StartingPitcher.is_lineup());
    }

    #[test]
    fn scarcity_table_extremes() {
        let max = ALL
            .iter()
            .map(|p| p.scarcity_multiplier())
            .fold(f64::MIN, f64::max);
        assert_eq!(Position::Catcher.scarcity_multiplier(), max);
        assert_eq!(Position::ShortStop.scarcity_multiplier(), max);
        let min = ALL
            .iter()
            .map(|p| p.scarcity_multiplier())
            .fold(f64::MAX, f64::min);
        assert_eq!(Position::DesignatedHitter.scarcity_multiplier(), min);
    }

    #[test]
    fn groups_merge_corners_outfield_and_relievers() {
        assert_eq!(Position::FirstBase.group(), PositionGroup::CornerInfield);
        assert_eq!(Position::ThirdBase.group(), PositionGroup::CornerInfield);
        assert_eq!(Position::LeftField.group(), Position::RightField.group());
        assert_eq!(Position::ReliefPitcher.group(), PositionGroup::Bullpen);
        assert_ne!(Position::SecondBase.group(), Position::ShortStop.group());
    }
}
