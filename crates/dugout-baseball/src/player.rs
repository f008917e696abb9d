// Typed player model and the conversion boundary from raw records.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::contract::{derive_status, ContractStatus};
use crate::evaluation::PlayerScores;
use crate::position::Position;
use crate::ratings::{
    parse_number, parse_rating, parse_salary, parse_years_left, Rating, SampleThresholds,
    ScaleFlag, ScaleHint, YearsLeft,
};
use crate::record::{lookup, RawRecord};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A record that cannot become a player at all. Everything short of this is
/// absorbed into defaults.
#[derive(Debug, Error, PartialEq)]
pub enum RecordError {
    #[error("record has no player name")]
    MissingName,

    #[error("player '{name}' has unrecognized position '{position}'")]
    UnknownPosition { name: String, position: String },
}

// ---------------------------------------------------------------------------
// Small enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerType {
    Batter,
    Pitcher,
}

impl PlayerType {
    pub fn of(position: Position) -> Self {
        if position.is_pitcher() {
            PlayerType::Pitcher
        } else {
            PlayerType::Batter
        }
    }
}

/// Injury proneness as reported by the export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Durability {
    Durable,
    #[default]
    Normal,
    Fragile,
    Wrecked,
}

impl Durability {
    pub fn from_label(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "durable" | "iron man" => Durability::Durable,
            "fragile" => Durability::Fragile,
            "wrecked" => Durability::Wrecked,
            _ => Durability::Normal,
        }
    }

    pub fn is_concern(&self) -> bool {
        matches!(self, Durability::Fragile | Durability::Wrecked)
    }
}

// ---------------------------------------------------------------------------
// Contract terms
// ---------------------------------------------------------------------------

/// Contract fields. All money is in millions of dollars.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ContractTerms {
    pub salary: f64,
    pub years_left: YearsLeft,
    pub total_value: f64,
    pub total_years: u32,
    pub extension_value: f64,
    pub extension_years: u32,
}

impl ContractTerms {
    pub fn status(&self) -> ContractStatus {
        derive_status(&self.years_left, self.total_years)
    }

    /// Average annual value: total value over total years, or this year's
    /// salary when no multi-year figures exist.
    pub fn aav(&self) -> f64 {
        if self.total_value > 0.0 && self.total_years > 0 {
            self.total_value / self.total_years as f64
        } else {
            self.salary
        }
    }

    pub fn has_extension(&self) -> bool {
        self.extension_value > 0.0
    }

    pub fn extension_aav(&self) -> f64 {
        if !self.has_extension() {
            0.0
        } else {
            self.extension_value / self.extension_years.max(1) as f64
        }
    }

    /// Money still owed on the current deal plus any extension.
    pub fn total_commitment(&self) -> f64 {
        let current = if self.total_value > 0.0 {
            self.total_value
        } else {
            self.salary * self.years_left.years.max(1) as f64
        };
        current + self.extension_value
    }
}

// ---------------------------------------------------------------------------
// Batter / pitcher profiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatterRatings {
    pub contact: Rating,
    pub gap: Rating,
    pub power: Rating,
    pub eye: Rating,
    pub avoid_k: Rating,
    pub speed: Rating,
    pub steal: Rating,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefenseRatings {
    pub catcher_ability: Option<Rating>,
    pub catcher_arm: Option<Rating>,
    pub infield_range: Option<Rating>,
    pub infield_error: Option<Rating>,
    pub infield_arm: Option<Rating>,
    pub turn_double_play: Option<Rating>,
    pub outfield_range: Option<Rating>,
    pub outfield_error: Option<Rating>,
    pub outfield_arm: Option<Rating>,
}

impl DefenseRatings {
    /// Mean defensive grade (20-80) for the group the position belongs to.
    /// Missing components count as the scale floor; DH is always the floor.
    pub fn average_for(&self, position: Position) -> f64 {
        let parts: Vec<Option<Rating>> = match position {
            Position::Catcher => vec![self.catcher_ability, self.catcher_arm],
            Position::FirstBase
            | Position::SecondBase
            | Position::ThirdBase
            | Position::ShortStop => vec![
                self.infield_range,
                self.infield_error,
                self.infield_arm,
                self.turn_double_play,
            ],
            Position::LeftField | Position::CenterField | Position::RightField => {
                vec![self.outfield_range, self.outfield_error, self.outfield_arm]
            }
            _ => return Rating::floor().value,
        };
        let n = parts.len() as f64;
        parts
            .into_iter()
            .map(|r| r.unwrap_or_default().scouting_value())
            .sum::<f64>()
            / n
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatterStats {
    pub games: u32,
    pub plate_appearances: u32,
    pub avg: f64,
    pub obp: f64,
    pub slg: f64,
    pub home_runs: u32,
    pub stolen_bases: u32,
    pub war: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatterProfile {
    pub ratings: BatterRatings,
    pub defense: DefenseRatings,
    pub stats: BatterStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PitcherRatings {
    pub stuff: Rating,
    pub movement: Rating,
    pub control: Rating,
    pub stamina: Rating,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PitcherStats {
    pub games: u32,
    pub games_started: u32,
    pub innings: f64,
    pub era: f64,
    pub whip: f64,
    pub k_per_9: f64,
    pub bb_per_9: f64,
    pub war: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PitcherProfile {
    pub ratings: PitcherRatings,
    pub stats: PitcherStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlayerDetails {
    Batter(BatterProfile),
    Pitcher(PitcherProfile),
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A fully typed player. `scores` is filled by an evaluation pass.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub name: String,
    pub team: String,
    pub position: Position,
    pub age: Option<u32>,
    pub ovr: Rating,
    pub pot: Rating,
    pub contract: ContractTerms,
    pub durability: Durability,
    pub details: PlayerDetails,
    pub scores: Option<PlayerScores>,
}

impl Player {
    /// A player with floor ratings and no contract data. The detail variant
    /// follows the position.
    pub fn new(name: &str, position: Position) -> Self {
        let details = match PlayerType::of(position) {
            PlayerType::Batter => PlayerDetails::Batter(BatterProfile::default()),
            PlayerType::Pitcher => PlayerDetails::Pitcher(PitcherProfile::default()),
        };
        Player {
            name: name.to_string(),
            team: String::new(),
            position,
            age: None,
            ovr: Rating::floor(),
            pot: Rating::floor(),
            contract: ContractTerms::default(),
            durability: Durability::Normal,
            details,
            scores: None,
        }
    }

    pub fn with_age(mut self, age: u32) -> Self {
        self.age = Some(age);
        self
    }

    pub fn with_ratings(mut self, ovr: Rating, pot: Rating) -> Self {
        self.ovr = ovr;
        self.pot = pot;
        self
    }

    pub fn with_contract(mut self, contract: ContractTerms) -> Self {
        self.contract = contract;
        self
    }

    pub fn with_war(mut self, war: f64) -> Self {
        match &mut self.details {
            PlayerDetails::Batter(b) => b.stats.war = war,
            PlayerDetails::Pitcher(p) => p.stats.war = war,
        }
        self
    }

    pub fn player_type(&self) -> PlayerType {
        match self.details {
            PlayerDetails::Batter(_) => PlayerType::Batter,
            PlayerDetails::Pitcher(_) => PlayerType::Pitcher,
        }
    }

    pub fn batter(&self) -> Option<&BatterProfile> {
        match &self.details {
            PlayerDetails::Batter(b) => Some(b),
            PlayerDetails::Pitcher(_) => None,
        }
    }

    pub fn pitcher(&self) -> Option<&PitcherProfile> {
        match &self.details {
            PlayerDetails::Pitcher(p) => Some(p),
            PlayerDetails::Batter(_) => None,
        }
    }

    pub fn war(&self) -> f64 {
        match &self.details {
            PlayerDetails::Batter(b) => b.stats.war,
            PlayerDetails::Pitcher(p) => p.stats.war,
        }
    }

    /// Current salary in millions.
    pub fn salary(&self) -> f64 {
        self.contract.salary
    }

    /// POT minus OVR on the 20-80 scale; never negative.
    pub fn upside_gap(&self) -> f64 {
        (self.pot.scouting_value() - self.ovr.scouting_value()).max(0.0)
    }

    /// Whether this season's stats cover enough playing time to be trusted.
    pub fn has_sufficient_sample(&self, thresholds: &SampleThresholds) -> bool {
        match &self.details {
            PlayerDetails::Batter(b) => thresholds.batter_trusted(b.stats.games),
            PlayerDetails::Pitcher(p) => thresholds.pitcher_trusted(p.stats.innings),
        }
    }

    pub fn contract_status(&self) -> ContractStatus {
        self.contract.status()
    }

    pub fn is_cost_controlled(&self) -> bool {
        self.contract_status().is_cost_controlled()
    }

    // -----------------------------------------------------------------------
    // Conversion from raw records
    // -----------------------------------------------------------------------

    /// Convert a raw ingestion record into a typed player.
    ///
    /// Only a missing name or an unknown position is fatal. Unparseable
    /// fields fall back to defaults; ratings whose scale had to be guessed
    /// are reported in `ConvertedPlayer::warnings`.
    pub fn from_record(
        record: &RawRecord,
        options: &ConversionOptions,
    ) -> Result<ConvertedPlayer, RecordError> {
        let name = lookup(record, &["Name", "Player"])
            .map(|v| v.as_text().trim().to_string())
            .filter(|n| !n.is_empty())
            .ok_or(RecordError::MissingName)?;

        let pos_raw = lookup(record, &["POS", "Pos", "Position"])
            .map(|v| v.as_text().trim().to_string())
            .unwrap_or_default();
        let position =
            Position::from_str_pos(&pos_raw).ok_or_else(|| RecordError::UnknownPosition {
                name: name.clone(),
                position: pos_raw.clone(),
            })?;

        let mut reader = FieldReader {
            record,
            hint: options.scale,
            warnings: Vec::new(),
        };

        let team = lookup(record, &["Team", "TM", "ORG"])
            .map(|v| v.as_text().trim().to_string())
            .unwrap_or_default();
        let age = Some(reader.number(&["Age"]))
            .filter(|a| *a > 0.0)
            .map(|a| a.round() as u32);

        let ovr = reader.rating(&["OVR"]).unwrap_or_default();
        let pot = reader.rating(&["POT"]).unwrap_or(ovr);

        let contract = ContractTerms {
            salary: lookup(record, &["SLR", "Salary"]).map(parse_salary).unwrap_or(0.0),
            years_left: lookup(record, &["YL"]).map(parse_years_left).unwrap_or_default(),
            total_value: lookup(record, &["TV", "Contract Value"])
                .map(parse_salary)
                .unwrap_or(0.0),
            total_years: reader.number(&["TY"]).max(0.0) as u32,
            extension_value: lookup(record, &["EXT"]).map(parse_salary).unwrap_or(0.0),
            extension_years: reader.number(&["EXT YRS"]).max(0.0) as u32,
        };

        let durability = lookup(record, &["Prone"])
            .map(|v| Durability::from_label(&v.as_text()))
            .unwrap_or_default();

        let details = match PlayerType::of(position) {
            PlayerType::Batter => PlayerDetails::Batter(reader.batter_profile()),
            PlayerType::Pitcher => PlayerDetails::Pitcher(reader.pitcher_profile()),
        };

        let player = Player {
            name,
            team,
            position,
            age,
            ovr,
            pot,
            contract,
            durability,
            details,
            scores: None,
        };
        if !reader.warnings.is_empty() {
            debug!(
                "{} rating(s) for '{}' needed a scale guess",
                reader.warnings.len(),
                player.name
            );
        }

        Ok(ConvertedPlayer {
            player,
            warnings: reader.warnings,
        })
    }
}

/// How raw cells should be interpreted during conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConversionOptions {
    pub scale: ScaleHint,
}

/// A rating whose scale the magnitude heuristic could not settle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionWarning {
    pub field: String,
    pub flag: ScaleFlag,
}

/// Conversion output: the player plus anything worth surfacing to the user.
#[derive(Debug, Clone)]
pub struct ConvertedPlayer {
    pub player: Player,
    pub warnings: Vec<ConversionWarning>,
}

/// Reads typed fields out of one record, collecting scale warnings.
struct FieldReader<'a> {
    record: &'a RawRecord,
    hint: ScaleHint,
    warnings: Vec<ConversionWarning>,
}

impl FieldReader<'_> {
    fn number(&self, keys: &[&str]) -> f64 {
        lookup(self.record, keys).map(parse_number).unwrap_or(0.0)
    }

    fn count(&self, keys: &[&str]) -> u32 {
        self.number(keys).max(0.0).round() as u32
    }

    fn rating(&mut self, keys: &[&str]) -> Option<Rating> {
        let (key, raw) = keys
            .iter()
            .find_map(|k| self.record.get(*k).filter(|v| !v.is_placeholder()).map(|v| (*k, v)))?;
        let parsed = parse_rating(raw, self.hint);
        if let Some(flag) = parsed.flag {
            self.warnings.push(ConversionWarning {
                field: key.to_string(),
                flag,
            });
        }
        parsed.rating
    }

    fn grade(&mut self, keys: &[&str]) -> Rating {
        self.rating(keys).unwrap_or_default()
    }

    fn batter_profile(&mut self) -> BatterProfile {
        let ratings = BatterRatings {
            contact: self.grade(&["CON"]),
            gap: self.grade(&["GAP"]),
            power: self.grade(&["POW"]),
            eye: self.grade(&["EYE"]),
            avoid_k: self.grade(&["K's", "AvK"]),
            speed: self.grade(&["SPE"]),
            steal: self.grade(&["STE"]),
        };
        let defense = DefenseRatings {
            catcher_ability: self.rating(&["C ABI"]),
            catcher_arm: self.rating(&["C ARM"]),
            infield_range: self.rating(&["IF RNG"]),
            infield_error: self.rating(&["IF ERR"]),
            infield_arm: self.rating(&["IF ARM"]),
            turn_double_play: self.rating(&["TDP"]),
            outfield_range: self.rating(&["OF RNG"]),
            outfield_error: self.rating(&["OF ERR"]),
            outfield_arm: self.rating(&["OF ARM"]),
        };
        let stats = BatterStats {
            games: self.count(&["G"]),
            plate_appearances: self.count(&["PA"]),
            avg: self.number(&["AVG"]),
            obp: self.number(&["OBP"]),
            slg: self.number(&["SLG"]),
            home_runs: self.count(&["HR"]),
            stolen_bases: self.count(&["SB"]),
            war: self.number(&["WAR (Batter)", "WAR"]),
        };
        BatterProfile {
            ratings,
            defense,
            stats,
        }
    }

    fn pitcher_profile(&mut self) -> PitcherProfile {
        let ratings = PitcherRatings {
            stuff: self.grade(&["STU"]),
            movement: self.grade(&["MOV"]),
            control: self.grade(&["CON", "CONT"]),
            stamina: self.grade(&["STM"]),
        };
        let stats = PitcherStats {
            games: self.count(&["G"]),
            games_started: self.count(&["GS"]),
            innings: self.number(&["IP"]),
            era: self.number(&["ERA"]),
            whip: self.number(&["WHIP"]),
            k_per_9: self.number(&["K/9"]),
            bb_per_9: self.number(&["BB/9"]),
            war: self.number(&["WAR (Pitcher)", "WAR"]),
        };
        PitcherProfile { ratings, stats }
    }
}
