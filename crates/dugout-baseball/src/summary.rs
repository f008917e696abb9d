// Roster summary and letter grades.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::archetype::{get_best_archetype, Archetype, ArchetypeFit, STRONG_FIT};
use crate::player::Player;
use crate::position::PositionGroup;
use crate::ratings::SampleThresholds;
use crate::roster::Roster;

/// Rosters smaller than this report no dominant archetype.
const MIN_PLAYERS_FOR_ARCHETYPE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Grade {
    F,
    D,
    CMinus,
    C,
    CPlus,
    BMinus,
    B,
    BPlus,
    AMinus,
    A,
    APlus,
}

impl Grade {
    /// Grade an average overall rating expressed as a 0-100 percentage.
    pub fn from_percent(pct: f64) -> Self {
        const TABLE: [(f64, Grade); 10] = [
            (80.0, Grade::APlus),
            (75.0, Grade::A),
            (70.0, Grade::AMinus),
            (65.0, Grade::BPlus),
            (60.0, Grade::B),
            (55.0, Grade::BMinus),
            (50.0, Grade::CPlus),
            (45.0, Grade::C),
            (40.0, Grade::CMinus),
            (30.0, Grade::D),
        ];
        TABLE
            .iter()
            .find(|(min, _)| pct >= *min)
            .map_or(Grade::F, |(_, g)| *g)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::AMinus => "A-",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::BMinus => "B-",
            Grade::CPlus => "C+",
            Grade::C => "C",
            Grade::CMinus => "C-",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionGrade {
    pub group: PositionGroup,
    pub grade: Grade,
    /// Mean OVR as a 0-100 percentage.
    pub average_ovr_pct: f64,
    pub players: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DominantArchetype {
    pub archetype: Archetype,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterSummary {
    pub player_count: usize,
    pub total_war: f64,
    /// Millions.
    pub total_salary: f64,
    /// Over players with a known age; 0 when none.
    pub average_age: f64,
    /// On the 20-80 scale; 0 for an empty roster.
    pub average_ovr: f64,
    pub position_grades: Vec<PositionGrade>,
    pub archetype_fit: Option<DominantArchetype>,
}

/// Summarize any collection of players.
pub fn summarize<'a, I>(players: I, thresholds: &SampleThresholds) -> RosterSummary
where
    I: IntoIterator<Item = &'a Player>,
{
    let players: Vec<&Player> = players.into_iter().collect();
    let count = players.len();

    let total_war = players.iter().map(|p| p.war()).sum();
    let total_salary = players.iter().map(|p| p.salary()).sum();
    let ages: Vec<u32> = players.iter().filter_map(|p| p.age).collect();
    let average_age = if ages.is_empty() {
        0.0
    } else {
        ages.iter().map(|&a| a as f64).sum::<f64>() / ages.len() as f64
    };
    let average_ovr = if count == 0 {
        0.0
    } else {
        players.iter().map(|p| p.ovr.scouting_value()).sum::<f64>() / count as f64
    };

    RosterSummary {
        player_count: count,
        total_war,
        total_salary,
        average_age,
        average_ovr,
        position_grades: grade_positions(&players),
        archetype_fit: dominant_archetype(&players, thresholds),
    }
}

fn grade_positions(players: &[&Player]) -> Vec<PositionGrade> {
    let mut groups: BTreeMap<PositionGroup, Vec<f64>> = BTreeMap::new();
    for p in players {
        groups
            .entry(p.position.group())
            .or_default()
            .push(p.ovr.percent());
    }
    groups
        .into_iter()
        .map(|(group, pcts)| {
            let avg = pcts.iter().sum::<f64>() / pcts.len() as f64;
            PositionGrade {
                group,
                grade: Grade::from_percent(avg),
                average_ovr_pct: avg,
                players: pcts.len(),
            }
        })
        .collect()
}

/// Best fit from the last evaluation pass, or computed fresh.
fn best_fit(player: &Player, thresholds: &SampleThresholds) -> Option<ArchetypeFit> {
    player
        .scores
        .as_ref()
        .and_then(|s| s.best_archetype)
        .or_else(|| get_best_archetype(player, thresholds))
}

fn dominant_archetype(
    players: &[&Player],
    thresholds: &SampleThresholds,
) -> Option<DominantArchetype> {
    if players.len() < MIN_PLAYERS_FOR_ARCHETYPE {
        return None;
    }

    let mut counts: BTreeMap<Archetype, usize> = BTreeMap::new();
    for fit in players.iter().filter_map(|p| best_fit(p, thresholds)) {
        if fit.score >= STRONG_FIT {
            *counts.entry(fit.archetype).or_default() += 1;
        }
    }

    // Archetype ordering makes the first maximum the tie winner.
    counts
        .into_iter()
        .fold(None, |best: Option<DominantArchetype>, (archetype, count)| match best {
            Some(b) if b.count >= count => Some(b),
            _ => Some(DominantArchetype { archetype, count }),
        })
}

impl Roster {
    pub fn summary(&self, thresholds: &SampleThresholds) -> RosterSummary {
        summarize(self.players(), thresholds)
    }
}
