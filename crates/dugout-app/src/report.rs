// Output shaping for the CLI: value tables, archetype listings, generation
// reports and roster summaries. Nothing here does I/O.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use dugout_baseball::archetype::{find_players_by_archetype, Archetype};
use dugout_baseball::contract::ContractStatus;
use dugout_baseball::generation::GeneratedRoster;
use dugout_baseball::player::Player;
use dugout_baseball::ratings::SampleThresholds;
use dugout_baseball::roster::RosterExport;
use dugout_baseball::summary::RosterSummary;
use dugout_baseball::trade_value::{calculate_trade_value, Tier, ValuationSettings};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Trade value table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ValueRow {
    pub name: String,
    pub position: String,
    pub age: Option<u32>,
    pub ovr: f64,
    pub trade_value: u8,
    pub tier: Tier,
    pub contract_status: ContractStatus,
    pub surplus_value: f64,
    /// Composite total from the last evaluation pass, if any.
    pub composite: Option<f64>,
}

/// One row per player, best trade value first. Uses cached scores when the
/// pool has been evaluated.
pub fn value_rows(players: &[Player], settings: &ValuationSettings) -> Vec<ValueRow> {
    let mut rows: Vec<ValueRow> = players
        .iter()
        .map(|p| {
            let value = match &p.scores {
                Some(s) => s.trade_value.clone(),
                None => calculate_trade_value(p, settings),
            };
            ValueRow {
                name: p.name.clone(),
                position: p.position.display_str().to_string(),
                age: p.age,
                ovr: p.ovr.scouting_value(),
                trade_value: value.trade_value,
                tier: value.tier,
                contract_status: value.contract_status,
                surplus_value: value.surplus_value,
                composite: p.scores.as_ref().map(|s| s.composite.total),
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        b.trade_value
            .cmp(&a.trade_value)
            .then_with(|| a.name.cmp(&b.name))
    });
    rows
}

pub fn format_value_table(rows: &[ValueRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4}  {:<24} {:<3} {:>3} {:>4} {:>5}  {:<8} {:<11} {:>8} {:>6}",
        "#", "Name", "Pos", "Age", "OVR", "Value", "Tier", "Status", "Surplus", "Score"
    );
    for (i, r) in rows.iter().enumerate() {
        let age = r.age.map_or_else(|| "-".to_string(), |a| a.to_string());
        let score = r
            .composite
            .map_or_else(|| "-".to_string(), |c| format!("{c:.1}"));
        let _ = writeln!(
            out,
            "{:>4}  {:<24} {:<3} {:>3} {:>4.0} {:>5}  {:<8} {:<11} {:>8.1} {:>6}",
            i + 1,
            r.name,
            r.position,
            age,
            r.ovr,
            r.trade_value,
            r.tier.label(),
            r.contract_status.label(),
            r.surplus_value,
            score
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Archetype listings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ArchetypeMatch {
    pub name: String,
    pub position: String,
    pub score: f64,
}

/// Players fitting `archetype` at `min_score` or better, best first.
pub fn archetype_matches(
    pool: &[Player],
    archetype: Archetype,
    min_score: f64,
    thresholds: &SampleThresholds,
) -> Vec<ArchetypeMatch> {
    find_players_by_archetype(pool, archetype, min_score, thresholds)
        .into_iter()
        .map(|(p, score)| ArchetypeMatch {
            name: p.name.clone(),
            position: p.position.display_str().to_string(),
            score,
        })
        .collect()
}

/// How many players fit each archetype at `min_score` or better.
pub fn archetype_counts(
    pool: &[Player],
    min_score: f64,
    thresholds: &SampleThresholds,
) -> Vec<(Archetype, usize)> {
    Archetype::ALL
        .into_iter()
        .map(|a| (a, find_players_by_archetype(pool, a, min_score, thresholds).len()))
        .collect()
}

pub fn format_archetype_matches(archetype: Archetype, matches: &[ArchetypeMatch]) -> String {
    let mut out = format!("{} ({} players)\n", archetype.label(), matches.len());
    for m in matches {
        let _ = writeln!(out, "  {:<24} {:<3} {:>5.1}", m.name, m.position, m.score);
    }
    out
}

pub fn format_archetype_counts(counts: &[(Archetype, usize)], min_score: f64) -> String {
    let mut out = format!("Players fitting each archetype at {min_score:.0}+\n");
    for (a, n) in counts {
        let _ = writeln!(out, "  {:<18} {:<16} {:>4}", a.key(), a.label(), n);
    }
    out
}

// ---------------------------------------------------------------------------
// Generation reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct RosterReport {
    pub roster: RosterExport,
    pub unfilled: Vec<String>,
    pub mean_score: f64,
    pub summary: RosterSummary,
}

impl RosterReport {
    pub fn new(g: &GeneratedRoster, thresholds: &SampleThresholds) -> Self {
        RosterReport {
            roster: g.roster.export(),
            unfilled: g.unfilled.iter().map(|s| s.to_string()).collect(),
            mean_score: g.mean_score,
            summary: g.roster.summary(thresholds),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub generated_at: DateTime<Utc>,
    /// "philosophy" or "archetype".
    pub mode: String,
    /// Philosophy key or archetype key, when one applied.
    pub strategy: Option<String>,
    /// Seed that reproduces this report.
    pub seed: u64,
    pub pool_size: usize,
    pub rosters: Vec<RosterReport>,
}

impl GenerationReport {
    pub fn new(
        mode: &str,
        strategy: Option<String>,
        seed: u64,
        pool_size: usize,
        generated: &[GeneratedRoster],
        thresholds: &SampleThresholds,
    ) -> Self {
        GenerationReport {
            generated_at: Utc::now(),
            mode: mode.to_string(),
            strategy,
            seed,
            pool_size,
            rosters: generated
                .iter()
                .map(|g| RosterReport::new(g, thresholds))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

pub fn format_summary(summary: &RosterSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Players: {}   WAR: {:.1}   Payroll: ${:.1}M",
        summary.player_count, summary.total_war, summary.total_salary
    );
    let _ = writeln!(
        out,
        "Avg age: {:.1}   Avg OVR: {:.1}",
        summary.average_age, summary.average_ovr
    );
    match &summary.archetype_fit {
        Some(d) => {
            let _ = writeln!(out, "Dominant archetype: {} ({})", d.archetype.label(), d.count);
        }
        None => {
            let _ = writeln!(out, "Dominant archetype: none");
        }
    }
    if !summary.position_grades.is_empty() {
        let _ = writeln!(out, "Position grades:");
        for g in &summary.position_grades {
            let _ = writeln!(
                out,
                "  {:<16} {:<2}  ({:.1}%, {} player{})",
                g.group.label(),
                g.grade.label(),
                g.average_ovr_pct,
                g.players,
                if g.players == 1 { "" } else { "s" }
            );
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
