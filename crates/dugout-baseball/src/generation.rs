// Automatic roster construction.
//
// Two strategies fill the same slot template in `Roster::fill_order`:
//
// - Archetype-driven: per slot, take a short ordered list of eligible
//   candidates, weight each one by competitiveness, salary tier and archetype
//   fit, then draw one at random.
// - Philosophy-driven: score everyone once with the composite scorer (plus
//   optional Gaussian jitter), drop anyone failing the profile's hard
//   constraints, and take the best remaining candidate per slot.
//
// Both take the random source from the caller. A slot with no eligible
// candidate stays empty and is reported in `GeneratedRoster::unfilled`.

use std::cmp::Ordering;
use std::collections::HashSet;

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::archetype::{calculate_archetype_fit, Archetype};
use crate::philosophy::PhilosophyProfile;
use crate::player::Player;
use crate::ratings::SampleThresholds;
use crate::roster::{Roster, RosterLayout, SlotId};
use crate::scoring::{composite_score, ScoringContext};

/// No candidate's selection weight drops below this.
const MIN_WEIGHT: f64 = 0.05;
/// Composite bonus for cost-controlled players under profiles that want them.
const COST_CONTROL_BONUS: f64 = 5.0;
/// Jitter standard deviation per unit of randomness, in composite points.
const JITTER_SCALE: f64 = 10.0;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Competitiveness {
    Contend,
    #[default]
    Compete,
    Rebuild,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Budget {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchetypeGenerationOptions {
    pub archetype: Option<Archetype>,
    pub competitiveness: Competitiveness,
    pub budget: Budget,
    /// Candidates considered per slot before tier adjustments.
    pub candidate_pool_size: usize,
    /// Sample gates for stat-driven archetype fits.
    pub thresholds: SampleThresholds,
}

impl Default for ArchetypeGenerationOptions {
    fn default() -> Self {
        ArchetypeGenerationOptions {
            archetype: None,
            competitiveness: Competitiveness::Compete,
            budget: Budget::Medium,
            candidate_pool_size: 10,
            thresholds: SampleThresholds::default(),
        }
    }
}

impl ArchetypeGenerationOptions {
    /// Rebuilding or cheap teams look deeper; contenders look shallower.
    pub fn effective_pool_size(&self) -> usize {
        let mut size = self.candidate_pool_size as f64;
        if self.competitiveness == Competitiveness::Rebuild || self.budget == Budget::Low {
            size *= 1.5;
        }
        if self.competitiveness == Competitiveness::Contend {
            size *= 0.8;
        }
        (size.round() as usize).max(1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhilosophyGenerationOptions {
    /// Jitter strength; 0 makes generation deterministic.
    pub randomness: f64,
}

impl Default for PhilosophyGenerationOptions {
    fn default() -> Self {
        PhilosophyGenerationOptions { randomness: 0.3 }
    }
}

/// Which generator `Roster::auto_generate` should run.
#[derive(Debug, Clone, Copy)]
pub enum GenerationStrategy<'a> {
    Archetype(ArchetypeGenerationOptions),
    Philosophy {
        profile: &'a PhilosophyProfile,
        options: PhilosophyGenerationOptions,
    },
}

/// A generated roster and how it went.
#[derive(Debug, Clone)]
pub struct GeneratedRoster {
    pub roster: Roster,
    /// Slots no eligible candidate could fill.
    pub unfilled: Vec<SlotId>,
    /// Mean unjittered composite of the rostered players (philosophy mode) or
    /// mean selection fit (archetype mode).
    pub mean_score: f64,
}

// ---------------------------------------------------------------------------
// Archetype-driven weighted random
// ---------------------------------------------------------------------------

fn competitiveness_factor(player: &Player, competitiveness: Competitiveness) -> f64 {
    match competitiveness {
        Competitiveness::Contend => 0.5 + player.ovr.fraction() * 1.5,
        Competitiveness::Compete => 0.75 + player.ovr.fraction(),
        Competitiveness::Rebuild => {
            let age = match player.age {
                Some(a) if a <= 25 => 1.5,
                Some(a) if a <= 28 => 1.0,
                Some(_) => 0.5,
                None => 1.0,
            };
            age * (0.5 + player.pot.fraction())
        }
    }
}

fn salary_factor(player: &Player, budget: Budget) -> f64 {
    let salary = player.salary();
    match budget {
        Budget::Low => match salary {
            s if s <= 1.0 => 1.5,
            s if s <= 5.0 => 1.0,
            s if s <= 15.0 => 0.6,
            _ => 0.25,
        },
        Budget::Medium => match salary {
            s if s <= 15.0 => 1.0,
            s if s <= 25.0 => 0.8,
            _ => 0.5,
        },
        Budget::High => 1.0,
    }
}

fn archetype_factor(player: &Player, options: &ArchetypeGenerationOptions) -> f64 {
    match options.archetype {
        Some(a) => {
            let fit = calculate_archetype_fit(player, a, None, &options.thresholds);
            0.25 + fit / 100.0 * 1.75
        }
        None => 1.0,
    }
}

/// Selection weight for one candidate; never below `MIN_WEIGHT`.
pub fn candidate_weight(player: &Player, options: &ArchetypeGenerationOptions) -> f64 {
    let w = competitiveness_factor(player, options.competitiveness)
        * salary_factor(player, options.budget)
        * archetype_factor(player, options);
    if w.is_finite() {
        w.max(MIN_WEIGHT)
    } else {
        MIN_WEIGHT
    }
}

fn candidate_order(a: &Player, b: &Player, options: &ArchetypeGenerationOptions) -> Ordering {
    if options.competitiveness == Competitiveness::Rebuild {
        let age = |p: &Player| p.age.unwrap_or(u32::MAX);
        age(a)
            .cmp(&age(b))
            .then_with(|| b.pot.scouting_value().total_cmp(&a.pot.scouting_value()))
    } else if options.budget == Budget::Low {
        a.salary()
            .total_cmp(&b.salary())
            .then_with(|| b.ovr.scouting_value().total_cmp(&a.ovr.scouting_value()))
    } else {
        b.ovr
            .scouting_value()
            .total_cmp(&a.ovr.scouting_value())
            .then_with(|| b.war().total_cmp(&a.war()))
    }
}

/// Fill a roster by weighted random draws.
pub fn generate_archetype_roster(
    pool: &[Player],
    layout: RosterLayout,
    options: &ArchetypeGenerationOptions,
    rng: &mut impl Rng,
) -> GeneratedRoster {
    let mut roster = Roster::new(layout);
    let mut used: HashSet<&str> = HashSet::new();
    let mut unfilled = Vec::new();
    let mut fit_total = 0.0;
    let pool_size = options.effective_pool_size();

    for slot in roster.fill_order() {
        let mut candidates: Vec<&Player> = pool
            .iter()
            .filter(|p| !used.contains(p.name.as_str()) && slot.accepts(p))
            .collect();
        if candidates.is_empty() {
            debug!("{}: no eligible candidates", slot);
            unfilled.push(slot);
            continue;
        }

        candidates.sort_by(|a, b| candidate_order(a, b, options));
        candidates.truncate(pool_size);

        let weights: Vec<f64> = candidates
            .iter()
            .map(|p| candidate_weight(p, options))
            .collect();
        let pick = match WeightedIndex::new(&weights) {
            Ok(dist) => dist.sample(&mut *rng),
            Err(_) => 0,
        };
        let chosen = candidates[pick];

        debug!(
            "{}: drew {} ({} candidates, weight {:.2})",
            slot,
            chosen.name,
            candidates.len(),
            weights[pick]
        );
        fit_total += match options.archetype {
            Some(a) => calculate_archetype_fit(chosen, a, None, &options.thresholds),
            None => chosen.ovr.percent(),
        };
        used.insert(chosen.name.as_str());
        roster.place(slot, chosen.clone());
    }

    let filled = roster.filled_count();
    let mean_score = if filled > 0 { fit_total / filled as f64 } else { 0.0 };
    info!(
        "Archetype generation filled {}/{} slots",
        filled,
        roster.capacity()
    );

    GeneratedRoster {
        roster,
        unfilled,
        mean_score,
    }
}

// ---------------------------------------------------------------------------
// Philosophy-driven greedy
// ---------------------------------------------------------------------------

struct Scored<'a> {
    player: &'a Player,
    composite: f64,
    selection: f64,
}

/// Fill a roster greedily by composite score.
///
/// Each admitted player is scored once per call; jitter is drawn per player,
/// not per slot.
pub fn generate_philosophy_roster(
    pool: &[Player],
    layout: RosterLayout,
    profile: &PhilosophyProfile,
    options: &PhilosophyGenerationOptions,
    ctx: &ScoringContext,
    rng: &mut impl Rng,
) -> GeneratedRoster {
    let constraints = &profile.constraints;
    let randomness = options.randomness.max(0.0);

    let scored: Vec<Scored> = pool
        .iter()
        .filter(|p| constraints.admits(p))
        .map(|p| {
            let composite = composite_score(p, profile, ctx).total;
            let bonus = if constraints.prefer_cost_controlled && p.is_cost_controlled() {
                COST_CONTROL_BONUS
            } else {
                0.0
            };
            let jitter = if randomness > 0.0 {
                let z: f64 = StandardNormal.sample(&mut *rng);
                randomness * JITTER_SCALE * z
            } else {
                0.0
            };
            Scored {
                player: p,
                composite,
                selection: composite + bonus + jitter,
            }
        })
        .collect();

    let rejected = pool.len() - scored.len();
    if rejected > 0 {
        debug!("{} players fail '{}' constraints", rejected, profile.key);
    }

    let mut roster = Roster::new(layout);
    let mut used: HashSet<&str> = HashSet::new();
    let mut unfilled = Vec::new();
    let mut composite_total = 0.0;

    for slot in roster.fill_order() {
        let best = scored
            .iter()
            .filter(|s| !used.contains(s.player.name.as_str()) && slot.accepts(s.player))
            .fold(None::<&Scored>, |best, s| match best {
                Some(b) if b.selection >= s.selection => Some(b),
                _ => Some(s),
            });

        match best {
            Some(s) => {
                debug!("{}: {} ({:.1})", slot, s.player.name, s.selection);
                used.insert(s.player.name.as_str());
                composite_total += s.composite;
                roster.place(slot, s.player.clone());
            }
            None => {
                debug!("{}: no eligible candidates", slot);
                unfilled.push(slot);
            }
        }
    }

    let filled = roster.filled_count();
    let mean_score = if filled > 0 {
        composite_total / filled as f64
    } else {
        0.0
    };

    GeneratedRoster {
        roster,
        unfilled,
        mean_score,
    }
}

/// Run the greedy generator `trials` times and return every roster, best
/// mean composite first.
pub fn generate_alternates(
    pool: &[Player],
    layout: RosterLayout,
    profile: &PhilosophyProfile,
    options: &PhilosophyGenerationOptions,
    ctx: &ScoringContext,
    trials: usize,
    rng: &mut impl Rng,
) -> Vec<GeneratedRoster> {
    let mut results: Vec<GeneratedRoster> = (0..trials)
        .map(|_| generate_philosophy_roster(pool, layout, profile, options, ctx, &mut *rng))
        .collect();
    results.sort_by(|a, b| b.mean_score.total_cmp(&a.mean_score));
    info!(
        "Generated {} alternates under '{}'; best mean composite {:.1}",
        results.len(),
        profile.key,
        results.first().map_or(0.0, |r| r.mean_score)
    );
    results
}

impl Roster {
    /// Replace this roster's assignments with a generated roster of the same
    /// layout. Returns the slots left empty.
    pub fn auto_generate(
        &mut self,
        pool: &[Player],
        strategy: &GenerationStrategy<'_>,
        ctx: &ScoringContext,
        rng: &mut impl Rng,
    ) -> Vec<SlotId> {
        let layout = self.layout();
        let generated = match strategy {
            GenerationStrategy::Archetype(options) => {
                generate_archetype_roster(pool, layout, options, rng)
            }
            GenerationStrategy::Philosophy { profile, options } => {
                generate_philosophy_roster(pool, layout, profile, options, ctx, rng)
            }
        };
        *self = generated.roster;
        generated.unfilled
    }
}
