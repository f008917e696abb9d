// End-to-end tests for the evaluation core.
//
// Raw records go through conversion, evaluation, both roster generators,
// export/import and summary using only the public API.

use std::collections::HashSet;

use dugout_baseball::archetype::{calculate_fit_by_key, Archetype};
use dugout_baseball::evaluation::evaluate_pool;
use dugout_baseball::generation::{
    generate_alternates, generate_archetype_roster, ArchetypeGenerationOptions, Budget,
    Competitiveness, GenerationStrategy, PhilosophyGenerationOptions,
};
use dugout_baseball::philosophy::PhilosophyRegistry;
use dugout_baseball::player::{ConversionOptions, Player, PlayerType};
use dugout_baseball::ratings::SampleThresholds;
use dugout_baseball::record::{RawRecord, RawValue};
use dugout_baseball::roster::{Roster, RosterLayout, RosterState, SlotKind};
use dugout_baseball::scoring::ScoringContext;
use dugout_baseball::trade_value::{calculate_trade_value, Tier, ValuationSettings};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ===========================================================================
// Test helpers
// ===========================================================================

fn record(fields: &[(&str, RawValue)]) -> RawRecord {
    fields
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect()
}

fn convert(rec: &RawRecord) -> Player {
    Player::from_record(rec, &ConversionOptions::default())
        .expect("record should convert")
        .player
}

/// A deterministic mixed pool: three players per lineup position, twelve
/// starters, twelve relievers. Ratings and contracts vary with the index.
fn league_pool() -> Vec<Player> {
    let mut records = Vec::new();
    let codes = ["C", "1B", "2B", "3B", "SS", "LF", "CF", "RF", "DH"];
    for (i, code) in codes.iter().enumerate() {
        for j in 0..3 {
            let n = i * 3 + j;
            records.push(record(&[
                ("Name", format!("Bat {code}{j}").into()),
                ("POS", (*code).into()),
                ("Age", RawValue::Number(21.0 + (n % 14) as f64)),
                ("OVR", RawValue::Number(35.0 + (n * 7 % 40) as f64)),
                ("POT", RawValue::Number(45.0 + (n * 5 % 35) as f64)),
                ("POW", RawValue::Number(20.0 + (n * 11 % 60) as f64)),
                ("CON", RawValue::Number(20.0 + (n * 13 % 60) as f64)),
                ("EYE", RawValue::Number(20.0 + (n * 17 % 60) as f64)),
                ("SPE", format!("{} Stars", 1 + n % 5).into()),
                ("G", RawValue::Number(((n * 37) % 160) as f64)),
                ("OBP", RawValue::Number(0.280 + (n % 10) as f64 * 0.012)),
                ("SLG", RawValue::Number(0.350 + (n % 10) as f64 * 0.02)),
                ("WAR", RawValue::Number((n % 7) as f64 * 0.8 - 0.5)),
                ("SLR", format!("${},000", 500 + n * 900).into()),
                ("YL", if n % 3 == 0 { "1 (auto.)".into() } else { format!("{}", 1 + n % 5).into() }),
            ]));
        }
    }
    for (code, count) in [("SP", 12), ("RP", 12)] {
        for j in 0..count {
            records.push(record(&[
                ("Name", format!("Arm {code}{j}").into()),
                ("POS", code.into()),
                ("Age", RawValue::Number(22.0 + (j % 13) as f64)),
                ("OVR", RawValue::Number(40.0 + (j * 3 % 35) as f64)),
                ("POT", RawValue::Number(50.0 + (j * 4 % 30) as f64)),
                ("STU", RawValue::Number(30.0 + (j * 9 % 50) as f64)),
                ("MOV", RawValue::Number(30.0 + (j * 7 % 50) as f64)),
                ("CON", RawValue::Number(30.0 + (j * 5 % 50) as f64)),
                ("IP", RawValue::Number((j * 23 % 200) as f64)),
                ("ERA", RawValue::Number(2.8 + (j % 6) as f64 * 0.4)),
                ("WAR (Pitcher)", RawValue::Number((j % 5) as f64 * 0.9)),
                ("SLR", RawValue::Number(600_000.0 + j as f64 * 1_500_000.0)),
                ("YL", if j % 4 == 0 { "3 (arbitration)".into() } else { "2".into() }),
            ]));
        }
    }
    records.iter().map(convert).collect()
}

fn assert_exclusive(roster: &Roster) {
    let mut seen = HashSet::new();
    for p in roster.players() {
        assert!(seen.insert(p.name.clone()), "{} appears twice", p.name);
    }
}

fn assert_within_capacity(roster: &Roster) {
    let layout = roster.layout();
    for kind in [SlotKind::Lineup, SlotKind::Bench, SlotKind::Rotation, SlotKind::Bullpen] {
        assert!(roster.filled_count_of(kind) <= layout.capacity_of(kind));
    }
}

// ===========================================================================
// Scenarios
// ===========================================================================

#[test]
fn cheap_pre_arb_pitcher_outvalues_expensive_veteran() {
    let a = convert(&record(&[
        ("Name", "Pitcher A".into()),
        ("POS", "SP".into()),
        ("OVR", RawValue::Number(70.0)),
        ("YL", "1 (auto.)".into()),
        ("SLR", "$800,000".into()),
        ("WAR (Pitcher)", RawValue::Number(3.0)),
    ]));
    let b = convert(&record(&[
        ("Name", "Pitcher B".into()),
        ("POS", "SP".into()),
        ("OVR", RawValue::Number(55.0)),
        ("YL", RawValue::Number(5.0)),
        ("SLR", "$20,000,000".into()),
        ("WAR (Pitcher)", RawValue::Number(1.0)),
    ]));

    let settings = ValuationSettings::default();
    let va = calculate_trade_value(&a, &settings);
    let vb = calculate_trade_value(&b, &settings);
    assert!(va.trade_value > vb.trade_value);
    assert!(va.tier > vb.tier);
}

#[test]
fn every_pool_player_has_bounded_trade_value() {
    let settings = ValuationSettings::default();
    for p in league_pool() {
        let v = calculate_trade_value(&p, &settings);
        assert!((1..=100).contains(&v.trade_value), "{}: {}", p.name, v.trade_value);
        assert_eq!(v.tier, Tier::from_value(v.trade_value));
    }
}

#[test]
fn mashers_never_fit_a_pitcher() {
    for p in league_pool() {
        assert_eq!(
            calculate_fit_by_key(
                &p,
                "mashers",
                Some(PlayerType::Pitcher),
                &SampleThresholds::default()
            ),
            0.0
        );
    }
}

// ===========================================================================
// Generation
// ===========================================================================

#[test]
fn archetype_generation_fills_and_respects_capacity() {
    let pool = league_pool();
    let layout = RosterLayout::default();
    for (competitiveness, budget) in [
        (Competitiveness::Contend, Budget::High),
        (Competitiveness::Compete, Budget::Medium),
        (Competitiveness::Rebuild, Budget::Low),
    ] {
        let options = ArchetypeGenerationOptions {
            archetype: Some(Archetype::Mashers),
            competitiveness,
            budget,
            ..ArchetypeGenerationOptions::default()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let out = generate_archetype_roster(&pool, layout, &options, &mut rng);

        assert_exclusive(&out.roster);
        assert_within_capacity(&out.roster);
        assert_eq!(out.roster.filled_count_of(SlotKind::Lineup), 9);
        assert_eq!(out.roster.filled_count_of(SlotKind::Rotation), 5);
        assert_eq!(out.roster.filled_count_of(SlotKind::Bullpen), 8);
        assert_eq!(out.roster.state(), RosterState::Filled);
        assert!(out.unfilled.is_empty());
    }
}

#[test]
fn same_seed_same_roster() {
    let pool = league_pool();
    let options = ArchetypeGenerationOptions::default();
    let run = |seed| {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate_archetype_roster(&pool, RosterLayout::default(), &options, &mut rng)
            .roster
            .export()
    };
    assert_eq!(run(99), run(99));
}

#[test]
fn philosophy_alternates_are_valid_and_sorted() {
    let pool = league_pool();
    let registry = PhilosophyRegistry::default();
    let ctx = ScoringContext::default();
    for key in registry.keys() {
        let profile = registry.get(key).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let alts = generate_alternates(
            &pool,
            RosterLayout::default(),
            profile,
            &PhilosophyGenerationOptions { randomness: 0.5 },
            &ctx,
            3,
            &mut rng,
        );
        assert_eq!(alts.len(), 3);
        assert!(alts.windows(2).all(|w| w[0].mean_score >= w[1].mean_score));
        for alt in &alts {
            assert_exclusive(&alt.roster);
            assert_within_capacity(&alt.roster);
            for p in alt.roster.players() {
                assert!(profile.constraints.admits(p), "{key} admitted {}", p.name);
            }
        }
    }
}

#[test]
fn tiny_pool_terminates_with_unfilled_slots() {
    let pool: Vec<Player> = league_pool().into_iter().take(4).collect();
    let registry = PhilosophyRegistry::default();
    let mut roster = Roster::default();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let unfilled = roster.auto_generate(
        &pool,
        &GenerationStrategy::Philosophy {
            profile: registry.get("balanced").unwrap(),
            options: PhilosophyGenerationOptions::default(),
        },
        &ScoringContext::default(),
        &mut rng,
    );
    assert_eq!(roster.filled_count() + unfilled.len(), roster.capacity());
    assert_eq!(roster.state(), RosterState::PartiallyFilled);
}

// ===========================================================================
// Export / import and summary
// ===========================================================================

#[test]
fn generated_roster_round_trips_through_json() {
    let pool = league_pool();
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let out = generate_archetype_roster(
        &pool,
        RosterLayout::default(),
        &ArchetypeGenerationOptions::default(),
        &mut rng,
    );
    let exported = out.roster.export();
    let json = serde_json::to_string_pretty(&exported).unwrap();
    let parsed = serde_json::from_str(&json).unwrap();
    let rebuilt = Roster::import(&parsed, &pool, RosterLayout::default());

    assert_eq!(rebuilt.export(), exported);
    for (slot, player) in out.roster.assignments() {
        assert_eq!(rebuilt.get(slot).map(|p| p.name.as_str()), Some(player.name.as_str()));
    }
}

#[test]
fn summary_uses_evaluated_scores() {
    let mut pool = league_pool();
    let registry = PhilosophyRegistry::default();
    let ctx = ScoringContext::default();
    evaluate_pool(&mut pool, registry.get("balanced").unwrap(), &ctx);

    let mut rng = ChaCha8Rng::seed_from_u64(17);
    let out = generate_archetype_roster(
        &pool,
        RosterLayout::default(),
        &ArchetypeGenerationOptions::default(),
        &mut rng,
    );
    let summary = out.roster.summary(&SampleThresholds::default());
    assert_eq!(summary.player_count, out.roster.filled_count());
    assert!(summary.average_ovr >= 20.0 && summary.average_ovr <= 80.0);
    assert!(!summary.position_grades.is_empty());

    let mut cleared = out.roster.clone();
    cleared.clear();
    let empty = cleared.summary(&SampleThresholds::default());
    assert_eq!(empty.player_count, 0);
    assert_eq!(empty.total_war, 0.0);
    assert!(empty.archetype_fit.is_none());
}
