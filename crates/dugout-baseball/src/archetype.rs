// Archetype fit engine.
//
// Each archetype is a point-budget rubric over normalized ratings and a few
// derived metrics. Rubric budgets add up to 100, so every fit lands in
// 0-100. Archetypes declare which player types they apply to; anything else
// scores zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contract::ContractStatus;
use crate::player::{Player, PlayerType};
use crate::ratings::{band, Rating, SampleThresholds, SCOUTING_MAX, SCOUTING_MIN};

/// Fits at or above this count as a real match for roster summaries.
pub const STRONG_FIT: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Mashers,
    SpeedDefense,
    OnBase,
    YouthMovement,
    WinNow,
    ValueContracts,
    Balanced,
    PowerArms,
    ControlArtists,
}

impl Archetype {
    /// Every archetype, in tie-break order.
    pub const ALL: [Archetype; 9] = [
        Archetype::Mashers,
        Archetype::SpeedDefense,
        Archetype::OnBase,
        Archetype::YouthMovement,
        Archetype::WinNow,
        Archetype::ValueContracts,
        Archetype::Balanced,
        Archetype::PowerArms,
        Archetype::ControlArtists,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Archetype::Mashers => "mashers",
            Archetype::SpeedDefense => "speed_defense",
            Archetype::OnBase => "on_base",
            Archetype::YouthMovement => "youth_movement",
            Archetype::WinNow => "win_now",
            Archetype::ValueContracts => "value_contracts",
            Archetype::Balanced => "balanced",
            Archetype::PowerArms => "power_arms",
            Archetype::ControlArtists => "control_artists",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        let k = key.trim().to_lowercase();
        Archetype::ALL.into_iter().find(|a| a.key() == k)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Archetype::Mashers => "Mashers",
            Archetype::SpeedDefense => "Speed & Defense",
            Archetype::OnBase => "On-Base Machines",
            Archetype::YouthMovement => "Youth Movement",
            Archetype::WinNow => "Win Now",
            Archetype::ValueContracts => "Value Contracts",
            Archetype::Balanced => "Balanced",
            Archetype::PowerArms => "Power Arms",
            Archetype::ControlArtists => "Control Artists",
        }
    }

    pub fn supports(&self, player_type: PlayerType) -> bool {
        match self {
            Archetype::Mashers | Archetype::SpeedDefense | Archetype::OnBase => {
                player_type == PlayerType::Batter
            }
            Archetype::PowerArms | Archetype::ControlArtists => {
                player_type == PlayerType::Pitcher
            }
            Archetype::YouthMovement
            | Archetype::WinNow
            | Archetype::ValueContracts
            | Archetype::Balanced => true,
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One player's fit against one archetype.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArchetypeFit {
    pub archetype: Archetype,
    pub score: f64,
    pub label: &'static str,
}

// ---------------------------------------------------------------------------
// Public operations
// ---------------------------------------------------------------------------

/// Score `player` against `archetype`.
///
/// `player_type` overrides the type derived from the player; pass `None` to
/// use the player's own. Unsupported pairings score 0. Stat lines only count
/// once the player clears `thresholds`.
pub fn calculate_archetype_fit(
    player: &Player,
    archetype: Archetype,
    player_type: Option<PlayerType>,
    thresholds: &SampleThresholds,
) -> f64 {
    let kind = player_type.unwrap_or_else(|| player.player_type());
    if !archetype.supports(kind) {
        return 0.0;
    }

    let score = match archetype {
        Archetype::Mashers => mashers(player),
        Archetype::SpeedDefense => speed_defense(player),
        Archetype::OnBase => on_base(player, thresholds),
        Archetype::YouthMovement => youth_movement(player),
        Archetype::WinNow => win_now(player),
        Archetype::ValueContracts => value_contracts(player),
        Archetype::Balanced => balanced(player),
        Archetype::PowerArms => power_arms(player, thresholds),
        Archetype::ControlArtists => control_artists(player, thresholds),
    };
    score.clamp(0.0, 100.0)
}

/// Like [`calculate_archetype_fit`] but by key. Unknown keys score 0.
pub fn calculate_fit_by_key(
    player: &Player,
    key: &str,
    player_type: Option<PlayerType>,
    thresholds: &SampleThresholds,
) -> f64 {
    Archetype::from_key(key)
        .map(|a| calculate_archetype_fit(player, a, player_type, thresholds))
        .unwrap_or(0.0)
}

/// Fits for every archetype that supports this player's type.
pub fn all_fits(player: &Player, thresholds: &SampleThresholds) -> Vec<ArchetypeFit> {
    let kind = player.player_type();
    Archetype::ALL
        .into_iter()
        .filter(|a| a.supports(kind))
        .map(|a| ArchetypeFit {
            archetype: a,
            score: calculate_archetype_fit(player, a, Some(kind), thresholds),
            label: a.label(),
        })
        .collect()
}

/// The single highest-scoring supported archetype. Ties go to the earlier
/// archetype in [`Archetype::ALL`].
pub fn get_best_archetype(player: &Player, thresholds: &SampleThresholds) -> Option<ArchetypeFit> {
    all_fits(player, thresholds).into_iter().fold(None, |best, fit| match best {
        Some(b) if b.score >= fit.score => Some(b),
        _ => Some(fit),
    })
}

/// Players in `pool` fitting `archetype` at `min_score` or better, best first.
pub fn find_players_by_archetype<'a>(
    pool: &'a [Player],
    archetype: Archetype,
    min_score: f64,
    thresholds: &SampleThresholds,
) -> Vec<(&'a Player, f64)> {
    let mut matches: Vec<(&Player, f64)> = pool
        .iter()
        .map(|p| (p, calculate_archetype_fit(p, archetype, None, thresholds)))
        .filter(|(p, score)| archetype.supports(p.player_type()) && *score >= min_score)
        .collect();
    matches.sort_by(|a, b| b.1.total_cmp(&a.1));
    matches
}

// ---------------------------------------------------------------------------
// Rubrics
// ---------------------------------------------------------------------------

fn frac(r: Rating) -> f64 {
    r.fraction()
}

fn defense_fraction(player: &Player) -> f64 {
    player
        .batter()
        .map(|b| {
            (b.defense.average_for(player.position) - SCOUTING_MIN) / (SCOUTING_MAX - SCOUTING_MIN)
        })
        .unwrap_or(0.0)
}

fn mashers(player: &Player) -> f64 {
    let Some(b) = player.batter() else { return 0.0 };
    let r = &b.ratings;
    50.0 * frac(r.power) + 20.0 * frac(r.gap) + 10.0 * frac(r.contact) + 20.0 * frac(player.ovr)
}

fn speed_defense(player: &Player) -> f64 {
    let Some(b) = player.batter() else { return 0.0 };
    let r = &b.ratings;
    30.0 * frac(r.speed)
        + 15.0 * frac(r.steal)
        + 40.0 * defense_fraction(player)
        + 15.0 * frac(player.ovr)
}

fn on_base(player: &Player, thresholds: &SampleThresholds) -> f64 {
    let Some(b) = player.batter() else { return 0.0 };
    let r = &b.ratings;
    let obp = if player.has_sufficient_sample(thresholds) && b.stats.obp > 0.0 {
        band(b.stats.obp, 0.290, 0.400)
    } else {
        frac(r.eye)
    };
    40.0 * frac(r.eye) + 25.0 * frac(r.contact) + 15.0 * frac(r.avoid_k) + 20.0 * obp
}

fn youth_movement(player: &Player) -> f64 {
    let age_points = match player.age {
        Some(a) if a <= 21 => 35.0,
        Some(22..=23) => 28.0,
        Some(24..=25) => 18.0,
        Some(26..=27) => 8.0,
        Some(_) => 0.0,
        None => 10.0,
    };
    let upside = (player.upside_gap() / 20.0).clamp(0.0, 1.0);
    age_points + 40.0 * frac(player.pot) + 25.0 * upside
}

fn win_now(player: &Player) -> f64 {
    let prime = match player.age {
        Some(27..=31) => 20.0,
        Some(25..=26) | Some(32..=33) => 10.0,
        _ => 0.0,
    };
    let war = (player.war() / 6.0).clamp(0.0, 1.0);
    50.0 * frac(player.ovr) + 30.0 * war + prime
}

fn value_contracts(player: &Player) -> f64 {
    let status = match player.contract_status() {
        ContractStatus::PreArb => 35.0,
        ContractStatus::Arbitration => 25.0,
        ContractStatus::Signed => 10.0,
        ContractStatus::Expiring | ContractStatus::Unknown => 5.0,
    };
    let aav = player.contract.aav();
    let cheapness = if aav <= 0.0 {
        0.5
    } else {
        1.0 - (aav / 25.0).clamp(0.0, 1.0)
    };
    let war_per_million = player.war() / player.salary().max(0.5);
    status + 35.0 * cheapness + 30.0 * (war_per_million / 2.0).clamp(0.0, 1.0)
}

fn balanced(player: &Player) -> f64 {
    let parts: Vec<f64> = match (player.batter(), player.pitcher()) {
        (Some(b), _) => {
            let r = &b.ratings;
            vec![
                frac(r.contact),
                frac(r.gap),
                frac(r.power),
                frac(r.eye),
                frac(r.avoid_k),
                frac(r.speed),
                defense_fraction(player),
            ]
        }
        (None, Some(p)) => {
            let r = &p.ratings;
            vec![frac(r.stuff), frac(r.movement), frac(r.control), frac(r.stamina)]
        }
        (None, None) => return 0.0,
    };

    let n = parts.len() as f64;
    let mean = parts.iter().sum::<f64>() / n;
    let variance = parts.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let consistency = 1.0 - (variance.sqrt() / 0.3).clamp(0.0, 1.0);

    40.0 * frac(player.ovr) + 40.0 * mean + 20.0 * consistency
}

fn power_arms(player: &Player, thresholds: &SampleThresholds) -> f64 {
    let Some(p) = player.pitcher() else { return 0.0 };
    let r = &p.ratings;
    let strikeouts = if player.has_sufficient_sample(thresholds) && p.stats.k_per_9 > 0.0 {
        band(p.stats.k_per_9, 6.0, 12.0)
    } else {
        frac(r.stuff)
    };
    50.0 * frac(r.stuff) + 15.0 * frac(r.movement) + 20.0 * strikeouts + 15.0 * frac(player.ovr)
}

fn control_artists(player: &Player, thresholds: &SampleThresholds) -> f64 {
    let Some(p) = player.pitcher() else { return 0.0 };
    let r = &p.ratings;
    // A missing BB/9 reads as 0.0, which would otherwise band as elite.
    let walks = if player.has_sufficient_sample(thresholds) && p.stats.bb_per_9 > 0.0 {
        band(p.stats.bb_per_9, 4.5, 1.5)
    } else {
        frac(r.control)
    };
    45.0 * frac(r.control) + 30.0 * frac(r.movement) + 15.0 * walks + 10.0 * frac(player.ovr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::{BatterProfile, ContractTerms, PlayerDetails};
    use crate::position::Position;
    use crate::ratings::YearsLeft;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn sample() -> SampleThresholds {
        SampleThresholds::default()
    }

    fn make_batter(name: &str, pos: Position, power: f64, speed: f64) -> Player {
        let mut p = Player::new(name, pos)
            .with_age(27)
            .with_ratings(Rating::scouting(60.0), Rating::scouting(65.0));
        if let PlayerDetails::Batter(BatterProfile { ratings, .. }) = &mut p.details {
            ratings.power = Rating::scouting(power);
            ratings.gap = Rating::scouting(power);
            ratings.speed = Rating::scouting(speed);
            ratings.steal = Rating::scouting(speed);
        }
        p
    }

    fn make_pitcher(name: &str, stuff: f64, control: f64) -> Player {
        let mut p = Player::new(name, Position::StartingPitcher)
            .with_ratings(Rating::scouting(55.0), Rating::scouting(60.0));
        if let PlayerDetails::Pitcher(profile) = &mut p.details {
            profile.ratings.stuff = Rating::scouting(stuff);
            profile.ratings.control = Rating::scouting(control);
            profile.ratings.movement = Rating::scouting(50.0);
        }
        p
    }

    #[test]
    fn unsupported_pairings_score_zero() {
        let slugger = make_batter("Slugger", Position::FirstBase, 80.0, 20.0);
        assert_eq!(
            calculate_archetype_fit(
                &slugger,
                Archetype::Mashers,
                Some(PlayerType::Pitcher),
                &sample()
            ),
            0.0
        );
        let arm = make_pitcher("Arm", 80.0, 50.0);
        assert_eq!(calculate_archetype_fit(&arm, Archetype::Mashers, None, &sample()), 0.0);
        assert_eq!(calculate_archetype_fit(&slugger, Archetype::PowerArms, None, &sample()), 0.0);
    }

    #[test]
    fn type_override_to_mismatched_profile_scores_zero() {
        let arm = make_pitcher("Arm", 80.0, 50.0);
        assert_eq!(
            calculate_archetype_fit(
                &arm,
                Archetype::Mashers,
                Some(PlayerType::Batter),
                &sample()
            ),
            0.0
        );
    }

    #[test]
    fn unknown_key_scores_zero() {
        let slugger = make_batter("Slugger", Position::FirstBase, 80.0, 20.0);
        assert_eq!(calculate_fit_by_key(&slugger, "small_ball", None, &sample()), 0.0);
        assert!(calculate_fit_by_key(&slugger, "MASHERS", None, &sample()) > 0.0);
    }

    #[test]
    fn fits_stay_in_range() {
        let players = [
            make_batter("A", Position::Catcher, 80.0, 80.0),
            make_batter("B", Position::DesignatedHitter, 20.0, 20.0),
            make_pitcher("C", 80.0, 80.0),
            make_pitcher("D", 20.0, 20.0),
        ];
        for p in &players {
            for a in Archetype::ALL {
                let s = calculate_archetype_fit(p, a, None, &sample());
                assert!((0.0..=100.0).contains(&s), "{} {a}: {s}", p.name);
            }
        }
    }

    #[test]
    fn mashers_rewards_power() {
        let slugger = make_batter("Slugger", Position::FirstBase, 80.0, 20.0);
        let slap = make_batter("Slap", Position::FirstBase, 30.0, 20.0);
        assert!(
            calculate_archetype_fit(&slugger, Archetype::Mashers, None, &sample())
                > calculate_archetype_fit(&slap, Archetype::Mashers, None, &sample())
        );
        // Power 80, gap 80, contact floor, OVR 60.
        assert!(approx_eq(
            calculate_archetype_fit(&slugger, Archetype::Mashers, None, &sample()),
            50.0 + 20.0 + 0.0 + 20.0 * (40.0 / 60.0),
            1e-9
        ));
    }

    #[test]
    fn all_fits_only_lists_supported_archetypes() {
        let batter = make_batter("Bat", Position::SecondBase, 50.0, 50.0);
        let fits = all_fits(&batter, &sample());
        assert_eq!(fits.len(), 7);
        assert!(fits.iter().all(|f| f.archetype != Archetype::PowerArms));

        let arm = make_pitcher("Arm", 60.0, 60.0);
        let fits = all_fits(&arm, &sample());
        assert_eq!(fits.len(), 6);
        assert!(fits.iter().all(|f| f.archetype != Archetype::OnBase));
    }

    #[test]
    fn best_archetype_for_power_pitcher() {
        let arm = make_pitcher("Heat", 80.0, 25.0);
        let best = get_best_archetype(&arm, &sample()).unwrap();
        assert_eq!(best.archetype, Archetype::PowerArms);
        assert_eq!(best.label, "Power Arms");
    }

    #[test]
    fn value_contracts_prefers_cheap_control() {
        let mut cheap = make_pitcher("Cheap", 50.0, 50.0).with_war(2.0);
        cheap.contract = ContractTerms {
            salary: 0.7,
            years_left: YearsLeft {
                years: 2,
                status: "pre-arb".into(),
            },
            ..ContractTerms::default()
        };
        let mut pricey = make_pitcher("Pricey", 50.0, 50.0).with_war(2.0);
        pricey.contract = ContractTerms {
            salary: 24.0,
            years_left: YearsLeft {
                years: 4,
                status: String::new(),
            },
            ..ContractTerms::default()
        };
        assert!(
            calculate_archetype_fit(&cheap, Archetype::ValueContracts, None, &sample())
                > calculate_archetype_fit(&pricey, Archetype::ValueContracts, None, &sample())
        );
    }

    #[test]
    fn find_players_filters_and_sorts() {
        let pool = vec![
            make_batter("Mid", Position::LeftField, 55.0, 20.0),
            make_batter("Top", Position::LeftField, 80.0, 20.0),
            make_batter("Low", Position::LeftField, 20.0, 20.0),
            make_pitcher("Arm", 80.0, 80.0),
        ];
        let found = find_players_by_archetype(&pool, Archetype::Mashers, 30.0, &sample());
        let names: Vec<&str> = found.iter().map(|(p, _)| p.name.as_str()).collect();
        assert_eq!(names, vec!["Top", "Mid"]);
        assert!(found[0].1 >= found[1].1);
    }

    #[test]
    fn keys_round_trip() {
        for a in Archetype::ALL {
            assert_eq!(Archetype::from_key(a.key()), Some(a));
        }
    }
    #[test]
    fn on_base_stats_respect_configured_sample() {
        let mut p = make_batter("Walker", Position::FirstBase, 50.0, 50.0);
        if let PlayerDetails::Batter(b) = &mut p.details {
            b.ratings.eye = Rating::scouting(40.0);
            b.stats.games = 100;
            b.stats.obp = 0.420;
        }
        let mut unproven = p.clone();
        if let PlayerDetails::Batter(b) = &mut unproven.details {
            b.stats.games = 0;
        }

        let lenient = calculate_archetype_fit(&p, Archetype::OnBase, None, &sample());
        let strict = SampleThresholds {
            min_batter_games: 200,
            ..sample()
        };
        let gated = calculate_archetype_fit(&p, Archetype::OnBase, None, &strict);

        // 100 games clears 40 but not 200; below the bar OBP falls back to eye.
        assert!(gated < lenient);
        assert!(approx_eq(
            gated,
            calculate_archetype_fit(&unproven, Archetype::OnBase, None, &sample()),
            1e-9
        ));
    }

    #[test]
    fn control_artist_without_walk_rate_uses_control() {
        let mut p = make_pitcher("Wild", 50.0, 20.0);
        if let PlayerDetails::Pitcher(profile) = &mut p.details {
            profile.stats.innings = 150.0;
            profile.stats.bb_per_9 = 0.0;
        }
        // Control at the floor contributes nothing; movement 50 and OVR 55 remain.
        let expected = 30.0 * 0.5 + 10.0 * (35.0 / 60.0);
        let fit = calculate_archetype_fit(&p, Archetype::ControlArtists, None, &sample());
        assert!(approx_eq(fit, expected, 1e-9), "got {fit}");

        if let PlayerDetails::Pitcher(profile) = &mut p.details {
            profile.stats.bb_per_9 = 2.0;
        }
        let fit = calculate_archetype_fit(&p, Archetype::ControlArtists, None, &sample());
        assert!(approx_eq(fit, expected + 15.0 * (2.5 / 3.0), 1e-9), "got {fit}");
    }
}
