// Evaluation pass: attach computed scores to each player once.

use serde::Serialize;
use tracing::info;

use crate::archetype::{get_best_archetype, ArchetypeFit};
use crate::philosophy::PhilosophyProfile;
use crate::player::Player;
use crate::scoring::{composite_score, CompositeScore, ScoringContext};
use crate::trade_value::{calculate_trade_value, TradeValueResult};

/// Everything computed for a player in one evaluation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerScores {
    pub trade_value: TradeValueResult,
    pub best_archetype: Option<ArchetypeFit>,
    pub composite: CompositeScore,
}

pub fn score_player(
    player: &Player,
    profile: &PhilosophyProfile,
    ctx: &ScoringContext,
) -> PlayerScores {
    PlayerScores {
        trade_value: calculate_trade_value(player, &ctx.valuation),
        best_archetype: get_best_archetype(player, &ctx.thresholds),
        composite: composite_score(player, profile, ctx),
    }
}

/// Score every player in `players`, replacing any scores from an earlier
/// pass.
pub fn evaluate_pool(players: &mut [Player], profile: &PhilosophyProfile, ctx: &ScoringContext) {
    for player in players.iter_mut() {
        let scores = score_player(player, profile, ctx);
        player.scores = Some(scores);
    }
    info!(
        "Evaluated {} players under '{}' profile",
        players.len(),
        profile.key
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::philosophy::PhilosophyRegistry;
    use crate::position::Position;
    use crate::ratings::Rating;

    #[test]
    fn evaluate_pool_attaches_scores() {
        let reg = PhilosophyRegistry::default();
        let profile = reg.get("balanced").unwrap();
        let ctx = ScoringContext::default();
        let mut players = vec![
            Player::new("Bat", Position::SecondBase)
                .with_ratings(Rating::scouting(55.0), Rating::scouting(60.0)),
            Player::new("Arm", Position::ReliefPitcher)
                .with_ratings(Rating::scouting(50.0), Rating::scouting(50.0)),
        ];
        evaluate_pool(&mut players, profile, &ctx);

        for p in &players {
            let scores = p.scores.as_ref().unwrap();
            assert!((1..=100).contains(&scores.trade_value.trade_value));
            assert!(scores.best_archetype.is_some());
            assert_eq!(scores.composite, composite_score(p, profile, &ctx));
        }
    }

    #[test]
    fn re_evaluation_replaces_scores() {
        let reg = PhilosophyRegistry::default();
        let ctx = ScoringContext::default();
        let mut players = vec![Player::new("Kid", Position::ShortStop)
            .with_age(20)
            .with_ratings(Rating::scouting(40.0), Rating::scouting(75.0))];

        evaluate_pool(&mut players, reg.get("win_now").unwrap(), &ctx);
        let first = players[0].scores.as_ref().unwrap().composite.total;
        evaluate_pool(&mut players, reg.get("development").unwrap(), &ctx);
        let second = players[0].scores.as_ref().unwrap().composite.total;
        assert!(second > first);
    }
}
