//! Folds finished match results into per-team counters.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::tournament::{Match, Team, TeamId, TournamentId};

/// Raw per-team counters accumulated from finished matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamCounters {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: i64,
    pub goals_against: i64,
}

impl TeamCounters {
    fn record(&mut self, scored: i32, conceded: i32) {
        self.played += 1;
        self.goals_for += i64::from(scored);
        self.goals_against += i64::from(conceded);
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => self.won += 1,
            std::cmp::Ordering::Equal => self.drawn += 1,
            std::cmp::Ordering::Less => self.lost += 1,
        }
    }
}

/// Aggregates match results for a single tournament.
#[derive(Debug, Clone, Copy)]
pub struct MatchAggregator {
    tournament_id: TournamentId,
}

impl MatchAggregator {
    pub fn new(tournament_id: TournamentId) -> Self {
        Self { tournament_id }
    }

    /// Build counters for every team, including teams without finished matches.
    ///
    /// Only finished matches with both scores recorded contribute. Matches that
    /// belong to another tournament or reference a team outside `teams` are
    /// skipped.
    pub fn aggregate(&self, teams: &[Team], matches: &[Match]) -> HashMap<TeamId, TeamCounters> {
        let mut counters: HashMap<TeamId, TeamCounters> = teams
            .iter()
            .map(|team| (team.id, TeamCounters::default()))
            .collect();

        for game in matches {
            if game.tournament_id != self.tournament_id {
                log::debug!(
                    "Skipping match {} from tournament {} while aggregating tournament {}",
                    game.id,
                    game.tournament_id,
                    self.tournament_id
                );
                continue;
            }

            let Some((home_score, away_score)) = game.final_score() else {
                continue;
            };

            if !counters.contains_key(&game.home_team_id)
                || !counters.contains_key(&game.away_team_id)
            {
                log::debug!(
                    "Skipping match {}: team {} or {} is not registered to tournament {}",
                    game.id,
                    game.home_team_id,
                    game.away_team_id,
                    self.tournament_id
                );
                continue;
            }

            if let Some(home) = counters.get_mut(&game.home_team_id) {
                home.record(home_score, away_score);
            }
            if let Some(away) = counters.get_mut(&game.away_team_id) {
                away.record(away_score, home_score);
            }
        }

        counters
    }
}
