//! Standings rows and the tie-break cascade that orders them.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::aggregator::TeamCounters;
use crate::tournament::{Team, TeamId};

/// Points awarded for a win
pub const POINTS_PER_WIN: u32 = 3;

/// Points awarded for a draw
pub const POINTS_PER_DRAW: u32 = 1;

/// One ranked line of the standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team_id: TeamId,
    pub team_name: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: i64,
    pub goals_against: i64,
    pub goal_difference: i64,
    pub points: u32,
}

impl StandingsRow {
    /// Derive points and goal difference from raw counters
    pub fn from_counters(team: &Team, counters: &TeamCounters) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            played: counters.played,
            won: counters.won,
            drawn: counters.drawn,
            lost: counters.lost,
            goals_for: counters.goals_for,
            goals_against: counters.goals_against,
            goal_difference: counters.goals_for - counters.goals_against,
            points: counters.won * POINTS_PER_WIN + counters.drawn * POINTS_PER_DRAW,
        }
    }
}

/// Tie-break cascade: points, goal difference and goals for (all descending),
/// then team name ascending. Team id settles rows that share a name.
pub fn compare_rows(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.goal_difference.cmp(&a.goal_difference))
        .then_with(|| b.goals_for.cmp(&a.goals_for))
        .then_with(|| a.team_name.cmp(&b.team_name))
        .then_with(|| a.team_id.cmp(&b.team_id))
}

/// Turns aggregated counters into an ordered standings table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandingsCalculator;

impl StandingsCalculator {
    /// One row per team in `teams`; teams missing from `counters` get zeroes.
    pub fn calculate(
        &self,
        teams: &[Team],
        counters: &HashMap<TeamId, TeamCounters>,
    ) -> Vec<StandingsRow> {
        let mut rows: Vec<StandingsRow> = teams
            .iter()
            .map(|team| {
                let team_counters = counters.get(&team.id).copied().unwrap_or_default();
                StandingsRow::from_counters(team, &team_counters)
            })
            .collect();

        rows.sort_by(compare_rows);
        rows
    }
}
