//! Standings computation.
//!
//! Finished match results are folded into per-team counters by
//! [`MatchAggregator`], then [`StandingsCalculator`] derives points and goal
//! difference and orders the table:
//!
//! 1. points (3 per win, 1 per draw), descending
//! 2. goal difference, descending
//! 3. goals scored, descending
//! 4. team name, ascending
//!
//! ## Example
//!
//! ```
//! use league::standings::compute_standings;
//!
//! let rows = compute_standings(1, &[], &[]);
//! assert!(rows.is_empty());
//! ```

pub mod aggregator;
pub mod calculator;

pub use aggregator::{MatchAggregator, TeamCounters};
pub use calculator::{POINTS_PER_DRAW, POINTS_PER_WIN, StandingsCalculator, StandingsRow, compare_rows};

use crate::tournament::{Match, Team, TournamentId};

/// Aggregate and rank in one step.
pub fn compute_standings(
    tournament_id: TournamentId,
    teams: &[Team],
    matches: &[Match],
) -> Vec<StandingsRow> {
    let counters = MatchAggregator::new(tournament_id).aggregate(teams, matches);
    StandingsCalculator.calculate(teams, &counters)
}
