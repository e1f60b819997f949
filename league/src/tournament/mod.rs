//! Tournament entities consumed by the standings and report pipeline.
//!
//! These are read-only views of rows owned by the entity layer:
//! - Tournament headers
//! - Teams, with player counts or their tournament name
//! - Players on a roster
//! - Matches, optionally joined with team names for fixtures

pub mod models;

pub use models::{
    FixtureEntry, Match, MatchId, Player, Status, Team, TeamId, TeamProfile, TeamSummary,
    Tournament, TournamentId, UnknownStatus,
};
