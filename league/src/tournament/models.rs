//! Tournament, team, player and match models as read from the store.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tournament ID type
pub type TournamentId = i64;

/// Team ID type
pub type TeamId = i64;

/// Match ID type
pub type MatchId = i64;

/// Lifecycle status shared by tournaments and matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// Not started yet
    Scheduled,
    /// Currently being played
    InProgress,
    /// Completed; scores are final
    Finished,
}

impl Status {
    /// Canonical lowercase label
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Scheduled => "scheduled",
            Status::InProgress => "in_progress",
            Status::Finished => "finished",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    /// Accepts the canonical labels and the legacy Spanish ones still present
    /// in older rows.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scheduled" | "programado" => Ok(Status::Scheduled),
            "in_progress" | "en_curso" => Ok(Status::InProgress),
            "finished" | "finalizado" => Ok(Status::Finished),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Tournament header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub discipline: String,
    pub season: Option<String>,
    pub status: Status,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub organizer_id: Option<i64>,
}

impl Tournament {
    /// `"<discipline> - <season>"`, the subtitle used by most reports
    pub fn discipline_and_season(&self) -> String {
        format!(
            "{} - {}",
            self.discipline,
            self.season.as_deref().unwrap_or_default()
        )
    }
}

/// Team registered to a tournament
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub color: Option<String>,
    pub tournament_id: TournamentId,
    pub representative: Option<String>,
    pub representative_phone: Option<String>,
}

/// Team with its aggregated player count, for team listings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamSummary {
    pub team: Team,
    pub player_count: i64,
}

/// Team together with the name of the tournament it plays in
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team: Team,
    pub tournament_name: String,
}

/// Player on a team roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: Option<NaiveDate>,
    pub shirt_number: i32,
    pub position: Option<String>,
    pub team_id: TeamId,
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Age in whole years on the given date
    pub fn age_on(&self, on: NaiveDate) -> Option<i32> {
        let birth = self.birth_date?;
        let mut age = on.year() - birth.year();
        if (on.month(), on.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        Some(age)
    }
}

/// A scheduled or played match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub scheduled_at: DateTime<Utc>,
    pub venue: Option<String>,
    pub status: Status,
    pub home_score: Option<i32>,
    pub away_score: Option<i32>,
    pub notes: Option<String>,
}

impl Match {
    /// Final score, only when the match is finished and both scores are set
    pub fn final_score(&self) -> Option<(i32, i32)> {
        match (self.status, self.home_score, self.away_score) {
            (Status::Finished, Some(home), Some(away)) => Some((home, away)),
            _ => None,
        }
    }

    /// `"home - away"` when finished, otherwise the uppercased status
    pub fn result_label(&self) -> String {
        match self.final_score() {
            Some((home, away)) => format!("{home} - {away}"),
            None => self.status.as_str().to_uppercase(),
        }
    }
}

/// Match joined with the display names of both teams
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixtureEntry {
    #[serde(flatten)]
    pub game: Match,
    pub home_team_name: String,
    pub away_team_name: String,
}
