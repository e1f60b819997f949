//! In-memory [`ReportStore`] used by tests and demos.

use async_trait::async_trait;

use super::errors::StoreResult;
use super::repository::ReportStore;
use crate::tournament::{
    FixtureEntry, Match, Player, Team, TeamId, TeamProfile, TeamSummary, Tournament, TournamentId,
};

/// Report store backed by plain vectors.
///
/// Populated up front with the builder methods; read-only afterwards, so it
/// can be shared behind an `Arc` without locking.
///
/// ```
/// use league::db::MemoryStore;
///
/// let store = MemoryStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tournaments: Vec<Tournament>,
    teams: Vec<Team>,
    players: Vec<Player>,
    matches: Vec<Match>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tournament(mut self, tournament: Tournament) -> Self {
        self.tournaments.push(tournament);
        self
    }

    pub fn with_team(mut self, team: Team) -> Self {
        self.teams.push(team);
        self
    }

    pub fn with_player(mut self, player: Player) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_match(mut self, game: Match) -> Self {
        self.matches.push(game);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tournaments.is_empty()
            && self.teams.is_empty()
            && self.players.is_empty()
            && self.matches.is_empty()
    }

    fn team_name(&self, id: TeamId) -> Option<&str> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
    }

    fn sorted_teams(&self, tournament_id: TournamentId) -> Vec<Team> {
        let mut teams: Vec<Team> = self
            .teams
            .iter()
            .filter(|t| t.tournament_id == tournament_id)
            .cloned()
            .collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        teams
    }
}

#[async_trait]
impl ReportStore for MemoryStore {
    async fn find_tournament(&self, id: TournamentId) -> StoreResult<Option<Tournament>> {
        Ok(self.tournaments.iter().find(|t| t.id == id).cloned())
    }

    async fn find_team(&self, id: TeamId) -> StoreResult<Option<TeamProfile>> {
        let Some(team) = self.teams.iter().find(|t| t.id == id) else {
            return Ok(None);
        };

        // Mirrors the inner join on the tournament table
        Ok(self
            .tournaments
            .iter()
            .find(|t| t.id == team.tournament_id)
            .map(|tournament| TeamProfile {
                team: team.clone(),
                tournament_name: tournament.name.clone(),
            }))
    }

    async fn team_summaries(&self, tournament_id: TournamentId) -> StoreResult<Vec<TeamSummary>> {
        Ok(self
            .sorted_teams(tournament_id)
            .into_iter()
            .map(|team| {
                let player_count =
                    self.players.iter().filter(|p| p.team_id == team.id).count() as i64;
                TeamSummary { team, player_count }
            })
            .collect())
    }

    async fn teams(&self, tournament_id: TournamentId) -> StoreResult<Vec<Team>> {
        Ok(self.sorted_teams(tournament_id))
    }

    async fn players(&self, team_id: TeamId) -> StoreResult<Vec<Player>> {
        let mut players: Vec<Player> = self
            .players
            .iter()
            .filter(|p| p.team_id == team_id)
            .cloned()
            .collect();
        players.sort_by_key(|p| (p.shirt_number, p.id));
        Ok(players)
    }

    async fn fixture(&self, tournament_id: TournamentId) -> StoreResult<Vec<FixtureEntry>> {
        let mut matches: Vec<&Match> = self
            .matches
            .iter()
            .filter(|m| m.tournament_id == tournament_id)
            .collect();
        matches.sort_by_key(|m| (m.scheduled_at, m.id));

        Ok(matches
            .into_iter()
            .filter_map(|game| {
                Some(FixtureEntry {
                    home_team_name: self.team_name(game.home_team_id)?.to_string(),
                    away_team_name: self.team_name(game.away_team_id)?.to_string(),
                    game: game.clone(),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournament::Status;
    use chrono::{TimeZone, Utc};

    fn tournament(id: TournamentId) -> Tournament {
        Tournament {
            id,
            name: format!("Cup {id}"),
            discipline: "Football".to_string(),
            season: None,
            status: Status::InProgress,
            start_date: None,
            end_date: None,
            organizer_id: None,
        }
    }

    fn team(id: TeamId, tournament_id: TournamentId, name: &str) -> Team {
        Team {
            id,
            name: name.to_string(),
            color: None,
            tournament_id,
            representative: None,
            representative_phone: None,
        }
    }

    fn player(id: i64, team_id: TeamId, shirt_number: i32) -> Player {
        Player {
            id,
            first_name: "P".to_string(),
            last_name: id.to_string(),
            birth_date: None,
            shirt_number,
            position: None,
            team_id,
            registered_at: Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_team_summaries_count_players_and_sort_by_name() {
        let store = MemoryStore::new()
            .with_tournament(tournament(1))
            .with_team(team(1, 1, "Zorros"))
            .with_team(team(2, 1, "Halcones"))
            .with_team(team(3, 2, "Elsewhere"))
            .with_player(player(1, 1, 10))
            .with_player(player(2, 1, 4));

        let summaries = store.team_summaries(1).await.unwrap();
        let names: Vec<&str> = summaries.iter().map(|s| s.team.name.as_str()).collect();
        assert_eq!(names, vec!["Halcones", "Zorros"]);
        assert_eq!(summaries[0].player_count, 0);
        assert_eq!(summaries[1].player_count, 2);
    }

    #[tokio::test]
    async fn test_players_ordered_by_shirt_number() {
        let store = MemoryStore::new()
            .with_player(player(1, 1, 10))
            .with_player(player(2, 1, 4))
            .with_player(player(3, 2, 1));

        let shirts: Vec<i32> = store
            .players(1)
            .await
            .unwrap()
            .iter()
            .map(|p| p.shirt_number)
            .collect();
        assert_eq!(shirts, vec![4, 10]);
    }

    #[tokio::test]
    async fn test_team_without_tournament_is_not_found() {
        let store = MemoryStore::new().with_team(team(5, 99, "Orphans"));
        assert!(store.find_team(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fixture_sorted_and_named() {
        let kickoff = |day| Utc.with_ymd_and_hms(2025, 4, day, 18, 0, 0).unwrap();
        let game = |id, day| Match {
            id,
            tournament_id: 1,
            home_team_id: 1,
            away_team_id: 2,
            scheduled_at: kickoff(day),
            venue: None,
            status: Status::Scheduled,
            home_score: None,
            away_score: None,
            notes: None,
        };
        let store = MemoryStore::new()
            .with_team(team(1, 1, "Home"))
            .with_team(team(2, 1, "Away"))
            .with_match(game(1, 9))
            .with_match(game(2, 3));

        let fixture = store.fixture(1).await.unwrap();
        assert_eq!(fixture.len(), 2);
        assert_eq!(fixture[0].game.id, 2);
        assert_eq!(fixture[0].home_team_name, "Home");
        assert_eq!(fixture[0].away_team_name, "Away");
    }
}
