//! Report data gateway: the only caller of the store for the pipeline.

use std::sync::Arc;

use super::errors::{ReportError, ReportResult};
use super::ReportData;
use crate::db::ReportStore;
use crate::tournament::{Match, Team, TeamId, Tournament, TournamentId};

/// Raw inputs for the standings computation
#[derive(Debug, Clone, PartialEq)]
pub struct StandingsSource {
    pub tournament: Tournament,
    pub teams: Vec<Team>,
    pub matches: Vec<Match>,
}

/// Loads the entities each report needs.
///
/// The root entity is always checked first; when it is missing the call
/// fails with [`ReportError::NotFound`] before any other query runs.
#[derive(Clone)]
pub struct ReportDataGateway {
    store: Arc<dyn ReportStore>,
}

impl ReportDataGateway {
    pub fn new(store: Arc<dyn ReportStore>) -> Self {
        Self { store }
    }

    async fn tournament(&self, id: TournamentId) -> ReportResult<Tournament> {
        self.store
            .find_tournament(id)
            .await?
            .ok_or(ReportError::NotFound {
                entity: "Tournament",
                id,
            })
    }

    /// Tournament header plus its teams with player counts
    pub async fn team_listing(&self, tournament_id: TournamentId) -> ReportResult<ReportData> {
        let tournament = self.tournament(tournament_id).await?;
        let teams = self.store.team_summaries(tournament_id).await?;
        log::debug!(
            "Loaded {} teams for tournament {}",
            teams.len(),
            tournament_id
        );

        Ok(ReportData::Teams { tournament, teams })
    }

    /// Team profile plus its players ordered by shirt number
    pub async fn roster(&self, team_id: TeamId) -> ReportResult<ReportData> {
        let profile = self
            .store
            .find_team(team_id)
            .await?
            .ok_or(ReportError::NotFound {
                entity: "Team",
                id: team_id,
            })?;
        let players = self.store.players(team_id).await?;
        log::debug!("Loaded {} players for team {}", players.len(), team_id);

        Ok(ReportData::Roster { profile, players })
    }

    /// Tournament header plus its matches ordered by kickoff
    pub async fn fixture(&self, tournament_id: TournamentId) -> ReportResult<ReportData> {
        let tournament = self.tournament(tournament_id).await?;
        let matches = self.store.fixture(tournament_id).await?;
        log::debug!(
            "Loaded {} matches for tournament {}",
            matches.len(),
            tournament_id
        );

        Ok(ReportData::Fixture {
            tournament,
            matches,
        })
    }

    /// Tournament header, teams and all matches for standings
    pub async fn standings_source(
        &self,
        tournament_id: TournamentId,
    ) -> ReportResult<StandingsSource> {
        let tournament = self.tournament(tournament_id).await?;
        let teams = self.store.teams(tournament_id).await?;
        let matches = self
            .store
            .fixture(tournament_id)
            .await?
            .into_iter()
            .map(|entry| entry.game)
            .collect();

        Ok(StandingsSource {
            tournament,
            teams,
            matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;
    use crate::tournament::Status;

    fn store() -> Arc<dyn ReportStore> {
        Arc::new(
            MemoryStore::new()
                .with_tournament(Tournament {
                    id: 1,
                    name: "Apertura".to_string(),
                    discipline: "Futsal".to_string(),
                    season: Some("2025".to_string()),
                    status: Status::InProgress,
                    start_date: None,
                    end_date: None,
                    organizer_id: None,
                })
                .with_team(Team {
                    id: 10,
                    name: "Rayos".to_string(),
                    color: None,
                    tournament_id: 1,
                    representative: None,
                    representative_phone: None,
                }),
        )
    }

    #[tokio::test]
    async fn test_missing_tournament_is_not_found() {
        let gateway = ReportDataGateway::new(store());
        for result in [
            gateway.team_listing(2).await,
            gateway.fixture(2).await,
        ] {
            assert!(matches!(
                result,
                Err(ReportError::NotFound {
                    entity: "Tournament",
                    id: 2
                })
            ));
        }
        assert!(gateway.standings_source(2).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_team_is_not_found() {
        let gateway = ReportDataGateway::new(store());
        assert!(matches!(
            gateway.roster(99).await,
            Err(ReportError::NotFound { entity: "Team", id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_roster_carries_tournament_name() {
        let gateway = ReportDataGateway::new(store());
        match gateway.roster(10).await.unwrap() {
            ReportData::Roster { profile, players } => {
                assert_eq!(profile.tournament_name, "Apertura");
                assert!(players.is_empty());
            }
            other => panic!("unexpected data: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_standings_source_includes_all_teams() {
        let gateway = ReportDataGateway::new(store());
        let source = gateway.standings_source(1).await.unwrap();
        assert_eq!(source.teams.len(), 1);
        assert!(source.matches.is_empty());
    }
}
