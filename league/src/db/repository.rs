//! Report store trait and its PostgreSQL implementation.
//!
//! The trait is the only seam between the report pipeline and persistence,
//! so the pipeline can be exercised against [`super::MemoryStore`] in tests.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::errors::{StoreError, StoreResult};
use crate::tournament::{
    FixtureEntry, Match, Player, Status, Team, TeamId, TeamProfile, TeamSummary, Tournament,
    TournamentId,
};

/// Read-only queries needed to build reports
#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Find a tournament header by ID
    async fn find_tournament(&self, id: TournamentId) -> StoreResult<Option<Tournament>>;

    /// Find a team and the name of its tournament
    async fn find_team(&self, id: TeamId) -> StoreResult<Option<TeamProfile>>;

    /// Teams of a tournament with their player counts, ordered by name
    async fn team_summaries(&self, tournament_id: TournamentId) -> StoreResult<Vec<TeamSummary>>;

    /// Teams of a tournament, ordered by name
    async fn teams(&self, tournament_id: TournamentId) -> StoreResult<Vec<Team>>;

    /// Players of a team, ordered by shirt number
    async fn players(&self, team_id: TeamId) -> StoreResult<Vec<Player>>;

    /// Matches of a tournament with team names, ordered by kickoff
    async fn fixture(&self, tournament_id: TournamentId) -> StoreResult<Vec<FixtureEntry>>;
}

/// PostgreSQL implementation of [`ReportStore`]
pub struct PgReportStore {
    pool: PgPool,
    query_timeout: Duration,
}

impl PgReportStore {
    pub fn new(pool: PgPool, query_timeout: Duration) -> Self {
        Self {
            pool,
            query_timeout,
        }
    }

    async fn timed<F, T>(&self, future: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.query_timeout, future).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(StoreError::Timeout(self.query_timeout)),
        }
    }
}

const TEAM_COLUMNS: &str = "e.id::BIGINT AS id, e.nombre, e.color, e.torneo_id::BIGINT AS torneo_id, \
                            e.representante, e.telefono_representante";

#[async_trait]
impl ReportStore for PgReportStore {
    async fn find_tournament(&self, id: TournamentId) -> StoreResult<Option<Tournament>> {
        let row = self
            .timed(
                sqlx::query(
                    r#"
                    SELECT id::BIGINT AS id, nombre, disciplina, temporada, estado,
                           fecha_inicio::DATE AS fecha_inicio, fecha_fin::DATE AS fecha_fin,
                           organizador_id::BIGINT AS organizador_id
                    FROM torneos
                    WHERE id = $1
                    "#,
                )
                .bind(id)
                .fetch_optional(&self.pool),
            )
            .await?;

        row.map(|r| tournament_from_row(&r)).transpose()
    }

    async fn find_team(&self, id: TeamId) -> StoreResult<Option<TeamProfile>> {
        let query = format!(
            "SELECT {TEAM_COLUMNS}, t.nombre AS torneo_nombre
             FROM equipos e
             INNER JOIN torneos t ON e.torneo_id = t.id
             WHERE e.id = $1"
        );
        let row = self
            .timed(sqlx::query(&query).bind(id).fetch_optional(&self.pool))
            .await?;

        row.map(|r| {
            Ok(TeamProfile {
                team: team_from_row(&r)?,
                tournament_name: r.try_get("torneo_nombre")?,
            })
        })
        .transpose()
    }

    async fn team_summaries(&self, tournament_id: TournamentId) -> StoreResult<Vec<TeamSummary>> {
        let query = format!(
            "SELECT {TEAM_COLUMNS}, COUNT(j.id) AS total_jugadores
             FROM equipos e
             LEFT JOIN jugadores j ON j.equipo_id = e.id
             WHERE e.torneo_id = $1
             GROUP BY e.id
             ORDER BY e.nombre"
        );
        let rows = self
            .timed(sqlx::query(&query).bind(tournament_id).fetch_all(&self.pool))
            .await?;

        rows.iter()
            .map(|r| {
                Ok(TeamSummary {
                    team: team_from_row(r)?,
                    player_count: r.try_get("total_jugadores")?,
                })
            })
            .collect()
    }

    async fn teams(&self, tournament_id: TournamentId) -> StoreResult<Vec<Team>> {
        let query = format!(
            "SELECT {TEAM_COLUMNS}
             FROM equipos e
             WHERE e.torneo_id = $1
             ORDER BY e.nombre"
        );
        let rows = self
            .timed(sqlx::query(&query).bind(tournament_id).fetch_all(&self.pool))
            .await?;

        rows.iter().map(team_from_row).collect()
    }

    async fn players(&self, team_id: TeamId) -> StoreResult<Vec<Player>> {
        let rows = self
            .timed(
                sqlx::query(
                    r#"
                    SELECT id::BIGINT AS id, nombre, apellido,
                           fecha_nacimiento::DATE AS fecha_nacimiento,
                           nro_camiseta::INT4 AS nro_camiseta, posicion,
                           equipo_id::BIGINT AS equipo_id,
                           creado_en::TIMESTAMP AS creado_en
                    FROM jugadores
                    WHERE equipo_id = $1
                    ORDER BY nro_camiseta, id
                    "#,
                )
                .bind(team_id)
                .fetch_all(&self.pool),
            )
            .await?;

        rows.iter()
            .map(|r| {
                Ok(Player {
                    id: r.try_get("id")?,
                    first_name: r.try_get("nombre")?,
                    last_name: r.try_get("apellido")?,
                    birth_date: r.try_get("fecha_nacimiento")?,
                    shirt_number: r.try_get("nro_camiseta")?,
                    position: r.try_get("posicion")?,
                    team_id: r.try_get("equipo_id")?,
                    registered_at: r
                        .try_get::<chrono::NaiveDateTime, _>("creado_en")?
                        .and_utc(),
                })
            })
            .collect()
    }

    async fn fixture(&self, tournament_id: TournamentId) -> StoreResult<Vec<FixtureEntry>> {
        let rows = self
            .timed(
                sqlx::query(
                    r#"
                    SELECT p.id::BIGINT AS id, p.torneo_id::BIGINT AS torneo_id,
                           p.equipo_local_id::BIGINT AS equipo_local_id,
                           p.equipo_visitante_id::BIGINT AS equipo_visitante_id,
                           p.fecha::TIMESTAMP AS fecha, p.lugar, p.estado,
                           p.marcador_local::INT4 AS marcador_local,
                           p.marcador_visitante::INT4 AS marcador_visitante,
                           p.observaciones,
                           el.nombre AS equipo_local_nombre,
                           ev.nombre AS equipo_visitante_nombre
                    FROM partidos p
                    INNER JOIN equipos el ON p.equipo_local_id = el.id
                    INNER JOIN equipos ev ON p.equipo_visitante_id = ev.id
                    WHERE p.torneo_id = $1
                    ORDER BY p.fecha, p.id
                    "#,
                )
                .bind(tournament_id)
                .fetch_all(&self.pool),
            )
            .await?;

        rows.iter()
            .map(|r| {
                Ok(FixtureEntry {
                    game: Match {
                        id: r.try_get("id")?,
                        tournament_id: r.try_get("torneo_id")?,
                        home_team_id: r.try_get("equipo_local_id")?,
                        away_team_id: r.try_get("equipo_visitante_id")?,
                        scheduled_at: r.try_get::<chrono::NaiveDateTime, _>("fecha")?.and_utc(),
                        venue: r.try_get("lugar")?,
                        status: parse_status(r, "estado", "partidos.estado")?,
                        home_score: r.try_get("marcador_local")?,
                        away_score: r.try_get("marcador_visitante")?,
                        notes: r.try_get("observaciones")?,
                    },
                    home_team_name: r.try_get("equipo_local_nombre")?,
                    away_team_name: r.try_get("equipo_visitante_nombre")?,
                })
            })
            .collect()
    }
}

fn tournament_from_row(r: &PgRow) -> StoreResult<Tournament> {
    Ok(Tournament {
        id: r.try_get("id")?,
        name: r.try_get("nombre")?,
        discipline: r.try_get("disciplina")?,
        season: r.try_get("temporada")?,
        status: parse_status(r, "estado", "torneos.estado")?,
        start_date: r.try_get("fecha_inicio")?,
        end_date: r.try_get("fecha_fin")?,
        organizer_id: r.try_get("organizador_id")?,
    })
}

fn team_from_row(r: &PgRow) -> StoreResult<Team> {
    Ok(Team {
        id: r.try_get("id")?,
        name: r.try_get("nombre")?,
        color: r.try_get("color")?,
        tournament_id: r.try_get("torneo_id")?,
        representative: r.try_get("representante")?,
        representative_phone: r.try_get("telefono_representante")?,
    })
}

fn parse_status(r: &PgRow, field: &str, column: &'static str) -> StoreResult<Status> {
    let raw: String = r.try_get(field)?;
    raw.parse()
        .map_err(|_| StoreError::InvalidValue { column, value: raw })
}
