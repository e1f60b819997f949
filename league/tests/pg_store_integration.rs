//! Integration tests for the PostgreSQL report store.
//!
//! Each test builds the league tables inside its own schema and drops it
//! afterwards. Run with a reachable database:
//!
//! ```bash
//! DATABASE_URL=postgres://postgres@localhost/torneos_test cargo test -- --ignored
//! ```

use league::db::{PgReportStore, ReportStore, StoreError};
use league::reports::{FlowConfig, ReportOrchestrator, ReportRequest};
use league::tournament::Status;
use sqlx::PgPool;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

const SCHEMA: &str = r#"
CREATE TABLE torneos (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(150) NOT NULL,
    disciplina VARCHAR(50) NOT NULL,
    temporada VARCHAR(50),
    estado VARCHAR(20) NOT NULL,
    fecha_inicio DATE,
    fecha_fin DATE,
    organizador_id INTEGER
);
CREATE TABLE equipos (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(100) NOT NULL,
    color VARCHAR(50),
    torneo_id INTEGER NOT NULL REFERENCES torneos(id),
    representante VARCHAR(100),
    telefono_representante VARCHAR(20)
);
CREATE TABLE jugadores (
    id SERIAL PRIMARY KEY,
    nombre VARCHAR(100) NOT NULL,
    apellido VARCHAR(100) NOT NULL,
    fecha_nacimiento DATE,
    nro_camiseta INTEGER NOT NULL,
    posicion VARCHAR(50),
    equipo_id INTEGER NOT NULL REFERENCES equipos(id),
    creado_en TIMESTAMP NOT NULL DEFAULT NOW()
);
CREATE TABLE partidos (
    id SERIAL PRIMARY KEY,
    torneo_id INTEGER NOT NULL REFERENCES torneos(id),
    equipo_local_id INTEGER NOT NULL REFERENCES equipos(id),
    equipo_visitante_id INTEGER NOT NULL REFERENCES equipos(id),
    fecha TIMESTAMP NOT NULL,
    lugar VARCHAR(150),
    estado VARCHAR(20) NOT NULL,
    marcador_local INTEGER,
    marcador_visitante INTEGER,
    observaciones TEXT
);
INSERT INTO torneos (nombre, disciplina, temporada, estado, fecha_inicio)
    VALUES ('Copa Andina', 'Futsal', '2025', 'en_curso', '2025-05-01');
INSERT INTO equipos (nombre, torneo_id) VALUES ('Tigres', 1), ('Aguilas', 1), ('Lobos', 1);
INSERT INTO jugadores (nombre, apellido, nro_camiseta, equipo_id)
    VALUES ('Mario', 'Quispe', 9, 1), ('Luis', 'Choque', 1, 1);
INSERT INTO partidos (torneo_id, equipo_local_id, equipo_visitante_id, fecha, estado,
                      marcador_local, marcador_visitante)
    VALUES (1, 1, 2, '2025-05-03 18:00', 'finalizado', 3, 1),
           (1, 2, 3, '2025-05-04 18:00', 'finished', 0, 0),
           (1, 3, 1, '2025-05-10 18:00', 'programado', NULL, NULL);
"#;

/// Pool whose connections all resolve tables in `schema`
async fn setup_schema(schema: &str) -> PgPool {
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://postgres@localhost/torneos_test".to_string());

    let admin = PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to test database");
    sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
        .execute(&admin)
        .await
        .unwrap();
    sqlx::query(&format!("CREATE SCHEMA {schema}"))
        .execute(&admin)
        .await
        .unwrap();
    admin.close().await;

    let options = PgConnectOptions::from_str(&database_url)
        .unwrap()
        .options([("search_path", schema)]);
    let pool = PgPoolOptions::new()
        .max_connections(2)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::raw_sql(SCHEMA).execute(&pool).await.unwrap();
    pool
}

async fn drop_schema(pool: PgPool, schema: &str) {
    let _ = sqlx::query(&format!("DROP SCHEMA IF EXISTS {schema} CASCADE"))
        .execute(&pool)
        .await;
    pool.close().await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pg_store_reads_league_tables() {
    let schema = "league_store_read";
    let pool = setup_schema(schema).await;
    let store = PgReportStore::new(pool.clone(), Duration::from_secs(5));

    let tournament = store.find_tournament(1).await.unwrap().unwrap();
    assert_eq!(tournament.name, "Copa Andina");
    assert_eq!(tournament.status, Status::InProgress);
    assert!(store.find_tournament(99).await.unwrap().is_none());

    let summaries = store.team_summaries(1).await.unwrap();
    let names: Vec<&str> = summaries.iter().map(|s| s.team.name.as_str()).collect();
    assert_eq!(names, vec!["Aguilas", "Lobos", "Tigres"]);
    assert_eq!(summaries[2].player_count, 2);

    let players = store.players(1).await.unwrap();
    assert_eq!(players[0].shirt_number, 1);

    let fixture = store.fixture(1).await.unwrap();
    assert_eq!(fixture.len(), 3);
    assert_eq!(fixture[0].home_team_name, "Tigres");
    assert_eq!(fixture[2].game.status, Status::Scheduled);

    let profile = store.find_team(2).await.unwrap().unwrap();
    assert_eq!(profile.tournament_name, "Copa Andina");

    drop_schema(pool, schema).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_pg_store_rejects_unknown_status() {
    let schema = "league_store_status";
    let pool = setup_schema(schema).await;
    sqlx::query("UPDATE partidos SET estado = 'suspendido' WHERE id = 3")
        .execute(&pool)
        .await
        .unwrap();
    let store = PgReportStore::new(pool.clone(), Duration::from_secs(5));

    let result = store.fixture(1).await;
    assert!(matches!(result, Err(StoreError::InvalidValue { value, .. }) if value == "suspendido"));

    drop_schema(pool, schema).await;
}

#[tokio::test]
#[ignore = "requires PostgreSQL"]
async fn test_standings_report_from_database() {
    let schema = "league_store_report";
    let pool = setup_schema(schema).await;
    let store: Arc<dyn ReportStore> =
        Arc::new(PgReportStore::new(pool.clone(), Duration::from_secs(5)));
    let orchestrator = ReportOrchestrator::new(store, FlowConfig::default());

    let (_, rows) = orchestrator.standings(1).await.unwrap();
    let order: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(order, vec!["Tigres", "Lobos", "Aguilas"]);

    let request = ReportRequest::parse("tabla-posiciones", 1, "excel").unwrap();
    let buffer = orchestrator.generate(&request).await.unwrap();
    assert_eq!(buffer.filename, "tabla_posiciones_Copa_Andina.xlsx");

    drop_schema(pool, schema).await;
}
