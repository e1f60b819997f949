//! Integration tests for the report pipeline over the in-memory store.
//!
//! Covers standings ordering end to end, both output formats for every
//! report kind, and the agreement between the two renderers on row order
//! and podium emphasis.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use league::db::{MemoryStore, ReportStore};
use league::reports::{
    FlowConfig, FlowDocumentRenderer, ReportData, ReportError, ReportFormat, ReportKind,
    ReportOrchestrator, ReportRequest, TabularWorkbookRenderer,
};
use league::tournament::{Match, Player, Status, Team, Tournament};
use std::sync::Arc;

fn generated_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 15, 20, 0, 0).unwrap()
}

fn team(id: i64, name: &str) -> Team {
    Team {
        id,
        name: name.to_string(),
        color: Some("Blue".to_string()),
        tournament_id: 1,
        representative: Some(format!("Rep {id}")),
        representative_phone: Some("70000000".to_string()),
    }
}

fn finished(id: i64, home: i64, away: i64, score: (i32, i32)) -> Match {
    Match {
        id,
        tournament_id: 1,
        home_team_id: home,
        away_team_id: away,
        scheduled_at: Utc.with_ymd_and_hms(2025, 8, 1, 16, 0, 0).unwrap() + Duration::days(id % 3),
        venue: Some("Estadio Municipal".to_string()),
        status: Status::Finished,
        home_score: Some(score.0),
        away_score: Some(score.1),
        notes: None,
    }
}

/// Five teams: Leones, Pumas, Condores, Zorros, Halcones
fn store() -> Arc<dyn ReportStore> {
    let mut store = MemoryStore::new().with_tournament(Tournament {
        id: 1,
        name: "Torneo Clausura 2025".to_string(),
        discipline: "Football".to_string(),
        season: Some("2025".to_string()),
        status: Status::InProgress,
        start_date: NaiveDate::from_ymd_opt(2025, 7, 1),
        end_date: NaiveDate::from_ymd_opt(2025, 11, 30),
        organizer_id: Some(1),
    });

    for (id, name) in [(1, "Leones"), (2, "Pumas"), (3, "Condores"), (4, "Zorros"), (5, "Halcones")] {
        store = store.with_team(team(id, name));
    }

    for shirt in [10, 1, 7] {
        store = store.with_player(Player {
            id: i64::from(shirt),
            first_name: format!("Jugador{shirt}"),
            last_name: "Flores".to_string(),
            birth_date: NaiveDate::from_ymd_opt(1998, 9, 1),
            shirt_number: shirt,
            position: (shirt == 1).then(|| "Goalkeeper".to_string()),
            team_id: 1,
            registered_at: generated_at() - Duration::days(30),
        });
    }

    // Leones 6 pts, Pumas 4, Condores 4 (worse GD), Zorros 1, Halcones 1
    let matches = [
        finished(1, 1, 2, (2, 1)),
        finished(2, 1, 3, (1, 0)),
        finished(3, 2, 4, (3, 0)),
        finished(4, 3, 5, (2, 1)),
        finished(5, 2, 3, (1, 1)),
        finished(6, 4, 5, (0, 0)),
    ];
    for game in matches {
        store = store.with_match(game);
    }

    store = store.with_match(Match {
        id: 7,
        tournament_id: 1,
        home_team_id: 5,
        away_team_id: 1,
        scheduled_at: Utc.with_ymd_and_hms(2025, 9, 1, 18, 30, 0).unwrap(),
        venue: None,
        status: Status::Scheduled,
        home_score: None,
        away_score: None,
        notes: Some("Night match".to_string()),
    });

    Arc::new(store)
}

fn orchestrator() -> ReportOrchestrator {
    ReportOrchestrator::new(store(), FlowConfig::default())
}

#[tokio::test]
async fn test_standings_order_end_to_end() {
    let (tournament, rows) = orchestrator().standings(1).await.unwrap();
    assert_eq!(tournament.name, "Torneo Clausura 2025");

    let order: Vec<&str> = rows.iter().map(|r| r.team_name.as_str()).collect();
    assert_eq!(order, vec!["Leones", "Pumas", "Condores", "Halcones", "Zorros"]);

    let leones = &rows[0];
    assert_eq!((leones.played, leones.won, leones.points), (2, 2, 6));
    assert_eq!(leones.goal_difference, 2);

    let pumas = &rows[1];
    assert_eq!((pumas.won, pumas.drawn, pumas.lost, pumas.points), (1, 1, 1, 4));
}

#[tokio::test]
async fn test_every_kind_renders_in_both_formats() {
    let orchestrator = orchestrator();
    let cases = [
        ("equipos", 1, "equipos_Torneo_Clausura_2025"),
        ("jugadores", 1, "jugadores_Leones"),
        ("fixture", 1, "fixture_Torneo_Clausura_2025"),
        ("tabla_posiciones", 1, "tabla_posiciones_Torneo_Clausura_2025"),
    ];

    for (kind, id, stem) in cases {
        let pdf = orchestrator
            .generate_at(&ReportRequest::parse(kind, id, "pdf").unwrap(), generated_at())
            .await
            .unwrap();
        assert!(pdf.bytes.starts_with(b"%PDF"), "{kind} pdf");
        assert_eq!(pdf.filename, format!("{stem}.pdf"));
        assert_eq!(pdf.mime_type, "application/pdf");

        let excel = orchestrator
            .generate_at(&ReportRequest::parse(kind, id, "excel").unwrap(), generated_at())
            .await
            .unwrap();
        assert!(excel.bytes.starts_with(b"PK"), "{kind} xlsx");
        assert_eq!(excel.filename, format!("{stem}.xlsx"));
    }
}

#[tokio::test]
async fn test_missing_root_entities_are_not_found() {
    let orchestrator = orchestrator();

    let roster = ReportRequest::parse("jugadores", 99, "pdf").unwrap();
    assert!(matches!(
        orchestrator.generate(&roster).await,
        Err(ReportError::NotFound { entity: "Team", id: 99 })
    ));

    let fixture = ReportRequest::parse("fixture", 2, "excel").unwrap();
    assert!(matches!(
        orchestrator.generate(&fixture).await,
        Err(ReportError::NotFound { entity: "Tournament", id: 2 })
    ));
}

#[tokio::test]
async fn test_renderers_agree_on_order_and_podium() {
    let (tournament, rows) = orchestrator().standings(1).await.unwrap();
    let data = ReportData::Standings {
        tournament,
        rows: rows.clone(),
    };

    let document = FlowDocumentRenderer::default()
        .layout(&data, generated_at())
        .unwrap();
    let pdf_rows: Vec<(String, bool)> = document
        .runs()
        .filter(|run| rows.iter().any(|r| r.team_name == run.text))
        .map(|run| (run.text.clone(), run.bold))
        .collect();

    let sheet = TabularWorkbookRenderer.layout(&data, generated_at());
    let first = sheet.first_data_row();
    let sheet_rows: Vec<(String, bool)> = (0..rows.len() as u32)
        .map(|offset| {
            let cell = sheet.cell(first + offset, 1).unwrap();
            match &cell.value {
                league::reports::xlsx::CellValue::Text(name) => (name.clone(), cell.bold),
                other => panic!("unexpected team cell {other:?}"),
            }
        })
        .collect();

    assert_eq!(pdf_rows, sheet_rows);
    let podium: Vec<bool> = pdf_rows.iter().map(|(_, bold)| *bold).collect();
    assert_eq!(podium, vec![true, true, true, false, false]);
}

#[tokio::test]
async fn test_fixture_pdf_lists_unplayed_match_status() {
    let request = ReportRequest {
        kind: ReportKind::Fixture,
        target_id: 1,
        format: ReportFormat::Pdf,
    };
    let buffer = orchestrator()
        .generate_at(&request, generated_at())
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&buffer.bytes);
    assert!(text.contains("Result: SCHEDULED"));
    assert!(text.contains("Result: 2 - 1"));
}

#[tokio::test]
async fn test_roster_pdf_is_ordered_by_shirt_number() {
    let request = ReportRequest::parse("jugadores", 1, "pdf").unwrap();
    let buffer = orchestrator()
        .generate_at(&request, generated_at())
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&buffer.bytes);

    let positions: Vec<usize> = ["Jugador1 Flores", "Jugador7 Flores", "Jugador10 Flores"]
        .iter()
        .map(|name| text.find(name).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(text.contains("Goalkeeper"));
}
