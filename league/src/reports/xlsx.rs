//! Spreadsheet renderer.
//!
//! Each report becomes a single worksheet laid out as:
//!
//! | row | content                                   |
//! |-----|-------------------------------------------|
//! | 0   | title merged across all columns (heading) |
//! | 1   | subtitle merged across all columns        |
//! | 2   | spacer                                    |
//! | 3   | column headers (subheading)               |
//! | 4.. | one row per record                        |
//! |     | blank, then the highlighted total row     |
//!
//! The grid is described by a [`SheetLayout`] first and written with
//! `rust_xlsxwriter` afterwards.

use chrono::{DateTime, NaiveDate, Utc};
use rust_xlsxwriter::{Color, DocProperties, Format, FormatAlign, FormatPattern, Workbook};

use super::errors::RenderError;
use super::style::{Alignment, StylePreset, is_podium};
use super::{NOT_AVAILABLE, ReportData, ReportFormat, ReportRenderer, format_date};
use crate::standings::StandingsRow;
use crate::tournament::{FixtureEntry, Player, TeamProfile, TeamSummary, Tournament};

const TITLE_ROW_HEIGHT: f64 = 25.0;
const SUBTITLE_ROW_HEIGHT: f64 = 20.0;
const HEADER_ROW_HEIGHT: f64 = 20.0;
const FIRST_HEADER_ROW: u32 = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
}

/// One written cell; `bold` adds emphasis on top of the preset
#[derive(Debug, Clone, PartialEq)]
pub struct SheetCell {
    pub row: u32,
    pub col: u16,
    pub value: CellValue,
    pub preset: StylePreset,
    pub bold: bool,
}

/// Text merged across columns of a single row
#[derive(Debug, Clone, PartialEq)]
pub struct MergedRange {
    pub row: u32,
    pub first_col: u16,
    pub last_col: u16,
    pub text: String,
    pub preset: StylePreset,
}

/// Complete cell grid of one worksheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub sheet_name: &'static str,
    pub title: String,
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<(u32, f64)>,
    pub merges: Vec<MergedRange>,
    pub cells: Vec<SheetCell>,
}

impl SheetLayout {
    pub fn cell(&self, row: u32, col: u16) -> Option<&SheetCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// First row holding records
    pub fn first_data_row(&self) -> u32 {
        FIRST_HEADER_ROW + 1
    }
}

struct SheetBuilder {
    layout: SheetLayout,
    next_row: u32,
}

impl SheetBuilder {
    fn new(sheet_name: &'static str, title: String, subtitle: String, widths: &[f64]) -> Self {
        let last_col = widths.len().saturating_sub(1) as u16;
        let layout = SheetLayout {
            sheet_name,
            title: title.clone(),
            column_widths: widths.to_vec(),
            row_heights: vec![(0, TITLE_ROW_HEIGHT), (1, SUBTITLE_ROW_HEIGHT)],
            merges: vec![
                MergedRange {
                    row: 0,
                    first_col: 0,
                    last_col,
                    text: title,
                    preset: StylePreset::Heading,
                },
                MergedRange {
                    row: 1,
                    first_col: 0,
                    last_col,
                    text: subtitle,
                    preset: StylePreset::CenteredCell,
                },
            ],
            cells: Vec::new(),
        };

        Self {
            layout,
            next_row: FIRST_HEADER_ROW,
        }
    }

    fn header(&mut self, labels: &[&str]) {
        let row = self.next_row;
        self.layout.row_heights.push((row, HEADER_ROW_HEIGHT));
        self.row(
            labels
                .iter()
                .map(|label| text(*label, StylePreset::Subheading))
                .collect(),
        );
    }

    fn row(&mut self, values: Vec<(CellValue, StylePreset, bool)>) {
        let row = self.next_row;
        for (col, (value, preset, bold)) in values.into_iter().enumerate() {
            self.layout.cells.push(SheetCell {
                row,
                col: col as u16,
                value,
                preset,
                bold,
            });
        }
        self.next_row += 1;
    }

    fn blank(&mut self) {
        self.next_row += 1;
    }

    fn summary(&mut self, label: &str, count: usize) {
        self.blank();
        self.row(vec![
            text(label, StylePreset::Highlighted),
            number(count as f64, StylePreset::Highlighted),
        ]);
    }

    fn finish(self) -> SheetLayout {
        self.layout
    }
}

fn text(value: impl Into<String>, preset: StylePreset) -> (CellValue, StylePreset, bool) {
    (CellValue::Text(value.into()), preset, false)
}

fn number(value: f64, preset: StylePreset) -> (CellValue, StylePreset, bool) {
    (CellValue::Number(value), preset, false)
}

/// Renders reports as single-sheet XLSX workbooks
#[derive(Debug, Clone, Copy, Default)]
pub struct TabularWorkbookRenderer;

impl TabularWorkbookRenderer {
    /// Build the cell grid without encoding it
    pub fn layout(&self, data: &ReportData, generated_at: DateTime<Utc>) -> SheetLayout {
        match data {
            ReportData::Teams { tournament, teams } => layout_teams(tournament, teams),
            ReportData::Roster { profile, players } => {
                layout_roster(profile, players, generated_at.date_naive())
            }
            ReportData::Fixture {
                tournament,
                matches,
            } => layout_fixture(tournament, matches),
            ReportData::Standings { tournament, rows } => {
                layout_standings(tournament, rows, generated_at)
            }
        }
    }

    /// Write a cell grid into XLSX bytes
    ///
    /// The workbook creation time is pinned to `generated_at` so the same
    /// layout always encodes to the same bytes.
    pub fn encode(
        &self,
        layout: &SheetLayout,
        generated_at: DateTime<Utc>,
    ) -> Result<Vec<u8>, RenderError> {
        let mut workbook = Workbook::new();
        let properties = DocProperties::new()
            .set_title(&layout.title)
            .set_author("league")
            .set_creation_datetime(&generated_at);
        workbook.set_properties(&properties);

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(layout.sheet_name)?;

        for (col, width) in layout.column_widths.iter().enumerate() {
            worksheet.set_column_width(col as u16, *width)?;
        }
        for (row, height) in &layout.row_heights {
            worksheet.set_row_height(*row, *height)?;
        }
        for merge in &layout.merges {
            worksheet.merge_range(
                merge.row,
                merge.first_col,
                merge.row,
                merge.last_col,
                &merge.text,
                &cell_format(merge.preset, false),
            )?;
        }
        for cell in &layout.cells {
            let format = cell_format(cell.preset, cell.bold);
            match &cell.value {
                CellValue::Text(value) => {
                    worksheet.write_string_with_format(cell.row, cell.col, value, &format)?;
                }
                CellValue::Number(value) => {
                    worksheet.write_number_with_format(cell.row, cell.col, *value, &format)?;
                }
            }
        }

        Ok(workbook.save_to_buffer()?)
    }
}

impl ReportRenderer for TabularWorkbookRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Excel
    }

    fn render(&self, data: &ReportData, generated_at: DateTime<Utc>) -> Result<Vec<u8>, RenderError> {
        let layout = self.layout(data, generated_at);
        self.encode(&layout, generated_at)
    }
}

fn cell_format(preset: StylePreset, bold: bool) -> Format {
    let style = preset.style();
    let mut format = Format::new().set_align(FormatAlign::VerticalCenter);
    format = match style.alignment {
        Alignment::Left => format.set_align(FormatAlign::Left),
        Alignment::Center => format.set_align(FormatAlign::Center),
    };
    if style.bold || bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if let Some(color) = style.font_color {
        format = format.set_font_color(Color::RGB(color));
    }
    if let Some(fill) = style.fill {
        format = format
            .set_pattern(FormatPattern::Solid)
            .set_background_color(Color::RGB(fill));
    }
    format
}

fn or_not_available(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

fn layout_teams(tournament: &Tournament, teams: &[TeamSummary]) -> SheetLayout {
    let mut sheet = SheetBuilder::new(
        "Teams",
        format!("Teams of Tournament: {}", tournament.name),
        format!(
            "{} | Status: {}",
            tournament.discipline_and_season(),
            tournament.status
        ),
        &[8.0, 30.0, 15.0, 25.0, 18.0, 18.0],
    );
    sheet.header(&[
        "No.",
        "Team Name",
        "Color",
        "Representative",
        "Phone",
        "Total Players",
    ]);

    for (index, summary) in teams.iter().enumerate() {
        let team = &summary.team;
        sheet.row(vec![
            number((index + 1) as f64, StylePreset::CenteredCell),
            text(team.name.as_str(), StylePreset::Cell),
            text(or_not_available(team.color.as_deref()), StylePreset::Cell),
            text(or_not_available(team.representative.as_deref()), StylePreset::Cell),
            text(
                or_not_available(team.representative_phone.as_deref()),
                StylePreset::Cell,
            ),
            number(summary.player_count as f64, StylePreset::CenteredCell),
        ]);
    }

    sheet.summary("TOTAL TEAMS:", teams.len());
    sheet.finish()
}

fn layout_roster(profile: &TeamProfile, players: &[Player], today: NaiveDate) -> SheetLayout {
    let mut sheet = SheetBuilder::new(
        "Roster",
        format!("Team Roster: {}", profile.team.name),
        format!(
            "Tournament: {} | Representative: {}",
            profile.tournament_name,
            or_not_available(profile.team.representative.as_deref())
        ),
        &[15.0, 20.0, 20.0, 18.0, 10.0, 18.0, 18.0],
    );
    sheet.header(&[
        "Shirt No.",
        "First Name",
        "Last Name",
        "Birth Date",
        "Age",
        "Position",
        "Registered",
    ]);

    for player in players {
        let age = match player.age_on(today) {
            Some(age) => number(f64::from(age), StylePreset::CenteredCell),
            None => text(NOT_AVAILABLE, StylePreset::CenteredCell),
        };
        sheet.row(vec![
            number(f64::from(player.shirt_number), StylePreset::CenteredCell),
            text(player.first_name.as_str(), StylePreset::Cell),
            text(player.last_name.as_str(), StylePreset::Cell),
            text(format_date(player.birth_date), StylePreset::Cell),
            age,
            text(or_not_available(player.position.as_deref()), StylePreset::Cell),
            text(
                format_date(Some(player.registered_at.date_naive())),
                StylePreset::Cell,
            ),
        ]);
    }

    sheet.summary("TOTAL PLAYERS:", players.len());
    sheet.finish()
}

fn layout_fixture(tournament: &Tournament, matches: &[FixtureEntry]) -> SheetLayout {
    let mut sheet = SheetBuilder::new(
        "Fixture",
        format!("Fixture and Results: {}", tournament.name),
        tournament.discipline_and_season(),
        &[12.0, 10.0, 25.0, 12.0, 25.0, 20.0, 15.0, 30.0],
    );
    sheet.header(&[
        "Date", "Time", "Home Team", "Score", "Away Team", "Venue", "Status", "Notes",
    ]);

    for entry in matches {
        let game = &entry.game;
        let score = game
            .final_score()
            .map(|(home, away)| format!("{home} - {away}"))
            .unwrap_or_else(|| "-".to_string());
        sheet.row(vec![
            text(
                format_date(Some(game.scheduled_at.date_naive())),
                StylePreset::Cell,
            ),
            text(game.scheduled_at.format("%H:%M").to_string(), StylePreset::Cell),
            text(entry.home_team_name.as_str(), StylePreset::Cell),
            text(score, StylePreset::CenteredCell),
            text(entry.away_team_name.as_str(), StylePreset::Cell),
            text(game.venue.as_deref().unwrap_or("TBD"), StylePreset::Cell),
            text(game.status.as_str().to_uppercase(), StylePreset::CenteredCell),
            text(game.notes.as_deref().unwrap_or_default(), StylePreset::Cell),
        ]);
    }

    sheet.summary("TOTAL MATCHES:", matches.len());
    sheet.finish()
}

const STANDINGS_LEGEND: &str = "P=Played, W=Won, D=Drawn, L=Lost, GF=Goals For, \
                                GA=Goals Against, GD=Goal Difference, Pts=Points";

fn layout_standings(
    tournament: &Tournament,
    rows: &[StandingsRow],
    generated_at: DateTime<Utc>,
) -> SheetLayout {
    let mut sheet = SheetBuilder::new(
        "Standings",
        format!("Standings: {}", tournament.name),
        format!("Updated: {}", generated_at.format("%d/%m/%Y %H:%M")),
        &[6.0, 30.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 8.0, 10.0],
    );
    sheet.header(&["Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"]);

    for (index, row) in rows.iter().enumerate() {
        let podium = is_podium(index);
        let edge = if podium {
            StylePreset::Highlighted
        } else {
            StylePreset::CenteredCell
        };
        let counter = |value: f64| (CellValue::Number(value), StylePreset::CenteredCell, podium);

        sheet.row(vec![
            number((index + 1) as f64, edge),
            (
                CellValue::Text(row.team_name.clone()),
                StylePreset::Cell,
                podium,
            ),
            counter(f64::from(row.played)),
            counter(f64::from(row.won)),
            counter(f64::from(row.drawn)),
            counter(f64::from(row.lost)),
            counter(row.goals_for as f64),
            counter(row.goals_against as f64),
            counter(row.goal_difference as f64),
            number(f64::from(row.points), edge),
        ]);
    }

    sheet.summary("TOTAL TEAMS:", rows.len());

    sheet.blank();
    let legend_row = sheet.next_row;
    sheet.row(vec![(
        CellValue::Text("Legend:".to_string()),
        StylePreset::Cell,
        true,
    )]);
    sheet.layout.merges.push(MergedRange {
        row: legend_row,
        first_col: 1,
        last_col: 9,
        text: STANDINGS_LEGEND.to_string(),
        preset: StylePreset::Cell,
    });
    sheet.finish()
}
