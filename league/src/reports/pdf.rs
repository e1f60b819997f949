//! Flowing PDF renderer.
//!
//! Layout runs first and produces a [`FlowDocument`]: a list of pages, each
//! holding positioned text runs and rules with `y` measured downward from the
//! top edge. Encoding then walks that model once with `pdf-writer`, flipping
//! coordinates into PDF user space. Only the two standard Helvetica faces are
//! used, so no font embedding is needed.

use std::mem;

use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use pdf_writer::{Content, Finish, Name, Pdf, Rect, Ref, Str, TextStr};

use super::errors::RenderError;
use super::style::{StylePreset, is_podium};
use super::{NOT_AVAILABLE, ReportData, ReportFormat, ReportRenderer, format_date};
use crate::standings::StandingsRow;
use crate::tournament::{FixtureEntry, Player, TeamProfile, TeamSummary, Tournament};

/// A4 width in points
pub const A4_WIDTH: f32 = 595.28;

/// A4 height in points
pub const A4_HEIGHT: f32 = 841.89;

/// Margin on every side
pub const MARGIN: f32 = 50.0;

/// Default lowest point content may reach before a page break
pub const DEFAULT_CONTENT_BOTTOM: f32 = 700.0;

const TITLE_SIZE: f32 = 20.0;
const SUBTITLE_SIZE: f32 = 12.0;
const SECTION_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const TABLE_SIZE: f32 = 9.0;
const DATE_SIZE: f32 = 11.0;
const SMALL_SIZE: f32 = 8.0;
const LEADING: f32 = 1.4;

const REGULAR_FONT: Name<'static> = Name(b"F1");
const BOLD_FONT: Name<'static> = Name(b"F2");

/// Page geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowConfig {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub content_bottom: f32,
}

impl FlowConfig {
    /// A4 geometry with a custom content bottom
    ///
    /// # Errors
    ///
    /// * `RenderError::Layout` - `content_bottom` is not strictly between the
    ///   top margin and the footer line
    pub fn with_content_bottom(content_bottom: f32) -> Result<Self, RenderError> {
        let config = Self {
            content_bottom,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        let in_range = self.content_bottom.is_finite()
            && self.content_bottom > self.margin
            && self.content_bottom < self.footer_y();
        if in_range {
            Ok(())
        } else {
            Err(RenderError::Layout(format!(
                "content bottom {} must lie between {} and {}",
                self.content_bottom,
                self.margin,
                self.footer_y()
            )))
        }
    }

    /// Top of the footer line
    pub fn footer_y(&self) -> f32 {
        self.page_height - self.margin
    }

    fn right_edge(&self) -> f32 {
        self.page_width - self.margin
    }

    fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: MARGIN,
            content_bottom: DEFAULT_CONTENT_BOTTOM,
        }
    }
}

/// Positioned text; `y` is the baseline, measured from the top edge
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub bold: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Text(TextRun),
    /// Horizontal rule
    Rule { x1: f32, x2: f32, y: f32 },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub items: Vec<Item>,
}

impl Page {
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.items.iter().filter_map(|item| match item {
            Item::Text(run) => Some(run),
            Item::Rule { .. } => None,
        })
    }
}

/// Complete page model of one report
#[derive(Debug, Clone, PartialEq)]
pub struct FlowDocument {
    pub title: String,
    pub pages: Vec<Page>,
}

impl FlowDocument {
    /// All text runs in page order
    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(Page::runs)
    }
}

/// Column of a fixed-position table; `width` truncates overlong text
#[derive(Debug, Clone, Copy)]
struct Column {
    x: f32,
    width: Option<f32>,
}

const fn col(x: f32, width: Option<f32>) -> Column {
    Column { x, width }
}

const TEAM_COLUMNS: [Column; 4] = [
    col(50.0, None),
    col(150.0, Some(140.0)),
    col(300.0, Some(110.0)),
    col(420.0, None),
];

const ROSTER_COLUMNS: [Column; 5] = [
    col(50.0, None),
    col(90.0, Some(150.0)),
    col(250.0, None),
    col(400.0, Some(70.0)),
    col(480.0, None),
];

const STANDINGS_COLUMNS: [Column; 10] = [
    col(50.0, None),
    col(80.0, Some(160.0)),
    col(250.0, None),
    col(290.0, None),
    col(330.0, None),
    col(370.0, None),
    col(410.0, None),
    col(450.0, None),
    col(490.0, None),
    col(530.0, None),
];

/// Vertical cursor over a growing list of pages
struct Flow<'a> {
    config: &'a FlowConfig,
    pages: Vec<Page>,
    current: Page,
    y: f32,
}

fn line_height(size: f32) -> f32 {
    size * LEADING
}

impl<'a> Flow<'a> {
    fn new(config: &'a FlowConfig) -> Self {
        Self {
            config,
            pages: Vec::new(),
            current: Page::default(),
            y: config.margin,
        }
    }

    /// Start a new page unless `height` still fits above the content bottom
    fn reserve(&mut self, height: f32) {
        if self.y + height > self.config.content_bottom && !self.current.items.is_empty() {
            self.pages.push(mem::take(&mut self.current));
            self.y = self.config.margin;
        }
    }

    fn gap(&mut self, amount: f32) {
        self.y += amount;
    }

    fn push_text(&mut self, x: f32, size: f32, bold: bool, text: String) {
        self.current.items.push(Item::Text(TextRun {
            x,
            y: self.y + size,
            size,
            bold,
            text,
        }));
    }

    fn line(&mut self, size: f32, preset: StylePreset, text: impl Into<String>) {
        let bold = preset.style().bold;
        let height = line_height(size);
        self.reserve(height);
        let text = fit(&text.into(), self.config.content_width(), size, bold);
        self.push_text(self.config.margin, size, bold, text);
        self.y += height;
    }

    fn centered(&mut self, size: f32, preset: StylePreset, text: &str) {
        let bold = preset.style().bold;
        let height = line_height(size);
        self.reserve(height);
        let text = fit(text, self.config.content_width(), size, bold);
        let x = (self.config.page_width - text_width(&text, size, bold)) / 2.0;
        self.push_text(x, size, bold, text);
        self.y += height;
    }

    fn row(&mut self, columns: &[Column], values: &[String], preset: StylePreset) {
        let bold = preset.style().bold;
        let height = line_height(TABLE_SIZE);
        self.reserve(height);
        for (column, value) in columns.iter().zip(values) {
            let text = match column.width {
                Some(width) => fit(value, width, TABLE_SIZE, bold),
                None => value.clone(),
            };
            self.push_text(column.x, TABLE_SIZE, bold, text);
        }
        self.y += height;
    }

    fn rule(&mut self) {
        self.reserve(6.0);
        self.current.items.push(Item::Rule {
            x1: self.config.margin,
            x2: self.config.right_edge(),
            y: self.y + 2.0,
        });
        self.y += 6.0;
    }

    fn heading(&mut self, title: &str, subtitle: &str) {
        self.centered(TITLE_SIZE, StylePreset::Heading, title);
        self.gap(4.0);
        self.centered(SUBTITLE_SIZE, StylePreset::Cell, subtitle);
        self.gap(4.0);
        self.rule();
        self.gap(12.0);
    }

    fn metadata(&mut self, label: &str, lines: &[String]) {
        self.line(BODY_SIZE, StylePreset::Subheading, label);
        self.gap(2.0);
        for text in lines {
            self.line(BODY_SIZE, StylePreset::Cell, text.as_str());
        }
        self.gap(BODY_SIZE);
    }

    fn table_header(&mut self, columns: &[Column], labels: &[&str]) {
        let labels: Vec<String> = labels.iter().map(|l| l.to_string()).collect();
        self.row(columns, &labels, StylePreset::Subheading);
        self.rule();
        self.gap(4.0);
    }

    /// Close the last page and stamp the footer on every page
    fn finish(mut self, footer: &str) -> Vec<Page> {
        if !self.current.items.is_empty() || self.pages.is_empty() {
            self.pages.push(mem::take(&mut self.current));
        }

        let footer_text = fit(footer, self.config.content_width(), SMALL_SIZE, false);
        let x = (self.config.page_width - text_width(&footer_text, SMALL_SIZE, false)) / 2.0;
        let y = self.config.footer_y() + SMALL_SIZE;
        for page in &mut self.pages {
            page.items.push(Item::Text(TextRun {
                x,
                y,
                size: SMALL_SIZE,
                bold: false,
                text: footer_text.clone(),
            }));
        }
        self.pages
    }
}

/// Renders reports as paginated A4 PDF documents
#[derive(Debug, Clone, Default)]
pub struct FlowDocumentRenderer {
    config: FlowConfig,
}

impl FlowDocumentRenderer {
    pub fn new(config: FlowConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FlowConfig {
        &self.config
    }

    /// Build the page model without encoding it
    pub fn layout(
        &self,
        data: &ReportData,
        generated_at: DateTime<Utc>,
    ) -> Result<FlowDocument, RenderError> {
        self.config.validate()?;

        let mut flow = Flow::new(&self.config);
        let title = match data {
            ReportData::Teams { tournament, teams } => layout_teams(&mut flow, tournament, teams),
            ReportData::Roster { profile, players } => {
                layout_roster(&mut flow, profile, players, generated_at.date_naive())
            }
            ReportData::Fixture {
                tournament,
                matches,
            } => layout_fixture(&mut flow, tournament, matches),
            ReportData::Standings { tournament, rows } => {
                layout_standings(&mut flow, tournament, rows, generated_at.date_naive())
            }
        };

        let footer = format!(
            "Generated at {}",
            generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        );
        Ok(FlowDocument {
            title,
            pages: flow.finish(&footer),
        })
    }

    /// Serialize a page model into PDF bytes
    pub fn encode(&self, document: &FlowDocument) -> Vec<u8> {
        let mut alloc = Ref::new(1);
        let catalog_id = alloc.bump();
        let tree_id = alloc.bump();
        let regular_id = alloc.bump();
        let bold_id = alloc.bump();
        let info_id = alloc.bump();
        let page_ids: Vec<(Ref, Ref)> = document
            .pages
            .iter()
            .map(|_| (alloc.bump(), alloc.bump()))
            .collect();

        let mut pdf = Pdf::new();
        pdf.catalog(catalog_id).pages(tree_id);
        pdf.pages(tree_id)
            .kids(page_ids.iter().map(|(page_id, _)| *page_id))
            .count(page_ids.len() as i32);
        pdf.type1_font(regular_id)
            .base_font(Name(b"Helvetica"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
        pdf.type1_font(bold_id)
            .base_font(Name(b"Helvetica-Bold"))
            .encoding_predefined(Name(b"WinAnsiEncoding"));

        let media_box = Rect::new(0.0, 0.0, self.config.page_width, self.config.page_height);
        for (page, (page_id, content_id)) in document.pages.iter().zip(&page_ids) {
            let mut writer = pdf.page(*page_id);
            writer.media_box(media_box);
            writer.parent(tree_id);
            writer.contents(*content_id);
            writer
                .resources()
                .fonts()
                .pair(REGULAR_FONT, regular_id)
                .pair(BOLD_FONT, bold_id);
            writer.finish();

            let content = self.page_content(page);
            pdf.stream(*content_id, &content);
        }

        pdf.document_info(info_id)
            .title(TextStr(&document.title))
            .creator(TextStr("league"));

        pdf.finish()
    }

    fn page_content(&self, page: &Page) -> Vec<u8> {
        let height = self.config.page_height;
        let mut content = Content::new();
        for item in &page.items {
            match item {
                Item::Text(run) => {
                    let bytes = win_ansi(&run.text);
                    let font = if run.bold { BOLD_FONT } else { REGULAR_FONT };
                    content.begin_text();
                    content.set_font(font, run.size);
                    content.next_line(run.x, height - run.y);
                    content.show(Str(&bytes));
                    content.end_text();
                }
                Item::Rule { x1, x2, y } => {
                    content.set_line_width(0.75);
                    content.move_to(*x1, height - y);
                    content.line_to(*x2, height - y);
                    content.stroke();
                }
            }
        }
        content.finish()
    }
}

impl ReportRenderer for FlowDocumentRenderer {
    fn format(&self) -> ReportFormat {
        ReportFormat::Pdf
    }

    fn render(&self, data: &ReportData, generated_at: DateTime<Utc>) -> Result<Vec<u8>, RenderError> {
        let document = self.layout(data, generated_at)?;
        Ok(self.encode(&document))
    }
}

// ============================================================================
// Report layouts
// ============================================================================

fn layout_teams(flow: &mut Flow<'_>, tournament: &Tournament, teams: &[TeamSummary]) -> String {
    let title = format!("Teams of Tournament: {}", tournament.name);
    flow.heading(&title, &tournament.discipline_and_season());
    flow.metadata(
        "Tournament Information:",
        &[
            format!("Status: {}", tournament.status),
            format!("Start Date: {}", format_date(tournament.start_date)),
            format!("End Date: {}", format_date(tournament.end_date)),
            format!("Total Teams: {}", teams.len()),
        ],
    );

    flow.line(SECTION_SIZE, StylePreset::Subheading, "Team List:");
    flow.gap(4.0);
    flow.table_header(&TEAM_COLUMNS, &["No.", "Name", "Representative", "Players"]);
    for (index, summary) in teams.iter().enumerate() {
        let values = [
            (index + 1).to_string(),
            summary.team.name.clone(),
            or_not_available(summary.team.representative.as_deref()),
            summary.player_count.to_string(),
        ];
        flow.row(&TEAM_COLUMNS, &values, StylePreset::Cell);
    }
    title
}

fn layout_roster(
    flow: &mut Flow<'_>,
    profile: &TeamProfile,
    players: &[Player],
    today: NaiveDate,
) -> String {
    let title = format!("Team Roster: {}", profile.team.name);
    flow.heading(&title, &format!("Tournament: {}", profile.tournament_name));
    flow.metadata(
        "Team Information:",
        &[
            format!(
                "Representative: {}",
                or_not_available(profile.team.representative.as_deref())
            ),
            format!(
                "Phone: {}",
                or_not_available(profile.team.representative_phone.as_deref())
            ),
            format!("Total Players: {}", players.len()),
        ],
    );

    flow.line(SECTION_SIZE, StylePreset::Subheading, "Player List:");
    flow.gap(4.0);
    flow.table_header(
        &ROSTER_COLUMNS,
        &["No.", "Name", "Birth Date", "Position", "Age"],
    );
    for player in players {
        let values = [
            player.shirt_number.to_string(),
            player.full_name(),
            format_date(player.birth_date),
            or_not_available(player.position.as_deref()),
            player
                .age_on(today)
                .map(|age| age.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ];
        flow.row(&ROSTER_COLUMNS, &values, StylePreset::Cell);
    }
    title
}

/// Group matches by calendar date, keeping first-appearance order
pub fn group_by_date(matches: &[FixtureEntry]) -> IndexMap<NaiveDate, Vec<&FixtureEntry>> {
    let mut groups: IndexMap<NaiveDate, Vec<&FixtureEntry>> = IndexMap::new();
    for entry in matches {
        groups
            .entry(entry.game.scheduled_at.date_naive())
            .or_default()
            .push(entry);
    }
    groups
}

fn layout_fixture(flow: &mut Flow<'_>, tournament: &Tournament, matches: &[FixtureEntry]) -> String {
    let title = format!("Fixture and Results: {}", tournament.name);
    flow.heading(&title, &tournament.discipline_and_season());
    flow.line(
        BODY_SIZE,
        StylePreset::Cell,
        format!("Total Matches: {}", matches.len()),
    );
    flow.gap(BODY_SIZE);

    let match_height = 3.0 * line_height(TABLE_SIZE);
    for (date, entries) in group_by_date(matches) {
        // Keep the date heading with its first match
        flow.reserve(line_height(DATE_SIZE) + match_height);
        flow.line(
            DATE_SIZE,
            StylePreset::Subheading,
            date.format("%A, %B %-d, %Y").to_string(),
        );
        flow.gap(3.0);

        for entry in entries {
            flow.reserve(match_height);
            flow.line(
                TABLE_SIZE,
                StylePreset::Cell,
                format!(
                    "{} - {}",
                    entry.game.scheduled_at.format("%H:%M"),
                    entry.game.venue.as_deref().unwrap_or("TBD")
                ),
            );
            flow.line(
                TABLE_SIZE,
                StylePreset::Cell,
                format!(
                    "    {}  vs  {}",
                    entry.home_team_name, entry.away_team_name
                ),
            );
            flow.line(
                TABLE_SIZE,
                StylePreset::Cell,
                format!("    Result: {}", entry.game.result_label()),
            );
            flow.gap(6.0);
        }
        flow.gap(6.0);
    }
    title
}

fn layout_standings(
    flow: &mut Flow<'_>,
    tournament: &Tournament,
    rows: &[StandingsRow],
    today: NaiveDate,
) -> String {
    let title = format!("Standings: {}", tournament.name);
    flow.heading(
        &title,
        &format!(
            "{} - Updated: {}",
            tournament.discipline,
            today.format("%d/%m/%Y")
        ),
    );
    flow.table_header(
        &STANDINGS_COLUMNS,
        &["Pos", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts"],
    );

    for (index, row) in rows.iter().enumerate() {
        let preset = if is_podium(index) {
            StylePreset::Highlighted
        } else {
            StylePreset::Cell
        };
        let values = [
            (index + 1).to_string(),
            row.team_name.clone(),
            row.played.to_string(),
            row.won.to_string(),
            row.drawn.to_string(),
            row.lost.to_string(),
            row.goals_for.to_string(),
            row.goals_against.to_string(),
            row.goal_difference.to_string(),
            row.points.to_string(),
        ];
        flow.row(&STANDINGS_COLUMNS, &values, preset);
    }

    flow.gap(BODY_SIZE);
    flow.line(
        SMALL_SIZE,
        StylePreset::Cell,
        "P: Played | W: Won | D: Drawn | L: Lost",
    );
    flow.line(
        SMALL_SIZE,
        StylePreset::Cell,
        "GF: Goals For | GA: Goals Against | GD: Goal Difference | Pts: Points",
    );
    title
}

fn or_not_available(value: Option<&str>) -> String {
    value.unwrap_or(NOT_AVAILABLE).to_string()
}

// ============================================================================
// Text metrics and encoding
// ============================================================================

/// Helvetica advance widths for ASCII 32..=126, in 1/1000 em
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // '0'..'?'
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // '@'..'O'
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // 'P'..'_'
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // '`'..'o'
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // 'p'..'~'
];

const DEFAULT_WIDTH: u16 = 556;

/// Bold faces run slightly wider than the regular metrics
const BOLD_FACTOR: f32 = 1.06;

fn char_width(c: char) -> u16 {
    match c as u32 {
        code @ 32..=126 => HELVETICA_WIDTHS[(code - 32) as usize],
        _ => DEFAULT_WIDTH,
    }
}

/// Approximate rendered width in points
pub fn text_width(text: &str, size: f32, bold: bool) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    let width = units as f32 * size / 1000.0;
    if bold { width * BOLD_FACTOR } else { width }
}

/// Truncate with an ellipsis so the text fits in `max_width`
fn fit(text: &str, max_width: f32, size: f32, bold: bool) -> String {
    if text_width(text, size, bold) <= max_width {
        return text.to_string();
    }

    let mut truncated: String = text.to_string();
    while !truncated.is_empty() && text_width(&format!("{truncated}..."), size, bold) > max_width {
        truncated.pop();
    }
    format!("{}...", truncated.trim_end())
}

/// Encode text for a WinAnsi Type 1 font; unmappable characters become `?`
pub fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '\t' | '\n' | '\r' => b' ',
            '€' => 0x80,
            '‚' => 0x82,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}
