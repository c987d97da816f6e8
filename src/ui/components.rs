//! Shared UI components (status bar, panels, placeholders, overlays).
//!
//! Contains small building blocks reused by the list and detail screens.
//!
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::{AppState, InputMode, KeyAction, Route, ToastLevel};
use crate::app::keymap::format_action;
use crate::error::FetchError;

/// Contents of the panel shown instead of data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorPanel<'a> {
    pub title: &'a str,
    pub message: &'a str,
    /// Technical detail printed under the message.
    pub detail: Option<String>,
    pub retry: bool,
    pub back: bool,
}

impl<'a> ErrorPanel<'a> {
    pub const fn no_data() -> Self {
        Self {
            title: "No data available",
            message: "There's no data to display at the moment",
            detail: None,
            retry: false,
            back: false,
        }
    }

    pub fn failed(err: &'a FetchError) -> Self {
        Self {
            title: "Something went wrong",
            message: err.panel_message(),
            detail: Some(err.to_string()),
            retry: false,
            back: false,
        }
    }

    pub const fn titled(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    pub const fn with_retry(mut self) -> Self {
        self.retry = true;
        self
    }

    pub const fn with_back(mut self) -> Self {
        self.back = true;
        self
    }
}

/// Render the bottom status bar with mode, counts and source.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &mut AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
    };
    let state = match app.route() {
        Route::List => match app.current_page().map(|p| (p.matched, p.total_pages)) {
            Some((matched, pages)) => format!(
                "matched:{matched}  page:{}/{}  sort:{}",
                app.view.page_index(),
                pages.max(1),
                app.view.sort_order()
            ),
            None => "loading users".to_string(),
        },
        Route::Detail(id) => format!("user:{id}  history:{}", app.nav.depth()),
    };
    let msg = format!("mode: {mode}  {state}  source: {}", app.source_label);
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

pub fn render_error_panel(f: &mut Frame, area: Rect, app: &AppState, panel: &ErrorPanel<'_>) {
    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            panel.title.to_string(),
            Style::default().fg(app.theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(panel.message.to_string(), Style::default().fg(app.theme.text))),
    ];
    if let Some(detail) = &panel.detail {
        lines.push(Line::from(Span::styled(detail.clone(), Style::default().fg(app.theme.muted))));
    }
    let mut actions = Vec::new();
    if panel.back {
        actions.push(Span::styled("[Esc] Back", Style::default().fg(app.theme.title)));
    }
    if panel.retry {
        if !actions.is_empty() {
            actions.push(Span::raw("   "));
        }
        actions.push(Span::styled("[r] Retry", Style::default().fg(app.theme.title)));
    }
    if !actions.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(actions));
    }
    let p = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)));
    f.render_widget(p, area);
}

/// Placeholder table while the list loads.
pub fn render_table_skeleton(f: &mut Frame, area: Rect, app: &AppState, columns: usize, rows: usize) {
    let bar = Style::default().fg(app.theme.muted);
    let body = (0..rows).map(|r| {
        // Stagger bar lengths so the placeholder does not look like a grid.
        Row::new((0..columns).map(|c| Cell::from("░".repeat(8 + (r + c * 3) % 7)).style(bar)))
    });
    let header = Row::new((0..columns).map(|_| Cell::from("▒▒▒▒▒▒").style(bar)));
    let widths = vec![Constraint::Ratio(1, columns.max(1) as u32); columns];
    let table = Table::new(body, widths)
        .header(header)
        .block(Block::default().title("Loading users…").borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)))
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Placeholder body while a single user loads.
pub fn render_detail_skeleton(f: &mut Frame, area: Rect, app: &AppState, id: u64) {
    let bar = Style::default().fg(app.theme.muted);
    let widths = [24usize, 0, 30, 34, 26, 0, 12, 28, 0, 12, 32, 22];
    let lines: Vec<Line> = widths
        .iter()
        .map(|w| Line::from(Span::styled("░".repeat(*w), bar)))
        .collect();
    let p = Paragraph::new(lines).block(
        Block::default()
            .title(format!("User Detail #{id}"))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(p, area);
}

/// Stack live toasts in the top-right corner.
pub fn render_toasts(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 48u16.min(area.width);
    let mut y = area.y + 1;
    for toast in app.toasts.iter() {
        if y + 3 > area.y + area.height {
            break;
        }
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y,
            width,
            height: 3,
        };
        let color = match toast.level {
            ToastLevel::Error => app.theme.error,
            ToastLevel::Info => app.theme.title,
        };
        let p = Paragraph::new(toast.message.clone())
            .style(Style::default().fg(app.theme.text))
            .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(color)));
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
        y += 3;
    }
}

const HELP_ORDER: [(KeyAction, &str); 15] = [
    (KeyAction::MoveUp, "Select previous row"),
    (KeyAction::MoveDown, "Select next row"),
    (KeyAction::PrevPage, "Previous page"),
    (KeyAction::NextPage, "Next page"),
    (KeyAction::StartSearch, "Search name, email, website"),
    (KeyAction::CycleSort, "Cycle sort (none, A→Z, Z→A)"),
    (KeyAction::Open, "Open user"),
    (KeyAction::OpenWebsite, "Open website in browser"),
    (KeyAction::Back, "Back"),
    (KeyAction::BackToList, "Back to list"),
    (KeyAction::PrevUser, "Previous user"),
    (KeyAction::NextUser, "Next user"),
    (KeyAction::Retry, "Reload list"),
    (KeyAction::ToggleHelp, "This help"),
    (KeyAction::Quit, "Quit"),
];

/// Render the help overlay built from the live keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = (HELP_ORDER.len() as u16 + 4).min(area.height);
    let rect = centered_rect(width, height, area);

    let mut lines = Vec::with_capacity(HELP_ORDER.len() + 2);
    for (action, label) in HELP_ORDER {
        let keys = app.keymap.keys_for(action).join(", ");
        let keys = if keys.is_empty() { format!("({})", format_action(action)) } else { keys };
        lines.push(Line::from(vec![
            Span::styled(format!("{label:>30} │ "), Style::default().fg(app.theme.text)),
            Span::styled(keys, Style::default().fg(app.theme.title).add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Any key closes this window",
        Style::default().fg(app.theme.muted),
    )));

    let p = Paragraph::new(lines).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
