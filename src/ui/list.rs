use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::{AppState, InputMode};
use crate::listing::PAGE_SIZE;
use crate::load::LoadState;
use crate::ui::components::{self, ErrorPanel};

const COLUMNS: [&str; 3] = ["Name", "Email", "Website"];

pub fn render_list(f: &mut Frame, area: Rect, app: &mut AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4), Constraint::Length(1)])
        .split(area);
    let controls = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(20), Constraint::Length(22)])
        .split(rows[0]);

    render_search_bar(f, controls[0], app);
    render_sort(f, controls[1], app);

    match app.users.state() {
        LoadState::Pending => components::render_table_skeleton(f, rows[1], app, COLUMNS.len(), PAGE_SIZE),
        LoadState::Failed(err) => {
            let panel = ErrorPanel::failed(err).with_retry();
            components::render_error_panel(f, rows[1], app, &panel);
        }
        LoadState::Ready(_) => render_page(f, rows[1], rows[2], app),
    }
}

fn render_search_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let editing = app.input_mode == InputMode::Search;
    let text = app.view.search_text();
    let line = if text.is_empty() && !editing {
        Line::from(Span::styled("Search users... (/)", Style::default().fg(app.theme.muted)))
    } else if editing {
        Line::from(vec![Span::raw(text.to_string()), Span::styled("█", Style::default().fg(app.theme.highlight_fg))])
    } else {
        Line::from(text.to_string())
    };
    let border = if editing { app.theme.highlight_fg } else { app.theme.border };
    let p = Paragraph::new(line).style(Style::default().fg(app.theme.text)).block(
        Block::default().title("Search").borders(Borders::ALL).border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

fn render_sort(f: &mut Frame, area: Rect, app: &AppState) {
    let p = Paragraph::new(format!("Sort: {}", app.view.sort_order()))
        .style(Style::default().fg(app.theme.text))
        .block(Block::default().title("s").borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)));
    f.render_widget(p, area);
}

fn render_page(f: &mut Frame, table_area: Rect, pager_area: Rect, app: &mut AppState) {
    let Some(page) = app.current_page().cloned() else {
        return;
    };
    if page.rows.is_empty() {
        components::render_error_panel(f, table_area, app, &ErrorPanel::no_data().with_retry());
        return;
    }

    let selected = app.selected_row.min(page.rows.len() - 1);
    let dash = |v: Option<&str>| v.filter(|s| !s.is_empty()).unwrap_or("-").to_string();
    let rows = page.rows.iter().enumerate().map(|(i, u)| {
        let style = if i == selected {
            Style::default().fg(app.theme.highlight_fg).bg(app.theme.highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(dash(Some(u.name.as_str()))),
            Cell::from(dash(u.email.as_deref())),
            Cell::from(dash(u.website.as_deref())).style(Style::default().fg(app.theme.link).add_modifier(Modifier::UNDERLINED)),
        ])
        .style(style)
    });

    let widths = [Constraint::Percentage(34), Constraint::Percentage(38), Constraint::Percentage(28)];
    let header = Row::new(COLUMNS.to_vec()).style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));
    let title = format!("Users ({} of {})", page.matched, app.users.state().ready().map_or(0, Vec::len));
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().title(title).borders(Borders::ALL).border_style(Style::default().fg(app.theme.border)))
        .column_spacing(1);
    f.render_widget(table, table_area);

    if page.total_pages > 1 {
        render_pager(f, pager_area, app, app.view.page_index(), page.total_pages);
    }
}

fn render_pager(f: &mut Frame, area: Rect, app: &AppState, page: usize, total: usize) {
    let enabled = Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(app.theme.muted);
    let line = Line::from(vec![
        Span::styled("◀ Prev", if page > 1 { enabled } else { disabled }),
        Span::styled(format!("   Page {page} of {total}   "), Style::default().fg(app.theme.text)),
        Span::styled("Next ▶", if page < total { enabled } else { disabled }),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}
