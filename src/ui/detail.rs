//! Detail screen for a single user.
//!
//! Only fields present on the record are drawn; a missing company or address
//! removes the whole section rather than printing placeholders.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::{AppState, Theme};
use crate::load::LoadState;
use crate::source::UserRecord;
use crate::sys::website_href;
use crate::ui::components::{self, ErrorPanel};

pub fn render_detail(f: &mut Frame, area: Rect, app: &AppState, id: u64) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(4)])
        .split(area);

    let nav = Line::from(vec![
        Span::styled("← Back to list (b)", Style::default().fg(app.theme.link)),
        Span::styled("   Back (Esc)   Prev/next user ([ ])", Style::default().fg(app.theme.muted)),
    ]);
    f.render_widget(Paragraph::new(nav), rows[0]);

    match app.detail_state() {
        LoadState::Pending => components::render_detail_skeleton(f, rows[1], app, id),
        LoadState::Failed(err) => {
            let panel = ErrorPanel::failed(err).titled("User Not Found").with_back();
            components::render_error_panel(f, rows[1], app, &panel);
        }
        LoadState::Ready(user) => {
            let title = match user {
                Some(u) => format!("{} – User Detail", u.name),
                None => "User Detail".to_string(),
            };
            let p = Paragraph::new(detail_lines(user.as_ref(), &app.theme))
                .wrap(Wrap { trim: false })
                .block(
                    Block::default()
                        .title(title)
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(app.theme.border)),
                );
            f.render_widget(p, rows[1]);
        }
    }
}

/// Lines for the detail body. `None` is a successful empty response.
pub fn detail_lines(user: Option<&UserRecord>, theme: &Theme) -> Vec<Line<'static>> {
    let Some(user) = user else {
        return vec![Line::from(Span::styled(
            "No details were returned for this user.",
            Style::default().fg(theme.muted),
        ))];
    };

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(Span::styled(user.name.clone(), bold.fg(theme.title))),
        Line::raw(""),
    ];

    let field = |label: &str, value: &Option<String>| {
        value.as_ref().map(|v| {
            Line::from(vec![
                Span::styled(format!("{label}: "), bold),
                Span::raw(v.clone()),
            ])
        })
    };
    lines.extend(field("Username", &user.username));
    lines.extend(field("Email", &user.email));
    lines.extend(field("Phone", &user.phone));
    if let Some(site) = &user.website {
        lines.push(Line::from(vec![
            Span::styled("Website: ", bold),
            Span::styled(site.clone(), Style::default().fg(theme.link).add_modifier(Modifier::UNDERLINED)),
            Span::styled(format!("  (o: open {})", website_href(site)), Style::default().fg(theme.muted)),
        ]));
    }

    if let Some(company) = &user.company {
        let mut body = Vec::new();
        body.extend(company.name.clone().map(Line::raw));
        body.extend(company.catch_phrase.as_ref().map(|c| {
            Line::from(Span::styled(
                format!("“{c}”"),
                Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
            ))
        }));
        body.extend(company.bs.clone().map(Line::raw));
        push_section(&mut lines, "Company", body, theme);
    }

    if let Some(address) = &user.address {
        let mut body = Vec::new();
        body.extend(join_present(&[&address.street, &address.suite]).map(Line::raw));
        body.extend(join_present(&[&address.city, &address.zipcode]).map(Line::raw));
        if let Some(geo) = &address.geo {
            body.extend(join_present(&[&geo.lat, &geo.lng]).map(|g| {
                Line::from(Span::styled(format!("Geo: {g}"), Style::default().fg(theme.muted)))
            }));
        }
        push_section(&mut lines, "Address", body, theme);
    }

    lines
}

fn push_section(lines: &mut Vec<Line<'static>>, title: &str, body: Vec<Line<'static>>, theme: &Theme) {
    if body.is_empty() {
        return;
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(theme.title).add_modifier(Modifier::BOLD),
    )));
    lines.extend(body);
}

/// `"a, b"` from whichever parts are present; `None` when all are missing.
fn join_present(parts: &[&Option<String>]) -> Option<String> {
    let present: Vec<&str> = parts.iter().filter_map(|p| p.as_deref()).collect();
    (!present.is_empty()).then(|| present.join(", "))
}
