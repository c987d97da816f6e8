pub mod components;
pub mod detail;
pub mod list;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, Route};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let area = f.area();
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(area);

    let crumb = match app.route() {
        Route::List => "User List".to_string(),
        Route::Detail(id) => format!("User List › User #{id}"),
    };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(crumb, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        Span::styled("   ?: help  q: quit", Style::default().fg(app.theme.muted)),
    ]))
    .block(
        Block::default()
            .title("user-directory")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(header, root[0]);

    match app.route() {
        Route::List => list::render_list(f, root[1], app),
        Route::Detail(id) => detail::render_detail(f, root[1], app, id),
    }

    components::render_status_bar(f, root[2], app);
    components::render_toasts(f, area, app);

    if app.show_help {
        components::render_help_modal(f, area, app);
    }
}
