use std::io::Stdout;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::{AppState, Effect, FetchEvent, InputMode, KeyAction, Keymap, Route, Theme};
use crate::config::Args;
use crate::load::Ticket;
use crate::source::{HttpSource, RecordSource};
use crate::sys;
use crate::ui;

/// Runs record-source calls on worker threads and reports back over a channel.
#[derive(Clone)]
pub struct Fetcher {
    source: Arc<dyn RecordSource>,
    tx: Sender<FetchEvent>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn RecordSource>) -> (Self, Receiver<FetchEvent>) {
        let (tx, rx) = mpsc::channel();
        (Self { source, tx }, rx)
    }

    fn spawn(&self, job: impl FnOnce(&dyn RecordSource) -> FetchEvent + Send + 'static) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        thread::spawn(move || {
            // A closed channel means the app is gone; the result is dropped.
            let _ = tx.send(job(source.as_ref()));
        });
    }

    pub fn load_users(&self, ticket: Ticket) {
        self.spawn(move |source| FetchEvent::Users {
            ticket,
            result: source.fetch_all(),
        });
    }

    pub fn load_user(&self, ticket: Ticket, id: u64) {
        self.spawn(move |source| FetchEvent::User {
            ticket,
            id,
            result: source.fetch_one(id),
        });
    }
}

/// Carry out one effect. `Break` means the user asked to quit.
pub fn perform(app: &mut AppState, fetcher: &Fetcher, effect: Effect) -> ControlFlow<()> {
    match effect {
        Effect::LoadUsers(ticket) => fetcher.load_users(ticket),
        Effect::LoadUser(ticket, id) => fetcher.load_user(ticket, id),
        Effect::OpenUrl(url) => {
            match sys::open_in_browser(&url) {
                Ok(()) => app.toasts.info(format!("Opened {url}")),
                Err(err) => {
                    tracing::warn!(%err, "open link failed");
                    app.toasts.error(err.to_string());
                }
            }
        }
        Effect::Quit => return ControlFlow::Break(()),
    }
    ControlFlow::Continue(())
}

/// Translate a key press into state changes and at most one effect.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Option<Effect> {
    if app.show_help {
        app.show_help = false;
        return None;
    }
    match app.input_mode {
        InputMode::Search => {
            match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Some(Effect::Quit);
                }
                KeyCode::Enter | KeyCode::Esc => app.input_mode = InputMode::Normal,
                KeyCode::Backspace => app.search_pop(),
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.search_push(c)
                }
                _ => {}
            }
            None
        }
        InputMode::Normal => {
            let action = app.keymap.resolve(&key)?;
            handle_action(app, action)
        }
    }
}

fn handle_action(app: &mut AppState, action: KeyAction) -> Option<Effect> {
    let on_list = app.route() == Route::List;
    match action {
        KeyAction::Quit => Some(Effect::Quit),
        KeyAction::ToggleHelp => {
            app.show_help = true;
            None
        }
        KeyAction::StartSearch if on_list => {
            app.input_mode = InputMode::Search;
            None
        }
        KeyAction::CycleSort if on_list => {
            app.cycle_sort();
            None
        }
        KeyAction::MoveUp if on_list => {
            app.move_selection(-1);
            None
        }
        KeyAction::MoveDown if on_list => {
            app.move_selection(1);
            None
        }
        KeyAction::PrevPage if on_list => {
            app.prev_page();
            None
        }
        KeyAction::NextPage if on_list => {
            app.next_page();
            None
        }
        KeyAction::Open if on_list => {
            let id = app.selected_user()?.id;
            Some(app.open_detail(id))
        }
        KeyAction::Back => app.go_back(),
        KeyAction::BackToList => app.back_to_list(),
        KeyAction::Retry => app.retry(),
        KeyAction::OpenWebsite => app.website_link().map(Effect::OpenUrl),
        KeyAction::PrevUser => app.step_user(-1),
        KeyAction::NextUser => app.step_user(1),
        _ => None,
    }
}

pub fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, args: &Args) -> Result<()> {
    let source = HttpSource::new(args.api_url.clone(), args.timeout())?;
    let label = source.base_url().to_string();
    let theme = Theme::load_or_init(&args.theme_path());
    let keymap = Keymap::load_or_init(&args.keybinds_path());
    let mut app = AppState::new(theme, keymap, args.sort, label);
    let (fetcher, events) = Fetcher::new(Arc::new(source));

    for effect in app.boot(args.user) {
        let _ = perform(&mut app, &fetcher, effect);
    }

    loop {
        while let Ok(done) = events.try_recv() {
            app.apply(done);
        }
        app.toasts.prune(Instant::now());

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(effect) = handle_key(&mut app, key) {
                    if perform(&mut app, &fetcher, effect).is_break() {
                        break;
                    }
                }
            }
        }
    }
    tracing::info!("exiting");
    Ok(())
}
