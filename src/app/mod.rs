//! Application state types and entry glue.
//!
//! [`AppState`] owns both screens' state. Key handling mutates it and returns
//! [`Effect`]s (fetches, opening a link, quitting) that the event loop in
//! [`update`] carries out; fetch results come back as [`FetchEvent`]s.
//!
pub mod keymap;
pub mod nav;
pub mod theme;
pub mod toast;
pub mod update;

use crate::error::FetchError;
use crate::listing::{PageMemo, PageView, SortOrder, ViewState};
use crate::load::{LoadState, Query, Ticket};
use crate::source::UserRecord;
use crate::sys;

pub use keymap::{KeyAction, Keymap};
pub use nav::{Navigator, Route};
pub use theme::Theme;
pub use toast::{Toast, ToastLevel, Toasts};

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Printable keys edit the list search text.
    Search,
}

/// Side effect requested by a state transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    LoadUsers(Ticket),
    LoadUser(Ticket, u64),
    OpenUrl(String),
    Quit,
}

/// Completion of a record-source call started by an [`Effect`].
#[derive(Clone, Debug)]
pub enum FetchEvent {
    Users {
        ticket: Ticket,
        result: Result<Vec<UserRecord>, FetchError>,
    },
    User {
        ticket: Ticket,
        id: u64,
        result: Result<Option<UserRecord>, FetchError>,
    },
}

pub struct AppState {
    pub nav: Navigator,
    pub input_mode: InputMode,
    pub users: Query<Vec<UserRecord>>,
    pub view: ViewState,
    pub memo: PageMemo,
    /// Row index within the current page.
    pub selected_row: usize,
    pub detail: Query<Option<UserRecord>>,
    pub toasts: Toasts,
    pub theme: Theme,
    pub keymap: Keymap,
    pub show_help: bool,
    /// Where records come from, shown in the status bar.
    pub source_label: String,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap, sort: SortOrder, source_label: impl Into<String>) -> Self {
        Self {
            nav: Navigator::default(),
            input_mode: InputMode::Normal,
            users: Query::new(),
            view: ViewState::new(sort),
            memo: PageMemo::default(),
            selected_row: 0,
            detail: Query::new(),
            toasts: Toasts::default(),
            theme,
            keymap,
            show_help: false,
            source_label: source_label.into(),
        }
    }

    /// Initial fetches. Starting on a user makes that detail screen the first
    /// history entry.
    pub fn boot(&mut self, start_user: Option<u64>) -> Vec<Effect> {
        let mut effects = vec![self.reload_users()];
        if let Some(id) = start_user {
            self.nav = Navigator::new(Route::Detail(id));
            effects.push(self.mount_detail(id));
        }
        effects
    }

    pub fn route(&self) -> Route {
        self.nav.current()
    }

    /// Full reload of the list; re-enters Pending on the first page.
    pub fn reload_users(&mut self) -> Effect {
        self.selected_row = 0;
        self.view.go_to_page(1, 0);
        let ticket = self.users.begin();
        tracing::info!(ticket = ticket.0, "loading users");
        Effect::LoadUsers(ticket)
    }

    fn mount_detail(&mut self, id: u64) -> Effect {
        let ticket = self.detail.begin();
        tracing::info!(ticket = ticket.0, id, "loading user");
        Effect::LoadUser(ticket, id)
    }

    /// Make `route` the mounted screen after a history move.
    fn enter_route(&mut self, route: Route) -> Option<Effect> {
        self.input_mode = InputMode::Normal;
        match route {
            Route::Detail(id) => Some(self.mount_detail(id)),
            Route::List => {
                self.detail.abandon();
                None
            }
        }
    }

    pub fn open_detail(&mut self, id: u64) -> Effect {
        self.nav.push(Route::Detail(id));
        self.input_mode = InputMode::Normal;
        self.mount_detail(id)
    }

    /// Move the detail screen to a neighbouring id, replacing the history entry.
    pub fn step_user(&mut self, delta: i64) -> Option<Effect> {
        let Route::Detail(id) = self.route() else {
            return None;
        };
        let next = id.checked_add_signed(delta).filter(|n| *n >= 1)?;
        self.nav.replace(Route::Detail(next));
        Some(self.mount_detail(next))
    }

    pub fn go_back(&mut self) -> Option<Effect> {
        let route = self.nav.back()?;
        tracing::debug!(?route, "history back");
        self.enter_route(route)
    }

    pub fn back_to_list(&mut self) -> Option<Effect> {
        if self.route() == Route::List {
            return None;
        }
        self.nav.push(Route::List);
        self.enter_route(Route::List)
    }

    /// Page for the current view state, if the list is loaded.
    pub fn current_page(&mut self) -> Option<&PageView> {
        let records = self.users.state().ready()?;
        Some(self.memo.get(self.users.generation(), records, &self.view))
    }

    pub fn total_pages(&mut self) -> usize {
        self.current_page().map_or(0, |p| p.total_pages)
    }

    pub fn selected_user(&mut self) -> Option<UserRecord> {
        let row = self.selected_row;
        self.current_page()?.rows.get(row).cloned()
    }

    pub fn move_selection(&mut self, delta: isize) {
        let rows = self.current_page().map_or(0, |p| p.rows.len());
        if rows == 0 {
            self.selected_row = 0;
            return;
        }
        self.selected_row = self
            .selected_row
            .saturating_add_signed(delta)
            .min(rows - 1);
    }

    pub fn next_page(&mut self) {
        let total = self.total_pages();
        if self.view.next_page(total) {
            self.selected_row = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.view.prev_page() {
            self.selected_row = 0;
        }
    }

    pub fn cycle_sort(&mut self) {
        self.view.cycle_sort();
        self.selected_row = 0;
    }

    pub fn search_push(&mut self, c: char) {
        self.view.push_search_char(c);
        self.selected_row = 0;
    }

    pub fn search_pop(&mut self) {
        self.view.pop_search_char();
        self.selected_row = 0;
    }

    /// Link for the selected row on the list, or the shown user on the detail screen.
    pub fn website_link(&mut self) -> Option<String> {
        let website = match self.route() {
            Route::List => self.selected_user()?.website,
            Route::Detail(_) => self.detail.state().ready()?.as_ref()?.website.clone(),
        }?;
        Some(sys::website_href(&website))
    }

    /// Retry is offered by the list screen whenever it is not already loading.
    pub fn retry(&mut self) -> Option<Effect> {
        (self.route() == Route::List && !self.users.state().is_pending()).then(|| self.reload_users())
    }

    /// Apply a finished fetch. Every failure raises a toast, even when the
    /// response is stale and does not touch the screen.
    pub fn apply(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Users { ticket, result } => {
                if let Err(err) = &result {
                    tracing::warn!(%err, "user list failed");
                    self.toasts.error(err.toast_message());
                }
                if self.users.settle(ticket, result) {
                    let rows = self.current_page().map_or(0, |p| p.rows.len());
                    self.selected_row = self.selected_row.min(rows.saturating_sub(1));
                }
            }
            FetchEvent::User { ticket, id, result } => {
                if let Err(err) = &result {
                    tracing::warn!(%err, id, "user detail failed");
                    self.toasts.error(err.toast_message());
                }
                if !self.detail.settle(ticket, result) {
                    tracing::debug!(id, "ignored response for superseded user");
                }
            }
        }
    }

    /// Detail record for the mounted detail screen.
    pub fn detail_state(&self) -> &LoadState<Option<UserRecord>> {
        self.detail.state()
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
