//! Load-state projection for asynchronous record-source calls.
//!
//! [`LoadState`] is the only thing the screens look at. [`Query`] owns one and
//! applies the last-issued-request-wins policy via [`Ticket`]s.

use crate::error::FetchError;

/// Generation number of an issued request.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(pub u64);

/// Render state of one fetch lifecycle. Exactly one variant is active.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Pending,
    Ready(T),
    Failed(FetchError),
}

impl<T> LoadState<T> {
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    pub const fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(data) => Some(data),
            Self::Pending | Self::Failed(_) => None,
        }
    }

    pub const fn error(&self) -> Option<&FetchError> {
        match self {
            Self::Failed(err) => Some(err),
            Self::Pending | Self::Ready(_) => None,
        }
    }
}

/// The loose `{is_loading, is_error, data}` triple reported by query-style
/// data sources.
///
/// This is the adapter for sources that report status flags instead of a
/// `Result`. [`Query`] settles `Result`s directly and never goes through it;
/// both end in the same [`LoadState`] with the same precedence.
#[derive(Clone, Debug, PartialEq)]
pub struct FetchStatus<T> {
    pub is_loading: bool,
    pub error: Option<FetchError>,
    pub data: Option<T>,
}

impl<T> FetchStatus<T> {
    pub const fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Loading wins over everything, then error, then whatever data is
    /// present. `Ready(None)` is a legitimate outcome.
    pub fn project(self) -> LoadState<Option<T>> {
        if self.is_loading {
            return LoadState::Pending;
        }
        match self.error {
            Some(err) => LoadState::Failed(err),
            None => LoadState::Ready(self.data),
        }
    }
}

impl<T> From<FetchStatus<T>> for LoadState<Option<T>> {
    fn from(status: FetchStatus<T>) -> Self {
        status.project()
    }
}

/// A fetch slot: current state plus the generation of the latest request.
#[derive(Debug)]
pub struct Query<T> {
    state: LoadState<T>,
    latest: Ticket,
}

impl<T> Default for Query<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Query<T> {
    pub const fn new() -> Self {
        Self {
            state: LoadState::Pending,
            latest: Ticket(0),
        }
    }

    pub const fn state(&self) -> &LoadState<T> {
        &self.state
    }

    /// Generation of the most recent request.
    pub const fn generation(&self) -> Ticket {
        self.latest
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket == self.latest
    }

    /// Issue a new request: supersedes anything in flight and re-enters Pending.
    pub fn begin(&mut self) -> Ticket {
        self.latest = Ticket(self.latest.0 + 1);
        self.state = LoadState::Pending;
        self.latest
    }

    /// Forget in-flight requests without issuing a new one.
    pub fn abandon(&mut self) {
        self.latest = Ticket(self.latest.0 + 1);
        self.state = LoadState::Pending;
    }

    /// Apply a response. Returns `false` and leaves the state untouched when
    /// the ticket has been superseded.
    pub fn settle(&mut self, ticket: Ticket, result: Result<T, FetchError>) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!(ticket = ticket.0, latest = self.latest.0, "discarding stale response");
            return false;
        }
        self.state = match result {
            Ok(data) => LoadState::Ready(data),
            Err(err) => LoadState::Failed(err),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> FetchError {
        FetchError::Transport("refused".into())
    }

    #[test]
    fn loading_takes_precedence() {
        let status = FetchStatus {
            is_loading: true,
            error: Some(transport()),
            data: Some(3),
        };
        assert_eq!(status.project(), LoadState::Pending);
    }

    #[test]
    fn error_beats_stale_data() {
        let status = FetchStatus {
            is_loading: false,
            error: Some(transport()),
            data: Some(3),
        };
        assert!(status.is_error());
        assert_eq!(LoadState::from(status), LoadState::Failed(transport()));
    }

    #[test]
    fn ready_without_data_is_its_own_state() {
        let status: FetchStatus<u8> = FetchStatus {
            is_loading: false,
            error: None,
            data: None,
        };
        let state = status.project();
        assert_eq!(state, LoadState::Ready(None));
        assert!(!state.is_pending());
        assert!(state.error().is_none());
    }

    #[test]
    fn last_issued_request_wins() {
        let mut q: Query<&str> = Query::new();
        let first = q.begin();
        let second = q.begin();
        assert!(q.settle(second, Ok("two")));
        assert!(!q.settle(first, Ok("one")));
        assert_eq!(q.state(), &LoadState::Ready("two"));
    }

    #[test]
    fn new_request_resets_to_pending() {
        let mut q: Query<u8> = Query::new();
        let t = q.begin();
        q.settle(t, Err(transport()));
        assert!(q.state().error().is_some());
        q.begin();
        assert!(q.state().is_pending());
    }

    #[test]
    fn abandoned_requests_never_land() {
        let mut q: Query<u8> = Query::new();
        let t = q.begin();
        q.abandon();
        assert!(!q.settle(t, Ok(1)));
        assert!(q.state().is_pending());
    }
}
