//! Record sources: where user records come from.
//!
//! The UI never talks to the network directly; it asks a [`RecordSource`]
//! from a worker thread and receives the result over a channel.

mod http;
mod model;

pub use http::{DEFAULT_API_URL, HttpSource, error_message};
pub use model::{Address, Company, Geo, UserRecord};

use crate::error::FetchError;

/// Provider of user records.
///
/// Implementations block; callers run them off the UI thread.
pub trait RecordSource: Send + Sync {
    /// List every user, in server order.
    fn fetch_all(&self) -> Result<Vec<UserRecord>, FetchError>;

    /// Fetch a single user. `Ok(None)` is a successful `null` response.
    fn fetch_one(&self, id: u64) -> Result<Option<UserRecord>, FetchError>;
}
