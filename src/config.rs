//! Command-line configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::listing::SortOrder;
use crate::source::DEFAULT_API_URL;
use crate::sys;

/// Browse a REST user directory from the terminal.
#[derive(Debug, Clone, Parser)]
#[command(name = "user-directory", version, about)]
pub struct Args {
    /// Base URL of the directory API (`/users` and `/users/{id}` are appended).
    #[arg(long, env = "USER_DIRECTORY_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Request timeout in seconds.
    #[arg(long, env = "USER_DIRECTORY_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Theme file (key = #RRGGBB). Created with defaults when missing.
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Keybindings file (Action = Key). Created with defaults when missing.
    #[arg(long)]
    pub keybinds: Option<PathBuf>,

    /// Log file; logs never go to the terminal.
    #[arg(long, env = "USER_DIRECTORY_LOG")]
    pub log_file: Option<PathBuf>,

    /// Initial sort order: none, asc or desc.
    #[arg(long, default_value = "none")]
    pub sort: SortOrder,

    /// Start on the detail screen of this user id.
    #[arg(long)]
    pub user: Option<u64>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn theme_path(&self) -> PathBuf {
        resolve(self.theme.as_ref(), "theme.conf")
    }

    pub fn keybinds_path(&self) -> PathBuf {
        resolve(self.keybinds.as_ref(), "keybinds.conf")
    }

    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| sys::config_file_write_path("user-directory.log"))
    }
}

fn resolve(explicit: Option<&PathBuf>, name: &str) -> PathBuf {
    explicit
        .cloned()
        .or_else(|| sys::config_file_read_path(name))
        .unwrap_or_else(|| sys::config_file_write_path(name))
}
