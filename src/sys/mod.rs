//! Host interaction: launching the system browser and resolving config paths.

use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use crate::error::{Result, simple_error};

/// Directory name under the platform config root.
pub const APP_DIR: &str = "user-directory";

/// Turn a stored website value into an absolute link.
///
/// Values that already carry a scheme are kept; bare hosts get `https://`.
pub fn website_href(website: &str) -> String {
    if website.starts_with("http") {
        website.to_string()
    } else {
        format!("https://{website}")
    }
}

/// Open `url` in the user's browser as a detached process.
///
/// The browser gets nothing but the URL: no opener handle and no referrer.
pub fn open_in_browser(url: &str) -> Result<()> {
    let mut cmd = browser_command(url);
    cmd.stdin(Stdio::null()).stdout(Stdio::null()).stderr(Stdio::null());
    spawn_detached(cmd)
        .map_err(|e| simple_error(format!("failed to launch browser for {url}: {e}")))?;
    tracing::info!(%url, "opened link");
    Ok(())
}

/// Spawn `cmd` and reap it on a background thread so it never lingers as a
/// zombie. The handle yields the exit status once the child is gone.
pub fn spawn_detached(mut cmd: Command) -> std::io::Result<JoinHandle<Option<ExitStatus>>> {
    let mut child = cmd.spawn()?;
    let pid = child.id();
    Ok(thread::spawn(move || match child.wait() {
        Ok(status) => {
            tracing::debug!(pid, %status, "child exited");
            Some(status)
        }
        Err(err) => {
            tracing::warn!(pid, %err, "could not reap child");
            None
        }
    }))
}

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn browser_command(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// `$XDG_CONFIG_HOME/user-directory` or `$HOME/.config/user-directory`.
pub fn config_dir() -> Option<PathBuf> {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
    Some(base.join(APP_DIR))
}

/// Existing config file `name`, looked up in the config dir then the working dir.
pub fn config_file_read_path(name: &str) -> Option<PathBuf> {
    config_dir()
        .map(|d| d.join(name))
        .into_iter()
        .chain(std::iter::once(PathBuf::from(name)))
        .find(|p| p.exists())
}

/// Where config file `name` should be written, creating the config dir if needed.
pub fn config_file_write_path(name: &str) -> PathBuf {
    match config_dir() {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => dir.join(name),
        _ => PathBuf::from(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hosts_get_https() {
        assert_eq!(website_href("hildegard.org"), "https://hildegard.org");
        assert_eq!(website_href("http://anastasia.net"), "http://anastasia.net");
        assert_eq!(website_href("https://kale.biz/x"), "https://kale.biz/x");
    }

    #[cfg(unix)]
    #[test]
    fn detached_children_are_reaped() {
        let reaper = spawn_detached(Command::new("true")).expect("spawn true");
        let status = reaper.join().expect("reaper thread");
        assert_eq!(status.map(|s| s.success()), Some(true));
    }
}
