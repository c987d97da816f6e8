//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! Several keys may map to the same action (arrows and vim keys both move).
//! The file format is one `<Action> = <KeySpec>` per line; bindings in the file
//! are layered over the defaults.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Focus the search bar on the list screen.
    StartSearch,
    /// Cycle the sort order: none, ascending, descending.
    CycleSort,
    /// Select the previous row on the current page.
    MoveUp,
    /// Select the next row on the current page.
    MoveDown,
    PrevPage,
    NextPage,
    /// Open the detail screen of the selected row.
    Open,
    /// Return to the previous history entry.
    Back,
    /// Go to the list screen regardless of history.
    BackToList,
    /// Re-issue the failed request.
    Retry,
    /// Open the user's website in the browser.
    OpenWebsite,
    /// Detail screen: previous user id.
    PrevUser,
    /// Detail screen: next user id.
    NextUser,
    ToggleHelp,
    Ignore,
}

const ACTIONS: [(&str, KeyAction); 16] = [
    ("Quit", KeyAction::Quit),
    ("StartSearch", KeyAction::StartSearch),
    ("CycleSort", KeyAction::CycleSort),
    ("MoveUp", KeyAction::MoveUp),
    ("MoveDown", KeyAction::MoveDown),
    ("PrevPage", KeyAction::PrevPage),
    ("NextPage", KeyAction::NextPage),
    ("Open", KeyAction::Open),
    ("Back", KeyAction::Back),
    ("BackToList", KeyAction::BackToList),
    ("Retry", KeyAction::Retry),
    ("OpenWebsite", KeyAction::OpenWebsite),
    ("PrevUser", KeyAction::PrevUser),
    ("NextUser", KeyAction::NextUser),
    ("ToggleHelp", KeyAction::ToggleHelp),
    ("Ignore", KeyAction::Ignore),
];

/// Maps `(KeyModifiers, KeyCode)` pairs to [`KeyAction`]s.
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::{Backspace, Char, Down, Enter, Esc, Left, Right, Up};
        use KeyModifiers as M;
        let defaults = [
            (Char('q'), KeyAction::Quit),
            (Char('/'), KeyAction::StartSearch),
            (Char('s'), KeyAction::CycleSort),
            (Up, KeyAction::MoveUp),
            (Char('k'), KeyAction::MoveUp),
            (Down, KeyAction::MoveDown),
            (Char('j'), KeyAction::MoveDown),
            (Left, KeyAction::PrevPage),
            (Char('h'), KeyAction::PrevPage),
            (Right, KeyAction::NextPage),
            (Char('l'), KeyAction::NextPage),
            (Enter, KeyAction::Open),
            (Esc, KeyAction::Back),
            (Backspace, KeyAction::Back),
            (Char('b'), KeyAction::BackToList),
            (Char('r'), KeyAction::Retry),
            (Char('o'), KeyAction::OpenWebsite),
            (Char('['), KeyAction::PrevUser),
            (Char(']'), KeyAction::NextUser),
            (Char('?'), KeyAction::ToggleHelp),
        ];
        let mut bindings: HashMap<_, _> = defaults
            .into_iter()
            .map(|(code, action)| ((M::NONE, code), action))
            .collect();
        // Ctrl+C quits even though raw mode swallows SIGINT.
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        Self { bindings }
    }

    /// Load `path`, or write the defaults there and use them.
    pub fn load_or_init(path: &Path) -> Self {
        if path.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(err) = km.write_file(path) {
            tracing::warn!(path = %path.display(), %err, "could not write default keybindings");
        }
        km
    }

    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    /// Layer `Action = KeySpec` lines over the defaults.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::warn!(line, "unrecognised keybinding"),
            }
        }
        map
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-directory keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Backspace, Up, Down, Left, Right, /, [, ]\n\n");

        let mut lines: Vec<(&str, String)> = self
            .bindings
            .iter()
            .map(|((mods, code), action)| (format_action(*action), Self::format_key(*mods, *code)))
            .collect();
        lines.sort();
        for (action, key) in lines {
            let _ = writeln!(&mut buf, "{action} = {key}");
        }
        std::fs::write(path, buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings
            .get(&(key.modifiers, key.code))
            .or_else(|| match key.code {
                // Shifted symbols like '?' arrive with SHIFT set on most terminals.
                KeyCode::Char(_) => self
                    .bindings
                    .get(&(key.modifiers.difference(KeyModifiers::SHIFT), key.code)),
                _ => None,
            })
            .copied()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        let base = match code {
            KeyCode::Enter => "Enter".to_string(),
            KeyCode::Esc => "Esc".to_string(),
            KeyCode::Backspace => "Backspace".to_string(),
            KeyCode::Tab => "Tab".to_string(),
            KeyCode::Up => "Up".to_string(),
            KeyCode::Down => "Down".to_string(),
            KeyCode::Left => "Left".to_string(),
            KeyCode::Right => "Right".to_string(),
            KeyCode::PageUp => "PageUp".to_string(),
            KeyCode::PageDown => "PageDown".to_string(),
            KeyCode::Char(c) => c.to_string(),
            other => format!("{other:?}"),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => KeyCode::Enter,
        "Esc" | "Escape" => KeyCode::Esc,
        "Backspace" => KeyCode::Backspace,
        "Tab" => KeyCode::Tab,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Left" => KeyCode::Left,
        "Right" => KeyCode::Right,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    let name = s.trim();
    ACTIONS.iter().find(|(n, _)| *n == name).map(|(_, a)| *a)
}

pub fn format_action(a: KeyAction) -> &'static str {
    ACTIONS
        .iter()
        .find(|(_, action)| *action == a)
        .map_or("Ignore", |(n, _)| *n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn defaults_cover_vim_and_arrows() {
        let km = Keymap::default();
        assert_eq!(km.resolve(&press(KeyCode::Char('j'))), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&press(KeyCode::Down)), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&press(KeyCode::Char(']'))), Some(KeyAction::NextUser));
        assert_eq!(
            km.resolve(&KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
    }

    #[test]
    fn file_bindings_layer_over_defaults() {
        let km = Keymap::parse("# custom\nRetry = F\nQuit = Ctrl+x\nNonsense = z\nOpen = Enterr");
        assert_eq!(km.resolve(&press(KeyCode::Char('F'))), Some(KeyAction::Retry));
        assert_eq!(km.resolve(&press(KeyCode::Char('r'))), Some(KeyAction::Retry));
        assert_eq!(
            km.resolve(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL)),
            Some(KeyAction::Quit)
        );
        assert_eq!(km.resolve(&press(KeyCode::Char('z'))), None);
    }

    #[test]
    fn keys_for_lists_every_binding() {
        let km = Keymap::default();
        assert_eq!(km.keys_for(KeyAction::Back), vec!["Backspace", "Esc"]);
        assert_eq!(format_action(KeyAction::BackToList), "BackToList");
    }
}
