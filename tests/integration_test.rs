// Integration tests for user-directory

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{Terminal, backend::TestBackend};
use user_directory::app::update::{Fetcher, handle_key, perform};
use user_directory::app::{AppState, Effect, FetchEvent, InputMode, Keymap, Route, Theme};
use user_directory::source::{HttpSource, RecordSource};
use user_directory::{FetchError, LoadState, SortOrder, UserRecord};

/// Serve canned `(path, status, body)` responses on a loopback port.
fn serve(routes: Vec<(&'static str, u16, &'static str)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if header == "\r\n" => break,
                    Ok(_) => {}
                }
            }
            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let (status, body) = routes
                .iter()
                .find(|(p, _, _)| *p == path)
                .map_or((404, "{}"), |(_, s, b)| (*s, *b));
            let response = format!(
                "HTTP/1.1 {status} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{addr}")
}

fn source(base: &str) -> HttpSource {
    HttpSource::new(base, Duration::from_secs(5)).expect("client")
}

fn temp_path(tag: &str) -> PathBuf {
    let nonce = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    std::env::temp_dir().join(format!("udir_{tag}_{}_{nonce}.conf", std::process::id()))
}

fn app() -> AppState {
    AppState::new(Theme::mocha(), Keymap::default(), SortOrder::None, "test")
}

fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn users(n: u64) -> Vec<UserRecord> {
    (1..=n)
        .map(|i| {
            UserRecord::new(i, format!("Person {i:02}"))
                .with_email(format!("person{i}@mail.test"))
                .with_website(format!("person{i}.test"))
        })
        .collect()
}

/// Boot the app and settle the list with `records`.
fn loaded_app(records: Vec<UserRecord>) -> AppState {
    let mut app = app();
    let effects = app.boot(None);
    let Some(Effect::LoadUsers(ticket)) = effects.first().cloned() else {
        panic!("boot should load users: {effects:?}");
    };
    app.apply(FetchEvent::Users {
        ticket,
        result: Ok(records),
    });
    app
}

fn screen(app: &mut AppState) -> String {
    let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
    terminal
        .draw(|f| user_directory::ui::render(f, app))
        .unwrap();
    let buffer = terminal.backend().buffer().clone();
    let width = buffer.area.width as usize;
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

// 1) HTTP source: list, single record, null record
#[test]
fn http_source_reads_users() {
    let base = serve(vec![
        (
            "/users",
            200,
            r#"[{"id":1,"name":"Leanne Graham","email":"Sincere@april.biz","website":"hildegard.org"},{"id":2,"name":"Ervin Howell"}]"#,
        ),
        (
            "/users/1",
            200,
            r#"{"id":1,"name":"Leanne Graham","company":{"name":"Romaguera-Crona","catchPhrase":"Multi-layered"}}"#,
        ),
        ("/users/7", 200, "null"),
    ]);
    let src = source(&base);

    let all = src.fetch_all().expect("list");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].email.as_deref(), Some("Sincere@april.biz"));
    assert_eq!(all[1].website, None);

    let one = src.fetch_one(1).expect("detail").expect("record");
    let company = one.company.expect("company");
    assert_eq!(company.catch_phrase.as_deref(), Some("Multi-layered"));

    assert_eq!(src.fetch_one(7).expect("null detail"), None);
}

// 2) HTTP source: error bodies become status errors with extracted messages
#[test]
fn http_source_maps_error_statuses() {
    let base = serve(vec![
        ("/users/404", 404, r#"{"message":"Not found"}"#),
        ("/users/500", 500, "<html>oops</html>"),
        ("/users/401", 401, r#"{"error":"expired"}"#),
    ]);
    let src = source(&base);

    let err = src.fetch_one(404).unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 404,
            message: "Not found".into()
        }
    );
    assert_eq!(err.toast_message(), "Error 404: Not found");

    let err = src.fetch_one(500).unwrap_err();
    assert_eq!(err.toast_message(), "Server error (500): Unknown error");

    let err = src.fetch_one(401).unwrap_err();
    assert_eq!(
        err,
        FetchError::Status {
            status: 401,
            message: "Request error".into()
        }
    );
}

// 3) HTTP source: malformed JSON and unreachable host
#[test]
fn http_source_reports_decode_and_transport_failures() {
    let base = serve(vec![("/users", 200, r#"{"not":"a list"}"#)]);
    assert!(matches!(source(&base).fetch_all(), Err(FetchError::Decode(_))));

    let closed = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = closed.local_addr().unwrap();
    drop(closed);
    let err = source(&format!("http://{addr}")).fetch_all().unwrap_err();
    assert!(matches!(err, FetchError::Transport(_)), "{err:?}");
}

/// Source whose detail calls take a per-id delay and may fail.
struct SlowSource {
    failing: Option<u64>,
}

impl RecordSource for SlowSource {
    fn fetch_all(&self) -> Result<Vec<UserRecord>, FetchError> {
        Ok(users(3))
    }

    fn fetch_one(&self, id: u64) -> Result<Option<UserRecord>, FetchError> {
        thread::sleep(if id == 1 {
            Duration::from_millis(300)
        } else {
            Duration::from_millis(10)
        });
        if self.failing == Some(id) {
            return Err(FetchError::Status {
                status: 500,
                message: "boom".into(),
            });
        }
        Ok(Some(UserRecord::new(id, format!("Person {id:02}"))))
    }
}

fn race(failing: Option<u64>) -> AppState {
    let (fetcher, events) = Fetcher::new(Arc::new(SlowSource { failing }));
    let mut app = app();
    let open = app.open_detail(1);
    assert!(perform(&mut app, &fetcher, open).is_continue());
    let step = app.step_user(1).expect("step to next user");
    assert!(perform(&mut app, &fetcher, step).is_continue());
    for _ in 0..2 {
        let event = events.recv_timeout(Duration::from_secs(5)).expect("fetch event");
        app.apply(event);
    }
    app
}

// 4) Last request wins even when the earlier one finishes later
#[test]
fn slower_stale_detail_never_overwrites_current() {
    let app = race(None);
    assert_eq!(app.route(), Route::Detail(2));
    let shown = app.detail_state().ready().cloned().flatten().expect("user");
    assert_eq!(shown.id, 2);
    assert!(app.toasts.is_empty());
}

// 5) A stale failure still raises a toast but leaves the screen alone
#[test]
fn stale_failure_toasts_without_touching_screen() {
    let app = race(Some(1));
    assert_eq!(app.toasts.len(), 1);
    assert_eq!(
        app.toasts.iter().next().map(|t| t.message.clone()),
        Some("Server error (500): boom".to_string())
    );
    assert!(matches!(app.detail_state(), LoadState::Ready(Some(u)) if u.id == 2));
}

// 6) Key flow: paging, search resets the page, opening and leaving a detail
#[test]
fn key_flow_pages_searches_and_opens_detail() {
    let mut app = loaded_app(users(12));
    assert_eq!(handle_key(&mut app, press(KeyCode::Right)), None);
    assert_eq!(app.view.page_index(), 2);
    assert_eq!(app.selected_user().map(|u| u.id), Some(6));

    handle_key(&mut app, press(KeyCode::Char('/')));
    assert_eq!(app.input_mode, InputMode::Search);
    // 'q' is text while searching
    handle_key(&mut app, press(KeyCode::Char('1')));
    handle_key(&mut app, press(KeyCode::Char('q')));
    assert_eq!(app.view.search_text(), "1q");
    assert_eq!(app.view.page_index(), 1);
    handle_key(&mut app, press(KeyCode::Backspace));
    handle_key(&mut app, press(KeyCode::Enter));
    assert_eq!(app.input_mode, InputMode::Normal);
    // "1" hits Person 01 and Person 10..12 through name, email and website
    assert_eq!(app.current_page().map(|p| p.matched), Some(4));

    handle_key(&mut app, press(KeyCode::Down));
    let effect = handle_key(&mut app, press(KeyCode::Enter));
    assert!(matches!(effect, Some(Effect::LoadUser(_, 10))), "{effect:?}");
    assert_eq!(app.route(), Route::Detail(10));
    assert!(app.detail_state().is_pending());

    assert_eq!(handle_key(&mut app, press(KeyCode::Esc)), None);
    assert_eq!(app.route(), Route::List);
    // list state survives the round trip
    assert_eq!(app.view.search_text(), "1");

    assert_eq!(handle_key(&mut app, press(KeyCode::Char('q'))), Some(Effect::Quit));
}

// 7) Sort key cycles and resets to the first page
#[test]
fn sort_key_cycles_and_resets_page() {
    let mut records = users(7);
    records.push(UserRecord::new(50, "aardvark"));
    let mut app = loaded_app(records);
    handle_key(&mut app, press(KeyCode::Right));
    assert_eq!(app.view.page_index(), 2);
    handle_key(&mut app, press(KeyCode::Char('s')));
    assert_eq!(app.view.sort_order(), SortOrder::Ascending);
    assert_eq!(app.view.page_index(), 1);
    assert_eq!(app.selected_user().map(|u| u.id), Some(50));
    handle_key(&mut app, press(KeyCode::Char('s')));
    assert_eq!(app.view.sort_order(), SortOrder::Descending);
    assert_eq!(app.selected_user().map(|u| u.id), Some(7));
}

// 8) Retry only while the list is settled
#[test]
fn retry_reloads_list_once_settled() {
    let mut app = app();
    let _ = app.boot(None);
    assert_eq!(handle_key(&mut app, press(KeyCode::Char('r'))), None);

    let mut app = loaded_app(users(2));
    let effect = handle_key(&mut app, press(KeyCode::Char('r')));
    assert!(matches!(effect, Some(Effect::LoadUsers(_))));
    assert!(app.users.state().is_pending());
}

// 8b) A reload that shrinks the list lands back on the first page with rows
#[test]
fn retry_with_fewer_records_returns_to_first_page() {
    let mut app = loaded_app(users(12));
    handle_key(&mut app, press(KeyCode::Right));
    handle_key(&mut app, press(KeyCode::Right));
    assert_eq!(app.view.page_index(), 3);

    let Some(Effect::LoadUsers(ticket)) = handle_key(&mut app, press(KeyCode::Char('r'))) else {
        panic!("retry should reload users");
    };
    assert_eq!(app.view.page_index(), 1);
    app.apply(FetchEvent::Users {
        ticket,
        result: Ok(users(4)),
    });

    let page = app.current_page().cloned().expect("page");
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.rows.len(), 4);
    let text = screen(&mut app);
    assert!(text.contains("Person 04"));
    assert!(!text.contains("No data available"));
}

// 9) Rendering: skeleton, error panel, empty page and pager
#[test]
fn list_screen_renders_each_load_state() {
    let mut pending = app();
    let _ = pending.boot(None);
    assert!(screen(&mut pending).contains("Loading users"));

    let mut failed = app();
    let Some(Effect::LoadUsers(ticket)) = failed.boot(None).first().cloned() else {
        panic!("boot should load users");
    };
    failed.apply(FetchEvent::Users {
        ticket,
        result: Err(FetchError::Transport("refused".into())),
    });
    failed.toasts.prune(Instant::now() + Duration::from_secs(60));
    let text = screen(&mut failed);
    assert!(text.contains("Something went wrong"));
    assert!(text.contains("[r] Retry"));

    let mut empty = loaded_app(Vec::new());
    assert!(screen(&mut empty).contains("No data available"));

    let mut paged = loaded_app(users(12));
    let text = screen(&mut paged);
    assert!(text.contains("Page 1 of 3"));
    assert!(text.contains("Person 01"));
    assert!(!text.contains("Person 06"));

    let mut single = loaded_app(users(3));
    assert!(!screen(&mut single).contains("Page 1 of 1"));
}

// 10) Rendering: deep-linked partial user omits missing sections
#[test]
fn detail_screen_renders_partial_user() {
    let mut app = app();
    let effects = app.boot(Some(9));
    let Some(Effect::LoadUser(ticket, 9)) = effects.get(1).cloned() else {
        panic!("boot should load the deep-linked user: {effects:?}");
    };
    assert!(screen(&mut app).contains("User Detail #9"));

    app.apply(FetchEvent::User {
        ticket,
        id: 9,
        result: Ok(Some(UserRecord::new(9, "Partial User"))),
    });
    let text = screen(&mut app);
    assert!(text.contains("Partial User"));
    assert!(!text.contains("Company"));
    assert!(!text.contains("Address"));
    // first history entry: back has nowhere to go
    assert_eq!(handle_key(&mut app, press(KeyCode::Esc)), None);
    assert_eq!(app.route(), Route::Detail(9));
}

// 11) Theme and keybinding files are created on first run and read back
#[test]
fn config_files_init_and_reload() {
    let theme_path = temp_path("theme");
    let _ = std::fs::remove_file(&theme_path);
    let theme = Theme::load_or_init(&theme_path);
    assert!(theme_path.exists());
    assert_eq!(Theme::from_file(&theme_path), Some(theme));

    let keys_path = temp_path("keys");
    let _ = std::fs::remove_file(&keys_path);
    let _ = Keymap::load_or_init(&keys_path);
    let written = std::fs::read_to_string(&keys_path).expect("keybinds written");
    assert!(written.contains("Quit = q"));

    std::fs::write(&keys_path, "Quit = x\n").unwrap();
    let km = Keymap::load_or_init(&keys_path);
    assert_eq!(
        km.resolve(&press(KeyCode::Char('x'))),
        Some(user_directory::app::KeyAction::Quit)
    );

    // Cleanup best-effort
    let _ = std::fs::remove_file(&theme_path);
    let _ = std::fs::remove_file(&keys_path);
}
