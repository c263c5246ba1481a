use super::render::{draw_session, project_session_view};
use crate::session::{Session, SessionEffect, SessionEvent, SessionOutcome};
use crate::watch::ConfigWatch;
use crossterm::cursor::{Hide, Show};
use crossterm::event::{self, Event, KeyEvent};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const INPUT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Forwards terminal input into the session queue from a dedicated thread.
struct InputPump {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl InputPump {
    fn spawn(events: Sender<SessionEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            while !thread_stop.load(Ordering::Relaxed) {
                let forwarded = match read_terminal_event() {
                    Ok(Some(event)) => events.send(event).is_ok(),
                    Ok(None) => true,
                    Err(reason) => {
                        let _ = events.send(SessionEvent::InputFailed(reason));
                        false
                    }
                };
                if !forwarded {
                    break;
                }
            }
        });
        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for InputPump {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn read_terminal_event() -> Result<Option<SessionEvent>, String> {
    if !event::poll(INPUT_POLL_INTERVAL).map_err(|e| format!("failed to poll input: {e}"))? {
        return Ok(None);
    }
    match event::read().map_err(|e| format!("failed to read input: {e}"))? {
        Event::Key(key) => Ok(Some(SessionEvent::Key(key))),
        Event::Resize(width, height) => Ok(Some(SessionEvent::Resize { width, height })),
        _ => Ok(None),
    }
}

pub fn run_session_tui(session: &mut Session, watch_config: bool) -> Result<SessionOutcome, String> {
    let mut stdout = io::stdout();
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    execute!(stdout, EnterAlternateScreen, Hide)
        .map_err(|e| format!("failed to enter switcher screen: {e}"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal =
        Terminal::new(backend).map_err(|e| format!("failed to create switcher terminal: {e}"))?;
    let result = run_session_tui_loop(session, watch_config, &mut terminal);
    disable_raw_mode().map_err(|e| format!("failed to disable raw mode: {e}"))?;
    execute!(terminal.backend_mut(), Show, LeaveAlternateScreen)
        .map_err(|e| format!("failed to leave switcher screen: {e}"))?;
    result
}

fn run_session_tui_loop(
    session: &mut Session,
    watch_config: bool,
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
) -> Result<SessionOutcome, String> {
    let (tx, rx) = mpsc::channel();
    if let Ok((width, height)) = crossterm::terminal::size() {
        session.handle_event(SessionEvent::Resize { width, height });
    }
    let _input = InputPump::spawn(tx.clone());
    drive_session(
        session,
        &rx,
        &tx,
        |path, events| watch_config.then(|| ConfigWatch::spawn(path, events)),
        |session| draw_switcher(terminal, session),
    )
}

/// Drains `events` into the session until it quits, drawing before every event.
///
/// `subscribe` starts a one-shot watch feeding `queue`. It runs once up front
/// and again for every reload, before the reload reads the file, so a write
/// landing while the file is being read still triggers the next reload.
pub fn drive_session<W>(
    session: &mut Session,
    events: &Receiver<SessionEvent>,
    queue: &Sender<SessionEvent>,
    mut subscribe: impl FnMut(&Path, Sender<SessionEvent>) -> W,
    mut draw: impl FnMut(&Session) -> Result<(), String>,
) -> Result<SessionOutcome, String> {
    let mut _watch = subscribe(session.config_path(), queue.clone());
    loop {
        draw(session)?;
        let event = events
            .recv()
            .map_err(|_| "switcher event queue closed unexpectedly".to_string())?;
        let reloading = event == SessionEvent::Reload;
        if reloading {
            _watch = subscribe(session.config_path(), queue.clone());
        }
        match session.handle_event(event) {
            SessionEffect::Quit => break,
            SessionEffect::Resubscribe if !reloading => {
                _watch = subscribe(session.config_path(), queue.clone());
            }
            SessionEffect::Continue | SessionEffect::Resubscribe => {}
        }
    }
    finished_outcome(session)
}

fn draw_switcher(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    session: &Session,
) -> Result<(), String> {
    let view = project_session_view(session);
    terminal
        .draw(|frame| draw_session(frame, &view))
        .map_err(|e| format!("failed to render switcher: {e}"))?;
    Ok(())
}

/// Drives the session from a fixed key script without a terminal or watcher.
pub fn run_session_scripted(
    session: &mut Session,
    scripted_keys: Vec<KeyEvent>,
) -> Result<SessionOutcome, String> {
    for key in scripted_keys {
        if session.handle_event(SessionEvent::Key(key)) == SessionEffect::Quit {
            return finished_outcome(session);
        }
    }
    Err("scripted session did not terminate; include an enter or esc key".to_string())
}

fn finished_outcome(session: &Session) -> Result<SessionOutcome, String> {
    session
        .outcome()
        .cloned()
        .ok_or_else(|| "session quit without an outcome".to_string())
}
