//! One-shot watcher for the AWS config file.
//!
//! Each [`ConfigWatch`] delivers at most one [`WatchSignal`] and then releases
//! its OS subscription. Callers that want continuous monitoring spawn a new
//! watch after handling the signal.

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const STOP_POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchSignal {
    Changed,
    Failed(String),
}

pub struct ConfigWatch {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for ConfigWatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatch")
            .field("running", &self.is_running())
            .finish()
    }
}

impl ConfigWatch {
    /// Subscribes to changes of `path` before returning, so writes made after
    /// this call are observed. Subscription failures are delivered as
    /// [`WatchSignal::Failed`] and leave an inert handle.
    pub fn spawn<E>(path: &Path, events: Sender<E>) -> Self
    where
        E: From<WatchSignal> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));
        let (watcher, notify_rx, file_name) = match subscribe(path) {
            Ok(parts) => parts,
            Err(reason) => {
                let _ = events.send(E::from(WatchSignal::Failed(reason)));
                return Self { stop, handle: None };
            }
        };

        let thread_stop = Arc::clone(&stop);
        let handle = thread::spawn(move || {
            let signal = wait_for_write(&notify_rx, &file_name, &thread_stop);
            drop(watcher);
            if let Some(signal) = signal {
                let _ = events.send(E::from(signal));
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for ConfigWatch {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

type Subscription = (RecommendedWatcher, Receiver<notify::Result<Event>>, OsString);

// The parent directory is watched rather than the file itself: editors and our
// own atomic save replace the file by rename, which would orphan a watch on
// the original inode.
fn subscribe(path: &Path) -> Result<Subscription, String> {
    let target: PathBuf = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    let file_name = target
        .file_name()
        .ok_or_else(|| format!("config path {} has no file name", target.display()))?
        .to_os_string();
    let parent = target
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();

    let (tx, rx) = mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)
        .map_err(|err| format!("failed to create file watcher: {err}"))?;
    watcher
        .watch(&parent, RecursiveMode::NonRecursive)
        .map_err(|err| format!("failed to watch {}: {err}", parent.display()))?;
    Ok((watcher, rx, file_name))
}

fn wait_for_write(
    notify_rx: &Receiver<notify::Result<Event>>,
    file_name: &OsString,
    stop: &AtomicBool,
) -> Option<WatchSignal> {
    loop {
        if stop.load(Ordering::Relaxed) {
            return None;
        }
        match notify_rx.recv_timeout(STOP_POLL_INTERVAL) {
            Ok(Ok(event)) => {
                if is_write_event(&event, file_name) {
                    return Some(WatchSignal::Changed);
                }
            }
            Ok(Err(err)) => return Some(WatchSignal::Failed(format!("file watcher error: {err}"))),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Some(WatchSignal::Failed(
                    "file watcher stopped unexpectedly".to_string(),
                ));
            }
        }
    }
}

/// True for content writes, creations and renames onto the watched file name.
pub fn is_write_event(event: &Event, file_name: &OsString) -> bool {
    let writes = matches!(
        event.kind,
        EventKind::Create(_)
            | EventKind::Modify(ModifyKind::Data(_))
            | EventKind::Modify(ModifyKind::Any)
            | EventKind::Modify(ModifyKind::Name(
                RenameMode::To | RenameMode::Both | RenameMode::Any
            ))
    );
    writes
        && event
            .paths
            .iter()
            .any(|path| path.file_name() == Some(file_name.as_os_str()))
}
