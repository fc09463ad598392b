//! Activity logger: a dedicated thread owns the [`JsonlWriter`]; the event
//! loop sends [`ActivityEvent`]s over a bounded crossbeam channel.
//!
//! `send()` uses `try_send()`, so a slow disk never delays a tick. Events that
//! do not fit are counted and reported on the next line that is written.

#![allow(missing_docs)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};

use crate::core::errors::{DashError, Result};
use crate::logger::jsonl::{EventType, JsonlConfig, JsonlWriter, LogEntry, Severity};

const CHANNEL_CAPACITY: usize = 256;

/// Events the dashboard runtime reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityEvent {
    DashboardStarted {
        url: String,
        interval_ms: u64,
        config_hash: String,
    },
    DashboardStopped {
        ticks: u64,
    },
    ProviderUnavailable {
        tick: u64,
        url: String,
        error_code: String,
        error_message: String,
    },
    ProviderRecovered {
        tick: u64,
        url: String,
        records: usize,
        total_size: u64,
    },
    /// Stops the logger thread after everything queued before it is written.
    Shutdown,
}

impl ActivityEvent {
    /// Unavailable event carrying `err`'s code and message.
    #[must_use]
    pub fn unavailable(tick: u64, url: impl Into<String>, err: &DashError) -> Self {
        Self::ProviderUnavailable {
            tick,
            url: url.into(),
            error_code: err.code().to_string(),
            error_message: err.to_string(),
        }
    }
}

/// Cloneable sender side of the activity log. A disabled handle drops
/// everything.
#[derive(Clone, Debug)]
pub struct ActivityLoggerHandle {
    tx: Option<Sender<ActivityEvent>>,
    dropped_events: Arc<AtomicU64>,
}

impl ActivityLoggerHandle {
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            tx: None,
            dropped_events: Arc::new(AtomicU64::new(0)),
        }
    }

    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue an event. Never blocks.
    pub fn send(&self, event: ActivityEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        if let Err(TrySendError::Full(_)) = tx.try_send(event) {
            self.dropped_events.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Events dropped because the channel was full and not yet reported.
    #[must_use]
    pub fn dropped_events(&self) -> u64 {
        self.dropped_events.load(Ordering::Relaxed)
    }

    /// Ask the logger thread to finish. Blocks only while the queue is full.
    pub fn shutdown(&self) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(ActivityEvent::Shutdown);
        }
    }
}

/// Running logger: the handle plus the thread to join after `shutdown()`.
pub struct ActivityLogger {
    pub handle: ActivityLoggerHandle,
    join: Option<thread::JoinHandle<()>>,
}

impl ActivityLogger {
    /// No file, no thread.
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            handle: ActivityLoggerHandle::disabled(),
            join: None,
        }
    }

    /// Disabled when `path` is `None`, otherwise a logger thread writing to it.
    ///
    /// # Errors
    /// Returns [`DashError::Io`] if the thread cannot be spawned. An unwritable
    /// file is not an error: the writer degrades to discard.
    pub fn from_path(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => spawn_logger(JsonlConfig::at(path)),
            None => Ok(Self::disabled()),
        }
    }

    /// Send `Shutdown` and wait for the thread to drain.
    pub fn finish(mut self) {
        self.handle.shutdown();
        if let Some(join) = self.join.take() {
            let _ = join.join();
        }
    }
}

/// Spawn the logger thread writing to `config.path`.
///
/// # Errors
/// Returns [`DashError::Io`] if the thread cannot be spawned.
pub fn spawn_logger(config: JsonlConfig) -> Result<ActivityLogger> {
    let (tx, rx) = bounded::<ActivityEvent>(CHANNEL_CAPACITY);
    let dropped = Arc::new(AtomicU64::new(0));
    let dropped_clone = Arc::clone(&dropped);
    let path = config.path.clone();

    let join = thread::Builder::new()
        .name("flubdash-logger".to_string())
        .spawn(move || logger_thread_main(&rx, config, &dropped_clone))
        .map_err(|source| DashError::io(path, source))?;

    Ok(ActivityLogger {
        handle: ActivityLoggerHandle {
            tx: Some(tx),
            dropped_events: dropped,
        },
        join: Some(join),
    })
}

fn logger_thread_main(rx: &Receiver<ActivityEvent>, config: JsonlConfig, dropped: &AtomicU64) {
    let mut jsonl = JsonlWriter::open(config);

    while let Ok(event) = rx.recv() {
        if matches!(event, ActivityEvent::Shutdown) {
            break;
        }
        let mut entry = event_to_log_entry(&event);
        let d = dropped.swap(0, Ordering::Relaxed);
        if d > 0 {
            entry.details = Some(match entry.details.take() {
                Some(details) => format!("{details} dropped_before={d}"),
                None => format!("dropped_before={d}"),
            });
        }
        jsonl.write_entry(&entry);
    }
}

fn event_to_log_entry(event: &ActivityEvent) -> LogEntry {
    match event {
        ActivityEvent::DashboardStarted {
            url,
            interval_ms,
            config_hash,
        } => LogEntry::new(EventType::DashboardStart, Severity::Info)
            .with_url(url.clone())
            .with_details(format!(
                "version={} interval_ms={interval_ms} config_hash={config_hash}",
                env!("CARGO_PKG_VERSION")
            )),
        ActivityEvent::DashboardStopped { ticks } => {
            LogEntry::new(EventType::DashboardStop, Severity::Info).with_tick(*ticks)
        }
        ActivityEvent::ProviderUnavailable {
            tick,
            url,
            error_code,
            error_message,
        } => LogEntry::new(EventType::ProviderUnavailable, Severity::Warning)
            .with_tick(*tick)
            .with_url(url.clone())
            .with_error(error_code.clone(), error_message.clone()),
        ActivityEvent::ProviderRecovered {
            tick,
            url,
            records,
            total_size,
        } => {
            let mut e = LogEntry::new(EventType::ProviderRecovered, Severity::Info)
                .with_tick(*tick)
                .with_url(url.clone());
            e.records = Some(*records);
            e.total_size = Some(*total_size);
            e
        }
        // Handled by the thread loop; never written.
        ActivityEvent::Shutdown => LogEntry::new(EventType::DashboardStop, Severity::Info),
    }
}
