//! Transient notifications.
//!
//! Each [`AlertPresenter::show`] mounts one alert on the sink and starts its own
//! removal timer. Alerts never replace or queue behind each other. Every mounted
//! alert is eventually detached: by its timer, by [`AlertPresenter::teardown`],
//! or when the presenter is dropped.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

/// How long an alert stays up before it fades out and is removed.
pub const DISMISS_AFTER: Duration = Duration::from_secs(60);

/// Text colour of every alert.
pub const FOREGROUND: &str = "#FFFFFF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Success,
    Info,
}

impl Severity {
    pub fn background(self) -> &'static str {
        match self {
            Severity::Error => "red",
            Severity::Success => "green",
            Severity::Info => "#3089cf",
        }
    }

    pub fn style(self) -> AlertStyle {
        AlertStyle {
            background: self.background(),
            foreground: FOREGROUND,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertStyle {
    pub background: &'static str,
    pub foreground: &'static str,
}

/// Message plus severity, ready to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub message: String,
    pub severity: Severity,
}

impl Alert {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AlertId(u64);

/// The container alerts are mounted into.
pub trait AlertSink: Send + Sync {
    fn mount(&self, id: AlertId, message: &str, style: AlertStyle);
    fn fade_out(&self, id: AlertId);
    fn detach(&self, id: AlertId);
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Mounts alerts and removes them after [`DISMISS_AFTER`].
///
/// `show` spawns a timer task, so it must be called inside a tokio runtime.
pub struct AlertPresenter {
    sink: Arc<dyn AlertSink>,
    mounted: Arc<Mutex<BTreeSet<AlertId>>>,
    timers: Mutex<Vec<JoinHandle<()>>>,
    next_id: AtomicU64,
    dismiss_after: Duration,
}

impl AlertPresenter {
    pub fn new(sink: Arc<dyn AlertSink>) -> Self {
        Self::with_dismiss_after(sink, DISMISS_AFTER)
    }

    pub fn with_dismiss_after(sink: Arc<dyn AlertSink>, dismiss_after: Duration) -> Self {
        Self {
            sink,
            mounted: Arc::new(Mutex::new(BTreeSet::new())),
            timers: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
            dismiss_after,
        }
    }

    pub fn show(&self, message: &str, severity: Severity) -> AlertId {
        let id = AlertId(self.next_id.fetch_add(1, Ordering::Relaxed));

        lock(&self.mounted).insert(id);
        self.sink.mount(id, message, severity.style());
        tracing::debug!(alert_id = id.0, ?severity, "Alert shown");

        let sink = Arc::clone(&self.sink);
        let mounted = Arc::clone(&self.mounted);
        let dismiss_after = self.dismiss_after;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(dismiss_after).await;
            // Already gone if teardown got there first
            if lock(&mounted).remove(&id) {
                sink.fade_out(id);
                sink.detach(id);
                tracing::debug!(alert_id = id.0, "Alert dismissed");
            }
        });

        let mut timers = lock(&self.timers);
        timers.retain(|timer| !timer.is_finished());
        timers.push(handle);

        id
    }

    pub fn show_alert(&self, alert: &Alert) -> AlertId {
        self.show(&alert.message, alert.severity)
    }

    /// Alerts currently mounted, oldest first.
    pub fn visible(&self) -> Vec<AlertId> {
        lock(&self.mounted).iter().copied().collect()
    }

    /// Wait until every pending timer has fired.
    pub async fn settled(&self) {
        let timers: Vec<JoinHandle<()>> = std::mem::take(&mut *lock(&self.timers));
        for timer in timers {
            let _ = timer.await;
        }
    }

    /// Cancel pending timers and detach everything still mounted.
    pub fn teardown(&self) {
        for timer in lock(&self.timers).drain(..) {
            timer.abort();
        }

        let remaining = std::mem::take(&mut *lock(&self.mounted));
        for id in remaining {
            self.sink.detach(id);
        }
    }
}

impl Drop for AlertPresenter {
    fn drop(&mut self) {
        self.teardown();
    }
}
