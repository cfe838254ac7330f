//! The on-screen clock: Russian date string plus a cancellable refresh task.

use std::time::Duration;

use chrono::{Datelike, Local, NaiveDateTime};
use tokio::{
    sync::watch,
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const DEFAULT_REFRESH: Duration = Duration::from_secs(60);

const MONTHS_GENITIVE: [&str; 12] = [
    "января",
    "февраля",
    "марта",
    "апреля",
    "мая",
    "июня",
    "июля",
    "августа",
    "сентября",
    "октября",
    "ноября",
    "декабря",
];

/// `"15 октября, 14:05"`.
pub fn format_clock(now: NaiveDateTime) -> String {
    let month = MONTHS_GENITIVE[now.month0() as usize];
    format!("{} {}, {}", now.day(), month, now.format("%H:%M"))
}

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// A running clock task and the channel it publishes to.
#[derive(Debug)]
pub struct ClockHandle {
    pub display: watch::Receiver<String>,
    pub task: JoinHandle<()>,
}

/// Publishes `format_clock(now())` immediately and then once per `period`
/// until `cancel` fires or every receiver is dropped. A zero period falls
/// back to [`DEFAULT_REFRESH`].
pub fn spawn_clock<F>(period: Duration, cancel: CancellationToken, now: F) -> ClockHandle
where
    F: Fn() -> NaiveDateTime + Send + 'static,
{
    let period = if period.is_zero() { DEFAULT_REFRESH } else { period };
    let (tx, rx) = watch::channel(format_clock(now()));

    let task = tokio::spawn(async move {
        let mut ticker = time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick fires immediately; the initial value is already published.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Clock task cancelled");
                    break;
                }
                _ = ticker.tick() => {
                    if tx.send(format_clock(now())).is_err() {
                        debug!("Clock display dropped, stopping");
                        break;
                    }
                }
            }
        }
    });

    ClockHandle { display: rx, task }
}
