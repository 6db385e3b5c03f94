/// One-second tick source for the focus timer
///
/// The ticker only sends ticks down a channel it owns. Whoever owns the
/// session awaits [`FocusTicker::recv`] and applies each tick, so the timer
/// is never mutated from the background task.
///
/// Every `start` begins a new run. Ticks are tagged with their run number
/// and anything left over from a stopped run is discarded, so a paused and
/// resumed countdown never receives a tick sent before the pause.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

const TICK: Duration = Duration::from_secs(1);

#[derive(Debug)]
pub struct FocusTicker {
    tx: UnboundedSender<u64>,
    rx: UnboundedReceiver<u64>,
    /// Number of the current (or last) run
    run: u64,
    handle: Option<JoinHandle<()>>,
}

impl Default for FocusTicker {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusTicker {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            run: 0,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Spawn the tick task; false if one is already running
    ///
    /// Must be called from inside a tokio runtime.
    pub fn start(&mut self) -> bool {
        if self.is_running() {
            return false;
        }

        self.run += 1;
        let run = self.run;
        let tx = self.tx.clone();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + TICK, TICK);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(run).is_err() {
                    break;
                }
            }
        }));
        tracing::debug!("Focus ticker started (run {})", run);
        true
    }

    /// Cancel the tick task and drop whatever it already queued
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let mut dropped = 0;
            while self.rx.try_recv().is_ok() {
                dropped += 1;
            }
            tracing::debug!("Focus ticker stopped (run {}, {} queued ticks dropped)", self.run, dropped);
        }
    }

    /// Start or stop to match whether the timer is counting down
    pub fn follow(&mut self, active: bool) {
        if active {
            self.start();
        } else {
            self.stop();
        }
    }

    /// Wait for the next tick of the current run
    ///
    /// Pends forever while stopped. Cancel safe, so it can sit in a
    /// `tokio::select!` next to other sources.
    pub async fn recv(&mut self) -> Option<()> {
        loop {
            let run = self.rx.recv().await?;
            if self.handle.is_some() && run == self.run {
                return Some(());
            }
            tracing::trace!("Discarding tick from stopped run {}", run);
        }
    }
}

impl Drop for FocusTicker {
    fn drop(&mut self) {
        self.stop();
    }
}
