//! A non-blocking once-per-second progress ticker.
//!
//! The search loop polls [`Ticker::tick`] after processing each node; a
//! background thread feeds the channel on a fixed cadence so the hot loop
//! never itself calls a clock, and printing progress never blocks search
//! progress on I/O.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};

/// Feeds one message per second until dropped or [`Ticker::stop`] is called.
pub struct Ticker {
    rx: Receiver<Instant>,
    stop: Arc<AtomicBool>,
}

impl Ticker {
    pub fn start(period: Duration) -> Self {
        let (tx, rx): (Sender<Instant>, Receiver<Instant>) = crossbeam_channel::bounded(1);
        let stop = Arc::new(AtomicBool::new(false));
        let stop_for_thread = stop.clone();

        thread::spawn(move || loop {
            thread::sleep(period);
            if stop_for_thread.load(Ordering::Relaxed) {
                break;
            }
            // a bounded(1) channel with a non-blocking send: if the last
            // tick hasn't been drained yet, skip this one rather than
            // backing up.
            let _ = tx.try_send(Instant::now());
        });

        Self { rx, stop }
    }

    pub fn once_per_second() -> Self {
        Self::start(Duration::from_secs(1))
    }

    /// Drains and returns `true` if at least one tick is pending.
    pub fn tick(&self) -> bool {
        let mut fired = false;
        while self.rx.try_recv().is_ok() {
            fired = true;
        }
        fired
    }

    pub fn stop(&self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
