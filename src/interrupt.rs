//! Interruptible waiting for timed conditions.
//!
//! While a condition is held for a duration, Ctrl-C must not kill the
//! process before the proxy's toxics are cleared. The handler installed
//! here only signals a channel; the main thread notices and returns
//! early so the cleanup still runs.
//!
//! The handler stays installed for the rest of the process, so any
//! further Ctrl-C (a second press, or one arriving once the wait is
//! over) exits immediately with [`EXIT_INTERRUPTED`].

use std::process;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::error::Result;

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    /// The full duration passed
    Elapsed,
    /// An interrupt arrived before the duration passed
    Interrupted,
}

/// Exit status used when Ctrl-C terminates the process (128 + SIGINT).
pub const EXIT_INTERRUPTED: i32 = 130;

/// What the handler does with one Ctrl-C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SignalAction {
    /// The waiting thread was notified
    Forwarded,
    /// Nobody can act on it; terminate
    Exit,
}

/// Handler state: only the first signal is forwarded, and only while
/// the [`Interrupt`] is still alive.
struct Forwarder {
    tx: Sender<()>,
    forwarded: bool,
}

impl Forwarder {
    fn new(tx: Sender<()>) -> Self {
        Self {
            tx,
            forwarded: false,
        }
    }

    fn on_signal(&mut self) -> SignalAction {
        if self.forwarded || self.tx.send(()).is_err() {
            return SignalAction::Exit;
        }
        self.forwarded = true;
        SignalAction::Forwarded
    }
}

/// Receiving end of interrupt notifications.
pub struct Interrupt {
    rx: Receiver<()>,
}

impl Interrupt {
    /// Installs a process-wide Ctrl-C handler feeding this receiver.
    ///
    /// Can only succeed once per process.
    pub fn install() -> Result<Self> {
        let (tx, interrupt) = Self::channel();
        let mut forwarder = Forwarder::new(tx);
        ctrlc::set_handler(move || {
            if forwarder.on_signal() == SignalAction::Exit {
                warn!("Interrupted again, exiting without cleanup");
                process::exit(EXIT_INTERRUPTED);
            }
        })?;

        debug!("Interrupt handler installed");
        Ok(interrupt)
    }

    /// Creates an interrupt source that is triggered through the returned sender.
    pub fn channel() -> (Sender<()>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// Blocks for `duration` or until an interrupt arrives.
    pub fn wait(&self, duration: Duration) -> WaitOutcome {
        let start = Instant::now();

        match self.rx.recv_timeout(duration) {
            Ok(()) => WaitOutcome::Interrupted,
            Err(RecvTimeoutError::Timeout) => WaitOutcome::Elapsed,
            Err(RecvTimeoutError::Disconnected) => {
                // No interrupt can arrive any more; sit out the rest.
                thread::sleep(duration.saturating_sub(start.elapsed()));
                WaitOutcome::Elapsed
            }
        }
    }
}

/// Waits for `duration`, returning early on Ctrl-C.
///
/// Falls back to an uninterruptible sleep when the handler cannot be
/// installed.
pub fn wait_or_interrupt(duration: Duration) -> WaitOutcome {
    match Interrupt::install() {
        Ok(interrupt) => interrupt.wait(duration),
        Err(e) => {
            warn!("{}; waiting without interrupt support", e);
            thread::sleep(duration);
            WaitOutcome::Elapsed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wait_elapses() {
        let (_tx, interrupt) = Interrupt::channel();
        let start = Instant::now();

        assert_eq!(
            interrupt.wait(Duration::from_millis(50)),
            WaitOutcome::Elapsed
        );
        assert!(start.elapsed() >= Duration::from_millis(50));
    }

    #[test]
    fn test_pending_interrupt_returns_immediately() {
        let (tx, interrupt) = Interrupt::channel();
        tx.send(()).unwrap();
        let start = Instant::now();

        assert_eq!(
            interrupt.wait(Duration::from_secs(30)),
            WaitOutcome::Interrupted
        );
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_interrupt_during_wait() {
        let (tx, interrupt) = Interrupt::channel();
        let sender = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            tx.send(()).unwrap();
        });

        assert_eq!(
            interrupt.wait(Duration::from_secs(30)),
            WaitOutcome::Interrupted
        );
        sender.join().unwrap();
    }

    #[test]
    fn test_first_signal_is_forwarded_second_exits() {
        let (tx, interrupt) = Interrupt::channel();
        let mut forwarder = Forwarder::new(tx);

        assert_eq!(forwarder.on_signal(), SignalAction::Forwarded);
        assert_eq!(forwarder.on_signal(), SignalAction::Exit);
        assert_eq!(
            interrupt.wait(Duration::from_secs(30)),
            WaitOutcome::Interrupted
        );
    }

    #[test]
    fn test_signal_after_wait_exits() {
        let (tx, interrupt) = Interrupt::channel();
        let mut forwarder = Forwarder::new(tx);

        assert_eq!(
            interrupt.wait(Duration::from_millis(10)),
            WaitOutcome::Elapsed
        );
        drop(interrupt);

        assert_eq!(forwarder.on_signal(), SignalAction::Exit);
    }

    #[test]
    fn test_dropped_sender_still_waits_full_duration() {
        let (tx, interrupt) = Interrupt::channel();
        drop(tx);
        let start = Instant::now();

        assert_eq!(
            interrupt.wait(Duration::from_millis(50)),
            WaitOutcome::Elapsed
        );
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
