//! Runs a [`Command`] against a [`Controller`].
//!
//! Every error is reported by the controller as it happens; the
//! dispatcher only counts them so the binary can pick an exit code.

use std::io::Write;
use std::time::Duration;

use log::info;

use crate::api::client::ProxyAdmin;
use crate::cli::Args;
use crate::command::{Command, Conditions};
use crate::controller::{ClearReport, Controller};
use crate::error::Result;
use crate::interrupt::WaitOutcome;

/// Summary of an invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Number of reported errors, including individual toxic removals
    pub failures: usize,
}

impl Outcome {
    pub fn is_success(&self) -> bool {
        self.failures == 0
    }

    /// 0 when everything succeeded, 1 when any error was reported.
    pub fn exit_code(&self) -> u8 {
        if self.is_success() {
            0
        } else {
            1
        }
    }

    fn record<T>(&mut self, result: Result<T>) {
        if result.is_err() {
            self.failures += 1;
        }
    }

    fn record_clear(&mut self, result: Result<ClearReport>) {
        match result {
            Ok(report) => self.failures += report.failed.len(),
            Err(_) => self.failures += 1,
        }
    }
}

/// Parses `args` into a command and runs it.
///
/// A missing proxy is reported without touching the network.
pub fn execute<A, W, F>(controller: &mut Controller<A, W>, args: &Args, wait: F) -> Outcome
where
    A: ProxyAdmin,
    W: Write,
    F: FnOnce(Duration) -> WaitOutcome,
{
    match Command::from_args(args) {
        Ok(command) => run(controller, command, wait),
        Err(e) => {
            controller.fail("parse arguments", e);
            Outcome { failures: 1 }
        }
    }
}

/// Runs one command.
///
/// `wait` is only called when conditions are applied with a duration.
pub fn run<A, W, F>(controller: &mut Controller<A, W>, command: Command, wait: F) -> Outcome
where
    A: ProxyAdmin,
    W: Write,
    F: FnOnce(Duration) -> WaitOutcome,
{
    let mut outcome = Outcome::default();

    match command {
        Command::List => outcome.record(controller.list_proxies()),
        Command::Clear { proxy } => outcome.record_clear(controller.clear_toxics(&proxy)),
        Command::Disable { proxy } => outcome.record(controller.disable_proxy(&proxy)),
        Command::Enable { proxy } => outcome.record(controller.enable_proxy(&proxy)),
        Command::Apply(conditions) => apply(controller, &conditions, wait, &mut outcome),
    }

    outcome
}

fn apply<A, W, F>(
    controller: &mut Controller<A, W>,
    conditions: &Conditions,
    wait: F,
    outcome: &mut Outcome,
) where
    A: ProxyAdmin,
    W: Write,
    F: FnOnce(Duration) -> WaitOutcome,
{
    let proxy = conditions.proxy.as_str();
    info!("Applying conditions to {}", proxy);

    if let Some(latency) = conditions.latency {
        outcome.record(controller.add_latency(proxy, latency.latency_ms, latency.jitter_ms));
    }

    if let Some(percent) = conditions.loss {
        outcome.record(controller.add_packet_loss(proxy, percent));
    }

    if let Some(rate) = conditions.bandwidth {
        outcome.record(controller.add_bandwidth_limit(proxy, rate));
    }

    let Some(duration) = conditions.duration else {
        return;
    };

    controller.say(format_args!(
        "Condition will be active for {} seconds",
        duration.as_secs()
    ));

    match wait(duration) {
        WaitOutcome::Elapsed => {
            controller.say(format_args!("Duration complete, clearing conditions"));
        }
        WaitOutcome::Interrupted => {
            info!("Interrupted while holding conditions on {}", proxy);
            controller.say(format_args!("Interrupted, clearing conditions"));
        }
    }

    outcome.record_clear(controller.clear_toxics(proxy));
}
