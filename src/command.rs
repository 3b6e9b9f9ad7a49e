//! Parsed command value.
//!
//! Raw arguments are turned into a [`Command`] once, here, so the
//! precedence between actions is decided in a single place and the
//! dispatcher only has to match on the result.

use std::time::Duration;

use crate::cli::Args;
use crate::error::{NetsimError, Result};

/// Latency toxic parameters, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySpec {
    pub latency_ms: u64,
    pub jitter_ms: u64,
}

/// Conditions to apply to one proxy, in application order.
#[derive(Debug, Clone, PartialEq)]
pub struct Conditions {
    pub proxy: String,
    pub latency: Option<LatencySpec>,
    /// Packet loss as a percentage; validated when applied
    pub loss: Option<f64>,
    /// Bandwidth limit in kbps
    pub bandwidth: Option<u64>,
    /// How long to hold the conditions before clearing the proxy's toxics
    pub duration: Option<Duration>,
}

/// The single action an invocation performs.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Clear { proxy: String },
    Disable { proxy: String },
    Enable { proxy: String },
    Apply(Conditions),
}

impl Command {
    /// Builds the command from parsed arguments.
    ///
    /// Precedence: `--list`, then a missing `--proxy` is an error, then
    /// `--clear`, `--disable`, `--enable`, and finally the conditions.
    /// A condition counts as requested when its flag was given, whatever
    /// its value, so `--loss 0` is an explicit zero-toxicity request.
    ///
    /// # Errors
    ///
    /// * `NetsimError::MissingProxy` - when an action other than listing has no proxy
    pub fn from_args(args: &Args) -> Result<Self> {
        if args.list {
            return Ok(Command::List);
        }

        let proxy = args.proxy.clone().ok_or(NetsimError::MissingProxy)?;

        if args.clear {
            return Ok(Command::Clear { proxy });
        }
        if args.disable {
            return Ok(Command::Disable { proxy });
        }
        if args.enable {
            return Ok(Command::Enable { proxy });
        }

        Ok(Command::Apply(Conditions {
            proxy,
            latency: args.latency.map(|latency_ms| LatencySpec {
                latency_ms,
                jitter_ms: args.jitter.unwrap_or(0),
            }),
            loss: args.loss,
            bandwidth: args.bandwidth,
            duration: args.duration.map(Duration::from_secs),
        }))
    }
}
