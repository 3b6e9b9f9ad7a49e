//! Fault-injection controller.
//!
//! One method per supported action. Each method issues its request(s)
//! through a [`ProxyAdmin`], writes a human-readable outcome line to the
//! output, and returns the error (already reported) when the action failed.

use std::fmt;
use std::io::Write;

use log::{debug, error};

use crate::api::client::ProxyAdmin;
use crate::api::toxicity::Toxicity;
use crate::api::types::Toxic;
use crate::error::{NetsimError, Result};

/// Outcome of removing every toxic from a proxy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClearReport {
    /// Toxics that were deleted
    pub removed: Vec<String>,
    /// Toxics whose deletion was refused or failed
    pub failed: Vec<String>,
}

pub struct Controller<A, W> {
    admin: A,
    out: W,
}

impl<A: ProxyAdmin, W: Write> Controller<A, W> {
    pub fn new(admin: A, out: W) -> Self {
        Self { admin, out }
    }

    #[cfg(test)]
    pub(crate) fn into_parts(self) -> (A, W) {
        (self.admin, self.out)
    }

    /// Lists every proxy with its listen and upstream addresses.
    ///
    /// Returns the number of proxies found.
    pub fn list_proxies(&mut self) -> Result<usize> {
        let result = self.admin.proxies();
        let proxies = result.map_err(|e| self.fail("list proxies", e))?;

        if proxies.is_empty() {
            self.say(format_args!("No proxies configured"));
            return Ok(0);
        }

        self.say(format_args!("Available proxies:"));
        for proxy in &proxies {
            let state = if proxy.enabled { "" } else { " (disabled)" };
            self.say(format_args!(
                "  - {}: {} → {}{}",
                proxy.name, proxy.listen, proxy.upstream, state
            ));
        }

        Ok(proxies.len())
    }

    /// Adds a downstream latency toxic that applies to every connection.
    pub fn add_latency(&mut self, proxy: &str, latency_ms: u64, jitter_ms: u64) -> Result<()> {
        let result = self.admin.add_toxic(proxy, &Toxic::latency(latency_ms, jitter_ms));
        result.map_err(|e| self.fail(&format!("add latency to {}", proxy), e))?;

        self.say(format_args!(
            "Added {}ms latency (jitter: {}ms) to {}",
            latency_ms, jitter_ms, proxy
        ));
        Ok(())
    }

    /// Adds a downstream timeout toxic affecting `percent` of connections.
    ///
    /// The percentage is checked before anything is sent; values outside
    /// 0-100 are reported and no request is made.
    pub fn add_packet_loss(&mut self, proxy: &str, percent: f64) -> Result<()> {
        let toxicity = Toxicity::from_percent(percent)
            .map_err(|e| self.fail(&format!("add packet loss to {}", proxy), e.into()))?;

        debug!("Loss of {}% on {} is toxicity {}", percent, proxy, toxicity.value());
        let result = self.admin.add_toxic(proxy, &Toxic::packet_loss(toxicity));
        result.map_err(|e| self.fail(&format!("add packet loss to {}", proxy), e))?;

        self.say(format_args!("Added {}% packet loss to {}", percent, proxy));
        Ok(())
    }

    /// Adds a downstream bandwidth toxic that applies to every connection.
    pub fn add_bandwidth_limit(&mut self, proxy: &str, rate_kbps: u64) -> Result<()> {
        let result = self.admin.add_toxic(proxy, &Toxic::bandwidth(rate_kbps));
        result.map_err(|e| self.fail(&format!("limit bandwidth on {}", proxy), e))?;

        self.say(format_args!(
            "Limited bandwidth to {}kbps on {}",
            rate_kbps, proxy
        ));
        Ok(())
    }

    /// Removes every toxic currently attached to `proxy`.
    ///
    /// Fails only when the toxic list cannot be fetched. Individual
    /// deletion failures are reported as they happen and collected in the
    /// returned [`ClearReport`]; they never stop the remaining deletions.
    pub fn clear_toxics(&mut self, proxy: &str) -> Result<ClearReport> {
        let result = self.admin.toxics(proxy);
        let toxics = result.map_err(|e| self.fail(&format!("get toxics for {}", proxy), e))?;

        let mut report = ClearReport::default();
        for toxic in toxics {
            match self.admin.remove_toxic(proxy, &toxic.name) {
                Ok(()) => {
                    self.say(format_args!("Removed toxic '{}' from {}", toxic.name, proxy));
                    report.removed.push(toxic.name);
                }
                Err(e) => {
                    debug!("Removing toxic '{}' from {} failed: {}", toxic.name, proxy, e);
                    self.say(format_args!(
                        "Error: Failed to remove toxic '{}' from {}",
                        toxic.name, proxy
                    ));
                    report.failed.push(toxic.name);
                }
            }
        }

        self.say(format_args!(
            "Cleared {} toxic(s) from {}",
            report.removed.len(),
            proxy
        ));
        Ok(report)
    }

    /// Disables `proxy`, which the admin API turns into a complete outage.
    pub fn disable_proxy(&mut self, proxy: &str) -> Result<()> {
        let result = self.admin.set_enabled(proxy, false);
        result.map_err(|e| self.fail(&format!("disable {}", proxy), e))?;

        self.say(format_args!(
            "Disabled proxy {} (simulating complete outage)",
            proxy
        ));
        Ok(())
    }

    /// Re-enables a previously disabled `proxy`.
    pub fn enable_proxy(&mut self, proxy: &str) -> Result<()> {
        let result = self.admin.set_enabled(proxy, true);
        result.map_err(|e| self.fail(&format!("enable {}", proxy), e))?;

        self.say(format_args!("Enabled proxy {}", proxy));
        Ok(())
    }

    /// Writes one line of output.
    pub fn say(&mut self, line: fmt::Arguments<'_>) {
        writeln!(self.out, "{}", line)
            .unwrap_or_else(|e| error!("Failed to write output: {}", e));
    }

    /// Reports a failed action and hands the error back to the caller.
    pub fn fail(&mut self, action: &str, err: NetsimError) -> NetsimError {
        debug!("Unable to {}: {:?}", action, err);

        match &err {
            NetsimError::Status { status, body } => {
                self.say(format_args!(
                    "Error: Unable to {}. Status code: {}",
                    action, status
                ));
                let body = body.trim();
                if !body.is_empty() {
                    self.say(format_args!("{}", body));
                }
            }
            e if e.is_validation() => self.say(format_args!("Error: {}", e)),
            e => self.say(format_args!("Error: Unable to {}: {}", action, e)),
        }

        err
    }
}
