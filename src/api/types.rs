//! Wire types exchanged with the Toxiproxy admin API.
//!
//! Toxics are serialized exactly as the API expects them:
//!
//! ```json
//! {
//!   "name": "latency",
//!   "type": "latency",
//!   "stream": "downstream",
//!   "toxicity": 1.0,
//!   "attributes": { "latency": 50, "jitter": 0 }
//! }
//! ```
//!
//! What comes back from the server is decoded loosely: toxics listed on a
//! proxy may have been added by other tools, so only their names are
//! relied on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::toxicity::Toxicity;

/// Timeout attribute used by the loss toxic, in milliseconds.
///
/// A `timeout` toxic stalls the affected connection and closes it after
/// this long, which is how packet loss is emulated at the TCP level.
pub const LOSS_TIMEOUT_MS: u64 = 100;

/// Names given to the toxics this tool creates.
pub const LATENCY_TOXIC: &str = "latency";
pub const LOSS_TOXIC: &str = "loss";
pub const BANDWIDTH_TOXIC: &str = "bandwidth";

fn default_true() -> bool {
    true
}

/// Direction of traffic a toxic applies to.
///
/// Every toxic created here affects the responses flowing back to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stream {
    Downstream,
}

/// Toxic types this tool creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ToxicKind {
    Latency,
    Timeout,
    Bandwidth,
}

impl fmt::Display for ToxicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ToxicKind::Latency => "latency",
            ToxicKind::Timeout => "timeout",
            ToxicKind::Bandwidth => "bandwidth",
        })
    }
}

/// Type-specific toxic attributes, serialized as a flat object.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ToxicAttributes {
    /// Added delay and its random variation, both in milliseconds
    Latency { latency: u64, jitter: u64 },
    /// Milliseconds before a stalled connection is closed
    Timeout { timeout: u64 },
    /// Rate limit in KB/s
    Bandwidth { rate: u64 },
}

/// A named fault-injection rule to attach to a proxy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toxic {
    /// Identifier, unique within a proxy
    pub name: String,

    #[serde(rename = "type")]
    pub kind: ToxicKind,

    pub stream: Stream,

    pub toxicity: Toxicity,

    pub attributes: ToxicAttributes,
}

impl Toxic {
    /// Downstream latency toxic applied to every connection.
    pub fn latency(latency_ms: u64, jitter_ms: u64) -> Self {
        Self {
            name: LATENCY_TOXIC.to_string(),
            kind: ToxicKind::Latency,
            stream: Stream::Downstream,
            toxicity: Toxicity::ALWAYS,
            attributes: ToxicAttributes::Latency {
                latency: latency_ms,
                jitter: jitter_ms,
            },
        }
    }

    /// Downstream timeout toxic emulating packet loss.
    ///
    /// The share of affected connections is carried by `toxicity`.
    pub fn packet_loss(toxicity: Toxicity) -> Self {
        Self {
            name: LOSS_TOXIC.to_string(),
            kind: ToxicKind::Timeout,
            stream: Stream::Downstream,
            toxicity,
            attributes: ToxicAttributes::Timeout {
                timeout: LOSS_TIMEOUT_MS,
            },
        }
    }

    /// Downstream bandwidth toxic applied to every connection.
    pub fn bandwidth(rate_kbps: u64) -> Self {
        Self {
            name: BANDWIDTH_TOXIC.to_string(),
            kind: ToxicKind::Bandwidth,
            stream: Stream::Downstream,
            toxicity: Toxicity::ALWAYS,
            attributes: ToxicAttributes::Bandwidth { rate: rate_kbps },
        }
    }
}

/// A toxic as listed by the admin API.
///
/// Only the name is required; every other field the server sends is
/// ignored, whatever its shape.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListedToxic {
    pub name: String,
}

/// A forwarding endpoint managed by the admin API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Proxy {
    #[serde(default)]
    pub name: String,

    /// Address the proxy accepts connections on
    #[serde(default)]
    pub listen: String,

    /// Address connections are forwarded to
    #[serde(default)]
    pub upstream: String,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Body of the proxy update request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProxyUpdate {
    pub enabled: bool,
}
