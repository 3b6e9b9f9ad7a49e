//! # netsim - A network condition simulation tool
//!
//! netsim drives a running [Toxiproxy](https://github.com/Shopify/toxiproxy)
//! instance through its admin API to simulate poor network conditions
//! for services sitting behind its proxies.
//!
//! ## Features
//!
//! * Latency - Add fixed delay and jitter to a proxy's traffic
//! * Packet loss - Stall and drop a share of connections
//! * Bandwidth limiting - Restrict connection speeds
//! * Outages - Disable and re-enable a proxy entirely
//! * Timed conditions - Hold conditions for a duration, then clear them
//!
//! ## Architecture
//!
//! * `command` turns arguments into a single [`command::Command`]
//! * `dispatch` runs it against a [`controller::Controller`]
//! * the controller talks to the admin API through the
//!   [`api::ProxyAdmin`] trait, implemented over HTTP by
//!   [`api::ToxiproxyClient`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use netsim::prelude::*;
//!
//! let client = ToxiproxyClient::new(&ClientConfig::default())?;
//! let mut controller = Controller::new(client, std::io::stdout());
//!
//! controller.add_latency("redis", 100, 10)?;  // 100ms +/- 10ms
//! controller.add_packet_loss("redis", 5.0)?;  // 5% of connections
//! controller.clear_toxics("redis")?;
//! # Ok::<(), netsim::NetsimError>(())
//! ```

/// Toxiproxy admin API types and client
pub mod api;
/// Command-line arguments
pub mod cli;
/// Parsed command and action precedence
pub mod command;
/// Client configuration layering
pub mod config;
/// Per-action operations and their output
pub mod controller;
/// Command execution and exit status
pub mod dispatch;
/// Centralized error handling
pub mod error;
/// Ctrl-C aware waiting
pub mod interrupt;
/// Prelude for convenient imports
pub mod prelude;

// Re-export commonly used types
pub use error::{NetsimError, Result};
