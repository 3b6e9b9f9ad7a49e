//! Prelude module for convenient imports.
//!
//! This module re-exports commonly used types and traits from the crate,
//! allowing users to import everything they need with a single use statement:
//!
//! ```rust
//! use netsim::prelude::*;
//! ```

// Error handling
pub use crate::error::{NetsimError, Result};

// Admin API
pub use crate::api::client::{ProxyAdmin, ToxiproxyClient};
pub use crate::api::toxicity::Toxicity;
pub use crate::api::types::{ListedToxic, Proxy, Stream, Toxic, ToxicAttributes, ToxicKind};

// Configuration
pub use crate::config::{ClientConfig, FileConfig};

// Command handling
pub use crate::cli::Args;
pub use crate::command::{Command, Conditions, LatencySpec};
pub use crate::controller::{ClearReport, Controller};
pub use crate::dispatch::{execute, run, Outcome};
pub use crate::interrupt::{wait_or_interrupt, Interrupt, WaitOutcome};
