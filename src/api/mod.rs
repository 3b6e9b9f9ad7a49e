//! Toxiproxy admin API: wire types, toxicity values and the HTTP client.

pub mod client;
pub mod toxicity;
pub mod types;

pub use client::{ProxyAdmin, ToxiproxyClient};
pub use toxicity::{Toxicity, ToxicityError};
pub use types::{ListedToxic, Proxy, Stream, Toxic, ToxicAttributes, ToxicKind};
