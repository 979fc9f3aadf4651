// qosman-api: async client for the connectivity-management agent

pub mod client;
pub mod error;
pub mod flows;
pub mod models;
pub mod qos;
pub mod servers;
pub mod transport;

pub use client::AgentClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
