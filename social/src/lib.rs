pub mod analytics;
pub mod network;
pub mod stats;

pub use network::{NetworkConfig, NetworkError, SocialNetwork};
pub use stats::NetworkStats;
