pub mod client;
pub mod mock;

pub use client::{HttpOutbound, OutboundConfig};
pub use mock::MockOutbound;
