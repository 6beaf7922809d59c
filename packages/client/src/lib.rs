// ABOUTME: Ridelink order-operations library built on the auth subsystem
// ABOUTME: Maps order create/cancel/update/estimate/query calls onto REST endpoints

pub mod client;
pub mod error;
pub mod types;

// Re-export main types
pub use client::RideApiClient;
pub use error::{ClientError, ClientResult};
pub use types::{CreatedOrder, LocationUpdate, OrderRequest};
