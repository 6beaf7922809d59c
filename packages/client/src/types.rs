// ABOUTME: Request and response types for the provider's order endpoints
// ABOUTME: Field names mirror the wire parameters the provider expects

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Service type for an immediate ride.
pub const SERVICE_IMMEDIATE: i64 = 14;
/// Business car group.
pub const CAR_GROUP_BUSINESS: i64 = 2;

/// Everything needed to place an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderRequest {
    pub service_id: i64,
    pub car_group_id: i64,
    pub passenger_mobile: String,
    pub passenger_name: String,
    pub start_lat: f64,
    pub start_lng: f64,
    pub start_name: String,
    pub start_address: String,
    pub end_lat: f64,
    pub end_lng: f64,
    pub end_name: String,
    pub end_address: String,
}

impl OrderRequest {
    /// An immediate business-car order, the provider's default ride type.
    #[allow(clippy::too_many_arguments)]
    pub fn immediate(
        passenger_mobile: impl Into<String>,
        passenger_name: impl Into<String>,
        start_lat: f64,
        start_lng: f64,
        start_name: impl Into<String>,
        start_address: impl Into<String>,
        end_lat: f64,
        end_lng: f64,
        end_name: impl Into<String>,
        end_address: impl Into<String>,
    ) -> Self {
        Self {
            service_id: SERVICE_IMMEDIATE,
            car_group_id: CAR_GROUP_BUSINESS,
            passenger_mobile: passenger_mobile.into(),
            passenger_name: passenger_name.into(),
            start_lat,
            start_lng,
            start_name: start_name.into(),
            start_address: start_address.into(),
            end_lat,
            end_lng,
            end_name: end_name.into(),
            end_address: end_address.into(),
        }
    }
}

/// New pickup or dropoff location for an existing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationUpdate {
    pub order_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    pub address: String,
}

/// A successfully created order.
#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order_id: String,
    /// Full response content for callers that need more than the id.
    pub content: Value,
}
