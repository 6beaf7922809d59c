// ABOUTME: Thin HTTP mapping of the provider's order-lifecycle REST endpoints
// ABOUTME: Every call obtains a bearer token from the auth orchestrator first

use std::sync::Arc;

use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use ridelink_auth::{AuthConfig, AuthOrchestrator, ProviderEndpoints, TokenStatusReport};

use crate::error::{ClientError, ClientResult};
use crate::types::{CreatedOrder, LocationUpdate, OrderRequest};

/// Response envelope shared by every provider endpoint. `code == 1` is success.
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    code: i64,
    msg: Option<String>,
    #[serde(rename = "busiCode")]
    busi_code: Option<String>,
    content: Option<Value>,
}

impl ApiEnvelope {
    fn into_content(self) -> ClientResult<Value> {
        if self.code == 1 {
            return Ok(self.content.unwrap_or(Value::Null));
        }
        let code = match self.busi_code {
            Some(busi) if !busi.is_empty() => format!("{}:{}", self.code, busi),
            _ => self.code.to_string(),
        };
        Err(ClientError::Api {
            code,
            message: self.msg.unwrap_or_else(|| "provider call failed".to_string()),
        })
    }
}

/// Client for the provider's order operations.
pub struct RideApiClient {
    endpoints: ProviderEndpoints,
    auth: Arc<AuthOrchestrator>,
    http: Client,
}

impl RideApiClient {
    pub fn new(config: AuthConfig, endpoints: ProviderEndpoints) -> Self {
        let auth = Arc::new(AuthOrchestrator::from_config(config, endpoints.clone()));
        Self::with_orchestrator(endpoints, auth)
    }

    pub fn with_orchestrator(endpoints: ProviderEndpoints, auth: Arc<AuthOrchestrator>) -> Self {
        Self {
            endpoints,
            auth,
            http: Client::new(),
        }
    }

    pub fn auth(&self) -> &Arc<AuthOrchestrator> {
        &self.auth
    }

    /// Expiry snapshot of the stored token, for status surfaces.
    pub async fn token_status(&self) -> TokenStatusReport {
        self.auth.lifecycle().status_report().await
    }

    /// City and service coverage information.
    pub async fn city_services(&self) -> ClientResult<Value> {
        let access_token = self.auth.get_valid_token().await?;
        self.get(
            "/v1/resource/common/getCityService",
            &[("access_token".to_string(), access_token)],
        )
        .await
    }

    /// Price estimate for a trip. The returned content carries the
    /// `estimateId` that order creation requires.
    pub async fn estimate_price(
        &self,
        service_id: i64,
        car_group_id: i64,
        start_lat: f64,
        start_lng: f64,
        end_lat: f64,
        end_lng: f64,
    ) -> ClientResult<Value> {
        let access_token = self.auth.get_valid_token().await?;
        self.get(
            "/v1/resource/common/estimate/price",
            &[
                ("access_token".to_string(), access_token),
                ("serviceId".to_string(), service_id.to_string()),
                ("carGroupId".to_string(), car_group_id.to_string()),
                ("slat".to_string(), start_lat.to_string()),
                ("slng".to_string(), start_lng.to_string()),
                ("elat".to_string(), end_lat.to_string()),
                ("elng".to_string(), end_lng.to_string()),
            ],
        )
        .await
    }

    /// Create an order. Runs an estimate first to obtain the estimate id the
    /// provider insists on.
    pub async fn create_order(&self, req: &OrderRequest) -> ClientResult<CreatedOrder> {
        let estimate = self
            .estimate_price(
                req.service_id,
                req.car_group_id,
                req.start_lat,
                req.start_lng,
                req.end_lat,
                req.end_lng,
            )
            .await?;
        let estimate_id = field_as_string(&estimate, "estimateId")
            .ok_or(ClientError::MissingField("estimateId"))?;
        debug!("Creating order with estimate id {}", estimate_id);

        let access_token = self.auth.get_valid_token().await?;
        let content = self
            .post_form(
                "/v1/action/order/create",
                &[
                    ("access_token".to_string(), access_token),
                    ("serviceId".to_string(), req.service_id.to_string()),
                    ("carGroupId".to_string(), req.car_group_id.to_string()),
                    ("passengerMobile".to_string(), req.passenger_mobile.clone()),
                    ("passengerName".to_string(), req.passenger_name.clone()),
                    ("estimateId".to_string(), estimate_id),
                    ("slat".to_string(), req.start_lat.to_string()),
                    ("slng".to_string(), req.start_lng.to_string()),
                    ("startName".to_string(), req.start_name.clone()),
                    ("startAddress".to_string(), req.start_address.clone()),
                    ("elat".to_string(), req.end_lat.to_string()),
                    ("elng".to_string(), req.end_lng.to_string()),
                    ("endName".to_string(), req.end_name.clone()),
                    ("endAddress".to_string(), req.end_address.clone()),
                ],
            )
            .await?;

        let order_id =
            field_as_string(&content, "orderId").ok_or(ClientError::MissingField("orderId"))?;
        info!("Created order {}", order_id);
        Ok(CreatedOrder { order_id, content })
    }

    pub async fn cancel_order(
        &self,
        order_id: &str,
        force: bool,
        reason: &str,
        reason_id: i64,
    ) -> ClientResult<Value> {
        let access_token = self.auth.get_valid_token().await?;
        let content = self
            .post_form(
                "/v1/action/order/cancel",
                &[
                    ("access_token".to_string(), access_token),
                    ("orderId".to_string(), order_id.to_string()),
                    ("force".to_string(), force.to_string()),
                    ("reason".to_string(), reason.to_string()),
                    ("reasonId".to_string(), reason_id.to_string()),
                ],
            )
            .await?;
        info!("Cancelled order {}", order_id);
        Ok(content)
    }

    pub async fn update_pickup(&self, update: &LocationUpdate) -> ClientResult<Value> {
        let access_token = self.auth.get_valid_token().await?;
        self.post_form(
            "/v1/action/order/updateStart",
            &[
                ("access_token".to_string(), access_token),
                ("orderId".to_string(), update.order_id.clone()),
                ("slat".to_string(), update.latitude.to_string()),
                ("slng".to_string(), update.longitude.to_string()),
                ("startName".to_string(), update.name.clone()),
                ("startAddress".to_string(), update.address.clone()),
            ],
        )
        .await
    }

    pub async fn update_dropoff(&self, update: &LocationUpdate) -> ClientResult<Value> {
        let access_token = self.auth.get_valid_token().await?;
        self.post_form(
            "/v1/action/order/updateEnd",
            &[
                ("access_token".to_string(), access_token),
                ("orderId".to_string(), update.order_id.clone()),
                ("elat".to_string(), update.latitude.to_string()),
                ("elng".to_string(), update.longitude.to_string()),
                ("endName".to_string(), update.name.clone()),
                ("endAddress".to_string(), update.address.clone()),
            ],
        )
        .await
    }

    pub async fn driver_phone(&self, order_id: &str) -> ClientResult<Value> {
        let access_token = self.auth.get_valid_token().await?;
        self.get(
            "/v1/resource/queryDriverPhone",
            &[
                ("access_token".to_string(), access_token),
                ("orderId".to_string(), order_id.to_string()),
            ],
        )
        .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.endpoints.api_host.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str, params: &[(String, String)]) -> ClientResult<Value> {
        debug!("GET {}", path);
        let envelope: ApiEnvelope = self
            .http
            .get(self.url(path))
            .query(params)
            .send()
            .await?
            .json()
            .await?;
        envelope.into_content()
    }

    async fn post_form(&self, path: &str, form: &[(String, String)]) -> ClientResult<Value> {
        debug!("POST {}", path);
        let envelope: ApiEnvelope = self
            .http
            .post(self.url(path))
            .form(form)
            .send()
            .await?
            .json()
            .await?;
        envelope.into_content()
    }
}

/// Providers return ids sometimes as strings, sometimes as numbers.
fn field_as_string(content: &Value, key: &str) -> Option<String> {
    match content.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_yields_content() {
        let envelope: ApiEnvelope =
            serde_json::from_str(r#"{"code":1,"content":{"estimateId":"e-1"}}"#).unwrap();
        let content = envelope.into_content().unwrap();
        assert_eq!(content["estimateId"], "e-1");
    }

    #[test]
    fn test_envelope_failure_maps_code_and_busi_code() {
        let envelope: ApiEnvelope = serde_json::from_str(
            r#"{"code":0,"msg":"too many orders","busiCode":"passengerMoreThanThreeOrder"}"#,
        )
        .unwrap();
        let err = envelope.into_content().unwrap_err();
        match err {
            ClientError::Api { code, message } => {
                assert_eq!(code, "0:passengerMoreThanThreeOrder");
                assert_eq!(message, "too many orders");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_envelope_failure_without_busi_code() {
        let envelope: ApiEnvelope = serde_json::from_str(r#"{"code":-2}"#).unwrap();
        let err = envelope.into_content().unwrap_err();
        match err {
            ClientError::Api { code, message } => {
                assert_eq!(code, "-2");
                assert_eq!(message, "provider call failed");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_field_as_string_handles_both_shapes() {
        let content: Value =
            serde_json::from_str(r#"{"orderId":"o-1","estimateId":42,"nested":{}}"#).unwrap();
        assert_eq!(field_as_string(&content, "orderId").as_deref(), Some("o-1"));
        assert_eq!(
            field_as_string(&content, "estimateId").as_deref(),
            Some("42")
        );
        assert!(field_as_string(&content, "nested").is_none());
        assert!(field_as_string(&content, "missing").is_none());
    }
}
