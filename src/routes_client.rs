//! Google Routes API client for route matrix distance lookups
//!
//! Translates an address pair into a `computeRouteMatrix` call and decodes
//! the reply into typed routes. The HTTP collaborator sits behind the
//! `RouteProvider` trait so tool handlers can run against a test double.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const ROUTE_MATRIX_URL: &str =
    "https://routes.googleapis.com/distanceMatrix/v2:computeRouteMatrix";
pub const FIELD_MASK: &str = "routes.duration,routes.routeLabels,routes.distanceMeters";

const TRAVEL_MODE: &str = "DRIVE";
const ROUTING_PREFERENCE: &str = "TRAFFIC_AWARE";
const REFERENCE_ROUTES: [&str; 1] = ["SHORTER_DISTANCE"];
const LANGUAGE_CODE: &str = "en-US";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AddressWaypoint {
    pub address: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteMatrixRequest {
    pub origins: Vec<AddressWaypoint>,
    pub destinations: Vec<AddressWaypoint>,
    pub travel_mode: String,
    pub routing_preference: String,
    pub requested_reference_routes: Vec<String>,
    pub language_code: String,
}

impl RouteMatrixRequest {
    /// Builds the outbound payload for one origin/destination pair.
    ///
    /// Travel mode and routing preference are contract constants and are
    /// never caller-configurable.
    pub fn for_addresses(origin: &str, destination: &str) -> Self {
        Self {
            origins: vec![AddressWaypoint {
                address: origin.to_string(),
            }],
            destinations: vec![AddressWaypoint {
                address: destination.to_string(),
            }],
            travel_mode: TRAVEL_MODE.to_string(),
            routing_preference: ROUTING_PREFERENCE.to_string(),
            requested_reference_routes: REFERENCE_ROUTES
                .iter()
                .map(|route| route.to_string())
                .collect(),
            language_code: LANGUAGE_CODE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default)]
    pub distance_meters: u64,
    pub duration: String,
    #[serde(default)]
    pub route_labels: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RouteMatrixResponse {
    #[serde(default)]
    pub routes: Vec<Route>,
}

#[async_trait]
pub trait RouteProvider: Send + Sync {
    async fn compute_route_matrix(
        &self,
        request: &RouteMatrixRequest,
    ) -> Result<RouteMatrixResponse, AppError>;
}

pub struct GoogleRoutesClient {
    api_key: String,
    endpoint: String,
    http: reqwest::Client,
}

impl GoogleRoutesClient {
    pub fn new(api_key: &str) -> Result<Self, AppError> {
        Self::with_endpoint(api_key, ROUTE_MATRIX_URL)
    }

    pub fn with_endpoint(api_key: &str, endpoint: impl Into<String>) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|err| AppError::internal(format!("failed to build http client: {err}")))?;

        Ok(Self {
            api_key: api_key.to_string(),
            endpoint: endpoint.into(),
            http,
        })
    }
}

#[async_trait]
impl RouteProvider for GoogleRoutesClient {
    async fn compute_route_matrix(
        &self,
        request: &RouteMatrixRequest,
    ) -> Result<RouteMatrixResponse, AppError> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(request)
            .send()
            .await
            .map_err(|err| AppError::transport(format!("failed to execute request: {err}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| AppError::transport(format!("failed to read response body: {err}")))?;

        if status != reqwest::StatusCode::OK {
            return Err(AppError::provider(status.as_u16(), body));
        }

        let decoded: RouteMatrixResponse = serde_json::from_str(&body)
            .map_err(|err| AppError::decode(format!("failed to unmarshal response: {err}")))?;

        if decoded.routes.is_empty() {
            return Err(AppError::EmptyRoutes);
        }

        Ok(decoded)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, headers, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::{
        GoogleRoutesClient, RouteMatrixRequest, RouteProvider, FIELD_MASK, ROUTE_MATRIX_URL,
    };
    use crate::errors::AppError;

    #[test]
    fn payload_carries_fixed_travel_parameters() {
        let request = RouteMatrixRequest::for_addresses("New York", "Los Angeles");

        assert_eq!(request.origins[0].address, "New York");
        assert_eq!(request.destinations[0].address, "Los Angeles");
        assert_eq!(request.travel_mode, "DRIVE");
        assert_eq!(request.routing_preference, "TRAFFIC_AWARE");
        assert_eq!(request.requested_reference_routes, vec!["SHORTER_DISTANCE"]);
        assert_eq!(request.language_code, "en-US");
    }

    #[test]
    fn payload_is_deterministic() {
        let first = RouteMatrixRequest::for_addresses("Berlin", "Hamburg");
        let second = RouteMatrixRequest::for_addresses("Berlin", "Hamburg");

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_value(&first).expect("payload serialization"),
            serde_json::to_value(&second).expect("payload serialization"),
        );
    }

    #[test]
    fn payload_serializes_with_camel_case_keys() {
        let request = RouteMatrixRequest::for_addresses("Berlin", "Hamburg");
        let value = serde_json::to_value(&request).expect("payload serialization");

        assert_eq!(value["origins"][0]["address"], json!("Berlin"));
        assert_eq!(value["destinations"][0]["address"], json!("Hamburg"));
        assert_eq!(value["travelMode"], json!("DRIVE"));
        assert_eq!(value["routingPreference"], json!("TRAFFIC_AWARE"));
        assert_eq!(value["requestedReferenceRoutes"], json!(["SHORTER_DISTANCE"]));
        assert_eq!(value["languageCode"], json!("en-US"));
    }

    #[test]
    fn production_endpoint_is_compute_route_matrix() {
        assert_eq!(
            ROUTE_MATRIX_URL,
            "https://routes.googleapis.com/distanceMatrix/v2:computeRouteMatrix"
        );
        assert_eq!(
            FIELD_MASK,
            "routes.duration,routes.routeLabels,routes.distanceMeters"
        );
    }

    fn client_for(server: &MockServer) -> GoogleRoutesClient {
        GoogleRoutesClient::with_endpoint("test-key", format!("{}/matrix", server.uri()))
            .expect("client construction")
    }

    #[tokio::test]
    async fn sends_expected_headers_and_body() {
        let server = MockServer::start().await;
        let request = RouteMatrixRequest::for_addresses("New York", "Los Angeles");

        Mock::given(method("POST"))
            .and(path("/matrix"))
            .and(header("content-type", "application/json"))
            .and(header("X-Goog-Api-Key", "test-key"))
            // wiremock treats comma-joined header values as multi-valued, so
            // the exact-match form of this expectation must use `headers`.
            .and(headers(
                "X-Goog-FieldMask",
                FIELD_MASK.split(',').collect::<Vec<_>>(),
            ))
            .and(body_json(&request))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "routes": [
                    {"distanceMeters": 4488853, "duration": "151441s", "routeLabels": ["DEFAULT_ROUTE"]}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let response = client
            .compute_route_matrix(&request)
            .await
            .expect("successful matrix call");

        assert_eq!(response.routes.len(), 1);
        assert_eq!(response.routes[0].distance_meters, 4_488_853);
        assert_eq!(response.routes[0].duration, "151441s");
        assert_eq!(response.routes[0].route_labels, vec!["DEFAULT_ROUTE"]);
    }

    #[tokio::test]
    async fn non_ok_status_surfaces_status_and_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/matrix"))
            .respond_with(ResponseTemplate::new(403).set_body_string("API key invalid"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = RouteMatrixRequest::for_addresses("New York", "Los Angeles");
        let error = client
            .compute_route_matrix(&request)
            .await
            .expect_err("expected provider error");

        assert!(matches!(error, AppError::Provider { status: 403, .. }));
        assert!(error.to_string().contains("403"));
        assert!(error.to_string().contains("API key invalid"));
    }

    #[tokio::test]
    async fn malformed_body_yields_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/matrix"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = RouteMatrixRequest::for_addresses("New York", "Los Angeles");
        let error = client
            .compute_route_matrix(&request)
            .await
            .expect_err("expected decode error");

        assert!(matches!(error, AppError::Decode { .. }));
    }

    #[tokio::test]
    async fn empty_route_list_yields_empty_result_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/matrix"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"routes": []})))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let request = RouteMatrixRequest::for_addresses("New York", "Los Angeles");
        let error = client
            .compute_route_matrix(&request)
            .await
            .expect_err("expected empty result error");

        assert!(matches!(error, AppError::EmptyRoutes));
    }

    #[tokio::test]
    async fn connection_failure_yields_transport_error() {
        // Bind and drop a listener so the port is very likely closed.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let client = GoogleRoutesClient::with_endpoint("test-key", format!("http://{addr}/matrix"))
            .expect("client construction");
        let request = RouteMatrixRequest::for_addresses("New York", "Los Angeles");
        let error = client
            .compute_route_matrix(&request)
            .await
            .expect_err("expected transport error");

        assert!(matches!(error, AppError::Transport { .. }));
    }
}
