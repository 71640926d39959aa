//! Interactive tools exposed via Model Context Protocol
//!
//! Provides the `calculate_distance` implementation by delegating to the
//! configured `RouteProvider`.

use rust_mcp_sdk::{
    macros,
    schema::{CallToolRequestParams, CallToolResult, ContentBlock, TextContent, Tool},
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::mcp::rpc::{
    app_error_to_json_rpc, json_rpc_error, json_rpc_error_with_data, json_rpc_result,
};
use crate::routes_client::{Route, RouteMatrixRequest};
use crate::{errors::AppError, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistanceQueryParams {
    pub origin_address: Option<String>,
    pub destination_address: Option<String>,
}

#[macros::mcp_tool(
    name = "calculate_distance",
    description = "Calculate distance between origin and destination addresses."
)]
#[derive(Debug, Deserialize, Serialize, macros::JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CalculateDistanceTool {
    pub origin_address: String,
    pub destination_address: String,
}

pub fn build_tools_list() -> Vec<Tool> {
    vec![CalculateDistanceTool::tool()]
}

/// Extracts one address argument, distinguishing an absent key from a
/// present-but-empty string.
pub fn require_address(value: Option<String>, argument: &'static str) -> Result<String, AppError> {
    let Some(address) = value else {
        return Err(AppError::bad_request(
            "missing_argument",
            format!("missing required argument: {argument}"),
        ));
    };

    if address.is_empty() {
        return Err(AppError::bad_request(
            "empty_address",
            format!("{argument} cannot be empty"),
        ));
    }

    Ok(address)
}

pub fn format_route_summary(route: &Route) -> String {
    format!(
        "Route distance: {} meters, Duration: {}",
        route.distance_meters, route.duration
    )
}

pub async fn handle_tools_call(
    state: &AppState,
    id: Option<Value>,
    params: Option<Value>,
) -> Value {
    let Some(raw_params) = params else {
        return json_rpc_error(id, -32602, "Invalid params");
    };

    let tool_call: CallToolRequestParams = match serde_json::from_value(raw_params) {
        Ok(value) => value,
        Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
    };

    match tool_call.name.as_str() {
        "calculate_distance" => {
            let query_params: DistanceQueryParams =
                match serde_json::from_value(json!(tool_call.arguments.unwrap_or_default())) {
                    Ok(value) => value,
                    Err(_) => return json_rpc_error(id, -32602, "Invalid params"),
                };

            // Both addresses must pass before any provider traffic happens.
            let origin = match require_address(query_params.origin_address, "originAddress") {
                Ok(value) => value,
                Err(err) => return app_error_to_json_rpc(id, err),
            };
            let destination =
                match require_address(query_params.destination_address, "destinationAddress") {
                    Ok(value) => value,
                    Err(err) => return app_error_to_json_rpc(id, err),
                };

            let request = RouteMatrixRequest::for_addresses(&origin, &destination);
            match state.route_provider.compute_route_matrix(&request).await {
                Ok(response) => {
                    // Only the first route is surfaced even when the provider
                    // returns reference route alternatives.
                    let Some(route) = response.routes.first() else {
                        return app_error_to_json_rpc(id, AppError::EmptyRoutes);
                    };

                    json_rpc_result(
                        id,
                        serde_json::to_value(CallToolResult {
                            content: vec![ContentBlock::from(TextContent::new(
                                format_route_summary(route),
                                None,
                                None,
                            ))],
                            is_error: None,
                            meta: None,
                            structured_content: None,
                        })
                        .expect("calculate_distance tool result serialization"),
                    )
                }
                Err(err) => app_error_to_json_rpc(id, err),
            }
        }
        _ => json_rpc_error_with_data(
            id,
            -32601,
            "Method not found",
            Some(json!({
                "code": "tool_not_found",
                "message": "unknown tool name",
                "details": {
                    "name": tool_call.name,
                },
            })),
        ),
    }
}
