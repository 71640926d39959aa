//! Manual smoke test against the live Routes API.
//!
//! Issues one route matrix request for a fixed sample address pair and
//! prints every returned route. Needs a real GOOGLE_API_KEY; not part of
//! the service contract.

use geodistance_mcp::config::Config;
use geodistance_mcp::routes_client::{GoogleRoutesClient, RouteMatrixRequest, RouteProvider};

const SAMPLE_ORIGIN: &str = "Empire State Building, New York, NY";
const SAMPLE_DESTINATION: &str = "Golden Gate Bridge, San Francisco, CA";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;
    let client = GoogleRoutesClient::new(&config.google_api_key)?;

    let request = RouteMatrixRequest::for_addresses(SAMPLE_ORIGIN, SAMPLE_DESTINATION);
    println!("{SAMPLE_ORIGIN} -> {SAMPLE_DESTINATION}");

    let response = client.compute_route_matrix(&request).await?;
    for (index, route) in response.routes.iter().enumerate() {
        println!(
            "route {index}: {} meters, {} [{}]",
            route.distance_meters,
            route.duration,
            route.route_labels.join(", ")
        );
    }

    Ok(())
}
