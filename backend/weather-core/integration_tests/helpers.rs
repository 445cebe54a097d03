use weather_core::RequestConfig;
use weather_core::endpoint::ApiEndpoint;

use wiremock::MockServer;

pub const USERNAME: &str = "alice";
pub const PASSWORD: &str = "s3cret";

/// Config with valid credentials and a short, predictable request path.
pub fn test_config() -> RequestConfig {
    RequestConfig {
        datetime: "2024-10-23T00:00:00Z".to_string(),
        parameters: "t_2m:C".to_string(),
        location: "0,0".to_string(),
        format: "json".to_string(),
        ..RequestConfig::with_credentials(USERNAME, PASSWORD)
    }
}

pub const TEST_PATH: &str = "/2024-10-23T00:00:00Z/t_2m:C/0,0/json";

pub fn endpoint_for(server: &MockServer) -> ApiEndpoint {
    ApiEndpoint::parse(&server.uri()).expect("mock server URI is loopback http")
}
