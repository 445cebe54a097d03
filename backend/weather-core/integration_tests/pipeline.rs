use crate::helpers::{PASSWORD, USERNAME, endpoint_for, test_config};

use weather_core::pipeline::BufferLimits;
use weather_core::{ErrorKind, RequestConfig, WeatherPipeline};

use wiremock::matchers::{any, basic_auth, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve(body: &'static str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(basic_auth(USERNAME, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(&server)
        .await;
    server
}

/// **VALUE**: End-to-end: credential fields in the response never reach the output.
///
/// **WHY THIS MATTERS**: This is the one guarantee a user of the tool relies on when
/// piping its output somewhere shared.
///
/// **BUG THIS CATCHES**: Would catch formatting the document before redaction, or any
/// stage writing raw response bytes to the output.
#[tokio::test]
async fn given_response_echoing_credentials_when_run_then_output_is_redacted() {
    // GIVEN: An API that echoes user and password
    let server = serve(r#"{"user":"a","password":"b","data":{"temp":5}}"#).await;
    let pipeline = WeatherPipeline::new(endpoint_for(&server));
    let mut out = Vec::new();

    // WHEN: Running the pipeline
    pipeline.run(&test_config(), &mut out).await.unwrap();

    // THEN: Only the data, 2-space indented, newline-terminated
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "{\n  \"data\": {\n    \"temp\": 5\n  }\n}\n"
    );
}

/// **VALUE**: Verifies missing or empty credentials stop the run before any request.
///
/// **WHY THIS MATTERS**: Sending an unauthenticated request wastes API quota and can
/// lock the account after repeated failures.
///
/// **BUG THIS CATCHES**: Would catch reordering stages so the request is built and sent
/// before credentials are checked.
#[tokio::test]
async fn given_invalid_credentials_when_run_then_no_request_and_invalid_config() {
    // GIVEN: A server that must not be called
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;
    let pipeline = WeatherPipeline::new(endpoint_for(&server));

    let absent = RequestConfig::default();
    let empty_user = RequestConfig::with_credentials("", PASSWORD);
    let empty_password = RequestConfig::with_credentials(USERNAME, "");

    for config in [absent, empty_user, empty_password] {
        let mut out = Vec::new();

        // WHEN: Running with bad credentials
        let err = pipeline.run(&config, &mut out).await.unwrap_err();

        // THEN: InvalidConfig, nothing written
        assert_eq!(err.kind(), ErrorKind::InvalidConfig);
        assert!(out.is_empty());
    }

    // AND: Zero requests reached the server
    assert!(server.received_requests().await.unwrap().is_empty());
}

/// **VALUE**: Verifies a malformed body produces no output at all.
///
/// **BUG THIS CATCHES**: Would catch printing the raw body as a fallback, or emitting a
/// partial document.
#[tokio::test]
async fn given_truncated_json_when_run_then_parse_error_and_no_output() {
    let server = serve(r#"{"data": {"temp": 5"#).await;
    let pipeline = WeatherPipeline::new(endpoint_for(&server));
    let mut out = Vec::new();

    let err = pipeline.run(&test_config(), &mut out).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Parse);
    assert!(out.is_empty());
}

/// **VALUE**: Verifies an oversized response fails as a transport error with no output.
///
/// **BUG THIS CATCHES**: Would catch treating the first `max_size` bytes as the response.
#[tokio::test]
async fn given_oversized_response_when_run_then_transport_error_and_no_output() {
    let server = serve(r#"{"data":"0123456789012345678901234567890123456789"}"#).await;
    let pipeline = WeatherPipeline::new(endpoint_for(&server)).with_limits(BufferLimits {
        initial_capacity: 8,
        max_size: 32,
    });
    let mut out = Vec::new();

    let err = pipeline.run(&test_config(), &mut out).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("Response Too Large"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn given_url_too_long_when_run_then_url_construction_error_without_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let mut config = test_config();
    config.parameters = "t_2m:C,".repeat(80);
    let mut out = Vec::new();

    let err = WeatherPipeline::new(endpoint_for(&server))
        .run(&config, &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UrlConstruction);
    assert!(out.is_empty());
}

/// **VALUE**: Verifies a dot segment stops the run before any request is sent.
///
/// **BUG THIS CATCHES**: Would catch `..` silently removing the datetime segment and the
/// request going out for a different resource.
#[tokio::test]
async fn given_dot_dot_datetime_when_run_then_invalid_config_without_request() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;
    let mut config = test_config();
    config.datetime = "..".to_string();
    let mut out = Vec::new();

    let err = WeatherPipeline::new(endpoint_for(&server))
        .run(&config, &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidConfig);
    assert!(out.is_empty());
}

#[tokio::test]
async fn given_server_error_status_when_run_then_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503).set_body_string(r#"{"status":"down"}"#))
        .mount(&server)
        .await;
    let mut out = Vec::new();

    let err = WeatherPipeline::new(endpoint_for(&server))
        .run(&test_config(), &mut out)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(err.to_string().contains("503"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn given_zero_initial_capacity_when_run_then_invalid_memory() {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    let pipeline = WeatherPipeline::new(endpoint_for(&server)).with_limits(BufferLimits {
        initial_capacity: 0,
        max_size: 32,
    });

    let err = pipeline.fetch(&test_config()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidMemory);
}

/// **VALUE**: Verifies `fetch` hands back the sanitized document without formatting it.
#[tokio::test]
async fn given_clean_response_when_fetched_then_document_matches_body() {
    let server = serve(r#"{"version":"3.0","data":[{"parameter":"t_2m:C"}]}"#).await;

    let document = WeatherPipeline::new(endpoint_for(&server))
        .fetch(&test_config())
        .await
        .unwrap();

    assert_eq!(document.as_value()["version"], "3.0");
    assert_eq!(document.as_value()["data"][0]["parameter"], "t_2m:C");
}
