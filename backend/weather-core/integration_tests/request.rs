use crate::helpers::{PASSWORD, TEST_PATH, USERNAME, endpoint_for, test_config};

use weather_core::buffer::{GrowthBuffer, ResponseSink};
use weather_core::error::{BufferError, RequestError};
use weather_core::request::RequestExecutor;

use std::net::TcpListener;

use url::Url;
use wiremock::matchers::{basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Sink that records chunk boundaries.
#[derive(Default)]
struct RecordingSink {
    chunks: Vec<Vec<u8>>,
}

impl ResponseSink for RecordingSink {
    fn append(&mut self, chunk: &[u8]) -> Result<(), BufferError> {
        self.chunks.push(chunk.to_vec());
        Ok(())
    }
}

/// **VALUE**: Verifies the executor sends one GET with Basic auth and streams the body
/// into the buffer.
///
/// **WHY THIS MATTERS**: This is the only network call of a run. The credentials must go
/// in the Authorization header, not in the URL.
///
/// **BUG THIS CATCHES**: Would catch dropping `basic_auth`, or putting the password into
/// the query string where it would land in server logs.
#[tokio::test]
async fn given_mock_api_when_executing_then_body_is_buffered() {
    // GIVEN: A mock API that requires Basic auth on the expected path
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(TEST_PATH))
        .and(basic_auth(USERNAME, PASSWORD))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data":[]}"#))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config();
    let url = endpoint_for(&server).request_url(&config).unwrap();
    let credentials = config.credentials().unwrap();
    let mut buffer = GrowthBuffer::with_default_limits().unwrap();

    // WHEN: Executing the request
    let result = RequestExecutor::new()
        .unwrap()
        .execute(url, &credentials, &mut buffer)
        .await;

    // THEN: Success and the whole body is in the buffer
    assert!(result.is_ok(), "request should succeed: {result:?}");
    assert_eq!(buffer.as_bytes(), br#"{"data":[]}"#);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn given_large_body_when_executing_then_every_byte_reaches_sink() {
    let body = vec![b'7'; 64 * 1024];
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
        .mount(&server)
        .await;

    let config = test_config();
    let url = endpoint_for(&server).request_url(&config).unwrap();
    let mut sink = RecordingSink::default();

    RequestExecutor::new()
        .unwrap()
        .execute(url, &config.credentials().unwrap(), &mut sink)
        .await
        .unwrap();

    assert_eq!(sink.chunks.concat(), body);
}

/// **VALUE**: Verifies a body past the ceiling aborts the transfer as TooLarge.
///
/// **BUG THIS CATCHES**: Would catch ignoring the sink's error and continuing to read,
/// or reporting the oversized body as success with truncated data.
#[tokio::test]
async fn given_body_over_limit_when_executing_then_too_large() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; 1000]))
        .mount(&server)
        .await;

    let config = test_config();
    let url = endpoint_for(&server).request_url(&config).unwrap();
    let mut buffer = GrowthBuffer::new(16, 256).unwrap();

    let err = RequestExecutor::new()
        .unwrap()
        .execute(url, &config.credentials().unwrap(), &mut buffer)
        .await
        .unwrap_err();

    assert!(
        matches!(err, RequestError::TooLarge { max_size: 256, .. }),
        "expected TooLarge, got {err:?}"
    );
    assert!(buffer.len() <= 256);
}

#[tokio::test]
async fn given_unauthorized_status_when_executing_then_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let config = test_config();
    let url = endpoint_for(&server).request_url(&config).unwrap();
    let mut buffer = GrowthBuffer::with_default_limits().unwrap();

    let err = RequestExecutor::new()
        .unwrap()
        .execute(url, &config.credentials().unwrap(), &mut buffer)
        .await
        .unwrap_err();

    match err {
        RequestError::Status { status_code, .. } => assert_eq!(status_code.0, 401),
        other => panic!("expected Status error, got {other:?}"),
    }
    assert!(buffer.is_empty(), "error bodies are never buffered");
}

/// **VALUE**: Verifies a refused connection is a transport error flagged as connect.
///
/// **BUG THIS CATCHES**: Would catch losing the transport layer's cause in conversion.
#[tokio::test]
async fn given_closed_port_when_executing_then_transport_error() {
    // GIVEN: A port nothing listens on
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let url = Url::parse(&format!("http://127.0.0.1:{port}/x/y/z/json")).unwrap();
    let credentials = test_config().credentials().unwrap();
    let mut buffer = GrowthBuffer::with_default_limits().unwrap();

    // WHEN: Executing
    let err = RequestExecutor::new()
        .unwrap()
        .execute(url, &credentials, &mut buffer)
        .await
        .unwrap_err();

    // THEN: Transport error with a readable cause
    assert!(err.is_connect(), "expected connect error, got {err:?}");
    assert!(err.to_string().starts_with("Transport Error: "));
}
