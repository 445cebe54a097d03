use weather::cli::Cli;
use weather::runner::{resolve, run};

use std::io::Write;
use std::process::ExitCode;

use serial_test::serial;
use wiremock::matchers::{any, basic_auth, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USERNAME_ENV_VAR: &str = "METEOMATICS_USERNAME";
const PASSWORD_ENV_VAR: &str = "METEOMATICS_PASSWORD";

fn set_credentials(username: Option<&str>, password: Option<&str>) {
    // SAFETY: every test touching the environment is #[serial]
    unsafe {
        for (name, value) in [(USERNAME_ENV_VAR, username), (PASSWORD_ENV_VAR, password)] {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }
}

fn cli_for(server: &MockServer) -> Cli {
    Cli {
        base_url: Some(server.uri()),
        datetime: Some("2024-10-23T00:00:00Z".into()),
        parameters: Some("t_2m:C".into()),
        location: Some("0,0".into()),
        format: Some("json".into()),
        ..Cli::default()
    }
}

async fn run_captured(cli: &Cli) -> (ExitCode, String, String) {
    let mut out = Vec::new();
    let mut err = Vec::new();
    let code = run(cli, &mut out, &mut err).await;
    (
        code,
        String::from_utf8(out).unwrap(),
        String::from_utf8(err).unwrap(),
    )
}

/// **VALUE**: End-to-end through the CLI layer: env credentials, flag overrides, redacted
/// output on stdout, nothing on stderr, success exit.
///
/// **BUG THIS CATCHES**: Would catch flags not reaching the URL, credentials not reaching
/// the Authorization header, or diagnostics leaking onto stdout.
#[tokio::test]
#[serial]
async fn given_valid_environment_when_running_then_redacted_document_on_stdout() {
    // GIVEN: Credentials in the environment and a mock API
    set_credentials(Some("alice"), Some("s3cret"));
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2024-10-23T00:00:00Z/t_2m:C/0,0/json"))
        .and(basic_auth("alice", "s3cret"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"user":"alice","credentials":"x","data":{"temp":5}}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    // WHEN: Running the CLI
    let (code, stdout, stderr) = run_captured(&cli_for(&server)).await;

    // THEN: Success with only the redacted document
    assert_eq!(code, ExitCode::SUCCESS);
    assert_eq!(stdout, "{\n  \"data\": {\n    \"temp\": 5\n  }\n}\n");
    assert!(stderr.is_empty());

    set_credentials(None, None);
}

/// **VALUE**: Verifies missing credentials give a failure exit, an `Error:` line, and no
/// network traffic.
#[tokio::test]
#[serial]
async fn given_missing_credentials_when_running_then_failure_without_request() {
    set_credentials(None, None);
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(0)
        .mount(&server)
        .await;

    let (code, stdout, stderr) = run_captured(&cli_for(&server)).await;

    assert_eq!(code, ExitCode::FAILURE);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Error: Invalid Config"));
    assert!(stderr.contains(USERNAME_ENV_VAR));
    assert!(stderr.contains(" at "));
}

/// **VALUE**: Verifies a malformed body yields a failure exit and an empty stdout.
#[tokio::test]
#[serial]
async fn given_malformed_body_when_running_then_failure_and_empty_stdout() {
    set_credentials(Some("alice"), Some("s3cret"));
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"data": {"#))
        .mount(&server)
        .await;

    let (code, stdout, stderr) = run_captured(&cli_for(&server)).await;

    assert_eq!(code, ExitCode::FAILURE);
    assert!(stdout.is_empty());
    assert!(stderr.starts_with("Error: JSON Parse Error"));

    set_credentials(None, None);
}

/// **VALUE**: Verifies precedence: flags beat the settings file, which beats defaults.
///
/// **BUG THIS CATCHES**: Would catch applying the settings file after the flags.
#[test]
#[serial]
fn given_settings_file_and_flags_when_resolving_then_flags_win() {
    set_credentials(Some("alice"), Some("s3cret"));
    let dir = tempfile::tempdir().unwrap();
    let settings_path = dir.path().join("weather.toml");
    let mut file = std::fs::File::create(&settings_path).unwrap();
    writeln!(
        file,
        "[api]\nbase_url = \"https://settings.example.test\"\n\n[request]\nlocation = \"1,1\"\nformat = \"csv\""
    )
    .unwrap();

    let cli = Cli {
        config: Some(settings_path),
        format: Some("json".into()),
        ..Cli::default()
    };

    let (pipeline, config) = resolve(&cli).unwrap();

    assert_eq!(pipeline.endpoint().as_str(), "https://settings.example.test");
    assert_eq!(config.location, "1,1");
    assert_eq!(config.format, "json");

    set_credentials(None, None);
}

#[test]
#[serial]
fn given_remote_http_base_url_when_resolving_then_invalid_config() {
    set_credentials(Some("alice"), Some("s3cret"));
    let cli = Cli {
        base_url: Some("http://api.meteomatics.com".into()),
        ..Cli::default()
    };

    let err = resolve(&cli).err().expect("plain http to a remote host must be refused");

    assert_eq!(err.kind(), weather_core::ErrorKind::InvalidConfig);

    set_credentials(None, None);
}
