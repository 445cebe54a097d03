use std::path::Path;
use std::process::{Command, Output};

use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const WEATHER_BIN: &str = env!("CARGO_BIN_EXE_weather");

/// Run the built binary with a clean environment from an empty directory.
fn run_weather(work_dir: &Path, env: &[(&str, &str)], args: &[&str]) -> Output {
    Command::new(WEATHER_BIN)
        .env_clear()
        .envs(env.iter().copied())
        .current_dir(work_dir)
        .args(args)
        .output()
        .expect("weather binary should start")
}

fn assert_only_error_lines(output: &Output) {
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.is_empty(), "a failure must be reported");
    for line in stderr.lines() {
        assert!(line.starts_with("Error: "), "unexpected stderr line: {line:?}");
    }
}

/// **VALUE**: Verifies the real binary reports a config failure as a single `Error:`
/// line, with exit status 1 and nothing on stdout.
///
/// **WHY THIS MATTERS**: Scripts read stderr line by line. A log record in front of the
/// `Error:` line changes what they see.
///
/// **BUG THIS CATCHES**: Would catch the runner logging the failure at a level that is
/// printed by default, on top of reporting it.
#[test]
fn given_no_credentials_when_binary_runs_then_stderr_is_one_error_line() {
    // GIVEN: No environment at all and no .env file
    let work_dir = tempfile::tempdir().unwrap();

    // WHEN: Running the binary
    let output = run_weather(work_dir.path(), &[], &[]);

    // THEN: Exit 1, empty stdout, exactly one `Error:` line
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_only_error_lines(&output);
    assert_eq!(String::from_utf8_lossy(&output.stderr).lines().count(), 1);
}

/// **VALUE**: Verifies warnings raised inside the executor stay off stderr by default.
///
/// **BUG THIS CATCHES**: Would catch the executor's `warn!` on a rejected status reaching
/// stderr without `-v`.
#[tokio::test]
async fn given_unauthorized_response_when_binary_runs_then_stderr_is_only_error_lines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"password\":\"leak\"}"))
        .expect(1)
        .mount(&server)
        .await;
    let work_dir = tempfile::tempdir().unwrap();
    let base_url = server.uri();

    let output = tokio::task::spawn_blocking(move || {
        run_weather(
            work_dir.path(),
            &[
                ("METEOMATICS_USERNAME", "alice"),
                ("METEOMATICS_PASSWORD", "s3cret"),
                ("WEATHER_BASE_URL", &base_url),
            ],
            &[],
        )
    })
    .await
    .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert_only_error_lines(&output);
    assert!(!String::from_utf8_lossy(&output.stderr).contains("leak"));
}

/// **VALUE**: Verifies `-v` is what turns stderr logging on.
#[test]
fn given_verbose_flag_when_binary_fails_then_log_lines_precede_error() {
    let work_dir = tempfile::tempdir().unwrap();

    let output = run_weather(work_dir.path(), &[], &["-v"]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.lines().any(|line| !line.starts_with("Error: ")));
    assert!(stderr.lines().last().unwrap().starts_with("Error: "));
}
