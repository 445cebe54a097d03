// Unit tests for failure reporting

use crate::runner::report_failure;

use std::fmt;

struct Failure;

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transport Error: connection refused at src/request/mod.rs:1:1")
    }
}

#[test]
fn given_failure_when_reported_then_single_error_line() {
    let mut err = Vec::new();

    report_failure(&Failure, &mut err);

    assert_eq!(
        String::from_utf8(err).unwrap(),
        "Error: Transport Error: connection refused at src/request/mod.rs:1:1\n"
    );
}
