use crate::RedactedSecret;

/// **VALUE**: Verifies neither Debug nor Display ever print the secret.
///
/// **WHY THIS MATTERS**: Config structs holding the password derive Debug and get
/// logged. A leaky Debug impl would write the API password into log files.
///
/// **BUG THIS CATCHES**: Would catch replacing the manual Debug impl with a derive.
#[test]
fn given_secret_when_formatted_then_value_is_hidden() {
    // GIVEN: A secret
    let secret = RedactedSecret::new("hunter2-very-secret");

    // WHEN: Formatting through Debug and Display
    let debug = format!("{secret:?}");
    let display = format!("{secret}");

    // THEN: The raw value appears in neither
    assert!(!debug.contains("hunter2"));
    assert!(!display.contains("hunter2"));
    assert!(debug.contains("REDACTED"));
}

/// **VALUE**: Verifies serialization is refused rather than silently emitting the value.
///
/// **BUG THIS CATCHES**: Would catch deriving `Serialize` on the wrapper.
#[test]
fn given_secret_when_serialized_then_returns_error() {
    let secret = RedactedSecret::new("hunter2");

    let result = serde_json::to_string(&secret);

    assert!(result.is_err());
    let message = result.unwrap_err().to_string();
    assert!(!message.contains("hunter2"));
    assert!(message.contains("cannot be serialized"));
}

#[test]
fn given_secret_when_exposed_then_returns_original_and_safe_length() {
    let secret = RedactedSecret::new("abc");

    assert_eq!(secret.expose(), "abc");
    assert_eq!(secret.len(), 3);
    assert!(!secret.is_empty());
    assert!(RedactedSecret::new("").is_empty());
}
