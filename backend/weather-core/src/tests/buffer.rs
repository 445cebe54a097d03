// Unit tests for the growth buffer
// Covers doubling, the hard ceiling, atomic appends and the terminator

use crate::buffer::{GrowthBuffer, INITIAL_CAPACITY, MAX_RESPONSE_SIZE, ResponseSink};
use crate::error::BufferError;

/// **VALUE**: Verifies appended chunks come out in order and concatenated.
///
/// **WHY THIS MATTERS**: The network delivers the body in arbitrary chunk sizes. If
/// growth loses or reorders bytes, the JSON parser sees a corrupted document.
///
/// **BUG THIS CATCHES**: Would catch overwriting the old terminator in the wrong place
/// or copying only part of a chunk after a reallocation.
#[test]
fn given_chunks_below_limit_when_appended_then_content_is_concatenation() {
    // GIVEN: A small buffer with room to grow
    let mut buffer = GrowthBuffer::new(4, 1024).unwrap();
    let chunks: [&[u8]; 5] = [b"{\"a\"", b":", b"", b"[1,2,3,4,5,6,7,8]", b"}"];

    // WHEN: Appending every chunk
    let mut expected = Vec::new();
    for chunk in chunks {
        buffer.append(chunk).unwrap();
        expected.extend_from_slice(chunk);
    }

    // THEN: Content equals the concatenation, in order
    assert_eq!(buffer.as_bytes(), expected.as_slice());
    assert_eq!(buffer.len(), expected.len());
}

/// **VALUE**: Verifies capacity only ever doubles and always covers the content.
///
/// **BUG THIS CATCHES**: Would catch "grow to fit" instead of doubling, or a single
/// doubling that still leaves the chunk overflowing the buffer.
#[test]
fn given_growing_content_when_appending_then_capacity_is_power_of_two_multiple() {
    let initial = 8;
    let mut buffer = GrowthBuffer::new(initial, 4096).unwrap();
    let mut previous_capacity = buffer.capacity();

    for chunk_len in [3, 5, 1, 20, 7, 100, 0, 300] {
        buffer.append(&vec![b'x'; chunk_len]).unwrap();

        let capacity = buffer.capacity();
        assert!(capacity >= buffer.len(), "capacity must cover content");
        assert!(capacity >= previous_capacity, "capacity never shrinks");
        assert_eq!(capacity % initial, 0);
        assert!((capacity / initial).is_power_of_two());
        previous_capacity = capacity;
    }
}

/// **VALUE**: Verifies a chunk needing several doublings is absorbed in one call.
///
/// **BUG THIS CATCHES**: Would catch doubling only once, which writes past the end of
/// the allocation when a chunk is more than twice the current capacity.
#[test]
fn given_chunk_larger_than_double_when_appended_then_doubles_until_it_fits() {
    let mut buffer = GrowthBuffer::new(4, 1024).unwrap();

    buffer.append(&[7u8; 100]).unwrap();

    assert_eq!(buffer.capacity(), 128);
    assert_eq!(buffer.len(), 100);
}

/// **VALUE**: Verifies the ceiling rejects a chunk and leaves prior content untouched.
///
/// **WHY THIS MATTERS**: A hostile server can send an endless body. The buffer must stop
/// it and the error must reach the transfer so it can abort.
///
/// **BUG THIS CATCHES**: Would catch partially writing the chunk before failing, or
/// silently truncating instead of reporting an error.
#[test]
fn given_chunk_past_max_size_when_appended_then_capacity_exceeded_and_unchanged() {
    // GIVEN: A buffer that already holds data
    let mut buffer = GrowthBuffer::new(4, 16).unwrap();
    buffer.append(b"0123456789").unwrap();
    let capacity_before = buffer.capacity();

    // WHEN: Appending a chunk that would push the size past 16
    let result = buffer.append(b"abcdefg");

    // THEN: CapacityExceeded, nothing changed
    match result {
        Err(BufferError::CapacityExceeded {
            requested,
            max_size,
            ..
        }) => {
            assert_eq!(requested, 17);
            assert_eq!(max_size, 16);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
    assert_eq!(buffer.as_bytes(), b"0123456789");
    assert_eq!(buffer.capacity(), capacity_before);
    assert_eq!(buffer.as_bytes_with_nul().last(), Some(&0));
}

/// **VALUE**: Verifies the effective ceiling is the largest doubling within `max_size`.
///
/// **BUG THIS CATCHES**: Would catch growing to exactly `max_size` when it is not a
/// power-of-two multiple of the initial capacity.
#[test]
fn given_max_not_power_of_two_multiple_when_filling_then_stops_at_last_doubling() {
    let mut buffer = GrowthBuffer::new(4, 20).unwrap();

    buffer.append(&[1u8; 16]).unwrap();
    assert_eq!(buffer.capacity(), 16);

    let result = buffer.append(&[1u8]);
    assert!(matches!(result, Err(BufferError::CapacityExceeded { .. })));
    assert_eq!(buffer.len(), 16);
}

/// **VALUE**: Verifies content is NUL-terminated after every successful append.
///
/// **BUG THIS CATCHES**: Would catch dropping the terminator when a reallocation happens.
#[test]
fn given_any_append_when_reading_with_nul_then_terminator_follows_content() {
    let mut buffer = GrowthBuffer::new(2, 64).unwrap();
    assert_eq!(buffer.as_bytes_with_nul(), b"\0");

    for chunk in [&b"ab"[..], b"cde", b"", b"fghij"] {
        buffer.append(chunk).unwrap();
        let with_nul = buffer.as_bytes_with_nul();
        assert_eq!(with_nul.len(), buffer.len() + 1);
        assert_eq!(with_nul[buffer.len()], 0);
        assert_eq!(&with_nul[..buffer.len()], buffer.as_bytes());
    }
}

#[test]
fn given_zero_or_oversized_initial_capacity_when_created_then_invalid_limits() {
    assert!(matches!(
        GrowthBuffer::new(0, 16),
        Err(BufferError::InvalidLimits { .. })
    ));
    assert!(matches!(
        GrowthBuffer::new(32, 16),
        Err(BufferError::InvalidLimits { .. })
    ));
}

#[test]
fn given_default_limits_when_created_then_uses_4k_and_10mib() {
    let buffer = GrowthBuffer::with_default_limits().unwrap();

    assert_eq!(buffer.capacity(), INITIAL_CAPACITY);
    assert_eq!(buffer.max_size(), MAX_RESPONSE_SIZE);
    assert_eq!(MAX_RESPONSE_SIZE, 10 * 1024 * 1024);
    assert!(buffer.is_empty());
}

/// **VALUE**: Verifies the sink trait forwards to the same atomic append.
///
/// **BUG THIS CATCHES**: Would catch a sink impl that swallows the ceiling error, which
/// would let the transfer keep streaming after the buffer is full.
#[test]
fn given_buffer_as_sink_when_over_limit_then_error_is_reported() {
    fn push<S: ResponseSink>(sink: &mut S, chunk: &[u8]) -> Result<(), BufferError> {
        sink.append(chunk)
    }

    let mut buffer = GrowthBuffer::new(4, 8).unwrap();
    push(&mut buffer, b"1234").unwrap();

    assert!(push(&mut buffer, b"56789").is_err());
    assert_eq!(buffer.as_bytes(), b"1234");
}

/// **VALUE**: Verifies buffer errors point at the caller, not at buffer internals.
///
/// **BUG THIS CATCHES**: Would catch reading `Location::caller()` inside a `map_err`
/// closure, which records the closure's line in `buffer/mod.rs`.
#[test]
fn given_failed_allocation_or_append_when_reported_then_location_is_call_site() {
    let alloc_line = line!() + 1;
    let alloc_err = GrowthBuffer::new(isize::MAX as usize, usize::MAX).unwrap_err();
    let mut buffer = GrowthBuffer::new(4, 8).unwrap();
    let append_line = line!() + 1;
    let append_err = buffer.append(&[0u8; 9]).unwrap_err();

    match alloc_err {
        BufferError::AllocationFailure { location, .. } => {
            assert_eq!(location.file, file!());
            assert_eq!(location.line, alloc_line);
        }
        other => panic!("expected AllocationFailure, got {other:?}"),
    }
    match append_err {
        BufferError::CapacityExceeded { location, .. } => {
            assert_eq!(location.file, file!());
            assert_eq!(location.line, append_line);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
}
