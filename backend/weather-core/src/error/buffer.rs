use common::ErrorLocation;

use std::collections::TryReserveError;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum BufferError {
    #[error(
        "Invalid Buffer Limits: initial capacity {initial_capacity}, maximum {max_size} at {location}"
    )]
    InvalidLimits {
        initial_capacity: usize,
        max_size: usize,
        location: ErrorLocation,
    },

    #[error(
        "Capacity Exceeded: {requested} bytes requested, limit is {max_size} bytes at {location}"
    )]
    CapacityExceeded {
        requested: usize,
        max_size: usize,
        location: ErrorLocation,
    },

    #[error("Allocation Failure: cannot grow buffer to {capacity} bytes: {source} at {location}")]
    AllocationFailure {
        capacity: usize,
        #[source]
        source: TryReserveError,
        location: ErrorLocation,
    },
}
