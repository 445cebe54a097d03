//! Append-only byte accumulator with doubling growth and a hard ceiling.
//!
//! The buffer is the sink for a network response of unknown length. Capacity
//! doubles on demand so reallocation cost is amortized, and never passes
//! `max_size` so a misbehaving server cannot exhaust memory.

use crate::error::BufferError;

use common::ErrorLocation;

use std::panic::Location;

use log::{debug, trace};

/// Starting capacity for a response buffer, in bytes.
pub const INITIAL_CAPACITY: usize = 4096;

/// Hard ceiling for a buffered response, in bytes (10 MiB).
pub const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Receives response bytes as the transport delivers them.
///
/// An `Err` means the transfer must be aborted; nothing of the rejected chunk
/// has been kept.
pub trait ResponseSink {
    fn append(&mut self, chunk: &[u8]) -> Result<(), BufferError>;
}

/// Bounded, NUL-terminated byte buffer.
///
/// Invariants: `len() <= capacity() <= max_size()`, `capacity()` is the
/// initial capacity times a power of two, and the stored bytes are always
/// followed by a single `0`.
#[derive(Debug)]
pub struct GrowthBuffer {
    /// Payload followed by the terminator.
    data: Vec<u8>,
    capacity: usize,
    max_size: usize,
}

impl GrowthBuffer {
    /// Allocate a buffer holding up to `initial_capacity` bytes before it first grows.
    ///
    /// # Errors
    ///
    /// - [`BufferError::InvalidLimits`] if `initial_capacity` is zero or above `max_size`
    /// - [`BufferError::AllocationFailure`] if the initial allocation fails
    #[track_caller]
    pub fn new(initial_capacity: usize, max_size: usize) -> Result<Self, BufferError> {
        let location = ErrorLocation::from(Location::caller());
        if initial_capacity == 0 || initial_capacity > max_size {
            return Err(BufferError::InvalidLimits {
                initial_capacity,
                max_size,
                location,
            });
        }

        let mut data = Vec::new();
        data.try_reserve_exact(initial_capacity + 1)
            .map_err(|source| BufferError::AllocationFailure {
                capacity: initial_capacity,
                source,
                location,
            })?;
        data.push(0);

        debug!("Allocated response buffer: {initial_capacity} bytes (limit {max_size})");

        Ok(Self {
            data,
            capacity: initial_capacity,
            max_size,
        })
    }

    /// Buffer with [`INITIAL_CAPACITY`] and [`MAX_RESPONSE_SIZE`].
    #[track_caller]
    pub fn with_default_limits() -> Result<Self, BufferError> {
        Self::new(INITIAL_CAPACITY, MAX_RESPONSE_SIZE)
    }

    /// Append a whole chunk, doubling capacity as often as needed.
    ///
    /// The call is atomic: on error the buffer content is exactly what it
    /// was before.
    ///
    /// # Errors
    ///
    /// - [`BufferError::CapacityExceeded`] if a doubling would pass `max_size`
    /// - [`BufferError::AllocationFailure`] if growing the allocation fails
    #[track_caller]
    pub fn append(&mut self, chunk: &[u8]) -> Result<(), BufferError> {
        let location = ErrorLocation::from(Location::caller());
        let size = self.len();
        let required = size.saturating_add(chunk.len());

        if required > self.capacity {
            let grown = self.grown_capacity(required)?;

            // `data` already holds size + 1 bytes (payload + terminator)
            self.data
                .try_reserve_exact(grown - size)
                .map_err(|source| BufferError::AllocationFailure {
                    capacity: grown,
                    source,
                    location,
                })?;

            trace!("Response buffer grew {} -> {grown} bytes", self.capacity);
            self.capacity = grown;
        }

        self.data.pop();
        self.data.extend_from_slice(chunk);
        self.data.push(0);

        Ok(())
    }

    #[track_caller]
    fn grown_capacity(&self, required: usize) -> Result<usize, BufferError> {
        let mut capacity = self.capacity;

        while capacity < required {
            capacity = match capacity.checked_mul(2) {
                Some(doubled) if doubled <= self.max_size => doubled,
                _ => {
                    return Err(BufferError::CapacityExceeded {
                        requested: required,
                        max_size: self.max_size,
                        location: ErrorLocation::from(Location::caller()),
                    });
                }
            };
        }

        Ok(capacity)
    }

    /// Number of payload bytes (terminator excluded).
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Payload bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.len()]
    }

    /// Payload bytes followed by the `0` terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.data
    }

    /// Give the memory back now instead of at end of scope.
    pub fn release(self) {
        drop(self);
    }
}

impl ResponseSink for GrowthBuffer {
    fn append(&mut self, chunk: &[u8]) -> Result<(), BufferError> {
        GrowthBuffer::append(self, chunk)
    }
}

impl Drop for GrowthBuffer {
    fn drop(&mut self) {
        debug!(
            "Released response buffer ({} of {} bytes used)",
            self.len(),
            self.capacity
        );
    }
}
