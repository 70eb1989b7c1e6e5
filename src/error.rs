//! Error types for hash construction and coordinate conversion.

use thiserror::Error;

/// Errors produced by hash construction and coordinate conversion.
///
/// Every failure here is detected eagerly, either at construction time or
/// at the offending call. All operations are deterministic, so retrying a
/// failed call with the same input fails the same way.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HashError {
    /// A bit string of odd length, or longer than the 64 bits a hash can hold.
    #[error("invalid hash length {0}: must be even and at most 64 bits")]
    InvalidHashLength(usize),

    /// Converter parameters that describe no usable coordinate plane.
    #[error("invalid converter parameters: {0}")]
    InvalidParameters(String),

    /// Bit access past the resolution a hash was constructed with.
    #[error("level {level} out of range for a hash with {resolution} levels")]
    IndexOutOfRange {
        /// The requested subdivision level.
        level: u32,
        /// The resolution the hash actually stores.
        resolution: u32,
    },

    /// A coordinate outside the plane the converter was configured for.
    #[error("coordinate {value} outside the bounds [{min}, {max}]")]
    CoordinateOutOfBounds {
        /// The offending coordinate.
        value: f64,
        /// Lower bound of the plane.
        min: f64,
        /// Upper bound of the plane.
        max: f64,
    },
}

/// Convenience result type for this crate.
pub type Result<T> = std::result::Result<T, HashError>;
