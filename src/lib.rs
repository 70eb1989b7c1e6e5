//! Quantized 2D spatial hashing with a certified rounding-error bound.
//!
//! Converts continuous `(x, y)` coordinates in a bounded plane into
//! fixed-width interleaved bit patterns ([`SpatialHash`]) whose numeric
//! ordering traces a Z-order curve, and converts such a hash back into a
//! [`BoundingBox2D`] guaranteed to contain every point that could have
//! produced it, despite finite-precision arithmetic.
//!
//! ```rust
//! use spatial_hash::{HashConverter, Parameters, Point};
//!
//! let converter = HashConverter::new(Parameters::new(-180.0, 180.0, 32)?)?;
//!
//! let point = Point::new(-74.0060, 40.7128);
//! let hash = converter.hash(&point)?;
//!
//! // The covering box is widened by the certified error bound, so the
//! // original point is always inside it.
//! let covering = converter.unhash_to_box_covering(&hash);
//! assert!(covering.contains_point(&point));
//! # Ok::<(), spatial_hash::HashError>(())
//! ```

pub mod bbox;
pub mod converter;
pub mod error;
pub mod hash;

pub use bbox::BoundingBox2D;
pub use converter::{HashConverter, MACHINE_PRECISION, Parameters};
pub use error::{HashError, Result};
pub use hash::{Axis, MAX_RESOLUTION, SpatialHash};

pub use geo::Point;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        Axis, BoundingBox2D, HashConverter, HashError, Parameters, Result, SpatialHash,
    };

    pub use geo::Point;
}
