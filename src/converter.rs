//! Conversion between continuous coordinates and [`SpatialHash`] values.
//!
//! The converter maps points of a bounded plane onto discrete buckets and
//! back. The backward mapping is only sound for containment queries if the
//! recovered cell is widened by a bound on the floating-point rounding
//! error, derived analytically in [`HashConverter::calc_unhash_to_box_error`].

use geo::Point;
use serde::{Deserialize, Serialize};

use crate::bbox::BoundingBox2D;
use crate::error::{HashError, Result};
use crate::hash::{MAX_RESOLUTION, SpatialHash};

/// Unit roundoff of `f64`: the largest relative error of one rounding.
pub const MACHINE_PRECISION: f64 = 0.5 * f64::EPSILON;

/// Number of discrete buckets per axis.
///
/// Fixed at `2^32`, the full per-axis width of the 64-bit hash, regardless
/// of the configured resolution. Bucket granularity is deliberately tied
/// to the total hash width, not to `2^bits`; range-scan layers depend on
/// this density, so it must not be "corrected" to track `bits`.
const BUCKET_COUNT: f64 = 4.0 * 1024.0 * 1024.0 * 1024.0;

/// Configuration of the bounded coordinate plane.
///
/// Both axes share the same bounds. `scaling` is carried explicitly rather
/// than recomputed internally, so a converter's behavior is fully
/// determined by an inspectable configuration value; [`Parameters::new`]
/// derives it the standard way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    /// Lower bound of both axes.
    pub min: f64,
    /// Upper bound of both axes.
    pub max: f64,
    /// Per-axis hash resolution, `1..=32`.
    pub bits: u32,
    /// Buckets per unit of continuous range.
    pub scaling: f64,
}

impl Parameters {
    /// Build parameters for the plane `[min, max]²` at `bits` resolution,
    /// deriving `scaling` from the fixed bucket count.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidParameters`] when the bounds are not an
    /// increasing finite interval or `bits` is out of range.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatial_hash::Parameters;
    ///
    /// let params = Parameters::new(-180.0, 180.0, 32)?;
    /// assert_eq!(params.scaling, 4294967296.0 / 360.0);
    /// # Ok::<(), spatial_hash::HashError>(())
    /// ```
    pub fn new(min: f64, max: f64, bits: u32) -> Result<Self> {
        let params = Self {
            min,
            max,
            bits,
            scaling: BUCKET_COUNT / (max - min),
        };
        params.validate()?;
        Ok(params)
    }

    /// Check the invariants a converter relies on.
    pub fn validate(&self) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() || self.max <= self.min {
            log::warn!(
                "rejecting converter bounds [{}, {}]: not an increasing finite interval",
                self.min,
                self.max
            );
            return Err(HashError::InvalidParameters(format!(
                "bounds [{}, {}] are not an increasing finite interval",
                self.min, self.max
            )));
        }
        if self.bits == 0 || self.bits > MAX_RESOLUTION {
            return Err(HashError::InvalidParameters(format!(
                "resolution {} outside 1..={}",
                self.bits, MAX_RESOLUTION
            )));
        }
        if !self.scaling.is_finite() || self.scaling <= 0.0 {
            return Err(HashError::InvalidParameters(format!(
                "scaling {} is not positive and finite",
                self.scaling
            )));
        }
        Ok(())
    }
}

/// Stateless converter between continuous points and spatial hashes.
///
/// Purely a function of its [`Parameters`]: no hidden state, no side
/// effects, safe to share across threads without synchronization. The
/// parameters must not change for the lifetime of any hash the converter
/// produced, or previously issued hashes lose their geometric meaning.
///
/// # Examples
///
/// ```
/// use spatial_hash::{HashConverter, Parameters, Point};
///
/// let converter = HashConverter::new(Parameters::new(-180.0, 180.0, 32)?)?;
/// let point = Point::new(-74.0060, 40.7128);
/// let hash = converter.hash(&point)?;
/// let covering = converter.unhash_to_box_covering(&hash);
/// assert!(covering.contains_point(&point));
/// # Ok::<(), spatial_hash::HashError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HashConverter {
    params: Parameters,
    /// Cached `calc_unhash_to_box_error(&params)`.
    error: f64,
}

impl HashConverter {
    /// Build a converter, validating the parameter invariants.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::InvalidParameters`] so no converter with an
    /// unsound configuration is ever used.
    pub fn new(params: Parameters) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            error: Self::calc_unhash_to_box_error(&params),
            params,
        })
    }

    /// The parameters this converter was built from.
    pub fn params(&self) -> &Parameters {
        &self.params
    }

    /// The cached absolute error bound applied by covering-box recovery.
    pub fn error_bound(&self) -> f64 {
        self.error
    }

    /// Absolute error bound for unhashing a hash to a box.
    ///
    /// Expanding the recovered cell by this bound guarantees that every
    /// point whose true location hashes to the cell is contained by the
    /// box, for all inputs, not just observed ones. The bound is composed
    /// from three independently bounded sources under first-order error
    /// propagation (absolute errors add under `+`/`-`, relative errors add
    /// under `*`/`/`), with `M = max(|min|, |max|)` and `u` the unit
    /// roundoff of `f64`:
    ///
    /// 1. Bucket assignment. With `h(x) = (x - min) * scaling`, the
    ///    relative error of `x - min` is at most `2Mu / |x - min|` and the
    ///    relative error of `scaling` (an exact power of two divided by
    ///    `max - min`) is at most `2Mu / |max - min|`, so
    ///    `|delta_h(x)| <= 2Mu * (1 + |x - min| / |max - min|) * scaling
    ///    <= 4Mu * scaling`. By monotonicity of `h`, a point can therefore
    ///    only be assigned a bucket whose exact preimage lies within
    ///    `|delta_h(x)| / scaling <= 4Mu` of it.
    ///
    /// 2. Corner recovery. With `uh(h) = h / scaling + min` and `h` an
    ///    exactly represented integer,
    ///    `|delta_uh(h)| <= (2Mu / |max - min|) * |max - min| + |min| * u
    ///    <= 3Mu`.
    ///
    /// 3. Opposite corner. The edge is added to the recovered corner;
    ///    `size_edge` scales `max - min` by an exact power of two, so
    ///    `|delta_edge| = 2Mu * 2^-level <= Mu` for any level >= 1.
    ///
    /// Total: `4Mu + 3Mu + Mu = 8Mu`. Any change of the floating-point
    /// width requires re-deriving `u` and recomposing this bound.
    pub fn calc_unhash_to_box_error(params: &Parameters) -> f64 {
        8.0 * params.min.abs().max(params.max.abs()) * MACHINE_PRECISION
    }

    /// Hash a point to the covering cell at the configured resolution.
    ///
    /// # Errors
    ///
    /// Returns [`HashError::CoordinateOutOfBounds`] when either coordinate
    /// falls outside `[min, max]`.
    pub fn hash(&self, point: &Point<f64>) -> Result<SpatialHash> {
        let x = self.convert_to_hash_scale(point.x())?;
        let y = self.convert_to_hash_scale(point.y())?;
        SpatialHash::from_coordinates_at(x, y, self.params.bits)
    }

    /// Affine transform of a coordinate into hash scale:
    /// `(x - min) * scaling`.
    ///
    /// Exposed separately because the error analysis treats the scalar
    /// mapping in isolation.
    pub fn convert_to_double_hash_scale(&self, coordinate: f64) -> f64 {
        (coordinate - self.params.min) * self.params.scaling
    }

    /// Inverse affine transform out of hash scale: `h / scaling + min`.
    pub fn convert_double_from_hash_scale(&self, hash_scale: f64) -> f64 {
        hash_scale / self.params.scaling + self.params.min
    }

    /// Edge length of a cell at `level`: `(max - min) * 2^-level`.
    ///
    /// The power of two is exact, so the only rounding beyond `max - min`
    /// itself is the single final multiply. The error-bound composition
    /// above relies on this.
    pub fn size_edge(&self, level: u32) -> f64 {
        (self.params.max - self.params.min) * 2f64.powi(-(level as i32))
    }

    /// Lower-left corner of the cell a hash identifies.
    pub fn unhash_to_point(&self, hash: &SpatialHash) -> Point<f64> {
        let (x, y) = hash.unhash();
        Point::new(
            self.convert_double_from_hash_scale(x as f64),
            self.convert_double_from_hash_scale(y as f64),
        )
    }

    /// The box guaranteed to contain every point that hashes to `hash`.
    ///
    /// The idealized cell is widened on all sides by the certified error
    /// bound; returning the bare cell could silently exclude legitimate
    /// points near its boundary from a range query. A zero-resolution hash
    /// covers the whole plane and needs no widening.
    pub fn unhash_to_box_covering(&self, hash: &SpatialHash) -> BoundingBox2D {
        if hash.resolution() == 0 {
            return BoundingBox2D::new(
                self.params.min,
                self.params.min,
                self.params.max,
                self.params.max,
            );
        }
        let corner = self.unhash_to_point(hash);
        let edge = self.size_edge(hash.resolution());
        BoundingBox2D::new(
            corner.x(),
            corner.y(),
            corner.x() + edge,
            corner.y() + edge,
        )
        .expand(self.error)
    }

    /// Truncate a hash-scale value to its bucket.
    ///
    /// Rounding may push the topmost coordinate to exactly the bucket
    /// count; that single case is clamped back into range by design, it is
    /// not an error path.
    fn convert_to_hash_scale(&self, coordinate: f64) -> Result<u32> {
        // Negated so NaN fails the check instead of slipping through.
        if !(coordinate >= self.params.min && coordinate <= self.params.max) {
            return Err(HashError::CoordinateOutOfBounds {
                value: coordinate,
                min: self.params.min,
                max: self.params.max,
            });
        }
        let scaled = self.convert_to_double_hash_scale(coordinate);
        if scaled >= BUCKET_COUNT {
            Ok(u32::MAX)
        } else {
            Ok(scaled as u32)
        }
    }
}
