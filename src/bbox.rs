//! Axis-aligned bounding boxes for covering-cell recovery.

use geo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A 2D axis-aligned bounding box over the quantized plane.
///
/// Thin wrapper around [`geo::Rect`] with inclusive containment: a point
/// sitting exactly on the boundary counts as inside. That matters for the
/// covering boxes produced by unhashing, where a recovered cell corner may
/// land exactly on the expanded edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox2D {
    /// The underlying geometric rectangle.
    pub rect: Rect,
}

impl BoundingBox2D {
    /// Create a bounding box from minimum and maximum coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use spatial_hash::BoundingBox2D;
    ///
    /// let bbox = BoundingBox2D::new(0.0, 0.0, 10.0, 5.0);
    /// assert_eq!(bbox.width(), 10.0);
    /// ```
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: min_x, y: min_y },
                geo::coord! { x: max_x, y: max_y },
            ),
        }
    }

    /// Create a bounding box spanning two corner points.
    pub fn from_corners(a: Point<f64>, b: Point<f64>) -> Self {
        Self {
            rect: Rect::new(a, b),
        }
    }

    /// Minimum x coordinate.
    pub fn min_x(&self) -> f64 {
        self.rect.min().x
    }

    /// Minimum y coordinate.
    pub fn min_y(&self) -> f64 {
        self.rect.min().y
    }

    /// Maximum x coordinate.
    pub fn max_x(&self) -> f64 {
        self.rect.max().x
    }

    /// Maximum y coordinate.
    pub fn max_y(&self) -> f64 {
        self.rect.max().y
    }

    /// Width of the box along the x axis.
    pub fn width(&self) -> f64 {
        self.max_x() - self.min_x()
    }

    /// Height of the box along the y axis.
    pub fn height(&self) -> f64 {
        self.max_y() - self.min_y()
    }

    /// Center point of the box.
    pub fn center(&self) -> Point<f64> {
        Point::new(
            (self.min_x() + self.max_x()) / 2.0,
            (self.min_y() + self.max_y()) / 2.0,
        )
    }

    /// Whether the box contains `point`, boundary included.
    pub fn contains_point(&self, point: &Point<f64>) -> bool {
        point.x() >= self.min_x()
            && point.x() <= self.max_x()
            && point.y() >= self.min_y()
            && point.y() <= self.max_y()
    }

    /// Whether this box and `other` overlap, boundary included.
    pub fn intersects(&self, other: &BoundingBox2D) -> bool {
        !(self.max_x() < other.min_x()
            || self.min_x() > other.max_x()
            || self.max_y() < other.min_y()
            || self.min_y() > other.max_y())
    }

    /// Grow the box by `amount` on every side.
    pub fn expand(&self, amount: f64) -> Self {
        Self::new(
            self.min_x() - amount,
            self.min_y() - amount,
            self.max_x() + amount,
            self.max_y() + amount,
        )
    }
}
