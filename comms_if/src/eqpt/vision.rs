//! # Vision Equipment Communications Module
//!
//! Output of the object tracker, as consumed by the follower.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Serialize, Deserialize};
use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Rectangle around the tracked object in the camera frame.
///
/// Coordinates are in pixels with the origin at the top-left of the frame. Values are passed on
/// exactly as the tracker produced them, no bounds checking is performed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, StructOpt)]
pub struct BoundingBox {
    /// Left edge of the box.
    ///
    /// Units: pixels
    #[structopt(allow_hyphen_values = true)]
    pub x: i32,

    /// Top edge of the box.
    ///
    /// Units: pixels
    #[structopt(allow_hyphen_values = true)]
    pub y: i32,

    /// Width of the box.
    ///
    /// Units: pixels
    #[structopt(allow_hyphen_values = true)]
    pub width: i32,

    /// Height of the box.
    ///
    /// Units: pixels
    #[structopt(allow_hyphen_values = true)]
    pub height: i32,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Horizontal centre of the box, rounded towards the left edge.
    ///
    /// Computed in 64 bits, like the area, so that boxes at the edges of the `i32` range cannot
    /// overflow.
    pub fn centre_x(&self) -> i64 {
        self.x as i64 + self.width as i64 / 2
    }

    /// Area of the box in square pixels.
    ///
    /// Computed in 64 bits so that large boxes cannot overflow.
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_geometry() {
        let bb = BoundingBox::new(100, 100, 50, 50);
        assert_eq!(bb.centre_x(), 125);
        assert_eq!(bb.area(), 2500);

        // Odd widths round down
        let bb = BoundingBox::new(0, 0, 5, 3);
        assert_eq!(bb.centre_x(), 2);
        assert_eq!(bb.area(), 15);

        // Negative sizes are not validated
        let bb = BoundingBox::new(10, 0, -4, 2);
        assert_eq!(bb.centre_x(), 8);
        assert_eq!(bb.area(), -8);

        // Extremes of the i32 range
        let bb = BoundingBox::new(i32::MAX, 0, i32::MAX, 10);
        assert_eq!(bb.centre_x(), i32::MAX as i64 + (i32::MAX / 2) as i64);

        let bb = BoundingBox::new(i32::MIN, 0, i32::MIN, 10);
        assert_eq!(bb.centre_x(), i32::MIN as i64 + (i32::MIN / 2) as i64);
    }
}
