// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Contains the PlaneMapper struct, which describes a relationship
//! between a rectangle on the integral plane with an origin at 0,0,
//! and a rectangle on the complex plane described by a BoundingBox.
//! Unlike a fixed-size image, the integral plane here is derived:
//! the caller says how much of the complex plane one pixel covers,
//! and the grid grows or shrinks to fit the box.

use error::{Error, Result};
use num::Complex as NumComplex;

/// A single point on the complex plane.  The real part is the
/// x-component and the imaginary part the y-component.
pub type Complex = NumComplex<f64>;

/// Describes the x, y of a pixel on the integral plane.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pixel(pub usize, pub usize);

/// An axis-aligned rectangle on the complex plane.  `x0,y0` is the
/// left-lower corner and `x1,y1` the right-upper one.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    /// Left edge.
    pub x0: f64,
    /// Lower edge.
    pub y0: f64,
    /// Right edge.
    pub x1: f64,
    /// Upper edge.
    pub y1: f64,
}

impl BoundingBox {
    /// Constructor.  Fails if the box is empty, inverted, or has a
    /// non-finite corner.
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Result<BoundingBox> {
        let finite = [x0, y0, x1, y1].iter().all(|v| v.is_finite());
        if !finite || x1 <= x0 || y1 <= y0 {
            return Err(Error::InvalidBounds);
        }
        Ok(BoundingBox { x0, y0, x1, y1 })
    }

    /// Builds the box from its left-lower and right-upper corners.
    pub fn from_corners(leftlower: Complex, rightupper: Complex) -> Result<BoundingBox> {
        BoundingBox::new(leftlower.re, leftlower.im, rightupper.re, rightupper.im)
    }

    /// Extent along the real axis.
    #[inline]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Extent along the imaginary axis.
    #[inline]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// True if the point lies inside the box or on its edge.
    pub fn contains(&self, point: &Complex) -> bool {
        point.re >= self.x0 && point.re <= self.x1 && point.im >= self.y0 && point.im <= self.y1
    }
}

/// Contains the definitions of two planes: an integral cartesian
/// plane sized to cover the bounding box at the given resolution,
/// and the complex plane itself.  Maps points from one to the other.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PlaneMapper {
    /// The region of the complex plane being sampled.
    pub bounds: BoundingBox,
    // The plane distance covered by one pixel, on both axes.
    distance_per_pixel: f64,
    // Pixel columns and rows; ceilings of the box extent over the
    // resolution.
    width: usize,
    height: usize,
}

impl PlaneMapper {
    /// Constructor.  The grid dimensions are the ceilings of the box's
    /// width and height divided by `distance_per_pixel`, so the grid
    /// always covers the whole box.
    pub fn new(bounds: BoundingBox, distance_per_pixel: f64) -> Result<PlaneMapper> {
        if !(distance_per_pixel.is_finite() && distance_per_pixel > 0.0) {
            return Err(Error::InvalidResolution(distance_per_pixel));
        }
        let too_fine = || Error::InvalidResolution(distance_per_pixel);
        let pixels = |extent: f64| {
            let count = (extent / distance_per_pixel).ceil();
            if count >= 1.0 && count < usize::max_value() as f64 {
                Ok(count as usize)
            } else {
                Err(too_fine())
            }
        };
        let width = pixels(bounds.width())?;
        let height = pixels(bounds.height())?;
        width.checked_mul(height).ok_or_else(too_fine)?;
        Ok(PlaneMapper {
            bounds,
            distance_per_pixel,
            width,
            height,
        })
    }

    /// The plane distance covered by one pixel.
    pub fn distance_per_pixel(&self) -> f64 {
        self.distance_per_pixel
    }

    /// Number of pixel columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of pixel rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// The total number of points in the integral grid.  Used to
    /// calculate memory needs.
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    /// Describes that the integral plane is of a size.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Row-major offset of a pixel in a buffer covering this plane.
    #[inline]
    pub fn offset(&self, pixel: &Pixel) -> usize {
        pixel.1 * self.width + pixel.0
    }

    /// Given a pixel on the integral plane, return the point on the
    /// complex plane it samples.  Both axes use the same scale, so a
    /// pixel is always square in plane units.
    #[inline]
    pub fn pixel_to_point(&self, pixel: &Pixel) -> Complex {
        Complex::new(
            self.bounds.x0 + (pixel.0 as f64) * self.distance_per_pixel,
            self.bounds.y0 + (pixel.1 as f64) * self.distance_per_pixel,
        )
    }

    /// Maps a (possibly fractional) mouse position over the rendered
    /// grid back to the complex plane, as a fraction of the pixel
    /// count applied to the box extent.  Because the pixel counts are
    /// ceilings this is not an exact inverse of `pixel_to_point` at the
    /// far edge of the grid.
    pub fn coord_from_mouse_position(&self, x: f64, y: f64) -> Complex {
        let BoundingBox { x0, y0, x1, y1 } = self.bounds;
        Complex::new(
            x0 + x / (self.width as f64) * (x1 - x0),
            y0 + y / (self.height as f64) * (y1 - y0),
        )
    }
}
