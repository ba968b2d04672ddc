#![deny(missing_docs)]
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Escape-time fractal renderer
//!
//! The Mandelbrot and Julia sets are drawn by taking a point on the
//! complex plane and repeatedly squaring it and adding a constant,
//! measuring how quickly the result runs off to infinity.  Points
//! that never leave the circle of radius 2 are presumed to be inside
//! the set; the rest are shaded by how many steps they took to get
//! out.
//!
//! A `Fractal` lays a pixel grid over a region of the plane and fills
//! it with one value in [0, 1] per pixel.  `data_to_rgba` then pushes
//! those values through an optional curve and a `Palette` to produce
//! bytes ready to display or encode:
//!
//! ```
//! use escapetime::{data_to_rgba, BoundingBox, Fractal, Palettes};
//!
//! let bounds = BoundingBox::new(-2.0, -1.25, 0.5, 1.25).unwrap();
//! let mut mandelbrot = Fractal::mandelbrot(bounds, 100, 0.05).unwrap();
//! let palettes = Palettes::standard().unwrap();
//! let pixels = data_to_rgba(mandelbrot.render(), palettes.get("Blue").unwrap(), None);
//! assert_eq!(pixels.len(), 4 * mandelbrot.width() * mandelbrot.height());
//! ```

extern crate crossbeam;
#[macro_use]
extern crate failure;
extern crate itertools;
extern crate num;
extern crate tracing;

#[cfg(test)]
extern crate rand;

pub mod color;
pub mod colorize;
pub mod error;
pub mod fractal;
pub mod palette;
pub mod planes;

pub use color::Color;
pub use colorize::{data_to_rgba, Curve};
pub use error::{Error, Result};
pub use fractal::{escape_value, Fractal, FractalKind};
pub use palette::{Palette, Palettes};
pub use planes::{BoundingBox, Complex, Pixel, PlaneMapper};
