// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The failures this crate can report.  Everything here is
//! deterministic: the same input fails the same way every time, so
//! nothing is ever retried.

use std::result;

/// Errors raised while building planes, fractals, colors and palettes.
#[derive(Debug, Fail, PartialEq)]
pub enum Error {
    /// Color text that is neither a 3/6 digit hex string nor an
    /// `rgba(r, g, b, a)` quadruple.
    #[fail(display = "Invalid color format: {}", _0)]
    InvalidFormat(String),

    /// The right upper corner is not to the right of, and above, the
    /// left lower corner.
    #[fail(display = "The left lower corner is not to the left of and below the right upper corner")]
    InvalidBounds,

    /// The plane distance covered by one pixel must be positive and finite.
    #[fail(display = "Distance per pixel must be positive, got {}", _0)]
    InvalidResolution(f64),

    /// The iteration limit must be at least one.
    #[fail(display = "Iteration count must be at least 1")]
    InvalidIterations,

    /// A gradient needs at least two stops to interpolate between.
    #[fail(display = "A palette needs at least 2 colors, got {}", _0)]
    PaletteTooShort(usize),

    /// The requested palette is not in the registry.
    #[fail(display = "No palette named '{}'", _0)]
    UnknownPalette(String),

    /// Writing the rendered image failed.
    #[fail(display = "I/O failure: {}", _0)]
    Io(String),
}

impl From<::std::io::Error> for Error {
    fn from(err: ::std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

/// Shorthand used throughout the crate.
pub type Result<T> = result::Result<T, Error>;
