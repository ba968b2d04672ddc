// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Turns a buffer of normalized escape values into RGBA bytes.

use std::str::FromStr;

use error::{Error, Result};
use palette::Palette;

/// Takes values that are expected to fall in [0, 1], optionally
/// reshapes each one with `curve`, and looks the result up in
/// `palette`.  Returns four bytes (r, g, b, a) per value, in the order
/// of `data`.  Channels are rounded and clamped to 0..=255 here and
/// nowhere earlier.
pub fn data_to_rgba(
    data: &[f64],
    palette: &Palette,
    curve: Option<&dyn Fn(f64) -> f64>,
) -> Vec<u8> {
    let mut pixels = vec![0 as u8; data.len() * 4];
    for (value, pixel) in data.iter().zip(pixels.chunks_mut(4)) {
        let v = match curve {
            Some(curve) => curve(*value),
            None => *value,
        };
        pixel.copy_from_slice(&palette.color_at(v).to_bytes());
    }
    pixels
}

/// Named reshaping curves.  Escape values cluster near zero outside
/// the set, so bending them upward spreads the gradient over the
/// interesting part of the image.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Curve {
    /// Leaves values unchanged.
    Linear,
    /// `sqrt(x)`
    Sqrt,
    /// `cbrt(x)`
    Cbrt,
    /// `log2(1 + x)`, which keeps 0 and 1 fixed.
    Log,
    /// `x * x`, the opposite bend.
    Square,
}

impl Curve {
    /// Every curve, in the order they are listed to users.
    pub const ALL: [Curve; 5] = [
        Curve::Linear,
        Curve::Sqrt,
        Curve::Cbrt,
        Curve::Log,
        Curve::Square,
    ];

    /// Reshapes one value.
    pub fn apply(self, x: f64) -> f64 {
        match self {
            Curve::Linear => x,
            Curve::Sqrt => x.sqrt(),
            Curve::Cbrt => x.cbrt(),
            Curve::Log => (1.0 + x).log2(),
            Curve::Square => x * x,
        }
    }

    /// The name the curve is parsed from.
    pub fn name(self) -> &'static str {
        match self {
            Curve::Linear => "linear",
            Curve::Sqrt => "sqrt",
            Curve::Cbrt => "cbrt",
            Curve::Log => "log",
            Curve::Square => "square",
        }
    }
}

impl FromStr for Curve {
    type Err = Error;

    fn from_str(s: &str) -> Result<Curve> {
        Curve::ALL
            .iter()
            .cloned()
            .find(|curve| curve.name() == s)
            .ok_or_else(|| Error::InvalidFormat(format!("unknown curve '{}'", s)))
    }
}
