// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A four-channel color.  Channels nominally run 0 to 255, but they
//! are kept as floats: blending two colors lands between whole
//! values, and extrapolating past either end leaves the range
//! entirely.  Nothing is clamped until the color is turned into
//! bytes.

use num::clamp;
use std::fmt;
use std::str::FromStr;

use error::{Error, Result};

/// An RGBA color.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Color {
    /// Red.
    pub r: f64,
    /// Green.
    pub g: f64,
    /// Blue.
    pub b: f64,
    /// Alpha; 255 is opaque.
    pub a: f64,
}

// The byte a channel becomes at the display boundary.  Halves round
// to the even neighbor, the way a clamped canvas buffer stores them.
#[inline]
fn channel_byte(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    clamp(v.round_ties_even(), 0.0, 255.0) as u8
}

fn invalid(text: &str) -> Error {
    Error::InvalidFormat(text.to_string())
}

impl Color {
    /// Constructor.
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Color {
        Color { r, g, b, a }
    }

    /// An opaque color.
    pub fn rgb(r: f64, g: f64, b: f64) -> Color {
        Color::new(r, g, b, 255.0)
    }

    /// Parses `#rgb`, `rgb`, `#rrggbb` or `rrggbb`.  The short form
    /// doubles each digit.  Alpha is never read from the text; it
    /// comes from `alpha`.
    pub fn from_hex(text: &str, alpha: f64) -> Result<Color> {
        let hex = if text.starts_with('#') { &text[1..] } else { text };
        if !hex.is_ascii() {
            return Err(invalid(text));
        }
        let hex: String = match hex.len() {
            3 => hex.chars().flat_map(|c| vec![c, c]).collect(),
            6 => hex.to_string(),
            _ => return Err(invalid(text)),
        };
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map(f64::from)
                .map_err(|_| invalid(text))
        };
        Ok(Color::new(channel(0)?, channel(2)?, channel(4)?, alpha))
    }

    /// `#` followed by the red, green and blue channels in lowercase
    /// hex.  Channels are not zero-padded, so anything below 16 comes
    /// out as a single digit.
    pub fn to_hex(&self) -> String {
        format!(
            "#{:x}{:x}{:x}",
            channel_byte(self.r),
            channel_byte(self.g),
            channel_byte(self.b)
        )
    }

    /// Parses `rgba(r, g, b, a)` or the bare `r, g, b, a`, four
    /// comma-separated integers.
    pub fn from_rgba(text: &str) -> Result<Color> {
        let mut body = text.trim();
        if body.starts_with("rgba(") {
            if !body.ends_with(')') {
                return Err(invalid(text));
            }
            body = &body[5..body.len() - 1];
        }
        let channels = body
            .split(',')
            .map(|part| part.trim().parse::<i32>().map(f64::from))
            .collect::<::std::result::Result<Vec<f64>, _>>()
            .map_err(|_| invalid(text))?;
        match channels[..] {
            [r, g, b, a] => Ok(Color::new(r, g, b, a)),
            _ => Err(invalid(text)),
        }
    }

    /// `rgba(r, g, b, a)` with each channel rounded to an integer.
    pub fn to_rgba(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r.round() as i64,
            self.g.round() as i64,
            self.b.round() as i64,
            self.a.round() as i64
        )
    }

    /// The complementary color.  Alpha is left alone.
    pub fn invert(&self) -> Color {
        Color::new(255.0 - self.r, 255.0 - self.g, 255.0 - self.b, self.a)
    }

    /// Linear blend toward `other`: `t = 0` is this color, `t = 1` is
    /// `other`.  `t` is not clamped, so values outside [0, 1]
    /// extrapolate.
    pub fn interpolate(&self, other: &Color, t: f64) -> Color {
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// The raw channels, in r, g, b, a order.
    pub fn values(&self) -> [f64; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// The channels as display bytes: rounded, and clamped to 0..=255.
    pub fn to_bytes(&self) -> [u8; 4] {
        [
            channel_byte(self.r),
            channel_byte(self.g),
            channel_byte(self.b),
            channel_byte(self.a),
        ]
    }
}

impl FromStr for Color {
    type Err = Error;

    /// Accepts either textual form.  Hex colors are opaque.
    fn from_str(s: &str) -> Result<Color> {
        if s.contains(',') {
            Color::from_rgba(s)
        } else {
            Color::from_hex(s.trim(), 255.0)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_rgba())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn parses_long_and_short_hex() {
        let white = Color::new(255.0, 255.0, 255.0, 255.0);
        assert_eq!(Color::from_hex("#ffffff", 255.0), Ok(white));
        assert_eq!(Color::from_hex("ffffff", 255.0), Ok(white));
        assert_eq!(Color::from_hex("fff", 255.0), Ok(white));
        assert_eq!(Color::from_hex("#fff", 255.0), Ok(white));
        assert_eq!(
            Color::from_hex("#1a2B3c", 128.0),
            Ok(Color::new(26.0, 43.0, 60.0, 128.0))
        );
        assert_eq!(
            Color::from_hex("a1c", 255.0),
            Ok(Color::rgb(170.0, 17.0, 204.0))
        );
    }

    #[test]
    fn rejects_bad_hex() {
        for text in &["ff", "#ff", "ffff", "#fffffff", "", "#", "12345g", "#ééé"] {
            assert_eq!(
                Color::from_hex(text, 255.0),
                Err(Error::InvalidFormat(text.to_string()))
            );
        }
    }

    #[test]
    fn hex_output_is_not_padded() {
        assert_eq!(Color::rgb(255.0, 255.0, 255.0).to_hex(), "#ffffff");
        assert_eq!(Color::rgb(1.0, 2.0, 255.0).to_hex(), "#12ff");
        assert_eq!(Color::rgb(0.0, 0.0, 0.0).to_hex(), "#000");
        assert_eq!(Color::rgb(3.0, 37.0, 108.0).to_hex(), "#3256c");
    }

    #[test]
    fn rgba_text_round_trips() {
        let c = Color::new(12.0, 34.0, 56.0, 78.0);
        assert_eq!(c.to_rgba(), "rgba(12, 34, 56, 78)");
        assert_eq!(Color::from_rgba("rgba(12, 34, 56, 78)"), Ok(c));
        assert_eq!(Color::from_rgba("12,34,56,78"), Ok(c));
        assert_eq!(Color::from_rgba(" 12 , 34, 56 ,78 "), Ok(c));
        assert_eq!(format!("{}", c), "rgba(12, 34, 56, 78)");
    }

    #[test]
    fn rejects_bad_rgba() {
        for text in &["rgba(1, 2, 3)", "1, 2, 3, 4, 5", "rgba(1, 2, x, 4)", "rgba(1, 2, 3, 4", ""] {
            assert!(Color::from_rgba(text).is_err(), "accepted {:?}", text);
        }
    }

    #[test]
    fn from_str_picks_the_format() {
        assert_eq!("#000".parse::<Color>(), Ok(Color::rgb(0.0, 0.0, 0.0)));
        assert_eq!(
            "rgba(1, 2, 3, 4)".parse::<Color>(),
            Ok(Color::new(1.0, 2.0, 3.0, 4.0))
        );
        assert!("nope".parse::<Color>().is_err());
    }

    #[test]
    fn invert_keeps_alpha() {
        let c = Color::new(0.0, 100.0, 255.0, 42.0);
        assert_eq!(c.invert(), Color::new(255.0, 155.0, 0.0, 42.0));
        assert_eq!(c.invert().invert(), c);
    }

    #[test]
    fn interpolate_hits_both_ends_exactly() {
        let mut rng = rand::thread_rng();
        let mut random = || {
            let mut channel = || {
                let v: u16 = rng.gen_range(0, 256);
                f64::from(v)
            };
            Color::new(channel(), channel(), channel(), channel())
        };
        for _ in 0..200 {
            let (a, b) = (random(), random());
            assert_eq!(a.interpolate(&b, 0.0), a);
            assert_eq!(a.interpolate(&b, 1.0), b);
        }
    }

    #[test]
    fn interpolate_blends_and_extrapolates() {
        let black = Color::rgb(0.0, 0.0, 0.0);
        let white = Color::rgb(255.0, 255.0, 255.0);
        assert_eq!(black.interpolate(&white, 0.5), Color::rgb(127.5, 127.5, 127.5));
        let past = black.interpolate(&white, 2.0);
        assert_eq!(past.values(), [510.0, 510.0, 510.0, 255.0]);
        let before = black.interpolate(&white, -1.0);
        assert_eq!(before.r, -255.0);
    }

    #[test]
    fn bytes_are_clamped_and_rounded() {
        assert_eq!(Color::new(-3.0, 127.5, 300.0, 254.4).to_bytes(), [0, 128, 255, 254]);
        assert_eq!(Color::new(::std::f64::NAN, 1.0, 2.0, 3.0).to_bytes(), [0, 1, 2, 3]);
    }

    #[test]
    fn byte_halves_round_to_even() {
        assert_eq!(Color::new(2.5, 0.5, 127.5, 253.5).to_bytes(), [2, 0, 128, 254]);
        assert_eq!(Color::new(1.5, 3.5, 254.5, 255.5).to_bytes(), [2, 4, 254, 255]);
        assert_eq!(Color::rgb(2.5, 16.5, 0.5).to_hex(), "#2100");
    }
}
