// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Palettes are ordered runs of color stops; a value in [0, 1] picks a
//! point along the run and blends the two stops on either side of it.
//! The `Palettes` registry holds the named palettes the renderer ships
//! with.  It is built once and handed around by reference.

use color::Color;
use error::{Error, Result};

/// An ordered gradient of at least two colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette(Vec<Color>);

impl Palette {
    /// Constructor.  Fails on fewer than two stops.
    pub fn new(stops: Vec<Color>) -> Result<Palette> {
        if stops.len() < 2 {
            return Err(Error::PaletteTooShort(stops.len()));
        }
        Ok(Palette(stops))
    }

    /// Builds an opaque palette out of hex strings.
    pub fn from_hex(stops: &[&str]) -> Result<Palette> {
        let colors = stops
            .iter()
            .map(|hex| Color::from_hex(hex, 255.0))
            .collect::<Result<Vec<Color>>>()?;
        Palette::new(colors)
    }

    /// The stops, in order.
    pub fn stops(&self) -> &[Color] {
        &self.0
    }

    /// Number of stops; always at least two.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// The color for `v`.  [0, 1] is split into one equal bucket per
    /// pair of neighboring stops, and `v` is blended between the two
    /// stops of the first bucket whose upper edge it does not exceed.
    /// Past the last edge (or for NaN) the final stop is used as is.
    pub fn color_at(&self, v: f64) -> Color {
        let buckets = self.0.len() - 1;
        let width = buckets as f64;
        for (i, pair) in self.0.windows(2).enumerate() {
            if v <= ((i + 1) as f64) / width {
                return pair[0].interpolate(&pair[1], (v - (i as f64) / width) * width);
            }
        }
        self.0[buckets]
    }

    /// The same stops, back to front.
    pub fn reversed(&self) -> Palette {
        Palette(self.0.iter().rev().cloned().collect())
    }

    /// Every stop inverted.
    pub fn inverted(&self) -> Palette {
        Palette(self.0.iter().map(Color::invert).collect())
    }
}

const STANDARD: [(&str, [&str; 5]); 6] = [
    ("Honeydew", ["e1efe6", "efcb68", "aeb7b3", "000411", "d6eaff"]),
    ("Blue", ["03256c", "2541b2", "1768ac", "06bee1", "ffffff"]),
    ("Volcanic", ["586f7c", "0d1317", "bbc5aa", "a72608", "090c02"]),
    ("Spicy", ["ffffff", "f7f7f7", "efa00b", "d65108", "591f0a"]),
    ("Sweet", ["eb5e55", "3a3335", "d81e5b", "fdf0d5", "c6d8d3"]),
    ("Coquelicot", ["ffffff", "f15025", "e6e8e6", "ced0ce", "191919"]),
];

/// A read-only table of named palettes.
#[derive(Clone, Debug)]
pub struct Palettes {
    entries: Vec<(&'static str, Palette)>,
}

impl Palettes {
    /// The six palettes the renderer ships with, five stops each.
    pub fn standard() -> Result<Palettes> {
        let entries = STANDARD
            .iter()
            .map(|&(name, ref hexes)| Palette::from_hex(hexes).map(|palette| (name, palette)))
            .collect::<Result<Vec<(&'static str, Palette)>>>()?;
        Ok(Palettes { entries })
    }

    /// Looks a palette up by name.  Names are case sensitive.
    pub fn get(&self, name: &str) -> Result<&Palette> {
        self.entries
            .iter()
            .find(|entry| entry.0 == name)
            .map(|entry| &entry.1)
            .ok_or_else(|| Error::UnknownPalette(name.to_string()))
    }

    /// Palette names, in registry order.
    pub fn names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|entry| entry.0).collect()
    }

    /// Number of palettes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the registry holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
