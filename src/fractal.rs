// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The escape-time grid engine.
//!
//! A `Fractal` takes a bounding box on the complex plane and a
//! resolution, derives a grid of pixels that covers the box, and
//! fills a buffer with one normalized escape value per pixel.  Every
//! value lands in [0, 1]: the fraction of the iteration limit spent
//! before the orbit left the circle of radius 2, or exactly 1 for
//! points whose orbit never left it and are presumed to be inside the
//! set.
//!
//! The Mandelbrot and the Julia sets iterate the same recurrence,
//! `z = z * z + c`.  They differ only in where the pixel's point goes:
//! the Mandelbrot uses it as `c` (and as the starting `z`), the Julia
//! uses it as the starting `z` and keeps a fixed seed as `c`.

use crossbeam;
use itertools::iproduct;
use std::cmp;
use std::panic;
use tracing::{debug, trace_span};

use error::{Error, Result};
use planes::{BoundingBox, Complex, Pixel, PlaneMapper};

/// Which recurrence to run for each pixel.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum FractalKind {
    /// The pixel's point is both the starting value and the parameter.
    Mandelbrot,
    /// The pixel's point is the starting value; `c` is fixed for the
    /// whole image.
    Julia {
        /// The seed added on every iteration.
        c: Complex,
    },
}

impl FractalKind {
    /// The normalized escape value of a single point on the complex
    /// plane.
    #[inline]
    pub fn evaluate(&self, point: Complex, max_iterations: usize) -> f64 {
        match *self {
            FractalKind::Mandelbrot => escape_value(point, point, max_iterations),
            FractalKind::Julia { c } => escape_value(point, c, max_iterations),
        }
    }
}

/// This is our classic iterator function.  Starting from `z`, it
/// applies `z = z * z + c` up to `max_iterations` times.  If the orbit
/// leaves the circle of radius 2 during step `i` (counting from zero),
/// it returns `i / max_iterations`; if it never does, 1.0.
#[inline]
pub fn escape_value(z: Complex, c: Complex, max_iterations: usize) -> f64 {
    let mut z = z;
    for i in 0..max_iterations {
        z = z * z + c;
        if z.norm() > 2.0 {
            return (i as f64) / (max_iterations as f64);
        }
    }
    1.0
}

// Fills `region`, which starts at pixel row `top`, with escape values.
// Used both for the whole grid and for one band of a threaded render.
fn render_band(
    plane: &PlaneMapper,
    kind: FractalKind,
    max_iterations: usize,
    top: usize,
    region: &mut [f64],
) {
    let rows = top..top + region.len() / cmp::max(1, plane.width());
    for ((row, column), value) in iproduct!(rows, 0..plane.width()).zip(region.iter_mut()) {
        *value = kind.evaluate(plane.pixel_to_point(&Pixel(column, row)), max_iterations);
    }
}

/// A fractal image in progress: its parameters, its pixel grid, and
/// the buffer of values from the most recent render.
#[derive(Clone, Debug)]
pub struct Fractal {
    kind: FractalKind,
    max_iterations: usize,
    plane: PlaneMapper,
    data: Vec<f64>,
    // False until the buffer matches the current parameters.
    rendered: bool,
}

impl Fractal {
    /// Constructor.  Requires the recurrence, the region of the
    /// complex plane to sample, the iteration limit, and the plane
    /// distance covered by one pixel.  The value buffer is allocated
    /// here but holds nothing meaningful until `render` is called.
    pub fn new(
        kind: FractalKind,
        bounds: BoundingBox,
        max_iterations: usize,
        distance_per_pixel: f64,
    ) -> Result<Fractal> {
        if max_iterations == 0 {
            return Err(Error::InvalidIterations);
        }
        let plane = PlaneMapper::new(bounds, distance_per_pixel)?;
        debug!(
            ?kind,
            width = plane.width(),
            height = plane.height(),
            "allocating fractal grid"
        );
        Ok(Fractal {
            kind,
            max_iterations,
            data: vec![0.0; plane.len()],
            plane,
            rendered: false,
        })
    }

    /// A Mandelbrot over `bounds`.
    pub fn mandelbrot(
        bounds: BoundingBox,
        max_iterations: usize,
        distance_per_pixel: f64,
    ) -> Result<Fractal> {
        Fractal::new(
            FractalKind::Mandelbrot,
            bounds,
            max_iterations,
            distance_per_pixel,
        )
    }

    /// The Julia set for seed `c`, over `bounds`.
    pub fn julia(
        bounds: BoundingBox,
        max_iterations: usize,
        distance_per_pixel: f64,
        c: Complex,
    ) -> Result<Fractal> {
        Fractal::new(
            FractalKind::Julia { c },
            bounds,
            max_iterations,
            distance_per_pixel,
        )
    }

    /// Changes the resolution.  The grid is resized to cover the same
    /// box at the new scale, and the returned buffer is the freshly
    /// allocated one: zeroed, and meaningless until the next render.
    /// Any previously rendered values are gone.
    pub fn set_distance_per_pixel(&mut self, distance_per_pixel: f64) -> Result<&mut [f64]> {
        self.plane = PlaneMapper::new(self.plane.bounds, distance_per_pixel)?;
        debug!(
            distance_per_pixel,
            width = self.plane.width(),
            height = self.plane.height(),
            "resized fractal grid"
        );
        self.data = vec![0.0; self.plane.len()];
        self.rendered = false;
        Ok(&mut self.data)
    }

    /// Changes the iteration limit.  The buffer keeps its size but its
    /// contents are stale until the next render.
    pub fn set_max_iterations(&mut self, max_iterations: usize) -> Result<()> {
        if max_iterations == 0 {
            return Err(Error::InvalidIterations);
        }
        self.max_iterations = max_iterations;
        self.rendered = false;
        Ok(())
    }

    /// Recomputes every pixel from scratch, on the calling thread, and
    /// returns the values in row-major order.
    pub fn render(&mut self) -> &[f64] {
        let span = trace_span!("render", width = self.width(), height = self.height());
        let _guard = span.enter();
        render_band(&self.plane, self.kind, self.max_iterations, 0, &mut self.data);
        self.rendered = true;
        debug!(pixels = self.data.len(), "render complete");
        &self.data
    }

    /// Produces exactly what `render` does, but splits the grid into
    /// horizontal bands and computes each on its own thread.  Every
    /// band writes only its own slice of the buffer.
    pub fn render_threaded(&mut self, threads: usize) -> &[f64] {
        let threads = cmp::min(cmp::max(1, threads), self.plane.height());
        if threads <= 1 {
            return self.render();
        }
        let span = trace_span!(
            "render_threaded",
            width = self.width(),
            height = self.height(),
            threads
        );
        let _guard = span.enter();

        let plane = self.plane;
        let kind = self.kind;
        let max_iterations = self.max_iterations;
        let rows_per_band = (plane.height() + threads - 1) / threads;
        let data = &mut self.data;
        let outcome = crossbeam::scope(|spawner| {
            for (band, region) in data.chunks_mut(rows_per_band * plane.width()).enumerate() {
                spawner.spawn(move |_| {
                    render_band(&plane, kind, max_iterations, band * rows_per_band, region);
                });
            }
        });
        if let Err(payload) = outcome {
            panic::resume_unwind(payload);
        }
        self.rendered = true;
        debug!(pixels = self.data.len(), "render complete");
        &self.data
    }

    /// The values from the most recent render, or `None` if the
    /// parameters changed since then (or nothing was rendered yet).
    pub fn data(&self) -> Option<&[f64]> {
        if self.rendered {
            Some(&self.data)
        } else {
            None
        }
    }

    /// Maps a mouse position over the rendered grid back to the
    /// complex plane.
    pub fn coord_from_mouse_position(&self, x: f64, y: f64) -> Complex {
        self.plane.coord_from_mouse_position(x, y)
    }

    /// The recurrence being rendered.
    pub fn kind(&self) -> FractalKind {
        self.kind
    }

    /// The region of the complex plane being sampled.
    pub fn bounds(&self) -> BoundingBox {
        self.plane.bounds
    }

    /// The pixel grid.
    pub fn plane(&self) -> &PlaneMapper {
        &self.plane
    }

    /// The iteration limit.
    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    /// The plane distance covered by one pixel.
    pub fn distance_per_pixel(&self) -> f64 {
        self.plane.distance_per_pixel()
    }

    /// Number of pixel columns.
    pub fn width(&self) -> usize {
        self.plane.width()
    }

    /// Number of pixel rows.
    pub fn height(&self) -> usize {
        self.plane.height()
    }

    /// Columns and rows, in that order.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.plane.width(), self.plane.height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view() -> BoundingBox {
        BoundingBox::new(-2.0, -1.25, 0.5, 1.25).unwrap()
    }

    #[test]
    fn origin_never_escapes() {
        for limit in &[1, 2, 50, 1000] {
            let zero = Complex::new(0.0, 0.0);
            assert_eq!(FractalKind::Mandelbrot.evaluate(zero, *limit), 1.0);
        }
    }

    #[test]
    fn two_escapes_on_the_first_step() {
        // z starts at 2, which is on the circle but not outside it;
        // the first step lands on 6.
        let two = Complex::new(2.0, 0.0);
        assert_eq!(FractalKind::Mandelbrot.evaluate(two, 10), 0.0);
    }

    #[test]
    fn escape_index_is_scaled_by_the_limit() {
        // 1 -> 2 -> 5: 2 is not outside the circle, 5 is, on step 1.
        let one = Complex::new(1.0, 0.0);
        assert_eq!(FractalKind::Mandelbrot.evaluate(one, 4), 0.25);
        assert_eq!(escape_value(one, one, 10), 0.1);
    }

    #[test]
    fn julia_starts_from_the_point() {
        let julia = FractalKind::Julia {
            c: Complex::new(0.0, 0.0),
        };
        assert_eq!(julia.evaluate(Complex::new(0.5, 0.0), 20), 1.0);
        assert_eq!(julia.evaluate(Complex::new(1.5, 0.0), 20), 0.0);
        // 1.2 -> 1.44 -> 2.0736
        assert_eq!(julia.evaluate(Complex::new(1.2, 0.0), 20), 0.05);
    }

    #[test]
    fn rejects_zero_iterations() {
        assert_eq!(
            Fractal::mandelbrot(view(), 0, 0.1).unwrap_err(),
            Error::InvalidIterations
        );
        let mut f = Fractal::mandelbrot(view(), 10, 0.1).unwrap();
        assert!(f.set_max_iterations(0).is_err());
        assert_eq!(f.max_iterations(), 10);
    }

    #[test]
    fn grid_tracks_resolution() {
        let mut f = Fractal::mandelbrot(view(), 10, 0.1).unwrap();
        assert_eq!(f.dimensions(), (25, 25));
        assert_eq!(f.render().len(), 25 * 25);

        for &d in &[0.3, 0.07, 1.0, 0.25] {
            let len = f.set_distance_per_pixel(d).unwrap().len();
            let w = (2.5_f64 / d).ceil() as usize;
            let h = (2.5_f64 / d).ceil() as usize;
            assert_eq!(f.dimensions(), (w, h));
            assert_eq!(len, w * h);
            assert_eq!(f.distance_per_pixel(), d);
        }
        assert!(f.set_distance_per_pixel(0.0).is_err());
        assert_eq!(f.distance_per_pixel(), 0.25);
    }

    #[test]
    fn resizing_invalidates_data() {
        let mut f = Fractal::mandelbrot(view(), 10, 0.5).unwrap();
        assert!(f.data().is_none());
        f.render();
        assert!(f.data().is_some());
        f.set_distance_per_pixel(0.25).unwrap();
        assert!(f.data().is_none());
        f.render();
        assert_eq!(f.data().map(|d| d.len()), Some(100));
        f.set_max_iterations(20).unwrap();
        assert!(f.data().is_none());
    }

    #[test]
    fn render_fills_values_in_range() {
        let mut f = Fractal::mandelbrot(view(), 64, 0.05).unwrap();
        let data = f.render();
        assert!(data.iter().all(|v| *v >= 0.0 && *v <= 1.0));
        assert!(data.iter().any(|v| *v == 1.0));
        assert!(data.iter().any(|v| *v < 1.0));
    }

    #[test]
    fn render_follows_row_major_mapping() {
        let bounds = BoundingBox::new(-1.0, 0.0, 2.0, 1.0).unwrap();
        let mut f = Fractal::mandelbrot(bounds, 16, 1.0).unwrap();
        assert_eq!(f.dimensions(), (3, 1));
        // Pixels sample -1, 0 and 1 on the real axis.
        let expected: Vec<f64> = [-1.0, 0.0, 1.0]
            .iter()
            .map(|re| escape_value(Complex::new(*re, 0.0), Complex::new(*re, 0.0), 16))
            .collect();
        assert_eq!(f.render(), &expected[..]);
    }

    #[test]
    fn julia_renders_with_its_seed() {
        let bounds = BoundingBox::new(-1.5, -1.5, 1.5, 1.5).unwrap();
        let c = Complex::new(-0.8, 0.156);
        let mut f = Fractal::julia(bounds, 50, 0.1, c).unwrap();
        assert_eq!(f.kind(), FractalKind::Julia { c });
        let w = f.width();
        let data = f.render().to_vec();
        let point = Complex::new(-1.5 + 7.0 * 0.1, -1.5 + 4.0 * 0.1);
        assert_eq!(data[4 * w + 7], escape_value(point, c, 50));
    }

    #[test]
    fn threaded_render_matches_single_threaded() {
        let bounds = BoundingBox::new(-2.0, -1.0, 1.0, 1.0).unwrap();
        let mut single = Fractal::mandelbrot(bounds, 40, 0.03).unwrap();
        let mut threaded = single.clone();
        let expected = single.render().to_vec();
        for threads in &[0, 2, 3, 7, 200, ::std::usize::MAX] {
            assert_eq!(threaded.render_threaded(*threads), &expected[..]);
        }
        assert!(threaded.data().is_some());
    }

    #[test]
    fn mouse_position_round_trip_at_corners() {
        let f = Fractal::mandelbrot(view(), 10, 0.3).unwrap();
        assert_eq!(f.coord_from_mouse_position(0.0, 0.0), Complex::new(-2.0, -1.25));
        let far = f.coord_from_mouse_position(f.width() as f64, f.height() as f64);
        assert!((far.re - 0.5).abs() <= f.distance_per_pixel());
        assert!((far.im - 1.25).abs() <= f.distance_per_pixel());
    }
}
