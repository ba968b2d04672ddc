// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

#[macro_use]
extern crate criterion;
extern crate escapetime;

use criterion::Criterion;
use escapetime::{data_to_rgba, BoundingBox, Complex, Fractal, Palettes};

fn view() -> BoundingBox {
    BoundingBox::new(-2.5, -1.25, 1.0, 1.25).unwrap()
}

fn mandelbrot_render(c: &mut Criterion) {
    c.bench_function("mandelbrot 175x125x200", |b| {
        let mut fractal = Fractal::mandelbrot(view(), 200, 0.02).unwrap();
        b.iter(|| fractal.render().len())
    });
}

fn julia_render_threaded(c: &mut Criterion) {
    c.bench_function("julia 175x125x200 threaded", |b| {
        let seed = Complex::new(-0.8, 0.156);
        let mut fractal = Fractal::julia(view(), 200, 0.02, seed).unwrap();
        b.iter(|| fractal.render_threaded(4).len())
    });
}

fn colorize(c: &mut Criterion) {
    c.bench_function("data_to_rgba 175x125", |b| {
        let mut fractal = Fractal::mandelbrot(view(), 200, 0.02).unwrap();
        let data = fractal.render().to_vec();
        let palettes = Palettes::standard().unwrap();
        let palette = palettes.get("Honeydew").unwrap().clone();
        b.iter(|| data_to_rgba(&data, &palette, None))
    });
}

criterion_group!(benches, mandelbrot_render, julia_render_threaded, colorize);
criterion_main!(benches);
