// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate escapetime;
extern crate image;
extern crate num_cpus;
extern crate tracing;
extern crate tracing_subscriber;

use clap::{App, Arg, ArgMatches};
use escapetime::{data_to_rgba, BoundingBox, Complex, Curve, Error, Fractal, Palettes};
use image::png::PNGEncoder;
use image::ColorType;
use std::fs::File;
use std::io;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn parse_pair<T>(s: &str, separator: char) -> Option<(T, T)>
where
    T: FromStr,
{
    match s.find(separator) {
        None => None,
        Some(index) => match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
            (Ok(l), Ok(r)) => Some((l, r)),
            _ => None,
        },
    }
}

fn parse_complex(s: &str) -> Option<Complex> {
    match parse_pair(s, ',') {
        Some((re, im)) => Some(Complex { re, im }),
        None => None,
    }
}

fn validate_pair<T: FromStr>(s: &str, separator: char, err: &str) -> Result<(), String> {
    match parse_pair::<T>(s, separator) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + PartialOrd>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const KIND: &str = "kind";
const LEFTLOWER: &str = "leftlower";
const RIGHTUPPER: &str = "rightupper";
const RESOLUTION: &str = "resolution";
const ITERATIONS: &str = "iterations";
const SEED: &str = "seed";
const PALETTE: &str = "palette";
const CURVE: &str = "curve";
const INVERT: &str = "invert";
const THREADS: &str = "threads";

fn args<'a>(palettes: &'a [&'static str]) -> ArgMatches<'a> {
    let max_threads = num_cpus::get();
    let curves: Vec<&str> = Curve::ALL.iter().map(|curve| curve.name()).collect();

    App::new("escapetime")
        .version("0.1.0")
        .about("Mandelbrot and Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(true)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .help("Output PNG file"),
        )
        .arg(
            Arg::with_name(KIND)
                .long(KIND)
                .short("k")
                .takes_value(true)
                .possible_values(&["mandelbrot", "julia"])
                .default_value("mandelbrot")
                .help("Which fractal to render"),
        )
        .arg(
            Arg::with_name(LEFTLOWER)
                .long(LEFTLOWER)
                .short("l")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("-2.5,-1.25")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse left lower corner"))
                .help("Left lower corner of the region, as re,im"),
        )
        .arg(
            Arg::with_name(RIGHTUPPER)
                .long(RIGHTUPPER)
                .short("r")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("1.0,1.25")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse right upper corner"))
                .help("Right upper corner of the region, as re,im"),
        )
        .arg(
            Arg::with_name(RESOLUTION)
                .long(RESOLUTION)
                .short("d")
                .takes_value(true)
                .default_value("0.005")
                .validator(|s| {
                    validate_range(
                        &s,
                        1e-12,
                        1e6,
                        "Could not parse resolution",
                        "Resolution must be a positive distance per pixel",
                    )
                })
                .help("Distance on the complex plane covered by one pixel"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("100")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        200_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 200000",
                    )
                })
                .help("Maximum number of iterations per pixel"),
        )
        .arg(
            Arg::with_name(SEED)
                .long(SEED)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .required_if(KIND, "julia")
                .validator(|s| validate_pair::<f64>(&s, ',', "Could not parse Julia seed"))
                .help("The constant c of the Julia set, as re,im"),
        )
        .arg(
            Arg::with_name(PALETTE)
                .long(PALETTE)
                .short("p")
                .takes_value(true)
                .possible_values(palettes)
                .default_value("Blue")
                .help("Color palette"),
        )
        .arg(
            Arg::with_name(CURVE)
                .long(CURVE)
                .takes_value(true)
                .possible_values(&curves)
                .default_value("linear")
                .help("Curve applied to escape values before coloring"),
        )
        .arg(
            Arg::with_name(INVERT)
                .long(INVERT)
                .help("Invert every color of the palette"),
        )
        .arg(
            Arg::with_name(THREADS)
                .long(THREADS)
                .short("t")
                .takes_value(true)
                .default_value("1")
                .validator(move |s| {
                    validate_range(
                        &s,
                        1,
                        max_threads,
                        "Could not parse thread count",
                        &format!("Thread count must be between 1 and {}", max_threads),
                    )
                })
                .help("Number of threads to use in solver"),
        )
        .get_matches()
}

fn write_image(outfile: &str, pixels: &[u8], bounds: (usize, usize)) -> Result<(), io::Error> {
    let output = File::create(Path::new(outfile))?;
    let encoder = PNGEncoder::new(output);
    encoder.encode(pixels, bounds.0 as u32, bounds.1 as u32, ColorType::RGBA(8))?;
    Ok(())
}

// Every argument has passed its validator (or has a default) by the
// time this runs, so a failed parse here means the validators and
// the parsers disagree.
fn value<T: FromStr>(matches: &ArgMatches, name: &str) -> Result<T, Error> {
    matches
        .value_of(name)
        .and_then(|s| T::from_str(s).ok())
        .ok_or_else(|| Error::InvalidFormat(format!("bad value for --{}", name)))
}

fn complex_value(matches: &ArgMatches, name: &str) -> Result<Complex, Error> {
    matches
        .value_of(name)
        .and_then(parse_complex)
        .ok_or_else(|| Error::InvalidFormat(format!("bad value for --{}", name)))
}

fn run(matches: &ArgMatches, palettes: &Palettes) -> Result<(), Error> {
    let leftlower = complex_value(matches, LEFTLOWER)?;
    let rightupper = complex_value(matches, RIGHTUPPER)?;
    let bounds = BoundingBox::from_corners(leftlower, rightupper)?;
    let resolution: f64 = value(matches, RESOLUTION)?;
    let iterations: usize = value(matches, ITERATIONS)?;
    let threads: usize = value(matches, THREADS)?;
    let curve: Curve = value(matches, CURVE)?;

    let mut fractal = match matches.value_of(KIND) {
        Some("julia") => {
            let seed = complex_value(matches, SEED)?;
            Fractal::julia(bounds, iterations, resolution, seed)?
        }
        _ => Fractal::mandelbrot(bounds, iterations, resolution)?,
    };

    let mut palette = palettes.get(matches.value_of(PALETTE).unwrap_or("Blue"))?.clone();
    if matches.is_present(INVERT) {
        palette = palette.inverted();
    }

    let (width, height) = fractal.dimensions();
    debug!(?bounds, resolution, width, height, "starting render");
    let started = Instant::now();
    let reshape: &dyn Fn(f64) -> f64 = &|x| curve.apply(x);
    let pixels = data_to_rgba(fractal.render_threaded(threads), &palette, Some(reshape));
    info!(
        width,
        height,
        iterations,
        threads,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "rendered"
    );

    let outfile = matches.value_of(OUTPUT).unwrap_or("escapetime.png");
    write_image(outfile, &pixels, (width, height))?;
    info!(outfile, "wrote image");
    Ok(())
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let palettes = match Palettes::standard() {
        Ok(palettes) => palettes,
        Err(e) => {
            eprintln!("Render failure: {}", e);
            std::process::exit(1);
        }
    };
    let names = palettes.names();
    let matches = args(&names);

    if let Err(e) = run(&matches, &palettes) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
