use std::error::Error;
use std::str::FromStr;

use sten::prelude::*;
use sten::{apply_all, arange, arange_shape, DynSlices, ParseSliceError, Slice, View};

struct Args {
    /// Shape of the buffer to create. A single positional length is
    /// equivalent to a 1D shape.
    shape: Vec<usize>,

    /// Slices to apply in order. Each entry has one slice per dimension.
    slices: Vec<Vec<Slice>>,

    /// Also compose all slices and index the buffer once with the result.
    compose: bool,

    /// Enable verbose logging.
    verbose: bool,
}

/// Parse a comma-separated list of dimension sizes, eg. `2,3,4`.
fn parse_shape(text: &str) -> Result<Vec<usize>, String> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|size| {
            size.trim()
                .parse()
                .map_err(|_| format!("invalid dimension size \"{}\"", size))
        })
        .collect()
}

/// Parse a comma-separated list of slices, one per dimension, eg. `1:3,::2`.
fn parse_slices(text: &str) -> Result<Vec<Slice>, ParseSliceError> {
    text.split(',').map(Slice::from_str).collect()
}

fn parse_args() -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let mut values = Vec::new();
    let mut shape = None;
    let mut compose = false;
    let mut verbose = false;

    let mut parser = lexopt::Parser::from_env();
    while let Some(arg) = parser.next()? {
        match arg {
            Value(val) => values.push(val.string()?),
            Long("shape") => {
                let value = parser.value()?.string()?;
                shape = Some(parse_shape(&value)?);
            }
            Short('c') | Long("compose") => compose = true,
            Short('v') | Long("verbose") => verbose = true,
            Short('h') | Long("help") => {
                println!(
                    "Create a buffer, slice it repeatedly and print each view.

Usage: {bin_name} [OPTIONS] [<length>] [<slices>...]

Each <slices> argument has one `start:stop[:step]` slice per dimension,
separated by commas. Any field may be empty. Use `--` before slices that
start with `-`.

With no arguments, slices a buffer of length 16 with `1:14:2` then `1::2`.

  --shape <a,b,..>  Create a buffer with this shape instead of <length>
  -c, --compose     Compose the slices and check the result matches
  -v, --verbose     Enable verbose logging
  -h, --help        Print help
",
                    bin_name = parser.bin_name().unwrap_or("sten")
                );
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    let mut values = values.into_iter();
    let shape = match shape {
        Some(shape) => shape,
        None => match values.next() {
            Some(length) => vec![length
                .parse()
                .map_err(|_| format!("invalid length \"{}\"", length))?],
            None => {
                values = vec!["1:14:2".to_string(), "1::2".to_string()].into_iter();
                compose = true;
                vec![16]
            }
        },
    };

    let slices = values
        .map(|text| parse_slices(&text).map_err(|err| format!("\"{}\": {}", text, err)))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Args {
        shape,
        slices,
        compose,
        verbose,
    })
}

fn print_view(label: &str, view: &View) {
    println!(
        "{}: offset {} shape {:?} strides {:?}",
        label,
        view.offset(),
        view.shape(),
        view.strides()
    );
    println!("{}", view);
}

/// Compose a non-empty sequence of per-dimension slices into one.
fn compose_all(slices: &[Vec<Slice>]) -> Result<DynSlices, Box<dyn Error>> {
    let (first, rest) = slices.split_first().ok_or("no slices to compose")?;
    let mut composed: DynSlices = first.iter().copied().collect();
    for next in rest {
        composed = apply_all(&composed, next)?;
    }
    Ok(composed)
}

/// Tool which demonstrates slicing views and composing slices.
///
/// ```
/// cargo run -p sten-cli -- 16 1:14:2 1::2 --compose
/// cargo run -p sten-cli -- --shape 4,4 1:3,::2
/// ```
///
/// Pass `-v` or set `RUST_LOG=trace` to log each slicing step.
fn main() -> Result<(), Box<dyn Error>> {
    let args = parse_args()?;

    let default_level = if args.verbose { "trace" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let base = if args.shape.len() == 1 {
        arange(args.shape[0].try_into()?)?
    } else {
        arange_shape(&args.shape)?
    };
    print_view("buffer", &base);

    let mut view = base.clone();
    for slices in &args.slices {
        let label = slices
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        view = view.index(slices.as_slice())?;
        print_view(&label, &view);
    }

    if args.compose && !args.slices.is_empty() {
        let composed = compose_all(&args.slices)?;
        log::debug!("composed slices {:?}", composed);

        let label = composed
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join(",");
        let once = base.index(composed)?;
        print_view(&format!("composed {}", label), &once);

        if once != view {
            return Err("composed slices select different elements".into());
        }
        println!("composed slices match");
    }

    Ok(())
}
