//! Three Cushion command-line entry point
//!
//! Reads a "calculate paths" request as JSON (from a file argument or stdin)
//! and prints the ranked paths as JSON.
//!
//! ```text
//! three-cushion [REQUEST.json] [--preset quick|standard|exhaustive] [--pretty]
//! ```

#[cfg(not(target_arch = "wasm32"))]
use std::io::Read;

#[cfg(not(target_arch = "wasm32"))]
use three_cushion::{PathRequest, RequestError, SearchPreset, calculate_paths};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct CliArgs {
    input: Option<String>,
    preset: Option<SearchPreset>,
    pretty: bool,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Result<CliArgs, String> {
    let mut args = CliArgs::default();
    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--pretty" => args.pretty = true,
            "--preset" => {
                let name = iter.next().ok_or("--preset needs a value")?;
                let preset = SearchPreset::from_str(&name)
                    .ok_or_else(|| format!("unknown preset '{}'", name))?;
                args.preset = Some(preset);
            }
            "-h" | "--help" => {
                return Err(
                    "usage: three-cushion [REQUEST.json] [--preset quick|standard|exhaustive] [--pretty]"
                        .to_string(),
                );
            }
            _ if args.input.is_none() => args.input = Some(arg),
            _ => return Err(format!("unexpected argument '{}'", arg)),
        }
    }

    Ok(args)
}

#[cfg(not(target_arch = "wasm32"))]
fn run(args: &CliArgs) -> Result<String, RequestError> {
    let json = match &args.input {
        Some(path) => {
            log::info!("Reading request from {}", path);
            std::fs::read_to_string(path)?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut request = PathRequest::from_json(&json)?;
    if args.preset.is_some() {
        request.preset = args.preset;
    }

    let response = calculate_paths(&request)?;
    log::info!(
        "{} of {} candidate angles made the ranking",
        response.paths.len(),
        response.candidates
    );

    let output = if args.pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    Ok(output)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let args = match parse_args() {
        Ok(args) => args,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    match run(&args) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library-only on wasm; callers use `three_cushion::calculate_paths_json`
}
