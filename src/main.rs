//! A small CLI front-end around the [`ungzip`] library: decompress a single
//! `.gz` file to disk.
//!
//! Grounded on the teacher's own `main.rs` (read the whole input up front,
//! `log` macros for diagnostics, a thin `lib`/`bin` split) and on
//! `examples/original_source/ungzip.c::main` (`.gz` suffix stripping,
//! removing the partial output file on failure, one-line usage/error
//! messages, matching exit codes).

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

/// Decompress a gzip (.gz) file.
#[derive(Parser, Debug)]
#[command(name = "ungzip", version, about = "Decompress a gzip (.gz) file")]
struct Args {
    /// The .gz file to decompress.
    input: PathBuf,

    /// Suppress informational logging.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Emit verbose (debug-level) logging.
    #[arg(short, long)]
    verbose: bool,

    /// Skip CRC-32/ISIZE trailer verification.
    #[arg(long)]
    no_verify: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    match run(&args) {
        Ok(output_path) => {
            log::info!("successfully decompressed into {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(message) => {
            log::error!("{message}");
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(args: &Args) {
    let level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn run(args: &Args) -> Result<PathBuf, String> {
    let output_path = output_path_for(&args.input)?;

    log::trace!("reading {}", args.input.display());
    let input = fs::read(&args.input)
        .map_err(|e| format!("failed to read {}: {e}", args.input.display()))?;

    let options = ungzip::DecompressOptions { verify_checksums: !args.no_verify };

    let outcome = fs::File::create(&output_path)
        .map_err(|e| format!("failed to open {} for writing: {e}", output_path.display()))
        .and_then(|file| {
            ungzip::decompress_with(&input, file, options)
                .map_err(|e| format!("failed to decompress {}: {e}", args.input.display()))
        });

    if let Err(message) = outcome {
        let _ = fs::remove_file(&output_path);
        return Err(message);
    }

    Ok(output_path)
}

fn output_path_for(input: &PathBuf) -> Result<PathBuf, String> {
    let name = input
        .to_str()
        .ok_or_else(|| "input filename is not valid UTF-8".to_string())?;
    name.strip_suffix(".gz")
        .map(PathBuf::from)
        .ok_or_else(|| "expecting a filename with a .gz extension".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_gz_suffix() {
        assert_eq!(output_path_for(&PathBuf::from("archive.tar.gz")).unwrap(), PathBuf::from("archive.tar"));
    }

    #[test]
    fn rejects_missing_gz_suffix() {
        assert!(output_path_for(&PathBuf::from("archive.tar")).is_err());
    }
}
