use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use clap::Parser;
use ignore::WalkBuilder;
use pathmin::{MakeArcs, Options, optimize_with_options};
use rayon::prelude::*;

#[derive(Parser)]
#[command(name = "pathmin")]
#[command(about = "An SVG path data optimizer", long_about = None)]
struct Cli {
    /// Input file or directory (use - for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file (use - for stdout). For directory mode, files are optimized in-place.
    #[arg(short, long, default_value = "-")]
    output: PathBuf,

    /// Precision for coordinates (decimal places)
    #[arg(short, long, default_value = "3")]
    precision: u8,

    /// Disable coordinate rounding
    #[arg(long)]
    no_rounding: bool,

    /// Disable arc detection
    #[arg(long)]
    no_arcs: bool,

    /// Disable conversion of trailing lines to closepaths
    #[arg(long)]
    no_close: bool,

    /// Keep every command in relative form
    #[arg(long)]
    no_absolute: bool,

    /// Always emit absolute coordinates
    #[arg(long)]
    force_absolute: bool,

    /// Omit the space after arc flags
    #[arg(long)]
    no_space_after_flags: bool,

    /// Print size comparison
    #[arg(short, long)]
    stats: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let options = Options {
        make_arcs: if cli.no_arcs {
            None
        } else {
            Some(MakeArcs::default())
        },
        convert_to_z: !cli.no_close,
        utilize_absolute: !cli.no_absolute,
        force_absolute_path: cli.force_absolute,
        float_precision: if cli.no_rounding {
            None
        } else {
            Some(cli.precision)
        },
        no_space_after_flags: cli.no_space_after_flags,
        ..Options::default()
    };

    if cli.input.is_dir() {
        process_directory(&cli, &options)?;
    } else {
        process_single_file(&cli, &options)?;
    }

    Ok(())
}

fn process_single_file(cli: &Cli, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let input = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&cli.input)?
    };

    let input_len = input.len();

    let output = optimize_with_options(&input, options)?;
    let output_len = output.len();

    if cli.output.as_os_str() == "-" {
        io::stdout().write_all(output.as_bytes())?;
    } else {
        fs::write(&cli.output, &output)?;
    }

    if cli.stats {
        let saved = input_len.saturating_sub(output_len);
        let percent = if input_len > 0 {
            (saved as f64 / input_len as f64) * 100.0
        } else {
            0.0
        };
        eprintln!(
            "{} -> {} bytes ({:.1}% smaller)",
            input_len, output_len, percent
        );
    }

    Ok(())
}

fn process_directory(cli: &Cli, options: &Options) -> Result<(), Box<dyn std::error::Error>> {
    let files: Vec<PathBuf> = WalkBuilder::new(&cli.input)
        .git_ignore(false)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.path().extension().is_some_and(|ext| ext == "svg"))
        .map(|e| e.path().to_path_buf())
        .collect();

    let processed = AtomicUsize::new(0);
    let failed = AtomicUsize::new(0);

    files.par_iter().for_each(|path| {
        if let Ok(input) = fs::read_to_string(path) {
            match optimize_with_options(&input, options) {
                Ok(output) => {
                    if fs::write(path, &output).is_ok() {
                        processed.fetch_add(1, Ordering::Relaxed);
                    } else {
                        failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
                Err(_) => {
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        }
    });

    if cli.stats {
        eprintln!(
            "Processed {} files, {} failed",
            processed.load(Ordering::Relaxed),
            failed.load(Ordering::Relaxed)
        );
    }

    Ok(())
}
