//! pdf2csv CLI - convert PDF tables to CSV

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdf2csv::{Conversion, Converter, ErrorKind, ExtractOptions};

/// Exit code for a readable PDF that held nothing to convert.
const EXIT_NO_DATA: i32 = 2;

#[derive(Parser)]
#[command(name = "pdf2csv")]
#[command(version)]
#[command(about = "Convert PDF tables (or text lines) to CSV", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    #[command(flatten)]
    convert: ConvertArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a PDF to CSV
    Convert {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Show the first rows without writing anything
    Preview {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone, Default)]
struct ConvertArgs {
    /// Output CSV file (default: input name with .csv, next to the input)
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Write CSV to stdout instead of a file
    #[arg(long)]
    stdout: bool,

    /// Only print errors
    #[arg(short, long)]
    quiet: bool,

    #[command(flatten)]
    extract: ExtractArgs,
}

#[derive(Args, Clone, Default)]
struct ExtractArgs {
    /// Number of rows to preview
    #[arg(long, value_name = "N", default_value_t = 10)]
    rows: usize,

    /// Skip pages that fail to extract instead of aborting
    #[arg(long)]
    lenient: bool,

    /// Read every page as text lines, without table detection
    #[arg(long)]
    text_only: bool,
}

impl ExtractArgs {
    fn options(&self) -> ExtractOptions {
        let mut options = ExtractOptions::new().with_table_detection(!self.text_only);
        if self.lenient {
            options = options.lenient();
        }
        options
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Convert { input, args }) => cmd_convert(&input, &args),
        Some(Commands::Preview { input, extract }) => cmd_preview(&input, &extract),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&input, &cli.convert)
            } else {
                println!("{}", "Usage: pdf2csv <FILE> [-o OUTPUT]".yellow());
                println!("       pdf2csv --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        std::process::exit(report_error(&*e));
    }
}

/// Print an error and pick the exit code for it.
fn report_error(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<pdf2csv::Error>() {
        Some(e) if e.kind() == ErrorKind::NoDataExtracted => {
            eprintln!("{}: {}", "Notice".yellow().bold(), e.user_message());
            EXIT_NO_DATA
        }
        Some(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e.user_message());
            eprintln!("Please make sure your PDF is not corrupted and try again.");
            1
        }
        None => {
            eprintln!("{}: {}", "Error".red().bold(), err);
            1
        }
    }
}

fn cmd_convert(input: &Path, args: &ConvertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let show_progress = !args.quiet && !args.stdout;
    let conversion = run_conversion(input, &args.extract, show_progress)?;

    if args.stdout {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&conversion.csv)?;
        stdout.flush()?;
        return Ok(());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(input, &conversion.file_name));
    conversion.save(&output)?;

    if !args.quiet {
        print_preview(&conversion, args.extract.rows);
        println!(
            "{} {}",
            "Saved to".green(),
            output.display().to_string().bold()
        );
    }

    Ok(())
}

fn cmd_preview(input: &Path, extract: &ExtractArgs) -> Result<(), Box<dyn std::error::Error>> {
    let conversion = run_conversion(input, extract, true)?;
    print_preview(&conversion, extract.rows);
    Ok(())
}

/// Convert the input behind a spinner. Nothing is written here, so a
/// failed conversion leaves no output file.
fn run_conversion(
    input: &Path,
    extract: &ExtractArgs,
    show_progress: bool,
) -> Result<Conversion, Box<dyn std::error::Error>> {
    let pb = if show_progress {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message("Processing PDF...");

    let data = fs::read(input)?;
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let result = Converter::new()
        .with_options(extract.options())
        .convert_bytes(&data, &name);
    pb.finish_and_clear();

    let conversion = result?;
    log::debug!("{}", conversion.rows.stats());
    if show_progress {
        println!(
            "{} {} page(s)",
            "Processed".cyan(),
            conversion.page_count
        );
    }
    Ok(conversion)
}

fn print_preview(conversion: &Conversion, rows: usize) {
    println!();
    println!("{}", format!("Preview (first {} rows)", rows).cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", conversion.preview_table(rows));
    println!("{}", "─".repeat(40).dimmed());
    println!(
        "{}: {}",
        "Total rows extracted".bold(),
        conversion.row_count()
    );
}

/// The derived CSV name, placed next to the input file.
fn default_output_path(input: &Path, file_name: &str) -> PathBuf {
    match input.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(file_name),
        _ => PathBuf::from(file_name),
    }
}

fn cmd_version() {
    println!("{} {}", "pdf2csv".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF table to CSV converter");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path(Path::new("docs/report.pdf"), "report.csv"),
            PathBuf::from("docs/report.csv")
        );
        assert_eq!(
            default_output_path(Path::new("report.pdf"), "report.csv"),
            PathBuf::from("report.csv")
        );
    }

    #[test]
    fn test_extract_args_options() {
        let args = ExtractArgs {
            rows: 10,
            lenient: true,
            text_only: true,
        };
        let options = args.options();
        assert_eq!(options.error_mode, pdf2csv::ErrorMode::Lenient);
        assert!(!options.detect_tables);
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
