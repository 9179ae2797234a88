use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use winners_circle_report::builder::PdfBuildError;
use winners_circle_report::{fonts, ReportError};

/// Generates the Winners Circle Club analysis report as a PDF.
///
/// Fonts are looked up in `WINNERS_CIRCLE_FONTS_DIR` first, then in the usual
/// system font directories. Set `RUST_LOG=info` to see layout progress.
#[derive(Parser)]
#[command(author, version, about = "Generate the Winners Circle Club analysis report")]
struct Cli {
    /// Destination PDF file; replaced if it already exists.
    #[arg(long, value_name = "PATH", default_value = winners_circle_report::DEFAULT_OUTPUT)]
    output: PathBuf,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    match winners_circle_report::build(&cli.output) {
        Ok(path) => {
            println!("Report successfully generated: {}", path.display());
            log::info!("PDF report generated: {}", path.display());
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            print_error_sources(&err);
            if let ReportError::Build(PdfBuildError::FontLoad(font_err)) = &err {
                if fonts::fonts_missing(font_err) {
                    eprintln!(
                        "hint: point {} at a directory containing Liberation Sans or DejaVu Sans",
                        fonts::FONTS_DIR_ENV
                    );
                }
            }
            std::process::exit(1);
        }
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
