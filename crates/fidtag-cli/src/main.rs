//! fidtag: locate square binary tags in a single image.
//!
//! Loads one image, converts it to intensity, runs the tag detector once,
//! prints the detection report to stdout, and writes an annotated copy of
//! the input. Strictly linear; the process exits on the first failure.

mod gray;
mod io;
mod overlay;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{error::ErrorKind, Parser, ValueEnum};
use log::{info, LevelFilter};

use fidtag_core::init_logging;
use fidtag_detect::{DetectTags, TagDetector, TagParams};
use fidtag_family::{builtins, TagFamily};

use crate::io::PipelineError;

#[derive(Parser, Debug)]
#[command(name = "fidtag")]
#[command(about = "Detect square binary fiducial tags in a single image")]
#[command(version)]
struct Cli {
    /// Path to the input image.
    image: PathBuf,

    /// Path for the annotated copy of the input.
    #[arg(long, default_value = "/out/result.png")]
    output: PathBuf,

    /// Tag family to decode against.
    #[arg(long, value_enum, default_value_t = FamilyArg::Tag36h11)]
    family: FamilyArg,

    /// Maximum corrected bit errors to accept a decode.
    #[arg(long, default_value_t = 2)]
    max_hamming: u8,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FamilyArg {
    #[value(name = "tag36h11")]
    Tag36h11,
    #[value(name = "tag16h5")]
    Tag16h5,
}

impl FamilyArg {
    fn to_family(self) -> TagFamily {
        match self {
            Self::Tag36h11 => builtins::tag36h11(),
            Self::Tag16h5 => builtins::tag16h5(),
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{err}");
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            // Usage goes to stdout and the process exits with 1.
            print!("{err}");
            return ExitCode::FAILURE;
        }
    };

    let _ = init_logging(LevelFilter::Info);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), PipelineError> {
    let mut img = io::load_color(&cli.image)?;
    info!(
        "loaded {} ({}x{})",
        cli.image.display(),
        img.width(),
        img.height()
    );

    let intensity = gray::rgb_to_gray(&img);

    let family = cli.family.to_family();
    info!(
        "family {} ({} codes, {}x{} payload)",
        family.name,
        family.len(),
        family.dim,
        family.dim
    );
    let params = TagParams {
        max_hamming: cli.max_hamming,
        ..TagParams::default()
    };
    let detector = TagDetector::new(family, params);

    let detections = detector.detect(&intensity.as_view());
    print!("{}", report::format_report(&detections));

    overlay::draw_detections(&mut img, &detections);
    io::save_color(&img, &cli.output)?;
    info!("wrote annotated image to {}", cli.output.display());

    Ok(())
}
