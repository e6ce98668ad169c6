// src/main.rs

use std::error::Error;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use log::LevelFilter;

use bridge_beam_render::constants::{DEFAULT_BEAM_LENGTH, DEFAULT_FRAME_INTERVAL_MS, DEFAULT_SIDE};
use bridge_beam_render::{crate_version, read_log, select_frames, FrameAnimator, PanelLayout};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayoutArg {
    Geometry,
    GeometryBars,
    Bars,
}

impl From<LayoutArg> for PanelLayout {
    fn from(arg: LayoutArg) -> Self {
        match arg {
            LayoutArg::Geometry => PanelLayout::Geometry,
            LayoutArg::GeometryBars => PanelLayout::GeometryWithBars,
            LayoutArg::Bars => PanelLayout::Bars,
        }
    }
}

/// Animate bridge beam rotations from an inclinometer TDMS log.
#[derive(Parser, Debug)]
#[command(name = "bridge_beam_render", version, about)]
struct Args {
    /// TDMS log to read
    input: PathBuf,

    /// Channel prefix selecting the bridge side, e.g. AMR
    #[arg(long, default_value = DEFAULT_SIDE)]
    side: String,

    #[arg(long, value_enum, default_value_t = LayoutArg::Geometry)]
    layout: LayoutArg,

    #[arg(long, default_value_t = DEFAULT_BEAM_LENGTH)]
    beam_length: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    origin_x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    origin_y: f64,

    /// Delay between animation frames in milliseconds
    #[arg(long, default_value_t = DEFAULT_FRAME_INTERVAL_MS)]
    interval: u32,

    /// First frame to render
    #[arg(long, default_value_t = 0)]
    start: usize,

    /// Stop before this frame (default: last row)
    #[arg(long)]
    end: Option<usize>,

    #[arg(long, default_value_t = 1)]
    step: usize,

    /// Append a degree sign to angle labels (default: on for geometry-bars)
    #[arg(long)]
    degree_symbol: Option<bool>,

    /// Write only this frame, as a PNG
    #[arg(long)]
    frame: Option<usize>,

    /// Output file (default: <input stem>_<layout>.gif or .png)
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Also dump the B1..B4 table as CSV
    #[arg(long)]
    export_csv: Option<PathBuf>,
}

fn default_output(input: &Path, layout: PanelLayout, extension: &str) -> PathBuf {
    let root_name = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_{}.{}", root_name, layout.file_tag(), extension))
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::new()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let args = Args::parse();
    println!("bridge_beam_render {}", crate_version());

    // --- Read the four beam channels ---
    let table = read_log(&args.input, &args.side)?;
    println!("Read {} samples for side '{}'.", table.len(), args.side);

    if let Some(csv_path) = &args.export_csv {
        { // Block to limit the scope of the file writer
            let file = File::create(csv_path)?;
            table.write_csv(BufWriter::new(file))?;
        }
        println!("  Channel table saved as '{}'.", csv_path.display());
    }

    // --- Build the animator ---
    let layout = PanelLayout::from(args.layout);
    let mut animator = FrameAnimator::new(
        args.beam_length,
        table.to_angle_matrix(),
        (args.origin_x, args.origin_y),
        layout,
    )?;
    if let Some(enabled) = args.degree_symbol {
        animator = animator.with_degree_symbol(enabled);
    }

    // --- Render ---
    if let Some(index) = args.frame {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output(&args.input, layout, "png"));
        animator.render_png(&output, index)?;
        println!("  Frame {} saved as '{}'.", index, output.display());
    } else {
        let frames = select_frames(args.start, args.end, args.step, animator.frame_count())?;
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output(&args.input, layout, "gif"));
        let animation = animator.animate(&output, args.interval, Some(frames))?;
        println!(
            "  Animation saved as '{}' ({} frames, {:.1} s).",
            animation.path().display(),
            animation.frame_count(),
            animation.duration().as_secs_f64()
        );
    }

    Ok(())
}
