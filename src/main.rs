use clap::Parser;
use epicycles::render::{encode_png, render_frame};
use epicycles::{kurbo::Point, ApproximationConfig, PathModel, RenderOptions};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "epicycles", about = "Fourier epicycle rendering of hand-drawn closed curves")]
struct Cli {
    /// Input polyline file: one "x y" pair per line, '#' starts a comment
    #[arg(short, long)]
    input: PathBuf,

    /// Output PNG path, or output directory when --frames is set
    #[arg(short, long)]
    output: PathBuf,

    /// Truncation order of the Fourier series
    #[arg(short = 'n', long, default_value = "50")]
    order: usize,

    /// Time parameter in [0, 1] of the rendered frame
    #[arg(short, long, default_value = "1.0")]
    time: f64,

    /// Render this many frames sweeping t from 0 to 1 instead of one frame
    #[arg(long)]
    frames: Option<usize>,

    /// Canvas size in pixels
    #[arg(long, default_value = "512")]
    size: u32,

    /// Integration samples per unit of path length
    #[arg(long, default_value = "2.0")]
    integration_precision: f64,

    /// Cached curve samples per unit of path length
    #[arg(long, default_value = "1.0")]
    curve_precision: f64,

    /// Hide the epicycle circles
    #[arg(long)]
    no_circles: bool,

    /// Hide the segment chain
    #[arg(long)]
    no_segments: bool,

    /// Hide the reconstructed curve
    #[arg(long)]
    no_curve: bool,

    /// Hide the original drawing
    #[arg(long)]
    no_original: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let text = std::fs::read_to_string(&cli.input)?;
    let points = parse_points(&text)?;
    let drawing = PathModel::new(points)?;
    eprintln!(
        "  Path        length {:.1}, drawn portion {:.0}%",
        drawing.path_length(),
        100.0 * drawing.original_path_duration(),
    );

    let config = ApproximationConfig {
        integration_precision: cli.integration_precision,
        curve_precision: cli.curve_precision,
    };
    let mut series = drawing.fourier_series(cli.order, &config)?;

    let options = RenderOptions {
        size: cli.size,
        show_original: !cli.no_original,
        show_circles: !cli.no_circles,
        show_segments: !cli.no_segments,
        show_curve: !cli.no_curve,
    };
    let order = cli.order as f64;

    match cli.frames {
        None => {
            let pixmap = render_frame(&drawing, &mut series, order, cli.time, &options)?;
            std::fs::write(&cli.output, encode_png(&pixmap)?)?;
            eprintln!("  Wrote       {}", cli.output.display());
        }
        Some(frames) => {
            if frames < 2 {
                return Err("--frames needs at least 2 frames".into());
            }
            std::fs::create_dir_all(&cli.output)?;
            // t sweeps upward, so the curve cache only ever extends.
            series.reset_curve();
            for frame in 0..frames {
                let t = frame as f64 / (frames - 1) as f64;
                let pixmap = render_frame(&drawing, &mut series, order, t, &options)?;
                let path = cli.output.join(format!("frame_{:04}.png", frame));
                std::fs::write(&path, encode_png(&pixmap)?)?;
            }
            eprintln!(
                "  Wrote       {} frames to {}",
                frames,
                cli.output.display()
            );
        }
    }

    Ok(())
}

/// Parse "x y" pairs, one per line; blank lines and '#' comments ignored.
fn parse_points(text: &str) -> Result<Vec<Point>, Box<dyn std::error::Error>> {
    let mut points = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split_whitespace();
        let (Some(x), Some(y)) = (fields.next(), fields.next()) else {
            return Err(format!("line {}: expected \"x y\"", line_no + 1).into());
        };
        points.push(Point::new(x.parse()?, y.parse()?));
    }
    Ok(points)
}
