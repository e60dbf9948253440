use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;

use lfvideo_rs::light_field::{
    FocusSweep, ImageDirectoryWriter, LightFieldLoader, LightFieldVideo, LoadConfig,
    MjpegAviWriter, OutputConfig, PointF, PointTracker, Refocuser, RenderedFrame,
    SequenceWriter, StillFormat, SweepConfig, SweepMode, TrackOutcome, write_still_file,
};
use lfvideo_rs::logger;

#[derive(Parser)]
#[command(name = "lfvideo", version, about = "Refocus light-field video after capture", long_about = None)]
struct Cli {
    /// Views per side of the capture grid.
    #[arg(long, global = true, default_value_t = 8)]
    grid_size: usize,

    /// Log at debug level and show stage durations.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print frame count, grid and view size of a dataset.
    Info {
        /// Dataset root holding `lightfield/` and `disparity/`.
        root: PathBuf,
    },
    /// Refocus a single frame.
    Render {
        root: PathBuf,
        #[arg(long, default_value_t = 0)]
        frame: usize,
        /// Focus offset.
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        alpha: f32,
        /// Effective aperture in [0, 1]; 1 averages all views uniformly.
        #[arg(long, default_value_t = 1.0)]
        aperture: f32,
        /// Output still (.png, .tif or .tiff).
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Render a focus sweep as a video or an image directory.
    Sweep {
        root: PathBuf,
        /// Advance one frame per sample instead of sweeping frame 0.
        #[arg(long)]
        advance: bool,
        #[arg(long, default_value_t = 1.0)]
        aperture: f32,
        #[arg(long, default_value_t = 117)]
        samples: usize,
        #[arg(long, default_value_t = 30.0)]
        fps: f32,
        /// MJPEG AVI output.
        #[arg(short, long, required_unless_present = "frames_dir", conflicts_with = "frames_dir")]
        output: Option<PathBuf>,
        /// Write numbered PNG frames here instead of a video.
        #[arg(long)]
        frames_dir: Option<PathBuf>,
        /// Print per-frame render timings.
        #[arg(long)]
        timings: bool,
    },
    /// Extract one sub-aperture view.
    View {
        root: PathBuf,
        #[arg(long, default_value_t = 0)]
        frame: usize,
        /// Horizontal grid position in [0, 1].
        #[arg(long, default_value_t = 0.5)]
        u: f32,
        /// Vertical grid position in [0, 1].
        #[arg(long, default_value_t = 0.5)]
        v: f32,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Print the focus offset stored at a pixel.
    Disparity {
        root: PathBuf,
        #[arg(long, default_value_t = 0)]
        frame: usize,
        #[arg(long)]
        x: f32,
        #[arg(long)]
        y: f32,
    },
    /// Follow a point of the reference view into later frames.
    Track {
        root: PathBuf,
        #[arg(long, default_value_t = 0)]
        frame: usize,
        #[arg(long)]
        x: f32,
        #[arg(long)]
        y: f32,
        /// Last frame to track into; defaults to the next frame.
        #[arg(long)]
        until: Option<usize>,
    },
}

fn load(root: &Path, grid_size: usize) -> Result<LightFieldVideo> {
    let config = LoadConfig::builder().grid_size(grid_size).build();
    LightFieldLoader::new(config)
        .load_dir(root)
        .with_context(|| format!("failed to load light-field video from {}", root.display()))
}

fn save_still(frame: &RenderedFrame, path: &Path) -> Result<()> {
    let config = OutputConfig::builder()
        .format(StillFormat::from_path(path))
        .build();
    write_still_file(frame, path, &config)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match cli.command {
        Command::Info { root } => {
            let video = load(&root, cli.grid_size)?;
            let (width, height) = video.view_size();
            println!("frames:     {}", video.frame_count());
            println!("disparity:  {}", video.disparity_count());
            println!("grid:       {0}x{0} ({1} views)", video.grid().size(), video.view_count());
            println!("view size:  {}x{}", width, height);
        }
        Command::Render { root, frame, alpha, aperture, output } => {
            let video = load(&root, cli.grid_size)?;
            let rendered = Refocuser::new(&video)
                .render(frame, alpha, aperture)
                .with_context(|| format!("failed to refocus frame {frame}"))?;
            save_still(&rendered, &output)?;
            info!(output = %output.display(), "Refocused frame written");
        }
        Command::Sweep { root, advance, aperture, samples, fps, output, frames_dir, timings } => {
            let video = load(&root, cli.grid_size)?;
            let mode = if advance { SweepMode::AdvancingFrame } else { SweepMode::FixedFrame };
            let config = SweepConfig::builder()
                .samples(samples)
                .aperture(aperture)
                .mode(mode)
                .build();
            let sweep = FocusSweep::new(Refocuser::new(&video), config);

            let (frames, step_timings) = sweep.run_with_timings().context("focus sweep failed")?;
            if timings {
                step_timings.print_summary();
            }

            match (output, frames_dir) {
                (Some(path), _) => MjpegAviWriter::new(fps)
                    .write_sequence(&frames, &path)
                    .with_context(|| format!("failed to write video {}", path.display()))?,
                (None, Some(dir)) => ImageDirectoryWriter
                    .write_sequence(&frames, &dir)
                    .with_context(|| format!("failed to write frames to {}", dir.display()))?,
                (None, None) => bail!("either --output or --frames-dir is required"),
            }
        }
        Command::View { root, frame, u, v, output } => {
            let video = load(&root, cli.grid_size)?;
            let image = video
                .view_by_normalized_coord_u8(frame, u, v)
                .with_context(|| format!("no view at ({u}, {v}) in frame {frame}"))?;
            let rendered = RenderedFrame {
                image,
                frame_id: frame,
                alpha: 0.0,
                aperture: 0.0,
            };
            save_still(&rendered, &output)?;
        }
        Command::Disparity { root, frame, x, y } => {
            let video = load(&root, cli.grid_size)?;
            let offset = video
                .disparity_at(frame, PointF::new(x, y))
                .with_context(|| format!("cannot read disparity at ({x}, {y})"))?;
            println!("{offset}");
        }
        Command::Track { root, frame, x, y, until } => {
            let video = load(&root, cli.grid_size)?;
            let tracker = PointTracker::new(&video);
            let start = PointF::new(x, y);

            match until {
                Some(end) => {
                    let path = tracker
                        .track_through(start, frame, end)
                        .context("tracking failed")?;
                    for (step, point) in path.iter().enumerate() {
                        println!("{}\t{:.3}\t{:.3}", frame + step, point.x, point.y);
                    }
                }
                None => match tracker.track(start, frame).context("tracking failed")? {
                    TrackOutcome::Found(p) => println!("{:.3}\t{:.3}", p.x, p.y),
                    TrackOutcome::NotFound => println!("not found"),
                },
            }
        }
    }

    Ok(())
}
