use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use regif::{
    Converter, FfmpegLogLevel, GifSettings, ProgressCallback, ProgressInfo, SourceProbe,
};
use serde_json::json;

const CLI_AFTER_HELP: &str = "Examples:\n  regif convert input.mp4\n  regif convert input.mp4 --out clip.gif --frames 24 --delay 0.08 --progress\n  regif convert input.mov --width 480 --loops 1\n  regif probe input.mp4 --json\n  regif completions zsh > _regif";

#[derive(Debug, Parser)]
#[command(
    name = "regif",
    version,
    about = "Turn videos into animated GIFs by sampling evenly spaced frames",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Convert a video into an animated GIF.
    #[command(
        about = "Convert a video into an animated GIF",
        after_help = "Examples:\n  regif convert input.mp4 --frames 24 --delay 0.08\n  regif convert input.mp4 --out clip.gif --width 480 --progress"
    )]
    Convert {
        /// Input video path or URL.
        input: PathBuf,

        /// Output GIF path. Defaults to the input path with a .gif extension.
        #[arg(long)]
        out: Option<PathBuf>,

        /// Number of evenly spaced frames to sample.
        #[arg(long, default_value_t = 10)]
        frames: u32,

        /// Display duration of each frame, in seconds.
        #[arg(long, default_value_t = 0.1)]
        delay: f64,

        /// Repeat count; 0 loops forever.
        #[arg(long, default_value_t = 0)]
        loops: u16,

        /// Output width in pixels. With no --height, height is derived from
        /// the source aspect ratio.
        #[arg(long)]
        width: Option<u32>,

        /// Output height in pixels. With no --width, width is derived from
        /// the source aspect ratio.
        #[arg(long)]
        height: Option<u32>,

        /// Show a progress bar.
        #[arg(long)]
        progress: bool,

        /// Allow overwriting an existing output file.
        #[arg(long)]
        overwrite: bool,

        /// Print a machine-readable JSON result summary.
        #[arg(long)]
        json: bool,
    },

    /// Print metadata for a video file (alias: info).
    #[command(
        about = "Print video metadata",
        visible_alias = "info",
        after_help = "Examples:\n  regif probe input.mp4\n  regif probe input.mp4 --json"
    )]
    Probe {
        /// Input video path or URL.
        input: PathBuf,

        /// Output metadata as machine-readable JSON.
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "quiet" => Some(FfmpegLogLevel::Quiet),
        "panic" => Some(FfmpegLogLevel::Panic),
        "fatal" => Some(FfmpegLogLevel::Fatal),
        "error" => Some(FfmpegLogLevel::Error),
        "warning" => Some(FfmpegLogLevel::Warning),
        "info" => Some(FfmpegLogLevel::Info),
        "verbose" => Some(FfmpegLogLevel::Verbose),
        "debug" => Some(FfmpegLogLevel::Debug),
        "trace" => Some(FfmpegLogLevel::Trace),
        _ => None,
    }
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    let default_filter = if global.verbose { "regif=debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        regif::set_ffmpeg_log_level(parsed);
    } else {
        // FFmpeg's default warning chatter drowns the CLI's own output.
        regif::set_ffmpeg_log_level(FfmpegLogLevel::Error);
    }

    Ok(())
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() && !overwrite {
        return Err(format!(
            "output file already exists: {} (use --overwrite)",
            path.display()
        )
        .into());
    }
    Ok(())
}

struct BarProgress {
    bar: ProgressBar,
}

impl BarProgress {
    fn new(total: u32) -> Result<Self, Box<dyn std::error::Error>> {
        let bar = ProgressBar::new(u64::from(total));
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        bar.set_style(style.progress_chars("##-"));
        Ok(Self { bar })
    }
}

impl ProgressCallback for BarProgress {
    fn on_frame(&self, info: &ProgressInfo) {
        self.bar.set_position(u64::from(info.current));
        self.bar.set_message(format!("{}", info.timestamp));
    }
}

/// Resolve the target size from `--width` / `--height`, probing the source
/// for its aspect ratio when only one dimension is given.
fn resolve_target_size(
    input: &Path,
    width: Option<u32>,
    height: Option<u32>,
) -> Result<Option<(u32, u32)>, Box<dyn std::error::Error>> {
    let (source_width, source_height) = match (width, height) {
        (Some(width), Some(height)) => return Ok(Some((width, height))),
        (None, None) => return Ok(None),
        _ => {
            let info = SourceProbe::probe(input)?;
            info.display_size()
                .ok_or("cannot derive aspect ratio: input has no video stream")?
        }
    };

    match (width, height) {
        (Some(width), None) => {
            let ratio = f64::from(width) / f64::from(source_width);
            let height = (f64::from(source_height) * ratio).round().max(1.0) as u32;
            Ok(Some((width, height)))
        }
        (None, Some(height)) => {
            let ratio = f64::from(height) / f64::from(source_height);
            let width = (f64::from(source_width) * ratio).round().max(1.0) as u32;
            Ok(Some((width, height)))
        }
        _ => unreachable!("both-or-neither cases returned above"),
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Convert {
            input,
            out,
            frames,
            delay,
            loops,
            width,
            height,
            progress,
            overwrite,
            json,
        } => {
            if !(delay > 0.0) {
                return Err("--delay must be positive".into());
            }

            let output = out.unwrap_or_else(|| input.with_extension("gif"));
            ensure_writable_path(&output, overwrite)?;

            let mut settings = GifSettings::new()
                .with_frame_count(frames)
                .with_frame_delay(Duration::from_secs_f64(delay))
                .with_loop_count(loops);
            if let Some((width, height)) = resolve_target_size(&input, width, height)? {
                settings = settings.with_target_size(width, height);
            }

            let mut converter = Converter::new(settings.clone());
            let bar = if progress {
                let bar = BarProgress::new(frames)?;
                let handle = bar.bar.clone();
                converter = converter.with_progress(Arc::new(bar));
                Some(handle)
            } else {
                None
            };

            let written = converter.convert(&input, &output)?;

            if let Some(bar) = bar {
                bar.finish_with_message("done");
            }

            if json {
                let payload = json!({
                    "output": written.display().to_string(),
                    "frames": frames,
                    "delay_seconds": delay,
                    "loop_count": loops,
                    "target_size": settings.target_size.map(|(width, height)| json!({
                        "width": width,
                        "height": height,
                    })),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!(
                    "{} {}",
                    "success:".green().bold(),
                    format!("Wrote {} frame(s) to {}", frames, written.display()).green()
                );
            }
        }
        Commands::Probe { input, json } => {
            let info = SourceProbe::probe(&input)?;
            if json {
                let payload = json!({
                    "format": info.format,
                    "duration_seconds": info.duration.as_seconds(),
                    "frame_rate": info.frame_rate,
                    "video": info.geometry.map(|geometry| {
                        let (display_width, display_height) = geometry.oriented_size();
                        json!({
                            "width": geometry.width,
                            "height": geometry.height,
                            "rotation_degrees": geometry.rotation,
                            "display_width": display_width,
                            "display_height": display_height,
                        })
                    }),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                println!("{}  {}", "format:".cyan().bold(), info.format);
                println!("{} {}", "duration:".cyan().bold(), info.duration);
                if let Some(rate) = info.frame_rate {
                    println!("{}     {rate:.2}", "fps:".cyan().bold());
                }
                match info.geometry {
                    Some(geometry) => {
                        let (display_width, display_height) = geometry.oriented_size();
                        println!(
                            "{}   {}x{} (displays as {}x{}, rotation {}°)",
                            "video:".cyan().bold(),
                            geometry.width,
                            geometry.height,
                            display_width,
                            display_height,
                            geometry.rotation,
                        );
                    }
                    None => println!("{}   none", "video:".cyan().bold()),
                }
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
