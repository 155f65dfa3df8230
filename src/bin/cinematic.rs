use std::{
    collections::BTreeSet,
    fs::File,
    io::{BufReader, Write as _},
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cinematic", version)]
struct Cli {
    /// Log sequencer events to stderr.
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the default two-key track as JSON.
    New,
    /// Load and validate a track JSON.
    Validate(ValidateArgs),
    /// Play a track headless and print one JSON frame report per line.
    Play(PlayArgs),
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Input track JSON.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct PlayArgs {
    /// Input track JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Sequencer options JSON.
    #[arg(long)]
    opts: Option<PathBuf>,

    /// Number of frames to render (default: until the last key is reached).
    #[arg(long)]
    frames: Option<u64>,

    /// Seconds per rendered frame (default: one track frame).
    #[arg(long)]
    dt: Option<f64>,

    /// Directory holding `<bitmap id>.png` images; missing ids get a placeholder.
    #[arg(long)]
    images: Option<PathBuf>,

    /// Write every rendered frame as a PNG into this directory.
    #[arg(long)]
    png_dir: Option<PathBuf>,
}

/// Grid cell size for bitmaps built by the CLI.
const GRID_CELL: u32 = 32;
/// Safety cap when playing until the end.
const MAX_FRAMES: u64 = 1_000_000;

struct LogSound;

impl cinematic::SoundTrigger for LogSound {
    fn play(&mut self, id: cinematic::SoundId) -> cinematic::CinematicResult<()> {
        tracing::info!(sound = id.0, "play sound");
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .init();

    match cli.cmd {
        Command::New => cmd_new(),
        Command::Validate(args) => cmd_validate(args),
        Command::Play(args) => cmd_play(args),
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    let r = BufReader::new(f);
    serde_json::from_reader(r).with_context(|| format!("parse {what} JSON '{}'", path.display()))
}

fn cmd_new() -> anyhow::Result<()> {
    let track = cinematic::Track::new_default();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, &track).context("write track JSON")?;
    writeln!(out)?;
    Ok(())
}

fn cmd_validate(args: ValidateArgs) -> anyhow::Result<()> {
    let track: cinematic::Track = read_json(&args.in_path, "track")?;
    track.validate()?;
    for key in track.keys() {
        key.effect
            .decode()
            .with_context(|| format!("keyframe at frame {}", key.frame.0))?;
    }
    eprintln!(
        "ok: {} keyframes over {} frames",
        track.len(),
        track.duration().0
    );
    Ok(())
}

fn cmd_play(args: PlayArgs) -> anyhow::Result<()> {
    let track: cinematic::Track = read_json(&args.in_path, "track")?;
    let opts: cinematic::SequencerOpts = match &args.opts {
        Some(p) => read_json(p, "options")?,
        None => cinematic::SequencerOpts::default(),
    };

    let mut adapter = cinematic::CpuAdapter::new(opts.output, opts.reference);
    let bitmaps = load_bitmaps(&track, &opts, args.images.as_deref(), &mut adapter)?;

    let dt = args.dt.unwrap_or_else(|| track.fps().frame_duration_secs());
    anyhow::ensure!(dt.is_finite() && dt > 0.0, "--dt must be a positive number");

    let mut seq = cinematic::CinematicSequencer::new(opts)?;
    seq.load_track(track)?;

    if let Some(dir) = &args.png_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("create output dir '{}'", dir.display()))?;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut sound = LogSound;
    let limit = args.frames.unwrap_or(MAX_FRAMES);
    for i in 0..limit {
        let report = seq.render_frame(dt, &bitmaps, &mut sound, &mut adapter)?;
        serde_json::to_writer(&mut out, &report).context("write frame report")?;
        writeln!(out)?;

        if let Some(dir) = &args.png_dir {
            let path = dir.join(format!("frame_{i:05}.png"));
            adapter
                .image()
                .save(&path)
                .with_context(|| format!("write png '{}'", path.display()))?;
        }

        if args.frames.is_none() && seq.clock().is_finished(seq.track()) {
            break;
        }
    }
    Ok(())
}

fn load_bitmaps(
    track: &cinematic::Track,
    opts: &cinematic::SequencerOpts,
    images: Option<&Path>,
    adapter: &mut cinematic::CpuAdapter,
) -> anyhow::Result<cinematic::BitmapStore> {
    let ids: BTreeSet<cinematic::BitmapId> = track.keys().filter_map(|k| k.bitmap).collect();

    let mut store = cinematic::BitmapStore::new();
    for id in ids {
        let texture = cinematic::TextureId(id.0);
        let path = images.map(|dir| dir.join(format!("{}.png", id.0)));
        let img = match path.as_deref().filter(|p| p.exists()) {
            Some(p) => image::open(p)
                .with_context(|| format!("read image '{}'", p.display()))?
                .to_rgba8(),
            None => placeholder(opts.logical, id.0),
        };
        let bitmap = cinematic::CinematicBitmap::subdivided(
            img.width(),
            img.height(),
            GRID_CELL,
            Some(texture),
        )?;
        adapter.insert_texture(texture, img);
        store.insert_at(id, bitmap)?;
    }
    Ok(store)
}

/// Checkerboard tinted per bitmap id.
fn placeholder(size: cinematic::Canvas, seed: u32) -> image::RgbaImage {
    let mut rng = cinematic::Rng64::new(u64::from(seed));
    let tint = [
        (64 + rng.next_u64() % 192) as u8,
        (64 + rng.next_u64() % 192) as u8,
        (64 + rng.next_u64() % 192) as u8,
    ];
    image::RgbaImage::from_fn(size.width, size.height, |x, y| {
        let on = ((x / 32) + (y / 32)) % 2 == 0;
        let k = if on { 1 } else { 2 };
        image::Rgba([tint[0] / k, tint[1] / k, tint[2] / k, 255])
    })
}
