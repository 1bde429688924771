use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use prism_slider::{
    FixedStepScheduler, FsImageProvider, ImageProvider, PixmapSurface, PngSequenceSink, Prism,
    PrismConfig, ResourceLoader, ThreadedLoader,
};
use tracing::Level;

#[derive(Parser, Debug)]
#[command(name = "prism-slider", version)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one settled slide position as a PNG.
    Still(StillArgs),
    /// Render a transition as a PNG sequence.
    Render(RenderArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input prism config JSON. Without it the built-in demo config is used.
    #[arg(long = "in")]
    in_path: Option<PathBuf>,

    /// Directory image sources are resolved against. Defaults to the config's directory.
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Background color the frames are flattened over, as `#rrggbb`.
    #[arg(long, default_value = "#000000", value_parser = parse_hex_rgb)]
    background: [u8; 4],
}

#[derive(Parser, Debug)]
struct StillArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Slide index (0-based).
    #[arg(long, default_value_t = 0)]
    slide: usize,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Slide shown before the transition starts.
    #[arg(long, default_value_t = 0)]
    from: usize,

    /// Slide the transition moves to.
    #[arg(long)]
    to: usize,

    /// Frames per second of the output sequence.
    #[arg(long, default_value_t = 60.0)]
    fps: f64,

    /// Output directory for `frame_00000.png`, ...
    #[arg(long)]
    out_dir: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Still(args) => cmd_still(args),
        Command::Render(args) => cmd_render(args),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_hex_rgb(s: &str) -> Result<[u8; 4], String> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(format!("expected #rrggbb, got '{s}'"));
    }
    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("bad color '{s}': {e}"))
    };
    Ok([channel(0)?, channel(2)?, channel(4)?, 255])
}

/// Load the config, build every layer and wait for all images.
fn load_prism(input: &InputArgs) -> anyhow::Result<Prism<PixmapSurface>> {
    let (config, config_dir) = match &input.in_path {
        Some(path) => (
            PrismConfig::from_path(path)?,
            path.parent().unwrap_or_else(|| Path::new(".")).to_path_buf(),
        ),
        None => (PrismConfig::demo(), PathBuf::from(".")),
    };
    config.validate()?;

    let root = input.assets.clone().unwrap_or(config_dir);
    let provider: Arc<dyn ImageProvider> =
        Arc::new(FsImageProvider::new(root).with_svg_size(config.container));

    let mut prism = Prism::<PixmapSurface>::from_config(&config, || {
        Box::new(ThreadedLoader::new(provider.clone())) as Box<dyn ResourceLoader>
    })?;
    prism.init()?;

    let failures = prism.wait_for_loads()?;
    if let Some(first) = failures.first() {
        anyhow::bail!(
            "{} image(s) failed to load; first: '{}': {}",
            failures.len(),
            first.source,
            first.error
        );
    }
    Ok(prism)
}

fn cmd_still(args: StillArgs) -> anyhow::Result<()> {
    let mut prism = load_prism(&args.input)?;
    anyhow::ensure!(
        args.slide < prism.slide_count(),
        "slide {} out of range (0..{})",
        args.slide,
        prism.slide_count()
    );
    prism.jump_to(args.slide)?;

    if let Some(parent) = args.out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let frame = prism.compose_frame()?;
    prism_slider::write_png(&frame, &args.out, args.input.background)?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut prism = load_prism(&args.input)?;
    let count = prism.slide_count();
    anyhow::ensure!(
        args.from < count && args.to < count,
        "slides must be in 0..{count}"
    );
    anyhow::ensure!(args.from != args.to, "--from and --to must differ");
    prism.jump_to(args.from)?;

    let mut scheduler = FixedStepScheduler::from_fps(args.fps)?;
    let mut sink = PngSequenceSink::new(&args.out_dir, args.input.background);
    let frames = prism.render_transition(args.to, args.fps, &mut scheduler, &mut sink)?;

    eprintln!("wrote {frames} frames to {}", args.out_dir.display());
    Ok(())
}
