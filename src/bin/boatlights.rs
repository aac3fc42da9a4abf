use std::{
    io::BufRead as _,
    path::{Path, PathBuf},
    sync::mpsc,
};

use anyhow::Context as _;
use boatlights::{
    Command as LightCommand, Installation, InstallationConfig, LightSession, Mode, NullSink,
    OpcClient, PixelSink,
};
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "boatlights", version, about = "Drive the boat LED installation")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Animate the fixtures and stream frames to the pixel controller.
    Run(RunArgs),
    /// Render a few ticks of a mode to a PNG preview.
    Snapshot(SnapshotArgs),
    /// Print the effective configuration as JSON.
    PrintConfig(ConfigArgs),
}

#[derive(Args, Debug)]
struct ConfigArgs {
    /// JSON config file; defaults are used for anything it omits.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting mode (also the fallback for unknown mode requests).
    #[arg(long)]
    mode: Option<Mode>,

    /// LED size in preview pixels.
    #[arg(long)]
    size: Option<f64>,

    /// Nacelle pulse frequency.
    #[arg(long)]
    freq: Option<f64>,

    /// Fixed random seed.
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Controller host.
    #[arg(long)]
    host: Option<String>,

    /// Controller port.
    #[arg(long)]
    port: Option<u16>,

    /// Send every frame twice.
    #[arg(long)]
    send_twice: bool,

    /// Animate without a controller.
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Stop after this many ticks.
    #[arg(long)]
    ticks: Option<u64>,

    /// Ignore stdin; run until the tick limit.
    #[arg(long)]
    no_input: bool,
}

#[derive(Args, Debug)]
struct SnapshotArgs {
    #[command(flatten)]
    config: ConfigArgs,

    /// Ticks to run before capturing.
    #[arg(long, default_value_t = 10)]
    ticks: u64,

    /// Global brightness in [0.1, 1.0].
    #[arg(long, default_value_t = 1.0)]
    brightness: f64,

    /// Output PNG path.
    #[arg(long)]
    out: PathBuf,
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Run(args) => cmd_run(args),
        Command::Snapshot(args) => cmd_snapshot(args),
        Command::PrintConfig(args) => cmd_print_config(args),
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_config(path: Option<&Path>) -> anyhow::Result<InstallationConfig> {
    match path {
        Some(path) => InstallationConfig::load(path)
            .with_context(|| format!("load config '{}'", path.display())),
        None => Ok(InstallationConfig::default()),
    }
}

impl ConfigArgs {
    fn resolve(&self) -> anyhow::Result<InstallationConfig> {
        let mut cfg = read_config(self.config.as_deref())?;
        if let Some(mode) = self.mode {
            cfg.animation.default_mode = mode;
        }
        if let Some(size) = self.size {
            cfg.geometry.led_size = size;
        }
        if let Some(freq) = self.freq {
            cfg.animation.nacelle_freq = freq;
        }
        if self.seed.is_some() {
            cfg.animation.seed = self.seed;
        }
        Ok(cfg)
    }
}

fn cmd_run(args: RunArgs) -> anyhow::Result<()> {
    let mut cfg = args.config.resolve()?;
    if let Some(host) = args.host {
        cfg.stream.host = host;
    }
    if let Some(port) = args.port {
        cfg.stream.port = port;
    }
    cfg.stream.send_twice |= args.send_twice;

    let sink: Box<dyn PixelSink> = if args.dry_run {
        tracing::info!("dry run, frames are discarded");
        Box::new(NullSink)
    } else {
        let client = OpcClient::new(&cfg.stream);
        tracing::info!(address = client.address(), "streaming to pixel controller");
        Box::new(client)
    };
    let installation = Installation::new(cfg).context("invalid configuration")?;
    let mut session = LightSession::new(installation, sink);

    let (tx, rx) = mpsc::channel();
    // Holding the sender keeps the channel open when stdin is ignored.
    let _idle = if args.no_input {
        Some(tx)
    } else {
        spawn_console(tx);
        None
    };

    let stats = session.run(&rx, args.ticks);
    eprintln!(
        "{} ticks, {} frames delivered ({:?})",
        stats.ticks, stats.delivered, stats.stop
    );
    Ok(())
}

fn spawn_console(tx: mpsc::Sender<LightCommand>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if line.trim().is_empty() {
                continue;
            }
            match line.parse::<LightCommand>() {
                Ok(cmd) => {
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
                Err(err) => eprintln!("{err}"),
            }
        }
    });
}

fn cmd_snapshot(args: SnapshotArgs) -> anyhow::Result<()> {
    let cfg = args.config.resolve()?;
    let mut installation = Installation::new(cfg).context("invalid configuration")?;
    installation.set_brightness(args.brightness);
    for _ in 0..args.ticks {
        let period = installation.tick_rate().period();
        installation.update(period);
    }
    let img = boatlights::preview::render(&installation);

    if let Some(parent) = args.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &args.out,
        img.as_raw(),
        img.width(),
        img.height(),
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", args.out.display()))?;

    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_print_config(args: ConfigArgs) -> anyhow::Result<()> {
    let cfg = args.resolve()?;
    cfg.validate().context("invalid configuration")?;
    let json = serde_json::to_string_pretty(&cfg).context("serialize config")?;
    println!("{json}");
    Ok(())
}
