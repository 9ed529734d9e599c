use std::time::{Duration, SystemTime};

use clap::Parser;
use firmament::gpu::{Context, Descriptor, Gpu, Recorder};
use firmament::log::{error, info, warn};
use firmament::sky::{Config, FileFetcher, SkyBox};
use firmament::types::FrameState;

#[derive(Parser, Debug, Clone)]
#[command(name = "firmament")]
#[command(about = "Runs a skybox of six face images for a number of frames", long_about = None)]
struct Cli {
    /// Face images in +X, -X, +Y, -Y, +Z, -Z order
    #[arg(long, num_args = 6, required = true)]
    faces: Vec<String>,

    /// Number of frames to run
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Pause between frames
    #[arg(long = "interval-ms", default_value_t = 16)]
    interval_ms: u64,

    /// Edge length of the box
    #[arg(long, default_value_t = 100_000_000.0)]
    size: f32,

    /// Log rules as `target=level,...`
    #[arg(long)]
    log: Option<String>,

    /// Record GPU calls in memory instead of using an adapter
    #[arg(long, default_value = "false")]
    headless: bool,
}

fn main() {
    let cli = Cli::parse();

    let mut logger = firmament::Log::default().from_env("FIRMAMENT_LOG");
    if let Some(rules) = cli.log.as_deref() {
        logger = logger.with_rules(rules);
    }
    firmament::log::subscribe(logger);

    let result = if cli.headless {
        run(&cli, &mut Recorder::new())
    } else {
        match Gpu::new(Descriptor::default()) {
            Ok(mut gpu) => run(&cli, &mut gpu),
            Err(err) => {
                warn!("{}, GPU calls are recorded instead", err);
                run(&cli, &mut Recorder::new())
            }
        }
    };

    if let Err(err) = result {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn run<C: Context>(cli: &Cli, context: &mut C) -> Result<(), firmament::sky::Error> {
    let config = Config {
        size: cli.size,
        ..Default::default()
    };
    let fetcher = FileFetcher::new(config.root.clone());
    let mut sky = SkyBox::with_config(&cli.faces, config, fetcher)?;

    let mut emitted = 0;
    for number in 0..cli.frames {
        let mut frame = FrameState::new(SystemTime::now());
        frame.number = number;

        let mut commands = Vec::new();
        sky.update(context, &frame, &mut commands)?;

        let count = commands
            .iter()
            .map(|lists| lists.color.len())
            .sum::<usize>();
        if count > 0 && emitted == 0 {
            info!("skybox is rendered since frame {}", number);
        }
        emitted += count;

        std::thread::sleep(Duration::from_millis(cli.interval_ms));
    }

    let load_state = sky.load_state()?;
    info!("faces loaded: {}/{}", load_state.loaded(), firmament::sky::FACES_COUNT);
    if let Some(err) = load_state.error() {
        warn!("{}", err);
    }
    info!("{} draw commands in {} frames", emitted, cli.frames);

    if sky.dispose(context).is_none() {
        info!("skybox is destroyed");
    }
    Ok(())
}
