mod ui;

use std::{
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver},
    thread::{self, JoinHandle},
};

use clap::{Parser, Subcommand, arg};
use egui::Vec2;
use log::{error, info};

use homebound::{
    AppConfig, HomeboundError, LocationEvent, LocationWatcher, MapboxDirections, NavigationEvent,
    NavigationOutput, NavigationState, Navigator, RenderState,
    directions::{RouteRequest, StoredDirections, spawn_refresher},
    location::{ReplayLocationProvider, StaticPermissionPrompter},
    writer,
};
use ui::live::NavigationApp;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    /// Log every state change
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the navigation display in a window
    Live {
        /// Position track to replay, as written by --output
        #[arg(short, long)]
        replay: PathBuf,

        /// Record positions and routes to a JSON Lines file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Serve a saved Directions API response instead of calling Mapbox
        #[arg(short, long)]
        directions: Option<PathBuf>,
    },
    /// Run the navigation pipeline without a window and log route updates
    Headless {
        #[arg(short, long)]
        replay: PathBuf,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        directions: Option<PathBuf>,
    },
}

struct Pipeline {
    navigator: Navigator,
    event_receiver: Receiver<NavigationEvent>,
    watcher: LocationWatcher,
    refresher: JoinHandle<()>,
    writer: Option<JoinHandle<Result<(), HomeboundError>>>,
}

fn start_refresher(
    config: &AppConfig,
    directions: Option<&Path>,
    event_sender: mpsc::Sender<NavigationEvent>,
) -> Result<(mpsc::Sender<RouteRequest>, JoinHandle<()>), HomeboundError> {
    match directions {
        Some(file) => spawn_refresher(StoredDirections::from_file(file)?, event_sender),
        None => {
            let client =
                MapboxDirections::new(config.directions.clone(), AppConfig::access_token()?)?;
            spawn_refresher(client, event_sender)
        }
    }
}

fn start_pipeline(
    config: &AppConfig,
    replay: &Path,
    output: Option<PathBuf>,
    directions: Option<&Path>,
) -> Result<Pipeline, HomeboundError> {
    let provider = ReplayLocationProvider::from_file(replay)?;
    let (event_tx, event_rx) = mpsc::channel::<NavigationEvent>();
    let (request_tx, refresher) = start_refresher(config, directions, event_tx.clone())?;

    // if we need to write an output file the navigator also sends every position and route to the writer
    let (record_tx, writer) = match output {
        Some(output_file) => {
            let (record_tx, record_rx) = mpsc::channel::<NavigationOutput>();
            let writer = thread::spawn(move || writer::write_navigation(&output_file, record_rx));
            (Some(record_tx), Some(writer))
        }
        None => (None, None),
    };

    let navigator = Navigator::new(
        NavigationState::new(config.destination, config.zoom),
        request_tx,
        record_tx,
    );
    let mut watcher = LocationWatcher::new(Box::new(provider), config.location.clone());
    watcher.mount(&mut StaticPermissionPrompter::default(), event_tx)?;

    Ok(Pipeline {
        navigator,
        event_receiver: event_rx,
        watcher,
        refresher,
        writer,
    })
}

fn join_writer(writer: Option<JoinHandle<Result<(), HomeboundError>>>) -> Result<(), HomeboundError> {
    if let Some(writer) = writer {
        match writer.join() {
            Ok(result) => result?,
            Err(_) => error!("Navigation writer panicked"),
        }
    }
    Ok(())
}

fn log_changes(previous: &RenderState, current: &RenderState) {
    if previous.driver_marker != current.driver_marker
        && let Some(driver) = current.driver_marker
    {
        info!("Driver at {:.6}, {:.6}", driver.latitude, driver.longitude);
    }
    if previous.eta_text != current.eta_text {
        info!("ETA: {}", current.eta_text);
    }
    if previous.directions != current.directions {
        for (idx, instruction) in current.directions.iter().enumerate() {
            info!("{:>3}. {}", idx + 1, instruction);
        }
    }
}

fn headless(
    config: AppConfig,
    replay: &Path,
    output: Option<PathBuf>,
    directions: Option<&Path>,
) -> Result<(), HomeboundError> {
    let Pipeline {
        mut navigator,
        event_receiver,
        mut watcher,
        refresher,
        writer,
    } = start_pipeline(&config, replay, output, directions)?;

    let mut last_render = navigator.render();
    for event in event_receiver.iter() {
        let finished = matches!(event, NavigationEvent::Location(LocationEvent::Finished));
        navigator.handle_event(event);

        let render = navigator.render();
        log_changes(&last_render, &render);
        last_render = render;

        if finished {
            break;
        }
    }

    // let the refresher answer what is still queued before stopping
    watcher.teardown();
    navigator.shutdown();
    if refresher.join().is_err() {
        error!("Route refresher panicked");
    }
    for event in event_receiver.try_iter() {
        navigator.handle_event(event);
    }
    log_changes(&last_render, &navigator.render());

    drop(navigator);
    join_writer(writer)
}

fn live(
    config: AppConfig,
    replay: &Path,
    output: Option<PathBuf>,
    directions: Option<&Path>,
) -> Result<(), HomeboundError> {
    let Pipeline {
        navigator,
        event_receiver,
        watcher,
        refresher: _,
        writer,
    } = start_pipeline(&config, replay, output, directions)?;

    let mut native_options = eframe::NativeOptions::default();
    native_options.viewport = native_options
        .viewport
        .with_title("Homebound")
        .with_inner_size(Vec2::new(420., 760.));

    eframe::run_native(
        "Homebound",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(NavigationApp::new(
                navigator,
                event_receiver,
                watcher,
                config,
                cc,
            )))
        }),
    )
    .expect("could not start app");

    join_writer(writer)
}

fn main() {
    let cli = Args::parse();
    if cfg!(debug_assertions) || cli.verbose || matches!(cli.command, Commands::Headless { .. }) {
        colog::init();
    }

    ctrlc::set_handler(move || {
        println!("Exiting...");
        std::process::exit(0);
    })
    .expect("Could not set Ctrl-C handler");

    let config = AppConfig::from_local_file().unwrap_or_default();
    let result = match &cli.command {
        Commands::Live {
            replay,
            output,
            directions,
        } => live(config, replay, output.clone(), directions.as_deref()),
        Commands::Headless {
            replay,
            output,
            directions,
        } => headless(config, replay, output.clone(), directions.as_deref()),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
