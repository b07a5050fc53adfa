use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config::{Config, Environment, File};

use event_discovery::domain::event::Event;
use event_discovery::domain::location::Location;
use event_discovery::domain::types::{EventId, Username};
use event_discovery::dto::events::{EventDto, SaveEventState, ViewUpdate};
use event_discovery::models::config::AppConfig;
use event_discovery::repository::{
    CsvFileRepository, EventCatalogReader, InMemoryEventCatalog,
};
use event_discovery::services::{FixedUser, SaveEventService};

#[derive(Parser)]
#[command(name = "event-discovery")]
#[command(about = "Browse local events and manage your saved favorites")]
struct Cli {
    /// Extra YAML configuration file, layered over config/default.yaml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Act as this user instead of the configured one
    #[arg(short, long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List catalog events
    Catalog {
        /// Show the distance from this point (LAT,LON)
        #[arg(long, value_parser = parse_point, allow_hyphen_values = true)]
        near: Option<Location>,
    },
    /// Save a catalog event to your favorites
    Save { event_id: String },
    /// Remove an event from your favorites
    Unsave { event_id: String },
    /// List your saved events
    List,
    /// Tell whether an event is saved
    Status { event_id: String },
}

fn parse_point(value: &str) -> Result<Location, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got {value:?}"))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude {lat:?}"))?;
    let lon: f64 = lon.trim().parse().map_err(|_| format!("invalid longitude {lon:?}"))?;
    Location::from_coordinates(lat, lon).map_err(|e| e.to_string())
}

fn load_config(extra: Option<&PathBuf>) -> Result<AppConfig, config::ConfigError> {
    let mut builder =
        Config::builder().add_source(File::with_name("config/default").required(false));
    if let Some(path) = extra {
        builder = builder.add_source(File::from(path.as_path()));
    }
    builder
        .add_source(Environment::with_prefix("EVENTS"))
        .build()?
        .try_deserialize()
}

fn resolve_user(cli_user: Option<String>, configured: Option<String>) -> FixedUser {
    match cli_user.or(configured).map(Username::new) {
        Some(Ok(username)) => FixedUser::new(username),
        Some(Err(e)) => {
            log::warn!("Ignoring configured user: {e}");
            FixedUser::anonymous()
        }
        None => FixedUser::anonymous(),
    }
}

fn print_event(dto: &EventDto) {
    println!(
        "{:<8} {:<32} {:<16} {}  @ {}",
        dto.id, dto.name, dto.category, dto.start_time, dto.address
    );
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let cli = Cli::parse();

    let app_config = match load_config(cli.config.as_ref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };

    let catalog = match InMemoryEventCatalog::with_demo_events() {
        Ok(catalog) => catalog,
        Err(e) => {
            log::error!("Failed to build event catalog: {e}");
            return ExitCode::FAILURE;
        }
    };
    let repo = CsvFileRepository::open(&app_config.saved_events_path);
    let service = SaveEventService::new(
        &repo,
        resolve_user(cli.user, app_config.current_user.clone()),
    );

    let outcome = match cli.command {
        Commands::Catalog { near } => list_catalog(&catalog, near.as_ref()),
        Commands::Save { event_id } => {
            let event = find_in_catalog(&catalog, &event_id);
            let mut state = SaveEventState::default();
            match state.apply_save(service.execute(event)) {
                ViewUpdate::EventSaved(dto) => {
                    println!("Saved:");
                    print_event(&dto);
                    Ok(())
                }
                ViewUpdate::Error(message) => Err(message),
            }
        }
        Commands::Unsave { event_id } => service
            .unsave_event_by_id(&event_id)
            .map(|removed| match removed {
                Some(event) => println!("Removed {}", event.name),
                None => println!("{event_id} is not in your saved events"),
            })
            .map_err(|e| e.to_string()),
        Commands::List => service
            .get_saved_events()
            .map(|events| {
                let mut state = SaveEventState::default();
                state.replace_saved(events);
                if state.saved_events.is_empty() {
                    println!("No saved events.");
                }
                state.saved_events.iter().for_each(print_event);
            })
            .map_err(|e| e.to_string()),
        Commands::Status { event_id } => service
            .is_event_saved(Some(&event_id))
            .map(|saved| println!("{event_id}: {}", if saved { "saved" } else { "not saved" }))
            .map_err(|e| e.to_string()),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn find_in_catalog(catalog: &InMemoryEventCatalog, event_id: &str) -> Option<Event> {
    let id = EventId::new(event_id).ok()?;
    catalog.get_event(&id).unwrap_or_else(|e| {
        log::error!("Failed to look up event {id}: {e}");
        None
    })
}

fn list_catalog(catalog: &InMemoryEventCatalog, near: Option<&Location>) -> Result<(), String> {
    let events = catalog.list_events().map_err(|e| e.to_string())?;
    for event in events {
        let distance = near.map(|point| event.location.calculate_distance(Some(point)));
        let dto = EventDto::from(event);
        print_event(&dto);
        if let Some(km) = distance {
            println!("{:<8} {km:.1} km away", "");
        }
    }
    Ok(())
}
