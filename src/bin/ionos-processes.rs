use clap::{Parser, Subcommand};
use ionos_processes::configuration::config_file::Configuration;
use ionos_processes::events::{Event, RemoteWipeStarted, ShareCreatedEvent};
use ionos_processes::host::{FixedL10n, MemoryUserManager, RouteUrlGenerator, ShareRecord, ShareType, User};
use ionos_processes::{Application, Error, HostServices};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tracing::{Level, error, info};

const LOG_TARGET: &str = "ionos_processes_cli";
const SECONDS_PER_DAY: u64 = 24 * 60 * 60;

#[derive(Parser, Debug)]
#[clap(name = "ionos-processes", author, version, about = "Feed share events to the IONOS mail relay", long_about = None)]
struct CliArgs {
    /// Path to ionos-processes configuration file
    #[clap(short, long, value_parser)]
    configuration: Option<PathBuf>,
    /// Set the logging level [default: info]
    #[clap(short, long, value_parser)]
    log_level: Option<Level>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Dispatch a share created event
    Share {
        /// User id of the sharer
        #[clap(long)]
        shared_by: String,
        /// Recipient of the share
        #[clap(long)]
        shared_with: String,
        /// Share token
        #[clap(long)]
        token: String,
        /// Name of the shared file
        #[clap(long)]
        file_name: String,
        /// Note for the recipient
        #[clap(long)]
        note: Option<String>,
        /// Days until the share expires
        #[clap(long)]
        expires_in_days: Option<u64>,
        /// Numeric share type [default: 4 (email)]
        #[clap(long, default_value_t = 4)]
        share_type: u8,
    },
    /// Dispatch a remote wipe started event
    RemoteWipe {
        /// Token of the device being wiped
        #[clap(long)]
        token: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = CliArgs::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level.unwrap_or(Level::INFO)).with_target(true).init();

    if let Err(error) = run(cli).await {
        error!(target: LOG_TARGET, "{}", error)
    }
}

async fn run(args: CliArgs) -> Result<(), Error> {
    let config_path = match args.configuration {
        Some(path) => path,
        None => directories::ProjectDirs::from("com", "ionos", "ionos-processes")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or_else(|| Error::NotFound("no home directory for default configuration".to_string()))?,
    };

    info!(target: LOG_TARGET, "Reading configuration from: {}", config_path.display());
    let (app_config, host) = Configuration::try_from(std::fs::read_to_string(config_path)?.as_str())?.into_parts();

    let mut url_generator = RouteUrlGenerator::new(host.base_url().clone());
    for (route, template) in host.routes() {
        url_generator = url_generator.with_route(route.as_str(), template.as_str());
    }

    let users = MemoryUserManager::new();
    let event: Event = match args.command {
        Command::Share { shared_by, shared_with, token, file_name, note, expires_in_days, share_type } => {
            users.insert(User::new(shared_by.as_str()));
            let mut share = ShareRecord::new(ShareType::try_from(share_type)?, shared_by, shared_with, token)
                .with_node_name(file_name);
            if let Some(note) = note {
                share = share.with_note(note);
            }
            if let Some(days) = expires_in_days {
                share = share.with_expiration_date(expires_after(SystemTime::now(), days)?);
            }
            ShareCreatedEvent::new(Arc::new(share)).into()
        }
        Command::RemoteWipe { token } => RemoteWipeStarted::new(token).into(),
    };

    let app = Application::new(HostServices {
        app_config: Arc::new(app_config),
        user_manager: Arc::new(users),
        l10n: Arc::new(FixedL10n::new(host.language())),
        url_generator: Arc::new(url_generator),
    });

    app.boot().dispatch(&event).await?;
    info!(target: LOG_TARGET, "Event {:?} dispatched", event.kind());
    Ok(())
}

fn expires_after(now: SystemTime, days: u64) -> Result<SystemTime, Error> {
    days.checked_mul(SECONDS_PER_DAY)
        .and_then(|seconds| now.checked_add(Duration::from_secs(seconds)))
        .ok_or_else(|| Error::InvalidArgument(format!("expiration in {} days is out of range", days)))
}
