pub mod dates;
pub mod day;
pub mod output;
pub mod timer;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use day::{DayCommand, SummaryCommand, process_day_command, process_summary_command};
use timer::{LogCommand, StopCommand, process_log_command, process_stop_command};
use tracing::{debug, level_filters::LevelFilter};

use crate::{
    storage::session_storage::SessionStorageImpl,
    utils::{
        clock::DefaultClock,
        dir::{create_application_default_path, ensure_dir},
        logging::{CLI_PREFIX, enable_logging},
    },
};

#[derive(Parser, Debug)]
#[command(name = "Dayview", version, long_about = None)]
#[command(about = "Lays out tracked sessions of a day on a calendar-like canvas", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Enable logging to console")]
    log: bool,
    #[arg(
        long,
        help = "Application directory. By default tries to save into $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Display sessions of a day with their position on the day canvas")]
    Day {
        #[command(flatten)]
        command: DayCommand,
    },
    #[command(about = "Display how much time was tracked during a day")]
    Summary {
        #[command(flatten)]
        command: SummaryCommand,
    },
    #[command(about = "Record a session. Without an end the session keeps running")]
    Log {
        #[command(flatten)]
        command: LogCommand,
    },
    #[command(about = "Stop the running session")]
    Stop {
        #[command(flatten)]
        command: StopCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let app_dir = args
        .dir
        .map_or_else(create_application_default_path, ensure_dir)?;

    let logging_level = if args.log {
        Some(LevelFilter::TRACE)
    } else {
        None
    };
    enable_logging(CLI_PREFIX, &app_dir.join("logs"), logging_level, args.log)?;
    debug!("Using application directory {app_dir:?}");

    let storage = SessionStorageImpl::new(app_dir.join("sessions"))?;
    let clock = DefaultClock;

    match args.commands {
        Commands::Day { command } => process_day_command(command, &storage, &clock).await,
        Commands::Summary { command } => process_summary_command(command, &storage, &clock).await,
        Commands::Log { command } => {
            let session = process_log_command(command, &storage, &clock).await?;
            println!("{}", session.id);
            Ok(())
        }
        Commands::Stop { command } => {
            let session = process_stop_command(command, &storage, &clock).await?;
            println!("{}", session.id);
            Ok(())
        }
    }
}
