use std::{io, process::ExitCode, time::SystemTime};

use thiserror::Error;
use tracing::{error, info};

use oathplate_calc::{
    app::App,
    config::AppConfig,
    infra::{CacheError, JsonFileCache, PriceClient, PriceClientError},
    ui::{dashboard, render_report_string},
    util::{
        logging,
        version::{version_label, APP_BIN, APP_NAME},
    },
};

#[derive(Debug, Error)]
enum AppError {
    #[error("configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Cache(#[from] CacheError),
    #[error(transparent)]
    Fetch(#[from] PriceClientError),
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

enum Command {
    Dashboard,
    Report,
    Fetch,
    Help,
    Version,
}

impl Command {
    fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let command = match args.next().as_deref() {
            None | Some("dashboard") => Self::Dashboard,
            Some("report") => Self::Report,
            Some("fetch") => Self::Fetch,
            Some("help" | "-h" | "--help") => Self::Help,
            Some("version" | "-V" | "--version") => Self::Version,
            Some(other) => return Err(format!("unknown command '{other}'")),
        };
        match args.next() {
            Some(extra) => Err(format!("unexpected argument '{extra}'")),
            None => Ok(command),
        }
    }
}

fn usage() -> String {
    format!(
        "{APP_NAME} {}\n\n\
         Usage: {APP_BIN} [COMMAND]\n\n\
         Commands:\n  \
           (none)     open the dashboard\n  \
           report     print the report for the cached prices\n  \
           fetch      fetch live prices, save them and print the report\n  \
           help       show this message\n  \
           --version  print the version\n\n\
         Environment: OATHPLATE_API_BASE, OATHPLATE_USER_AGENT,\n\
         OATHPLATE_REQUEST_TIMEOUT_SECS, OATHPLATE_CACHE_PATH, OATHPLATE_LOG_DIR, LOG_LEVEL",
        version_label()
    )
}

#[tokio::main]
async fn main() -> ExitCode {
    let command = match Command::from_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(err) => {
            eprintln!("{err}\n\n{}", usage());
            return ExitCode::from(2);
        }
    };

    match command {
        Command::Help => {
            println!("{}", usage());
            return ExitCode::SUCCESS;
        }
        Command::Version => {
            println!("{APP_BIN} {}", version_label());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    match run(command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            eprintln!("{APP_BIN}: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<(), AppError> {
    let config = AppConfig::from_env().map_err(AppError::Config)?;
    let log_path = logging::init(&config.log_dir, &config.log_level)?;
    info!(
        "{APP_NAME} {} starting, logging to {}",
        version_label(),
        log_path.display()
    );

    let client = PriceClient::with_base_url(
        &config.api_base_url,
        &config.user_agent,
        config.request_timeout(),
    )?;
    let mut app = App::bootstrap(JsonFileCache::new(&config.cache_path));

    match command {
        Command::Dashboard => dashboard::run(app, client).await?,
        Command::Report => {
            println!("{}", render_report_string(&app.report(SystemTime::now())));
        }
        Command::Fetch => {
            if let Some(catalog) = app.begin_fetch() {
                let result = client.fetch_snapshot(&catalog).await;
                app.finish_fetch(result)?;
            }
            // A failed save inside finish_fetch is only a warning; fail loudly here.
            app.save_cache()?;
            println!("{}", render_report_string(&app.report(SystemTime::now())));
        }
        Command::Help | Command::Version => {}
    }

    Ok(())
}
