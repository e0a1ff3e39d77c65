use std::process::ExitCode;

use clap::{Parser, Subcommand};
use reqwest_xauth::{
    authenticate, fetch_starred, Config, ConfigError, TerminalPrompt, TokenStore,
};

/// Instapaper xAuth setup and signed API access.
#[derive(Debug, Parser)]
#[command(name = "xauth", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Exchange your Instapaper login for OAuth tokens (one time).
    Auth,
    /// List your most recent starred bookmarks.
    Starred {
        /// How many bookmarks to ask for [default: INSTAPAPER_LIMIT or 5].
        #[arg(long)]
        limit: Option<u32>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) if skips_without_consumer(&cli.command, &err) => {
            log::warn!("skipping starred bookmarks, {}", err);
            return ExitCode::SUCCESS;
        }
        Err(err) => {
            eprintln!("{}", err);
            if let Some(hint) = config_hint(&err) {
                eprintln!("{}", hint);
            }
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Auth => run_auth(&config),
        Command::Starred { limit } => {
            let config = match limit {
                Some(limit) => config.with_bookmark_limit(limit),
                None => config,
            };
            run_starred(&config)
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::FAILURE
        }
    }
}

// starred bookmarks are optional, they wait until the consumer is configured
fn skips_without_consumer(command: &Command, err: &ConfigError) -> bool {
    matches!(
        (command, err),
        (Command::Starred { .. }, ConfigError::MissingEnv(_))
    )
}

fn config_hint(err: &ConfigError) -> Option<String> {
    match err {
        ConfigError::MissingEnv(_) => Some(format!(
            "Set {} and {} first.",
            reqwest_xauth::ENV_CONSUMER_KEY,
            reqwest_xauth::ENV_CONSUMER_SECRET
        )),
        ConfigError::InvalidValue(..) => None,
    }
}

fn run_auth(config: &Config) -> reqwest_xauth::Result<()> {
    println!("Instapaper authentication (xAuth)");
    println!("Your password is sent directly to Instapaper over HTTPS");
    println!("and is NOT stored, only the resulting tokens are saved.\n");

    let http = config.http_client()?;
    let store = TokenStore::from_config(config);
    authenticate(&http, config, &mut TerminalPrompt, &store)?;

    println!("Tokens saved to {}", store.path().display());
    println!("Done");
    Ok(())
}

fn run_starred(config: &Config) -> reqwest_xauth::Result<()> {
    let tokens = match TokenStore::from_config(config).load()? {
        Some(tokens) => tokens,
        None => {
            log::warn!("skipping starred bookmarks, run `xauth auth` first");
            return Ok(());
        }
    };

    let http = config.http_client()?;
    let bookmarks = fetch_starred(&http, config, &tokens)?;
    log::info!("found {} starred bookmark(s)", bookmarks.len());
    for bookmark in bookmarks {
        println!("{} - {}", bookmark.title, bookmark.url);
    }
    Ok(())
}
