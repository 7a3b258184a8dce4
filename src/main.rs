use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use tgauth::{
    arguments,
    auth::{format_code_hint, LoginState},
    config,
    logger::{self, LogTag},
    proxy::ProxyConfig,
    store::{self, AccountId, CredentialStore},
};

/// Session and login-attempt administration for tgauth
///
/// Logger flags (`--debug-<tag>`, `--verbose`, ...) are accepted anywhere on
/// the command line and handled by the logger.
#[derive(Parser)]
#[command(name = "tgauth")]
#[command(about = "Telegram login orchestrator administration", long_about = None)]
struct Cli {
    /// Config file (defaults to <data dir>/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a relay descriptor `scheme:host:port[:user[:pass]]`
    Proxy { descriptor: String },

    /// Stored sessions
    Session {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// Pending login attempts
    Attempt {
        #[command(subcommand)]
        action: RecordAction,
    },

    /// List accounts with a session or a pending attempt
    Accounts,

    /// Configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum RecordAction {
    Show { account: AccountId },
    Clear { account: AccountId },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Write the effective configuration to disk
    Init,
}

fn main() {
    if let Err(e) = tgauth::paths::ensure_all_directories() {
        eprintln!("❌ Failed to create required directories: {}", e);
        std::process::exit(1);
    }

    logger::init();

    let cli = Cli::parse_from(arguments::args_without_logger_flags());
    let result = run(cli);
    logger::flush();

    if let Err(e) = result {
        logger::error(LogTag::System, &format!("{:#}", e));
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => {
            config::load_config_from_path(path).context("loading configuration")?;
            path.clone()
        }
        None => {
            config::load_config().context("loading configuration")?;
            tgauth::paths::get_config_path()
        }
    };

    match cli.command {
        Command::Proxy { descriptor } => show_proxy(&descriptor),
        Command::Session { action } => session_command(open_store()?.as_ref(), action),
        Command::Attempt { action } => attempt_command(open_store()?.as_ref(), action),
        Command::Accounts => list_accounts(open_store()?.as_ref()),
        Command::Config { action } => config_command(action, &config_path),
    }
}

fn open_store() -> Result<std::sync::Arc<dyn CredentialStore>> {
    let storage = config::with_config(|cfg| cfg.storage.clone());
    store::open_store(&storage).context("opening credential store")
}

// =============================================================================
// COMMANDS
// =============================================================================

fn show_proxy(descriptor: &str) -> Result<()> {
    let proxy = ProxyConfig::parse(descriptor).context("invalid proxy descriptor")?;
    println!("{} {}", "✓".green(), proxy);
    println!("  scheme:   {}", proxy.scheme);
    println!("  address:  {}", proxy.address());
    println!(
        "  auth:     {}",
        if proxy.has_credentials() { "yes" } else { "no" }
    );
    Ok(())
}

fn session_command(store: &dyn CredentialStore, action: RecordAction) -> Result<()> {
    match action {
        RecordAction::Show { account } => match store.get_session(account)? {
            Some(record) => {
                println!("{} {}", "Session for account".bold(), account);
                println!("  token:      {}", tgauth::auth::messages::shorten_secret(&record.token));
                if let Some(user_id) = record.user_id {
                    println!("  user id:    {}", user_id);
                }
                let name = [record.first_name.as_deref(), record.last_name.as_deref()]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" ");
                if !name.is_empty() {
                    println!("  name:       {}", name);
                }
                if let Some(username) = &record.username {
                    println!("  username:   @{}", username);
                }
                println!("  updated at: {}", record.updated_at.to_rfc3339());
            }
            None => println!("{}", format!("No session for account {}", account).yellow()),
        },
        RecordAction::Clear { account } => {
            if store.clear_token(account)? {
                logger::info(LogTag::Session, &format!("Account {}: session cleared by admin", account));
                println!("{} session for account {} cleared", "✓".green(), account);
            } else {
                println!("{}", format!("No session for account {}", account).yellow());
            }
        }
    }
    Ok(())
}

fn attempt_command(store: &dyn CredentialStore, action: RecordAction) -> Result<()> {
    match action {
        RecordAction::Show { account } => {
            let attempt = store.get_login_attempt(account)?;
            let state = LoginState::from_attempt(attempt.as_ref());
            match attempt {
                Some(attempt) => {
                    let (max_inputs, max_resends, code_length) = config::with_config(|cfg| {
                        (
                            cfg.auth.max_code_input_attempts,
                            cfg.auth.max_code_resend_attempts,
                            cfg.auth.code_length,
                        )
                    });
                    println!("{} {} ({:?})", "Login attempt for account".bold(), account, state);
                    println!("  phone:        {}", attempt.phone);
                    println!("  api id:       {}", attempt.api_id);
                    if let Some(proxy) = &attempt.proxy {
                        println!("  proxy:        {}", proxy);
                    }
                    println!("  requested at: {}", attempt.code_requested_at.to_rfc3339());
                    println!("  inputs:       {}/{}", attempt.input_count, max_inputs);
                    println!("  resends:      {}/{}", attempt.resend_count, max_resends);
                    println!("  code format:  {}", format_code_hint(code_length));
                }
                None => println!("{}", format!("No pending attempt for account {}", account).yellow()),
            }
        }
        RecordAction::Clear { account } => {
            if store.clear_login_attempt(account)? {
                logger::info(LogTag::Auth, &format!("Account {}: attempt cleared by admin", account));
                println!("{} attempt for account {} cleared", "✓".green(), account);
            } else {
                println!("{}", format!("No pending attempt for account {}", account).yellow());
            }
        }
    }
    Ok(())
}

fn list_accounts(store: &dyn CredentialStore) -> Result<()> {
    let accounts = store.list_accounts()?;
    if accounts.is_empty() {
        println!("{}", "No accounts".yellow());
        return Ok(());
    }

    for account in accounts {
        let session = if store.get_session(account)?.is_some() {
            "session".green()
        } else {
            "-".dimmed()
        };
        let state = LoginState::from_attempt(store.get_login_attempt(account)?.as_ref());
        println!("{:>14}  {:<8}  {:?}", account, session, state);
    }
    Ok(())
}

fn config_command(action: ConfigAction, path: &std::path::Path) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let rendered = config::render_config(&config::get_config_clone())?;
            println!("{}", rendered);
        }
        ConfigAction::Init => {
            let written = config::save_config(Some(path))?;
            println!("{} configuration written to {}", "✓".green(), written.display());
        }
    }
    Ok(())
}
