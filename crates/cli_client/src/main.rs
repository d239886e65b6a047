//! Command-line client for SMS-controlled GSM relay units
//!
//! Shares settings storage and command encoding with the mobile app, and
//! hands commands to the desktop's `sms:` / `tel:` handlers.

mod actions;
mod desktop;

use actions::Action;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gsmrelay_core::dispatch::IntentDispatcher;
use gsmrelay_core::settings::{KEY_ADMIN_NUMBER, KEY_PASSWORD, KEY_UNIT_NAME, KEY_UNIT_NUMBER};
use gsmrelay_core::{
    Dispatcher, FileStore, MemoryStore, Password, Platform, RelayController, SettingsStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::desktop::{PrintLauncher, SystemLauncher, TerminalClipboard};

/// GSM relay remote - control relay units by SMS
#[derive(Parser, Debug)]
#[command(name = "gsmrelay")]
#[command(author = "GSM Relay Team")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Send commands to an SMS-controlled GSM relay", long_about = None)]
struct Args {
    /// Settings file (defaults to the local data directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    /// Platform behavior for SMS links (android, ios, other)
    #[arg(long, global = true, default_value_t = Platform::current())]
    platform: Platform,

    /// Print the URLs instead of opening them; nothing is saved
    #[arg(long, global = true, default_value = "false")]
    dry_run: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show or edit stored settings
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Print the SMS text for a command without sending it
    Encode {
        /// Password to encode with (defaults to the stored one)
        #[arg(long)]
        password: Option<String>,

        #[command(subcommand)]
        action: Action,
    },

    #[command(flatten)]
    Relay(Action),
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Print the stored settings
    Show {
        /// Print the password instead of ****
        #[arg(long)]
        reveal: bool,
    },
    /// Update unit settings; omitted fields keep their value
    Set {
        /// Phone number of the relay SIM
        #[arg(long)]
        unit_number: Option<String>,
        /// Display name
        #[arg(long)]
        unit_name: Option<String>,
        /// Relay password (4 digits)
        #[arg(long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(&args.log_level)?;

    let store = match &args.store {
        Some(path) => FileStore::at_path(path),
        None => FileStore::new()?,
    };
    info!("Settings file: {}", store.path().display());

    let dispatcher: Arc<dyn Dispatcher> = if args.dry_run {
        Arc::new(IntentDispatcher::new(
            args.platform,
            PrintLauncher::default(),
            TerminalClipboard,
        ))
    } else {
        Arc::new(IntentDispatcher::new(
            args.platform,
            SystemLauncher,
            TerminalClipboard,
        ))
    };

    if args.dry_run {
        let snapshot = snapshot(&store).await?;
        execute(args.command, RelayController::new(snapshot, dispatcher).await?).await
    } else {
        execute(args.command, RelayController::new(store, dispatcher).await?).await
    }
}

async fn execute<S, D>(command: Command, mut controller: RelayController<S, D>) -> Result<()>
where
    S: SettingsStore,
    D: Dispatcher,
{
    match command {
        Command::Config(ConfigCommand::Show { reveal }) => {
            let settings = controller.settings();
            let password = if settings.password_invalid {
                "invalid, set a new one with `config set --password`".to_string()
            } else if reveal {
                settings.password.to_string()
            } else {
                "****".to_string()
            };
            println!("Unit number:  {}", settings.unit_number);
            println!("Unit name:    {}", settings.unit_name);
            println!("Password:     {}", password);
            println!("Admin number: {}", settings.admin_number);
        }
        Command::Config(ConfigCommand::Set {
            unit_number,
            unit_name,
            password,
        }) => {
            let mut settings = controller.settings().clone();
            if let Some(number) = unit_number {
                settings.unit_number = number;
            }
            if let Some(name) = unit_name {
                settings.unit_name = name;
            }
            if let Some(password) = password {
                settings = settings.with_password(Password::new(password)?);
            }
            controller.update_settings(settings).await?;
            println!("Settings saved for {}", controller.settings().display_name());
        }
        Command::Encode { password, action } => {
            let password = match password {
                Some(text) => Password::new(text)?,
                None => controller.settings().checked_password()?.clone(),
            };
            println!("{}", actions::encode(&action, &password)?);
        }
        Command::Relay(action) => {
            if action.needs_confirmation() {
                let stdin = std::io::stdin();
                let confirmed = actions::confirm(
                    "Delete ALL authorized users from the relay?",
                    &mut stdin.lock(),
                    &mut std::io::stdout(),
                )?;
                if !confirmed {
                    bail!("Aborted");
                }
            }
            let delivery = actions::run(&mut controller, &action).await?;
            println!("{}", actions::describe(&delivery));
        }
    }
    Ok(())
}

/// Copy stored settings into memory so a dry run never writes them back
async fn snapshot(store: &FileStore) -> Result<MemoryStore> {
    let mut entries = Vec::new();
    for key in [KEY_UNIT_NUMBER, KEY_UNIT_NAME, KEY_PASSWORD, KEY_ADMIN_NUMBER] {
        if let Some(value) = store
            .get(key)
            .await
            .with_context(|| format!("Failed to read {}", store.path().display()))?
        {
            entries.push((key, value));
        }
    }
    Ok(MemoryStore::with_entries(
        entries.iter().map(|(k, v)| (*k, v.as_str())),
    ))
}

fn setup_logging(level: &str) -> Result<()> {
    let log_level = level.parse::<Level>().unwrap_or(Level::INFO);

    let filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gsmrelay_core::MockDispatcher;

    #[test]
    fn test_parse_relay_action() {
        let args = Args::try_parse_from(["gsmrelay", "add-user", "001", "0469843459"]).unwrap();
        match args.command {
            Command::Relay(Action::AddUser { serial, phone }) => {
                assert_eq!(serial, "001");
                assert_eq!(phone, "0469843459");
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(!args.dry_run);
    }

    #[test]
    fn test_parse_global_flags() {
        let args = Args::try_parse_from([
            "gsmrelay",
            "activate",
            "--call",
            "--platform",
            "ios",
            "--dry-run",
        ])
        .unwrap();
        assert_eq!(args.platform, Platform::Ios);
        assert!(args.dry_run);
        assert!(matches!(args.command, Command::Relay(Action::Activate { call: true })));
    }

    #[test]
    fn test_parse_encode() {
        let args =
            Args::try_parse_from(["gsmrelay", "encode", "--password", "5678", "toggle"]).unwrap();
        match args.command {
            Command::Encode { password, action } => {
                assert_eq!(password.as_deref(), Some("5678"));
                assert_eq!(action, Action::Toggle);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_snapshot_keeps_file_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::in_dir(dir.path());
        store.set(KEY_UNIT_NUMBER, "+15550001111").await.unwrap();

        let memory = snapshot(&store).await.unwrap();
        let mut controller = RelayController::new(memory, MockDispatcher::new())
            .await
            .unwrap();
        controller.change_password("5678").await.unwrap();

        assert_eq!(controller.settings().password.as_str(), "5678");
        assert_eq!(store.get(KEY_PASSWORD).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_config_set_persists() {
        let dir = tempfile::tempdir().unwrap();
        let controller = RelayController::new(FileStore::in_dir(dir.path()), MockDispatcher::new())
            .await
            .unwrap();
        execute(
            Command::Config(ConfigCommand::Set {
                unit_number: Some("+15550001111".into()),
                unit_name: Some("Gate".into()),
                password: Some("4321".into()),
            }),
            controller,
        )
        .await
        .unwrap();

        let store = FileStore::in_dir(dir.path());
        assert_eq!(store.get(KEY_UNIT_NAME).await.unwrap().as_deref(), Some("Gate"));
        assert_eq!(store.get(KEY_PASSWORD).await.unwrap().as_deref(), Some("4321"));
    }

    #[tokio::test]
    async fn test_config_set_repairs_corrupt_password() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"unitNumber": "+15550001111", "password": "12345"}"#).unwrap();

        let controller = RelayController::new(FileStore::at_path(&path), MockDispatcher::new())
            .await
            .unwrap();
        assert!(controller.settings().password_invalid);
        let err = execute(Command::Relay(Action::Toggle), controller)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Password must be 4 digits"));

        let controller = RelayController::new(FileStore::at_path(&path), MockDispatcher::new())
            .await
            .unwrap();
        execute(
            Command::Config(ConfigCommand::Set {
                unit_number: None,
                unit_name: None,
                password: Some("1234".into()),
            }),
            controller,
        )
        .await
        .unwrap();

        let mock = MockDispatcher::new();
        let controller = RelayController::new(FileStore::at_path(&path), mock.clone())
            .await
            .unwrap();
        assert!(!controller.settings().password_invalid);
        execute(Command::Relay(Action::Toggle), controller).await.unwrap();
        assert_eq!(mock.last_body().await.as_deref(), Some("1234DD"));
    }

    #[tokio::test]
    async fn test_relay_without_unit_number_fails() {
        let controller = RelayController::new(MemoryStore::new(), MockDispatcher::new())
            .await
            .unwrap();
        let err = execute(Command::Relay(Action::Toggle), controller)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("unit number"));
    }
}
