//! Relay subcommands and their execution

use anyhow::{bail, Result};
use clap::Subcommand;
use gsmrelay_core::{
    Delivery, DispatchOutcome, Dispatcher, Password, RelayCommand, RelayController,
    SettingsStore, ValidationError,
};
use std::io::{BufRead, Write};

/// Commands sent to the relay unit
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Activate the relay (bare password SMS, or a voice call with --call)
    Activate {
        /// Ring the unit instead of texting it
        #[arg(long)]
        call: bool,
    },
    /// Activate for the preset latch time
    Momentary,
    /// Toggle the relay on/off
    Toggle,
    /// Ask the unit for its status
    Status,
    /// Register the admin phone number
    RegisterAdmin {
        /// Admin phone number
        number: String,
    },
    /// Change the relay password (4 digits)
    ChangePassword {
        /// New password
        new: String,
    },
    /// Store a phone number in a user slot
    AddUser {
        /// Slot, 001 to 200
        serial: String,
        /// Phone number
        phone: String,
    },
    /// Clear a user slot
    DeleteUser {
        /// Slot, 001 to 200
        serial: String,
    },
    /// Clear every user slot
    DeleteAllUsers {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

impl Action {
    /// Relay command for this action, `None` for voice calls
    pub fn command(&self) -> Result<Option<RelayCommand>, ValidationError> {
        let cmd = match self {
            Self::Activate { call: true } => return Ok(None),
            Self::Activate { call: false } => RelayCommand::Activate,
            Self::Momentary => RelayCommand::MomentaryActivate,
            Self::Toggle => RelayCommand::Toggle,
            Self::Status => RelayCommand::CheckStatus,
            Self::RegisterAdmin { number } => RelayCommand::register_admin(number)?,
            Self::ChangePassword { new } => RelayCommand::change_password(new)?,
            Self::AddUser { serial, phone } => RelayCommand::add_user(serial, phone)?,
            Self::DeleteUser { serial } => RelayCommand::delete_user(serial)?,
            Self::DeleteAllUsers { .. } => RelayCommand::DeleteAllUsers,
        };
        Ok(Some(cmd))
    }

    /// Whether the user has to confirm before sending
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, Self::DeleteAllUsers { yes: false })
    }
}

/// Command text for `action` under `password`
pub fn encode(action: &Action, password: &Password) -> Result<String> {
    match action.command()? {
        Some(cmd) => Ok(cmd.encode(password)),
        None => bail!("Voice calls carry no command text"),
    }
}

/// Run `action` through the controller
pub async fn run<S, D>(controller: &mut RelayController<S, D>, action: &Action) -> Result<Delivery>
where
    S: SettingsStore,
    D: Dispatcher,
{
    let delivery = match action {
        Action::Activate { call: true } => controller.activate_by_call().await?,
        Action::Activate { call: false } => controller.activate().await?,
        Action::Momentary => controller.momentary_activate().await?,
        Action::Toggle => controller.toggle().await?,
        Action::Status => controller.check_status().await?,
        Action::RegisterAdmin { number } => controller.register_admin(number).await?,
        Action::ChangePassword { new } => controller.change_password(new).await?,
        Action::AddUser { serial, phone } => controller.add_authorized_user(serial, phone).await?,
        Action::DeleteUser { serial } => controller.delete_authorized_user(serial).await?,
        Action::DeleteAllUsers { .. } => controller.delete_all_users().await?,
    };
    Ok(delivery)
}

/// One-line summary of a delivery
pub fn describe(delivery: &Delivery) -> String {
    let what = match &delivery.body {
        Some(body) => format!("SMS \"{}\"", body),
        None => "Call".to_string(),
    };
    match delivery.outcome {
        DispatchOutcome::UserCancelled => format!("{} to {} cancelled", what, delivery.destination),
        _ => format!("{} to {} handed off", what, delivery.destination),
    }
}

/// Ask a yes/no question on `output`, reading the answer from `input`
pub fn confirm(prompt: &str, input: &mut impl BufRead, output: &mut impl Write) -> Result<bool> {
    write!(output, "{} [y/N] ", prompt)?;
    output.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
