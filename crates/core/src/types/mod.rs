//! Domain types for relay control

mod command;
mod password;
mod serial;
mod settings;

pub use command::RelayCommand;
pub use password::{Password, DEFAULT_PASSWORD, PASSWORD_LEN};
pub use serial::{SerialNumber, MAX_SLOT, MIN_SLOT};
pub use settings::RelaySettings;
