//! GSM Relay Core - Shared logic for SMS relay control
//!
//! This crate provides:
//! - Domain types (password, user slots, settings, commands)
//! - Command encoding for the relay's SMS text protocol
//! - Settings persistence behind a key/value store trait
//! - Dispatch abstraction over the platform SMS / call facilities
//! - Error types

// Version constants
pub const APP_VERSION_STRING: &str = "0.1.0";

pub mod controller;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod settings;
pub mod types;

// Re-export common types
pub use controller::{Delivery, RelayController};
pub use dispatch::{DispatchOutcome, Dispatcher, IntentPlan, MockDispatcher, Platform};
pub use error::{Capability, CoreError, Result, ValidationError};
pub use protocol::CommandEncoder;
pub use settings::{FileStore, MemoryStore, SettingsProvider, SettingsStore};
pub use types::{Password, RelayCommand, RelaySettings, SerialNumber};
