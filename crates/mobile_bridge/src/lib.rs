//! Mobile bridge for the GSM relay Flutter app
//!
//! - [`api`] - functions exposed to Dart through flutter_rust_bridge
//! - [`bridge`] - session state and the intent-planning dispatcher

pub mod api;
pub mod bridge;
