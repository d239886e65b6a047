//! Relay SMS protocol

pub mod encoder;

pub use encoder::CommandEncoder;
