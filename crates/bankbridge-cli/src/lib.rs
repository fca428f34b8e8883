//! Bankbridge CLI - command-line interface and server binary for Bankbridge
//!
//! This crate provides the application that ties together all Bankbridge components.

pub mod config;
pub mod wiring;

pub use config::{Command, Config};
