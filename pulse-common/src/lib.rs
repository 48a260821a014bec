//! Pulse Common - Shared types, utilities, and configuration for NewsPulse.
//!
//! This crate provides:
//! - Configuration types and loading
//! - Error types and handling utilities
//! - Logging setup

#![warn(clippy::all)]
#![allow(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, NewsConfig, ObservabilityConfig};
pub use error::{Error, Result};
