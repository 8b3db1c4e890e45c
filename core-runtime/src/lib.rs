//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the navigation core:
//! - Logging and tracing infrastructure
//! - Configuration management
//! - Event bus system
//!
//! ## Overview
//!
//! This crate contains the runtime utilities the navigation crates depend on.
//! It establishes the logging conventions, the dependency-injection surface
//! for host bridges, and the event broadcasting mechanism through which every
//! navigation outcome is observable.

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
