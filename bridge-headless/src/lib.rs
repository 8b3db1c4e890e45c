//! # Headless Bridge Implementations
//!
//! In-memory implementations of every bridge trait, with no native UI behind
//! them.
//!
//! ## Overview
//!
//! This crate provides a complete simulated host:
//! - `PresentationHost` backed by an in-memory controller tree that models
//!   tab roots, navigation stacks, presented-controller chains, overlays,
//!   drawers and split containers
//! - `EventDelivery` that records every delivered event for inspection
//! - `ChildAttachment` as a no-op
//! - `IconResolver` that mints handles and records the descriptors it saw
//!
//! It exists for two consumers: desktop shims during host bring-up, and the
//! navigation core's integration tests, which drive the real coordinator
//! against this host and assert on the resulting hierarchy and event stream.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_headless::{HeadlessHost, RecordingEventDelivery};
//! use std::sync::Arc;
//!
//! let host = Arc::new(HeadlessHost::new());
//! let delivery = Arc::new(RecordingEventDelivery::new());
//! // hand both to CoreConfig and drive the coordinator
//! ```

mod events;
mod presentation;
mod views;

pub use events::{RecordedEvent, RecordingEventDelivery};
pub use presentation::HeadlessHost;
pub use views::{NoopChildAttachment, StaticIconResolver};
