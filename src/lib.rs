//! Workspace placeholder crate.
//!
//! This crate exists to expose shared feature flags that map to the individual
//! workspace crates (e.g., `core-navigation`, `core-runtime`). Host
//! applications can depend on `screenflow-workspace` and enable the documented
//! features without needing to wire each crate individually.

#[cfg(feature = "headless-shims")]
pub use core_navigation;
#[cfg(feature = "headless-shims")]
pub use core_runtime;
