//! Screen registry and navigation resolution core.
//!
//! Platform-independent navigation engine: screens register themselves with
//! a name and an intrinsic presentation style, and from then on navigation
//! is resolved by identity rather than by call site. Asking to "push" a
//! screen that declared itself a tab switches tabs; asking to "present" a
//! screen that declared itself a drawer slides the drawer in. Call sites
//! stay generic, the screen's own declaration decides.
//!
//! ```text
//! ┌─────────────┐  props/commands  ┌──────────────────────┐
//! │ application │ ───────────────> │ NavigationCoordinator │
//! │    code     │ <─────────────── │  ┌─ ScreenRegistry    │
//! └─────────────┘  lifecycle evts  │  ├─ resolver          │
//!                                  │  ├─ executors (8)     │
//! ┌─────────────┐   trait seams    │  ├─ LifecycleEmitter  │
//! │ native host │ <──────────────> │  └─ Bootstrapper      │
//! └─────────────┘                  └──────────────────────┘
//! ```
//!
//! The native side is reached exclusively through the `bridge-traits` seams,
//! so the whole engine runs unchanged against the in-memory host from
//! `bridge-headless` in tests.

pub mod bootstrap;
pub mod command;
pub mod container;
pub mod context_key;
pub mod coordinator;
pub mod error;
pub mod executors;
pub mod lifecycle;
pub mod props;
pub mod registry;
pub mod resolver;

pub use bootstrap::Bootstrapper;
pub use command::{CommandKind, NavigationCommand};
pub use container::{ConfigAspect, ContainerId, ScreenContainer};
pub use coordinator::{NavigationCoordinator, ScreenSnapshot};
pub use error::{NavigationError, Result};
pub use lifecycle::LifecycleEmitter;
pub use props::{ScreenProps, TabConfig};
pub use registry::ScreenRegistry;
pub use resolver::{canonical_method, resolve, NavigationMethod};

// The style vocabulary is shared with the host seam; re-exported so callers
// rarely need bridge-traits directly.
pub use bridge_traits::presentation::PresentationStyle;
