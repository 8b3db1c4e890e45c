//! View Service Abstractions
//!
//! Opaque collaborators around the navigation core: child view attachment and
//! icon resolution. Both are consumed as services; the core never inspects
//! what a surface or icon actually is.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::presentation::{IconDescriptor, SurfaceHandle};
use crate::{error::Result, platform::PlatformSendSync};

/// Handle to a host-side renderable image produced by icon resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IconHandle(Uuid);

impl IconHandle {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for IconHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Attach child surfaces to a screen's content surface.
///
/// The layout of attached children is entirely the host's concern.
pub trait ChildAttachment: PlatformSendSync {
    fn attach_children(&self, surface: SurfaceHandle, children: &[SurfaceHandle]) -> Result<()>;
}

/// Resolve icon descriptors into host renderables.
///
/// Resolution may hit an asset catalog, the network, or a cache; it is async
/// and may fail. Failures degrade to an icon-less tab/header item.
#[async_trait]
pub trait IconResolver: PlatformSendSync {
    async fn resolve_icon(&self, descriptor: &IconDescriptor) -> Result<IconHandle>;
}
