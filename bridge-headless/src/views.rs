//! No-op view services.

use std::sync::Mutex;

use async_trait::async_trait;

use bridge_traits::presentation::{IconDescriptor, SurfaceHandle};
use bridge_traits::views::IconHandle;
use bridge_traits::{ChildAttachment, IconResolver, Result};

/// Child attachment that accepts everything and does nothing.
#[derive(Debug, Default, Clone)]
pub struct NoopChildAttachment;

impl ChildAttachment for NoopChildAttachment {
    fn attach_children(&self, _surface: SurfaceHandle, _children: &[SurfaceHandle]) -> Result<()> {
        Ok(())
    }
}

/// Icon resolver that mints a handle per request and remembers what it was
/// asked for.
#[derive(Default)]
pub struct StaticIconResolver {
    resolved: Mutex<Vec<IconDescriptor>>,
}

impl StaticIconResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Descriptors resolved so far (test support).
    pub fn resolved(&self) -> Vec<IconDescriptor> {
        self.resolved.lock().unwrap().clone()
    }
}

#[async_trait]
impl IconResolver for StaticIconResolver {
    async fn resolve_icon(&self, descriptor: &IconDescriptor) -> Result<IconHandle> {
        self.resolved.lock().unwrap().push(descriptor.clone());
        Ok(IconHandle::new())
    }
}
