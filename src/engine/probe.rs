//! Platform probing seam

use crate::system::SystemDescriptor;

/// Source of system descriptors
///
/// Platform code (registry queries, sysfs, IOKit, ...) lives behind this
/// trait, outside the blocklist.
#[cfg_attr(test, mockall::automock)]
pub trait SystemProbe: Send + Sync {
    fn probe(&self) -> SystemDescriptor;
}

/// Probe returning a fixed descriptor, e.g. one loaded from JSON
#[derive(Debug, Clone)]
pub struct StaticProbe {
    descriptor: SystemDescriptor,
}

impl StaticProbe {
    pub fn new(descriptor: SystemDescriptor) -> Self {
        Self { descriptor }
    }
}

impl SystemProbe for StaticProbe {
    fn probe(&self) -> SystemDescriptor {
        self.descriptor.clone()
    }
}
