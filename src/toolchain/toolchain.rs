use crate::platform::JavaPlatform;
use std::path::PathBuf;

/// Result of asking a toolchain whether it can build for a platform.
///
/// Unavailability is not an error: it flows into the binary's `buildable`
/// flag and the build carries on.
#[derive(Debug, Clone)]
pub struct ToolChainSelection {
    available: bool,
    reason: Option<String>,
    compiler_executable: Option<PathBuf>,
}

impl ToolChainSelection {
    pub fn available(compiler_executable: impl Into<PathBuf>) -> Self {
        Self {
            available: true,
            reason: None,
            compiler_executable: Some(compiler_executable.into()),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            available: false,
            reason: Some(reason.into()),
            compiler_executable: None,
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn unavailability_reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    /// Concrete compiler handle; present exactly when the selection is
    /// available.
    pub fn compiler_executable(&self) -> Option<&PathBuf> {
        self.compiler_executable.as_ref()
    }
}

/// Capability provider that can produce binaries for some platforms.
///
/// Stateless beyond configuration. `select_for` is total: it reports
/// availability rather than failing.
pub trait ToolChain: Send + Sync {
    fn display_name(&self) -> String;

    fn select_for(&self, platform: &JavaPlatform) -> ToolChainSelection;
}
