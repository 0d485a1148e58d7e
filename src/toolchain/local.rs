use crate::platform::JavaPlatform;
use crate::toolchain::{ToolChain, ToolChainSelection};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Toolchain backed by a JDK installed on the local machine.
///
/// The compiler executable is probed once at construction; per-platform
/// availability compares the platform's language level against the highest
/// level this installation can target.
#[derive(Debug, Clone)]
pub struct LocalJdkToolChain {
    compiler_executable: Option<PathBuf>,
    max_language_level: u32,
}

impl LocalJdkToolChain {
    /// Probes `javac` on PATH.
    pub fn probe(max_language_level: u32) -> Self {
        let compiler_executable = match which::which("javac") {
            Ok(path) => {
                debug!("Located javac at {}", path.display());
                Some(path)
            }
            Err(_) => {
                warn!("javac not found on PATH, local toolchain will report unavailable");
                None
            }
        };

        Self {
            compiler_executable,
            max_language_level,
        }
    }

    /// Toolchain bound to a known compiler executable. Used when the
    /// installation location comes from configuration rather than PATH.
    pub fn with_executable(compiler_executable: impl Into<PathBuf>, max_language_level: u32) -> Self {
        Self {
            compiler_executable: Some(compiler_executable.into()),
            max_language_level,
        }
    }
}

impl ToolChain for LocalJdkToolChain {
    fn display_name(&self) -> String {
        format!("JDK (Java{})", self.max_language_level)
    }

    fn select_for(&self, platform: &JavaPlatform) -> ToolChainSelection {
        let Some(executable) = &self.compiler_executable else {
            return ToolChainSelection::unavailable("no compiler executable found on PATH");
        };

        if platform.ordinal() > self.max_language_level {
            return ToolChainSelection::unavailable(format!(
                "{} requires language level {}, toolchain provides up to {}",
                platform,
                platform.ordinal(),
                self.max_language_level
            ));
        }

        ToolChainSelection::available(executable.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_reports_unavailable_above_supported_level() {
        let chain = LocalJdkToolChain::with_executable("/opt/jdk/bin/javac", 7);

        assert!(chain.select_for(&JavaPlatform::java(6)).is_available());
        let selection = chain.select_for(&JavaPlatform::java(8));
        assert!(!selection.is_available());
        assert!(selection.unavailability_reason().unwrap().contains("level 8"));
    }

    #[test]
    fn available_selection_carries_the_executable() {
        let chain = LocalJdkToolChain::with_executable("/opt/jdk/bin/javac", 8);
        let selection = chain.select_for(&JavaPlatform::java(8));
        assert_eq!(
            selection.compiler_executable(),
            Some(&PathBuf::from("/opt/jdk/bin/javac"))
        );
    }
}
