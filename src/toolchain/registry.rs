use crate::platform::JavaPlatform;
use crate::toolchain::ToolChain;
use std::collections::HashMap;
use std::sync::Arc;

/// Maps platforms to the toolchain responsible for them.
///
/// `get_for_platform` is total by contract: every platform resolves to a
/// toolchain, which may itself report unavailable for that platform.
/// Resolution never fails; availability is a buildability concern.
#[derive(Clone)]
pub struct ToolChainRegistry {
    default_chain: Arc<dyn ToolChain>,
    overrides: HashMap<String, Arc<dyn ToolChain>>,
}

impl ToolChainRegistry {
    pub fn new(default_chain: Arc<dyn ToolChain>) -> Self {
        Self {
            default_chain,
            overrides: HashMap::new(),
        }
    }

    /// Routes one platform name to a specific toolchain instead of the
    /// default chain.
    pub fn register_for(&mut self, platform_name: impl Into<String>, chain: Arc<dyn ToolChain>) {
        self.overrides.insert(platform_name.into(), chain);
    }

    pub fn get_for_platform(&self, platform: &JavaPlatform) -> Arc<dyn ToolChain> {
        self.overrides
            .get(platform.name())
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.default_chain))
    }
}

impl std::fmt::Debug for ToolChainRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolChainRegistry")
            .field("default_chain", &self.default_chain.display_name())
            .field("overrides", &self.overrides.keys().collect::<Vec<_>>())
            .finish()
    }
}
