use crate::platform::JavaPlatform;
use crate::types::component::SourceSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A concrete, platform- and toolchain-bound jar artifact derived from a
/// [`Component`](crate::types::Component).
///
/// Binaries are created exactly once per (component, selected platform) pair
/// during model realization, mutated in place by initializer actions and task
/// wiring, and live for the remainder of the configuration pass. An
/// unbuildable binary stays fully modeled; only execution-time scheduling
/// treats the flag specially.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JarBinary {
    /// Derived name, e.g. `libJar` or `libJarJava6`.
    pub name: String,
    /// Base artifact name, set from the owning component's name.
    pub base_name: String,
    /// Name of the owning component (back-reference, not ownership).
    pub component: String,
    pub platform: JavaPlatform,
    /// Display name of the bound toolchain.
    pub tool_chain: String,
    pub source: SourceSet,
    pub buildable: bool,
    pub classes_dir: PathBuf,
    pub resources_dir: PathBuf,
    pub jar_file: PathBuf,
    /// Name of the task currently registered as this binary's producer.
    pub built_by: Option<String>,
}

impl JarBinary {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_name: String::new(),
            component: String::new(),
            platform: JavaPlatform::default(),
            tool_chain: String::new(),
            source: SourceSet::empty(),
            buildable: false,
            classes_dir: PathBuf::new(),
            resources_dir: PathBuf::new(),
            jar_file: PathBuf::new(),
            built_by: None,
        }
    }
}
