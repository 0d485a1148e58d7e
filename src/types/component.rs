use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Set of source directory roots feeding one component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSet {
    pub roots: Vec<PathBuf>,
}

impl SourceSet {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    pub fn empty() -> Self {
        Self { roots: Vec::new() }
    }
}

/// A declared buildable software piece, the root input to model realization.
///
/// Components carry declaration only: sources and intended target platforms.
/// Everything concrete (binaries, output layout, tasks) is derived from them
/// by rules. An empty `target_platforms` means "use the registry default".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub name: String,
    pub source: SourceSet,
    /// Declared platform names, matched against the platform registry during
    /// binary derivation. Unresolved names fail the whole realization.
    pub target_platforms: Vec<String>,
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: SourceSet::empty(),
            target_platforms: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: SourceSet) -> Self {
        self.source = source;
        self
    }

    pub fn with_target_platforms<I, S>(mut self, platforms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_platforms = platforms.into_iter().map(Into::into).collect();
        self
    }
}
