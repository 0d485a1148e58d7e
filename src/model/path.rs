use serde::{Deserialize, Serialize};

/// Namespace of user-declared components.
pub const COMPONENTS: &str = "components";
/// Namespace of derived binaries.
pub const BINARIES: &str = "binaries";
/// Namespace of derived tasks.
pub const TASKS: &str = "tasks";

/// Stable dotted address of an element in the model graph, e.g.
/// `components.lib` or `binaries.libJarJava6`.
///
/// A bare namespace (`binaries`) is a valid path and addresses the whole
/// collection; rules declare it as an input when they read every element of
/// a kind.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ModelPath(String);

impl ModelPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn of(namespace: &str, name: &str) -> Self {
        Self(format!("{namespace}.{name}"))
    }

    pub fn component(name: &str) -> Self {
        Self::of(COMPONENTS, name)
    }

    pub fn binary(name: &str) -> Self {
        Self::of(BINARIES, name)
    }

    pub fn task(name: &str) -> Self {
        Self::of(TASKS, name)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when this path is a bare namespace rather than a single element.
    pub fn is_namespace(&self) -> bool {
        !self.0.contains('.')
    }

    /// Namespace segment of the path.
    pub fn namespace(&self) -> &str {
        self.0.split('.').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ModelPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ModelPath {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_paths_are_recognized() {
        assert!(ModelPath::new("binaries").is_namespace());
        assert!(!ModelPath::binary("libJar").is_namespace());
        assert_eq!(ModelPath::binary("libJar").namespace(), "binaries");
    }
}
