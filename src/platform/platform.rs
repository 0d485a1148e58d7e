use serde::{Deserialize, Serialize};

/// Named target runtime descriptor, e.g. `Java6`.
///
/// Identity is the name; the ordinal is a version marker used by toolchains
/// to decide whether they can produce bytecode for the platform. Platforms
/// are immutable once registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JavaPlatform {
    name: String,
    ordinal: u32,
}

impl JavaPlatform {
    pub fn new(name: impl Into<String>, ordinal: u32) -> Self {
        Self {
            name: name.into(),
            ordinal,
        }
    }

    /// Conventionally named platform for a Java language level, e.g.
    /// `JavaPlatform::java(6)` is `Java6`.
    pub fn java(level: u32) -> Self {
        Self::new(format!("Java{level}"), level)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ordinal(&self) -> u32 {
        self.ordinal
    }
}

impl std::fmt::Display for JavaPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}
