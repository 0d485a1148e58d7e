use crate::model::{ModelError, Result};
use crate::types::{Component, JarBinary, PackageTask};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One typed, named element of the model graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ModelElement {
    Component(Component),
    Binary(JarBinary),
    Task(PackageTask),
}

impl ModelElement {
    pub fn kind(&self) -> &'static str {
        match self {
            ModelElement::Component(_) => "component",
            ModelElement::Binary(_) => "binary",
            ModelElement::Task(_) => "task",
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ModelElement::Component(c) => &c.name,
            ModelElement::Binary(b) => &b.name,
            ModelElement::Task(t) => &t.name,
        }
    }
}

/// Factory producing a default element implementation for a named instance.
pub type ElementFactory = Box<dyn Fn(&str) -> ModelElement + Send + Sync>;

/// Maps an abstract element-type tag to the default concrete implementation
/// registered for it.
///
/// This is the explicit replacement for reflective default-implementation
/// lookup: registration rules bind a tag (e.g. `jvm-library`) to a
/// constructor during bootstrap, and derivation rules instantiate through
/// the tag, never through a concrete type.
#[derive(Default)]
pub struct FactoryRegistry {
    factories: HashMap<String, ElementFactory>,
}

impl FactoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, element_type: impl Into<String>, factory: ElementFactory) {
        self.factories.insert(element_type.into(), factory);
    }

    pub fn create(&self, element_type: &str, name: &str) -> Result<ModelElement> {
        let factory =
            self.factories
                .get(element_type)
                .ok_or_else(|| ModelError::NoDefaultImplementation {
                    element_type: element_type.to_string(),
                })?;
        Ok(factory(name))
    }

    pub fn is_registered(&self, element_type: &str) -> bool {
        self.factories.contains_key(element_type)
    }
}

impl std::fmt::Debug for FactoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FactoryRegistry")
            .field("registered", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}
