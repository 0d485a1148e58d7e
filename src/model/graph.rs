use crate::model::{ModelElement, ModelError, ModelPath, Result, BINARIES, COMPONENTS, TASKS};
use crate::types::{Component, JarBinary, PackageTask};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// The in-memory, named collection of all declared and derived build
/// elements for one configuration pass.
///
/// Elements are addressed by stable [`ModelPath`]s. The graph is exclusively
/// owned and mutated by the single realization thread, so it carries no
/// internal locking; iteration order is the path order, which keeps repeated
/// realizations of the same input structurally identical.
#[derive(Debug, Default, Serialize)]
pub struct ModelGraph {
    elements: BTreeMap<ModelPath, ModelElement>,
}

impl ModelGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, path: &ModelPath) -> bool {
        self.elements.contains_key(path)
    }

    pub fn create(&mut self, path: ModelPath, element: ModelElement) -> Result<()> {
        if self.elements.contains_key(&path) {
            return Err(ModelError::DuplicateElement { path });
        }
        debug!("Created model element {} ({})", path, element.kind());
        self.elements.insert(path, element);
        Ok(())
    }

    pub fn get(&self, path: &ModelPath) -> Result<&ModelElement> {
        self.elements
            .get(path)
            .ok_or_else(|| ModelError::ElementNotAvailable { path: path.clone() })
    }

    pub fn get_mut(&mut self, path: &ModelPath) -> Result<&mut ModelElement> {
        self.elements
            .get_mut(path)
            .ok_or_else(|| ModelError::ElementNotAvailable { path: path.clone() })
    }

    pub fn component(&self, name: &str) -> Result<&Component> {
        let path = ModelPath::component(name);
        match self.get(&path)? {
            ModelElement::Component(component) => Ok(component),
            _ => Err(ModelError::TypeMismatch {
                path,
                expected: "component",
            }),
        }
    }

    pub fn binary(&self, name: &str) -> Result<&JarBinary> {
        let path = ModelPath::binary(name);
        match self.get(&path)? {
            ModelElement::Binary(binary) => Ok(binary),
            _ => Err(ModelError::TypeMismatch {
                path,
                expected: "binary",
            }),
        }
    }

    pub fn binary_mut(&mut self, name: &str) -> Result<&mut JarBinary> {
        let path = ModelPath::binary(name);
        match self.get_mut(&path)? {
            ModelElement::Binary(binary) => Ok(binary),
            _ => Err(ModelError::TypeMismatch {
                path,
                expected: "binary",
            }),
        }
    }

    pub fn task(&self, name: &str) -> Result<&PackageTask> {
        let path = ModelPath::task(name);
        match self.get(&path)? {
            ModelElement::Task(task) => Ok(task),
            _ => Err(ModelError::TypeMismatch {
                path,
                expected: "task",
            }),
        }
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.namespace(COMPONENTS).filter_map(|e| match e {
            ModelElement::Component(c) => Some(c),
            _ => None,
        })
    }

    pub fn binaries(&self) -> impl Iterator<Item = &JarBinary> {
        self.namespace(BINARIES).filter_map(|e| match e {
            ModelElement::Binary(b) => Some(b),
            _ => None,
        })
    }

    pub fn binary_names(&self) -> Vec<String> {
        self.binaries().map(|b| b.name.clone()).collect()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &PackageTask> {
        self.namespace(TASKS).filter_map(|e| match e {
            ModelElement::Task(t) => Some(t),
            _ => None,
        })
    }

    fn namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a ModelElement> {
        self.elements
            .iter()
            .filter(move |(path, _)| path.namespace() == namespace)
            .map(|(_, element)| element)
    }

    /// Applies a mutation to every binary, in stable path order.
    pub fn for_each_binary_mut(
        &mut self,
        mut action: impl FnMut(&mut JarBinary) -> Result<()>,
    ) -> Result<()> {
        for (path, element) in self.elements.iter_mut() {
            if path.namespace() == BINARIES {
                if let ModelElement::Binary(binary) = element {
                    action(binary)?;
                }
            }
        }
        Ok(())
    }

    /// JSON rendering of the realized model, consumed by reporting and
    /// diagnostics tooling.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_a_missing_element_reports_not_available() {
        let graph = ModelGraph::new();
        let err = graph.binary("libJar").unwrap_err();
        assert!(matches!(err, ModelError::ElementNotAvailable { .. }));
    }

    #[test]
    fn duplicate_creation_is_rejected() {
        let mut graph = ModelGraph::new();
        let path = ModelPath::component("lib");
        graph
            .create(path.clone(), ModelElement::Component(Component::new("lib")))
            .unwrap();
        let err = graph
            .create(path, ModelElement::Component(Component::new("lib")))
            .unwrap_err();
        assert!(matches!(err, ModelError::DuplicateElement { .. }));
    }

    #[test]
    fn typed_access_rejects_the_wrong_kind() {
        let mut graph = ModelGraph::new();
        graph
            .create(
                ModelPath::binary("odd"),
                ModelElement::Component(Component::new("odd")),
            )
            .unwrap();
        let err = graph.binary("odd").unwrap_err();
        assert!(matches!(err, ModelError::TypeMismatch { .. }));
    }
}
