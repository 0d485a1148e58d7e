pub mod binaries;
pub mod engine;
pub mod naming;
pub mod tasks;

pub use binaries::*;
pub use engine::*;
pub use naming::*;
pub use tasks::*;

use crate::model::{ModelElement, ModelError, ModelGraph, ModelPath, Result, BINARIES, COMPONENTS, TASKS};
use crate::types::{Component, JarBinary};

/// Element-type tag for library components in the factory registry.
pub const JVM_LIBRARY_TYPE: &str = "jvm-library";

/// Installs the standard JVM component rule set: type registrations, one
/// creation rule per declared component, binary derivation, buildability
/// finalization and package-task wiring.
pub fn install_jvm_component_rules(engine: &mut RuleEngine, components: Vec<Component>) {
    engine.register_types("register_jvm_library_type", |factories| {
        factories.register(
            JVM_LIBRARY_TYPE,
            Box::new(|name| ModelElement::Component(Component::new(name))),
        );
        Ok(())
    });
    engine.register_types("register_jar_binary_type", |factories| {
        factories.register(
            JAR_BINARY_TYPE,
            Box::new(|name| ModelElement::Binary(JarBinary::new(name))),
        );
        Ok(())
    });

    for declared in components {
        let path = ModelPath::component(&declared.name);
        let rule_name = format!("create_component_{}", declared.name);
        engine.create(rule_name, path.clone(), move |graph, ctx| {
            let element = ctx.factories.create(JVM_LIBRARY_TYPE, &declared.name)?;
            let ModelElement::Component(mut component) = element else {
                return Err(ModelError::TypeMismatch {
                    path: path.clone(),
                    expected: "component",
                });
            };
            component.source = declared.source.clone();
            component.target_platforms = declared.target_platforms.clone();
            graph.create(path, ModelElement::Component(component))
        });
    }

    engine.derive(
        "create_binaries",
        ModelPath::new(COMPONENTS),
        ModelPath::new(BINARIES),
        |graph, ctx| BinaryDeriver::new().derive_all(graph, ctx),
    );
    engine.finalize(
        "mark_binaries_buildable",
        ModelPath::new(BINARIES),
        mark_binaries_buildable,
    );
    engine.wire_tasks(
        "create_package_tasks",
        ModelPath::new(BINARIES),
        ModelPath::new(TASKS),
        TaskDeriver::derive_all,
    );
}

/// Realizes a model from declared components: installs the standard rule
/// set, runs one realization pass and returns the resulting graph.
pub fn realize_components(
    components: Vec<Component>,
    mut ctx: RealizationContext,
) -> Result<ModelGraph> {
    let mut engine = RuleEngine::new();
    install_jvm_component_rules(&mut engine, components);
    let mut graph = ModelGraph::new();
    engine.realize(&mut graph, &mut ctx)?;
    Ok(graph)
}
