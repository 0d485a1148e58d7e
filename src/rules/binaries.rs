use crate::model::{ModelElement, ModelError, ModelGraph, ModelPath, Result};
use crate::rules::engine::RealizationContext;
use crate::rules::naming::BinaryNamingSchemeBuilder;
use crate::types::{Component, JarBinary};
use tracing::{debug, info};

/// Element-type tag for jar binaries in the factory registry.
pub const JAR_BINARY_TYPE: &str = "jar-binary";

/// Per-binary initializer action. Initializers run in declared order and
/// each sees the effects of the previous ones.
pub trait BinaryInitializer {
    fn initialize(&self, binary: &mut JarBinary, ctx: &RealizationContext) -> Result<()>;
}

/// Lays out the binary's output directories under the build dir:
/// `classes/<binary>`, `resources/<binary>` and
/// `jars/<binary>/<baseName>.jar`.
pub struct JarBinaryLayoutInitializer;

impl BinaryInitializer for JarBinaryLayoutInitializer {
    fn initialize(&self, binary: &mut JarBinary, ctx: &RealizationContext) -> Result<()> {
        binary.classes_dir = ctx.build_dir.join("classes").join(&binary.name);
        binary.resources_dir = ctx.build_dir.join("resources").join(&binary.name);
        binary.jar_file = ctx
            .build_dir
            .join("jars")
            .join(&binary.name)
            .join(format!("{}.jar", binary.base_name));
        Ok(())
    }
}

/// Derives one jar binary per selected platform from a component.
///
/// Platform resolution is exact-name matching against the platform registry,
/// with the default platform standing in for an empty target list. Toolchain
/// lookup is total; an unavailable toolchain does not stop derivation.
pub struct BinaryDeriver {
    initializers: Vec<Box<dyn BinaryInitializer>>,
}

impl Default for BinaryDeriver {
    fn default() -> Self {
        Self {
            initializers: vec![Box::new(JarBinaryLayoutInitializer)],
        }
    }
}

impl BinaryDeriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initializer(mut self, initializer: Box<dyn BinaryInitializer>) -> Self {
        self.initializers.push(initializer);
        self
    }

    /// Derives binaries for every component in the graph.
    pub fn derive_all(&self, graph: &mut ModelGraph, ctx: &mut RealizationContext) -> Result<()> {
        let components: Vec<Component> = graph.components().cloned().collect();
        for component in components {
            self.derive_for_component(&component, graph, ctx)?;
        }
        Ok(())
    }

    fn derive_for_component(
        &self,
        component: &Component,
        graph: &mut ModelGraph,
        ctx: &mut RealizationContext,
    ) -> Result<()> {
        let selected = ctx
            .platforms
            .choose_from_targets(&component.target_platforms)
            .map_err(|err| ModelError::UnknownPlatform {
                component: component.name.clone(),
                platform: match err {
                    crate::platform::PlatformError::UnknownPlatform { name }
                    | crate::platform::PlatformError::DuplicatePlatform { name } => name,
                },
            })?;

        let multiple = selected.len() > 1;
        for platform in selected {
            let tool_chain = ctx.tool_chains.get_for_platform(&platform);

            let mut naming = BinaryNamingSchemeBuilder::new()
                .with_component_name(&component.name)
                .with_type_string("jar");
            if multiple {
                naming = naming.with_variant_dimension(platform.name());
            }
            let binary_name = naming.build().binary_name();

            let element = ctx.factories.create(JAR_BINARY_TYPE, &binary_name)?;
            let ModelElement::Binary(mut binary) = element else {
                return Err(ModelError::TypeMismatch {
                    path: ModelPath::binary(&binary_name),
                    expected: "binary",
                });
            };

            binary.base_name = component.name.clone();
            binary.component = component.name.clone();
            binary.source = component.source.clone();
            binary.tool_chain = tool_chain.display_name();
            binary.platform = platform.clone();

            for initializer in &self.initializers {
                initializer.initialize(&mut binary, ctx)?;
            }
            if let Some(action) = &ctx.all_binaries_action {
                action(&mut binary);
            }

            debug!(
                "Derived binary {} for component {} on {}",
                binary.name, component.name, platform
            );
            graph.create(ModelPath::binary(&binary_name), ModelElement::Binary(binary))?;
        }

        info!("Derived binaries for component {}", component.name);
        Ok(())
    }
}

/// Finalization rule: marks every binary buildable exactly when its bound
/// toolchain reports available for its bound platform.
///
/// The flag is set once here and never changes for the rest of the pass. An
/// unbuildable binary stays fully modeled; only execution-time scheduling
/// treats it specially.
pub fn mark_binaries_buildable(graph: &mut ModelGraph, ctx: &mut RealizationContext) -> Result<()> {
    graph.for_each_binary_mut(|binary| {
        let tool_chain = ctx.tool_chains.get_for_platform(&binary.platform);
        let selection = tool_chain.select_for(&binary.platform);
        binary.buildable = selection.is_available();
        if !binary.buildable {
            debug!(
                "Binary {} is not buildable: {}",
                binary.name,
                selection
                    .unavailability_reason()
                    .unwrap_or("toolchain unavailable")
            );
        }
        Ok(())
    })
}
