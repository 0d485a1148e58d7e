use crate::model::{FactoryRegistry, ModelError, ModelGraph, ModelPath, Result};
use crate::platform::PlatformRegistry;
use crate::toolchain::ToolChainRegistry;
use crate::types::JarBinary;
use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::path::PathBuf;
use tracing::{debug, info};

/// The fixed global execution order of rule kinds.
///
/// Registrations run first, then singleton creation, then mutation of
/// already-created elements, then derivation, then last-chance finalization,
/// then task wiring. Within a phase, rules are ordered by their declared
/// input/output paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RulePhase {
    Register,
    Create,
    Mutate,
    Derive,
    Finalize,
    WireTasks,
}

impl RulePhase {
    pub const ALL: [RulePhase; 6] = [
        RulePhase::Register,
        RulePhase::Create,
        RulePhase::Mutate,
        RulePhase::Derive,
        RulePhase::Finalize,
        RulePhase::WireTasks,
    ];
}

/// Declared shape of a rule: what it is called, when it runs, and which
/// model paths it reads and writes.
#[derive(Debug, Clone)]
pub struct RuleDescriptor {
    pub name: String,
    pub phase: RulePhase,
    pub inputs: Vec<ModelPath>,
    pub outputs: Vec<ModelPath>,
}

impl RuleDescriptor {
    pub fn new(name: impl Into<String>, phase: RulePhase) -> Self {
        Self {
            name: name.into(),
            phase,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn reads(mut self, path: impl Into<ModelPath>) -> Self {
        self.inputs.push(path.into());
        self
    }

    pub fn writes(mut self, path: impl Into<ModelPath>) -> Self {
        self.outputs.push(path.into());
        self
    }
}

/// Explicit dependencies of one realization pass.
///
/// Registries are passed in rather than looked up ambiently, so a pass is
/// fully determined by the context it is given.
pub struct RealizationContext {
    pub platforms: PlatformRegistry,
    pub tool_chains: ToolChainRegistry,
    /// Root of the build output layout, e.g. `build/`.
    pub build_dir: PathBuf,
    pub factories: FactoryRegistry,
    /// User hook applied to every derived binary after the built-in
    /// initializers.
    pub all_binaries_action: Option<Box<dyn Fn(&mut JarBinary) + Send + Sync>>,
}

impl RealizationContext {
    pub fn new(
        platforms: PlatformRegistry,
        tool_chains: ToolChainRegistry,
        build_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            platforms,
            tool_chains,
            build_dir: build_dir.into(),
            factories: FactoryRegistry::new(),
            all_binaries_action: None,
        }
    }

    pub fn on_all_binaries(mut self, action: impl Fn(&mut JarBinary) + Send + Sync + 'static) -> Self {
        self.all_binaries_action = Some(Box::new(action));
        self
    }
}

type RuleAction = Box<dyn FnOnce(&mut ModelGraph, &mut RealizationContext) -> Result<()>>;

struct RegisteredRule {
    descriptor: RuleDescriptor,
    action: RuleAction,
}

/// Ordered set of declarative rules that create, register defaults for, and
/// mutate elements of the model graph.
///
/// Realization is single-threaded and synchronous; rules never run
/// concurrently and never suspend. An engine realizes at most once, which is
/// what makes the "no re-run after completion" contract structural.
#[derive(Default)]
pub struct RuleEngine {
    rules: Vec<RegisteredRule>,
    realized: bool,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(
        &mut self,
        descriptor: RuleDescriptor,
        action: impl FnOnce(&mut ModelGraph, &mut RealizationContext) -> Result<()> + 'static,
    ) {
        self.rules.push(RegisteredRule {
            descriptor,
            action: Box::new(action),
        });
    }

    /// Type-registration rule: binds default implementations in the factory
    /// registry before anything else runs.
    pub fn register_types(
        &mut self,
        name: impl Into<String>,
        action: impl FnOnce(&mut FactoryRegistry) -> Result<()> + 'static,
    ) {
        self.add_rule(
            RuleDescriptor::new(name, RulePhase::Register),
            move |_, ctx| action(&mut ctx.factories),
        );
    }

    /// Creation rule producing the singleton element at `output`.
    pub fn create(
        &mut self,
        name: impl Into<String>,
        output: ModelPath,
        action: impl FnOnce(&mut ModelGraph, &mut RealizationContext) -> Result<()> + 'static,
    ) {
        self.add_rule(
            RuleDescriptor::new(name, RulePhase::Create).writes(output),
            action,
        );
    }

    /// Mutation rule acting on the already-created element at `subject`.
    pub fn mutate(
        &mut self,
        name: impl Into<String>,
        subject: ModelPath,
        action: impl FnOnce(&mut ModelGraph, &mut RealizationContext) -> Result<()> + 'static,
    ) {
        self.add_rule(
            RuleDescriptor::new(name, RulePhase::Mutate)
                .reads(subject.clone())
                .writes(subject),
            action,
        );
    }

    /// Derivation rule reading `input` and producing elements under the
    /// `output` namespace.
    pub fn derive(
        &mut self,
        name: impl Into<String>,
        input: ModelPath,
        output: ModelPath,
        action: impl FnOnce(&mut ModelGraph, &mut RealizationContext) -> Result<()> + 'static,
    ) {
        self.add_rule(
            RuleDescriptor::new(name, RulePhase::Derive)
                .reads(input)
                .writes(output),
            action,
        );
    }

    /// Last-chance mutation after derivation has run.
    pub fn finalize(
        &mut self,
        name: impl Into<String>,
        subject: ModelPath,
        action: impl FnOnce(&mut ModelGraph, &mut RealizationContext) -> Result<()> + 'static,
    ) {
        self.add_rule(
            RuleDescriptor::new(name, RulePhase::Finalize)
                .reads(subject.clone())
                .writes(subject),
            action,
        );
    }

    /// Task-wiring rule, run after everything else.
    pub fn wire_tasks(
        &mut self,
        name: impl Into<String>,
        input: ModelPath,
        output: ModelPath,
        action: impl FnOnce(&mut ModelGraph, &mut RealizationContext) -> Result<()> + 'static,
    ) {
        self.add_rule(
            RuleDescriptor::new(name, RulePhase::WireTasks)
                .reads(input)
                .writes(output),
            action,
        );
    }

    /// Runs all registered rules once, in phase order and, within a phase,
    /// in an order consistent with declared input/output dependencies.
    ///
    /// A rule reading a concrete path that no earlier rule produced fails
    /// with [`ModelError::ElementNotAvailable`]; contradictory same-phase
    /// dependencies fail with [`ModelError::RuleCycle`]. The engine consumes
    /// its rules: a second realization fails with
    /// [`ModelError::AlreadyRealized`].
    pub fn realize(&mut self, graph: &mut ModelGraph, ctx: &mut RealizationContext) -> Result<()> {
        if self.realized {
            return Err(ModelError::AlreadyRealized);
        }
        self.realized = true;

        let mut rules = std::mem::take(&mut self.rules);
        let rule_count = rules.len();

        for phase in RulePhase::ALL {
            let (phase_rules, rest): (Vec<RegisteredRule>, Vec<RegisteredRule>) = rules
                .into_iter()
                .partition(|rule| rule.descriptor.phase == phase);
            rules = rest;
            if phase_rules.is_empty() {
                continue;
            }

            for rule in order_by_dependencies(phase_rules)? {
                for input in &rule.descriptor.inputs {
                    if !input.is_namespace() && !graph.contains(input) {
                        return Err(ModelError::ElementNotAvailable {
                            path: input.clone(),
                        });
                    }
                }
                debug!("Running rule {} ({:?})", rule.descriptor.name, phase);
                (rule.action)(graph, ctx)?;
            }
        }

        info!(
            "Realized model: {} rules produced {} elements",
            rule_count,
            graph.len()
        );
        Ok(())
    }
}

/// Orders same-phase rules so that producers run before consumers.
///
/// Two rules that both read and write the same path keep their declaration
/// order; a genuine multi-rule cycle is an error.
fn order_by_dependencies(rules: Vec<RegisteredRule>) -> Result<Vec<RegisteredRule>> {
    let mut dag: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (0..rules.len()).map(|i| dag.add_node(i)).collect();

    for i in 0..rules.len() {
        for j in 0..rules.len() {
            if i == j {
                continue;
            }
            let i_feeds_j = feeds(&rules[i].descriptor, &rules[j].descriptor);
            let j_feeds_i = feeds(&rules[j].descriptor, &rules[i].descriptor);
            if i_feeds_j && (!j_feeds_i || i < j) {
                dag.add_edge(nodes[i], nodes[j], ());
            }
        }
    }

    for scc in tarjan_scc(&dag) {
        if scc.len() > 1 {
            let mut names: Vec<String> = scc
                .iter()
                .map(|node| rules[dag[*node]].descriptor.name.clone())
                .collect();
            names.sort();
            return Err(ModelError::RuleCycle { rules: names });
        }
    }

    let order = toposort(&dag, None).map_err(|cycle| ModelError::RuleCycle {
        rules: vec![rules[dag[cycle.node_id()]].descriptor.name.clone()],
    })?;

    let mut slots: Vec<Option<RegisteredRule>> = rules.into_iter().map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|node| slots[dag[node]].take())
        .collect())
}

/// True when `producer` writes a path that `consumer` reads, including the
/// namespace forms: writing `binaries.libJar` feeds a reader of `binaries`,
/// and writing `binaries` feeds a reader of any `binaries.*` path.
fn feeds(producer: &RuleDescriptor, consumer: &RuleDescriptor) -> bool {
    producer
        .outputs
        .iter()
        .any(|out| consumer.inputs.iter().any(|inp| paths_overlap(out, inp)))
}

fn paths_overlap(a: &ModelPath, b: &ModelPath) -> bool {
    a == b
        || (a.is_namespace() && a.as_str() == b.namespace())
        || (b.is_namespace() && b.as_str() == a.namespace())
}
