use jarforge::model::{ModelElement, ModelError, ModelGraph, ModelPath};
use jarforge::platform::{JavaPlatform, PlatformRegistry};
use jarforge::rules::{realize_components, RealizationContext, RuleEngine};
use jarforge::toolchain::{LocalJdkToolChain, ToolChainRegistry};
use jarforge::types::{Component, SourceSet};
use std::path::PathBuf;
use std::sync::Arc;

fn context(max_language_level: u32) -> RealizationContext {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let platforms = PlatformRegistry::with_defaults(7);
    let chain = Arc::new(LocalJdkToolChain::with_executable(
        "/opt/jdk/bin/javac",
        max_language_level,
    ));
    RealizationContext::new(platforms, ToolChainRegistry::new(chain), "build")
}

fn library(name: &str, targets: &[&str]) -> Component {
    Component::new(name)
        .with_source(SourceSet::new(vec![PathBuf::from(format!(
            "src/{name}/java"
        ))]))
        .with_target_platforms(targets.iter().copied())
}

#[test]
fn component_without_targets_derives_one_binary_on_the_default_platform() {
    let graph = realize_components(vec![library("greeting", &[])], context(8)).unwrap();

    assert_eq!(graph.binary_names(), vec!["greetingJar"]);
    let binary = graph.binary("greetingJar").unwrap();
    assert_eq!(binary.platform, JavaPlatform::java(7));
    assert_eq!(binary.base_name, "greeting");
    assert_eq!(binary.component, "greeting");
    assert!(binary.buildable);
    assert_eq!(binary.classes_dir, PathBuf::from("build/classes/greetingJar"));
    assert_eq!(
        binary.jar_file,
        PathBuf::from("build/jars/greetingJar/greeting.jar")
    );
}

#[test]
fn packaging_task_is_wired_as_the_binary_producer() {
    let graph = realize_components(vec![library("greeting", &[])], context(8)).unwrap();

    let binary = graph.binary("greetingJar").unwrap();
    assert_eq!(binary.built_by.as_deref(), Some("createGreetingJar"));

    let task = graph.task("createGreetingJar").unwrap();
    assert_eq!(task.binary, "greetingJar");
    assert_eq!(
        task.input_dirs,
        vec![
            PathBuf::from("build/classes/greetingJar"),
            PathBuf::from("build/resources/greetingJar"),
        ]
    );
    let request = task.archive_request();
    assert_eq!(
        request.destination,
        PathBuf::from("build/jars/greetingJar/greeting.jar")
    );
}

#[test]
fn multi_platform_component_derives_suffixed_binaries_per_platform() {
    let graph =
        realize_components(vec![library("lib", &["Java6", "Java8"])], context(8)).unwrap();

    let names = graph.binary_names();
    assert_eq!(names, vec!["libJarJava6", "libJarJava8"]);

    let java6 = graph.binary("libJarJava6").unwrap();
    let java8 = graph.binary("libJarJava8").unwrap();
    assert_eq!(java6.platform, JavaPlatform::java(6));
    assert_eq!(java8.platform, JavaPlatform::java(8));
    assert!(java6.buildable);
    assert!(java8.buildable);

    assert_eq!(graph.tasks().count(), 2);
    assert!(graph.task("createLibJarJava6").is_ok());
    assert!(graph.task("createLibJarJava8").is_ok());
}

#[test]
fn single_explicit_platform_keeps_the_unsuffixed_name() {
    let graph = realize_components(vec![library("lib", &["Java6"])], context(8)).unwrap();
    assert_eq!(graph.binary_names(), vec!["libJar"]);
}

#[test]
fn unknown_target_platform_fails_realization() {
    let err = realize_components(vec![library("lib", &["Java99"])], context(8)).unwrap_err();
    match err {
        ModelError::UnknownPlatform {
            component,
            platform,
        } => {
            assert_eq!(component, "lib");
            assert_eq!(platform, "Java99");
        }
        other => panic!("expected UnknownPlatform, got {other}"),
    }
}

#[test]
fn unavailable_toolchain_leaves_binary_modeled_but_unbuildable() {
    // Toolchain only reaches Java7; Java8 stays modeled with buildable=false.
    let graph = realize_components(vec![library("lib", &["Java8"])], context(7)).unwrap();

    let binary = graph.binary("libJar").unwrap();
    assert!(!binary.buildable);

    // The packaging task is still created; skip-or-fail is scheduler policy.
    let task = graph.task("createLibJar").unwrap();
    assert!(!task.buildable);
}

#[test]
fn partial_buildability_marks_each_binary_independently() {
    let graph =
        realize_components(vec![library("lib", &["Java6", "Java8"])], context(7)).unwrap();

    assert!(graph.binary("libJarJava6").unwrap().buildable);
    assert!(!graph.binary("libJarJava8").unwrap().buildable);
    assert_eq!(graph.tasks().count(), 2);
}

#[test]
fn binaries_record_the_bound_toolchain() {
    let graph = realize_components(vec![library("lib", &[])], context(8)).unwrap();
    assert_eq!(graph.binary("libJar").unwrap().tool_chain, "JDK (Java8)");
}

#[test]
fn all_binaries_hook_runs_after_builtin_initializers() {
    let ctx = context(8).on_all_binaries(|binary| {
        binary.resources_dir = binary.resources_dir.join("extra");
    });
    let graph = realize_components(vec![library("greeting", &[])], ctx).unwrap();
    assert_eq!(
        graph.binary("greetingJar").unwrap().resources_dir,
        PathBuf::from("build/resources/greetingJar/extra")
    );
}

#[test]
fn derived_component_platform_pairs_are_unique() {
    let graph = realize_components(
        vec![
            library("core", &["Java6", "Java7", "Java8"]),
            library("util", &["Java6"]),
        ],
        context(8),
    )
    .unwrap();

    let mut pairs: Vec<(String, String)> = graph
        .binaries()
        .map(|b| (b.component.clone(), b.platform.name().to_string()))
        .collect();
    let before = pairs.len();
    pairs.sort();
    pairs.dedup();
    assert_eq!(pairs.len(), before);
    assert_eq!(before, 4);
}

#[test]
fn reading_an_element_before_creation_fails() {
    let mut engine = RuleEngine::new();
    engine.mutate(
        "touch_missing_component",
        ModelPath::component("ghost"),
        |_, _| Ok(()),
    );

    let mut graph = ModelGraph::new();
    let err = engine.realize(&mut graph, &mut context(8)).unwrap_err();
    assert!(matches!(err, ModelError::ElementNotAvailable { .. }));
}

#[test]
fn same_phase_rules_run_in_dependency_order_not_declaration_order() {
    // Reader declared first; the engine must still run the producer first.
    let mut engine = RuleEngine::new();
    engine.add_rule(
        jarforge::rules::RuleDescriptor::new("derive_b_from_a", jarforge::rules::RulePhase::Create)
            .reads(ModelPath::component("a"))
            .writes(ModelPath::component("b")),
        |graph, _| {
            let source = graph.component("a")?.source.clone();
            graph.create(
                ModelPath::component("b"),
                ModelElement::Component(Component::new("b").with_source(source)),
            )
        },
    );
    engine.add_rule(
        jarforge::rules::RuleDescriptor::new("create_a", jarforge::rules::RulePhase::Create)
            .writes(ModelPath::component("a")),
        |graph, _| {
            graph.create(
                ModelPath::component("a"),
                ModelElement::Component(
                    Component::new("a").with_source(SourceSet::new(vec![PathBuf::from("src/a")])),
                ),
            )
        },
    );

    let mut graph = ModelGraph::new();
    engine.realize(&mut graph, &mut context(8)).unwrap();
    assert_eq!(
        graph.component("b").unwrap().source,
        SourceSet::new(vec![PathBuf::from("src/a")])
    );
}

#[test]
fn contradictory_same_phase_dependencies_are_a_cycle() {
    let mut engine = RuleEngine::new();
    for (name, input, output) in [
        ("a_to_b", "state.a", "state.b"),
        ("b_to_c", "state.b", "state.c"),
        ("c_to_a", "state.c", "state.a"),
    ] {
        engine.add_rule(
            jarforge::rules::RuleDescriptor::new(name, jarforge::rules::RulePhase::Mutate)
                .reads(ModelPath::new(input))
                .writes(ModelPath::new(output)),
            |_, _| Ok(()),
        );
    }

    let mut graph = ModelGraph::new();
    let err = engine.realize(&mut graph, &mut context(8)).unwrap_err();
    match err {
        ModelError::RuleCycle { rules } => {
            assert_eq!(rules, vec!["a_to_b", "b_to_c", "c_to_a"]);
        }
        other => panic!("expected RuleCycle, got {other}"),
    }
}

#[test]
fn an_engine_realizes_at_most_once() {
    let mut engine = RuleEngine::new();
    let mut graph = ModelGraph::new();
    let mut ctx = context(8);
    engine.realize(&mut graph, &mut ctx).unwrap();
    let err = engine.realize(&mut graph, &mut ctx).unwrap_err();
    assert!(matches!(err, ModelError::AlreadyRealized));
}

#[test]
fn repeated_realization_of_the_same_declarations_is_structurally_identical() {
    let declare = || {
        vec![
            library("core", &["Java6", "Java8"]),
            library("greeting", &[]),
        ]
    };
    let first = realize_components(declare(), context(7)).unwrap();
    let second = realize_components(declare(), context(7)).unwrap();

    assert_eq!(first.binary_names(), second.binary_names());
    let first_tasks: Vec<String> = first.tasks().map(|t| t.name.clone()).collect();
    let second_tasks: Vec<String> = second.tasks().map(|t| t.name.clone()).collect();
    assert_eq!(first_tasks, second_tasks);
    for name in first.binary_names() {
        let a = first.binary(&name).unwrap();
        let b = second.binary(&name).unwrap();
        assert_eq!(a.buildable, b.buildable);
        assert_eq!(a.jar_file, b.jar_file);
    }

    // The introspection rendering is byte-identical across passes.
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}
