//! Jarforge - declarative JVM build-model core
//!
//! This crate turns a small set of declared build components into concrete,
//! toolchain-bound jar binaries and packaging tasks via an ordered rule
//! engine, and executes joint two-language compilation in isolated, reusable
//! worker contexts with deterministic, normalized results.

pub mod compiler;
pub mod model;
pub mod platform;
pub mod rules;
pub mod toolchain;
pub mod types;

pub use compiler::{Compiler, CompilerError, CompilerPipeline, CompilerPipelineConfig};
pub use model::{ModelError, ModelGraph, ModelPath};
pub use platform::{JavaPlatform, PlatformRegistry};
pub use rules::{realize_components, RealizationContext, RuleEngine};
pub use toolchain::{ToolChain, ToolChainRegistry, ToolChainSelection};
pub use types::*;
