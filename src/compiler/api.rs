use crate::types::{CompileResult, JointCompileSpec};
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// The compiler could not run at all. Distinct from a compile failure, which
/// is a normal [`CompileResult`] with `success == false`.
///
/// These are fatal to the invoking task and are not retried by this core;
/// retry policy belongs to the external scheduler.
#[derive(Debug, Error)]
pub enum CompilerError {
    #[error("compiler tool classpath entry is unusable: {entry}")]
    ToolClasspathInvalid { entry: PathBuf },

    #[error("failed to launch compiler {executable}: {reason}")]
    ToolLaunchFailed { executable: PathBuf, reason: String },

    #[error("worker {signature} failed: {reason}")]
    WorkerFailed { signature: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompilerError>;

/// The compile seam every pipeline stage implements, so stages compose and
/// test independently.
#[async_trait]
pub trait Compiler: Send + Sync {
    async fn compile(&self, spec: &JointCompileSpec) -> Result<CompileResult>;
}

#[async_trait]
impl<C: Compiler + ?Sized> Compiler for std::sync::Arc<C> {
    async fn compile(&self, spec: &JointCompileSpec) -> Result<CompileResult> {
        (**self).compile(spec).await
    }
}
