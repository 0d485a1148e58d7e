use crate::compiler::joint::RawJointCompiler;
use crate::compiler::normalizer::NormalizingCompiler;
use crate::compiler::worker::{WorkerCompiler, WorkerPool};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompilerPipelineConfig {
    /// Directory handed to the underlying incremental compiler for its
    /// persistent analysis state. Opaque to this core.
    pub analysis_cache_dir: PathBuf,
    /// Root under which worker scratch directories are created.
    pub worker_root_dir: PathBuf,
    /// Cap on concurrent worker spawns. The pool itself grows with the
    /// number of distinct signatures and never evicts.
    pub max_workers: usize,
}

impl Default for CompilerPipelineConfig {
    fn default() -> Self {
        Self {
            analysis_cache_dir: dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".jarforge")
                .join("analysis-cache"),
            worker_root_dir: std::env::temp_dir().join("jarforge-workers"),
            max_workers: num_cpus::get(),
        }
    }
}

impl CompilerPipelineConfig {
    /// Loads the pipeline configuration from a JSON file.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read pipeline config {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid pipeline config {}", path.display()))?;
        Ok(config)
    }
}

/// Assembles the three-stage compiler chain for one build session: raw joint
/// compiler, worker dispatch, result normalization.
///
/// The pool is owned here and shared by every compiler the pipeline hands
/// out, so compile call sites with the same worker classpath end up on the
/// same worker regardless of which task asked first.
pub struct CompilerPipeline {
    config: CompilerPipelineConfig,
    pool: Arc<WorkerPool>,
}

impl CompilerPipeline {
    pub fn new(config: CompilerPipelineConfig) -> Self {
        let pool = Arc::new(WorkerPool::new(
            config.worker_root_dir.clone(),
            config.max_workers,
        ));
        Self { config, pool }
    }

    /// Compiler for one tool environment: `compiler_classpath` locates the
    /// compiler implementation, `worker_classpath` is the file set that
    /// keys worker isolation and reuse.
    pub fn new_compiler(
        &self,
        compiler_classpath: Vec<PathBuf>,
        worker_classpath: Vec<PathBuf>,
    ) -> NormalizingCompiler<WorkerCompiler<RawJointCompiler>> {
        debug!(
            "Building compiler chain ({} tool entries, {} worker entries)",
            compiler_classpath.len(),
            worker_classpath.len()
        );
        let raw = RawJointCompiler::new(compiler_classpath, self.config.analysis_cache_dir.clone());
        let dispatching = WorkerCompiler::new(raw, Arc::clone(&self.pool), worker_classpath);
        NormalizingCompiler::new(dispatching)
    }

    pub fn pool(&self) -> &Arc<WorkerPool> {
        &self.pool
    }

    pub fn config(&self) -> &CompilerPipelineConfig {
        &self.config
    }

    /// Ends the build session: tears down every worker.
    pub async fn shutdown(&self) {
        self.pool.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_through_a_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pipeline.json");
        let config = CompilerPipelineConfig {
            analysis_cache_dir: PathBuf::from("/var/cache/analysis"),
            worker_root_dir: PathBuf::from("/tmp/workers"),
            max_workers: 3,
        };
        std::fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = CompilerPipelineConfig::from_file(&path).unwrap();
        assert_eq!(loaded.analysis_cache_dir, config.analysis_cache_dir);
        assert_eq!(loaded.max_workers, 3);
    }

    #[test]
    fn missing_config_file_reports_the_path() {
        let err = CompilerPipelineConfig::from_file(Path::new("/no/such/pipeline.json"))
            .unwrap_err();
        assert!(err.to_string().contains("/no/such/pipeline.json"));
    }
}
