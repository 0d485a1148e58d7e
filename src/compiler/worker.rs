use crate::compiler::api::{Compiler, CompilerError, Result};
use crate::types::{CompileResult, JointCompileSpec};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::{Mutex, Semaphore};
use tracing::{debug, info, warn};
use uuid::Uuid;
use walkdir::WalkDir;

/// Content hash of the exact file set that defines a worker's execution
/// environment.
///
/// Two requests presenting the same set by value must map to the same
/// signature; any differing file yields a different one. Order of the input
/// list does not matter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClasspathSignature(String);

impl ClasspathSignature {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClasspathSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone)]
struct FileDigest {
    len: u64,
    modified: Option<SystemTime>,
    digest: [u8; 32],
}

/// Memoizes per-file content digests by (length, mtime) so repeated compiles
/// against a large classpath do not re-read every jar.
///
/// Only plain files are memoized. A directory's own metadata does not change
/// when a nested file is rewritten in place, so directory digests are
/// recomputed on every request from the (cached) digests of the enumerated
/// files.
#[derive(Default)]
struct DigestCache {
    entries: HashMap<PathBuf, FileDigest>,
}

impl DigestCache {
    fn digest_of(&mut self, path: &Path) -> Result<[u8; 32]> {
        let Ok(metadata) = std::fs::metadata(path) else {
            // Absent entries still contribute to the signature so that the
            // same declared set always resolves to the same worker.
            let mut hasher = Sha256::new();
            hasher.update(path.display().to_string().as_bytes());
            hasher.update(b"\0absent");
            return Ok(hasher.finalize().into());
        };

        if metadata.is_dir() {
            let mut files: Vec<PathBuf> = WalkDir::new(path)
                .into_iter()
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .collect();
            files.sort();

            let mut hasher = Sha256::new();
            hasher.update(path.display().to_string().as_bytes());
            hasher.update(b"\0dir");
            for file in files {
                hasher.update(self.file_digest(&file)?);
            }
            return Ok(hasher.finalize().into());
        }

        self.file_digest(path)
    }

    fn file_digest(&mut self, path: &Path) -> Result<[u8; 32]> {
        let metadata = std::fs::metadata(path)?;
        let len = metadata.len();
        let modified = metadata.modified().ok();
        if let Some(cached) = self.entries.get(path) {
            if cached.len == len && cached.modified == modified {
                return Ok(cached.digest);
            }
        }

        let mut hasher = Sha256::new();
        hasher.update(path.display().to_string().as_bytes());
        hasher.update(b"\0");
        hasher.update(std::fs::read(path)?);

        let digest: [u8; 32] = hasher.finalize().into();
        self.entries.insert(
            path.to_path_buf(),
            FileDigest {
                len,
                modified,
                digest,
            },
        );
        Ok(digest)
    }

    fn signature_of(&mut self, classpath: &[PathBuf]) -> Result<ClasspathSignature> {
        let mut entries: Vec<&PathBuf> = classpath.iter().collect();
        entries.sort();
        entries.dedup();

        let mut hasher = Sha256::new();
        for entry in entries {
            hasher.update(self.digest_of(entry)?);
        }
        Ok(ClasspathSignature(format!("{:x}", hasher.finalize())))
    }
}

/// Mutable per-worker state, only reachable through a checkout.
#[derive(Debug, Default)]
pub struct WorkerState {
    pub invocations: u64,
}

/// Isolated execution context for compiler-tool code, reused across compile
/// invocations that share its classpath signature.
///
/// The internal lock is the synchronization boundary: invocations sharing
/// the handle serialize on it, and no invocation-specific state outlives a
/// checkout, so an abandoned in-flight call leaves the handle reusable.
pub struct WorkerHandle {
    id: String,
    signature: ClasspathSignature,
    scratch_dir: PathBuf,
    created_at: DateTime<Utc>,
    alive: AtomicBool,
    state: Mutex<WorkerState>,
}

impl WorkerHandle {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn signature(&self) -> &ClasspathSignature {
        &self.signature
    }

    pub fn scratch_dir(&self) -> &Path {
        &self.scratch_dir
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub async fn invocations(&self) -> u64 {
        self.state.lock().await.invocations
    }

    /// Acquires exclusive use of the worker for one invocation.
    pub async fn checkout(&self) -> tokio::sync::MutexGuard<'_, WorkerState> {
        self.state.lock().await
    }

    fn retire(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

impl std::fmt::Debug for WorkerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerHandle")
            .field("id", &self.id)
            .field("signature", &self.signature.as_str())
            .field("alive", &self.is_alive())
            .finish()
    }
}

/// Pool of long-lived workers keyed by classpath signature.
///
/// At most one live worker exists per distinct signature; requests for
/// different signatures proceed on independent workers in parallel. The pool
/// grows with the number of distinct signatures and never evicts: workers
/// live until the pool is shut down with the build session, so a request for
/// a new signature is never blocked by existing workers.
pub struct WorkerPool {
    root_dir: PathBuf,
    workers: Mutex<HashMap<ClasspathSignature, Arc<WorkerHandle>>>,
    digests: std::sync::Mutex<DigestCache>,
    spawn_permits: Semaphore,
}

impl WorkerPool {
    pub fn new(root_dir: impl Into<PathBuf>, max_spawns: usize) -> Self {
        Self {
            root_dir: root_dir.into(),
            workers: Mutex::new(HashMap::new()),
            digests: std::sync::Mutex::new(DigestCache::default()),
            spawn_permits: Semaphore::new(max_spawns.max(1)),
        }
    }

    pub fn signature_of(&self, classpath: &[PathBuf]) -> Result<ClasspathSignature> {
        let mut digests = self
            .digests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        digests.signature_of(classpath)
    }

    /// Returns the existing worker for this classpath's signature, or spawns
    /// one. The permit only bounds concurrent spawn work; it is released once
    /// the worker exists, so the pool itself grows unbounded.
    pub async fn worker_for(&self, classpath: &[PathBuf]) -> Result<Arc<WorkerHandle>> {
        let signature = self.signature_of(classpath)?;

        if let Some(existing) = self.workers.lock().await.get(&signature) {
            if existing.is_alive() {
                debug!("Reusing worker {} for {}", existing.id(), signature);
                return Ok(Arc::clone(existing));
            }
        }

        let _permit = self
            .spawn_permits
            .acquire()
            .await
            .map_err(|_| CompilerError::WorkerFailed {
                signature: signature.to_string(),
                reason: "worker pool is shut down".to_string(),
            })?;

        let mut workers = self.workers.lock().await;
        // Another caller may have spawned while we waited for the permit.
        if let Some(existing) = workers.get(&signature) {
            if existing.is_alive() {
                return Ok(Arc::clone(existing));
            }
        }

        let id = format!("worker-{}", Uuid::new_v4());
        let scratch_dir = self.root_dir.join(&id);
        tokio::fs::create_dir_all(&scratch_dir).await?;

        info!("Starting worker {} for signature {}", id, signature);
        let handle = Arc::new(WorkerHandle {
            id,
            signature: signature.clone(),
            scratch_dir,
            created_at: Utc::now(),
            alive: AtomicBool::new(true),
            state: Mutex::new(WorkerState::default()),
        });
        workers.insert(signature, Arc::clone(&handle));
        Ok(handle)
    }

    pub async fn live_workers(&self) -> usize {
        self.workers
            .lock()
            .await
            .values()
            .filter(|w| w.is_alive())
            .count()
    }

    /// Tears down all workers. Outstanding handles stay safe to hold but
    /// report dead and are no longer handed out.
    pub async fn shutdown(&self) {
        self.spawn_permits.close();
        let mut workers = self.workers.lock().await;
        for (signature, handle) in workers.drain() {
            handle.retire();
            if let Err(e) = tokio::fs::remove_dir_all(handle.scratch_dir()).await {
                warn!(
                    "Failed to remove scratch dir for worker {} ({}): {}",
                    handle.id(),
                    signature,
                    e
                );
            }
            info!("Stopped worker {} after {} invocations", handle.id(), {
                handle.state.lock().await.invocations
            });
        }
    }
}

/// Dispatching decorator: executes the inner compiler inside a pooled
/// worker's execution context instead of the caller's.
///
/// The worker classpath identifies the tool environment (not the user's
/// project classpath); sharing a signature means sharing the worker, which
/// amortizes tool startup across invocations and isolates distinct tool
/// versions from each other.
pub struct WorkerCompiler<C: Compiler> {
    inner: C,
    pool: Arc<WorkerPool>,
    worker_classpath: Vec<PathBuf>,
}

impl<C: Compiler> WorkerCompiler<C> {
    pub fn new(inner: C, pool: Arc<WorkerPool>, worker_classpath: Vec<PathBuf>) -> Self {
        Self {
            inner,
            pool,
            worker_classpath,
        }
    }
}

#[async_trait]
impl<C: Compiler> Compiler for WorkerCompiler<C> {
    async fn compile(&self, spec: &JointCompileSpec) -> Result<CompileResult> {
        let handle = self.pool.worker_for(&self.worker_classpath).await?;

        // Serializes same-signature invocations; different signatures run on
        // independent workers concurrently.
        let mut checkout = handle.checkout().await;
        if !handle.is_alive() {
            return Err(CompilerError::WorkerFailed {
                signature: handle.signature().to_string(),
                reason: "worker was shut down".to_string(),
            });
        }

        debug!(
            "Dispatching compile to worker {} ({})",
            handle.id(),
            handle.signature()
        );
        let bound_spec = spec.in_working_dir(handle.scratch_dir());
        let result = self.inner.compile(&bound_spec).await;
        checkout.invocations += 1;
        result
    }
}
