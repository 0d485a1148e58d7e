use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Packaging work item derived for a single binary.
///
/// The task only records what has to happen: read the binary's output
/// directories, produce the jar at the destination. Archive mechanics and
/// invocation order belong to the external scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackageTask {
    pub name: String,
    pub description: String,
    /// Name of the binary this task produces. Exactly one binary per task.
    pub binary: String,
    /// Directories read by the archive step (classes, then resources).
    pub input_dirs: Vec<PathBuf>,
    pub destination_dir: PathBuf,
    pub archive_file_name: String,
    /// Buildable flag copied from the binary at wiring time. Whether an
    /// unbuildable binary's task is skipped or attempted-and-failed is the
    /// scheduler's policy, not decided here.
    pub buildable: bool,
}

impl PackageTask {
    /// The "create archive" operation this task stands for.
    pub fn archive_request(&self) -> ArchiveRequest {
        ArchiveRequest {
            sources: self.input_dirs.clone(),
            destination: self.destination_dir.join(&self.archive_file_name),
        }
    }
}

/// Value handed to the external archiving collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveRequest {
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
}
