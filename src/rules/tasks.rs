use crate::model::{ModelElement, ModelGraph, ModelPath, Result};
use crate::rules::engine::RealizationContext;
use crate::rules::naming::lifecycle_task_name;
use crate::types::{JarBinary, PackageTask};
use tracing::debug;

/// Creates the packaging work item for every derived binary and registers it
/// as the binary's producer.
///
/// Buildability is deliberately not checked here: an unbuildable binary
/// still gets its task, and whether the scheduler skips it or lets it fail
/// is policy outside this core. Compile tasks upstream of the package task
/// are attached by the language plugin, not here.
pub struct TaskDeriver;

impl TaskDeriver {
    pub fn derive_all(graph: &mut ModelGraph, _ctx: &mut RealizationContext) -> Result<()> {
        let binaries: Vec<JarBinary> = graph.binaries().cloned().collect();
        for binary in binaries {
            let task = Self::package_task_for(&binary);
            let task_name = task.name.clone();
            graph.create(ModelPath::task(&task_name), ModelElement::Task(task))?;
            graph.binary_mut(&binary.name)?.built_by = Some(task_name.clone());
            debug!("Wired task {} as producer of {}", task_name, binary.name);
        }
        Ok(())
    }

    fn package_task_for(binary: &JarBinary) -> PackageTask {
        let name = lifecycle_task_name(&binary.name);
        PackageTask {
            name,
            description: format!("Creates the binary file for {}.", binary.name),
            binary: binary.name.clone(),
            input_dirs: vec![binary.classes_dir.clone(), binary.resources_dir.clone()],
            destination_dir: binary
                .jar_file
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_default(),
            archive_file_name: binary
                .jar_file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            buildable: binary.buildable,
        }
    }
}
