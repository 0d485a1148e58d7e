use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Diagnostic severity, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Stable rank used by the normalizing sort.
    pub fn rank(self) -> u8 {
        match self {
            Severity::Error => 0,
            Severity::Warning => 1,
            Severity::Info => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePosition {
    pub file: PathBuf,
    pub line: u32,
    pub column: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub position: Option<SourcePosition>,
}

impl Diagnostic {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            message: message.into(),
            position: None,
        }
    }

    pub fn at(mut self, file: impl Into<PathBuf>, line: u32, column: Option<u32>) -> Self {
        self.position = Some(SourcePosition {
            file: file.into(),
            line,
            column,
        });
        self
    }
}

/// Outcome of one compile invocation.
///
/// `success == false` is a normal result, not an error: the tool ran and
/// reported source problems. Environment problems (tool could not run) are
/// raised as [`CompilerError`](crate::compiler::CompilerError) instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileResult {
    pub success: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileResult {
    pub fn succeeded(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: true,
            diagnostics,
        }
    }

    pub fn failed(diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            success: false,
            diagnostics,
        }
    }
}

/// Immutable value describing one joint compile: the host language's sources
/// plus the secondary language's sources compiled together in a single pass.
///
/// Constructed fresh per compile task execution via [`JointCompileSpecBuilder`];
/// the classpath is ordered with duplicates removed at build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointCompileSpec {
    /// Executable of the host compiler, supplied by the bound toolchain.
    pub compiler_executable: PathBuf,
    pub source_files: Vec<PathBuf>,
    /// Secondary-language sources handed to the host compiler in the same pass.
    pub joint_source_files: Vec<PathBuf>,
    pub classpath: Vec<PathBuf>,
    pub destination_dir: PathBuf,
    pub compiler_options: Vec<String>,
    /// Roots diagnostics paths are relativized against during normalization.
    pub source_roots: Vec<PathBuf>,
    /// Working directory for the tool process. Set by the worker dispatcher
    /// to the owning worker's scratch directory.
    pub working_dir: Option<PathBuf>,
}

impl JointCompileSpec {
    pub fn builder(compiler_executable: impl Into<PathBuf>) -> JointCompileSpecBuilder {
        JointCompileSpecBuilder::new(compiler_executable)
    }

    /// Copy of this spec bound to a worker's execution context.
    pub fn in_working_dir(&self, dir: impl Into<PathBuf>) -> Self {
        let mut spec = self.clone();
        spec.working_dir = Some(dir.into());
        spec
    }
}

#[derive(Debug, Default)]
pub struct JointCompileSpecBuilder {
    compiler_executable: PathBuf,
    source_files: Vec<PathBuf>,
    joint_source_files: Vec<PathBuf>,
    classpath: Vec<PathBuf>,
    destination_dir: PathBuf,
    compiler_options: Vec<String>,
    source_roots: Vec<PathBuf>,
}

impl JointCompileSpecBuilder {
    pub fn new(compiler_executable: impl Into<PathBuf>) -> Self {
        Self {
            compiler_executable: compiler_executable.into(),
            ..Default::default()
        }
    }

    pub fn source_files<I: IntoIterator<Item = PathBuf>>(mut self, files: I) -> Self {
        self.source_files.extend(files);
        self
    }

    pub fn joint_source_files<I: IntoIterator<Item = PathBuf>>(mut self, files: I) -> Self {
        self.joint_source_files.extend(files);
        self
    }

    pub fn classpath<I: IntoIterator<Item = PathBuf>>(mut self, entries: I) -> Self {
        self.classpath.extend(entries);
        self
    }

    pub fn destination_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.destination_dir = dir.into();
        self
    }

    pub fn compiler_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.compiler_options.extend(options.into_iter().map(Into::into));
        self
    }

    pub fn source_roots<I: IntoIterator<Item = PathBuf>>(mut self, roots: I) -> Self {
        self.source_roots.extend(roots);
        self
    }

    pub fn build(self) -> JointCompileSpec {
        JointCompileSpec {
            compiler_executable: self.compiler_executable,
            source_files: self.source_files,
            joint_source_files: self.joint_source_files,
            classpath: dedup_preserving_order(self.classpath),
            destination_dir: self.destination_dir,
            compiler_options: self.compiler_options,
            source_roots: self.source_roots,
            working_dir: None,
        }
    }
}

fn dedup_preserving_order(entries: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut seen = std::collections::HashSet::new();
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classpath_is_deduplicated_in_order() {
        let spec = JointCompileSpec::builder("scalac")
            .classpath(vec![
                PathBuf::from("a.jar"),
                PathBuf::from("b.jar"),
                PathBuf::from("a.jar"),
                PathBuf::from("c.jar"),
                PathBuf::from("b.jar"),
            ])
            .build();

        assert_eq!(
            spec.classpath,
            vec![
                PathBuf::from("a.jar"),
                PathBuf::from("b.jar"),
                PathBuf::from("c.jar"),
            ]
        );
    }
}
