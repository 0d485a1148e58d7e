use crate::compiler::api::{Compiler, Result};
use crate::types::{CompileResult, Diagnostic, JointCompileSpec};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Outermost pipeline stage: makes the inner compiler's result deterministic
/// and stable across otherwise-identical invocations.
///
/// External tools do not promise diagnostic ordering, and absolute paths
/// differ between machines; downstream incremental-build logic compares
/// results across runs, so both sources of variation are removed here.
pub struct NormalizingCompiler<C: Compiler> {
    inner: C,
}

impl<C: Compiler> NormalizingCompiler<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<C: Compiler> Compiler for NormalizingCompiler<C> {
    async fn compile(&self, spec: &JointCompileSpec) -> Result<CompileResult> {
        let mut result = self.inner.compile(spec).await?;
        normalize_diagnostics(&mut result.diagnostics, &spec.source_roots);
        Ok(result)
    }
}

/// Relativizes diagnostic paths against the source roots and sorts by the
/// stable key (source location, severity, message).
pub fn normalize_diagnostics(diagnostics: &mut [Diagnostic], source_roots: &[PathBuf]) {
    for diagnostic in diagnostics.iter_mut() {
        if let Some(position) = &mut diagnostic.position {
            position.file = relativize(&position.file, source_roots);
        }
    }
    diagnostics.sort_by(|a, b| sort_key(a).cmp(&sort_key(b)));
}

fn relativize(file: &Path, source_roots: &[PathBuf]) -> PathBuf {
    for root in source_roots {
        if let Ok(relative) = file.strip_prefix(root) {
            return relative.to_path_buf();
        }
    }
    file.to_path_buf()
}

type DiagnosticKey = (Option<(String, u32, u32)>, u8, String);

fn sort_key(diagnostic: &Diagnostic) -> DiagnosticKey {
    let location = diagnostic.position.as_ref().map(|p| {
        (
            p.file.display().to_string(),
            p.line,
            p.column.unwrap_or(0),
        )
    });
    (
        location,
        diagnostic.severity.rank(),
        diagnostic.message.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[test]
    fn diagnostics_sort_by_location_then_severity_then_message() {
        let mut diagnostics = vec![
            Diagnostic::error("b").at("src/Z.java", 1, None),
            Diagnostic::error("a").at("src/A.java", 9, Some(4)),
            Diagnostic {
                severity: Severity::Warning,
                message: "w".to_string(),
                position: None,
            },
            Diagnostic::error("a").at("src/A.java", 2, None),
        ];
        normalize_diagnostics(&mut diagnostics, &[]);

        assert!(diagnostics[0].position.is_none());
        assert_eq!(diagnostics[1].position.as_ref().unwrap().line, 2);
        assert_eq!(diagnostics[2].position.as_ref().unwrap().line, 9);
        assert_eq!(
            diagnostics[3].position.as_ref().unwrap().file,
            PathBuf::from("src/Z.java")
        );
    }

    #[test]
    fn absolute_paths_are_relativized_against_source_roots() {
        let mut diagnostics = vec![Diagnostic::error("e").at("/work/project/src/Main.java", 1, None)];
        normalize_diagnostics(&mut diagnostics, &[PathBuf::from("/work/project")]);
        assert_eq!(
            diagnostics[0].position.as_ref().unwrap().file,
            PathBuf::from("src/Main.java")
        );
    }
}
