use crate::compiler::api::{Compiler, CompilerError, Result};
use crate::types::{CompileResult, Diagnostic, JointCompileSpec, Severity, SourcePosition};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// `path:line[:col]: severity: message`, the diagnostic line format shared
/// by javac-style tools.
static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<file>[^:\s][^:]*):(?P<line>\d+)(?::(?P<col>\d+))?:\s*(?P<sev>error|warning|info|note):\s*(?P<msg>.*)$")
        .expect("diagnostic pattern is valid")
});

/// Innermost pipeline stage: runs the joint compile by launching the host
/// compiler tool, which drives the secondary language in the same pass.
///
/// The tool classpath locates the compiler implementation itself (not the
/// user's project classpath) and is validated before launch; a missing entry
/// is an environment problem, not a compile failure. The analysis cache
/// directory is handed to the tool for its own incremental state and is
/// opaque here.
pub struct RawJointCompiler {
    compiler_classpath: Vec<PathBuf>,
    analysis_cache_dir: PathBuf,
}

impl RawJointCompiler {
    pub fn new(compiler_classpath: Vec<PathBuf>, analysis_cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            compiler_classpath,
            analysis_cache_dir: analysis_cache_dir.into(),
        }
    }

    fn validate_tool_classpath(&self) -> Result<()> {
        for entry in &self.compiler_classpath {
            if !entry.exists() {
                return Err(CompilerError::ToolClasspathInvalid {
                    entry: entry.clone(),
                });
            }
        }
        Ok(())
    }

    fn build_command(&self, spec: &JointCompileSpec) -> Command {
        let mut cmd = Command::new(&spec.compiler_executable);

        cmd.arg("-d").arg(&spec.destination_dir);
        if !spec.classpath.is_empty() {
            cmd.arg("-cp").arg(join_classpath(&spec.classpath));
        }
        for option in &spec.compiler_options {
            cmd.arg(option);
        }
        for source in spec.source_files.iter().chain(&spec.joint_source_files) {
            cmd.arg(source);
        }

        if !self.compiler_classpath.is_empty() {
            cmd.env("COMPILER_TOOL_CLASSPATH", join_classpath(&self.compiler_classpath));
        }
        cmd.env("ANALYSIS_CACHE_DIR", &self.analysis_cache_dir);
        if let Some(dir) = &spec.working_dir {
            cmd.current_dir(dir);
        }
        cmd
    }
}

#[async_trait]
impl Compiler for RawJointCompiler {
    async fn compile(&self, spec: &JointCompileSpec) -> Result<CompileResult> {
        self.validate_tool_classpath()?;

        tokio::fs::create_dir_all(&spec.destination_dir).await?;
        tokio::fs::create_dir_all(&self.analysis_cache_dir).await?;

        info!(
            "Compiling {} sources ({} joint) to {}",
            spec.source_files.len(),
            spec.joint_source_files.len(),
            spec.destination_dir.display()
        );

        let output = self.build_command(spec).output().await.map_err(|e| {
            CompilerError::ToolLaunchFailed {
                executable: spec.compiler_executable.clone(),
                reason: e.to_string(),
            }
        })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        let mut diagnostics = parse_diagnostics(&stderr);

        if output.status.success() {
            debug!("Compile succeeded with {} diagnostics", diagnostics.len());
            Ok(CompileResult::succeeded(diagnostics))
        } else {
            // The tool ran and rejected the sources; this is a result, not
            // an error. A silent non-zero exit still carries the raw output.
            if diagnostics.is_empty() {
                diagnostics.push(Diagnostic::error(format!(
                    "compiler exited with {}: {}",
                    output.status,
                    stderr.trim()
                )));
            }
            debug!("Compile failed with {} diagnostics", diagnostics.len());
            Ok(CompileResult::failed(diagnostics))
        }
    }
}

fn join_classpath(entries: &[PathBuf]) -> String {
    let sep = if cfg!(windows) { ";" } else { ":" };
    entries
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(sep)
}

/// Parses javac-style tool output into diagnostics. Lines that do not match
/// the diagnostic shape (carets, summaries like `2 errors`) are ignored.
pub fn parse_diagnostics(output: &str) -> Vec<Diagnostic> {
    output
        .lines()
        .filter_map(|line| {
            let captures = DIAGNOSTIC_LINE.captures(line.trim_end())?;
            let severity = match &captures["sev"] {
                "error" => Severity::Error,
                "warning" => Severity::Warning,
                _ => Severity::Info,
            };
            let line_no: u32 = captures["line"].parse().ok()?;
            let column = captures
                .name("col")
                .and_then(|c| c.as_str().parse::<u32>().ok());
            Some(Diagnostic {
                severity,
                message: captures["msg"].to_string(),
                position: Some(SourcePosition {
                    file: Path::new(&captures["file"]).to_path_buf(),
                    line: line_no,
                    column,
                }),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn javac_style_lines_are_parsed() {
        let output = "\
src/Main.java:3: error: ';' expected
        int x = 1
                 ^
src/Util.java:10:5: warning: unchecked cast
2 errors
";
        let diagnostics = parse_diagnostics(output);
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].position.as_ref().unwrap().file,
            PathBuf::from("src/Main.java")
        );
        assert_eq!(diagnostics[0].position.as_ref().unwrap().line, 3);
        assert_eq!(diagnostics[1].severity, Severity::Warning);
        assert_eq!(diagnostics[1].position.as_ref().unwrap().column, Some(5));
    }

    #[test]
    fn non_diagnostic_lines_are_ignored() {
        assert!(parse_diagnostics("Note: recompile with -Xlint\n1 warning\n").is_empty());
    }
}
