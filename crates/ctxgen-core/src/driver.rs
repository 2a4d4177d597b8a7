//! Generation driver
//!
//! Runs the whole pipeline in memory. Every fatal condition is detected
//! before the first artifact is rendered, and nothing touches the
//! filesystem until [`Generated::write_to`].

use crate::classify::classify;
use crate::conventions::Conventions;
use crate::diagnostic::Diagnostic;
use crate::error::{GenError, GenResult};
use crate::generators::ArtifactKind;
use crate::source::DeclarationSource;
use crate::table::DispatchTable;
use std::fs;
use std::path::{Path, PathBuf};

/// Generator over one set of conventions
#[derive(Debug, Clone)]
pub struct AutoGen {
    conventions: Conventions,
}

/// One rendered file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub contents: String,
}

/// All artifacts of one run, rendered but not yet written
#[derive(Debug, Clone)]
pub struct Generated {
    table: DispatchTable,
    artifacts: Vec<Artifact>,
}

/// An artifact on disk that differs from the generated one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Drift {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub state: DriftState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriftState {
    Missing,
    Stale,
}

impl AutoGen {
    pub fn new(conventions: Conventions) -> Self {
        Self { conventions }
    }

    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Parse, classify, name and render
    ///
    /// Warnings are pushed to `sink`. Fatal diagnostics are returned inside
    /// the error, located in the source.
    pub fn run(
        &self,
        source: &dyn DeclarationSource,
        sink: &mut Vec<Diagnostic>,
    ) -> GenResult<Generated> {
        let unit = source.parse().map_err(|diagnostics| GenError::Syntax {
            origin: source.origin().to_string(),
            diagnostics,
        })?;

        let mut warnings = Vec::new();
        let classified = classify(&unit, &self.conventions, &mut warnings);
        sink.extend(warnings.into_iter().map(|d| locate(source, d)));

        let table = classified
            .and_then(|entries| DispatchTable::build(entries, &self.conventions))
            .map_err(|err| match err {
                GenError::Malformed { diagnostics } => GenError::malformed(
                    diagnostics.into_iter().map(|d| locate(source, d)).collect(),
                ),
                other => other,
            })?;

        let artifacts = ArtifactKind::ALL
            .iter()
            .map(|&kind| Artifact {
                kind,
                contents: kind.render(&table, &self.conventions, source.origin()),
            })
            .collect();

        Ok(Generated { table, artifacts })
    }
}

/// Attach the origin and source text to a pipeline diagnostic
fn locate(source: &dyn DeclarationSource, diag: Diagnostic) -> Diagnostic {
    let mut diag = diag.with_file(source.origin());
    if diag.snippet.is_empty() {
        if let Some(text) = source.line_text(diag.line) {
            diag.snippet = text.to_string();
        }
    }
    for related in &mut diag.related {
        if related.file.is_empty() {
            related.file = source.origin().to_string();
        }
    }
    diag
}

impl Generated {
    pub fn table(&self) -> &DispatchTable {
        &self.table
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn artifact(&self, kind: ArtifactKind) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.kind == kind)
    }

    /// Write every artifact under `root`
    ///
    /// All files are staged next to their destination first; if any staging
    /// write fails, the staged files are removed and no destination changes.
    pub fn write_to(&self, root: &Path) -> GenResult<Vec<PathBuf>> {
        let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(self.artifacts.len());

        for artifact in &self.artifacts {
            let dest = root.join(artifact.kind.relative_path());
            let temp = staging_path(&dest);
            if let Err(err) = stage(&dest, &temp, &artifact.contents) {
                discard(&staged);
                let _ = fs::remove_file(&temp);
                return Err(err);
            }
            staged.push((temp, dest));
        }

        let mut written = Vec::with_capacity(staged.len());
        for (index, (temp, dest)) in staged.iter().enumerate() {
            if let Err(err) = fs::rename(temp, dest) {
                discard(&staged[index..]);
                return Err(GenError::io(dest, err));
            }
            written.push(dest.clone());
        }

        Ok(written)
    }

    /// Compare every artifact with the file under `root`
    pub fn check(&self, root: &Path) -> GenResult<Vec<Drift>> {
        let mut drift = Vec::new();
        for artifact in &self.artifacts {
            let path = root.join(artifact.kind.relative_path());
            let state = match fs::read_to_string(&path) {
                Ok(existing) if existing == artifact.contents => continue,
                Ok(_) => DriftState::Stale,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => DriftState::Missing,
                Err(e) if e.kind() == std::io::ErrorKind::InvalidData => DriftState::Stale,
                Err(e) => return Err(GenError::io(path, e)),
            };
            drift.push(Drift {
                kind: artifact.kind,
                path,
                state,
            });
        }
        Ok(drift)
    }
}

fn staging_path(dest: &Path) -> PathBuf {
    let name = dest
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    dest.with_file_name(format!(".{}.ctxgen-tmp", name))
}

fn stage(dest: &Path, temp: &Path, contents: &str) -> GenResult<()> {
    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
    }
    fs::write(temp, contents).map_err(|e| GenError::io(temp, e))
}

fn discard(staged: &[(PathBuf, PathBuf)]) {
    for (temp, _) in staged {
        let _ = fs::remove_file(temp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::error_codes;
    use crate::source::HeaderSource;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    const HEADER: &str = "typedef int HPy;\nHPy h_None;\nHPy HPy_Dup(HPyContext ctx, HPy h);\nint helper(void);\n";

    fn run(header: &str) -> (GenResult<Generated>, Vec<Diagnostic>) {
        let autogen = AutoGen::new(Conventions::hpy().unwrap());
        let mut sink = Vec::new();
        let result = autogen.run(&HeaderSource::new("tools/public_api.h", header), &mut sink);
        (result, sink)
    }

    #[test]
    fn test_renders_all_artifacts_in_order() {
        let (result, sink) = run(HEADER);
        let generated = result.unwrap();
        let kinds: Vec<_> = generated.artifacts().iter().map(|a| a.kind).collect();
        assert_eq!(kinds, ArtifactKind::ALL.to_vec());
        assert_eq!(sink.len(), 1);
        assert_eq!(sink[0].file, "tools/public_api.h");
        assert_eq!(sink[0].snippet, "int helper(void);");
    }

    #[test]
    fn test_warnings_never_reach_artifacts() {
        let (result, _) = run(HEADER);
        for artifact in result.unwrap().artifacts() {
            assert!(!artifact.contents.contains("helper"));
            assert!(artifact.contents.ends_with('\n'));
            assert!(!artifact.contents.ends_with("\n\n"));
        }
    }

    #[test]
    fn test_syntax_error_carries_origin() {
        let (result, _) = run("HPy h_None");
        match result.unwrap_err() {
            GenError::Syntax { origin, diagnostics } => {
                assert_eq!(origin, "tools/public_api.h");
                assert_eq!(diagnostics[0].code, error_codes::SYNTAX_ERROR);
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_diagnostics_are_located() {
        let (result, _) = run("HPy HPy_Dup(HPyContext ctx, HPy h);\nHPy HPyDup(HPyContext ctx, HPy h);\n");
        let err = result.unwrap_err();
        let diag = &err.diagnostics()[0];
        assert_eq!(diag.file, "tools/public_api.h");
        assert_eq!(diag.snippet, "HPy HPyDup(HPyContext ctx, HPy h);");
        assert_eq!(diag.related[0].file, "tools/public_api.h");
    }

    #[test]
    fn test_write_then_check_clean() {
        let dir = TempDir::new().unwrap();
        let generated = run(HEADER).0.unwrap();
        let written = generated.write_to(dir.path()).unwrap();
        assert_eq!(written.len(), 4);
        for (path, kind) in written.iter().zip(ArtifactKind::ALL) {
            assert_eq!(path, &dir.path().join(kind.relative_path()));
            let contents = fs::read_to_string(path).unwrap();
            assert_eq!(Some(contents.as_str()), generated.artifact(kind).map(|a| a.contents.as_str()));
        }
        assert!(generated.check(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_no_staging_files_left() {
        let dir = TempDir::new().unwrap();
        run(HEADER).0.unwrap().write_to(dir.path()).unwrap();
        let tools = fs::read_dir(dir.path().join("tools")).unwrap();
        let names: Vec<_> = tools
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["autogen_pypy.txt"]);
    }

    #[test]
    fn test_check_reports_missing_and_stale() {
        let dir = TempDir::new().unwrap();
        let generated = run(HEADER).0.unwrap();
        generated.write_to(dir.path()).unwrap();

        let stale = dir.path().join(ArtifactKind::ContextDef.relative_path());
        fs::write(&stale, "edited by hand\n").unwrap();
        fs::remove_file(dir.path().join(ArtifactKind::ForeignDescriptor.relative_path())).unwrap();

        let drift = generated.check(dir.path()).unwrap();
        assert_eq!(
            drift,
            vec![
                Drift {
                    kind: ArtifactKind::ContextDef,
                    path: stale,
                    state: DriftState::Stale,
                },
                Drift {
                    kind: ArtifactKind::ForeignDescriptor,
                    path: dir.path().join("tools/autogen_pypy.txt"),
                    state: DriftState::Missing,
                },
            ]
        );
    }

    #[test]
    fn test_staging_failure_leaves_destinations_untouched() {
        let dir = TempDir::new().unwrap();
        // A plain file where a directory is needed makes staging fail
        fs::write(dir.path().join("tools"), "not a directory").unwrap();

        let err = run(HEADER).0.unwrap().write_to(dir.path()).unwrap_err();
        assert!(matches!(err, GenError::Io { .. }));

        let header_dir = dir.path().join("hpy-api/hpy_devel/include/universal");
        let leftovers: Vec<_> = fs::read_dir(&header_dir).unwrap().collect();
        assert!(leftovers.is_empty());
        assert!(!dir.path().join(ArtifactKind::ContextDef.relative_path()).exists());
    }
}
