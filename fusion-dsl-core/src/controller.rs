//! # Mode Controller
//!
//! Runs one `simulate` or `eject` invocation from validation to the last
//! processed file:
//!
//! ```text
//! Validating → ResolvingTargets → Simulate ─────────┐
//!                               → ConfirmingEject ──┴→ Processing → Done
//! ```
//!
//! Any failure ends the run in `Aborted`. Validation touches no file,
//! and in eject mode nothing is transpiled or written before the operator
//! typed `yes`. Processing stops at the first failing file.

use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use tempfile::NamedTempFile;
use tracing::{debug, info, instrument, warn};

use crate::{
    Error, InternalResult,
    confirm::{Confirmation, is_confirmed},
    diff::{DiffPresenter, Presentation},
    package::{PackageResolver, list_files_recursively},
    rewrite::RewriteEngine,
    transpiler::TranspilerRegistry,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Mode {
    Simulate,
    Eject,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Phase {
    Validating,
    ResolvingTargets,
    Simulate,
    ConfirmingEject,
    Processing,
    Done,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunRequest {
    pub dsl: String,
    pub package_key: Option<String>,
    pub fusion_file: Option<PathBuf>,
    pub mode: Mode,
    pub presentation: Presentation,
}

/// Where the files of one run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTarget {
    Package(String),
    File(PathBuf),
}

impl RunRequest {
    /// Exactly one of package key and fusion file must be given; empty
    /// values count as missing.
    pub fn target(&self) -> InternalResult<FileTarget> {
        let package_key = self.package_key.as_deref().filter(|key| !key.is_empty());
        let fusion_file = self
            .fusion_file
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty());

        match (package_key, fusion_file) {
            (Some(key), None) => Ok(FileTarget::Package(key.to_string())),
            (None, Some(path)) => Ok(FileTarget::File(path.to_path_buf())),
            _ => Err(Error::InvalidTargetSelection),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub mode: Mode,
    pub dsl: String,
    pub files_scanned: usize,
    pub changed_files: Vec<PathBuf>,
}

pub struct ModeController<'a> {
    registry: &'a TranspilerRegistry,
    packages: &'a dyn PackageResolver,
    presenter: DiffPresenter,
    file_extension: String,
}

impl<'a> ModeController<'a> {
    pub fn new(registry: &'a TranspilerRegistry, packages: &'a dyn PackageResolver) -> Self {
        Self {
            registry,
            packages,
            presenter: DiffPresenter::default(),
            file_extension: "fusion".to_string(),
        }
    }

    pub fn with_file_extension(mut self, extension: impl Into<String>) -> Self {
        self.file_extension = extension.into();
        self
    }

    #[instrument(level = "debug", skip_all, fields(dsl = %request.dsl, mode = %request.mode))]
    pub fn run(
        &self,
        request: &RunRequest,
        confirmation: &mut dyn Confirmation,
        out: &mut dyn Write,
    ) -> InternalResult<RunReport> {
        match self.execute(request, confirmation, out) {
            Ok(report) => {
                enter(Phase::Done);
                info!(
                    files_scanned = report.files_scanned,
                    files_changed = report.changed_files.len(),
                    "{} of Fusion-DSL \"{}\" finished",
                    report.mode,
                    report.dsl
                );
                Ok(report)
            }
            Err(e) => {
                enter(Phase::Aborted);
                warn!("run aborted: {}", e);
                Err(e)
            }
        }
    }

    fn execute(
        &self,
        request: &RunRequest,
        confirmation: &mut dyn Confirmation,
        out: &mut dyn Write,
    ) -> InternalResult<RunReport> {
        enter(Phase::Validating);
        if !self.registry.contains(&request.dsl) {
            return Err(Error::UnknownDslIdentifier(request.dsl.clone()));
        }
        let target = request.target()?;

        enter(Phase::ResolvingTargets);
        let files = self.resolve_files(&target)?;
        debug!(count = files.len(), "targets resolved");

        match request.mode {
            Mode::Simulate => enter(Phase::Simulate),
            Mode::Eject => {
                enter(Phase::ConfirmingEject);
                self.confirm_eject(&request.dsl, confirmation, out)?;
            }
        }

        enter(Phase::Processing);
        let engine = RewriteEngine::new(self.registry);
        let mut changed_files = Vec::new();
        for file in files.iter() {
            if self.process_file(&engine, request, file, out)? {
                changed_files.push(file.clone());
            }
        }

        Ok(RunReport {
            mode: request.mode,
            dsl: request.dsl.clone(),
            files_scanned: files.len(),
            changed_files,
        })
    }

    fn resolve_files(&self, target: &FileTarget) -> InternalResult<Vec<PathBuf>> {
        match target {
            FileTarget::Package(key) => {
                let directory = self.packages.fusion_directory(key)?;
                list_files_recursively(&directory, &self.file_extension)
            }
            FileTarget::File(path) => {
                if path.is_file() {
                    Ok(vec![path.clone()])
                } else {
                    Err(Error::FileNotFound(path.clone()))
                }
            }
        }
    }

    fn confirm_eject(
        &self,
        dsl: &str,
        confirmation: &mut dyn Confirmation,
        out: &mut dyn Write,
    ) -> InternalResult<()> {
        emit(
            out,
            &format!(
                "This command will expand all {}`...` expressions\n\
                 Are you sure you want to do this?  Type 'yes' to continue: \n",
                dsl
            ),
        )?;

        let answer = confirmation
            .read_answer()
            .map_err(|e| Error::Internal(format!("Failed to read confirmation: {}", e)))?;

        if !is_confirmed(&answer) {
            emit(out, "exit\n")?;
            return Err(Error::ConfirmationDeclined(dsl.to_string()));
        }
        Ok(())
    }

    /// Returns whether the file had call-sites of the requested DSL.
    #[instrument(level = "debug", skip(self, engine, request, out))]
    fn process_file(
        &self,
        engine: &RewriteEngine<'_>,
        request: &RunRequest,
        file: &Path,
        out: &mut dyn Write,
    ) -> InternalResult<bool> {
        let original = fs::read_to_string(file).map_err(|source| Error::ReadFailure {
            path: file.to_path_buf(),
            source: match source.kind() {
                ErrorKind::InvalidData => io::Error::new(
                    ErrorKind::InvalidData,
                    "not valid UTF-8, Fusion files must be UTF-8 encoded",
                ),
                _ => source,
            },
        })?;

        let rewrite = engine.rewrite(&original, &request.dsl)?;
        if !rewrite.changed() {
            debug!("no call-sites, skipped");
            return Ok(false);
        }

        match request.mode {
            Mode::Simulate => {
                emit(
                    out,
                    &format!(
                        "\nSimulate Fusion-DSL \"{}\" for file {}\n\n",
                        request.dsl,
                        file.display()
                    ),
                )?;
                emit(
                    out,
                    &self
                        .presenter
                        .render(&original, &rewrite.content, request.presentation),
                )?;
            }
            Mode::Eject => {
                persist(file, &rewrite.content)?;
                emit(
                    out,
                    &format!(
                        "\nEjected Fusion-DSL \"{}\" from file {}\n",
                        request.dsl,
                        file.display()
                    ),
                )?;
                if request.presentation == Presentation::Diff {
                    emit(out, "\n")?;
                    emit(out, &self.presenter.diff(&original, &rewrite.content))?;
                }
            }
        }

        debug!(replaced = rewrite.replacements.len(), "file processed");
        Ok(true)
    }
}

fn enter(phase: Phase) {
    debug!(%phase, "entering phase");
}

fn emit(out: &mut dyn Write, text: &str) -> InternalResult<()> {
    out.write_all(text.as_bytes())
        .and_then(|_| out.flush())
        .map_err(|e| Error::Internal(format!("Failed to write output: {}", e)))
}

/// Replaces `path` with `content` through a temporary sibling file, so the
/// original stays intact when writing fails.
pub fn persist(path: &Path, content: &str) -> InternalResult<()> {
    let write_failure = |source| Error::WriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path).map_err(write_failure)?.permissions();

    let mut file = NamedTempFile::new_in(directory).map_err(write_failure)?;
    file.write_all(content.as_bytes()).map_err(write_failure)?;
    file.as_file().sync_all().map_err(write_failure)?;
    file.as_file()
        .set_permissions(permissions)
        .map_err(write_failure)?;
    file.persist(path).map_err(|e| write_failure(e.error))?;
    Ok(())
}
