use std::{
    io::{self, ErrorKind, Write},
    process::{Command, Stdio},
    thread,
};

use tracing::{debug, instrument};

use super::{TranspileError, TranspileResult, Transpiler};

/// Delegates transpilation to an external program.
///
/// The code body is written to the program's stdin and its stdout is taken
/// as the Fusion replacement. This is the bridge to transpilers that only
/// exist outside this crate, e.g. a Flow command wrapping an AFX
/// implementation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandTranspiler {
    program: String,
    args: Vec<String>,
    trim_trailing_newline: bool,
}

impl CommandTranspiler {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            trim_trailing_newline: true,
        }
    }

    pub fn with_trim_trailing_newline(mut self, trim: bool) -> Self {
        self.trim_trailing_newline = trim;
        self
    }
}

impl Transpiler for CommandTranspiler {
    #[instrument(level = "debug", skip(self, code), fields(program = %self.program))]
    fn transpile(&self, code: &str) -> TranspileResult<String> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| TranspileError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // stdin is written on its own thread, stdout and stderr are drained
        // concurrently by wait_with_output
        let writer = child.stdin.take().map(|mut stdin| {
            let body = code.to_string();
            thread::spawn(move || match stdin.write_all(body.as_bytes()) {
                // a program may exit without reading its whole input
                Err(e) if e.kind() == ErrorKind::BrokenPipe => Ok(()),
                result => result,
            })
        });

        let output = child
            .wait_with_output()
            .map_err(|source| TranspileError::Io {
                program: self.program.clone(),
                source,
            })?;

        if let Some(writer) = writer {
            writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")))
                .map_err(|source| TranspileError::Io {
                    program: self.program.clone(),
                    source,
                })?;
        }

        if !output.status.success() {
            return Err(TranspileError::CommandFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut fusion =
            String::from_utf8(output.stdout).map_err(|_| TranspileError::InvalidOutput {
                program: self.program.clone(),
            })?;

        if self.trim_trailing_newline && fusion.ends_with('\n') {
            fusion.pop();
            if fusion.ends_with('\r') {
                fusion.pop();
            }
        }

        debug!(bytes = fusion.len(), "command transpiled");
        Ok(fusion)
    }
}
