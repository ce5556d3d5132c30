//! Document and notebook converters.
//!
//! Converters are external collaborators: they receive the raw buffer, a scope
//! snapshot and the declared options, and return either a converted buffer or
//! the path of a file they wrote. Any error is a per-file failure.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use folio_core::ContextMap;
use serde::{Deserialize, Serialize};

use crate::context::scalar_metadata;
use crate::error::{io_err, RenderError};
use crate::options::{DocumentOptions, OutputFormat};

/// Which collaborator produced a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollaboratorHandle {
    Template,
    Document,
    Notebook,
    Copy,
}

/// Input to a converter call.
#[derive(Debug, Clone, Copy)]
pub struct ConvertRequest<'a> {
    pub source: &'a Path,
    pub buffer: &'a str,
    pub context: &'a ContextMap,
    pub options: &'a DocumentOptions,
    /// Where to write binary output. `None` asks for a buffer.
    pub output: Option<&'a Path>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConvertOutput {
    Buffer(String),
    File(PathBuf),
}

pub trait DocumentConverter: Send + Sync {
    fn name(&self) -> &str;

    fn convert(&self, request: &ConvertRequest<'_>) -> Result<ConvertOutput, RenderError>;
}

// ---------------------------------------------------------------------------
// Process helper
// ---------------------------------------------------------------------------

fn run(mut cmd: Command, program: &str, stdin: Option<&str>) -> Result<String, RenderError> {
    cmd.stdin(if stdin.is_some() { Stdio::piped() } else { Stdio::null() })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    let spawn_err = |source| RenderError::Spawn {
        program: program.to_string(),
        source,
    };
    let mut child = cmd.spawn().map_err(spawn_err)?;
    if let (Some(input), Some(mut pipe)) = (stdin, child.stdin.take()) {
        pipe.write_all(input.as_bytes()).map_err(spawn_err)?;
    }
    let out = child.wait_with_output().map_err(spawn_err)?;
    if !out.status.success() {
        return Err(RenderError::Converter {
            program: program.to_string(),
            status: out.status.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).into_owned())
}

// ---------------------------------------------------------------------------
// Pandoc
// ---------------------------------------------------------------------------

/// Markdown converter backed by the `pandoc` executable.
#[derive(Debug, Clone)]
pub struct PandocConverter {
    program: String,
}

impl Default for PandocConverter {
    fn default() -> Self {
        Self {
            program: "pandoc".to_string(),
        }
    }
}

impl PandocConverter {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Command-line arguments for one conversion, excluding the program.
    pub fn arguments(&self, request: &ConvertRequest<'_>) -> Vec<String> {
        let opts = request.options;
        let mut args = vec![
            "--from=markdown".to_string(),
            format!("--to={}", opts.to.writer()),
        ];

        // A render template wraps the body itself, so pandoc emits a fragment.
        if opts.render.is_none() || request.output.is_some() {
            args.push("--standalone".into());
            if let Some(t) = &opts.template {
                args.push(format!("--template={}", t.display()));
            }
        }
        if let Some(b) = &opts.bibliography {
            args.push(format!("--bibliography={}", b.display()));
        }
        if let Some(c) = &opts.csl {
            args.push(format!("--csl={}", c.display()));
        }
        for (flag, files) in [
            ("include-in-header", &opts.include_in_header),
            ("include-before-body", &opts.include_before_body),
            ("include-after-body", &opts.include_after_body),
        ] {
            for f in files {
                args.push(format!("--{flag}={}", f.display()));
            }
        }
        if let Some(h) = &opts.highlight_style {
            args.push(format!("--highlight-style={h}"));
        }
        match opts.to {
            OutputFormat::Html => {
                args.push("--mathjax".into());
                for css in &opts.css {
                    args.push(format!("--css={css}"));
                }
            }
            OutputFormat::Pdf | OutputFormat::Beamer | OutputFormat::Latex => {
                args.push("--variable=graphics=true".into());
            }
        }
        if let Some(dir) = request.source.parent() {
            args.push(format!("--resource-path={}", dir.display()));
        }
        for (k, v) in scalar_metadata(request.context) {
            args.push(format!("--metadata={k}={v}"));
        }
        if let Some(out) = request.output {
            args.push(format!("--output={}", out.display()));
        }
        args
    }
}

impl DocumentConverter for PandocConverter {
    fn name(&self) -> &str {
        "pandoc"
    }

    fn convert(&self, request: &ConvertRequest<'_>) -> Result<ConvertOutput, RenderError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.arguments(request));
        let stdout = run(cmd, &self.program, Some(request.buffer))?;
        match request.output {
            Some(out) => Ok(ConvertOutput::File(out.to_path_buf())),
            None => Ok(ConvertOutput::Buffer(stdout)),
        }
    }
}

// ---------------------------------------------------------------------------
// Jupyter
// ---------------------------------------------------------------------------

/// Notebook converter backed by `jupyter nbconvert`.
#[derive(Debug, Clone)]
pub struct NotebookConverter {
    program: String,
}

impl Default for NotebookConverter {
    fn default() -> Self {
        Self {
            program: "jupyter".to_string(),
        }
    }
}

impl NotebookConverter {
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl DocumentConverter for NotebookConverter {
    fn name(&self) -> &str {
        "nbconvert"
    }

    fn convert(&self, request: &ConvertRequest<'_>) -> Result<ConvertOutput, RenderError> {
        if !request.source.is_file() {
            return Err(io_err(
                request.source,
                std::io::Error::from(std::io::ErrorKind::NotFound),
            ));
        }
        let mut cmd = Command::new(&self.program);
        cmd.args(["nbconvert", "--to", "html", "--stdout"])
            .arg(request.source);
        let html = run(cmd, &self.program, None)?;
        Ok(ConvertOutput::Buffer(html))
    }
}
