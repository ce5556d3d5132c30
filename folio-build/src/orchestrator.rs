//! Directory-tree build orchestrator.
//!
//! [`Builder`] is the [`TreeVisitor`] driven by [`folio_core::DirectoryTree::traverse`]:
//!
//! - `enter` opens a scope frame, clears the non-inherited declarations and
//!   sets the relative-root markers.
//! - `process` merges the directory configuration and fragments, evaluates the
//!   availability/ignore policy, prunes declared subdirectories and builds
//!   every file of the directory.
//! - `leave` renders the aggregation page, splices the manifest into the
//!   parent and pops the frame.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use folio_core::config::{merge_directory_config, parse_yaml_map, split_front_matter};
use folio_core::policy::{AVAILABILITY_KEY, IGNORE_KEY};
use folio_core::{
    ContextMap, DirectoryPolicy, DirectoryTree, FileKind, NodeId, RunOptions, ScopedContext,
    TreeVisitor, Verdict, Visit,
};
use folio_render::{
    resolve_path, CollaboratorHandle, Collaborators, ConvertOutput, ConvertRequest,
    DocumentOptions, RenderError,
};

use crate::error::BuildError;
use crate::manifest::{EntryStatus, Manifest, ManifestEntry};
use crate::staleness;
use crate::writer::{self, WriteResult};

/// Declaration key of an aggregation page. Not inherited.
pub const AGGREGATE_KEY: &str = "aggregate";

const LOCAL_KEYS: [&str; 3] = [AVAILABILITY_KEY, IGNORE_KEY, AGGREGATE_KEY];

/// Result of a single build run.
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// Every file of the tree, flattened with relative names.
    pub manifest: Manifest,
    /// Earliest future availability transition seen during the run.
    pub next_transition: Option<DateTime<Utc>>,
    pub written: usize,
    pub up_to_date: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Subdirectories pruned by a declaration.
    pub pruned: usize,
}

impl BuildReport {
    fn from_manifest(manifest: Manifest, next_transition: Option<DateTime<Utc>>, pruned: usize) -> Self {
        Self {
            written: manifest.count(EntryStatus::Produced),
            up_to_date: manifest.count(EntryStatus::UpToDate),
            skipped: manifest.iter().filter(|e| e.status.is_skipped()).count(),
            failed: manifest.count(EntryStatus::Failed),
            manifest,
            next_transition,
            pruned,
        }
    }
}

/// Aggregation page declared by a directory, resolved on `process`.
#[derive(Debug)]
pub(crate) struct Aggregate {
    template: PathBuf,
    output: String,
}

#[derive(Debug, Default)]
pub(crate) struct DirOutcome {
    aggregate: Option<Aggregate>,
}

/// What happened to one file before it becomes a manifest entry.
struct Produced {
    produced: String,
    destination: PathBuf,
    collaborator: CollaboratorHandle,
    front_matter: ContextMap,
    status: EntryStatus,
}

pub(crate) struct Builder<'a> {
    options: &'a RunOptions,
    collab: &'a Collaborators,
    ctx: ScopedContext,
    /// One manifest per open directory.
    manifests: Vec<Manifest>,
    /// Configuration and fragment files every file below depends on.
    deps: Vec<PathBuf>,
    dep_marks: Vec<usize>,
    next_transition: Option<DateTime<Utc>>,
    pruned: usize,
    finished: Option<Manifest>,
}

impl<'a> Builder<'a> {
    pub(crate) fn new(options: &'a RunOptions, collab: &'a Collaborators) -> Self {
        Self {
            options,
            collab,
            ctx: ScopedContext::new(),
            manifests: Vec::new(),
            deps: Vec::new(),
            dep_marks: Vec::new(),
            next_transition: None,
            pruned: 0,
            finished: None,
        }
    }

    /// Open the root frame with run-level values.
    pub(crate) fn open_run(&mut self) -> Result<(), BuildError> {
        let o = self.options;
        self.ctx.push();
        self.ctx.add([
            ("source_root".to_string(), json!(o.source.display().to_string())),
            (
                "destination_root".to_string(),
                json!(o.destination.display().to_string()),
            ),
            (
                "last_updated".to_string(),
                json!(o.now.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string()),
            ),
            ("ignore_times".to_string(), json!(o.ignore_times)),
            ("force_copy".to_string(), json!(o.force_copy)),
        ])?;
        Ok(())
    }

    pub(crate) fn finish(mut self) -> Result<BuildReport, BuildError> {
        self.ctx.pop()?;
        let manifest = self.finished.take().unwrap_or_default();
        Ok(BuildReport::from_manifest(
            manifest,
            self.next_transition,
            self.pruned,
        ))
    }

    fn note_transition(&mut self, t: Option<DateTime<Utc>>) {
        if let Some(t) = t {
            self.next_transition = Some(self.next_transition.map_or(t, |cur| cur.min(t)));
        }
    }

    fn dest_dir(&self, tree: &DirectoryTree, node: NodeId) -> PathBuf {
        self.options.destination.join(&tree.node(node).rel_path)
    }

    // -------- fragments --------

    /// Build the fragments directory into named values for the parent scope.
    fn fragments(&mut self, tree: &DirectoryTree, frag: NodeId) -> Result<ContextMap, BuildError> {
        let node = tree.node(frag);
        let dir = tree.source_path(frag);
        let mut values = ContextMap::new();

        self.ctx.push();
        self.ctx
            .add(merge_directory_config(&dir, &node.files.config))?;
        self.deps
            .extend(node.files.config.iter().map(|n| dir.join(n)));

        for name in &node.files.markup {
            let path = dir.join(name);
            self.deps.push(path.clone());
            match self
                .collab
                .templates
                .render_file(&path, self.ctx.data(), &[])
            {
                Ok(html) => {
                    values.insert(fragment_key(name, "html"), Value::String(html));
                }
                Err(e) => fragment_failed(&path, &e),
            }
        }

        for name in &node.files.markdown {
            let path = dir.join(name);
            self.deps.push(path.clone());
            let text = match std::fs::read_to_string(&path) {
                Ok(t) => t,
                Err(e) => {
                    tracing::warn!(target: "folio::failed", path = %path.display(), error = %e, "fragment unreadable");
                    continue;
                }
            };
            let (fm, body) = front_matter(&text, &path);
            self.ctx.push();
            self.ctx.add(fm)?;
            let html = DocumentOptions::from_scope(self.ctx.data(), &dir, tree.root()).and_then(|opts| {
                let out = self.collab.document.convert(&ConvertRequest {
                    source: &path,
                    buffer: body,
                    context: self.ctx.data(),
                    options: &opts,
                    output: None,
                })?;
                match (out, &opts.render) {
                    (ConvertOutput::Buffer(html), Some(render)) => self
                        .collab
                        .templates
                        .render_file(render, self.ctx.data(), &[("body", Value::String(html))])
                        .map(ConvertOutput::Buffer),
                    (out, _) => Ok(out),
                }
            });
            self.ctx.pop()?;
            match html {
                Ok(ConvertOutput::Buffer(html)) => {
                    values.insert(fragment_key(name, "md"), Value::String(html));
                }
                Ok(ConvertOutput::File(p)) => {
                    tracing::warn!(target: "folio::failed", path = %path.display(), output = %p.display(), "fragment produced a file, not a buffer");
                }
                Err(e) => fragment_failed(&path, &e),
            }
        }

        self.ctx.pop()?;
        Ok(values)
    }

    // -------- per-file work --------

    fn build_file(
        &mut self,
        tree: &DirectoryTree,
        node: NodeId,
        kind: FileKind,
        name: &str,
    ) -> Result<Produced, BuildError> {
        let src_dir = tree.source_path(node);
        let dest_dir = self.dest_dir(tree, node);
        let source = src_dir.join(name);

        match kind {
            FileKind::Markup => {
                let destination = dest_dir.join(name);
                let result = self.with_staleness(&[source.clone()], &destination, || {
                    let text = std::fs::read_to_string(&source)
                        .map_err(|e| RenderError::Io { path: source.clone(), source: e })?;
                    let html = self.collab.templates.render_str(&text, self.ctx.data(), &[])?;
                    Ok(write_output(&destination, html.as_bytes()))
                });
                Ok(Produced {
                    produced: name.to_string(),
                    destination,
                    collaborator: CollaboratorHandle::Template,
                    front_matter: ContextMap::new(),
                    status: self.settle(&source, result),
                })
            }
            FileKind::Markdown => self.build_markdown(tree, &src_dir, &dest_dir, name),
            FileKind::Notebook => {
                let produced = output_stem(name, "html");
                let destination = dest_dir.join(&produced);
                let result = self.with_staleness(&[source.clone()], &destination, || {
                    let opts = DocumentOptions::default();
                    let out = self.collab.notebook.convert(&ConvertRequest {
                        source: &source,
                        buffer: "",
                        context: self.ctx.data(),
                        options: &opts,
                        output: None,
                    })?;
                    Ok(store_output(out, &destination))
                });
                let status = self.settle(&source, result);
                if status != EntryStatus::Failed {
                    self.copy_alongside(&source, &dest_dir.join(name));
                }
                Ok(Produced {
                    produced,
                    destination,
                    collaborator: CollaboratorHandle::Notebook,
                    front_matter: ContextMap::new(),
                    status,
                })
            }
            FileKind::Other | FileKind::Config => {
                let destination = dest_dir.join(name);
                let status = match writer::copy_file(&source, &destination, self.options.force_copy) {
                    Ok(WriteResult::Written { .. }) => EntryStatus::Produced,
                    Ok(WriteResult::Unchanged { .. }) => EntryStatus::UpToDate,
                    Err(e) => {
                        tracing::warn!(target: "folio::failed", path = %source.display(), error = %e, "copy failed");
                        EntryStatus::Failed
                    }
                };
                Ok(Produced {
                    produced: name.to_string(),
                    destination,
                    collaborator: CollaboratorHandle::Copy,
                    front_matter: ContextMap::new(),
                    status,
                })
            }
        }
    }

    fn build_markdown(
        &mut self,
        tree: &DirectoryTree,
        src_dir: &Path,
        dest_dir: &Path,
        name: &str,
    ) -> Result<Produced, BuildError> {
        let source = src_dir.join(name);
        let text = match std::fs::read_to_string(&source) {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!(target: "folio::failed", path = %source.display(), error = %e, "source unreadable");
                let produced = output_stem(name, "html");
                return Ok(Produced {
                    destination: dest_dir.join(&produced),
                    produced,
                    collaborator: CollaboratorHandle::Document,
                    front_matter: ContextMap::new(),
                    status: EntryStatus::Failed,
                });
            }
        };
        let (fm, body) = front_matter(&text, &source);

        self.ctx.push();
        self.ctx.add(fm.clone())?;
        let options = DocumentOptions::from_scope(self.ctx.data(), src_dir, tree.root());
        let (produced, destination, status, copy_source) = match options {
            Ok(opts) => {
                let produced = opts.output_name(name);
                let destination = dest_dir.join(&produced);
                let mut deps = vec![source.clone()];
                deps.extend(opts.dependencies());
                let result = self.with_staleness(&deps, &destination, || {
                    self.convert_markdown(&source, body, &opts, &destination)
                });
                let status = self.settle(&source, result);
                (produced, destination, status, opts.copy_source)
            }
            Err(e) => {
                tracing::warn!(target: "folio::failed", path = %source.display(), error = %e, "invalid conversion options");
                let produced = output_stem(name, "html");
                (produced.clone(), dest_dir.join(produced), EntryStatus::Failed, false)
            }
        };
        self.ctx.pop()?;

        if copy_source && status != EntryStatus::Failed {
            self.copy_alongside(&source, &dest_dir.join(name));
        }
        Ok(Produced {
            produced,
            destination,
            collaborator: CollaboratorHandle::Document,
            front_matter: fm,
            status,
        })
    }

    fn convert_markdown(
        &self,
        source: &Path,
        body: &str,
        opts: &DocumentOptions,
        destination: &Path,
    ) -> Result<Result<(), BuildError>, RenderError> {
        let snapshot = self.ctx.data();
        let buffer = if opts.preprocess_template {
            self.collab.templates.render_str(body, snapshot, &[])?
        } else {
            body.to_string()
        };

        if !opts.to.is_textual() {
            // Binary output: let the converter write a temporary sibling that
            // keeps the real extension, then move it into place.
            if let Some(parent) = destination.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    return Ok(Err(crate::error::io_err(parent, e)));
                }
            }
            let tmp = destination.with_extension(format!("folio-tmp.{}", opts.to.extension()));
            let out = self
                .collab
                .document
                .convert(&ConvertRequest {
                    source,
                    buffer: &buffer,
                    context: snapshot,
                    options: opts,
                    output: Some(&tmp),
                })
                .map_err(|e| {
                    if tmp.exists() {
                        let _ = std::fs::remove_file(&tmp);
                    }
                    e
                })?;
            return Ok(match out {
                ConvertOutput::File(written) => writer::commit(&written, destination),
                ConvertOutput::Buffer(b) => write_output(destination, b.as_bytes()),
            });
        }

        let out = self.collab.document.convert(&ConvertRequest {
            source,
            buffer: &buffer,
            context: snapshot,
            options: opts,
            output: None,
        })?;
        match (out, &opts.render) {
            (ConvertOutput::Buffer(html), Some(render)) => {
                let page = self
                    .collab
                    .templates
                    .render_file(render, snapshot, &[("body", Value::String(html))])?;
                Ok(write_output(destination, page.as_bytes()))
            }
            (out, _) => Ok(store_output(out, destination)),
        }
    }

    /// Run `produce` only when `destination` is stale against `deps` plus the
    /// directory configuration in scope.
    fn with_staleness<F>(
        &self,
        deps: &[PathBuf],
        destination: &Path,
        produce: F,
    ) -> Option<Result<Result<(), BuildError>, RenderError>>
    where
        F: FnOnce() -> Result<Result<(), BuildError>, RenderError>,
    {
        let mut all = self.deps.clone();
        all.extend_from_slice(deps);
        let signal = staleness::check(&all, destination, self.options.ignore_times);
        if !signal.needs_rebuild() {
            tracing::debug!(path = %destination.display(), "already up to date");
            return None;
        }
        tracing::debug!(path = %destination.display(), signal = ?signal, "rebuilding");
        Some(produce())
    }

    /// Turn a staleness-gated result into an entry status, logging failures.
    fn settle(
        &self,
        source: &Path,
        result: Option<Result<Result<(), BuildError>, RenderError>>,
    ) -> EntryStatus {
        match result {
            None => EntryStatus::UpToDate,
            Some(Ok(Ok(()))) => EntryStatus::Produced,
            Some(Ok(Err(e))) => {
                tracing::warn!(target: "folio::failed", path = %source.display(), error = %e, "write failed");
                EntryStatus::Failed
            }
            Some(Err(e)) => {
                tracing::warn!(target: "folio::failed", path = %source.display(), error = %e, "conversion failed");
                EntryStatus::Failed
            }
        }
    }

    fn copy_alongside(&self, source: &Path, destination: &Path) {
        if let Err(e) = writer::copy_file(source, destination, self.options.force_copy) {
            tracing::warn!(target: "folio::failed", path = %source.display(), error = %e, "source copy failed");
        }
    }

    /// Names a file would produce in the destination, for artifact removal.
    fn planned_outputs(&self, src_dir: &Path, kind: FileKind, name: &str) -> Vec<String> {
        match kind {
            FileKind::Markup | FileKind::Other | FileKind::Config => vec![name.to_string()],
            FileKind::Notebook => vec![output_stem(name, "html"), name.to_string()],
            FileKind::Markdown => {
                let path = src_dir.join(name);
                let fm = std::fs::read_to_string(&path)
                    .map(|text| front_matter(&text, &path).0)
                    .unwrap_or_default();
                let to = fm
                    .get("to")
                    .or_else(|| self.ctx.value("to"))
                    .and_then(Value::as_str)
                    .and_then(|s| s.parse::<folio_render::OutputFormat>().ok())
                    .unwrap_or_default();
                vec![output_stem(name, to.extension()), name.to_string()]
            }
        }
    }

    fn remove_outputs(&self, dest_dir: &Path, names: &[String]) {
        for n in names {
            if let Err(e) = writer::remove_artifact(&dest_dir.join(n)) {
                tracing::warn!(target: "folio::failed", path = %dest_dir.join(n).display(), error = %e, "cannot remove artifact");
            }
        }
    }

    fn aggregate(&self, tree: &DirectoryTree, node: NodeId) -> Option<Aggregate> {
        let decl = self.ctx.value(AGGREGATE_KEY)?;
        let template = decl.get("template").and_then(Value::as_str);
        let output = decl.get("output").and_then(Value::as_str);
        match (template, output) {
            (Some(t), Some(o)) if !o.contains(['/', '\\']) => Some(Aggregate {
                template: resolve_path(t, &tree.source_path(node), tree.root()),
                output: o.to_string(),
            }),
            _ => {
                tracing::warn!(target: "folio::policy", dir = %tree.node(node).rel_path.display(), "malformed aggregate declaration dropped");
                None
            }
        }
    }
}

impl TreeVisitor for Builder<'_> {
    type Error = BuildError;
    type Outcome = DirOutcome;

    fn enter(&mut self, tree: &DirectoryTree, node: NodeId) -> Result<(), BuildError> {
        let rel = &tree.node(node).rel_path;
        let depth = rel.components().count();
        let rel_root = if depth == 0 {
            ".".to_string()
        } else {
            vec![".."; depth].join("/")
        };
        let rel_dir = if depth == 0 {
            ".".to_string()
        } else {
            rel.to_string_lossy().replace('\\', "/")
        };

        self.ctx.push();
        self.ctx.remove(LOCAL_KEYS)?;
        self.ctx.add([
            ("rel_root".to_string(), Value::String(rel_root)),
            ("rel_dir".to_string(), Value::String(rel_dir)),
        ])?;
        self.manifests.push(Manifest::new());
        self.dep_marks.push(self.deps.len());
        Ok(())
    }

    fn process(&mut self, tree: &DirectoryTree, node: NodeId) -> Result<Visit<DirOutcome>, BuildError> {
        let dir = tree.node(node);
        let src_dir = tree.source_path(node);
        let dest_dir = self.dest_dir(tree, node);
        let now = self.options.now;

        self.ctx
            .add(merge_directory_config(&src_dir, &dir.files.config))?;
        self.deps
            .extend(dir.files.config.iter().map(|n| src_dir.join(n)));

        if let Some(frag) = dir.fragments {
            let values = self.fragments(tree, frag)?;
            self.ctx.add(values)?;
        }

        let policy = DirectoryPolicy::from_declarations(
            self.ctx.value(AVAILABILITY_KEY),
            self.ctx.value(IGNORE_KEY),
            |name| dir.has_child(tree, name),
        );
        self.note_transition(policy.next_transition(now));

        if let Err(e) = std::fs::create_dir_all(&dest_dir) {
            tracing::warn!(target: "folio::failed", path = %dest_dir.display(), error = %e, "cannot create destination directory");
        }

        let mut visit = Visit::new(DirOutcome {
            aggregate: self.aggregate(tree, node),
        });

        for child in &dir.children {
            let name = &tree.node(*child).name;
            let verdict = policy.verdict(name, now);
            if verdict == Verdict::Produce {
                continue;
            }
            log_verdict(verdict, &tree.node(*child).rel_path, "directory");
            self.remove_outputs(&dest_dir, std::slice::from_ref(name));
            visit.skip.insert(*child);
        }

        for (kind, name) in dir.files.iter() {
            if kind == FileKind::Config {
                continue;
            }
            let verdict = policy.verdict(name, now);
            let entry = if verdict == Verdict::Produce {
                self.build_file(tree, node, kind, name)?
            } else {
                log_verdict(verdict, &src_dir.join(name), "file");
                let outputs = self.planned_outputs(&src_dir, kind, name);
                self.remove_outputs(&dest_dir, &outputs);
                Produced {
                    produced: outputs[0].clone(),
                    destination: dest_dir.join(&outputs[0]),
                    collaborator: handle_for(kind),
                    front_matter: ContextMap::new(),
                    status: if verdict == Verdict::Ignored {
                        EntryStatus::Ignored
                    } else {
                        EntryStatus::Unavailable
                    },
                }
            };
            let manifest = self
                .manifests
                .last_mut()
                .ok_or(BuildError::Scope(folio_core::ScopeError::NoOpenScope))?;
            manifest.push(ManifestEntry {
                source_filename: name.to_string(),
                produced_filename: entry.produced,
                source_path: src_dir.join(name),
                destination_path: entry.destination,
                is_available: verdict != Verdict::Unavailable,
                is_ignored: verdict == Verdict::Ignored,
                kind,
                collaborator: entry.collaborator,
                front_matter: entry.front_matter,
                status: entry.status,
            });
        }

        Ok(visit)
    }

    fn skipped(&mut self, _tree: &DirectoryTree, _node: NodeId) {
        self.pruned += 1;
    }

    fn leave(&mut self, tree: &DirectoryTree, node: NodeId, outcome: DirOutcome) -> Result<(), BuildError> {
        let mut manifest = self
            .manifests
            .pop()
            .ok_or(BuildError::Scope(folio_core::ScopeError::NoOpenScope))?;

        if let Some(agg) = outcome.aggregate {
            let destination = self.dest_dir(tree, node).join(&agg.output);
            let listing = serde_json::to_value(&manifest).unwrap_or(Value::Null);
            let status = match self
                .collab
                .templates
                .render_file(&agg.template, self.ctx.data(), &[("manifest", listing)])
            {
                Ok(page) => match writer::write_if_changed(&destination, page.as_bytes()) {
                    Ok(WriteResult::Written { .. }) => EntryStatus::Produced,
                    Ok(WriteResult::Unchanged { .. }) => EntryStatus::UpToDate,
                    Err(e) => {
                        tracing::warn!(target: "folio::failed", path = %destination.display(), error = %e, "aggregation write failed");
                        EntryStatus::Failed
                    }
                },
                Err(e) => {
                    tracing::warn!(target: "folio::failed", template = %agg.template.display(), error = %e, "aggregation failed");
                    EntryStatus::Failed
                }
            };
            let source_filename = agg
                .template
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            manifest.push(ManifestEntry {
                source_filename,
                produced_filename: agg.output.clone(),
                source_path: agg.template,
                destination_path: destination,
                is_available: true,
                is_ignored: false,
                kind: FileKind::Markup,
                collaborator: CollaboratorHandle::Template,
                front_matter: ContextMap::new(),
                status,
            });
        }

        match self.manifests.last_mut() {
            Some(parent) => parent.splice(&tree.node(node).name, manifest),
            None => self.finished = Some(manifest),
        }
        if let Some(mark) = self.dep_marks.pop() {
            self.deps.truncate(mark);
        }
        self.ctx.pop()?;
        Ok(())
    }
}

// -------- helpers --------

fn front_matter<'t>(text: &'t str, path: &Path) -> (ContextMap, &'t str) {
    match split_front_matter(text) {
        (Some(yaml), body) => match parse_yaml_map(yaml, path) {
            Ok(map) => (map, body),
            Err(e) => {
                tracing::warn!(target: "folio::load", error = %e, "front matter ignored");
                (ContextMap::new(), body)
            }
        },
        (None, body) => (ContextMap::new(), body),
    }
}

fn write_output(destination: &Path, bytes: &[u8]) -> Result<(), BuildError> {
    writer::write_atomic(destination, bytes).map(|_| ())
}

fn store_output(out: ConvertOutput, destination: &Path) -> Result<(), BuildError> {
    match out {
        ConvertOutput::Buffer(b) => write_output(destination, b.as_bytes()),
        ConvertOutput::File(p) if p == destination => Ok(()),
        ConvertOutput::File(p) => writer::commit(&p, destination),
    }
}

fn output_stem(name: &str, ext: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| name.to_string());
    format!("{stem}.{ext}")
}

/// `nav-bar.html` becomes `nav_bar_html`.
fn fragment_key(name: &str, suffix: &str) -> String {
    let stem = Path::new(name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ident: String = stem
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{ident}_{suffix}")
}

fn fragment_failed(path: &Path, e: &RenderError) {
    tracing::warn!(target: "folio::failed", path = %path.display(), error = %e, "fragment failed");
}

fn handle_for(kind: FileKind) -> CollaboratorHandle {
    match kind {
        FileKind::Markup => CollaboratorHandle::Template,
        FileKind::Markdown => CollaboratorHandle::Document,
        FileKind::Notebook => CollaboratorHandle::Notebook,
        FileKind::Other | FileKind::Config => CollaboratorHandle::Copy,
    }
}

fn log_verdict(verdict: Verdict, path: &Path, what: &str) {
    match verdict {
        Verdict::Ignored => {
            tracing::info!(target: "folio::ignored", path = %path.display(), what, "ignored")
        }
        Verdict::Unavailable => {
            tracing::info!(target: "folio::unavailable", path = %path.display(), what, "unavailable")
        }
        Verdict::Produce => {}
    }
}
