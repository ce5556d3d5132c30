//! # folio-render
//!
//! Collaborators the build orchestrator dispatches to: tera template
//! expansion for static markup, and external converters for markdown and
//! notebooks.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use folio_core::ContextMap;
//! use folio_render::Collaborators;
//!
//! fn expand(page: &str, scope: &ContextMap) {
//!     let collab = Collaborators::external();
//!     if let Ok(html) = collab.templates.render_str(page, scope, &[]) {
//!         println!("{} bytes", html.len());
//!     }
//! }
//! ```

pub mod context;
pub mod convert;
pub mod engine;
pub mod error;
pub mod options;

pub use convert::{
    CollaboratorHandle, ConvertOutput, ConvertRequest, DocumentConverter, NotebookConverter,
    PandocConverter,
};
pub use engine::TemplateEngine;
pub use error::RenderError;
pub use options::{resolve_path, DocumentOptions, OutputFormat};

/// The full set of collaborators for one build.
pub struct Collaborators {
    pub templates: TemplateEngine,
    pub document: Box<dyn DocumentConverter>,
    pub notebook: Box<dyn DocumentConverter>,
}

impl Collaborators {
    /// pandoc for markdown, `jupyter nbconvert` for notebooks.
    pub fn external() -> Self {
        Self {
            templates: TemplateEngine::new(),
            document: Box::new(PandocConverter::default()),
            notebook: Box::new(NotebookConverter::default()),
        }
    }

    pub fn new(document: Box<dyn DocumentConverter>, notebook: Box<dyn DocumentConverter>) -> Self {
        Self {
            templates: TemplateEngine::new(),
            document,
            notebook,
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("document", &self.document.name())
            .field("notebook", &self.notebook.name())
            .finish()
    }
}
