//! Compiler from VKML rendering-pipeline documents to a resolved [`Layout`].
//!
//! A VKML document is a UTF-8 XML file rooted at an `Engine` element that
//! describes a GPU rendering pipeline: devices, queues, memory objects,
//! render passes, pipelines, recorded command lists and, optionally, an XR
//! session. [`Compiler::compile`] turns it into a fully linked, strongly
//! typed in-memory graph in two phases:
//!
//! 1. **Build**: an iterative walk over the XML DOM dispatches every
//!    element to its per-kind parser, which constructs the node, attaches
//!    it to its structural parent and records cross-references as raw id
//!    strings.
//! 2. **Resolve**: a second pass over every collection replaces id strings
//!    with typed handles and computes derived indices (attachment and
//!    subpass positions, defaulted counts and copy sizes).
//!
//! The produced [`Layout`] is handed to a backend factory (see
//! [`Backend`]), which allocates native GPU resources for nodes whose
//! `realize` flag is set and stores them in each node's `instance` slot.
//! This crate performs no GPU work itself.

mod document;
mod parse;
mod resolve;
pub mod types;

use std::path::Path;

use thiserror::Error;

pub use document::{
    AnyHandle, AnyRef, Handle, Layout, NodeBase, NodeKind, NodeType, Nodes, Pool, Ref,
};
pub use types::*;
pub use vkml_expr::{Evaluator, ExprError};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown element <{0}>")]
    UnknownElement(String),

    #[error("missing required attribute '{attr}' on <{element}>")]
    MissingAttribute {
        element: String,
        attr: &'static str,
    },

    #[error("invalid value '{value}' for attribute '{attr}' on <{element}>")]
    InvalidAttribute {
        element: String,
        attr: &'static str,
        value: String,
    },

    #[error("expression error in attribute '{attr}' on <{element}>: {source}")]
    Expression {
        element: String,
        attr: &'static str,
        #[source]
        source: ExprError,
    },

    #[error("invalid document structure: {0}")]
    InvalidStructure(String),

    #[error("duplicate id '{id}' (used by {first} and {second})")]
    DuplicateId {
        id: String,
        first: NodeKind,
        second: NodeKind,
    },

    #[error("duplicate <{0}> element; at most one is allowed per document")]
    DuplicateSingleton(NodeKind),

    #[error("unresolved reference '{id}' in field '{field}' of {node}")]
    UnresolvedReference {
        id: String,
        node: String,
        field: &'static str,
    },

    #[error("reference '{id}' in field '{field}' of {node} is a {found}, expected {expected}")]
    WrongNodeKind {
        id: String,
        node: String,
        field: &'static str,
        expected: &'static str,
        found: NodeKind,
    },
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// Feature flags that gate which tag set the dispatcher recognizes.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Recognize the XR extension tags (Reality, Session, ...).
    pub reality: bool,
}

/// One compiler instance per document stream. Holds the expression
/// evaluator, whose constant table is reset at the start of every compile;
/// a single instance must not be shared across threads without external
/// serialization.
pub struct Compiler {
    evaluator: Evaluator,
    options: CompileOptions,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}

impl Compiler {
    pub fn new() -> Self {
        Self::with_options(CompileOptions::default())
    }

    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            evaluator: Evaluator::new(),
            options,
        }
    }

    /// Compile a VKML document into a resolved [`Layout`].
    pub fn compile(&mut self, xml: &str) -> Result<Layout> {
        self.evaluator.reset();

        let doc = roxmltree::Document::parse(xml)?;
        let root = doc.root_element();
        if root.tag_name().name() != "Engine" {
            return Err(LayoutError::InvalidStructure(format!(
                "expected root element <Engine>, found <{}>",
                root.tag_name().name()
            )));
        }

        let mut layout = Layout::default();
        {
            let mut builder = parse::Builder {
                layout: &mut layout,
                evaluator: &mut self.evaluator,
                options: &self.options,
            };
            parse::walk(&mut builder, root)?;
        }
        log::debug!("built {} nodes, resolving references", layout.nodes.total());

        resolve::resolve(&mut layout)?;
        Ok(layout)
    }

    /// Read a document from disk and compile it.
    pub fn compile_file(&mut self, path: impl AsRef<Path>) -> Result<Layout> {
        let xml = std::fs::read_to_string(path)?;
        self.compile(&xml)
    }
}

/// Compile with default options.
pub fn compile(xml: &str) -> Result<Layout> {
    Compiler::new().compile(xml)
}

/// Factory boundary: realizes a resolved [`Layout`] into native GPU
/// objects. Implementations fill each realized node's `instance` slot;
/// that slot is the only Layout field written after resolution.
pub trait Backend {
    type Error;

    fn create_renderer(
        &mut self,
        layout: &mut Layout,
    ) -> std::result::Result<Handle<Renderer>, Self::Error>;
}
