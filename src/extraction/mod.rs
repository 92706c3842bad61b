//! Structural function extraction from backend parse trees.
//!
//! Each backend contributes a label vocabulary and an extractor that turns a
//! function-root node into a [`FunctionInfo`]. Shared code (the splitter and
//! the pipeline) depends only on the [`FunctionExtractor`] trait.

mod antlr_java;
mod splitter;
mod srcml_java;

pub use antlr_java::{AntlrJavaExtractor, AntlrLabel};
pub use splitter::FunctionSplitter;
pub use srcml_java::{SrcmlJavaExtractor, SrcmlLabel};

use crate::errors::Result;
use crate::tree::{BackendLabel, Node};
use crate::types::{Diagnostic, FunctionInfo};

/// Trait for backend-specific function extractors.
///
/// Implementations read only their own label vocabulary and report
/// recoverable omissions through `diagnostics`. A returned error means the
/// function could not be extracted at all.
pub trait FunctionExtractor {
    /// Closed label set this backend's trees use.
    type Label: BackendLabel;

    /// Human-readable backend name, used in logs.
    fn backend_name(&self) -> &str;

    /// Label (last segment) marking a function definition.
    fn function_root(&self) -> Self::Label;

    /// Label of the direct child holding a function's simple name.
    fn name_label(&self) -> Self::Label;

    /// Extract a function from `root`, a node carrying [`Self::function_root`].
    fn extract<'t>(
        &self,
        root: Node<'t>,
        file_path: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<FunctionInfo<'t>>;
}
