use tracing::{debug, warn};

use crate::extraction::{AntlrJavaExtractor, FunctionExtractor, SrcmlJavaExtractor};
use crate::tree::Node;
use crate::types::{Diagnostic, SplitResult};

/// Splits a whole-file tree into functions using one backend extractor.
///
/// A function that fails to extract is logged, recorded as a diagnostic and
/// skipped; it never stops extraction of its siblings.
#[derive(Debug, Clone, Default)]
pub struct FunctionSplitter<E> {
    extractor: E,
}

impl<E: FunctionExtractor> FunctionSplitter<E> {
    pub fn new(extractor: E) -> Self {
        Self { extractor }
    }

    /// Extracts every function under `root`, in pre-order of their root nodes.
    pub fn split<'t>(&self, root: Node<'t>, file_path: &str) -> SplitResult<'t> {
        let function_label = self.extractor.function_root();
        let mut result = SplitResult::default();
        let mut dropped = 0usize;

        for candidate in root
            .pre_order()
            .filter(|n| n.has_last_label(function_label))
        {
            match self
                .extractor
                .extract(candidate, file_path, &mut result.diagnostics)
            {
                Ok(info) => result.functions.push(info),
                Err(e) => {
                    dropped += 1;
                    let function = candidate
                        .first_child_of_label(self.extractor.name_label())
                        .and_then(|n| n.token().ok());
                    warn!(
                        backend = self.extractor.backend_name(),
                        file = file_path,
                        function = function.unwrap_or("<anonymous>"),
                        "skipping function: {e}"
                    );
                    result
                        .diagnostics
                        .push(Diagnostic::from_error(&e, file_path, function));
                }
            }
        }

        debug!(
            file = file_path,
            functions = result.functions.len(),
            dropped,
            "split file into functions"
        );
        result
    }
}

impl FunctionSplitter<AntlrJavaExtractor> {
    pub fn antlr_java() -> Self {
        Self::new(AntlrJavaExtractor)
    }
}

impl FunctionSplitter<SrcmlJavaExtractor> {
    pub fn srcml_java() -> Self {
        Self::new(SrcmlJavaExtractor)
    }
}
