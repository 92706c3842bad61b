//! Parser backends producing [`Tree`]s for the extraction pipeline.
//!
//! A [`HandlerFactory`] turns one source file into a [`LanguageHandler`],
//! which owns the parsed tree and knows how to split it into functions with
//! the extractor matching its label vocabulary.

mod antlr_dump;
mod tree_sitter_java;

pub use antlr_dump::{dump_path_for, AntlrJavaDumpFactory, ANTLR_DUMP_SUFFIX};
pub use tree_sitter_java::TreeSitterSrcmlFactory;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::extraction::{FunctionExtractor, FunctionSplitter};
use crate::tree::{Node, Tree};
use crate::types::SplitResult;

/// Source languages the pipeline can process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Java => "java",
        }
    }

    /// File extension (without leading dot) of source files in this language.
    pub fn file_extension(&self) -> &'static str {
        match self {
            Language::Java => "java",
        }
    }
}

/// Parser technology, each producing its own tree shape and label vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParserFamily {
    /// Grammar-rule-labeled parse trees (ANTLR), ingested as JSON dumps.
    Antlr,
    /// srcML-shaped structural trees, built from tree-sitter.
    Srcml,
}

impl ParserFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParserFamily::Antlr => "antlr",
            ParserFamily::Srcml => "srcml",
        }
    }
}

/// One parsed source file.
pub trait LanguageHandler {
    /// Path of the source file the tree was built from.
    fn file_path(&self) -> &str;

    /// Root of the whole-file tree.
    fn root(&self) -> Node<'_>;

    /// Extracts every function of the file.
    fn split_into_functions(&self) -> SplitResult<'_>;
}

/// A parsed file paired with the splitter for its backend.
pub struct ParsedFile<E> {
    tree: Tree,
    file_path: String,
    splitter: FunctionSplitter<E>,
}

impl<E: FunctionExtractor> ParsedFile<E> {
    pub fn new(tree: Tree, file_path: impl Into<String>, extractor: E) -> Self {
        Self {
            tree,
            file_path: file_path.into(),
            splitter: FunctionSplitter::new(extractor),
        }
    }
}

impl<E: FunctionExtractor> LanguageHandler for ParsedFile<E> {
    fn file_path(&self) -> &str {
        &self.file_path
    }

    fn root(&self) -> Node<'_> {
        self.tree.root()
    }

    fn split_into_functions(&self) -> SplitResult<'_> {
        self.splitter.split(self.tree.root(), &self.file_path)
    }
}

/// Produces a [`LanguageHandler`] per source file.
pub trait HandlerFactory {
    fn language(&self) -> Language;

    fn parser(&self) -> ParserFamily;

    /// Parses `path` into a handler. Errors are scoped to this one file.
    fn create_handler(&self, path: &Path) -> Result<Box<dyn LanguageHandler>>;
}

/// Returns the handler factory for a language and parser family.
pub fn get_handler_factory(language: Language, parser: ParserFamily) -> Box<dyn HandlerFactory> {
    match (language, parser) {
        (Language::Java, ParserFamily::Antlr) => Box::new(AntlrJavaDumpFactory),
        (Language::Java, ParserFamily::Srcml) => Box::new(TreeSitterSrcmlFactory),
    }
}
