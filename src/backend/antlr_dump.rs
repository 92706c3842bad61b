use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::backend::{HandlerFactory, Language, LanguageHandler, ParsedFile, ParserFamily};
use crate::errors::{MinerError, Result};
use crate::extraction::AntlrJavaExtractor;
use crate::tree::{RawNode, Tree};

/// Suffix appended to a source path to locate its serialized ANTLR parse tree.
pub const ANTLR_DUMP_SUFFIX: &str = ".antlr.json";

/// Returns the location of the parse-tree dump for `source`
/// (`Foo.java` → `Foo.java.antlr.json`).
pub fn dump_path_for(source: &Path) -> PathBuf {
    let mut os: OsString = source.as_os_str().to_owned();
    os.push(ANTLR_DUMP_SUFFIX);
    PathBuf::from(os)
}

/// Deserializes a dump of arbitrary depth.
///
/// Each tree level nests two JSON values, so serde_json's default recursion
/// limit would reject ordinary expression chains; the stack grows on demand instead.
fn parse_dump(contents: &str) -> serde_json::Result<RawNode> {
    let mut json = serde_json::Deserializer::from_str(contents);
    json.disable_recursion_limit();
    let raw = RawNode::deserialize(serde_stacker::Deserializer::new(&mut json))?;
    json.end()?;
    Ok(raw)
}

/// Loads ANTLR Java parse trees that an external parser serialized as JSON
/// [`RawNode`]s next to each source file.
#[derive(Debug, Clone, Copy, Default)]
pub struct AntlrJavaDumpFactory;

impl AntlrJavaDumpFactory {
    /// Reads and validates the dump belonging to `source`.
    pub fn load_tree(source: &Path) -> Result<Tree> {
        let dump = dump_path_for(source);
        let contents = fs::read_to_string(&dump).map_err(|e| MinerError::File {
            message: format!("failed to read parse tree dump: {e}"),
            path: dump.display().to_string(),
        })?;
        let raw = parse_dump(&contents).map_err(|e| MinerError::Parse {
            message: format!("invalid parse tree dump: {e}"),
            path: dump.display().to_string(),
        })?;
        let tree = Tree::from_raw(&raw)?;
        debug!(path = %dump.display(), nodes = tree.len(), "loaded ANTLR parse tree");
        Ok(tree)
    }
}

impl HandlerFactory for AntlrJavaDumpFactory {
    fn language(&self) -> Language {
        Language::Java
    }

    fn parser(&self) -> ParserFamily {
        ParserFamily::Antlr
    }

    fn create_handler(&self, path: &Path) -> Result<Box<dyn LanguageHandler>> {
        let tree = Self::load_tree(path)?;
        Ok(Box::new(ParsedFile::new(
            tree,
            path.display().to_string(),
            AntlrJavaExtractor,
        )))
    }
}
