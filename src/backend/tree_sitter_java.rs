//! Tree-sitter based Java backend producing srcML-shaped trees.
//!
//! Parses Java source with tree-sitter and rebuilds the concrete syntax tree
//! in the structural vocabulary read by [`SrcmlJavaExtractor`]: declarations
//! become `class`/`enum`/`function` nodes, each with separate `name`, `type`
//! and `block` children, and parameters become `parameter/decl` pairs.

use std::fs;
use std::path::Path;

use tree_sitter::{Node as TsNode, Parser};

use crate::backend::{HandlerFactory, Language, LanguageHandler, ParsedFile, ParserFamily};
use crate::errors::{MinerError, Result};
use crate::extraction::{SrcmlJavaExtractor, SrcmlLabel};
use crate::tree::{BackendLabel, Tree, TreeBuilder};

/// Structural kinds emitted by the converter that the extractor does not dispatch on.
const UNIT: &str = "unit";
const INTERFACE: &str = "interface";
const CONSTRUCTOR: &str = "constructor";
const PARAMETER_LIST: &str = "parameter_list";

/// Builds srcML-shaped trees from Java source using tree-sitter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterSrcmlFactory;

impl TreeSitterSrcmlFactory {
    /// Parse Java `source` into a srcML-shaped [`Tree`].
    ///
    /// `file_path` is only used for error context.
    pub fn parse_source(file_path: &str, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| MinerError::Parse {
                message: format!("failed to load Java grammar: {e}"),
                path: file_path.to_string(),
            })?;
        let ts_tree = parser.parse(source, None).ok_or_else(|| MinerError::Parse {
            message: "tree-sitter parse returned None".to_string(),
            path: file_path.to_string(),
        })?;

        let mut converter = SrcmlConverter {
            source: source.as_bytes(),
            builder: TreeBuilder::new(),
        };
        let unit = converter.builder.push(None, UNIT, None)?;
        converter.visit_children(ts_tree.root_node(), unit)?;
        converter.seal(unit, "");
        converter.builder.finish()
    }
}

impl HandlerFactory for TreeSitterSrcmlFactory {
    fn language(&self) -> Language {
        Language::Java
    }

    fn parser(&self) -> ParserFamily {
        ParserFamily::Srcml
    }

    fn create_handler(&self, path: &Path) -> Result<Box<dyn LanguageHandler>> {
        let file_path = path.display().to_string();
        let source = fs::read_to_string(path).map_err(|e| MinerError::File {
            message: format!("failed to read source: {e}"),
            path: file_path.clone(),
        })?;
        let tree = Self::parse_source(&file_path, &source)?;
        Ok(Box::new(ParsedFile::new(tree, file_path, SrcmlJavaExtractor)))
    }
}

/// Internal state used while rebuilding the tree.
struct SrcmlConverter<'s> {
    source: &'s [u8],
    builder: TreeBuilder,
}

impl SrcmlConverter<'_> {
    fn text(&self, node: TsNode<'_>) -> String {
        node.utf8_text(self.source).unwrap_or("").to_string()
    }

    fn push(&mut self, parent: usize, label: SrcmlLabel) -> Result<usize> {
        self.builder.push(Some(parent), label.as_str(), None)
    }

    fn push_leaf(&mut self, parent: usize, label: &str, token: String) -> Result<usize> {
        self.builder.push(Some(parent), label, Some(token))
    }

    /// Turns a container that received no children into a leaf carrying `text`.
    fn seal(&mut self, id: usize, text: &str) {
        if !self.builder.has_children(id) {
            self.builder.set_token(id, text);
        }
    }

    fn visit_children(&mut self, node: TsNode<'_>, parent: usize) -> Result<()> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child, parent)?;
        }
        Ok(())
    }

    /// Visit a single syntax node, dispatching on its kind.
    fn visit(&mut self, node: TsNode<'_>, parent: usize) -> Result<()> {
        match node.kind() {
            "method_declaration" => self.visit_method(node, parent),
            "class_declaration" | "record_declaration" => {
                self.visit_declaration(node, parent, SrcmlLabel::Class.as_str())
            }
            "enum_declaration" => self.visit_declaration(node, parent, SrcmlLabel::Enum.as_str()),
            "interface_declaration" => self.visit_declaration(node, parent, INTERFACE),
            "constructor_declaration" => self.visit_declaration(node, parent, CONSTRUCTOR),
            // Bodies of declarations are consumed above, so a class body reached
            // here belongs to an anonymous class or an enum constant.
            "class_body" => {
                let class = self.push(parent, SrcmlLabel::Class)?;
                self.visit_body(node, class)
            }
            _ => self.visit_children(node, parent),
        }
    }

    /// Class-like declaration: `label { name, block }`.
    fn visit_declaration(&mut self, node: TsNode<'_>, parent: usize, label: &str) -> Result<()> {
        let id = self.builder.push(Some(parent), label, None)?;
        if let Some(name) = node.child_by_field_name("name") {
            let text = self.text(name);
            self.push_leaf(id, SrcmlLabel::Name.as_str(), text)?;
        }
        match node.child_by_field_name("body") {
            Some(body) => self.visit_body(body, id),
            None => {
                let text = self.text(node);
                self.seal(id, &text);
                Ok(())
            }
        }
    }

    fn visit_body(&mut self, body: TsNode<'_>, parent: usize) -> Result<()> {
        let block = self.push(parent, SrcmlLabel::Block)?;
        self.visit_children(body, block)?;
        let text = self.text(body);
        self.seal(block, &text);
        Ok(())
    }

    fn visit_method(&mut self, node: TsNode<'_>, parent: usize) -> Result<()> {
        let function = self.push(parent, SrcmlLabel::Function)?;
        let modifiers = Self::modifiers_of(node);

        if let Some(modifiers) = modifiers {
            self.push_annotations(modifiers, function)?;
        }

        let type_id = self.push(function, SrcmlLabel::Type)?;
        if let Some(modifiers) = modifiers {
            self.push_specifiers(modifiers, type_id)?;
        }
        // Legacy `int grid()[]` puts the array dimensions after the parameters.
        let extra_dims = node
            .child_by_field_name("dimensions")
            .map(Self::count_dimensions)
            .unwrap_or(0);
        if let Some(ty) = node.child_by_field_name("type") {
            self.push_type_name(ty, type_id, extra_dims)?;
        }
        self.seal(type_id, "");

        if let Some(name) = node.child_by_field_name("name") {
            let text = self.text(name);
            self.push_leaf(function, SrcmlLabel::Name.as_str(), text)?;
        }

        if let Some(params) = node.child_by_field_name("parameters") {
            let list = self.builder.push(Some(function), PARAMETER_LIST, None)?;
            let mut cursor = params.walk();
            for param in params.named_children(&mut cursor) {
                if matches!(param.kind(), "formal_parameter" | "spread_parameter") {
                    self.visit_parameter(param, list)?;
                }
            }
            let text = self.text(params);
            self.seal(list, &text);
        }

        if let Some(body) = node.child_by_field_name("body") {
            if body.kind() == "block" {
                self.visit_body(body, function)?;
            }
        }
        Ok(())
    }

    /// `parameter { decl { type { specifier*, name }, name } }`
    fn visit_parameter(&mut self, node: TsNode<'_>, list: usize) -> Result<()> {
        let parameter = self.push(list, SrcmlLabel::Parameter)?;
        let decl = self.push(parameter, SrcmlLabel::Decl)?;
        let type_id = self.push(decl, SrcmlLabel::Type)?;
        if let Some(modifiers) = Self::modifiers_of(node) {
            self.push_specifiers(modifiers, type_id)?;
        }

        let mut name = None;
        if node.kind() == "spread_parameter" {
            let mut type_pushed = false;
            let mut cursor = node.walk();
            for child in node.named_children(&mut cursor) {
                match child.kind() {
                    "modifiers" => {}
                    "variable_declarator" => name = child.child_by_field_name("name"),
                    _ if !type_pushed => {
                        let text = format!("{}...", self.text(child));
                        self.push_leaf(type_id, SrcmlLabel::Name.as_str(), text)?;
                        type_pushed = true;
                    }
                    _ => {}
                }
            }
        } else {
            name = node.child_by_field_name("name");
            let extra_dims = node
                .child_by_field_name("dimensions")
                .map(Self::count_dimensions)
                .unwrap_or(0);
            if let Some(ty) = node.child_by_field_name("type") {
                self.push_type_name(ty, type_id, extra_dims)?;
            }
        }
        self.seal(type_id, "");

        if let Some(name) = name {
            let text = self.text(name);
            self.push_leaf(decl, SrcmlLabel::Name.as_str(), text)?;
        }
        Ok(())
    }

    /// Emits the `name` subtree of a type, with one `index` per array dimension.
    fn push_type_name(&mut self, ty: TsNode<'_>, type_id: usize, extra_dims: usize) -> Result<()> {
        let (element, dims) = if ty.kind() == "array_type" {
            let element = ty.child_by_field_name("element").unwrap_or(ty);
            let dims = ty
                .child_by_field_name("dimensions")
                .map(Self::count_dimensions)
                .unwrap_or(0);
            (element, dims)
        } else {
            (ty, 0)
        };
        let dims = dims + extra_dims;
        let element_text = self.text(element);

        if dims == 0 {
            self.push_leaf(type_id, SrcmlLabel::Name.as_str(), element_text)?;
            return Ok(());
        }
        let name = self.push(type_id, SrcmlLabel::Name)?;
        self.push_leaf(name, SrcmlLabel::Name.as_str(), element_text)?;
        for _ in 0..dims {
            self.push_leaf(name, SrcmlLabel::Index.as_str(), "[]".to_string())?;
        }
        Ok(())
    }

    fn push_annotations(&mut self, modifiers: TsNode<'_>, function: usize) -> Result<()> {
        let mut cursor = modifiers.walk();
        for child in modifiers.named_children(&mut cursor) {
            if !matches!(child.kind(), "marker_annotation" | "annotation") {
                continue;
            }
            let annotation = self.push(function, SrcmlLabel::Annotation)?;
            if let Some(name) = child.child_by_field_name("name") {
                let text = self.text(name);
                self.push_leaf(annotation, SrcmlLabel::Name.as_str(), text)?;
            }
            let text = self.text(child);
            self.seal(annotation, &text);
        }
        Ok(())
    }

    /// Keyword modifiers (`public`, `static`, `final`, ...) become `specifier` leaves.
    fn push_specifiers(&mut self, modifiers: TsNode<'_>, type_id: usize) -> Result<()> {
        let mut cursor = modifiers.walk();
        for child in modifiers.children(&mut cursor) {
            if !child.is_named() {
                let text = self.text(child);
                self.push_leaf(type_id, SrcmlLabel::Specifier.as_str(), text)?;
            }
        }
        Ok(())
    }

    fn modifiers_of(node: TsNode<'_>) -> Option<TsNode<'_>> {
        let mut cursor = node.walk();
        let found = node
            .children(&mut cursor)
            .find(|c| c.kind() == "modifiers");
        found
    }

    fn count_dimensions(dimensions: TsNode<'_>) -> usize {
        let mut cursor = dimensions.walk();
        let count = dimensions
            .children(&mut cursor)
            .filter(|c| c.kind() == "[")
            .count();
        count
    }
}
