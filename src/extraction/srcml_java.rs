//! Function extraction for srcML-shaped structural trees.
//!
//! In this shape the type, name and body of a declaration are separate child
//! kinds, and type text lives in `name` leaves below a `type` node.

use tracing::warn;

use crate::errors::{MinerError, Result};
use crate::extraction::FunctionExtractor;
use crate::tree::{BackendLabel, Node};
use crate::types::{
    Diagnostic, DiagnosticKind, EnclosingElement, EnclosingKind, FunctionInfo, Parameter,
};

/// Structural kinds of the srcML vocabulary used by the extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SrcmlLabel {
    Function,
    Name,
    Type,
    Parameter,
    Decl,
    Index,
    Annotation,
    Specifier,
    Block,
    Class,
    Enum,
}

impl BackendLabel for SrcmlLabel {
    const ALL: &'static [Self] = &[
        SrcmlLabel::Function,
        SrcmlLabel::Name,
        SrcmlLabel::Type,
        SrcmlLabel::Parameter,
        SrcmlLabel::Decl,
        SrcmlLabel::Index,
        SrcmlLabel::Annotation,
        SrcmlLabel::Specifier,
        SrcmlLabel::Block,
        SrcmlLabel::Class,
        SrcmlLabel::Enum,
    ];

    fn as_str(self) -> &'static str {
        match self {
            SrcmlLabel::Function => "function",
            SrcmlLabel::Name => "name",
            SrcmlLabel::Type => "type",
            SrcmlLabel::Parameter => "parameter",
            SrcmlLabel::Decl => "decl",
            SrcmlLabel::Index => "index",
            SrcmlLabel::Annotation => "annotation",
            SrcmlLabel::Specifier => "specifier",
            SrcmlLabel::Block => "block",
            SrcmlLabel::Class => "class",
            SrcmlLabel::Enum => "enum",
        }
    }
}

/// Extracts [`FunctionInfo`] from `function` nodes of a srcML-shaped tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct SrcmlJavaExtractor;

/// Per-call context, so warnings and diagnostics name the file and function.
struct Context<'a> {
    file_path: &'a str,
    function: Option<&'a str>,
}

impl Context<'_> {
    fn omit(&self, diagnostics: &mut Vec<Diagnostic>, kind: DiagnosticKind, message: String) {
        warn!(
            file = self.file_path,
            function = self.function.unwrap_or("<anonymous>"),
            "{message}"
        );
        diagnostics.push(Diagnostic::new(
            kind,
            self.file_path,
            self.function,
            message,
        ));
    }
}

impl SrcmlJavaExtractor {
    /// Renders the type of a declaration: the `name` subtree below its `type`
    /// child, with each `index` marker rendered as `[]`.
    fn extract_type(node: Node<'_>) -> Result<String> {
        let name = node
            .first_child_of_label(SrcmlLabel::Type)
            .and_then(|t| t.first_child_of_label(SrcmlLabel::Name))
            .ok_or_else(|| MinerError::MissingTypeToken {
                message: format!("no type found under '{}'", node.label()),
            })?;
        let mut rendered = String::new();
        Self::render_type(name, &mut rendered)?;
        Ok(rendered)
    }

    fn render_type(node: Node<'_>, out: &mut String) -> Result<()> {
        if node.kind::<SrcmlLabel>() == Some(SrcmlLabel::Index) {
            out.push_str("[]");
            return Ok(());
        }
        if node.is_leaf() {
            let token = node.token()?;
            if token.is_empty() {
                return Err(MinerError::MissingTypeToken {
                    message: format!("'{}' node has no text", node.label()),
                });
            }
            out.push_str(token);
            return Ok(());
        }
        for child in node.children() {
            Self::render_type(child, out)?;
        }
        Ok(())
    }

    fn assemble_parameter(node: Node<'_>) -> Result<Parameter> {
        let decl = node
            .first_child_of_label(SrcmlLabel::Decl)
            .ok_or_else(|| MinerError::MissingNode {
                expected: SrcmlLabel::Decl.as_str().to_string(),
                parent: node.label().to_string(),
            })?;
        let name = decl
            .first_child_of_label(SrcmlLabel::Name)
            .and_then(|n| n.token().ok())
            .ok_or_else(|| MinerError::MissingParameterName {
                label: node.label().to_string(),
            })?
            .to_string();
        let param_type = Self::extract_type(decl)?;
        Ok(Parameter {
            name,
            param_type: Some(param_type),
        })
    }

    /// Every `parameter` node owned by this function (not by a nested one).
    ///
    /// Any unresolved parameter discards the whole list, so a present list
    /// always has one entry per parameter slot.
    fn collect_parameters(
        root: Node<'_>,
        ctx: &Context<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Vec<Parameter>> {
        let mut parameters = Vec::new();
        for node in root.pre_order().skip(1) {
            if node.kind::<SrcmlLabel>() != Some(SrcmlLabel::Parameter) {
                continue;
            }
            let owner = node
                .ancestors()
                .find(|a| a.kind::<SrcmlLabel>() == Some(SrcmlLabel::Function));
            if owner != Some(root) {
                continue;
            }
            match Self::assemble_parameter(node) {
                Ok(parameter) => parameters.push(parameter),
                Err(e) => {
                    let kind = Diagnostic::from_error(&e, ctx.file_path, ctx.function).kind;
                    ctx.omit(diagnostics, kind, format!("parameter list dropped: {e}"));
                    return None;
                }
            }
        }
        Some(parameters)
    }

    fn collect_annotations(
        root: Node<'_>,
        ctx: &Context<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<String> {
        let mut annotations = Vec::new();
        for annotation in root.children_of_label(SrcmlLabel::Annotation) {
            let text = annotation
                .first_child_of_label(SrcmlLabel::Name)
                .map(|n| n.subtree_text())
                .filter(|t| !t.is_empty());
            match text {
                Some(text) => annotations.push(text),
                None => ctx.omit(
                    diagnostics,
                    DiagnosticKind::MissingAnnotationName,
                    "annotation has no name".to_string(),
                ),
            }
        }
        annotations
    }

    fn collect_modifiers(
        root: Node<'_>,
        ctx: &Context<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<String>> {
        let type_node =
            root.first_child_of_label(SrcmlLabel::Type)
                .ok_or_else(|| MinerError::MissingNode {
                    expected: SrcmlLabel::Type.as_str().to_string(),
                    parent: root.label().to_string(),
                })?;
        let mut modifiers = Vec::new();
        for specifier in type_node.children_of_label(SrcmlLabel::Specifier) {
            match specifier.token() {
                Ok(token) if !token.is_empty() => modifiers.push(token.to_string()),
                _ => ctx.omit(
                    diagnostics,
                    DiagnosticKind::MissingModifierText,
                    "modifier has no text".to_string(),
                ),
            }
        }
        Ok(modifiers)
    }

    fn collect_enclosing<'t>(root: Node<'t>) -> Option<EnclosingElement<'t>> {
        root.ancestors().find_map(|node| {
            let kind = match node.kind::<SrcmlLabel>()? {
                SrcmlLabel::Class => EnclosingKind::Class,
                SrcmlLabel::Enum => EnclosingKind::Enum,
                _ => return None,
            };
            let name = node
                .first_child_of_label(SrcmlLabel::Name)
                .and_then(|n| n.token().ok())
                .map(str::to_string);
            Some(EnclosingElement {
                kind,
                name,
                root: node,
            })
        })
    }
}

impl FunctionExtractor for SrcmlJavaExtractor {
    type Label = SrcmlLabel;

    fn backend_name(&self) -> &str {
        "srcml-java"
    }

    fn function_root(&self) -> SrcmlLabel {
        SrcmlLabel::Function
    }

    fn name_label(&self) -> SrcmlLabel {
        SrcmlLabel::Name
    }

    fn extract<'t>(
        &self,
        root: Node<'t>,
        file_path: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<FunctionInfo<'t>> {
        let name_node = root.first_child_of_label(SrcmlLabel::Name);
        let ctx = Context {
            file_path,
            function: name_node.and_then(|n| n.token().ok()),
        };

        let return_type = Self::extract_type(root)?;
        let modifiers = Self::collect_modifiers(root, &ctx, diagnostics)?;
        let parameters = Self::collect_parameters(root, &ctx, diagnostics);
        let annotations = Self::collect_annotations(root, &ctx, diagnostics);

        Ok(FunctionInfo {
            root,
            file_path: file_path.to_string(),
            name_node,
            parameters,
            return_type: Some(return_type),
            enclosing_element: Self::collect_enclosing(root),
            annotations: Some(annotations),
            modifiers: Some(modifiers),
            body: root.first_child_of_label(SrcmlLabel::Block),
            is_constructor: false,
        })
    }
}
