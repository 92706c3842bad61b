//! Function extraction for Java parse trees produced by an ANTLR grammar.
//!
//! Nodes are labeled with grammar rule names. Chains of single-child rules
//! may be collapsed into one node labeled `outer|...|inner`, which is how a
//! one-element `formalParameterList` ends up labeled as a parameter.

use crate::errors::{MinerError, Result};
use crate::extraction::FunctionExtractor;
use crate::tree::{BackendLabel, Node};
use crate::types::{Diagnostic, EnclosingElement, EnclosingKind, FunctionInfo, Parameter};

/// Grammar rules the Java extractor looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AntlrLabel {
    MethodDeclaration,
    MethodBody,
    Identifier,
    TypeTypeOrVoid,
    ClassDeclaration,
    FormalParameters,
    FormalParameterList,
    FormalParameter,
    LastFormalParameter,
    TypeType,
    VariableDeclaratorId,
}

impl BackendLabel for AntlrLabel {
    const ALL: &'static [Self] = &[
        AntlrLabel::MethodDeclaration,
        AntlrLabel::MethodBody,
        AntlrLabel::Identifier,
        AntlrLabel::TypeTypeOrVoid,
        AntlrLabel::ClassDeclaration,
        AntlrLabel::FormalParameters,
        AntlrLabel::FormalParameterList,
        AntlrLabel::FormalParameter,
        AntlrLabel::LastFormalParameter,
        AntlrLabel::TypeType,
        AntlrLabel::VariableDeclaratorId,
    ];

    fn as_str(self) -> &'static str {
        match self {
            AntlrLabel::MethodDeclaration => "methodDeclaration",
            AntlrLabel::MethodBody => "methodBody",
            AntlrLabel::Identifier => "IDENTIFIER",
            AntlrLabel::TypeTypeOrVoid => "typeTypeOrVoid",
            AntlrLabel::ClassDeclaration => "classDeclaration",
            AntlrLabel::FormalParameters => "formalParameters",
            AntlrLabel::FormalParameterList => "formalParameterList",
            AntlrLabel::FormalParameter => "formalParameter",
            AntlrLabel::LastFormalParameter => "lastFormalParameter",
            AntlrLabel::TypeType => "typeType",
            AntlrLabel::VariableDeclaratorId => "variableDeclaratorId",
        }
    }
}

/// Labels that denote exactly one parameter.
const SINGLE_PARAMETER: &[AntlrLabel] =
    &[AntlrLabel::FormalParameter, AntlrLabel::LastFormalParameter];

/// Extracts [`FunctionInfo`] from `methodDeclaration` nodes of an ANTLR Java tree.
#[derive(Debug, Clone, Copy, Default)]
pub struct AntlrJavaExtractor;

impl AntlrJavaExtractor {
    fn collect_name<'t>(root: Node<'t>) -> Option<Node<'t>> {
        root.first_child_of_label(AntlrLabel::Identifier)
    }

    fn collect_return_type(root: Node<'_>) -> Option<String> {
        root.first_child_of_label(AntlrLabel::TypeTypeOrVoid)
            .map(|n| n.subtree_text())
    }

    /// The class marker is the *last* label of a collapsed chain
    /// (e.g. `typeDeclaration|classDeclaration`), so the test is on that segment.
    fn collect_enclosing_class<'t>(root: Node<'t>) -> Option<EnclosingElement<'t>> {
        let class_node =
            root.find_ancestor_or_self(|n| n.has_last_label(AntlrLabel::ClassDeclaration))?;
        let name = class_node
            .first_child_of_label(AntlrLabel::Identifier)
            .and_then(|n| n.token().ok())
            .map(str::to_string);
        Some(EnclosingElement {
            kind: EnclosingKind::Class,
            name,
            root: class_node,
        })
    }

    fn collect_parameters(root: Node<'_>) -> Result<Vec<Parameter>> {
        let inner = match root
            .first_child_of_label(AntlrLabel::FormalParameters)
            .and_then(|p| p.first_child_of_label(AntlrLabel::FormalParameterList))
        {
            Some(inner) => inner,
            None => return Ok(Vec::new()),
        };

        // A one-parameter list is collapsed into the parameter node itself.
        if inner.last_label_in(SINGLE_PARAMETER) {
            return Ok(vec![Self::parameter_info(inner)?]);
        }

        inner
            .children()
            .filter(|child| child.first_label_in(SINGLE_PARAMETER))
            .map(Self::parameter_info)
            .collect()
    }

    fn parameter_info(node: Node<'_>) -> Result<Parameter> {
        let param_type = node
            .first_child_of_label(AntlrLabel::TypeType)
            .map(|n| n.subtree_text());
        let name = node
            .first_child_of_label(AntlrLabel::VariableDeclaratorId)
            .ok_or_else(|| MinerError::MissingParameterName {
                label: node.label().to_string(),
            })?
            .token()?
            .to_string();
        Ok(Parameter { name, param_type })
    }
}

impl FunctionExtractor for AntlrJavaExtractor {
    type Label = AntlrLabel;

    fn backend_name(&self) -> &str {
        "antlr-java"
    }

    fn function_root(&self) -> AntlrLabel {
        AntlrLabel::MethodDeclaration
    }

    fn name_label(&self) -> AntlrLabel {
        AntlrLabel::Identifier
    }

    fn extract<'t>(
        &self,
        root: Node<'t>,
        file_path: &str,
        _diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<FunctionInfo<'t>> {
        Ok(FunctionInfo {
            root,
            file_path: file_path.to_string(),
            name_node: Self::collect_name(root),
            parameters: Some(Self::collect_parameters(root)?),
            return_type: Self::collect_return_type(root),
            enclosing_element: Self::collect_enclosing_class(root),
            annotations: None,
            modifiers: None,
            body: root.first_child_of_label(AntlrLabel::MethodBody),
            is_constructor: false,
        })
    }
}
