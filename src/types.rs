use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::MinerError;
use crate::tree::Node;

/// Kind of declaration enclosing a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnclosingKind {
    Class,
    Enum,
}

impl EnclosingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnclosingKind::Class => "class",
            EnclosingKind::Enum => "enum",
        }
    }
}

/// The nearest class or enum declaration around a function.
#[derive(Debug, Clone, PartialEq)]
pub struct EnclosingElement<'t> {
    pub kind: EnclosingKind,
    /// Simple name of the declaration; `None` for anonymous declarations.
    pub name: Option<String>,
    pub root: Node<'t>,
}

/// A single function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub param_type: Option<String>,
}

/// Normalized, backend-independent view of one function definition.
///
/// Built once per extraction call and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionInfo<'t> {
    pub root: Node<'t>,
    pub file_path: String,
    /// `None` for anonymous units.
    pub name_node: Option<Node<'t>>,
    /// Declaration order. `None` when the backend could not resolve every
    /// parameter; a present list always has one entry per syntactic slot.
    pub parameters: Option<Vec<Parameter>>,
    /// `None` means void or unspecified.
    pub return_type: Option<String>,
    pub enclosing_element: Option<EnclosingElement<'t>>,
    pub annotations: Option<Vec<String>>,
    pub modifiers: Option<Vec<String>>,
    pub body: Option<Node<'t>>,
    pub is_constructor: bool,
}

impl<'t> FunctionInfo<'t> {
    /// Token of the name node, if the function is named.
    pub fn name(&self) -> Option<&'t str> {
        self.name_node.and_then(|n| n.token().ok())
    }

    /// Serializable summary used by the CLI.
    pub fn summary(&self) -> FunctionSummary {
        FunctionSummary {
            name: self.name().map(str::to_string),
            file_path: self.file_path.clone(),
            return_type: self.return_type.clone(),
            parameters: self.parameters.clone(),
            enclosing_kind: self.enclosing_element.as_ref().map(|e| e.kind),
            enclosing_name: self
                .enclosing_element
                .as_ref()
                .and_then(|e| e.name.clone()),
            annotations: self.annotations.clone(),
            modifiers: self.modifiers.clone(),
            is_constructor: self.is_constructor,
            has_body: self.body.is_some(),
        }
    }
}

/// Owned snapshot of a [`FunctionInfo`], detached from the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSummary {
    pub name: Option<String>,
    pub file_path: String,
    pub return_type: Option<String>,
    pub parameters: Option<Vec<Parameter>>,
    pub enclosing_kind: Option<EnclosingKind>,
    pub enclosing_name: Option<String>,
    pub annotations: Option<Vec<String>>,
    pub modifiers: Option<Vec<String>>,
    pub is_constructor: bool,
    pub has_body: bool,
}

/// What went wrong (or was left out) while extracting a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DiagnosticKind {
    MissingParameterName,
    MissingTypeToken,
    MissingNode,
    NotALeaf,
    MissingAnnotationName,
    MissingModifierText,
    UnreadableFile,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::MissingParameterName => "missing_parameter_name",
            DiagnosticKind::MissingTypeToken => "missing_type_token",
            DiagnosticKind::MissingNode => "missing_node",
            DiagnosticKind::NotALeaf => "not_a_leaf",
            DiagnosticKind::MissingAnnotationName => "missing_annotation_name",
            DiagnosticKind::MissingModifierText => "missing_modifier_text",
            DiagnosticKind::UnreadableFile => "unreadable_file",
        }
    }

    /// `true` when the whole unit was dropped, `false` when only one field entry was omitted.
    pub fn drops_unit(&self) -> bool {
        !matches!(
            self,
            DiagnosticKind::MissingAnnotationName | DiagnosticKind::MissingModifierText
        )
    }
}

/// A recovered extraction problem, with enough context to report it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub file_path: String,
    pub function: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        kind: DiagnosticKind,
        file_path: &str,
        function: Option<&str>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            file_path: file_path.to_string(),
            function: function.map(str::to_string),
            message: message.into(),
        }
    }

    /// Converts an extraction error into a diagnostic.
    pub fn from_error(err: &MinerError, file_path: &str, function: Option<&str>) -> Self {
        let kind = match err {
            MinerError::MissingParameterName { .. } => DiagnosticKind::MissingParameterName,
            MinerError::MissingTypeToken { .. } => DiagnosticKind::MissingTypeToken,
            MinerError::NotALeaf { .. } => DiagnosticKind::NotALeaf,
            MinerError::MissingNode { .. } => DiagnosticKind::MissingNode,
            _ => DiagnosticKind::UnreadableFile,
        };
        Self::new(kind, file_path, function, err.to_string())
    }
}

/// Functions extracted from one file, plus everything that was dropped or omitted.
#[derive(Debug, Clone, Default)]
pub struct SplitResult<'t> {
    pub functions: Vec<FunctionInfo<'t>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A whole file as a processing unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseResult<'t> {
    pub root: Node<'t>,
    pub file_path: &'t str,
}

/// A processing unit that survived filtering and received a label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledResult<'t> {
    pub root: Node<'t>,
    pub label: String,
    pub file_path: String,
}

impl LabeledResult<'_> {
    /// Deterministic record id: `"unit:" + 32 hex chars` of SHA-256 over path, label and root index.
    pub fn id(&self) -> String {
        generate_unit_id(&self.file_path, &self.label, self.root.index())
    }
}

/// Generates a deterministic id for a stored unit.
pub fn generate_unit_id(file_path: &str, label: &str, index: usize) -> String {
    let input = format!("{}:{}:{}", file_path, label, index);
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hash = hasher.finalize();
    let hex_str = hex::encode(hash);
    format!("unit:{}", &hex_str[..32])
}

/// Outcome of processing all files of one language.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LanguageReport {
    pub language: String,
    pub file_count: usize,
    pub files_skipped: usize,
    pub stored_count: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of a full pipeline run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunReport {
    pub languages: Vec<LanguageReport>,
    pub duration_ms: u64,
}

impl RunReport {
    pub fn stored_count(&self) -> usize {
        self.languages.iter().map(|l| l.stored_count).sum()
    }

    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.languages.iter().flat_map(|l| l.diagnostics.iter())
    }
}
