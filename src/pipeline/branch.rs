use tracing::debug;

use crate::backend::LanguageHandler;
use crate::errors::{MinerError, Result};
use crate::pipeline::filters::{FileFilter, Filter, FunctionFilter};
use crate::pipeline::labels::{FileLabelExtractor, FunctionLabelExtractor, LabelExtractor};
use crate::types::{Diagnostic, LabeledResult, ParseResult};

/// One way of turning a parsed file into labeled units.
pub trait PipelineBranch {
    /// Filters, labels and returns the surviving units of `handler`.
    ///
    /// Recovered extraction problems are appended to `diagnostics`.
    fn process<'t>(
        &self,
        handler: &'t dyn LanguageHandler,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<LabeledResult<'t>>;
}

fn unsupported_filter(name: &str, branch: &str) -> MinerError {
    MinerError::Config {
        message: format!("filter '{name}' cannot be applied to {branch}-level units"),
    }
}

fn unsupported_label(name: &str, branch: &str) -> MinerError {
    MinerError::Config {
        message: format!("label extractor '{name}' does not provide {branch}-level labels"),
    }
}

/// Treats each file as a single unit.
pub struct FilePipelineBranch {
    filters: Vec<Box<dyn FileFilter>>,
    label_extractor: Box<dyn FileLabelExtractor>,
}

impl FilePipelineBranch {
    pub fn new(
        filters: Vec<Box<dyn Filter>>,
        label_extractor: Box<dyn LabelExtractor>,
    ) -> Result<Self> {
        let filters = filters
            .into_iter()
            .map(|f| {
                let name = f.name().to_string();
                f.into_file_filter()
                    .ok_or_else(|| unsupported_filter(&name, "file"))
            })
            .collect::<Result<Vec<_>>>()?;
        let name = label_extractor.name().to_string();
        let label_extractor = label_extractor
            .into_file_extractor()
            .ok_or_else(|| unsupported_label(&name, "file"))?;
        Ok(Self {
            filters,
            label_extractor,
        })
    }
}

impl PipelineBranch for FilePipelineBranch {
    fn process<'t>(
        &self,
        handler: &'t dyn LanguageHandler,
        _diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<LabeledResult<'t>> {
        let unit = ParseResult {
            root: handler.root(),
            file_path: handler.file_path(),
        };
        if !self.filters.iter().all(|f| f.validate(&unit)) {
            debug!(file = unit.file_path, "file rejected by filters");
            return Vec::new();
        }
        match self.label_extractor.label(&unit) {
            Some(label) => vec![LabeledResult {
                root: unit.root,
                label,
                file_path: unit.file_path.to_string(),
            }],
            None => Vec::new(),
        }
    }
}

/// Splits each file into functions and treats every function as a unit.
pub struct FunctionPipelineBranch {
    filters: Vec<Box<dyn FunctionFilter>>,
    label_extractor: Box<dyn FunctionLabelExtractor>,
}

impl FunctionPipelineBranch {
    pub fn new(
        filters: Vec<Box<dyn Filter>>,
        label_extractor: Box<dyn LabelExtractor>,
    ) -> Result<Self> {
        let filters = filters
            .into_iter()
            .map(|f| {
                let name = f.name().to_string();
                f.into_function_filter()
                    .ok_or_else(|| unsupported_filter(&name, "function"))
            })
            .collect::<Result<Vec<_>>>()?;
        let name = label_extractor.name().to_string();
        let label_extractor = label_extractor
            .into_function_extractor()
            .ok_or_else(|| unsupported_label(&name, "function"))?;
        Ok(Self {
            filters,
            label_extractor,
        })
    }
}

impl PipelineBranch for FunctionPipelineBranch {
    fn process<'t>(
        &self,
        handler: &'t dyn LanguageHandler,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<LabeledResult<'t>> {
        let split = handler.split_into_functions();
        diagnostics.extend(split.diagnostics);

        split
            .functions
            .into_iter()
            .filter(|function| self.filters.iter().all(|f| f.validate(function)))
            .filter_map(|function| {
                let label = self.label_extractor.label(&function)?;
                Some(LabeledResult {
                    root: function.root,
                    label,
                    file_path: function.file_path,
                })
            })
            .collect()
    }
}
