use std::fmt::Debug;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{FunctionInfo, ParseResult};

/// Unit a label extractor works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    File,
    Function,
}

/// Labels whole files. `None` drops the file.
pub trait FileLabelExtractor {
    fn label(&self, unit: &ParseResult<'_>) -> Option<String>;
}

/// Labels single functions. `None` drops the function.
pub trait FunctionLabelExtractor {
    fn label(&self, function: &FunctionInfo<'_>) -> Option<String>;
}

/// A configured labeling strategy.
///
/// `granularity` is consulted once, when the pipeline is built, to pick the
/// branch; the matching `into_*` conversion must then succeed.
pub trait LabelExtractor: Debug {
    fn name(&self) -> &str;

    fn granularity(&self) -> Granularity;

    fn into_file_extractor(self: Box<Self>) -> Option<Box<dyn FileLabelExtractor>> {
        None
    }

    fn into_function_extractor(self: Box<Self>) -> Option<Box<dyn FunctionLabelExtractor>> {
        None
    }
}

/// Labels a file with its file name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileNameLabel;

impl FileLabelExtractor for FileNameLabel {
    fn label(&self, unit: &ParseResult<'_>) -> Option<String> {
        Path::new(unit.file_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
    }
}

impl LabelExtractor for FileNameLabel {
    fn name(&self) -> &str {
        "file name"
    }

    fn granularity(&self) -> Granularity {
        Granularity::File
    }

    fn into_file_extractor(self: Box<Self>) -> Option<Box<dyn FileLabelExtractor>> {
        Some(self)
    }
}

/// Labels a file with the name of the directory containing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct FolderNameLabel;

impl FileLabelExtractor for FolderNameLabel {
    fn label(&self, unit: &ParseResult<'_>) -> Option<String> {
        Path::new(unit.file_path)
            .parent()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().to_string())
    }
}

impl LabelExtractor for FolderNameLabel {
    fn name(&self) -> &str {
        "folder name"
    }

    fn granularity(&self) -> Granularity {
        Granularity::File
    }

    fn into_file_extractor(self: Box<Self>) -> Option<Box<dyn FileLabelExtractor>> {
        Some(self)
    }
}

/// Labels a function with its simple name; anonymous functions are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionNameLabel;

impl FunctionLabelExtractor for FunctionNameLabel {
    fn label(&self, function: &FunctionInfo<'_>) -> Option<String> {
        function.name().map(str::to_string)
    }
}

impl LabelExtractor for FunctionNameLabel {
    fn name(&self) -> &str {
        "function name"
    }

    fn granularity(&self) -> Granularity {
        Granularity::Function
    }

    fn into_function_extractor(self: Box<Self>) -> Option<Box<dyn FunctionLabelExtractor>> {
        Some(self)
    }
}
