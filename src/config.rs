use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::backend::{Language, ParserFamily};
use crate::errors::{MinerError, Result};
use crate::pipeline::filters::{
    AnnotationFilter, ConstructorFilter, Filter, FunctionNameWordsFilter, ModifierFilter,
    TreeSizeFilter,
};
use crate::pipeline::labels::{FileNameLabel, FolderNameLabel, FunctionNameLabel, LabelExtractor};
use crate::pipeline::storage::{JsonLinesStorage, Storage};

/// Configuration of a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Root directory scanned for source files.
    pub input_dir: PathBuf,
    /// Root directory for output; each language writes into `<output_dir>/<extension>`.
    pub output_dir: PathBuf,
    pub parser: ParserConfig,
    /// Applied in order; the first rejecting filter drops the unit.
    #[serde(default)]
    pub filters: Vec<FilterConfig>,
    pub label: LabelConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    /// Glob patterns (relative to `input_dir`) of files to skip.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            output_dir: PathBuf::from("funcminer-out"),
            parser: ParserConfig {
                name: ParserFamily::Srcml,
                languages: vec![Language::Java],
            },
            filters: Vec::new(),
            label: LabelConfig::FunctionName,
            storage: StorageConfig::default(),
            exclude: Vec::new(),
        }
    }
}

/// Parser family and the languages to process with it, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
    pub name: ParserFamily,
    pub languages: Vec<Language>,
}

/// Filter selection, keyed by `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum FilterConfig {
    TreeSize {
        #[serde(default)]
        min_size: usize,
        #[serde(default)]
        max_size: Option<usize>,
    },
    Modifiers {
        excluded: Vec<String>,
    },
    Annotations {
        excluded: Vec<String>,
    },
    NoConstructors,
    FunctionNameWords {
        max_words: usize,
    },
}

impl FilterConfig {
    pub fn build(&self) -> Box<dyn Filter> {
        match self {
            FilterConfig::TreeSize { min_size, max_size } => Box::new(TreeSizeFilter {
                min_size: *min_size,
                max_size: *max_size,
            }),
            FilterConfig::Modifiers { excluded } => Box::new(ModifierFilter {
                excluded: excluded.clone(),
            }),
            FilterConfig::Annotations { excluded } => Box::new(AnnotationFilter {
                excluded: excluded.clone(),
            }),
            FilterConfig::NoConstructors => Box::new(ConstructorFilter),
            FilterConfig::FunctionNameWords { max_words } => Box::new(FunctionNameWordsFilter {
                max_words: *max_words,
            }),
        }
    }
}

/// Labeling strategy, keyed by `name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum LabelConfig {
    FileName,
    FolderName,
    FunctionName,
}

impl LabelConfig {
    pub fn build(&self) -> Box<dyn LabelExtractor> {
        match self {
            LabelConfig::FileName => Box::new(FileNameLabel),
            LabelConfig::FolderName => Box::new(FolderNameLabel),
            LabelConfig::FunctionName => Box::new(FunctionNameLabel),
        }
    }
}

/// Output format, keyed by `format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "snake_case")]
pub enum StorageConfig {
    #[default]
    Jsonl,
}

impl StorageConfig {
    /// Opens a storage sink writing into `dir`.
    pub fn create(&self, dir: &Path) -> Result<Box<dyn Storage>> {
        match self {
            StorageConfig::Jsonl => Ok(Box::new(JsonLinesStorage::create(dir)?)),
        }
    }
}

/// Loads a pipeline configuration; `.toml` files are read as TOML, anything else as JSON.
pub fn load_config(path: &Path) -> Result<PipelineConfig> {
    let contents = fs::read_to_string(path).map_err(|e| MinerError::Config {
        message: format!("failed to read config file '{}': {}", path.display(), e),
    })?;

    let is_toml = path.extension().is_some_and(|ext| ext == "toml");
    let config: PipelineConfig = if is_toml {
        toml::from_str(&contents).map_err(|e| MinerError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?
    } else {
        serde_json::from_str(&contents).map_err(|e| MinerError::Config {
            message: format!("failed to parse config file '{}': {}", path.display(), e),
        })?
    };

    Ok(config)
}

/// Saves the configuration as JSON using an atomic write.
///
/// Writes to a temporary file first and then renames it to the final location,
/// ensuring that a partial write never corrupts the configuration.
pub fn save_config(path: &Path, config: &PipelineConfig) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| MinerError::Config {
            message: format!(
                "failed to create config directory '{}': {}",
                parent.display(),
                e
            ),
        })?;
    }

    let tmp_path = path.with_extension("tmp");
    let json = serde_json::to_string_pretty(config).map_err(|e| MinerError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| MinerError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, path).map_err(|e| MinerError::Config {
        message: format!(
            "failed to rename temporary config file '{}' to '{}': {}",
            tmp_path.display(),
            path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Returns `true` if `relative_path` matches any of the exclude glob patterns.
///
/// Invalid patterns are ignored.
pub fn is_excluded(relative_path: &str, exclude: &[String]) -> bool {
    let match_opts = glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: false,
        require_literal_leading_dot: false,
    };

    exclude.iter().any(|pattern_str| {
        Pattern::new(pattern_str)
            .map(|pattern| pattern.matches_with(relative_path, match_opts))
            .unwrap_or(false)
    })
}
