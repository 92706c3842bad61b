//! Pipeline dispatcher: per language, enumerate files, parse them, route every
//! parsed file through the configured branch and persist what survives.

pub mod branch;
pub mod filters;
pub mod labels;
pub mod storage;

pub use branch::{FilePipelineBranch, FunctionPipelineBranch, PipelineBranch};
pub use filters::{FileFilter, Filter, FunctionFilter};
pub use labels::{FileLabelExtractor, FunctionLabelExtractor, Granularity, LabelExtractor};
pub use storage::{JsonLinesStorage, Storage, JSONL_FILENAME};

use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::backend::{get_handler_factory, HandlerFactory, Language};
use crate::config::{is_excluded, FilterConfig, PipelineConfig};
use crate::errors::{MinerError, Result};
use crate::types::{Diagnostic, DiagnosticKind, LanguageReport, RunReport};

/// A configured extraction run.
pub struct Pipeline {
    config: PipelineConfig,
    branch: Box<dyn PipelineBranch>,
}

impl Pipeline {
    /// Builds the filters, label extractor and processing branch.
    ///
    /// Fails with [`MinerError::Config`] when a filter or the label extractor
    /// does not fit the chosen granularity; no file is touched in that case.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let filters: Vec<Box<dyn Filter>> =
            config.filters.iter().map(FilterConfig::build).collect();
        let label_extractor = config.label.build();

        let granularity = label_extractor.granularity();
        let branch: Box<dyn PipelineBranch> = match granularity {
            Granularity::File => Box::new(FilePipelineBranch::new(filters, label_extractor)?),
            Granularity::Function => {
                Box::new(FunctionPipelineBranch::new(filters, label_extractor)?)
            }
        };
        debug!(?granularity, filters = config.filters.len(), "pipeline built");

        Ok(Self { config, branch })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes every configured language in order.
    ///
    /// A file that cannot be parsed is skipped and reported; a storage failure
    /// aborts the run.
    pub fn run(&self) -> Result<RunReport> {
        let start = Instant::now();
        let mut report = RunReport::default();

        for &language in &self.config.parser.languages {
            let factory = get_handler_factory(language, self.config.parser.name);
            let language_report = self.run_language(language, factory.as_ref())?;
            info!(
                language = language.as_str(),
                files = language_report.file_count,
                skipped = language_report.files_skipped,
                stored = language_report.stored_count,
                diagnostics = language_report.diagnostics.len(),
                "language processed"
            );
            report.languages.push(language_report);
        }

        report.duration_ms = start.elapsed().as_millis() as u64;
        Ok(report)
    }

    fn run_language(
        &self,
        language: Language,
        factory: &dyn HandlerFactory,
    ) -> Result<LanguageReport> {
        let extension = language.file_extension();
        let files = find_source_files(&self.config.input_dir, extension, &self.config.exclude)?;
        info!(
            language = language.as_str(),
            parser = factory.parser().as_str(),
            files = files.len(),
            "processing language"
        );

        let mut report = LanguageReport {
            language: language.as_str().to_string(),
            file_count: files.len(),
            ..LanguageReport::default()
        };

        let mut storage = self
            .config
            .storage
            .create(&self.config.output_dir.join(extension))?;
        let processed = self.process_files(&files, factory, storage.as_mut(), &mut report);
        let closed = storage.close();
        processed?;
        closed?;

        Ok(report)
    }

    fn process_files(
        &self,
        files: &[PathBuf],
        factory: &dyn HandlerFactory,
        storage: &mut dyn Storage,
        report: &mut LanguageReport,
    ) -> Result<()> {
        for path in files {
            let handler = match factory.create_handler(path) {
                Ok(handler) => handler,
                Err(e) => {
                    let file_path = path.display().to_string();
                    warn!(file = %file_path, error = %e, "skipping file");
                    report.diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnreadableFile,
                        &file_path,
                        None,
                        e.to_string(),
                    ));
                    report.files_skipped += 1;
                    continue;
                }
            };

            let results = self.branch.process(handler.as_ref(), &mut report.diagnostics);
            for result in &results {
                storage.store(result)?;
            }
            report.stored_count += results.len();
        }
        Ok(())
    }
}

/// Lists files under `root` with the given extension, sorted by path.
///
/// Hidden entries below `root` are skipped, as are files whose path relative
/// to `root` matches one of the `exclude` globs.
pub fn find_source_files(root: &Path, extension: &str, exclude: &[String]) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(MinerError::File {
            message: "input directory does not exist".to_string(),
            path: root.display().to_string(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
    {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().is_none_or(|ext| ext != extension) {
            continue;
        }
        if let Ok(relative) = path.strip_prefix(root) {
            if is_excluded(&relative.to_string_lossy(), exclude) {
                continue;
            }
        }
        files.push(path.to_path_buf());
    }
    Ok(files)
}
