//! Line-count file splitter

use std::collections::HashSet;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::{DetectionMode, ErrorPolicy, SplitConfig};
use crate::encoding::TextEncoding;
use crate::error::{Result, SplitError};
use crate::lines::{count_lines, LineReader, LineWriter};
use crate::plan::{Batch, BatchPlan};
use crate::sniffer::sniff_encoding;

const GLOB_META: [char; 3] = ['*', '?', '['];

/// One output file written for an input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub batch: Batch,
    /// Data lines actually written (header excluded)
    pub data_lines: usize,
}

/// Result of splitting one input
#[derive(Debug, Clone)]
pub struct FileSplit {
    pub input: PathBuf,
    pub encoding: TextEncoding,
    /// Header lines captured from the top of the input
    pub header_lines: usize,
    pub data_lines: usize,
    pub outputs: Vec<OutputFile>,
}

/// An input skipped under [`ErrorPolicy::Continue`]
#[derive(Debug)]
pub struct FailedInput {
    pub input: PathBuf,
    pub error: SplitError,
}

/// Summary of a split run
#[derive(Debug, Default)]
pub struct SplitReport {
    pub files: Vec<FileSplit>,
    pub failures: Vec<FailedInput>,
}

impl SplitReport {
    /// Number of inputs fully split
    pub fn files_processed(&self) -> usize {
        self.files.len()
    }

    /// Number of output files written across all inputs
    pub fn output_count(&self) -> usize {
        self.files.iter().map(|f| f.outputs.len()).sum()
    }

    /// Whether every input was processed
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Splits inputs into fixed-size chunks according to a [`SplitConfig`]
#[derive(Debug, Clone)]
pub struct Splitter {
    config: SplitConfig,
}

impl Splitter {
    pub fn new(config: SplitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Run the split
    ///
    /// Validation and input resolution happen before any file is opened.
    /// Inputs are then processed one at a time, each output fully written
    /// and closed before the next one is created.
    pub fn split(&self) -> Result<SplitReport> {
        self.config.validate()?;
        let inputs = resolve_inputs(&self.config.patterns)?;
        let export_dir = self.export_dir();

        // Under DetectionMode::Once this is filled by the first successful sniff
        let mut shared_encoding = self.config.encoding;
        let mut report = SplitReport::default();

        for input in &inputs {
            let encoding = match (shared_encoding, self.config.detection) {
                (Some(encoding), _) => Ok(encoding),
                (None, DetectionMode::Once) => sniff_encoding(input).map(|encoding| {
                    shared_encoding = Some(encoding);
                    encoding
                }),
                (None, DetectionMode::PerFile) => sniff_encoding(input),
            };
            let result = encoding
                .and_then(|encoding| self.split_file(input, encoding, export_dir.as_deref()));

            match result {
                Ok(split) => report.files.push(split),
                Err(error) => match self.config.on_error {
                    ErrorPolicy::Stop => return Err(error),
                    ErrorPolicy::Continue => {
                        warn!(input = %input.display(), %error, "skipping input");
                        report.failures.push(FailedInput {
                            input: input.clone(),
                            error,
                        });
                    }
                },
            }
        }

        info!(
            processed = report.files_processed(),
            outputs = report.output_count(),
            failed = report.failures.len(),
            "split finished"
        );
        Ok(report)
    }

    /// The configured export directory, if it exists
    fn export_dir(&self) -> Option<PathBuf> {
        let dir = self.config.export_dir.as_ref()?;
        if dir.is_dir() {
            Some(dir.clone())
        } else {
            warn!(
                export_dir = %dir.display(),
                "export path is not a directory, writing next to each input"
            );
            None
        }
    }

    fn split_file(
        &self,
        input: &Path,
        encoding: TextEncoding,
        export_dir: Option<&Path>,
    ) -> Result<FileSplit> {
        let output_dir = output_dir_for(input, export_dir);

        let total_lines = count_lines(input, encoding)?;
        let data_lines = total_lines.saturating_sub(self.config.header_lines);
        let plan = BatchPlan::new(data_lines, self.config.split_size);

        info!(
            input = %input.display(),
            %encoding,
            total_lines,
            data_lines,
            batches = plan.batch_count(),
            "splitting"
        );

        let mut reader = LineReader::open(input, encoding)?;

        // Captured even when suppressed, so data lines start after it
        let mut header = Vec::with_capacity(self.config.header_lines.min(total_lines));
        while header.len() < self.config.header_lines {
            match reader.next_line().map_err(|e| read_failed(input, e))? {
                Some(line) => header.push(line),
                None => break,
            }
        }

        let mut outputs = Vec::with_capacity(plan.batch_count());
        for batch in plan.batches() {
            let path = output_dir.join(plan.file_name(input, &batch, self.config.naming));
            let written = self.write_batch(&path, encoding, &header, &mut reader, &batch, input)?;

            info!(
                output = %path.display(),
                batch = batch.number,
                of = plan.batch_count(),
                lines = written,
                "wrote chunk"
            );
            outputs.push(OutputFile {
                path,
                batch,
                data_lines: written,
            });
        }

        Ok(FileSplit {
            input: input.to_path_buf(),
            encoding,
            header_lines: header.len(),
            data_lines,
            outputs,
        })
    }

    /// Write one batch to a fresh file, returning the data lines written
    fn write_batch(
        &self,
        path: &Path,
        encoding: TextEncoding,
        header: &[String],
        reader: &mut LineReader<File>,
        batch: &Batch,
        input: &Path,
    ) -> Result<usize> {
        let mut writer = LineWriter::create(path, encoding)?;

        if !self.config.skip_header {
            for line in header {
                writer.write_line(line)?;
            }
        }
        let header_written = writer.lines_written();

        while writer.lines_written() - header_written < batch.line_count() {
            match reader.next_line().map_err(|e| read_failed(input, e))? {
                Some(line) => writer.write_line(&line)?,
                // Input shrank since it was counted
                None => break,
            }
        }

        debug!(
            output = %writer.path().display(),
            first = batch.first_line,
            last = batch.last_line,
            "closing chunk"
        );
        Ok(writer.finish()? - header_written)
    }
}

fn read_failed(path: &Path, source: io::Error) -> SplitError {
    SplitError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Directory outputs for `input` are written to
fn output_dir_for(input: &Path, export_dir: Option<&Path>) -> PathBuf {
    if let Some(dir) = export_dir {
        return dir.to_path_buf();
    }
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Expand patterns into the list of regular files to split
///
/// Glob patterns are expanded, literal directories are walked, and duplicate
/// paths are dropped keeping the first occurrence. Fails with
/// [`SplitError::InvalidPath`] when nothing matches.
pub fn resolve_inputs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut inputs = Vec::new();

    for pattern in patterns.iter().map(|p| p.trim()).filter(|p| !p.is_empty()) {
        for path in expand_pattern(pattern)? {
            if seen.insert(path.clone()) {
                debug!(input = %path.display(), pattern, "resolved input");
                inputs.push(path);
            }
        }
    }

    if inputs.is_empty() {
        return Err(SplitError::InvalidPath {
            patterns: patterns.join(", "),
        });
    }
    Ok(inputs)
}

fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    if pattern.contains(GLOB_META) {
        let paths = glob::glob(pattern).map_err(|source| SplitError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        // Unreadable entries are skipped, like non-matching ones
        return Ok(paths.filter_map(|entry| entry.ok()).filter(|p| p.is_file()).collect());
    }

    let path = PathBuf::from(pattern);
    if path.is_file() {
        Ok(vec![path])
    } else if path.is_dir() {
        expand_directory(&path)
    } else {
        Ok(Vec::new())
    }
}

#[cfg(feature = "walkdir")]
fn expand_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    let files = walkdir::WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .collect();
    Ok(files)
}

#[cfg(not(feature = "walkdir"))]
fn expand_directory(dir: &Path) -> Result<Vec<PathBuf>> {
    Err(SplitError::Configuration(format!(
        "directory input '{}' requires the 'cli' feature",
        dir.display()
    )))
}
