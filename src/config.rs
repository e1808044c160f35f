//! Split configuration

use std::path::PathBuf;

use crate::encoding::TextEncoding;
use crate::error::{Result, SplitError};
use crate::plan::BatchNaming;

/// When the encoding is not given, how often to sniff it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetectionMode {
    /// Sniff the first input and reuse the result for every input
    #[default]
    Once,
    /// Sniff each input on its own
    PerFile,
}

/// What to do when one input fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Abort the whole run on the first failing input
    #[default]
    Stop,
    /// Record the failure and move on to the next input
    Continue,
}

/// Options for one split run
///
/// Built with [`SplitConfig::new`] and the `with_*` methods, then treated as
/// immutable. [`SplitConfig::validate`] is run once before any file is
/// touched.
#[derive(Debug, Clone)]
pub struct SplitConfig {
    /// Input files, directories or glob patterns
    pub patterns: Vec<String>,
    /// Export directory; each input's own directory when unset or invalid
    pub export_dir: Option<PathBuf>,
    /// Data lines per output file
    pub split_size: usize,
    /// Leading lines treated as the header block
    pub header_lines: usize,
    /// Do not write the header block into outputs
    pub skip_header: bool,
    /// Fixed encoding; sniffed when unset
    pub encoding: Option<TextEncoding>,
    pub naming: BatchNaming,
    pub detection: DetectionMode,
    pub on_error: ErrorPolicy,
}

impl SplitConfig {
    /// Default header line count
    pub const DEFAULT_HEADER_LINES: usize = 1;

    /// Create a config for `patterns` with `split_size` lines per chunk
    pub fn new<I, S>(patterns: I, split_size: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            export_dir: None,
            split_size,
            header_lines: Self::DEFAULT_HEADER_LINES,
            skip_header: false,
            encoding: None,
            naming: BatchNaming::default(),
            detection: DetectionMode::default(),
            on_error: ErrorPolicy::default(),
        }
    }

    pub fn with_export_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.export_dir = Some(dir.into());
        self
    }

    pub fn with_header_lines(mut self, lines: usize) -> Self {
        self.header_lines = lines;
        self
    }

    pub fn with_skip_header(mut self, skip: bool) -> Self {
        self.skip_header = skip;
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_naming(mut self, naming: BatchNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_detection(mut self, detection: DetectionMode) -> Self {
        self.detection = detection;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.on_error = policy;
        self
    }

    /// Reject out-of-range options
    pub fn validate(&self) -> Result<()> {
        if self.split_size == 0 {
            return Err(SplitError::Configuration(
                "split size must be at least 1".to_string(),
            ));
        }
        if self.patterns.iter().all(|p| p.trim().is_empty()) {
            return Err(SplitError::Configuration(
                "at least one input path is required".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SplitConfig::new(["data.csv"], 100);
        assert_eq!(config.header_lines, 1);
        assert!(!config.skip_header);
        assert!(config.encoding.is_none());
        assert!(config.export_dir.is_none());
        assert_eq!(config.naming, BatchNaming::Sequential);
        assert_eq!(config.detection, DetectionMode::Once);
        assert_eq!(config.on_error, ErrorPolicy::Stop);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_methods() {
        let config = SplitConfig::new(vec!["a.txt".to_string()], 5)
            .with_export_dir("/tmp/out")
            .with_header_lines(0)
            .with_skip_header(true)
            .with_encoding(TextEncoding::Unicode)
            .with_naming(BatchNaming::LineRange)
            .with_detection(DetectionMode::PerFile)
            .with_error_policy(ErrorPolicy::Continue);

        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/out")));
        assert_eq!(config.header_lines, 0);
        assert!(config.skip_header);
        assert_eq!(config.encoding, Some(TextEncoding::Unicode));
        assert_eq!(config.naming, BatchNaming::LineRange);
        assert_eq!(config.detection, DetectionMode::PerFile);
        assert_eq!(config.on_error, ErrorPolicy::Continue);
    }

    #[test]
    fn test_zero_split_size_rejected() {
        let err = SplitConfig::new(["data.csv"], 0).validate().unwrap_err();
        assert!(matches!(err, SplitError::Configuration(_)));
    }

    #[test]
    fn test_empty_patterns_rejected() {
        let err = SplitConfig::new(Vec::<String>::new(), 10).validate().unwrap_err();
        assert!(matches!(err, SplitError::Configuration(_)));

        let err = SplitConfig::new([" "], 10).validate().unwrap_err();
        assert!(matches!(err, SplitError::Configuration(_)));
    }
}
