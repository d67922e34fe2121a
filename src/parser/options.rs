//! Extraction options and configuration.

use super::table_detector::TableDetectorConfig;

/// Options for extracting rows from PDF documents.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Table detection tuning
    pub table_config: TableDetectorConfig,

    /// Whether to look for tables at all; when off every page is read as text
    pub detect_tables: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (skip pages that fail to extract).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Set table detector configuration.
    pub fn with_table_config(mut self, config: TableDetectorConfig) -> Self {
        self.table_config = config;
        self
    }

    /// Enable or disable table detection.
    pub fn with_table_detection(mut self, detect: bool) -> Self {
        self.detect_tables = detect;
        self
    }

    /// Read every page as plain text.
    pub fn text_only(mut self) -> Self {
        self.detect_tables = false;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            table_config: TableDetectorConfig::default(),
            detect_tables: true,
        }
    }
}

/// Error handling mode during extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any page error
    #[default]
    Strict,
    /// Skip failing pages and continue
    Lenient,
}
