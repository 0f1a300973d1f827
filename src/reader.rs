//! File-level reader tying a SEG-Y path to its settings and configuration.
//!
//! Use [`SegyReader`] when working with files on disk. Changing the file
//! path or the settings source discards all resolved state, so the next
//! [`prepare`](SegyReader::prepare) starts from scratch.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::config::Configuration;
use crate::header::{self, HeaderValues};
use crate::prepare::{self, Prepared};
use crate::settings::Settings;
use crate::{Result, SegyError};

/// Reader for one SEG-Y file.
///
/// # Example
///
/// ```no_run
/// use segy_rs::SegyReader;
///
/// let mut reader = SegyReader::new("line_2373.sgy");
/// let prepared = reader.prepare()?;
/// println!("{} samples per trace", prepared.geometry.sample_per_trace);
/// for i in 0..reader.trace_count()? {
///     let th = reader.trace_header(i)?;
///     println!("{}", th["trace_seq_no_within_file"]);
/// }
/// # Ok::<(), segy_rs::SegyError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SegyReader {
    file_path: PathBuf,
    settings_path: Option<PathBuf>,
    settings: Settings,
    template: Configuration,
    config: Configuration,
}

impl SegyReader {
    /// Create a reader with default settings.
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            settings_path: None,
            settings: Settings::default(),
            template: Configuration::new(),
            config: Configuration::new(),
        }
    }

    /// Create a reader with in-memory settings.
    pub fn with_settings(file_path: impl Into<PathBuf>, settings: Settings) -> Result<Self> {
        let template = Configuration::try_from(&settings)?;
        Ok(Self {
            file_path: file_path.into(),
            settings_path: None,
            settings,
            config: template.clone(),
            template,
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    pub fn settings_path(&self) -> Option<&Path> {
        self.settings_path.as_deref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Point the reader at another file. Resolved state is discarded.
    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = path.into();
        self.config = self.template.clone();
    }

    /// Load settings from `path`, or restore the defaults for `None`.
    /// Resolved state is discarded.
    pub fn init_settings(&mut self, path: Option<&Path>) -> Result<()> {
        let settings = match path {
            Some(p) => Settings::load(p)?,
            None => Settings::default(),
        };
        self.template = Configuration::try_from(&settings)?;
        self.config = self.template.clone();
        self.settings = settings;
        self.settings_path = path.map(Path::to_path_buf);
        Ok(())
    }

    /// Resolve byte order, sample geometry, text encoding and extended
    /// header count for the current file.
    pub fn prepare(&mut self) -> Result<Prepared> {
        tracing::debug!(path = %self.file_path.display(), "preparing");
        prepare::prepare_file(&self.file_path, &mut self.config)
    }

    /// Read every binary header field in the schema.
    pub fn binary_header(&self) -> Result<HeaderValues> {
        header::read_binary_header(&mut self.open()?, &self.config)
    }

    /// Read every trace header field in the schema for trace `index`.
    pub fn trace_header(&self, index: u64) -> Result<HeaderValues> {
        header::read_trace_header(&mut self.open()?, &self.config, index)
    }

    /// Decode text header `index` (0 is the leading header).
    pub fn text_header(&self, index: u64) -> Result<String> {
        header::read_text_header(&mut self.open()?, &self.config, index)
    }

    /// Number of complete traces in the file.
    pub fn trace_count(&self) -> Result<u64> {
        header::trace_count(&mut self.open()?, &self.config)
    }

    fn open(&self) -> Result<BufReader<File>> {
        if !self.config.is_prepared() {
            return Err(SegyError::NotPrepared);
        }
        let file = File::open(&self.file_path).map_err(|source| SegyError::Open {
            path: self.file_path.clone(),
            source,
        })?;
        Ok(BufReader::new(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ByteOrder, DetectionMode};

    #[test]
    fn test_new_uses_defaults() {
        let reader = SegyReader::new("a.sgy");
        assert_eq!(reader.file_path(), Path::new("a.sgy"));
        assert_eq!(reader.settings_path(), None);
        assert_eq!(reader.settings(), &Settings::default());
        assert!(!reader.config().is_prepared());
    }

    #[test]
    fn test_with_settings_applies_manual_values() {
        let mut settings = Settings::default();
        settings.endian_detection = DetectionMode::Manual;
        settings.endian = Some(ByteOrder::Big);
        let reader = SegyReader::with_settings("a.sgy", settings).unwrap();
        assert_eq!(reader.config().endian(), Some(ByteOrder::Big));
    }

    #[test]
    fn test_headers_require_prepare() {
        let reader = SegyReader::new("a.sgy");
        assert!(matches!(reader.binary_header(), Err(SegyError::NotPrepared)));
        assert!(matches!(reader.trace_count(), Err(SegyError::NotPrepared)));
    }

    #[test]
    fn test_prepare_missing_file() {
        let mut reader = SegyReader::new("/nonexistent/a.sgy");
        let err = reader.prepare().unwrap_err();
        assert!(matches!(err, SegyError::Open { .. }));
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }
}
