//! Preparation: run every detector over one file in dependency order.
//!
//! The order is fixed: byte order, sample format and trace length, text
//! encoding, extended header count, then the optional format version.
//! Each integer-reading step takes the [`ResolvedEndian`] returned by the
//! first step, and the extended header scan takes the resolved encoding.

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use crate::config::Configuration;
use crate::encoding::resolve_encoding;
use crate::endian::{ResolvedEndian, resolve_endian};
use crate::extended::resolve_extended_headers;
use crate::sample_format::{TraceGeometry, resolve_sample_format};
use crate::types::{
    Attribute, ByteOrder, Detection, DetectionMode, FormatRevision, Provenance, TextEncoding,
};
use crate::{Result, SegyError};

/// Values resolved by one preparation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prepared {
    pub endian: ByteOrder,
    pub geometry: TraceGeometry,
    pub text_header_encoding: TextEncoding,
    pub extra_text_header_number: i64,
    pub format_version: Option<FormatRevision>,
}

/// Prepare `config` against `stream`.
///
/// Fails with [`SegyError::ConfigurationAlreadyPrepared`] if `config` was
/// prepared before and not [reset](Configuration::reset). On any error
/// `config` is left exactly as it was.
pub fn prepare<R: Read + Seek>(stream: &mut R, config: &mut Configuration) -> Result<Prepared> {
    if config.is_prepared() {
        return Err(SegyError::ConfigurationAlreadyPrepared);
    }

    let mut working = config.clone();
    let endian = resolve_endian(stream, &mut working)?;
    let geometry = resolve_sample_format(stream, &mut working, endian)?;
    let text_header_encoding = resolve_encoding(stream, &mut working)?;
    let extra_text_header_number =
        resolve_extended_headers(stream, &mut working, endian, text_header_encoding)?;
    let format_version = resolve_format_version(stream, &mut working, endian)?;
    working.mark_prepared();

    tracing::debug!(
        endian = %endian.order(),
        sample_format = %geometry.sample_format,
        sample_per_trace = geometry.sample_per_trace,
        encoding = %text_header_encoding,
        extra_text_header_number,
        "prepared configuration"
    );

    *config = working;
    Ok(Prepared {
        endian: endian.order(),
        geometry,
        text_header_encoding,
        extra_text_header_number,
        format_version,
    })
}

/// Open `path` and prepare `config` against it.
///
/// The file is opened once and closed before returning, on success or error.
pub fn prepare_file(path: impl AsRef<Path>, config: &mut Configuration) -> Result<Prepared> {
    let path = path.as_ref();
    if config.is_prepared() {
        return Err(SegyError::ConfigurationAlreadyPrepared);
    }
    let file = File::open(path).map_err(|source| SegyError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let mut stream = BufReader::new(file);
    prepare(&mut stream, config)
}

/// Resolve the format revision if a mode for it is configured.
///
/// Auto-detection has no algorithm yet and fails with
/// [`SegyError::NotImplemented`].
pub fn resolve_format_version<R: Read + Seek>(
    _stream: &mut R,
    config: &mut Configuration,
    _endian: ResolvedEndian,
) -> Result<Option<FormatRevision>> {
    match config.modes().format_version {
        None => Ok(None),
        Some(DetectionMode::Manual) => {
            let version = config
                .format_version()
                .ok_or(SegyError::MissingManualValue {
                    attribute: Attribute::FormatVersion,
                })?;
            config.set_format_version(Detection::new(version, Provenance::UserSupplied));
            Ok(Some(version))
        }
        Some(DetectionMode::Auto) => Err(SegyError::NotImplemented("format version detection")),
    }
}
