//! Settings resource: the persisted form of a [`Configuration`].
//!
//! Settings are plain JSON. Header field tables use the form
//! `{"name": ["short" | "int", offset]}` and detection modes accept
//! `"auto"` / `"manual"` (or the legacy booleans `true` / `false`).
//!
//! ```
//! use segy_rs::{ByteOrder, DetectionMode, Settings};
//!
//! let settings = Settings::from_json(
//!     r#"{"endian_detection": "manual", "endian": "big"}"#,
//! ).unwrap();
//! assert_eq!(settings.endian_detection, DetectionMode::Manual);
//! assert_eq!(settings.endian, Some(ByteOrder::Big));
//! // everything not given keeps its default
//! assert_eq!(settings.text_header_byte, 3200);
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{
    BINARY_HEADER_BYTE, Configuration, DetectionModes, SegmentLayout, TEXT_HEADER_BYTE,
    TRACE_HEADER_BYTE,
};
use crate::schema::{FieldTable, Schema, Segment};
use crate::types::{ByteOrder, DetectionMode, FormatRevision, SampleFormat, TextEncoding};
use crate::{Result, SegyError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub binary_header: FieldTable,
    pub trace_header: FieldTable,

    pub text_header_byte: u64,
    pub binary_header_byte: u64,
    pub trace_header_byte: u64,

    pub text_header_encoding_detection: DetectionMode,
    pub text_header_number_detection: DetectionMode,
    pub endian_detection: DetectionMode,
    pub sample_format_detection: DetectionMode,
    pub sample_per_trace_detection: DetectionMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_version_detection: Option<DetectionMode>,

    pub endian: Option<ByteOrder>,
    pub sample_format: Option<SampleFormat>,
    pub text_header_encoding: Option<TextEncoding>,
    pub extra_text_header_number: Option<i64>,
    pub sample_per_trace: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_version: Option<FormatRevision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extended_header_stop_marker: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        let schema = Schema::default();
        Self {
            binary_header: schema.binary_header,
            trace_header: schema.trace_header,
            text_header_byte: TEXT_HEADER_BYTE,
            binary_header_byte: BINARY_HEADER_BYTE,
            trace_header_byte: TRACE_HEADER_BYTE,
            text_header_encoding_detection: DetectionMode::Auto,
            text_header_number_detection: DetectionMode::Auto,
            endian_detection: DetectionMode::Auto,
            sample_format_detection: DetectionMode::Auto,
            sample_per_trace_detection: DetectionMode::Auto,
            format_version_detection: None,
            endian: Some(ByteOrder::Little),
            sample_format: Some(SampleFormat::IbmFloat32),
            text_header_encoding: Some(TextEncoding::Ascii),
            extra_text_header_number: Some(0),
            sample_per_trace: Some(0),
            format_version: None,
            extended_header_stop_marker: None,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load and validate settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| SegyError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_reader(BufReader::new(file))?;
        settings.validate()?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|source| SegyError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(|e| SegyError::io(0, e))?;
        Ok(())
    }

    /// Check segment sizes and that every schema field fits its segment.
    pub fn validate(&self) -> Result<()> {
        if self.text_header_byte == 0 {
            return Err(SegyError::InvalidSetting {
                key: "text_header_byte".into(),
                value: "0".into(),
            });
        }
        let tables = [
            (Segment::BinaryHeader, &self.binary_header, self.binary_header_byte),
            (Segment::TraceHeader, &self.trace_header, self.trace_header_byte),
        ];
        for (segment, table, size) in tables {
            for (name, entry) in table.by_offset() {
                let end = entry.offset.checked_add(entry.field_type.byte_len() as u64);
                if end.is_none_or(|end| end > size) {
                    return Err(SegyError::InvalidSetting {
                        key: format!("{segment} field {name}"),
                        value: format!("offset {} beyond {size}-byte segment", entry.offset),
                    });
                }
            }
        }
        Ok(())
    }

    fn modes(&self) -> DetectionModes {
        DetectionModes {
            endian: self.endian_detection,
            text_header_encoding: self.text_header_encoding_detection,
            text_header_number: self.text_header_number_detection,
            sample_format: self.sample_format_detection,
            sample_per_trace: self.sample_per_trace_detection,
            format_version: self.format_version_detection,
        }
    }
}

impl TryFrom<&Settings> for Configuration {
    type Error = SegyError;

    /// Build a fresh configuration. Supplied values are carried over only
    /// for attributes in manual mode.
    fn try_from(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let modes = settings.modes();
        let manual = |mode: DetectionMode| mode == DetectionMode::Manual;

        let mut config = Configuration::new()
            .with_schema(Schema {
                binary_header: settings.binary_header.clone(),
                trace_header: settings.trace_header.clone(),
            })
            .with_layout(SegmentLayout {
                text_header_byte: settings.text_header_byte,
                binary_header_byte: settings.binary_header_byte,
                trace_header_byte: settings.trace_header_byte,
            })
            .with_modes(modes);

        if let Some(marker) = &settings.extended_header_stop_marker {
            config = config.with_stop_marker(marker.clone());
        }
        if let (true, Some(v)) = (manual(modes.endian), settings.endian) {
            config = config.with_endian(v);
        }
        if let (true, Some(v)) = (manual(modes.text_header_encoding), settings.text_header_encoding)
        {
            config = config.with_text_header_encoding(v);
        }
        if let (true, Some(v)) = (manual(modes.sample_format), settings.sample_format) {
            config = config.with_sample_format(v);
        }
        if let (true, Some(v)) = (manual(modes.sample_per_trace), settings.sample_per_trace) {
            config = config.with_sample_per_trace(v);
        }
        if let (true, Some(v)) = (
            manual(modes.text_header_number),
            settings.extra_text_header_number,
        ) {
            config = config.with_extra_text_header_number(v);
        }
        if let (Some(DetectionMode::Manual), Some(v)) =
            (modes.format_version, settings.format_version)
        {
            config = config.with_format_version(v);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{SAMPLE_FORMAT_CODE, SchemaEntry};

    #[test]
    fn test_default_resource_shape() {
        let json = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(json["binary_header"]["sample_per_trace"], serde_json::json!(["short", 20]));
        assert_eq!(json["binary_header"]["job_id"], serde_json::json!(["int", 0]));
        assert_eq!(json["trace_header"]["ori_fld_rcd_no"], serde_json::json!(["int", 8]));
        assert_eq!(json["text_header_byte"], 3200);
        assert_eq!(json["endian_detection"], "auto");
        assert_eq!(json["endian"], "little");
        assert_eq!(json["sample_format"], "ibm");
        assert_eq!(json["text_header_encoding"], "ascii");
        assert!(json.get("format_version_detection").is_none());
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings::default();
        let json = serde_json::to_string(&settings).unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_legacy_boolean_flags() {
        let settings = Settings::from_json(
            r#"{"endian_detection": false, "endian": "big", "sample_format_detection": true}"#,
        )
        .unwrap();
        assert_eq!(settings.endian_detection, DetectionMode::Manual);
        assert_eq!(settings.sample_format_detection, DetectionMode::Auto);
    }

    #[test]
    fn test_rejects_bad_values() {
        for json in [
            r#"{"endian": "middle"}"#,
            r#"{"endian_detection": "maybe"}"#,
            r#"{"text_header_encoding": "utf8"}"#,
            r#"{"binary_header": {"x": ["long", 0]}}"#,
        ] {
            let err = Settings::from_json(json).unwrap_err();
            assert!(matches!(err, SegyError::Settings(_)), "{json}");
            assert_eq!(err.kind(), crate::ErrorKind::Configuration);
        }
    }

    #[test]
    fn test_rejects_field_outside_segment() {
        let err = Settings::from_json(r#"{"binary_header": {"x": ["int", 398]}}"#).unwrap_err();
        assert!(matches!(err, SegyError::InvalidSetting { .. }));

        let err = Settings::from_json(
            r#"{"binary_header": {"x": ["int", 18446744073709551615]}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SegyError::InvalidSetting { .. }));
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_configuration_takes_manual_values_only() {
        let mut settings = Settings::default();
        settings.endian_detection = DetectionMode::Manual;
        settings.endian = Some(ByteOrder::Big);
        settings.binary_header.insert(SAMPLE_FORMAT_CODE, SchemaEntry::int(60));

        let config = Configuration::try_from(&settings).unwrap();
        assert_eq!(config.endian(), Some(ByteOrder::Big));
        assert_eq!(config.modes().endian, DetectionMode::Manual);
        // auto-mode defaults are not carried over
        assert_eq!(config.sample_format(), None);
        assert_eq!(config.text_header_encoding(), None);
        assert_eq!(config.binary_field(SAMPLE_FORMAT_CODE).unwrap().1, 3260);
    }
}
