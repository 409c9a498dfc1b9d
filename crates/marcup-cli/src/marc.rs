//! MARC record assembly and MARCXML serialization
//!
//! Models the small slice of MARC this tool needs: datafields with a
//! 3-character tag, two indicators, and ordered subfields, plus the FFT
//! field that links an uploaded file to the record.

use crate::error::{CliError, Result};
use serde::Serialize;

/// MARC tag of the file-linking field
pub const LINK_FIELD_TAG: &str = "FFT";

/// Media type applied to hOCR output, which extension tables do not know
pub const HOCR_MEDIA_TYPE: &str = "text/vnd.hocr+html";

/// A single subfield: one-character code plus text content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subfield {
    #[serde(rename = "@code")]
    pub code: char,
    #[serde(rename = "$text")]
    pub text: String,
}

/// A tagged datafield with two indicators and ordered subfields
///
/// Immutable once built; ownership passes to the [`Record`] on append.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataField {
    #[serde(rename = "@tag")]
    pub tag: String,
    #[serde(rename = "@ind1")]
    pub ind1: String,
    #[serde(rename = "@ind2")]
    pub ind2: String,
    #[serde(rename = "subfield")]
    pub subfields: Vec<Subfield>,
}

impl DataField {
    /// Build a datafield from a 5-character MARC key (`tag` + `ind1` +
    /// `ind2`, e.g. `245__`) and subfield pairs.
    ///
    /// The `_` placeholder indicator is normalized to the empty indicator
    /// here, at construction. Pairs with empty text are dropped; a field
    /// left with no subfields is still valid.
    pub fn from_key(marc_key: &str, pairs: Vec<(char, String)>) -> Result<Self> {
        let chars: Vec<char> = marc_key.chars().collect();
        if chars.len() != 5 {
            return Err(CliError::InvalidMarcKey(marc_key.to_string()));
        }

        let tag: String = chars[..3].iter().collect();
        Ok(Self::build(
            tag,
            normalize_indicator(chars[3]),
            normalize_indicator(chars[4]),
            pairs,
        ))
    }

    /// Build the FFT field linking an uploaded file to the record.
    ///
    /// Derives the media type from the file name; returns `None` when no
    /// type can be resolved, in which case the caller leaves the file
    /// unlinked (a deliberate no-op, not an error).
    pub fn link(
        object_key: &str,
        checksum: &str,
        storage_location: &str,
        file_name: &str,
    ) -> Option<Self> {
        let media_type = resolve_media_type(file_name)?;

        Some(Self::build(
            LINK_FIELD_TAG.to_string(),
            String::new(),
            String::new(),
            vec![
                ('a', object_key.to_string()),
                ('c', checksum.to_string()),
                ('e', media_type),
                ('l', storage_location.to_string()),
                ('n', file_name.to_string()),
            ],
        ))
    }

    fn build(tag: String, ind1: String, ind2: String, pairs: Vec<(char, String)>) -> Self {
        let subfields = pairs
            .into_iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(code, text)| Subfield { code, text })
            .collect();

        Self {
            tag,
            ind1,
            ind2,
            subfields,
        }
    }
}

fn normalize_indicator(indicator: char) -> String {
    if indicator == '_' {
        String::new()
    } else {
        indicator.to_string()
    }
}

/// Resolve a media type from a file name extension.
///
/// Falls back to the hOCR override for `.hocr` files, which the extension
/// tables do not cover; any other unknown extension resolves to `None`.
pub fn resolve_media_type(file_name: &str) -> Option<String> {
    if let Some(mime) = mime_guess::from_path(file_name).first() {
        return Some(mime.essence_str().to_string());
    }
    if file_name.ends_with(".hocr") {
        return Some(HOCR_MEDIA_TYPE.to_string());
    }
    None
}

/// The single aggregate record built for a whole run
///
/// Field order is insertion order: configured metadata fields first, then
/// one linking field per verified file in file-enumeration order. Ordering
/// is a correctness property of the serialized document.
#[derive(Debug, Default, Serialize)]
#[serde(rename = "record")]
pub struct Record {
    #[serde(rename = "datafield")]
    fields: Vec<DataField>,
}

impl Record {
    /// Create an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a datafield, taking ownership
    pub fn append(&mut self, field: DataField) {
        self.fields.push(field);
    }

    /// Fields in serialization order
    pub fn fields(&self) -> &[DataField] {
        &self.fields
    }

    /// Number of FFT linking fields currently in the record
    pub fn link_count(&self) -> usize {
        self.fields.iter().filter(|f| f.tag == LINK_FIELD_TAG).count()
    }

    /// Serialize to an indented MARCXML string with lower-case attribute
    /// names, as the downstream record schema requires
    pub fn to_xml(&self) -> Result<String> {
        let mut out = String::new();
        let mut serializer = quick_xml::se::Serializer::new(&mut out);
        serializer.indent(' ', 2);
        self.serialize(serializer)?;
        Ok(out)
    }
}
