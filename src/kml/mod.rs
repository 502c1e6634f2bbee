//! KML 2.2 interchange for land parcels
//!
//! The encoder writes one styled `<Placemark>` per parcel; the decoder pulls
//! parcel drafts back out of any document with `<Placemark>` blocks, tolerating
//! malformed records. The lat/lng to lng,lat swap happens only here.

pub mod decoder;
pub mod encoder;

pub use decoder::{DecodeReport, decode, decode_with_report};
pub use encoder::{ExportOptions, KmlEncoder, encode, encode_with_report};

use std::borrow::Cow;

use crate::error::ParcelError;

pub const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";

/// XML 1.0 `Char` production
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

/// Drop code points an XML 1.0 document cannot carry, even as references
pub(crate) fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// An item a batch operation left out, and why
#[derive(Debug, Clone, PartialEq)]
pub struct Skipped {
    /// Position of the item in the input (parcel index or placemark ordinal)
    pub index: usize,
    /// Parcel id on export, placemark name (if any) on import
    pub label: Option<String>,
    pub error: ParcelError,
}

impl std::fmt::Display for Skipped {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.label {
            Some(label) => write!(f, "#{} ({}): {}", self.index, label, self.error),
            None => write!(f, "#{}: {}", self.index, self.error),
        }
    }
}
