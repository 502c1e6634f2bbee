use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde::Deserialize;
use std::fmt::Write;

use super::{KML_NAMESPACE, Skipped, xml_safe};
use crate::domain::{LandParcel, SizeTier};
use crate::error::ParcelError;

const LINE_WIDTH: u32 = 3;

fn default_document_name() -> String {
    "Farm Land Parcels".to_string()
}
fn default_document_description() -> String {
    "Land parcel boundaries exported for GIS tooling and inspection".to_string()
}
fn default_unnamed_placemark() -> String {
    "Unnamed Land".to_string()
}

/// Document-level text written into every export
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ExportOptions {
    #[serde(default = "default_document_name")]
    pub document_name: String,
    #[serde(default = "default_document_description")]
    pub document_description: String,
    /// Placemark name used when a parcel has none
    #[serde(default = "default_unnamed_placemark")]
    pub unnamed_placemark: String,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            document_name: default_document_name(),
            document_description: default_document_description(),
            unnamed_placemark: default_unnamed_placemark(),
        }
    }
}

/// Serializes parcels into a KML 2.2 document.
///
/// Output is deterministic: the same parcels and options always produce the
/// same bytes. Parcels with degenerate rings are skipped, never fatal.
#[derive(Debug, Clone, Default)]
pub struct KmlEncoder {
    options: ExportOptions,
}

impl KmlEncoder {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn encode(&self, parcels: &[LandParcel]) -> String {
        self.encode_with_report(parcels).0
    }

    /// Encode and also return the parcels that were left out
    pub fn encode_with_report(&self, parcels: &[LandParcel]) -> (String, Vec<Skipped>) {
        let mut xml = KmlWriter::new();
        let mut skipped = Vec::new();

        xml.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)));
        xml.open_with("kml", ("xmlns", KML_NAMESPACE));
        xml.open("Document");
        xml.text_element("name", &self.options.document_name);
        xml.text_element("description", &self.options.document_description);

        for tier in SizeTier::ALL {
            write_style(&mut xml, tier);
        }

        for (index, parcel) in parcels.iter().enumerate() {
            if parcel.ring().is_degenerate() {
                log::debug!(
                    "skipping parcel {} ({} vertices)",
                    parcel.id,
                    parcel.ring().len()
                );
                skipped.push(Skipped {
                    index,
                    label: Some(parcel.id.clone()),
                    error: ParcelError::InvalidRing {
                        vertices: parcel.ring().len(),
                    },
                });
                continue;
            }
            self.write_placemark(&mut xml, parcel);
        }

        xml.close("Document");
        xml.close("kml");

        log::info!(
            "encoded {} of {} parcels to KML",
            parcels.len() - skipped.len(),
            parcels.len()
        );

        (xml.finish(), skipped)
    }

    fn write_placemark(&self, xml: &mut KmlWriter, parcel: &LandParcel) {
        let name = self.display_name(parcel);

        xml.open("Placemark");
        xml.text_element("name", name);
        xml.cdata_element("description", &describe(parcel, name));
        xml.text_element("styleUrl", &format!("#{}", parcel.tier().style_id()));
        xml.open("Polygon");
        xml.text_element("extrude", "1");
        xml.text_element("altitudeMode", "clampToGround");
        xml.open("outerBoundaryIs");
        xml.open("LinearRing");
        xml.text_element("coordinates", &coordinates_text(parcel));
        xml.close("LinearRing");
        xml.close("outerBoundaryIs");
        xml.close("Polygon");
        xml.close("Placemark");
    }

    fn display_name<'a>(&'a self, parcel: &'a LandParcel) -> &'a str {
        let name = parcel.name.trim();
        if name.is_empty() {
            &self.options.unnamed_placemark
        } else {
            name
        }
    }
}

/// Encode with default export options
pub fn encode(parcels: &[LandParcel]) -> String {
    KmlEncoder::default().encode(parcels)
}

pub fn encode_with_report(parcels: &[LandParcel]) -> (String, Vec<Skipped>) {
    KmlEncoder::default().encode_with_report(parcels)
}

fn write_style(xml: &mut KmlWriter, tier: SizeTier) {
    xml.open_with("Style", ("id", tier.style_id()));
    xml.open("LineStyle");
    xml.text_element("color", tier.line_color());
    xml.text_element("width", &LINE_WIDTH.to_string());
    xml.close("LineStyle");
    xml.open("PolyStyle");
    xml.text_element("color", tier.fill_color());
    xml.close("PolyStyle");
    xml.close("Style");
}

/// HTML summary for the placemark balloon. Every value is escaped, so the
/// result never contains `]]>`.
fn describe(parcel: &LandParcel, name: &str) -> String {
    fn row(html: &mut String, label: &str, value: &str) {
        let value = xml_safe(value);
        let _ = write!(html, "<p><b>{}:</b> {}</p>", label, escape(&*value));
    }

    let mut html = String::new();
    row(&mut html, "Owner", &parcel.owner.full_name());
    row(&mut html, "Parcel", name);
    row(&mut html, "Location", &parcel.location);
    row(&mut html, "Area", &format!("{:.2} ha", parcel.area_hectares()));
    if let Some(phone) = parcel.owner.phone.as_deref().filter(|s| !s.is_empty()) {
        row(&mut html, "Phone", phone);
    }
    if let Some(region) = parcel.owner.region.as_deref().filter(|s| !s.is_empty()) {
        row(&mut html, "Region", region);
    }
    if !parcel.soil_type.is_empty() {
        row(&mut html, "Soil type", &parcel.soil_type);
    }
    html
}

/// `lng,lat,0` triples in ring order; the closing vertex is not repeated
fn coordinates_text(parcel: &LandParcel) -> String {
    parcel
        .ring()
        .iter()
        .map(|p| format!("{},{},0", p.lng, p.lat))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Two-space indented KML on top of `quick_xml::Writer`
struct KmlWriter {
    inner: Writer<Vec<u8>>,
}

impl KmlWriter {
    fn new() -> Self {
        Self {
            inner: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) {
        // Writing into a Vec cannot fail
        let _ = self.inner.write_event(event);
    }

    fn open(&mut self, tag: &str) {
        self.event(Event::Start(BytesStart::new(tag)));
    }

    fn open_with(&mut self, tag: &str, attribute: (&str, &str)) {
        self.event(Event::Start(BytesStart::new(tag).with_attributes([attribute])));
    }

    fn close(&mut self, tag: &str) {
        self.event(Event::End(BytesEnd::new(tag)));
    }

    /// Element with escaped text content; characters XML cannot carry are dropped
    fn text_element(&mut self, tag: &str, text: &str) {
        self.open(tag);
        self.event(Event::Text(BytesText::new(&xml_safe(text))));
        self.close(tag);
    }

    fn cdata_element(&mut self, tag: &str, content: &str) {
        self.open(tag);
        self.event(Event::CData(BytesCData::new(xml_safe(content))));
        self.close(tag);
    }

    fn finish(self) -> String {
        String::from_utf8_lossy(&self.inner.into_inner()).into_owned()
    }
}
