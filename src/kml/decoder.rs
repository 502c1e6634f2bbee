use quick_xml::escape::unescape;
use regex::Regex;
use std::sync::LazyLock;

use super::{Skipped, xml_safe};
use crate::domain::{ParcelDraft, Point, Ring};
use crate::error::ParcelError;
use crate::geometry::area_hectares;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static PLACEMARK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<Placemark(?:\s(?:[^>]*[^/>])?)?>(.*?)</Placemark>").unwrap());
static NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<name\b[^>]*>(.*?)</name>").unwrap());
static COORDINATES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<coordinates\b[^>]*>(.*?)</coordinates>").unwrap());
static CDATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^<!\[CDATA\[(.*)\]\]>$").unwrap());

/// Parcels recovered from a document plus the placemarks that were dropped
#[derive(Debug, Clone, Default)]
pub struct DecodeReport {
    pub parcels: Vec<ParcelDraft>,
    pub skipped: Vec<Skipped>,
}

/// Decode parcel drafts, dropping malformed placemarks
pub fn decode(kml: &str) -> Result<Vec<ParcelDraft>, ParcelError> {
    decode_with_report(kml).map(|report| report.parcels)
}

/// Scan a KML document for `<Placemark>` blocks and turn each into a draft.
///
/// Tolerates partial or malformed XML: each block contributes its first
/// `<name>` and first `<coordinates>`. A block whose coordinates leave fewer
/// than 3 valid points is skipped. Only a document with no placemark blocks at
/// all is an error. Areas are recomputed from the vertices.
pub fn decode_with_report(kml: &str) -> Result<DecodeReport, ParcelError> {
    let text = COMMENT.replace_all(kml, "");

    let mut report = DecodeReport::default();
    let mut blocks = 0;

    for (index, block) in PLACEMARK.captures_iter(&text).enumerate() {
        blocks += 1;
        let body = block.get(1).map_or("", |m| m.as_str());
        let name = first_name(body);

        match parse_placemark(body) {
            Ok(ring) => {
                let area = area_hectares(&ring);
                report.parcels.push(ParcelDraft {
                    name,
                    coordinates: ring,
                    area,
                });
            }
            Err(error) => {
                log::warn!("skipping placemark #{}: {}", index, error);
                report.skipped.push(Skipped {
                    index,
                    label: name,
                    error,
                });
            }
        }
    }

    if blocks == 0 {
        return Err(ParcelError::Parse(
            "no <Placemark> elements found".to_string(),
        ));
    }

    log::info!(
        "decoded {} of {} placemarks from KML",
        report.parcels.len(),
        blocks
    );
    Ok(report)
}

fn first_name(body: &str) -> Option<String> {
    let raw = NAME.captures(body)?.get(1)?.as_str().trim();
    let name = match CDATA.captures(raw) {
        Some(c) => c.get(1).map_or("", |m| m.as_str()).trim().to_string(),
        None => unescape_text(raw),
    };
    let name = xml_safe(&name).into_owned();
    if name.is_empty() { None } else { Some(name) }
}

fn parse_placemark(body: &str) -> Result<Ring, ParcelError> {
    let text = COORDINATES
        .captures(body)
        .and_then(|c| c.get(1))
        .ok_or(ParcelError::MissingCoordinates)?
        .as_str();

    // KML repeats the first vertex to close a ring; `Ring` drops it
    let ring: Ring = text.split_whitespace().filter_map(parse_tuple).collect();
    if ring.is_degenerate() {
        return Err(ParcelError::InvalidRing {
            vertices: ring.len(),
        });
    }
    Ok(ring)
}

/// `lng,lat[,alt]` to a point; `None` for anything unusable
fn parse_tuple(token: &str) -> Option<Point> {
    let mut fields = token.split(',');
    let lng: f64 = fields.next()?.trim().parse().ok()?;
    let lat: f64 = fields.next()?.trim().parse().ok()?;
    let point = Point::new(lat, lng);
    point.is_finite().then_some(point)
}

/// Resolve entity and character references; text that is not valid escaped
/// XML (a bare `&`, an unknown entity) is kept as written
fn unescape_text(raw: &str) -> String {
    match unescape(raw) {
        Ok(text) => text.into_owned(),
        Err(e) => {
            log::debug!("keeping name {:?} unescaped: {}", raw, e);
            raw.to_string()
        }
    }
}
