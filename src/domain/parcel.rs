use serde::{Deserialize, Serialize};

use super::point::Ring;
use super::tier::SizeTier;
use crate::geometry::area_hectares;

/// Owner metadata supplied by the caller; never resolved here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerRef {
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl OwnerRef {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A farmer's land parcel with its boundary ring.
///
/// `area_hectares` always reflects `ring`; it is recomputed whenever the ring
/// is set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandParcel {
    pub id: String,
    pub name: String,
    pub location: String,
    pub soil_type: String,
    area_hectares: f64,
    #[serde(rename = "coordinates")]
    ring: Ring,
    pub owner: OwnerRef,
}

impl LandParcel {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        soil_type: impl Into<String>,
        ring: Ring,
        owner: OwnerRef,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            soil_type: soil_type.into(),
            area_hectares: area_hectares(&ring),
            ring,
            owner,
        }
    }

    /// Attach identity and ownership to a decoded draft
    pub fn from_draft(id: impl Into<String>, draft: ParcelDraft, owner: OwnerRef) -> Self {
        Self::new(
            id,
            draft.name.unwrap_or_default(),
            String::new(),
            String::new(),
            draft.coordinates,
            owner,
        )
    }

    pub fn area_hectares(&self) -> f64 {
        self.area_hectares
    }

    pub fn ring(&self) -> &Ring {
        &self.ring
    }

    pub fn tier(&self) -> SizeTier {
        SizeTier::from_area(self.area_hectares)
    }

    /// Discard the current boundary and use `ring` instead
    pub fn replace_ring(&mut self, ring: Ring) {
        self.area_hectares = area_hectares(&ring);
        self.ring = ring;
    }
}

/// Parcel as received at the export boundary.
///
/// A supplied `area` is informational only; [`LandParcel`] recomputes it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParcelRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub soil_type: String,
    #[serde(default)]
    pub area: Option<f64>,
    pub owner: OwnerRef,
    #[serde(default)]
    pub coordinates: Ring,
}

impl From<ParcelRecord> for LandParcel {
    fn from(record: ParcelRecord) -> Self {
        let parcel = LandParcel::new(
            record.id,
            record.name,
            record.location,
            record.soil_type,
            record.coordinates,
            record.owner,
        );
        if let Some(supplied) = record.area
            && (supplied - parcel.area_hectares).abs() > 0.01
        {
            log::debug!(
                "parcel {}: supplied area {:.2} ha replaced by computed {:.2} ha",
                parcel.id,
                supplied,
                parcel.area_hectares
            );
        }
        parcel
    }
}

/// Parcel recovered from a KML document, without identity or owner
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParcelDraft {
    pub name: Option<String>,
    pub coordinates: Ring,
    pub area: f64,
}
