/// Upper bound (inclusive) of the `Small` band, in hectares
pub const SMALL_MAX_HECTARES: f64 = 20.0;
/// Upper bound (inclusive) of the `Medium` band, in hectares
pub const MEDIUM_MAX_HECTARES: f64 = 50.0;

/// Parcel size classification driving KML styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeTier {
    Small,
    Medium,
    Large,
}

impl SizeTier {
    pub const ALL: [SizeTier; 3] = [SizeTier::Small, SizeTier::Medium, SizeTier::Large];

    /// Classify an area in hectares.
    ///
    /// `area <= 20` is Small, `20 < area <= 50` is Medium, anything larger is
    /// Large. NaN compares false against both bounds and lands in Small.
    pub fn from_area(area_hectares: f64) -> SizeTier {
        if area_hectares > MEDIUM_MAX_HECTARES {
            SizeTier::Large
        } else if area_hectares > SMALL_MAX_HECTARES {
            SizeTier::Medium
        } else {
            SizeTier::Small
        }
    }

    /// KML `<Style id>` for this tier
    pub fn style_id(self) -> &'static str {
        match self {
            SizeTier::Small => "smallFarm",
            SizeTier::Medium => "mediumFarm",
            SizeTier::Large => "largeFarm",
        }
    }

    /// Opaque line colour in KML `aabbggrr` notation
    pub fn line_color(self) -> &'static str {
        match self {
            SizeTier::Small => "ff90ee90",
            SizeTier::Medium => "ff50af4c",
            SizeTier::Large => "ff205e1b",
        }
    }

    /// Semi-transparent (0x66 alpha) fill colour in KML `aabbggrr` notation
    pub fn fill_color(self) -> &'static str {
        match self {
            SizeTier::Small => "6690ee90",
            SizeTier::Medium => "6650af4c",
            SizeTier::Large => "66205e1b",
        }
    }
}

/// Classification policy entry point
pub fn tier(area_hectares: f64) -> SizeTier {
    SizeTier::from_area(area_hectares)
}
