pub mod parcel;
pub mod point;
pub mod tier;

pub use parcel::{LandParcel, OwnerRef, ParcelDraft, ParcelRecord};
pub use point::{MIN_RING_VERTICES, Point, Ring};
pub use tier::{SizeTier, tier};
