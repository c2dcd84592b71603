pub mod contour;
pub mod placement;

pub use contour::Contour;
pub use placement::AffinePlacement;
