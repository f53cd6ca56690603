pub mod detector;
pub mod normalize;

pub use detector::{detect, ReferenceIndex, PRICE_TOLERANCE_PERCENT};
