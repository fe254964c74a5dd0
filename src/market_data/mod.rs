pub mod normalizer;
pub mod series;

pub use normalizer::{normalize, normalize_frame, RawBar, RawColumn, RawFrame};
pub use series::Series;
