pub mod bits;
pub mod cpu_features;
pub mod file_format;
pub mod parallel;
pub mod plane;

pub use file_format::FileFormat;
pub use plane::{Dimensions, Plane, PlaneSizeError};
