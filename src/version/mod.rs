//! Driver and OS version handling
//!
//! Versions are four 16-bit components (`A.B.C.D`) ordered most significant
//! first. Windows driver strings use a padded-decimal parse where each minor
//! component is read as a four digit fraction, see [`DriverVersionFormat`].

mod op;
mod tuple;

pub use op::VersionComparisonOp;
pub use tuple::{DriverVersionFormat, VersionTuple};
