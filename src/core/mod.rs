//! Core numeric routines shared by both dashboard variants
//!
//! Everything in here is a pure function or value type: coordinate
//! projection, flight-arc control points, the pulse animation rule and the
//! polygon triangulator. Rendering glue lives in the variant modules.

pub mod arc;
pub mod projection;
pub mod pulse;
pub mod triangulate;

pub use arc::{ARC_SEGMENTS, arc_control_points, sample_cubic};
pub use projection::{MapProjector, lglt2xyz};
pub use pulse::{Pulse, PulseFrame};
