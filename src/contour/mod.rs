//! Contour extraction and convex decomposition.
//!
//! - **Trace**: outer boundaries of opaque regions on the pixel-corner grid
//! - **Decompose**: deepest-notch splitting into convex polygons

pub mod decompose;
pub mod trace;

pub use decompose::{convex_decompose, deepest_notch, Notch};
pub use trace::{trace_region, trace_regions, TracedContour};
