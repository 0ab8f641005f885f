//! Planar geometry primitives shared by the contour pipeline.

pub mod hull;
pub mod point;
pub mod polygon;
pub mod simplify;

pub use hull::{convex_hull, convex_hull_indices};
pub use point::{cross, Point};
pub use polygon::{crossing_edges, signed_area, Polygon, PolygonSet, EPSILON};
pub use simplify::{douglas_peucker, douglas_peucker_closed};
