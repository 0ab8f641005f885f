//! SpriteHull
//!
//! Convex collision polygons from a sprite's alpha channel, with optional
//! Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Pipeline
//! An [`AlphaMask`] is coarsened by a downsample factor, split into
//! 4-connected opaque regions, and each region's outer boundary is traced
//! along pixel edges. Contours are simplified with Douglas-Peucker
//! (tolerance = quality threshold) and then cut into convex pieces wherever
//! a dimple is deeper than the concavity threshold.
//!
//! ## Coordinates
//! Row 0 of the mask is the top and column 0 the left. Output polygons are in
//! mask-space units with y pointing down and positive shoelace area
//! (clockwise on screen). [`physics::SpriteFrame`] converts them into a y-up
//! body frame for a physics engine.
//!
//! ## Thresholds
//! - **Quality**: how far (in mask units) a simplified outline may stray from
//!   the traced boundary. `0.0` keeps every corner.
//! - **Concavity**: how deep a dimple must be before the shape is split
//!   there. `f64::INFINITY` skips decomposition and returns one outline per
//!   region, which may be concave.
//!
//! The convenience entry point [`extract_polygons_default`] uses 2.0 for both.

pub mod config;
pub mod contour;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod mask;
pub mod physics;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{ExtractionConfig, SpriteConfig};
pub use error::{DegenerateReason, GeometryError, RegisterError};
pub use extract::{
    extract, extract_batch, extract_polygons, extract_polygons_default, DroppedContour, Extraction,
    ExtractionReport,
};
pub use geometry::{Point, Polygon, PolygonSet};
pub use mask::{AlphaMask, DownsamplePolicy};
pub use physics::{
    build_body, mass_properties, register_sprite, BodyDescriptor, BodyKind, PhysicalProperties,
    PhysicsWorld, ShapeDescriptor, SpriteFrame,
};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::PyReadonlyArray2;
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::config::ExtractionConfig;
    use crate::error::GeometryError;
    use crate::extract::extract;
    use crate::geometry::PolygonSet;
    use crate::mask::AlphaMask;

    type PyPolygons = Vec<Vec<(f64, f64)>>;

    fn to_py_err(err: GeometryError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }

    fn to_py_polygons(set: PolygonSet) -> PyPolygons {
        set.into_iter()
            .map(|poly| poly.into_vertices().into_iter().map(|p| (p.x, p.y)).collect())
            .collect()
    }

    fn run(
        mask: AlphaMask,
        downsample: usize,
        quality: f64,
        concavity: f64,
    ) -> PyResult<PyPolygons> {
        let config = ExtractionConfig::new(downsample, quality, concavity);
        let extraction = extract(&mask, &config).map_err(to_py_err)?;
        Ok(to_py_polygons(extraction.polygons))
    }

    /// Extract convex collision polygons from a float alpha mask.
    ///
    /// # Arguments
    /// * `alpha` - (height, width) array, values 0.0-1.0
    /// * `downsample` - Block size used before tracing
    /// * `quality` - Maximum outline deviation in pixels
    /// * `concavity` - Dimple depth that triggers a split (`float('inf')` disables splitting)
    ///
    /// # Returns
    /// List of polygons, each a list of (x, y) tuples
    #[pyfunction]
    #[pyo3(signature = (alpha, downsample=1, quality=2.0, concavity=2.0))]
    pub fn extract_polygons<'py>(
        py: Python<'py>,
        alpha: PyReadonlyArray2<'py, f32>,
        downsample: usize,
        quality: f64,
        concavity: f64,
    ) -> PyResult<PyPolygons> {
        let mask = AlphaMask::from_view(alpha.as_array());
        py.allow_threads(|| run(mask, downsample, quality, concavity))
    }

    /// Extract convex collision polygons from a uint8 alpha mask (0-255).
    #[pyfunction]
    #[pyo3(signature = (alpha, downsample=1, quality=2.0, concavity=2.0))]
    pub fn extract_polygons_u8<'py>(
        py: Python<'py>,
        alpha: PyReadonlyArray2<'py, u8>,
        downsample: usize,
        quality: f64,
        concavity: f64,
    ) -> PyResult<PyPolygons> {
        let mask = AlphaMask::from_array(alpha.as_array().mapv(|v| v as f32 / 255.0));
        py.allow_threads(|| run(mask, downsample, quality, concavity))
    }

    /// SpriteHull Rust extension module
    #[pymodule]
    pub fn spritehull(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(extract_polygons, m)?)?;
        m.add_function(wrap_pyfunction!(extract_polygons_u8, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::spritehull;
