//! Error types for polygon extraction and physics registration.

use thiserror::Error;

/// Errors produced while turning an alpha mask into polygons.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Caller-supplied parameters are out of domain. Fatal to the call.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A single contour could not form a polygon.
    ///
    /// The extraction pipeline recovers from this by dropping the contour;
    /// it never escapes `extract`.
    #[error("contour {contour} is degenerate: {reason}")]
    DegenerateGeometry { contour: usize, reason: DegenerateReason },
}

impl GeometryError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Why a contour was dropped.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub enum DegenerateReason {
    /// The traced region covers less than the configured minimum area.
    BelowMinArea { area: f64 },
    /// Simplification left fewer than three vertices.
    TooFewVertices { vertices: usize },
    /// Simplification left a polygon with no enclosed area.
    ZeroArea,
}

impl std::fmt::Display for DegenerateReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BelowMinArea { area } => write!(f, "area {area:.3} below minimum"),
            Self::TooFewVertices { vertices } => {
                write!(f, "only {vertices} vertices after simplification")
            }
            Self::ZeroArea => write!(f, "zero area after simplification"),
        }
    }
}

/// Errors from [`crate::physics::register_sprite`].
#[derive(Debug, Error)]
pub enum RegisterError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// Every contour was dropped, so there is nothing to collide with.
    #[error("mask produced no collision geometry ({dropped} contours dropped)")]
    NoGeometry { dropped: usize },

    #[error("physics world rejected body: {0}")]
    World(#[source] E),
}
