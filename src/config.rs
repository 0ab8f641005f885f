//! Extraction and sprite configuration.
//!
//! Configuration is an immutable value passed into each call. Both structs
//! (de)serialize with serde so presets can be stored next to sprite assets.

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::mask::DownsamplePolicy;
use crate::physics::PhysicalProperties;

/// Default shape quality in mask-space units.
pub const DEFAULT_QUALITY_THRESHOLD: f64 = 2.0;
/// Default concavity depth in mask-space units.
pub const DEFAULT_CONCAVITY_THRESHOLD: f64 = 2.0;
/// Samples strictly above this are opaque.
pub const DEFAULT_OPACITY_THRESHOLD: f32 = 0.5;
/// Regions smaller than this (mask-space units squared) are dropped.
pub const DEFAULT_MIN_AREA: f64 = 4.0;

/// Parameters of one polygon extraction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Block size used to coarsen the mask before tracing.
    pub downsample: usize,
    /// Maximum distance a simplified vertex may deviate from the traced boundary.
    pub quality_threshold: f64,
    /// Minimum dimple depth that causes a split. `f64::INFINITY` disables
    /// decomposition and emits each simplified contour unmodified.
    #[serde(with = "infinite_as_null")]
    pub concavity_threshold: f64,
    pub opacity_threshold: f32,
    pub downsample_policy: DownsamplePolicy,
    pub min_area: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            downsample: 1,
            quality_threshold: DEFAULT_QUALITY_THRESHOLD,
            concavity_threshold: DEFAULT_CONCAVITY_THRESHOLD,
            opacity_threshold: DEFAULT_OPACITY_THRESHOLD,
            downsample_policy: DownsamplePolicy::Any,
            min_area: DEFAULT_MIN_AREA,
        }
    }
}

impl ExtractionConfig {
    pub fn new(downsample: usize, quality_threshold: f64, concavity_threshold: f64) -> Self {
        Self {
            downsample,
            quality_threshold,
            concavity_threshold,
            ..Self::default()
        }
    }

    pub fn with_downsample(mut self, downsample: usize) -> Self {
        self.downsample = downsample;
        self
    }

    pub fn with_quality(mut self, quality_threshold: f64) -> Self {
        self.quality_threshold = quality_threshold;
        self
    }

    pub fn with_concavity(mut self, concavity_threshold: f64) -> Self {
        self.concavity_threshold = concavity_threshold;
        self
    }

    pub fn with_opacity_threshold(mut self, opacity_threshold: f32) -> Self {
        self.opacity_threshold = opacity_threshold;
        self
    }

    pub fn with_policy(mut self, policy: DownsamplePolicy) -> Self {
        self.downsample_policy = policy;
        self
    }

    pub fn with_min_area(mut self, min_area: f64) -> Self {
        self.min_area = min_area;
        self
    }

    /// True when convex decomposition is skipped.
    pub fn skips_decomposition(&self) -> bool {
        self.concavity_threshold == f64::INFINITY
    }

    /// Reject out-of-domain parameters.
    pub fn validate(&self) -> Result<(), GeometryError> {
        if self.downsample == 0 {
            return Err(GeometryError::invalid("downsample must be positive"));
        }
        if !self.quality_threshold.is_finite() || self.quality_threshold < 0.0 {
            return Err(GeometryError::invalid(format!(
                "quality threshold must be a finite non-negative number, got {}",
                self.quality_threshold
            )));
        }
        // +inf is allowed
        if self.concavity_threshold.is_nan() || self.concavity_threshold < 0.0 {
            return Err(GeometryError::invalid(format!(
                "concavity threshold must be non-negative, got {}",
                self.concavity_threshold
            )));
        }
        if !(0.0..1.0).contains(&self.opacity_threshold) {
            return Err(GeometryError::invalid(format!(
                "opacity threshold must be in [0, 1), got {}",
                self.opacity_threshold
            )));
        }
        if !self.min_area.is_finite() || self.min_area < 0.0 {
            return Err(GeometryError::invalid(format!(
                "minimum area must be a finite non-negative number, got {}",
                self.min_area
            )));
        }
        Ok(())
    }
}

/// Everything needed to turn one sprite into a physics body.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpriteConfig {
    pub extraction: ExtractionConfig,
    pub physics: PhysicalProperties,
}

/// JSON has no infinity; store an infinite threshold as `null`.
mod infinite_as_null {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_infinite() {
            serializer.serialize_none()
        } else {
            serializer.serialize_some(value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}
