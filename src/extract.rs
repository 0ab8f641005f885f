//! Polygon extraction pipeline.
//!
//! Stages, in order:
//! 1. Downsample the alpha mask into a boolean grid
//! 2. Label 4-connected opaque regions
//! 3. Trace each region's outer boundary (holes are filled)
//! 4. Simplify each contour with Douglas-Peucker (tolerance = quality)
//! 5. Split each contour into convex pieces (skipped for infinite concavity)
//!
//! Degenerate contours are dropped and reported; they never fail the call.

use log::{debug, trace};
use rayon::prelude::*;
use serde::Serialize;

use crate::config::{ExtractionConfig, DEFAULT_CONCAVITY_THRESHOLD, DEFAULT_QUALITY_THRESHOLD};
use crate::contour::{convex_decompose, trace_regions, TracedContour};
use crate::error::{DegenerateReason, GeometryError};
use crate::geometry::{douglas_peucker_closed, Polygon, PolygonSet, EPSILON};
use crate::mask::{downsample, label_regions, AlphaMask};

/// A contour removed from the output.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DroppedContour {
    /// Region index in discovery order.
    pub index: usize,
    pub reason: DegenerateReason,
}

/// Diagnostics gathered during one extraction.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ExtractionReport {
    /// Connected opaque regions found after downsampling.
    pub regions: usize,
    /// Vertices across all traced contours.
    pub traced_vertices: usize,
    /// Vertices across all contours that survived simplification.
    pub simplified_vertices: usize,
    pub dropped: Vec<DroppedContour>,
}

/// Polygons plus the report describing how they were produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Extraction {
    pub polygons: PolygonSet,
    pub report: ExtractionReport,
}

/// Extract polygons with explicit thresholds.
///
/// Pass `f64::INFINITY` as `concavity_threshold` to skip convex
/// decomposition and get one (possibly concave) polygon per region.
pub fn extract_polygons(
    mask: &AlphaMask,
    downsample: usize,
    quality_threshold: f64,
    concavity_threshold: f64,
) -> Result<PolygonSet, GeometryError> {
    let config = ExtractionConfig::new(downsample, quality_threshold, concavity_threshold);
    extract(mask, &config).map(|e| e.polygons)
}

/// Extract polygons with the default thresholds (quality 2.0, concavity 2.0).
pub fn extract_polygons_default(
    mask: &AlphaMask,
    downsample: usize,
) -> Result<PolygonSet, GeometryError> {
    extract_polygons(
        mask,
        downsample,
        DEFAULT_QUALITY_THRESHOLD,
        DEFAULT_CONCAVITY_THRESHOLD,
    )
}

/// Run the full pipeline on one mask.
pub fn extract(mask: &AlphaMask, config: &ExtractionConfig) -> Result<Extraction, GeometryError> {
    config.validate()?;
    if mask.width() == 0 || mask.height() == 0 {
        return Err(GeometryError::invalid(format!(
            "mask dimensions must be non-zero, got {}x{}",
            mask.width(),
            mask.height()
        )));
    }

    let grid = downsample(
        mask,
        config.downsample,
        config.opacity_threshold,
        config.downsample_policy,
    );
    let regions = label_regions(&grid);
    let contours = trace_regions(&grid, &regions, (mask.width(), mask.height()));

    trace!(
        "{}x{} mask -> {}x{} grid, {} opaque cells, {} regions",
        mask.width(),
        mask.height(),
        grid.width(),
        grid.height(),
        grid.count_opaque(),
        contours.len()
    );

    let mask_area = (mask.width() * mask.height()) as f64;
    let extraction = build_polygons(&contours, config, mask_area);

    trace!(
        "{} polygons from {} regions ({} dropped), vertices {} traced / {} simplified",
        extraction.polygons.len(),
        extraction.report.regions,
        extraction.report.dropped.len(),
        extraction.report.traced_vertices,
        extraction.report.simplified_vertices
    );

    Ok(extraction)
}

/// Extract many masks in parallel, preserving input order.
///
/// Each mask is an independent call; one failing mask does not affect the others.
pub fn extract_batch(
    masks: &[AlphaMask],
    config: &ExtractionConfig,
) -> Vec<Result<Extraction, GeometryError>> {
    masks.par_iter().map(|mask| extract(mask, config)).collect()
}

/// Simplify and decompose traced contours, dropping degenerate ones.
fn build_polygons(
    contours: &[TracedContour],
    config: &ExtractionConfig,
    mask_area: f64,
) -> Extraction {
    let mut polygons = PolygonSet::new();
    let mut report = ExtractionReport {
        regions: contours.len(),
        ..ExtractionReport::default()
    };

    for (index, contour) in contours.iter().enumerate() {
        report.traced_vertices += contour.points.len();

        let simplified = match simplify_contour(contour, config, mask_area) {
            Ok(polygon) => polygon,
            Err(reason) => {
                let err = GeometryError::DegenerateGeometry {
                    contour: index,
                    reason,
                };
                debug!("dropping {err}");
                report.dropped.push(DroppedContour { index, reason });
                continue;
            }
        };
        report.simplified_vertices += simplified.len();

        if config.skips_decomposition() {
            polygons.push(simplified);
        } else {
            polygons.extend(convex_decompose(
                simplified.vertices(),
                config.concavity_threshold,
            ));
        }
    }

    Extraction { polygons, report }
}

/// Filter by area and simplify one traced contour.
///
/// A region covering the whole mask is never below the minimum area: a
/// fully opaque sprite always gets collision geometry.
fn simplify_contour(
    contour: &TracedContour,
    config: &ExtractionConfig,
    mask_area: f64,
) -> Result<Polygon, DegenerateReason> {
    let covers_mask = contour.area >= mask_area - EPSILON;
    if contour.area < config.min_area && !covers_mask {
        return Err(DegenerateReason::BelowMinArea { area: contour.area });
    }

    let simplified = douglas_peucker_closed(&contour.points, config.quality_threshold);
    if simplified.len() < 3 {
        return Err(DegenerateReason::TooFewVertices {
            vertices: simplified.len(),
        });
    }

    Polygon::new(simplified).ok_or(DegenerateReason::ZeroArea)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{crossing_edges, Point};
    use crate::mask::DownsamplePolicy;
    use ndarray::Array2;

    const TOLERANCE: f64 = 1e-6;

    fn rect_mask(width: usize, height: usize) -> AlphaMask {
        AlphaMask::from_fn(width, height, |_, _| 1.0)
    }

    /// Plus sign with arm length `arm` and arm width `bar`, inside a 2 pixel margin.
    fn plus_mask(arm: usize, bar: usize) -> AlphaMask {
        let size = 2 * arm + bar + 4;
        AlphaMask::from_fn(size, size, |x, y| {
            let (lo, hi) = (2 + arm, 2 + arm + bar);
            let in_span = |v: usize| (2..size - 2).contains(&v);
            let vertical = (lo..hi).contains(&x) && in_span(y);
            let horizontal = (lo..hi).contains(&y) && in_span(x);
            if vertical || horizontal {
                1.0
            } else {
                0.0
            }
        })
    }

    fn circle_mask(size: usize, radius: f64) -> AlphaMask {
        let c = size as f64 / 2.0;
        AlphaMask::from_fn(size, size, |x, y| {
            let dx = x as f64 + 0.5 - c;
            let dy = y as f64 + 0.5 - c;
            if dx * dx + dy * dy <= radius * radius {
                1.0
            } else {
                0.0
            }
        })
    }

    /// Deterministic speckled blobs.
    fn noise_mask(size: usize, seed: u64) -> AlphaMask {
        let mut state = seed;
        let mut samples = Vec::with_capacity(size * size);
        for _ in 0..size * size {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            samples.push(((state >> 33) % 1000) as f32 / 1000.0);
        }
        let raw = AlphaMask::from_f32(&samples, size, size).unwrap();
        // Smooth with a 3x3 box so opaque cells clump together
        AlphaMask::from_fn(size, size, |x, y| {
            let mut sum = 0.0;
            let mut count = 0.0;
            for sy in y.saturating_sub(1)..(y + 2).min(size) {
                for sx in x.saturating_sub(1)..(x + 2).min(size) {
                    sum += raw.get(sx, sy);
                    count += 1.0;
                }
            }
            sum / count
        })
    }

    fn hull_vertices_on_hull(polygon: &Polygon) -> bool {
        polygon.is_convex(TOLERANCE)
    }

    #[test]
    fn test_full_rectangle_yields_bounding_rect() {
        let mask = rect_mask(20, 12);
        for quality in [0.0, 0.5, 2.0, 4.0] {
            for concavity in [0.0, 2.0, f64::INFINITY] {
                let set = extract_polygons(&mask, 1, quality, concavity).unwrap();
                assert_eq!(set.len(), 1, "quality {quality}, concavity {concavity}");
                let poly = &set.as_slice()[0];
                assert_eq!(poly.len(), 4);
                let (min, max) = poly.bounds();
                assert_eq!(min, Point::new(0.0, 0.0));
                assert_eq!(max, Point::new(20.0, 12.0));
                assert!((poly.area() - 240.0).abs() < TOLERANCE);
            }
        }
    }

    #[test]
    fn test_thin_rectangles_keep_collision_geometry() {
        for height in [1, 2] {
            for width in [1, 2, 3, 20] {
                let mask = rect_mask(width, height);
                let full = (width * height) as f64;
                for quality in [0.0, 0.5, 2.0, 4.0, 8.0] {
                    for concavity in [0.0, 2.0, f64::INFINITY] {
                        let set = extract_polygons(&mask, 1, quality, concavity).unwrap();
                        let case = format!("{width}x{height}, q {quality}, c {concavity}");
                        assert_eq!(set.len(), 1, "{case}");
                        let poly = &set.as_slice()[0];
                        let (min, max) = poly.bounds();
                        assert_eq!(min, Point::new(0.0, 0.0), "{case}");
                        assert_eq!(max, Point::new(width as f64, height as f64), "{case}");
                        assert!(poly.area() >= full / 2.0 - TOLERANCE, "{case}");
                        if quality == 0.0 {
                            assert_eq!(poly.len(), 4, "{case}");
                            assert!((poly.area() - full).abs() < TOLERANCE, "{case}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_default_thresholds_on_tiny_opaque_masks() {
        for (width, height) in [(1, 1), (3, 1), (2, 2), (100, 1)] {
            let set = extract_polygons_default(&rect_mask(width, height), 1).unwrap();
            assert_eq!(set.len(), 1, "{width}x{height}");
        }
    }

    #[test]
    fn test_outlines_never_self_intersect() {
        for seed in [3, 7, 11, 19, 42, 77] {
            let mask = noise_mask(40, seed);
            for quality in [0.5, 1.0, 2.0, 4.0] {
                for concavity in [1.0, f64::INFINITY] {
                    let set = extract_polygons(&mask, 1, quality, concavity).unwrap();
                    for polygon in &set {
                        assert!(
                            crossing_edges(polygon.vertices()).is_empty(),
                            "seed {seed}, quality {quality}, concavity {concavity}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_collapsed_contours_are_reported() {
        let contour = |coords: &[(f64, f64)], area: f64| TracedContour {
            label: 1,
            points: coords.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            area,
        };
        let contours = [
            contour(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)], 16.0),
            // Every vertex on one line
            contour(&[(0.0, 0.0), (5.0, 0.0), (10.0, 0.0), (5.0, 0.0)], 10.0),
            // Out and back along the same edge
            contour(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (4.0, 0.0)], 10.0),
        ];

        let extraction = build_polygons(&contours, &ExtractionConfig::default(), 1000.0);
        assert_eq!(extraction.polygons.len(), 1);
        assert_eq!(extraction.report.regions, 3);
        assert_eq!(
            extraction.report.dropped,
            vec![
                DroppedContour {
                    index: 1,
                    reason: DegenerateReason::TooFewVertices { vertices: 2 },
                },
                DroppedContour {
                    index: 2,
                    reason: DegenerateReason::ZeroArea,
                },
            ]
        );
    }

    #[test]
    fn test_downsampled_rectangle_clamps_to_mask() {
        let mask = rect_mask(21, 13);
        let set = extract_polygons(&mask, 2, 1.0, 2.0).unwrap();
        assert_eq!(set.len(), 1);
        let (min, max) = set.as_slice()[0].bounds();
        assert_eq!(min, Point::new(0.0, 0.0));
        assert_eq!(max, Point::new(21.0, 13.0));
    }

    #[test]
    fn test_diagonal_line_is_dropped_not_an_error() {
        let mask = AlphaMask::from_fn(16, 16, |x, y| if x == y { 1.0 } else { 0.0 });
        let extraction = extract(&mask, &ExtractionConfig::default()).unwrap();
        assert!(extraction.polygons.is_empty());
        assert_eq!(extraction.report.regions, 16);
        assert_eq!(extraction.report.dropped.len(), 16);
        assert!(extraction
            .report
            .dropped
            .iter()
            .all(|d| matches!(d.reason, DegenerateReason::BelowMinArea { .. })));
    }

    #[test]
    fn test_plus_sign_concavity_threshold() {
        let (arm, bar) = (8, 8);
        let mask = plus_mask(arm, bar);
        // Inner corners sit arm / sqrt(2) inside the octagonal hull
        let depth = arm as f64 / 2.0f64.sqrt();

        let single = extract_polygons(&mask, 1, 0.5, depth + 1.0).unwrap();
        assert_eq!(single.len(), 1);
        assert!(hull_vertices_on_hull(&single.as_slice()[0]));

        let split = extract_polygons(&mask, 1, 0.5, depth - 1.0).unwrap();
        assert!(split.len() >= 2);
        assert!(split.iter().all(hull_vertices_on_hull));

        // Every opaque pixel center is covered by some piece
        for y in 0..mask.height() {
            for x in 0..mask.width() {
                if mask.get(x, y) > 0.5 {
                    let center = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                    assert!(split.covers(&center), "pixel ({x}, {y}) not covered");
                }
            }
        }
    }

    #[test]
    fn test_plus_sign_pieces_partition_area() {
        let mask = plus_mask(6, 4);
        let split = extract_polygons(&mask, 1, 0.0, 0.5).unwrap();
        // Arms are rectangles, so the convex pieces tile the plus exactly
        let expected = (4 * 6 * 4 + 4 * 4) as f64;
        assert!((split.total_area() - expected).abs() < TOLERANCE);
    }

    #[test]
    fn test_finite_concavity_always_convex() {
        let masks = [
            plus_mask(8, 4),
            circle_mask(40, 15.0),
            noise_mask(48, 7),
            noise_mask(48, 42),
        ];
        for mask in &masks {
            for quality in [0.0, 1.0, 2.0] {
                for concavity in [0.0, 1.0, 3.0] {
                    let set = extract_polygons(mask, 1, quality, concavity).unwrap();
                    for polygon in &set {
                        assert!(polygon.len() >= 3);
                        assert!(polygon.area() > 0.0);
                        assert!(polygon.is_convex(TOLERANCE));
                    }
                }
            }
        }
    }

    #[test]
    fn test_quality_is_monotone() {
        for mask in [circle_mask(64, 25.0), noise_mask(48, 3), plus_mask(10, 6)] {
            let mut previous = usize::MAX;
            for quality in [0.0, 0.5, 1.0, 2.0, 4.0, 8.0] {
                let set = extract_polygons(&mask, 1, quality, f64::INFINITY).unwrap();
                let total = set.total_vertices();
                assert!(total <= previous, "quality {quality}: {total} > {previous}");
                previous = total;
            }
        }
    }

    #[test]
    fn test_infinite_concavity_one_polygon_per_region() {
        // Two plus signs side by side and a square island
        let left = plus_mask(6, 4);
        let width = 2 * left.width() + 12;
        let height = left.height();
        let mask = AlphaMask::from_fn(width, height, |x, y| {
            if x < left.width() {
                left.get(x, y)
            } else if x < 2 * left.width() {
                left.get(x - left.width(), y)
            } else if x >= width - 8 && x < width - 2 && (2..8).contains(&y) {
                1.0
            } else {
                0.0
            }
        });
        let extraction = extract(&mask, &ExtractionConfig::new(1, 0.5, f64::INFINITY)).unwrap();
        assert_eq!(extraction.report.regions, 3);
        assert_eq!(extraction.polygons.len(), 3);
        // Concave outlines survive untouched
        assert_eq!(extraction.polygons.as_slice()[0].len(), 12);
        assert!(!extraction.polygons.as_slice()[0].is_convex(TOLERANCE));
    }

    #[test]
    fn test_holes_are_filled() {
        let mask = AlphaMask::from_fn(20, 20, |x, y| {
            let ring = (2..18).contains(&x) && (2..18).contains(&y);
            let hole = (6..14).contains(&x) && (6..14).contains(&y);
            if ring && !hole {
                1.0
            } else {
                0.0
            }
        });
        let set = extract_polygons(&mask, 1, 0.0, f64::INFINITY).unwrap();
        assert_eq!(set.len(), 1);
        assert!((set.as_slice()[0].area() - 256.0).abs() < TOLERANCE);
        assert!(set.covers(&Point::new(10.0, 10.0)));
    }

    #[test]
    fn test_majority_policy_removes_thin_features() {
        // 1-pixel horizontal line across a block grid
        let mask = AlphaMask::from_fn(16, 16, |_, y| if y == 5 { 1.0 } else { 0.0 });
        let any = ExtractionConfig::default().with_downsample(4);
        let majority = any.with_policy(DownsamplePolicy::Majority);
        assert_eq!(extract(&mask, &any).unwrap().polygons.len(), 1);
        assert!(extract(&mask, &majority).unwrap().polygons.is_empty());
    }

    #[test]
    fn test_output_winding_is_consistent() {
        let set = extract_polygons(&circle_mask(40, 12.0), 1, 1.0, 2.0).unwrap();
        assert!(!set.is_empty());
        for polygon in &set {
            assert!(crate::geometry::signed_area(polygon.vertices()) > 0.0);
        }
    }

    #[test]
    fn test_deterministic() {
        let mask = noise_mask(40, 11);
        let config = ExtractionConfig::default();
        assert_eq!(extract(&mask, &config).unwrap(), extract(&mask, &config).unwrap());
    }

    #[test]
    fn test_invalid_input() {
        let mask = rect_mask(4, 4);
        assert!(matches!(
            extract_polygons(&mask, 0, 2.0, 2.0),
            Err(GeometryError::InvalidInput { .. })
        ));
        assert!(matches!(
            extract_polygons(&mask, 1, -1.0, 2.0),
            Err(GeometryError::InvalidInput { .. })
        ));
        let empty = AlphaMask::from_array(Array2::zeros((5, 0)));
        assert!(matches!(
            extract_polygons_default(&empty, 1),
            Err(GeometryError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_batch_preserves_order() {
        let masks = vec![
            rect_mask(10, 10),
            AlphaMask::from_array(Array2::zeros((0, 3))),
            rect_mask(20, 5),
        ];
        let results = extract_batch(&masks, &ExtractionConfig::default());
        assert_eq!(results.len(), 3);
        assert!((results[0].as_ref().unwrap().polygons.total_area() - 100.0).abs() < TOLERANCE);
        assert!(results[1].is_err());
        assert!((results[2].as_ref().unwrap().polygons.total_area() - 100.0).abs() < TOLERANCE);
    }
}
