//! Physics engine adapter.
//!
//! The geometry core knows nothing about physics engines. This module turns
//! a [`PolygonSet`] into an engine-neutral [`BodyDescriptor`] and hands it to
//! any engine implementing [`PhysicsWorld`].
//!
//! ## Body frame
//! Mask space has y pointing down with the origin at the top-left pixel.
//! Body-local space has y pointing up with the origin at the sprite's anchor
//! point, scaled to world units. Body-local polygons have positive signed
//! area in that y-up frame (counter-clockwise).

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::SpriteConfig;
use crate::error::RegisterError;
use crate::extract::extract;
use crate::geometry::{signed_area, Point, Polygon, PolygonSet};
use crate::mask::AlphaMask;

/// Material and body-type settings forwarded to the physics engine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicalProperties {
    /// Mass per unit of body-local area.
    pub density: f64,
    pub elasticity: f64,
    pub friction: f64,
    /// Static bodies never move and have infinite mass.
    pub is_static: bool,
}

impl Default for PhysicalProperties {
    fn default() -> Self {
        Self {
            density: 1.0,
            elasticity: 0.0,
            friction: 0.7,
            is_static: false,
        }
    }
}

/// Placement of the mask inside the sprite's body.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteFrame {
    pub mask_width: f64,
    pub mask_height: f64,
    /// Normalized anchor: (0, 0) is bottom-left, (0.5, 0.5) the center.
    pub anchor: Point,
    /// World units per mask unit.
    pub scale: f64,
}

impl SpriteFrame {
    /// Centered anchor, unit scale.
    pub fn new(mask_width: usize, mask_height: usize) -> Self {
        Self {
            mask_width: mask_width as f64,
            mask_height: mask_height as f64,
            anchor: Point::new(0.5, 0.5),
            scale: 1.0,
        }
    }

    pub fn for_mask(mask: &AlphaMask) -> Self {
        Self::new(mask.width(), mask.height())
    }

    pub fn with_anchor(mut self, x: f64, y: f64) -> Self {
        self.anchor = Point::new(x, y);
        self
    }

    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Map a mask-space point into the body-local frame.
    pub fn to_body_local(&self, p: &Point) -> Point {
        let x = p.x - self.anchor.x * self.mask_width;
        let y = (self.mask_height - p.y) - self.anchor.y * self.mask_height;
        Point::new(x * self.scale, y * self.scale)
    }

    /// Map a polygon into the body-local frame, restoring positive winding.
    pub fn polygon_to_body_local(&self, polygon: &Polygon) -> Vec<Point> {
        // Flipping y mirrors the winding; walk backwards to undo it
        polygon
            .vertices()
            .iter()
            .rev()
            .map(|p| self.to_body_local(p))
            .collect()
    }
}

/// Aggregate mass data of a set of shapes.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct MassProperties {
    pub area: f64,
    pub mass: f64,
    pub centroid: Point,
    /// Moment of inertia about the centroid.
    pub moment: f64,
}

/// Compute area, mass, centroid and moment of body-local polygons.
///
/// Polygons are expected to have positive signed area. An empty input has
/// zero mass and its centroid at the origin.
pub fn mass_properties(polygons: &[Vec<Point>], density: f64) -> MassProperties {
    let mut area = 0.0;
    let mut first_moment = Point::default();
    // Second moment of area about the origin
    let mut origin_inertia = 0.0;

    for vertices in polygons {
        let n = vertices.len();
        for i in 0..n {
            let a = &vertices[i];
            let b = &vertices[(i + 1) % n];
            let cross = a.x * b.y - b.x * a.y;
            area += cross / 2.0;
            first_moment.x += (a.x + b.x) * cross / 6.0;
            first_moment.y += (a.y + b.y) * cross / 6.0;
            let dots = a.x * a.x + a.y * a.y + a.x * b.x + a.y * b.y + b.x * b.x + b.y * b.y;
            origin_inertia += cross * dots / 12.0;
        }
    }

    if area <= 0.0 {
        return MassProperties {
            area: 0.0,
            mass: 0.0,
            centroid: Point::default(),
            moment: 0.0,
        };
    }

    let centroid = Point::new(first_moment.x / area, first_moment.y / area);
    let mass = density * area;
    // Parallel axis theorem: shift from the origin to the centroid
    let moment = density * origin_inertia
        - mass * (centroid.x * centroid.x + centroid.y * centroid.y);

    MassProperties {
        area,
        mass,
        centroid,
        moment,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// One collision shape in body-local coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShapeDescriptor {
    pub vertices: Vec<Point>,
    pub elasticity: f64,
    pub friction: f64,
}

/// Engine-neutral description of a rigid body and its shapes.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BodyDescriptor {
    pub kind: BodyKind,
    /// `f64::INFINITY` for static bodies.
    pub mass: f64,
    /// `f64::INFINITY` for static bodies.
    pub moment: f64,
    /// Center of gravity in body-local coordinates.
    pub center_of_mass: Point,
    pub shapes: Vec<ShapeDescriptor>,
}

/// Build a body description from extracted polygons.
pub fn build_body(
    polygons: &PolygonSet,
    frame: &SpriteFrame,
    properties: &PhysicalProperties,
) -> BodyDescriptor {
    let local: Vec<Vec<Point>> = polygons
        .iter()
        .map(|p| frame.polygon_to_body_local(p))
        .filter(|v| signed_area(v) > 0.0)
        .collect();
    let mass_props = mass_properties(&local, properties.density);

    let (kind, mass, moment) = if properties.is_static {
        (BodyKind::Static, f64::INFINITY, f64::INFINITY)
    } else {
        (BodyKind::Dynamic, mass_props.mass, mass_props.moment)
    };

    let shapes = local
        .into_iter()
        .map(|vertices| ShapeDescriptor {
            vertices,
            elasticity: properties.elasticity,
            friction: properties.friction,
        })
        .collect();

    BodyDescriptor {
        kind,
        mass,
        moment,
        center_of_mass: mass_props.centroid,
        shapes,
    }
}

/// A physics engine able to accept body descriptions.
pub trait PhysicsWorld {
    type BodyHandle;
    type Error: std::error::Error + 'static;

    fn insert_body(&mut self, body: &BodyDescriptor) -> Result<Self::BodyHandle, Self::Error>;
}

/// Extract polygons from `mask` and register the resulting body with `world`.
pub fn register_sprite<W: PhysicsWorld>(
    world: &mut W,
    mask: &AlphaMask,
    config: &SpriteConfig,
    frame: &SpriteFrame,
) -> Result<W::BodyHandle, RegisterError<W::Error>> {
    let extraction = extract(mask, &config.extraction)?;
    if extraction.polygons.is_empty() {
        return Err(RegisterError::NoGeometry {
            dropped: extraction.report.dropped.len(),
        });
    }

    let body = build_body(&extraction.polygons, frame, &config.physics);
    debug!(
        "registering {:?} body: {} shapes, mass {:.3}, moment {:.3}",
        body.kind,
        body.shapes.len(),
        body.mass,
        body.moment
    );
    world.insert_body(&body).map_err(RegisterError::World)
}
