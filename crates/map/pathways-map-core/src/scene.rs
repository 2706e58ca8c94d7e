//! Static map silhouette, computed once per rendering session.
//!
//! Grid lines and building rectangles are stored unrotated in render space,
//! to be drawn inside a group carrying [`GroupRotation`]. The pin and the
//! route are stored fully transformed.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{MapConfig, Palette, ViewBox};
use crate::error::MapError;
use crate::geometry::{rotate_point, MapTransform, Point};

/// Rotation applied to a whole group of shapes about `center`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupRotation {
    pub angle_deg: f64,
    pub center: Point,
}

impl GroupRotation {
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        rotate_point(p.x, p.y, self.angle_deg, self.center.x, self.center.y)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub from: Point,
    pub to: Point,
}

/// A building rectangle in render space, before group rotation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingPart {
    pub origin: Point,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

impl BuildingPart {
    /// The four corners after group rotation, clockwise from the origin
    /// corner. For hosts that cannot draw rotated groups.
    pub fn corners(&self, rotation: &GroupRotation) -> [Point; 4] {
        let Point { x, y } = self.origin;
        [
            Point::new(x, y),
            Point::new(x + self.width, y),
            Point::new(x + self.width, y + self.height),
            Point::new(x, y + self.height),
        ]
        .map(|p| rotation.apply(p))
    }
}

/// Door pin: a round head above a short stem with a dot at the anchor.
/// Sizes are render units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinGlyph {
    pub anchor: Point,
    pub head_center: Point,
    pub head_radius: f64,
    pub stem_from: Point,
    pub stem_to: Point,
    pub stem_width: f64,
    pub dot_radius: f64,
}

impl PinGlyph {
    fn at(anchor: Point, scale: f64) -> Self {
        Self {
            anchor,
            head_center: Point::new(anchor.x, anchor.y - 8.0 * scale),
            head_radius: 6.0 * scale,
            stem_from: Point::new(anchor.x, anchor.y - 2.0 * scale),
            stem_to: Point::new(anchor.x, anchor.y + 10.0 * scale),
            stem_width: 2.0 * scale,
            dot_radius: 2.0 * scale,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapScene {
    pub view_box: ViewBox,
    pub transform: MapTransform,
    pub rotation: GroupRotation,
    pub grid: Vec<GridLine>,
    pub grid_opacity: f64,
    pub building: Vec<BuildingPart>,
    pub pin: PinGlyph,
    /// Route waypoints in render space, in path order.
    pub route: Vec<Point>,
    pub palette: Palette,
}

impl MapScene {
    pub fn build(cfg: &MapConfig) -> Result<Self, MapError> {
        cfg.validate()?;
        let transform = cfg.transform()?;
        let rotation = GroupRotation {
            angle_deg: transform.rotation_deg,
            center: transform.center,
        };

        let grid = grid_lines(cfg, &transform);
        let building = cfg
            .building
            .iter()
            .map(|part| BuildingPart {
                origin: transform.apply_unrotated(Point::new(part.x, part.y)),
                width: transform.scale_len(part.width),
                height: transform.scale_len(part.height),
                fill: part.fill.clone(),
            })
            .collect::<Vec<_>>();
        let pin = PinGlyph::at(transform.apply(cfg.pin), transform.scale_factor);
        let route = cfg.route.iter().map(|wp| transform.apply(wp.point)).collect();

        debug!(
            "built map scene: {} grid lines, {} building parts",
            grid.len(),
            building.len()
        );
        Ok(Self {
            view_box: cfg.view_box,
            transform,
            rotation,
            grid,
            grid_opacity: cfg.grid.opacity,
            building,
            pin,
            route,
            palette: cfg.palette.clone(),
        })
    }
}

fn grid_lines(cfg: &MapConfig, transform: &MapTransform) -> Vec<GridLine> {
    let cell = transform.scale_len(cfg.grid.cell_size);
    let ViewBox { width, height } = cfg.view_box;
    let (lo, hi) = (cfg.grid.extent_min, cfg.grid.extent_max);
    let (x_min, x_max) = (width * lo, width * hi);
    let (y_min, y_max) = (height * lo, height * hi);

    // Integer stepping keeps the last line from drifting past the extent.
    let (rows, cols) = (cfg.grid.steps(height, cell), cfg.grid.steps(width, cell));

    let mut lines = Vec::with_capacity(rows + cols);
    for i in 0..rows {
        let y = y_min + i as f64 * cell;
        lines.push(GridLine {
            from: Point::new(x_min, y),
            to: Point::new(x_max, y),
        });
    }
    for i in 0..cols {
        let x = x_min + i as f64 * cell;
        lines.push(GridLine {
            from: Point::new(x, y_min),
            to: Point::new(x, y_max),
        });
    }
    lines
}
