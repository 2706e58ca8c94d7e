//! Configuration for the stylized map.
//!
//! Every field has a default, so hosts can pass a partial JSON object and
//! override only what they need.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::animator::AnimatorConfig;
use crate::error::MapError;
use crate::geometry::{MapTransform, Point};
use crate::path::{LegKind, Path, Waypoint};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub width: f64,
    pub height: f64,
}

impl Default for ViewBox {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 1000.0,
        }
    }
}

/// Square street grid. Lines span `extent_min..=extent_max` view boxes in
/// both directions so the rotated grid never exposes an empty corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge in logical units.
    pub cell_size: f64,
    pub extent_min: f64,
    pub extent_max: f64,
    pub opacity: f64,
}

impl GridConfig {
    /// Upper bound on horizontal plus vertical lines.
    pub const MAX_LINES: usize = 10_000;

    /// Lines per axis at render-space `cell` over a view box edge of `edge`.
    pub(crate) fn steps(&self, edge: f64, cell: f64) -> usize {
        let span = edge * (self.extent_max - self.extent_min);
        ((span / cell + 1e-9).floor().max(0.0) as usize).saturating_add(1)
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 50.0,
            extent_min: -3.0,
            extent_max: 4.0,
            opacity: 0.8,
        }
    }
}

/// One axis-aligned building rectangle in logical space.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BuildingPartSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill: String,
}

impl BuildingPartSpec {
    fn new(x: f64, y: f64, width: f64, height: f64, fill: &str) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill: fill.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub grid_stroke: String,
    pub building_stroke: String,
    pub vehicle: String,
    pub pin: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "#1a1a2e".into(),
            grid_stroke: "#e0e0e0".into(),
            building_stroke: "#6b7280".into(),
            vehicle: "#4f46e5".into(),
            pin: "#ef4444".into(),
        }
    }
}

/// Everything needed to lay out the map and build the vehicle's path.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub view_box: ViewBox,
    /// Width of the logical coordinate space the building and route are
    /// authored in. `scale_factor = view_box.width / logical_base_width`.
    pub logical_base_width: f64,
    pub rotation_deg: f64,
    /// Logical offset applied to the building, pin, and route.
    pub building_offset: Point,
    pub grid: GridConfig,
    pub building: Vec<BuildingPartSpec>,
    /// Door pin in logical space.
    pub pin: Point,
    /// Vehicle route in logical space.
    pub route: Vec<Waypoint>,
    pub palette: Palette,
    pub animator: AnimatorConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        let logical_base_width = 400.0;
        Self {
            view_box: ViewBox::default(),
            logical_base_width,
            rotation_deg: 30.0,
            building_offset: Point::new(-20.0, 20.0 + logical_base_width * 0.05),
            grid: GridConfig::default(),
            building: default_building(),
            pin: default_pin(),
            route: default_route(),
            palette: Palette::default(),
            animator: AnimatorConfig::default(),
        }
    }
}

impl MapConfig {
    /// Parse a (possibly partial) JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let cfg: MapConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        debug!(
            "loaded map config: view box {}x{}, rotation {}°, {} route waypoints",
            cfg.view_box.width,
            cfg.view_box.height,
            cfg.rotation_deg,
            cfg.route.len()
        );
        Ok(cfg)
    }

    /// Check dimensions and the route without building anything.
    pub fn validate(&self) -> Result<(), MapError> {
        let ViewBox { width, height } = self.view_box;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(MapError::InvalidViewBox { width, height });
        }
        let scale = self.scale_factor();
        if !scale.is_finite() || scale <= 0.0 {
            return Err(MapError::InvalidScale { value: scale });
        }
        let grid = &self.grid;
        if !grid.cell_size.is_finite() || grid.cell_size <= 0.0 {
            return Err(MapError::InvalidCellSize {
                value: grid.cell_size,
            });
        }
        if !(grid.extent_min.is_finite() && grid.extent_max.is_finite())
            || grid.extent_min >= grid.extent_max
        {
            return Err(MapError::InvalidGridExtent {
                min: grid.extent_min,
                max: grid.extent_max,
            });
        }
        let cell = grid.cell_size * scale;
        let lines = grid
            .steps(width, cell)
            .saturating_add(grid.steps(height, cell));
        if lines > GridConfig::MAX_LINES {
            return Err(MapError::GridTooDense {
                limit: GridConfig::MAX_LINES,
            });
        }
        Path::new(self.route.clone()).map(|_| ())
    }

    #[inline]
    pub fn scale_factor(&self) -> f64 {
        self.view_box.width / self.logical_base_width
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new(self.view_box.width / 2.0, self.view_box.height / 2.0)
    }

    pub fn transform(&self) -> Result<MapTransform, MapError> {
        MapTransform::new(
            self.scale_factor(),
            self.rotation_deg,
            self.center(),
            self.building_offset,
        )
    }

    /// The route moved into render space.
    pub fn route_path(&self) -> Result<Path, MapError> {
        Path::from_script(&self.route, &self.transform()?)
    }
}

fn default_building() -> Vec<BuildingPartSpec> {
    vec![
        BuildingPartSpec::new(180.0, 100.0, 120.0, 150.0, "#4a4a5a"),
        BuildingPartSpec::new(160.0, 120.0, 40.0, 80.0, "#5a5a6a"),
        BuildingPartSpec::new(280.0, 120.0, 40.0, 80.0, "#5a5a6a"),
        BuildingPartSpec::new(200.0, 80.0, 80.0, 40.0, "#5a5a6a"),
        // Bottom extension; the door sits at its centre.
        BuildingPartSpec::new(200.0, 230.0, 80.0, 40.0, "#5a5a6a"),
    ]
}

fn default_pin() -> Point {
    Point::new(200.0 + 80.0 / 2.0, 230.0 + 40.0 / 2.0)
}

/// Loop around the building: drive the grid, park, walk to the door,
/// deliver, walk back, drive home.
pub fn default_route() -> Vec<Waypoint> {
    use LegKind::*;
    let pin = default_pin();
    let wp = |x: f64, y: f64, ms: u32, leg: LegKind| Waypoint::new(Point::new(x, y), ms).with_leg(leg);
    vec![
        wp(150.0, 50.0, 1500, Drive),
        wp(350.0, 50.0, 1500, Drive),
        wp(350.0, 100.0, 750, Wait),
        wp(350.0, 100.0, 1500, Drive),
        wp(350.0, 300.0, 1000, Drive),
        wp(250.0, 300.0, 750, Wait),
        wp(250.0, 300.0, 450, Walk),
        wp(pin.x, pin.y, 1500, Deliver),
        wp(pin.x, pin.y, 450, Walk),
        wp(250.0, 300.0, 1500, Drive),
        wp(50.0, 300.0, 1500, Drive),
        wp(50.0, 50.0, 1500, Drive),
        wp(150.0, 50.0, 1500, Wait),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_scale_by_two_and_a_half() {
        let cfg = MapConfig::default();
        assert_eq!(cfg.scale_factor(), 2.5);
        assert_eq!(cfg.building_offset, Point::new(-20.0, 40.0));
        assert_eq!(cfg.center(), Point::new(500.0, 500.0));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = MapConfig::from_json_str(r#"{ "rotation_deg": 45 }"#).unwrap();
        assert_eq!(cfg.rotation_deg, 45.0);
        assert_eq!(cfg.route.len(), 13);
        assert_eq!(cfg.grid.cell_size, 50.0);
    }

    #[test]
    fn rejects_zero_cell_size() {
        let err = MapConfig::from_json_str(r#"{ "grid": { "cell_size": 0 } }"#).unwrap_err();
        assert_eq!(err, MapError::InvalidCellSize { value: 0.0 });
    }
}
