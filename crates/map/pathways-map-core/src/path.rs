//! Waypoints and the cyclic path the animator walks.

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::geometry::{MapTransform, Point};

/// How the segment that starts at a waypoint is travelled.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegKind {
    #[default]
    Drive,
    Wait,
    Walk,
    Deliver,
}

impl LegKind {
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Drive => "drive",
            Self::Wait => "wait",
            Self::Walk => "walk",
            Self::Deliver => "deliver",
        }
    }

    /// Legs during which the vehicle itself is moving.
    #[inline]
    pub fn is_driving(&self) -> bool {
        matches!(self, Self::Drive)
    }
}

/// A waypoint plus the time it takes to reach the *next* waypoint.
///
/// Consecutive waypoints may share a point; that segment is a pause.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub point: Point,
    #[serde(rename = "durationMs")]
    pub duration_ms: u32,
    #[serde(default)]
    pub leg: LegKind,
}

impl Waypoint {
    pub fn new(point: Point, duration_ms: u32) -> Self {
        Self {
            point,
            duration_ms,
            leg: LegKind::Drive,
        }
    }

    pub fn with_leg(mut self, leg: LegKind) -> Self {
        self.leg = leg;
        self
    }
}

/// Validated, immutable, cyclic waypoint sequence.
///
/// The segment after the last waypoint leads back to index 0.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Waypoint>", into = "Vec<Waypoint>")]
pub struct Path {
    waypoints: Vec<Waypoint>,
}

impl Path {
    /// Validate and wrap a waypoint list.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, MapError> {
        if waypoints.len() < 2 {
            return Err(MapError::TooFewWaypoints {
                count: waypoints.len(),
            });
        }
        for (index, wp) in waypoints.iter().enumerate() {
            if wp.duration_ms == 0 {
                return Err(MapError::NonPositiveDuration {
                    index,
                    duration_ms: wp.duration_ms,
                });
            }
            if !wp.point.is_finite() {
                return Err(MapError::NonFiniteCoordinate { index });
            }
        }
        Ok(Self { waypoints })
    }

    /// Validate a logical-space script, then move every point into render space.
    pub fn from_script(script: &[Waypoint], transform: &MapTransform) -> Result<Self, MapError> {
        let logical = Self::new(script.to_vec())?;
        Ok(logical.transformed(transform))
    }

    /// Parse a JSON array of `{ point: [x, y], durationMs, leg? }`.
    pub fn from_json_str(json: &str) -> Result<Self, MapError> {
        let waypoints: Vec<Waypoint> = serde_json::from_str(json)?;
        Self::new(waypoints)
    }

    /// Copy of this path with every point passed through `transform`.
    pub fn transformed(&self, transform: &MapTransform) -> Self {
        let waypoints = self
            .waypoints
            .iter()
            .map(|wp| Waypoint {
                point: transform.apply(wp.point),
                ..wp.clone()
            })
            .collect();
        Self { waypoints }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&Waypoint> {
        self.waypoints.get(index)
    }

    #[inline]
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Index of the waypoint after `index`, wrapping to 0.
    #[inline]
    pub fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.waypoints.len()
    }

    /// Start point, end point and duration of the segment starting at `index`.
    pub fn segment(&self, index: usize) -> (Point, Point, u32) {
        let start = &self.waypoints[index % self.waypoints.len()];
        let end = &self.waypoints[self.next_index(index % self.waypoints.len())];
        (start.point, end.point, start.duration_ms)
    }

    /// Time for one full loop.
    pub fn cycle_duration_ms(&self) -> u64 {
        self.waypoints.iter().map(|wp| wp.duration_ms as u64).sum()
    }

    /// Milliseconds until a segment of kind `leg` begins, measured from
    /// `progress` through segment `from`. `Some(0)` while already on such a
    /// segment; `None` if the path has none.
    pub fn remaining_ms_until(&self, leg: LegKind, from: usize, progress: f64) -> Option<u64> {
        let from = from % self.waypoints.len();
        if self.waypoints[from].leg == leg {
            return Some(0);
        }
        let current = self.waypoints[from].duration_ms as f64 * (1.0 - progress.clamp(0.0, 1.0));
        let mut total = current.round() as u64;
        let mut index = self.next_index(from);
        while index != from {
            let wp = &self.waypoints[index];
            if wp.leg == leg {
                return Some(total);
            }
            total += wp.duration_ms as u64;
            index = self.next_index(index);
        }
        None
    }
}

impl TryFrom<Vec<Waypoint>> for Path {
    type Error = MapError;

    fn try_from(waypoints: Vec<Waypoint>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl From<Path> for Vec<Waypoint> {
    fn from(path: Path) -> Self {
        path.waypoints
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wp(x: f64, y: f64, ms: u32, leg: LegKind) -> Waypoint {
        Waypoint::new(Point::new(x, y), ms).with_leg(leg)
    }

    #[test]
    fn remaining_until_walks_forward_cyclically() {
        let path = Path::new(vec![
            wp(0.0, 0.0, 1000, LegKind::Drive),
            wp(1.0, 0.0, 500, LegKind::Wait),
            wp(1.0, 0.0, 2000, LegKind::Deliver),
            wp(1.0, 1.0, 300, LegKind::Drive),
        ])
        .unwrap();

        assert_eq!(path.remaining_ms_until(LegKind::Deliver, 0, 0.0), Some(1500));
        assert_eq!(path.remaining_ms_until(LegKind::Deliver, 0, 0.5), Some(1000));
        assert_eq!(path.remaining_ms_until(LegKind::Deliver, 2, 0.3), Some(0));
        // From the last segment it wraps through index 0 and 1.
        assert_eq!(path.remaining_ms_until(LegKind::Deliver, 3, 0.0), Some(1800));
        assert_eq!(path.remaining_ms_until(LegKind::Walk, 0, 0.0), None);
    }

    #[test]
    fn leg_defaults_to_drive_in_json() {
        let path = Path::from_json_str(
            r#"[{"point":[0,0],"durationMs":10},{"point":[5,5],"durationMs":20,"leg":"walk"}]"#,
        )
        .unwrap();
        assert_eq!(path.waypoints()[0].leg, LegKind::Drive);
        assert_eq!(path.waypoints()[1].leg, LegKind::Walk);
        assert_eq!(path.cycle_duration_ms(), 30);
    }

    #[test]
    fn deserializing_validates() {
        let err = serde_json::from_str::<Path>(r#"[{"point":[0,0],"durationMs":10}]"#);
        assert!(err.is_err());
    }
}
