//! Off-road zone geometry.
//!
//! Zones are static polygons in frame pixel coordinates. They are built once at
//! startup and never mutated. A point counts as "in the off-road area" when it
//! lies inside or on the boundary of any zone; zones form a plain union, so no
//! ordering or priority exists between them.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Truncate a floating point center to pixel coordinates.
    pub fn from_center(x: f32, y: f32) -> Self {
        Self {
            x: x as i32,
            y: y as i32,
        }
    }
}

impl From<[i32; 2]> for Point {
    fn from(v: [i32; 2]) -> Self {
        Self { x: v[0], y: v[1] }
    }
}

/// A conforming zone id is a local label, e.g. "zone:west_verge".
pub fn validate_zone_id(zone_id: &str) -> Result<()> {
    static ZONE_ID_RE: OnceLock<regex::Regex> = OnceLock::new();
    let re = ZONE_ID_RE.get_or_init(|| {
        regex::Regex::new(r"^zone:[a-z0-9_-]{1,64}$").expect("zone id pattern is valid")
    });
    if !re.is_match(zone_id) {
        return Err(anyhow!(
            "zone id '{}' must match ^zone:[a-z0-9_-]{{1,64}}$",
            zone_id
        ));
    }
    Ok(())
}

/// A single off-road polygon.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Zone {
    id: String,
    vertices: Vec<Point>,
}

impl Zone {
    pub fn new(id: &str, vertices: Vec<Point>) -> Result<Self> {
        let id = id.to_lowercase();
        validate_zone_id(&id)?;
        if vertices.len() < 3 {
            return Err(anyhow!(
                "zone {} needs at least 3 vertices, got {}",
                id,
                vertices.len()
            ));
        }
        Ok(Self { id, vertices })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Inclusive point-in-polygon test. Points on an edge or vertex are inside.
    pub fn contains(&self, p: Point) -> bool {
        let n = self.vertices.len();
        let mut inside = false;
        for i in 0..n {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            if on_segment(p, a, b) {
                return true;
            }
            // Crossing number: count edges straddling the horizontal ray to +x.
            if (a.y > p.y) != (b.y > p.y) {
                let (ax, ay) = (a.x as i128, a.y as i128);
                let (bx, by) = (b.x as i128, b.y as i128);
                let (px, py) = (p.x as i128, p.y as i128);
                // x of the edge at py is ax + (py - ay) * (bx - ax) / (by - ay);
                // compare without division, keeping the sign of (by - ay).
                let lhs = (px - ax) * (by - ay);
                let rhs = (py - ay) * (bx - ax);
                let crosses = if by > ay { lhs < rhs } else { lhs > rhs };
                if crosses {
                    inside = !inside;
                }
            }
        }
        inside
    }

    /// Axis-aligned bounds as (min, max).
    pub fn bounds(&self) -> (Point, Point) {
        let mut min = self.vertices[0];
        let mut max = self.vertices[0];
        for v in &self.vertices[1..] {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
        }
        (min, max)
    }
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    // Products of two i32 differences need more than 64 bits.
    let cross = (b.x as i128 - a.x as i128) * (p.y as i128 - a.y as i128)
        - (b.y as i128 - a.y as i128) * (p.x as i128 - a.x as i128);
    if cross != 0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Union of all configured off-road zones.
#[derive(Clone, Debug, Default)]
pub struct ZoneSet {
    zones: Vec<Zone>,
}

impl ZoneSet {
    pub fn new(zones: Vec<Zone>) -> Result<Self> {
        for (i, zone) in zones.iter().enumerate() {
            if zones[..i].iter().any(|z| z.id == zone.id) {
                return Err(anyhow!("duplicate zone id {}", zone.id));
            }
        }
        Ok(Self { zones })
    }

    /// Both road verges of a 640x360 roadside view.
    pub fn default_verges() -> Self {
        let west = [
            [143, 0],
            [140, 74],
            [160, 150],
            [156, 198],
            [108, 269],
            [0, 342],
            [0, 0],
        ];
        let east = [
            [163, 0],
            [161, 76],
            [191, 154],
            [191, 200],
            [160, 270],
            [47, 360],
            [640, 360],
            [640, 0],
        ];
        Self {
            zones: vec![
                Zone {
                    id: "zone:west_verge".to_string(),
                    vertices: west.into_iter().map(Point::from).collect(),
                },
                Zone {
                    id: "zone:east_verge".to_string(),
                    vertices: east.into_iter().map(Point::from).collect(),
                },
            ],
        }
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// True when `p` is inside or on the edge of any zone.
    pub fn contains(&self, p: Point) -> bool {
        self.containing(p).is_some()
    }

    /// First zone containing `p`, in configuration order.
    pub fn containing(&self, p: Point) -> Option<&Zone> {
        self.zones.iter().find(|zone| zone.contains(p))
    }
}
