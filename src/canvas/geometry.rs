/// Canvas geometry helpers
///
/// Thin layer over kurbo: conversions from the workflow model and the
/// rectangle intersection predicate used for batch containment.

use crate::workflow::types::{Measured, Position};
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// How much of a node must overlap an area to count as intersecting it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainmentMode {
    /// The node's bounds must lie entirely inside the area
    #[default]
    Full,
    /// Any positive overlap is enough
    Partial,
}

impl ContainmentMode {
    /// Parse a mode name as used in configuration ("full" / "partial")
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(Self::Full),
            "partial" => Some(Self::Partial),
            _ => None,
        }
    }
}

impl From<Position> for Point {
    fn from(position: Position) -> Self {
        Point::new(position.x, position.y)
    }
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Position { x: point.x, y: point.y }
    }
}

impl Measured {
    /// The committed size, only when both dimensions are present and positive
    pub fn size(&self) -> Option<Size> {
        match (self.width, self.height) {
            (Some(width), Some(height)) if width > 0.0 && height > 0.0 => {
                Some(Size::new(width, height))
            }
            _ => None,
        }
    }
}

/// Bounds of a node placed at `origin`; unmeasured nodes collapse to a point
pub fn node_rect(origin: Point, size: Option<Size>) -> Rect {
    Rect::from_origin_size(origin, size.unwrap_or(Size::ZERO))
}

/// Test whether `bounds` intersects `area` under the given mode
///
/// Zero-area bounds are tested as a point. The area's edges count as inside
/// for `Full` and as outside for `Partial`, the same edge rule sized bounds get.
pub fn is_rect_intersecting(bounds: Rect, area: Rect, mode: ContainmentMode) -> bool {
    let node_area = bounds.area();
    if node_area <= 0.0 {
        let p = bounds.origin();
        return match mode {
            ContainmentMode::Full => {
                p.x >= area.x0 && p.x <= area.x1 && p.y >= area.y0 && p.y <= area.y1
            }
            ContainmentMode::Partial => {
                p.x > area.x0 && p.x < area.x1 && p.y > area.y0 && p.y < area.y1
            }
        };
    }

    let overlap = bounds.intersect(area).area();
    match mode {
        ContainmentMode::Full => overlap >= node_area,
        ContainmentMode::Partial => overlap > 0.0,
    }
}
