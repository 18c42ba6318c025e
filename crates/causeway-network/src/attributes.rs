//! Per-link attributes: surface, lane layout, lateral features, and the
//! intersection control at each end.

use serde::{Deserialize, Serialize};

use crate::LinkEnd;

/// Surface material class of a link.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceType {
    None,
    Gravel,
    Trail,
    TwoTrack,
    Dirt,
    #[default]
    Paved,
    Railroad,
    Stone,
}

impl SurfaceType {
    /// Unsealed road surfaces.
    pub fn is_dirt(self) -> bool {
        matches!(
            self,
            SurfaceType::Gravel | SurfaceType::Trail | SurfaceType::TwoTrack | SurfaceType::Dirt
        )
    }
}

/// How traffic is controlled where a link meets a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IntersectionControl {
    #[default]
    Uncontrolled,
    TrafficLight,
    StopSign,
}

/// Lateral features and travel direction of a link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkFlags {
    pub sidewalk_left: bool,
    pub sidewalk_right: bool,
    pub parking_left: bool,
    pub parking_right: bool,
    pub margin: bool,
    /// Traffic may travel from start to end.
    pub forward: bool,
    /// Traffic may travel from end to start.
    pub reverse: bool,
}

impl Default for LinkFlags {
    fn default() -> Self {
        Self {
            sidewalk_left: false,
            sidewalk_right: false,
            parking_left: false,
            parking_right: false,
            margin: false,
            forward: true,
            reverse: true,
        }
    }
}

impl LinkFlags {
    pub fn is_two_way(&self) -> bool {
        self.forward && self.reverse
    }
}

/// Left and right half widths of a link, measured from its centerline in the
/// link's own direction.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HalfWidths {
    pub left: f32,
    pub right: f32,
}

impl HalfWidths {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Half widths as seen leaving the node at `end`.
    ///
    /// At the start node this is the link's own frame. At the end node the
    /// link is walked backwards, so left and right trade places.
    pub fn outgoing(self, end: LinkEnd) -> Self {
        match end {
            LinkEnd::Start => self,
            LinkEnd::End => Self {
                left: self.right,
                right: self.left,
            },
        }
    }

    pub fn total(&self) -> f32 {
        self.left + self.right
    }
}

/// Attributes describing a link's cross-section and behaviour.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkAttributes {
    pub surface: SurfaceType,
    pub lanes: u16,
    pub lane_width: f32,
    pub margin_width: f32,
    pub parking_width: f32,
    pub sidewalk_width: f32,
    pub curb_height: f32,
    pub flags: LinkFlags,
    /// Highway number. Numbered highways always carry margins.
    pub highway: Option<u16>,
    /// Declared half widths. When absent they are estimated from the
    /// cross-section during draping.
    pub half_widths: Option<HalfWidths>,
    /// Control at the start and end node.
    pub control: [IntersectionControl; 2],
}

impl Default for LinkAttributes {
    fn default() -> Self {
        Self {
            surface: SurfaceType::Paved,
            lanes: 2,
            lane_width: 3.3,
            margin_width: 1.6,
            parking_width: 3.3,
            sidewalk_width: 1.5,
            curb_height: 0.15,
            flags: LinkFlags::default(),
            highway: None,
            half_widths: None,
            control: [IntersectionControl::Uncontrolled; 2],
        }
    }
}

impl LinkAttributes {
    pub fn is_highway(&self) -> bool {
        self.highway.is_some_and(|h| h > 0)
    }

    /// Whether margins are drawn on both sides.
    pub fn has_margin(&self) -> bool {
        self.flags.margin || self.is_highway()
    }

    pub fn control_at(&self, end: LinkEnd) -> IntersectionControl {
        self.control[end.index()]
    }

    /// Width of the lane surface between the margins.
    pub fn lane_surface_width(&self) -> f32 {
        f32::from(self.lanes) * self.lane_width
    }

    /// Half widths derived from the lateral layout: half the lane surface plus
    /// any parking, margin and sidewalk on that side.
    pub fn estimate_half_widths(&self) -> HalfWidths {
        let center = self.lane_surface_width() * 0.5;
        let margin = if self.has_margin() { self.margin_width } else { 0.0 };
        let side = |parking: bool, sidewalk: bool| {
            let mut w = center + margin;
            if parking {
                w += self.parking_width;
            }
            if sidewalk {
                w += self.sidewalk_width;
            }
            w
        };
        HalfWidths {
            left: side(self.flags.parking_left, self.flags.sidewalk_left),
            right: side(self.flags.parking_right, self.flags.sidewalk_right),
        }
    }

    /// Declared half widths, or the estimate when none were given.
    pub fn effective_half_widths(&self) -> HalfWidths {
        self.half_widths.unwrap_or_else(|| self.estimate_half_widths())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let attrs = LinkAttributes::default();
        assert_eq!(attrs.surface, SurfaceType::Paved);
        assert_eq!(attrs.lanes, 2);
        assert!(attrs.flags.is_two_way(), "default links are two-way");
        assert_eq!(attrs.control_at(LinkEnd::End), IntersectionControl::Uncontrolled);
    }

    #[test]
    fn test_estimate_plain_two_lane() {
        let hw = LinkAttributes::default().estimate_half_widths();
        assert!((hw.left - 3.3).abs() < 1e-6);
        assert!((hw.right - 3.3).abs() < 1e-6);
    }

    #[test]
    fn test_estimate_counts_each_side_once() {
        let attrs = LinkAttributes {
            flags: LinkFlags {
                sidewalk_left: true,
                parking_right: true,
                margin: true,
                ..LinkFlags::default()
            },
            ..LinkAttributes::default()
        };
        let hw = attrs.estimate_half_widths();
        assert!((hw.left - (3.3 + 1.6 + 1.5)).abs() < 1e-5, "left was {}", hw.left);
        assert!((hw.right - (3.3 + 1.6 + 3.3)).abs() < 1e-5, "right was {}", hw.right);
    }

    #[test]
    fn test_highway_forces_margin() {
        let attrs = LinkAttributes {
            highway: Some(101),
            ..LinkAttributes::default()
        };
        assert!(attrs.has_margin());
        assert!((attrs.estimate_half_widths().left - 4.9).abs() < 1e-5);

        let zero = LinkAttributes {
            highway: Some(0),
            ..LinkAttributes::default()
        };
        assert!(!zero.has_margin(), "highway number 0 is not a highway");
    }

    #[test]
    fn test_declared_half_widths_win() {
        let attrs = LinkAttributes {
            half_widths: Some(HalfWidths::new(1.0, 2.0)),
            ..LinkAttributes::default()
        };
        assert_eq!(attrs.effective_half_widths(), HalfWidths::new(1.0, 2.0));
    }

    #[test]
    fn test_outgoing_swaps_at_end() {
        let hw = HalfWidths::new(1.0, 4.0);
        assert_eq!(hw.outgoing(LinkEnd::Start), hw);
        assert_eq!(hw.outgoing(LinkEnd::End), HalfWidths::new(4.0, 1.0));
    }

    #[test]
    fn test_attributes_deserialize_with_missing_fields() {
        let attrs: LinkAttributes =
            serde_json::from_str(r#"{"lanes": 4, "surface": "Gravel"}"#).unwrap();
        assert_eq!(attrs.lanes, 4);
        assert_eq!(attrs.surface, SurfaceType::Gravel);
        assert!((attrs.lane_width - 3.3).abs() < 1e-6, "missing fields use defaults");
    }
}
