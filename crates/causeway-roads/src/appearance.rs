//! Which texture a link is drawn with, and which links are drawn at all.

use causeway_materials::TextureRole;
use causeway_network::{LinkAttributes, SurfaceType};

/// Texture for the lane surface of a link.
pub fn texture_role_for(attrs: &LinkAttributes) -> TextureRole {
    match attrs.surface {
        SurfaceType::None => TextureRole::Margin,
        SurfaceType::Gravel => TextureRole::Gravel,
        SurfaceType::Trail => TextureRole::Trail,
        SurfaceType::TwoTrack | SurfaceType::Dirt => TextureRole::FourWheelDrive,
        SurfaceType::Railroad => TextureRole::Rail,
        SurfaceType::Stone => TextureRole::Stone,
        SurfaceType::Paved => {
            let two_way = attrs.flags.is_two_way();
            match (attrs.lanes, two_way) {
                (0 | 1, _) => TextureRole::OneLane,
                (2, false) => TextureRole::TwoLaneOneWay,
                (2, true) => TextureRole::TwoLaneTwoWay,
                (3, false) => TextureRole::ThreeLaneOneWay,
                (3, true) => TextureRole::ThreeLaneTwoWay,
                (_, false) => TextureRole::FourLaneOneWay,
                (_, true) => TextureRole::FourLaneTwoWay,
            }
        }
    }
}

/// Texture for a junction cap: pavement, unless one of the incident links
/// has a surface that should continue across the junction.
pub fn node_role_for<'a, I>(incident: I) -> TextureRole
where
    I: IntoIterator<Item = &'a LinkAttributes>,
{
    incident
        .into_iter()
        .find_map(|attrs| match attrs.surface {
            SurfaceType::Railroad => Some(TextureRole::Rail),
            SurfaceType::TwoTrack | SurfaceType::Dirt => Some(TextureRole::FourWheelDrive),
            SurfaceType::Trail => Some(TextureRole::Trail),
            SurfaceType::Gravel => Some(TextureRole::Gravel),
            SurfaceType::Stone => Some(TextureRole::Stone),
            SurfaceType::None | SurfaceType::Paved => None,
        })
        .unwrap_or(TextureRole::Pavement)
}

/// Switches selecting which classes of link are built.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinkFilter {
    pub highways: bool,
    pub paved: bool,
    pub dirt: bool,
}

impl Default for LinkFilter {
    fn default() -> Self {
        Self {
            highways: true,
            paved: true,
            dirt: true,
        }
    }
}

impl LinkFilter {
    /// Highways are judged by the highway switch alone; other links by their
    /// surface. Rail, stone and unsurfaced links are always built.
    pub fn includes(&self, attrs: &LinkAttributes) -> bool {
        if attrs.is_highway() {
            self.highways
        } else if attrs.surface == SurfaceType::Paved {
            self.paved
        } else if attrs.surface.is_dirt() {
            self.dirt
        } else {
            true
        }
    }
}
