//! Road and utility networks: an arena graph of nodes and links carrying
//! lane layouts, plus poles strung into power lines.

mod attributes;
mod error;
mod graph;
mod utility;

pub use attributes::{HalfWidths, IntersectionControl, LinkAttributes, LinkFlags, SurfaceType};
pub use error::NetworkError;
pub use graph::{Incidence, Link, LinkEnd, LinkId, Node, NodeId, RoadNetwork};
pub use utility::{Line, LineId, Pole, PoleId, UtilityNetwork};
