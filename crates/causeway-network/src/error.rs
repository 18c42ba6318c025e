//! Network construction errors.

use crate::{LinkId, NodeId, PoleId};

/// Errors returned when the graph would be left inconsistent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NetworkError {
    #[error("unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("unknown link {0:?}")]
    UnknownLink(LinkId),

    /// Nodes can only be removed once every attached link is gone.
    #[error("node {node:?} still has {links} attached link end(s)")]
    NodeInUse { node: NodeId, links: usize },

    /// A link centerline needs at least two points.
    #[error("centerline has {points} point(s), need at least 2")]
    DegenerateCenterline { points: usize },

    #[error("unknown pole {0:?}")]
    UnknownPole(PoleId),

    #[error("pole {0:?} already belongs to a line")]
    PoleAlreadyOnLine(PoleId),
}
