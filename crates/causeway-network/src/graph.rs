//! Arena-backed road graph.
//!
//! Nodes and links live in `Vec<Option<_>>` slots addressed by stable `u32`
//! ids. Ids are never reused, so iterating the slots yields insertion order.

use causeway_math::Rect;
use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::{LinkAttributes, NetworkError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub u32);

/// Which end of a link touches a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkEnd {
    Start,
    End,
}

impl LinkEnd {
    pub fn index(self) -> usize {
        match self {
            LinkEnd::Start => 0,
            LinkEnd::End => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            LinkEnd::Start => LinkEnd::End,
            LinkEnd::End => LinkEnd::Start,
        }
    }
}

/// One link end attached to a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Incidence {
    pub link: LinkId,
    pub end: LinkEnd,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    /// Planar position.
    pub position: Vec2,
    /// Draped world position. Equal to the planar position at altitude 0
    /// until the network is draped.
    pub world: Vec3,
    incidences: Vec<Incidence>,
}

impl Node {
    /// Attached link ends in insertion order. A loop link appears twice.
    pub fn incidences(&self) -> &[Incidence] {
        &self.incidences
    }

    pub fn valence(&self) -> usize {
        self.incidences.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Link {
    start: NodeId,
    end: NodeId,
    centerline: Vec<Vec2>,
    /// Draped centerline, one point per planar point once draped.
    pub world: Vec<Vec3>,
    pub attrs: LinkAttributes,
}

impl Link {
    pub fn start(&self) -> NodeId {
        self.start
    }

    pub fn end(&self) -> NodeId {
        self.end
    }

    pub fn node_at(&self, end: LinkEnd) -> NodeId {
        match end {
            LinkEnd::Start => self.start,
            LinkEnd::End => self.end,
        }
    }

    /// Planar centerline, always at least two points.
    pub fn centerline(&self) -> &[Vec2] {
        &self.centerline
    }

    /// The centerline point nearest the node at `end`, skipping points that
    /// coincide with the endpoint. `None` when every point coincides.
    pub fn adjacent_point(&self, end: LinkEnd) -> Option<Vec2> {
        let pts = &self.centerline;
        match end {
            LinkEnd::Start => {
                let origin = pts[0];
                pts[1..].iter().copied().find(|p| *p != origin)
            }
            LinkEnd::End => {
                let origin = pts[pts.len() - 1];
                pts[..pts.len() - 1].iter().rev().copied().find(|p| *p != origin)
            }
        }
    }

    /// Unit planar direction leaving the node at `end` along the link.
    pub fn outgoing_direction(&self, end: LinkEnd) -> Option<Vec2> {
        let origin = match end {
            LinkEnd::Start => self.centerline[0],
            LinkEnd::End => self.centerline[self.centerline.len() - 1],
        };
        let next = self.adjacent_point(end)?;
        (next - origin).try_normalize()
    }

    /// Planar length of the centerline.
    pub fn planar_length(&self) -> f32 {
        self.centerline.windows(2).map(|w| w[0].distance(w[1])).sum()
    }
}

/// Planar graph of road, trail and rail links.
#[derive(Clone, Debug, Default)]
pub struct RoadNetwork {
    nodes: Vec<Option<Node>>,
    links: Vec<Option<Link>>,
    num_nodes: usize,
    num_links: usize,
}

impl RoadNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, position: Vec2) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Some(Node {
            position,
            world: causeway_math::planar_to_world(position, 0.0),
            incidences: Vec::new(),
        }));
        self.num_nodes += 1;
        id
    }

    /// Remove a node that has no links attached.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node, NetworkError> {
        let node = self.node(id).ok_or(NetworkError::UnknownNode(id))?;
        if !node.incidences.is_empty() {
            return Err(NetworkError::NodeInUse {
                node: id,
                links: node.incidences.len(),
            });
        }
        let removed = self.nodes[id.0 as usize]
            .take()
            .ok_or(NetworkError::UnknownNode(id))?;
        self.num_nodes -= 1;
        Ok(removed)
    }

    /// Add a link between two existing nodes and attach it to both.
    pub fn add_link(
        &mut self,
        start: NodeId,
        end: NodeId,
        centerline: Vec<Vec2>,
        attrs: LinkAttributes,
    ) -> Result<LinkId, NetworkError> {
        if self.node(start).is_none() {
            return Err(NetworkError::UnknownNode(start));
        }
        if self.node(end).is_none() {
            return Err(NetworkError::UnknownNode(end));
        }
        if centerline.len() < 2 {
            return Err(NetworkError::DegenerateCenterline {
                points: centerline.len(),
            });
        }

        let id = LinkId(self.links.len() as u32);
        let world = centerline
            .iter()
            .map(|p| causeway_math::planar_to_world(*p, 0.0))
            .collect();
        self.links.push(Some(Link {
            start,
            end,
            centerline,
            world,
            attrs,
        }));
        self.num_links += 1;

        self.attach(start, Incidence { link: id, end: LinkEnd::Start });
        self.attach(end, Incidence { link: id, end: LinkEnd::End });
        Ok(id)
    }

    /// Remove a link and detach it from both of its nodes.
    pub fn remove_link(&mut self, id: LinkId) -> Result<Link, NetworkError> {
        let link = self
            .links
            .get_mut(id.0 as usize)
            .and_then(Option::take)
            .ok_or(NetworkError::UnknownLink(id))?;
        self.num_links -= 1;
        for node_id in [link.start, link.end] {
            if let Some(node) = self.node_slot_mut(node_id) {
                node.incidences.retain(|inc| inc.link != id);
            }
        }
        Ok(link)
    }

    /// Drop every node with no links attached. Returns how many were removed.
    pub fn remove_unused_nodes(&mut self) -> usize {
        let mut removed = 0;
        for slot in &mut self.nodes {
            if slot.as_ref().is_some_and(|n| n.incidences.is_empty()) {
                *slot = None;
                removed += 1;
            }
        }
        self.num_nodes -= removed;
        removed
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)?.as_ref()
    }

    /// Mutable node access. Only positions may be changed; attachment is
    /// managed by `add_link`/`remove_link`.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.node_slot_mut(id)
    }

    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0 as usize)?.as_ref()
    }

    pub fn link_mut(&mut self, id: LinkId) -> Option<&mut Link> {
        self.links.get_mut(id.0 as usize)?.as_mut()
    }

    /// Link ends attached to a node, in insertion order.
    pub fn links_at(&self, id: NodeId) -> &[Incidence] {
        self.node(id).map(Node::incidences).unwrap_or(&[])
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, n)| n.as_ref().map(|n| (NodeId(i as u32), n)))
    }

    pub fn nodes_mut(&mut self) -> impl Iterator<Item = (NodeId, &mut Node)> + '_ {
        self.nodes
            .iter_mut()
            .enumerate()
            .filter_map(|(i, n)| n.as_mut().map(|n| (NodeId(i as u32), n)))
    }

    pub fn links(&self) -> impl Iterator<Item = (LinkId, &Link)> + '_ {
        self.links
            .iter()
            .enumerate()
            .filter_map(|(i, l)| l.as_ref().map(|l| (LinkId(i as u32), l)))
    }

    pub fn links_mut(&mut self) -> impl Iterator<Item = (LinkId, &mut Link)> + '_ {
        self.links
            .iter_mut()
            .enumerate()
            .filter_map(|(i, l)| l.as_mut().map(|l| (LinkId(i as u32), l)))
    }

    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    pub fn num_links(&self) -> usize {
        self.num_links
    }

    /// First node within `epsilon` of `p`.
    pub fn find_node_at_point(&self, p: Vec2, epsilon: f32) -> Option<NodeId> {
        self.nodes()
            .find(|(_, n)| n.position.distance(p) <= epsilon)
            .map(|(id, _)| id)
    }

    /// Planar bounding rectangle of every node and centerline point.
    pub fn extent(&self) -> Option<Rect> {
        let node_points = self.nodes().map(|(_, n)| n.position);
        let link_points = self.links().flat_map(|(_, l)| l.centerline.iter().copied());
        Rect::from_points(node_points.chain(link_points))
    }

    fn attach(&mut self, node: NodeId, incidence: Incidence) {
        if let Some(node) = self.node_slot_mut(node) {
            node.incidences.push(incidence);
        }
    }

    fn node_slot_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)?.as_mut()
    }
}
