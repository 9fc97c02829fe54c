//! Deterministic layered layout for the workflow view model.
//!
//! States are ranked by breadth-first distance from the current state (or
//! the first state) and laid out in columns. Criteria sit on the segment
//! between their transition's endpoints; processes hang below their anchor.
//! Group nodes wrap their children.

use crate::config::LayoutSettings;
use crate::model::{GraphModel, NodeKind, class};
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

const GROUP_PADDING: f64 = 10.0;
const PROCESS_SPACING: f64 = 20.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A node's laid-out box; `center` is in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NodeBox {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl NodeBox {
    pub fn bounds(&self) -> Bounds {
        Bounds {
            min_x: self.center.x - self.width / 2.0,
            min_y: self.center.y - self.height / 2.0,
            max_x: self.center.x + self.width / 2.0,
            max_y: self.center.y + self.height / 2.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    pub fn union(&self, other: &Bounds) -> Bounds {
        Bounds {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Bounding box of all boxes; `None` when there are none.
    pub fn enclosing<'a, I>(boxes: I) -> Option<Bounds>
    where
        I: IntoIterator<Item = &'a NodeBox>,
    {
        boxes
            .into_iter()
            .map(NodeBox::bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Layout {
    boxes: Vec<(String, NodeBox)>,
}

impl Layout {
    pub fn get(&self, id: &str) -> Option<&NodeBox> {
        self.boxes.iter().find(|(n, _)| n == id).map(|(_, b)| b)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NodeBox)> {
        self.boxes.iter().map(|(id, b)| (id.as_str(), b))
    }

    pub fn len(&self) -> usize {
        self.boxes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boxes.is_empty()
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::enclosing(self.boxes.iter().map(|(_, b)| b))
    }
}

pub fn layout(model: &GraphModel, settings: &LayoutSettings) -> Layout {
    let kinds: HashMap<&str, NodeKind> =
        model.nodes.iter().map(|n| (n.id.as_str(), n.kind)).collect();
    let is_state = |id: &str| kinds.get(id) == Some(&NodeKind::State);

    // Recover each transition's state endpoints, including split edges.
    let mut endpoints: Vec<(&str, Option<&str>, Option<&str>)> = Vec::new();
    for edge in model
        .edges
        .iter()
        .filter(|e| e.has_class(class::EDGE_TRANSITION))
    {
        let tid = edge.transition_id.as_deref().unwrap_or(edge.id.as_str());
        let pos = match endpoints.iter().position(|(t, _, _)| *t == tid) {
            Some(pos) => pos,
            None => {
                endpoints.push((tid, None, None));
                endpoints.len() - 1
            }
        };
        if is_state(&edge.source) {
            endpoints[pos].1 = Some(edge.source.as_str());
        }
        if is_state(&edge.target) {
            endpoints[pos].2 = Some(edge.target.as_str());
        }
    }
    let transitions: HashMap<&str, (&str, &str)> = endpoints
        .iter()
        .filter_map(|(t, s, e)| Some((*t, ((*s)?, (*e)?))))
        .collect();

    let mut positions: HashMap<&str, Point> = rank_states(model, &endpoints, settings);

    // Criteria, evenly spaced along their transition.
    let mut criteria_by_transition: Vec<(&str, Vec<&str>)> = Vec::new();
    for node in model.nodes.iter().filter(|n| n.kind == NodeKind::Criteria) {
        let Some(tid) = node.transition_id.as_deref() else {
            continue;
        };
        match criteria_by_transition.iter_mut().find(|(t, _)| *t == tid) {
            Some((_, ids)) => ids.push(node.id.as_str()),
            None => criteria_by_transition.push((tid, vec![node.id.as_str()])),
        }
    }
    for (tid, ids) in &criteria_by_transition {
        let Some((start, end)) = transitions.get(tid) else {
            continue;
        };
        let (Some(a), Some(b)) = (positions.get(start).copied(), positions.get(end).copied())
        else {
            continue;
        };
        let k = ids.len() as f64;
        for (i, id) in ids.iter().enumerate() {
            let point = if start == end {
                // Self loop: line the criteria up above the state.
                Point::new(
                    a.x + (i as f64 - (k - 1.0) / 2.0) * settings.criteria_size * 1.5,
                    a.y - settings.node_height,
                )
            } else {
                let t = (i as f64 + 1.0) / (k + 1.0);
                Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
            };
            positions.insert(*id, point);
        }
    }

    // Processes fan out below their anchor.
    let mut by_anchor: Vec<(&str, Vec<&str>)> = Vec::new();
    for edge in model.edges.iter().filter(|e| e.has_class(class::EDGE_PROCESS)) {
        match by_anchor.iter_mut().find(|(a, _)| *a == edge.source) {
            Some((_, ids)) => ids.push(edge.target.as_str()),
            None => by_anchor.push((edge.source.as_str(), vec![edge.target.as_str()])),
        }
    }
    for (anchor, ids) in &by_anchor {
        let Some(origin) = positions.get(anchor).copied() else {
            continue;
        };
        let n = ids.len() as f64;
        for (j, id) in ids.iter().enumerate() {
            let dx = (j as f64 - (n - 1.0) / 2.0) * (settings.process_width + PROCESS_SPACING);
            positions.insert(*id, Point::new(origin.x + dx, origin.y + settings.process_offset));
        }
    }

    let mut boxes: Vec<(String, NodeBox)> = Vec::with_capacity(model.nodes.len());
    for node in &model.nodes {
        let (width, height) = match node.kind {
            NodeKind::State => (settings.node_width, settings.node_height),
            NodeKind::Criteria => (settings.criteria_size, settings.criteria_size),
            NodeKind::Process => (settings.process_width, settings.process_height),
            NodeKind::Group => continue,
        };
        if let Some(center) = positions.get(node.id.as_str()) {
            boxes.push((
                node.id.clone(),
                NodeBox {
                    center: *center,
                    width,
                    height,
                },
            ));
        }
    }

    // Groups wrap whatever children were placed.
    for group in model.nodes.iter().filter(|n| n.kind == NodeKind::Group) {
        let children = boxes.iter().filter_map(|(id, b)| {
            let child = model.node(id)?;
            (child.parent.as_deref() == Some(group.id.as_str())).then_some(b)
        });
        if let Some(bounds) = Bounds::enclosing(children) {
            boxes.push((
                group.id.clone(),
                NodeBox {
                    center: bounds.center(),
                    width: bounds.width() + 2.0 * GROUP_PADDING,
                    height: bounds.height() + 2.0 * GROUP_PADDING,
                },
            ));
        }
    }

    // Restore model order so renderers see a stable sequence.
    let order: HashMap<&str, usize> = model
        .nodes
        .iter()
        .enumerate()
        .map(|(i, n)| (n.id.as_str(), i))
        .collect();
    boxes.sort_by_key(|(id, _)| order.get(id.as_str()).copied().unwrap_or(usize::MAX));

    Layout { boxes }
}

fn rank_states<'a>(
    model: &'a GraphModel,
    endpoints: &[(&'a str, Option<&'a str>, Option<&'a str>)],
    settings: &LayoutSettings,
) -> HashMap<&'a str, Point> {
    let mut graph: DiGraph<&'a str, ()> = DiGraph::new();
    let mut index: HashMap<&str, NodeIndex> = HashMap::new();
    for node in model.nodes.iter().filter(|n| n.kind == NodeKind::State) {
        index.insert(node.id.as_str(), graph.add_node(node.id.as_str()));
    }
    for (_, start, end) in endpoints {
        if let (Some(s), Some(e)) = (start, end) {
            if let (Some(a), Some(b)) = (index.get(s), index.get(e)) {
                graph.add_edge(*a, *b, ());
            }
        }
    }

    let mut seeds: Vec<NodeIndex> = Vec::new();
    if let Some(current) = model.current_state().and_then(|n| index.get(n.id.as_str())) {
        seeds.push(*current);
    }
    seeds.extend(graph.node_indices());

    let mut rank: HashMap<NodeIndex, usize> = HashMap::new();
    let mut rows: HashMap<usize, usize> = HashMap::new();
    let mut positions = HashMap::new();
    let column = settings.node_width + settings.rank_gap;
    let line = settings.node_height + settings.row_gap;

    for seed in seeds {
        if rank.contains_key(&seed) {
            continue;
        }
        let mut queue = VecDeque::from([seed]);
        rank.insert(seed, 0);
        while let Some(idx) = queue.pop_front() {
            let r = rank[&idx];
            let row = rows.entry(r).or_insert(0);
            positions.insert(graph[idx], Point::new(r as f64 * column, *row as f64 * line));
            *row += 1;

            let mut next: Vec<NodeIndex> = graph
                .neighbors_directed(idx, Direction::Outgoing)
                .filter(|n| !rank.contains_key(n))
                .collect();
            // petgraph yields neighbours newest-first; keep payload order instead.
            next.sort();
            next.dedup();
            for n in next {
                rank.insert(n, r + 1);
                queue.push_back(n);
            }
        }
    }

    positions
}
