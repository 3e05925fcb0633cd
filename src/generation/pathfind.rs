//! Grid A* search with a caller-supplied step cost
//!
//! The pathfinder knows nothing about cell contents: a cost function decides
//! whether a step between two 4-connected coordinates is allowed and what it
//! costs. Nodes are created lazily per search in an arena keyed by coordinate,
//! and the arena and open heap are cleared before every search.
//!
//! The Manhattan heuristic is admissible only while every step costs at least
//! 1; cheaper steps make the search return valid but possibly longer paths.

use glam::IVec2;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use tracing::trace;

/// 4-connected neighborhood
const NEIGHBORS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

/// Result of a path search
///
/// `path` runs from start to goal inclusive; `costs[i]` is the accumulated cost
/// at `path[i]`. An unreachable goal yields an empty result. A search whose
/// start equals its goal yields the single-cell path `[start]` with cost 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathResult {
    /// Cells from start to goal inclusive, empty when the goal is unreachable
    pub path: Vec<IVec2>,
    /// Accumulated cost at each cell of `path`
    pub costs: Vec<f32>,
    /// Nodes popped from the open set during the search
    pub nodes_expanded: usize,
}

impl PathResult {
    /// Whether no route was found
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Number of cells on the path
    #[inline]
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Accumulated cost at the goal, `None` when no route was found
    pub fn total_cost(&self) -> Option<f32> {
        self.costs.last().copied()
    }
}

#[derive(Debug, Clone)]
struct Node {
    pos: IVec2,
    cost: f32,
    heuristic: f32,
    parent: Option<usize>,
    closed: bool,
}

impl Node {
    fn new(pos: IVec2) -> Self {
        Self {
            pos,
            cost: f32::INFINITY,
            heuristic: 0.0,
            parent: None,
            closed: false,
        }
    }
}

/// Heap entry; ordered so `BinaryHeap` pops the lowest `priority` first
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    priority: f32,
    node: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .total_cmp(&self.priority)
            .then_with(|| other.node.cmp(&self.node))
    }
}

#[inline]
fn manhattan(a: IVec2, b: IVec2) -> f32 {
    let d = (a - b).abs();
    (d.x + d.y) as f32
}

/// Reusable A* search state
///
/// Holding a `Pathfinder` keeps its allocations between searches; every call
/// to [`Pathfinder::find_path`] still starts from a cleared node pool.
///
/// # Example
///
/// ```
/// use rust_library_dungeon::Pathfinder;
/// use glam::IVec2;
///
/// let mut pathfinder = Pathfinder::new();
/// let in_bounds = |p: IVec2| p.x >= 0 && p.y >= 0 && p.x < 5 && p.y < 5;
/// let result = pathfinder.find_path(IVec2::ZERO, IVec2::new(4, 4), |_, to| {
///     in_bounds(to).then_some(1.0)
/// });
/// assert_eq!(result.len(), 9);
/// ```
#[derive(Debug, Default)]
pub struct Pathfinder {
    nodes: Vec<Node>,
    lookup: HashMap<IVec2, usize>,
    open: BinaryHeap<OpenEntry>,
}

impl Pathfinder {
    /// Create a pathfinder with empty scratch buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all nodes and open entries from the previous search
    fn reset(&mut self) {
        self.nodes.clear();
        self.lookup.clear();
        self.open.clear();
    }

    /// Arena index of the node at `pos`, creating it on first reference
    fn node_at(&mut self, pos: IVec2) -> usize {
        if let Some(&index) = self.lookup.get(&pos) {
            return index;
        }
        let index = self.nodes.len();
        self.nodes.push(Node::new(pos));
        self.lookup.insert(pos, index);
        index
    }

    /// Search for the cheapest 4-connected route from `start` to `end`
    ///
    /// `cost_fn(from, to)` returns `None` when the step is not traversable and
    /// `Some(cost)` otherwise. The cost function is the only bound on the
    /// search area, so it must reject coordinates outside the grid.
    pub fn find_path<F>(&mut self, start: IVec2, end: IVec2, mut cost_fn: F) -> PathResult
    where
        F: FnMut(IVec2, IVec2) -> Option<f32>,
    {
        self.reset();

        if start == end {
            return PathResult {
                path: vec![start],
                costs: vec![0.0],
                nodes_expanded: 0,
            };
        }

        let start_index = self.node_at(start);
        {
            let node = &mut self.nodes[start_index];
            node.cost = 0.0;
            node.heuristic = manhattan(start, end);
        }
        self.open.push(OpenEntry {
            priority: manhattan(start, end),
            node: start_index,
        });

        let mut nodes_expanded = 0usize;

        while let Some(OpenEntry { node: current, .. }) = self.open.pop() {
            if self.nodes[current].closed {
                continue;
            }
            self.nodes[current].closed = true;
            nodes_expanded += 1;

            let current_pos = self.nodes[current].pos;
            if current_pos == end {
                let result = self.reconstruct(current, nodes_expanded);
                trace!(
                    cells = result.len(),
                    nodes_expanded,
                    "path found"
                );
                return result;
            }

            let current_cost = self.nodes[current].cost;
            for step in NEIGHBORS {
                let next_pos = current_pos + step;

                if let Some(&existing) = self.lookup.get(&next_pos) {
                    if self.nodes[existing].closed {
                        continue;
                    }
                }

                let Some(step_cost) = cost_fn(current_pos, next_pos) else {
                    continue;
                };

                let tentative = current_cost + step_cost;
                let next = self.node_at(next_pos);
                let node = &mut self.nodes[next];
                if tentative < node.cost {
                    node.cost = tentative;
                    node.heuristic = manhattan(next_pos, end);
                    node.parent = Some(current);
                    let priority = tentative + node.heuristic;
                    self.open.push(OpenEntry {
                        priority,
                        node: next,
                    });
                }
            }
        }

        trace!(nodes_expanded, "no path");
        PathResult {
            nodes_expanded,
            ..Default::default()
        }
    }

    /// Walk parent links from `goal` back to the start
    fn reconstruct(&self, goal: usize, nodes_expanded: usize) -> PathResult {
        let mut path = Vec::new();
        let mut costs = Vec::new();
        let mut current = Some(goal);

        while let Some(index) = current {
            let node = &self.nodes[index];
            path.push(node.pos);
            costs.push(node.cost);
            current = node.parent;
        }

        path.reverse();
        costs.reverse();
        PathResult {
            path,
            costs,
            nodes_expanded,
        }
    }
}

/// One-off search with a fresh [`Pathfinder`]
pub fn find_path<F>(start: IVec2, end: IVec2, cost_fn: F) -> PathResult
where
    F: FnMut(IVec2, IVec2) -> Option<f32>,
{
    Pathfinder::new().find_path(start, end, cost_fn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn open_grid(size: i32) -> impl FnMut(IVec2, IVec2) -> Option<f32> {
        move |_, to: IVec2| {
            (to.x >= 0 && to.y >= 0 && to.x < size && to.y < size).then_some(1.0)
        }
    }

    fn walled_grid(size: i32, walls: HashSet<IVec2>) -> impl FnMut(IVec2, IVec2) -> Option<f32> {
        move |_, to: IVec2| {
            let inside = to.x >= 0 && to.y >= 0 && to.x < size && to.y < size;
            (inside && !walls.contains(&to)).then_some(1.0)
        }
    }

    fn assert_connected(path: &[IVec2]) {
        for pair in path.windows(2) {
            let d = (pair[1] - pair[0]).abs();
            assert_eq!(d.x + d.y, 1, "{:?} -> {:?} is not a 4-connected step", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_open_grid_corner_to_corner() {
        let result = find_path(IVec2::ZERO, IVec2::new(4, 4), open_grid(5));
        assert_eq!(result.len(), 9);
        assert_eq!(result.path.first(), Some(&IVec2::ZERO));
        assert_eq!(result.path.last(), Some(&IVec2::new(4, 4)));
        assert_connected(&result.path);
        assert!(result.costs.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(result.total_cost(), Some(8.0));
    }

    #[test]
    fn test_blocked_goal_returns_empty() {
        let walls: HashSet<IVec2> = [IVec2::new(4, 4)].into_iter().collect();
        let result = find_path(IVec2::ZERO, IVec2::new(4, 4), walled_grid(5, walls));
        assert!(result.is_empty());
        assert!(result.costs.is_empty());
        assert_eq!(result.total_cost(), None);
    }

    #[test]
    fn test_start_equals_end() {
        let result = find_path(IVec2::new(2, 3), IVec2::new(2, 3), open_grid(5));
        assert_eq!(result.path, vec![IVec2::new(2, 3)]);
        assert_eq!(result.costs, vec![0.0]);
        assert!(!result.is_empty());
    }

    #[test]
    fn test_routes_around_wall() {
        let walls: HashSet<IVec2> = (0..4).map(|y| IVec2::new(2, y)).collect();
        let result = find_path(IVec2::new(0, 0), IVec2::new(4, 0), walled_grid(5, walls.clone()));

        assert!(!result.is_empty());
        assert_connected(&result.path);
        assert!(result.path.iter().all(|p| !walls.contains(p)));
        // Up to row 4, across, back down
        assert_eq!(result.total_cost(), Some(12.0));
    }

    #[test]
    fn test_enclosed_goal_returns_empty() {
        let walls: HashSet<IVec2> = [IVec2::new(1, 0), IVec2::new(1, 1), IVec2::new(1, 2)]
            .into_iter()
            .collect();
        let result = find_path(IVec2::new(0, 1), IVec2::new(2, 1), walled_grid(3, walls));
        assert!(result.is_empty());
        assert!(result.nodes_expanded > 0);
    }

    #[test]
    fn test_prefers_cheaper_cells() {
        // Row y == 1 is expensive, so the route detours through row 0
        let cost = |_: IVec2, to: IVec2| {
            if to.x < 0 || to.y < 0 || to.x >= 5 || to.y >= 3 {
                None
            } else if to.y == 1 {
                Some(10.0)
            } else {
                Some(1.0)
            }
        };
        let result = find_path(IVec2::new(0, 0), IVec2::new(4, 0), cost);
        assert!(result.path.iter().all(|p| p.y == 0));
        assert_eq!(result.total_cost(), Some(4.0));
    }

    #[test]
    fn test_state_does_not_leak_between_searches() {
        let mut pathfinder = Pathfinder::new();

        let walls: HashSet<IVec2> = [IVec2::new(4, 4)].into_iter().collect();
        let blocked = pathfinder.find_path(IVec2::ZERO, IVec2::new(4, 4), walled_grid(5, walls));
        assert!(blocked.is_empty());

        let open = pathfinder.find_path(IVec2::ZERO, IVec2::new(4, 4), open_grid(5));
        assert_eq!(open.len(), 9);
        assert_eq!(open.total_cost(), Some(8.0));
    }

    #[test]
    fn test_open_entry_ordering_is_min_first() {
        let mut heap = BinaryHeap::new();
        for (priority, node) in [(5.0, 0), (1.0, 1), (3.0, 2)] {
            heap.push(OpenEntry { priority, node });
        }
        let order: Vec<usize> = std::iter::from_fn(|| heap.pop().map(|e| e.node)).collect();
        assert_eq!(order, vec![1, 2, 0]);
    }
}
