//! Reachability and cut vertices between relevant cells
//!
//! Walkable cells form an undirected graph. A walkable cell must lie on the
//! path when removing it would split the relevant cells; this is Tarjan's
//! articulation test restricted to subtrees that contain relevant cells.

/// Undirected graph over cell indices
#[derive(Clone, Debug, Default)]
pub struct PathGraph {
    neighbors: Vec<Vec<usize>>,
}

impl PathGraph {
    /// Create a graph with `node_count` isolated nodes
    pub fn new(node_count: usize) -> Self {
        Self {
            neighbors: vec![Vec::new(); node_count],
        }
    }

    /// Add an edge in both directions
    pub fn connect(&mut self, a: usize, b: usize) {
        if a == b || a >= self.neighbors.len() || b >= self.neighbors.len() {
            return;
        }
        if let Some(list) = self.neighbors.get_mut(a) {
            list.push(b);
        }
        if let Some(list) = self.neighbors.get_mut(b) {
            list.push(a);
        }
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Neighbours of a node
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.neighbors.get(node).map_or(&[], Vec::as_slice)
    }

    /// Cells that separate relevant cells from each other
    ///
    /// Returns `None` when the relevant cells are not all mutually reachable.
    /// With fewer than two relevant cells nothing is separating.
    pub fn separating_nodes(&self, relevant: &[usize]) -> Option<Vec<bool>> {
        let node_count = self.node_count();
        let mut cut = vec![false; node_count];
        let Some(&root) = relevant.first() else {
            return Some(cut);
        };
        if root >= node_count {
            return None;
        }

        let mut search = Search::new(node_count, relevant);
        search.visit(root);
        // (node, next neighbour position)
        let mut stack: Vec<(usize, usize)> = vec![(root, 0)];

        while let Some(frame) = stack.last_mut() {
            let (node, position) = *frame;
            if let Some(&next) = self.neighbors(node).get(position) {
                frame.1 += 1;
                if search.discovery(next) == UNVISITED {
                    search.visit(next);
                    stack.push((next, 0));
                } else {
                    search.lower(node, search.discovery(next));
                }
                continue;
            }

            stack.pop();
            let Some(&(parent, _)) = stack.last() else {
                continue;
            };
            let child_low = search.low(node);
            let child_relevant = search.relevant_below(node);
            search.lower(parent, child_low);
            search.add_relevant(parent, child_relevant);

            // The root is relevant, so a relevant subtree hanging below `parent`
            // is cut off from it when `parent` goes
            if parent != root
                && child_low >= search.discovery(parent)
                && child_relevant > 0
                && let Some(flag) = cut.get_mut(parent)
            {
                *flag = true;
            }
        }

        relevant
            .iter()
            .all(|&node| search.discovery(node) != UNVISITED)
            .then_some(cut)
    }
}

const UNVISITED: usize = usize::MAX;

/// Depth-first search bookkeeping
struct Search {
    is_relevant: Vec<bool>,
    discovery: Vec<usize>,
    low: Vec<usize>,
    relevant_below: Vec<usize>,
    time: usize,
}

impl Search {
    fn new(node_count: usize, relevant: &[usize]) -> Self {
        let mut is_relevant = vec![false; node_count];
        for &node in relevant {
            if let Some(flag) = is_relevant.get_mut(node) {
                *flag = true;
            }
        }
        Self {
            is_relevant,
            discovery: vec![UNVISITED; node_count],
            low: vec![UNVISITED; node_count],
            relevant_below: vec![0; node_count],
            time: 0,
        }
    }

    fn visit(&mut self, node: usize) {
        if let Some(d) = self.discovery.get_mut(node) {
            *d = self.time;
        }
        if let Some(l) = self.low.get_mut(node) {
            *l = self.time;
        }
        if let Some(r) = self.relevant_below.get_mut(node) {
            *r = usize::from(self.is_relevant.get(node).copied().unwrap_or(false));
        }
        self.time += 1;
    }

    fn discovery(&self, node: usize) -> usize {
        self.discovery.get(node).copied().unwrap_or(UNVISITED)
    }

    fn low(&self, node: usize) -> usize {
        self.low.get(node).copied().unwrap_or(UNVISITED)
    }

    fn relevant_below(&self, node: usize) -> usize {
        self.relevant_below.get(node).copied().unwrap_or(0)
    }

    fn lower(&mut self, node: usize, value: usize) {
        if let Some(l) = self.low.get_mut(node) {
            *l = (*l).min(value);
        }
    }

    fn add_relevant(&mut self, node: usize, count: usize) {
        if let Some(r) = self.relevant_below.get_mut(node) {
            *r += count;
        }
    }
}
