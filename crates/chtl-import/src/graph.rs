//! Dependency Graph: adjacency of canonical file paths with cycle
//! detection and topological ordering. Grounded on
//! `ImportDependencyGraph::AddDependency`/`HasCycle`/`DFSCycleDetection`/
//! `GetTopologicalOrder`.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::GraphError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    edges: HashMap<String, Vec<String>>,
    imported: HashSet<String>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `from -> to` tentatively; if it would create a cycle, the
    /// edge is rolled back and the offending cycle path is returned.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        let from = chtl_core::canonicalize(from);
        let to = chtl_core::canonicalize(to);

        if from == to {
            return Err(GraphError::SelfEdge(from.into()));
        }

        self.edges.entry(from.clone()).or_default().push(to.clone());

        if let Some(path) = self.find_cycle() {
            if let Some(list) = self.edges.get_mut(&from) {
                if let Some(pos) = list.iter().rposition(|t| *t == to) {
                    list.remove(pos);
                }
            }
            return Err(GraphError::Cycle(path.into_iter().map(Into::into).collect()));
        }
        Ok(())
    }

    pub fn has_cycle(&self) -> bool {
        self.find_cycle().is_some()
    }

    pub fn cycle_path(&self) -> Vec<String> {
        self.find_cycle().unwrap_or_default()
    }

    fn find_cycle(&self) -> Option<Vec<String>> {
        let mut color: HashMap<&str, Color> = HashMap::new();
        for node in self.edges.keys() {
            color.insert(node.as_str(), Color::White);
        }

        let mut nodes: Vec<&str> = self.edges.keys().map(String::as_str).collect();
        nodes.sort();

        for node in nodes {
            if color.get(node).copied().unwrap_or(Color::White) == Color::White {
                let mut stack = Vec::new();
                if let Some(cycle) = self.visit(node, &mut color, &mut stack) {
                    return Some(cycle);
                }
            }
        }
        None
    }

    fn visit<'a>(&'a self, node: &'a str, color: &mut HashMap<&'a str, Color>, stack: &mut Vec<&'a str>) -> Option<Vec<String>> {
        color.insert(node, Color::Gray);
        stack.push(node);

        if let Some(neighbors) = self.edges.get(node) {
            for next in neighbors {
                let next = next.as_str();
                match color.get(next).copied().unwrap_or(Color::White) {
                    Color::White => {
                        if let Some(cycle) = self.visit(next, color, stack) {
                            return Some(cycle);
                        }
                    }
                    Color::Gray => {
                        let start = stack.iter().position(|n| *n == next).unwrap_or(0);
                        let mut cycle: Vec<String> = stack[start..].iter().map(|s| s.to_string()).collect();
                        cycle.push(next.to_string());
                        return Some(cycle);
                    }
                    Color::Black => {}
                }
            }
        }

        stack.pop();
        color.insert(node, Color::Black);
        None
    }

    /// Kahn's algorithm over a snapshot of the current graph; returns
    /// empty when a cycle exists. FIFO processing of zero-in-degree
    /// nodes preserves insertion order among ties.
    pub fn topo_order(&self) -> Vec<String> {
        let mut nodes: Vec<String> = Vec::new();
        let mut seen = HashSet::new();
        for (from, tos) in &self.edges {
            if seen.insert(from.clone()) {
                nodes.push(from.clone());
            }
            for to in tos {
                if seen.insert(to.clone()) {
                    nodes.push(to.clone());
                }
            }
        }

        let mut in_degree: HashMap<String, usize> = nodes.iter().map(|n| (n.clone(), 0)).collect();
        for tos in self.edges.values() {
            for to in tos {
                *in_degree.entry(to.clone()).or_insert(0) += 1;
            }
        }

        let mut queue: VecDeque<String> = VecDeque::new();
        for node in &nodes {
            if in_degree.get(node).copied().unwrap_or(0) == 0 {
                queue.push_back(node.clone());
            }
        }

        let mut order = Vec::new();
        while let Some(node) = queue.pop_front() {
            order.push(node.clone());
            if let Some(tos) = self.edges.get(&node) {
                for to in tos {
                    let entry = in_degree.entry(to.clone()).or_insert(0);
                    *entry -= 1;
                    if *entry == 0 {
                        queue.push_back(to.clone());
                    }
                }
            }
        }

        if order.len() != nodes.len() {
            return Vec::new();
        }
        order
    }

    pub fn mark_imported(&mut self, path: &str) {
        self.imported.insert(chtl_core::canonicalize(path));
    }

    pub fn is_imported(&self, path: &str) -> bool {
        self.imported.contains(&chtl_core::canonicalize(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_edge_is_rejected() {
        let mut graph = DependencyGraph::new();
        assert!(graph.add_dependency("/a.chtl", "/a.chtl").is_err());
    }

    #[test]
    fn cycle_is_detected_and_rolled_back() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("/a.chtl", "/b.chtl").unwrap();
        let err = graph.add_dependency("/b.chtl", "/a.chtl");
        assert!(err.is_err());
        assert!(!graph.has_cycle());
    }

    #[test]
    fn topo_order_is_empty_when_acyclic_check_fails() {
        let mut graph = DependencyGraph::new();
        graph.add_dependency("/a.chtl", "/b.chtl").unwrap();
        graph.add_dependency("/b.chtl", "/c.chtl").unwrap();
        let order = graph.topo_order();
        assert_eq!(order.len(), 3);
        let pos_a = order.iter().position(|p| p.ends_with("a.chtl")).unwrap();
        let pos_b = order.iter().position(|p| p.ends_with("b.chtl")).unwrap();
        let pos_c = order.iter().position(|p| p.ends_with("c.chtl")).unwrap();
        assert!(pos_a < pos_b);
        assert!(pos_b < pos_c);
    }

    #[test]
    fn mark_and_query_imported() {
        let mut graph = DependencyGraph::new();
        graph.mark_imported("/a.chtl");
        assert!(graph.is_imported("/a.chtl"));
        assert!(!graph.is_imported("/b.chtl"));
    }
}
