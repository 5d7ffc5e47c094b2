// src/core/graph.rs

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use std::hash::Hash;

/// Raised by a cycle-rejecting graph when an edge insertion would close a cycle.
/// Carries the ordered vertex path of the would-be cycle (first element equals
/// the last), so callers can render it as `a -> b -> a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError<T> {
    pub cycle: Vec<T>,
}

impl<T: fmt::Display> CycleError<T> {
    /// Renders the cycle path as `a -> b -> a`.
    pub fn cycle_to_string(&self) -> String {
        let mut buffer = String::new();
        for value in &self.cycle {
            if !buffer.is_empty() {
                buffer.push_str(" -> ");
            }
            buffer.push_str(&value.to_string());
        }
        buffer
    }
}

impl<T: fmt::Display> fmt::Display for CycleError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cycle detected: {}", self.cycle_to_string())
    }
}

impl<T: fmt::Display + fmt::Debug> std::error::Error for CycleError<T> {}

/// A mutable directed graph over values of `T`. Vertices are unique per
/// distinct value; edges may only connect vertices already present.
///
/// Built in acyclic mode (`DirectedGraph::acyclic`), `add_edge` performs an
/// eager reachability check and refuses any edge that would close a cycle,
/// reporting the full cycle path at the moment of insertion. Built in cyclic
/// mode (`DirectedGraph::cyclic`), edges are accepted unconditionally and
/// `is_cyclic` can be queried after the fact.
#[derive(Debug, Clone)]
pub struct DirectedGraph<T> {
    // Insertion order of vertices, so `vertices()` is deterministic.
    order: Vec<T>,
    edges: HashMap<T, Vec<T>>,
    rejects_cycles: bool,
}

impl<T: Eq + Hash + Clone> DirectedGraph<T> {
    /// Creates a graph that rejects cycle-closing edges at insertion time.
    pub fn acyclic() -> Self {
        Self {
            order: Vec::new(),
            edges: HashMap::new(),
            rejects_cycles: true,
        }
    }

    /// Creates a graph that tolerates cycles.
    pub fn cyclic() -> Self {
        Self {
            order: Vec::new(),
            edges: HashMap::new(),
            rejects_cycles: false,
        }
    }

    /// Adds a vertex for `value` if not already present. Idempotent: re-adding
    /// an existing value leaves the graph unchanged.
    pub fn add_vertex(&mut self, value: T) -> &T {
        if !self.edges.contains_key(&value) {
            self.order.push(value.clone());
            self.edges.insert(value.clone(), Vec::new());
        }
        // The entry is guaranteed present; look it up through `order` to hand
        // back a reference with the graph's lifetime.
        self.edges
            .get_key_value(&value)
            .map(|(k, _)| k)
            .unwrap_or_else(|| unreachable!())
    }

    pub fn has_vertex(&self, value: &T) -> bool {
        self.edges.contains_key(value)
    }

    pub fn get_vertex(&self, value: &T) -> Option<&T> {
        self.edges.get_key_value(value).map(|(k, _)| k)
    }

    /// All vertices, in insertion order.
    pub fn vertices(&self) -> &[T] {
        &self.order
    }

    /// Adds an edge from `from` to `to`. Both vertices must already exist;
    /// the call is a no-op otherwise. In acyclic mode, if `to` can already
    /// reach `from` (including `to == from`) the edge is NOT added and a
    /// `CycleError` with the ordered cycle path is returned.
    pub fn add_edge(&mut self, from: &T, to: &T) -> Result<(), CycleError<T>> {
        if !self.has_vertex(from) || !self.has_vertex(to) {
            return Ok(());
        }
        if self.rejects_cycles
            && let Some(mut path) = self.path(to, from)
        {
            // Close the loop for rendering: `to .. from` plus `to` again.
            path.push(to.clone());
            return Err(CycleError { cycle: path });
        }
        let targets = self.edges.entry(from.clone()).or_default();
        if !targets.contains(to) {
            targets.push(to.clone());
        }
        Ok(())
    }

    /// Removes the direct edge from `from` to `to`, if present.
    pub fn remove_edge(&mut self, from: &T, to: &T) {
        if let Some(targets) = self.edges.get_mut(from) {
            targets.retain(|t| t != to);
        }
    }

    /// True iff a direct edge from `from` to `to` exists.
    pub fn has_edge(&self, from: &T, to: &T) -> bool {
        self.edges
            .get(from)
            .is_some_and(|targets| targets.contains(to))
    }

    /// True iff `to` can be reached from `from` by following one or more
    /// edges. Traverses only the portion of the graph reachable from `from`.
    pub fn is_reachable(&self, from: &T, to: &T) -> bool {
        self.path(from, to).is_some()
    }

    /// Breadth-first search for a path from `from` to `to`; returns the
    /// ordered vertex sequence starting at `from` and ending at `to`.
    /// `from == to` yields the single-element path.
    fn path(&self, from: &T, to: &T) -> Option<Vec<T>> {
        if !self.has_vertex(from) || !self.has_vertex(to) {
            return None;
        }
        if from == to {
            return Some(vec![from.clone()]);
        }
        let mut predecessor: HashMap<&T, &T> = HashMap::new();
        let mut visited: HashSet<&T> = HashSet::new();
        let mut queue: VecDeque<&T> = VecDeque::new();
        visited.insert(from);
        queue.push_back(from);
        while let Some(current) = queue.pop_front() {
            let Some(targets) = self.edges.get(current) else {
                continue;
            };
            for next in targets {
                if !visited.insert(next) {
                    continue;
                }
                predecessor.insert(next, current);
                if next == to {
                    // Walk the predecessor chain back to `from`.
                    let mut path = vec![next.clone()];
                    let mut cursor = next;
                    while let Some(prev) = predecessor.get(cursor) {
                        path.push((*prev).clone());
                        cursor = prev;
                    }
                    path.reverse();
                    return Some(path);
                }
                queue.push_back(next);
            }
        }
        None
    }

    /// True iff the graph currently contains at least one cycle. Always false
    /// for the acyclic variant, whose insertion check keeps cycles out.
    pub fn is_cyclic(&self) -> bool {
        if self.rejects_cycles {
            return false;
        }
        for vertex in &self.order {
            if let Some(targets) = self.edges.get(vertex) {
                for target in targets {
                    if target == vertex || self.is_reachable(target, vertex) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_vertex_is_idempotent() {
        let mut graph: DirectedGraph<String> = DirectedGraph::acyclic();
        graph.add_vertex("a".to_string());
        graph.add_vertex("a".to_string());
        assert_eq!(graph.vertices().len(), 1);
        assert!(graph.has_vertex(&"a".to_string()));
        assert_eq!(graph.get_vertex(&"a".to_string()), Some(&"a".to_string()));
    }

    #[test]
    fn test_edges_require_existing_vertices() {
        let mut graph: DirectedGraph<&str> = DirectedGraph::acyclic();
        graph.add_vertex("a");
        assert!(graph.add_edge(&"a", &"ghost").is_ok());
        assert!(!graph.has_edge(&"a", &"ghost"));
    }

    #[test]
    fn test_reachability_is_transitive() {
        let mut graph: DirectedGraph<&str> = DirectedGraph::acyclic();
        graph.add_vertex("a");
        graph.add_vertex("b");
        graph.add_vertex("c");
        graph.add_edge(&"a", &"b").unwrap();
        graph.add_edge(&"b", &"c").unwrap();
        assert!(graph.is_reachable(&"a", &"c"));
        assert!(!graph.is_reachable(&"c", &"a"));
        assert!(graph.has_edge(&"a", &"b"));
        assert!(!graph.has_edge(&"a", &"c"));
    }

    #[test]
    fn test_self_edge_rejected_with_path() {
        let mut graph: DirectedGraph<&str> = DirectedGraph::acyclic();
        graph.add_vertex("clean");
        let err = graph.add_edge(&"clean", &"clean").unwrap_err();
        assert_eq!(err.cycle, vec!["clean", "clean"]);
        assert_eq!(err.cycle_to_string(), "clean -> clean");
        assert!(!graph.has_edge(&"clean", &"clean"));
    }

    #[test]
    fn test_indirect_cycle_rejected_with_full_path() {
        let mut graph: DirectedGraph<&str> = DirectedGraph::acyclic();
        graph.add_vertex("compile");
        graph.add_vertex("clean");
        graph.add_edge(&"compile", &"clean").unwrap();
        let err = graph.add_edge(&"clean", &"compile").unwrap_err();
        assert_eq!(err.cycle, vec!["compile", "clean", "compile"]);
        assert_eq!(err.cycle_to_string(), "compile -> clean -> compile");
        // The failed insertion must not have mutated the graph.
        assert!(!graph.has_edge(&"clean", &"compile"));
        assert!(!graph.is_cyclic());
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut graph: DirectedGraph<&str> = DirectedGraph::acyclic();
        for v in ["compile", "clean", "resolve"] {
            graph.add_vertex(v);
        }
        graph.add_edge(&"compile", &"clean").unwrap();
        graph.add_edge(&"clean", &"resolve").unwrap();
        // Second path converging on "resolve": valid, not a cycle.
        assert!(graph.add_edge(&"compile", &"resolve").is_ok());
        assert!(graph.is_reachable(&"compile", &"resolve"));
    }

    #[test]
    fn test_remove_edge() {
        let mut graph: DirectedGraph<&str> = DirectedGraph::acyclic();
        graph.add_vertex("a");
        graph.add_vertex("b");
        graph.add_edge(&"a", &"b").unwrap();
        graph.remove_edge(&"a", &"b");
        assert!(!graph.has_edge(&"a", &"b"));
        assert!(!graph.is_reachable(&"a", &"b"));
    }

    #[test]
    fn test_cyclic_variant_accepts_and_reports_cycles() {
        let mut graph: DirectedGraph<&str> = DirectedGraph::cyclic();
        graph.add_vertex("a");
        graph.add_vertex("b");
        graph.add_edge(&"a", &"b").unwrap();
        assert!(!graph.is_cyclic());
        graph.add_edge(&"b", &"a").unwrap();
        assert!(graph.is_cyclic());
    }
}
