//! Resource dependency graph
//!
//! Every program produces a [`StackGraph`]: named resource declarations plus
//! explicit dependency hints between them. The graph decides the order in
//! which a provider binding creates resources and the reverse order in which
//! it tears them down.

use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate resource: {0}")]
    Duplicate(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Resource '{resource}' depends on unknown resource '{dependency}'")]
    UnknownDependency { resource: String, dependency: String },

    #[error("Dependency cycle between: {}", .0.join(", "))]
    Cycle(Vec<String>),
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Anything that can be placed in a [`StackGraph`]
pub trait Declaration {
    /// Short resource kind, e.g. `container` or `StatefulSet`
    fn kind(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub id: String,
    pub payload: T,
    pub depends_on: Vec<String>,
}

impl<T: Declaration> Node<T> {
    pub fn kind(&self) -> &'static str {
        self.payload.kind()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackGraph<T> {
    nodes: Vec<Node<T>>,
    index: HashMap<String, usize>,
}

impl<T> Default for StackGraph<T> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> StackGraph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a resource
    pub fn add(&mut self, id: impl Into<String>, payload: T) -> GraphResult<()> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(GraphError::Duplicate(id));
        }

        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node {
            id,
            payload,
            depends_on: Vec::new(),
        });
        Ok(())
    }

    /// Record that `id` must exist after each of `deps`.
    ///
    /// Dependencies may be declared before their targets; they are checked
    /// by [`StackGraph::validate`].
    pub fn depends_on<I, S>(&mut self, id: &str, deps: I) -> GraphResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        let node = &mut self.nodes[idx];

        for dep in deps {
            let dep = dep.into();
            if !node.depends_on.contains(&dep) {
                node.depends_on.push(dep);
            }
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Node<T>> {
        self.index.get(id).map(|&idx| &self.nodes[idx])
    }

    /// Nodes in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check that every dependency exists and that the graph is acyclic
    pub fn validate(&self) -> GraphResult<()> {
        self.apply_order().map(|_| ())
    }

    /// Topological order. Ties resolve by declaration order.
    pub fn apply_order(&self) -> GraphResult<Vec<&Node<T>>> {
        for node in &self.nodes {
            if let Some(dep) = node.depends_on.iter().find(|d| !self.index.contains_key(*d)) {
                return Err(GraphError::UnknownDependency {
                    resource: node.id.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        let mut placed = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());

        while order.len() < self.nodes.len() {
            let next = self.nodes.iter().enumerate().position(|(idx, node)| {
                !placed[idx] && node.depends_on.iter().all(|d| placed[self.index[d]])
            });

            match next {
                Some(idx) => {
                    placed[idx] = true;
                    order.push(&self.nodes[idx]);
                }
                None => {
                    let blocked = self
                        .nodes
                        .iter()
                        .enumerate()
                        .filter(|(idx, _)| !placed[*idx])
                        .map(|(_, node)| node.id.clone())
                        .collect();
                    return Err(GraphError::Cycle(blocked));
                }
            }
        }

        Ok(order)
    }

    /// Reverse of [`StackGraph::apply_order`]
    pub fn destroy_order(&self) -> GraphResult<Vec<&Node<T>>> {
        let mut order = self.apply_order()?;
        order.reverse();
        Ok(order)
    }

    /// Apply `f` to every payload, keeping ids and dependencies
    pub fn map<U, F>(&self, mut f: F) -> StackGraph<U>
    where
        F: FnMut(&T) -> U,
    {
        StackGraph {
            nodes: self
                .nodes
                .iter()
                .map(|node| Node {
                    id: node.id.clone(),
                    payload: f(&node.payload),
                    depends_on: node.depends_on.clone(),
                })
                .collect(),
            index: self.index.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<T>(nodes: &[&Node<T>]) -> Vec<String> {
        nodes.iter().map(|n| n.id.clone()).collect()
    }

    #[test]
    fn test_declaration_order_without_dependencies() {
        let mut graph = StackGraph::new();
        graph.add("a", ()).unwrap();
        graph.add("b", ()).unwrap();
        graph.add("c", ()).unwrap();

        assert_eq!(ids(&graph.apply_order().unwrap()), ["a", "b", "c"]);
    }

    #[test]
    fn test_dependencies_come_first() {
        let mut graph = StackGraph::new();
        graph.add("container", ()).unwrap();
        graph.add("image", ()).unwrap();
        graph.add("network", ()).unwrap();
        graph.depends_on("container", ["image", "network"]).unwrap();

        assert_eq!(
            ids(&graph.apply_order().unwrap()),
            ["image", "network", "container"]
        );
        assert_eq!(
            ids(&graph.destroy_order().unwrap()),
            ["container", "network", "image"]
        );
    }

    #[test]
    fn test_forward_reference_is_allowed() {
        let mut graph = StackGraph::new();
        graph.add("app", ()).unwrap();
        graph.depends_on("app", ["db"]).unwrap();
        assert!(graph.validate().is_err());

        graph.add("db", ()).unwrap();
        assert_eq!(ids(&graph.apply_order().unwrap()), ["db", "app"]);
    }

    #[test]
    fn test_duplicate_id() {
        let mut graph = StackGraph::new();
        graph.add("a", 1).unwrap();
        assert_eq!(graph.add("a", 2), Err(GraphError::Duplicate("a".into())));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get("a").unwrap().payload, 1);
    }

    #[test]
    fn test_depends_on_unknown_resource() {
        let mut graph: StackGraph<()> = StackGraph::new();
        assert_eq!(
            graph.depends_on("missing", ["x"]),
            Err(GraphError::NotFound("missing".into()))
        );
    }

    #[test]
    fn test_unknown_dependency() {
        let mut graph = StackGraph::new();
        graph.add("a", ()).unwrap();
        graph.depends_on("a", ["ghost"]).unwrap();

        assert_eq!(
            graph.validate(),
            Err(GraphError::UnknownDependency {
                resource: "a".into(),
                dependency: "ghost".into(),
            })
        );
    }

    #[test]
    fn test_cycle_reports_blocked_resources() {
        let mut graph = StackGraph::new();
        graph.add("root", ()).unwrap();
        graph.add("a", ()).unwrap();
        graph.add("b", ()).unwrap();
        graph.depends_on("a", ["b"]).unwrap();
        graph.depends_on("b", ["a"]).unwrap();

        assert_eq!(
            graph.apply_order().unwrap_err(),
            GraphError::Cycle(vec!["a".into(), "b".into()])
        );
    }

    #[test]
    fn test_self_dependency_is_a_cycle() {
        let mut graph = StackGraph::new();
        graph.add("a", ()).unwrap();
        graph.depends_on("a", ["a"]).unwrap();
        assert!(matches!(graph.validate(), Err(GraphError::Cycle(_))));
    }

    #[test]
    fn test_repeated_dependency_is_recorded_once() {
        let mut graph = StackGraph::new();
        graph.add("a", ()).unwrap();
        graph.add("b", ()).unwrap();
        graph.depends_on("b", ["a"]).unwrap();
        graph.depends_on("b", ["a"]).unwrap();
        assert_eq!(graph.get("b").unwrap().depends_on, ["a"]);
    }

    #[test]
    fn test_map_keeps_structure() {
        let mut graph = StackGraph::new();
        graph.add("a", 1).unwrap();
        graph.add("b", 2).unwrap();
        graph.depends_on("a", ["b"]).unwrap();

        let doubled = graph.map(|v| v * 2);
        assert_eq!(doubled.get("a").unwrap().payload, 2);
        assert_eq!(ids(&doubled.apply_order().unwrap()), ["b", "a"]);
    }
}
