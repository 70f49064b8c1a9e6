use crate::error::LayoutError;
use crate::item::ScheduleItem;
use petgraph::algo::{kosaraju_scc, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// A reference to a predecessor id that is not among the items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReference {
    pub item_id: String,
    pub missing_id: String,
}

/// Finish-to-start edges between items, predecessor -> successor.
pub struct DependencyGraph {
    pub graph: DiGraph<String, ()>,
    pub id_to_index: HashMap<String, NodeIndex>,
    pub dangling: Vec<DanglingReference>,
}

impl DependencyGraph {
    pub fn build(items: &[ScheduleItem]) -> Self {
        let mut graph: DiGraph<String, ()> = DiGraph::new();
        let mut id_to_index: HashMap<String, NodeIndex> = HashMap::new();
        let mut dangling = Vec::new();

        // Nodes first; a repeated id keeps its first node
        for item in items {
            if !id_to_index.contains_key(&item.id) {
                let node_ix = graph.add_node(item.id.clone());
                id_to_index.insert(item.id.clone(), node_ix);
            }
        }

        for item in items {
            let Some(&successor) = id_to_index.get(&item.id) else {
                continue;
            };
            for pred_id in &item.depends_on {
                match id_to_index.get(pred_id) {
                    Some(&predecessor) => {
                        graph.update_edge(predecessor, successor, ());
                    }
                    None => dangling.push(DanglingReference {
                        item_id: item.id.clone(),
                        missing_id: pred_id.clone(),
                    }),
                }
            }
        }

        Self {
            graph,
            id_to_index,
            dangling,
        }
    }

    /// Resolvable `(predecessor, successor)` id pairs in edge insertion order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.graph
            .edge_indices()
            .filter_map(|edge| self.graph.edge_endpoints(edge))
            .map(|(from, to)| (self.graph[from].as_str(), self.graph[to].as_str()))
            .collect()
    }

    pub fn predecessors(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, petgraph::Direction::Incoming)
    }

    pub fn successors(&self, id: &str) -> Vec<&str> {
        self.neighbors(id, petgraph::Direction::Outgoing)
    }

    fn neighbors(&self, id: &str, direction: petgraph::Direction) -> Vec<&str> {
        let Some(&node_ix) = self.id_to_index.get(id) else {
            return Vec::new();
        };
        let mut ids: Vec<&str> = self
            .graph
            .neighbors_directed(node_ix, direction)
            .map(|ix| self.graph[ix].as_str())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Ids in an order where every predecessor precedes its successors.
    pub fn topological_order(&self) -> Result<Vec<&str>, LayoutError> {
        toposort(&self.graph, None)
            .map(|order| order.into_iter().map(|ix| self.graph[ix].as_str()).collect())
            .map_err(|_| LayoutError::DependencyCycle {
                ids: self.cycle_members(),
            })
    }

    pub fn check_acyclic(&self) -> Result<(), LayoutError> {
        self.topological_order().map(|_| ())
    }

    /// Ids of the first strongly connected component that forms a cycle.
    fn cycle_members(&self) -> Vec<String> {
        kosaraju_scc(&self.graph)
            .into_iter()
            .find(|component| {
                component.len() > 1
                    || component
                        .first()
                        .is_some_and(|&ix| self.graph.contains_edge(ix, ix))
            })
            .map(|component| {
                let mut ids: Vec<String> =
                    component.into_iter().map(|ix| self.graph[ix].clone()).collect();
                ids.sort();
                ids
            })
            .unwrap_or_default()
    }
}
