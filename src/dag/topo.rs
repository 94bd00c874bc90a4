// src/dag/topo.rs

//! Layered topological sort over a named-node dependency graph.
//!
//! One utility serves both dependency graphs in the system: compile-module
//! layering and post-step ordering. Callers supply how to read a node's id
//! and dependency list, plus a tie-break for deterministic ordering inside
//! a layer.

use std::cmp::Ordering;
use std::collections::HashMap;

use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use thiserror::Error;

/// No zero-in-degree node exists while nodes remain: the listed ids form
/// (or depend into) a cycle. No partial result is produced.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cyclic dependsOn detected among: {}", ids.join(", "))]
pub struct CycleError {
    pub ids: Vec<String>,
}

/// Kahn's algorithm, layered.
///
/// Returns layers to run strictly in order; nodes within one layer have no
/// remaining dependencies on each other. Dependencies referencing ids not
/// present in `nodes` contribute no edge — restricting the graph to the
/// node set is the caller-visible contract, any policy about such
/// references is applied before calling this.
///
/// Deterministic: given the same nodes and tie-break, the output layer
/// structure is identical across runs.
pub fn layered_sort<'a, T, I, D, C>(
    nodes: &'a [T],
    id_of: I,
    deps_of: D,
    tie_break: C,
) -> Result<Vec<Vec<&'a T>>, CycleError>
where
    I: Fn(&'a T) -> &'a str,
    D: Fn(&'a T) -> Vec<&'a str>,
    C: Fn(&&'a T, &&'a T) -> Ordering,
{
    let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

    for n in nodes {
        graph.add_node(id_of(n));
    }

    // Edge direction: dependency -> dependent.
    for n in nodes {
        let id = id_of(n);
        for dep in deps_of(n) {
            if dep != id && graph.contains_node(dep) {
                graph.add_edge(dep, id, ());
            }
        }
    }

    let mut indegree: HashMap<&str, usize> = nodes
        .iter()
        .map(|n| {
            let id = id_of(n);
            (
                id,
                graph.neighbors_directed(id, Direction::Incoming).count(),
            )
        })
        .collect();

    let mut remaining: Vec<&T> = nodes.iter().collect();
    let mut layers: Vec<Vec<&T>> = Vec::new();

    while !remaining.is_empty() {
        let (mut ready, rest): (Vec<&T>, Vec<&T>) = remaining
            .into_iter()
            .partition(|n| indegree.get(id_of(n)).copied().unwrap_or(0) == 0);

        if ready.is_empty() {
            let mut ids: Vec<String> =
                rest.iter().map(|n| id_of(n).to_string()).collect();
            ids.sort();
            return Err(CycleError { ids });
        }

        ready.sort_by(&tie_break);

        for n in &ready {
            for dependent in graph.neighbors_directed(id_of(n), Direction::Outgoing) {
                if let Some(d) = indegree.get_mut(dependent) {
                    *d = d.saturating_sub(1);
                }
            }
        }

        layers.push(ready);
        remaining = rest;
    }

    Ok(layers)
}
