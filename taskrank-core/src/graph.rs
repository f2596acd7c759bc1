//! Dependency graph over one task batch.
//!
//! Nodes are batch positions. Task `i` has an edge to `j` when one of its
//! dependency values resolves to `j`. Resolution order:
//!
//! 1. a task whose declared `id` equals the value (first in batch order);
//! 2. otherwise, an integer value below the batch length names a position.
//!
//! Values that resolve to nothing are ignored. Note that small integer ids
//! can shadow positions: `[ {id: 1}, {id: 0} ]` resolves `0` to position 1.

use crate::task::{Task, TaskId};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnPath,
    Done,
}

#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    /// edges[i] = positions task i depends on, deduplicated, declaration order.
    edges: Vec<Vec<usize>>,
    /// blocked_count[j] = other tasks with an edge to j.
    blocked_count: Vec<usize>,
    ids: HashMap<TaskId, usize>,
    nodes: usize,
}

impl DependencyGraph {
    pub fn build(tasks: &[Task]) -> Self {
        let mut ids: HashMap<TaskId, usize> = HashMap::with_capacity(tasks.len());
        for (pos, t) in tasks.iter().enumerate() {
            if let Some(id) = &t.id {
                ids.entry(id.clone()).or_insert(pos);
            }
        }

        let mut graph = Self {
            edges: Vec::with_capacity(tasks.len()),
            blocked_count: vec![0; tasks.len()],
            ids,
            nodes: tasks.len(),
        };

        for (pos, t) in tasks.iter().enumerate() {
            let mut out: Vec<usize> = Vec::with_capacity(t.dependencies.len());
            for dep in &t.dependencies {
                let Some(target) = graph.resolve(dep) else { continue };
                if out.contains(&target) {
                    continue;
                }
                out.push(target);
                if target != pos {
                    graph.blocked_count[target] += 1;
                }
            }
            graph.edges.push(out);
        }

        graph
    }

    pub fn len(&self) -> usize {
        self.nodes
    }

    pub fn is_empty(&self) -> bool {
        self.nodes == 0
    }

    /// Resolve a dependency value to a batch position (id first, then position).
    pub fn resolve(&self, value: &TaskId) -> Option<usize> {
        self.ids
            .get(value)
            .copied()
            .or_else(|| value.as_position().filter(|&p| p < self.len()))
    }

    /// Positions task `pos` depends on.
    pub fn dependencies_of(&self, pos: usize) -> &[usize] {
        self.edges.get(pos).map(Vec::as_slice).unwrap_or(&[])
    }

    /// How many other tasks declare a dependency on `pos`.
    ///
    /// A dependency counts toward the single position it resolves to, so a
    /// value that matches one task's id never also counts for the task at that
    /// position.
    pub fn dependents_of(&self, pos: usize) -> usize {
        self.blocked_count.get(pos).copied().unwrap_or(0)
    }

    /// Every cycle reached by a depth-first walk from each unvisited node.
    ///
    /// A cycle is the slice of the active path from the re-entered node
    /// through the node whose edge closed it. A node may appear in more than
    /// one cycle. The walk keeps its own stack, so deep chains are fine.
    pub fn find_cycles(&self) -> Vec<Vec<usize>> {
        let n = self.len();
        let mut cycles = Vec::new();
        let mut mark = vec![Mark::Unvisited; n];
        let mut path_index = vec![0usize; n];
        let mut path: Vec<usize> = Vec::with_capacity(n);
        // (node, next edge to follow)
        let mut stack: Vec<(usize, usize)> = Vec::with_capacity(n);

        for root in 0..n {
            if mark[root] != Mark::Unvisited {
                continue;
            }

            mark[root] = Mark::OnPath;
            path_index[root] = path.len();
            path.push(root);
            stack.push((root, 0));

            while let Some(frame) = stack.last_mut() {
                let node = frame.0;
                let Some(&next) = self.edges[node].get(frame.1) else {
                    stack.pop();
                    path.pop();
                    mark[node] = Mark::Done;
                    continue;
                };
                frame.1 += 1;

                match mark[next] {
                    Mark::OnPath => cycles.push(path[path_index[next]..].to_vec()),
                    Mark::Done => {}
                    Mark::Unvisited => {
                        mark[next] = Mark::OnPath;
                        path_index[next] = path.len();
                        path.push(next);
                        stack.push((next, 0));
                    }
                }
            }
        }

        cycles
    }
}

/// Build the graph for `tasks` and return its cycles.
pub fn detect_cycles(tasks: &[Task]) -> Vec<Vec<usize>> {
    DependencyGraph::build(tasks).find_cycles()
}

/// Positions that take part in at least one cycle.
pub fn cycle_members(cycles: &[Vec<usize>]) -> BTreeSet<usize> {
    cycles.iter().flatten().copied().collect()
}
