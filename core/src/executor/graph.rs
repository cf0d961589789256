use std::collections::{HashMap, HashSet};

use crate::error::ExecutorError;
use crate::executor::types::TaskLike;

/// Task dependency graph (DAG) over a slice of tasks, addressed by index.
#[derive(Debug, Clone)]
pub struct TaskGraph {
    /// Task nodes: task_id -> position in the input slice
    nodes: HashMap<String, usize>,

    /// Dependency edges: task_id -> list of dependencies
    edges: HashMap<String, Vec<String>>,

    /// Reverse edges: task_id -> list of tasks that depend on it
    reverse_edges: HashMap<String, Vec<String>>,

    /// Original insertion order (for stable batches)
    insertion_order: Vec<String>,
}

/// A task the batcher could never schedule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedTask {
    pub index: usize,
    pub id: String,
    /// Dependencies that name no task in the run
    pub missing: Vec<String>,
    /// Dependencies that exist but never became ready (cycles, or blocked themselves)
    pub unresolved: Vec<String>,
}

impl BlockedTask {
    pub fn reason(&self) -> String {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing dependencies: {}", self.missing.join(", ")));
        }
        if !self.unresolved.is_empty() {
            parts.push(format!(
                "unresolved or circular dependencies: {}",
                self.unresolved.join(", ")
            ));
        }
        format!("blocked ({})", parts.join("; "))
    }
}

/// Result of batching: ready batches in execution order plus leftovers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Layering {
    /// Each batch lists task indices in input order
    pub batches: Vec<Vec<usize>>,
    pub blocked: Vec<BlockedTask>,
}

impl Layering {
    pub fn is_complete(&self) -> bool {
        self.blocked.is_empty()
    }
}

impl TaskGraph {
    /// Construct task graph from task list
    pub fn from_tasks<T: TaskLike>(tasks: &[T]) -> Result<Self, ExecutorError> {
        let mut nodes = HashMap::new();
        let mut edges = HashMap::new();
        let mut reverse_edges: HashMap<String, Vec<String>> = HashMap::new();
        let mut insertion_order = Vec::new();

        for (index, task) in tasks.iter().enumerate() {
            if nodes.contains_key(task.id()) {
                return Err(ExecutorError::DuplicateTaskId(task.id().to_string()));
            }

            let task_id = task.id().to_string();
            let dependencies = task.dependencies().to_vec();

            nodes.insert(task_id.clone(), index);
            edges.insert(task_id.clone(), dependencies.clone());
            insertion_order.push(task_id.clone());

            for dep in dependencies {
                reverse_edges.entry(dep).or_default().push(task_id.clone());
            }
        }

        Ok(Self {
            nodes,
            edges,
            reverse_edges,
            insertion_order,
        })
    }

    /// Layer the graph into ready batches using Kahn's algorithm
    ///
    /// A task joins batch `k` once every one of its dependencies sits in a
    /// batch before `k`. Dangling or circular dependencies never resolve;
    /// those tasks end up in [`Layering::blocked`] instead of failing the
    /// whole graph.
    ///
    /// # Time Complexity
    ///
    /// O(V + E) where V = number of tasks, E = number of dependencies
    pub fn layers(&self) -> Layering {
        let mut in_degree: HashMap<&str, usize> = self
            .edges
            .iter()
            .map(|(task_id, deps)| (task_id.as_str(), deps.len()))
            .collect();

        let mut current: Vec<usize> = self
            .insertion_order
            .iter()
            .filter(|id| in_degree.get(id.as_str()) == Some(&0))
            .filter_map(|id| self.nodes.get(id).copied())
            .collect();

        let mut batches: Vec<Vec<usize>> = Vec::new();
        let mut scheduled: HashSet<&str> = HashSet::new();

        while !current.is_empty() {
            current.sort_unstable();

            let mut next = Vec::new();
            for &index in &current {
                let task_id = self.insertion_order[index].as_str();
                scheduled.insert(task_id);

                let Some(dependents) = self.reverse_edges.get(task_id) else {
                    continue;
                };
                for dependent in dependents {
                    if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                        *degree = degree.saturating_sub(1);
                        if *degree == 0 {
                            if let Some(&dep_index) = self.nodes.get(dependent) {
                                next.push(dep_index);
                            }
                        }
                    }
                }
            }

            batches.push(std::mem::take(&mut current));
            current = next;
        }

        let blocked = self
            .insertion_order
            .iter()
            .enumerate()
            .filter(|(_, id)| !scheduled.contains(id.as_str()))
            .map(|(index, id)| {
                let deps = self.edges.get(id).map(Vec::as_slice).unwrap_or_default();
                let (missing, unresolved): (Vec<String>, Vec<String>) = deps
                    .iter()
                    .filter(|dep| !scheduled.contains(dep.as_str()))
                    .cloned()
                    .partition(|dep| !self.nodes.contains_key(dep));
                BlockedTask {
                    index,
                    id: id.clone(),
                    missing,
                    unresolved,
                }
            })
            .collect();

        Layering { batches, blocked }
    }

    /// Detect circular dependencies using DFS
    ///
    /// # Time Complexity
    ///
    /// O(V + E) where V = number of tasks, E = number of dependencies
    pub fn detect_cycle(&self) -> Option<String> {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();

        for task_id in &self.insertion_order {
            if !visited.contains(task_id) && self.dfs_cycle(task_id, &mut visited, &mut stack) {
                return Some(format_cycle_path(&stack));
            }
        }

        None
    }

    fn dfs_cycle(
        &self,
        node: &str,
        visited: &mut HashSet<String>,
        stack: &mut Vec<String>,
    ) -> bool {
        visited.insert(node.to_string());
        stack.push(node.to_string());

        if let Some(dependencies) = self.edges.get(node) {
            for dep in dependencies {
                if let Some(pos) = stack.iter().position(|x| x == dep) {
                    stack.push(dep.clone());
                    *stack = stack[pos..].to_vec();
                    return true;
                }

                // dangling references have no edges to follow
                if self.nodes.contains_key(dep)
                    && !visited.contains(dep)
                    && self.dfs_cycle(dep, visited, stack)
                {
                    return true;
                }
            }
        }

        stack.pop();
        false
    }
}

fn format_cycle_path(stack: &[String]) -> String {
    stack.join(" -> ")
}
