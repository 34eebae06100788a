//! Phased rollout planning
//!
//! The top recommendations form a dependency graph (edge `dependency ->
//! dependent`). Kahn layering turns the graph into phases, a longest-path pass
//! over buffered durations gives the critical path, and skill frequencies give
//! resource requirements.

use nac_model::{
    ImplementationPhase, ImplementationStrategy, PlanningConfig, PlanningError,
    ScoredRecommendation, TemplateId,
};
use indexmap::IndexMap;
use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};

/// Name of the single phase of a degraded plan
pub const UNORDERED_PHASE: &str = "Unordered rollout";

/// Dependency on a template outside the planned set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedDependency {
    /// Dependent template
    pub template: TemplateId,
    /// Dependency that was ignored
    pub dependency: TemplateId,
}

impl Display for DroppedDependency {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Dependency {} of {} is outside the planned templates and was not scheduled",
            self.dependency, self.template
        )
    }
}

/// Successful planning outcome
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Phased strategy
    pub strategy: ImplementationStrategy,
    /// Dependencies ignored while building the graph
    pub dropped: Vec<DroppedDependency>,
}

/// Builds implementation strategies from ranked recommendations
#[derive(Debug, Clone)]
pub struct StrategyPlanner {
    config: PlanningConfig,
}

impl StrategyPlanner {
    /// Create planner
    #[inline]
    #[must_use]
    pub fn new(config: PlanningConfig) -> Self {
        Self { config }
    }

    /// Buffered duration of `hours` of work, in whole weeks
    ///
    /// At least 1; saturates at `u32::MAX` for durations too large to count.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn weeks(&self, hours: f64) -> u32 {
        let weeks = hours.max(0.0) * (1.0 + self.config.phase_buffer) / self.config.hours_per_week;
        // absorb float noise such as 1.0000000000000002
        let weeks = (weeks - 1e-9).ceil();
        if weeks.is_finite() {
            (weeks as u32).max(1)
        } else {
            u32::MAX
        }
    }

    /// Plan the top `plan_size` recommendations, in rank order
    ///
    /// # Errors
    /// Returns `PlanningError::CyclicDependency` when the selected templates
    /// depend on each other in a loop
    pub fn plan(&self, ranked: &[ScoredRecommendation]) -> Result<Plan, PlanningError> {
        let selected = self.select(ranked);
        let index: HashMap<&TemplateId, usize> = selected
            .iter()
            .enumerate()
            .map(|(i, r)| (&r.template_id, i))
            .collect();

        let mut graph: DiGraphMap<usize, ()> = DiGraphMap::new();
        let mut dropped = Vec::new();
        for (i, rec) in selected.iter().enumerate() {
            graph.add_node(i);
            for dependency in &rec.dependencies {
                match index.get(dependency) {
                    Some(&from) => {
                        graph.add_edge(from, i, ());
                    }
                    None => {
                        tracing::warn!(
                            template = %rec.template_id,
                            dependency = %dependency,
                            "Dropping dependency outside the planned set"
                        );
                        dropped.push(DroppedDependency {
                            template: rec.template_id.clone(),
                            dependency: dependency.clone(),
                        });
                    }
                }
            }
        }

        let layers = layers(&graph, selected.len())
            .ok_or_else(|| cycle_error(&graph, selected))?;

        let node_weeks: Vec<u32> = selected
            .iter()
            .map(|r| self.weeks(r.estimated_deployment_time))
            .collect();

        let mut phase_of = vec![0usize; selected.len()];
        for (p, layer) in layers.iter().enumerate() {
            for &node in layer {
                phase_of[node] = p;
            }
        }

        let phases: Vec<ImplementationPhase> = layers
            .iter()
            .enumerate()
            .map(|(p, layer)| {
                let mut dependency_phases: Vec<usize> = layer
                    .iter()
                    .flat_map(|&n| graph.neighbors_directed(n, Direction::Incoming))
                    .map(|d| phase_of[d])
                    .collect();
                dependency_phases.sort_unstable();
                dependency_phases.dedup();

                let max_hours = layer
                    .iter()
                    .map(|&n| selected[n].estimated_deployment_time)
                    .fold(0.0_f64, f64::max);

                ImplementationPhase {
                    name: phase_name(p),
                    duration_weeks: self.weeks(max_hours),
                    templates: layer.iter().map(|&n| selected[n].template_id.clone()).collect(),
                    dependencies: dependency_phases.into_iter().map(phase_name).collect(),
                }
            })
            .collect();

        let topo_order: Vec<usize> = layers.iter().flatten().copied().collect();
        let path = critical_path(&graph, &topo_order, &node_weeks);

        let mut path_phases: Vec<usize> = path.iter().map(|&n| phase_of[n]).collect();
        path_phases.dedup();
        let total_timeline_weeks = path_phases
            .iter()
            .map(|&p| phases[p].duration_weeks)
            .fold(0u32, u32::saturating_add);

        Ok(Plan {
            strategy: ImplementationStrategy {
                total_timeline_weeks,
                phases,
                critical_path: path.iter().map(|&n| selected[n].template_id.clone()).collect(),
                resource_requirements: resource_requirements(selected),
                ordered: true,
            },
            dropped,
        })
    }

    /// Single-phase plan ignoring dependencies
    #[must_use]
    pub fn unordered(&self, ranked: &[ScoredRecommendation]) -> ImplementationStrategy {
        let selected = self.select(ranked);
        if selected.is_empty() {
            return ImplementationStrategy::default();
        }

        let max_hours = selected
            .iter()
            .map(|r| r.estimated_deployment_time)
            .fold(0.0_f64, f64::max);
        let duration_weeks = self.weeks(max_hours);

        ImplementationStrategy {
            total_timeline_weeks: duration_weeks,
            phases: vec![ImplementationPhase {
                name: UNORDERED_PHASE.to_string(),
                duration_weeks,
                templates: selected.iter().map(|r| r.template_id.clone()).collect(),
                dependencies: Vec::new(),
            }],
            critical_path: Vec::new(),
            resource_requirements: resource_requirements(selected),
            ordered: false,
        }
    }

    fn select<'a>(&self, ranked: &'a [ScoredRecommendation]) -> &'a [ScoredRecommendation] {
        &ranked[..ranked.len().min(self.config.plan_size)]
    }
}

fn phase_name(index: usize) -> String {
    format!("Phase {}", index + 1)
}

/// Kahn layering; `None` when a cycle leaves nodes unprocessed
fn layers(graph: &DiGraphMap<usize, ()>, count: usize) -> Option<Vec<Vec<usize>>> {
    let mut in_degree: Vec<usize> = (0..count)
        .map(|n| graph.neighbors_directed(n, Direction::Incoming).count())
        .collect();

    let mut current: Vec<usize> = (0..count).filter(|&n| in_degree[n] == 0).collect();
    let mut layers = Vec::new();
    let mut processed = 0;

    while !current.is_empty() {
        processed += current.len();
        let mut next = Vec::new();
        for &node in &current {
            for successor in graph.neighbors_directed(node, Direction::Outgoing) {
                in_degree[successor] -= 1;
                if in_degree[successor] == 0 {
                    next.push(successor);
                }
            }
        }
        // rank order within a phase
        next.sort_unstable();
        layers.push(std::mem::replace(&mut current, next));
    }

    (processed == count).then_some(layers)
}

fn cycle_error(graph: &DiGraphMap<usize, ()>, selected: &[ScoredRecommendation]) -> PlanningError {
    let mut involved: Vec<TemplateId> = tarjan_scc(graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
        .flatten()
        .map(|n| selected[n].template_id.clone())
        .collect();
    involved.sort();
    involved.dedup();
    PlanningError::CyclicDependency {
        involved_templates: involved,
    }
}

/// Longest path by node weight; ties prefer the better-ranked node
fn critical_path(graph: &DiGraphMap<usize, ()>, topo_order: &[usize], weeks: &[u32]) -> Vec<usize> {
    let mut best: Vec<u64> = vec![0; weeks.len()];
    let mut previous: Vec<Option<usize>> = vec![None; weeks.len()];

    for &node in topo_order {
        let mut predecessor: Option<usize> = None;
        for p in graph.neighbors_directed(node, Direction::Incoming) {
            predecessor = match predecessor {
                Some(q) if best[q] > best[p] || (best[q] == best[p] && q < p) => Some(q),
                _ => Some(p),
            };
        }
        best[node] = u64::from(weeks[node]).saturating_add(predecessor.map_or(0, |p| best[p]));
        previous[node] = predecessor;
    }

    let Some(mut end) = (0..weeks.len()).min_by(|&a, &b| best[b].cmp(&best[a]).then(a.cmp(&b)))
    else {
        return Vec::new();
    };

    let mut path = vec![end];
    while let Some(p) = previous[end] {
        path.push(p);
        end = p;
    }
    path.reverse();
    path
}

/// Skills by frequency, then first appearance
fn resource_requirements(selected: &[ScoredRecommendation]) -> Vec<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for skill in selected.iter().flat_map(|r| r.required_skills.iter()) {
        *counts.entry(skill.as_str()).or_insert(0) += 1;
    }
    // stable: equal counts keep first appearance
    counts.sort_by(|_, a, _, b| b.cmp(a));
    counts.into_keys().map(str::to_string).collect()
}
