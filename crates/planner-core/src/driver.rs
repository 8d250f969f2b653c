//! Rule driver / phase loop, component K (spec.md §4.K/§5).
//!
//! For each phase, in rule-declaration order: deep-copy the incoming graph,
//! run the rule, and install its end graph as the new current graph only
//! when the rule actually changed something. After all rules in a phase
//! run, that phase's final graph becomes the next phase's input. A
//! partitioner rule never replaces the current graph — its effect is to
//! attach a partitioned child-graph collection to the driver's output
//! (spec.md §4.J).

use std::collections::HashMap;
use std::time::Instant;

use log::{debug, trace};

use crate::capture::CaptureLabel;
use crate::collaborator::{FlowElement, ScopeAlgebra};
use crate::config::PlannerConfig;
use crate::element_graph::ElementGraph;
use crate::error::{PlannerError, PlannerResult};
use crate::ids::ElementId;
use crate::match_result::FinderContext;
use crate::rule::{PlanPhase, Rule, RuleOutcome};
use crate::trace::{GraphSnapshotRef, NullTraceSink, TraceSink};

/// One rule's contribution to a phase's diagnostics (spec.md §6's
/// "diagnostic surface", the non-failure half).
#[derive(Clone, Debug)]
pub struct RuleReport {
    pub rule_name: String,
    pub phase: PlanPhase,
    pub changed: bool,
    pub elapsed_ms: u64,
}

/// A materialized snapshot of one annotated sub-graph a partitioner rule
/// derived. Independent of the borrowed `SubGraphView` the partitioner
/// itself returns, since `ElementId`s are only meaningful relative to the
/// `base_graph` they were minted against (spec.md §4.I).
#[derive(Clone, Debug)]
pub struct MaterializedPartition {
    pub index: usize,
    pub elements: Vec<ElementId>,
    pub captures: HashMap<CaptureLabel, Vec<ElementId>>,
}

/// A partitioner rule's full output: the graph the partitions are views
/// over, plus the materialized partitions themselves.
pub struct PartitionRecord<E, S> {
    pub rule_name: String,
    pub base_graph: ElementGraph<E, S>,
    pub partitions: Vec<MaterializedPartition>,
}

/// Everything a driver run produced: the final graph, per-rule
/// diagnostics, and any partitions attached along the way.
pub struct DriverOutcome<E, S> {
    pub graph: ElementGraph<E, S>,
    pub reports: Vec<RuleReport>,
    pub partitions: Vec<PartitionRecord<E, S>>,
}

/// Sequences a fixed rule list across phases against one starting graph.
/// Matcher state never crosses rule boundaries (spec.md §5); the driver
/// itself holds only the rule list, the configuration, and a trace sink.
pub struct RuleDriver<'p, E, S> {
    rules: Vec<Rule<'p, E, S>>,
    config: PlannerConfig,
    trace: Box<dyn TraceSink<E, S>>,
}

impl<'p, E: FlowElement + std::fmt::Debug, S: ScopeAlgebra> RuleDriver<'p, E, S> {
    pub fn new(config: PlannerConfig) -> Self {
        RuleDriver {
            rules: Vec::new(),
            config,
            trace: Box::new(NullTraceSink),
        }
    }

    pub fn with_trace_sink(mut self, sink: Box<dyn TraceSink<E, S>>) -> Self {
        self.trace = sink;
        self
    }

    /// Appends a rule. The driver later sorts rules by phase via a stable
    /// sort, so rules added to the same phase run in the order they were
    /// added here — spec.md §6's "phase-then-declaration order".
    pub fn add_rule(&mut self, rule: Rule<'p, E, S>) {
        self.rules.push(rule);
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Runs every rule against `initial`, threading the current graph
    /// between rules and phases, and aborting on the first error (no
    /// retries, no catch-and-continue; spec.md §7).
    pub fn run(&self, initial: ElementGraph<E, S>, finder: &FinderContext) -> PlannerResult<DriverOutcome<E, S>> {
        let mut ordered: Vec<&Rule<'p, E, S>> = self.rules.iter().collect();
        ordered.sort_by_key(|r| r.phase());

        let mut current = initial;
        let mut reports = Vec::new();
        let mut partitions = Vec::new();

        let mut active_phase: Option<PlanPhase> = None;
        let mut phase_start = Instant::now();

        for rule in ordered {
            if active_phase != Some(rule.phase()) {
                active_phase = Some(rule.phase());
                phase_start = Instant::now();
                debug!("planner: entering phase {:?}", rule.phase());
            }

            if let Some(timeout) = self.config.rule_timeout {
                let elapsed = phase_start.elapsed();
                if elapsed > timeout {
                    return Err(PlannerError::PlannerTimeout {
                        phase: rule.phase(),
                        elapsed_ms: elapsed.as_millis() as u64,
                        limit_ms: timeout.as_millis() as u64,
                    });
                }
            }

            let started = Instant::now();
            let result = self.run_one(rule, &current, finder, &mut partitions);
            let elapsed_ms = started.elapsed().as_millis() as u64;

            let outcome = result.map_err(|e| {
                let annotated = e.with_rule_context(rule.phase(), rule.name());
                let snapshot = GraphSnapshotRef {
                    phase: rule.phase(),
                    rule_name: rule.name(),
                    graph: &current,
                };
                self.trace.on_failure(&annotated, &snapshot);
                annotated
            })?;

            trace!(
                "planner: rule '{}' in phase {:?} changed={} ({}ms)",
                rule.name(),
                rule.phase(),
                outcome.changed,
                elapsed_ms
            );
            reports.push(RuleReport {
                rule_name: rule.name().to_string(),
                phase: rule.phase(),
                changed: outcome.changed,
                elapsed_ms,
            });

            if outcome.changed {
                current = outcome.end_graph;
            }

            self.trace.on_phase_complete(rule.phase(), &current);
        }

        Ok(DriverOutcome {
            graph: current,
            reports,
            partitions,
        })
    }

    fn run_one(
        &self,
        rule: &Rule<'p, E, S>,
        graph: &ElementGraph<E, S>,
        finder: &FinderContext,
        partitions: &mut Vec<PartitionRecord<E, S>>,
    ) -> PlannerResult<RuleOutcome<E, S>> {
        match rule {
            Rule::Assert(r) => r.run(graph, finder, &self.config),
            Rule::Transformer(r) => r.run(graph, finder, &self.config),
            Rule::Partitioner(r) => {
                // Deep-copy first, like every other rule kind (spec.md §4.K
                // step 1), so the partitions' `ElementId`s stay valid for as
                // long as `base_graph` is retained alongside them.
                let working = graph.copy();
                let (materialized, end_graph) = {
                    let outcome = r.run(&working, finder, &self.config)?;
                    let materialized: Vec<MaterializedPartition> = outcome
                        .partitions
                        .iter()
                        .map(|p| MaterializedPartition {
                            index: p.index,
                            elements: p.view.elements().collect(),
                            captures: CaptureLabel::ALL
                                .iter()
                                .map(|l| (*l, p.captured(*l).to_vec()))
                                .collect(),
                        })
                        .collect();
                    (materialized, outcome.end_graph)
                };
                partitions.push(PartitionRecord {
                    rule_name: rule.name().to_string(),
                    base_graph: working,
                    partitions: materialized,
                });
                Ok(RuleOutcome { end_graph, changed: false })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureLabel;
    use crate::expression_graph::{ElementExpression, ExpressionGraph, ScopeExpression};
    use crate::match_result::FinderContext;
    use crate::partition::{Annotation, ExpressionGraphPartitioner};
    use crate::rule::{AssertRule, PartitionerRule, TransformerRule};
    use crate::test_support::{kind_expr, linear_chain, FixtureElement, FixtureScope};
    use crate::transform::MutateFlowGraphTransformer;

    fn buffer_after_every_pattern() -> ExpressionGraph<FixtureElement, FixtureScope> {
        let mut p = ExpressionGraph::new();
        let group_by = p.add_node(kind_expr(CaptureLabel::Ignore, "GroupBy"));
        let buffer = p.add_node(kind_expr(CaptureLabel::Primary, "EveryBuffer"));
        let every = p.add_node(kind_expr(CaptureLabel::Secondary, "Every"));
        p.add_edge(group_by, buffer, ScopeExpression::wildcard());
        p.add_edge(buffer, every, ScopeExpression::wildcard());
        p
    }

    /// spec.md §8 S1: chain `Source -> GroupBy -> EveryBuffer -> Every ->
    /// Sink` trips the assert.
    #[test]
    fn s1_buffer_after_every_assert_fires() {
        let (graph, _) = linear_chain(&["GroupBy", "EveryBuffer", "Every"]);
        let pattern = buffer_after_every_pattern();

        let mut driver: RuleDriver<'_, FixtureElement, FixtureScope> = RuleDriver::new(PlannerConfig::default());
        driver.add_rule(Rule::Assert(AssertRule {
            name: "buffer-after-every".to_string(),
            phase: PlanPhase::PreBalance,
            pattern: &pattern,
            message_template: "{Primary} feeds directly into {Secondary}".to_string(),
        }));

        let result = driver.run(graph, &FinderContext::new());
        assert!(matches!(result, Err(PlannerError::PlannerAssertion { .. })));
    }

    /// spec.md §8 S2: chain without a trailing `Every` passes cleanly.
    #[test]
    fn s2_buffer_after_every_assert_passes_without_match() {
        let (graph, _) = linear_chain(&["GroupBy", "EveryBuffer"]);
        let pattern = buffer_after_every_pattern();

        let mut driver: RuleDriver<'_, FixtureElement, FixtureScope> = RuleDriver::new(PlannerConfig::default());
        driver.add_rule(Rule::Assert(AssertRule {
            name: "buffer-after-every".to_string(),
            phase: PlanPhase::PreBalance,
            pattern: &pattern,
            message_template: "{Primary} feeds directly into {Secondary}".to_string(),
        }));

        let result = driver.run(graph, &FinderContext::new()).unwrap();
        assert_eq!(result.reports.len(), 1);
        assert!(!result.reports[0].changed);
    }

    #[test]
    fn replace_transformer_rule_rewires_and_installs_end_graph() {
        let (graph, ids) = linear_chain(&["A", "B"]);
        let mut pattern: ExpressionGraph<FixtureElement, FixtureScope> = ExpressionGraph::new();
        let a = pattern.add_node(ElementExpression::new(CaptureLabel::Primary, |e: &FixtureElement| e.kind == "A"));
        let b = pattern.add_node(ElementExpression::new(CaptureLabel::Secondary, |e: &FixtureElement| e.kind == "B"));
        pattern.add_edge(a, b, ScopeExpression::wildcard());

        let mut driver: RuleDriver<'_, FixtureElement, FixtureScope> = RuleDriver::new(PlannerConfig::default());
        driver.add_rule(Rule::Transformer(TransformerRule {
            name: "collapse-a-into-b".to_string(),
            phase: PlanPhase::Balance,
            contraction: None,
            pattern: &pattern,
            transform: MutateFlowGraphTransformer::Replace,
        }));

        let outcome = driver.run(graph, &FinderContext::new()).unwrap();
        assert!(outcome.reports[0].changed);
        assert!(!outcome.graph.contains_vertex(ids[0]));
        assert!(outcome.graph.contains_vertex(ids[1]));
    }

    #[test]
    fn partitioner_rule_attaches_without_mutating_parent() {
        let (graph, _) = linear_chain(&["GroupBy"]);
        let version_before = graph.version();
        let partitioner = ExpressionGraphPartitioner::new(None, None, vec![Annotation::new(CaptureLabel::Primary)]);

        let mut driver: RuleDriver<'_, FixtureElement, FixtureScope> = RuleDriver::new(PlannerConfig::default());
        driver.add_rule(Rule::Partitioner(PartitionerRule {
            name: "whole-graph".to_string(),
            phase: PlanPhase::PartitionSteps,
            partitioner,
        }));

        let outcome = driver.run(graph, &FinderContext::new()).unwrap();
        assert!(!outcome.reports[0].changed);
        assert_eq!(outcome.graph.version(), version_before);
        assert_eq!(outcome.partitions.len(), 1);
        assert_eq!(outcome.partitions[0].partitions.len(), 1);
    }
}
