//! Rule kinds, component J.
//!
//! Three rule variants, each tagged with a [`PlanPhase`] (spec.md §4.J):
//! assert, transformer, partitioner. All three run a matcher internally,
//! optionally wrapped by contraction/sub-graph projection, and return an
//! end graph the driver (K) compares against the input it handed out.

use serde::{Deserialize, Serialize};

use crate::capture::CaptureLabel;
use crate::collaborator::{FlowElement, ScopeAlgebra};
use crate::config::PlannerConfig;
use crate::contracted::ContractedTransformer;
use crate::element_graph::ElementGraph;
use crate::error::{PlannerError, PlannerResult};
use crate::expression_graph::ExpressionGraph;
use crate::match_result::FinderContext;
use crate::matcher::Matcher;
use crate::partition::{ExpressionGraphPartitioner, PartitionEntry};
use crate::recursive::RepeatableTransform;
use crate::transform::MutateFlowGraphTransformer;

/// Ordered planning lifecycle (spec.md §6: "Rules declare a phase; the
/// driver runs them in phase-then-declaration order"). Declaration order
/// here is `PlanPhase`'s discriminant order, matching `#[derive(Ord)]`.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub enum PlanPhase {
    PreBalance,
    Balance,
    PreResolveElements,
    ResolveElements,
    PostResolveElements,
    PrePartitionElements,
    PartitionElements,
    PostPartitionElements,
    PartitionSteps,
    PostPartitionSteps,
}

impl PlanPhase {
    pub const ALL: [PlanPhase; 10] = [
        PlanPhase::PreBalance,
        PlanPhase::Balance,
        PlanPhase::PreResolveElements,
        PlanPhase::ResolveElements,
        PlanPhase::PostResolveElements,
        PlanPhase::PrePartitionElements,
        PlanPhase::PartitionElements,
        PlanPhase::PostPartitionElements,
        PlanPhase::PartitionSteps,
        PlanPhase::PostPartitionSteps,
    ];
}

/// Derives a rule's diagnostic name from a static identifier: the trailing
/// `Rule`/`Assert` suffix stripped, lower-cased and hyphenated (spec.md
/// §4.J). Test/fixture-only — production rule names are supplied
/// explicitly at construction (no runtime reflection; see DESIGN.md Open
/// Question decision #4).
#[cfg(any(test, feature = "test-support"))]
pub fn hyphenate(type_name: &str) -> String {
    let leaf = type_name.rsplit("::").next().unwrap_or(type_name);
    let stripped = leaf.strip_suffix("Rule").unwrap_or(leaf);
    let stripped = stripped.strip_suffix("Assert").unwrap_or(stripped);

    let mut out = String::new();
    for (i, ch) in stripped.chars().enumerate() {
        if ch.is_uppercase() && i != 0 {
            out.push('-');
        }
        out.extend(ch.to_lowercase());
    }
    out
}

/// Outcome of running a single rule: the (possibly unchanged) end graph,
/// and whether the driver should replace its current graph with it
/// (spec.md §4.K step 4, "identity comparison").
pub struct RuleOutcome<E, S> {
    pub end_graph: ElementGraph<E, S>,
    pub changed: bool,
}

/// Fails with `PlannerAssertion` (carrying a message with `{Primary}`/
/// `{Secondary}` substituted) if `pattern` matches the graph at all.
pub struct AssertRule<'p, E, S> {
    pub name: String,
    pub phase: PlanPhase,
    pub pattern: &'p ExpressionGraph<E, S>,
    pub message_template: String,
}

fn substitute(template: &str, primary: Option<&str>, secondary: Option<&str>) -> String {
    let mut out = template.replace("{Primary}", primary.unwrap_or("?"));
    out = out.replace("{Secondary}", secondary.unwrap_or("?"));
    out
}

impl<'p, E: FlowElement, S: ScopeAlgebra> AssertRule<'p, E, S> {
    pub fn run(
        &self,
        graph: &ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<RuleOutcome<E, S>>
    where
        E: std::fmt::Debug,
    {
        let matcher = Matcher::new(self.pattern, graph, finder.clone(), config);
        if let Some(m) = matcher.find_first() {
            let primary = m.primary().and_then(|id| graph.element(id)).map(|e| format!("{:?}", e));
            let secondary = m.secondary().and_then(|id| graph.element(id)).map(|e| format!("{:?}", e));
            let message = substitute(&self.message_template, primary.as_deref(), secondary.as_deref());
            return Err(PlannerError::PlannerAssertion {
                phase: self.phase,
                rule_name: self.name.clone(),
                message,
            });
        }
        Ok(RuleOutcome {
            end_graph: graph.copy(),
            changed: false,
        })
    }
}

/// Rewrites *one* match of `pattern`, optionally found against a fresh
/// contraction of a copy using `contraction` so matches can span contracted
/// elements — contraction never alters `pattern`'s matches of the
/// *original* graph's identities, since `removeAndContract` never renames
/// a surviving vertex (see `contracted.rs`'s doc comment).
///
/// spec.md §4.J specifies this variant's contract as
/// `transformGraphInPlaceUsing(graph, match)` over a single match; a rule
/// that needs to rewrite every occurrence to a fixed point wraps this rule
/// in [`RecursiveTransformer`](crate::recursive::RecursiveTransformer)
/// (component H), which owns the bounded-iteration/`PlannerLoop` guard.
/// Applying unboundedly here would hang the driver outright for
/// `MutateFlowGraphTransformer::Insert`: the Primary element survives the
/// transform, so the same pattern keeps matching it forever.
pub struct TransformerRule<'p, E, S> {
    pub name: String,
    pub phase: PlanPhase,
    pub contraction: Option<&'p ExpressionGraph<E, S>>,
    pub pattern: &'p ExpressionGraph<E, S>,
    pub transform: MutateFlowGraphTransformer<E>,
}

impl<'p, E: FlowElement, S: ScopeAlgebra> RepeatableTransform<E, S> for TransformerRule<'p, E, S> {
    fn apply_once(
        &self,
        graph: &mut ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<bool> {
        let lookup = match self.contraction {
            Some(contraction) => {
                let mut contracted = graph.copy();
                ContractedTransformer::new(contraction).apply(&mut contracted, finder, config)?;
                contracted
            }
            None => graph.copy(),
        };
        let matcher = Matcher::new(self.pattern, &lookup, finder.clone(), config);
        match matcher.find_first() {
            Some(m) => {
                self.transform.apply(graph, &m)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl<'p, E: FlowElement, S: ScopeAlgebra> TransformerRule<'p, E, S> {
    pub fn run(
        &self,
        graph: &ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<RuleOutcome<E, S>> {
        let mut working = graph.copy();
        let changed = self.apply_once(&mut working, finder, config)?;

        Ok(RuleOutcome {
            end_graph: working,
            changed,
        })
    }
}

/// Wraps [`ExpressionGraphPartitioner`]; attaches a partitioned
/// child-graph collection to the phase state rather than mutating the
/// parent (spec.md §4.J).
pub struct PartitionerRule<'p, E, S> {
    pub name: String,
    pub phase: PlanPhase,
    pub partitioner: ExpressionGraphPartitioner<'p, E, S>,
}

pub struct PartitionerOutcome<'g, E, S> {
    pub end_graph: ElementGraph<E, S>,
    pub partitions: Vec<PartitionEntry<'g, E, S>>,
}

impl<'p, E: FlowElement, S: ScopeAlgebra> PartitionerRule<'p, E, S> {
    pub fn run<'g>(
        &self,
        graph: &'g ElementGraph<E, S>,
        finder: &FinderContext,
        config: &PlannerConfig,
    ) -> PlannerResult<PartitionerOutcome<'g, E, S>> {
        let partitions = self.partitioner.partition(graph, finder, config)?;
        Ok(PartitionerOutcome {
            end_graph: graph.copy(),
            partitions,
        })
    }
}

/// Discriminates a rule for the driver's dispatch loop without forcing all
/// three variants' distinct lifetimes/captures shapes into one bound.
pub enum Rule<'p, E, S> {
    Assert(AssertRule<'p, E, S>),
    Transformer(TransformerRule<'p, E, S>),
    Partitioner(PartitionerRule<'p, E, S>),
}

impl<'p, E, S> Rule<'p, E, S> {
    pub fn name(&self) -> &str {
        match self {
            Rule::Assert(r) => &r.name,
            Rule::Transformer(r) => &r.name,
            Rule::Partitioner(r) => &r.name,
        }
    }

    pub fn phase(&self) -> PlanPhase {
        match self {
            Rule::Assert(r) => r.phase,
            Rule::Transformer(r) => r.phase,
            Rule::Partitioner(r) => r.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression_graph::ElementExpression;
    use crate::recursive::RecursiveTransformer;
    use crate::test_support::{linear_chain, FixtureElement};
    use crate::transform::InsertScopeSource;

    #[test]
    fn hyphenate_strips_suffix_and_lowercases() {
        assert_eq!(hyphenate("BufferAfterEveryAssert"), "buffer-after-every");
        assert_eq!(hyphenate("InsertShuffleRule"), "insert-shuffle");
    }

    /// `TransformerRule::run` applies `Insert` exactly once: the Primary
    /// element (unlike Remove/Replace) survives the transform, so it would
    /// keep matching forever if `run` looped to its own fixed point.
    #[test]
    fn insert_transformer_rule_applies_once_per_run() {
        let (graph, ids) = linear_chain(&["A"]);
        let before_count = graph.vertex_count();

        let mut pattern: ExpressionGraph<FixtureElement, crate::test_support::FixtureScope> = ExpressionGraph::new();
        pattern.add_node(ElementExpression::new(CaptureLabel::Primary, |e: &FixtureElement| e.kind == "A"));

        let rule = TransformerRule {
            name: "insert-shuffle".to_string(),
            phase: PlanPhase::Balance,
            contraction: None,
            pattern: &pattern,
            transform: MutateFlowGraphTransformer::Insert {
                new_element: FixtureElement::new("Shuffle", 99),
                default_scope_source: InsertScopeSource::CloneOriginal,
            },
        };

        let outcome = rule.run(&graph, &FinderContext::new(), &PlannerConfig::default()).unwrap();
        assert!(outcome.changed);
        assert_eq!(outcome.end_graph.vertex_count(), before_count + 1);
        assert!(outcome.end_graph.contains_vertex(ids[0]));
    }

    /// Repetition is component H's job: wrapping the same rule in
    /// `RecursiveTransformer` over a pattern whose Primary element never
    /// disappears must hit the bounded `PlannerLoop` guard rather than hang.
    #[test]
    fn insert_transformer_rule_wrapped_in_recursive_hits_loop_guard() {
        let (graph, _) = linear_chain(&["A"]);

        let mut pattern: ExpressionGraph<FixtureElement, crate::test_support::FixtureScope> = ExpressionGraph::new();
        pattern.add_node(ElementExpression::new(CaptureLabel::Primary, |e: &FixtureElement| e.kind == "A"));

        let rule = TransformerRule {
            name: "insert-shuffle".to_string(),
            phase: PlanPhase::Balance,
            contraction: None,
            pattern: &pattern,
            transform: MutateFlowGraphTransformer::Insert {
                new_element: FixtureElement::new("Shuffle", 99),
                default_scope_source: InsertScopeSource::CloneOriginal,
            },
        };

        let guarded = RecursiveTransformer::new(rule, "insert-shuffle").with_max_iterations(3);
        let mut working = graph.copy();
        let result = guarded.apply(&mut working, &FinderContext::new(), &PlannerConfig::default());
        assert!(matches!(result, Err(PlannerError::PlannerLoop { .. })));
    }

    #[test]
    fn plan_phase_orders_pre_balance_before_post_partition_steps() {
        assert!(PlanPhase::PreBalance < PlanPhase::PostPartitionSteps);
    }
}
