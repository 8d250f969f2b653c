//! planner-core — the rule-driven subgraph-rewriting planner core for a
//! data-flow compiler.
//!
//! Given an element graph built by an external collaborator (the
//! compiler's flow-construction API), this crate finds subgraphs matching
//! declarative expression-graph patterns via a VF2-style isomorphism
//! search ([`matcher`]), rewrites matched regions ([`contracted`],
//! [`subgraph`], [`recursive`], [`transform`]), partitions the graph along
//! declared boundaries ([`partition`]), and drives all of the above
//! through an ordered sequence of planning phases ([`driver`], [`rule`])
//! until a fixed point is reached.
//!
//! Building the initial graph from a user-facing pipeline API, the
//! catalogue of concrete flow elements, the catalogue of planning rules,
//! graph serialization, and runtime execution of the planned graph are out
//! of scope — the crate only ever sees flow elements and scopes through
//! the [`collaborator`] trait surface. See `SPEC_FULL.md` and `DESIGN.md`
//! at the workspace root for the full design.
//!
//! # Quick start
//!
//! ```rust
//! use planner_core::capture::CaptureLabel;
//! use planner_core::config::PlannerConfig;
//! use planner_core::expression_graph::{ElementExpression, ExpressionGraph, ScopeExpression};
//! use planner_core::match_result::FinderContext;
//! use planner_core::matcher::Matcher;
//! # use planner_core::collaborator::{FlowElement, ScopeAlgebra, Topo};
//! #
//! # #[derive(Clone, PartialEq, Eq, Hash, Debug)]
//! # struct Elem(&'static str);
//! # impl FlowElement for Elem {
//! #     fn topology(&self) -> Topo { Topo::new("elem") }
//! # }
//! # #[derive(Clone)]
//! # struct Scope;
//! # impl ScopeAlgebra for Scope {
//! #     fn compose(&self, _successor: &Self) -> Self { Scope }
//! # }
//! use planner_core::element_graph::ElementGraph;
//!
//! let mut graph: ElementGraph<Elem, Scope> = ElementGraph::new();
//! let a = graph.add_vertex(Elem("A"));
//! let b = graph.add_vertex(Elem("B"));
//! graph.add_edge(a, b, Scope).unwrap();
//!
//! let mut pattern: ExpressionGraph<Elem, Scope> = ExpressionGraph::new();
//! let pa = pattern.add_node(ElementExpression::new(CaptureLabel::Primary, |e: &Elem| e.0 == "A"));
//! let pb = pattern.add_node(ElementExpression::new(CaptureLabel::Secondary, |e: &Elem| e.0 == "B"));
//! pattern.add_edge(pa, pb, ScopeExpression::wildcard());
//!
//! let config = PlannerConfig::default();
//! let matcher = Matcher::new(&pattern, &graph, FinderContext::new(), &config);
//! assert!(matcher.find_first().is_some());
//! ```

pub mod bipartite;
pub mod capture;
pub mod collaborator;
pub mod config;
pub mod contracted;
pub mod driver;
pub mod element_graph;
pub mod error;
pub mod expression_graph;
pub mod ids;
pub mod indexed;
pub mod match_result;
pub mod matcher;
pub mod partition;
pub mod recursive;
pub mod rule;
pub mod subgraph;
pub mod trace;
pub mod test_support;
pub mod transform;

pub use capture::CaptureLabel;
pub use collaborator::{FlowElement, ScopeAlgebra, Topo};
pub use config::PlannerConfig;
pub use driver::{DriverOutcome, RuleDriver};
pub use element_graph::ElementGraph;
pub use error::{PlannerError, PlannerResult};
pub use expression_graph::ExpressionGraph;
pub use ids::{ElementId, ScopeId};
pub use match_result::{FinderContext, Match};
pub use matcher::Matcher;
pub use rule::{AssertRule, PartitionerRule, PlanPhase, Rule, TransformerRule};
