//! `PlannerConfig` round-trips through JSON, the format a collaborator's
//! own configuration layer is expected to load it from (spec.md §6).

use planner_core::config::{EdgeMatchingAlgorithm, PlannerConfig, SearchOrder};

#[test]
fn default_config_round_trips_through_json() {
    let config = PlannerConfig::default();
    let json = serde_json::to_string(&config).expect("default config serializes");
    let parsed: PlannerConfig = serde_json::from_str(&json).expect("the serialized form deserializes back");

    assert_eq!(parsed.search_order, config.search_order);
    assert_eq!(parsed.edge_matching_algorithm, config.edge_matching_algorithm);
    assert_eq!(parsed.recursive_max_iterations, config.recursive_max_iterations);
    assert_eq!(parsed.trace_enabled, config.trace_enabled);
}

#[test]
fn a_hand_written_json_document_loads_as_a_builder_would_produce() {
    let json = r#"{
        "trace_enabled": true,
        "trace_path": "/tmp/planner-trace.jsonl",
        "search_order": "BreadthFirst",
        "recursive_max_iterations": 100,
        "edge_matching_algorithm": "Permutation",
        "rule_timeout": { "secs": 5, "nanos": 0 }
    }"#;

    let parsed: PlannerConfig = serde_json::from_str(json).expect("a well-formed config document parses");
    assert!(parsed.trace_enabled);
    assert_eq!(parsed.search_order, SearchOrder::BreadthFirst);
    assert_eq!(parsed.edge_matching_algorithm, EdgeMatchingAlgorithm::Permutation);
    assert_eq!(parsed.recursive_max_iterations, 100);
    parsed.validate().expect("trace_enabled with a trace_path is valid");
}

#[test]
fn trace_enabled_without_a_path_fails_validation_after_deserializing() {
    let json = r#"{
        "trace_enabled": true,
        "trace_path": null,
        "search_order": "Topological",
        "recursive_max_iterations": 2147483648,
        "edge_matching_algorithm": "Bipartite",
        "rule_timeout": null
    }"#;

    let parsed: PlannerConfig = serde_json::from_str(json).expect("parses even though it is semantically invalid");
    assert!(parsed.validate().is_err());
}
