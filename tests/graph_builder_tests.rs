use critical_path_tool::graph::{AoeGraph, end_event_id, start_event_id};
use critical_path_tool::{DurationResolver, GraphBuilder, ProjectMetadata, TaskRecord};
use std::collections::BTreeMap;

const HOUR: i64 = 3600;

fn build(tasks: &[TaskRecord]) -> AoeGraph {
    let resolver = DurationResolver::default();
    GraphBuilder::new(&resolver).build(tasks, &ProjectMetadata::new("P", "Demo"))
}

#[test]
fn duplicate_edge_overwrites_duration_and_counts_in_degree_once() {
    let mut graph = AoeGraph::new();
    graph.add_node("A", "a");
    graph.add_node("B", "b");

    assert!(graph.add_edge("A", "B", 5.0));
    assert!(graph.add_edge("A", "B", 8.0));

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edge_duration("A", "B"), Some(8.0));
    assert_eq!(graph.in_degree("B"), Some(1));
    assert_eq!(graph.in_degree("A"), Some(0));
}

#[test]
fn edge_with_unknown_endpoint_is_rejected() {
    let mut graph = AoeGraph::new();
    graph.add_node("A", "a");

    assert!(!graph.add_edge("A", "missing", 1.0));
    assert!(!graph.add_edge("missing", "A", 1.0));
    assert_eq!(graph.edge_count(), 0);
    assert_eq!(graph.in_degree("A"), Some(0));
}

#[test]
fn adding_existing_node_renames_without_duplicating() {
    let mut graph = AoeGraph::new();
    let first = graph.add_node("A", "old");
    let second = graph.add_node("A", "new");

    assert_eq!(first, second);
    assert_eq!(graph.node_count(), 1);
    assert_eq!(graph.node("A").unwrap().name, "new");
}

#[test]
fn simple_chain_is_wired_through_project_events() {
    let tasks = vec![
        TaskRecord::new("T1", "Design").with_estimate_seconds(8 * HOUR),
        TaskRecord::new("T2", "Build")
            .with_predecessors(["T1"])
            .with_estimate_seconds(16 * HOUR),
    ];
    let graph = build(&tasks);

    assert_eq!(graph.node_count(), 6);
    assert_eq!(graph.edge_duration("P_start", "T1_start"), Some(0.0));
    assert_eq!(graph.edge_duration("T1_start", "T1_end"), Some(8.0));
    assert_eq!(graph.edge_duration("T1_end", "T2_start"), Some(0.0));
    assert_eq!(graph.edge_duration("T2_start", "T2_end"), Some(16.0));
    assert_eq!(graph.edge_duration("T2_end", "P_end"), Some(0.0));
    // T1 feeds T2, so it is not a leaf.
    assert_eq!(graph.edge_duration("T1_end", "P_end"), None);
    assert_eq!(graph.edge_count(), 5);
}

#[test]
fn event_names_follow_project_and_task_summaries() {
    let tasks = vec![TaskRecord::new("T1", "Design").with_estimate_seconds(HOUR)];
    let graph = build(&tasks);

    assert_eq!(graph.node("P_start").unwrap().name, "Project Demo start");
    assert_eq!(graph.node("P_end").unwrap().name, "Project Demo end");
    assert_eq!(graph.node("T1_start").unwrap().name, "Design start");
    assert_eq!(graph.node("T1_end").unwrap().name, "Design done");
}

#[test]
fn subtasks_form_a_subgraph_inside_their_parent() {
    let tasks = vec![
        TaskRecord::new("PARENT", "Parent")
            .with_subtasks(["S1", "S2"])
            .with_estimate_seconds(80 * HOUR),
        TaskRecord::new("S1", "First")
            .as_subtask_of("PARENT")
            .with_estimate_seconds(4 * HOUR),
        TaskRecord::new("S2", "Second")
            .as_subtask_of("PARENT")
            .with_predecessors(["S1"])
            .with_estimate_seconds(4 * HOUR),
    ];
    let graph = build(&tasks);

    assert_eq!(graph.edge_duration("PARENT_start", "S1_start"), Some(0.0));
    assert_eq!(graph.edge_duration("S1_start", "S1_end"), Some(4.0));
    assert_eq!(graph.edge_duration("S1_end", "S2_start"), Some(0.0));
    assert_eq!(graph.edge_duration("S2_start", "S2_end"), Some(4.0));
    assert_eq!(graph.edge_duration("S2_end", "PARENT_end"), Some(0.0));
    // Parent work flows through the subtasks only.
    assert_eq!(graph.edge_duration("PARENT_start", "PARENT_end"), Some(0.0));

    // Subtasks never hang off the project events directly.
    assert_eq!(graph.edge_duration("P_start", "S1_start"), None);
    assert_eq!(graph.edge_duration("S2_end", "P_end"), None);
    // S1 is referenced by S2 and is not an exit point.
    assert_eq!(graph.edge_duration("S1_end", "PARENT_end"), None);

    assert_eq!(graph.edge_duration("P_start", "PARENT_start"), Some(0.0));
    assert_eq!(graph.edge_duration("PARENT_end", "P_end"), Some(0.0));
    assert_eq!(graph.edge_count(), 8);
}

#[test]
fn parent_without_own_duration_still_wires_its_subtasks() {
    let tasks = vec![
        TaskRecord::new("PARENT", "Parent").with_subtasks(["S1"]),
        TaskRecord::new("S1", "Only")
            .as_subtask_of("PARENT")
            .with_estimate_seconds(2 * HOUR),
    ];
    let graph = build(&tasks);

    assert_eq!(graph.edge_duration("PARENT_start", "S1_start"), Some(0.0));
    assert_eq!(graph.edge_duration("S1_end", "PARENT_end"), Some(0.0));
    assert_eq!(graph.edge_duration("PARENT_start", "PARENT_end"), Some(0.0));
    // No resolved duration, so no project-start edge of its own.
    assert_eq!(graph.edge_duration("P_start", "PARENT_start"), None);
    assert_eq!(graph.edge_duration("PARENT_end", "P_end"), Some(0.0));
}

#[test]
fn task_without_duration_gets_no_activity() {
    let tasks = vec![
        TaskRecord::new("T1", "Estimated").with_estimate_seconds(HOUR),
        TaskRecord::new("X", "Unknown effort").with_predecessors(["T1"]),
    ];
    let graph = build(&tasks);

    assert!(graph.contains_node("X_start"));
    assert_eq!(graph.edge_duration("X_start", "X_end"), None);
    assert_eq!(graph.edge_duration("T1_end", "X_start"), None);
    assert_eq!(graph.in_degree("X_start"), Some(0));
}

#[test]
fn unknown_predecessor_is_skipped() {
    let tasks = vec![
        TaskRecord::new("T1", "Orphan")
            .with_predecessors(["GHOST"])
            .with_estimate_seconds(HOUR),
    ];
    let graph = build(&tasks);

    assert!(!graph.contains_node("GHOST_end"));
    assert_eq!(graph.edge_duration("T1_start", "T1_end"), Some(1.0));
    // The predecessor list is non-empty, so no project-start edge either.
    assert_eq!(graph.edge_duration("P_start", "T1_start"), None);
    assert_eq!(graph.node_count(), 4);
}

#[test]
fn unknown_subtask_is_skipped() {
    let tasks = vec![
        TaskRecord::new("PARENT", "Parent")
            .with_subtasks(["MISSING"])
            .with_estimate_seconds(HOUR),
    ];
    let graph = build(&tasks);

    assert!(!graph.contains_node("MISSING_start"));
    assert_eq!(graph.edge_duration("PARENT_start", "PARENT_end"), Some(0.0));
}

#[test]
fn tasks_without_key_or_dependency_data_are_left_out() {
    let mut keyless = TaskRecord::new("ignored", "No key").with_estimate_seconds(HOUR);
    keyless.key = None;
    let mut blank = TaskRecord::new("  ", "Blank key").with_estimate_seconds(HOUR);
    blank.summary = None;
    let mut no_preds = TaskRecord::new("N", "No predecessors field").with_estimate_seconds(HOUR);
    no_preds.predecessors = None;

    let graph = build(&[keyless, blank, no_preds]);

    // Project events plus the events of N.
    assert_eq!(graph.node_count(), 4);
    assert!(graph.contains_node("N_start"));
    assert_eq!(graph.edge_count(), 0);
}

#[test]
fn predecessors_fall_back_to_issue_links() {
    let mut prelinks = BTreeMap::new();
    prelinks.insert("is blocked by".to_string(), vec!["A".to_string()]);
    prelinks.insert("is child of".to_string(), vec!["C".to_string()]);
    let mut linked = TaskRecord::new("B", "Linked").with_estimate_seconds(HOUR);
    linked.predecessors = None;
    linked.prelinks = Some(prelinks);

    let tasks = vec![
        TaskRecord::new("A", "First").with_estimate_seconds(HOUR),
        TaskRecord::new("C", "Other").with_estimate_seconds(HOUR),
        linked,
    ];
    let graph = build(&tasks);

    assert_eq!(graph.edge_duration("A_end", "B_start"), Some(0.0));
    assert_eq!(graph.edge_duration("C_end", "B_start"), None);
    assert_eq!(graph.edge_duration("C_end", "P_end"), Some(0.0));
    assert_eq!(graph.edge_duration("A_end", "P_end"), None);
}

#[test]
fn dangling_events_are_reported() {
    let mut graph = AoeGraph::new();
    for id in ["S", "A", "B", "E"] {
        graph.add_node(id, id);
    }
    graph.add_edge("S", "A", 1.0);
    graph.add_edge("A", "E", 1.0);
    graph.add_edge("S", "B", 1.0);

    assert_eq!(graph.dangling_events("S", "E"), vec!["B".to_string()]);
    assert!(graph.dangling_events("S", "missing").is_empty());
}

#[test]
fn event_id_helpers_round_trip() {
    assert_eq!(start_event_id("K-1"), "K-1_start");
    assert_eq!(end_event_id("K-1"), "K-1_end");
    assert_eq!(
        critical_path_tool::graph::task_key_from_start("K-1_start"),
        "K-1"
    );
}

#[test]
fn task_named_like_the_project_is_skipped() {
    let tasks = vec![
        TaskRecord::new("P", "Clashes with project").with_estimate_seconds(8 * HOUR),
        TaskRecord::new("T", "Real work").with_estimate_seconds(4 * HOUR),
    ];
    let graph = build(&tasks);

    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.edge_duration("P_start", "P_start"), None);
    assert_eq!(graph.edge_duration("P_start", "P_end"), None);
    assert_eq!(graph.edge_duration("P_start", "T_start"), Some(0.0));
    assert_eq!(graph.edge_duration("T_end", "P_end"), Some(0.0));
    assert_eq!(graph.edge_count(), 3);
}
