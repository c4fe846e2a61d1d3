//! Tests for long edit sequences
//!
//! This tests:
//! - Undo of a whole sequence returns to the initial state
//! - Redo of a whole sequence returns to the final state
//! - Mixed tree and meta edits in one batch
//! - Replace + paste + delete chains

use std::collections::BTreeMap;

use trellis_editor::{Meta, MetaUpdate, Node, NodeUpdate, Orchestrator, Value, ValueMap};

/// Full, order-independent view of both stores
fn snapshot(editor: &Orchestrator) -> (BTreeMap<String, Node>, BTreeMap<String, Meta>) {
    let nodes = editor
        .tree()
        .ids()
        .filter_map(|id| editor.tree().get(id).cloned())
        .map(|node| (node.id.clone(), node))
        .collect();

    let metas = editor
        .tree()
        .ids()
        .chain(["page-meta"])
        .filter_map(|id| editor.meta_store().get(id).cloned())
        .map(|meta| (meta.id.clone(), meta))
        .collect();

    (nodes, metas)
}

fn page() -> Orchestrator {
    let mut editor = Orchestrator::new();
    editor.add_node(Node::new("page"), None);
    for section in ["header", "body", "footer"] {
        editor.add_node(Node::new(section), Some("page"));
        for i in 0..3 {
            editor.add_node(Node::new(format!("{section}-{i}")), Some(section));
        }
    }
    editor.add_meta(Meta::new("page-meta").with_property("title", "Home"));
    editor.clear_history();
    editor
}

fn run_sequence(editor: &mut Orchestrator) -> usize {
    let mut steps = 0;
    let mut step = |done: bool| {
        assert!(done);
        steps += 1;
    };

    step(editor.delete_node("header-1"));
    step(editor.update_node("body", NodeUpdate::new().with_children(["body-2", "body-0", "body-1"])));
    step(editor.replace_node("footer", Node::new("new-footer")));

    let copied = editor.copy_node("body");
    step(editor.paste_node("new-footer", &copied));
    step(editor.delete_node("body-0"));
    step(editor.add_node(Node::new("late"), Some("header")));

    let mut properties = ValueMap::new();
    properties.insert("title".to_string(), Value::from("About"));
    step(editor.update_meta("page-meta", MetaUpdate::new().with_properties(properties)));
    step(editor.add_meta(Meta::new("header").with_property("sticky", true)));

    steps
}

#[test]
fn test_undo_whole_sequence_restores_initial_state() {
    let mut editor = page();
    let initial = snapshot(&editor);

    let steps = run_sequence(&mut editor);
    assert_eq!(editor.history().undo_levels(), steps);

    for _ in 0..steps {
        assert!(editor.undo());
    }
    assert!(!editor.undo());
    assert_eq!(snapshot(&editor), initial);
}

#[test]
fn test_redo_whole_sequence_restores_final_state() {
    let mut editor = page();
    let steps = run_sequence(&mut editor);
    let last = snapshot(&editor);

    while editor.undo() {}
    for _ in 0..steps {
        assert!(editor.redo());
    }
    assert!(!editor.redo());
    assert_eq!(snapshot(&editor), last);
}

#[test]
fn test_interleaved_undo_redo() {
    let mut editor = page();
    let initial = snapshot(&editor);
    run_sequence(&mut editor);

    editor.undo();
    editor.undo();
    let middle = snapshot(&editor);

    editor.redo();
    editor.undo();
    assert_eq!(snapshot(&editor), middle);

    while editor.undo() {}
    assert_eq!(snapshot(&editor), initial);
}

#[test]
fn test_mixed_batch() {
    let mut editor = page();
    let initial = snapshot(&editor);

    editor.begin_batch();
    run_sequence(&mut editor);
    editor.end_batch();
    let last = snapshot(&editor);

    assert_eq!(editor.history().undo_levels(), 1);

    editor.undo();
    assert_eq!(snapshot(&editor), initial);

    editor.redo();
    assert_eq!(snapshot(&editor), last);
}

#[test]
fn test_replace_keeps_sibling_order_through_history() {
    let mut editor = page();

    editor.replace_node("body", Node::new("main"));
    assert_eq!(
        editor.tree().get("page").unwrap().children,
        vec!["header", "main", "footer"]
    );

    editor.undo();
    assert_eq!(
        editor.tree().get("page").unwrap().children,
        vec!["header", "body", "footer"]
    );
    assert_eq!(
        editor.tree().get("body").unwrap().children,
        vec!["body-0", "body-1", "body-2"]
    );
}
