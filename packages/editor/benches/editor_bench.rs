use criterion::{black_box, criterion_group, criterion_main, Criterion};
use trellis_editor::{Meta, Node, Orchestrator, Value, ValueMap};

/// Balanced tree with `fanout` children per node, `depth` levels below root
fn build_tree(editor: &mut Orchestrator, fanout: usize, depth: usize) {
    editor.add_node(Node::new("root"), None);

    let mut level = vec!["root".to_string()];
    for d in 0..depth {
        let mut next = Vec::new();
        for parent in &level {
            for i in 0..fanout {
                let id = format!("{parent}.{d}-{i}");
                editor.add_node(Node::new(id.clone()), Some(parent.as_str()));
                next.push(id);
            }
        }
        level = next;
    }
}

fn add_nodes(c: &mut Criterion) {
    c.bench_function("add_nodes_4x4", |b| {
        b.iter(|| {
            let mut editor = Orchestrator::new();
            build_tree(&mut editor, black_box(4), black_box(4));
            editor
        })
    });
}

fn delete_and_undo_subtree(c: &mut Criterion) {
    let mut editor = Orchestrator::new();
    build_tree(&mut editor, 4, 4);

    c.bench_function("delete_and_undo_subtree", |b| {
        b.iter(|| {
            editor.delete_node(black_box("root.0-0"));
            editor.undo();
        })
    });
}

fn copy_and_paste(c: &mut Criterion) {
    let mut editor = Orchestrator::new();
    build_tree(&mut editor, 4, 3);
    editor.add_node(Node::new("target"), Some("root"));

    c.bench_function("copy_paste_undo", |b| {
        b.iter(|| {
            let copied = editor.copy_node(black_box("root.0-0"));
            editor.paste_node("target", &copied);
            editor.undo();
        })
    });
}

fn serialize_meta(c: &mut Criterion) {
    let mut style = ValueMap::new();
    style.insert("padding".to_string(), Value::from(8i64));
    style.insert("color".to_string(), Value::from("#3366FF"));

    let mut editor = Orchestrator::new();
    editor.add_meta(
        Meta::new("button")
            .with_property("style", Value::Map(style))
            .with_property("label", "Click me")
            .with_json_fields(["style"]),
    );

    c.bench_function("serialize_meta", |b| {
        b.iter(|| editor.serialize_meta(black_box("button")))
    });
}

criterion_group!(benches, add_nodes, delete_and_undo_subtree, copy_and_paste, serialize_meta);
criterion_main!(benches);
