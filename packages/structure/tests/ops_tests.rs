//! Integration tests for the page operations facade

use serde_json::{json, Value};
use trellis_structure::{ConfigMeta, InteractionMeta, PageOps, Widget, WidgetTreeNode};

fn page() -> PageOps {
    let mut ops = PageOps::new(Widget::new("page", "Page"));
    ops.append_widget("page", WidgetTreeNode::new(Widget::new("form", "Form")));
    ops.append_widget("form", WidgetTreeNode::new(Widget::new("submit", "Button")));
    ops
}

#[test]
fn test_structure_lookups_through_facade() {
    let mut ops = page();

    assert_eq!(ops.get_widget_by_id("submit").unwrap().kind, "Button");
    assert_eq!(ops.get_parent_widget("submit").unwrap().id, "form");
    assert!(!ops.append_widget("missing", WidgetTreeNode::new(Widget::new("x", "Text"))));

    assert!(ops.remove_widget_by_id("form"));
    assert!(ops.get_widget_by_id("submit").is_none());
    assert!(!ops.remove_widget_by_id("page"));
}

#[test]
fn test_interactions_through_facade() {
    let mut ops = page();
    ops.add_interaction_meta(
        "submit-form",
        InteractionMeta::new("Submit", "click", |args| json!({ "sent": args.len() })),
    );

    assert_eq!(ops.get_interaction_meta("submit-form").unwrap().event_name, "click");
    assert_eq!(
        ops.interactions().trigger("submit-form", &[Value::Null]),
        Some(json!({ "sent": 1 }))
    );

    assert!(ops.remove_interaction_meta("submit-form").is_some());
    assert!(ops.interactions().is_empty());
}

#[test]
fn test_compile_config() {
    let mut ops = page();
    ops.config_mut().loader.register_loader("title", || json!("Checkout"));
    ops.config_mut()
        .compiler
        .register_compiler("wrap", |value| Some(json!({ "text": value })));

    ops.add_config_meta(ConfigMeta::new("heading").with_loader("title").with_compiler("wrap"));
    ops.add_config_meta(ConfigMeta::new("plain").with_loader("title"));
    ops.add_config_meta(ConfigMeta::new("skipped"));

    let compiled = ops.compile();
    assert_eq!(compiled.len(), 2);
    assert_eq!(compiled["heading"], json!({ "text": "Checkout" }));
    assert_eq!(compiled["plain"], json!("Checkout"));
}

#[test]
fn test_from_json_and_back() {
    let ops = PageOps::from_json(r#"{
        "id": "page",
        "type": "Page",
        "widget": { "id": "page", "type": "Page", "renderFunction": "(h) => h('div')" },
        "children": []
    }"#)
    .unwrap();

    let value: Value = serde_json::from_str(&ops.to_json().unwrap()).unwrap();
    assert_eq!(value["widget"]["renderFunction"], "(h) => h('div')");
    assert!(ops.structure().contains("page"));
}
