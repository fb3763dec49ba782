//! Update propagation tests.

mod common;

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use common::{form_data, make_form, make_store, reversed};
use fsb_schema::{Component, HookKind, SchemaError};
use serde_json::{Value, json};

#[test]
fn test_after_state_updated_can_rewrite_state() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("word").after_state_updated(|ctx| {
            ctx.component().set_state(reversed(ctx.state()))?;
            Ok(())
        })],
    );

    schema.fill(Some(json!({"word": "abc"}))).unwrap();
    assert!(schema.call_after_state_updated("data.word").unwrap());
    assert_eq!(form_data(&store), json!({"word": "cba"}));
}

#[test]
fn test_nested_path_update_reaches_bound_component() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("tags").after_state_updated(|ctx| {
            let first = ctx.state().get(0).cloned().unwrap_or(Value::Null);
            ctx.component().set_state(json!([reversed(&first)]))?;
            Ok(())
        })],
    );

    schema.fill(Some(json!({"tags": ["abc"]}))).unwrap();
    schema.call_after_state_updated("data.tags.0").unwrap();
    assert_eq!(form_data(&store), json!({"tags": ["cba"]}));
}

#[test]
fn test_child_component_update_hook() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("parent")
                .schema(vec![Component::field("child").after_state_updated(|ctx| {
                    ctx.component().set_state(reversed(ctx.state()))?;
                    Ok(())
                })])
                .unwrap(),
        ],
    );

    schema
        .fill(Some(json!({"parent": {"child": "abc"}})))
        .unwrap();
    schema.call_after_state_updated("data.parent.child").unwrap();
    assert_eq!(form_data(&store), json!({"parent": {"child": "cba"}}));
}

#[test]
fn test_ancestor_hook_fires_once_for_unchanged_state() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("a").after_state_updated(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })],
    );

    schema.call_after_state_updated("data.a.0").unwrap();
    schema.call_after_state_updated("data.a.1").unwrap();
    assert_eq!(calls.get(), 1);
}

#[test]
fn test_ancestor_hook_fires_again_when_state_changes() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("a").after_state_updated(|ctx| {
            let current = ctx.state().get(0).and_then(Value::as_i64).unwrap_or_default();
            ctx.component().set_state(json!([current + 1]))?;
            Ok(())
        })],
    );

    schema.fill(Some(json!({"a": [0]}))).unwrap();
    schema.call_after_state_updated("data.a.0").unwrap();
    schema.call_after_state_updated("data.a.1").unwrap();
    assert_eq!(form_data(&store), json!({"a": [2]}));
}

#[test]
fn test_parent_hook_sees_its_own_state_after_child_update() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("parent")
                .schema(vec![Component::field("child")])
                .unwrap()
                .after_state_updated(|ctx| {
                    let child = ctx.state().get("child").cloned().unwrap_or(Value::Null);
                    ctx.component().set_state(json!({"child": reversed(&child)}))?;
                    Ok(())
                }),
        ],
    );

    schema
        .fill(Some(json!({"parent": {"child": "abc"}})))
        .unwrap();
    schema.call_after_state_updated("data.parent.child").unwrap();
    assert_eq!(form_data(&store), json!({"parent": {"child": "cba"}}));
}

#[test]
fn test_hooks_bubble_through_transparent_components() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let outer = Rc::clone(&seen);
    let inner = Rc::clone(&seen);
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("address")
                .after_state_updated(move |ctx| {
                    outer.borrow_mut().push(("address", ctx.state().clone()));
                    Ok(())
                })
                .schema(vec![
                    Component::new()
                        .schema(vec![Component::field("city").after_state_updated(
                            move |ctx| {
                                inner.borrow_mut().push(("city", ctx.state().clone()));
                                Ok(())
                            },
                        )])
                        .unwrap(),
                ])
                .unwrap(),
        ],
    );

    schema.fill(None).unwrap();
    schema.update_state("data.address.city", json!("Oslo")).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec![
            ("city", json!("Oslo")),
            ("address", json!({"city": "Oslo"})),
        ]
    );
}

#[test]
fn test_components_can_set_their_own_state_after_update() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("foo").after_state_updated(|ctx| {
            ctx.component().set_state(json!("bar"))?;
            Ok(())
        })],
    );

    schema.fill(None).unwrap();
    schema.update_state("data.foo", json!("baz")).unwrap();
    assert_eq!(form_data(&store), json!({"foo": "bar"}));
}

#[test]
fn test_components_can_read_their_own_state_in_update_hook() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("foo").after_state_updated(|ctx| {
            let component = ctx.component();
            component.set_state(reversed(&component.get_state()?))?;
            Ok(())
        })],
    );

    schema.fill(None).unwrap();
    schema.update_state("data.foo", json!("xyz")).unwrap();
    assert_eq!(form_data(&store), json!({"foo": "zyx"}));
}

#[test]
fn test_layout_component_reads_container_state() {
    let layout = Component::new();
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            layout
                .clone()
                .schema(vec![Component::field("foo")])
                .unwrap(),
        ],
    );

    schema.fill(Some(json!({"foo": "value"}))).unwrap();
    assert_eq!(layout.get_state().unwrap(), json!({"foo": "value"}));
}

#[test]
fn test_update_hook_receives_old_state() {
    let olds = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&olds);
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("foo").after_state_updated(move |ctx| {
            recorder.borrow_mut().push(ctx.old().cloned());
            Ok(())
        })],
    );

    schema.fill(None).unwrap();
    schema.update_state("data.foo", json!("first")).unwrap();
    schema.update_state("data.foo", json!("second")).unwrap();

    assert_eq!(
        *olds.borrow(),
        vec![Some(Value::Null), Some(json!("first"))]
    );
    assert_eq!(form_data(&store), json!({"foo": "second"}));
}

#[test]
fn test_set_and_notify_from_hook_fires_target_hook() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("title").after_state_updated(|ctx| {
                let slug = ctx
                    .state()
                    .as_str()
                    .unwrap_or_default()
                    .to_lowercase()
                    .replace(' ', "-");
                ctx.set().set_and_notify("slug", json!(slug))?;
                Ok(())
            }),
            Component::field("slug").after_state_updated(|ctx| {
                ctx.set().set("slug_length", json!(ctx.state().as_str().map(str::len)))?;
                Ok(())
            }),
            Component::field("slug_length"),
        ],
    );

    schema.fill(None).unwrap();
    schema.update_state("data.title", json!("Hello World")).unwrap();

    assert_eq!(
        form_data(&store),
        json!({"title": "Hello World", "slug": "hello-world", "slug_length": 11})
    );
}

#[test]
fn test_fill_resets_update_dedupe() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("a").after_state_updated(move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        })],
    );

    schema.fill(None).unwrap();
    schema.call_after_state_updated("data.a").unwrap();
    schema.call_after_state_updated("data.a").unwrap();
    schema.fill(None).unwrap();
    schema.call_after_state_updated("data.a").unwrap();
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_failing_update_hook_keeps_written_state() {
    let olds = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&olds);
    let foo = Component::field("foo").after_state_updated(move |ctx| {
        recorder.borrow_mut().push(ctx.old().cloned());
        if ctx.state() == &json!("bad") {
            return Err("rejected".into());
        }
        Ok(())
    });
    let store = make_store(json!({}));
    let schema = make_form(&store, vec![foo.clone()]);
    schema.fill(None).unwrap();

    let err = schema.update_state("data.foo", json!("bad")).unwrap_err();
    assert!(matches!(
        &err,
        SchemaError::Hook {
            hook: HookKind::AfterStateUpdated,
            path,
            ..
        } if path == "data.foo"
    ));
    assert_eq!(form_data(&store), json!({"foo": "bad"}));

    foo.set_state(json!("raw")).unwrap();
    schema.call_after_state_updated("data.foo").unwrap();
    schema.update_state("data.foo", json!("good")).unwrap();

    assert_eq!(
        *olds.borrow(),
        vec![Some(Value::Null), None, Some(json!("raw"))]
    );
    assert_eq!(form_data(&store), json!({"foo": "good"}));
}

#[test]
fn test_transparent_component_fires_after_sibling_update() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::new().after_state_updated(move |_| {
                counter.set(counter.get() + 1);
                Ok(())
            }),
            Component::field("x"),
        ],
    );

    schema.fill(None).unwrap();
    assert!(schema.update_state("data.x", json!("v")).unwrap());
    assert_eq!(calls.get(), 1);
    assert!(schema.update_state("data.x", json!("w")).unwrap());
    assert_eq!(calls.get(), 2);
}
