//! Dehydration tests: exclusion rules, transforms and mutation.

mod common;

use common::{make_form, make_store, reversed};
use fsb_schema::Component;
use insta::assert_json_snapshot;
use serde_json::json;

#[test]
fn test_state_can_be_dehydrated() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("name").default_state(json!("Ada"))],
    );
    schema.fill(None).unwrap();

    assert_eq!(
        schema.dehydrate_state().unwrap(),
        json!({"data": {"name": "Ada"}})
    );
}

#[test]
fn test_state_can_be_dehydrated_using_custom_logic() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("name")
                .default_state(json!("abc"))
                .dehydrate_state_using(|ctx| Ok(reversed(ctx.state()))),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(
        schema.dehydrate_state().unwrap(),
        json!({"data": {"name": "cba"}})
    );
    assert_eq!(store.borrow().data(), &json!({"data": {"name": "abc"}}));
}

#[test]
fn test_before_state_dehydrated_can_rewrite_state() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("name")
                .default_state(json!("abc"))
                .before_state_dehydrated(|ctx| {
                    ctx.component().set_state(reversed(ctx.state()))?;
                    Ok(())
                }),
        ],
    );
    schema.fill(None).unwrap();

    schema.call_before_state_dehydrated().unwrap();
    assert_eq!(
        schema.dehydrate_state().unwrap(),
        json!({"data": {"name": "cba"}})
    );
}

#[test]
fn test_components_can_be_excluded() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("name")
                .default_state(json!("x"))
                .dehydrated(false),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(schema.dehydrate_state().unwrap(), json!({}));
}

#[test]
fn test_components_are_excluded_with_their_parent() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::new()
                .dehydrated(false)
                .schema(vec![Component::field("name").default_state(json!("x"))])
                .unwrap(),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(schema.dehydrate_state().unwrap(), json!({}));
}

#[test]
fn test_hidden_components_are_excluded() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("name").default_state(json!("x")).hidden()],
    );
    schema.fill(None).unwrap();

    assert_eq!(schema.dehydrate_state().unwrap(), json!({}));
}

#[test]
fn test_hidden_components_are_excluded_with_their_parent() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::new()
                .hidden()
                .schema(vec![Component::field("name").default_state(json!("x"))])
                .unwrap(),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(schema.dehydrate_state().unwrap(), json!({}));
}

#[test]
fn test_hidden_components_can_opt_in() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("name")
                .default_state(json!("x"))
                .hidden()
                .dehydrated_when_hidden(true),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(
        schema.dehydrate_state().unwrap(),
        json!({"data": {"name": "x"}})
    );
}

#[test]
fn test_hidden_parent_opt_in_covers_children() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("address")
                .hidden()
                .dehydrated_when_hidden(true)
                .schema(vec![Component::field("city").default_state(json!("Oslo"))])
                .unwrap(),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(
        schema.dehydrate_state().unwrap(),
        json!({"data": {"address": {"city": "Oslo"}}})
    );
}

#[test]
fn test_disabled_components_are_excluded() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("name").default_state(json!("x")).disabled()],
    );
    schema.fill(None).unwrap();

    assert_eq!(schema.dehydrate_state().unwrap(), json!({}));
}

#[test]
fn test_disabled_components_are_excluded_with_their_parent() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::new()
                .disabled()
                .schema(vec![Component::field("name").default_state(json!("x"))])
                .unwrap(),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(schema.dehydrate_state().unwrap(), json!({}));
}

#[test]
fn test_disabled_components_can_be_forced_in() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("name")
                .default_state(json!("x"))
                .disabled()
                .dehydrated(true),
        ],
    );
    schema.fill(None).unwrap();

    assert_ne!(schema.dehydrate_state().unwrap(), json!({}));
}

#[test]
fn test_forced_child_of_disabled_parent_stays_excluded() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::new()
                .disabled()
                .schema(vec![
                    Component::field("name")
                        .default_state(json!("x"))
                        .dehydrated(true),
                ])
                .unwrap(),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(schema.dehydrate_state().unwrap(), json!({}));
}

#[test]
fn test_excluded_child_is_removed_from_parent_mapping() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("account")
                .schema(vec![
                    Component::field("email"),
                    Component::field("password").dehydrated(false),
                ])
                .unwrap(),
            Component::field("notes").hidden(),
        ],
    );
    schema
        .fill(Some(json!({
            "account": {"email": "ada@example.com", "password": "hunter2"},
            "notes": "internal",
        })))
        .unwrap();

    assert_json_snapshot!(schema.dehydrate_state().unwrap(), @r#"
    {
      "data": {
        "account": {
          "email": "ada@example.com"
        }
      }
    }
    "#);
}

#[test]
fn test_dynamic_visibility_is_evaluated_at_dehydration() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("has_company").default_state(json!(false)),
            Component::field("company").visible_when(|component| {
                component
                    .make_get()
                    .get("has_company")
                    .is_ok_and(|value| value == json!(true))
            }),
        ],
    );
    schema.fill(Some(json!({"company": "Acme"}))).unwrap();

    assert_eq!(
        schema.dehydrate_state().unwrap(),
        json!({"data": {"has_company": false}})
    );

    schema.update_state("data.has_company", json!(true)).unwrap();
    assert_json_snapshot!(schema.dehydrate_state().unwrap(), @r#"
    {
      "data": {
        "has_company": true,
        "company": "Acme"
      }
    }
    "#);
}

#[test]
fn test_later_components_overwrite_earlier_ones() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("value").dehydrate_state_using(|_| Ok(json!("first"))),
            Component::new()
                .schema(vec![
                    Component::field("value").dehydrate_state_using(|_| Ok(json!("second"))),
                ])
                .unwrap(),
        ],
    );
    schema.fill(None).unwrap();

    assert_eq!(
        schema.dehydrate_state().unwrap(),
        json!({"data": {"value": "second"}})
    );
}

#[test]
fn test_dehydrated_state_can_be_mutated() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("name")
                .default_state(json!("abc"))
                .mutate_dehydrated_state_using(|ctx| Ok(reversed(ctx.state()))),
        ],
    );
    schema.fill(None).unwrap();

    let draft = schema.dehydrate_state().unwrap();
    assert_eq!(draft, json!({"data": {"name": "abc"}}));
    assert_eq!(
        schema.mutate_dehydrated_state(draft).unwrap(),
        json!({"data": {"name": "cba"}})
    );
}

#[test]
fn test_mutation_without_hooks_is_identity() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![
            Component::field("name").default_state(json!("Ada")),
            Component::field("address")
                .schema(vec![Component::field("city").default_state(json!("Oslo"))])
                .unwrap(),
        ],
    );
    schema.fill(None).unwrap();

    let draft = schema.dehydrate_state().unwrap();
    assert_eq!(schema.mutate_dehydrated_state(draft.clone()).unwrap(), draft);
}

#[test]
fn test_failing_dehydrate_hook_is_reported() {
    let store = make_store(json!({}));
    let schema = make_form(
        &store,
        vec![Component::field("name").dehydrate_state_using(|_| Err("cannot encode".into()))],
    );
    schema.fill(None).unwrap();

    let err = schema.dehydrate_state().unwrap_err();
    assert_eq!(
        err.to_string(),
        "dehydrate_state_using hook failed for 'data.name': cannot encode"
    );
}
