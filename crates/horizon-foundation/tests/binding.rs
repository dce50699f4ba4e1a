//! Integration tests for text bindings on derived reflected types.

use std::sync::Arc;

use horizon_foundation::{
    BoundText, ControlKind, Environment, MetaObjectBuilder, Reflect, SharedObject, Style, shared,
};

#[derive(Reflect, Default)]
#[reflect(methods = "Person::register")]
struct Person {
    name: String,
    #[reflect(skip)]
    writes: Vec<String>,
}

impl Person {
    fn register(builder: MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self> {
        builder
            .getter("get_name", |p| p.name.clone())
            .setter("set_name", |p, name: String| {
                p.writes.push(name.clone());
                p.name = name;
            })
    }
}

fn writes(person: &SharedObject) -> Vec<String> {
    let guard = person.lock();
    guard
        .as_any()
        .downcast_ref::<Person>()
        .map(|p| p.writes.clone())
        .unwrap_or_default()
}

fn text_field(env: &Arc<Environment>) -> horizon_foundation::ControlId {
    let controls = env.controls();
    let shell = controls.create(ControlKind::Shell, None, Style::SHELL_TRIM).unwrap();
    controls.create(ControlKind::Text, Some(shell), Style::BORDER).unwrap()
}

#[test]
fn test_binding_pulls_then_pushes_each_edit() {
    let env = Environment::with_defaults();
    let field = text_field(&env);
    let person = shared(Person {
        name: "Ann".into(),
        ..Person::default()
    });

    let binding = BoundText::bind(&env, field, person.clone(), "name").unwrap();
    assert!(binding.has_getter());
    assert!(binding.has_setter());
    assert_eq!(env.controls().text(field).unwrap(), "Ann");
    assert!(writes(&person).is_empty());

    env.controls().type_text(field, "Anna").unwrap();
    env.controls().type_text(field, "Anne").unwrap();
    assert_eq!(writes(&person), ["Anna", "Anne"]);
}

#[test]
fn test_dropped_binding_stops_pushing() {
    let env = Environment::with_defaults();
    let field = text_field(&env);
    let person = shared(Person::default());

    let binding = BoundText::bind(&env, field, person.clone(), "name").unwrap();
    env.controls().type_text(field, "Bob").unwrap();
    drop(binding);
    env.controls().type_text(field, "Rob").unwrap();

    assert_eq!(writes(&person), ["Bob"]);
}

#[test]
fn test_two_fields_share_one_object() {
    let env = Environment::with_defaults();
    let first = text_field(&env);
    let second = text_field(&env);
    let person = shared(Person {
        name: "Cy".into(),
        ..Person::default()
    });

    let _a = BoundText::bind(&env, first, person.clone(), "name").unwrap();
    let b = BoundText::bind(&env, second, person.clone(), "name").unwrap();

    env.controls().type_text(first, "Cyrus").unwrap();
    assert_eq!(env.controls().text(second).unwrap(), "Cy");
    b.refresh().unwrap();
    assert_eq!(env.controls().text(second).unwrap(), "Cyrus");
    assert_eq!(writes(&person), ["Cyrus"]);
}
