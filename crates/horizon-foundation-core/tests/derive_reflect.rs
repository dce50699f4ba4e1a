//! Integration tests for the #[derive(Reflect)] macro.

use horizon_foundation_core::{MetaObjectBuilder, Reflect, SharedObject, Value, shared};
use horizon_foundation_macros::Reflect;

#[derive(Reflect, Default)]
#[reflect(methods = "Person::register")]
struct Person {
    name: String,
    age: i64,
    #[reflect(rename = "e-mail")]
    email: Option<String>,
    #[reflect(skip)]
    #[allow(dead_code)]
    cache: Vec<u8>,
    _private: u8,
}

impl Person {
    fn register(builder: MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self> {
        builder
            .getter("name", |p| p.name.clone())
            .setter("set_name", |p, name: String| p.name = name)
            .getter("get_age", |p| p.age)
            .method0("birthday", |p| {
                p.age += 1;
            })
    }
}

#[derive(Reflect)]
#[reflect(name = "Marker")]
struct Unit;

#[test]
fn test_fields_registered_in_declaration_order() {
    let meta = Person::static_meta_object();
    let names: Vec<_> = meta.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, vec!["name", "age", "e-mail"]);
    assert_eq!(meta.field("e-mail").unwrap().type_name(), "Option<String>");
}

#[test]
fn test_methods_registered_by_hook() {
    let meta = Person::static_meta_object();
    assert_eq!(meta.type_name, "Person");
    assert_eq!(meta.methods().len(), 4);
    assert_eq!(meta.methods_named("set_name").next().unwrap().arity(), 1);
    assert_eq!(meta.methods_named("birthday").next().unwrap().arity(), 0);
}

#[test]
fn test_instance_meta_object_is_static() {
    let person = Person::default();
    assert!(std::ptr::eq(person.meta_object(), Person::static_meta_object()));
}

#[test]
fn test_invoke_through_shared_object() {
    let object: SharedObject = shared(Person {
        name: "Ann".into(),
        age: 41,
        ..Default::default()
    });

    let mut guard = object.lock();
    let meta = guard.meta_object();
    meta.methods_named("birthday")
        .next()
        .unwrap()
        .invoke(&mut *guard, None)
        .unwrap();
    let age = meta
        .methods_named("get_age")
        .next()
        .unwrap()
        .invoke(&mut *guard, None)
        .unwrap();
    assert_eq!(age, Value::Int(42));
    assert_eq!(meta.field("e-mail").unwrap().read(&*guard), Some(Value::Null));
}

#[test]
fn test_unit_struct_with_renamed_type() {
    let meta = Unit::static_meta_object();
    assert_eq!(meta.type_name, "Marker");
    assert!(meta.fields().is_empty());
    assert!(meta.methods().is_empty());
}
