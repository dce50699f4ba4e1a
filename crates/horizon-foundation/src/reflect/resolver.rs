//! Name-based method lookup on meta-objects.

use horizon_foundation_core::MetaObject;
use horizon_foundation_core::MethodMeta;
use horizon_foundation_core::logging::targets;

use crate::config::NamingConvention;

/// Find the method named `name` on `meta`.
///
/// Methods with that name are scanned in registration order. A
/// zero-argument method is acceptable only when no argument is wanted; a
/// one-argument method is always acceptable. Parameter types are not
/// checked here, a mismatch surfaces when the method is invoked.
///
/// `None` means the feature relying on the method is disabled.
pub fn resolve(meta: &'static MetaObject, name: &str, wants_argument: bool) -> Option<&'static MethodMeta> {
    let found = meta
        .methods_named(name)
        .find(|method| method.arity() == 1 || !wants_argument);
    if found.is_none() {
        tracing::debug!(
            target: targets::REFLECT,
            type_name = meta.type_name,
            method = name,
            wants_argument,
            "method not resolved"
        );
    }
    found
}

/// Find a zero-argument accessor for `base`: `base` itself, then the
/// convention getter name.
pub fn resolve_getter(
    meta: &'static MetaObject,
    naming: NamingConvention,
    base: &str,
) -> Option<&'static MethodMeta> {
    let nullary = |name: &str| meta.methods_named(name).find(|m| m.arity() == 0);
    nullary(base).or_else(|| nullary(&naming.getter_name(base)))
}

/// Find a one-argument mutator for `base` under the naming convention.
pub fn resolve_setter(
    meta: &'static MetaObject,
    naming: NamingConvention,
    base: &str,
) -> Option<&'static MethodMeta> {
    resolve(meta, &naming.setter_name(base), true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_foundation_core::{MetaObjectBuilder, Reflect};
    use std::any::Any;
    use std::sync::LazyLock;

    struct Account {
        owner: String,
    }

    static ACCOUNT_META: LazyLock<MetaObject> = LazyLock::new(|| {
        MetaObjectBuilder::<Account>::new("Account")
            .method0("refresh", |_| {})
            .method1("refresh", |_, _: i64| {})
            .method0("close", |_| {})
            .getter("get_owner", |a| a.owner.clone())
            .setter("set_owner", |a, owner: String| a.owner = owner)
            .getter("getOwner", |a| a.owner.clone())
            .getter("balance", |_| 10_i64)
            .build()
    });

    impl Reflect for Account {
        fn meta_object(&self) -> &'static MetaObject {
            &ACCOUNT_META
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn meta() -> &'static MetaObject {
        &ACCOUNT_META
    }

    #[test]
    fn test_nullary_only_without_argument() {
        assert_eq!(resolve(meta(), "close", false).unwrap().arity(), 0);
        assert!(resolve(meta(), "close", true).is_none());
    }

    #[test]
    fn test_first_acceptable_in_registration_order() {
        assert_eq!(resolve(meta(), "refresh", false).unwrap().arity(), 0);
        assert_eq!(resolve(meta(), "refresh", true).unwrap().arity(), 1);
    }

    #[test]
    fn test_unary_accepted_without_argument() {
        assert_eq!(resolve(meta(), "set_owner", false).unwrap().arity(), 1);
    }

    #[test]
    fn test_unknown_method() {
        assert!(resolve(meta(), "missing", false).is_none());
    }

    #[test]
    fn test_getter_prefers_base_name() {
        let getter = resolve_getter(meta(), NamingConvention::Snake, "balance").unwrap();
        assert_eq!(getter.name(), "balance");

        let getter = resolve_getter(meta(), NamingConvention::Snake, "owner").unwrap();
        assert_eq!(getter.name(), "get_owner");

        let getter = resolve_getter(meta(), NamingConvention::Camel, "owner").unwrap();
        assert_eq!(getter.name(), "getOwner");
    }

    #[test]
    fn test_setter_by_convention() {
        let setter = resolve_setter(meta(), NamingConvention::Snake, "owner").unwrap();
        assert_eq!(setter.name(), "set_owner");
        assert!(resolve_setter(meta(), NamingConvention::Camel, "owner").is_none());
    }

    #[test]
    fn test_resolved_method_invokes() {
        let mut account = Account {
            owner: "Ann".into(),
        };
        let setter = resolve_setter(meta(), NamingConvention::Snake, "owner").unwrap();
        setter.invoke(&mut account, Some("Bob".into())).unwrap();
        assert_eq!(account.owner, "Bob");
    }
}
