//! Deferred calls of named methods.

use horizon_foundation_core::logging::targets;
use horizon_foundation_core::{MetaError, MetaResult, MethodMeta, SharedObject, Value};

use super::resolver::resolve;

/// A named method on a target object, resolved once and invoked on demand.
///
/// Whether the payload is passed is decided by the resolved method: a
/// one-argument method receives the payload (or [`Value::Null`] when there
/// is none), a zero-argument method never does.
#[derive(Clone)]
pub struct Callback {
    target: Option<SharedObject>,
    name: String,
    payload: Option<Value>,
    method: Option<&'static MethodMeta>,
}

impl Callback {
    /// Resolve `name` on `target`.
    ///
    /// The lookup wants an argument only when a payload is given. When
    /// nothing matches the callback is inert.
    pub fn new(target: SharedObject, name: impl Into<String>, payload: Option<Value>) -> Self {
        let name = name.into();
        let meta = target.lock().meta_object();
        let method = resolve(meta, &name, payload.is_some());
        Self {
            target: Some(target),
            name,
            payload,
            method,
        }
    }

    /// A callback with no target. Invoking it does nothing.
    pub fn detached() -> Self {
        Self {
            target: None,
            name: String::new(),
            payload: None,
            method: None,
        }
    }

    /// The method name this callback was created for.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The payload passed to one-argument methods.
    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Whether a method was found.
    pub fn is_resolved(&self) -> bool {
        self.method.is_some()
    }

    /// Whether the payload will be passed.
    pub fn passes_payload(&self) -> bool {
        self.method.is_some_and(|m| m.arity() == 1)
    }

    /// Invoke the method, logging and discarding any failure.
    ///
    /// Unresolved callbacks do nothing.
    pub fn invoke(&self) {
        if self.method.is_none() {
            return;
        }
        if let Err(err) = self.try_invoke() {
            tracing::warn!(target: targets::REFLECT, method = %self.name, %err, "callback failed");
        }
    }

    /// Invoke the method and return its result.
    ///
    /// The target is locked for the duration of the call; invoking a
    /// callback on an object that is already locked (for example from inside
    /// one of its own methods) fails instead of deadlocking.
    pub fn try_invoke(&self) -> MetaResult<Value> {
        let (Some(target), Some(method)) = (&self.target, self.method) else {
            return Err(MetaError::MethodNotFound {
                type_name: self
                    .target
                    .as_ref()
                    .and_then(|t| t.try_lock().map(|g| g.meta_object().type_name))
                    .unwrap_or("<detached>"),
                method: self.name.clone(),
            });
        };

        let arg = (method.arity() == 1).then(|| self.payload.clone().unwrap_or_default());
        let mut guard = target
            .try_lock()
            .ok_or_else(|| MetaError::Failed(format!("target of '{}' is busy", self.name)))?;
        tracing::trace!(target: targets::REFLECT, method = %self.name, "invoking callback");
        method.invoke(&mut *guard, arg)
    }
}

impl Default for Callback {
    fn default() -> Self {
        Self::detached()
    }
}

impl std::fmt::Debug for Callback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callback")
            .field("name", &self.name)
            .field("payload", &self.payload)
            .field("resolved", &self.is_resolved())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_foundation_core::{MetaObject, MetaObjectBuilder, Reflect, shared};
    use std::any::Any;
    use std::sync::LazyLock;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    static RECORDER_META: LazyLock<MetaObject> = LazyLock::new(|| {
        MetaObjectBuilder::<Recorder>::new("Recorder")
            .method0("save", |r| r.calls.push("save".into()))
            .method1("open", |r, arg: Value| r.calls.push(format!("open({arg:?})")))
            .method1("count", |r, n: i64| r.calls.push(format!("count({n})")))
            .try_method0("fail", |_| Err::<(), _>("disk full"))
            .build()
    });

    impl Reflect for Recorder {
        fn meta_object(&self) -> &'static MetaObject {
            &RECORDER_META
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn calls(object: &SharedObject) -> Vec<String> {
        object
            .lock()
            .as_any()
            .downcast_ref::<Recorder>()
            .unwrap()
            .calls
            .clone()
    }

    #[test]
    fn test_nullary_without_payload() {
        let object = shared(Recorder::default());
        let callback = Callback::new(object.clone(), "save", None);
        assert!(callback.is_resolved());
        assert!(!callback.passes_payload());

        callback.invoke();
        callback.invoke();
        assert_eq!(calls(&object), vec!["save", "save"]);
    }

    #[test]
    fn test_nullary_not_resolved_with_payload() {
        let object = shared(Recorder::default());
        let callback = Callback::new(object.clone(), "save", Some(Value::Int(1)));
        assert!(!callback.is_resolved());

        callback.invoke();
        assert!(calls(&object).is_empty());
        assert!(matches!(
            callback.try_invoke(),
            Err(MetaError::MethodNotFound { type_name: "Recorder", .. })
        ));
    }

    #[test]
    fn test_unary_receives_payload() {
        let object = shared(Recorder::default());
        Callback::new(object.clone(), "count", Some(Value::Int(3))).invoke();
        assert_eq!(calls(&object), vec!["count(3)"]);
    }

    #[test]
    fn test_unary_without_payload_receives_null() {
        let object = shared(Recorder::default());
        let callback = Callback::new(object.clone(), "open", None);
        assert!(callback.passes_payload());

        callback.invoke();
        assert_eq!(calls(&object), vec!["open(Null)"]);
    }

    #[test]
    fn test_failures_are_swallowed() {
        let object = shared(Recorder::default());

        let failing = Callback::new(object.clone(), "fail", None);
        failing.invoke();
        assert_eq!(
            failing.try_invoke(),
            Err(MetaError::Failed("disk full".into()))
        );

        let mismatched = Callback::new(object.clone(), "count", Some(Value::Text("x".into())));
        mismatched.invoke();
        assert!(matches!(
            mismatched.try_invoke(),
            Err(MetaError::TypeMismatch { .. })
        ));
        assert!(calls(&object).is_empty());
    }

    #[test]
    fn test_busy_target_fails_instead_of_deadlocking() {
        let object = shared(Recorder::default());
        let callback = Callback::new(object.clone(), "save", None);

        let _guard = object.lock();
        assert!(matches!(callback.try_invoke(), Err(MetaError::Failed(_))));
    }

    #[test]
    fn test_detached_is_inert() {
        let callback = Callback::detached();
        assert!(!callback.is_resolved());
        callback.invoke();
        assert!(callback.try_invoke().is_err());
    }
}
