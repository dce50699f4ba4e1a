//! Meta-object system: named methods and fields registered per type.
//!
//! Types that take part in name-based binding implement [`Reflect`] and
//! expose a static [`MetaObject`]. The meta-object is a registration table
//! listing:
//!
//! - **methods**: named operations taking zero or one [`Value`] argument
//! - **fields**: named readable fields (the last-resort column source)
//!
//! `#[derive(Reflect)]` (from `horizon-foundation-macros`) generates the
//! field entries and the trait impl. Methods are added through a
//! [`MetaObjectBuilder`] hook:
//!
//! ```ignore
//! #[derive(Reflect)]
//! #[reflect(methods = "Person::register")]
//! struct Person {
//!     name: String,
//!     age: i64,
//! }
//!
//! impl Person {
//!     fn register(builder: MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self> {
//!         builder
//!             .getter("name", |p| p.name.clone())
//!             .setter("set_name", |p, name: String| p.name = name)
//!     }
//! }
//! ```

use std::any::{Any, TypeId};
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::value::{FromValue, IntoValue, Value};

/// A type that exposes a meta-object for name-based access.
pub trait Reflect: Any + Send {
    /// The registration table for this type.
    fn meta_object(&self) -> &'static MetaObject;

    /// Upcast for downcasting to the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete type.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// A reflected object shared between controls, callbacks and tables.
///
/// Identity (for table row removal and similar) is `Arc` pointer identity.
pub type SharedObject = Arc<Mutex<dyn Reflect>>;

/// Wrap a reflected value into a [`SharedObject`].
pub fn shared<T: Reflect>(value: T) -> SharedObject {
    Arc::new(Mutex::new(value))
}

/// Errors from meta-object resolution and invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaError {
    /// No method with this name (and a usable arity) exists.
    MethodNotFound {
        /// The type that was searched.
        type_name: &'static str,
        /// The requested method name.
        method: String,
    },
    /// The method was invoked with the wrong number of arguments.
    ArityMismatch {
        /// The method name.
        method: &'static str,
        /// Declared parameter count.
        expected: usize,
        /// Supplied argument count.
        got: usize,
    },
    /// The argument could not be converted to the parameter type.
    TypeMismatch {
        /// The parameter type name.
        expected: &'static str,
        /// The kind of value supplied.
        got: &'static str,
    },
    /// The method belongs to a different type than the target object.
    TargetMismatch {
        /// The type the method was registered for.
        expected: &'static str,
    },
    /// The method itself reported a failure.
    Failed(String),
}

impl fmt::Display for MetaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MethodNotFound { type_name, method } => {
                write!(f, "No method '{method}' on {type_name}")
            }
            Self::ArityMismatch {
                method,
                expected,
                got,
            } => write!(
                f,
                "Method '{method}' takes {expected} argument(s), {got} supplied"
            ),
            Self::TypeMismatch { expected, got } => {
                write!(f, "Argument type mismatch: expected {expected}, got {got}")
            }
            Self::TargetMismatch { expected } => {
                write!(f, "Target object is not a {expected}")
            }
            Self::Failed(msg) => write!(f, "Method failed: {msg}"),
        }
    }
}

impl std::error::Error for MetaError {}

/// Result type for meta-object operations.
pub type MetaResult<T> = std::result::Result<T, MetaError>;

type NullaryFn = Box<dyn Fn(&mut dyn Reflect) -> MetaResult<Value> + Send + Sync>;
type UnaryFn = Box<dyn Fn(&mut dyn Reflect, Value) -> MetaResult<Value> + Send + Sync>;
type FieldFn = Box<dyn Fn(&dyn Reflect) -> Option<Value> + Send + Sync>;

enum MethodKind {
    Nullary(NullaryFn),
    Unary {
        param_type: &'static str,
        accepts: fn(&Value) -> bool,
        call: UnaryFn,
    },
}

/// A named method registered on a [`MetaObject`].
pub struct MethodMeta {
    name: &'static str,
    owner: &'static str,
    kind: MethodKind,
}

impl MethodMeta {
    /// The method name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Number of parameters: 0 or 1.
    pub fn arity(&self) -> usize {
        match self.kind {
            MethodKind::Nullary(_) => 0,
            MethodKind::Unary { .. } => 1,
        }
    }

    /// Type name of the single parameter, for one-argument methods.
    pub fn param_type(&self) -> Option<&'static str> {
        match self.kind {
            MethodKind::Nullary(_) => None,
            MethodKind::Unary { param_type, .. } => Some(param_type),
        }
    }

    /// Whether the single parameter would accept `value`.
    ///
    /// Always `false` for zero-argument methods.
    pub fn accepts(&self, value: &Value) -> bool {
        match &self.kind {
            MethodKind::Nullary(_) => false,
            MethodKind::Unary { accepts, .. } => accepts(value),
        }
    }

    /// Invoke the method on `target`.
    ///
    /// `arg` must be `None` for zero-argument methods and `Some` for
    /// one-argument methods.
    pub fn invoke(&self, target: &mut dyn Reflect, arg: Option<Value>) -> MetaResult<Value> {
        match (&self.kind, arg) {
            (MethodKind::Nullary(call), None) => call(target),
            (MethodKind::Unary { call, .. }, Some(arg)) => call(target, arg),
            (_, arg) => Err(MetaError::ArityMismatch {
                method: self.name,
                expected: self.arity(),
                got: usize::from(arg.is_some()),
            }),
        }
    }
}

impl fmt::Debug for MethodMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodMeta")
            .field("name", &self.name)
            .field("owner", &self.owner)
            .field("arity", &self.arity())
            .field("param_type", &self.param_type())
            .finish()
    }
}

/// A named readable field registered on a [`MetaObject`].
pub struct FieldMeta {
    name: &'static str,
    type_name: &'static str,
    read: FieldFn,
}

impl FieldMeta {
    /// The field name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The field's declared type, as written in source.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Read the field from `target`. `None` when the target has another type.
    pub fn read(&self, target: &dyn Reflect) -> Option<Value> {
        (self.read)(target)
    }
}

impl fmt::Debug for FieldMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldMeta")
            .field("name", &self.name)
            .field("type_name", &self.type_name)
            .finish()
    }
}

/// The registration table of a reflected type.
#[derive(Debug)]
pub struct MetaObject {
    /// Short type name.
    pub type_name: &'static str,
    /// Runtime type identity.
    pub type_id: TypeId,
    methods: Vec<MethodMeta>,
    fields: Vec<FieldMeta>,
}

impl MetaObject {
    /// All methods in registration order.
    pub fn methods(&self) -> &[MethodMeta] {
        &self.methods
    }

    /// Methods with exactly this name, in registration order.
    pub fn methods_named<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a MethodMeta> {
        self.methods.iter().filter(move |m| m.name == name)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &[FieldMeta] {
        &self.fields
    }

    /// Find a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldMeta> {
        self.fields.iter().find(|f| f.name == name)
    }
}

fn downcast_mut<'a, T: Reflect>(
    target: &'a mut dyn Reflect,
    owner: &'static str,
) -> MetaResult<&'a mut T> {
    target
        .as_any_mut()
        .downcast_mut::<T>()
        .ok_or(MetaError::TargetMismatch { expected: owner })
}

fn convert<A: FromValue>(arg: Value) -> MetaResult<A> {
    A::from_value(arg).map_err(|v| MetaError::TypeMismatch {
        expected: A::TYPE_NAME,
        got: v.kind_name(),
    })
}

/// Builder for a [`MetaObject`].
///
/// Generated code creates the builder with the fields of the struct; the
/// type's registration hook then adds methods.
pub struct MetaObjectBuilder<T> {
    type_name: &'static str,
    methods: Vec<MethodMeta>,
    fields: Vec<FieldMeta>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Reflect> MetaObjectBuilder<T> {
    /// Start a table for `T`.
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            methods: Vec::new(),
            fields: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Register a readable field.
    pub fn field<V, F>(mut self, name: &'static str, type_name: &'static str, read: F) -> Self
    where
        V: IntoValue,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.fields.push(FieldMeta {
            name,
            type_name,
            read: Box::new(move |target| {
                target
                    .as_any()
                    .downcast_ref::<T>()
                    .map(|typed| read(typed).into_value())
            }),
        });
        self
    }

    /// Register a zero-argument accessor.
    pub fn getter<V, F>(self, name: &'static str, get: F) -> Self
    where
        V: IntoValue,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        self.method0(name, move |target: &mut T| get(target))
    }

    /// Register a one-argument mutator.
    pub fn setter<A, F>(self, name: &'static str, set: F) -> Self
    where
        A: FromValue,
        F: Fn(&mut T, A) + Send + Sync + 'static,
    {
        self.method1(name, move |target: &mut T, arg: A| set(target, arg))
    }

    /// Register a zero-argument method.
    pub fn method0<R, F>(self, name: &'static str, method: F) -> Self
    where
        R: IntoValue,
        F: Fn(&mut T) -> R + Send + Sync + 'static,
    {
        self.try_method0(name, move |target: &mut T| Ok::<R, String>(method(target)))
    }

    /// Register a one-argument method.
    pub fn method1<A, R, F>(self, name: &'static str, method: F) -> Self
    where
        A: FromValue,
        R: IntoValue,
        F: Fn(&mut T, A) -> R + Send + Sync + 'static,
    {
        self.try_method1(name, move |target: &mut T, arg: A| {
            Ok::<R, String>(method(target, arg))
        })
    }

    /// Register a fallible zero-argument method.
    pub fn try_method0<R, E, F>(mut self, name: &'static str, method: F) -> Self
    where
        R: IntoValue,
        E: fmt::Display,
        F: Fn(&mut T) -> Result<R, E> + Send + Sync + 'static,
    {
        let owner = self.type_name;
        self.methods.push(MethodMeta {
            name,
            owner,
            kind: MethodKind::Nullary(Box::new(move |target| {
                let typed = downcast_mut::<T>(target, owner)?;
                method(typed)
                    .map(IntoValue::into_value)
                    .map_err(|e| MetaError::Failed(e.to_string()))
            })),
        });
        self
    }

    /// Register a fallible one-argument method.
    pub fn try_method1<A, R, E, F>(mut self, name: &'static str, method: F) -> Self
    where
        A: FromValue,
        R: IntoValue,
        E: fmt::Display,
        F: Fn(&mut T, A) -> Result<R, E> + Send + Sync + 'static,
    {
        let owner = self.type_name;
        self.methods.push(MethodMeta {
            name,
            owner,
            kind: MethodKind::Unary {
                param_type: A::TYPE_NAME,
                accepts: A::accepts,
                call: Box::new(move |target, arg| {
                    let typed = downcast_mut::<T>(target, owner)?;
                    let arg = convert::<A>(arg)?;
                    method(typed, arg)
                        .map(IntoValue::into_value)
                        .map_err(|e| MetaError::Failed(e.to_string()))
                }),
            },
        });
        self
    }

    /// Finish the table.
    pub fn build(self) -> MetaObject {
        MetaObject {
            type_name: self.type_name,
            type_id: TypeId::of::<T>(),
            methods: self.methods,
            fields: self.fields,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::LazyLock;

    struct Counter {
        count: i64,
        label: String,
    }

    static COUNTER_META: LazyLock<MetaObject> = LazyLock::new(|| {
        MetaObjectBuilder::<Counter>::new("Counter")
            .field("count", "i64", |c| c.count)
            .getter("count", |c| c.count)
            .setter("set_label", |c, label: String| c.label = label)
            .method0("increment", |c| {
                c.count += 1;
            })
            .try_method1("divide", |c, by: i64| {
                if by == 0 {
                    Err("division by zero")
                } else {
                    c.count /= by;
                    Ok(c.count)
                }
            })
            .build()
    });

    impl Reflect for Counter {
        fn meta_object(&self) -> &'static MetaObject {
            &COUNTER_META
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Other;

    impl Reflect for Other {
        fn meta_object(&self) -> &'static MetaObject {
            &COUNTER_META
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn counter() -> Counter {
        Counter {
            count: 10,
            label: String::new(),
        }
    }

    fn method(name: &str) -> &'static MethodMeta {
        COUNTER_META.methods_named(name).next().unwrap()
    }

    #[test]
    fn test_nullary_and_unary_invoke() {
        let mut c = counter();
        method("increment").invoke(&mut c, None).unwrap();
        assert_eq!(method("count").invoke(&mut c, None).unwrap(), Value::Int(11));

        method("set_label")
            .invoke(&mut c, Some(Value::Text("hits".into())))
            .unwrap();
        assert_eq!(c.label, "hits");
    }

    #[test]
    fn test_arity_mismatch() {
        let mut c = counter();
        let err = method("increment")
            .invoke(&mut c, Some(Value::Null))
            .unwrap_err();
        assert!(matches!(err, MetaError::ArityMismatch { expected: 0, got: 1, .. }));
    }

    #[test]
    fn test_type_mismatch() {
        let mut c = counter();
        let err = method("set_label")
            .invoke(&mut c, Some(Value::Int(3)))
            .unwrap_err();
        assert_eq!(
            err,
            MetaError::TypeMismatch {
                expected: "String",
                got: "int"
            }
        );
        assert!(method("set_label").accepts(&Value::Text(String::new())));
        assert!(!method("set_label").accepts(&Value::Null));
    }

    #[test]
    fn test_failure_is_reported() {
        let mut c = counter();
        let err = method("divide")
            .invoke(&mut c, Some(Value::Int(0)))
            .unwrap_err();
        assert_eq!(err, MetaError::Failed("division by zero".into()));
        assert_eq!(
            method("divide").invoke(&mut c, Some(Value::Int(2))).unwrap(),
            Value::Int(5)
        );
    }

    #[test]
    fn test_target_mismatch() {
        let mut other = Other;
        let err = method("increment").invoke(&mut other, None).unwrap_err();
        assert_eq!(err, MetaError::TargetMismatch { expected: "Counter" });
        assert!(COUNTER_META.field("count").unwrap().read(&other).is_none());
    }

    #[test]
    fn test_field_read() {
        let c = counter();
        let field = COUNTER_META.field("count").unwrap();
        assert_eq!(field.type_name(), "i64");
        assert_eq!(field.read(&c), Some(Value::Int(10)));
        assert!(COUNTER_META.field("label").is_none());
    }
}
