//! Text controls bound to properties of reflected objects.
//!
//! A [`BoundText`] connects a text field or combo to one property of a
//! target object. The property's current value is pulled into the control
//! once when the binding is made; from then on every edit of the control is
//! pushed through the property's setter.
//!
//! Accessors are found by name through the target's meta-object:
//!
//! - setter: the convention setter name (`set_name` or `setName`), taking
//!   one text argument
//! - getter: the base name itself, else the convention getter name
//!   (`get_name` or `getName`), taking no argument
//!
//! Either accessor may be missing. Without a getter the control starts
//! empty; without a setter edits are not forwarded.
//!
//! # Example
//!
//! ```ignore
//! let binding = BoundText::bind(&env, name_field, person.clone(), "name")?;
//! env.controls().type_text(name_field, "Ann")?; // calls set_name("Ann")
//! binding.release();
//! ```

use std::sync::{Arc, Weak};

use horizon_foundation_core::logging::targets;
use horizon_foundation_core::{ConnectionGuard, MethodMeta, SharedObject, Value};

use crate::environment::Environment;
use crate::error::{ControlError, Result};
use crate::reflect::{resolve_getter, resolve_setter};
use crate::widget::ControlId;

/// A live binding between a text control and an object property.
///
/// The edit subscription is owned by this handle and removed when it is
/// dropped or [released](Self::release).
pub struct BoundText {
    env: Arc<Environment>,
    control: ControlId,
    property: String,
    target: SharedObject,
    getter: Option<&'static MethodMeta>,
    setter: Option<&'static MethodMeta>,
    _edits: ConnectionGuard<()>,
}

impl BoundText {
    /// Bind `control` to the `base_name` property of `target`.
    ///
    /// Fails only when `control` does not exist or is not a text field or
    /// combo. Missing accessors are logged and tolerated.
    pub fn bind(
        env: &Arc<Environment>,
        control: ControlId,
        target: SharedObject,
        base_name: &str,
    ) -> Result<Self> {
        let controls = env.controls();
        let kind = controls.kind(control)?;
        if !kind.is_editable_text() {
            return Err(ControlError::UnsupportedKind {
                id: control,
                kind,
                operation: "bind",
            }
            .into());
        }

        let naming = env.config().naming;
        let meta = target.lock().meta_object();
        let getter = resolve_getter(meta, naming, base_name);
        let setter = resolve_setter(meta, naming, base_name)
            .filter(|setter| setter.accepts(&Value::Text(String::new())));
        tracing::debug!(
            target: targets::BINDING,
            type_name = meta.type_name,
            property = base_name,
            getter = getter.map(MethodMeta::name),
            setter = setter.map(MethodMeta::name),
            "binding text control"
        );

        // Pull before subscribing so the initial value is not echoed back.
        if let Some(getter) = getter {
            pull(env, control, &target, getter)?;
        }

        let signals = controls.signals(control)?;
        let edits = {
            let env = Arc::downgrade(env);
            let target = Arc::clone(&target);
            let property = base_name.to_string();
            signals
                .modified
                .connect_scoped(move |_| push(&env, control, &target, setter, &property))
        };

        Ok(Self {
            env: Arc::clone(env),
            control,
            property: base_name.to_string(),
            target,
            getter,
            setter,
            _edits: edits,
        })
    }

    /// The bound control.
    pub fn control(&self) -> ControlId {
        self.control
    }

    /// The bound property's base name.
    pub fn property(&self) -> &str {
        &self.property
    }

    /// Whether a getter was found.
    pub fn has_getter(&self) -> bool {
        self.getter.is_some()
    }

    /// Whether a setter was found.
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }

    /// Pull the property into the control again.
    ///
    /// The control's `modified` notification is suppressed while its text
    /// is replaced, so the value is not pushed straight back.
    pub fn refresh(&self) -> Result<()> {
        let Some(getter) = self.getter else {
            return Ok(());
        };
        let signals = self.env.controls().signals(self.control)?;
        signals.modified.set_blocked(true);
        let result = pull(&self.env, self.control, &self.target, getter);
        signals.modified.set_blocked(false);
        result
    }

    /// Stop forwarding edits.
    pub fn release(self) {
        tracing::trace!(target: targets::BINDING, property = %self.property, "binding released");
    }
}

impl std::fmt::Debug for BoundText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundText")
            .field("control", &self.control)
            .field("property", &self.property)
            .field("getter", &self.getter.map(MethodMeta::name))
            .field("setter", &self.setter.map(MethodMeta::name))
            .finish()
    }
}

fn pull(
    env: &Environment,
    control: ControlId,
    target: &SharedObject,
    getter: &'static MethodMeta,
) -> Result<()> {
    let value = {
        let mut guard = target.lock();
        getter.invoke(&mut *guard, None)
    };
    let text = match value {
        Ok(Value::Null) => String::new(),
        Ok(Value::Text(text)) => text,
        Ok(other) => other.to_string(),
        Err(err) => {
            tracing::warn!(target: targets::BINDING, getter = getter.name(), %err, "getter failed");
            return Ok(());
        }
    };
    env.controls().set_text(control, &text)?;
    Ok(())
}

fn push(
    env: &Weak<Environment>,
    control: ControlId,
    target: &SharedObject,
    setter: Option<&'static MethodMeta>,
    property: &str,
) {
    let (Some(env), Some(setter)) = (env.upgrade(), setter) else {
        return;
    };
    let text = match env.controls().text(control) {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(target: targets::BINDING, property, %err, "bound control is gone");
            return;
        }
    };

    let Some(mut guard) = target.try_lock() else {
        tracing::warn!(target: targets::BINDING, property, "bound object is busy, edit dropped");
        return;
    };
    if let Err(err) = setter.invoke(&mut *guard, Some(Value::Text(text))) {
        tracing::warn!(target: targets::BINDING, setter = setter.name(), %err, "setter failed");
    }
}
