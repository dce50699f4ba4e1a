//! Logging and debugging facilities for Horizon Foundation.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - [`ObjectDump`], a readable tree of a reflected object's fields
//! - [`PerfSpan`] for timing layout passes and similar work
//!
//! # Tracing Integration
//!
//! Install any `tracing` subscriber to see the logs:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("horizon_foundation=debug")
//!     .init();
//! ```

use std::collections::HashSet;
use std::fmt::{self, Write as FmtWrite};
use std::sync::Arc;

use crate::meta::{Reflect, SharedObject};
use crate::value::Value;

/// Target names for log filtering.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_foundation_core";
    /// Event loop and timers.
    pub const TIMER: &str = "horizon_foundation_core::timer";
    /// Signal/slot system.
    pub const SIGNAL: &str = "horizon_foundation_core::signal";
    /// Method resolution and callback invocation.
    pub const REFLECT: &str = "horizon_foundation::reflect";
    /// Control binding.
    pub const BINDING: &str = "horizon_foundation::binding";
    /// Form layout and layout adjusters.
    pub const LAYOUT: &str = "horizon_foundation::layout";
    /// Window placement and frames.
    pub const WINDOW: &str = "horizon_foundation::window";
    /// Table views.
    pub const TABLE: &str = "horizon_foundation::table";
    /// Control registry.
    pub const CONTROL: &str = "horizon_foundation::control";
}

/// Options for [`ObjectDump`].
#[derive(Debug, Clone)]
pub struct DumpOptions {
    /// Maximum nesting depth for referenced objects.
    pub max_depth: usize,
    /// Spaces per nesting level.
    pub indent_size: usize,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            max_depth: 4,
            indent_size: 2,
        }
    }
}

/// Renders the fields of a reflected object, recursing into referenced
/// objects and lists.
///
/// Objects already on the current path print as `<cycle>`; objects locked
/// elsewhere print as `<busy>`.
#[derive(Debug, Clone, Default)]
pub struct ObjectDump {
    options: DumpOptions,
}

impl ObjectDump {
    /// Create a dumper with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dumper with custom options.
    pub fn with_options(options: DumpOptions) -> Self {
        Self { options }
    }

    /// Dump a shared object.
    pub fn format_shared(&self, object: &SharedObject) -> String {
        let mut output = String::new();
        let mut path = HashSet::new();
        self.write_shared(object, 0, &mut path, &mut output);
        output
    }

    /// Dump an object that is already borrowed.
    pub fn format(&self, object: &dyn Reflect) -> String {
        let mut output = String::new();
        let mut path = HashSet::new();
        self.write_object(object, 0, &mut path, &mut output);
        output
    }

    /// Dump a list of values, one entry per line.
    pub fn format_list(&self, items: &[Value]) -> String {
        let mut output = String::new();
        let mut path = HashSet::new();
        self.write_list(items, 0, &mut path, &mut output);
        output
    }

    fn write_shared(
        &self,
        object: &SharedObject,
        depth: usize,
        path: &mut HashSet<usize>,
        output: &mut String,
    ) {
        let key = Arc::as_ptr(object) as *const () as usize;
        if !path.insert(key) {
            output.push_str("<cycle>\n");
            return;
        }
        match object.try_lock() {
            Some(guard) => self.write_object(&*guard, depth, path, output),
            None => output.push_str("<busy>\n"),
        }
        path.remove(&key);
    }

    fn write_object(
        &self,
        object: &dyn Reflect,
        depth: usize,
        path: &mut HashSet<usize>,
        output: &mut String,
    ) {
        let meta = object.meta_object();
        let _ = writeln!(output, "{}", meta.type_name);
        if depth >= self.options.max_depth {
            return;
        }
        for field in meta.fields() {
            let value = field.read(object).unwrap_or_default();
            self.write_indent(depth + 1, output);
            let _ = write!(output, "{} = ", field.name());
            self.write_value(&value, depth + 1, path, output);
        }
    }

    fn write_value(
        &self,
        value: &Value,
        depth: usize,
        path: &mut HashSet<usize>,
        output: &mut String,
    ) {
        match value {
            Value::Object(object) => self.write_shared(object, depth, path, output),
            Value::List(items) => {
                output.push('\n');
                self.write_list(items, depth, path, output);
            }
            Value::Text(text) => {
                let _ = writeln!(output, "{text:?}");
            }
            other => {
                let _ = writeln!(output, "{other}");
            }
        }
    }

    fn write_list(
        &self,
        items: &[Value],
        depth: usize,
        path: &mut HashSet<usize>,
        output: &mut String,
    ) {
        for (index, item) in items.iter().enumerate() {
            self.write_indent(depth + 1, output);
            let _ = write!(output, "[{index}] ");
            self.write_value(item, depth + 1, path, output);
        }
    }

    fn write_indent(&self, depth: usize, output: &mut String) {
        for _ in 0..depth * self.options.indent_size {
            output.push(' ');
        }
    }
}

impl fmt::Display for ObjectDump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectDump(max_depth = {})", self.options.max_depth)
    }
}

/// A guard that keeps a tracing span entered until dropped.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "horizon_foundation::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Macros for common tracing patterns.
///
/// Thin wrappers around the `tracing` macros with the core target.
#[macro_export]
macro_rules! foundation_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_foundation_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! foundation_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_foundation_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{MetaObject, MetaObjectBuilder, shared};
    use std::any::Any;
    use std::sync::LazyLock;

    struct Node {
        name: String,
        next: Option<SharedObject>,
        tags: Vec<String>,
    }

    static NODE_META: LazyLock<MetaObject> = LazyLock::new(|| {
        MetaObjectBuilder::<Node>::new("Node")
            .field("name", "String", |n| n.name.clone())
            .field("next", "Option<SharedObject>", |n| n.next.clone())
            .field("tags", "Vec<String>", |n| n.tags.clone())
            .build()
    });

    impl Reflect for Node {
        fn meta_object(&self) -> &'static MetaObject {
            &NODE_META
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn node(name: &str) -> Node {
        Node {
            name: name.into(),
            next: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_dump_fields_and_list() {
        let mut root = node("root");
        root.tags = vec!["a".into(), "b".into()];

        let output = ObjectDump::new().format(&root);
        assert!(output.starts_with("Node\n"));
        assert!(output.contains("name = \"root\""));
        assert!(output.contains("[0] \"a\""));
        assert!(output.contains("[1] \"b\""));
    }

    #[test]
    fn test_dump_nested_object() {
        let child = shared(node("child"));
        let mut root = node("root");
        root.next = Some(child);

        let output = ObjectDump::new().format_shared(&shared(root));
        assert!(output.contains("next = Node"));
        assert!(output.contains("name = \"child\""));
    }

    #[test]
    fn test_dump_cycle() {
        let a = shared(node("a"));
        let b = shared(node("b"));
        set_next(&a, &b);
        set_next(&b, &a);

        let output = ObjectDump::new().format_shared(&a);
        assert!(output.contains("<cycle>"));

        // Break the cycle so both nodes are freed.
        set_next_none(&a);
    }

    fn set_next(from: &SharedObject, to: &SharedObject) {
        let mut guard = from.lock();
        if let Some(node) = guard.as_any_mut().downcast_mut::<Node>() {
            node.next = Some(to.clone());
        }
    }

    fn set_next_none(from: &SharedObject) {
        let mut guard = from.lock();
        if let Some(node) = guard.as_any_mut().downcast_mut::<Node>() {
            node.next = None;
        }
    }

    #[test]
    fn test_dump_max_depth() {
        let child = shared(node("child"));
        let mut root = node("root");
        root.next = Some(child);

        let dump = ObjectDump::with_options(DumpOptions {
            max_depth: 1,
            indent_size: 2,
        });
        let output = dump.format(&root);
        assert!(output.contains("next = Node"));
        assert!(!output.contains("child"));
    }

    #[test]
    fn test_perf_span() {
        let _span = PerfSpan::new("test_operation");
    }
}
