//! Column definitions for [`TableView`](super::TableView).

use std::cmp::Ordering;
use std::sync::Arc;

use horizon_foundation_core::logging::targets;
use horizon_foundation_core::{FieldMeta, MetaObject, MethodMeta, SharedObject, Value};

use crate::config::NamingConvention;
use crate::reflect::{resolve, resolve_getter};
use crate::widget::TextAlignment;

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortOrder {
    /// Smallest first, empty cells first.
    #[default]
    Ascending,
    /// Largest first, empty cells last.
    Descending,
}

impl SortOrder {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// Text comparison used instead of the values' natural order.
pub type StringComparator = Arc<dyn Fn(&str, &str) -> Ordering + Send + Sync>;

/// Transformation applied to non-null extracted values.
pub type ValueFormatter = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Where a column's value comes from. Fixed when the column is built.
#[derive(Clone)]
enum Extraction {
    /// Accessor on the row object.
    RowMethod(&'static MethodMeta),
    /// Method on a separate object, called with the row.
    ContainerMethod {
        container: SharedObject,
        method: &'static MethodMeta,
    },
    /// Registered field of the row object.
    Field(&'static FieldMeta),
    Unresolved,
}

#[derive(Clone)]
enum Formatter {
    Fn(ValueFormatter),
    Method {
        target: SharedObject,
        method: &'static MethodMeta,
    },
}

/// One column of a table view: header, value extraction, formatting and
/// sort settings.
///
/// The value of a row is found, in order of preference, through an accessor
/// named like the column (`name`, `get_name` or `getName`), or through a
/// registered field with that name. A column whose name matches nothing
/// shows empty cells.
///
/// # Example
///
/// ```ignore
/// let columns = vec![
///     TableViewColumn::new("Name", "name", Person::static_meta_object()),
///     TableViewColumn::new("Age", "age", Person::static_meta_object())
///         .with_alignment(TextAlignment::Right),
/// ];
/// ```
#[derive(Clone)]
pub struct TableViewColumn {
    header: String,
    name: String,
    extraction: Extraction,
    formatter: Option<Formatter>,
    string_comparator: Option<StringComparator>,
    sort_order: SortOrder,
    alignment: TextAlignment,
    width: Option<i32>,
}

impl TableViewColumn {
    /// A column reading `name` from rows described by `row_meta`.
    pub fn new(header: impl Into<String>, name: impl Into<String>, row_meta: &'static MetaObject) -> Self {
        let name = name.into();
        let extraction = resolve_getter(row_meta, NamingConvention::Snake, &name)
            .or_else(|| resolve_getter(row_meta, NamingConvention::Camel, &name))
            .map(Extraction::RowMethod)
            .or_else(|| row_meta.field(&name).map(Extraction::Field))
            .unwrap_or_else(|| {
                tracing::debug!(
                    target: targets::TABLE,
                    type_name = row_meta.type_name,
                    column = %name,
                    "no getter or field for column"
                );
                Extraction::Unresolved
            });
        Self::with_extraction(header.into(), name, extraction)
    }

    /// A column whose value is computed by a one-argument method of
    /// `container`, called with the row object.
    ///
    /// The method is looked up as `name`, then `get_name`, then `getName`.
    pub fn with_container(header: impl Into<String>, name: impl Into<String>, container: SharedObject) -> Self {
        let name = name.into();
        let meta = container.lock().meta_object();
        let method = resolve(meta, &name, true)
            .or_else(|| resolve(meta, &NamingConvention::Snake.getter_name(&name), true))
            .or_else(|| resolve(meta, &NamingConvention::Camel.getter_name(&name), true));
        let extraction = match method {
            Some(method) => Extraction::ContainerMethod { container, method },
            None => Extraction::Unresolved,
        };
        Self::with_extraction(header.into(), name, extraction)
    }

    fn with_extraction(header: String, name: String, extraction: Extraction) -> Self {
        Self {
            header,
            name,
            extraction,
            formatter: None,
            string_comparator: None,
            sort_order: SortOrder::Ascending,
            alignment: TextAlignment::Left,
            width: None,
        }
    }

    /// Format extracted values with `formatter`.
    pub fn with_formatter<F>(mut self, formatter: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        self.formatter = Some(Formatter::Fn(Arc::new(formatter)));
        self
    }

    /// Format extracted values with the one-argument method `method` of
    /// `target`. Ignored (and logged) when no such method exists.
    pub fn with_formatter_method(mut self, target: SharedObject, method: &str) -> Self {
        let meta = target.lock().meta_object();
        match resolve(meta, method, true) {
            Some(resolved) => {
                self.formatter = Some(Formatter::Method {
                    target,
                    method: resolved,
                });
            }
            None => {
                tracing::debug!(target: targets::TABLE, column = %self.name, method, "formatter not found");
            }
        }
        self
    }

    /// Sort by comparing display text with `comparator`.
    pub fn with_string_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&str, &str) -> Ordering + Send + Sync + 'static,
    {
        self.string_comparator = Some(Arc::new(comparator));
        self
    }

    /// Set the cell alignment.
    pub fn with_alignment(mut self, alignment: TextAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Set the initial width instead of the configured default.
    pub fn with_width(mut self, width: i32) -> Self {
        self.width = Some(width);
        self
    }

    /// Header text.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The name values are looked up by.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cell alignment.
    pub fn alignment(&self) -> TextAlignment {
        self.alignment
    }

    /// Initial width, if one was set.
    pub fn width(&self) -> Option<i32> {
        self.width
    }

    /// Current sort direction.
    pub fn sort_order(&self) -> SortOrder {
        self.sort_order
    }

    /// Change the sort direction.
    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.sort_order = order;
    }

    /// Whether a value source was found.
    pub fn is_resolved(&self) -> bool {
        !matches!(self.extraction, Extraction::Unresolved)
    }

    /// Extract this column's value for `row`.
    ///
    /// Failures are logged and yield [`Value::Null`].
    pub fn value(&self, row: &SharedObject) -> Value {
        let extracted = match &self.extraction {
            Extraction::RowMethod(method) => {
                let mut guard = row.lock();
                method.invoke(&mut *guard, None)
            }
            Extraction::ContainerMethod { container, method } => {
                let mut guard = container.lock();
                method.invoke(&mut *guard, Some(Value::Object(Arc::clone(row))))
            }
            Extraction::Field(field) => {
                let guard = row.lock();
                Ok(field.read(&*guard).unwrap_or_default())
            }
            Extraction::Unresolved => Ok(Value::Null),
        };

        let value = extracted.unwrap_or_else(|err| {
            tracing::warn!(target: targets::TABLE, column = %self.name, %err, "value extraction failed");
            Value::Null
        });
        if value.is_null() {
            return value;
        }
        self.format(value)
    }

    fn format(&self, value: Value) -> Value {
        match &self.formatter {
            None => value,
            Some(Formatter::Fn(format)) => format(value),
            Some(Formatter::Method { target, method }) => {
                let mut guard = target.lock();
                let fallback = value.clone();
                method.invoke(&mut *guard, Some(value)).unwrap_or_else(|err| {
                    tracing::warn!(target: targets::TABLE, column = %self.name, %err, "formatter failed");
                    fallback
                })
            }
        }
    }

    /// Display text of this column for `row`. Null values are empty.
    pub fn text(&self, row: &SharedObject) -> String {
        self.value(row).to_string()
    }

    /// Order two rows by this column in its current direction.
    ///
    /// Null values sort before everything else. Values that cannot be
    /// compared are treated as equal.
    pub fn compare(&self, a: &SharedObject, b: &SharedObject) -> Ordering {
        self.compare_values(&self.value(a), &self.value(b))
    }

    pub(crate) fn compare_values(&self, a: &Value, b: &Value) -> Ordering {
        let ordering = match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => match &self.string_comparator {
                Some(compare) => compare(&a.to_string(), &b.to_string()),
                None => a.natural_cmp(b).unwrap_or(Ordering::Equal),
            },
        };
        match self.sort_order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }
}

impl std::fmt::Debug for TableViewColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let source = match &self.extraction {
            Extraction::RowMethod(method) => method.name(),
            Extraction::ContainerMethod { method, .. } => method.name(),
            Extraction::Field(field) => field.name(),
            Extraction::Unresolved => "<unresolved>",
        };
        f.debug_struct("TableViewColumn")
            .field("header", &self.header)
            .field("source", &source)
            .field("sort_order", &self.sort_order)
            .field("alignment", &self.alignment)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizon_foundation_core::{MetaObjectBuilder, Reflect, shared};
    use std::any::Any;
    use std::sync::LazyLock;

    struct Item {
        title: String,
        price: Option<i64>,
        weight: f64,
    }

    static ITEM_META: LazyLock<MetaObject> = LazyLock::new(|| {
        MetaObjectBuilder::<Item>::new("Item")
            .field("weight", "f64", |i| i.weight)
            .field("title", "String", |i| format!("field:{}", i.title))
            .getter("title", |i| i.title.clone())
            .getter("get_price", |i| i.price)
            .try_method0("getBroken", |_| Err::<i64, _>("broken"))
            .build()
    });

    impl Reflect for Item {
        fn meta_object(&self) -> &'static MetaObject {
            &ITEM_META
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Catalog {
        discount: i64,
    }

    static CATALOG_META: LazyLock<MetaObject> = LazyLock::new(|| {
        MetaObjectBuilder::<Catalog>::new("Catalog")
            .method1("getNetPrice", |c, row: SharedObject| {
                let guard = row.lock();
                let item = guard.as_any().downcast_ref::<Item>().map(|i| i.price);
                item.flatten().map(|p| p - c.discount)
            })
            .method1("currency", |_, value: i64| format!("${value}"))
            .build()
    });

    impl Reflect for Catalog {
        fn meta_object(&self) -> &'static MetaObject {
            &CATALOG_META
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn item(title: &str, price: Option<i64>) -> SharedObject {
        shared(Item {
            title: title.into(),
            price,
            weight: 1.5,
        })
    }

    #[test]
    fn test_exact_getter_wins_over_field() {
        let column = TableViewColumn::new("Title", "title", &ITEM_META);
        assert_eq!(column.value(&item("Lamp", None)), Value::Text("Lamp".into()));
    }

    #[test]
    fn test_convention_getter() {
        let column = TableViewColumn::new("Price", "price", &ITEM_META);
        assert_eq!(column.value(&item("Lamp", Some(30))), Value::Int(30));
        assert_eq!(column.value(&item("Lamp", None)), Value::Null);
    }

    #[test]
    fn test_field_fallback() {
        let column = TableViewColumn::new("Weight", "weight", &ITEM_META);
        assert!(column.is_resolved());
        assert_eq!(column.value(&item("Lamp", None)), Value::Float(1.5));
        assert_eq!(column.text(&item("Lamp", None)), "1.5");
    }

    #[test]
    fn test_unresolved_and_failing_columns_yield_null() {
        let missing = TableViewColumn::new("Color", "color", &ITEM_META);
        assert!(!missing.is_resolved());
        assert_eq!(missing.value(&item("Lamp", None)), Value::Null);

        let broken = TableViewColumn::new("Broken", "broken", &ITEM_META);
        assert!(broken.is_resolved());
        assert_eq!(broken.value(&item("Lamp", None)), Value::Null);
    }

    #[test]
    fn test_container_method_receives_row() {
        let catalog = shared(Catalog { discount: 5 });
        let column = TableViewColumn::with_container("Net", "net_price", catalog.clone());
        assert!(!column.is_resolved());

        let column = TableViewColumn::with_container("Net", "netPrice", catalog);
        assert_eq!(column.value(&item("Lamp", Some(30))), Value::Int(25));
        assert_eq!(column.value(&item("Lamp", None)), Value::Null);
    }

    #[test]
    fn test_formatters_skip_null() {
        let catalog = shared(Catalog { discount: 0 });
        let column = TableViewColumn::new("Price", "price", &ITEM_META)
            .with_formatter_method(catalog, "currency");
        assert_eq!(column.text(&item("Lamp", Some(30))), "$30");
        assert_eq!(column.text(&item("Lamp", None)), "");

        let column = TableViewColumn::new("Title", "title", &ITEM_META)
            .with_formatter(|v| Value::Text(v.to_string().to_uppercase()));
        assert_eq!(column.text(&item("Lamp", None)), "LAMP");
    }

    #[test]
    fn test_null_ordering_follows_direction() {
        let mut column = TableViewColumn::new("Price", "price", &ITEM_META);
        let priced = item("A", Some(1));
        let unpriced = item("B", None);

        assert_eq!(column.compare(&unpriced, &priced), Ordering::Less);
        assert_eq!(column.compare(&unpriced, &unpriced), Ordering::Equal);

        column.set_sort_order(SortOrder::Descending);
        assert_eq!(column.compare(&unpriced, &priced), Ordering::Greater);
    }

    #[test]
    fn test_string_comparator_overrides_natural_order() {
        let column = TableViewColumn::new("Title", "title", &ITEM_META)
            .with_string_comparator(|a, b| a.len().cmp(&b.len()));
        assert_eq!(column.compare(&item("Zz", None), &item("Aaa", None)), Ordering::Less);

        let natural = TableViewColumn::new("Title", "title", &ITEM_META);
        assert_eq!(natural.compare(&item("Zz", None), &item("Aaa", None)), Ordering::Greater);
    }

    #[test]
    fn test_incomparable_values_are_equal() {
        let column = TableViewColumn::new("Title", "title", &ITEM_META);
        assert_eq!(
            column.compare_values(&Value::Int(1), &Value::Text("x".into())),
            Ordering::Equal
        );
    }
}
