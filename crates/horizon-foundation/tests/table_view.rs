//! Integration tests for sortable table views.

use std::sync::Arc;

use horizon_foundation::{
    ControlKind, Environment, FrameConfig, MainFrame, MetaObjectBuilder, Reflect, SharedObject,
    SortOrder, Style, TableView, TableViewColumn, Value, shared,
};

#[derive(Reflect)]
#[reflect(methods = "Employee::register")]
struct Employee {
    name: String,
    salary: Option<i64>,
}

impl Employee {
    fn register(builder: MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self> {
        builder.getter("getName", |e| e.name.clone())
    }
}

fn employee(name: &str, salary: Option<i64>) -> SharedObject {
    shared(Employee {
        name: name.into(),
        salary,
    })
}

fn setup() -> (Arc<Environment>, MainFrame, TableView) {
    let env = Environment::with_defaults();
    let frame = MainFrame::new(&env, FrameConfig::new("Staff")).unwrap();
    let meta = Employee::static_meta_object();
    let view = TableView::new(
        &env,
        frame.shell(),
        vec![
            TableViewColumn::new("Name", "name", meta),
            // No accessor, read from the field.
            TableViewColumn::new("Salary", "salary", meta)
                .with_formatter(|v| Value::Text(format!("{v} EUR"))),
        ],
        Style::FULL_SELECTION,
    )
    .unwrap();
    (env, frame, view)
}

fn column_text(env: &Environment, view: &TableView, column: usize) -> Vec<String> {
    let controls = env.controls();
    (0..controls.item_count(view.control()).unwrap())
        .map(|row| controls.item_cells(view.control(), row).unwrap()[column].clone())
        .collect()
}

#[test]
fn test_two_rows_sorted_by_name() {
    let (env, _frame, view) = setup();
    view.add_rows([employee("Bob", Some(30)), employee("Ann", Some(25))]).unwrap();

    assert_eq!(column_text(&env, &view, 0), ["Ann", "Bob"]);
    assert_eq!(column_text(&env, &view, 1), ["25 EUR", "30 EUR"]);
}

#[test]
fn test_missing_values_first_ascending_last_descending() {
    let (env, _frame, view) = setup();
    view.add_rows([
        employee("Ann", Some(25)),
        employee("Bob", None),
        employee("Cy", Some(10)),
    ])
    .unwrap();

    env.controls().click_column(view.control(), 1).unwrap();
    assert_eq!(column_text(&env, &view, 1), ["", "10 EUR", "25 EUR"]);

    env.controls().click_column(view.control(), 1).unwrap();
    assert_eq!(view.sort_order(1), Some(SortOrder::Descending));
    assert_eq!(column_text(&env, &view, 1), ["25 EUR", "10 EUR", ""]);

    // Another column starts ascending; coming back does too.
    env.controls().click_column(view.control(), 0).unwrap();
    assert_eq!(column_text(&env, &view, 0), ["Ann", "Bob", "Cy"]);
    env.controls().click_column(view.control(), 1).unwrap();
    assert_eq!(view.sort_order(1), Some(SortOrder::Ascending));
    assert_eq!(column_text(&env, &view, 1), ["", "10 EUR", "25 EUR"]);
}

#[test]
fn test_removal_keeps_relative_order() {
    let (env, _frame, view) = setup();
    let rows: Vec<SharedObject> = ["Eve", "Dan", "Cy", "Bob", "Ann"]
        .into_iter()
        .map(|name| employee(name, None))
        .collect();
    view.add_rows(rows.iter().cloned()).unwrap();

    assert!(view.remove_row(&rows[2]).unwrap());
    assert_eq!(view.row_count(), 4);
    assert_eq!(column_text(&env, &view, 0), ["Ann", "Bob", "Dan", "Eve"]);
}

#[test]
fn test_table_lives_in_the_frame() {
    let (env, frame, view) = setup();
    assert_eq!(env.controls().kind(view.control()).unwrap(), ControlKind::Table);
    assert_eq!(env.controls().parent(view.control()).unwrap(), Some(frame.shell()));
    assert!(env.controls().style(view.control()).unwrap().contains(Style::BORDER));
}
