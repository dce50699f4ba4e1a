//! A small contact list: splash screen, bound form fields and a sortable
//! table, driven headlessly.
//!
//! Run with: RUST_LOG=horizon_foundation=debug cargo run -p horizon-foundation --example contacts

use std::sync::atomic::Ordering;
use std::time::Duration;

use horizon_foundation::{
    Application, Attachment, BoundText, ControlKind, FormData, FrameConfig, MainFrame,
    MetaObjectBuilder, ObjectDump, Reflect, SharedObject, Size, Style, TableView, TableViewColumn,
    shared,
};
use tracing_subscriber::EnvFilter;

#[derive(Reflect)]
#[reflect(methods = "Contact::register")]
struct Contact {
    name: String,
    email: String,
    age: i64,
}

impl Contact {
    fn register(builder: MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self> {
        builder
            .getter("get_name", |c| c.name.clone())
            .setter("set_name", |c, name: String| c.name = name)
            .getter("get_email", |c| c.email.clone())
            .setter("set_email", |c, email: String| c.email = email)
    }
}

#[derive(Reflect)]
#[reflect(methods = "Controller::register")]
struct Controller {
    opened: usize,
}

impl Controller {
    fn register(builder: MetaObjectBuilder<Self>) -> MetaObjectBuilder<Self> {
        builder.method1("open_contact", |c, contact: SharedObject| {
            c.opened += 1;
            println!("open contact:\n{}", ObjectDump::new().format_shared(&contact));
        })
    }
}

fn contact(name: &str, email: &str, age: i64) -> SharedObject {
    shared(Contact {
        name: name.into(),
        email: email.into(),
        age,
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let app = Application::with_defaults();
    let env = app.env();

    // Splash until the "background" work reports completion.
    let splash = app.splash(Size::new(300, 120))?;
    splash.set_label_text("Loading contacts...")?;
    splash.open()?;
    splash.set_wait_for_background(true);
    splash.set_splash_time(Duration::from_millis(100));
    let ready = app.background_flag();
    env.event_loop()
        .timer_exec(Duration::from_millis(250), move || ready.store(true, Ordering::Release));
    splash.run();

    let frame = MainFrame::new(env, FrameConfig::new("Contacts").with_size(640, 480).with_status(true))?;
    let controls = env.controls();
    let shell = frame.shell();

    let group = frame.layout_group(
        Some(Attachment::percent(0, 10)),
        Some(Attachment::percent(100, -10)),
        Some(Attachment::percent(0, 10)),
    );
    let mut fields = Vec::new();
    for text in ["Name:", "E-mail:"] {
        let label = controls.create(ControlKind::Label, Some(shell), Style::NONE)?;
        controls.set_text(label, text)?;
        let field = controls.create(ControlKind::Text, Some(shell), Style::BORDER)?;
        group.add_pair(label, field, None)?;
        fields.push(field);
    }

    let people = vec![
        contact("Dana", "dana@example.com", 41),
        contact("Ari", "ari@example.com", 29),
        contact("Lee", "lee@example.com", 35),
    ];
    let name = BoundText::bind(env, fields[0], people[0].clone(), "name")?;
    let email = BoundText::bind(env, fields[1], people[0].clone(), "email")?;

    let meta = Contact::static_meta_object();
    let table = TableView::new(
        env,
        shell,
        vec![
            TableViewColumn::new("Name", "name", meta),
            TableViewColumn::new("E-mail", "email", meta),
            TableViewColumn::new("Age", "age", meta),
        ],
        Style::FULL_SELECTION,
    )?;
    let fill = frame.fill_panel(table.control())?;
    controls.set_layout_data(
        table.control(),
        Some(FormData {
            top: Some(Attachment::control(fields[1], 10)),
            ..fill
        }),
    )?;
    table.add_rows(people.iter().cloned())?;
    table.pack()?;

    let controller = shared(Controller { opened: 0 });
    table.set_selection_callback(Some((controller, "open_contact")));

    frame.open()?;
    frame.set_status(&format!("{} contacts", table.row_count()))?;

    // Simulated user input.
    controls.type_text(fields[0], "Dana Scully")?;
    table.row_changed(&people[0])?;
    controls.click_column(table.control(), 2)?;
    controls.double_click_row(table.control(), 0)?;

    let env_handle = std::sync::Arc::downgrade(env);
    env.event_loop().timer_exec(Duration::from_millis(100), move || {
        if let Some(env) = env_handle.upgrade() {
            let _ = env.controls().dispose(shell);
        }
    });
    app.run();

    name.release();
    email.release();
    println!("done");
    Ok(())
}
