//! Integration tests for frame placement and form layout.

use horizon_foundation::{
    AdjustPhase, AlignFlags, Attachment, ControlKind, Environment, FoundationConfig, FrameConfig,
    LayoutAdjuster, MainFrame, Point, Rect, Style,
};

#[test]
fn test_cascade_stays_on_screen() {
    let env = Environment::with_defaults();
    let bounds = env.screen().placement_bounds();

    let mut origins = Vec::new();
    for i in 0..500 {
        let frame = MainFrame::new(&env, FrameConfig::new(format!("Window {i}")).with_size(400, 300)).unwrap();
        frame.open().unwrap();
        let placed = frame.bounds().unwrap();
        assert!(bounds.contains_rect(&placed), "window {i} at {placed:?} left {bounds:?}");
        origins.push(placed.origin());
    }

    assert_eq!(origins[0], Point::new(30, 20));
    // The cascade bounces instead of piling up in a corner.
    let distinct: std::collections::HashSet<Point> = origins[400..].iter().copied().collect();
    assert!(distinct.len() > 50);
    assert_eq!(env.windows_of_kind("frame").len(), 500);
}

#[test]
fn test_cascade_step_from_config() {
    let config = FoundationConfig::from_toml_str("[placement]\ncascade_step = { x = 50, y = 40 }\n").unwrap();
    let env = Environment::new(config);
    let first = MainFrame::new(&env, FrameConfig::new("One")).unwrap();
    let second = MainFrame::new(&env, FrameConfig::new("Two")).unwrap();
    first.open().unwrap();
    second.open().unwrap();
    assert_eq!(second.bounds().unwrap().origin(), Point::new(100, 80));
}

#[test]
fn test_snapped_frame_keeps_its_location() {
    let env = Environment::with_defaults();
    let main = MainFrame::new(&env, FrameConfig::new("Main")).unwrap();
    main.set_location(Point::new(100, 100)).unwrap();
    main.open().unwrap();

    let tools = MainFrame::new(&env, FrameConfig::new("Tools").with_size(200, 300)).unwrap();
    tools.snap_to(&main, AlignFlags::LEFT_TO_RIGHT).unwrap();
    tools.open().unwrap();
    assert_eq!(tools.bounds().unwrap(), Rect::new(500, 100, 200, 300));

    let log = MainFrame::new(&env, FrameConfig::new("Log").with_size(400, 100)).unwrap();
    log.snap_to(&main, AlignFlags::TOP_TO_BOTTOM | AlignFlags::RIGHT_TO_RIGHT).unwrap();
    log.open().unwrap();
    assert_eq!(log.bounds().unwrap(), Rect::new(100, 400, 400, 100));
}

#[test]
fn test_layout_group_justifies_labels() {
    let env = Environment::with_defaults();
    let frame = MainFrame::new(&env, FrameConfig::new("Address")).unwrap();
    let group = frame.layout_group(
        Some(Attachment::percent(0, 10)),
        Some(Attachment::percent(100, -10)),
        Some(Attachment::percent(0, 10)),
    );

    let controls = env.controls();
    let mut rows = Vec::new();
    for text in ["Name:", "Address:", "Zip:"] {
        let label = controls.create(ControlKind::Label, Some(frame.shell()), Style::NONE).unwrap();
        controls.set_text(label, text).unwrap();
        let field = controls.create(ControlKind::Text, Some(frame.shell()), Style::BORDER).unwrap();
        group.add_pair(label, field, None).unwrap();
        rows.push((label, field));
    }
    frame.open().unwrap();
    assert_eq!(group.phase(), AdjustPhase::Adjusted);

    let label_bounds: Vec<Rect> = rows.iter().map(|&(l, _)| controls.bounds(l).unwrap()).collect();
    let field_bounds: Vec<Rect> = rows.iter().map(|&(_, f)| controls.bounds(f).unwrap()).collect();

    // "Address:" is the widest label and keeps the left attachment.
    assert_eq!(label_bounds[1].x, 10);
    assert!(label_bounds.iter().all(|b| b.right() == label_bounds[1].right()));
    assert!(field_bounds.iter().all(|b| b.x == label_bounds[1].right() + 5));
    assert!(field_bounds.iter().all(|b| b.right() == 390));

    assert_eq!(label_bounds[0].y, 10);
    assert_eq!(label_bounds[1].y, field_bounds[0].bottom() + 20);
    assert_eq!(label_bounds[2].y, field_bounds[1].bottom() + 20);
    assert_eq!(field_bounds[2].y, label_bounds[2].y);
}

#[test]
fn test_removed_row_closes_the_gap() {
    let env = Environment::with_defaults();
    let frame = MainFrame::new(&env, FrameConfig::new("Form")).unwrap();
    let group = frame.layout_group(Some(Attachment::percent(0, 10)), None, Some(Attachment::percent(0, 10)));

    let controls = env.controls();
    let mut labels = Vec::new();
    let mut fields = Vec::new();
    for text in ["One:", "Two:", "Three:"] {
        let label = controls.create(ControlKind::Label, Some(frame.shell()), Style::NONE).unwrap();
        controls.set_text(label, text).unwrap();
        let field = controls.create(ControlKind::Text, Some(frame.shell()), Style::NONE).unwrap();
        group.add_pair(label, field, None).unwrap();
        labels.push(label);
        fields.push(field);
    }

    group.remove_pair(labels[1]).unwrap();
    controls.dispose(labels[1]).unwrap();
    controls.dispose(fields[1]).unwrap();
    frame.open().unwrap();

    assert_eq!(group.labels(), vec![labels[0], labels[2]]);
    assert_eq!(group.controls(), vec![fields[0], fields[2]]);
    assert_eq!(
        controls.bounds(labels[2]).unwrap().y,
        controls.bounds(fields[0]).unwrap().bottom() + 20
    );
}

#[test]
fn test_last_label_returns_to_left_edge() {
    let env = Environment::with_defaults();
    let frame = MainFrame::new(&env, FrameConfig::new("Form")).unwrap();
    let group = frame.layout_group(
        Some(Attachment::percent(0, 10)),
        Some(Attachment::percent(100, -10)),
        Some(Attachment::percent(0, 10)),
    );

    let controls = env.controls();
    let mut rows = Vec::new();
    for text in ["A very long label:", "Zip:"] {
        let label = controls.create(ControlKind::Label, Some(frame.shell()), Style::NONE).unwrap();
        controls.set_text(label, text).unwrap();
        let field = controls.create(ControlKind::Text, Some(frame.shell()), Style::BORDER).unwrap();
        group.add_pair(label, field, None).unwrap();
        rows.push((label, field));
    }
    frame.open().unwrap();
    assert_eq!(group.phase(), AdjustPhase::Adjusted);
    let (zip_label, zip_field) = rows[1];
    assert!(controls.bounds(zip_label).unwrap().x > 10);

    let (long_label, long_field) = rows[0];
    group.remove_pair(long_label).unwrap();
    controls.dispose(long_label).unwrap();
    controls.dispose(long_field).unwrap();
    assert_eq!(group.phase(), AdjustPhase::Provisional);

    controls.layout(frame.shell()).unwrap();
    controls.paint(frame.shell()).unwrap();
    assert_eq!(group.phase(), AdjustPhase::Adjusted);

    let data = controls.layout_data(zip_label).unwrap().unwrap();
    assert_eq!(data.left, Some(Attachment::percent(0, 10)));
    assert_eq!(data.right, None);
    let label_bounds = controls.bounds(zip_label).unwrap();
    assert_eq!(label_bounds.x, 10);
    assert_eq!(label_bounds.y, 10);
    assert_eq!(controls.bounds(zip_field).unwrap().x, label_bounds.right() + 5);
}

#[test]
fn test_triplet_shares_the_row() {
    let env = Environment::with_defaults();
    let frame = MainFrame::new(&env, FrameConfig::new("Address")).unwrap();
    let group = frame.layout_group(
        Some(Attachment::percent(0, 10)),
        Some(Attachment::percent(100, -10)),
        Some(Attachment::percent(0, 10)),
    );

    let controls = env.controls();
    let name_label = controls.create(ControlKind::Label, Some(frame.shell()), Style::NONE).unwrap();
    controls.set_text(name_label, "Name:").unwrap();
    let name = controls.create(ControlKind::Text, Some(frame.shell()), Style::BORDER).unwrap();
    group.add_pair(name_label, name, None).unwrap();

    let city_label = controls.create(ControlKind::Label, Some(frame.shell()), Style::NONE).unwrap();
    controls.set_text(city_label, "Zip/City:").unwrap();
    let zip = controls.create(ControlKind::Text, Some(frame.shell()), Style::BORDER).unwrap();
    let city = controls.create(ControlKind::Text, Some(frame.shell()), Style::BORDER).unwrap();
    group.add_triplet(city_label, zip, city, None).unwrap();
    frame.open().unwrap();

    assert_eq!(group.labels(), vec![name_label, city_label]);
    assert_eq!(group.controls(), vec![name, zip]);

    let label = controls.bounds(city_label).unwrap();
    let first = controls.bounds(zip).unwrap();
    let second = controls.bounds(city).unwrap();
    assert_eq!(first.x, label.right() + 5);
    assert_eq!(first.right(), second.x - 5);
    assert_eq!(second.right(), 390);
    assert_eq!(first.y, label.y);
    assert_eq!(second.y, label.y);
    assert_eq!(label.y, controls.bounds(name).unwrap().bottom() + 20);
}
