//! End-to-end drawer usage through the facade prelude.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use slidekit::prelude::*;

const FRAME: Duration = Duration::from_millis(16);

#[test]
fn bus_driven_drawer_reports_lifecycle_events() {
    let commands = EventBus::new("togglePanel");
    let events = EventBus::new("drawer-events");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let _sub = events.subscribe(move |event: &DrawerEvent| sink.borrow_mut().push(*event));

    let main = HeadlessSurface::new();
    let aux = HeadlessSurface::new();
    let mut drawer = Drawer::new(
        DrawerConfig::default(),
        Size::new(300.0, 600.0),
        main.clone(),
        Some(aux.clone()),
    )
    .with_commands(&commands)
    .with_events(events.clone());

    commands.publish(&DrawerCommand::Toggle);
    drawer.settle(FRAME, 240);
    assert_eq!(drawer.state(), DrawerState::Open);
    assert!(aux.is_in_tree());
    assert!(main.has_shadow());

    commands.publish(&DrawerCommand::Close);
    drawer.settle(FRAME, 240);
    assert_eq!(drawer.state(), DrawerState::Closed);
    assert!(!aux.is_in_tree());
    assert!(!main.has_shadow());

    let seen = seen.borrow();
    assert!(seen.contains(&DrawerEvent::Opened));
    assert_eq!(seen.last(), Some(&DrawerEvent::Closed));
}

#[test]
fn teardown_returns_detached_surfaces() {
    let main = HeadlessSurface::new();
    let aux = HeadlessSurface::new();
    let mut drawer = Drawer::new(
        DrawerConfig::instant(),
        Size::new(320.0, 640.0),
        main.clone(),
        Some(aux.clone()),
    );
    drawer.handle_gesture(Recognizer::EdgePan, GestureSample::at(GesturePhase::Began, 0.0));
    drawer.handle_gesture(Recognizer::EdgePan, GestureSample::at(GesturePhase::Changed, 40.0));
    assert!(aux.is_in_tree());

    let surfaces = drawer.teardown();
    assert!(!surfaces.main.is_in_tree());
    assert!(surfaces.auxiliary.is_some_and(|aux| !aux.is_in_tree()));
    assert!(!main.has_shadow());
}

#[test]
fn invalid_config_surfaces_as_facade_error() {
    let err: slidekit::Error = Drawer::try_new(
        DrawerConfig::new().with_max_auxiliary_inset(-1.0),
        Size::new(320.0, 640.0),
        HeadlessSurface::new(),
        None,
    )
    .unwrap_err()
    .into();
    assert!(matches!(err, slidekit::Error::Config(_)));
}
