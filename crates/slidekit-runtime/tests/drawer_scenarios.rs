//! End-to-end drawer scenarios driven through the public gesture, command
//! and frame APIs against headless surfaces.

use std::time::Duration;

use slidekit_core::gesture::{GesturePhase, GestureSample, Recognizer, RecognizerSet};
use slidekit_core::{DrawerConfig, Size};
use slidekit_runtime::{ContentSurface, Drawer, DrawerCommand, DrawerState, EventBus, HeadlessSurface};

const FRAME: Duration = Duration::from_millis(16);
const MAX_FRAMES: usize = 240;

struct Fixture {
    drawer: Drawer<HeadlessSurface>,
    main: HeadlessSurface,
    aux: HeadlessSurface,
}

fn fixture_with(config: DrawerConfig) -> Fixture {
    let main = HeadlessSurface::new();
    let aux = HeadlessSurface::new();
    let drawer = Drawer::new(
        config,
        Size::new(300.0, 600.0),
        main.clone(),
        Some(aux.clone()),
    );
    Fixture { drawer, main, aux }
}

fn fixture() -> Fixture {
    fixture_with(DrawerConfig::default())
}

fn edge(drawer: &mut Drawer<HeadlessSurface>, phase: GesturePhase, x: f64) -> bool {
    drawer.handle_gesture(Recognizer::EdgePan, GestureSample::at(phase, x))
}

fn free(drawer: &mut Drawer<HeadlessSurface>, phase: GesturePhase, dx: f64) -> bool {
    drawer.handle_gesture(Recognizer::FreePan, GestureSample::moved(phase, dx))
}

fn open(f: &mut Fixture) {
    assert!(f.drawer.toggle());
    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Open);
}

#[test]
fn edge_drag_past_threshold_opens_to_inset() {
    let mut f = fixture();

    assert!(edge(&mut f.drawer, GesturePhase::Began, 2.0));
    assert!(edge(&mut f.drawer, GesturePhase::Changed, 250.0));
    assert!(f.drawer.is_attached(f.aux.id()));
    assert_eq!(f.main.offset_x(), 250.0);
    assert!(f.main.has_shadow());

    assert!(edge(&mut f.drawer, GesturePhase::Ended, 250.0));
    assert_eq!(f.drawer.state(), DrawerState::Opening);

    let frames = f.drawer.settle(FRAME, MAX_FRAMES);
    assert!(frames < MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Open);
    assert_eq!(f.main.offset_x(), 220.0);
    assert_eq!(
        f.drawer.recognizers(),
        RecognizerSet::FREE_PAN | RecognizerSet::TAP
    );
}

#[test]
fn edge_drag_short_of_threshold_snaps_back() {
    let mut f = fixture();

    edge(&mut f.drawer, GesturePhase::Began, 2.0);
    edge(&mut f.drawer, GesturePhase::Changed, 50.0);
    edge(&mut f.drawer, GesturePhase::Ended, 50.0);
    assert_eq!(f.drawer.state(), DrawerState::Closing);

    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Closed);
    assert!(!f.drawer.is_attached(f.aux.id()));
    assert!(!f.aux.is_in_tree());
    assert_eq!(f.main.offset_x(), 0.0);
    assert!(!f.main.has_shadow());
    assert_eq!(f.drawer.recognizers(), RecognizerSet::EDGE_PAN);
}

#[test]
fn edge_pan_is_not_delivered_once_open() {
    let mut f = fixture();
    open(&mut f);
    assert!(!edge(&mut f.drawer, GesturePhase::Began, 10.0));
    assert_eq!(f.drawer.state(), DrawerState::Open);
}

#[test]
fn free_drag_past_center_closes_immediately() {
    let mut f = fixture();
    open(&mut f);

    assert!(free(&mut f.drawer, GesturePhase::Began, 0.0));
    assert!(free(&mut f.drawer, GesturePhase::Changed, -20.0));
    assert_eq!(f.drawer.state(), DrawerState::Dragging(slidekit_runtime::DragSource::Free));
    assert_eq!(f.main.offset_x(), 200.0);

    assert!(free(&mut f.drawer, GesturePhase::Changed, -75.0));
    assert_eq!(f.drawer.state(), DrawerState::Closing);

    // The recognizer is disabled while closing; the rest of the drag is dropped.
    assert!(!free(&mut f.drawer, GesturePhase::Ended, -75.0));

    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Closed);
    assert_eq!(f.main.offset_x(), 0.0);
}

#[test]
fn free_drag_release_closes_without_threshold() {
    let mut f = fixture();
    open(&mut f);

    free(&mut f.drawer, GesturePhase::Began, 0.0);
    free(&mut f.drawer, GesturePhase::Changed, 40.0);
    assert_eq!(f.main.offset_x(), 260.0);
    free(&mut f.drawer, GesturePhase::Ended, 40.0);
    assert_eq!(f.drawer.state(), DrawerState::Closing);
}

#[test]
fn tap_dismisses_open_drawer() {
    let mut f = fixture();
    open(&mut f);
    assert!(
        f.drawer
            .handle_gesture(Recognizer::Tap, GestureSample::at(GesturePhase::Ended, 260.0))
    );
    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Closed);
}

#[test]
fn toggle_closed_opens_and_open_closes() {
    let mut f = fixture();
    open(&mut f);

    assert!(f.drawer.toggle());
    assert_eq!(f.drawer.state(), DrawerState::Closing);
    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Closed);
}

#[test]
fn toggle_while_busy_is_ignored() {
    let mut f = fixture();

    assert!(f.drawer.toggle());
    assert_eq!(f.drawer.state(), DrawerState::Opening);
    assert!(!f.drawer.toggle());
    assert_eq!(f.drawer.state(), DrawerState::Opening);

    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Open);

    assert!(f.drawer.toggle());
    assert!(!f.drawer.toggle());
    assert_eq!(f.drawer.state(), DrawerState::Closing);
    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Closed);
}

#[test]
fn round_trip_restores_attachments() {
    let mut f = fixture();
    let before: Vec<_> = f.drawer.attachments().iter().collect();

    edge(&mut f.drawer, GesturePhase::Began, 0.0);
    edge(&mut f.drawer, GesturePhase::Changed, 180.0);
    edge(&mut f.drawer, GesturePhase::Ended, 180.0);
    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Open);
    assert_eq!(f.drawer.attachments().len(), 2);

    f.drawer.close();
    f.drawer.settle(FRAME, MAX_FRAMES);

    let after: Vec<_> = f.drawer.attachments().iter().collect();
    assert_eq!(before, after);
    assert_eq!(f.drawer.state(), DrawerState::Closed);
}

#[test]
fn instant_config_completes_on_next_tick() {
    let mut f = fixture_with(DrawerConfig::instant());

    assert!(f.drawer.toggle());
    assert_eq!(f.main.offset_x(), 220.0);
    assert_eq!(f.drawer.state(), DrawerState::Opening);

    assert_eq!(f.drawer.tick(Duration::ZERO), 1);
    assert_eq!(f.drawer.state(), DrawerState::Open);
}

#[test]
fn commands_from_bus_respect_busy_policy() {
    let bus = EventBus::new("togglePanel");
    let Fixture { drawer, main, .. } = fixture();
    let mut drawer = drawer.with_commands(&bus);

    bus.publish(&DrawerCommand::Toggle);
    bus.publish(&DrawerCommand::Toggle);
    assert_eq!(drawer.pump(), 2);
    assert_eq!(drawer.state(), DrawerState::Opening);

    drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(drawer.state(), DrawerState::Open);
    assert_eq!(main.offset_x(), 220.0);

    bus.publish(&DrawerCommand::Close);
    drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(drawer.state(), DrawerState::Closed);
}

#[test]
fn swap_from_open_lands_closed_with_new_main() {
    let mut f = fixture();
    open(&mut f);

    let next = HeadlessSurface::new();
    assert!(f.drawer.swap_main_surface(next.clone()).is_ok());
    assert_eq!(f.drawer.state(), DrawerState::Closing);
    let order: Vec<_> = f.drawer.attachments().iter().collect();
    assert_eq!(order, vec![f.aux.id(), f.main.id(), next.id()]);

    f.drawer.settle(FRAME, MAX_FRAMES);
    assert_eq!(f.drawer.state(), DrawerState::Closed);
    assert_eq!(f.drawer.main_surface().id(), next.id());
    assert!(!f.drawer.is_attached(f.main.id()));
    assert!(!f.drawer.is_attached(f.aux.id()));
    assert_eq!(f.drawer.attachments().len(), 1);
    assert_eq!(f.drawer.recognizers(), RecognizerSet::EDGE_PAN);

    // The new main surface drives the drawer like the old one did.
    edge(&mut f.drawer, GesturePhase::Began, 0.0);
    edge(&mut f.drawer, GesturePhase::Changed, 150.0);
    assert_eq!(next.offset_x(), 150.0);
}

#[test]
fn missing_auxiliary_never_leaves_closed() {
    let main = HeadlessSurface::new();
    let mut drawer: Drawer<HeadlessSurface> =
        Drawer::new(DrawerConfig::default(), Size::new(300.0, 600.0), main, None);

    assert!(drawer.recognizers().is_empty());
    assert!(!edge(&mut drawer, GesturePhase::Began, 0.0));
    assert!(!drawer.toggle());
    assert_eq!(drawer.state(), DrawerState::Closed);
}
