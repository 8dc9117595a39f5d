// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gestures: taps and touch adjustment, scroll chains, long press, pinch.

mod common;

use common::{Recorder, add, iframe, iframe_with, page};
use kurbo::{Point, Rect, Size, Vec2};
use sluice_input::{
    DragConfig, EventHandler, EventKind, GestureEvent, GestureKind, Granularity, InputConfig,
    MouseEvent, Outcome, PinchConfig, TouchAdjustConfig, WheelEvent,
};
use sluice_tree::{ElementKind, FrameDesc, NodeDesc, NodeFlags, Page, ScrollState};

const FINGER: Size = Size::new(20.0, 20.0);

fn clickable(bounds: Rect) -> NodeDesc {
    NodeDesc::element(bounds).with_flags(NodeFlags::CLICKABLE)
}

fn tap_at(p: Point) -> GestureEvent {
    GestureEvent::new(GestureKind::Tap { tap_count: 1 }, p).with_area(FINGER)
}

fn scrolling_page(width: f64, height: f64, max_y: f64) -> (Page, sluice_tree::NodeId) {
    let page = Page::with_main_frame(
        FrameDesc::new(Size::new(width, height)).with_scroll_max(Vec2::new(0.0, max_y)),
    );
    let doc = page.document(page.main_frame()).unwrap();
    (page, doc)
}

#[test]
fn precise_tap_is_a_full_mouse_sequence() {
    let (mut page, doc) = page(200.0, 200.0);
    let button = add(&mut page, doc, clickable(Rect::new(10.0, 10.0, 60.0, 40.0)));
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let tap = GestureEvent::new(GestureKind::Tap { tap_count: 1 }, Point::new(20.0, 20.0));
    input.handle_gesture(&mut page, &mut host, &tap);
    assert_eq!(
        host.sequence(&[
            EventKind::MouseMove,
            EventKind::MouseDown,
            EventKind::MouseUp,
            EventKind::Click
        ]),
        vec![
            (EventKind::MouseMove, button),
            (EventKind::MouseDown, button),
            (EventKind::MouseUp, button),
            (EventKind::Click, button)
        ]
    );
    assert!(!input.is_mouse_pressed());
}

#[test]
fn tap_near_a_button_lands_on_it() {
    let (mut page, doc) = page(200.0, 200.0);
    let button = add(&mut page, doc, clickable(Rect::new(50.0, 50.0, 60.0, 60.0)));
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    input.handle_gesture(&mut page, &mut host, &tap_at(Point::new(45.0, 45.0)));
    assert_eq!(host.targets(EventKind::Click), vec![button]);
}

#[test]
fn negative_area_dimensions_count_as_zero() {
    let (mut page, doc) = page(200.0, 200.0);
    let button = add(&mut page, doc, clickable(Rect::new(50.0, 50.0, 60.0, 60.0)));
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let at = Point::new(47.0, 47.0);
    let tap = |area| GestureEvent::new(GestureKind::Tap { tap_count: 1 }, at).with_area(area);
    input.handle_gesture(&mut page, &mut host, &tap(Size::new(-40.0, 20.0)));
    assert_eq!(host.targets(EventKind::Click), vec![button]);

    host.clear_log();
    input.handle_gesture(&mut page, &mut host, &tap(Size::new(-20.0, -20.0)));
    assert_eq!(host.targets(EventKind::MouseDown), vec![doc], "precise");
    assert!(!host.targets(EventKind::Click).contains(&button));
}

#[test]
fn clickable_container_loses_to_its_clickable_child() {
    let (mut page, doc) = page(200.0, 200.0);
    let container = add(&mut page, doc, clickable(Rect::new(0.0, 0.0, 100.0, 100.0)));
    let span = add(&mut page, container, clickable(Rect::new(40.0, 40.0, 60.0, 60.0)));
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    // The precise point is over the container, but the finger also covers the span.
    input.handle_gesture(&mut page, &mut host, &tap_at(Point::new(35.0, 50.0)));
    assert_eq!(host.targets(EventKind::MouseDown), vec![span]);
    assert_eq!(host.targets(EventKind::Click), vec![span]);
}

#[test]
fn ambiguous_tap_asks_the_chrome() {
    let (mut page, doc) = page(200.0, 200.0);
    let left = add(&mut page, doc, clickable(Rect::new(20.0, 40.0, 30.0, 60.0)));
    let right = add(&mut page, doc, clickable(Rect::new(40.0, 40.0, 50.0, 60.0)));
    let mut host = Recorder::new();
    host.accept_popup = true;
    let config = InputConfig::default().with_touch(TouchAdjustConfig {
        disambiguation_popup: true,
        ..TouchAdjustConfig::default()
    });
    let mut input = EventHandler::new(config);

    input.handle_gesture(&mut page, &mut host, &tap_at(Point::new(35.0, 50.0)));
    assert_eq!(host.popups.len(), 1);
    assert!(host.popups[0].contains(&left) && host.popups[0].contains(&right));
    assert_eq!(host.count(EventKind::Click), 0, "the popup owns the tap");

    // Declined: the topmost of the tied targets wins.
    host.accept_popup = false;
    input.handle_gesture(&mut page, &mut host, &tap_at(Point::new(35.0, 50.0)));
    assert_eq!(host.popups.len(), 2);
    assert_eq!(host.targets(EventKind::Click), vec![right]);
}

#[test]
fn gesture_scroll_bubbles_out_of_an_iframe() {
    let (mut page, doc) = scrolling_page(200.0, 200.0, 500.0);
    let (_, _, child_doc) = iframe_with(
        &mut page,
        doc,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        FrameDesc::new(Size::new(100.0, 100.0)).with_scroll_max(Vec2::new(0.0, 50.0)),
    );
    let list = add(
        &mut page,
        child_doc,
        NodeDesc::element(Rect::new(0.0, 0.0, 100.0, 100.0))
            .with_scroll(ScrollState::with_max(Vec2::new(0.0, 30.0))),
    );
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let at = Point::new(10.0, 10.0);
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::ScrollBegin, at));
    assert_eq!(input.scroll_chain(), Some([list, child_doc].as_slice()));

    let update =
        |dy| GestureEvent::new(GestureKind::ScrollUpdate { delta: Vec2::new(0.0, dy) }, at);
    assert!(input.handle_gesture(&mut page, &mut host, &update(100.0)));
    assert_eq!(page.scroll(list).unwrap().offset, Vec2::new(0.0, 30.0));
    assert_eq!(page.scroll(child_doc).unwrap().offset, Vec2::new(0.0, 50.0));
    assert_eq!(page.scroll(doc).unwrap().offset, Vec2::new(0.0, 20.0));

    // The chain is fixed for the gesture even though the iframe moved away.
    assert!(input.handle_gesture(&mut page, &mut host, &update(1000.0)));
    assert_eq!(page.scroll(doc).unwrap().offset, Vec2::new(0.0, 500.0));
    assert!(!input.handle_gesture(&mut page, &mut host, &update(10.0)));

    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::ScrollEnd, at));
    assert_eq!(input.scroll_chain(), None);
    assert_eq!(
        host.overscroll,
        vec![(Vec2::new(0.0, 530.0), Vec2::new(0.0, 1110.0))]
    );
}

#[test]
fn fully_consumed_scroll_reports_no_overscroll() {
    let (mut page, _doc) = scrolling_page(200.0, 200.0, 500.0);
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let at = Point::new(10.0, 10.0);
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::ScrollBegin, at));
    let update = GestureEvent::new(
        GestureKind::ScrollUpdate {
            delta: Vec2::new(0.05, 100.0),
        },
        at,
    );
    input.handle_gesture(&mut page, &mut host, &update);
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::ScrollEnd, at));
    assert!(host.overscroll.is_empty(), "sub-threshold leftovers are noise");
}

#[test]
fn wheel_falls_back_to_the_parent_frame() {
    let (mut page, doc) = scrolling_page(200.0, 200.0, 500.0);
    let (owner, _, child_doc) = iframe_with(
        &mut page,
        doc,
        Rect::new(0.0, 0.0, 100.0, 100.0),
        FrameDesc::new(Size::new(100.0, 100.0)),
    );
    let mut host = Recorder::new();
    host.listen(&mut page, doc, EventKind::Wheel);
    let mut input = EventHandler::default();

    let wheel = WheelEvent::pixels(Point::new(10.0, 10.0), Vec2::new(0.0, 40.0));
    assert!(input.handle_wheel(&mut page, &mut host, &wheel));
    assert_eq!(host.targets(EventKind::Wheel), vec![child_doc, owner]);
    assert_eq!(page.scroll(doc).unwrap().offset, Vec2::new(0.0, 40.0));
}

#[test]
fn canceled_wheel_does_not_scroll() {
    let (mut page, doc) = scrolling_page(200.0, 200.0, 500.0);
    let mut host = Recorder::new();
    host.prevent(&mut page, doc, EventKind::Wheel);
    let mut input = EventHandler::default();

    let wheel = WheelEvent::pixels(Point::new(10.0, 10.0), Vec2::new(0.0, 40.0));
    assert!(input.handle_wheel(&mut page, &mut host, &wheel));
    assert_eq!(page.scroll(doc).unwrap().offset, Vec2::ZERO);
}

#[test]
fn hover_follows_content_after_a_scroll() {
    let (mut page, doc) = scrolling_page(200.0, 200.0, 500.0);
    let top = add(&mut page, doc, NodeDesc::element(Rect::new(0.0, 0.0, 100.0, 30.0)));
    let below = add(&mut page, doc, NodeDesc::element(Rect::new(0.0, 30.0, 100.0, 60.0)));
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    input.handle_mouse_move(&mut page, &mut host, &MouseEvent::moved(Point::new(10.0, 10.0)));
    assert_eq!(input.hovered(), Some(top));

    let wheel = WheelEvent::pixels(Point::new(10.0, 10.0), Vec2::new(0.0, 30.0));
    input.handle_wheel(&mut page, &mut host, &wheel);
    assert!(input.has_pending_fake_move());
    assert_eq!(input.hovered(), Some(top), "hover waits for the next tick");

    input.tick(&mut page, &mut host, 100);
    assert!(!input.has_pending_fake_move());
    assert_eq!(input.hovered(), Some(below));
}

#[test]
fn long_press_opens_a_context_menu() {
    let (mut page, doc) = page(200.0, 200.0);
    let img = add(
        &mut page,
        doc,
        NodeDesc::of_kind(ElementKind::Image, Rect::new(10.0, 10.0, 60.0, 60.0)),
    );
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let press = GestureEvent::new(GestureKind::LongPress, Point::new(20.0, 20.0)).with_area(FINGER);
    assert!(input.handle_gesture(&mut page, &mut host, &press));
    assert_eq!(host.targets(EventKind::ContextMenu), vec![img]);
    assert_eq!(host.context_menus, vec![img]);
}

#[test]
fn long_press_on_text_selects_a_word() {
    let (mut page, doc) = page(200.0, 200.0);
    let para = add(&mut page, doc, NodeDesc::element(Rect::new(0.0, 0.0, 200.0, 40.0)));
    let text = add(&mut page, para, NodeDesc::text(Rect::new(0.0, 0.0, 150.0, 20.0)));
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let press = GestureEvent::new(GestureKind::LongPress, Point::new(30.0, 10.0));
    input.handle_gesture(&mut page, &mut host, &press);
    assert_eq!(host.selections, vec![(text, Granularity::Word)]);
    assert!(host.context_menus.is_empty());
}

#[test]
fn long_press_drag_defers_the_context_menu_to_long_tap() {
    let (mut page, doc) = page(200.0, 200.0);
    let img = add(
        &mut page,
        doc,
        NodeDesc::of_kind(ElementKind::Image, Rect::new(10.0, 10.0, 60.0, 60.0))
            .with_url("https://example.com/cat.png"),
    );
    let mut host = Recorder::new();
    let config = InputConfig::default().with_drag(DragConfig::default().with_touch_drag_drop(true));
    let mut input = EventHandler::new(config);

    let at = Point::new(20.0, 20.0);
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::LongPress, at));
    assert!(input.drag_session().is_some_and(|s| s.from_touch()));
    assert_eq!(host.native_drags, vec![(at, true)]);
    assert!(host.context_menus.is_empty());

    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::LongTap, at));
    assert!(input.drag_session().is_none());
    assert_eq!(host.targets(EventKind::DragEnd), vec![img]);
    assert_eq!(host.context_menus, vec![img]);
}

#[test]
fn touch_drag_that_loses_its_frame_leaves_no_session() {
    let (mut page, doc) = page(200.0, 200.0);
    let (owner, _, child_doc) = iframe(&mut page, doc, Rect::new(0.0, 0.0, 100.0, 100.0));
    let img = add(
        &mut page,
        child_doc,
        NodeDesc::of_kind(ElementKind::Image, Rect::new(10.0, 10.0, 60.0, 60.0))
            .with_url("https://example.com/cat.png"),
    );
    let mut host = Recorder::new();
    host.listeners
        .add(&mut page, img, EventKind::DragEnter, false, move |page, _, _| {
            page.remove(owner);
            Outcome::Continue
        });
    let config = InputConfig::default().with_drag(DragConfig::default().with_touch_drag_drop(true));
    let mut input = EventHandler::new(config);

    let at = Point::new(20.0, 20.0);
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::LongPress, at));
    assert_eq!(host.targets(EventKind::DragEnter), vec![img]);
    assert!(input.drag_session().is_none(), "a failed first update abandons the drag");

    host.clear_log();
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::LongTap, at));
    assert_eq!(host.count(EventKind::DragEnd), 0);
    assert!(input.drag_session().is_none());
}

#[test]
fn pinch_scale_stays_in_bounds() {
    let (mut page, _) = page(200.0, 200.0);
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let at = Point::new(100.0, 100.0);
    let pinch = |scale| GestureEvent::new(GestureKind::PinchUpdate { scale }, at);
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::PinchBegin, at));
    input.handle_gesture(&mut page, &mut host, &pinch(2.0));
    assert_eq!(page.page_scale(), 2.0);
    input.handle_gesture(&mut page, &mut host, &pinch(10.0));
    assert_eq!(page.page_scale(), 5.0);
    assert!(input.has_pending_fake_move());
    input.handle_gesture(&mut page, &mut host, &pinch(0.01));
    assert_eq!(page.page_scale(), 1.0);
    assert!(!input.handle_gesture(&mut page, &mut host, &pinch(0.5)), "already at the minimum");
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::PinchEnd, at));

    let config = InputConfig::default().with_pinch(PinchConfig {
        min_scale: 1.0,
        max_scale: 3.0,
    });
    let mut input = EventHandler::new(config);
    input.handle_gesture(&mut page, &mut host, &GestureEvent::new(GestureKind::PinchBegin, at));
    input.handle_gesture(&mut page, &mut host, &pinch(4.0));
    assert_eq!(page.page_scale(), 3.0);
}
