// Copyright 2025 the Sluice Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor updates, scrollbars, remote frames, cancellation and teardown.

mod common;

use common::{Recorder, add, iframe, page};
use kurbo::{Point, Rect, Vec2};
use sluice_input::{Cursor, EventHandler, EventKind, MouseEvent, PlatformInput, PointerButtons};
use sluice_tree::{
    CursorIcon, ElementKind, NodeDesc, NodeFlags, NodeState, ScrollState,
};

#[test]
fn cursor_updates_are_coalesced_and_deduplicated() {
    let (mut page, doc) = page(300.0, 300.0);
    add(
        &mut page,
        doc,
        NodeDesc::of_kind(ElementKind::Link, Rect::new(0.0, 0.0, 100.0, 20.0))
            .with_url("https://example.com/"),
    );
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let moved = |x, t| MouseEvent::moved(Point::new(x, 10.0)).at(t);
    input.handle_mouse_move(&mut page, &mut host, &moved(10.0, 0));
    input.handle_mouse_move(&mut page, &mut host, &moved(11.0, 5));
    assert!(!input.update_cursor(&mut page, &mut host, 10), "interval not elapsed");
    assert!(input.update_cursor(&mut page, &mut host, 20));
    assert_eq!(host.cursors, vec![Cursor::Icon(CursorIcon::Pointer)]);

    input.handle_mouse_move(&mut page, &mut host, &moved(12.0, 25));
    assert!(!input.update_cursor(&mut page, &mut host, 45), "unchanged cursor is not resent");

    input.handle_mouse_move(&mut page, &mut host, &moved(200.0, 50));
    input.tick(&mut page, &mut host, 70);
    assert_eq!(
        host.cursors,
        vec![Cursor::Icon(CursorIcon::Pointer), Cursor::default()]
    );
}

#[test]
fn style_changes_need_an_explicit_cursor_update() {
    let (mut page, doc) = page(300.0, 300.0);
    let link = add(
        &mut page,
        doc,
        NodeDesc::of_kind(ElementKind::Link, Rect::new(0.0, 0.0, 100.0, 20.0))
            .with_url("https://example.com/"),
    );
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    let moved = PlatformInput::MouseMove(MouseEvent::moved(Point::new(10.0, 10.0)));
    assert!(!input.handle_platform_input(&mut page, &mut host, &moved));
    assert_eq!(input.hovered(), Some(link));
    assert!(input.update_cursor(&mut page, &mut host, 20));

    page.set_cursor_override(link, Some(CursorIcon::Wait));
    assert!(!input.update_cursor(&mut page, &mut host, 40), "nothing scheduled");
    input.schedule_cursor_update(40);
    assert!(!input.update_cursor(&mut page, &mut host, 50));
    assert!(input.update_cursor(&mut page, &mut host, 60));
    assert_eq!(
        host.cursors,
        vec![Cursor::Icon(CursorIcon::Pointer), Cursor::Icon(CursorIcon::Wait)]
    );
}

#[test]
fn dragging_a_scrollbar_scrolls_without_clicking() {
    let (mut page, doc) = page(300.0, 300.0);
    let scroller = add(
        &mut page,
        doc,
        NodeDesc::element(Rect::new(0.0, 0.0, 100.0, 100.0)).with_scroll(ScrollState {
            offset: Vec2::ZERO,
            max_offset: Vec2::new(0.0, 100.0),
            scrollbar: Some(Rect::new(90.0, 0.0, 100.0, 100.0)),
        }),
    );
    let mut host = Recorder::new();
    let mut input = EventHandler::default();

    input.handle_mouse_down(&mut page, &mut host, &MouseEvent::down(Point::new(95.0, 10.0)));
    let ev = MouseEvent::moved(Point::new(95.0, 20.0)).with_buttons(PointerButtons::PRIMARY);
    assert!(input.handle_mouse_move(&mut page, &mut host, &ev));
    // 10px of thumb travel over a 100px track of 200px content.
    assert_eq!(page.scroll(scroller).unwrap().offset, Vec2::new(0.0, 20.0));
    input.handle_mouse_up(&mut page, &mut host, &MouseEvent::up(Point::new(95.0, 20.0)));

    assert_eq!(host.targets(EventKind::MouseDown), vec![scroller]);
    assert_eq!(host.count(EventKind::MouseMove), 0);
    assert_eq!(host.count(EventKind::Click), 0);
    assert!(!input.is_mouse_pressed());
}

#[test]
fn remote_and_unready_frames_are_opaque() {
    let (mut page, doc) = page(300.0, 300.0);
    let (owner, child, child_doc) = iframe(&mut page, doc, Rect::new(0.0, 0.0, 100.0, 100.0));
    add(&mut page, child_doc, NodeDesc::element(Rect::new(0.0, 0.0, 50.0, 50.0)));
    let mut host = Recorder::new();
    let mut input = EventHandler::default();
    let p = Point::new(10.0, 10.0);

    page.set_remote(child, true);
    input.handle_mouse_move(&mut page, &mut host, &MouseEvent::moved(p));
    assert_eq!(input.hovered(), Some(owner));

    page.set_remote(child, false);
    page.set_layout_ready(child, false);
    host.clear_log();
    input.handle_mouse_down(&mut page, &mut host, &MouseEvent::down(p));
    assert_eq!(host.targets(EventKind::MouseDown), vec![owner]);
}

#[test]
fn cancelling_drops_the_press_without_a_click() {
    let (mut page, doc) = page(300.0, 300.0);
    let a = add(&mut page, doc, NodeDesc::element(Rect::new(0.0, 0.0, 50.0, 50.0)));
    let mut host = Recorder::new();
    let mut input = EventHandler::default();
    let p = Point::new(10.0, 10.0);

    input.handle_mouse_down(&mut page, &mut host, &MouseEvent::down(p));
    assert!(page.state(a).contains(NodeState::ACTIVE | NodeState::HOVER));
    input.cancel_active_sequence(&mut page, &mut host);
    assert!(!input.is_mouse_pressed());
    assert_eq!(input.hovered(), None);
    assert!(page.state(a).is_empty());

    input.handle_mouse_up(&mut page, &mut host, &MouseEvent::up(p));
    assert_eq!(host.count(EventKind::Click), 0);
}

#[test]
fn teardown_forgets_focus_without_blur() {
    let (mut page, doc) = page(300.0, 300.0);
    let field = add(
        &mut page,
        doc,
        NodeDesc::element(Rect::new(0.0, 0.0, 50.0, 50.0))
            .with_flags(NodeFlags::FOCUSABLE),
    );
    let mut host = Recorder::new();
    let mut input = EventHandler::default();
    let p = Point::new(10.0, 10.0);

    input.handle_mouse_down(&mut page, &mut host, &MouseEvent::down(p));
    assert_eq!(input.focused(), Some(field));
    input.teardown(&mut page, &mut host);

    assert_eq!(input.focused(), None);
    assert_eq!(host.count(EventKind::Blur), 0);
    assert!(!page.state(field).contains(NodeState::FOCUS));
    assert!(!page.state(doc).contains(NodeState::FOCUS_WITHIN));
    assert!(!input.is_mouse_pressed());
}
