// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `branch_events` crate.
//!
//! These drive an [`EventRouter`] through a real [`Document`], checking
//! listener ordering, chain short-circuiting and the lifetime of native
//! subscriptions.

use std::cell::RefCell;
use std::rc::Rc;

use branch_dom::{Document, Element, EventType, NativeEvent, NodeId};
use branch_events::{BROWSER_EVENTS, ContextId, EventRouter, ListenerFn, RouterOptions, listener};
use kurbo::{Point, Size, Vec2};

type Log = Rc<RefCell<Vec<&'static str>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn setup() -> (Rc<Document>, NodeId, Rc<EventRouter>) {
    init_tracing();
    let doc = Rc::new(Document::new());
    let div = doc
        .append(doc.body(), Element::at(Vec2::new(5.0, 5.0), Size::new(50.0, 50.0)))
        .unwrap();
    let router = EventRouter::attached(
        doc.clone(),
        ContextId::next(),
        div,
        &["changed"],
        RouterOptions::default(),
    )
    .unwrap();
    (doc, div, router)
}

fn recorder(log: &Log, name: &'static str, ret: Option<bool>) -> ListenerFn {
    let log = log.clone();
    listener(move |_, _| {
        log.borrow_mut().push(name);
        ret
    })
}

#[test]
fn false_halts_the_remaining_chain() {
    let (_, _, router) = setup();
    let log = Log::default();
    router.register("changed", None, recorder(&log, "A", None));
    router.register("changed", None, recorder(&log, "B", Some(false)));
    router.register("changed", None, recorder(&log, "C", Some(true)));

    assert_eq!(router.trigger("changed"), Some(false));
    assert_eq!(*log.borrow(), ["A", "B"]);
}

#[test]
fn last_return_value_is_reported() {
    let (_, _, router) = setup();
    let log = Log::default();
    router.register("changed", None, recorder(&log, "A", Some(true)));
    router.register("changed", None, recorder(&log, "B", None));
    assert_eq!(router.trigger("changed"), None);

    router.register("changed", None, recorder(&log, "C", Some(true)));
    assert_eq!(router.trigger("changed"), Some(true));
}

#[test]
fn priority_listeners_precede_plain_ones_registered_before_and_after() {
    let (_, _, router) = setup();
    let log = Log::default();
    router.register("changed", None, recorder(&log, "plain-1", None));
    router.register_priority("changed", None, recorder(&log, "priority", None));
    router.register("changed", None, recorder(&log, "plain-2", None));

    router.trigger("changed");
    assert_eq!(*log.borrow(), ["priority", "plain-1", "plain-2"]);
}

#[test]
fn registration_net_effect_is_independent_of_dispatch() {
    let quiet = |ops: &[(bool, usize)], dispatch_between: bool| {
        let (_, _, router) = setup();
        let contexts: Vec<ContextId> = (0..3).map(|_| ContextId::next()).collect();
        let callbacks: Vec<ListenerFn> = (0..3).map(|_| listener(|_, _| None)).collect();
        for &(add, i) in ops {
            if add {
                router.register("changed", Some(contexts[i]), callbacks[i].clone());
            } else {
                router.unregister("changed", Some(contexts[i]), Some(&callbacks[i]));
            }
            if dispatch_between {
                router.trigger("changed");
            }
        }
        router
            .listener_contexts("changed")
            .into_iter()
            .map(|ctx| contexts.iter().position(|c| *c == ctx))
            .collect::<Vec<_>>()
    };

    let ops = [
        (true, 0),
        (true, 1),
        (false, 0),
        (true, 2),
        (true, 0),
        (false, 1),
        (false, 1),
        (true, 1),
    ];
    let plain = quiet(&ops, false);
    assert_eq!(plain, quiet(&ops, true));
    assert_eq!(plain, [Some(2), Some(0), Some(1)]);
}

#[test]
fn native_input_reaches_the_matching_channel() {
    let (doc, div, router) = setup();
    let log = Log::default();
    router.register("mousedown", None, recorder(&log, "down", None));
    router.register("mouseup", None, recorder(&log, "up", None));

    doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::new(6.0, 6.0)));
    assert_eq!(*log.borrow(), ["down"]);
}

#[test]
fn removing_the_node_silences_the_router() {
    let (doc, div, router) = setup();
    let log = Log::default();
    router.register("click", None, recorder(&log, "click", None));
    assert_eq!(doc.subscription_count(div), BROWSER_EVENTS.len() + 1);

    doc.remove_node(div).unwrap();
    assert_eq!(doc.subscription_count(div), 0);
    let ev = doc.fire(NativeEvent::mouse(EventType::Click, div, Point::ZERO));
    assert!(!ev.propagation_stopped());
    assert!(log.borrow().is_empty());
}

#[test]
fn detaching_the_node_silences_the_router() {
    let (doc, div, router) = setup();
    let log = Log::default();
    router.register("click", None, recorder(&log, "click", None));

    assert_eq!(doc.stop_observing_node(div), BROWSER_EVENTS.len() + 1);
    doc.fire(NativeEvent::mouse(EventType::Click, div, Point::ZERO));
    assert!(log.borrow().is_empty());
}

#[test]
fn routers_sharing_a_node_keep_separate_subscriptions() {
    let (doc, div, first) = setup();
    let second = EventRouter::attached(
        doc.clone(),
        ContextId::next(),
        div,
        &[],
        RouterOptions::default().with_fall_through(true),
    )
    .unwrap();
    assert_eq!(doc.subscription_count(div), 2 * (BROWSER_EVENTS.len() + 1));

    first.destroy();
    assert_eq!(doc.subscription_count(div), BROWSER_EVENTS.len() + 1);

    let log = Log::default();
    second.register("mouseover", None, recorder(&log, "over", None));
    doc.fire(NativeEvent::mouse(EventType::MouseOver, div, Point::ZERO));
    assert_eq!(*log.borrow(), ["over"]);
}

#[test]
fn unload_tears_down_every_router() {
    let (doc, div, router) = setup();
    let log = Log::default();
    router.register("click", None, recorder(&log, "click", None));
    doc.unload();
    doc.fire(NativeEvent::mouse(EventType::Click, div, Point::ZERO));
    assert!(log.borrow().is_empty());
    assert_eq!(doc.native_listener_count(div), 0);
}
