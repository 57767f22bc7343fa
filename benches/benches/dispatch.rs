// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use branch_dom::{Document, Element, EventType, NativeEvent, NodeId};
use branch_events::{ContextId, Event, EventRouter, RouterOptions, listener};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};

fn router_with(listeners: usize, options: RouterOptions) -> (Rc<Document>, NodeId, Rc<EventRouter>) {
    let doc = Rc::new(Document::new());
    let div = doc
        .append(doc.body(), Element::at(Vec2::new(8.0, 8.0), Size::new(400.0, 300.0)))
        .unwrap();
    let router = EventRouter::attached(doc.clone(), ContextId::next(), div, &["custom"], options).unwrap();
    for i in 0..listeners {
        let ctx = ContextId::next();
        for channel in ["custom", "mousemove"] {
            router.register(channel, Some(ctx), listener(move |_, ev| Some(black_box(ev.xy).is_some() || i % 2 == 0)));
        }
    }
    (doc, div, router)
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch_events");

    for &n in &[1_usize, 8, 64] {
        let (_doc, _div, router) = router_with(n, RouterOptions::default());
        group.bench_function(format!("dispatch_custom(n={n})"), |b| {
            b.iter(|| black_box(router.dispatch("custom", &mut Event::new())));
        });
    }

    let (_doc, _div, router) = router_with(0, RouterOptions::default());
    group.bench_function("dispatch_empty", |b| {
        b.iter(|| black_box(router.trigger("custom")));
    });

    for include_xy in [false, true] {
        let options = RouterOptions::default().with_include_xy(include_xy);
        let (doc, div, _router) = router_with(8, options);
        group.bench_function(format!("fire_mousemove(include_xy={include_xy})"), |b| {
            let mut x = 0.0;
            b.iter(|| {
                x = (x + 1.0) % 400.0;
                black_box(doc.fire(NativeEvent::mouse(EventType::MouseMove, div, Point::new(x, 20.0))))
            });
        });
    }

    group.bench_function("register_unregister", |b| {
        let (_doc, _div, router) = router_with(8, RouterOptions::default());
        let cb = listener(|_, _| None);
        b.iter(|| {
            let handle = router.register("custom", None, cb.clone());
            black_box(handle.is_some_and(|h| router.unregister_handle(&h)))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch);
criterion_main!(benches);
