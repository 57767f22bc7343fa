// Copyright 2025 the Branch Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::rc::Rc;

use branch_dom::{Document, Element, EventType, NativeEvent, Position};
use branch_handler::{Callbacks, Control, ControlBase, DragEvent, DragOptions, DragRecognizer};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Point, Size, Vec2};

fn setup(position: Position) -> (Rc<ControlBase>, DragRecognizer<ControlBase>) {
    let doc = Rc::new(Document::new());
    let div = doc
        .append(
            doc.body(),
            Element::at(Vec2::new(20.0, 20.0), Size::new(200.0, 200.0)).with_position(position),
        )
        .unwrap();
    let control = Rc::new(ControlBase::new(doc, div));
    let callbacks = Callbacks::new().on("move", |control: &ControlBase, ev: &DragEvent| {
        black_box((control.div(), ev.xy()));
    });
    let drag = DragRecognizer::new(control.clone(), callbacks, DragOptions::default()).unwrap();
    drag.activate();
    (control, drag)
}

fn gesture(control: &ControlBase, moves: u32) {
    let doc = control.document();
    let div = control.div();
    doc.fire(NativeEvent::mouse(EventType::MouseDown, div, Point::new(30.0, 30.0)));
    for i in 0..moves {
        let p = Point::new(30.0 + f64::from(i % 150), 30.0 + f64::from(i % 90));
        doc.fire(NativeEvent::mouse(EventType::MouseMove, div, p));
    }
    black_box(doc.fire(NativeEvent::mouse(EventType::MouseUp, div, Point::new(40.0, 40.0))));
}

fn bench_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("branch_handler");

    for (label, position) in [("anchored", Position::Static), ("document", Position::Absolute)] {
        let (control, _drag) = setup(position);
        for &moves in &[1_u32, 32, 256] {
            group.bench_function(format!("gesture({label},moves={moves})"), |b| {
                b.iter(|| gesture(&control, moves));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_drag);
criterion_main!(benches);
