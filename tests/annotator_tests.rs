use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use plot2d::api::{Annotator, ResolvedCallback};
use plot2d::core::{
    ClosestPoint, Marker, PointRef, Projector, ScreenRect, Trace, TraceCollection, Viewport,
};
use plot2d::render::Color;

const WAIT: Duration = Duration::from_secs(10);

fn ramp() -> Vec<f32> {
    (0..256).map(|v| v as f32).collect()
}

fn screen_projector() -> Projector {
    let viewport = Viewport::new(1.0, 0.0, 256.0, 255.0).expect("viewport");
    Projector::for_plot_area(viewport, ScreenRect::new(0, 0, 800, 600)).expect("projector")
}

#[test]
fn nearest_point_on_a_ramp() {
    let marker = Marker::square(0, Color::WHITE);
    let y = ramp();
    let mut traces = TraceCollection::new();
    traces.push(Trace::new(&marker).with_y(&y)).expect("push");

    let found = traces
        .find_closest_point(&screen_projector(), 128.0, 127.0)
        .expect("closest point");
    assert_eq!(found.trace, 0);
    assert!(matches!(found.point, 126 | 127));
}

#[test]
fn worker_publishes_lookup_result() {
    let marker = Marker::square(0, Color::WHITE);
    let y = ramp();
    let mut traces = TraceCollection::new();
    traces.push(Trace::new(&marker).with_y(&y)).expect("push");

    let (done_tx, done_rx) = mpsc::channel::<Option<ClosestPoint>>();
    thread::scope(|scope| {
        let callback: ResolvedCallback<'_> = Box::new(move |found| {
            let _ = done_tx.send(found);
        });
        let mut annotator = Annotator::spawn(scope, &traces, Some(callback)).expect("spawn");
        annotator.notify_cursor_change(128.0, 127.0, screen_projector());

        let found = done_rx.recv_timeout(WAIT).expect("scan finished").expect("hit");
        assert!(matches!(found.point, 126 | 127));
        assert_eq!(annotator.get_highlighted_point(), Some(found));
        assert!(!annotator.is_pending());
        annotator.shutdown().expect("shutdown");
    });
}

#[test]
fn queued_positions_coalesce_into_the_latest() {
    let marker = Marker::square(0, Color::WHITE);
    let y = ramp();
    let mut traces = TraceCollection::new();
    traces.push(Trace::new(&marker).with_y(&y)).expect("push");

    let (done_tx, done_rx) = mpsc::channel::<Option<ClosestPoint>>();
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    thread::scope(|scope| {
        // the callback holds the worker until the test releases the gate
        let callback: ResolvedCallback<'_> = Box::new(move |found| {
            let _ = done_tx.send(found);
            let _ = gate_rx.recv();
        });
        let mut annotator = Annotator::spawn(scope, &traces, Some(callback)).expect("spawn");

        annotator.notify_cursor_change(10.0, 9.0, screen_projector());
        done_rx.recv_timeout(WAIT).expect("first scan");
        assert_eq!(annotator.scan_count(), 1);

        for step in 0..50 {
            annotator.notify_cursor_change(20.0 + f64::from(step), 19.0 + f64::from(step), screen_projector());
        }
        annotator.notify_cursor_change(201.0, 200.0, screen_projector());
        assert!(annotator.is_pending());
        gate_tx.send(()).expect("release first callback");

        let found = done_rx.recv_timeout(WAIT).expect("second scan").expect("hit");
        assert_eq!(found.point_ref(), PointRef::new(0, 200));
        assert_eq!(annotator.scan_count(), 2);
        drop(gate_tx);

        annotator.shutdown().expect("shutdown");
        assert_eq!(annotator.scan_count(), 2);
    });
}

#[test]
fn lookup_outside_every_trace_publishes_no_result() {
    let marker = Marker::square(0, Color::WHITE);
    let y = [1000.0f32];
    let mut traces = TraceCollection::new();
    traces.push(Trace::new(&marker).with_y(&y)).expect("push");

    let (done_tx, done_rx) = mpsc::channel::<Option<ClosestPoint>>();
    thread::scope(|scope| {
        let callback: ResolvedCallback<'_> = Box::new(move |found| {
            let _ = done_tx.send(found);
        });
        let annotator = Annotator::spawn(scope, &traces, Some(callback)).expect("spawn");
        annotator.notify_cursor_change(1.0, 1.0, screen_projector());
        assert_eq!(done_rx.recv_timeout(WAIT).expect("scan finished"), None);
        assert_eq!(annotator.get_highlighted_point(), None);
    });
}
