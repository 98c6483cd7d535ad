use plot2d::PlotError;
use plot2d::core::{
    AutoscaleBounds, Marker, MarkerSet, PlotView, Projector, Stencil, Trace, TraceCollection,
    Viewport, mask_to_rgba,
};
use plot2d::render::{Color, LayerPrimitives};

fn set_cells(mask: &[u8], width: usize) -> Vec<(usize, usize)> {
    mask.iter()
        .enumerate()
        .filter(|(_, cell)| **cell != 0)
        .map(|(ix, _)| (ix % width, ix / width))
        .collect()
}

#[test]
fn convolving_an_empty_stencil_stays_empty() {
    let stencil = Stencil::new(32, 16);
    let marker = MarkerSet::standard().resolve("w.3").expect("marker").clone();
    assert!(stencil.convolve(&marker).iter().all(|cell| *cell == 0));
}

#[test]
fn single_hit_dilates_into_marker_block() {
    let stencil = Stencil::new(10, 10);
    stencil.hit(5, 5);
    let dilated = stencil.convolve(&Marker::square(1, Color::WHITE));

    let cells = set_cells(&dilated, 10);
    assert_eq!(cells.len(), 9);
    for (x, y) in cells {
        assert!((4..=6).contains(&x) && (4..=6).contains(&y));
    }
}

#[test]
fn dilation_is_clipped_at_the_border() {
    let stencil = Stencil::new(10, 10);
    stencil.hit(0, 9);
    let dilated = stencil.convolve(&Marker::square(1, Color::WHITE));
    assert_eq!(set_cells(&dilated, 10), [(0, 8), (1, 8), (0, 9), (1, 9)]);
}

#[test]
fn out_of_bounds_hits_are_ignored() {
    let stencil = Stencil::new(4, 4);
    stencil.hit(-1, 2);
    stencil.hit(4, 0);
    stencil.hit(1, 100);
    assert!(stencil.is_empty());
}

#[test]
fn masked_trace_rasterizes_only_selected_points() {
    let marker = Marker::square(0, Color::WHITE);
    let y = [10.0f32, 20.0, 30.0, 40.0];
    let mask = [0u16, 1, 0, 1];
    let trace = Trace::new(&marker).with_y(&y).with_mask(&mask, 1);
    trace.validate().expect("valid trace");

    let viewport = Viewport::new(0.0, 0.0, 5.0, 50.0).expect("viewport");
    let projector = Projector::for_stencil(viewport, 50, 50).expect("projector");
    let stencil = Stencil::new(50, 50);
    trace.rasterize(&projector, &stencil);

    // implicit x = index + 1, stencil rows grow downwards
    assert!(stencil.is_set(20, 30));
    assert!(stencil.is_set(40, 10));
    assert!(!stencil.is_set(10, 40));
    assert!(!stencil.is_set(30, 20));
    assert_eq!(set_cells(&stencil.to_mask(), 50).len(), 2);
}

#[test]
fn composited_image_uses_marker_color() {
    let set = MarkerSet::standard();
    let red = set.resolve("r.1").expect("red");
    let y = [0.5f32];
    let mut traces = TraceCollection::new();
    traces.push(Trace::new(red).with_y(&y)).expect("push");

    let viewport = Viewport::new(0.0, 0.0, 2.0, 1.0).expect("viewport");
    let projector = Projector::new(0.0, 0.0, 2.0, 1.0, 0, 20, 20, 0).expect("projector");
    assert_eq!(projector.viewport().expect("viewport"), viewport);

    let mut layer = LayerPrimitives::new();
    assert_eq!(traces.draw(&projector, &mut layer).expect("draw"), 1);
    let image = &layer.images[0].image;
    assert_eq!(image.pixel(10, 10), Some(red.color()));
    assert_eq!(image.pixel(0, 0), Some(Color::TRANSPARENT));
}

#[test]
fn mask_to_rgba_paints_only_set_cells() {
    let image = mask_to_rgba(&[0, 1, 1, 0], 2, 2, Color::BLUE);
    assert_eq!(image.pixel(1, 0), Some(Color::BLUE));
    assert_eq!(image.pixel(0, 0), Some(Color::TRANSPARENT));
    assert_eq!(image.pixel(2, 0), None);
}

#[test]
fn mismatched_lengths_are_rejected() {
    let marker = Marker::square(0, Color::WHITE);
    let y = [1.0f32, 2.0];
    let x = [1.0f32];
    let mut traces = TraceCollection::new();
    let err = traces
        .push(Trace::new(&marker).with_y(&y).with_x(&x))
        .expect_err("length mismatch");
    assert!(matches!(
        err,
        PlotError::TraceLengthMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));
    assert!(traces.is_empty());
}

#[test]
fn autoscale_of_a_single_point_fails() {
    let marker = Marker::square(0, Color::WHITE);
    let y = [7.0f32];
    let mut traces = TraceCollection::new();
    traces.push(Trace::new(&marker).with_y(&y)).expect("push");

    let mut view = PlotView::new(Viewport::new(0.0, 0.0, 1.0, 1.0).expect("viewport"));
    let fitted = view
        .autoscale_y(&traces, AutoscaleBounds::BOTH, 0.03)
        .expect("autoscale");
    assert!(!fitted);
    assert_eq!(view.viewport().y_range().lo, 0.0);
    assert_eq!(view.viewport().y_range().hi, 1.0);
    assert_eq!(view.revision(), 0);
}
