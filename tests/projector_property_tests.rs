use approx::assert_relative_eq;
use plot2d::core::{Projector, ScreenRect, Viewport};
use proptest::prelude::*;

proptest! {
    #[test]
    fn projection_round_trip_stays_within_half_a_pixel(
        x0 in -1_000_000.0f64..1_000_000.0,
        x_span in 0.001f64..1_000_000.0,
        y0 in -1_000_000.0f64..1_000_000.0,
        y_span in 0.001f64..1_000_000.0,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
    ) {
        let viewport = Viewport::new(x0, y0, x0 + x_span, y0 + y_span).expect("viewport");
        let projector = Projector::for_plot_area(viewport, ScreenRect::new(14, 0, 786, 586))
            .expect("projector");

        let x = x0 + fx * x_span;
        let y = y0 + fy * y_span;
        let back_x = projector.unproj_x(projector.proj_x(x));
        let back_y = projector.unproj_y(projector.proj_y(y));

        prop_assert!((back_x - x).abs() <= projector.data_per_pixel_x() * 0.5 + 1e-9 * x_span);
        prop_assert!((back_y - y).abs() <= projector.data_per_pixel_y() * 0.5 + 1e-9 * y_span);
    }

    #[test]
    fn pixel_round_trip_is_exact_inside_the_area(px in 14i32..800, py in 0i32..586) {
        let viewport = Viewport::new(-3.5, 10.0, 96.5, 20.0).expect("viewport");
        let projector = Projector::for_plot_area(viewport, ScreenRect::new(14, 0, 786, 586))
            .expect("projector");

        prop_assert_eq!(projector.proj_x(projector.unproj_x(px)), px);
        prop_assert_eq!(projector.proj_y(projector.unproj_y(py)), py);
    }
}

#[test]
fn y_axis_is_inverted_on_screen() {
    let viewport = Viewport::new(0.0, 0.0, 10.0, 100.0).expect("viewport");
    let projector =
        Projector::for_plot_area(viewport, ScreenRect::new(0, 0, 100, 200)).expect("projector");

    assert_eq!(projector.proj_y(100.0), 0);
    assert_eq!(projector.proj_y(0.0), 200);
    assert_eq!(projector.proj_x(5.0), 50);
    assert_relative_eq!(projector.unproj_y(50), 75.0);
}

#[test]
fn unprojection_clamps_to_the_screen() {
    let viewport = Viewport::new(0.0, 0.0, 10.0, 10.0).expect("viewport");
    let projector =
        Projector::for_plot_area(viewport, ScreenRect::new(0, 0, 100, 100)).expect("projector");

    assert_relative_eq!(projector.unproj_x(-50), 0.0);
    assert_relative_eq!(projector.unproj_x(500), 10.0);
}

#[test]
fn degenerate_data_range_is_rejected() {
    assert!(Projector::new(1.0, 0.0, 1.0, 1.0, 0, 0, 10, 10).is_err());
    assert!(Projector::new(0.0, f64::NAN, 1.0, 1.0, 0, 0, 10, 10).is_err());
}
