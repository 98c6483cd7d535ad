use crate::core::{PointRef, TraceCollection};

/// Cursor position, highlighted point and the text overlay derived from them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CursorHighlight {
    cursor: Option<(f64, f64)>,
    highlighted: Option<PointRef>,
    lines: Vec<String>,
}

impl CursorHighlight {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<(f64, f64)> {
        self.cursor
    }

    #[must_use]
    pub fn highlighted(&self) -> Option<PointRef> {
        self.highlighted
    }

    /// Overlay text: cursor position, highlighted point, point annotations.
    #[must_use]
    pub fn annotation_lines(&self) -> &[String] {
        &self.lines
    }

    /// Stores a new highlighted point; returns whether it changed.
    pub fn set_highlight(&mut self, point: PointRef, traces: &TraceCollection<'_>) -> bool {
        if self.highlighted == Some(point) {
            return false;
        }
        self.highlighted = Some(point);
        self.rebuild_lines(traces);
        true
    }

    /// Drops the highlighted point; returns whether one was set.
    pub fn clear_highlight(&mut self, traces: &TraceCollection<'_>) -> bool {
        if self.highlighted.take().is_none() {
            return false;
        }
        self.rebuild_lines(traces);
        true
    }

    pub fn notify_cursor_change(&mut self, x: f64, y: f64, traces: &TraceCollection<'_>) {
        self.cursor = Some((x, y));
        self.rebuild_lines(traces);
    }

    fn rebuild_lines(&mut self, traces: &TraceCollection<'_>) {
        self.lines.clear();
        let Some((x, y)) = self.cursor else {
            return;
        };
        self.lines
            .push(format!("cur: [{}, {}]", short_number(x), short_number(y)));

        let Some(point) = self.highlighted else {
            return;
        };
        if let Some((px, py)) = traces.point(point) {
            self.lines
                .push(format!(" pt:[{}, {}] ", short_number(px), short_number(py)));
        }
        self.lines
            .extend(traces.annotations(point).iter().map(|text| (*text).to_owned()));
    }
}

/// Six significant digits, trailing zeros dropped, exponent form outside
/// `1e-5..1e6`.
#[must_use]
pub fn short_number(value: f64) -> String {
    if value == 0.0 || !value.is_finite() {
        return format!("{value}");
    }
    let magnitude = value.abs().log10().floor() as i32;
    if !(-5..6).contains(&magnitude) {
        let text = format!("{value:.5e}");
        return match text.split_once('e') {
            Some((mantissa, exponent)) => format!("{}e{exponent}", trim_zeros(mantissa)),
            None => text,
        };
    }
    let decimals = (5 - magnitude).max(0) as usize;
    trim_zeros(&format!("{value:.decimals$}")).to_owned()
}

fn trim_zeros(text: &str) -> &str {
    if text.contains('.') {
        text.trim_end_matches('0').trim_end_matches('.')
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::{CursorHighlight, short_number};
    use crate::core::{AnnotationSet, Marker, PointRef, Trace, TraceCollection};
    use crate::render::Color;

    #[test]
    fn numbers_are_short() {
        assert_eq!(short_number(127.0), "127");
        assert_eq!(short_number(0.5), "0.5");
        assert_eq!(short_number(1.0 / 3.0), "0.333333");
        assert_eq!(short_number(-2.5e7), "-2.5e7");
        assert_eq!(short_number(0.0), "0");
    }

    #[test]
    fn lines_follow_cursor_and_highlight() {
        let marker = Marker::square(0, Color::WHITE);
        let y = [10.0f32, 20.0];
        let notes = vec!["alpha".to_owned(), "beta".to_owned()];
        let mut traces = TraceCollection::new();
        traces
            .push(
                Trace::new(&marker)
                    .with_y(&y)
                    .with_annotations(AnnotationSet::Literal(&notes)),
            )
            .expect("push");

        let mut highlight = CursorHighlight::new();
        assert!(highlight.annotation_lines().is_empty());

        highlight.notify_cursor_change(1.5, 12.0, &traces);
        assert_eq!(highlight.annotation_lines(), ["cur: [1.5, 12]"]);

        assert!(highlight.set_highlight(PointRef::new(0, 1), &traces));
        assert!(!highlight.set_highlight(PointRef::new(0, 1), &traces));
        assert_eq!(
            highlight.annotation_lines(),
            ["cur: [1.5, 12]", " pt:[2, 20] ", "beta"]
        );
    }
}
