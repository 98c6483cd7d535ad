use indexmap::IndexMap;

use crate::error::{PlotError, PlotResult};
use crate::render::Color;

/// Square stamp pattern plus color used to dilate stencil hits.
///
/// The pattern has side `2 * radius + 1` and is stored row-major, top row
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    radius: usize,
    footprint: Vec<bool>,
    color: Color,
}

impl Marker {
    /// Builds a marker from a row-major character pattern.
    ///
    /// Spaces are blank cells; every other character is part of the stamp.
    /// The pattern must be a square with an odd side length.
    pub fn from_pattern(pattern: &str, color: Color) -> PlotResult<Self> {
        let cells: Vec<bool> = pattern.chars().map(|cell| cell != ' ').collect();
        let count = cells.len();
        let side = (count as f64).sqrt().round() as usize;
        if count == 0 || side * side != count {
            return Err(PlotError::InvalidMarker(format!(
                "pattern of {count} cells is not square"
            )));
        }
        if side % 2 == 0 {
            return Err(PlotError::InvalidMarker(format!(
                "pattern side {side} must be odd"
            )));
        }

        Ok(Self {
            radius: side / 2,
            footprint: cells,
            color,
        })
    }

    /// Fully filled square stamp.
    #[must_use]
    pub fn square(radius: usize, color: Color) -> Self {
        let side = 2 * radius + 1;
        Self {
            radius,
            footprint: vec![true; side * side],
            color,
        }
    }

    #[must_use]
    pub fn radius(&self) -> usize {
        self.radius
    }

    #[must_use]
    pub fn side(&self) -> usize {
        2 * self.radius + 1
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    /// Whether the stamp covers offset `(dx, dy)` from its center.
    #[must_use]
    pub fn covers(&self, dx: isize, dy: isize) -> bool {
        let radius = self.radius as isize;
        if dx.abs() > radius || dy.abs() > radius {
            return false;
        }
        let row = (dy + radius) as usize;
        let col = (dx + radius) as usize;
        self.footprint[row * self.side() + col]
    }

    /// Offsets `(dx, dy)` of every covered stamp cell.
    pub fn offsets(&self) -> impl Iterator<Item = (isize, isize)> + '_ {
        let radius = self.radius as isize;
        (-radius..=radius)
            .flat_map(move |dy| (-radius..=radius).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| self.covers(dx, dy))
    }
}

const COLOR_CODES: [(char, u32); 10] = [
    ('k', 0xFF22_2222),
    ('r', 0xFF00_00FF),
    ('g', 0xFF00_FF00),
    ('b', 0xFFFF_0000),
    ('c', 0xFFFF_FF00),
    ('m', 0xFFFF_00FF),
    ('y', 0xFF00_FFFF),
    ('a', 0xFF88_8888),
    ('o', 0xFF00_8CFF),
    ('w', 0xFFFF_FFFF),
];

const SHAPES: [(&str, &[&str]); 7] = [
    (".1", &["X"]),
    (".2", &["XXX", "XXX", "XXX"]),
    (".3", &[" XXX ", "XXXXX", "XXXXX", "XXXXX", " XXX "]),
    ("+1", &[" X ", "XXX", " X "]),
    ("+2", &["  X  ", "  X  ", "XXXXX", "  X  ", "  X  "]),
    ("x1", &["X X", " X ", "X X"]),
    ("x2", &["X   X", " X X ", "  X  ", " X X ", "X   X"]),
];

/// Named markers addressed by shorthand codes such as `"g.2"`.
///
/// Aliases resolve to the same `Marker` instance, so traces that use `"w."`
/// and `"w.1"` still share one stencil pass.
#[derive(Debug, Clone, Default)]
pub struct MarkerSet {
    markers: Vec<Marker>,
    codes: IndexMap<String, usize>,
}

impl MarkerSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Color codes `krgbcmyaow` times shapes `.1 .2 .3 +1 +2 x1 x2`.
    ///
    /// `.`, `+` and `x` without a size alias the size-1 shape.
    #[must_use]
    pub fn standard() -> Self {
        let mut set = Self::new();
        for (color_code, packed) in COLOR_CODES {
            let color = Color::from_packed_rgba(packed);
            for (shape_code, rows) in SHAPES {
                let code = format!("{color_code}{shape_code}");
                let marker = match Marker::from_pattern(&rows.concat(), color) {
                    Ok(marker) => marker,
                    Err(_) => continue,
                };
                let index = set.insert(code, marker);
                if shape_code.ends_with('1') {
                    let alias = format!("{color_code}{}", &shape_code[..1]);
                    set.codes.insert(alias, index);
                }
            }
        }
        set
    }

    /// Registers `marker` under `code`, replacing any previous binding.
    pub fn insert(&mut self, code: impl Into<String>, marker: Marker) -> usize {
        let index = self.markers.len();
        self.markers.push(marker);
        self.codes.insert(code.into(), index);
        index
    }

    #[must_use]
    pub fn get(&self, code: &str) -> Option<&Marker> {
        self.codes.get(code).map(|&index| &self.markers[index])
    }

    pub fn resolve(&self, code: &str) -> PlotResult<&Marker> {
        self.get(code)
            .ok_or_else(|| PlotError::UnknownMarker(code.to_owned()))
    }

    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.codes.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{Marker, MarkerSet};
    use crate::error::PlotError;
    use crate::render::Color;

    #[test]
    fn non_square_pattern_is_rejected() {
        let err = Marker::from_pattern("XXXXX", Color::WHITE).expect_err("not square");
        assert!(matches!(err, PlotError::InvalidMarker(_)));
    }

    #[test]
    fn even_pattern_is_rejected() {
        let err = Marker::from_pattern("XXXX", Color::WHITE).expect_err("even side");
        assert!(matches!(err, PlotError::InvalidMarker(_)));
    }

    #[test]
    fn plus_pattern_covers_only_its_arms() {
        let marker = Marker::from_pattern(" X XXX X ", Color::WHITE).expect("plus");
        assert_eq!(marker.radius(), 1);
        assert!(marker.covers(0, 0));
        assert!(marker.covers(0, -1));
        assert!(marker.covers(1, 0));
        assert!(!marker.covers(1, 1));
        assert!(!marker.covers(-1, -1));
        assert_eq!(marker.offsets().count(), 5);
    }

    #[test]
    fn standard_set_aliases_share_instances() {
        let set = MarkerSet::standard();
        let short = set.get("g.").expect("alias");
        let long = set.get("g.1").expect("marker");
        assert!(std::ptr::eq(short, long));
        assert_eq!(set.get("g.3").expect("big dot").radius(), 2);
        assert_eq!(set.get("rx2").expect("cross").offsets().count(), 9);
    }

    #[test]
    fn standard_colors_decode_byte_order() {
        let set = MarkerSet::standard();
        assert_eq!(set.get("r.1").expect("red").color(), Color::rgb(255, 0, 0));
        assert_eq!(set.get("b.1").expect("blue").color(), Color::rgb(0, 0, 255));
        assert_eq!(set.get("o.1").expect("orange").color(), Color::rgb(255, 140, 0));
    }

    #[test]
    fn unknown_code_is_an_error() {
        let set = MarkerSet::standard();
        assert!(matches!(set.resolve("q.1"), Err(PlotError::UnknownMarker(_))));
    }
}
