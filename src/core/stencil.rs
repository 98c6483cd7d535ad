use std::sync::atomic::{AtomicU8, Ordering};

use crate::core::marker::Marker;
use crate::render::{Color, RgbaImage};

/// Per-pixel "touched" flags for one marker group, row-major.
///
/// Cells are atomics so rasterizer tasks can mark hits through a shared
/// reference. Every concurrent write stores `1`; nothing clears a cell while
/// tasks run, so relaxed ordering is enough.
#[derive(Debug)]
pub struct Stencil {
    width: usize,
    height: usize,
    cells: Vec<AtomicU8>,
}

impl Stencil {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = width as usize;
        let height = height as usize;
        let cells = (0..width * height).map(|_| AtomicU8::new(0)).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Marks `(x, y)`; coordinates outside the stencil are ignored.
    #[inline]
    pub fn hit(&self, x: i32, y: i32) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as usize, y as usize);
        if x < self.width && y < self.height {
            self.cells[y * self.width + x].store(1, Ordering::Relaxed);
        }
    }

    /// Marks the full row `y`.
    pub fn hit_row(&self, y: i32) {
        if y < 0 || y as usize >= self.height {
            return;
        }
        let start = y as usize * self.width;
        for cell in &self.cells[start..start + self.width] {
            cell.store(1, Ordering::Relaxed);
        }
    }

    /// Marks the full column `x`.
    pub fn hit_column(&self, x: i32) {
        if x < 0 || x as usize >= self.width {
            return;
        }
        for cell in self.cells.iter().skip(x as usize).step_by(self.width) {
            cell.store(1, Ordering::Relaxed);
        }
    }

    #[must_use]
    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < self.width && y < self.height && self.cells[y * self.width + x].load(Ordering::Relaxed) != 0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.load(Ordering::Relaxed) == 0)
    }

    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell.get_mut() = 0;
        }
    }

    /// Plain copy of the flags.
    #[must_use]
    pub fn to_mask(&self) -> Vec<u8> {
        self.cells
            .iter()
            .map(|cell| cell.load(Ordering::Relaxed))
            .collect()
    }

    /// Dilates every set cell by the marker's footprint.
    ///
    /// For each covered offset `(dx, dy)` the output cell `(x + dx, y + dy)`
    /// is ORed with input cell `(x, y)`. Row and column ranges shrink by
    /// `|dx|` and `|dy|` so no access leaves the stencil.
    #[must_use]
    pub fn convolve(&self, marker: &Marker) -> Vec<u8> {
        let source = self.to_mask();
        let mut out = vec![0u8; source.len()];
        let (width, height) = (self.width, self.height);

        for (dx, dy) in marker.offsets() {
            let abs_dx = dx.unsigned_abs();
            let abs_dy = dy.unsigned_abs();
            if abs_dx >= width || abs_dy >= height {
                continue;
            }
            let run = width - abs_dx;
            let (src_col, dest_col) = if dx < 0 { (abs_dx, 0) } else { (0, abs_dx) };
            let (src_row0, dest_row0) = if dy < 0 { (abs_dy, 0) } else { (0, abs_dy) };

            for row in 0..height - abs_dy {
                let src_start = (src_row0 + row) * width + src_col;
                let dest_start = (dest_row0 + row) * width + dest_col;
                let src = &source[src_start..src_start + run];
                let dest = &mut out[dest_start..dest_start + run];
                for (d, s) in dest.iter_mut().zip(src) {
                    *d |= *s;
                }
            }
        }
        out
    }
}

/// Paints `color` where the mask is set and leaves the rest transparent.
#[must_use]
pub fn mask_to_rgba(mask: &[u8], width: u32, height: u32, color: Color) -> RgbaImage {
    let mut image = RgbaImage::new(width, height);
    let bytes = color.to_bytes();
    for (px, &set) in image.data_mut().chunks_exact_mut(4).zip(mask) {
        if set != 0 {
            px.copy_from_slice(&bytes);
        }
    }
    image
}

#[cfg(test)]
mod tests {
    use super::{Stencil, mask_to_rgba};
    use crate::core::Marker;
    use crate::render::Color;

    #[test]
    fn out_of_bounds_hits_are_ignored() {
        let stencil = Stencil::new(4, 3);
        stencil.hit(-1, 0);
        stencil.hit(4, 0);
        stencil.hit(0, 3);
        assert!(stencil.is_empty());
        stencil.hit(3, 2);
        assert!(stencil.is_set(3, 2));
    }

    #[test]
    fn rows_and_columns_fill_completely() {
        let stencil = Stencil::new(5, 4);
        stencil.hit_row(1);
        stencil.hit_column(3);
        let mask = stencil.to_mask();
        assert_eq!(mask.iter().filter(|&&cell| cell != 0).count(), 5 + 4 - 1);
        assert!(stencil.is_set(0, 1));
        assert!(stencil.is_set(3, 0));
        assert!(stencil.is_set(3, 3));
    }

    #[test]
    fn convolution_respects_blank_cells() {
        let stencil = Stencil::new(5, 5);
        stencil.hit(2, 2);
        let cross = Marker::from_pattern("X X X X X", Color::WHITE).expect("cross");
        let out = stencil.convolve(&cross);
        let set: Vec<(usize, usize)> = (0..25)
            .filter(|ix| out[*ix] != 0)
            .map(|ix| (ix % 5, ix / 5))
            .collect();
        assert_eq!(set, vec![(1, 1), (3, 1), (2, 2), (1, 3), (3, 3)]);
    }

    #[test]
    fn convolution_clips_at_edges() {
        let stencil = Stencil::new(3, 3);
        stencil.hit(0, 0);
        let out = stencil.convolve(&Marker::square(1, Color::WHITE));
        assert_eq!(out, vec![1, 1, 0, 1, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn clear_resets_every_cell() {
        let mut stencil = Stencil::new(3, 2);
        stencil.hit_row(0);
        stencil.clear();
        assert!(stencil.is_empty());
    }

    #[test]
    fn rgba_conversion_is_transparent_outside_mask() {
        let image = mask_to_rgba(&[1, 0], 2, 1, Color::RED);
        assert_eq!(image.pixel(0, 0), Some(Color::RED));
        assert_eq!(image.pixel(1, 0), Some(Color::TRANSPARENT));
    }
}
