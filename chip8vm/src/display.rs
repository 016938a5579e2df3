//! Monochrome display buffer.
use std::fmt::{self, Write};

use crate::constants::*;

/// Row-major 64x32 pixel grid. A `true` cell is lit.
pub struct Display {
    pixels: Box<[bool; DISPLAY_BUFFER_SIZE]>,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            pixels: Box::new([false; DISPLAY_BUFFER_SIZE]),
        }
    }
}

impl Display {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn clear(&mut self) {
        self.pixels.fill(false);
    }

    /// Pixel state at the given coordinate. Coordinates wrap around the screen edges.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[index(x, y)]
    }

    /// The raw row-major pixel buffer, for renderers.
    pub fn pixels(&self) -> &[bool; DISPLAY_BUFFER_SIZE] {
        &self.pixels
    }

    /// Iterate over the rows of the screen, top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[bool]> + '_ {
        self.pixels.chunks(DISPLAY_WIDTH)
    }

    /// XOR the sprite onto the buffer with its top left corner at the given coordinate.
    ///
    /// Each byte of `sprite` is a row of 8 pixels, most significant bit leftmost.
    /// The starting position wraps, and so does each individual pixel that
    /// runs past an edge.
    ///
    /// Returns `true` when a lit pixel was erased.
    pub fn draw_sprite(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let mut is_erased = false;

        for (r, &row) in sprite.iter().enumerate() {
            for c in 0..SPRITE_WIDTH {
                let new_px = (row >> (7 - c) & 1) != 0;
                if !new_px {
                    continue;
                }

                let d = index(x + c, y + r);
                let old_px = self.pixels[d];

                // XOR erases a pixel when both the old and new values are both 1.
                is_erased |= old_px;
                self.pixels[d] = !old_px;
            }
        }

        is_erased
    }

    /// Returns the contents of the display as a human readable string.
    pub fn dump(&self) -> Result<String, fmt::Error> {
        let mut buf = String::with_capacity(DISPLAY_BUFFER_SIZE + DISPLAY_HEIGHT);

        for row in self.rows() {
            for px in row {
                buf.write_char(if *px { '#' } else { '.' })?;
            }
            writeln!(buf)?;
        }

        Ok(buf)
    }
}

#[inline(always)]
fn index(x: usize, y: usize) -> usize {
    (x & DISPLAY_WIDTH_MASK) + (y & DISPLAY_HEIGHT_MASK) * DISPLAY_WIDTH
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_draw_sets_bits() {
        let mut display = Display::new();
        let erased = display.draw_sprite(2, 1, &[0b1010_0000]);
        assert!(!erased);
        assert!(display.get(2, 1));
        assert!(!display.get(3, 1));
        assert!(display.get(4, 1));
        assert_eq!(display.pixels().iter().filter(|px| **px).count(), 2);
    }

    #[test]
    fn test_draw_twice_erases() {
        let mut display = Display::new();
        let sprite = [0xFF, 0x81, 0xFF];
        assert!(!display.draw_sprite(10, 10, &sprite));
        assert!(display.draw_sprite(10, 10, &sprite));
        assert!(display.pixels().iter().all(|px| !px));
    }

    #[test]
    fn test_zero_bits_do_not_collide() {
        let mut display = Display::new();
        display.draw_sprite(4, 0, &[0b1111_0000]);
        // Only the zero half of this sprite overlaps the first draw.
        assert!(!display.draw_sprite(0, 0, &[0b1111_0000]));
        assert!(display.get(0, 0));
        assert!(display.get(4, 0));
    }

    #[test]
    fn test_draw_wraps_per_pixel() {
        let mut display = Display::new();
        display.draw_sprite(62, 31, &[0b1110_0000, 0b1000_0000]);
        assert!(display.get(62, 31));
        assert!(display.get(63, 31));
        assert!(display.get(0, 31));
        assert!(display.get(62, 0));
    }

    #[test]
    fn test_dump() {
        let mut display = Display::new();
        display.draw_sprite(0, 0, &[0b1100_0000]);
        let dump = display.dump().unwrap();
        let first = dump.lines().next().unwrap();
        assert_eq!(first.len(), DISPLAY_WIDTH);
        assert!(first.starts_with("##."));
        assert_eq!(dump.lines().count(), DISPLAY_HEIGHT);
    }
}
