pub const WIDTH: usize = 64;
pub const HEIGHT: usize = 32;

/// Monochrome 64x32 cell array, row-major, each cell 0 or 1.
///
/// Only `clear_buffer` and `paint` change it; hosts read it through `cells`.
#[derive(Debug, Clone)]
pub struct FrameBuffer {
    bit_buffer: [u8; WIDTH * HEIGHT],
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self {
            bit_buffer: [0; WIDTH * HEIGHT],
        }
    }

    pub fn clear_buffer(&mut self) {
        self.bit_buffer = [0; WIDTH * HEIGHT];
    }

    pub fn cells(&self) -> &[u8; WIDTH * HEIGHT] {
        &self.bit_buffer
    }

    pub fn is_set(&self, x: usize, y: usize) -> bool {
        x < WIDTH && y < HEIGHT && self.bit_buffer[y * WIDTH + x] == 1
    }

    /// XORs `sprite` (one byte per row, MSB leftmost) onto the buffer.
    ///
    /// The anchor wraps around the screen, the sprite body is clipped at the
    /// right and bottom edges. Returns true if any lit cell was turned off.
    pub fn paint(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let (x, y) = (x as usize % WIDTH, y as usize % HEIGHT);
        let mut vf = false;
        for (i, row) in sprite.iter().enumerate() {
            let ny = y + i;
            if ny >= HEIGHT {
                break;
            }
            for j in 0..8 {
                let nx = x + j;
                if nx >= WIDTH {
                    break;
                }
                let bit = (row >> (7 - j)) & 1;
                if bit == 0 {
                    continue;
                }
                let index = (ny * WIDTH) + nx;
                if self.bit_buffer[index] == 1 {
                    vf = true;
                }
                self.bit_buffer[index] ^= 1;
            }
        }
        vf
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(fb: &FrameBuffer) -> usize {
        fb.cells().iter().filter(|&&c| c == 1).count()
    }

    #[test]
    fn test_paint_msb_leftmost() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.paint(0, 0, &[0b1000_0001]));
        assert!(fb.is_set(0, 0));
        assert!(fb.is_set(7, 0));
        assert!(!fb.is_set(1, 0));
        assert_eq!(lit(&fb), 2);
    }

    #[test]
    fn test_repaint_collides_and_erases() {
        let mut fb = FrameBuffer::new();
        assert!(!fb.paint(10, 5, &[0xF0]));
        assert!(fb.paint(10, 5, &[0xF0]));
        assert_eq!(lit(&fb), 0);
    }

    #[test]
    fn test_anchor_wraps() {
        let mut fb = FrameBuffer::new();
        fb.paint(64 + 3, 32 + 2, &[0x80]);
        assert!(fb.is_set(3, 2));
    }

    #[test]
    fn test_body_is_clipped() {
        let mut fb = FrameBuffer::new();
        fb.paint(60, 30, &[0xFF, 0xFF, 0xFF, 0xFF]);
        // 4 columns x 2 rows survive, nothing wraps to the left or top
        assert_eq!(lit(&fb), 8);
        assert!(fb.is_set(63, 31));
        assert!(!fb.is_set(0, 30));
        assert!(!fb.is_set(60, 0));
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new();
        fb.paint(0, 0, &[0xFF; 15]);
        fb.clear_buffer();
        assert_eq!(lit(&fb), 0);
    }
}
