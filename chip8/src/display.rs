use std::fmt;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

/// Monochrome 64x32 framebuffer, row-major.
///
/// Every write wraps around both axes. `redraw_pending` is raised by any
/// change and lowered only by the presentation via [`Framebuffer::take_redraw`].
#[derive(Clone)]
pub struct Framebuffer {
    pixels: [bool; DISPLAY_WIDTH * DISPLAY_HEIGHT],
    redraw_pending: bool,
}

impl Framebuffer {
    pub fn new() -> Framebuffer {
        Framebuffer {
            pixels: [false; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            redraw_pending: false,
        }
    }

    pub fn clear(&mut self) {
        for pixel in self.pixels.iter_mut() {
            *pixel = false;
        }
        self.redraw_pending = true;
    }

    /// XORs an 8-pixel-wide sprite onto the screen with its top left corner at
    /// `(x, y)`. Returns true if any lit pixel was turned off.
    pub fn draw(&mut self, x: usize, y: usize, sprite: &[u8]) -> bool {
        let x = x % DISPLAY_WIDTH;
        let y = y % DISPLAY_HEIGHT;
        let mut collision_bit = false;

        for (sy, byte) in sprite.iter().enumerate() {
            let dy = (y + sy) % DISPLAY_HEIGHT;
            for sx in 0..8 {
                let bit_mask = 0b1000_0000 >> sx;
                if (byte & bit_mask) != 0 {
                    let dx = (x + sx) % DISPLAY_WIDTH;
                    let index = dy * DISPLAY_WIDTH + dx;

                    if self.pixels[index] {
                        collision_bit = true;
                    }
                    self.pixels[index] ^= true;
                    self.redraw_pending = true;
                }
            }
        }

        collision_bit
    }

    pub fn get(&self, x: usize, y: usize) -> bool {
        self.pixels[(y % DISPLAY_HEIGHT) * DISPLAY_WIDTH + (x % DISPLAY_WIDTH)]
    }

    pub fn row(&self, y: usize) -> &[bool] {
        let start = (y % DISPLAY_HEIGHT) * DISPLAY_WIDTH;
        &self.pixels[start..start + DISPLAY_WIDTH]
    }

    pub fn redraw_pending(&self) -> bool {
        self.redraw_pending
    }

    /// Returns the pending flag and lowers it.
    pub fn take_redraw(&mut self) -> bool {
        let pending = self.redraw_pending;
        self.redraw_pending = false;
        pending
    }
}

impl PartialEq for Framebuffer {
    fn eq(&self, other: &Framebuffer) -> bool {
        self.pixels[..] == other.pixels[..]
    }
}

/// One line per row, `#` for lit and `.` for unlit pixels.
impl fmt::Display for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..DISPLAY_HEIGHT {
            for &lit in self.row(y) {
                f.write_str(if lit { "#" } else { "." })?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Framebuffer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let lit = self.pixels.iter().filter(|&&p| p).count();
        f.debug_struct("Framebuffer")
            .field("lit", &lit)
            .field("redraw_pending", &self.redraw_pending)
            .finish()
    }
}
