//! Owned grayscale frame buffer.

/// A single grayscale camera frame, row-major, one byte per pixel.
///
/// The camera collaborator is responsible for any color conversion; the
/// analyzer only ever needs intensity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Frame {
    /// Wrap an existing pixel buffer. Returns `None` if the buffer length
    /// does not match `width * height`.
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<u8>) -> Option<Self> {
        if pixels.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            pixels,
        })
    }

    /// A frame filled with a constant intensity.
    pub fn filled(width: usize, height: usize, value: u8) -> Self {
        Self {
            width,
            height,
            pixels: vec![value; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel intensity at `(x, y)`. Out-of-bounds reads return 0.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x]
        } else {
            0
        }
    }

    /// Set a pixel, ignoring out-of-bounds writes.
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: u8) {
        if x < self.width && y < self.height {
            self.pixels[y * self.width + x] = value;
        }
    }

    /// Fill an axis-aligned rectangle, clipped to the frame.
    ///
    /// Used by the simulated camera and by tests to paint obstacles.
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, value: u8) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        for yy in y.min(self.height)..y_end {
            for xx in x.min(self.width)..x_end {
                self.pixels[yy * self.width + xx] = value;
            }
        }
    }
}
