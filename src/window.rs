use cervelat::{
    FrameSnapshot, Keypad, Renderer, VmError, DISPLAY_HEIGHT, DISPLAY_WIDTH, SNAPSHOT_BYTES,
};
use log::{error, info};
use minifb::{Key, Scale, WindowOptions};

// minifb window pixels use 0RGB encoding; the alpha channel (MSB) is ignored
const PX_OFF_COLOR: u32 = 0x000000;

/// The standard mapping from the left-hand block of a modern keyboard to the CHIP-8 hex
/// keypad:
///
///    Keyboard                   CHIP-8
///    +---+---+---+---+          +---+---+---+---+
///    | 1 | 2 | 3 | 4 |          | 1 | 2 | 3 | C |
///    +---+---+---+---+          +---+---+---+---+
///    | Q | W | E | R |          | 4 | 5 | 6 | D |
///    +---+---+---+---+    =>    +---+---+---+---+
///    | A | S | D | F |          | 7 | 8 | 9 | E |
///    +---+---+---+---+          +---+---+---+---+
///    | Z | X | C | V |          | A | 0 | B | F |
///    +---+---+---+---+          +---+---+---+---+
const KEY_TABLE: [(Key, u8); 16] = [
    (Key::Key1, 0x1),
    (Key::Key2, 0x2),
    (Key::Key3, 0x3),
    (Key::Key4, 0xC),
    (Key::Q, 0x4),
    (Key::W, 0x5),
    (Key::E, 0x6),
    (Key::R, 0xD),
    (Key::A, 0x7),
    (Key::S, 0x8),
    (Key::D, 0x9),
    (Key::F, 0xE),
    (Key::Z, 0xA),
    (Key::X, 0x0),
    (Key::C, 0xB),
    (Key::V, 0xF),
];

/// A [Renderer] backed by a minifb window, scaled up 16x from the native 64x32 display.
///
/// The window doubles as the input source: each poll diffs the held-key set against the
/// previous frame and forwards the changes to the keypad bitmap.  Pressing P saves the
/// frame most recently shown as a numbered PNG in the working directory.
pub struct Window {
    window: minifb::Window,
    title: String,
    /// Auxiliary frame buffer holding the 32-bit pixels minifb expects
    pixels: [u32; DISPLAY_WIDTH * DISPLAY_HEIGHT],
    /// The RGBA bytes of the frame most recently presented, kept for PNG snapshots
    last_frame: [u8; SNAPSHOT_BYTES],
    /// The CHIP-8 keys held as of the previous poll
    held: u16,
    snapshot_key_held: bool,
    snapshot_index: u32,
}

impl Window {
    /// Opens the window.  Fails with [VmError::Renderer] if the windowing system refuses.
    ///
    /// # Arguments
    ///
    /// * `title` - the base window title, normally the ROM name
    pub fn new(title: &str) -> Result<Self, VmError> {
        let window = minifb::Window::new(
            title,
            DISPLAY_WIDTH,
            DISPLAY_HEIGHT,
            WindowOptions {
                resize: true,
                scale: Scale::X16,
                ..Default::default()
            },
        )
        .map_err(|e| VmError::Renderer {
            message: e.to_string(),
        })?;
        Ok(Window {
            window,
            title: title.to_owned(),
            pixels: [PX_OFF_COLOR; DISPLAY_WIDTH * DISPLAY_HEIGHT],
            last_frame: [0; SNAPSHOT_BYTES],
            held: 0,
            snapshot_key_held: false,
            snapshot_index: 0,
        })
    }

    fn save_snapshot(&mut self) {
        let path = format!("snapshot-{}.png", self.snapshot_index);
        match image::save_buffer(
            &path,
            &self.last_frame,
            DISPLAY_WIDTH as u32,
            DISPLAY_HEIGHT as u32,
            image::ColorType::Rgba8,
        ) {
            Ok(()) => {
                info!("saved display snapshot to {}", path);
                self.snapshot_index += 1;
            }
            Err(e) => error!("failed to save display snapshot to {}: {}", path, e),
        }
    }
}

impl Renderer for Window {
    fn poll_events(&mut self, keypad: &Keypad) {
        let mut held_now: u16 = 0;
        for (key, hex) in KEY_TABLE {
            if self.window.is_key_down(key) {
                held_now |= 1 << hex;
            }
        }
        // Forward only the edges, so a key held across frames is not re-reported
        let pressed = held_now & !self.held;
        let released = self.held & !held_now;
        for hex in 0..16 {
            if pressed & (1 << hex) != 0 {
                keypad.press(hex);
            }
            if released & (1 << hex) != 0 {
                keypad.release(hex);
            }
        }
        self.held = held_now;

        let snapshot_key = self.window.is_key_down(Key::P);
        if snapshot_key && !self.snapshot_key_held {
            self.save_snapshot();
        }
        self.snapshot_key_held = snapshot_key;
    }

    fn window_should_close(&self) -> bool {
        !self.window.is_open() || self.window.is_key_down(Key::Escape)
    }

    fn present(&mut self, frame: &FrameSnapshot) -> Result<(), VmError> {
        self.last_frame.copy_from_slice(frame);
        for (pixel, rgba) in self.pixels.iter_mut().zip(frame.chunks_exact(4)) {
            *pixel = ((rgba[0] as u32) << 16) | ((rgba[1] as u32) << 8) | rgba[2] as u32;
        }
        self.window
            .update_with_buffer(&self.pixels, DISPLAY_WIDTH, DISPLAY_HEIGHT)
            .map_err(|e| VmError::Renderer {
                message: e.to_string(),
            })
    }

    fn update_title(&mut self, fps: f64) {
        self.window
            .set_title(&format!("{} ({:.0} fps)", self.title, fps));
    }
}
