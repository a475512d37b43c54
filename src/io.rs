use crate::display::SNAPSHOT_BYTES;
use crate::error::VmError;
use crate::keypad::Keypad;

/// An RGBA copy of the frame buffer, as handed to [Renderer::present]: 64 x 32 pixels at
/// four bytes each, where an on pixel is 0xFF 0xFF 0xFF 0xFF and an off pixel is
/// 0x00 0x00 0x00 0xFF.
pub type FrameSnapshot = [u8; SNAPSHOT_BYTES];

/// The contract between the virtual machine and a graphics/input backend.
///
/// The presentation task calls these once per frame, in order: [Renderer::poll_events],
/// [Renderer::window_should_close], [Renderer::present].  The machine owns the pacing;
/// implementations should not sleep.
pub trait Renderer {
    /// Pumps the backend's event queue, translating physical key presses and releases into
    /// [Keypad::press] / [Keypad::release] calls.
    fn poll_events(&mut self, keypad: &Keypad);

    /// Returns true once the user has requested exit; the machine then shuts down cleanly.
    fn window_should_close(&self) -> bool;

    /// Shows one frame.  A returned error is treated as fatal and stops the machine.
    fn present(&mut self, frame: &FrameSnapshot) -> Result<(), VmError>;

    /// Receives the measured presentation rate, roughly once per second.
    fn update_title(&mut self, _fps: f64) {}
}

/// The contract between the sound timer and an audio backend.  Both operations must be
/// idempotent; the sound task only calls them on 0 -> positive and positive -> 0 edges,
/// plus one final stop at shutdown.
pub trait Beeper: Send {
    fn start_beep(&mut self);
    fn stop_beep(&mut self);
}

/// A renderer that discards every frame and never requests exit.  Useful for running the
/// machine headless.
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn poll_events(&mut self, _keypad: &Keypad) {}

    fn window_should_close(&self) -> bool {
        false
    }

    fn present(&mut self, _frame: &FrameSnapshot) -> Result<(), VmError> {
        Ok(())
    }
}

/// A beeper that stays silent.
#[derive(Debug, Default)]
pub struct NullBeeper;

impl Beeper for NullBeeper {
    fn start_beep(&mut self) {}

    fn stop_beep(&mut self) {}
}
