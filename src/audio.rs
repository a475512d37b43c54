use cervelat::Beeper;
use rodio::{source::SineWave, OutputStream, Sink};
use std::error::Error;

/// The pitch of the beep tone (A above middle C).
const BEEP_FREQUENCY_HZ: f32 = 440.0;

/// Keeps the audio output stream alive for the lifetime of the application.  The stream
/// handle is not sendable between threads, so it stays on the main thread while the
/// [SineBeeper] built from it travels to the sound timer task.
pub struct Audio {
    _stream: OutputStream,
}

/// A [Beeper] backed by a rodio sink looping a sine wave.  The sink starts paused;
/// starting and stopping the beep resumes and pauses playback, both of which are
/// idempotent on an already playing or already paused sink.
pub struct SineBeeper {
    sink: Sink,
}

/// Opens the default audio output and returns it alongside a ready beeper.
pub fn init() -> Result<(Audio, SineBeeper), Box<dyn Error>> {
    let (_stream, stream_handle) = OutputStream::try_default()?;
    let sink = Sink::try_new(&stream_handle)?;
    sink.append(SineWave::new(BEEP_FREQUENCY_HZ));
    sink.pause();
    Ok((Audio { _stream }, SineBeeper { sink }))
}

impl Beeper for SineBeeper {
    fn start_beep(&mut self) {
        self.sink.play();
    }

    fn stop_beep(&mut self) {
        self.sink.pause();
    }
}
