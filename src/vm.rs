use crate::clock::{MonotonicClock, TimeSource};
use crate::cpu::Cpu;
use crate::display::{FrameBuffer, SNAPSHOT_BYTES};
use crate::error::VmError;
use crate::io::{Beeper, Renderer};
use crate::keypad::Keypad;
use crate::options::Options;
use crate::scheduler::run_rate_limited;
use crate::timers::{Timers, TIMER_HZ};
use log::{error, info};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// The complete CHIP-8 virtual machine, and the core public interface to the Cervelat
/// crate.
///
/// A machine is created from [Options], given a ROM, and then run.  [Vm::run] operates
/// four tasks concurrently: the CPU loop at the configured instruction rate, one 60 Hz
/// loop per timer, and the presentation loop at the configured frame rate on the calling
/// thread (windowing libraries generally insist on the thread that created them).  The
/// tasks share the frame buffer behind a mutex and everything else through atomics, as
/// described on the individual types.
pub struct Vm {
    cpu: Cpu,
    frame_buffer: Arc<Mutex<FrameBuffer>>,
    keypad: Arc<Keypad>,
    timers: Arc<Timers>,
    running: Arc<AtomicBool>,
    clock: Arc<dyn TimeSource>,
    options: Options,
}

/// A cloneable handle through which machine shutdown can be requested from any thread,
/// for example a signal handler.  Obtained from [Vm::stop_handle] before the machine is
/// consumed by [Vm::run].
#[derive(Clone)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    /// Requests shutdown.  All four machine tasks observe the request within one loop
    /// iteration and exit cleanly; [Vm::run] then joins them and returns.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Vm {
    /// Constructor that returns a freshly-initialised machine with the font table in
    /// memory, all timers zeroed and the program counter at the program start address.
    ///
    /// # Arguments
    ///
    /// * `options` - the start-up configuration
    pub fn new(options: Options) -> Result<Self, VmError> {
        Self::with_clock(options, Arc::new(MonotonicClock::new()))
    }

    /// As [Vm::new], but with an injected time source for the scheduler.
    ///
    /// # Arguments
    ///
    /// * `options` - the start-up configuration
    /// * `clock` - the time source the task loops measure themselves against
    pub fn with_clock(options: Options, clock: Arc<dyn TimeSource>) -> Result<Self, VmError> {
        let frame_buffer = Arc::new(Mutex::new(FrameBuffer::new()));
        let keypad = Arc::new(Keypad::new());
        let timers = Arc::new(Timers::new());
        let running = Arc::new(AtomicBool::new(false));
        let cpu = Cpu::new(
            Arc::clone(&frame_buffer),
            Arc::clone(&keypad),
            Arc::clone(&timers),
            Arc::clone(&running),
            options.program_start,
        )?;
        Ok(Vm {
            cpu,
            frame_buffer,
            keypad,
            timers,
            running,
            clock,
            options,
        })
    }

    /// Loads the passed ROM bytes into memory at the program start address.
    ///
    /// # Arguments
    ///
    /// * `rom` - the raw ROM bytes
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), VmError> {
        self.cpu.load_rom(rom)
    }

    /// Loads the ROM file at the passed path into memory at the program start address.
    ///
    /// # Arguments
    ///
    /// * `path` - the ROM file to read
    pub fn load_rom_file(&mut self, path: &Path) -> Result<(), VmError> {
        self.cpu.load_rom_file(path)
    }

    /// Returns the shared keypad, through which an embedding application can inject key
    /// state directly.
    pub fn keypad(&self) -> Arc<Keypad> {
        Arc::clone(&self.keypad)
    }

    /// Returns the shared frame buffer.
    pub fn frame_buffer(&self) -> Arc<Mutex<FrameBuffer>> {
        Arc::clone(&self.frame_buffer)
    }

    /// Returns a handle through which shutdown can be requested once [Vm::run] has
    /// consumed the machine.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            running: Arc::clone(&self.running),
        }
    }

    /// Runs the machine to completion.
    ///
    /// Spawns the CPU task and the two timer tasks, then drives the presentation loop on
    /// the calling thread until the renderer requests exit, a [StopHandle] fires, or a
    /// fatal error occurs.  Whatever the exit path, all spawned tasks are joined before
    /// this returns, and the first fatal error is reported.
    ///
    /// # Arguments
    ///
    /// * `renderer` - the graphics/input backend driven by the presentation task
    /// * `beeper` - the audio backend driven by the sound timer's edges
    pub fn run(
        mut self,
        renderer: &mut dyn Renderer,
        mut beeper: Box<dyn Beeper>,
    ) -> Result<(), VmError> {
        info!(
            "starting machine: cpu {} Hz, timers {} Hz, frame rate {} Hz",
            self.options.cpu_hz, TIMER_HZ, self.options.frame_rate_hz
        );
        self.running.store(true, Ordering::SeqCst);

        let cpu_period = 1.0 / self.options.cpu_hz as f64;
        let timer_period = 1.0 / TIMER_HZ as f64;
        let frame_period = 1.0 / self.options.frame_rate_hz as f64;

        let cpu_task = {
            let mut cpu = self.cpu;
            let running = Arc::clone(&self.running);
            let clock = Arc::clone(&self.clock);
            thread::Builder::new()
                .name("cpu".into())
                .spawn(move || -> Result<(), VmError> {
                    let result = run_rate_limited(clock.as_ref(), cpu_period, || {
                        if !running.load(Ordering::SeqCst) {
                            return Ok(false);
                        }
                        cpu.step()?;
                        Ok(true)
                    });
                    if let Err(e) = &result {
                        error!("cpu task stopped after {} cycles: {}", cpu.cycles(), e);
                        running.store(false, Ordering::SeqCst);
                    }
                    result
                })
                .expect("failed to spawn cpu task")
        };

        let delay_task = {
            let running = Arc::clone(&self.running);
            let timers = Arc::clone(&self.timers);
            let clock = Arc::clone(&self.clock);
            thread::Builder::new()
                .name("delay-timer".into())
                .spawn(move || -> Result<(), VmError> {
                    run_rate_limited(clock.as_ref(), timer_period, || {
                        if !running.load(Ordering::SeqCst) {
                            return Ok(false);
                        }
                        timers.tick_delay();
                        Ok(true)
                    })
                })
                .expect("failed to spawn delay timer task")
        };

        let sound_task = {
            let running = Arc::clone(&self.running);
            let timers = Arc::clone(&self.timers);
            let clock = Arc::clone(&self.clock);
            thread::Builder::new()
                .name("sound-timer".into())
                .spawn(move || -> Result<(), VmError> {
                    // Tracks which side of the 0 boundary the previous tick ended on, so
                    // the beeper is only driven on edges
                    let mut beeping = false;
                    run_rate_limited(clock.as_ref(), timer_period, || {
                        if !running.load(Ordering::SeqCst) {
                            if beeping {
                                beeper.stop_beep();
                            }
                            return Ok(false);
                        }
                        if timers.sound() > 0 && !beeping {
                            beeper.start_beep();
                            beeping = true;
                        }
                        if timers.tick_sound() == 0 && beeping {
                            beeper.stop_beep();
                            beeping = false;
                        }
                        Ok(true)
                    })
                })
                .expect("failed to spawn sound timer task")
        };

        // The presentation loop runs here on the calling thread
        let running = Arc::clone(&self.running);
        let frame_buffer = Arc::clone(&self.frame_buffer);
        let keypad = Arc::clone(&self.keypad);
        let clock = Arc::clone(&self.clock);
        let mut snapshot = [0u8; SNAPSHOT_BYTES];
        let mut frames_since_update: u64 = 0;
        let mut last_fps_update = clock.now();
        let present_result = run_rate_limited(clock.as_ref(), frame_period, || {
            if !running.load(Ordering::SeqCst) {
                return Ok(false);
            }
            renderer.poll_events(&keypad);
            if renderer.window_should_close() {
                info!("window close requested");
                running.store(false, Ordering::SeqCst);
                return Ok(false);
            }
            frame_buffer.lock().unwrap().snapshot_rgba(&mut snapshot);
            renderer.present(&snapshot)?;
            frames_since_update += 1;
            let now = clock.now();
            let elapsed = now - last_fps_update;
            if elapsed >= 1.0 {
                renderer.update_title(frames_since_update as f64 / elapsed);
                frames_since_update = 0;
                last_fps_update = now;
            }
            Ok(true)
        });

        self.running.store(false, Ordering::SeqCst);
        let cpu_result = cpu_task.join().expect("cpu task panicked");
        delay_task.join().expect("delay timer task panicked")?;
        sound_task.join().expect("sound timer task panicked")?;
        info!("machine stopped");
        cpu_result?;
        present_result
    }
}
