/// The default instruction clock rate in hertz.
const DEFAULT_CPU_HZ: u64 = 720;
/// The default presentation frame rate in hertz.
const DEFAULT_FRAME_RATE_HZ: u64 = 60;
/// The default CHIP-8 program start address within memory.
const DEFAULT_PROGRAM_START: u16 = 0x200;

/// A struct to allow specification of Cervelat start-up parameters.
///
/// The instruction clock and the presentation frame rate are construction parameters of
/// the virtual machine; the two timer tasks always run at the fixed 60 Hz rate.  An
/// instance of this struct is passed to [Vm::new()](crate::Vm::new).
#[derive(Copy, Clone, Debug)]
pub struct Options {
    /// The rate of the CPU task's fetch/decode/execute loop
    pub cpu_hz: u64,
    /// The rate of the presentation task
    pub frame_rate_hz: u64,
    /// The memory address at which the ROM is loaded and the program counter starts
    pub program_start: u16,
}

impl Default for Options {
    /// Constructor that returns an [Options] instance using typical default settings.
    fn default() -> Self {
        Options {
            cpu_hz: DEFAULT_CPU_HZ,
            frame_rate_hz: DEFAULT_FRAME_RATE_HZ,
            program_start: DEFAULT_PROGRAM_START,
        }
    }
}
