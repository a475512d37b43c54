mod audio;
mod window;

use cervelat::{Beeper, NullBeeper, Options, Vm};
use log::warn;
use std::path::PathBuf;
use std::process::ExitCode;

// Command line arguments
struct Args {
    rom: PathBuf,
    cpu_hz: Option<u64>,
    frame_rate_hz: Option<u64>,
}

fn parse_args() -> Result<Args, lexopt::Error> {
    use lexopt::prelude::*;

    let help_msg = "\
USAGE:
    cervelat [OPTIONS] <ROM>

ARGS:
    <ROM>    Path to the CHIP-8 ROM to run (raw binary, at most 3584 bytes).

OPTIONS:
    -h, --help          Print this help message.
    -s, --speed=NUM     Set the instruction clock rate (Hz) to uint NUM in the
                          range 1-5000. (default: 720)
    -f, --fps=NUM       Set the presentation frame rate (Hz) to uint NUM in the
                          range 1-240. (default: 60)

KEYS:
    1234 / QWER / ASDF / ZXCV map to the CHIP-8 hex keypad.
    P saves a PNG snapshot of the display; Esc quits.";

    let mut rom = None;
    let mut cpu_hz = None;
    let mut frame_rate_hz = None;

    let mut parser = lexopt::Parser::from_env();

    while let Some(arg) = parser.next()? {
        match arg {
            Short('s') | Long("speed") => {
                let value: u64 = parser.value()?.parse()?;
                if !(1..=5000).contains(&value) {
                    return Err("out of bounds value for option '--speed'".into());
                }
                cpu_hz = Some(value);
            }
            Short('f') | Long("fps") => {
                let value: u64 = parser.value()?.parse()?;
                if !(1..=240).contains(&value) {
                    return Err("out of bounds value for option '--fps'".into());
                }
                frame_rate_hz = Some(value);
            }
            Value(path) if rom.is_none() => {
                rom = Some(PathBuf::from(path));
            }
            Short('h') | Long("help") => {
                println!("{}", help_msg);
                std::process::exit(0);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(Args {
        rom: rom.ok_or("missing argument <ROM>; refer to --help for usage")?,
        cpu_hz,
        frame_rate_hz,
    })
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut options = Options::default();
    if let Some(hz) = args.cpu_hz {
        options.cpu_hz = hz;
    }
    if let Some(hz) = args.frame_rate_hz {
        options.frame_rate_hz = hz;
    }

    let mut vm = Vm::new(options)?;
    vm.load_rom_file(&args.rom)?;

    let title = args
        .rom
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("cervelat"));
    let mut window = window::Window::new(&title)?;

    // A machine without sound hardware still runs; fall back to a silent beeper
    let (beeper, _audio): (Box<dyn Beeper>, Option<audio::Audio>) = match audio::init() {
        Ok((audio, beeper)) => (Box::new(beeper), Some(audio)),
        Err(e) => {
            warn!("audio unavailable ({}); beeper disabled", e);
            (Box::new(NullBeeper), None)
        }
    };

    vm.run(&mut window, beeper)?;
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            eprintln!("cervelat: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cervelat: {}", e);
            ExitCode::FAILURE
        }
    }
}
