//! Entrypoint for CLI
use std::{env, error::Error, fs, time::Instant};

use chip8vm::{prelude::*, IMPL_VERSION};
use log::info;

static USAGE: &str = r#"
usage: chip8vm run ROM [OPTIONS]

Runs the ROM headless, then prints the display buffer.

options:
    --frames N  Number of 60Hz frames to run (default 600)
    --hz N      Instructions executed per second (default 600)
    --seed N    Seed for the random number generator
    --key K     Hold down keypad key K (0-F) for the whole run, repeatable

examples:
    chip8vm run maze.ch8
    chip8vm run maze.ch8 --frames 120 --hz 1000
    chip8vm run pong.ch8 --key 1 --key c
"#;

const DEFAULT_FRAMES: usize = 600;

fn run_bytecode(opts: RunOpts) -> Chip8Result<()> {
    info!("running {}", opts.filepath);

    let bytecode = fs::read(&opts.filepath)?;

    let mut vm = Chip8Vm::new(opts.conf);
    vm.load_bytecode(bytecode.as_slice())?;

    for key in &opts.keys {
        info!("holding key {key}");
        vm.set_key(*key, true);
    }

    let start = Instant::now();
    run_frames(&mut vm, opts.frames, &mut Clock::default())?;
    let end = Instant::now();

    println!(
        "time taken: {}ms",
        end.duration_since(start).as_nanos() as f64 / 1000000.0
    ); // to millis
    println!("{}", vm.display().dump()?);

    Ok(())
}

/// Run the VM for the given number of frames, pacing each one on the clock.
///
/// Faults are returned to the caller, which reports them.
fn run_frames(vm: &mut Chip8Vm, frames: usize, clock: &mut Clock) -> Chip8Result<()> {
    let mut buzzer = false;

    for _ in 0..frames {
        let flow = vm.run_frame()?;

        if vm.is_sound_active() != buzzer {
            buzzer = vm.is_sound_active();
            info!("buzzer {}", if buzzer { "on" } else { "off" });
        }

        if flow == Flow::KeyWait {
            // Only held keys are attached to a headless run.
            info!("program is waiting for a key press, stopping");
            break;
        }

        clock.wait();
    }

    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    simple_logger::SimpleLogger::new().env().init()?;

    match parse_args(env::args().skip(1)) {
        Ok(Cmd::Run(opts)) => run_bytecode(opts)?,
        Err(msg) => {
            if let Some(msg) = msg {
                eprintln!("{msg}");
            }
            print_usage();
            // FreeBSD EX_USAGE (64)
            std::process::exit(64)
        }
    }

    Ok(())
}

/// Parse the command line. An error without a message means plain usage should be shown.
fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Cmd, Option<String>> {
    match args.next().as_deref() {
        Some("run") => {
            let filepath = args.next().ok_or(None)?;
            let mut opts = RunOpts {
                filepath,
                frames: DEFAULT_FRAMES,
                conf: Chip8Conf::default(),
                keys: Vec::new(),
            };

            while let Some(flag) = args.next() {
                if flag == "--key" {
                    opts.keys.push(consume_key(&flag, args.next())?);
                    continue;
                }

                let value = consume_number(&flag, args.next())?;
                match flag.as_str() {
                    "--frames" => opts.frames = value as usize,
                    "--hz" => opts.conf.clock_frequency = Some(Hz(value)),
                    "--seed" => opts.conf.seed = Some(value),
                    _ => return Err(Some(format!("unknown option {flag}"))),
                }
            }

            Ok(Cmd::Run(opts))
        }
        Some(cmd) => Err(Some(format!("unknown command {cmd}"))),
        None => Err(None),
    }
}

/// Consumes the value following an option.
fn consume_number(flag: &str, arg: Option<String>) -> Result<u64, Option<String>> {
    let arg = arg.ok_or_else(|| Some(format!("missing value for {flag}")))?;
    arg.parse()
        .map_err(|_| Some(format!("value for {flag} must be a number, got {arg}")))
}

/// Consumes the keypad key following an option.
fn consume_key(flag: &str, arg: Option<String>) -> Result<KeyCode, Option<String>> {
    let arg = arg.ok_or_else(|| Some(format!("missing value for {flag}")))?;
    arg.parse().map_err(|err: InvalidKeyCode| Some(err.to_string()))
}

fn print_usage() {
    println!("Chip8vm v{IMPL_VERSION}");
    println!("{USAGE}");
}

enum Cmd {
    /// Run file
    Run(RunOpts),
}

struct RunOpts {
    filepath: String,
    frames: usize,
    conf: Chip8Conf,
    /// Keys held down from the first frame.
    keys: Vec<KeyCode>,
}
