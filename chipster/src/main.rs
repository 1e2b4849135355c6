// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

extern crate chip8;
#[macro_use]
extern crate clap;
extern crate crossterm;
extern crate env_logger;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate rand;

mod keypad;
mod looper;
mod term;

use std::fs::File;
use std::io;
use std::path::Path;
use std::time::Instant;

use chip8::{Quirks, Status, Vm};
use rand::rngs::ThreadRng;

use keypad::Keypad;
use looper::Step;
use term::{Input, Terminal};

error_chain! {
    links {
        Chip8(chip8::Error, chip8::ErrorKind);
    }

    foreign_links {
        Io(io::Error);
    }
}

struct CommandArgs {
    rom_file_name: String,
    cycles_per_second: u32,
    skip_unknown: bool,
    dump: bool,
    quirks: Quirks,
}

impl CommandArgs {
    fn parse() -> CommandArgs {
        CommandArgs::from_matches(&CommandArgs::app().get_matches())
    }

    fn app() -> clap::App<'static, 'static> {
        use clap::{App, Arg};

        App::new("chip8 emulator")
            .arg(
                Arg::with_name("ROM_FILE")
                    .help("rom file to load")
                    .required(true)
                    .index(1),
            )
            .arg(
                Arg::with_name("cycles per second")
                    .short("c")
                    .long("cycles-per-sec")
                    .value_name("cycles_per_second")
                    .help(
                        "How many Chip8 cycles should be executed per second. Values between \
                         500-1000 should be fine.",
                    )
                    .takes_value(true)
                    .default_value("500")
                    .validator(|s| s.parse::<u32>().map(|_| ()).map_err(|e| e.to_string())),
            )
            .arg(
                Arg::with_name("skip unknown")
                    .long("skip-unknown")
                    .help("Log and step over unknown opcodes instead of stopping"),
            )
            .arg(
                Arg::with_name("dump")
                    .long("dump")
                    .help("Print a disassembly of the rom and exit"),
            )
            .arg(
                Arg::with_name("quirk index overflow")
                    .long("quirk-index-overflow")
                    .help("Fx1E sets VF when I goes past 0xFFF"),
            )
            .arg(
                Arg::with_name("quirk shift vy")
                    .long("quirk-shift-vy")
                    .help("8xy6/8xyE shift Vy into Vx"),
            )
            .arg(
                Arg::with_name("quirk load store")
                    .long("quirk-load-store")
                    .help("Fx55/Fx65 advance I past the transferred registers"),
            )
    }

    fn from_matches(matches: &clap::ArgMatches) -> CommandArgs {
        let cycles_per_second =
            value_t!(matches, "cycles per second", u32).unwrap_or_else(|e| e.exit());

        let quirks = Quirks {
            index_overflow_flag: matches.is_present("quirk index overflow"),
            shift_uses_vy: matches.is_present("quirk shift vy"),
            load_store_increments_index: matches.is_present("quirk load store"),
        };

        CommandArgs {
            rom_file_name: matches.value_of("ROM_FILE").unwrap_or_default().to_string(),
            cycles_per_second,
            skip_unknown: matches.is_present("skip unknown"),
            dump: matches.is_present("dump"),
            quirks,
        }
    }
}

fn read_rom<P: AsRef<Path>>(path: P) -> Result<Vec<u8>> {
    use std::io::Read;

    let mut rom_file = File::open(path)?;
    let mut rom_buffer = Vec::new();
    rom_file.read_to_end(&mut rom_buffer)?;
    Ok(rom_buffer)
}

fn dump(rom_data: &[u8]) {
    for line in chip8::disassemble(rom_data) {
        match line.instruction {
            Ok(instruction) => println!("{:03x}: {}  {}", line.addr, line.word, instruction),
            Err(_) => println!("{:03x}: {}  ???", line.addr, line.word),
        }
    }
}

fn main() {
    use std::process::exit;

    env_logger::init();

    match do_run() {
        Ok(_) => exit(0),
        Err(e) => {
            eprintln!("Error: {}", e);
            exit(1);
        }
    }
}

fn do_run() -> Result<()> {
    let args = CommandArgs::parse();
    let rom_data = read_rom(&args.rom_file_name)?;

    if args.dump {
        dump(&rom_data);
        return Ok(());
    }

    let mut vm = Vm::with_quirks(args.quirks);
    vm.load_rom(&rom_data)?;
    info!(
        "running {} ({} bytes) at {} cycles/s",
        args.rom_file_name,
        rom_data.len(),
        args.cycles_per_second
    );

    App::new(&args, vm).run()
}

struct App<'a> {
    command_args: &'a CommandArgs,
    vm: Vm,
    rng: ThreadRng,
    keypad: Keypad,
    passed_dt: f64,
}

impl<'a> App<'a> {
    fn new(command_args: &'a CommandArgs, vm: Vm) -> App<'a> {
        App {
            command_args,
            vm,
            rng: rand::thread_rng(),
            keypad: Keypad::new(),
            passed_dt: 0f64,
        }
    }

    fn run(mut self) -> Result<()> {
        let mut terminal = Terminal::open()?;
        let mut last_frame = Instant::now();

        looper::start_loop(|| {
            self.keypad.frame();
            if let Input::Quit = terminal.poll_input(&mut self.keypad)? {
                return Ok(Step::Done);
            }

            let now = Instant::now();
            let dt = now.duration_since(last_frame).as_secs_f64();
            last_frame = now;

            self.update(dt)?;
            if self.vm.take_redraw() {
                terminal.render(self.vm.display())?;
            }
            terminal.set_beeping(self.vm.is_beeping())?;

            Ok(Step::Cont)
        })
    }

    fn update(&mut self, dt: f64) -> Result<()> {
        const TIMER_TICK_DURATION: f64 = 1.0 / 60.0;

        let cycles_to_perform = (dt * self.command_args.cycles_per_second as f64).floor() as usize;
        let keys = self.keypad.snapshot();

        for _ in 0..cycles_to_perform {
            self.vm.set_keys(keys);
            match self.vm.cycle(&mut self.rng) {
                Ok(Status::Executed) => {}
                Ok(Status::WaitingForKey) => break,
                Err(e) => self.recover(e)?,
            }
        }

        // Timers run on wall time, also while waiting for a key.
        self.passed_dt += dt;
        if self.passed_dt > TIMER_TICK_DURATION {
            let ticks_passed = (self.passed_dt / TIMER_TICK_DURATION) as u8;
            self.passed_dt -= ticks_passed as f64 * TIMER_TICK_DURATION;
            self.vm.update_timers(ticks_passed);
        }

        Ok(())
    }

    fn recover(&mut self, e: chip8::Error) -> Result<()> {
        let unknown = match *e.kind() {
            chip8::ErrorKind::UnknownOpcode(opcode) => Some(opcode),
            _ => None,
        };

        match unknown {
            Some(opcode) if self.command_args.skip_unknown => {
                warn!("skipping unknown opcode {:04x} at {:03x}", opcode, self.vm.pc());
                self.vm.skip_instruction();
                Ok(())
            }
            _ => {
                error!("halting at {:03x}: {:?}", self.vm.pc(), self.vm);
                Err(e.into())
            }
        }
    }
}
