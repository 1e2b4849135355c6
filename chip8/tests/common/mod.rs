#![allow(dead_code)]

use chip8::{Error, Quirks, Status, Vm};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Machine {
    pub vm: Vm,
    pub rng: StdRng,
}

impl Machine {
    pub fn boot(rom: &[u8]) -> Machine {
        Machine::boot_with(rom, Quirks::default())
    }

    pub fn boot_with(rom: &[u8], quirks: Quirks) -> Machine {
        let _ = env_logger::builder().is_test(true).try_init();

        let mut vm = Vm::with_quirks(quirks);
        vm.load_rom(rom).expect("rom should fit");
        Machine {
            vm,
            rng: StdRng::seed_from_u64(0x2281),
        }
    }

    pub fn step(&mut self) -> Status {
        self.vm.cycle(&mut self.rng).expect("cycle should succeed")
    }

    pub fn run(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.step();
        }
    }

    pub fn step_err(&mut self) -> Error {
        match self.vm.cycle(&mut self.rng) {
            Ok(status) => panic!("expected an error, got {:?}", status),
            Err(e) => e,
        }
    }
}

/// Flattens opcodes into a big-endian rom image.
pub fn rom(words: &[u16]) -> Vec<u8> {
    words
        .iter()
        .flat_map(|word| vec![(word >> 8) as u8, *word as u8])
        .collect()
}
