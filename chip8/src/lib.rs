// `error_chain!` can recurse deeply
#![recursion_limit = "1024"]

extern crate byteorder;
#[macro_use]
extern crate enum_primitive;
#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate log;
extern crate rand;

mod stack;
mod timer;
mod keyboard;
mod vm;
mod regfile;

pub mod display;
pub mod disasm;
pub mod instruction;
pub mod quirks;

pub use self::disasm::disassemble;
pub use self::quirks::Quirks;
pub use self::vm::{Status, Vm};

/// Total addressable memory.
pub const MEMORY_SIZE: usize = 4096;

/// Address at which programs are loaded and execution starts.
pub const PROGRAM_START: u16 = 0x200;

/// Largest ROM that fits between `PROGRAM_START` and the end of memory.
pub const MAX_ROM_SIZE: usize = MEMORY_SIZE - PROGRAM_START as usize;

/// Maximum number of nested calls.
pub const STACK_DEPTH: usize = 16;

error_chain! {
    errors {
        UnknownOpcode(opcode: u16) {
            description("unknown opcode")
            display("unknown opcode {:04x}", opcode)
        }
        StackOverflow {
            description("stack overflow")
            display("call with {} return addresses already on the stack", STACK_DEPTH)
        }
        StackUnderflow {
            description("stack underflow")
            display("return with an empty stack")
        }
        RomTooLarge(len: usize) {
            description("rom is too large")
            display("rom is {} bytes long, at most {} bytes fit in memory", len, MAX_ROM_SIZE)
        }
    }
}
