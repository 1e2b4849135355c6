//! Linear listing of a ROM image, two bytes per instruction.

use crate::instruction::{Instruction, InstructionWord};
use crate::{Result, PROGRAM_START};

pub struct Line {
    pub addr: u16,
    pub word: InstructionWord,
    pub instruction: Result<Instruction>,
}

/// Walks `rom` as if loaded at `PROGRAM_START`. Stops at the first `0000`
/// word, which is where padding usually starts. A trailing odd byte is dropped.
pub fn disassemble(rom: &[u8]) -> impl Iterator<Item = Line> + '_ {
    rom.chunks_exact(2)
        .map(|pair| InstructionWord::from_bytes([pair[0], pair[1]]))
        .take_while(|word| word.opcode() != 0x0000)
        .enumerate()
        .map(|(index, word)| Line {
            addr: PROGRAM_START + (index * 2) as u16,
            word,
            instruction: Instruction::decode(word),
        })
}
