use std::fmt;

use rand::Rng;

use crate::display::Framebuffer;
use crate::instruction::*;
use crate::keyboard::Keyboard;
use crate::quirks::Quirks;
use crate::regfile::RegFile;
use crate::stack::Stack;
use crate::timer::Timer;
use crate::{ErrorKind, Result, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};

/// Keeps computed addresses inside the 4K address space.
const ADDR_MASK: u16 = 0x0FFF;

/// Outcome of a successful `Vm::cycle`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Status {
    Executed,
    /// Parked on `Fx0A` until a key goes down; pc still points at it.
    WaitingForKey,
}

/// Where the program counter goes once an instruction has been applied.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Flow {
    Advance,
    Skip,
    Jump(u16),
    Wait,
}

fn skip_if(cond: bool) -> Flow {
    if cond {
        Flow::Skip
    } else {
        Flow::Advance
    }
}

#[derive(Clone)]
pub struct Vm {
    memory: [u8; MEMORY_SIZE],
    gpr: RegFile,
    stack: Stack,
    pc: u16,
    i: u16,
    dt: Timer,
    st: Timer,
    display: Framebuffer,
    keyboard: Keyboard,
    quirks: Quirks,
}

impl Vm {
    pub fn new() -> Vm {
        Vm::with_quirks(Quirks::default())
    }

    pub fn with_quirks(quirks: Quirks) -> Vm {
        let mut vm = Vm {
            memory: [0; MEMORY_SIZE],
            gpr: RegFile::new(),
            stack: Stack::new(),
            pc: PROGRAM_START,
            i: 0,
            dt: Timer::new(),
            st: Timer::new(),
            display: Framebuffer::new(),
            keyboard: Keyboard::default(),
            quirks,
        };

        {
            let font_start = FONT_MEMORY_OFFSET as usize;
            let font_memory = &mut vm.memory[font_start..font_start + FONT_SPRITES.len()];
            font_memory.copy_from_slice(&FONT_SPRITES);
        }

        debug!("new machine, quirks: {:?}", quirks);
        vm
    }

    pub fn with_rom(rom_data: &[u8]) -> Result<Vm> {
        let mut vm = Vm::new();
        vm.load_rom(rom_data)?;
        Ok(vm)
    }

    /// Replaces everything from `PROGRAM_START` up with `rom_data`, zero
    /// filled. Memory is left untouched if the image does not fit.
    pub fn load_rom(&mut self, rom_data: &[u8]) -> Result<()> {
        if rom_data.len() > MAX_ROM_SIZE {
            bail!(ErrorKind::RomTooLarge(rom_data.len()));
        }

        let start = PROGRAM_START as usize;
        for byte in &mut self.memory[start..] {
            *byte = 0;
        }
        self.memory[start..start + rom_data.len()].copy_from_slice(rom_data);
        debug!("loaded {} byte rom at {:03x}", rom_data.len(), start);
        Ok(())
    }

    /// Fetches, decodes and executes one instruction.
    ///
    /// On error nothing has been changed, so the caller is free to
    /// halt, or to `skip_instruction` and carry on.
    pub fn cycle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Status> {
        let word = self.fetch();
        let instruction = Instruction::decode(word)?;
        trace!("{:03x}: {} {}", self.pc, word, instruction);

        let status = match self.execute_instruction(instruction, rng)? {
            Flow::Advance => {
                self.pc = self.pc.wrapping_add(2) & ADDR_MASK;
                Status::Executed
            }
            Flow::Skip => {
                self.pc = self.pc.wrapping_add(4) & ADDR_MASK;
                Status::Executed
            }
            Flow::Jump(addr) => {
                self.pc = addr & ADDR_MASK;
                Status::Executed
            }
            Flow::Wait => Status::WaitingForKey,
        };

        Ok(status)
    }

    /// Moves past the current instruction without executing it.
    pub fn skip_instruction(&mut self) {
        self.pc = self.pc.wrapping_add(2) & ADDR_MASK;
    }

    pub fn update_timers(&mut self, ticks: u8) {
        self.dt.step(ticks);
        self.st.step(ticks);
    }

    pub fn set_keys(&mut self, keys: [bool; 16]) {
        self.keyboard.set(keys);
    }

    pub fn display(&self) -> &Framebuffer {
        &self.display
    }

    /// Returns whether the framebuffer changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        self.display.take_redraw()
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn reg(&self, reg: Reg) -> u8 {
        self.gpr[reg]
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    pub fn stack_depth(&self) -> usize {
        self.stack.depth()
    }

    pub fn delay_timer(&self) -> u8 {
        self.dt.get()
    }

    pub fn sound_timer(&self) -> u8 {
        self.st.get()
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    pub fn is_beeping(&self) -> bool {
        self.st.get() != 0
    }

    fn fetch(&self) -> InstructionWord {
        InstructionWord::from_bytes([self.read(self.pc), self.read(self.pc.wrapping_add(1))])
    }

    fn read(&self, addr: u16) -> u8 {
        self.memory[(addr & ADDR_MASK) as usize]
    }

    fn write(&mut self, addr: u16, value: u8) {
        self.memory[(addr & ADDR_MASK) as usize] = value;
    }

    fn execute_instruction<R: Rng + ?Sized>(
        &mut self,
        instruction: Instruction,
        rng: &mut R,
    ) -> Result<Flow> {
        use crate::instruction::Instruction::*;

        let flow = match instruction {
            ClearScreen => {
                self.display.clear();
                Flow::Advance
            }
            Ret => {
                let retaddr = self.stack.pop()?;
                debug!("ret {:03x} -> {:03x}", self.pc, retaddr);
                Flow::Jump(retaddr)
            }
            Jump(addr) => Flow::Jump(addr.0),
            Call(addr) => {
                let retaddr = self.pc.wrapping_add(2) & ADDR_MASK;
                self.stack.push(retaddr)?;
                debug!("call {:03x} from {:03x}", addr.0, self.pc);
                Flow::Jump(addr.0)
            }
            SkipEqImm { vx, imm, inv } => skip_if((self.gpr[vx] == imm.0) != inv),
            SkipEqReg { vx, vy, inv } => skip_if((self.gpr[vx] == self.gpr[vy]) != inv),
            PutImm { vx, imm } => {
                self.gpr[vx] = imm.0;
                Flow::Advance
            }
            AddImm { vx, imm } => {
                let x = self.gpr[vx];
                self.gpr[vx] = x.wrapping_add(imm.0);
                Flow::Advance
            }
            Apply { vx, vy, f } => {
                self.apply(vx, vy, f);
                Flow::Advance
            }
            SetI(addr) => {
                self.i = addr.0;
                Flow::Advance
            }
            JumpPlusV0(addr) => Flow::Jump(addr.0.wrapping_add(self.gpr[Reg::V0] as u16)),
            Randomize { vx, imm } => {
                let random_byte = rng.gen::<u8>();
                self.gpr[vx] = random_byte & imm.0;
                Flow::Advance
            }
            Draw { vx, vy, n } => {
                let x = self.gpr[vx] as usize;
                let y = self.gpr[vy] as usize;
                let rows = n.0 as usize;

                let mut sprite = [0u8; 15];
                for (row, byte) in sprite[..rows].iter_mut().enumerate() {
                    *byte = self.read(self.i.wrapping_add(row as u16));
                }

                let collision_bit = self.display.draw(x, y, &sprite[..rows]);
                self.gpr.set_flag(collision_bit);
                Flow::Advance
            }
            SkipPressed { vx, inv } => {
                let key = self.gpr[vx];
                skip_if(self.keyboard.is_pressed(key) != inv)
            }
            GetDT(vx) => {
                self.gpr[vx] = self.dt.get();
                Flow::Advance
            }
            WaitKey(vx) => match self.keyboard.poll_new_press() {
                Some(key) => {
                    self.gpr[vx] = key;
                    Flow::Advance
                }
                None => Flow::Wait,
            },
            SetDT(vx) => {
                self.dt.set(self.gpr[vx]);
                Flow::Advance
            }
            SetST(vx) => {
                self.st.set(self.gpr[vx]);
                Flow::Advance
            }
            AddI(vx) => {
                let sum = self.i.wrapping_add(self.gpr[vx] as u16);
                self.i = sum;
                if self.quirks.index_overflow_flag {
                    self.gpr.set_flag(sum > ADDR_MASK);
                }
                Flow::Advance
            }
            LoadGlyph(vx) => {
                let digit = self.gpr[vx] & 0x0F;
                self.i = FONT_MEMORY_OFFSET + digit as u16 * FONT_GLYPH_SIZE;
                Flow::Advance
            }
            StoreBCD(vx) => {
                let v = self.gpr[vx];
                let i = self.i;

                self.write(i, v / 100);
                self.write(i.wrapping_add(1), (v / 10) % 10);
                self.write(i.wrapping_add(2), v % 10);
                Flow::Advance
            }
            StoreRegs(vx) => {
                let i = self.i as usize;
                for (offset, &value) in self.gpr.up_to(vx).iter().enumerate() {
                    self.memory[(i + offset) & ADDR_MASK as usize] = value;
                }
                self.advance_index_after_transfer(vx);
                Flow::Advance
            }
            LoadRegs(vx) => {
                let i = self.i as usize;
                for (offset, value) in self.gpr.up_to_mut(vx).iter_mut().enumerate() {
                    *value = self.memory[(i + offset) & ADDR_MASK as usize];
                }
                self.advance_index_after_transfer(vx);
                Flow::Advance
            }
        };

        Ok(flow)
    }

    /// `8xyN`. VF, where affected, is written after Vx so that it ends up
    /// holding the flag even when it is also the destination.
    fn apply(&mut self, vx: Reg, vy: Reg, f: Fun) {
        let x = self.gpr[vx];
        let y = self.gpr[vy];
        let shifted = if self.quirks.shift_uses_vy { y } else { x };

        match f {
            Fun::Id => {
                self.gpr[vx] = y;
            }
            Fun::Or => {
                self.gpr[vx] = x | y;
            }
            Fun::And => {
                self.gpr[vx] = x & y;
            }
            Fun::Xor => {
                self.gpr[vx] = x ^ y;
            }
            Fun::Add => {
                let (v, overflow) = x.overflowing_add(y);
                self.gpr[vx] = v;
                self.gpr.set_flag(overflow);
            }
            Fun::Subtract => {
                let (v, borrow) = x.overflowing_sub(y);
                self.gpr[vx] = v;
                self.gpr.set_flag(!borrow);
            }
            Fun::ShiftRight => {
                self.gpr[vx] = shifted >> 1;
                self.gpr.set_flag(shifted & 0x01 != 0);
            }
            Fun::SubtractInv => {
                let (v, borrow) = y.overflowing_sub(x);
                self.gpr[vx] = v;
                self.gpr.set_flag(!borrow);
            }
            Fun::ShiftLeft => {
                self.gpr[vx] = shifted << 1;
                self.gpr.set_flag(shifted & 0x80 != 0);
            }
        }
    }

    fn advance_index_after_transfer(&mut self, vx: Reg) {
        if self.quirks.load_store_increments_index {
            self.i = self.i.wrapping_add(vx.index() as u16 + 1);
        }
    }
}

impl Default for Vm {
    fn default() -> Vm {
        Vm::new()
    }
}

impl fmt::Debug for Vm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Vm")
            .field("gpr", &self.gpr)
            .field("pc", &format!("{:04x}", self.pc))
            .field("i", &format!("{:04x}", self.i))
            .field("dt", &format!("{:02x}", self.dt.get()))
            .field("st", &format!("{:02x}", self.st.get()))
            .field("stack", &self.stack)
            .field("display", &self.display)
            .finish()
    }
}

pub const FONT_MEMORY_OFFSET: u16 = 0;
pub const FONT_GLYPH_SIZE: u16 = 5;

#[rustfmt::skip]
const FONT_SPRITES: [u8; 80] = [
	0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
	0x20, 0x60, 0x20, 0x20, 0x70, // 1
	0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
	0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
	0x90, 0x90, 0xF0, 0x10, 0x10, // 4
	0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
	0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
	0xF0, 0x10, 0x20, 0x40, 0x40, // 7
	0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
	0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
	0xF0, 0x90, 0xF0, 0x90, 0x90, // A
	0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
	0xF0, 0x80, 0x80, 0x80, 0xF0, // C
	0xE0, 0x90, 0x90, 0x90, 0xE0, // D
	0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
	0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
