use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use enum_primitive::FromPrimitive;

use crate::{ErrorKind, Result};

/// Raw 16-bit instruction word, high byte first in memory.
///
/// Field accessors are total: any `u16` is a valid word, it just might not
/// decode into a known `Instruction`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct InstructionWord(pub u16);

impl InstructionWord {
    pub fn from_bytes(bytes: [u8; 2]) -> InstructionWord {
        InstructionWord(BigEndian::read_u16(&bytes))
    }

    pub fn opcode(self) -> u16 {
        self.0
    }

    /// Top nibble, still in place (`0x0000`, `0x1000`, ..., `0xF000`).
    pub fn group(self) -> u16 {
        self.0 & 0xF000
    }

    pub fn x(self) -> u8 {
        ((self.0 & 0x0F00) >> 8) as u8
    }

    pub fn y(self) -> u8 {
        ((self.0 & 0x00F0) >> 4) as u8
    }

    pub fn n(self) -> u8 {
        (self.0 & 0x000F) as u8
    }

    pub fn kk(self) -> u8 {
        (self.0 & 0x00FF) as u8
    }

    pub fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }

    fn vx(self) -> Reg {
        Reg::from_index(self.x())
    }

    fn vy(self) -> Reg {
        Reg::from_index(self.y())
    }
}

impl fmt::Display for InstructionWord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:04x}", self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reg {
    V0 = 0x0,
    V1 = 0x1,
    V2 = 0x2,
    V3 = 0x3,
    V4 = 0x4,
    V5 = 0x5,
    V6 = 0x6,
    V7 = 0x7,
    V8 = 0x8,
    V9 = 0x9,
    Va = 0xA,
    Vb = 0xB,
    Vc = 0xC,
    Vd = 0xD,
    Ve = 0xE,
    Vf = 0xF,
}

impl Reg {
    /// Only the low nibble of `index` is used.
    pub fn from_index(index: u8) -> Reg {
        use self::Reg::*;
        const BY_INDEX: [Reg; 16] = [
            V0, V1, V2, V3, V4, V5, V6, V7, V8, V9, Va, Vb, Vc, Vd, Ve, Vf,
        ];
        BY_INDEX[(index & 0x0F) as usize]
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "V{:X}", self.index())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Addr(pub u16);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Imm(pub u8);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Imm4(pub u8);

enum_from_primitive! {
/// Register-register ALU operations of the `8xyN` group, keyed by `N`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Fun {
    Id = 0x0,
    Or = 0x1,
    And = 0x2,
    Xor = 0x3,
    Add = 0x4,
    Subtract = 0x5,
    ShiftRight = 0x6,
    SubtractInv = 0x7,
    ShiftLeft = 0xE
}
}

impl Fun {
    fn mnemonic(self) -> &'static str {
        match self {
            Fun::Id => "LD",
            Fun::Or => "OR",
            Fun::And => "AND",
            Fun::Xor => "XOR",
            Fun::Add => "ADD",
            Fun::Subtract => "SUB",
            Fun::ShiftRight => "SHR",
            Fun::SubtractInv => "SUBN",
            Fun::ShiftLeft => "SHL",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Instruction {
    ClearScreen,
    Ret,
    Jump(Addr),
    Call(Addr),
    SkipEqImm { vx: Reg, imm: Imm, inv: bool },
    SkipEqReg { vx: Reg, vy: Reg, inv: bool },
    PutImm { vx: Reg, imm: Imm },
    AddImm { vx: Reg, imm: Imm },
    Apply { vx: Reg, vy: Reg, f: Fun },
    SetI(Addr),
    JumpPlusV0(Addr),
    Randomize { vx: Reg, imm: Imm },
    Draw { vx: Reg, vy: Reg, n: Imm4 },
    SkipPressed { vx: Reg, inv: bool },
    GetDT(Reg),
    WaitKey(Reg),
    SetDT(Reg),
    SetST(Reg),
    AddI(Reg),
    LoadGlyph(Reg),
    StoreBCD(Reg),
    StoreRegs(Reg),
    LoadRegs(Reg),
}

impl Instruction {
    pub fn decode(word: InstructionWord) -> Result<Instruction> {
        use self::Instruction::*;

        let instruction = match word.group() {
            0x0000 => match word.opcode() {
                0x00E0 => ClearScreen,
                0x00EE => Ret,
                _ => return Err(unknown(word)),
            },
            0x1000 => Jump(Addr(word.nnn())),
            0x2000 => Call(Addr(word.nnn())),
            0x3000 | 0x4000 => SkipEqImm {
                vx: word.vx(),
                imm: Imm(word.kk()),
                inv: word.group() == 0x4000,
            },
            0x5000 | 0x9000 if word.n() == 0 => SkipEqReg {
                vx: word.vx(),
                vy: word.vy(),
                inv: word.group() == 0x9000,
            },
            0x6000 => PutImm {
                vx: word.vx(),
                imm: Imm(word.kk()),
            },
            0x7000 => AddImm {
                vx: word.vx(),
                imm: Imm(word.kk()),
            },
            0x8000 => match Fun::from_u8(word.n()) {
                Some(f) => Apply {
                    vx: word.vx(),
                    vy: word.vy(),
                    f,
                },
                None => return Err(unknown(word)),
            },
            0xA000 => SetI(Addr(word.nnn())),
            0xB000 => JumpPlusV0(Addr(word.nnn())),
            0xC000 => Randomize {
                vx: word.vx(),
                imm: Imm(word.kk()),
            },
            0xD000 => Draw {
                vx: word.vx(),
                vy: word.vy(),
                n: Imm4(word.n()),
            },
            0xE000 => match word.kk() {
                0x9E => SkipPressed {
                    vx: word.vx(),
                    inv: false,
                },
                0xA1 => SkipPressed {
                    vx: word.vx(),
                    inv: true,
                },
                _ => return Err(unknown(word)),
            },
            0xF000 => match word.kk() {
                0x07 => GetDT(word.vx()),
                0x0A => WaitKey(word.vx()),
                0x15 => SetDT(word.vx()),
                0x18 => SetST(word.vx()),
                0x1E => AddI(word.vx()),
                0x29 => LoadGlyph(word.vx()),
                0x33 => StoreBCD(word.vx()),
                0x55 => StoreRegs(word.vx()),
                0x65 => LoadRegs(word.vx()),
                _ => return Err(unknown(word)),
            },
            _ => return Err(unknown(word)),
        };

        Ok(instruction)
    }
}

fn unknown(word: InstructionWord) -> crate::Error {
    ErrorKind::UnknownOpcode(word.opcode()).into()
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Instruction::*;

        match *self {
            ClearScreen => write!(f, "CLS"),
            Ret => write!(f, "RET"),
            Jump(addr) => write!(f, "JP #{:03x}", addr.0),
            Call(addr) => write!(f, "CALL #{:03x}", addr.0),
            SkipEqImm { vx, imm, inv } => {
                let mnemonic = if inv { "SNE" } else { "SE" };
                write!(f, "{} {}, #{:02x}", mnemonic, vx, imm.0)
            }
            SkipEqReg { vx, vy, inv } => {
                let mnemonic = if inv { "SNE" } else { "SE" };
                write!(f, "{} {}, {}", mnemonic, vx, vy)
            }
            PutImm { vx, imm } => write!(f, "LD {}, #{:02x}", vx, imm.0),
            AddImm { vx, imm } => write!(f, "ADD {}, #{:02x}", vx, imm.0),
            Apply { vx, vy, f: fun } => write!(f, "{} {}, {}", fun.mnemonic(), vx, vy),
            SetI(addr) => write!(f, "LD I, #{:03x}", addr.0),
            JumpPlusV0(addr) => write!(f, "JP V0, #{:03x}", addr.0),
            Randomize { vx, imm } => write!(f, "RND {}, #{:02x}", vx, imm.0),
            Draw { vx, vy, n } => write!(f, "DRW {}, {}, {}", vx, vy, n.0),
            SkipPressed { vx, inv: false } => write!(f, "SKP {}", vx),
            SkipPressed { vx, inv: true } => write!(f, "SKNP {}", vx),
            GetDT(vx) => write!(f, "LD {}, DT", vx),
            WaitKey(vx) => write!(f, "LD {}, K", vx),
            SetDT(vx) => write!(f, "LD DT, {}", vx),
            SetST(vx) => write!(f, "LD ST, {}", vx),
            AddI(vx) => write!(f, "ADD I, {}", vx),
            LoadGlyph(vx) => write!(f, "LD F, {}", vx),
            StoreBCD(vx) => write!(f, "LD B, {}", vx),
            StoreRegs(vx) => write!(f, "LD [I], {}", vx),
            LoadRegs(vx) => write!(f, "LD {}, [I]", vx),
        }
    }
}
