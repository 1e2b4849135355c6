use std::fmt;
use std::ops::{Index, IndexMut};

use crate::instruction::Reg;

#[derive(Clone, PartialEq, Eq)]
pub struct RegFile {
    gpr: [u8; 16],
}

impl RegFile {
    pub fn new() -> RegFile {
        RegFile { gpr: [0; 16] }
    }

    /// Sets VF to 1 or 0. Callers write it after their result register.
    pub fn set_flag(&mut self, flag: bool) {
        self[Reg::Vf] = flag as u8;
    }

    /// V0 through `last`, inclusive.
    pub fn up_to(&self, last: Reg) -> &[u8] {
        &self.gpr[..=last.index() as usize]
    }

    pub fn up_to_mut(&mut self, last: Reg) -> &mut [u8] {
        &mut self.gpr[..=last.index() as usize]
    }
}

impl Index<Reg> for RegFile {
    type Output = u8;

    fn index(&self, index: Reg) -> &u8 {
        &self.gpr[index.index() as usize]
    }
}

impl IndexMut<Reg> for RegFile {
    fn index_mut(&mut self, index: Reg) -> &mut u8 {
        &mut self.gpr[index.index() as usize]
    }
}

impl fmt::Debug for RegFile {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut dbg = f.debug_struct("RegFile");
        for (i, value) in self.gpr.iter().enumerate() {
            let reg_name = format!("V{:0X}", i);
            let reg_value = format!("{:02x}", value);
            dbg.field(&reg_name, &reg_value);
        }
        dbg.finish()
    }
}
