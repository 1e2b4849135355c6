use std::fmt;

use crate::{ErrorKind, Result, STACK_DEPTH};

/// Return address stack. `sp` is the next free slot, so 0 means empty.
#[derive(Clone)]
pub struct Stack {
    sp: usize,
    frames: [u16; STACK_DEPTH],
}

impl Stack {
    pub fn new() -> Stack {
        Stack {
            sp: 0,
            frames: [0; STACK_DEPTH],
        }
    }

    pub fn pop(&mut self) -> Result<u16> {
        if self.sp == 0 {
            bail!(ErrorKind::StackUnderflow);
        }
        self.sp -= 1;
        Ok(self.frames[self.sp])
    }

    pub fn push(&mut self, value: u16) -> Result<()> {
        if self.sp == STACK_DEPTH {
            bail!(ErrorKind::StackOverflow);
        }
        self.frames[self.sp] = value;
        self.sp += 1;
        Ok(())
    }

    pub fn depth(&self) -> usize {
        self.sp
    }
}

impl fmt::Debug for Stack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let frames: Vec<_> = self.frames[..self.sp]
            .iter()
            .map(|addr| format!("{:04x}", addr))
            .collect();
        f.debug_struct("Stack")
            .field("sp", &self.sp)
            .field("frames", &frames)
            .finish()
    }
}
