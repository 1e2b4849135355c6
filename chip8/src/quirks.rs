//! Behaviours that differ between historical CHIP-8 interpreters.
//!
//! Every toggle defaults to off, which gives the common modern semantics.

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Quirks {
    /// `Fx1E` sets VF to 1 when I goes past 0xFFF, and to 0 otherwise
    /// (Amiga interpreter).
    pub index_overflow_flag: bool,
    /// `8xy6`/`8xyE` shift Vy and store the result in Vx (COSMAC VIP),
    /// instead of shifting Vx in place.
    pub shift_uses_vy: bool,
    /// `Fx55`/`Fx65` leave I pointing past the last byte transferred
    /// (COSMAC VIP).
    pub load_store_increments_index: bool,
}

impl Quirks {
    /// Original COSMAC VIP behaviour.
    pub fn cosmac() -> Quirks {
        Quirks {
            index_overflow_flag: false,
            shift_uses_vy: true,
            load_store_increments_index: true,
        }
    }
}
