/// Snapshot of the 16-key hex keypad, supplied by the host before each cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Keyboard {
    keys: [bool; 16],
    /// Keys that were already down when a key wait began, minus any released
    /// since. `None` when no wait is in progress.
    held_at_wait: Option<[bool; 16]>,
}

impl Keyboard {
    pub fn set(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    /// Only the low nibble of `key` is used.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys[(key & 0x0F) as usize]
    }

    /// Lowest-numbered key that went down since the wait began, if any.
    ///
    /// The first call starts the wait. Keys held at that point only count
    /// once they have been released and pressed again.
    pub fn poll_new_press(&mut self) -> Option<u8> {
        let keys = self.keys;
        let held = self.held_at_wait.get_or_insert(keys);
        for (slot, &down) in held.iter_mut().zip(keys.iter()) {
            *slot &= down;
        }

        let pressed = keys
            .iter()
            .zip(held.iter())
            .position(|(&down, &held)| down && !held)
            .map(|key| key as u8);
        if pressed.is_some() {
            self.held_at_wait = None;
        }
        pressed
    }
}
