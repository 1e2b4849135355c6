/// Terminals only report key presses, so a key counts as held for this many
/// frames after its last press (auto-repeat keeps it alive while held).
const HOLD_FRAMES: u8 = 6;

pub struct Keypad {
    held: [u8; 16],
}

impl Keypad {
    pub fn new() -> Keypad {
        Keypad { held: [0; 16] }
    }

    pub fn press(&mut self, key: u8) {
        self.held[(key & 0x0F) as usize] = HOLD_FRAMES;
    }

    /// Ages every held key by one frame.
    pub fn frame(&mut self) {
        for frames in self.held.iter_mut() {
            *frames = frames.saturating_sub(1);
        }
    }

    pub fn snapshot(&self) -> [bool; 16] {
        let mut keys = [false; 16];
        for (down, &frames) in keys.iter_mut().zip(self.held.iter()) {
            *down = frames > 0;
        }
        keys
    }
}

pub fn map_key(c: char) -> Option<u8> {
    // Classical layout, see http://devernay.free.fr/hacks/chip8/C8TECH10.HTM#2.3
    // +---+---+---+---+
    // | 1 | 2 | 3 | C |
    // +---+---+---+---+
    // | 4 | 5 | 6 | D |
    // +---+---+---+---+
    // | 7 | 8 | 9 | E |
    // +---+---+---+---+
    // | A | 0 | B | F |
    // +---+---+---+---+

    match c.to_ascii_lowercase() {
        '1' => Some(0x1),
        '2' => Some(0x2),
        '3' => Some(0x3),
        '4' => Some(0xC),

        'q' => Some(0x4),
        'w' => Some(0x5),
        'e' => Some(0x6),
        'r' => Some(0xD),

        'a' => Some(0x7),
        's' => Some(0x8),
        'd' => Some(0x9),
        'f' => Some(0xE),

        'z' => Some(0xA),
        'x' => Some(0x0),
        'c' => Some(0xB),
        'v' => Some(0xF),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        assert_eq!(map_key('x'), Some(0x0));
        assert_eq!(map_key('4'), Some(0xC));
        assert_eq!(map_key('V'), Some(0xF));
        assert_eq!(map_key('p'), None);
    }

    #[test]
    fn press_is_held_for_a_few_frames() {
        let mut keypad = Keypad::new();
        keypad.press(0x5);
        assert!(keypad.snapshot()[0x5]);

        for _ in 0..HOLD_FRAMES - 1 {
            keypad.frame();
        }
        assert!(keypad.snapshot()[0x5]);
        keypad.frame();
        assert!(!keypad.snapshot()[0x5]);
    }
}
