use std::io::{self, Stdout, Write};
use std::time::Duration;

use chip8::display::{Framebuffer, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use crate::keypad::{map_key, Keypad};

pub enum Input {
    Continue,
    Quit,
}

/// Raw-mode terminal on the alternate screen. Restored on drop.
pub struct Terminal {
    out: Stdout,
    beeping: bool,
}

impl Terminal {
    pub fn open() -> io::Result<Terminal> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, cursor::Hide, Clear(ClearType::All))?;
        Ok(Terminal {
            out,
            beeping: false,
        })
    }

    /// Drains pending key events into `keypad`.
    pub fn poll_input(&mut self, keypad: &mut Keypad) -> io::Result<Input> {
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(KeyEvent {
                code, modifiers, ..
            }) = event::read()?
            {
                match code {
                    KeyCode::Esc => return Ok(Input::Quit),
                    KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(Input::Quit)
                    }
                    KeyCode::Char(c) => match map_key(c) {
                        Some(key) => keypad.press(key),
                        None => debug!("unmapped key {:?}", c),
                    },
                    _ => {}
                }
            }
        }
        Ok(Input::Continue)
    }

    pub fn render(&mut self, frame: &Framebuffer) -> io::Result<()> {
        for (row, line) in render_rows(frame).into_iter().enumerate() {
            queue!(self.out, cursor::MoveTo(0, row as u16), Print(line))?;
        }
        self.out.flush()
    }

    /// Rings the terminal bell when the sound timer starts.
    pub fn set_beeping(&mut self, beeping: bool) -> io::Result<()> {
        if beeping && !self.beeping {
            queue!(self.out, Print('\u{7}'))?;
            self.out.flush()?;
        }
        self.beeping = beeping;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Packs two framebuffer rows into each text line using half blocks.
pub fn render_rows(frame: &Framebuffer) -> Vec<String> {
    (0..DISPLAY_HEIGHT / 2)
        .map(|row| {
            (0..DISPLAY_WIDTH)
                .map(|x| match (frame.get(x, row * 2), frame.get(x, row * 2 + 1)) {
                    (true, true) => '█',
                    (true, false) => '▀',
                    (false, true) => '▄',
                    (false, false) => ' ',
                })
                .collect()
        })
        .collect()
}
