use std::{thread, time};

use super::Result;

pub enum Step {
    Cont,
    Done,
}

/// Calls `f` once per frame until it reports `Step::Done` or fails.
///
/// Returns instead of exiting the process so that the caller's guards
/// (raw terminal mode in particular) get dropped.
pub fn start_loop<F>(mut f: F) -> Result<()>
where
    F: FnMut() -> Result<Step>,
{
    let frame_interval = time::Duration::from_millis(16);
    loop {
        let frame_start = time::Instant::now();

        match f()? {
            Step::Cont => {
                if let Some(delay) = frame_interval.checked_sub(frame_start.elapsed()) {
                    thread::sleep(delay)
                }
            }
            Step::Done => return Ok(()),
        }
    }
}
