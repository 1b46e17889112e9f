//! Wall-clock accumulation over the pipeline's four phases.
//!
//! A [`Timer`] is an explicit value owned by the caller and threaded through
//! the pipeline, so timing stays an observability concern with no global
//! state.  Phases can be started and stopped repeatedly; durations add up.

use std::io::Write;
use std::time::{Duration, Instant};

use anyhow::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Io = 0,
    Decompose = 1,
    RectDual = 2,
    PortAssignment = 3,
}

#[derive(Clone, Debug, Default)]
pub struct Timer {
    started: [Option<Instant>; 4],
    elapsed: [Duration; 4],
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, phase: Phase) {
        self.started[phase as usize] = Some(Instant::now());
    }

    pub fn stop(&mut self, phase: Phase) {
        if let Some(start) = self.started[phase as usize].take() {
            self.elapsed[phase as usize] += start.elapsed();
        }
    }

    pub fn elapsed(&self, phase: Phase) -> Duration {
        self.elapsed[phase as usize]
    }

    /// Print the four accumulated durations in seconds, in phase order
    /// (io, decompose, rect-dual, port-assign), space-separated.
    pub fn write_times(&self, writer: &mut impl Write) -> Result<()> {
        writeln!(
            writer,
            "{} {} {} {}",
            self.elapsed[0].as_secs_f64(),
            self.elapsed[1].as_secs_f64(),
            self.elapsed[2].as_secs_f64(),
            self.elapsed[3].as_secs_f64(),
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stop_without_start_is_a_no_op() {
        let mut timer = Timer::new();
        timer.stop(Phase::Decompose);
        assert_eq!(timer.elapsed(Phase::Decompose), Duration::ZERO);
    }

    #[test]
    fn writes_four_fields() {
        let timer = Timer::new();
        let mut buf = Vec::new();
        timer.write_times(&mut buf).unwrap();
        let line = String::from_utf8(buf).unwrap();
        assert_eq!(line.trim().split_whitespace().count(), 4);
    }
}
