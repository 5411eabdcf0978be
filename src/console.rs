// Copyright (C) 2025 Paul Hampson
//
// This program is free software: you can redistribute it and/or modify it under
// the terms of the GNU General Public License version 3 as  published by the
// Free Software Foundation.
//
// This program is distributed in the hope that it will be useful, but WITHOUT
// ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS
// FOR A PARTICULAR PURPOSE.  See the GNU General Public License for more
// details.
//
// You should have received a copy of the GNU General Public License along with
// this program.  If not, see <https://www.gnu.org/licenses/>.

use partscale_core::{CycleOutcome, DisplaySink, ReadingSource};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueuedEvent {
    Sample(i32),
    NotReady,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SourceNotReady;

/// Replay-file reading source: acquisitions pop queued samples in order, an
/// empty queue or a queued `na` line reads back as not-ready.
#[derive(Default)]
pub(crate) struct QueuedReadings {
    queue: VecDeque<QueuedEvent>,
}

impl QueuedReadings {
    pub(crate) fn push_sample(&mut self, reading: i32) {
        self.queue.push_back(QueuedEvent::Sample(reading));
    }

    pub(crate) fn push_not_ready(&mut self) {
        self.queue.push_back(QueuedEvent::NotReady);
    }

    pub(crate) fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl ReadingSource for QueuedReadings {
    type Error = SourceNotReady;

    fn acquire(&mut self) -> Result<i32, SourceNotReady> {
        match self.queue.pop_front() {
            Some(QueuedEvent::Sample(reading)) => Ok(reading),
            Some(QueuedEvent::NotReady) | None => Err(SourceNotReady),
        }
    }

    fn rezero(&mut self) -> Result<(), SourceNotReady> {
        log::info!("Scale re-zeroed (tare)");
        Ok(())
    }
}

/// Plain-text stand-in for the station display and alert line.
#[derive(Default)]
pub(crate) struct ConsoleDisplay;

impl DisplaySink for ConsoleDisplay {
    fn present(&mut self, outcome: &CycleOutcome, escalation_active: bool) {
        match outcome {
            CycleOutcome::Accepted(counts) => match counts.as_slice() {
                [count] => println!("count: {count}"),
                [new, reused] => println!("counts: new={new} reused={reused}"),
                _ => println!("counts: {counts:?}"),
            },
            CycleOutcome::ConfirmedFailure => println!("unresolved: reading does not match any piece combination"),
            CycleOutcome::Unavailable => println!("scale not ready"),
            CycleOutcome::Rezeroed => println!("negative reading, scale re-zeroed"),
        }
        if escalation_active {
            println!("!! alert active (send 'reset' to clear)");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queued_readings_pop_in_order() {
        let mut source = QueuedReadings::default();
        source.push_sample(140);
        source.push_not_ready();
        source.push_sample(-3);

        assert_eq!(source.pending(), 3);
        assert_eq!(source.acquire(), Ok(140));
        assert_eq!(source.acquire(), Err(SourceNotReady));
        assert_eq!(source.acquire(), Ok(-3));
        assert_eq!(source.acquire(), Err(SourceNotReady));
        assert_eq!(source.pending(), 0);
    }
}
