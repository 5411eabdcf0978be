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

use crate::config::ResolverConfig;
use crate::resolver::{Counts, ResolutionResult};

/// Supplies one raw signed reading per acquisition. An `Err` from `acquire`
/// means the source is not ready or absent; the cycle surfaces it without
/// attempting resolution and the next tick retries naturally.
pub trait ReadingSource {
    type Error;

    fn acquire(&mut self) -> Result<i32, Self::Error>;

    /// Upstream re-zeroing action, requested when a reading goes negative
    /// from sensor drift.
    fn rezero(&mut self) -> Result<(), Self::Error>;
}

/// Consumes every terminal cycle outcome together with the current
/// escalation flag state. The alert line (buzzer or equivalent) follows the
/// flag, not the individual outcome.
pub trait DisplaySink {
    fn present(&mut self, outcome: &CycleOutcome, escalation_active: bool);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Resolution succeeded on the first or second attempt.
    Accepted(Counts),
    /// Both attempts failed to resolve; escalation is now active.
    ConfirmedFailure,
    /// The reading source was not ready; no resolution was attempted.
    Unavailable,
    /// A negative reading aborted the cycle and the scale was re-zeroed.
    Rezeroed,
}

/// Verification wrapper around a resolver: one re-measurement retry on
/// failure, immediate abort on negative readings, and a sticky escalation
/// flag that outlives individual cycles.
///
/// One call to [`run_cycle`](CountingStation::run_cycle) is one complete
/// sampling-interval cycle. The station never reads a clock; the caller
/// invoking `run_cycle` is the statement that a cycle may now run. The flag
/// is the only state crossing cycles.
pub struct CountingStation<R, D> {
    config: ResolverConfig,
    reading_source: R,
    display: D,
    escalation_active: bool,
}

impl<R, D> CountingStation<R, D>
where
    R: ReadingSource,
    D: DisplaySink,
{
    pub fn new(config: ResolverConfig, reading_source: R, display: D) -> Self {
        Self {
            config,
            reading_source,
            display,
            escalation_active: false,
        }
    }

    pub fn escalation_active(&self) -> bool {
        self.escalation_active
    }

    /// Manual reset signal. Clears the escalation flag without running a
    /// cycle.
    pub fn reset_escalation(&mut self) {
        if self.escalation_active {
            log::info!("Escalation cleared by manual reset");
        }
        self.escalation_active = false;
    }

    pub fn reading_source_mut(&mut self) -> &mut R {
        &mut self.reading_source
    }

    /// Run one full verification cycle: acquire, resolve, retry once with a
    /// fresh reading on failure. The outcome and the updated flag are
    /// presented to the display sink before returning.
    pub fn run_cycle(&mut self) -> CycleOutcome {
        let outcome = self.resolve_with_retry();

        match outcome {
            CycleOutcome::Accepted(_) => {
                if self.escalation_active {
                    log::info!("Resolution accepted, clearing escalation");
                }
                self.escalation_active = false;
            }
            CycleOutcome::ConfirmedFailure => {
                if !self.escalation_active {
                    log::warn!("Resolution failed on retry, activating escalation");
                }
                self.escalation_active = true;
            }
            // precondition outcomes leave the flag untouched
            CycleOutcome::Unavailable | CycleOutcome::Rezeroed => {}
        }

        self.display.present(&outcome, self.escalation_active);
        outcome
    }

    fn resolve_with_retry(&mut self) -> CycleOutcome {
        let first_reading = match self.acquire_checked() {
            Ok(reading) => reading,
            Err(aborted) => return aborted,
        };

        match self.config.resolve(first_reading) {
            ResolutionResult::Resolved(counts) => return CycleOutcome::Accepted(counts),
            ResolutionResult::Unresolved => {
                log::debug!("First attempt unresolved for reading {}, re-measuring", first_reading);
            }
        }

        // exactly one retry, always with a fresh reading
        let second_reading = match self.acquire_checked() {
            Ok(reading) => reading,
            Err(aborted) => return aborted,
        };

        match self.config.resolve(second_reading) {
            ResolutionResult::Resolved(counts) => CycleOutcome::Accepted(counts),
            ResolutionResult::Unresolved => {
                log::debug!("Retry unresolved for reading {}", second_reading);
                CycleOutcome::ConfirmedFailure
            }
        }
    }

    /// Acquire one reading, folding the two precondition failures into
    /// early cycle outcomes. Negative readings take precedence over the
    /// retry logic in any state.
    fn acquire_checked(&mut self) -> Result<u32, CycleOutcome> {
        match self.reading_source.acquire() {
            Ok(reading) if reading < 0 => {
                log::debug!("Negative reading {}, requesting re-zero", reading);
                if self.reading_source.rezero().is_err() {
                    log::warn!("Re-zero request failed, source unavailable");
                    return Err(CycleOutcome::Unavailable);
                }
                Err(CycleOutcome::Rezeroed)
            }
            Ok(reading) => Ok(reading as u32),
            Err(_) => {
                log::trace!("Reading source not ready");
                Err(CycleOutcome::Unavailable)
            }
        }
    }
}
