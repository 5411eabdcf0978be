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

mod console;
mod util;

use crate::console::{ConsoleDisplay, QueuedReadings};
use crate::util::InputLine;
use partscale_core::CountingStation;
use std::io::{BufRead, Error as IoError, ErrorKind, Result as IoResult};

type ReplayStation = CountingStation<QueuedReadings, ConsoleDisplay>;

/// A cycle consumes at most two acquisitions (one measurement plus one
/// verification retry), so with two or more samples queued a cycle can
/// never starve mid-verification.
const MAX_ACQUISITIONS_PER_CYCLE: usize = 2;

fn drain_pending_cycles(station: &mut ReplayStation) {
    while station.reading_source_mut().pending() > 0 {
        station.run_cycle();
    }
}

fn main() -> IoResult<()> {
    let log_level = util::parse_log_level();

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let config = util::parse_config(&util::positional_args(&args))
        .map_err(|e| IoError::new(ErrorKind::InvalidInput, e))?;

    log::info!("Partscale replay driver");
    log::info!("Configuration: {:?}", config);
    log::info!("Reading one sample per line from stdin ('na' = not ready, 'reset' = clear alert)");

    let mut station = CountingStation::new(config, QueuedReadings::default(), ConsoleDisplay);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        let event = match util::parse_line(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(message) => {
                log::error!("{message}");
                continue;
            }
        };

        match event {
            InputLine::Reading(reading) => station.reading_source_mut().push_sample(reading),
            InputLine::NotReady => station.reading_source_mut().push_not_ready(),
            InputLine::Reset => {
                drain_pending_cycles(&mut station);
                station.reset_escalation();
                continue;
            }
        }

        while station.reading_source_mut().pending() >= MAX_ACQUISITIONS_PER_CYCLE {
            station.run_cycle();
        }
    }

    drain_pending_cycles(&mut station);

    log::info!(
        "Replay complete, escalation {}",
        if station.escalation_active() { "active" } else { "clear" }
    );
    Ok(())
}
