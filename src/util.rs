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

use log::LevelFilter;
use partscale_core::{ConfigError, ResolverConfig};
use std::str::FromStr;
use strum::{Display, EnumString};

pub(crate) fn parse_log_level() -> LevelFilter {
    std::env::args()
        .position(|arg| arg == "--log-level")
        .and_then(|i| std::env::args().nth(i + 1))
        .as_deref()
        .map(|level_str| match level_str.to_uppercase().as_str() {
            "OFF" => LevelFilter::Off,
            "TRACE" => LevelFilter::Trace,
            "DEBUG" => LevelFilter::Debug,
            "INFO" => LevelFilter::Info,
            "WARN" => LevelFilter::Warn,
            "ERROR" => LevelFilter::Error,
            _ => LevelFilter::Info,
        })
        .unwrap_or(LevelFilter::Info)
}

/// Arguments with the program name and the `--log-level <LEVEL>` pair
/// stripped out.
pub(crate) fn positional_args(args: &[String]) -> Vec<String> {
    let mut positional = Vec::new();
    let mut skip_next = false;
    for arg in args.iter().skip(1) {
        if skip_next {
            skip_next = false;
            continue;
        }
        if arg == "--log-level" {
            skip_next = true;
            continue;
        }
        positional.push(arg.clone());
    }
    positional
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum Mode {
    Single,
    Dual,
}

pub(crate) const USAGE: &str =
    "usage: partscale [--log-level LEVEL] single <unit_weight> <tolerance_multiplier>\n       \
     partscale [--log-level LEVEL] dual <new_weight> <reused_weight> <tolerance>";

fn parse_u32_arg(args: &[String], index: usize, name: &str) -> Result<u32, String> {
    args.get(index)
        .ok_or_else(|| format!("Missing argument <{name}>"))?
        .parse::<u32>()
        .map_err(|_| format!("Argument <{name}> must be a non-negative integer"))
}

/// Build the deployment configuration from positional arguments.
pub(crate) fn parse_config(args: &[String]) -> Result<ResolverConfig, String> {
    let mode_arg = args.first().ok_or_else(|| USAGE.to_string())?;
    let mode =
        Mode::from_str(mode_arg).map_err(|_| format!("Unknown mode '{mode_arg}'\n{USAGE}"))?;

    let config = match mode {
        Mode::Single => ResolverConfig::single_class(
            parse_u32_arg(args, 1, "unit_weight")?,
            parse_u32_arg(args, 2, "tolerance_multiplier")?,
        ),
        Mode::Dual => ResolverConfig::dual_class(
            parse_u32_arg(args, 1, "new_weight")?,
            parse_u32_arg(args, 2, "reused_weight")?,
            parse_u32_arg(args, 3, "tolerance")?,
        ),
    };

    config.map_err(|e| match e {
        ConfigError::ZeroUnitWeight => format!("Unit weights must be greater than zero ({mode} mode)"),
    })
}

/// One line of replay input: a raw reading, a not-ready tick, or a manual
/// escalation reset. Blank lines and `#` comments parse to `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum InputLine {
    Reading(i32),
    NotReady,
    Reset,
}

pub(crate) fn parse_line(line: &str) -> Result<Option<InputLine>, String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    match trimmed {
        "na" => Ok(Some(InputLine::NotReady)),
        "reset" => Ok(Some(InputLine::Reset)),
        _ => trimmed
            .parse::<i32>()
            .map(|reading| Some(InputLine::Reading(reading)))
            .map_err(|_| format!("Unrecognised input line '{trimmed}'")),
    }
}
