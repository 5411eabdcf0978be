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

use crate::resolver::{ResolutionResult, resolve_dual, resolve_single};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    ZeroUnitWeight,
}

/// Unit weight table for one deployment. Unit weights are validated once at
/// construction; the resolvers never re-check them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverConfig {
    /// One object class; allowed deviation scales with the matched count.
    SingleClass {
        unit_weight: u32,
        tolerance_multiplier: u32,
    },
    /// Two object classes with a fixed absolute tolerance. Counts are
    /// reported new/factory first, reused second.
    DualClass {
        new_unit_weight: u32,
        reused_unit_weight: u32,
        tolerance: u32,
    },
}

impl ResolverConfig {
    pub fn single_class(unit_weight: u32, tolerance_multiplier: u32) -> Result<Self, ConfigError> {
        if unit_weight == 0 {
            return Err(ConfigError::ZeroUnitWeight);
        }
        Ok(ResolverConfig::SingleClass {
            unit_weight,
            tolerance_multiplier,
        })
    }

    pub fn dual_class(
        new_unit_weight: u32,
        reused_unit_weight: u32,
        tolerance: u32,
    ) -> Result<Self, ConfigError> {
        if new_unit_weight == 0 || reused_unit_weight == 0 {
            return Err(ConfigError::ZeroUnitWeight);
        }
        Ok(ResolverConfig::DualClass {
            new_unit_weight,
            reused_unit_weight,
            tolerance,
        })
    }

    /// Number of object classes a `Resolved` result will carry.
    pub fn class_count(&self) -> usize {
        match self {
            ResolverConfig::SingleClass { .. } => 1,
            ResolverConfig::DualClass { .. } => 2,
        }
    }

    pub fn resolve(&self, reading: u32) -> ResolutionResult {
        match *self {
            ResolverConfig::SingleClass {
                unit_weight,
                tolerance_multiplier,
            } => resolve_single(reading, unit_weight, tolerance_multiplier),
            ResolverConfig::DualClass {
                new_unit_weight,
                reused_unit_weight,
                tolerance,
            } => resolve_dual(reading, new_unit_weight, reused_unit_weight, tolerance),
        }
    }
}
