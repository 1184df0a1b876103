//! Fixed participant set: prosumers, consumers, and their 24-hour profiles.

pub mod profile;

use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

pub use profile::{
    FixedProfileStrategy, FlatStrategy, HOURS_PER_DAY, HourlyProfile, ProfileModel,
    ProfileStrategy, SolarTraceStrategy,
};

/// Day of the week the simulation runs on.
///
/// Parsing is case-insensitive; anything that is not one of the seven names
/// fails with [`RegistryError::InvalidDay`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All seven days in calendar order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// Canonical capitalized name.
    pub fn name(self) -> &'static str {
        match self {
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
            Weekday::Sunday => "Sunday",
        }
    }

    /// Returns `true` for Saturday and Sunday.
    pub fn is_weekend(self) -> bool {
        matches!(self, Weekday::Saturday | Weekday::Sunday)
    }
}

impl FromStr for Weekday {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.name().to_ascii_lowercase() == lowered)
            .ok_or(RegistryError::InvalidDay)
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Participant role; ids are 1-based within each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Prosumer,
    Consumer,
}

impl Role {
    /// Plural form used in count-validation messages.
    pub fn plural(self) -> &'static str {
        match self {
            Role::Prosumer => "prosumers",
            Role::Consumer => "consumers",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Role::Prosumer => "prosumer",
            Role::Consumer => "consumer",
        })
    }
}

/// The fixed participant set for one simulated day.
///
/// Built once from validated counts, read-only thereafter. Prosumer `i`
/// (1-based) owns `generation[i - 1]`; consumer ids index `demand` the same
/// way. Profile population is delegated to a [`ProfileStrategy`].
#[derive(Debug, Clone)]
pub struct Registry {
    day: Weekday,
    generation: Vec<HourlyProfile>,
    demand: Vec<HourlyProfile>,
}

impl Registry {
    /// Validates counts and day, then populates profiles from `strategy`.
    ///
    /// # Errors
    ///
    /// * [`RegistryError::InvalidDay`] if `day` is not case-insensitively one
    ///   of the seven weekday names.
    /// * [`RegistryError::InvalidCount`] if either count is negative.
    pub fn create(
        day: &str,
        prosumers: i64,
        consumers: i64,
        strategy: &mut dyn ProfileStrategy,
    ) -> Result<Self, RegistryError> {
        let day: Weekday = day.parse()?;
        if prosumers < 0 {
            return Err(RegistryError::InvalidCount {
                role: Role::Prosumer,
            });
        }
        if consumers < 0 {
            return Err(RegistryError::InvalidCount {
                role: Role::Consumer,
            });
        }

        let generation = (1..=prosumers as usize)
            .map(|id| strategy.generation(id, day))
            .collect();
        let demand = (1..=consumers as usize)
            .map(|id| strategy.demand(id, day))
            .collect();

        Ok(Self {
            day,
            generation,
            demand,
        })
    }

    /// Builds a registry from pre-validated profiles.
    ///
    /// Used by embedders and tests that already hold explicit profile tables;
    /// [`HourlyProfile`] construction has enforced the length and
    /// non-negativity invariants.
    pub fn with_profiles(
        day: Weekday,
        generation: Vec<HourlyProfile>,
        demand: Vec<HourlyProfile>,
    ) -> Self {
        Self {
            day,
            generation,
            demand,
        }
    }

    /// The simulation day.
    pub fn day(&self) -> Weekday {
        self.day
    }

    /// Number of registered prosumers.
    pub fn prosumer_count(&self) -> usize {
        self.generation.len()
    }

    /// Number of registered consumers.
    pub fn consumer_count(&self) -> usize {
        self.demand.len()
    }

    /// Generation profile of prosumer `id` (1-based).
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownParticipant`] if `id` is out of range.
    pub fn generation(&self, id: usize) -> Result<&HourlyProfile, RegistryError> {
        self.generation
            .get(id.wrapping_sub(1))
            .ok_or(RegistryError::UnknownParticipant {
                role: Role::Prosumer,
                id,
                count: self.generation.len(),
            })
    }

    /// Demand profile of consumer `id` (1-based).
    ///
    /// # Errors
    ///
    /// [`RegistryError::UnknownParticipant`] if `id` is out of range.
    pub fn demand(&self, id: usize) -> Result<&HourlyProfile, RegistryError> {
        self.demand
            .get(id.wrapping_sub(1))
            .ok_or(RegistryError::UnknownParticipant {
                role: Role::Consumer,
                id,
                count: self.demand.len(),
            })
    }

    /// All generation profiles, ordered by prosumer id.
    pub fn generation_profiles(&self) -> &[HourlyProfile] {
        &self.generation
    }

    /// All demand profiles, ordered by consumer id.
    pub fn demand_profiles(&self) -> &[HourlyProfile] {
        &self.demand
    }
}
