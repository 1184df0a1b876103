//! Shared fixture builders for integration tests.

use microgrid_sim::registry::{HOURS_PER_DAY, HourlyProfile, Registry, Weekday};

/// A profile that is zero everywhere except one hour.
pub fn profile_at(hour: usize, kwh: f32) -> HourlyProfile {
    let mut values = [0.0; HOURS_PER_DAY];
    values[hour] = kwh;
    HourlyProfile::new(values)
}

/// A profile with the same quantity every hour.
pub fn flat_profile(kwh: f32) -> HourlyProfile {
    HourlyProfile::new([kwh; HOURS_PER_DAY])
}

/// One prosumer and one consumer, active at hour 0 only.
pub fn registry_1x1_hour0(surplus: f32, demand: f32) -> Registry {
    Registry::with_profiles(
        Weekday::Monday,
        vec![profile_at(0, surplus)],
        vec![profile_at(0, demand)],
    )
}

/// No participants at all.
pub fn empty_registry() -> Registry {
    Registry::with_profiles(Weekday::Sunday, Vec::new(), Vec::new())
}
