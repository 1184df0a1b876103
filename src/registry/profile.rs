//! 24-hour energy profiles and the strategies that populate them.

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::Weekday;

/// Hourly slots in one simulated day.
pub const HOURS_PER_DAY: usize = 24;

/// Phase offset of the sinusoidal demand shape (radians).
const DEMAND_PHASE_RAD: f32 = 1.2;

/// Fraction of a prosumer's capacity reachable at the production peak.
const GENERATION_SCALE: f32 = 0.6;

/// One participant's 24 hourly kWh quantities.
///
/// Construction enforces the profile invariants: exactly [`HOURS_PER_DAY`]
/// values, all finite and non-negative.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyProfile {
    values: [f32; HOURS_PER_DAY],
}

impl HourlyProfile {
    /// Wraps a 24-value table.
    ///
    /// # Panics
    ///
    /// Panics if any value is negative or not finite.
    pub fn new(values: [f32; HOURS_PER_DAY]) -> Self {
        assert!(
            values.iter().all(|v| v.is_finite() && *v >= 0.0),
            "profile values must be finite and non-negative"
        );
        Self { values }
    }

    /// An all-zero profile.
    pub fn zeroed() -> Self {
        Self {
            values: [0.0; HOURS_PER_DAY],
        }
    }

    /// Quantity at `hour`.
    ///
    /// # Panics
    ///
    /// Panics if `hour >= 24`.
    pub fn get(&self, hour: usize) -> f32 {
        self.values[hour]
    }

    /// The full 24-value table.
    pub fn values(&self) -> &[f32; HOURS_PER_DAY] {
        &self.values
    }

    /// Sum over all 24 hours.
    pub fn total_kwh(&self) -> f32 {
        self.values.iter().sum()
    }
}

/// Pluggable profile population.
///
/// The registry only requires that produced profiles satisfy the length and
/// non-negativity invariants; how the values are obtained (generated traces,
/// operator-entered tables) is the strategy's business. `id` is the 1-based
/// participant id within its role, so a strategy may vary output per
/// participant.
pub trait ProfileStrategy {
    /// Generation profile for prosumer `id` on `day`.
    fn generation(&mut self, id: usize, day: Weekday) -> HourlyProfile;

    /// Demand profile for consumer `id` on `day`.
    fn demand(&mut self, id: usize, day: Weekday) -> HourlyProfile;
}

/// Gaussian noise via Box-Muller, mean 0.
fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}

/// Default generated traces: solar-shaped surplus, sinusoidal demand.
///
/// Each prosumer draws a capacity from a uniform band and produces a bell
/// curve peaking at `peak_hour`, jittered hour-by-hour within ±5 %. Consumer
/// demand follows a base + sinusoid + noise shape, scaled up on weekends.
/// Deterministic for a fixed seed.
#[derive(Debug, Clone)]
pub struct SolarTraceStrategy {
    capacity_kwh_min: f32,
    capacity_kwh_max: f32,
    peak_hour: f32,
    sigma_hours: f32,
    demand_base_kwh: f32,
    demand_amp_kwh: f32,
    demand_noise_std: f32,
    weekend_demand_factor: f32,
    rng: StdRng,
}

impl SolarTraceStrategy {
    /// Creates the strategy with an owned RNG seeded from `seed`.
    ///
    /// # Panics
    ///
    /// Panics if the capacity band is inverted or negative, `peak_hour` is
    /// outside the day, or `sigma_hours` is not positive.
    #[expect(clippy::too_many_arguments)]
    pub fn new(
        capacity_kwh_min: f32,
        capacity_kwh_max: f32,
        peak_hour: f32,
        sigma_hours: f32,
        demand_base_kwh: f32,
        demand_amp_kwh: f32,
        demand_noise_std: f32,
        weekend_demand_factor: f32,
        seed: u64,
    ) -> Self {
        assert!(capacity_kwh_min >= 0.0 && capacity_kwh_min <= capacity_kwh_max);
        assert!((0.0..HOURS_PER_DAY as f32).contains(&peak_hour));
        assert!(sigma_hours > 0.0);
        assert!(demand_base_kwh >= 0.0 && demand_amp_kwh >= 0.0 && demand_noise_std >= 0.0);
        assert!(weekend_demand_factor >= 0.0);

        Self {
            capacity_kwh_min,
            capacity_kwh_max,
            peak_hour,
            sigma_hours,
            demand_base_kwh,
            demand_amp_kwh,
            demand_noise_std,
            weekend_demand_factor,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn bell(&self, hour: usize) -> f32 {
        let d = (hour as f32 - self.peak_hour) / self.sigma_hours;
        (-0.5 * d * d).exp()
    }
}

impl ProfileStrategy for SolarTraceStrategy {
    fn generation(&mut self, _id: usize, _day: Weekday) -> HourlyProfile {
        let capacity = self
            .rng
            .random_range(self.capacity_kwh_min..=self.capacity_kwh_max);
        let mut values = [0.0_f32; HOURS_PER_DAY];
        for (hour, slot) in values.iter_mut().enumerate() {
            let jitter: f32 = self.rng.random_range(0.95..=1.05);
            *slot = (capacity * GENERATION_SCALE * self.bell(hour) * jitter).max(0.0);
        }
        HourlyProfile::new(values)
    }

    fn demand(&mut self, _id: usize, day: Weekday) -> HourlyProfile {
        let day_factor = if day.is_weekend() {
            self.weekend_demand_factor
        } else {
            1.0
        };
        let mut values = [0.0_f32; HOURS_PER_DAY];
        for (hour, slot) in values.iter_mut().enumerate() {
            let day_pos = hour as f32 / HOURS_PER_DAY as f32;
            let angle = 2.0 * std::f32::consts::PI * day_pos + DEMAND_PHASE_RAD;
            let noise = gaussian_noise(&mut self.rng, self.demand_noise_std);
            let kwh = (self.demand_base_kwh + self.demand_amp_kwh * angle.sin() + noise)
                * day_factor;
            *slot = kwh.max(0.0);
        }
        HourlyProfile::new(values)
    }
}

/// Constant profiles: the same quantity every hour.
#[derive(Debug, Clone)]
pub struct FlatStrategy {
    generation_kwh: f32,
    demand_kwh: f32,
    weekend_demand_factor: f32,
}

impl FlatStrategy {
    /// # Panics
    ///
    /// Panics if any quantity is negative.
    pub fn new(generation_kwh: f32, demand_kwh: f32, weekend_demand_factor: f32) -> Self {
        assert!(generation_kwh >= 0.0 && demand_kwh >= 0.0 && weekend_demand_factor >= 0.0);
        Self {
            generation_kwh,
            demand_kwh,
            weekend_demand_factor,
        }
    }
}

impl ProfileStrategy for FlatStrategy {
    fn generation(&mut self, _id: usize, _day: Weekday) -> HourlyProfile {
        HourlyProfile::new([self.generation_kwh; HOURS_PER_DAY])
    }

    fn demand(&mut self, _id: usize, day: Weekday) -> HourlyProfile {
        let factor = if day.is_weekend() {
            self.weekend_demand_factor
        } else {
            1.0
        };
        HourlyProfile::new([self.demand_kwh * factor; HOURS_PER_DAY])
    }
}

/// Operator-supplied explicit profile tables.
///
/// Participant `id` takes table `(id - 1) % len`, so a single table serves
/// any participant count; an empty table yields all-zero profiles.
#[derive(Debug, Clone, Default)]
pub struct FixedProfileStrategy {
    generation: Vec<HourlyProfile>,
    demand: Vec<HourlyProfile>,
}

impl FixedProfileStrategy {
    pub fn new(generation: Vec<HourlyProfile>, demand: Vec<HourlyProfile>) -> Self {
        Self { generation, demand }
    }
}

impl ProfileStrategy for FixedProfileStrategy {
    fn generation(&mut self, id: usize, _day: Weekday) -> HourlyProfile {
        if self.generation.is_empty() {
            HourlyProfile::zeroed()
        } else {
            self.generation[(id - 1) % self.generation.len()].clone()
        }
    }

    fn demand(&mut self, id: usize, _day: Weekday) -> HourlyProfile {
        if self.demand.is_empty() {
            HourlyProfile::zeroed()
        } else {
            self.demand[(id - 1) % self.demand.len()].clone()
        }
    }
}

/// Strategy selected by scenario configuration.
#[derive(Debug, Clone)]
pub enum ProfileModel {
    /// Generated solar-shaped traces.
    Solar(SolarTraceStrategy),
    /// Constant quantities.
    Flat(FlatStrategy),
}

impl ProfileStrategy for ProfileModel {
    fn generation(&mut self, id: usize, day: Weekday) -> HourlyProfile {
        match self {
            ProfileModel::Solar(s) => s.generation(id, day),
            ProfileModel::Flat(s) => s.generation(id, day),
        }
    }

    fn demand(&mut self, id: usize, day: Weekday) -> HourlyProfile {
        match self {
            ProfileModel::Solar(s) => s.demand(id, day),
            ProfileModel::Flat(s) => s.demand(id, day),
        }
    }
}
