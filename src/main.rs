//! Micro-grid simulator entry point — CLI wiring and the operator console.

use std::io;
use std::path::Path;
use std::process;

use microgrid_sim::cli;
use microgrid_sim::config::{ProfilesConfig, ScenarioConfig};
use microgrid_sim::console::Console;
use microgrid_sim::io::export::export_csv;
use microgrid_sim::registry::{
    FlatStrategy, ProfileModel, Registry, Role, SolarTraceStrategy,
};
use microgrid_sim::sim::day::DaySimulator;

/// Builds the profile strategy selected by the scenario configuration.
fn build_strategy(cfg: &ProfilesConfig, seed: u64) -> ProfileModel {
    match cfg.strategy.as_str() {
        "flat" => ProfileModel::Flat(FlatStrategy::new(
            cfg.flat_generation_kwh,
            cfg.flat_demand_kwh,
            cfg.weekend_demand_factor,
        )),
        _ => ProfileModel::Solar(SolarTraceStrategy::new(
            cfg.capacity_kwh_min,
            cfg.capacity_kwh_max,
            cfg.peak_hour,
            cfg.sigma_hours,
            cfg.demand_base_kwh,
            cfg.demand_amp_kwh,
            cfg.demand_noise_std,
            cfg.weekend_demand_factor,
            seed,
        )),
    }
}

fn main() {
    env_logger::init();

    let opts = cli::parse_args().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        cli::print_usage();
        process::exit(2);
    });

    // Load config: --scenario takes priority, then --preset, then baseline
    let mut scenario = if let Some(ref path) = opts.scenario {
        match ScenarioConfig::from_toml_file(Path::new(path)) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else if let Some(ref name) = opts.preset {
        match ScenarioConfig::from_preset(name) {
            Ok(cfg) => cfg,
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
    } else {
        ScenarioConfig::baseline()
    };

    if let Some(seed) = opts.seed_override {
        scenario.simulation.seed = seed;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout(), scenario.input.max_attempts);

    // Resolve day and counts: configured values skip the prompts.
    let day = if scenario.simulation.day.is_empty() {
        match console.prompt_day() {
            Ok(day) => day.name().to_string(),
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    } else {
        scenario.simulation.day.clone()
    };

    let mut resolve_count = |configured: i64, role: Role| -> i64 {
        if configured >= 0 {
            return configured;
        }
        match console.prompt_count(role) {
            Ok(count) => count,
            Err(e) => {
                eprintln!("error: {e}");
                process::exit(1);
            }
        }
    };
    let prosumers = resolve_count(scenario.simulation.prosumers, Role::Prosumer);
    let consumers = resolve_count(scenario.simulation.consumers, Role::Consumer);

    let mut strategy = build_strategy(&scenario.profiles, scenario.simulation.seed);
    let registry = match Registry::create(&day, prosumers, consumers, &mut strategy) {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    println!(
        "Simulating {} with {} prosumers and {} consumers.",
        registry.day(),
        registry.prosumer_count(),
        registry.consumer_count()
    );

    let mut simulator = DaySimulator::new(registry);
    let summary = match console.drive(&mut simulator) {
        Ok(summary) => summary,
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    };

    println!("\n{summary}");

    if let Some(ref path) = opts.summary_out {
        if let Err(e) = export_csv(&summary, path) {
            eprintln!("error: failed to write CSV: {e}");
            process::exit(1);
        }
        eprintln!("Summary written to {}", path.display());
    }
}
