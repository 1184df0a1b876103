//! Command-line argument parsing for the simulator binary.

use std::env;
use std::path::PathBuf;

/// Parsed command-line options.
#[derive(Debug)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub seed_override: Option<u64>,
    pub summary_out: Option<PathBuf>,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a human-readable message for unknown or malformed arguments.
pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(args)
}

fn parse_args_from(args: Vec<String>) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut scenario = None;
    let mut preset = None;
    let mut seed_override = None;
    let mut summary_out = None;

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path = args.get(i).ok_or_else(|| {
                    "missing value for --scenario (expected a TOML file path)".to_string()
                })?;
                if scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name = args.get(i).ok_or_else(|| {
                    "missing value for --preset (expected a preset name)".to_string()
                })?;
                if preset.replace(name.clone()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--seed" => {
                i += 1;
                let value = args
                    .get(i)
                    .ok_or_else(|| "missing value for --seed (expected a u64)".to_string())?;
                let parsed = value
                    .parse::<u64>()
                    .map_err(|_| format!("--seed value \"{value}\" is not a valid u64"))?;
                if seed_override.replace(parsed).is_some() {
                    return Err("--seed provided more than once".to_string());
                }
            }
            "--summary-out" => {
                i += 1;
                let path = args.get(i).ok_or_else(|| {
                    "missing value for --summary-out (expected a file path)".to_string()
                })?;
                if summary_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--summary-out provided more than once".to_string());
                }
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if scenario.is_some() && preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(CliOptions {
        scenario,
        preset,
        seed_override,
        summary_out,
    })
}

pub fn print_usage() {
    eprintln!("microgrid-sim — operator-directed micro-grid energy exchange simulator");
    eprintln!();
    eprintln!("Usage:");
    eprintln!(
        "  microgrid-sim [--scenario <path> | --preset <name>] [--seed <u64>] [--summary-out <path>]"
    );
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>      Load scenario from TOML config file");
    eprintln!("  --preset <name>        Use a built-in preset (baseline, high_generation)");
    eprintln!("  --seed <u64>           Override random seed for profile generation");
    eprintln!("  --summary-out <path>   Export the per-hour day summary to CSV");
    eprintln!("  --help                 Show this help message");
}

#[cfg(test)]
mod tests {
    use super::parse_args_from;

    #[test]
    fn supports_scenario_cli() {
        let opts = parse_args_from(vec!["--scenario".to_string(), "scenario.toml".to_string()])
            .expect("parse should succeed");
        assert_eq!(
            opts.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenario.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn supports_preset_and_seed_cli() {
        let opts = parse_args_from(vec![
            "--preset".to_string(),
            "baseline".to_string(),
            "--seed".to_string(),
            "7".to_string(),
        ])
        .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("baseline"));
        assert_eq!(opts.seed_override, Some(7));
    }

    #[test]
    fn rejects_scenario_and_preset_together() {
        let err = parse_args_from(vec![
            "--scenario".to_string(),
            "a.toml".to_string(),
            "--preset".to_string(),
            "baseline".to_string(),
        ])
        .expect_err("must fail");
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn rejects_unknown_argument() {
        let err = parse_args_from(vec!["--bogus".to_string()]).expect_err("must fail");
        assert!(err.contains("--bogus"));
    }

    #[test]
    fn rejects_bad_seed() {
        let err = parse_args_from(vec!["--seed".to_string(), "abc".to_string()])
            .expect_err("must fail");
        assert!(err.contains("abc"));
    }

    #[test]
    fn no_arguments_means_defaults() {
        let opts = parse_args_from(Vec::new()).expect("parse should succeed");
        assert!(opts.scenario.is_none());
        assert!(opts.preset.is_none());
        assert!(opts.seed_override.is_none());
        assert!(opts.summary_out.is_none());
    }
}
