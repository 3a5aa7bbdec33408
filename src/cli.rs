//! Command-line argument parsing for the `loadshape-cluster` binary.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::config::ClusteringConfig;

/// Number of synthetic loads generated when no input is given.
pub const DEFAULT_DEMO_LOADS: usize = 40;

/// Parsed command-line options.
#[derive(Debug, Default)]
pub struct CliOptions {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub demo: Option<usize>,
    pub out: Option<PathBuf>,
    pub k_consumption: Option<usize>,
    pub k_peaktime: Option<usize>,
    pub seed: Option<u64>,
    pub label_order: Option<String>,
}

impl CliOptions {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply(&self, cfg: &mut ClusteringConfig) {
        if let Some(k) = self.k_consumption {
            cfg.clustering.k_consumption = k;
        }
        if let Some(k) = self.k_peaktime {
            cfg.clustering.k_peaktime = k;
        }
        if let Some(seed) = self.seed {
            cfg.clustering.seed = seed;
        }
        if let Some(order) = &self.label_order {
            cfg.clustering.label_order = order.clone();
        }
    }
}

pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_args_from(&args)
}

pub fn parse_args_from(args: &[String]) -> Result<CliOptions, String> {
    let mut opts = CliOptions::default();
    let mut i = 0usize;

    while i < args.len() {
        let flag = args[i].as_str();
        match flag {
            "--config" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --config (expected a TOML file path)")?;
                if opts.config.replace(PathBuf::from(path)).is_some() {
                    return Err("--config provided more than once".to_string());
                }
            }
            "--input" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --input (expected a CSV file path)")?;
                if opts.input.replace(PathBuf::from(path)).is_some() {
                    return Err("--input provided more than once".to_string());
                }
            }
            "--demo" => {
                i += 1;
                opts.demo = Some(args.parse_at(i, flag)?);
            }
            "--out" => {
                i += 1;
                let path = args.next_or_err(i, "missing value for --out (expected a file path)")?;
                if opts.out.replace(PathBuf::from(path)).is_some() {
                    return Err("--out provided more than once".to_string());
                }
            }
            "--k-consumption" => {
                i += 1;
                opts.k_consumption = Some(args.parse_at(i, flag)?);
            }
            "--k-peaktime" => {
                i += 1;
                opts.k_peaktime = Some(args.parse_at(i, flag)?);
            }
            "--seed" => {
                i += 1;
                opts.seed = Some(args.parse_at(i, flag)?);
            }
            "--label-order" => {
                i += 1;
                let order = args.next_or_err(i, "missing value for --label-order (expected grouped or original)")?;
                opts.label_order = Some(order.to_string());
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.input.is_some() && opts.demo.is_some() {
        return Err(
            "arguments `--input` and `--demo` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    if opts.input.is_none() && opts.demo.is_none() {
        opts.demo = Some(DEFAULT_DEMO_LOADS);
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
    fn parse_at<T: FromStr>(&self, index: usize, flag: &str) -> Result<T, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }

    fn parse_at<T: FromStr>(&self, index: usize, flag: &str) -> Result<T, String> {
        let raw = self.next_or_err(index, &format!("missing value for {flag}"))?;
        raw.parse()
            .map_err(|_| format!("{flag} value \"{raw}\" is not a valid number"))
    }
}

pub fn print_usage() {
    eprintln!("loadshape-cluster: two-stage clustering of daily load profiles");
    eprintln!();
    eprintln!("Usage:");
    eprintln!("  loadshape-cluster [--config <path>] [--input <csv> | --demo <n>] [--out <csv>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --config <path>          Load settings from a TOML file");
    eprintln!("  --input <path>           CSV of load profiles, one load per row");
    eprintln!("  --demo <n>               Cluster n synthetic profiles (default: {DEFAULT_DEMO_LOADS})");
    eprintln!("  --out <path>             Write assignments to CSV");
    eprintln!("  --k-consumption <n>      Override number of consumption clusters");
    eprintln!("  --k-peaktime <n>         Override number of peak-time clusters");
    eprintln!("  --seed <u64>             Override random seed");
    eprintln!("  --label-order <name>     grouped | original");
    eprintln!("  --help                   Show this help message");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_to_demo_source() {
        let opts = parse_args_from(&[]).expect("parse should succeed");
        assert_eq!(opts.demo, Some(DEFAULT_DEMO_LOADS));
        assert!(opts.input.is_none());
    }

    #[test]
    fn supports_input_and_overrides() {
        let opts = parse_args_from(&args(&[
            "--input",
            "loads.csv",
            "--k-consumption",
            "4",
            "--seed",
            "9",
            "--label-order",
            "original",
        ]))
        .expect("parse should succeed");
        assert_eq!(
            opts.input.as_deref().and_then(|p| p.to_str()),
            Some("loads.csv")
        );
        assert!(opts.demo.is_none());
        assert_eq!(opts.k_consumption, Some(4));
        assert_eq!(opts.seed, Some(9));
    }

    #[test]
    fn input_and_demo_are_exclusive() {
        let err = parse_args_from(&args(&["--input", "a.csv", "--demo", "10"])).unwrap_err();
        assert!(err.contains("mutually exclusive"));
    }

    #[test]
    fn rejects_bad_numbers_and_unknown_flags() {
        assert!(parse_args_from(&args(&["--k-peaktime", "two"])).is_err());
        assert!(parse_args_from(&args(&["--seed"])).is_err());
        assert!(parse_args_from(&args(&["--bogus"])).is_err());
    }

    #[test]
    fn overrides_apply_to_config() {
        let opts = parse_args_from(&args(&["--k-peaktime", "5", "--label-order", "original"]))
            .expect("parse should succeed");
        let mut cfg = ClusteringConfig::defaults();
        opts.apply(&mut cfg);
        assert_eq!(cfg.clustering.k_peaktime, 5);
        assert_eq!(cfg.clustering.k_consumption, 3);
        assert_eq!(cfg.clustering.label_order, "original");
    }
}
