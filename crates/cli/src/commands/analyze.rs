//! Analyze command implementation

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{info, warn};
use volscope_core::Config;
use volscope_ingestion::discover_inputs;

use crate::pipeline::{AssetOutcome, AssetPipeline};
use crate::report::{export_report, render_summary};

/// Options of the `analyze` command.
#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    pub config: Option<PathBuf>,
    /// Starting capital, overriding the config file.
    pub capital: Option<f64>,
    /// Worker threads (0 = rayon default).
    pub workers: usize,
    pub no_export: bool,
}

/// What one `analyze` run did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub processed: usize,
    pub analyzed: usize,
    pub exported: usize,
    /// (asset, reason) for every asset that produced no result.
    pub skipped: Vec<(String, String)>,
}

pub fn run(args: &AnalyzeArgs) -> Result<RunSummary> {
    let mut config = match &args.config {
        Some(path) => {
            let config = Config::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?;
            info!("Loaded configuration from: {}", path.display());
            config
        }
        None => Config::default(),
    };

    if let Some(capital) = args.capital {
        info!("Overriding starting capital to: {:.2}", capital);
        config.simulation.starting_capital = capital;
    }

    let pipeline = AssetPipeline::new(config)?;

    let inputs = discover_inputs(&args.data_dir)?;
    if inputs.is_empty() {
        anyhow::bail!("No CSV files found in {}", args.data_dir.display());
    }

    let outcomes = pipeline.run_files(&inputs, args.workers)?;

    let mut summary = RunSummary {
        processed: outcomes.len(),
        ..Default::default()
    };
    for outcome in &outcomes {
        println!("{}", render_summary(outcome));

        match outcome {
            AssetOutcome::Analyzed(report) => {
                summary.analyzed += 1;
                if args.no_export {
                    continue;
                }
                match export_report(report, &args.output_dir) {
                    Ok(dir) => {
                        info!("Results for {} written to {}", report.name, dir.display());
                        summary.exported += 1;
                    }
                    Err(err) => {
                        warn!("{}: export failed: {}", report.name, err);
                        summary
                            .skipped
                            .push((report.name.clone(), format!("export failed: {}", err)));
                    }
                }
            }
            AssetOutcome::Skipped { name, reason } => {
                summary.skipped.push((name.clone(), reason.clone()));
            }
            AssetOutcome::InsufficientData { .. } => {}
        }
    }

    println!("{}", "=".repeat(60));
    println!(
        "Processed {} assets: {} analyzed, {} skipped",
        summary.processed,
        summary.analyzed,
        summary.skipped.len()
    );
    if summary.exported > 0 {
        println!(
            "Exported {} assets to {}",
            summary.exported,
            args.output_dir.display()
        );
    }
    if !summary.skipped.is_empty() {
        println!("Skipped assets:");
        for (name, reason) in &summary.skipped {
            println!("  {}: {}", name, reason);
        }
        warn!("{} assets skipped", summary.skipped.len());
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;

    fn workspace(tag: &str) -> PathBuf {
        let root = std::env::temp_dir()
            .join(format!("volscope-cmd-{}-{}", tag, std::process::id()));
        fs::remove_dir_all(&root).ok();
        fs::create_dir_all(root.join("data")).unwrap();
        root
    }

    fn args(root: &Path) -> AnalyzeArgs {
        AnalyzeArgs {
            data_dir: root.join("data"),
            output_dir: root.join("out"),
            config: None,
            capital: None,
            workers: 1,
            no_export: false,
        }
    }

    fn write_prices(path: &Path, n: usize) {
        let mut csv = String::from("Date,Close\n");
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        for i in 0..n {
            let close = 100.0 + 6.0 * ((i as f64) * 0.5).sin() + (i % 5) as f64;
            let date = start + chrono::Duration::days(i as i64);
            csv.push_str(&format!("{},{:.4}\n", date, close));
        }
        fs::write(path, csv).unwrap();
    }

    #[test]
    fn test_missing_data_dir_fails() {
        let root = workspace("missing");
        let mut args = args(&root);
        args.data_dir = root.join("nowhere");
        assert!(run(&args).is_err());
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_empty_data_dir_fails() {
        let root = workspace("empty");
        let err = run(&args(&root)).unwrap_err();
        assert!(err.to_string().contains("No CSV files"));
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_skipped_assets_are_listed() {
        let root = workspace("skipped");
        write_prices(&root.join("data").join("Good.csv"), 50);
        fs::write(root.join("data").join("Bad.csv"), "Date,Open\n2024-01-01,1\n").unwrap();

        let summary = run(&args(&root)).unwrap();
        assert_eq!(summary.processed, 2);
        assert_eq!(summary.analyzed, 1);
        assert_eq!(summary.exported, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, "Bad");
        assert!(root.join("out").join("Good").join("summary.json").is_file());
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_export_failure_does_not_stop_other_assets() {
        let root = workspace("export");
        write_prices(&root.join("data").join("Alpha.csv"), 50);
        write_prices(&root.join("data").join("Beta.csv"), 60);
        // A plain file where Alpha's output directory should go.
        fs::create_dir_all(root.join("out")).unwrap();
        fs::write(root.join("out").join("Alpha"), "occupied").unwrap();

        let summary = run(&args(&root)).unwrap();
        assert_eq!(summary.analyzed, 2);
        assert_eq!(summary.exported, 1);
        assert_eq!(summary.skipped.len(), 1);
        assert_eq!(summary.skipped[0].0, "Alpha");
        assert!(summary.skipped[0].1.starts_with("export failed"));
        assert!(root.join("out").join("Beta").join("analysis.csv").is_file());
        fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_no_export_writes_nothing() {
        let root = workspace("noexport");
        write_prices(&root.join("data").join("Gamma.csv"), 45);
        let mut args = args(&root);
        args.no_export = true;

        let summary = run(&args).unwrap();
        assert_eq!(summary.analyzed, 1);
        assert_eq!(summary.exported, 0);
        assert!(!root.join("out").exists());
        fs::remove_dir_all(&root).ok();
    }
}
