//! End-to-end tests for the per-asset pipeline and batch runner.

use approx::assert_relative_eq;
use chrono::{Duration, NaiveDate};
use statrs::statistics::Statistics;
use std::fs;
use std::path::PathBuf;
use volscope::{export_report, AssetOutcome, AssetPipeline, AssetReport};
use volscope_core::{AnalysisConfig, AssetSeries, Config, PricePoint, TradeAction, TradeTrigger};
use volscope_features::{analyze, Ema, RegimeClassifier};

fn day(i: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + Duration::days(i as i64)
}

fn series(name: &str, closes: &[f64]) -> AssetSeries {
    let points = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PricePoint::new(day(i), c))
        .collect();
    AssetSeries::new(name, points)
}

fn noisy(n: usize, seed: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let x = i as f64;
            100.0 + 8.0 * (x * 0.31 + seed).sin() + 3.0 * (x * 1.7).cos() + 0.1 * x
        })
        .collect()
}

fn analyzed(outcome: AssetOutcome) -> AssetReport {
    match outcome {
        AssetOutcome::Analyzed(report) => *report,
        other => panic!("expected an analyzed outcome, got {:?}", other),
    }
}

#[test]
fn test_constant_series_end_to_end() {
    let pipeline = AssetPipeline::new(Config::default()).unwrap();
    let report = analyzed(pipeline.run(&series("Flat", &[100.0; 40])).unwrap());

    assert_eq!(report.input_points, 40);
    assert_eq!(report.analyzed.len(), 10);
    assert_eq!(report.analyzed.threshold, Some(0.0));
    assert_eq!(report.analyzed.high_volatility_count(), 0);
    assert!(report.analyzed.records.iter().all(|r| r.volatility == 0.0));

    let sim = &report.simulation;
    assert_eq!(sim.events.len(), 2);
    assert_eq!(sim.events[0].action, TradeAction::Buy);
    assert_eq!(sim.events[0].date, day(31));
    assert_relative_eq!(sim.events[0].price, 100.0);
    assert_eq!(sim.events[1].action, TradeAction::Sell);
    assert_eq!(sim.events[1].trigger, TradeTrigger::EndOfSeries);
    assert_eq!(sim.events[1].date, day(39));
    assert_eq!(sim.net_gain, 0.0);
    assert_eq!(sim.final_capital, 1000.0);

    let scenarios = report.scenarios.as_ref().unwrap();
    assert_eq!(scenarios.slope, 0.0);
    assert_eq!(scenarios.avg_vol, 0.0);
    assert_eq!(scenarios.horizon(), 10);
    for path in [&scenarios.optimistic, &scenarios.neutral, &scenarios.pessimistic] {
        assert!(path.iter().all(|p| p.price == 100.0));
    }
    assert_eq!(scenarios.neutral[0].date, day(40));
}

#[test]
fn test_short_series_is_insufficient() {
    let pipeline = AssetPipeline::new(Config::default()).unwrap();
    let outcome = pipeline.run(&series("Short", &noisy(20, 0.0))).unwrap();

    match outcome {
        AssetOutcome::InsufficientData { name, points, required } => {
            assert_eq!(name, "Short");
            assert_eq!(points, 20);
            assert_eq!(required, 31);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[test]
fn test_analyzed_length_is_points_minus_window() {
    for window in [2usize, 5, 10, 30] {
        for n in [window + 1, window + 7, 120] {
            let config = AnalysisConfig {
                window,
                ..Default::default()
            };
            let (computed, analyzed) = analyze(&series("Len", &noisy(n, 1.0)), &config).unwrap();
            assert_eq!(computed.len(), n);
            assert_eq!(analyzed.len(), n - window, "window {} n {}", window, n);
            assert_eq!(analyzed.first_date(), Some(day(window)));
        }
    }
}

#[test]
fn test_ema_recurrence_is_exact() {
    let closes = noisy(80, 2.0);
    let config = AnalysisConfig::default();
    let (computed, _) = analyze(&series("Ema", &closes), &config).unwrap();

    let alpha = Ema::alpha_for(config.ema_short);
    assert_eq!(computed.points[0].ema_short, closes[0]);
    for i in 1..closes.len() {
        let expected = closes[i] * alpha + computed.points[i - 1].ema_short * (1.0 - alpha);
        assert_eq!(computed.points[i].ema_short, expected);
    }
}

#[test]
fn test_threshold_is_mean_plus_sample_std() {
    let config = AnalysisConfig {
        window: 10,
        ..Default::default()
    };
    let (_, analyzed) = analyze(&series("Thr", &noisy(150, 3.0)), &config).unwrap();

    let vols: Vec<f64> = analyzed.records.iter().map(|r| r.volatility).collect();
    let expected = vols.iter().mean() + vols.iter().std_dev();
    let threshold = analyzed.threshold.unwrap();
    assert_relative_eq!(threshold, expected, epsilon = 1e-12);
    assert_eq!(RegimeClassifier::threshold_of(&analyzed), analyzed.threshold);

    for record in &analyzed.records {
        assert_eq!(record.high_volatility, record.volatility > threshold);
    }
    assert!(analyzed.high_volatility_count() > 0);
}

#[test]
fn test_batch_isolates_failures_and_keeps_order() {
    let pipeline = AssetPipeline::new(Config::default()).unwrap();
    let mut broken = noisy(50, 0.0);
    broken[17] = f64::NAN;
    let inputs = vec![
        series("Alpha", &noisy(60, 0.5)),
        series("Broken", &broken),
        series("Tiny", &noisy(10, 0.0)),
        series("Omega", &noisy(90, 1.5)),
    ];

    let outcomes = pipeline.run_batch(&inputs, 2).unwrap();
    let names: Vec<&str> = outcomes.iter().map(|o| o.name()).collect();
    assert_eq!(names, vec!["Alpha", "Broken", "Tiny", "Omega"]);

    assert!(outcomes[0].report().is_some());
    assert!(outcomes[1].is_skipped());
    assert!(matches!(outcomes[2], AssetOutcome::InsufficientData { .. }));
    assert!(outcomes[3].report().is_some());

    // Same result as running the asset alone.
    let alone = analyzed(pipeline.run(&inputs[3]).unwrap());
    let batched = outcomes[3].report().unwrap();
    assert_eq!(alone.simulation, batched.simulation);
    assert_eq!(alone.scenarios, batched.scenarios);
}

#[test]
fn test_overflowing_return_skips_asset() {
    let pipeline = AssetPipeline::new(Config::default()).unwrap();
    let mut closes = noisy(120, 0.2);
    closes[5] = 1e-300;
    closes[6] = 1e10;

    let err = pipeline.run(&series("Spike", &closes)).unwrap_err();
    assert!(matches!(err, volscope_core::Error::DegenerateArithmetic(_)));

    let outcomes = pipeline.run_batch(&[series("Spike", &closes)], 1).unwrap();
    assert!(outcomes[0].is_skipped());
}

#[test]
fn test_files_run_and_export() {
    let root = std::env::temp_dir().join(format!("volscope-it-{}", std::process::id()));
    let data = root.join("data");
    let out = root.join("out");
    fs::create_dir_all(&data).unwrap();

    let mut good = String::from("Date,Close\n");
    for (i, close) in noisy(45, 0.7).iter().enumerate() {
        good.push_str(&format!("{},{:.4}\n", day(i), close));
    }
    fs::write(data.join("Bitcoin.csv"), good).unwrap();
    fs::write(data.join("Broken.csv"), "Date,Open\n2024-01-01,1.0\n").unwrap();

    let pipeline = AssetPipeline::new(Config::default()).unwrap();
    let paths: Vec<PathBuf> = vec![data.join("Bitcoin.csv"), data.join("Broken.csv")];
    let outcomes = pipeline.run_files(&paths, 0).unwrap();

    assert_eq!(outcomes[0].name(), "Bitcoin");
    assert_eq!(outcomes[1].name(), "Broken");
    match &outcomes[1] {
        AssetOutcome::Skipped { reason, .. } => assert!(reason.contains("Close")),
        other => panic!("unexpected outcome: {:?}", other),
    }

    let report = outcomes[0].report().unwrap();
    assert_eq!(report.analyzed.len(), 15);
    assert!(report.scenarios.is_some());

    let dir = export_report(report, &out).unwrap();
    let trades = fs::read_to_string(dir.join("trades.csv")).unwrap();
    assert_eq!(trades.lines().count(), report.simulation.events.len() + 1);
    assert!(trades.starts_with("date,action,price,capital,trigger"));

    fs::remove_dir_all(&root).ok();
}
