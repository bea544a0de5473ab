//! fraud-score - demo presentation layer
//!
//! Usage: fraud-score <amount> <time> <account_age_days> <merchant_risk> <velocity>
//!
//! Configuration comes from the environment (see `constants.rs`).

use anyhow::{bail, Context};

use fraud_scoring_core::constants::APP_VERSION;
use fraud_scoring_core::logic::features::FEATURE_LAYOUT;
use fraud_scoring_core::{FraudScorer, ScoringConfig, TransactionFeatures};

fn parse_inputs(args: &[String]) -> anyhow::Result<[f64; 5]> {
    if args.len() != FEATURE_LAYOUT.len() {
        bail!(
            "expected {} values ({}), got {}",
            FEATURE_LAYOUT.len(),
            FEATURE_LAYOUT.join(", "),
            args.len()
        );
    }

    let mut values = [0.0f64; 5];
    for (i, raw) in args.iter().enumerate() {
        values[i] = raw.parse()
            .with_context(|| format!("{} must be a number, got {:?}", FEATURE_LAYOUT[i], raw))?;
    }
    Ok(values)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    log::info!("Starting fraud-score v{}...", APP_VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [amount, time, age, risk, velocity] = parse_inputs(&args)?;

    let config = ScoringConfig::from_env().context("invalid scoring configuration")?;
    let features = TransactionFeatures::build(amount, time, age, risk, velocity);

    let violations = config.input_bounds().check(&features);
    if !violations.is_empty() {
        for v in &violations {
            log::error!("{}", v);
        }
        bail!("{} input value(s) out of range", violations.len());
    }

    let scorer = FraudScorer::new(config);
    let info = scorer.init().context("scoring model unavailable")?;
    log::info!("Using model {} from {}", info.name, info.source);

    let verdict = scorer.score(&features).context("scoring failed")?;

    let output = serde_json::json!({
        "decision": verdict.decision,
        "risk_score": verdict.risk_score,
        "threshold": scorer.config().threshold,
        "model": scorer.status().model_name,
        "features": features.to_log_entry()["named_values"],
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_inputs_in_layout_order() {
        let values = parse_inputs(&args(&["100", "36000", "150", "0.5", "2"])).unwrap();
        assert_eq!(values, [100.0, 36000.0, 150.0, 0.5, 2.0]);
    }

    #[test]
    fn test_parse_inputs_wrong_arity() {
        let cases: Vec<Vec<&str>> = vec![
            vec![],
            vec!["100", "36000", "150", "0.5"],
            vec!["1", "2", "3", "4", "5", "6"],
        ];

        for given in cases {
            let err = parse_inputs(&args(&given)).unwrap_err().to_string();
            assert!(err.contains("expected 5 values"), "{}", err);
            assert!(err.contains(&format!("got {}", given.len())), "{}", err);
        }
    }

    #[test]
    fn test_parse_inputs_non_numeric_names_field() {
        let err = parse_inputs(&args(&["100", "36000", "old", "0.5", "2"])).unwrap_err();
        assert_eq!(err.to_string(), "Account_Age_Days must be a number, got \"old\"");
    }
}
