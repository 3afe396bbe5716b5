mod cli;
mod providers;
mod report;

use std::fs;

use clap::Parser;
use eyre::{Result, WrapErr};
use tracing_subscriber::EnvFilter;

use bolus_core::{
    AdjustmentFlags, AlgorithmRecommendation, BolusAdvisor, CalculatorSettings, DoseContext,
    SafetyThresholds, TherapyProfile, schedule_from_entries,
};
use bolus_traits::WallClock;

use cli::{AdviseArgs, Cli, Command, OverrideArgs};
use providers::{ArgLedger, FileHistory};

fn main() -> Result<()> {
    color_eyre::install()?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let config_text = fs::read_to_string(&args.config)
        .wrap_err_with(|| format!("reading config {}", args.config.display()))?;
    let config = bolus_config::load_toml(&config_text).wrap_err("parsing config TOML")?;
    bolus_config::validate(&config).wrap_err("validating config")?;

    let thresholds = SafetyThresholds::from(&config.safety);
    let settings = CalculatorSettings::from(&config.calculator);
    let advisor = BolusAdvisor::builder()
        .with_thresholds(thresholds)
        .with_settings(settings)
        .build()
        .map_err(eyre::Report::new)?;

    match &args.command {
        Command::Advise(advise) => run_advise(&args, advise, &advisor, &config),
        Command::Override(ov) => run_override(&args, ov, &advisor, &config),
    }
}

fn run_advise(
    args: &Cli,
    advise: &AdviseArgs,
    advisor: &BolusAdvisor,
    config: &bolus_config::Config,
) -> Result<()> {
    let csv_text = fs::read_to_string(&advise.glucose)
        .wrap_err_with(|| format!("reading glucose CSV {}", advise.glucose.display()))?;
    let rows = bolus_config::load_glucose_csv(&csv_text)?;
    let history = FileHistory::new(rows.iter().map(|r| r.glucose).collect());
    let ledger = ArgLedger {
        iob: advise.iob,
        cob: advise.cob,
    };

    if advise.cob > config.safety.max_carbs_grams {
        tracing::warn!(
            cob = advise.cob,
            max = config.safety.max_carbs_grams,
            "carbs on board exceed the configured maximum"
        );
    }

    let profile = TherapyProfile::from(&config.therapy);
    let schedule = schedule_from_entries(&config.basal)?;
    let ctx = DoseContext::assemble(&profile, &history, &ledger, &schedule, &WallClock::new())?;

    let flags = resolve_flags(advise, &config.calculator);

    let suggestion = match &advise.suggestion {
        Some(path) => {
            let text = fs::read_to_string(path)
                .wrap_err_with(|| format!("reading suggestion {}", path.display()))?;
            Some(AlgorithmRecommendation::from(
                &bolus_config::load_suggestion_json(&text)?,
            ))
        }
        None => None,
    };

    let result = advisor
        .recommend(&ctx, flags, suggestion.as_ref())
        .map_err(eyre::Report::new)?;

    let units = profile.units;
    let threshold = config.safety.low_glucose_threshold;
    if args.json {
        let value = report::render_json(&result, suggestion.as_ref(), units, threshold);
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print!(
            "{}",
            report::render_text(&result, suggestion.as_ref(), units, threshold)
        );
    }
    Ok(())
}

/// Explicit flags win over the automatic meal-composition trigger; both
/// are gated by the corresponding config toggles.
fn resolve_flags(advise: &AdviseArgs, calc: &bolus_config::Calculator) -> AdjustmentFlags {
    if advise.fatty {
        if calc.fatty_meals {
            return AdjustmentFlags::fatty_meal();
        }
        tracing::warn!("--fatty requested but calculator.fatty_meals is disabled");
    }
    if advise.superbolus {
        if calc.sweet_meals {
            return AdjustmentFlags::super_bolus();
        }
        tracing::warn!("--superbolus requested but calculator.sweet_meals is disabled");
    }
    if calc.fatty_meals {
        return AdjustmentFlags::from_meal_composition(
            advise.fat,
            advise.protein,
            advise.meal_grams,
            calc.fatty_meal_trigger,
        );
    }
    AdjustmentFlags::NONE
}

fn run_override(
    args: &Cli,
    ov: &OverrideArgs,
    advisor: &BolusAdvisor,
    config: &bolus_config::Config,
) -> Result<()> {
    let profile_target = config.therapy.target_glucose;
    match (ov.percentage, ov.target) {
        (Some(percentage), None) => {
            let target = advisor
                .percentage_to_target(percentage, profile_target)
                .map_err(eyre::Report::new)?;
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({ "percentage": percentage, "target": target })
                );
            } else {
                println!("{percentage:.0} % ≙ target {target:.0}");
            }
            Ok(())
        }
        (None, Some(target)) => {
            let percentage = advisor
                .target_to_percentage(target, profile_target)
                .map_err(eyre::Report::new)?;
            if args.json {
                println!(
                    "{}",
                    serde_json::json!({ "target": target, "percentage": percentage })
                );
            } else {
                println!("target {target:.0} ≙ {percentage:.0} %");
            }
            Ok(())
        }
        _ => eyre::bail!("pass exactly one of --percentage or --target"),
    }
}
