use anyhow::{Context, Result};
use tracing::info_span;

use medmap_ingest::{RunConfig, load_run_config};
use medmap_model::CategoryWhitelist;

use medmap_cli::pipeline::{check_rules, run_fee_schedules, run_pipeline};
use medmap_cli::types::{FeeScheduleResult, RuleCheck, RunResult, RunSettings};

use crate::cli::{FeeArgs, RuleArgs, RunArgs};

fn load_config(args: &RuleArgs) -> Result<RunConfig> {
    match &args.config {
        Some(path) => {
            load_run_config(path).with_context(|| format!("load config {}", path.display()))
        }
        None => Ok(RunConfig::default()),
    }
}

/// Merge the configuration file with command-line overrides.
fn resolve_settings(args: &RunArgs) -> Result<RunSettings> {
    let config = load_config(&args.rules)?;
    let mut settings = RunSettings::from_config(config, args.inputs.clone(), args.output_dir.clone())
        .context("configured whitelist")?;

    if let Some(path) = &args.rules.rules {
        settings.substitution_rules = Some(path.clone());
    }
    if let Some(path) = &args.rules.exact_map {
        settings.exact_map = Some(path.clone());
    }
    if let Some(codes) = &args.rules.whitelist {
        settings.whitelist = CategoryWhitelist::parse(codes).context("--whitelist")?;
    }
    if args.include_unobserved_whitelist {
        settings.category_options.include_unobserved_whitelist = true;
    }
    if let Some(name) = &args.insurance_column {
        settings.layout.insurance_plan = name.clone();
    }
    if let Some(prefix) = &args.diagnosis_prefix {
        settings.layout.diagnosis_prefix = prefix.clone();
    }
    if let Some(name) = &args.procedure_column {
        settings.layout.procedure_code = name.clone();
    }
    settings.dry_run = args.dry_run;
    Ok(settings)
}

pub fn run(args: &RunArgs) -> Result<RunResult> {
    let settings = resolve_settings(args)?;
    let run_span = info_span!(
        "run",
        inputs = settings.inputs.len(),
        output_dir = %settings.output_dir.display()
    );
    let _run_guard = run_span.enter();
    run_pipeline(&settings)
}

pub fn run_check_rules(args: &RuleArgs) -> Result<RuleCheck> {
    let config = load_config(args)?;
    let whitelist = match &args.whitelist {
        Some(codes) => CategoryWhitelist::parse(codes).context("--whitelist")?,
        None => config
            .categories
            .whitelist()
            .context("configured whitelist")?,
    };
    let rules = args.rules.clone().or(config.tables.substitution_rules);
    let exact_map = args.exact_map.clone().or(config.tables.exact_map);
    check_rules(rules.as_deref(), exact_map.as_deref(), &whitelist)
}

pub fn run_fee_schedule(args: &FeeArgs) -> Result<FeeScheduleResult> {
    let config = load_run_config(&args.config)
        .with_context(|| format!("load config {}", args.config.display()))?;
    run_fee_schedules(&config.fee_schedules, &args.output_dir, args.dry_run)
}
