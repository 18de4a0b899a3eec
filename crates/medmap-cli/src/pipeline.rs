//! Run pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Rules**: Load substitution rules, exact map and whitelist
//! 2. **Ingest**: Read source tables, tag them by source and combine them
//! 3. **Normalize**: Apply substitution rules and the exact map
//! 4. **Analyze**: Extract codes, detect conflicts, assign categories
//! 5. **Output**: Write per-source partitions, reports and the run summary
//!
//! Each stage takes the output of the previous stage and returns typed results.
//! Fee schedules are merged by their own single-stage run, [`run_fee_schedules`].

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use tracing::{debug, info, info_span, warn};

use medmap_ingest::{
    SourceFile, load_exact_map_table, load_substitution_table, read_fee_schedule_table,
    read_source_table,
};
use medmap_model::{
    CategoryAssignment, CategoryOptions, CategoryWhitelist, ColumnLayout, ConflictReport,
    ExactMapTable, ExtractedCode, FeeScheduleSource, NormalizationTables, RunSummary,
    SourceSummary, SubstitutionTable,
};
use medmap_output::{
    write_category_table, write_conflict_report, write_fee_schedule, write_run_summary,
    write_source_partitions,
};
use medmap_transform::{
    NormalizationStats, SourceFrame, assign_categories, collect_diagnosis_codes,
    combine_fee_schedules, combine_source_frames, detect_conflicts, drop_empty_rows,
    find_exact_map_hazards, find_substitution_hazards, normalize_batch,
    observed_procedure_codes, prepare_fee_schedule, split_by_source,
};

use crate::logging::redact_value;
use crate::types::{FeeScheduleResult, RuleCheck, RunResult, RunSettings};

// ============================================================================
// Stage 1: Rules
// ============================================================================

/// Load the rule tables named in the settings. A table that is not configured
/// is empty.
pub fn load_tables(
    substitution_rules: Option<&Path>,
    exact_map: Option<&Path>,
    whitelist: &CategoryWhitelist,
) -> Result<NormalizationTables> {
    let start = Instant::now();
    let substitutions = match substitution_rules {
        Some(path) => load_substitution_table(path)
            .with_context(|| format!("load substitution rules {}", path.display()))?,
        None => SubstitutionTable::default(),
    };
    let exact_map = match exact_map {
        Some(path) => load_exact_map_table(path)
            .with_context(|| format!("load exact map {}", path.display()))?,
        None => ExactMapTable::default(),
    };
    info!(
        substitution_rules = substitutions.len(),
        exact_map_entries = exact_map.len(),
        whitelist_codes = whitelist.len(),
        duration_ms = start.elapsed().as_millis(),
        "rule tables loaded"
    );
    Ok(NormalizationTables::new(
        substitutions,
        exact_map,
        whitelist.clone(),
    ))
}

/// Load the rule tables and look for entries that feed into each other.
pub fn check_rules(
    substitution_rules: Option<&Path>,
    exact_map: Option<&Path>,
    whitelist: &CategoryWhitelist,
) -> Result<RuleCheck> {
    let tables = info_span!("rules")
        .in_scope(|| load_tables(substitution_rules, exact_map, whitelist))?;
    let mut hazards = find_substitution_hazards(&tables.substitutions);
    hazards.extend(find_exact_map_hazards(&tables.exact_map));
    for hazard in &hazards {
        warn!(%hazard, "rule cascade");
    }
    let duplicate_sources = tables
        .exact_map
        .duplicate_sources()
        .into_iter()
        .map(str::to_string)
        .collect();
    Ok(RuleCheck {
        substitutions: tables.substitutions,
        exact_map: tables.exact_map,
        whitelist: tables.whitelist,
        hazards,
        duplicate_sources,
    })
}

// ============================================================================
// Stage 2: Ingest
// ============================================================================

/// Result of the ingest stage.
#[derive(Debug)]
pub struct IngestResult {
    /// One frame per input file, in argument order, each naming its file.
    pub frames: Vec<SourceFrame>,
    /// All frames combined, with the source column filled in.
    pub combined: DataFrame,
}

/// Read every input file and combine the records into one batch.
pub fn ingest(inputs: &[PathBuf], layout: &ColumnLayout) -> Result<IngestResult> {
    let mut frames = Vec::with_capacity(inputs.len());
    for path in inputs {
        let file = SourceFile::from_path(path);
        let raw = read_source_table(&file.path)
            .with_context(|| format!("read source table {}", file.path.display()))?;
        let data = drop_empty_rows(&raw)
            .with_context(|| format!("drop empty rows {}", file.path.display()))?;
        debug!(
            path = %file.path.display(),
            source = %file.source,
            rows = data.height(),
            dropped = raw.height() - data.height(),
            "source table loaded"
        );
        let mut frame = SourceFrame::new(file.source, data);
        frame.add_source_file(file.path);
        frames.push(frame);
    }
    let combined =
        combine_source_frames(&frames, &layout.source).context("combine source tables")?;
    Ok(IngestResult { frames, combined })
}

// ============================================================================
// Stage 3: Normalize
// ============================================================================

/// Result of the normalize stage.
#[derive(Debug)]
pub struct NormalizeResult {
    pub data: DataFrame,
    pub stats: NormalizationStats,
}

pub fn normalize(
    combined: &DataFrame,
    tables: &NormalizationTables,
    layout: &ColumnLayout,
) -> Result<NormalizeResult> {
    let normalized =
        normalize_batch(combined, tables, layout).context("normalize record batch")?;
    Ok(NormalizeResult {
        data: normalized.data,
        stats: normalized.stats,
    })
}

// ============================================================================
// Stage 4: Analyze
// ============================================================================

/// Result of the analyze stage.
#[derive(Debug)]
pub struct AnalyzeResult {
    pub codes: Vec<ExtractedCode>,
    pub conflicts: ConflictReport,
    pub categories: Vec<CategoryAssignment>,
}

impl AnalyzeResult {
    pub fn unparsable_count(&self) -> usize {
        self.codes.iter().filter(|code| code.code.is_none()).count()
    }
}

/// Extract diagnosis codes, report ambiguous ones and build the category
/// table from the normalized batch.
pub fn analyze(
    data: &DataFrame,
    whitelist: &CategoryWhitelist,
    layout: &ColumnLayout,
    options: CategoryOptions,
) -> Result<AnalyzeResult> {
    let codes = collect_diagnosis_codes(data, layout);
    let conflicts = detect_conflicts(&codes);
    for group in &conflicts.groups {
        let descriptions: Vec<&str> = group
            .descriptions
            .iter()
            .map(|description| redact_value(description))
            .collect();
        warn!(
            code = %group.code,
            descriptions = group.descriptions.len(),
            values = ?descriptions,
            "code reported with more than one description"
        );
    }

    let procedures =
        observed_procedure_codes(data, layout).context("read procedure codes")?;
    let categories = assign_categories(whitelist, &procedures, options);
    Ok(AnalyzeResult {
        codes,
        conflicts,
        categories,
    })
}

// ============================================================================
// Stage 5: Output
// ============================================================================

/// Result of the output stage.
#[derive(Debug)]
pub struct OutputResult {
    pub sources: Vec<SourceSummary>,
    pub reports: Vec<PathBuf>,
}

/// Record on each partition the input files its rows were read from.
fn attach_source_files(partitions: &mut [SourceFrame], inputs: &[SourceFrame]) {
    for partition in partitions {
        let source = partition.source.clone();
        for frame in inputs.iter().filter(|frame| frame.source == source) {
            for path in frame.source_files() {
                partition.add_source_file(path.clone());
            }
        }
    }
}

/// Split the normalized batch by source and write every output file.
///
/// `inputs` are the ingested frames, used to name each partition's input
/// files. With `dry_run` nothing is written; the per-source counts are still
/// returned.
pub fn output(
    output_dir: &Path,
    data: &DataFrame,
    inputs: &[SourceFrame],
    analysis: &AnalyzeResult,
    layout: &ColumnLayout,
    dry_run: bool,
) -> Result<OutputResult> {
    let mut partitions = split_by_source(data, &layout.source).context("split by source")?;
    attach_source_files(&mut partitions, inputs);
    if dry_run {
        let sources = partitions
            .iter()
            .map(|frame| SourceSummary {
                source: frame.source.clone(),
                records: frame.record_count(),
                inputs: frame.source_files().to_vec(),
                output: None,
            })
            .collect();
        return Ok(OutputResult {
            sources,
            reports: Vec::new(),
        });
    }

    let sources = write_source_partitions(output_dir, &partitions)
        .with_context(|| format!("write partitions to {}", output_dir.display()))?;
    let reports = vec![
        write_conflict_report(output_dir, &analysis.conflicts)
            .context("write conflict report")?,
        write_category_table(output_dir, &analysis.categories)
            .context("write category table")?,
    ];
    Ok(OutputResult { sources, reports })
}

// ============================================================================
// Orchestration
// ============================================================================

/// Run every stage for the given settings.
pub fn run_pipeline(settings: &RunSettings) -> Result<RunResult> {
    let layout = &settings.layout;

    let tables = info_span!("rules").in_scope(|| {
        load_tables(
            settings.substitution_rules.as_deref(),
            settings.exact_map.as_deref(),
            &settings.whitelist,
        )
    })?;

    let ingest_span = info_span!("ingest", files = settings.inputs.len());
    let ingest_start = Instant::now();
    let IngestResult { frames, combined } =
        ingest_span.in_scope(|| ingest(&settings.inputs, layout))?;
    ingest_span.in_scope(|| {
        info!(
            files = frames.len(),
            records = combined.height(),
            columns = combined.width(),
            duration_ms = ingest_start.elapsed().as_millis(),
            "ingest complete"
        );
    });

    let normalize_span = info_span!("normalize");
    let normalize_start = Instant::now();
    let normalized = normalize_span.in_scope(|| normalize(&combined, &tables, layout))?;
    normalize_span.in_scope(|| {
        info!(
            records = normalized.stats.records,
            insurance_changed = normalized.stats.insurance_changed,
            diagnosis_changed = normalized.stats.diagnosis_changed,
            diagnosis_columns = normalized.stats.diagnosis_columns.len(),
            duration_ms = normalize_start.elapsed().as_millis(),
            "normalize complete"
        );
    });
    if normalized.stats.diagnosis_columns.is_empty() {
        warn!(
            prefix = %layout.diagnosis_prefix,
            "no diagnosis columns found"
        );
    }

    let analyze_span = info_span!("analyze");
    let analyze_start = Instant::now();
    let analysis = analyze_span.in_scope(|| {
        analyze(
            &normalized.data,
            &tables.whitelist,
            layout,
            settings.category_options,
        )
    })?;
    analyze_span.in_scope(|| {
        info!(
            extracted_codes = analysis.codes.len(),
            unparsable = analysis.unparsable_count(),
            ambiguous_codes = analysis.conflicts.code_count(),
            category_rows = analysis.categories.len(),
            duration_ms = analyze_start.elapsed().as_millis(),
            "analyze complete"
        );
    });

    let output_span = info_span!("output", dry_run = settings.dry_run);
    let output_start = Instant::now();
    let OutputResult {
        sources,
        mut reports,
    } = output_span.in_scope(|| {
        output(
            &settings.output_dir,
            &normalized.data,
            &frames,
            &analysis,
            layout,
            settings.dry_run,
        )
    })?;

    let summary = RunSummary {
        generated_at: chrono::Utc::now().to_rfc3339(),
        total_records: sources.iter().map(|source| source.records).sum(),
        sources,
        insurance_values_changed: normalized.stats.insurance_changed,
        diagnosis_values_changed: normalized.stats.diagnosis_changed,
        diagnosis_columns: normalized.stats.diagnosis_columns.clone(),
        extracted_codes: analysis.codes.len(),
        unparsable_values: analysis.unparsable_count(),
        ambiguous_codes: analysis.conflicts.code_count(),
        category_rows: analysis.categories.len(),
        others_codes: analysis
            .categories
            .iter()
            .filter(|assignment| assignment.is_others())
            .count(),
    };
    if !settings.dry_run {
        let path = output_span
            .in_scope(|| write_run_summary(&settings.output_dir, &summary))
            .context("write run summary")?;
        reports.push(path);
    }
    output_span.in_scope(|| {
        info!(
            sources = summary.sources.len(),
            files = reports.len()
                + summary
                    .sources
                    .iter()
                    .filter(|source| source.output.is_some())
                    .count(),
            duration_ms = output_start.elapsed().as_millis(),
            "output complete"
        );
    });

    Ok(RunResult {
        output_dir: settings.output_dir.clone(),
        summary,
        conflicts: analysis.conflicts,
        categories: analysis.categories,
        reports,
    })
}

// ============================================================================
// Fee schedules
// ============================================================================

/// Read every configured fee schedule, keep the rows it allows and merge the
/// results into `<output_dir>/fee_schedule.csv`.
///
/// With `dry_run` the merge still happens but nothing is written.
pub fn run_fee_schedules(
    schedules: &[FeeScheduleSource],
    output_dir: &Path,
    dry_run: bool,
) -> Result<FeeScheduleResult> {
    if schedules.is_empty() {
        anyhow::bail!("no fee schedules configured");
    }
    let span = info_span!("fee_schedules", schedules = schedules.len(), dry_run);
    let _guard = span.enter();
    let start = Instant::now();

    let mut frames = Vec::with_capacity(schedules.len());
    for schedule in schedules {
        let raw = read_fee_schedule_table(&schedule.path, schedule.skip_rows).with_context(
            || format!("read fee schedule '{}' {}", schedule.source, schedule.path.display()),
        )?;
        let frame = prepare_fee_schedule(&raw, schedule)
            .with_context(|| format!("prepare fee schedule '{}'", schedule.source))?;
        debug!(
            source = %frame.source,
            raw_rows = raw.height(),
            kept_rows = frame.record_count(),
            "fee schedule prepared"
        );
        frames.push(frame);
    }
    let merged = combine_fee_schedules(&frames).context("merge fee schedules")?;

    let output = if dry_run {
        None
    } else {
        Some(write_fee_schedule(output_dir, &merged).context("write fee schedule")?)
    };
    let sources = frames
        .iter()
        .map(|frame| SourceSummary {
            source: frame.source.clone(),
            records: frame.record_count(),
            inputs: frame.source_files().to_vec(),
            output: output.clone(),
        })
        .collect();
    info!(
        records = merged.height(),
        written = output.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "fee schedules merged"
    );
    Ok(FeeScheduleResult {
        records: merged.height(),
        sources,
        output,
    })
}
