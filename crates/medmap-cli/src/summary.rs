use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use medmap_cli::types::{FeeScheduleResult, RuleCheck, RunResult};
use medmap_model::SourceSummary;
use medmap_transform::HazardKind;

pub fn print_summary(result: &RunResult) {
    let summary = &result.summary;
    println!("Output: {}", result.output_dir.display());
    for path in &result.reports {
        println!("Report: {}", path.display());
    }

    println!("{}", source_table(&summary.sources, summary.total_records));

    let mut stats = Table::new();
    apply_table_style(&mut stats);
    align_column(&mut stats, 1, CellAlignment::Right);
    stats.add_row(vec![
        Cell::new("Insurance values changed"),
        Cell::new(summary.insurance_values_changed),
    ]);
    stats.add_row(vec![
        Cell::new("Diagnosis values changed"),
        Cell::new(summary.diagnosis_values_changed),
    ]);
    stats.add_row(vec![
        Cell::new("Diagnosis columns"),
        Cell::new(summary.diagnosis_columns.join(", ")),
    ]);
    stats.add_row(vec![
        Cell::new("Extracted codes"),
        Cell::new(summary.extracted_codes),
    ]);
    stats.add_row(vec![
        Cell::new("Values without a code"),
        count_cell(summary.unparsable_values, Color::Yellow),
    ]);
    stats.add_row(vec![
        Cell::new("Ambiguous codes"),
        count_cell(summary.ambiguous_codes, Color::Red),
    ]);
    println!("{stats}");

    print_conflict_table(result);
    print_category_table(result);
}

fn source_table(sources: &[SourceSummary], total_records: usize) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Source"),
        header_cell("Records"),
        header_cell("Inputs"),
        header_cell("Written"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);
    for source in sources {
        let inputs: Vec<String> = source
            .inputs
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        table.add_row(vec![
            Cell::new(&source.source)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(source.records),
            dim_cell(inputs.join("\n")),
            written_cell(source.output.is_some()),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_records).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    table
}

pub fn print_fee_schedule(result: &FeeScheduleResult) {
    match &result.output {
        Some(path) => println!("Fee schedule: {}", path.display()),
        None => println!("Fee schedule: not written (dry run)"),
    }
    println!("{}", source_table(&result.sources, result.records));
}

fn print_conflict_table(result: &RunResult) {
    if result.conflicts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Code"), header_cell("Description")]);
    apply_table_style(&mut table);
    for group in &result.conflicts.groups {
        for (idx, description) in group.descriptions.iter().enumerate() {
            let code = if idx == 0 {
                Cell::new(&group.code)
                    .fg(Color::Red)
                    .add_attribute(Attribute::Bold)
            } else {
                dim_cell("")
            };
            table.add_row(vec![code, Cell::new(description)]);
        }
    }
    println!();
    println!("Codes with more than one description:");
    println!("{table}");
}

fn print_category_table(result: &RunResult) {
    if result.categories.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Code"),
        header_cell("Category"),
        header_cell("Order"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for assignment in &result.categories {
        let category = if assignment.is_others() {
            dim_cell(&assignment.category)
        } else {
            Cell::new(&assignment.category)
        };
        table.add_row(vec![
            Cell::new(&assignment.code),
            category,
            Cell::new(assignment.order),
        ]);
    }
    println!();
    println!("Procedure categories:");
    println!("{table}");
}

pub fn print_rule_check(check: &RuleCheck) {
    let mut rules = Table::new();
    rules.set_header(vec![
        header_cell("#"),
        header_cell("Contains"),
        header_cell("Replace with"),
    ]);
    apply_table_style(&mut rules);
    align_column(&mut rules, 0, CellAlignment::Right);
    for (idx, rule) in check.substitutions.rules().iter().enumerate() {
        rules.add_row(vec![
            dim_cell(idx + 1),
            Cell::new(&rule.pattern),
            Cell::new(&rule.replacement),
        ]);
    }
    println!("Substitution rules: {}", check.substitutions.len());
    println!("{rules}");

    let mut entries = Table::new();
    entries.set_header(vec![
        header_cell("#"),
        header_cell("Source"),
        header_cell("Destination"),
    ]);
    apply_table_style(&mut entries);
    align_column(&mut entries, 0, CellAlignment::Right);
    for (idx, entry) in check.exact_map.entries().iter().enumerate() {
        entries.add_row(vec![
            dim_cell(idx + 1),
            Cell::new(&entry.source),
            Cell::new(&entry.destination),
        ]);
    }
    println!();
    println!("Exact map entries: {}", check.exact_map.len());
    println!("{entries}");

    println!();
    println!("Category whitelist: {}", check.whitelist.codes().join(", "));

    if check.is_clean() {
        println!();
        println!("No cascading or duplicate entries found.");
        return;
    }

    let mut hazards = Table::new();
    hazards.set_header(vec![header_cell("Kind"), header_cell("Detail")]);
    apply_table_style(&mut hazards);
    for hazard in &check.hazards {
        hazards.add_row(vec![hazard_cell(hazard.kind), Cell::new(hazard.to_string())]);
    }
    for source in &check.duplicate_sources {
        hazards.add_row(vec![
            Cell::new("duplicate").fg(Color::Yellow),
            Cell::new(format!("exact-map source '{source}' is listed more than once")),
        ]);
    }
    println!();
    println!("Warnings:");
    println!("{hazards}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(80);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn hazard_cell(kind: HazardKind) -> Cell {
    match kind {
        HazardKind::Chained => Cell::new(kind.display_name()).fg(Color::Yellow),
        HazardKind::Unstable => Cell::new(kind.display_name())
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        HazardKind::UnnormalizedDestination => Cell::new(kind.display_name()).fg(Color::Yellow),
    }
}

fn written_cell(written: bool) -> Cell {
    if written {
        Cell::new("✓")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell("-")
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
