use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use btap_carbon::CarbonScope;
use btap_cli::commands::VariantListing;
use btap_model::{CarbonReport, Value};
use btap_standards::DoctorReport;

pub fn print_doctor_report(report: &DoctorReport) {
    println!(
        "Verified {} files ({} tables, {} rows, {} documents)",
        report.counts.files, report.counts.tables, report.counts.rows, report.counts.documents
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Rows"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for summary in &report.tables {
        table.add_row(vec![
            Cell::new(&summary.role),
            Cell::new(summary.rows),
            Cell::new(summary.columns),
        ]);
    }
    for document in &report.documents {
        table.add_row(vec![
            Cell::new(document),
            dim_cell("json"),
            dim_cell("-"),
        ]);
    }
    println!("{table}");

    let mut families = Table::new();
    families.set_header(vec![header_cell("Family"), header_cell("Variants")]);
    apply_table_style(&mut families);
    align_column(&mut families, 1, CellAlignment::Right);
    for (family, count) in &report.counts.families {
        families.add_row(vec![Cell::new(family), Cell::new(count)]);
    }
    families.add_row(vec![
        header_cell("TOTAL"),
        Cell::new(report.counts.variants).add_attribute(Attribute::Bold),
    ]);
    println!("{families}");
}

pub fn print_variants(listings: &[VariantListing]) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Variant"),
        header_cell("Parent"),
        header_cell("Family"),
        header_cell("Own rules"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for listing in listings {
        let name = if listing.depth == 0 {
            Cell::new(&listing.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold)
        } else {
            Cell::new(format!("{}{}", "  ".repeat(listing.depth - 1), listing.name))
        };
        let parent = match &listing.parent {
            Some(parent) => Cell::new(parent),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            name,
            parent,
            Cell::new(&listing.family),
            Cell::new(listing.own_rules),
        ]);
    }
    println!("{table}");
    println!("{} variants", listings.len());
}

pub fn print_rule_value(value: &Value) {
    match value {
        Value::Null => println!("null"),
        other => println!("{other}"),
    }
}

pub fn print_carbon_report(report: &CarbonReport, scope: CarbonScope) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Surface type"),
        header_cell("Area (m²)"),
        header_cell(&format!("Carbon {scope} (kg CO2e)")),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    let mut total_area = 0.0;
    for (surface_type, totals) in &report.surfaces {
        total_area += totals.area_m2;
        if totals.area_m2 == 0.0 && totals.carbon == 0.0 {
            table.add_row(vec![
                dim_cell(surface_type),
                dim_cell("0.00"),
                dim_cell("0.00"),
            ]);
        } else {
            table.add_row(vec![
                Cell::new(surface_type),
                Cell::new(format!("{:.2}", totals.area_m2)),
                Cell::new(format!("{:.2}", totals.carbon)),
            ]);
        }
    }
    table.add_row(vec![
        header_cell("TOTAL"),
        Cell::new(format!("{total_area:.2}")).add_attribute(Attribute::Bold),
        Cell::new(format!("{:.2}", report.total)).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
}

fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(100);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
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
