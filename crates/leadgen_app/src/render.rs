use leadgen_core::{ConsoleViewModel, DataView};

const MAX_CELL_WIDTH: usize = 40;

/// Prints transient status while a run is in flight.
pub fn status(view: &ConsoleViewModel) {
    if view.enriching {
        println!("Enriching data... {}%", view.progress);
    } else if view.loading {
        println!("Loading...");
    }
}

/// Prints the settled dataset as a padded text table.
pub fn table(view: &ConsoleViewModel) {
    if view.rows.is_empty() {
        let name = match view.active_view {
            DataView::Raw => "raw",
            DataView::Enriched => "enriched",
        };
        println!("No {name} results yet.");
        return;
    }

    let widths = column_widths(&view.columns, &view.rows);
    let headers: Vec<String> = view.columns.iter().map(|c| c.to_uppercase()).collect();
    print_row(&headers, &widths);
    println!(
        "{}",
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-")
    );
    for row in &view.rows {
        print_row(row, &widths);
    }

    if view.pager_visible {
        println!(
            "Page {} of {} ({} records)",
            view.page, view.page_count, view.record_count
        );
    }
}

pub fn prior_searches(view: &ConsoleViewModel) {
    if view.prior_searches.is_empty() {
        println!("No previous results yet.");
        return;
    }
    for search in &view.prior_searches {
        println!(
            "{}  {:<20} {:<15} {:<10} {}",
            search.id,
            search.industry,
            search.region,
            search.status,
            local_timestamp(&search.created_at)
        );
    }
}

fn print_row(cells: &[String], widths: &[usize]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &width)| format!("{:<width$}", truncate(cell, width)))
        .collect::<Vec<_>>()
        .join(" | ");
    println!("{}", line.trim_end());
}

fn column_widths(columns: &[String], rows: &[Vec<String>]) -> Vec<usize> {
    columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let widest_cell = rows
                .iter()
                .map(|row| row.get(index).map_or(0, |cell| cell.chars().count()))
                .max()
                .unwrap_or(0);
            widest_cell.max(column.chars().count()).min(MAX_CELL_WIDTH)
        })
        .collect()
}

fn truncate(cell: &str, width: usize) -> String {
    if cell.chars().count() <= width {
        return cell.to_owned();
    }
    let mut shortened: String = cell.chars().take(width.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

fn local_timestamp(raw: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_owned())
}
