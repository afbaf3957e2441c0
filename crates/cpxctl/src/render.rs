//! Static table rendering
//!
//! Renders a finalized `RowTable` as a box-drawn table. Services are
//! emitted in sorted order so the same table always renders to the
//! same bytes. Unhealthy rows are painted red-on-black the way the
//! live dashboard highlights them.

use cpx_common::{AggregationMode, HealthStatus, RowSet, RowTable};
use owo_colors::OwoColorize;

const DEFAULT_HEADER: [&str; 5] = ["IP", "Service", "Cpu", "Memory", "Status"];
const MERGED_HEADER: [&str; 5] = ["IPs", "Service", "Cpu_Avg", "Memory_Avg", "Replicas"];

/// One visual line of a logical row: cell texts plus highlight flag.
struct Line {
    cells: [String; 5],
    unhealthy: bool,
}

/// Whether a rule is drawn between logical rows (merged tables group
/// several address lines per row, so they get separators).
struct Layout {
    header: [&'static str; 5],
    separate_rows: bool,
}

/// Render the table, optionally filtered down to one service. The
/// output always ends with a newline; an empty table renders to just
/// the header block.
pub fn render_table(table: &RowTable, service_filter: &str) -> String {
    let layout = match table.mode() {
        AggregationMode::Default => Layout {
            header: DEFAULT_HEADER,
            separate_rows: false,
        },
        AggregationMode::Merged => Layout {
            header: MERGED_HEADER,
            separate_rows: true,
        },
    };

    let mut rows: Vec<Vec<Line>> = Vec::new();
    for (service, set) in table.iter_sorted() {
        if !service_filter.is_empty() && service != service_filter {
            continue;
        }
        match set {
            RowSet::Default(default_rows) => {
                for row in default_rows {
                    rows.push(vec![Line {
                        cells: [
                            row.address.clone(),
                            row.service.clone(),
                            format!("{}%", row.cpu_pct),
                            format!("{}%", row.mem_pct),
                            row.status.to_string(),
                        ],
                        unhealthy: row.status == HealthStatus::Unhealthy,
                    }]);
                }
            }
            RowSet::Merged(row) => {
                // One address per line; the other columns only on the
                // first line of the row.
                let mut lines = Vec::new();
                for (i, address) in row.addresses.iter().enumerate() {
                    let rest = if i == 0 {
                        [
                            row.service.clone(),
                            format!("{}%", row.cpu_avg),
                            format!("{}%", row.mem_avg),
                            row.replica_count.to_string(),
                        ]
                    } else {
                        Default::default()
                    };
                    let [service, cpu, mem, replicas] = rest;
                    lines.push(Line {
                        cells: [address.clone(), service, cpu, mem, replicas],
                        unhealthy: false,
                    });
                }
                rows.push(lines);
            }
        }
    }

    let mut widths = layout.header.map(str::len);
    for row in &rows {
        for line in row {
            for (w, cell) in widths.iter_mut().zip(&line.cells) {
                *w = (*w).max(cell.len());
            }
        }
    }

    let mut out = String::new();
    out.push_str(&rule(&widths, '┏', '┳', '┓'));
    out.push_str(&format_line(&layout.header.map(String::from), &widths, false));
    out.push_str(&rule(&widths, '┣', '╋', '┫'));
    for (i, row) in rows.iter().enumerate() {
        if layout.separate_rows && i > 0 {
            out.push_str(&rule(&widths, '┣', '╋', '┫'));
        }
        for line in row {
            out.push_str(&format_line(&line.cells, &widths, line.unhealthy));
        }
    }
    out.push_str(&rule(&widths, '┗', '┻', '┛'));
    out
}

fn rule(widths: &[usize; 5], left: char, mid: char, right: char) -> String {
    let mut s = String::new();
    s.push(left);
    for (i, w) in widths.iter().enumerate() {
        if i > 0 {
            s.push(mid);
        }
        for _ in 0..w + 2 {
            s.push('━');
        }
    }
    s.push(right);
    s.push('\n');
    s
}

fn format_line(cells: &[String; 5], widths: &[usize; 5], unhealthy: bool) -> String {
    let mut s = String::new();
    for (cell, w) in cells.iter().zip(widths) {
        s.push('┃');
        let padded = format!(" {:width$} ", cell, width = *w);
        if unhealthy {
            s.push_str(&format!("{}", padded.black().on_red()));
        } else {
            s.push_str(&padded);
        }
    }
    s.push('┃');
    s.push('\n');
    s
}
