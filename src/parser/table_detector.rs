//! Table detection using text position analysis (stream mode).
//!
//! Tables are found from text alignment alone: spans are grouped into rows
//! by baseline, column edges are taken from left edges that recur across
//! rows, and runs of consecutive aligned rows become tables. No ruling
//! lines are consulted.

use std::collections::{HashMap, HashSet};

use crate::model::{Cell, Table};

use super::layout::TextSpan;

/// Width of the buckets left edges are snapped to when counting alignment.
const EDGE_BUCKET: f32 = 5.0;

/// Distance from a column edge within which a span counts as aligned.
const ALIGN_TOLERANCE: f32 = 5.0;

/// Slack allowed for spans starting slightly left of their column.
const COLUMN_SLACK: f32 = 10.0;

/// Table detector configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Minimum number of rows to consider as table
    pub min_rows: usize,
    /// Minimum number of columns to consider as table
    pub min_columns: usize,
    /// Maximum number of columns (above this, likely word-level splitting)
    pub max_columns: usize,
    /// Y tolerance for grouping spans into rows (fraction of font size)
    pub y_tolerance_factor: f32,
    /// Minimum column alignment ratio (0.0-1.0)
    pub min_alignment_ratio: f32,
    /// Minimum gap between columns (points)
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// A row of spans sharing a baseline, as indices into the page's spans.
#[derive(Debug, Clone)]
struct SpanRow {
    y: f32,
    spans: Vec<usize>,
}

/// Detects tables in a list of text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a new table detector with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new table detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables in the given spans.
    ///
    /// Returns the tables top to bottom and the spans that were not part of
    /// any table.
    pub fn detect(&self, spans: Vec<TextSpan>) -> (Vec<Table>, Vec<TextSpan>) {
        log::debug!("TableDetector: starting with {} spans", spans.len());

        let min_spans = self.config.min_rows * self.config.min_columns;
        if spans.len() < min_spans {
            log::debug!(
                "TableDetector: not enough spans ({} < {})",
                spans.len(),
                min_spans
            );
            return (vec![], spans);
        }

        let rows = self.group_into_rows(&spans);
        if rows.len() < self.config.min_rows {
            log::debug!(
                "TableDetector: not enough rows ({} < {})",
                rows.len(),
                self.config.min_rows
            );
            return (vec![], spans);
        }

        let columns = self.detect_columns(&spans, &rows);
        log::debug!("TableDetector: page column edges {:?}", columns);
        if columns.len() < self.config.min_columns {
            return (vec![], spans);
        }

        let mut tables = Vec::new();
        let mut used: HashSet<usize> = HashSet::new();

        for (start, end) in self.find_table_regions(&spans, &rows, &columns) {
            let region = &rows[start..=end];

            // Columns are re-derived per region; the page-wide edges only
            // locate candidate rows
            let region_columns = self.detect_columns(&spans, region);
            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping rows {}..={}, too many columns ({} > {})",
                    start,
                    end,
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if self.is_list_pattern(&spans, region, &region_columns) {
                log::debug!("TableDetector: skipping rows {}..={}, list pattern", start, end);
                continue;
            }

            used.extend(region.iter().flat_map(|row| row.spans.iter().copied()));
            tables.push(build_table(&spans, region, &region_columns));
        }

        log::debug!(
            "TableDetector: {} tables, {} spans in tables",
            tables.len(),
            used.len()
        );

        let remaining = spans
            .into_iter()
            .enumerate()
            .filter(|(i, _)| !used.contains(i))
            .map(|(_, span)| span)
            .collect();

        (tables, remaining)
    }

    /// Group spans into rows by Y position, top of page first.
    fn group_into_rows(&self, spans: &[TextSpan]) -> Vec<SpanRow> {
        let mut order: Vec<usize> = (0..spans.len()).collect();
        order.sort_by(|&a, &b| {
            spans[b]
                .y
                .partial_cmp(&spans[a].y)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| {
                    spans[a]
                        .x
                        .partial_cmp(&spans[b].x)
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        let mut rows: Vec<SpanRow> = Vec::new();
        let mut current: Vec<usize> = Vec::new();
        let mut current_y: Option<f32> = None;

        for idx in order {
            let span = &spans[idx];
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;

            match current_y {
                Some(y) if (span.y - y).abs() <= y_tolerance => current.push(idx),
                _ => {
                    if !current.is_empty() {
                        rows.push(make_row(spans, std::mem::take(&mut current)));
                    }
                    current_y = Some(span.y);
                    current.push(idx);
                }
            }
        }

        if !current.is_empty() {
            rows.push(make_row(spans, current));
        }

        rows
    }

    /// Detect column edges from left edges that recur across rows.
    ///
    /// Rows holding two or more spans are preferred. When too few of them
    /// exist, every span of every row is counted instead.
    fn detect_columns(&self, spans: &[TextSpan], rows: &[SpanRow]) -> Vec<f32> {
        let multi_span_rows: Vec<&SpanRow> = rows.iter().filter(|r| r.spans.len() >= 2).collect();

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        let row_count = if multi_span_rows.len() >= self.config.min_rows {
            // Each bucket counts once per row
            for row in &multi_span_rows {
                let buckets: HashSet<i32> = row.spans.iter().map(|&i| bucket(spans[i].x)).collect();
                for b in buckets {
                    *edge_counts.entry(b).or_insert(0) += 1;
                }
            }
            multi_span_rows.len()
        } else {
            for row in rows {
                for &i in &row.spans {
                    *edge_counts.entry(bucket(spans[i].x)).or_insert(0) += 1;
                }
            }
            rows.len()
        };

        let min_occurrences =
            ((row_count as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|&(_, count)| count >= min_occurrences)
            .map(|(b, _)| b as f32 * EDGE_BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut merged: Vec<f32> = Vec::with_capacity(edges.len());
        for edge in edges {
            match merged.last() {
                Some(&last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find runs of consecutive aligned rows, as inclusive index ranges.
    fn find_table_regions(
        &self,
        spans: &[TextSpan],
        rows: &[SpanRow],
        columns: &[f32],
    ) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut start: Option<usize> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = alignment_score(spans, row, columns) >= self.config.min_alignment_ratio;
            match (aligned, start) {
                (true, None) => start = Some(i),
                (false, Some(s)) => {
                    if i - s >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                    start = None;
                }
                _ => {}
            }
        }

        if let Some(s) = start {
            if rows.len() - s >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// Check if aligned rows are really a numbered or bulleted list.
    ///
    /// A marker such as "1." or "-" set apart from its item text lands at
    /// its own X position and looks like a first column.
    fn is_list_pattern(&self, spans: &[TextSpan], rows: &[SpanRow], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullets = 0;
        let mut numbers = 0;
        for row in rows {
            // Rows are sorted by X, so the first span is the leftmost
            let Some(&first) = row.spans.first() else {
                continue;
            };
            let text = spans[first].text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }

        let bullet_ratio = bullets as f32 / rows.len() as f32;
        let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;

        // Numbered first columns only disqualify two-column candidates
        bullet_ratio >= 0.5 || (columns.len() == 2 && marker_ratio >= 0.5)
    }
}

fn bucket(x: f32) -> i32 {
    (x / EDGE_BUCKET).round() as i32
}

fn make_row(spans: &[TextSpan], mut members: Vec<usize>) -> SpanRow {
    members.sort_by(|&a, &b| {
        spans[a]
            .x
            .partial_cmp(&spans[b].x)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let y = members.iter().map(|&i| spans[i].y).sum::<f32>() / members.len() as f32;
    SpanRow { y, spans: members }
}

/// Fraction of a row's spans whose left edge sits on a column edge.
fn alignment_score(spans: &[TextSpan], row: &SpanRow, columns: &[f32]) -> f32 {
    if row.spans.is_empty() || columns.is_empty() {
        return 0.0;
    }

    let aligned = row
        .spans
        .iter()
        .filter(|&&i| {
            columns
                .iter()
                .any(|col| (spans[i].x - col).abs() <= ALIGN_TOLERANCE)
        })
        .count();

    aligned as f32 / row.spans.len() as f32
}

/// Build a table by assigning each span of each row to one column.
///
/// Spans sharing a column are joined with a space; a column with no span
/// yields an absent cell.
fn build_table(spans: &[TextSpan], rows: &[SpanRow], columns: &[f32]) -> Table {
    let right_x = rows
        .iter()
        .flat_map(|r| r.spans.iter())
        .map(|&i| spans[i].right())
        .fold(f32::MIN, f32::max);

    let mut table = Table::new();
    for row in rows {
        let mut contents: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for &i in &row.spans {
            let col = find_column_for_span(spans[i].x, columns, right_x);
            contents[col].push(spans[i].text.trim());
        }

        let cells: Vec<Cell> = contents
            .into_iter()
            .map(|parts| {
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            })
            .collect();
        table.add_row(cells);
    }

    log::trace!(
        "TableDetector: built {}x{} table at y={:.1}",
        table.row_count(),
        columns.len(),
        rows.first().map(|r| r.y).unwrap_or(0.0)
    );
    table
}

/// Find which column a span belongs to from its left edge.
fn find_column_for_span(span_x: f32, columns: &[f32], right_x: f32) -> usize {
    for (i, &col_start) in columns.iter().enumerate() {
        let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
        if span_x >= col_start - COLUMN_SLACK && span_x < col_end - COLUMN_SLACK {
            return i;
        }
    }

    // Otherwise the nearest edge
    columns
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| {
            (span_x - **a)
                .abs()
                .partial_cmp(&(span_x - **b).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Check if text is a bullet marker (•, -, etc.).
fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text.trim(),
        "-" | "–"
            | "—"
            | "•"
            | "·"
            | "*"
            | "○"
            | "▪"
            | "◦"
            | "▸"
            | "►"
            | "■"
            | "●"
            | "□"
            | "◆"
            | "▶"
            | "➤"
    )
}

/// Check if text is a number-style list marker (1., 2), a., etc.).
fn is_number_marker(text: &str) -> bool {
    // Internal whitespace is ignored ("1 .")
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }

    if cleaned.parse::<u32>().is_ok() {
        return true;
    }

    if let Some(pos) = cleaned.find(|c: char| !c.is_ascii_digit()) {
        let (digits, suffix) = cleaned.split_at(pos);
        if !digits.is_empty() && (suffix == "." || suffix == ")") {
            return true;
        }
    }

    let mut chars = cleaned.chars();
    matches!(
        (chars.next(), chars.next(), chars.next()),
        (Some(c), Some('.' | ')'), None) if c.is_alphabetic()
    )
}
