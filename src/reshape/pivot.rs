use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::{LongRow, Metric};

/// One output row per distinct school_id. `values` is aligned with the
/// owning table's `metric_years` list.
#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
    pub school_id: String,
    pub school_name: String,
    pub values: Vec<i64>,
}

/// The pivoted table: the observed (metric, year) columns in output order,
/// plus one row per school sorted by school_id ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub metric_years: Vec<(Metric, u32)>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    /// Full header in output order: the two id columns, then a
    /// `{metric}_{year}` name per value column.
    pub fn header(&self) -> Vec<String> {
        let mut columns = vec!["school_id".to_string(), "school_name".to_string()];
        columns.extend(
            self.metric_years
                .iter()
                .map(|&(metric, year)| format!("{}_{}", metric.as_str(), year)),
        );
        columns
    }
}

struct SchoolCells {
    name: String,
    cells: HashMap<(Metric, u32), Option<f64>>,
}

/// Group the long rows by school_id and materialize the wide table.
///
/// The column set is exactly the (metric, year) pairs observed anywhere in
/// the input; `(Metric, u32)` ordering in the `BTreeSet` is the output
/// column order. Cells a school never observed, and observed-but-null cells,
/// become 0; fractional values truncate toward zero. Repeated writes to one
/// key (duplicate records, a renamed school) resolve last-write-wins in
/// flattened input order.
pub(super) fn pivot(long: Vec<LongRow>) -> WideTable {
    let mut columns: BTreeSet<(Metric, u32)> = BTreeSet::new();
    let mut schools: BTreeMap<String, SchoolCells> = BTreeMap::new();

    for row in long {
        columns.insert((row.metric, row.year));
        let school = schools
            .entry(row.school_id)
            .or_insert_with(|| SchoolCells {
                name: String::new(),
                cells: HashMap::new(),
            });
        school.name = row.school_name;
        school.cells.insert((row.metric, row.year), row.value);
    }

    let metric_years: Vec<(Metric, u32)> = columns.into_iter().collect();
    let rows = schools
        .into_iter()
        .map(|(school_id, school)| {
            let values = metric_years
                .iter()
                .map(|key| {
                    let cell = school.cells.get(key).copied().flatten().unwrap_or(0.0);
                    cell as i64
                })
                .collect();
            WideRow {
                school_id,
                school_name: school.name,
                values,
            }
        })
        .collect();

    WideTable { metric_years, rows }
}
