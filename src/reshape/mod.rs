//! Long-to-wide reshape of school-year observations.
//!
//! The per-year record lists are flattened into one stream, narrowed to the
//! two configured metrics, unpivoted into one row per (school, year, metric),
//! then pivoted into one row per school with a `{metric}_{year}` column for
//! every pair observed anywhere in the input.

mod pivot;

pub use pivot::{WideRow, WideTable};

use crate::fetch::SchoolRecord;

/// The two metrics carried into the wide table. Declaration order doubles as
/// column-group order: every students column precedes every teachers column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Metric {
    Students,
    Teachers,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Students => "students",
            Metric::Teachers => "teachers",
        }
    }
}

/// One unpivoted observation. Lives only between unpivot and pivot.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRow {
    pub school_id: String,
    pub school_name: String,
    pub year: u32,
    pub metric: Metric,
    pub value: Option<f64>,
}

/// Reshape the per-year record lists into the final wide table.
pub fn reshape(per_year: Vec<Vec<SchoolRecord>>) -> WideTable {
    pivot::pivot(unpivot(per_year))
}

/// Flatten all years into one stream and emit two [`LongRow`]s per record,
/// one per metric. No cross-year deduplication: a school_id recurring across
/// years is the join key the pivot groups on.
fn unpivot(per_year: Vec<Vec<SchoolRecord>>) -> Vec<LongRow> {
    let mut rows = Vec::new();
    for record in per_year.into_iter().flatten() {
        rows.push(LongRow {
            school_id: record.school_id.clone(),
            school_name: record.school_name.clone(),
            year: record.year,
            metric: Metric::Students,
            value: record.enrollment.map(|v| v as f64),
        });
        rows.push(LongRow {
            school_id: record.school_id,
            school_name: record.school_name,
            year: record.year,
            metric: Metric::Teachers,
            value: record.teachers_fte,
        });
    }
    rows
}
