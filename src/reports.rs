use std::io::Write;

use crate::aggregator::Aggregate;
use crate::error::Result;
use crate::models::{Category, MonthKey};

// ---------------------------------------------------------------------------
// Monthly category counts
// ---------------------------------------------------------------------------

pub struct MonthRow {
    pub month: MonthKey,
    pub counts: [u64; 3],
}

impl MonthRow {
    pub fn count(&self, category: Category) -> u64 {
        self.counts[category.index()]
    }
}

pub struct MonthlyReport {
    pub rows: Vec<MonthRow>,
}

impl MonthlyReport {
    pub fn header() -> Vec<&'static str> {
        let mut header = vec!["Month"];
        header.extend(Category::ALL.iter().map(|c| c.column()));
        header
    }

    /// Header followed by one record per month, all as text.
    pub fn records(&self) -> Vec<Vec<String>> {
        let mut out = Vec::with_capacity(self.rows.len() + 1);
        out.push(Self::header().into_iter().map(String::from).collect());
        for row in &self.rows {
            let mut record = vec![row.month.to_string()];
            record.extend(Category::ALL.iter().map(|c| row.count(*c).to_string()));
            out.push(record);
        }
        out
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in self.records() {
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// One row per observed month in ascending order. Missing cells count as zero.
pub fn render(aggregate: &Aggregate) -> MonthlyReport {
    let rows = aggregate
        .months
        .iter()
        .filter(|month| !month.is_empty())
        .map(|month| MonthRow {
            month: month.clone(),
            counts: Category::ALL.map(|c| aggregate.count(month, c)),
        })
        .collect();

    MonthlyReport { rows }
}
