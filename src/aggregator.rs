use std::collections::{BTreeSet, HashMap};
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;

use crate::classifier::ClassificationTable;
use crate::error::{Result, StatsError};
use crate::models::{Category, MonthKey};
use crate::settings::Settings;

/// Ledger timestamps look like `01/15/2015 08:00:00 PM`.
pub const LEDGER_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

// Every field zero-padded, followed by an upper-case AM or PM.
const LEDGER_DATE_SHAPE: &[u8] = b"00/00/0000 00:00:00 ";

fn has_ledger_shape(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    if bytes.len() != LEDGER_DATE_SHAPE.len() + 2 {
        return false;
    }
    let (stamp, meridiem) = bytes.split_at(LEDGER_DATE_SHAPE.len());
    let stamp_ok = stamp
        .iter()
        .zip(LEDGER_DATE_SHAPE)
        .all(|(b, shape)| if *shape == b'0' { b.is_ascii_digit() } else { b == shape });
    stamp_ok && (meridiem == b"AM" || meridiem == b"PM")
}

pub fn parse_incident_date(raw: &str) -> Option<NaiveDateTime> {
    if !has_ledger_shape(raw) {
        return None;
    }
    NaiveDateTime::parse_from_str(raw, LEDGER_DATE_FORMAT).ok()
}

/// Side-channel notifications during a ledger scan. Nothing here affects the counts.
pub trait ScanObserver {
    fn progress(&mut self, _rows: u64) {}
    fn unparsed_date(&mut self, _line: u64, _raw: &str) {}
}

impl ScanObserver for () {}

/// Finished counts for one ledger.
#[derive(Debug, Default)]
pub struct Aggregate {
    pub counts: HashMap<MonthKey, [u64; 3]>,
    pub months: BTreeSet<MonthKey>,
    /// Data rows read, header excluded.
    pub rows: u64,
    /// Rows dropped because the date did not parse.
    pub skipped: u64,
}

impl Aggregate {
    pub fn count(&self, month: &MonthKey, category: Category) -> u64 {
        self.counts
            .get(month)
            .map_or(0, |cells| cells[category.index()])
    }
}

pub struct Aggregator<'a> {
    table: &'a ClassificationTable,
    settings: &'a Settings,
    aggregate: Aggregate,
}

impl<'a> Aggregator<'a> {
    pub fn new(table: &'a ClassificationTable, settings: &'a Settings) -> Self {
        Self {
            table,
            settings,
            aggregate: Aggregate::default(),
        }
    }

    /// Count one ledger row. Returns false when the date did not parse and the row was skipped.
    pub fn add<O: ScanObserver>(&mut self, line: u64, date: &str, code: &str, observer: &mut O) -> bool {
        self.aggregate.rows += 1;
        if self.aggregate.rows % self.settings.progress_batch.max(1) as u64 == 0 {
            observer.progress(self.aggregate.rows);
        }

        let Some(dt) = parse_incident_date(date) else {
            if self.settings.track_unparsed_months {
                self.aggregate.months.insert(MonthKey::zero_time());
            }
            self.aggregate.skipped += 1;
            observer.unparsed_date(line, date);
            return false;
        };

        let month = MonthKey::from_datetime(&dt);
        for category in Category::ALL {
            let member = if self.settings.normalize_ledger_codes {
                self.table.lookup_normalized(code, category)
            } else {
                self.table.lookup(code, category)
            };
            if member {
                self.aggregate.counts.entry(month.clone()).or_default()[category.index()] += 1;
            }
        }
        self.aggregate.months.insert(month);
        true
    }

    pub fn finish(self) -> Aggregate {
        self.aggregate
    }
}

pub fn scan_path<O: ScanObserver>(
    path: &Path,
    table: &ClassificationTable,
    settings: &Settings,
    observer: &mut O,
) -> Result<Aggregate> {
    let file = std::fs::File::open(path).map_err(|e| StatsError::io(path, e))?;
    scan(
        std::io::BufReader::new(file),
        &path.display().to_string(),
        table,
        settings,
        observer,
    )
}

/// Stream the ledger one record at a time. The header row is skipped without inspection.
/// Only the date and code columns are decoded; bytes elsewhere in a row are never checked.
pub fn scan<R: Read, O: ScanObserver>(
    reader: R,
    source: &str,
    table: &ClassificationTable,
    settings: &Settings,
    observer: &mut O,
) -> Result<Aggregate> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(reader);
    let layout = &settings.ledger;
    let needed = layout.min_width();
    let mut aggregator = Aggregator::new(table, settings);
    let mut record = csv::ByteRecord::new();

    while rdr.read_byte_record(&mut record)? {
        let line = record.position().map_or(0, |p| p.line());
        if record.len() < needed {
            return Err(StatsError::ShortRow {
                file: source.to_string(),
                line,
                needed,
                found: record.len(),
            });
        }
        // Invalid UTF-8 in the date decodes to U+FFFD and fails to parse.
        let date = String::from_utf8_lossy(&record[layout.date]);
        let code = String::from_utf8_lossy(&record[layout.code]);
        aggregator.add(line, &date, &code, observer);
    }

    Ok(aggregator.finish())
}
