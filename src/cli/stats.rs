use std::path::Path;

use colored::Colorize;

use crate::aggregator::{scan_path, ScanObserver};
use crate::classifier::ClassificationTable;
use crate::error::Result;
use crate::fmt::count;
use crate::reports::render;
use crate::settings::load_settings;

/// Progress and warnings on stderr, out of the way of the CSV on stdout.
#[derive(Default)]
struct Console {
    progress_shown: bool,
}

impl ScanObserver for Console {
    fn progress(&mut self, rows: u64) {
        eprint!("{}\r", count(rows));
        self.progress_shown = true;
    }

    fn unparsed_date(&mut self, line: u64, raw: &str) {
        if self.progress_shown {
            eprintln!();
            self.progress_shown = false;
        }
        eprintln!(
            "{} line {line}: error parsing the date: {raw:?}",
            "Warning:".yellow().bold()
        );
    }
}

pub fn run(iucr: &str, crimes: &str) -> Result<()> {
    let settings = load_settings()?;
    let table = ClassificationTable::load(Path::new(iucr), &settings.reference)?;
    if table.is_empty() {
        eprintln!("{} no codes found in {iucr}", "Warning:".yellow().bold());
    }

    let mut console = Console::default();
    let aggregate = scan_path(Path::new(crimes), &table, &settings, &mut console)?;
    if console.progress_shown {
        eprintln!();
    }
    eprintln!("{} crime records processed", count(aggregate.rows));
    if aggregate.skipped > 0 {
        eprintln!(
            "{}",
            format!("{} skipped (unparsable date)", count(aggregate.skipped)).dimmed()
        );
    }

    let report = render(&aggregate);
    report.write_csv(std::io::stdout().lock())?;
    Ok(())
}
