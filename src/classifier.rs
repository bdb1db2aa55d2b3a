use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::{Result, StatsError};
use crate::models::{Category, CodeKey};
use crate::settings::ReferenceLayout;

/// Immutable IUCR code → category membership lookup.
#[derive(Debug, Default)]
pub struct ClassificationTable {
    entries: HashMap<CodeKey, [bool; 3]>,
}

impl ClassificationTable {
    pub fn load(path: &Path, layout: &ReferenceLayout) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| StatsError::io(path, e))?;
        Self::from_reader(
            std::io::BufReader::new(file),
            layout,
            &path.display().to_string(),
        )
    }

    /// Build from CSV. The first row is a header and is never inspected.
    /// Only the code and indicator columns are read; other columns may hold any bytes.
    pub fn from_reader<R: Read>(reader: R, layout: &ReferenceLayout, source: &str) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);
        let needed = layout.min_width();
        let mut entries = HashMap::new();
        let mut record = csv::ByteRecord::new();

        while rdr.read_byte_record(&mut record)? {
            if record.len() < needed {
                return Err(StatsError::ShortRow {
                    file: source.to_string(),
                    line: record.position().map_or(0, |p| p.line()),
                    needed,
                    found: record.len(),
                });
            }
            let key = CodeKey::normalize(&String::from_utf8_lossy(&record[layout.code]));
            let flags = [
                !record[layout.crime].is_empty(),
                !record[layout.violent].is_empty(),
                !record[layout.murder].is_empty(),
            ];
            entries.insert(key, flags);
        }

        Ok(Self { entries })
    }

    /// Probe with the code exactly as given. Unknown codes are not members.
    pub fn lookup(&self, code: &str, category: Category) -> bool {
        self.entries
            .get(code)
            .is_some_and(|flags| flags[category.index()])
    }

    /// Probe after padding the code the same way the table was built.
    pub fn lookup_normalized(&self, code: &str, category: Category) -> bool {
        self.contains(&CodeKey::normalize(code), category)
    }

    pub fn contains(&self, key: &CodeKey, category: Category) -> bool {
        self.entries
            .get(key)
            .is_some_and(|flags| flags[category.index()])
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "IUCR,PRIMARY DESCRIPTION,SECONDARY DESCRIPTION,INDEX CODE,FA,VW,MURDER\n";

    fn build(rows: &str) -> Result<ClassificationTable> {
        let content = format!("{HEADER}{rows}");
        ClassificationTable::from_reader(content.as_bytes(), &ReferenceLayout::default(), "iucr.csv")
    }

    #[test]
    fn test_membership_follows_non_empty_indicators() {
        let table = build("0110,HOMICIDE,FIRST DEGREE MURDER,I,Y,,Y\n").unwrap();
        assert!(table.lookup("0110", Category::ReportableCrime));
        assert!(!table.lookup("0110", Category::ViolentOrWeapon));
        assert!(table.lookup("0110", Category::Murder));
    }

    #[test]
    fn test_any_non_empty_value_counts() {
        let table = build("0460,BATTERY,SIMPLE,N,N,0,x\n").unwrap();
        for category in Category::ALL {
            assert!(table.lookup("0460", category), "{category:?}");
        }
    }

    #[test]
    fn test_unknown_code_is_not_a_member() {
        let table = build("0110,HOMICIDE,FIRST DEGREE MURDER,I,Y,,Y\n").unwrap();
        for category in Category::ALL {
            assert!(!table.lookup("9999", category));
            assert!(!table.lookup_normalized("9999", category));
        }
    }

    #[test]
    fn test_build_pads_codes() {
        let table = build("5,X,Y,I,Y,Y,\n110,HOMICIDE,FIRST DEGREE MURDER,I,Y,,Y\n").unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.lookup("0005", Category::ViolentOrWeapon));
        assert!(table.contains(&CodeKey::normalize("5"), Category::ViolentOrWeapon));
        assert!(table.lookup("0110", Category::Murder));
    }

    #[test]
    fn test_raw_lookup_does_not_pad() {
        let table = build("0110,HOMICIDE,FIRST DEGREE MURDER,I,Y,,Y\n").unwrap();
        assert!(!table.lookup("110", Category::Murder));
        assert!(table.lookup_normalized("110", Category::Murder));
    }

    #[test]
    fn test_header_is_skipped_unvalidated() {
        let content = "0110,not,a,real,header,at,all\n0110,HOMICIDE,X,I,,,Y\n";
        let table =
            ClassificationTable::from_reader(content.as_bytes(), &ReferenceLayout::default(), "t")
                .unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.lookup("0110", Category::ReportableCrime));
        assert!(table.lookup("0110", Category::Murder));
    }

    #[test]
    fn test_non_utf8_description_is_accepted() {
        let mut content = HEADER.as_bytes().to_vec();
        content.extend_from_slice(b"0110,HOMICIDE,MEURTRE AU PREMIER DEGR\xC9,I,Y,,Y\n");
        let table = ClassificationTable::from_reader(
            content.as_slice(),
            &ReferenceLayout::default(),
            "iucr.csv",
        )
        .unwrap();
        assert!(table.lookup("0110", Category::ReportableCrime));
        assert!(table.lookup("0110", Category::Murder));
    }

    #[test]
    fn test_later_rows_override_earlier() {
        let table = build("0110,A,B,I,Y,,Y\n110,A,B,I,,,\n").unwrap();
        assert_eq!(table.len(), 1);
        assert!(!table.lookup("0110", Category::Murder));
    }

    #[test]
    fn test_header_only_builds_empty_table() {
        let table = build("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_short_row_is_fatal() {
        let content = "a,b,c\n0110,HOMICIDE,X\n";
        let err =
            ClassificationTable::from_reader(content.as_bytes(), &ReferenceLayout::default(), "iucr.csv")
                .unwrap_err();
        match err {
            StatsError::ShortRow { file, line, needed, found } => {
                assert_eq!(file, "iucr.csv");
                assert_eq!(line, 2);
                assert_eq!(needed, 7);
                assert_eq!(found, 3);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unequal_row_width_is_fatal() {
        let err = build("0110,HOMICIDE,X,I,Y,,Y,EXTRA\n").unwrap_err();
        assert!(matches!(err, StatsError::Csv(_)), "got: {err}");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");
        let err = ClassificationTable::load(&path, &ReferenceLayout::default()).unwrap_err();
        assert!(matches!(err, StatsError::Io { .. }));
        assert!(err.to_string().contains("missing.csv"));
    }

    #[test]
    fn test_load_empty_path_fails() {
        let err = ClassificationTable::load(Path::new(""), &ReferenceLayout::default()).unwrap_err();
        assert!(matches!(err, StatsError::Io { .. }));
    }
}
