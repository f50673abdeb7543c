// crates/cutter-cli/src/cutlist_file.rs
//
// Parses the JSON cut-list file the CLI takes with `-c`. JSON lives only
// here — cutter-core and cutter-engine never depend on serde.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use cutter_core::{Cut, CutList};

#[derive(Debug, Deserialize)]
struct CutListFile {
    cuts: Vec<CutEntry>,
}

#[derive(Debug, Deserialize)]
struct CutEntry {
    start: i64,
    end: i64,
}

pub fn load(path: &Path) -> Result<CutList> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading cut list '{}'", path.display()))?;
    let file: CutListFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing cut list '{}'", path.display()))?;

    let cuts = file.cuts.into_iter().map(|c| Cut::new(c.start, c.end)).collect();
    CutList::new(cuts).with_context(|| format!("validating cut list '{}'", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_a_valid_cut_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"cuts": [{{"start": 0, "end": 100}}, {{"start": 200, "end": 300}}]}}"#).unwrap();
        let list = load(file.path()).unwrap();
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn rejects_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(load(file.path()).is_err());
    }
}
