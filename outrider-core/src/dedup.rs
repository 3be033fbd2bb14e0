use crate::record::ProfileRecord;
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::{debug, warn};

pub const LOG_HEADER: &str = "Name,Profile URL";

/// Union of profile URLs from every historical result log. Loading never
/// fails as a whole: unreadable files are skipped with a warning.
#[derive(Debug, Default, Clone)]
pub struct DedupIndex {
    urls: HashSet<String>,
}

impl DedupIndex {
    /// Scan `dir` for result logs whose file name starts with `stem_prefix`
    /// (case-insensitive) and ends with `.csv`, and union their second
    /// columns. Returns the index and the number of matched files.
    pub fn load(dir: &Path, stem_prefix: &str) -> (Self, usize) {
        let mut index = Self::default();
        let prefix_lower = stem_prefix.to_lowercase();

        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("could not read results directory {}: {}", dir.display(), e);
                return (index, 0);
            }
        };

        let mut matched = 0usize;
        for entry in entries.flatten() {
            let file_name = entry.file_name().to_string_lossy().to_lowercase();
            if !file_name.starts_with(&prefix_lower) || !file_name.ends_with(".csv") {
                continue;
            }
            matched += 1;

            let path = entry.path();
            match fs::read_to_string(&path) {
                Ok(content) => {
                    let before = index.urls.len();
                    index.absorb_log(&content);
                    debug!(
                        "loaded {} urls from {}",
                        index.urls.len() - before,
                        path.display()
                    );
                }
                Err(e) => {
                    warn!("skipping unreadable log {}: {}", path.display(), e);
                }
            }
        }

        (index, matched)
    }

    fn absorb_log(&mut self, content: &str) {
        // Header row first, then `"Name","Profile URL"` rows. The URL is
        // sliced off at the LAST `","` so doubled quotes inside the name
        // column cannot shift the split point.
        for line in content.lines().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(delim) = line.rfind("\",\"") else {
                continue;
            };
            let url = line[delim + 2..].trim_matches('"');
            if !url.is_empty() {
                self.urls.insert(url.to_string());
            }
        }
    }

    pub fn contains(&self, profile_url: &str) -> bool {
        self.urls.contains(profile_url)
    }

    pub fn insert(&mut self, profile_url: String) -> bool {
        self.urls.insert(profile_url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

fn csv_row(record: &ProfileRecord) -> String {
    format!(
        "\"{}\",\"{}\"",
        record.name.replace('"', "\"\""),
        record.profile_url
    )
}

/// Append records to a result log. Creates the file (and parent
/// directories) with a header when missing or empty; otherwise the new rows
/// are prefixed with a single newline so they never concatenate onto the
/// last existing row. Existing content is never rewritten.
pub fn append_records(path: &Path, records: &[ProfileRecord]) -> io::Result<usize> {
    if records.is_empty() {
        return Ok(0);
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let has_content = fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false);
    let rows = records.iter().map(csv_row).collect::<Vec<_>>().join("\n");
    let payload = if has_content {
        format!("\n{rows}")
    } else {
        format!("{LOG_HEADER}\n{rows}")
    };

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(payload.as_bytes())?;
    Ok(records.len())
}
