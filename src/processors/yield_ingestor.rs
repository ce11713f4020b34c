use crate::db::{insert_crop_yield_if_absent, Database};
use crate::error::Result;
use crate::models::CropYield;
use crate::readers::{list_source_files, YieldReader};
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Totals for one crop-yield ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct YieldIngestReport {
    pub files_found: usize,
    pub records_inserted: u64,
    pub duplicates: u64,
    pub malformed_lines: u64,
}

impl YieldIngestReport {
    pub fn summary(&self) -> String {
        let mut parts = vec![format!("{} new records", self.records_inserted)];
        if self.duplicates > 0 {
            parts.push(format!("{} duplicates (kept first)", self.duplicates));
        }
        if self.malformed_lines > 0 {
            parts.push(format!("{} errors skipped", self.malformed_lines));
        }
        format!("Crop yield data: {}", parts.join(", "))
    }
}

/// Merge per-file entries keeping the first value seen for each year.
///
/// Returns the merged map and how many later entries were discarded.
pub fn merge_first_seen<I>(entries: I) -> (BTreeMap<i32, i64>, u64)
where
    I: IntoIterator<Item = CropYield>,
{
    let mut by_year = BTreeMap::new();
    let mut duplicates = 0;

    for entry in entries {
        if by_year.contains_key(&entry.year) {
            duplicates += 1;
        } else {
            by_year.insert(entry.year, entry.yield_amount);
        }
    }

    (by_year, duplicates)
}

/// Loads `year yield` files, deduplicating years across every file before writing.
pub struct YieldIngestor {
    db: Database,
    reader: YieldReader,
}

impl YieldIngestor {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            reader: YieldReader::new(),
        }
    }

    pub async fn ingest_directory(
        &self,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<YieldIngestReport> {
        let files = list_source_files(dir)?;
        info!(files = files.len(), dir = %dir.display(), "Found crop yield data files");

        if let Some(p) = progress {
            p.set_length(files.len() as u64);
            p.set_message("Reading crop yield files...");
        }

        let mut report = YieldIngestReport {
            files_found: files.len(),
            ..Default::default()
        };
        let mut all_entries = Vec::new();

        for path in &files {
            debug!(file = %path.display(), "Processing crop yield file");
            let parsed = self.reader.read_yields(path)?;

            for bad in &parsed.malformed {
                warn!(
                    file = %path.display(),
                    line = bad.line,
                    reason = %bad.reason,
                    "Error parsing crop yield line: {}",
                    bad.content
                );
            }

            report.malformed_lines += parsed.malformed.len() as u64;
            all_entries.extend(parsed.entries);

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        let (by_year, duplicates) = merge_first_seen(all_entries);
        report.duplicates = duplicates;

        let mut tx = self.db.begin().await?;
        for (year, yield_amount) in by_year {
            if insert_crop_yield_if_absent(&mut tx, &CropYield::new(year, yield_amount)).await? {
                report.records_inserted += 1;
            }
        }
        tx.commit().await?;

        info!(
            inserted = report.records_inserted,
            duplicates = report.duplicates,
            errors = report.malformed_lines,
            "{}",
            report.summary()
        );

        if let Some(p) = progress {
            p.finish_with_message(&report.summary());
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    async fn setup() -> (TempDir, Database) {
        let dir = TempDir::new().unwrap();
        let url = format!("sqlite://{}", dir.path().join("yield.db").display());
        let db = Database::connect(&url).await.unwrap();
        db.migrate().await.unwrap();
        (dir, db)
    }

    #[test]
    fn test_merge_first_seen() {
        let (merged, duplicates) = merge_first_seen(vec![
            CropYield::new(2021, 5),
            CropYield::new(2020, 12345),
            CropYield::new(2020, 99999),
            CropYield::new(2021, 6),
        ]);

        assert_eq!(merged.into_iter().collect::<Vec<_>>(), vec![(2020, 12345), (2021, 5)]);
        assert_eq!(duplicates, 2);
    }

    #[tokio::test]
    async fn test_duplicate_year_across_files_keeps_first() {
        let (tmp, db) = setup().await;
        let yld_dir = tmp.path().join("yld_data");
        std::fs::create_dir_all(&yld_dir).unwrap();
        std::fs::write(yld_dir.join("a.txt"), "2020 12345\n").unwrap();
        std::fs::write(yld_dir.join("b.txt"), "2020 99999\n").unwrap();

        let report = YieldIngestor::new(db.clone())
            .ingest_directory(&yld_dir, None)
            .await
            .unwrap();

        assert_eq!(report.records_inserted, 1);
        assert_eq!(report.duplicates, 1);

        let amount: i64 = sqlx::query_scalar("SELECT yield_amount FROM crop_yields WHERE year = 2020")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(amount, 12345);
    }

    #[tokio::test]
    async fn test_rerun_inserts_nothing_and_errors_are_not_fatal() {
        let (tmp, db) = setup().await;
        let yld_dir = tmp.path().join("yld_data");
        std::fs::create_dir_all(&yld_dir).unwrap();
        std::fs::write(yld_dir.join("yield.txt"), "2020 12345\n2021 23456\ngarbage\n").unwrap();

        let ingestor = YieldIngestor::new(db);
        let first = ingestor.ingest_directory(&yld_dir, None).await.unwrap();
        assert_eq!(first.records_inserted, 2);
        assert_eq!(first.malformed_lines, 1);

        let second = ingestor.ingest_directory(&yld_dir, None).await.unwrap();
        assert_eq!(second.records_inserted, 0);
    }

    #[test]
    fn test_report_summary() {
        let report = YieldIngestReport {
            files_found: 2,
            records_inserted: 30,
            duplicates: 1,
            malformed_lines: 0,
        };
        assert_eq!(
            report.summary(),
            "Crop yield data: 30 new records, 1 duplicates (kept first)"
        );
    }
}
