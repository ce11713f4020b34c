use crate::db::{insert_observations, insert_station, Database};
use crate::error::Result;
use crate::models::{NewObservation, Station};
use crate::readers::{list_source_files, station_code_from_path, ObservationReader, ParsedLine};
use crate::utils::constants::DEFAULT_OBSERVATION_BATCH_SIZE;
use crate::utils::progress::ProgressReporter;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};
use validator::Validate;

/// Totals for one weather ingestion run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeatherIngestReport {
    pub files_found: usize,
    pub stations_ingested: usize,
    pub stations_skipped: usize,
    pub files_rejected: usize,
    pub records_inserted: u64,
    pub malformed_lines: u64,
}

impl WeatherIngestReport {
    pub fn summary(&self) -> String {
        format!(
            "Weather files: {} ({} ingested, {} already present, {} rejected)\nRecords inserted: {}\nMalformed lines skipped: {}",
            self.files_found,
            self.stations_ingested,
            self.stations_skipped,
            self.files_rejected,
            self.records_inserted,
            self.malformed_lines
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct StationFileTotals {
    inserted: u64,
    malformed: u64,
}

/// Loads per-station observation files, one station per file.
///
/// A station that already exists is never re-read, so re-running over the
/// same directory inserts nothing.
pub struct WeatherIngestor {
    db: Database,
    batch_size: usize,
    reader: ObservationReader,
}

impl WeatherIngestor {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            batch_size: DEFAULT_OBSERVATION_BATCH_SIZE,
            reader: ObservationReader::new(),
        }
    }

    /// Rows per committed transaction.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub async fn ingest_directory(
        &self,
        dir: &Path,
        progress: Option<&ProgressReporter>,
    ) -> Result<WeatherIngestReport> {
        let files = list_source_files(dir)?;
        let total = files.len();
        info!(files = total, dir = %dir.display(), "Found weather station files");

        if let Some(p) = progress {
            p.set_length(total as u64);
            p.set_message("Ingesting weather stations...");
        }

        let mut report = WeatherIngestReport {
            files_found: total,
            ..Default::default()
        };

        for (index, path) in files.iter().enumerate() {
            let station_code = station_code_from_path(path)?;
            let candidate = Station::candidate(&station_code);

            if let Err(e) = candidate.validate() {
                warn!(
                    file = %path.display(),
                    error = %e,
                    "[{}/{}] Skipping {} - invalid station code",
                    index + 1,
                    total,
                    station_code
                );
                report.files_rejected += 1;
            } else if self.db.find_station(&station_code).await?.is_some() {
                debug!(
                    "[{}/{}] Skipping {} - already in database",
                    index + 1,
                    total,
                    station_code
                );
                report.stations_skipped += 1;
            } else {
                let totals = self.ingest_station_file(path, &candidate).await?;
                report.stations_ingested += 1;
                report.records_inserted += totals.inserted;
                report.malformed_lines += totals.malformed;

                if totals.malformed > 0 {
                    info!(
                        station = %station_code,
                        records = totals.inserted,
                        errors = totals.malformed,
                        "[{}/{}] Station ingested ({} errors skipped)",
                        index + 1,
                        total,
                        totals.malformed
                    );
                } else {
                    info!(
                        station = %station_code,
                        records = totals.inserted,
                        "[{}/{}] Station ingested",
                        index + 1,
                        total
                    );
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        if let Some(p) = progress {
            p.finish_with_message(&format!("Inserted {} weather records", report.records_inserted));
        }

        Ok(report)
    }

    /// Create the station and load its file, committing every `batch_size` rows.
    ///
    /// On error the open transaction is dropped, rolling back only the batch
    /// in flight; earlier batches stay committed.
    async fn ingest_station_file(&self, path: &Path, candidate: &Station) -> Result<StationFileTotals> {
        let station_code = candidate.station_code.as_str();
        let mut tx = self.db.begin().await?;
        let station = insert_station(&mut tx, candidate).await?;

        let mut totals = StationFileTotals::default();
        let mut batch: Vec<NewObservation> = Vec::with_capacity(self.batch_size.min(16_384));

        for parsed in self.reader.stream(path)? {
            match parsed? {
                ParsedLine::Observation(observation) => {
                    batch.push(observation);

                    if batch.len() >= self.batch_size {
                        totals.inserted += insert_observations(&mut tx, station.id, &batch).await?;
                        batch.clear();
                        tx.commit().await?;
                        debug!(
                            station = %station_code,
                            records = totals.inserted,
                            "Batch commit"
                        );
                        tx = self.db.begin().await?;
                    }
                }
                ParsedLine::Malformed(bad) => {
                    totals.malformed += 1;
                    warn!(
                        station = %station_code,
                        line = bad.line,
                        reason = %bad.reason,
                        "Error parsing line: {}",
                        bad.content
                    );
                }
            }
        }

        if !batch.is_empty() {
            totals.inserted += insert_observations(&mut tx, station.id, &batch).await?;
        }
        tx.commit().await?;

        Ok(totals)
    }
}
