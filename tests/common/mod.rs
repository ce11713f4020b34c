//! Shared fixtures: a throwaway SQLite store and source-file writers.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use weather_store::db::Database;

/// Temporary workspace holding a migrated database and the source directories.
pub struct TestStore {
    pub dir: TempDir,
    pub db: Database,
}

impl TestStore {
    pub async fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let url = format!("sqlite://{}", dir.path().join("weather.db").display());
        let db = Database::connect(&url).await.expect("connect");
        db.migrate().await.expect("migrate");
        Self { dir, db }
    }

    pub fn wx_dir(&self) -> PathBuf {
        self.dir.path().join("wx_data")
    }

    pub fn yld_dir(&self) -> PathBuf {
        self.dir.path().join("yld_data")
    }

    /// Write a station file from (YYYYMMDD, max, min, precip) rows.
    pub fn write_station(&self, code: &str, rows: &[(&str, i32, i32, i32)]) -> PathBuf {
        let body: String = rows
            .iter()
            .map(|(date, max, min, precip)| format!("{}\t{}\t{}\t{}\n", date, max, min, precip))
            .collect();
        write_file(&self.wx_dir(), &format!("{}.txt", code), &body)
    }

    pub fn write_raw_station(&self, code: &str, body: &str) -> PathBuf {
        write_file(&self.wx_dir(), &format!("{}.txt", code), body)
    }

    pub fn write_yields(&self, name: &str, body: &str) -> PathBuf {
        write_file(&self.yld_dir(), name, body)
    }
}

fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("create source dir");
    let path = dir.join(name);
    std::fs::write(&path, body).expect("write source file");
    path
}

/// The three-day station from the documented aggregation example.
pub fn test001_rows() -> Vec<(&'static str, i32, i32, i32)> {
    vec![
        ("20200101", 250, 50, 100),
        ("20200102", 300, 100, 200),
        ("20200103", -9999, -9999, -9999),
    ]
}
