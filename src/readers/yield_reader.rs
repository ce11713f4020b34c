use crate::error::Result;
use crate::models::CropYield;
use crate::readers::MalformedLine;
use crate::utils::constants::{DEFAULT_BUFFER_SIZE, YIELD_FIELD_COUNT};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Entries of one crop-yield file, in file order.
#[derive(Debug, Default)]
pub struct YieldFile {
    pub entries: Vec<CropYield>,
    pub malformed: Vec<MalformedLine>,
}

/// Reads whitespace-separated `year yield` files.
pub struct YieldReader;

impl YieldReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_yields(&self, path: &Path) -> Result<YieldFile> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut parsed = YieldFile::default();
        let mut buf = Vec::new();
        let mut line_number: u64 = 0;

        while reader.read_until(b'\n', &mut buf)? > 0 {
            line_number += 1;

            let text = match String::from_utf8(std::mem::take(&mut buf)) {
                Ok(text) => text,
                Err(e) => {
                    parsed.malformed.push(MalformedLine {
                        line: line_number,
                        content: String::from_utf8_lossy(e.as_bytes()).trim().to_string(),
                        reason: "line is not valid UTF-8".to_string(),
                    });
                    continue;
                }
            };

            let line = text.trim();
            if line.is_empty() {
                continue;
            }

            match parse_yield_line(line) {
                Ok(entry) => parsed.entries.push(entry),
                Err(reason) => parsed.malformed.push(MalformedLine {
                    line: line_number,
                    content: line.to_string(),
                    reason,
                }),
            }
        }

        Ok(parsed)
    }
}

impl Default for YieldReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `year yield`; anything after the second field is ignored.
pub fn parse_yield_line(line: &str) -> std::result::Result<CropYield, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.len() < YIELD_FIELD_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            YIELD_FIELD_COUNT,
            parts.len()
        ));
    }

    let year = parts[0]
        .parse::<i32>()
        .map_err(|_| format!("invalid year: '{}'", parts[0]))?;
    let amount = parts[1]
        .parse::<i64>()
        .map_err(|_| format!("invalid yield: '{}'", parts[1]))?;

    Ok(CropYield::new(year, amount))
}
