use crate::error::Result;
use crate::models::NewObservation;
use crate::readers::MalformedLine;
use crate::utils::constants::{
    DEFAULT_BUFFER_SIZE, OBSERVATION_FIELD_COUNT, STATION_FILE_DATE_FORMAT,
};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::path::Path;

/// Outcome of reading one non-blank line of a station file.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedLine {
    Observation(NewObservation),
    Malformed(MalformedLine),
}

/// Reads tab-separated station files: `YYYYMMDD  max  min  precip`, all in tenths.
pub struct ObservationReader {
    buffer_size: usize,
}

impl ObservationReader {
    pub fn new() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }

    /// Stream parsed lines from a station file.
    ///
    /// Malformed lines are yielded as [`ParsedLine::Malformed`]; only I/O
    /// failures end the stream with an error.
    pub fn stream(&self, path: &Path) -> Result<ObservationLines> {
        let reader = ReaderBuilder::new()
            .delimiter(b'\t')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .buffer_capacity(self.buffer_size)
            .from_path(path)?;

        Ok(ObservationLines {
            reader,
            record: StringRecord::new(),
        })
    }
}

impl Default for ObservationReader {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a single raw line, splitting on tabs.
pub fn parse_observation_line(line: &str) -> std::result::Result<NewObservation, String> {
    let fields: Vec<&str> = line.trim().split('\t').map(str::trim).collect();
    parse_observation_fields(&fields)
}

/// Parse the leading four fields of a station line; extra fields are ignored.
pub fn parse_observation_fields(fields: &[&str]) -> std::result::Result<NewObservation, String> {
    if fields.len() < OBSERVATION_FIELD_COUNT {
        return Err(format!(
            "expected {} fields, found {}",
            OBSERVATION_FIELD_COUNT,
            fields.len()
        ));
    }

    let date = NaiveDate::parse_from_str(fields[0], STATION_FILE_DATE_FORMAT)
        .map_err(|_| format!("invalid date: '{}'", fields[0]))?;

    let max_temp = parse_tenths(fields[1], "max temperature")?;
    let min_temp = parse_tenths(fields[2], "min temperature")?;
    let precip = parse_tenths(fields[3], "precipitation")?;

    Ok(NewObservation::new(date, max_temp, min_temp, precip))
}

fn parse_tenths(field: &str, name: &str) -> std::result::Result<i32, String> {
    field
        .parse::<i32>()
        .map_err(|_| format!("invalid {}: '{}'", name, field))
}

/// Iterator over the lines of one station file.
pub struct ObservationLines {
    reader: csv::Reader<File>,
    record: StringRecord,
}

impl Iterator for ObservationLines {
    type Item = Result<ParsedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(false) => return None, // EOF
                Ok(true) => {
                    // Whitespace-only lines trim down to empty fields
                    if self.record.iter().all(str::is_empty) {
                        continue;
                    }

                    let line = self.record.position().map_or(0, |p| p.line());
                    let fields: Vec<&str> = self.record.iter().collect();

                    let parsed = match parse_observation_fields(&fields) {
                        Ok(obs) => ParsedLine::Observation(obs),
                        Err(reason) => ParsedLine::Malformed(MalformedLine {
                            line,
                            content: fields.join("\t"),
                            reason,
                        }),
                    };
                    return Some(Ok(parsed));
                }
                Err(e) => {
                    if let csv::ErrorKind::Utf8 { pos, .. } = e.kind() {
                        return Some(Ok(ParsedLine::Malformed(MalformedLine {
                            line: pos.as_ref().map_or(0, |p| p.line()),
                            content: String::new(),
                            reason: "line is not valid UTF-8".to_string(),
                        })));
                    }
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
