use std::fs;
use std::path::{Path, PathBuf};

use sgp4::Elements;

use crate::predict::error::PredictError;

pub struct TleEntry {
    pub name: String,
    pub norad_id: u64,
    pub source: String,
    pub elements: Elements,
}

/// Element sets read from a TLE file or a directory of them.
pub struct TleLoader {
    path: PathBuf,
    satellites: Vec<TleEntry>,
}

impl TleLoader {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            satellites: Vec::new(),
        }
    }

    pub fn load_all(&mut self) -> Result<(), PredictError> {
        self.satellites.clear();

        if self.path.is_dir() {
            let mut files: Vec<PathBuf> = fs::read_dir(&self.path)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|path| {
                    path.is_file()
                        && path
                            .extension()
                            .is_some_and(|ext| ext == "tle" || ext == "txt")
                })
                .collect();
            files.sort();

            for path in files {
                match parse_tle_file(&path) {
                    Ok(entries) => self.satellites.extend(entries),
                    Err(e) => {
                        log::warn!("Failed to parse TLE file {}: {}", path.display(), e);
                    }
                }
            }
        } else {
            self.satellites = parse_tle_file(&self.path)?;
        }

        log::info!(
            "Loaded {} element sets from {}",
            self.satellites.len(),
            self.path.display()
        );
        Ok(())
    }

    /// First satellite whose name contains `query`, ignoring case.
    pub fn find(&self, query: &str) -> Result<&TleEntry, PredictError> {
        if self.satellites.is_empty() {
            return Err(PredictError::NoSatellites);
        }

        let needle = query.trim().to_lowercase();
        let matches: Vec<&TleEntry> = self
            .satellites
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle) || s.norad_id.to_string() == needle)
            .collect();

        let Some(&first) = matches.first() else {
            return Err(PredictError::SatelliteNotFound(query.to_string()));
        };
        if matches.len() > 1 {
            let others: Vec<&str> = matches
                .iter()
                .skip(1)
                .take(9)
                .map(|s| s.name.as_str())
                .collect();
            log::warn!(
                "{} satellites match '{}', using {} (also: {})",
                matches.len(),
                query,
                first.name,
                others.join(", ")
            );
        }
        Ok(first)
    }
}

fn parse_tle_file(path: &Path) -> Result<Vec<TleEntry>, PredictError> {
    let content = fs::read_to_string(path)?;
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    parse_tle_text(&content, &filename)
}

pub fn parse_tle_text(content: &str, source: &str) -> Result<Vec<TleEntry>, PredictError> {
    let mut results = Vec::new();

    for (name, line1, line2) in parse_multi_tle(content) {
        let elements = Elements::from_tle(name.clone(), line1.as_bytes(), line2.as_bytes())
            .map_err(|e| PredictError::InvalidTle {
                file: source.to_string(),
                message: e.to_string(),
            })?;

        results.push(TleEntry {
            name: name.unwrap_or_else(|| format!("NORAD {}", elements.norad_id)),
            norad_id: elements.norad_id,
            source: source.to_string(),
            elements,
        });
    }

    Ok(results)
}

/// Split text into `(name, line1, line2)` triples. Names are optional.
fn parse_multi_tle(content: &str) -> Vec<(Option<String>, String, String)> {
    let lines: Vec<&str> = content
        .lines()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty())
        .collect();

    let mut result = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        if lines[i].starts_with("1 ") && i + 1 < lines.len() && lines[i + 1].starts_with("2 ") {
            result.push((None, lines[i].to_string(), lines[i + 1].to_string()));
            i += 2;
        } else if i + 2 < lines.len()
            && lines[i + 1].starts_with("1 ")
            && lines[i + 2].starts_with("2 ")
        {
            result.push((
                Some(lines[i].to_string()),
                lines[i + 1].to_string(),
                lines[i + 2].to_string(),
            ));
            i += 3;
        } else {
            i += 1;
        }
    }

    result
}
