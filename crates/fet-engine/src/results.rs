// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Tally Results
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Per-moment tally results.
//!
//! Two sources are understood:
//! - the engine's text report `tallies.out`, one block per tally:
//!   ```text
//!   ============================>     TALLY 1     <============================
//!
//!    Legendre expansion, z axis, P0
//!      Total Material
//!        Flux                                 36.4348       +/- 0.0812
//!   ```
//! - a CSV export with columns `spatiallegendre,nuclide,score,mean,std. dev.`.

use fet_types::error::{FetError, FetResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Nuclide label used for the material total.
pub const TOTAL_NUCLIDE: &str = "total";

/// One (order, nuclide, score) bin of an expansion tally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MomentRecord {
    pub order: usize,
    pub nuclide: String,
    pub score: String,
    pub mean: f64,
    pub std_dev: f64,
}

impl MomentRecord {
    /// σ/|mean|; infinite for a zero mean with non-zero σ.
    pub fn relative_error(&self) -> f64 {
        if self.mean == 0.0 {
            if self.std_dev == 0.0 {
                0.0
            } else {
                f64::INFINITY
            }
        } else {
            self.std_dev / self.mean.abs()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultTable {
    pub tally_id: u32,
    pub records: Vec<MomentRecord>,
}

impl ResultTable {
    pub fn new(tally_id: u32) -> Self {
        ResultTable {
            tally_id,
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct scores in first-seen order.
    pub fn scores(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.score.as_str()) {
                out.push(&r.score);
            }
        }
        out
    }

    /// Distinct nuclides in first-seen order.
    pub fn nuclides(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for r in &self.records {
            if !out.contains(&r.nuclide.as_str()) {
                out.push(&r.nuclide);
            }
        }
        out
    }

    /// Highest order present, if any.
    pub fn max_order(&self) -> Option<usize> {
        self.records.iter().map(|r| r.order).max()
    }

    /// Records of one (score, nuclide) pair, sorted by order.
    ///
    /// Orders must run 0, 1, .., N without gaps or duplicates.
    pub fn select(&self, score: &str, nuclide: &str) -> FetResult<Vec<&MomentRecord>> {
        let mut rows: Vec<&MomentRecord> = self
            .records
            .iter()
            .filter(|r| {
                r.score.eq_ignore_ascii_case(score) && r.nuclide.eq_ignore_ascii_case(nuclide)
            })
            .collect();
        if rows.is_empty() {
            return Err(FetError::MissingMoments(format!(
                "tally {} has no '{score}' rows for nuclide '{nuclide}'",
                self.tally_id
            )));
        }
        rows.sort_by_key(|r| r.order);
        for (expected, r) in rows.iter().enumerate() {
            if r.order != expected {
                return Err(FetError::MissingMoments(format!(
                    "tally {} '{score}'/'{nuclide}': expected P{expected}, found P{}",
                    self.tally_id, r.order
                )));
            }
        }
        Ok(rows)
    }

    /// Means m_0..m_N.
    pub fn moments(&self, score: &str, nuclide: &str) -> FetResult<Vec<f64>> {
        Ok(self.select(score, nuclide)?.iter().map(|r| r.mean).collect())
    }

    pub fn std_devs(&self, score: &str, nuclide: &str) -> FetResult<Vec<f64>> {
        Ok(self.select(score, nuclide)?.iter().map(|r| r.std_dev).collect())
    }

    pub fn relative_errors(&self, score: &str, nuclide: &str) -> FetResult<Vec<f64>> {
        Ok(self
            .select(score, nuclide)?
            .iter()
            .map(|r| r.relative_error())
            .collect())
    }
}

/// Parse tally `tally_id` out of a `tallies.out` report.
pub fn parse_tally_output(text: &str, tally_id: u32) -> FetResult<ResultTable> {
    let mut table = ResultTable::new(tally_id);
    let mut found = false;
    let mut in_target = false;
    let mut order: Option<usize> = None;
    let mut nuclide = TOTAL_NUCLIDE.to_string();

    for (idx, raw) in text.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(id) = tally_header(line, line_no)? {
            in_target = id == tally_id;
            found |= in_target;
            order = None;
            nuclide = TOTAL_NUCLIDE.to_string();
            continue;
        }
        if !in_target {
            continue;
        }

        if line.to_ascii_lowercase().contains("expansion") {
            order = Some(expansion_order(line, line_no)?);
            nuclide = TOTAL_NUCLIDE.to_string();
        } else if line.contains("+/-") {
            let n = order.ok_or_else(|| FetError::ResultParse {
                line: line_no,
                message: "score line before any expansion bin".to_string(),
            })?;
            let (score, mean, std_dev) = score_line(line, line_no)?;
            table.records.push(MomentRecord {
                order: n,
                nuclide: nuclide.clone(),
                score,
                mean,
                std_dev,
            });
        } else if order.is_some() {
            nuclide = if line.eq_ignore_ascii_case("Total Material") {
                TOTAL_NUCLIDE.to_string()
            } else {
                line.to_string()
            };
        }
    }

    if !found {
        return Err(FetError::MissingMoments(format!(
            "tally {tally_id} not present in report"
        )));
    }
    if table.is_empty() {
        return Err(FetError::MissingMoments(format!(
            "tally {tally_id} has no expansion bins"
        )));
    }
    log::debug!(
        "Parsed {} records for tally {} (max order {:?})",
        table.len(),
        tally_id,
        table.max_order()
    );
    Ok(table)
}

pub fn read_tally_output(path: impl AsRef<Path>, tally_id: u32) -> FetResult<ResultTable> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    log::info!("Reading tally {} from {}", tally_id, path.display());
    parse_tally_output(&text, tally_id)
}

/// `TALLY <id>` header line, if this is one.
fn tally_header(line: &str, line_no: usize) -> FetResult<Option<u32>> {
    if !line.contains("TALLY") || !line.contains('=') {
        return Ok(None);
    }
    let mut tokens = line.split_whitespace().skip_while(|t| *t != "TALLY");
    tokens.next();
    let token = tokens.next().ok_or_else(|| FetError::ResultParse {
        line: line_no,
        message: "TALLY header without an id".to_string(),
    })?;
    token
        .trim_end_matches(':')
        .parse::<u32>()
        .map(Some)
        .map_err(|_| FetError::ResultParse {
            line: line_no,
            message: format!("bad tally id '{token}'"),
        })
}

/// Order from the trailing `P<n>` of an expansion bin line.
fn expansion_order(line: &str, line_no: usize) -> FetResult<usize> {
    line.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
        .last()
        .and_then(parse_order_label)
        .ok_or_else(|| FetError::ResultParse {
            line: line_no,
            message: format!("expansion bin without a P<n> label: '{line}'"),
        })
}

/// `P3` → 3.
pub fn parse_order_label(label: &str) -> Option<usize> {
    label
        .trim()
        .strip_prefix(|c: char| c.eq_ignore_ascii_case(&'p'))
        .and_then(|n| n.parse().ok())
}

/// `<Score>  <mean> +/- <std>` → (lowercased score, mean, std).
fn score_line(line: &str, line_no: usize) -> FetResult<(String, f64, f64)> {
    let bad = |message: String| FetError::ResultParse {
        line: line_no,
        message,
    };
    let (left, right) = line
        .split_once("+/-")
        .ok_or_else(|| bad("missing '+/-'".to_string()))?;
    let left = left.trim_end();
    let (score, mean) = left
        .rsplit_once(char::is_whitespace)
        .ok_or_else(|| bad(format!("score line without a name: '{line}'")))?;
    let mean: f64 = mean
        .parse()
        .map_err(|_| bad(format!("bad mean '{mean}'")))?;
    let std_tok = right.trim();
    let std_dev: f64 = std_tok
        .parse()
        .map_err(|_| bad(format!("bad standard deviation '{std_tok}'")))?;
    let score = score.trim();
    if score.is_empty() {
        return Err(bad(format!("score line without a name: '{line}'")));
    }
    Ok((score.to_lowercase(), mean, std_dev))
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "spatiallegendre")]
    order: String,
    nuclide: String,
    score: String,
    mean: f64,
    #[serde(rename = "std. dev.")]
    std_dev: f64,
}

/// Read a tabular export (`spatiallegendre,nuclide,score,mean,std. dev.`).
///
/// Extra columns such as a leading index are ignored.
pub fn read_csv(path: impl AsRef<Path>, tally_id: u32) -> FetResult<ResultTable> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut table = ResultTable::new(tally_id);
    for (idx, row) in reader.deserialize::<CsvRow>().enumerate() {
        let row = row?;
        // header is line 1
        let line = idx + 2;
        let order = parse_order_label(&row.order).ok_or_else(|| FetError::ResultParse {
            line,
            message: format!("bad expansion label '{}'", row.order),
        })?;
        table.records.push(MomentRecord {
            order,
            nuclide: row.nuclide,
            score: row.score.to_lowercase(),
            mean: row.mean,
            std_dev: row.std_dev,
        });
    }
    if table.is_empty() {
        return Err(FetError::MissingMoments(format!(
            "no rows in {}",
            path.display()
        )));
    }
    log::info!("Read {} records from {}", table.len(), path.display());
    Ok(table)
}

pub fn write_csv(path: impl AsRef<Path>, table: &ResultTable) -> FetResult<()> {
    let mut writer = csv::Writer::from_path(path.as_ref())?;
    for r in &table.records {
        writer.serialize(CsvRow {
            order: format!("P{}", r.order),
            nuclide: r.nuclide.clone(),
            score: r.score.clone(),
            mean: r.mean,
            std_dev: r.std_dev,
        })?;
    }
    writer.flush()?;
    Ok(())
}
