//! Export adapter: shapes segment + indicator data into the serializable
//! records the downstream training tooling consumes, and writes the JSON
//! artifacts (one file per segment plus a combined file).

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tabled::{Table, Tabled};

/// One exported dataset row: the source bar plus every indicator column.
///
/// Field names are the dataset schema consumed by the training side; they
/// stay fixed even when indicator windows are overridden.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub open_time: String,
    pub open_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub close_price: f64,
    pub volume: f64,
    pub close_time: String,
    pub quote_asset_volume: f64,
    pub number_of_trades: u64,
    pub taker_buy_base_asset_volume: f64,
    pub taker_buy_quote_asset_volume: f64,

    #[serde(rename = "MA7")]
    pub ma7: f64,
    #[serde(rename = "MA25")]
    pub ma25: f64,
    #[serde(rename = "MA99")]
    pub ma99: f64,
    #[serde(rename = "ATR50")]
    pub atr50: f64,
    #[serde(rename = "MA50")]
    pub ma50: f64,
    #[serde(rename = "Keltner_Upper")]
    pub keltner_upper: f64,
    #[serde(rename = "Keltner_Lower")]
    pub keltner_lower: f64,
    #[serde(rename = "RSI")]
    pub rsi: f64,
    #[serde(rename = "MACD")]
    pub macd: f64,
    #[serde(rename = "MACD_Signal")]
    pub macd_signal: f64,
    #[serde(rename = "MACD_Hist")]
    pub macd_hist: f64,
    #[serde(rename = "Bollinger_High")]
    pub bollinger_high: f64,
    #[serde(rename = "Bollinger_Low")]
    pub bollinger_low: f64,
    #[serde(rename = "Bollinger_Middle")]
    pub bollinger_middle: f64,
    #[serde(rename = "Stochastic_%K")]
    pub stochastic_k: f64,
    #[serde(rename = "Stochastic_%D")]
    pub stochastic_d: f64,
    #[serde(rename = "ADX")]
    pub adx: f64,
    #[serde(rename = "ADX_PDI")]
    pub adx_pdi: f64,
    #[serde(rename = "ADX_MDI")]
    pub adx_mdi: f64,
    #[serde(rename = "Williams_%R")]
    pub williams_r: f64,
    #[serde(rename = "CMF")]
    pub cmf: f64,
    #[serde(rename = "MFI")]
    pub mfi: f64,
    #[serde(rename = "EMA12")]
    pub ema12: f64,
    #[serde(rename = "EMA26")]
    pub ema26: f64,
}

/// One accepted segment's worth of dataset rows. `start_time` is the first
/// emitted row's open time and `end_time` the last row's close time, both
/// post-trim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentArtifact {
    pub segment_id: usize,
    pub start_time: String,
    pub end_time: String,
    pub records: Vec<IndicatorRow>,
}

/// Why a segment produced no artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscardedSegment {
    pub segment_id: usize,
    pub bar_count: usize,
    pub reason: String,
}

/// End-of-run summary: what was accepted, what was dropped and why, and the
/// record counts before and after warm-up trimming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub accepted_segments: usize,
    pub discarded_segments: Vec<DiscardedSegment>,
    pub records_before_trim: usize,
    pub records_after_trim: usize,
}

#[derive(Tabled)]
struct ManifestRow {
    #[tabled(rename = "Segment")]
    segment: String,
    #[tabled(rename = "Bars")]
    bars: usize,
    #[tabled(rename = "Status")]
    status: String,
}

impl RunManifest {
    /// Render the manifest as a table for the CLI, one row per segment
    /// outcome plus a totals line.
    pub fn render_table(&self, artifacts: &[SegmentArtifact]) -> String {
        let mut rows: Vec<ManifestRow> = artifacts
            .iter()
            .map(|a| ManifestRow {
                segment: a.segment_id.to_string(),
                bars: a.records.len(),
                status: format!("accepted ({} rows)", a.records.len()),
            })
            .collect();
        for d in &self.discarded_segments {
            rows.push(ManifestRow {
                segment: d.segment_id.to_string(),
                bars: d.bar_count,
                status: format!("discarded: {}", d.reason),
            });
        }
        rows.sort_by(|a, b| {
            let pa: usize = a.segment.parse().unwrap_or(0);
            let pb: usize = b.segment.parse().unwrap_or(0);
            pa.cmp(&pb)
        });

        let table = Table::new(rows).to_string();
        format!(
            "{}\nAccepted: {}  Discarded: {}  Records: {} -> {}",
            table,
            self.accepted_segments,
            self.discarded_segments.len(),
            self.records_before_trim,
            self.records_after_trim
        )
    }
}

/// Write one `segment_<id>.json` file per artifact into `output_dir`.
pub fn write_segment_files(artifacts: &[SegmentArtifact], output_dir: &Path) -> Result<()> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir {}", output_dir.display()))?;

    for artifact in artifacts {
        let path = output_dir.join(format!("segment_{}.json", artifact.segment_id));
        let json = serde_json::to_string_pretty(&artifact.records)?;
        fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!(
            "Segment {} saved to '{}'. Records: {}",
            artifact.segment_id,
            path.display(),
            artifact.records.len()
        );
    }
    Ok(())
}

/// Write the combined artifact: the ordered list of all per-segment artifacts.
pub fn write_combined_file(artifacts: &[SegmentArtifact], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(artifacts)?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
    log::info!(
        "Combined output with {} segments saved to '{}'",
        artifacts.len(),
        path.display()
    );
    Ok(())
}
