use crate::domain::bar::{Bar, Segment};

/// Columnar view of one segment: parallel vectors indexed by bar position.
///
/// The indicator battery reads columns, never individual bars, so the segment
/// is transposed once up front. Indices here are segment-relative; the
/// segment's `start_index` maps them back to the source sequence.
#[derive(Debug, Clone)]
pub struct SegmentSeries {
    pub timestamps_ms: Vec<i64>,
    pub close_timestamps_ms: Vec<i64>,

    pub open_prices: Vec<f64>,
    pub high_prices: Vec<f64>,
    pub low_prices: Vec<f64>,
    pub close_prices: Vec<f64>,

    pub volumes: Vec<f64>,
    pub quote_volumes: Vec<f64>,
    pub trade_counts: Vec<u64>,
    pub taker_buy_base_volumes: Vec<f64>,
    pub taker_buy_quote_volumes: Vec<f64>,
}

impl SegmentSeries {
    pub fn from_segment(segment: &Segment) -> Self {
        let len = segment.bars.len();

        let mut ts_vec = Vec::with_capacity(len);
        let mut close_ts_vec = Vec::with_capacity(len);
        let mut open_vec = Vec::with_capacity(len);
        let mut high_vec = Vec::with_capacity(len);
        let mut low_vec = Vec::with_capacity(len);
        let mut close_vec = Vec::with_capacity(len);
        let mut vol_vec = Vec::with_capacity(len);
        let mut quote_vec = Vec::with_capacity(len);
        let mut trades_vec = Vec::with_capacity(len);
        let mut taker_base_vec = Vec::with_capacity(len);
        let mut taker_quote_vec = Vec::with_capacity(len);

        for bar in &segment.bars {
            ts_vec.push(bar.open_time_ms);
            close_ts_vec.push(bar.close_time_ms);
            open_vec.push(bar.open);
            high_vec.push(bar.high);
            low_vec.push(bar.low);
            close_vec.push(bar.close);
            vol_vec.push(bar.volume);
            quote_vec.push(bar.quote_volume);
            trades_vec.push(bar.trade_count);
            taker_base_vec.push(bar.taker_buy_base_volume);
            taker_quote_vec.push(bar.taker_buy_quote_volume);
        }

        Self {
            timestamps_ms: ts_vec,
            close_timestamps_ms: close_ts_vec,
            open_prices: open_vec,
            high_prices: high_vec,
            low_prices: low_vec,
            close_prices: close_vec,
            volumes: vol_vec,
            quote_volumes: quote_vec,
            trade_counts: trades_vec,
            taker_buy_base_volumes: taker_base_vec,
            taker_buy_quote_volumes: taker_quote_vec,
        }
    }

    pub fn len(&self) -> usize {
        self.close_prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.close_prices.is_empty()
    }

    /// Reassemble the bar at `idx` from the columns.
    pub fn bar_at(&self, idx: usize) -> Bar {
        Bar {
            open_time_ms: self.timestamps_ms[idx],
            close_time_ms: self.close_timestamps_ms[idx],
            open: self.open_prices[idx],
            high: self.high_prices[idx],
            low: self.low_prices[idx],
            close: self.close_prices[idx],
            volume: self.volumes[idx],
            quote_volume: self.quote_volumes[idx],
            trade_count: self.trade_counts[idx],
            taker_buy_base_volume: self.taker_buy_base_volumes[idx],
            taker_buy_quote_volume: self.taker_buy_quote_volumes[idx],
        }
    }

    /// The float columns the fill pass patches, in a stable order.
    pub fn float_columns_mut(&mut self) -> [&mut Vec<f64>; 8] {
        [
            &mut self.open_prices,
            &mut self.high_prices,
            &mut self.low_prices,
            &mut self.close_prices,
            &mut self.volumes,
            &mut self.quote_volumes,
            &mut self.taker_buy_base_volumes,
            &mut self.taker_buy_quote_volumes,
        ]
    }
}
