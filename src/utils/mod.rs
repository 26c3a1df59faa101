pub mod rolling;
pub mod time_utils;

pub use time_utils::{TimeUtils, format_kline_time, parse_kline_time};
