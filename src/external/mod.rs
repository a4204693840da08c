pub mod binance;
pub mod candle_source;
