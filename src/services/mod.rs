pub mod analyzer;
pub mod cache;
pub mod signals;

pub use analyzer::SignalService;
pub use cache::{CandleCache, CandleKey};
pub use signals::{classify, compute_indicators, ClassifiedFrame, IndicatorFrame};
