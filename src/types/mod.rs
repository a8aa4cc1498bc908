pub mod candle;
pub mod signals;
pub mod strategy;
pub mod timeframe;

pub use candle::*;
pub use signals::*;
pub use strategy::*;
pub use timeframe::*;
