// Analyzer module: pure computations over a fetched price series.

pub mod indicators;
pub mod reference;
pub mod change;

pub use change::evaluate;
pub use indicators::{compute_indicators, compute_rsi, compute_sma};
pub use reference::find_closest;
