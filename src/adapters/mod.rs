// Adapters layer: concrete implementations of external capabilities.

pub mod pdf;
