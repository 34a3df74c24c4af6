pub mod cloudrun;
pub mod runtime;
