//! Ready-made grammars built on the engine, used by the integration tests and
//! usable as starting points for real languages.

pub mod json;

#[cfg(test)]
mod __tests__;
