//! nllb-bridge - NLLB translation through a managed Python environment
//!
//! Provisions a virtual environment, installs the packages the translation
//! script needs exactly once, and runs the script as a subprocess for each
//! translation, classifying its output as a result, a notice or an error.

pub mod batch;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod notice;
pub mod packages;
pub mod process;
pub mod translate;
