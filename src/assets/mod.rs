// src/assets/mod.rs

//! Asset pipeline glue.
//!
//! [`compiler`] wraps the external asset-compiler executable: build the
//! argument vector, run it to completion, map the exit code to a result.

pub mod compiler;

pub use compiler::{CompileOutcome, CompileRequest, COMPILE_FAILED_MESSAGE, COMPILE_OK_MESSAGE};
