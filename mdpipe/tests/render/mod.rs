//! End-to-end rendering tests
//!
//! Markdown in, formatted HTML out, through the public entry points.

mod basic;
mod determinism;
mod errors;
mod raw_html;
mod sanitize;
