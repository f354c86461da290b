//! Table of contents tests through the full pipeline

mod insertion;
