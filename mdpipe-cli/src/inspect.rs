//! Intermediate tree inspection
//!
//! `mdpipe inspect <input> [target]` runs the configured pipeline up to a
//! point and prints the tree it holds there as JSON. The target is either a
//! tree kind or a stage name:
//!
//! - `mdast`: the markdown tree after the last markdown stage (toc, or parse)
//! - `hast`: the HTML tree after the last HTML stage (format, sanitize or to-html)
//! - a stage name: the tree right after that stage
//!
//! Extra parameter `compact` prints single-line JSON.

use mdpipe::{Pipeline, VFile};
use std::collections::HashMap;

/// Everything `inspect` accepts as a target.
pub const AVAILABLE_TARGETS: &[&str] = &[
    "mdast", "hast", "parse", "toc", "to-html", "sanitize", "format",
];

pub const DEFAULT_TARGET: &str = "mdast";

/// Resolve `target` to the stage whose output should be shown.
fn stage_for_target<'a>(pipeline: &'a Pipeline, target: &'a str) -> Result<&'a str, String> {
    match target {
        "mdast" | "hast" => pipeline
            .stages()
            .iter()
            .rev()
            .find(|stage| stage.output() == target)
            .map(|stage| stage.name())
            .ok_or_else(|| format!("pipeline has no stage producing {target}")),
        name => Ok(name),
    }
}

/// Run `pipeline` over `file` and render the tree selected by `target`.
pub fn execute_inspect(
    pipeline: &Pipeline,
    file: VFile,
    target: &str,
    extra_params: &HashMap<String, String>,
) -> Result<String, String> {
    let stage = stage_for_target(pipeline, target)?;
    let tree = pipeline.run_until(file, stage).map_err(|e| e.to_string())?;

    let compact = extra_params
        .get("compact")
        .map(|value| value == "true")
        .unwrap_or(false);
    let json = if compact {
        serde_json::to_string(&tree)
    } else {
        serde_json::to_string_pretty(&tree)
    };
    json.map(|mut text| {
        text.push('\n');
        text
    })
    .map_err(|e| format!("JSON serialization failed: {e}"))
}
