//! Normalize canonical form JSON files in place: drop unknown records, fill
//! defaults, resolve and de-duplicate ids, and report lint findings.
//!
//! Usage: `cargo run -p fo-core --example normalize_schema -- [--check] <file.json>...`
//! With no paths, every `.json` file under `crates/fo-core/tests/fixtures` is
//! checked. Set `RUST_LOG=warn` to see dropped records.

use fo_core::export::{ExportConfig, export_multipage, normalize_document};
use fo_core::{FormError, MultiPageDocument, lint_multipage, lint_tasks, parse_document};
use std::env;
use std::fs;
use std::path::PathBuf;

fn main() {
    env_logger::init();

    let mut check_only = false;
    let mut paths: Vec<PathBuf> = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--check" {
            check_only = true;
        } else {
            paths.push(PathBuf::from(arg));
        }
    }

    if paths.is_empty() {
        check_only = true;
        if let Ok(entries) = fs::read_dir("crates/fo-core/tests/fixtures") {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|e| e == "json") {
                    paths.push(path);
                }
            }
        }
        paths.sort();
    }

    let config = ExportConfig::default();
    let mut normalized = 0;
    let mut unchanged = 0;
    let mut skipped = 0;

    for path in &paths {
        let input = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("SKIP {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };

        let output = match normalize(&input, &config) {
            Ok((output, findings)) => {
                for (rule, message) in findings {
                    println!("  {} [{rule}] {message}", path.display());
                }
                output
            }
            Err(e) => {
                eprintln!("SKIP {}: {}", path.display(), e);
                skipped += 1;
                continue;
            }
        };

        if output.trim_end() == input.trim_end() {
            unchanged += 1;
        } else if check_only {
            println!("~ {} would change", path.display());
            normalized += 1;
        } else if let Err(e) = fs::write(path, format!("{output}\n")) {
            eprintln!("ERROR writing {}: {}", path.display(), e);
        } else {
            println!("✓ {}", path.display());
            normalized += 1;
        }
    }

    println!("\nNormalized: {normalized}, Unchanged: {unchanged}, Skipped: {skipped}");
}

/// Normalize one document, single- or multi-page, returning lint findings
/// as `(rule, message)` pairs.
fn normalize(input: &str, config: &ExportConfig) -> Result<(String, Vec<(&'static str, String)>), FormError> {
    if input.contains("\"pages\"") {
        let doc = MultiPageDocument::from_json(input)?;
        let findings = lint_multipage(&doc).into_iter().map(|d| (d.rule, d.message)).collect();
        return Ok((export_multipage(&doc, config)?, findings));
    }
    let output = normalize_document(input, config)?;
    let findings = lint_tasks(&parse_document(&output)?)
        .into_iter()
        .map(|d| (d.rule, d.message))
        .collect();
    Ok((output, findings))
}
