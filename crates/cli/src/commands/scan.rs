use anyhow::{Context, Result};
use include_trim_core::corpus::SourceCorpus;
use include_trim_core::model::{IncludeDelimiter, IncludeDirective, SourceKind};
use serde::Serialize;
use tracing::warn;

use crate::commands::{resolve_config, ConfigOverrides};
use crate::display_relative;

/// One discovered file and the includes it currently contains.
#[derive(Debug, Serialize)]
pub struct ScannedFile {
    pub path: String,
    pub kind: SourceKind,
    pub includes: Vec<IncludeDirective>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Discover files and extract includes without touching anything.
pub fn scan_tree(overrides: &ConfigOverrides) -> Result<Vec<ScannedFile>> {
    let config = resolve_config(overrides)?;
    let corpus = config.corpus();
    let files = corpus
        .discover(&config.root)
        .with_context(|| format!("Failed to scan {}", config.root.display()))?;

    let mut scanned = Vec::with_capacity(files.len());
    for file in files {
        let path = display_relative(&config.root, &file.path);
        match corpus.extract_includes(&file.path) {
            Ok(includes) => {
                scanned.push(ScannedFile { path, kind: file.kind, includes, error: None })
            }
            Err(err) => {
                warn!(file = %file.path.display(), error = %err, "cannot read includes");
                scanned.push(ScannedFile {
                    path,
                    kind: file.kind,
                    includes: Vec::new(),
                    error: Some(err.to_string()),
                });
            }
        }
    }
    Ok(scanned)
}

/// `scan`: list candidate files and their include directives.
pub fn scan_command(overrides: &ConfigOverrides, json: bool) -> Result<()> {
    let scanned = scan_tree(overrides)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&scanned)?);
        return Ok(());
    }

    if scanned.is_empty() {
        println!("No source files found.");
        return Ok(());
    }

    let total: usize = scanned.iter().map(|f| f.includes.len()).sum();
    for file in &scanned {
        println!("{} ({})", file.path, file.kind.as_str());
        if let Some(error) = &file.error {
            println!("  ! {}", error);
        }
        for include in &file.includes {
            println!("  - {} (line {})", render_include(include), include.line);
        }
    }
    println!();
    println!("{} files, {} include directives", scanned.len(), total);
    Ok(())
}

fn render_include(include: &IncludeDirective) -> String {
    match include.delimiter {
        IncludeDelimiter::Angle => format!("<{}>", include.header),
        IncludeDelimiter::Quote => format!("\"{}\"", include.header),
    }
}
