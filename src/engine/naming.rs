//! Output path derivation for translated files.

use std::path::{Path, PathBuf};

/// Derives where a translated input is written.
///
/// The default inserts the target language code before the extension
/// (`notes.md` → `notes.es.md`). A custom pattern may reference `{name}`,
/// `{lang}` and `{ext}`.
pub fn derive_output_path(
    input: &Path,
    lang: &str,
    output_dir: &Path,
    pattern: Option<&str>,
) -> PathBuf {
    let name = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    let ext = input.extension().and_then(|s| s.to_str());

    let file_name = pattern.map_or_else(
        || {
            ext.map_or_else(
                || format!("{name}.{lang}"),
                |ext| format!("{name}.{lang}.{ext}"),
            )
        },
        |pattern| {
            pattern
                .replace("{name}", name)
                .replace("{lang}", lang)
                .replace("{ext}", ext.unwrap_or_default())
        },
    );

    output_dir.join(file_name)
}
