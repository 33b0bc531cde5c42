//! Collision-resistant storage names for uploaded files.

use chrono::Utc;
use uuid::Uuid;

const MAX_NAME_LEN: usize = 120;

/// Reduce a client-supplied file name to a safe single path component.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename);

    let mut cleaned = String::with_capacity(base.len());
    for c in base.chars() {
        let c = if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
            c
        } else {
            '_'
        };
        // Runs of dots collapse to one.
        if c == '.' && cleaned.ends_with('.') {
            continue;
        }
        cleaned.push(c);
    }
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_' || c == '.') {
        return "file".to_string();
    }

    // Keep the extension when truncating.
    if cleaned.len() > MAX_NAME_LEN {
        let (stem, extension) = split_extension(cleaned);
        let keep = MAX_NAME_LEN.saturating_sub(extension.map_or(0, |e| e.len() + 1));
        let stem: String = stem.chars().take(keep).collect();
        let stem = stem.trim_end_matches('.');
        return match extension {
            Some(extension) => format!("{}.{}", stem, extension),
            None => stem.to_string(),
        };
    }

    cleaned.to_string()
}

/// Split at the last dot. A leading dot does not start an extension.
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(index) if index > 0 => (&name[..index], Some(&name[index + 1..])),
        _ => (name, None),
    }
}

/// `<millis>-<random8>-<sanitized name>`
pub fn storage_name(original: &str) -> String {
    format!("{}-{}", unique_prefix(), sanitize_filename(original))
}

/// `<millis>-<random8>-<sanitized stem>.<extension>`
pub fn storage_name_with_extension(original: &str, extension: &str) -> String {
    let sanitized = sanitize_filename(original);
    let (stem, _) = split_extension(&sanitized);
    format!("{}-{}.{}", unique_prefix(), stem, extension)
}

fn unique_prefix() -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &random[..8])
}
