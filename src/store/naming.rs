use chrono::Utc;
use std::path::Path;
use uuid::Uuid;

/// Timestamp layout shared by every generated name
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

fn random_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// `<prefix>_<UTC timestamp>_<8 hex chars>.<ext>`
///
/// The timestamp keeps names sortable; the random suffix keeps two names
/// generated within the same second apart.
pub fn unique_filename(prefix: &str, ext: &str) -> String {
    format!(
        "{}_{}_{}.{}",
        prefix,
        Utc::now().format(TIMESTAMP_FORMAT),
        random_suffix(),
        ext
    )
}

/// Stored name for an uploaded video: `<UTC timestamp>_<8 hex chars>_<name>`.
/// Directory components of `original` are dropped.
pub fn upload_filename(original: &str) -> Option<String> {
    let name = Path::new(original).file_name()?.to_str()?;
    Some(format!(
        "{}_{}_{}",
        Utc::now().format(TIMESTAMP_FORMAT),
        random_suffix(),
        name
    ))
}

/// True when `name` is a single path component that stays inside its store
pub fn is_plain_filename(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
}
