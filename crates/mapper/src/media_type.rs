//! Media-type derivation from file names.

/// Derive a media type from an optional file name.
///
/// The extension is the substring after the last `.`, case preserved, with
/// the separator stripped. A missing name or a name without an extension
/// degrades to the bare prefix — never an error.
pub fn media_type_for(prefix: &str, file_name: Option<&str>) -> String {
    let extension = file_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext)
        .unwrap_or("");
    format!("{}{}", prefix, extension)
}
