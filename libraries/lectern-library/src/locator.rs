//! Resolve a lecture to something an audio output can open

use lectern_core::Lecture;

/// Default directory (or URL prefix) holding lecture audio
pub const DEFAULT_AUDIO_BASE: &str = "audio";

/// Audio location for `lecture`
///
/// A filename is joined onto `base`. Without one, `audioUrl` is used, with
/// Google Drive share links rewritten to direct-download links. `None` when
/// the lecture has neither.
pub fn audio_locator(base: &str, lecture: &Lecture) -> Option<String> {
    let filename = lecture.filename.trim();
    if !filename.is_empty() {
        let base = base.trim_end_matches('/');
        return Some(if base.is_empty() {
            filename.to_string()
        } else {
            format!("{base}/{filename}")
        });
    }

    let url = lecture.audio_url.as_deref().map(str::trim)?;
    if url.is_empty() {
        return None;
    }
    Some(drive_direct_url(url).unwrap_or_else(|| url.to_string()))
}

/// `.../file/d/<id>/view...` -> `https://drive.google.com/uc?export=view&id=<id>`
pub fn drive_direct_url(url: &str) -> Option<String> {
    if !url.contains("drive.google.com") {
        return None;
    }
    let (_, rest) = url.split_once("/d/")?;
    let (file_id, _) = rest.split_once("/view")?;
    if file_id.is_empty() || file_id.contains('/') {
        return None;
    }
    Some(format!("https://drive.google.com/uc?export=view&id={file_id}"))
}
