//! Filename resolution: URL name → allowed extension → first free name in the target directory.
//!
//! The existence probe and the later write are separate steps, so two writers sharing a
//! directory could pick the same name. Callers must either run single-writer or create the
//! file exclusively and re-resolve on conflict (see `Filesystem::write_new`).

mod split;

use std::time::{SystemTime, UNIX_EPOCH};

use crate::media;
use crate::url_model::filename_from_url_path;

pub use split::split_extension;

/// Prefix for names synthesized when the URL carries no usable filename.
pub const SYNTHETIC_PREFIX: &str = "ubuntu_image_";

/// Longest filename accepted by common Linux filesystems, in bytes.
pub const NAME_MAX: usize = 255;

/// Resolves a collision-free filename for `url`, using the wall clock for synthesized names.
///
/// `exists_on_disk` is asked about bare filenames (no directory component).
pub fn resolve<F>(url: &str, content_type: &str, exists_on_disk: F) -> String
where
    F: Fn(&str) -> bool,
{
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    resolve_at(url, content_type, exists_on_disk, now)
}

/// Like [`resolve`] with an explicit unix timestamp for the synthesized name.
pub fn resolve_at<F>(url: &str, content_type: &str, exists_on_disk: F, unix_secs: u64) -> String
where
    F: Fn(&str) -> bool,
{
    let candidate = candidate_name(url, content_type, unix_secs);
    let resolved = first_free(&candidate, exists_on_disk);
    if resolved != candidate {
        tracing::debug!(%candidate, %resolved, "filename taken, renamed");
    }
    resolved
}

/// Steps 1–3: URL name, synthesized fallback, extension allow-list.
pub fn candidate_name(url: &str, content_type: &str, unix_secs: u64) -> String {
    let from_url = filename_from_url_path(url).filter(|n| split_extension(n).1.is_some());

    let name = match from_url {
        Some(n) => n,
        None => format!(
            "{}{}{}",
            SYNTHETIC_PREFIX,
            unix_secs,
            media::extension_or_fallback(content_type)
        ),
    };

    match split_extension(&name) {
        (stem, Some(ext)) if media::is_allowed_extension(ext) => fit(stem, "", ext),
        (stem, _) => fit(stem, "", media::extension_or_fallback(content_type)),
    }
}

/// Joins `stem + suffix + ext`, cutting the stem (on a char boundary) so the whole name
/// stays within [`NAME_MAX`] bytes. The suffix and extension are never cut.
fn fit(stem: &str, suffix: &str, ext: &str) -> String {
    let room = NAME_MAX.saturating_sub(suffix.len() + ext.len());
    let mut take = stem.len().min(room);
    while !stem.is_char_boundary(take) {
        take -= 1;
    }
    format!("{}{}{}", &stem[..take], suffix, ext)
}

/// Step 4: `photo.jpg`, `photo_1.jpg`, `photo_2.jpg`, … until `exists_on_disk` says no.
fn first_free<F>(candidate: &str, exists_on_disk: F) -> String
where
    F: Fn(&str) -> bool,
{
    if !exists_on_disk(candidate) {
        return candidate.to_string();
    }
    let (stem, ext) = split_extension(candidate);
    let ext = ext.unwrap_or("");
    let mut counter = 1u64;
    loop {
        let next = fit(stem, &format!("_{}", counter), ext);
        if !exists_on_disk(&next) {
            return next;
        }
        counter += 1;
    }
}
