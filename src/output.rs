//! Output file naming and PNG saving.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use image::{DynamicImage, ImageFormat};

use crate::error::Error;

/// Generate an output filename of the form `<stem>-<unix timestamp>.png`.
#[must_use]
pub fn auto_filename(stem: &str) -> String {
    let sanitized = sanitize_for_filename(stem, 50);
    let timestamp = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
    format!("{sanitized}-{timestamp}.png")
}

/// Sanitize a string for use in a filename.
///
/// Converts to lowercase, replaces non-alphanumeric chars with hyphens,
/// collapses consecutive hyphens, and trims to max length.
#[must_use]
pub fn sanitize_for_filename(input: &str, max_len: usize) -> String {
    let mut result = String::with_capacity(max_len);
    let mut last_was_hyphen = true; // no leading hyphen

    for ch in input.chars() {
        if result.len() >= max_len {
            break;
        }
        if ch.is_ascii_alphanumeric() {
            result.push(ch.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            result.push('-');
            last_was_hyphen = true;
        }
    }

    while result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "image".to_string()
    } else {
        result
    }
}

/// Resolve the output path: use explicit path or auto-generate from `stem`.
#[must_use]
pub fn resolve_output_path(explicit: Option<&Path>, stem: &str) -> PathBuf {
    match explicit {
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(auto_filename(stem)),
    }
}

/// Encode `img` as PNG at `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or encoding fails.
pub fn save_png(img: &DynamicImage, path: &Path) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    img.save_with_format(path, ImageFormat::Png)
        .map_err(|e| Error::Render(format!("Failed to save {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_object_name() {
        assert_eq!(sanitize_for_filename("spiral/spiral_12.png", 50), "spiral-spiral-12-png");
    }

    #[test]
    fn sanitize_truncates() {
        let long = "a".repeat(100);
        assert!(sanitize_for_filename(&long, 10).len() <= 10);
    }

    #[test]
    fn sanitize_empty() {
        assert_eq!(sanitize_for_filename("", 50), "image");
        assert_eq!(sanitize_for_filename("///", 50), "image");
    }

    #[test]
    fn auto_filename_format() {
        let name = auto_filename("spiral");
        assert!(name.starts_with("spiral-"));
        assert_eq!(Path::new(&name).extension().unwrap(), "png");
    }

    #[test]
    fn resolve_explicit() {
        let path = resolve_output_path(Some(Path::new("out/my.png")), "wave");
        assert_eq!(path, PathBuf::from("out/my.png"));
    }

    #[test]
    fn save_png_writes_signature() {
        let dir = std::env::temp_dir().join("tremor_output_save_test");
        let _ = std::fs::remove_dir_all(&dir);
        let path = dir.join("nested").join("tiny.png");

        save_png(&DynamicImage::new_rgba8(2, 2), &path).unwrap();

        let data = std::fs::read(&path).unwrap();
        assert_eq!(&data[..4], &[0x89, 0x50, 0x4E, 0x47]);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
