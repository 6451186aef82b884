//! Display adapter that writes images to disk and opens them in the system
//! image viewer.

use std::cell::Cell;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use image::DynamicImage;
use tracing::debug;

use crate::error::Error;
use crate::output::{sanitize_for_filename, save_png};
use crate::ports::display::ImageDisplay;

/// Saves each shown image as `<dir>/<NNNN>-<sanitized name>.png`, where `NNNN`
/// is the 1-based display position.
///
/// Sanitizing folds case and punctuation, so the position keeps two distinct
/// objects from landing in the same file.
pub struct FileDisplay {
    dir: PathBuf,
    open: bool,
    shown: Cell<usize>,
}

impl FileDisplay {
    /// Create a display writing into `dir`. With `open` set, every saved file
    /// is handed to the platform's default viewer, and from the second image
    /// on the user is asked to press Enter first.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, open: bool) -> Self {
        Self { dir: dir.into(), open, shown: Cell::new(0) }
    }

    /// Where the `position`-th image (1-based) named `name` ends up.
    #[must_use]
    pub fn path_for(&self, position: usize, name: &str) -> PathBuf {
        self.dir.join(format!("{position:04}-{}.png", sanitize_for_filename(name, 100)))
    }
}

impl ImageDisplay for FileDisplay {
    fn show(&self, name: &str, image: &DynamicImage) -> Result<(), Error> {
        let position = self.shown.get() + 1;
        let path = self.path_for(position, name);
        save_png(image, &path)?;
        self.shown.set(position);
        eprintln!("Saved: {}", path.display());
        if self.open {
            if position > 1 {
                wait_for_enter(&mut std::io::stdin().lock(), &mut std::io::stderr(), name)?;
            }
            open_in_viewer(&path)?;
        }
        Ok(())
    }
}

/// Prompt on `out` and block until a line (or end of input) arrives on `input`.
///
/// # Errors
///
/// Returns an error if either stream fails.
pub fn wait_for_enter(
    input: &mut impl BufRead,
    out: &mut impl Write,
    next: &str,
) -> Result<(), Error> {
    write!(out, "Press Enter to show {next}...")?;
    out.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Open `path` with the system viewer without waiting for it to close.
///
/// # Errors
///
/// Returns an error if no viewer could be launched.
pub fn open_in_viewer(path: &Path) -> Result<(), Error> {
    debug!(path = %path.display(), "opening in system viewer");
    open::that_detached(path).map_err(Error::Io)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn fresh_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn show_writes_png_named_after_object() {
        let dir = fresh_dir("tremor_file_display_test");
        let display = FileDisplay::new(&dir, false);

        display.show("spiral/a.png", &DynamicImage::new_rgb8(3, 3)).unwrap();

        let path = dir.join("0001-spiral-a-png.png");
        assert_eq!(display.path_for(1, "spiral/a.png"), path);
        let decoded = image::open(&path).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (3, 3));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn names_that_sanitize_alike_get_separate_files() {
        let dir = fresh_dir("tremor_file_display_collide");
        let display = FileDisplay::new(&dir, false);

        display.show("spiral/A.png", &DynamicImage::new_rgb8(2, 2)).unwrap();
        display.show("spiral/a.png", &DynamicImage::new_rgb8(5, 5)).unwrap();
        display.show("spiral_12.png", &DynamicImage::new_rgb8(1, 1)).unwrap();
        display.show("spiral-12.png", &DynamicImage::new_rgb8(1, 1)).unwrap();

        let mut files: Vec<_> = std::fs::read_dir(&dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        files.sort();
        assert_eq!(
            files,
            vec![
                "0001-spiral-a-png.png",
                "0002-spiral-a-png.png",
                "0003-spiral-12-png.png",
                "0004-spiral-12-png.png",
            ]
        );
        assert_eq!(image::open(dir.join("0001-spiral-a-png.png")).unwrap().width(), 2);
        assert_eq!(image::open(dir.join("0002-spiral-a-png.png")).unwrap().width(), 5);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn wait_for_enter_prompts_and_consumes_one_line() {
        let mut input = Cursor::new(b"\nrest\n".to_vec());
        let mut out = Vec::new();

        wait_for_enter(&mut input, &mut out, "spiral/b.png").unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Press Enter to show spiral/b.png...");
        assert_eq!(input.position(), 1);
    }

    #[test]
    fn wait_for_enter_returns_on_closed_input() {
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        wait_for_enter(&mut input, &mut out, "x.png").unwrap();
    }
}
