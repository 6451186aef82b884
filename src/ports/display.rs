//! Display port for decoded images.

use image::DynamicImage;

use crate::error::Error;

/// Shows decoded images to the user, one at a time.
pub trait ImageDisplay {
    /// Display `image`, labelled with the object path it came from.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be presented.
    fn show(&self, name: &str, image: &DynamicImage) -> Result<(), Error>;
}
