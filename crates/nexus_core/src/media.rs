//! Image references for avatars and profile photos.
//!
//! Selected images are embedded as `data:` URLs so exports stay self-contained.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::io;
use std::path::Path;

/// Largest image accepted for embedding.
pub const MAX_IMAGE_BYTES: u64 = 2 * 1024 * 1024;

/// Reads the image at `path` and encodes it as a `data:<mime>;base64,` URL.
///
/// # Errors
/// - The file cannot be read.
/// - The extension is not a known image type.
/// - The file exceeds `MAX_IMAGE_BYTES`.
pub fn image_data_url(path: impl AsRef<Path>) -> io::Result<String> {
    let path = path.as_ref();
    let mime = image_mime_type(path).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("`{}` is not a supported image type", path.display()),
        )
    })?;

    let size = std::fs::metadata(path)?.len();
    if size > MAX_IMAGE_BYTES {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("image is {size} bytes; limit is {MAX_IMAGE_BYTES}"),
        ));
    }

    let bytes = std::fs::read(path)?;
    Ok(format!("data:{mime};base64,{}", STANDARD.encode(bytes)))
}

/// MIME type inferred from the file extension.
pub fn image_mime_type(path: &Path) -> Option<&'static str> {
    let extension = path.extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{image_data_url, image_mime_type};
    use std::path::Path;

    #[test]
    fn mime_type_follows_extension_case_insensitively() {
        assert_eq!(image_mime_type(Path::new("me.JPG")), Some("image/jpeg"));
        assert_eq!(image_mime_type(Path::new("me.png")), Some("image/png"));
        assert_eq!(image_mime_type(Path::new("notes.txt")), None);
        assert_eq!(image_mime_type(Path::new("no_extension")), None);
    }

    #[test]
    fn data_url_embeds_base64_payload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        std::fs::write(&path, b"abc").unwrap();

        assert_eq!(image_data_url(&path).unwrap(), "data:image/png;base64,YWJj");
    }

    #[test]
    fn data_url_rejects_unknown_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.txt");
        std::fs::write(&path, b"abc").unwrap();

        let err = image_data_url(&path).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    }
}
