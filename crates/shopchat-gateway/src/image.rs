use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fs;
use std::path::{Path, PathBuf};

/// Image handed to the `/image` endpoint.
///
/// Remote images travel as `image_url`; local images travel inline as
/// `image_b64` (a `data:` URL or bare base64). Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Url(String),
    Inline(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a supported image file")]
    NotAnImage { path: PathBuf },
}

impl ImageInput {
    /// Classify a string: anything starting with `http` is a remote URL,
    /// everything else is inline data.
    pub fn parse(input: &str) -> Self {
        if input.starts_with("http") {
            ImageInput::Url(input.to_string())
        } else {
            ImageInput::Inline(input.to_string())
        }
    }

    /// Resolve a user argument: URLs and `data:` URLs are taken as-is, any
    /// other value is read as a local image file.
    pub fn resolve(arg: &str) -> Result<Self, ImageError> {
        let arg = arg.trim();
        if arg.starts_with("http") || arg.starts_with("data:") {
            Ok(Self::parse(arg))
        } else {
            Self::from_path(arg)
        }
    }

    /// Read a local image and encode it as a `data:<mime>;base64,` URL.
    ///
    /// The MIME type is guessed from the extension and must be `image/*`.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        let mime = mime_guess::from_path(path)
            .first()
            .filter(|mime| mime.type_() == mime_guess::mime::IMAGE)
            .ok_or_else(|| ImageError::NotAnImage {
                path: path.to_path_buf(),
            })?;
        let bytes = fs::read(path).map_err(|source| ImageError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_bytes(&bytes, mime.essence_str()))
    }

    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        ImageInput::Inline(format!("data:{};base64,{}", mime, STANDARD.encode(bytes)))
    }

    pub fn is_url(&self) -> bool {
        matches!(self, ImageInput::Url(_))
    }

    /// Label for the user's side of the conversation
    pub fn describe(&self, query: &str) -> String {
        match self {
            ImageInput::Url(url) => format!("🖼️ {}: {}", query, url),
            ImageInput::Inline(_) => "🖼️ Uploaded image".to_string(),
        }
    }
}
