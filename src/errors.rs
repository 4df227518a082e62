use std::error::Error;
use std::fmt;
use std::io;

/// Enumeration of all possible errors produced by the gallery core
#[derive(Debug)]
pub enum GalleryError {
    MalformedSource(SourceError),
    RemoteUnavailable(RemoteError),
    Decode(DecodeError),
    Mp4(Mp4Error),
    Catalog(CatalogError),
    Config(ConfigError),
    Other(io::Error),
}

/// Coarse failure classes callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Unrecognized URL, unreadable or unsupported video file
    MalformedSource,
    /// Network failure or no candidate thumbnail answered successfully
    RemoteUnavailable,
    /// Bytes are not a valid image or frame
    DecodeFailure,
    /// Backing file store could not be read or written
    Storage,
    NotFound,
    InvalidInput,
}

/// The input could not be interpreted as a video source
#[derive(Debug)]
pub struct SourceError {
    pub message: String,
}

impl SourceError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A remote host could not deliver the requested resource
#[derive(Debug)]
pub struct RemoteError {
    pub message: String,
}

impl RemoteError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Image or frame decoding errors
#[derive(Debug)]
pub struct DecodeError {
    pub message: String,
}

impl DecodeError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Catalog errors: missing records and rejected inserts
#[derive(Debug)]
pub enum CatalogError {
    NotFound { entity: &'static str, id: i64 },
    Invalid { message: String },
}

impl CatalogError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        CatalogError::NotFound { entity, id }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        CatalogError::Invalid {
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    /// Create a new error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// MP4 format specific errors
#[derive(Debug)]
pub enum Mp4Error {
    /// A required box is absent
    MissingBox { name: &'static str },
    /// A box is present but its payload is inconsistent
    Malformed { message: String },
}

impl Mp4Error {
    pub fn malformed(message: impl Into<String>) -> Self {
        Mp4Error::Malformed {
            message: message.into(),
        }
    }
}

impl GalleryError {
    /// Map the error onto the failure taxonomy.
    pub fn kind(&self) -> FailureKind {
        match self {
            GalleryError::MalformedSource(_) | GalleryError::Mp4(_) => FailureKind::MalformedSource,
            GalleryError::RemoteUnavailable(_) => FailureKind::RemoteUnavailable,
            GalleryError::Decode(_) => FailureKind::DecodeFailure,
            GalleryError::Catalog(CatalogError::NotFound { .. }) => FailureKind::NotFound,
            GalleryError::Catalog(CatalogError::Invalid { .. }) | GalleryError::Config(_) => {
                FailureKind::InvalidInput
            }
            GalleryError::Other(_) => FailureKind::Storage,
        }
    }
}

impl fmt::Display for GalleryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GalleryError::MalformedSource(err) => write!(f, "Malformed source: {}", err),
            GalleryError::RemoteUnavailable(err) => write!(f, "Remote unavailable: {}", err),
            GalleryError::Decode(err) => write!(f, "Decode error: {}", err),
            GalleryError::Mp4(err) => write!(f, "MP4 error: {}", err),
            GalleryError::Catalog(err) => write!(f, "Catalog error: {}", err),
            GalleryError::Config(err) => write!(f, "Config error: {}", err),
            GalleryError::Other(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::NotFound { entity, id } => write!(f, "{} {} not found", entity, id),
            CatalogError::Invalid { message } => write!(f, "{}", message),
        }
    }
}

impl fmt::Display for Mp4Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mp4Error::MissingBox { name } => write!(f, "{} box not found", name),
            Mp4Error::Malformed { message } => write!(f, "{}", message),
        }
    }
}

impl Error for GalleryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GalleryError::Other(err) => Some(err),
            _ => None,
        }
    }
}
impl Error for SourceError {}
impl Error for RemoteError {}
impl Error for DecodeError {}
impl Error for CatalogError {}
impl Error for ConfigError {}
impl Error for Mp4Error {}

// Conversion implementations
impl From<io::Error> for GalleryError {
    fn from(err: io::Error) -> Self {
        GalleryError::Other(err)
    }
}

impl From<SourceError> for GalleryError {
    fn from(err: SourceError) -> Self {
        GalleryError::MalformedSource(err)
    }
}

impl From<RemoteError> for GalleryError {
    fn from(err: RemoteError) -> Self {
        GalleryError::RemoteUnavailable(err)
    }
}

impl From<DecodeError> for GalleryError {
    fn from(err: DecodeError) -> Self {
        GalleryError::Decode(err)
    }
}

impl From<CatalogError> for GalleryError {
    fn from(err: CatalogError) -> Self {
        GalleryError::Catalog(err)
    }
}

impl From<ConfigError> for GalleryError {
    fn from(err: ConfigError) -> Self {
        GalleryError::Config(err)
    }
}

impl From<Mp4Error> for GalleryError {
    fn from(err: Mp4Error) -> Self {
        GalleryError::Mp4(err)
    }
}

impl From<image::ImageError> for GalleryError {
    fn from(err: image::ImageError) -> Self {
        GalleryError::Decode(DecodeError::new(err.to_string()))
    }
}

impl From<GalleryError> for io::Error {
    fn from(err: GalleryError) -> Self {
        match err {
            GalleryError::Other(inner) => inner,
            other => io::Error::other(other),
        }
    }
}

// Type alias for Result with GalleryError
pub type GalleryResult<T> = Result<T, GalleryError>;
