use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::io;

use crate::pixel::PixelFormat;

/// Enum with all possible drawing errors that could occur.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    GeneralError(String),
    IoError(io::Error),
    /// A path operation needed a current point and the path has none.
    NoCurrentPoint,
    /// `close` found no initial point for the current subpath.
    NoInitialPoint,
    /// `fill` was called on a path that does not end in a closed subpath.
    PathNotClosed,
    /// The transformation matrix is not invertible.
    InvalidMatrix,
    /// The operation cannot be carried out for the surface's pixel format.
    UnsupportedSurfaceFormat(PixelFormat),
    /// A text call was made before any font was added to the context.
    #[cfg(feature = "text")]
    NoFontSet,
    #[cfg(feature = "text")]
    FontParseError(ttf_parser::FaceParsingError),
    #[cfg(feature = "png")]
    ImageError(image::ImageError),
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::GeneralError(message) => write!(f, "{message}"),
            Self::IoError(error) => write!(f, "io error: {error}"),
            Self::NoCurrentPoint => write!(f, "path has no current point"),
            Self::NoInitialPoint => write!(f, "subpath has no initial point"),
            Self::PathNotClosed => write!(f, "path is not closed"),
            Self::InvalidMatrix => write!(f, "transformation matrix is not invertible"),
            Self::UnsupportedSurfaceFormat(format) => {
                write!(f, "unsupported surface format {format:?}")
            }
            #[cfg(feature = "text")]
            Self::NoFontSet => write!(f, "no font has been added to the context"),
            #[cfg(feature = "text")]
            Self::FontParseError(error) => write!(f, "font parse error: {error}"),
            #[cfg(feature = "png")]
            Self::ImageError(error) => write!(f, "image error: {error}"),
        }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(error: io::Error) -> Self {
        Self::IoError(error)
    }
}

#[cfg(feature = "text")]
impl From<ttf_parser::FaceParsingError> for ErrorKind {
    fn from(error: ttf_parser::FaceParsingError) -> Self {
        Self::FontParseError(error)
    }
}

#[cfg(feature = "png")]
impl From<image::ImageError> for ErrorKind {
    fn from(error: image::ImageError) -> Self {
        Self::ImageError(error)
    }
}

impl Error for ErrorKind {}
