use thiserror::Error;

/// Errors surfaced by the binding: native engine status codes plus the
/// failures that can only happen on this side of the boundary (library
/// loading, symbol resolution).
///
/// The numeric codes match the engine's error table and round-trip
/// through [`Error::from_code`] / [`Error::code`].
#[derive(Error, Debug)]
pub enum Error {
    #[error("unknown engine error")]
    Unknown,
    #[error("invalid parameter")]
    InvalidParam,
    #[error("engine initialization failed")]
    EngineInitFail,
    #[error("detector initialization failed")]
    DetectorInitFail,
    #[error("recognizer initialization failed")]
    RecognizerInitFail,
    #[error("unsupported engine property")]
    UnsupportedProperty,
    #[error("engine not initialized")]
    EngineNotInit,
    #[error("detector not initialized (engine built without face detection)")]
    DetectorNotInit,
    #[error("recognizer not initialized (engine built without face recognition)")]
    RecognizerNotInit,
    #[error("invalid image buffer")]
    InvalidImage,
    #[error("image too large")]
    ImageTooLarge,
    #[error("image too small")]
    ImageTooSmall,
    #[error("feature vectors come from different embedding versions")]
    MismatchedFeatureLevel,
    #[error("feature vector has wrong size")]
    MismatchedFeatureSize,
    #[error("engine returned unrecognized status {0}")]
    Native(i32),
    #[error("failed to load engine library: {0}")]
    Library(#[from] libloading::Error),
}

const GFE_OK: i32 = 0;
const GFE_UNKNOWN: i32 = 1;
const GFE_INVALID_PARAM: i32 = 2;
const GFE_ENGINE_INIT_FAIL: i32 = 8193;
const GFE_DETECTOR_INIT_FAIL: i32 = 8194;
const GFE_RECOGNIZER_INIT_FAIL: i32 = 8195;
const GFE_UNSUPPORTED_PROPERTY: i32 = 8196;
const GFE_ENGINE_NOT_INIT: i32 = 8197;
const GFE_DETECTOR_NOT_INIT: i32 = 8198;
const GFE_RECOGNIZER_NOT_INIT: i32 = 8199;
const GFE_INVALID_IMAGE: i32 = 8200;
const GFE_IMAGE_TOO_LARGE: i32 = 8201;
const GFE_IMAGE_TOO_SMALL: i32 = 8202;
const GFE_MISMATCHFEATURE_LEVEL: i32 = 8203;
const GFE_MISMATCHFEATURE_SIZE: i32 = 8204;

impl Error {
    /// Map a native status code to an error. `Ok(())` for status 0.
    pub fn check(code: i32) -> Result<(), Error> {
        if code == GFE_OK {
            Ok(())
        } else {
            Err(Error::from_code(code))
        }
    }

    /// Build an error from a nonzero native status code.
    pub fn from_code(code: i32) -> Error {
        match code {
            GFE_UNKNOWN => Error::Unknown,
            GFE_INVALID_PARAM => Error::InvalidParam,
            GFE_ENGINE_INIT_FAIL => Error::EngineInitFail,
            GFE_DETECTOR_INIT_FAIL => Error::DetectorInitFail,
            GFE_RECOGNIZER_INIT_FAIL => Error::RecognizerInitFail,
            GFE_UNSUPPORTED_PROPERTY => Error::UnsupportedProperty,
            GFE_ENGINE_NOT_INIT => Error::EngineNotInit,
            GFE_DETECTOR_NOT_INIT => Error::DetectorNotInit,
            GFE_RECOGNIZER_NOT_INIT => Error::RecognizerNotInit,
            GFE_INVALID_IMAGE => Error::InvalidImage,
            GFE_IMAGE_TOO_LARGE => Error::ImageTooLarge,
            GFE_IMAGE_TOO_SMALL => Error::ImageTooSmall,
            GFE_MISMATCHFEATURE_LEVEL => Error::MismatchedFeatureLevel,
            GFE_MISMATCHFEATURE_SIZE => Error::MismatchedFeatureSize,
            other => Error::Native(other),
        }
    }

    /// The native status code for this error, when one exists.
    /// Library-loading failures have no engine-side code.
    pub fn code(&self) -> Option<i32> {
        let code = match self {
            Error::Unknown => GFE_UNKNOWN,
            Error::InvalidParam => GFE_INVALID_PARAM,
            Error::EngineInitFail => GFE_ENGINE_INIT_FAIL,
            Error::DetectorInitFail => GFE_DETECTOR_INIT_FAIL,
            Error::RecognizerInitFail => GFE_RECOGNIZER_INIT_FAIL,
            Error::UnsupportedProperty => GFE_UNSUPPORTED_PROPERTY,
            Error::EngineNotInit => GFE_ENGINE_NOT_INIT,
            Error::DetectorNotInit => GFE_DETECTOR_NOT_INIT,
            Error::RecognizerNotInit => GFE_RECOGNIZER_NOT_INIT,
            Error::InvalidImage => GFE_INVALID_IMAGE,
            Error::ImageTooLarge => GFE_IMAGE_TOO_LARGE,
            Error::ImageTooSmall => GFE_IMAGE_TOO_SMALL,
            Error::MismatchedFeatureLevel => GFE_MISMATCHFEATURE_LEVEL,
            Error::MismatchedFeatureSize => GFE_MISMATCHFEATURE_SIZE,
            Error::Native(code) => *code,
            Error::Library(_) => return None,
        };
        Some(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_ok() {
        assert!(Error::check(0).is_ok());
    }

    #[test]
    fn test_known_codes_round_trip() {
        for code in [1, 2, 8193, 8197, 8200, 8202, 8203, 8204] {
            let err = Error::from_code(code);
            assert_eq!(err.code(), Some(code), "code {code}");
        }
    }

    #[test]
    fn test_unrecognized_code_preserved() {
        let err = Error::from_code(9999);
        assert!(matches!(err, Error::Native(9999)));
        assert_eq!(err.code(), Some(9999));
    }

    #[test]
    fn test_mismatch_variants_distinct() {
        assert!(matches!(Error::from_code(8203), Error::MismatchedFeatureLevel));
        assert!(matches!(Error::from_code(8204), Error::MismatchedFeatureSize));
    }
}
