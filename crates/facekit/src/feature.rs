//! Opaque facial feature blobs.

use std::fmt;

use facekit_sys::{FEATURE_VERSION_OFFSET, PACKED_FEATURE_BYTES};

use crate::error::Error;

/// Version of the embedding model that produced a feature, packed into
/// the blob's trailer. Features from different versions never compare.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeatureVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl fmt::Display for FeatureVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// An extracted facial embedding, treated as an opaque fixed-size byte
/// buffer: 512 floats of embedding plus an 8-float trailer carrying the
/// embedding version. Only the version word is ever interpreted here.
#[derive(Clone, PartialEq)]
pub struct FaceFeature {
    data: Vec<u8>,
}

impl FaceFeature {
    /// Size of every feature blob in bytes.
    pub const SIZE: usize = PACKED_FEATURE_BYTES;

    /// Wrap a previously extracted blob (e.g. read back from storage).
    pub fn from_bytes(data: Vec<u8>) -> Result<Self, Error> {
        if data.len() != Self::SIZE {
            return Err(Error::MismatchedFeatureSize);
        }
        Ok(Self { data })
    }

    pub(crate) fn from_native(data: Vec<u8>) -> Self {
        debug_assert_eq!(data.len(), Self::SIZE);
        Self { data }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Native descriptor borrowing this blob. Comparison only copies out
    /// of the buffer, so the const-to-mut cast is sound.
    pub(crate) fn as_native(&self) -> facekit_sys::FaceFeature {
        facekit_sys::FaceFeature {
            feature: self.data.as_ptr() as *mut u8,
            feature_size: self.data.len() as u32,
        }
    }

    /// Embedding version recorded in the blob trailer.
    pub fn version(&self) -> FeatureVersion {
        let v = &self.data[FEATURE_VERSION_OFFSET..FEATURE_VERSION_OFFSET + 3];
        FeatureVersion {
            major: v[0],
            minor: v[1],
            patch: v[2],
        }
    }
}

impl fmt::Debug for FaceFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FaceFeature")
            .field("bytes", &self.data.len())
            .field("version", &self.version())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn blob_with_version(major: u8, minor: u8, patch: u8) -> Vec<u8> {
        let mut data = vec![0u8; FaceFeature::SIZE];
        data[FEATURE_VERSION_OFFSET] = major;
        data[FEATURE_VERSION_OFFSET + 1] = minor;
        data[FEATURE_VERSION_OFFSET + 2] = patch;
        data
    }

    #[test]
    fn test_from_bytes_checks_size() {
        assert!(FaceFeature::from_bytes(vec![0u8; FaceFeature::SIZE]).is_ok());
        assert!(matches!(
            FaceFeature::from_bytes(vec![0u8; FaceFeature::SIZE - 1]),
            Err(Error::MismatchedFeatureSize)
        ));
        assert!(matches!(
            FaceFeature::from_bytes(vec![]),
            Err(Error::MismatchedFeatureSize)
        ));
    }

    #[test]
    fn test_version_read_from_trailer() {
        let feature = FaceFeature::from_bytes(blob_with_version(1, 4, 2)).unwrap();
        assert_eq!(
            feature.version(),
            FeatureVersion {
                major: 1,
                minor: 4,
                patch: 2
            }
        );
        assert_eq!(feature.version().to_string(), "1.4.2");
    }

    #[test]
    fn test_blob_round_trip() {
        let mut data = blob_with_version(2, 0, 0);
        data[0] = 0xAB;
        data[2047] = 0xCD;
        let feature = FaceFeature::from_bytes(data.clone()).unwrap();
        assert_eq!(feature.as_bytes(), &data[..]);
    }
}
