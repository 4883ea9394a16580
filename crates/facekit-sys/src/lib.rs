//! facekit-sys — raw FFI surface of the gawrs_face native engine.
//!
//! Declares the C structs and symbols exported by `libgawrs_face.so` and
//! resolves them at runtime. No validation or marshaling policy lives here;
//! users interact with the safe `facekit` crate.

use std::ffi::c_void;

use libc::c_char;

/// Opaque engine handle produced by `initEngine`.
pub type Handle = *mut c_void;

/// Five-point landmark set: left eye, right eye, nose, mouth corners.
pub const LANDMARK_NUM: usize = 5;

// Runtime model bitmask for initEngine's combinedMask argument.
pub const RUNTIME_FACE_DETECTION: i32 = 0b0000_0001;
pub const RUNTIME_FACE_RECOGNITION: i32 = 0b0000_0010;

// Packed feature geometry: 512-float embedding plus an 8-float trailer
// whose first word is the embedding version.
pub const FEATURE_LEN: usize = 512;
pub const PACKED_FEATURE_LEN: usize = FEATURE_LEN + 8;
pub const PACKED_FEATURE_BYTES: usize = PACKED_FEATURE_LEN * 4;
pub const FEATURE_VERSION_OFFSET: usize = FEATURE_LEN * 4;

/// Borrowed image buffer passed into the engine. The engine never frees
/// `data`; the caller keeps ownership.
#[repr(C)]
pub struct ImageData {
    pub format: u32,
    pub width: i32,
    pub height: i32,
    pub data: *mut u8,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FaceRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FacePoint {
    pub x: f32,
    pub y: f32,
}

/// Single-face input for feature extraction.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default)]
pub struct FaceInfo {
    pub face_rect: FaceRect,
    pub landmark: [FacePoint; LANDMARK_NUM],
    pub face_score: f32,
}

/// Detection output. All three arrays are allocated by the engine
/// (`face_points` holds `LANDMARK_NUM` entries per face) and must be
/// released with [`FnReleaseMultiFaceInfo`] once copied out.
#[repr(C)]
pub struct MultiFaceInfo {
    pub face_rect: *mut FaceRect,
    pub face_points: *mut FacePoint,
    pub face_score: *mut f32,
    pub face_num: u32,
}

impl MultiFaceInfo {
    pub fn zeroed() -> Self {
        Self {
            face_rect: std::ptr::null_mut(),
            face_points: std::ptr::null_mut(),
            face_score: std::ptr::null_mut(),
            face_num: 0,
        }
    }
}

/// Feature blob. On extraction the engine allocates `feature`
/// (`PACKED_FEATURE_BYTES` bytes); release with [`FnReleaseFaceFeature`].
/// For comparison the caller points `feature` at its own buffer.
#[repr(C)]
pub struct FaceFeature {
    pub feature: *mut u8,
    pub feature_size: u32,
}

impl FaceFeature {
    pub fn zeroed() -> Self {
        Self {
            feature: std::ptr::null_mut(),
            feature_size: 0,
        }
    }
}

// Function signatures exported by libgawrs_face.so.
pub type FnInitEngine = unsafe extern "C" fn(
    handle: *mut Handle,
    detect_face_scale: i32,
    detect_face_max_num: i32,
    combined_mask: i32,
    prob_threshold: f32,
    nms_threshold: f32,
    rotation: i32,
) -> i32;

pub type FnDetectFaces =
    unsafe extern "C" fn(Handle, *mut ImageData, *mut MultiFaceInfo) -> i32;

pub type FnExtractFaceFeature =
    unsafe extern "C" fn(Handle, *mut ImageData, *mut FaceInfo, *mut FaceFeature) -> i32;

pub type FnFaceFeatureCompare =
    unsafe extern "C" fn(Handle, *mut FaceFeature, *mut FaceFeature, *mut f32) -> i32;

pub type FnReleaseEngine = unsafe extern "C" fn(Handle);

pub type FnReleaseMultiFaceInfo = unsafe extern "C" fn(*mut MultiFaceInfo);

pub type FnReleaseFaceFeature = unsafe extern "C" fn(*mut FaceFeature);

/// Function pointers and version globals resolved from the shared library.
///
/// Resolution happens once in [`Api::load`]; the `_lib` field keeps the
/// dynamically loaded library alive for as long as the pointers are used.
pub struct Api {
    pub init_engine: FnInitEngine,
    pub detect_faces: FnDetectFaces,
    pub extract_face_feature: FnExtractFaceFeature,
    pub face_feature_compare: FnFaceFeatureCompare,
    pub release_engine: FnReleaseEngine,
    pub release_multi_face_info: FnReleaseMultiFaceInfo,
    pub release_face_feature: FnReleaseFaceFeature,
    pub core_version: *const c_char,
    pub build_date: *const c_char,
    pub copyright: *const c_char,
    _lib: libloading::Library,
}

impl Api {
    /// Load the engine library and resolve every exported symbol.
    ///
    /// # Safety
    ///
    /// `lib_path` must name a genuine gawrs_face engine build; resolving
    /// symbols with these signatures from an unrelated library is undefined
    /// behavior on first call.
    pub unsafe fn load(lib_path: &str) -> Result<Self, libloading::Error> {
        let lib = libloading::Library::new(lib_path)?;

        let api = Self {
            init_engine: *lib.get::<FnInitEngine>(b"initEngine")?,
            detect_faces: *lib.get::<FnDetectFaces>(b"detectFaces")?,
            extract_face_feature: *lib.get::<FnExtractFaceFeature>(b"extractFaceFeature")?,
            face_feature_compare: *lib.get::<FnFaceFeatureCompare>(b"faceFeatureCompare")?,
            release_engine: *lib.get::<FnReleaseEngine>(b"releaseEngine")?,
            release_multi_face_info: *lib
                .get::<FnReleaseMultiFaceInfo>(b"gc_LP_SDKMultiFaceInfo")?,
            release_face_feature: *lib.get::<FnReleaseFaceFeature>(b"gc_LP_SDKFaceFeature")?,
            // Data symbols resolve to the variable's address; read the
            // stored string pointer through it.
            core_version: **lib.get::<*mut *const c_char>(b"coreVersion")?,
            build_date: **lib.get::<*mut *const c_char>(b"buildDate")?,
            copyright: **lib.get::<*mut *const c_char>(b"copyRight")?,
            _lib: lib,
        };

        Ok(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::size_of;

    // Layouts must match sdk_types.h exactly; the engine writes through
    // these pointers.

    #[test]
    fn test_scalar_struct_sizes() {
        assert_eq!(size_of::<FaceRect>(), 16);
        assert_eq!(size_of::<FacePoint>(), 8);
        // rect (16) + 5 points (40) + score (4)
        assert_eq!(size_of::<FaceInfo>(), 60);
    }

    #[test]
    fn test_pointer_struct_sizes() {
        let ptr = size_of::<*mut u8>();
        // format + width + height (+ pad) + data
        assert_eq!(size_of::<ImageData>(), 2 * ptr + 8);
        // three pointers + u32 (+ pad)
        assert_eq!(size_of::<MultiFaceInfo>(), 4 * ptr);
        // pointer + u32 (+ pad)
        assert_eq!(size_of::<FaceFeature>(), 2 * ptr);
    }

    #[test]
    fn test_packed_feature_geometry() {
        assert_eq!(PACKED_FEATURE_BYTES, 2080);
        assert_eq!(FEATURE_VERSION_OFFSET, 2048);
    }

    #[test]
    fn test_runtime_mask_bits_disjoint() {
        assert_eq!(RUNTIME_FACE_DETECTION & RUNTIME_FACE_RECOGNITION, 0);
    }

    #[test]
    fn test_zeroed_out_params() {
        let multi = MultiFaceInfo::zeroed();
        assert!(multi.face_rect.is_null());
        assert_eq!(multi.face_num, 0);

        let feature = FaceFeature::zeroed();
        assert!(feature.feature.is_null());
        assert_eq!(feature.feature_size, 0);
    }
}
