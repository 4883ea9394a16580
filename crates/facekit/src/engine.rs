//! Safe engine handle: loads the library, forwards calls, owns every
//! allocation the engine makes on our behalf.

use std::ffi::CStr;

use facekit_sys as sys;

use crate::config::EngineConfig;
use crate::error::Error;
use crate::feature::FaceFeature;
use crate::image_frame::ImageFrame;
use crate::types::{Face, FaceRect, Point};
use crate::version::VersionInfo;

/// Library name resolved through the system loader when no explicit
/// path is given.
pub const DEFAULT_LIB: &str = "libgawrs_face.so";

/// Feature extraction rejects frames smaller than this on either side.
const MIN_EXTRACT_DIM: u32 = 100;

/// A live engine instance.
///
/// # Lifecycle
///
/// 1. [`init`](Self::init) loads the shared library, resolves its symbols
///    and initializes the engine with an [`EngineConfig`]. Models are
///    loaded here; a config with both support flags off yields an engine
///    that can do nothing but report its version.
/// 2. [`detect`](Self::detect) / [`extract`](Self::extract) /
///    [`compare`](Self::compare) marshal across the boundary.
/// 3. Drop releases the native engine and unloads the library.
///
/// The native engine serializes its own state behind an internal lock,
/// so moving an `Engine` between threads is fine; sharing one requires
/// external synchronization.
pub struct Engine {
    api: sys::Api,
    handle: sys::Handle,
}

unsafe impl Send for Engine {}

impl Engine {
    /// Initialize an engine from `libgawrs_face.so` on the loader path.
    pub fn init(config: &EngineConfig) -> Result<Self, Error> {
        Self::init_with_lib(DEFAULT_LIB, config)
    }

    /// Initialize an engine from an explicit library path.
    pub fn init_with_lib(lib_path: &str, config: &EngineConfig) -> Result<Self, Error> {
        let api = unsafe { sys::Api::load(lib_path) }?;

        let mask = config.combined_mask();
        let mut handle: sys::Handle = std::ptr::null_mut();
        let ret = unsafe {
            (api.init_engine)(
                &mut handle,
                config.detect_face_scale,
                config.detect_face_max_num,
                mask,
                config.prob_threshold,
                config.nms_threshold,
                config.rotation as i32,
            )
        };
        if let Err(err) = Error::check(ret) {
            tracing::error!(lib = lib_path, code = ret, "engine init failed");
            return Err(err);
        }

        tracing::info!(
            lib = lib_path,
            detect = config.support_face_detect,
            recognize = config.support_face_recognition,
            max_faces = config.detect_face_max_num,
            "face engine initialized"
        );
        Ok(Self { api, handle })
    }

    /// Detect faces in a frame. Returns an empty vec when nothing is found.
    pub fn detect(&self, frame: &ImageFrame) -> Result<Vec<Face>, Error> {
        let mut img = frame.as_image_data();
        let mut multi = sys::MultiFaceInfo::zeroed();

        let ret = unsafe { (self.api.detect_faces)(self.handle, &mut img, &mut multi) };
        Error::check(ret)?;

        let count = multi.face_num as usize;
        let mut faces = Vec::with_capacity(count);
        unsafe {
            for i in 0..count {
                let rect = *multi.face_rect.add(i);
                let score = *multi.face_score.add(i);
                let mut landmarks = [Point::default(); sys::LANDMARK_NUM];
                for (j, lm) in landmarks.iter_mut().enumerate() {
                    let p = *multi.face_points.add(i * sys::LANDMARK_NUM + j);
                    *lm = Point { x: p.x, y: p.y };
                }
                faces.push(Face {
                    rect: FaceRect {
                        left: rect.left,
                        top: rect.top,
                        right: rect.right,
                        bottom: rect.bottom,
                    },
                    landmarks,
                    score,
                });
            }
            // Arrays are engine-owned; hand them back now that we copied.
            (self.api.release_multi_face_info)(&mut multi);
        }

        tracing::debug!(
            faces = faces.len(),
            width = frame.width(),
            height = frame.height(),
            "detect completed"
        );
        Ok(faces)
    }

    /// Extract the facial embedding for one detected face.
    pub fn extract(&self, frame: &ImageFrame, face: &Face) -> Result<FaceFeature, Error> {
        if frame.width() < MIN_EXTRACT_DIM || frame.height() < MIN_EXTRACT_DIM {
            return Err(Error::ImageTooSmall);
        }

        let mut img = frame.as_image_data();
        let mut face_info = face.to_face_info();
        let mut raw = sys::FaceFeature::zeroed();

        let ret = unsafe {
            (self.api.extract_face_feature)(self.handle, &mut img, &mut face_info, &mut raw)
        };
        Error::check(ret)?;

        if raw.feature.is_null() || raw.feature_size as usize != FaceFeature::SIZE {
            // Engine produced a blob we don't understand; drop it and bail.
            unsafe { (self.api.release_face_feature)(&mut raw) };
            return Err(Error::MismatchedFeatureSize);
        }

        let data = unsafe {
            let blob = std::slice::from_raw_parts(raw.feature, raw.feature_size as usize).to_vec();
            (self.api.release_face_feature)(&mut raw);
            blob
        };

        let feature = FaceFeature::from_native(data);
        tracing::debug!(version = %feature.version(), "feature extracted");
        Ok(feature)
    }

    /// Compare two embeddings; returns cosine confidence in [-1, 1].
    ///
    /// Both blobs must carry the same embedding version; sizes are
    /// enforced by construction of [`FaceFeature`].
    pub fn compare(&self, a: &FaceFeature, b: &FaceFeature) -> Result<f32, Error> {
        if a.version() != b.version() {
            return Err(Error::MismatchedFeatureLevel);
        }

        let mut raw_a = a.as_native();
        let mut raw_b = b.as_native();
        let mut confidence = 0.0f32;
        let ret = unsafe {
            (self.api.face_feature_compare)(self.handle, &mut raw_a, &mut raw_b, &mut confidence)
        };
        Error::check(ret)?;
        Ok(confidence)
    }

    /// Engine build identification.
    pub fn version(&self) -> VersionInfo {
        // The version globals are static strings inside the library and
        // stay valid while the Api (and its Library) lives.
        let read = |ptr: *const libc::c_char| -> String {
            if ptr.is_null() {
                return String::new();
            }
            unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
        };
        VersionInfo {
            version: read(self.api.core_version),
            build_date: read(self.api.build_date),
            copyright: read(self.api.copyright),
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        unsafe { (self.api.release_engine)(self.handle) };
        tracing::debug!("face engine released");
    }
}
