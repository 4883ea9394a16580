use serde::{Deserialize, Serialize};

/// Face bounding box in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceRect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl FaceRect {
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// One detected face: box, five-point landmarks
/// [left_eye, right_eye, nose, left_mouth, right_mouth], confidence.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Face {
    pub rect: FaceRect,
    pub landmarks: [Point; facekit_sys::LANDMARK_NUM],
    pub score: f32,
}

impl Face {
    /// Native single-face descriptor for feature extraction.
    pub(crate) fn to_face_info(self) -> facekit_sys::FaceInfo {
        facekit_sys::FaceInfo {
            face_rect: facekit_sys::FaceRect {
                left: self.rect.left,
                top: self.rect.top,
                right: self.rect.right,
                bottom: self.rect.bottom,
            },
            landmark: self.landmarks.map(|p| facekit_sys::FacePoint { x: p.x, y: p.y }),
            face_score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_extent() {
        let rect = FaceRect {
            left: 10.0,
            top: 20.0,
            right: 110.0,
            bottom: 170.0,
        };
        assert!((rect.width() - 100.0).abs() < 1e-6);
        assert!((rect.height() - 150.0).abs() < 1e-6);
    }

    #[test]
    fn test_face_info_marshaling() {
        let face = Face {
            rect: FaceRect {
                left: 1.0,
                top: 2.0,
                right: 3.0,
                bottom: 4.0,
            },
            landmarks: [
                Point { x: 0.5, y: 0.5 },
                Point { x: 1.5, y: 0.5 },
                Point { x: 1.0, y: 1.0 },
                Point { x: 0.6, y: 1.6 },
                Point { x: 1.4, y: 1.6 },
            ],
            score: 0.93,
        };
        let raw = face.to_face_info();
        assert_eq!(raw.face_rect.right, 3.0);
        assert_eq!(raw.landmark[2].y, 1.0);
        assert!((raw.face_score - 0.93).abs() < 1e-6);
    }
}
