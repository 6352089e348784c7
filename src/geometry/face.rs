//! Box face identification and tangent frames.

use glam::Vec3;

/// Identifies one face of an axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BoxFace {
    /// +X face (right)
    PosX = 0,
    /// -X face (left)
    NegX = 1,
    /// +Y face (top)
    PosY = 2,
    /// -Y face (bottom)
    NegY = 3,
    /// +Z face (front)
    PosZ = 4,
    /// -Z face (back)
    NegZ = 5,
}

/// Outward normal and in-plane axes of a face, with `u.cross(v) == normal`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceFrame {
    pub normal: Vec3,
    pub u: Vec3,
    pub v: Vec3,
}

impl BoxFace {
    /// Returns all six faces in order.
    pub const fn all() -> [BoxFace; 6] {
        [
            BoxFace::PosX,
            BoxFace::NegX,
            BoxFace::PosY,
            BoxFace::NegY,
            BoxFace::PosZ,
            BoxFace::NegZ,
        ]
    }

    /// Returns the right-handed frame of this face.
    pub const fn frame(self) -> FaceFrame {
        let (normal, u, v) = match self {
            BoxFace::PosX => (Vec3::X, Vec3::NEG_Z, Vec3::Y),
            BoxFace::NegX => (Vec3::NEG_X, Vec3::Z, Vec3::Y),
            BoxFace::PosY => (Vec3::Y, Vec3::X, Vec3::NEG_Z),
            BoxFace::NegY => (Vec3::NEG_Y, Vec3::X, Vec3::Z),
            BoxFace::PosZ => (Vec3::Z, Vec3::X, Vec3::Y),
            BoxFace::NegZ => (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
        };
        FaceFrame { normal, u, v }
    }

    /// Maps face coordinates `s`, `t` in [-1, 1] to a point on the surface of
    /// the cube spanning [-1, 1] on every axis.
    pub fn cube_point(self, s: f32, t: f32) -> Vec3 {
        let frame = self.frame();
        frame.normal + frame.u * s + frame.v * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frames_are_right_handed() {
        for face in BoxFace::all() {
            let f = face.frame();
            assert_eq!(f.u.cross(f.v), f.normal, "{:?}", face);
            assert_eq!(f.u.dot(f.normal), 0.0);
            assert_eq!(f.v.dot(f.normal), 0.0);
        }
    }

    #[test]
    fn test_face_centers_on_axes() {
        for face in BoxFace::all() {
            assert_eq!(face.cube_point(0.0, 0.0), face.frame().normal);
        }
    }

    #[test]
    fn test_corners_lie_on_cube() {
        for face in BoxFace::all() {
            for (s, t) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let p = face.cube_point(s, t);
                assert_eq!(p.abs(), Vec3::ONE, "{:?} corner {:?}", face, p);
            }
        }
    }
}
