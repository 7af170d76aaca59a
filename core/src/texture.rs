//! Procedural textures.
//!
//! Image-backed textures belong to the external asset-import layer; the
//! renderer itself only evaluates procedural sources.

use crate::base::*;
use crate::geometry::Point2f;
use crate::spectrum::Spectrum;

/// Returns true for the "even" cells of a checkerboard over UV space.
fn checker(uv: &Point2f, resolution: &Point2f) -> bool {
    let u = (uv.x * resolution.x).floor() as i64;
    let v = (uv.y * resolution.y).floor() as i64;
    (u + v) % 2 == 0
}

/// A spectrum-valued texture.
#[derive(Clone, Debug)]
pub enum SpectrumTexture {
    /// The same value everywhere.
    Constant(Spectrum),

    /// A two-color checkerboard.
    Checker {
        a: Spectrum,
        b: Spectrum,
        resolution: Point2f,
    },
}

impl SpectrumTexture {
    /// Evaluates the texture at a surface point's UV coordinates.
    ///
    /// * `uv` - Texture coordinates.
    pub fn evaluate(&self, uv: &Point2f) -> Spectrum {
        match self {
            Self::Constant(c) => *c,
            Self::Checker { a, b, resolution } => {
                if checker(uv, resolution) {
                    *a
                } else {
                    *b
                }
            }
        }
    }
}

/// A scalar-valued texture.
#[derive(Clone, Debug)]
pub enum FloatTexture {
    /// The same value everywhere.
    Constant(Float),

    /// A two-value checkerboard.
    Checker {
        a: Float,
        b: Float,
        resolution: Point2f,
    },
}

impl FloatTexture {
    /// Evaluates the texture at a surface point's UV coordinates.
    ///
    /// * `uv` - Texture coordinates.
    pub fn evaluate(&self, uv: &Point2f) -> Float {
        match self {
            Self::Constant(v) => *v,
            Self::Checker { a, b, resolution } => {
                if checker(uv, resolution) {
                    *a
                } else {
                    *b
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn checker_alternates() {
        let tex = FloatTexture::Checker {
            a: 1.0,
            b: 0.0,
            resolution: Point2f::new(2.0, 2.0),
        };
        assert_eq!(tex.evaluate(&Point2f::new(0.1, 0.1)), 1.0);
        assert_eq!(tex.evaluate(&Point2f::new(0.6, 0.1)), 0.0);
        assert_eq!(tex.evaluate(&Point2f::new(0.6, 0.6)), 1.0);
    }
}
