//! Common sampling functions.

use crate::base::*;
use crate::geometry::*;

/// Uniformly sample a direction on the unit sphere.
///
/// * `u` - The random sample point.
pub fn uniform_sample_sphere(u: &Point2f) -> Vector3f {
    let z = 1.0 - 2.0 * u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniform sphere sampling (solid angle measure).
pub fn uniform_sphere_pdf() -> Float {
    1.0 / FOUR_PI
}

/// Uniformly sample a direction on a hemisphere around +z.
///
/// * `u` - The random sample point.
pub fn uniform_sample_hemisphere(u: &Point2f) -> Vector3f {
    let z = u[0];
    let r = max(0.0, 1.0 - z * z).sqrt();
    let phi = TWO_PI * u[1];
    Vector3f::new(r * phi.cos(), r * phi.sin(), z)
}

/// Returns the PDF for uniform hemisphere sampling (solid angle measure).
pub fn uniform_hemisphere_pdf() -> Float {
    INV_TWO_PI
}

/// Sample a point on the unit disk using Shirley's concentric mapping,
/// which preserves stratification better than polar mapping.
///
/// * `u` - The random sample point.
pub fn concentric_sample_disk(u: &Point2f) -> Point2f {
    // Map uniform random numbers to [-1, 1]^2.
    let offset = Point2f::new(2.0 * u[0] - 1.0, 2.0 * u[1] - 1.0);

    // Handle degeneracy at the origin.
    if offset.x == 0.0 && offset.y == 0.0 {
        return Point2f::new(0.0, 0.0);
    }

    // Apply concentric mapping from square to disk.
    let (r, theta) = if offset.x.abs() > offset.y.abs() {
        (offset.x, (PI / 4.0) * (offset.y / offset.x))
    } else {
        (offset.y, PI_OVER_TWO - (PI / 4.0) * (offset.x / offset.y))
    };
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// Sample a direction on the hemisphere around +z with a cosine-weighted
/// density by projecting a disk sample upward.
///
/// * `u` - The random sample point.
pub fn cosine_sample_hemisphere(u: &Point2f) -> Vector3f {
    let d = concentric_sample_disk(u);
    let z = max(0.0, 1.0 - d.x * d.x - d.y * d.y).sqrt();
    Vector3f::new(d.x, d.y, z)
}

/// Returns the PDF for cosine-weighted hemisphere sampling.
///
/// * `cos_theta` - Cosine of the sampled direction's polar angle.
pub fn cosine_hemisphere_pdf(cos_theta: Float) -> Float {
    cos_theta * INV_PI
}

/// Uniformly sample barycentric coordinates on a triangle.
///
/// * `u` - The random sample point.
pub fn uniform_sample_triangle(u: &Point2f) -> Point2f {
    let su0 = u[0].sqrt();
    Point2f::new(1.0 - su0, u[1] * su0)
}

/// The power heuristic with exponent 2 for weighting a sample drawn from
/// one of two sampling strategies in multiple importance sampling.
///
/// * `nf`    - Number of samples taken from the f distribution.
/// * `f_pdf` - PDF of the f distribution.
/// * `ng`    - Number of samples taken from the g distribution.
/// * `g_pdf` - PDF of the g distribution.
pub fn power_heuristic(nf: Int, f_pdf: Float, ng: Int, g_pdf: Float) -> Float {
    let f = nf as Float * f_pdf;
    let g = ng as Float * g_pdf;
    if f * f + g * g == 0.0 {
        0.0
    } else {
        (f * f) / (f * f + g * g)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RNG;

    fn samples(n: usize) -> impl Iterator<Item = Point2f> {
        let mut rng = RNG::new(3);
        std::iter::repeat_with(move || Point2f::new(rng.uniform_float(), rng.uniform_float()))
            .take(n)
    }

    #[test]
    fn sphere_samples_are_unit_length() {
        for u in samples(1000) {
            let v = uniform_sample_sphere(&u);
            assert!((v.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn cosine_samples_lie_in_upper_hemisphere() {
        for u in samples(1000) {
            let v = cosine_sample_hemisphere(&u);
            assert!(v.z >= 0.0);
            assert!((v.length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn triangle_samples_are_valid_barycentrics() {
        for u in samples(1000) {
            let b = uniform_sample_triangle(&u);
            assert!(b.x >= 0.0 && b.y >= 0.0 && b.x + b.y <= 1.0 + 1e-6);
        }
    }

    #[test]
    fn power_heuristic_weights_sum_to_one() {
        let w1 = power_heuristic(1, 0.5, 1, 2.0);
        let w2 = power_heuristic(1, 2.0, 1, 0.5);
        assert!((w1 + w2 - 1.0).abs() < 1e-6);
    }

    #[test]
    fn power_heuristic_zero_pdfs() {
        assert_eq!(power_heuristic(1, 0.0, 1, 0.0), 0.0);
    }

    // The cosine-weighted estimator of a constant function over the
    // hemisphere should integrate to pi within Monte Carlo noise.
    #[test]
    fn cosine_sampling_integrates_constant() {
        let n = 100_000;
        let mut sum = 0.0;
        for u in samples(n) {
            let v = cosine_sample_hemisphere(&u);
            let pdf = cosine_hemisphere_pdf(v.z);
            if pdf > 0.0 {
                sum += 1.0 / pdf as f64;
            }
        }
        let estimate = sum / n as f64;
        assert!((estimate - std::f64::consts::PI).abs() < 0.05);
    }
}
