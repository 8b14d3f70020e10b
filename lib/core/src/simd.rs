// SIMD kernels for cosine scoring
// Dispatch follows the usual hierarchy: AVX2/FMA on x86_64, NEON on aarch64,
// and an unrolled scalar loop everywhere else.
//
// Cosine needs three reductions over the same pair of slices (a·b, a·a, b·b).
// They are fused into a single pass so each embedding is streamed once.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

// Below this length the setup cost of the wide path outweighs the gain
#[cfg(target_arch = "x86_64")]
const MIN_DIM_SIZE_AVX: usize = 32;

#[cfg(target_arch = "aarch64")]
const MIN_DIM_SIZE_NEON: usize = 16;

/// Partial sums needed for cosine similarity: `(a·b, |a|², |b|²)`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CosineParts {
    pub dot: f32,
    pub norm_sq_a: f32,
    pub norm_sq_b: f32,
}

impl CosineParts {
    /// Cosine of the angle, or `0.0` when either side has zero length
    #[inline]
    pub fn cosine(&self) -> f32 {
        let denom = self.norm_sq_a.sqrt() * self.norm_sq_b.sqrt();
        if denom == 0.0 {
            return 0.0;
        }
        self.dot / denom
    }
}

/// Fused dot product and squared norms of two equal-length slices
///
/// Callers must check lengths first; extra elements of the longer slice are ignored.
#[inline]
pub fn cosine_parts_simd(a: &[f32], b: &[f32]) -> CosineParts {
    let len = a.len().min(b.len());
    let (a, b) = (&a[..len], &b[..len]);

    #[cfg(target_arch = "x86_64")]
    {
        if is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
            && len >= MIN_DIM_SIZE_AVX
        {
            return unsafe { cosine_parts_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if std::arch::is_aarch64_feature_detected!("neon") && len >= MIN_DIM_SIZE_NEON {
            return unsafe { cosine_parts_neon(a, b) };
        }
    }

    cosine_parts_scalar(a, b)
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn hsum256(v: __m256) -> f32 {
    let high = _mm256_extractf128_ps(v, 1);
    let low = _mm256_castps256_ps128(v);
    let mut sum = _mm_add_ps(high, low);
    sum = _mm_hadd_ps(sum, sum);
    sum = _mm_hadd_ps(sum, sum);
    _mm_cvtss_f32(sum)
}

/// 8 lanes per step, three FMA accumulators
#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
#[inline]
unsafe fn cosine_parts_avx2(a: &[f32], b: &[f32]) -> CosineParts {
    let dim = a.len();
    let mut i = 0;

    let mut dot = _mm256_setzero_ps();
    let mut aa = _mm256_setzero_ps();
    let mut bb = _mm256_setzero_ps();

    while i + 7 < dim {
        let va = _mm256_loadu_ps(a.as_ptr().add(i));
        let vb = _mm256_loadu_ps(b.as_ptr().add(i));
        dot = _mm256_fmadd_ps(va, vb, dot);
        aa = _mm256_fmadd_ps(va, va, aa);
        bb = _mm256_fmadd_ps(vb, vb, bb);
        i += 8;
    }

    let mut parts = CosineParts {
        dot: hsum256(dot),
        norm_sq_a: hsum256(aa),
        norm_sq_b: hsum256(bb),
    };

    while i < dim {
        parts.dot += a[i] * b[i];
        parts.norm_sq_a += a[i] * a[i];
        parts.norm_sq_b += b[i] * b[i];
        i += 1;
    }

    parts
}

/// 4 lanes per step for ARM/Apple Silicon
#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
#[inline]
unsafe fn cosine_parts_neon(a: &[f32], b: &[f32]) -> CosineParts {
    let dim = a.len();
    let mut i = 0;

    let mut dot = vdupq_n_f32(0.0);
    let mut aa = vdupq_n_f32(0.0);
    let mut bb = vdupq_n_f32(0.0);

    while i + 3 < dim {
        let va = vld1q_f32(a.as_ptr().add(i));
        let vb = vld1q_f32(b.as_ptr().add(i));
        dot = vfmaq_f32(dot, va, vb);
        aa = vfmaq_f32(aa, va, va);
        bb = vfmaq_f32(bb, vb, vb);
        i += 4;
    }

    let mut parts = CosineParts {
        dot: vaddvq_f32(dot),
        norm_sq_a: vaddvq_f32(aa),
        norm_sq_b: vaddvq_f32(bb),
    };

    while i < dim {
        parts.dot += a[i] * b[i];
        parts.norm_sq_a += a[i] * a[i];
        parts.norm_sq_b += b[i] * b[i];
        i += 1;
    }

    parts
}

/// Scalar fallback, unrolled by 4
#[inline]
fn cosine_parts_scalar(a: &[f32], b: &[f32]) -> CosineParts {
    let mut parts = CosineParts::default();

    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let tail = a_chunks.remainder().len();

    for (x, y) in a_chunks.zip(b_chunks) {
        parts.dot += x[0] * y[0] + x[1] * y[1] + x[2] * y[2] + x[3] * y[3];
        parts.norm_sq_a += x[0] * x[0] + x[1] * x[1] + x[2] * x[2] + x[3] * x[3];
        parts.norm_sq_b += y[0] * y[0] + y[1] * y[1] + y[2] * y[2] + y[3] * y[3];
    }

    for i in (a.len() - tail)..a.len() {
        parts.dot += a[i] * b[i];
        parts.norm_sq_a += a[i] * a[i];
        parts.norm_sq_b += b[i] * b[i];
    }

    parts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(a: &[f32], b: &[f32]) -> (f32, f32, f32) {
        let dot = a.iter().zip(b).map(|(x, y)| x * y).sum();
        let aa = a.iter().map(|x| x * x).sum();
        let bb = b.iter().map(|y| y * y).sum();
        (dot, aa, bb)
    }

    #[test]
    fn test_short_vectors_use_scalar_path() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        let parts = cosine_parts_simd(&a, &b);
        assert!((parts.dot - 32.0).abs() < 1e-6);
        assert!((parts.norm_sq_a - 14.0).abs() < 1e-6);
        assert!((parts.norm_sq_b - 77.0).abs() < 1e-6);
    }

    #[test]
    fn test_wide_vectors_match_naive() {
        // 389 is not a multiple of any lane width, so the tail loop runs too
        let a: Vec<f32> = (0..389).map(|i| ((i * 7) % 13) as f32 * 0.1 - 0.6).collect();
        let b: Vec<f32> = (0..389).map(|i| ((i * 3) % 11) as f32 * 0.2 - 1.0).collect();

        let parts = cosine_parts_simd(&a, &b);
        let (dot, aa, bb) = naive(&a, &b);

        assert!((parts.dot - dot).abs() < 1e-2, "dot {} vs {}", parts.dot, dot);
        assert!((parts.norm_sq_a - aa).abs() < 1e-2);
        assert!((parts.norm_sq_b - bb).abs() < 1e-2);
    }

    #[test]
    fn test_cosine_of_zero_vector_is_zero() {
        let parts = cosine_parts_simd(&[0.0, 0.0], &[1.0, 1.0]);
        assert_eq!(parts.cosine(), 0.0);
    }

    #[test]
    fn test_wide_path_dot() {
        let a = vec![0.5f32; 64];
        let b = vec![2.0f32; 64];
        let parts = cosine_parts_simd(&a, &b);
        assert!((parts.dot - 64.0).abs() < 1e-4);
        assert!((parts.norm_sq_a - 16.0).abs() < 1e-4);
    }
}
