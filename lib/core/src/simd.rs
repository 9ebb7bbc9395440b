// Dot product and norm kernels used by cosine scoring.
// Runtime feature detection picks AVX2/FMA on x86_64 and NEON on aarch64,
// everything else goes through the unrolled scalar loop.

#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

#[cfg(target_arch = "aarch64")]
use std::arch::aarch64::*;

/// Below this length the scalar loop wins over SIMD setup cost
#[cfg(any(target_arch = "x86_64", target_arch = "aarch64"))]
const MIN_SIMD_DIM: usize = 16;

/// Dot product of two equal-length slices, accumulated in f64.
///
/// Products of two f32 values are exact in f64 and the sum cannot overflow or
/// underflow for any finite f32 input of realistic length. Returns 0.0 when
/// the lengths differ; callers that care about the mismatch check dimensions
/// before getting here.
#[inline]
pub fn dot_product_simd(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    #[cfg(target_arch = "x86_64")]
    {
        if a.len() >= MIN_SIMD_DIM
            && is_x86_feature_detected!("avx2")
            && is_x86_feature_detected!("fma")
        {
            // SAFETY: feature presence checked above, lengths are equal
            return unsafe { dot_product_avx2(a, b) };
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        if a.len() >= MIN_SIMD_DIM && std::arch::is_aarch64_feature_detected!("neon") {
            // SAFETY: feature presence checked above, lengths are equal
            return unsafe { dot_product_neon(a, b) };
        }
    }

    dot_product_scalar(a, b)
}

/// Euclidean length of a slice, in f64
#[inline]
pub fn norm_simd(v: &[f32]) -> f64 {
    dot_product_simd(v, v).sqrt()
}

#[cfg(target_arch = "x86_64")]
#[target_feature(enable = "avx2", enable = "fma")]
unsafe fn dot_product_avx2(a: &[f32], b: &[f32]) -> f64 {
    let len = a.len();
    let mut acc_lo = _mm256_setzero_pd();
    let mut acc_hi = _mm256_setzero_pd();
    let mut i = 0;

    // Widen four f32 lanes at a time to f64 before multiplying
    while i + 8 <= len {
        acc_lo = _mm256_fmadd_pd(
            _mm256_cvtps_pd(_mm_loadu_ps(a.as_ptr().add(i))),
            _mm256_cvtps_pd(_mm_loadu_ps(b.as_ptr().add(i))),
            acc_lo,
        );
        acc_hi = _mm256_fmadd_pd(
            _mm256_cvtps_pd(_mm_loadu_ps(a.as_ptr().add(i + 4))),
            _mm256_cvtps_pd(_mm_loadu_ps(b.as_ptr().add(i + 4))),
            acc_hi,
        );
        i += 8;
    }

    let acc = _mm256_add_pd(acc_lo, acc_hi);
    let halves = _mm_add_pd(_mm256_castpd256_pd128(acc), _mm256_extractf128_pd(acc, 1));
    let mut sum = _mm_cvtsd_f64(_mm_add_sd(halves, _mm_unpackhi_pd(halves, halves)));

    for j in i..len {
        sum += a[j] as f64 * b[j] as f64;
    }
    sum
}

#[cfg(target_arch = "aarch64")]
#[target_feature(enable = "neon")]
unsafe fn dot_product_neon(a: &[f32], b: &[f32]) -> f64 {
    let len = a.len();
    let mut acc_lo = vdupq_n_f64(0.0);
    let mut acc_hi = vdupq_n_f64(0.0);
    let mut i = 0;

    while i + 4 <= len {
        let va = vld1q_f32(a.as_ptr().add(i));
        let vb = vld1q_f32(b.as_ptr().add(i));
        acc_lo = vfmaq_f64(acc_lo, vcvt_f64_f32(vget_low_f32(va)), vcvt_f64_f32(vget_low_f32(vb)));
        acc_hi = vfmaq_f64(acc_hi, vcvt_high_f64_f32(va), vcvt_high_f64_f32(vb));
        i += 4;
    }

    let mut sum = vaddvq_f64(vaddq_f64(acc_lo, acc_hi));
    for j in i..len {
        sum += a[j] as f64 * b[j] as f64;
    }
    sum
}

/// Four independent accumulators keep the FP pipeline busy
#[inline]
fn dot_product_scalar(a: &[f32], b: &[f32]) -> f64 {
    let mut acc = [0.0f64; 4];
    let a_chunks = a.chunks_exact(4);
    let b_chunks = b.chunks_exact(4);
    let a_tail = a_chunks.remainder();
    let b_tail = b_chunks.remainder();

    for (x, y) in a_chunks.zip(b_chunks) {
        acc[0] += x[0] as f64 * y[0] as f64;
        acc[1] += x[1] as f64 * y[1] as f64;
        acc[2] += x[2] as f64 * y[2] as f64;
        acc[3] += x[3] as f64 * y[3] as f64;
    }

    let tail: f64 = a_tail
        .iter()
        .zip(b_tail)
        .map(|(x, y)| *x as f64 * *y as f64)
        .sum();
    (acc[0] + acc[1]) + (acc[2] + acc[3]) + tail
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_dot(a: &[f32], b: &[f32]) -> f64 {
        a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum()
    }

    #[test]
    fn test_dot_matches_naive_for_odd_lengths() {
        for len in [0usize, 1, 3, 7, 15, 16, 17, 33, 768] {
            let a: Vec<f32> = (0..len).map(|i| (i as f32 * 0.37).sin()).collect();
            let b: Vec<f32> = (0..len).map(|i| (i as f32 * 0.11).cos()).collect();
            let expected = naive_dot(&a, &b);
            let got = dot_product_simd(&a, &b);
            assert!((got - expected).abs() < 1e-9, "len {}: {} vs {}", len, got, expected);
        }
    }

    #[test]
    fn test_dot_length_mismatch_is_zero() {
        assert_eq!(dot_product_simd(&[1.0, 2.0], &[1.0]), 0.0);
    }

    #[test]
    fn test_norm() {
        assert!((norm_simd(&[3.0, 4.0]) - 5.0).abs() < 1e-6);
        assert_eq!(norm_simd(&[0.0; 32]), 0.0);
    }

    #[test]
    fn test_extreme_magnitudes_stay_finite() {
        for len in [2usize, 32] {
            let huge = vec![f32::MAX; len];
            let norm = norm_simd(&huge);
            assert!(norm.is_finite());
            assert!((norm / (f32::MAX as f64 * (len as f64).sqrt()) - 1.0).abs() < 1e-12);

            let tiny = vec![1e-30f32; len];
            assert!(norm_simd(&tiny) > 0.0);
            let smallest = vec![f32::from_bits(1); len];
            assert!(norm_simd(&smallest) > 0.0);
        }
    }
}
