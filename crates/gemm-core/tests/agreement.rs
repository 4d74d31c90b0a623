use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use gemm_core::{multiply_with_config, Algorithm, GemmConfig};
use gemm_utils::{check_same, random_matrix, DEFAULT_TOLERANCE};

const SIZES: [usize; 12] = [1, 2, 3, 4, 7, 8, 16, 17, 64, 65, 128, 129];

fn product(config: &GemmConfig, alg: Algorithm, a: &[f32], b: &[f32], m: usize, n: usize, k: usize) -> Vec<f32> {
    let mut c = vec![f32::NAN; m * k];
    multiply_with_config(config, alg, a, m, n, n, b, n, k, k, &mut c, m, k, k).unwrap();
    c
}

fn assert_close(expected: &[f32], got: &[f32], what: &str) {
    for (i, (&e, &g)) in expected.iter().zip(got).enumerate() {
        assert_relative_eq!(e, g, epsilon = 1e-3, max_relative = 1e-3);
        assert!(e.is_finite(), "{}: non-finite at {}", what, i);
    }
}

#[test]
fn test_all_algorithms_agree_over_size_grid() {
    // Low thresholds so Strassen actually recurses on the even sizes.
    let config = GemmConfig {
        block_dim: 16,
        dim_threshold: 4,
        scale_threshold: 64,
        max_depth: 6,
        ..GemmConfig::default()
    };

    let mut seed = 0u64;
    for &m in &SIZES {
        for &n in &SIZES {
            for &k in &SIZES {
                seed += 1;
                let a = random_matrix(m, n, seed);
                let b = random_matrix(n, k, seed.wrapping_mul(31));

                let reference = product(&config, Algorithm::Naive, &a, &b, m, n, k);
                for alg in [Algorithm::Blocked, Algorithm::Strassen] {
                    let got = product(&config, alg, &a, &b, m, n, k);
                    let what = format!("{} m={} n={} k={}", alg, m, n, k);
                    if let Err(e) = check_same(&reference, &got, m, k, DEFAULT_TOLERANCE) {
                        panic!("{}: {}", what, e);
                    }
                    assert_close(&reference, &got, &what);
                }
            }
        }
    }
}

#[test]
fn test_default_config_agrees_on_large_square() {
    let n = 256;
    let a = random_matrix(n, n, 11);
    let b = random_matrix(n, n, 12);
    let config = GemmConfig::default();

    let reference = product(&config, Algorithm::Naive, &a, &b, n, n, n);
    let strassen = product(&config, Algorithm::Strassen, &a, &b, n, n, n);
    let blocked = product(&config, Algorithm::Blocked, &a, &b, n, n, n);
    assert_close(&reference, &strassen, "strassen 256");
    assert_close(&reference, &blocked, "blocked 256");
}

#[test]
fn test_naive_base_case_agrees() {
    let config = GemmConfig {
        dim_threshold: 2,
        scale_threshold: 1,
        base_case: Algorithm::Naive,
        ..GemmConfig::default()
    };
    let (m, n, k) = (96, 64, 80);
    let a = random_matrix(m, n, 3);
    let b = random_matrix(n, k, 4);
    let reference = product(&config, Algorithm::Naive, &a, &b, m, n, k);
    let got = product(&config, Algorithm::Strassen, &a, &b, m, n, k);
    assert_close(&reference, &got, "strassen/naive base");
}

#[test]
fn test_random_shapes_agree() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..40 {
        // Mostly even extents so that splits happen, with odd ones mixed in.
        let extent = |rng: &mut StdRng| {
            let e = rng.gen_range(1..=48usize);
            if rng.gen_bool(0.75) { e * 2 } else { e }
        };
        let (m, n, k) = (extent(&mut rng), extent(&mut rng), extent(&mut rng));
        let config = GemmConfig {
            block_dim: rng.gen_range(1..=32),
            dim_threshold: rng.gen_range(1..=8),
            scale_threshold: 1,
            max_depth: rng.gen_range(0..=5),
            ..GemmConfig::default()
        };
        let a = gemm_utils::random_matrix(m, n, rng.gen());
        let b = gemm_utils::random_matrix(n, k, rng.gen());

        let reference = product(&config, Algorithm::Naive, &a, &b, m, n, k);
        for alg in [Algorithm::Blocked, Algorithm::Strassen] {
            let got = product(&config, alg, &a, &b, m, n, k);
            assert_close(&reference, &got, &format!("{} m={} n={} k={} {:?}", alg, m, n, k, config));
        }
    }
}
