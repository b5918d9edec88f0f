//! Validation tests comparing the sparse `Uᵗx = b` solver against dense references
//!
//! These tests verify that the CSC solve produces the same results as a
//! straightforward dense forward substitution on `Uᵗ`, and that multiplying the
//! factor back reproduces the right-hand side.

use approx::assert_relative_eq;
use math_sparse_tri::{
    CscMatrix, LinearOperator, UtSolveConfig, utsolve, utsolve_array, utsolve_singular,
    utsolve_with_config,
};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Random upper-triangular factor with diagonal magnitudes in [1, 2)
fn random_upper_factor(n: usize, density: f64, rng: &mut StdRng) -> CscMatrix<f64> {
    let mut triplets = Vec::new();
    for j in 0..n {
        for i in 0..j {
            if rng.random_bool(density) {
                triplets.push((i, j, rng.random_range(-1.0..1.0)));
            }
        }
        let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        triplets.push((j, j, sign * rng.random_range(1.0..2.0)));
    }
    CscMatrix::from_triplets(n, n, triplets)
}

/// Dense forward substitution on Uᵗ
fn dense_transpose_solve(u: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = b.len();
    let mut x = Array1::zeros(n);
    for j in 0..n {
        let mut sum = b[j];
        for i in 0..j {
            sum -= u[[i, j]] * x[i];
        }
        x[j] = sum / u[[j, j]];
    }
    x
}

fn random_rhs(n: usize, rng: &mut StdRng) -> Vec<f64> {
    (0..n).map(|_| rng.random_range(-10.0..10.0)).collect()
}

#[test]
fn test_matches_dense_reference() {
    let mut rng = StdRng::seed_from_u64(42);

    for &n in &[1, 5, 20, 100] {
        let u = random_upper_factor(n, 0.3, &mut rng);
        let view = u.as_view().expect("square factor");
        let b = random_rhs(n, &mut rng);

        let expected = dense_transpose_solve(&u.to_dense(), &Array1::from_vec(b.clone()));

        let mut x = b.clone();
        assert!(utsolve_singular(Some(&view), Some(&mut x[..]), 1e-14));

        for j in 0..n {
            assert_relative_eq!(x[j], expected[j], max_relative = 1e-12, epsilon = 1e-12);
        }
    }
}

#[test]
fn test_forward_multiply_reconstructs_rhs() {
    let mut rng = StdRng::seed_from_u64(7);
    let n = 60;
    let u = random_upper_factor(n, 0.2, &mut rng);
    let view = u.as_view().expect("square factor");
    let b = Array1::from_vec(random_rhs(n, &mut rng));

    let mut x = b.clone();
    let stats = utsolve_array(&view, &mut x, &UtSolveConfig::default()).expect("valid input");
    assert!(stats.is_exact());

    let reconstructed = u.apply_transpose(&x);
    for j in 0..n {
        assert_relative_eq!(reconstructed[j], b[j], epsilon = 1e-9);
    }
}

#[test]
fn test_resolving_does_not_reproduce_rhs() {
    let mut rng = StdRng::seed_from_u64(3);
    let n = 10;
    let u = random_upper_factor(n, 0.5, &mut rng);
    let view = u.as_view().expect("square factor");
    let b = random_rhs(n, &mut rng);

    let mut x = b.clone();
    assert!(utsolve(Some(&view), Some(&mut x[..])));
    let first = x.clone();
    assert!(utsolve(Some(&view), Some(&mut x[..])));

    assert_ne!(x, b);
    assert_ne!(x, first);

    // Uᵗ · x_computed recovers b, not another solve
    let reconstructed = u.matvec_transpose(&Array1::from_vec(first));
    for j in 0..n {
        assert_relative_eq!(reconstructed[j], b[j], epsilon = 1e-9);
    }
}

#[test]
fn test_singular_column_leaves_others_consistent() {
    init_logger();

    // Zero pivot in column 2 of a 5x5 bidiagonal factor
    let n = 5;
    let mut triplets = Vec::new();
    for j in 0..n {
        if j > 0 {
            triplets.push((j - 1, j, 0.5));
        }
        triplets.push((j, j, if j == 2 { 0.0 } else { 2.0 }));
    }
    let u = CscMatrix::from_triplets(n, n, triplets);
    let view = u.as_view().expect("square factor");
    let b = vec![1.0_f64, 2.0, 3.0, 4.0, 5.0];

    let mut x = b.clone();
    let config = UtSolveConfig {
        log_singular: true,
        ..UtSolveConfig::with_tolerance(1e-10)
    };
    let stats = utsolve_with_config(&view, &mut x[..], &config).expect("valid input");

    assert_eq!(stats.singular_pivots, vec![2]);
    assert!(x.iter().all(|v| v.is_finite()));

    // x[2] is the pre-division residual b[2] - 0.5 * x[1]
    assert_eq!(x[2], 3.0 - 0.5 * x[1]);

    let reconstructed = u.matvec_transpose(&Array1::from_vec(x));
    for j in (0..n).filter(|&j| j != 2) {
        assert_relative_eq!(reconstructed[j], b[j], epsilon = 1e-12);
    }
}

#[test]
fn test_complex_matches_dense_reference() {
    let mut rng = StdRng::seed_from_u64(11);
    let n = 12;

    let mut triplets = Vec::new();
    for j in 0..n {
        for i in 0..j {
            if rng.random_bool(0.4) {
                let v = Complex64::new(rng.random_range(-1.0..1.0), rng.random_range(-1.0..1.0));
                triplets.push((i, j, v));
            }
        }
        triplets.push((j, j, Complex64::new(rng.random_range(1.0..2.0), 0.5)));
    }
    let u = CscMatrix::from_triplets(n, n, triplets);
    let view = u.as_view().expect("square factor");

    let b: Vec<Complex64> = (0..n)
        .map(|k| Complex64::new(k as f64, -(k as f64) / 2.0))
        .collect();

    let mut x = b.clone();
    assert!(utsolve(Some(&view), Some(&mut x[..])));

    let reconstructed = u.apply_transpose(&Array1::from_vec(x));
    for j in 0..n {
        assert_relative_eq!((reconstructed[j] - b[j]).norm(), 0.0, epsilon = 1e-10);
    }
}

#[test]
fn test_shared_factor_concurrent_solves() {
    let mut rng = StdRng::seed_from_u64(99);
    let n = 40;
    let u = random_upper_factor(n, 0.25, &mut rng);
    let view = u.as_view().expect("square factor");

    let rhs: Vec<Vec<f64>> = (0..4).map(|_| random_rhs(n, &mut rng)).collect();
    let mut solutions = rhs.clone();

    std::thread::scope(|s| {
        for x in solutions.iter_mut() {
            s.spawn(move || {
                assert!(utsolve(Some(&view), Some(&mut x[..])));
            });
        }
    });

    for (b, x) in rhs.iter().zip(&solutions) {
        let mut sequential = b.clone();
        assert!(utsolve(Some(&view), Some(&mut sequential[..])));
        assert_eq!(&sequential, x);
    }
}
