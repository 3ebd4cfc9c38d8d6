//! End-to-end matmul correctness.
//!
//! Every scenario runs on every platform: where AMX is missing the engine
//! falls back to the scalar path and the expected values are identical.

use amx_gemm::Matrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Reference product computed with plain triple loops through the safe API.
fn reference(a: &Matrix, b: &Matrix) -> Vec<f32> {
    let (m, k, n) = (a.rows(), a.cols(), b.cols());
    let mut c = vec![0.0f32; m * n];
    for i in 0..m {
        for kk in 0..k {
            let aik = a.get(i, kk);
            for j in 0..n {
                c[i * n + j] += aik * b.get(kk, j);
            }
        }
    }
    c
}

fn assert_close(actual: &Matrix, expected: &[f32], tol: f32) {
    let (m, n) = actual.shape();
    assert_eq!(expected.len(), m * n);
    for i in 0..m {
        for j in 0..n {
            let got = actual.get(i, j);
            let want = expected[i * n + j];
            assert!(
                (got - want).abs() <= tol,
                "C[{i}, {j}] = {got}, expected {want}"
            );
        }
    }
}

#[test]
fn two_by_two_exact() {
    let a = Matrix::from_slice(2, 2, &[1.0, 2.0, 3.0, 4.0]).unwrap();
    let b = Matrix::from_slice(2, 2, &[5.0, 6.0, 7.0, 8.0]).unwrap();

    let c = a.matmul(&b).unwrap();

    assert_eq!(c.to_vec(), vec![19.0, 22.0, 43.0, 50.0]);
}

#[test]
fn identity_64() {
    let a = Matrix::identity(64).unwrap();
    let b = Matrix::from_vec(64, 64, (0..64 * 64).map(|i| (i % 64) as f32).collect()).unwrap();

    let c = a.matmul(&b).unwrap();

    for i in 0..64 {
        for j in 0..64 {
            assert!(
                (c.get(i, j) - b.get(i, j)).abs() < 1e-5,
                "mismatch at ({i}, {j}): {} != {}",
                c.get(i, j),
                b.get(i, j)
            );
        }
    }
}

#[test]
fn constant_128() {
    let a = Matrix::fill(128, 128, 1.0).unwrap();
    let b = Matrix::fill(128, 128, 2.0).unwrap();

    let c = a.matmul(&b).unwrap();

    assert_close(&c, &vec![256.0; 128 * 128], 1e-3);
}

#[test]
fn ragged_17_exercises_edge_tiles() {
    // Stride pads 17 to 32; every output tile touching row/col 16 runs the
    // scalar edge path, and a clean 34.0 everywhere proves the padding
    // never leaks into the result.
    let a = Matrix::fill(17, 17, 1.0).unwrap();
    let b = Matrix::fill(17, 17, 2.0).unwrap();
    assert_eq!(a.stride(), 32);

    let c = a.matmul(&b).unwrap();

    assert_close(&c, &vec![34.0; 17 * 17], 1e-3);
}

#[test]
fn rectangular_48x96x32_single_thread_band() {
    // 16 < M <= 64: multi-tile rows on the single-worker path.
    let a = Matrix::fill(48, 96, 1.0).unwrap();
    let b = Matrix::fill(96, 32, 1.0).unwrap();

    let c = a.matmul(&b).unwrap();

    assert_eq!(c.shape(), (48, 32));
    assert_close(&c, &vec![96.0; 48 * 32], 1e-3);
}

#[test]
fn rectangular_identity_512_parallel() {
    // M = 512 crosses the multi-thread threshold: per-worker panels and a
    // partial bottom band of zero rows.
    let mut a = Matrix::zeros(512, 128).unwrap();
    for i in 0..128 {
        a.set(i, i, 1.0);
    }
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let b = Matrix::from_vec(
        128,
        256,
        (0..128 * 256).map(|_| rng.gen_range(-1.0..1.0)).collect(),
    )
    .unwrap();

    let c = a.matmul(&b).unwrap();

    assert_eq!(c.shape(), (512, 256));
    for i in 0..128 {
        for j in 0..256 {
            assert!(
                (c.get(i, j) - b.get(i, j)).abs() < 1e-3,
                "top band mismatch at ({i}, {j})"
            );
        }
    }
    for i in 128..512 {
        for j in 0..256 {
            assert!(
                c.get(i, j).abs() < 1e-3,
                "bottom band not zero at ({i}, {j}): {}",
                c.get(i, j)
            );
        }
    }
}

#[test]
fn identity_laws() {
    let b = Matrix::from_vec(24, 40, (0..24 * 40).map(|i| (i % 13) as f32).collect()).unwrap();

    let left = Matrix::identity(24).unwrap().matmul(&b).unwrap();
    let right = b.matmul(&Matrix::identity(40).unwrap()).unwrap();

    // Integer-valued inputs reproduce exactly.
    assert_eq!(left, b);
    assert_eq!(right, b);
}

#[test]
fn distributes_over_addition() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut mat = |r: usize, c: usize| {
        Matrix::from_vec(r, c, (0..r * c).map(|_| rng.gen_range(-1.0..1.0)).collect()).unwrap()
    };
    let a = mat(33, 47);
    let b = mat(47, 29);
    let c = mat(47, 29);

    let lhs = a.matmul(&b.add(&c).unwrap()).unwrap();
    let rhs = a.matmul(&b).unwrap().add(&a.matmul(&c).unwrap()).unwrap();

    for i in 0..33 {
        for j in 0..29 {
            assert!(
                (lhs.get(i, j) - rhs.get(i, j)).abs() <= 1e-3,
                "distributivity broken at ({i}, {j})"
            );
        }
    }
}

#[test]
fn matches_reference_across_shapes() {
    let mut rng = StdRng::seed_from_u64(42);
    for (m, k, n) in [
        (1, 1, 1),
        (3, 5, 2),
        (16, 16, 16),
        (17, 33, 19),
        (31, 64, 47),
        (64, 64, 64),
        (80, 100, 48),
    ] {
        let a = Matrix::from_vec(m, k, (0..m * k).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .unwrap();
        let b = Matrix::from_vec(k, n, (0..k * n).map(|_| rng.gen_range(-1.0..1.0)).collect())
            .unwrap();

        let c = a.matmul(&b).unwrap();

        assert_close(&c, &reference(&a, &b), 1e-3);
    }
}

#[test]
fn copy_isolation() {
    let original = Matrix::fill(20, 20, 1.0).unwrap();
    let mut copy = original.clone();
    copy.set(0, 0, 42.0);

    assert_eq!(original.get(0, 0), 1.0);
    let c = original.matmul(&copy).unwrap();
    // Column 0 picks up the mutated element exactly once.
    assert!((c.get(0, 0) - (42.0 + 19.0)).abs() < 1e-4);
}

#[test]
fn result_padding_is_zero() {
    let a = Matrix::fill(17, 17, 1.0).unwrap();
    let b = Matrix::fill(17, 17, 1.0).unwrap();

    let mut c = a.matmul(&b).unwrap();

    let stride = c.stride();
    assert_eq!(stride, 32);
    // Peek past the logical columns through the raw pointer.
    let ptr = c.as_mut_ptr();
    for i in 0..17 {
        for j in 17..stride {
            let v = unsafe { *ptr.add(i * stride + j) };
            assert_eq!(v, 0.0, "padding dirty at ({i}, {j})");
        }
    }
}
