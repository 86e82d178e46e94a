use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ml_workbench::training::{KnnModel, LinearRegression, Model, ProblemType};
use ndarray::{Array1, Array2};
use rand::prelude::*;

fn create_regression_data(n_rows: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
    let mut rng = StdRng::seed_from_u64(42);
    let x = Array2::from_shape_fn((n_rows, n_features), |_| rng.gen::<f64>());
    // Target as sum of features + noise
    let y = x.rows().into_iter().map(|row| row.sum() + rng.gen::<f64>() * 0.1).collect();
    (x, y)
}

fn bench_linear_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_regression");
    group.sample_size(10);

    for n_rows in [1000, 5000, 10000].iter() {
        let (x, y) = create_regression_data(*n_rows, 10);
        group.bench_with_input(BenchmarkId::new("fit", n_rows), n_rows, |b, _| {
            b.iter(|| {
                let mut model = LinearRegression::new();
                model.fit(black_box(&x), black_box(&y)).unwrap();
            })
        });
    }

    group.finish();
}

fn bench_knn_predict(c: &mut Criterion) {
    let mut group = c.benchmark_group("knn");

    for n_rows in [500, 2000, 5000].iter() {
        let (x, y) = create_regression_data(*n_rows, 10);
        let (queries, _) = create_regression_data(100, 10);
        let mut model = KnnModel::new(3, ProblemType::Regression).unwrap();
        model.fit(&x, &y).unwrap();

        group.bench_with_input(BenchmarkId::new("predict_100", n_rows), n_rows, |b, _| {
            b.iter(|| model.predict(black_box(&queries)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_linear_fit, bench_knn_predict);
criterion_main!(benches);
