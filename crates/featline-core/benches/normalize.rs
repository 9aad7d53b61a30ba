use featline_core::{Record, Table, write_csv};
use serde_json::{Value, json};

/// Records whose key sets rotate, so the column union grows over the input
fn synthetic_records(n: usize) -> Vec<Record> {
    (0..n)
        .map(|i| {
            let value = match i % 3 {
                0 => json!({"OBJECTID": i, "name": format!("Feature {i}"), "status": "open"}),
                1 => json!({"OBJECTID": i, "area": i as f64 * 1.5}),
                _ => json!({"OBJECTID": i, "name": null, "owner": format!("owner-{}", i % 17)}),
            };
            match value {
                Value::Object(m) => m,
                _ => unreachable!(),
            }
        })
        .collect()
}

#[divan::bench(args = [1_000, 10_000])]
fn normalize_sparse(bencher: divan::Bencher, n: usize) {
    let records = synthetic_records(n);
    bencher.bench(|| Table::from_records(&records));
}

#[divan::bench(args = [1_000, 10_000])]
fn write_csv_sparse(bencher: divan::Bencher, n: usize) {
    let table = Table::from_records(&synthetic_records(n));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bench.csv");
    bencher.bench(|| write_csv(&table, &path).unwrap());
}

fn main() {
    divan::main();
}
