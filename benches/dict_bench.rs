use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use ord_dict::{OrdDict, Value};

fn lcg(mut s: u64) -> impl Iterator<Item = u64> {
    std::iter::from_fn(move || {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        Some(s)
    })
}

fn key(n: u64) -> Value {
    Value::str(format!("k{:08x}", n & 0xffff_ffff))
}

fn bench_set(c: &mut Criterion) {
    c.bench_function("ord_dict_set_1k", |b| {
        b.iter_batched(
            OrdDict::new,
            |mut d| {
                for (i, x) in lcg(1).take(1_000).enumerate() {
                    d.set(key(x), Value::Int(i as i64)).unwrap();
                }
                black_box(d)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_get_hit(c: &mut Criterion) {
    c.bench_function("ord_dict_get_hit_1k", |b| {
        let mut d = OrdDict::new();
        let keys: Vec<_> = lcg(7).take(1_000).map(key).collect();
        for (i, k) in keys.iter().enumerate() {
            d.set(k.clone(), Value::Int(i as i64)).unwrap();
        }
        let mut it = keys.iter().cycle();
        b.iter(|| {
            let k = it.next().unwrap();
            // Linear scan: hit cost depends on the key's position.
            black_box(d.get(k).unwrap());
        })
    });
}

fn bench_get_miss(c: &mut Criterion) {
    c.bench_function("ord_dict_get_miss_1k", |b| {
        let mut d = OrdDict::new();
        for (i, x) in lcg(11).take(1_000).enumerate() {
            d.set(key(x), Value::Int(i as i64)).unwrap();
        }
        let missing = Value::str("absent");
        b.iter(|| {
            // Misses always walk the full key sequence.
            black_box(d.get(&missing).is_err());
        })
    });
}

fn bench_construction_with_duplicates(c: &mut Criterion) {
    c.bench_function("ord_dict_from_pairs_dup_1k", |b| {
        // Half the keys collide, exercising the duplicate collapse.
        let pairs: Vec<_> = lcg(3)
            .take(1_000)
            .enumerate()
            .map(|(i, x)| (key(x % 500), Value::Int(i as i64)))
            .collect();
        b.iter_batched(
            || pairs.clone(),
            |pairs| black_box(OrdDict::from_pairs(pairs).unwrap()),
            BatchSize::SmallInput,
        )
    });
}

fn bench_merge(c: &mut Criterion) {
    c.bench_function("ord_dict_merge_2x500", |b| {
        let mut left = OrdDict::new();
        let mut right = OrdDict::new();
        for (i, x) in lcg(5).take(500).enumerate() {
            left.set(key(x), Value::Int(i as i64)).unwrap();
        }
        for (i, x) in lcg(9).take(500).enumerate() {
            right.set(key(x), Value::Int(i as i64)).unwrap();
        }
        b.iter(|| black_box(&left + &right))
    });
}

criterion_group!(
    benches,
    bench_set,
    bench_get_hit,
    bench_get_miss,
    bench_construction_with_duplicates,
    bench_merge,
);
criterion_main!(benches);
