use std::env;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

use ring_queue::list::Ring;
use ring_queue::sort::{list_sort, top_down};
use ring_queue::{patterns, ListSort, Queue};

fn should_run_benchmark(name: &str) -> bool {
    // Criterion only filters the timed benchmarks, the comparison counting mode needs its own.
    env::var("BENCH_FILTER").map_or(true, |filter| name.contains(&filter))
}

fn ring_of(values: Vec<String>) -> (Ring<String>, usize) {
    let mut ring = Ring::new();
    let head = ring.alloc_head().unwrap();
    for value in values {
        let node = ring.alloc(value).unwrap();
        ring.insert_before(head, node);
    }
    (ring, head)
}

fn measure_comp_count<S: ListSort>(
    name: &str,
    test_size: usize,
    pattern_provider: &fn(usize) -> Vec<String>,
) {
    // Measure how many comparisons are performed by a specific implementation and input
    // combination.
    let run_count: usize = if test_size <= 20 {
        10_000
    } else if test_size < 10_000 {
        300
    } else {
        10
    };

    let mut comp_count = 0u64;
    for _ in 0..run_count {
        let (mut ring, head) = ring_of(pattern_provider(test_size));
        S::sort_by(black_box(&mut ring), head, |a: &String, b: &String| {
            comp_count += 1;
            a.cmp(b)
        });
    }

    // If there is on average less than a single comparison this will be wrong.
    // But that's such a corner case I don't care about it.
    let total = comp_count / (run_count as u64);
    println!("{name}: mean comparisons: {total}");
}

#[inline(never)]
fn bench_sort_impl<S: ListSort>(
    c: &mut Criterion,
    test_size: usize,
    pattern_name: &str,
    pattern_provider: &fn(usize) -> Vec<String>,
) {
    let name = format!("{}-{pattern_name}-{test_size}", S::name());

    if env::var("MEASURE_COMP").is_ok() {
        if should_run_benchmark(&name) {
            measure_comp_count::<S>(&format!("{name}-comp"), test_size, pattern_provider);
        }
        return;
    }

    let batch_size = if test_size > 30 {
        BatchSize::LargeInput
    } else {
        BatchSize::SmallInput
    };

    c.bench_function(&name, |b| {
        b.iter_batched(
            || Queue::from_values(pattern_provider(test_size)).unwrap(),
            |mut queue| {
                queue.sort_with::<S>(false);
                queue
            },
            batch_size,
        )
    });
}

#[inline(never)]
fn bench_queue_op(
    c: &mut Criterion,
    test_size: usize,
    op_name: &str,
    op: impl Fn(&mut Queue),
) {
    let name = format!("queue_{op_name}-{test_size}");
    if env::var("MEASURE_COMP").is_ok() {
        return;
    }

    c.bench_function(&name, |b| {
        b.iter_batched(
            || Queue::from_values(patterns::random_uniform(test_size, 0..100)).unwrap(),
            |mut queue| {
                op(black_box(&mut queue));
                queue
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_patterns(c: &mut Criterion, test_size: usize) {
    let pattern_providers: Vec<(&'static str, fn(usize) -> Vec<String>)> = vec![
        ("random", patterns::random),
        ("random_dense", |size| {
            patterns::random_uniform(size, 0..(size as f64).log2().round() as u32 + 1)
        }),
        ("random_binary", |size| patterns::random_uniform(size, 0..2)),
        ("random_words", |size| patterns::random_words(size, 8)),
        ("ascending", patterns::ascending),
        ("descending", patterns::descending),
        ("saws_long", |size| {
            patterns::saw_mixed(size, ((size as f64).log2().round()) as usize)
        }),
        ("pipe_organ", patterns::pipe_organ),
    ];

    for (pattern_name, pattern_provider) in pattern_providers.iter() {
        if test_size < 3 && *pattern_name != "random" {
            continue;
        }

        bench_sort_impl::<list_sort::SortImpl>(c, test_size, pattern_name, pattern_provider);
        bench_sort_impl::<top_down::SortImpl>(c, test_size, pattern_name, pattern_provider);
    }
}

fn ensure_true_random() {
    // Ensure that random vecs are actually different.
    let random_vec_a = patterns::random(5);
    let random_vec_b = patterns::random(5);

    // The fixed seed used by the tests must not leak into the benchmarks.
    assert_ne!(random_vec_a, random_vec_b);
}

fn criterion_benchmark(c: &mut Criterion) {
    let test_sizes = [
        0, 1, 2, 3, 5, 8, 16, 17, 20, 31, 50, 101, 200, 500, 1_000, 2_048, 10_000, 100_000,
    ];

    patterns::disable_fixed_seed();
    ensure_true_random();

    for test_size in test_sizes {
        bench_patterns(c, test_size);

        bench_queue_op(c, test_size, "reverse", Queue::reverse);
        bench_queue_op(c, test_size, "swap", Queue::swap);
        bench_queue_op(c, test_size, "reverse_k3", |queue| {
            queue.reverse_k(3).unwrap();
        });
        bench_queue_op(c, test_size, "sort_delete_dup", |queue| {
            queue.sort(false);
            let _ = queue.delete_dup();
        });
        bench_queue_op(c, test_size, "ascend", |queue| {
            black_box(queue.ascend());
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
