use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

use rand::distributions::Uniform;
use rand::prelude::*;

use once_cell::sync::OnceCell;

/// Provides a set of string patterns useful for testing and benchmarking the queue.
/// Values are fixed width decimal strings, so their lexicographic order matches the numeric one,
/// unless stated otherwise.

// --- Public ---

pub fn random(size: usize) -> Vec<String> {
    //     .
    // : . : :
    // :.:::.::

    random_vec(size).into_iter().map(to_key).collect()
}

pub fn random_uniform(size: usize, range: Range<u32>) -> Vec<String> {
    // :.:.:.::
    let mut rng = rand::rngs::StdRng::from(new_seed());

    let dist = Uniform::from(range);

    (0..size).map(|_| to_key(dist.sample(&mut rng))).collect()
}

pub fn random_words(size: usize, max_len: usize) -> Vec<String> {
    // Lowercase words of length 0..=max_len. Short words share prefixes with longer ones, which
    // exercises the prefix rule of the lexicographic order.
    let mut rng = rand::rngs::StdRng::from(new_seed());

    (0..size)
        .map(|_| {
            let len = rng.gen_range(0..=max_len);
            (0..len)
                .map(|_| rng.gen_range(b'a'..=b'c') as char)
                .collect::<String>()
        })
        .collect()
}

pub fn all_equal(size: usize) -> Vec<String> {
    // ......
    // ::::::

    (0..size).map(|_| to_key(66)).collect()
}

pub fn ascending(size: usize) -> Vec<String> {
    //     .:
    //   .:::
    // .:::::

    (0..size as u32).map(to_key).collect()
}

pub fn descending(size: usize) -> Vec<String> {
    // :.
    // :::.
    // :::::.

    (0..size as u32).rev().map(to_key).collect()
}

pub fn saw_mixed(size: usize, saw_count: usize) -> Vec<String> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    if size == 0 {
        return Vec::new();
    }

    let mut vals = random_vec(size);
    let chunks_size = (size / saw_count.max(1)).max(1);
    let mut rng = rand::rngs::StdRng::from(new_seed());

    for chunk in vals.chunks_mut(chunks_size) {
        if rng.gen::<bool>() {
            chunk.sort();
        } else {
            chunk.sort_by_key(|&e| std::cmp::Reverse(e));
        }
    }

    vals.into_iter().map(to_key).collect()
}

pub fn pipe_organ(size: usize) -> Vec<String> {
    //   .:.
    // .:::::.

    let mut vals = random_vec(size);

    let first_half = &mut vals[0..(size / 2)];
    first_half.sort();

    let second_half = &mut vals[(size / 2)..size];
    second_half.sort_by_key(|&e| std::cmp::Reverse(e));

    vals.into_iter().map(to_key).collect()
}

static USE_FIXED_SEED: AtomicBool = AtomicBool::new(true);

pub fn disable_fixed_seed() {
    USE_FIXED_SEED.store(false, Ordering::Release);
}

pub fn random_init_seed() -> u64 {
    if USE_FIXED_SEED.load(Ordering::Acquire) {
        static SEED: OnceCell<u64> = OnceCell::new();
        *SEED.get_or_init(|| -> u64 { thread_rng().gen() })
    } else {
        thread_rng().gen()
    }
}

/// Fixed width key for `val`.
pub fn to_key(val: u32) -> String {
    format!("{val:010}")
}

// --- Private ---

fn new_seed() -> StdRng {
    // Random seed, but prints it for repeatability.
    rand::SeedableRng::seed_from_u64(random_init_seed())
}

fn random_vec(size: usize) -> Vec<u32> {
    let mut rng = rand::rngs::StdRng::from(new_seed());

    (0..size).map(|_| rng.gen::<u32>()).collect()
}
