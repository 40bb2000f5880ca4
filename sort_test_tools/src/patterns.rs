//! Input patterns for testing and benchmarking sorts, currently limited to `i32` values.
//!
//! All random patterns draw from one seed per process, printed by the test suite, so a failure
//! can be reproduced with `OVERRIDE_SEED=<seed>`. Benchmarks call [`use_random_seed_each_time`]
//! instead.

use std::env;
use std::sync::Mutex;

use rand::distributions::Uniform;
use rand::prelude::*;

use zipf::ZipfDistribution;

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    let mut rng = new_rng();
    (0..len).map(|_| rng.gen::<i32>()).collect()
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<Uniform<i32>>,
{
    // :.:.:.::

    let dist: Uniform<i32> = range.into();
    new_rng().sample_iter(dist).take(len).collect()
}

/// Values in `1..=len` following Zipf's law, few values are very common. `len` must be non-zero.
pub fn random_zipf(len: usize, exponent: f64) -> Vec<i32> {
    let dist = ZipfDistribution::new(len, exponent).unwrap();
    new_rng()
        .sample_iter(dist)
        .take(len)
        .map(|val| val as i32)
        .collect()
}

/// Random values, the first `sorted_percent` of them already in order. Simulates appending new
/// values to a sorted collection.
pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    //     .:
    //   .:::. :
    // .::::::.::
    // [----][--]

    let mut vals = random(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;
    vals[..sorted_len.min(len)].sort_unstable();

    vals
}

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect()
}

pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    let chunk_len = saw_len(len, saw_count);
    sort_chunks(random(len), std::iter::repeat(chunk_len), |_| false)
}

pub fn saw_descending(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.
    // :::.:::.

    let chunk_len = saw_len(len, saw_count);
    sort_chunks(random(len), std::iter::repeat(chunk_len), |_| true)
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    let chunk_len = saw_len(len, saw_count);
    let directions = random_uniform(len / chunk_len + 1, 0..=1);
    sort_chunks(random(len), std::iter::repeat(chunk_len), |i| directions[i] == 1)
}

/// Like [`saw_mixed`], with each saw length picked at random from `range`.
pub fn saw_mixed_range(len: usize, range: std::ops::Range<usize>) -> Vec<i32> {
    //     :.
    // :.  :::.    .::.      .:
    // :::.:::::..::::::..:.:::

    let max_chunks = len / range.start.max(1) + 1;
    let directions = random_uniform(max_chunks, 0..=1);
    let chunk_lens = random_uniform(max_chunks, (range.start as i32)..(range.end as i32));

    sort_chunks(
        random(len),
        chunk_lens.into_iter().map(|chunk_len| chunk_len as usize),
        |i| directions[i] == 1,
    )
}

pub fn pipe_organ(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    let mid = len / 2;
    let mut vals = random(len);
    vals[..mid].sort();
    vals[mid..].sort_by(|a, b| b.cmp(a));

    vals
}

/// Ascending or descending values, then `swaps` random pairs are exchanged.
pub fn random_swaps(len: usize, swaps: usize, reversed: bool) -> Vec<i32> {
    //     .:       :.
    //   :.::  or  ::.:
    // .:::::      :::::.

    let mut vals = if reversed {
        descending(len)
    } else {
        ascending(len)
    };

    if len == 0 {
        return vals;
    }

    let mut rng = new_rng();
    for _ in 0..swaps {
        let a = rng.gen_range(0..len);
        let b = rng.gen_range(0..len);
        vals.swap(a, b);
    }

    vals
}

/// Random values with consecutive ascending runs, run lengths taken from `run_lens` in a cycle.
pub fn run_lengths(len: usize, run_lens: &[usize]) -> Vec<i32> {
    //   .:      .:
    // .:::  .:.:::  .:
    // [--][-][--]...

    sort_chunks(
        random(len),
        run_lens.iter().map(|&run_len| run_len.max(1)).cycle(),
        |_| false,
    )
}

/// Makes every random pattern draw fresh values, instead of repeating the per process values.
///
/// Panics if `OVERRIDE_SEED` is set.
pub fn use_random_seed_each_time() {
    let mut seed = SEED.lock().unwrap();
    if let Seed::Override(_) = *seed.get_or_insert_with(Seed::from_env) {
        panic!("Using use_random_seed_each_time conflicts with the external seed override.");
    }

    *seed = Some(Seed::EachTime);
}

/// The seed the next random pattern is generated from.
pub fn random_init_seed() -> u64 {
    match *SEED.lock().unwrap().get_or_insert_with(Seed::from_env) {
        Seed::EachTime => thread_rng().gen(),
        Seed::PerProcess(seed) | Seed::Override(seed) => seed,
    }
}

// --- Private ---

#[derive(Copy, Clone)]
enum Seed {
    EachTime,
    PerProcess(u64),
    Override(u64),
}

impl Seed {
    fn from_env() -> Self {
        match env::var("OVERRIDE_SEED") {
            Ok(seed) => Seed::Override(seed.parse().expect("OVERRIDE_SEED must be a u64")),
            Err(_) => Seed::PerProcess(thread_rng().gen()),
        }
    }
}

static SEED: Mutex<Option<Seed>> = Mutex::new(None);

fn new_rng() -> StdRng {
    StdRng::seed_from_u64(random_init_seed())
}

fn saw_len(len: usize, saw_count: usize) -> usize {
    (len / saw_count.max(1)).max(1)
}

/// Sorts consecutive chunks of `vals` with lengths from `chunk_lens`, chunk `i` descending if
/// `is_descending(i)`.
fn sort_chunks(
    mut vals: Vec<i32>,
    chunk_lens: impl Iterator<Item = usize>,
    is_descending: impl Fn(usize) -> bool,
) -> Vec<i32> {
    let len = vals.len();
    let mut start = 0;

    for (i, chunk_len) in chunk_lens.enumerate() {
        if start >= len {
            break;
        }

        let end = (start + chunk_len).min(len);
        let chunk = &mut vals[start..end];
        if is_descending(i) {
            chunk.sort_by(|a, b| b.cmp(a));
        } else {
            chunk.sort();
        }

        start = end;
    }

    vals
}
