//! Uniform random sources
//!
//! Workers and the factory draw every random number through the
//! [`RandomSource`] trait so that runs can be seeded or fully scripted.

use rand::{rngs::SmallRng, Rng, SeedableRng};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// A source of uniform random numbers in `[0, 1)`
pub trait RandomSource: Send + Sync + fmt::Debug {
    /// Draw the next number
    fn next(&self) -> f64;

    /// Draw two numbers that no concurrent caller can split
    fn next_pair(&self) -> (f64, f64) {
        (self.next(), self.next())
    }
}

/// Entropy or seed driven source backed by a `SmallRng`
#[derive(Debug)]
pub struct ThreadRandom {
    rng: Mutex<SmallRng>,
}

impl ThreadRandom {
    /// Create a source seeded from system entropy
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Create a reproducible source
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next(&self) -> f64 {
        // A poisoned lock still holds a usable generator
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen::<f64>()
    }

    fn next_pair(&self) -> (f64, f64) {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        (rng.gen::<f64>(), rng.gen::<f64>())
    }
}

/// Source that always returns the same number
#[derive(Debug, Clone, Copy)]
pub struct FixedRandom(pub f64);

impl RandomSource for FixedRandom {
    fn next(&self) -> f64 {
        self.0
    }
}

/// Source that cycles through a scripted list of numbers
#[derive(Debug)]
pub struct SequenceRandom {
    values: Vec<f64>,
    cursor: AtomicUsize,
}

impl SequenceRandom {
    /// Create a scripted source. An empty script always yields `0.0`.
    pub fn new(values: Vec<f64>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Number of draws taken so far
    pub fn draws(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }
}

impl RandomSource for SequenceRandom {
    fn next(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        let index = self.cursor.fetch_add(1, Ordering::SeqCst);
        self.values[index % self.values.len()]
    }

    fn next_pair(&self) -> (f64, f64) {
        if self.values.is_empty() {
            return (0.0, 0.0);
        }
        let index = self.cursor.fetch_add(2, Ordering::SeqCst);
        let len = self.values.len();
        (self.values[index % len], self.values[(index + 1) % len])
    }
}
