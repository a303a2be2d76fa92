use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Order in which query subsequences are visited by the matrix profile driver.
///
/// Each index in `0..len()` is yielded exactly once; after that `next_index`
/// keeps returning `None`.
pub trait OrderStrategy {
    /// Next query start, or `None` once every index has been visited.
    fn next_index(&mut self) -> Option<usize>;

    /// Total number of indices this order visits.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Visits `0, 1, ..., n-1` in order. Required by the STOMP recurrence.
#[derive(Debug, Clone)]
pub struct Sequential {
    n: usize,
    cursor: usize,
}

impl Sequential {
    pub fn new(n: usize) -> Self {
        Self { n, cursor: 0 }
    }
}

impl OrderStrategy for Sequential {
    fn next_index(&mut self) -> Option<usize> {
        if self.cursor < self.n {
            self.cursor += 1;
            Some(self.cursor - 1)
        } else {
            None
        }
    }

    fn len(&self) -> usize {
        self.n
    }
}

/// Visits a seeded, uniformly random permutation of `0..n`.
///
/// The same seed always produces the same permutation.
#[derive(Debug, Clone)]
pub struct Shuffled {
    indices: Vec<usize>,
    cursor: usize,
}

impl Shuffled {
    pub fn new(n: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self::with_rng(n, &mut rng)
    }

    /// Build a permutation from a caller-owned RNG.
    pub fn with_rng<R: rand::Rng + ?Sized>(n: usize, rng: &mut R) -> Self {
        let mut indices: Vec<usize> = (0..n).collect();
        indices.shuffle(rng);
        Self { indices, cursor: 0 }
    }
}

impl OrderStrategy for Shuffled {
    fn next_index(&mut self) -> Option<usize> {
        let idx = self.indices.get(self.cursor).copied();
        if idx.is_some() {
            self.cursor += 1;
        }
        idx
    }

    fn len(&self) -> usize {
        self.indices.len()
    }
}
