/// Weighted sampling without replacement over candidate pools.
use thiserror::Error;

use crate::core::random::RandomSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SampleError {
    #[error("candidate pool is empty")]
    EmptyPool,
    #[error("all {0} candidates have zero weight")]
    DegenerateWeights(usize),
}

/// One eligible entity and its relative weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate<I> {
    pub id: I,
    pub weight: f64,
}

/// The weighted working set for one category during one generation run.
///
/// Order is preserved and is part of the sampling contract: the cumulative
/// scan walks candidates in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePool<I> {
    candidates: Vec<Candidate<I>>,
}

impl<I> Default for CandidatePool<I> {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
        }
    }
}

impl<I: Copy + PartialEq> CandidatePool<I> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a candidate. Negative and NaN weights are stored as zero.
    pub fn push(&mut self, id: I, weight: f64) {
        let weight = if weight > 0.0 { weight } else { 0.0 };
        self.candidates.push(Candidate { id, weight });
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn candidates(&self) -> &[Candidate<I>] {
        &self.candidates
    }

    pub fn ids(&self) -> Vec<I> {
        self.candidates.iter().map(|c| c.id).collect()
    }

    pub fn weight_of(&self, id: I) -> Option<f64> {
        self.candidates.iter().find(|c| c.id == id).map(|c| c.weight)
    }

    pub fn total_weight(&self) -> f64 {
        self.candidates.iter().map(|c| c.weight).sum()
    }

    /// Remove `id` if present. Removing an absent id leaves the pool as is.
    pub fn remove(&mut self, id: I) -> bool {
        let before = self.candidates.len();
        self.candidates.retain(|c| c.id != id);
        self.candidates.len() != before
    }

    /// Choose one candidate without removing it.
    pub fn pick<R>(&self, rng: &mut R) -> Result<I, SampleError>
    where
        R: RandomSource + ?Sized,
    {
        if self.candidates.is_empty() {
            return Err(SampleError::EmptyPool);
        }
        select(&self.candidates, rng.next_unit())
    }

    /// Choose one candidate and remove it, so the next draw cannot repeat it.
    pub fn draw<R>(&mut self, rng: &mut R) -> Result<I, SampleError>
    where
        R: RandomSource + ?Sized,
    {
        let id = self.pick(rng)?;
        self.remove(id);
        Ok(id)
    }
}

impl<I: Copy + PartialEq> FromIterator<(I, f64)> for CandidatePool<I> {
    fn from_iter<T: IntoIterator<Item = (I, f64)>>(iter: T) -> Self {
        let mut pool = Self::new();
        for (id, weight) in iter {
            pool.push(id, weight);
        }
        pool
    }
}

/// Select from `candidates` with a unit draw `u` in `[0, 1)`.
///
/// The draw is scaled to `r = u * total` and the first candidate whose
/// running sum exceeds `r` wins. If rounding leaves no winner (`r` at the
/// very top of the range) the last candidate is returned. A lone candidate
/// is returned even when its weight is zero.
pub fn select<I: Copy>(candidates: &[Candidate<I>], u: f64) -> Result<I, SampleError> {
    let last = candidates.last().ok_or(SampleError::EmptyPool)?;
    let total: f64 = candidates.iter().map(|c| c.weight).sum();

    if total <= 0.0 {
        if candidates.len() == 1 {
            return Ok(last.id);
        }
        return Err(SampleError::DegenerateWeights(candidates.len()));
    }

    let r = u * total;
    let mut cumulative = 0.0;
    for candidate in candidates {
        cumulative += candidate.weight;
        if r < cumulative {
            return Ok(candidate.id);
        }
    }

    Ok(last.id)
}
