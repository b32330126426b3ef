//! Uniform random choice among picture candidates.

use rand::seq::IndexedRandom;
use rand::Rng;

use crate::source::CandidatePost;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PickError {
    /// Nothing to choose from. Callers check for emptiness first, so this
    /// indicates a bug.
    #[error("cannot pick from an empty candidate set")]
    EmptyCandidateSet,
}

/// Choose one candidate, each with probability `1 / candidates.len()`.
pub fn pick<'a, R>(
    candidates: &'a [CandidatePost],
    rng: &mut R,
) -> Result<&'a CandidatePost, PickError>
where
    R: Rng + ?Sized,
{
    candidates.choose(rng).ok_or(PickError::EmptyCandidateSet)
}
