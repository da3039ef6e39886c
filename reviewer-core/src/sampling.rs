use rand::seq::SliceRandom;
use rand::Rng;

use crate::identifier::ReviewerId;

/// Pick `number_of_reviewers` distinct entries uniformly at random.
///
/// `None` keeps every candidate. A pool no larger than the requested size is
/// returned whole.
pub fn sample(reviewers: Vec<ReviewerId>, number_of_reviewers: Option<usize>) -> Vec<ReviewerId> {
    sample_with(reviewers, number_of_reviewers, &mut rand::thread_rng())
}

pub fn sample_with<R: Rng + ?Sized>(
    reviewers: Vec<ReviewerId>,
    number_of_reviewers: Option<usize>,
    rng: &mut R,
) -> Vec<ReviewerId> {
    match number_of_reviewers {
        Some(count) if count < reviewers.len() => {
            reviewers.choose_multiple(rng, count).cloned().collect()
        }
        _ => reviewers,
    }
}
