// SPDX-License-Identifier: MIT

//! Review sentiment tagging.
//!
//! Review titles are reduced to an AFINN polarity score and mapped onto
//! four impression buckets. The bucket boundaries are part of the feed
//! contract and must not drift.

use serde::Serialize;

/// Impression tag attached to feed entries carrying a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Impression {
    Positive,
    Negative,
    StrongNegative,
    Surprise,
}

/// Strip everything but ASCII letters and whitespace, then lowercase.
fn normalize(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_ascii_alphabetic() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase()
}

/// Polarity score of a review title.
pub fn polarity(title: &str) -> f32 {
    sentiment::analyze(normalize(title)).score
}

/// Map a polarity score onto the impression buckets.
///
/// A score of exactly zero falls through to `Surprise`: the negative
/// bucket requires a strictly negative score. Scores below -5 also land
/// in `Surprise`.
pub fn bucket(score: f32) -> Impression {
    if score > 0.0 {
        Impression::Positive
    } else if (-2.0..0.0).contains(&score) {
        Impression::Negative
    } else if (-5.0..-2.0).contains(&score) {
        Impression::StrongNegative
    } else {
        Impression::Surprise
    }
}

/// Impression tag for a review title.
pub fn impression_for(title: &str) -> Impression {
    bucket(polarity(title))
}
