// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Jaccard similarity estimation between signatures.
//!
//! The slot-match frequency of two signatures is an unbiased estimator of
//! the Jaccard similarity of the underlying sets: union slots (nonzero on
//! either side) estimate the union density, matching nonzero slots estimate
//! the intersection. Empty-slot masking keeps the estimate unbiased for
//! small sets where many slots never receive an element.
//!
//! On top of the plain estimate, [`JaccardOptions`] unlocks the group
//! structure of the signature: each group is a complete MinHash-like sketch
//! on its own, so the estimator can treat group-wise match counts as
//! Binomial trials and stop scanning as soon as the observed prefix decides
//! the comparison against a threshold with bounded error probability, or
//! simply truncate the scan to a fixed group prefix.

use crate::common::binomial::BinomialTail;
use crate::error::Error;
use crate::sketch::GophSketch;
use crate::sketch::SLOT_EMPTY;

/// Breaks floor/ceil ties when the required match rate lands on an integer.
const TIE_BREAK: f64 = 1e-9;

/// Options for [`GophSketch::jaccard_with`].
///
/// The default options select the plain full scan. Setting `num_groups`
/// enables the grouped scan, which two optional features build on:
///
/// - **Early termination**: `threshold` and `tolerance` (required together)
///   let the estimator stop after a prefix of groups once the binomial tail
///   probability of the remaining groups overturning the decision drops to
///   the tolerance. A confidently-dissimilar exit returns 0.0; a
///   confidently-similar exit returns the estimate extrapolated from the
///   scanned prefix.
/// - **Truncation**: `max_groups` caps the scan at a fixed group prefix and
///   returns the prefix estimate, trading accuracy for speed independently
///   of any threshold.
///
/// # Examples
///
/// ```
/// # use goph::GophHasher;
/// # use goph::JaccardOptions;
/// let hasher = GophHasher::try_new(128, 4).unwrap();
/// let a = hasher.sketch(0..96u32);
/// let b = hasher.sketch(1000..1096u32);
///
/// let options = JaccardOptions::new()
///     .num_groups(4)
///     .threshold(0.95)
///     .tolerance(0.01);
/// // disjoint sets cannot reach the threshold
/// assert_eq!(a.jaccard_with(&b, &options).unwrap(), 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct JaccardOptions {
    num_groups: Option<u32>,
    threshold: Option<f64>,
    tolerance: Option<f64>,
    max_groups: Option<u32>,
}

impl JaccardOptions {
    /// Create empty options (plain full-scan estimation).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the group count the signatures were built with.
    ///
    /// Required by every other option; the signature length must be
    /// divisible by it.
    pub fn num_groups(mut self, num_groups: u32) -> Self {
        self.num_groups = Some(num_groups);
        self
    }

    /// Set the similarity threshold the comparison is tested against.
    ///
    /// Must lie in [0, 1] and be accompanied by [`tolerance`](Self::tolerance).
    pub fn threshold(mut self, threshold: f64) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Set the tolerated probability of a wrong early-exit decision.
    ///
    /// Must lie in (0, 1) and be accompanied by [`threshold`](Self::threshold).
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Cap the scan at the first `max_groups` groups.
    ///
    /// Must lie in [1, num_groups]. Works with or without a threshold.
    pub fn max_groups(mut self, max_groups: u32) -> Self {
        self.max_groups = Some(max_groups);
        self
    }
}

impl GophSketch {
    /// Estimate the Jaccard similarity of the sets behind two signatures.
    ///
    /// Counts union slots (nonzero on either side) and matching nonzero
    /// slots over the full signature and returns their ratio. Signatures
    /// with no union slots (zero-length ones included) compare as 1.0.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind) if
    /// the signature lengths differ.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::BitDepth;
    /// # use goph::GophSketch;
    /// let a = GophSketch::from_slots_u8(vec![10, 20, 30, 40], BitDepth::B8).unwrap();
    /// let b = GophSketch::from_slots_u8(vec![10, 20, 50, 60], BitDepth::B8).unwrap();
    /// assert_eq!(a.jaccard(&b).unwrap(), 0.5);
    /// ```
    pub fn jaccard(&self, other: &GophSketch) -> Result<f64, Error> {
        self.check_comparable(other)?;
        let (matches, union) = self.scan(other, 0, self.len());
        Ok(ratio(matches, union))
    }

    /// Estimate the Jaccard similarity with grouped-scan options.
    ///
    /// With default options this is [`jaccard`](Self::jaccard). See
    /// [`JaccardOptions`] for early termination and truncation.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind) if
    /// the signature lengths differ, or the options are inconsistent:
    /// threshold without tolerance (or vice versa), threshold/tolerance or
    /// max_groups without num_groups, num_groups of zero or not dividing
    /// the length, threshold outside [0, 1], tolerance outside (0, 1), or
    /// max_groups outside [1, num_groups].
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::GophHasher;
    /// # use goph::JaccardOptions;
    /// let hasher = GophHasher::try_new(128, 4).unwrap();
    /// let a = hasher.sketch(0..80u32);
    /// let b = hasher.sketch(40..120u32);
    ///
    /// // truncated scan over the first two groups
    /// let options = JaccardOptions::new().num_groups(4).max_groups(2);
    /// let quick = a.jaccard_with(&b, &options).unwrap();
    /// assert!((0.0..=1.0).contains(&quick));
    /// ```
    pub fn jaccard_with(&self, other: &GophSketch, options: &JaccardOptions) -> Result<f64, Error> {
        self.check_comparable(other)?;

        let JaccardOptions {
            num_groups,
            threshold,
            tolerance,
            max_groups,
        } = *options;

        if threshold.is_some() != tolerance.is_some() {
            return Err(Error::invalid_argument(
                "threshold and tolerance must be supplied together",
            ));
        }

        let Some(groups) = num_groups else {
            if threshold.is_some() || max_groups.is_some() {
                return Err(Error::invalid_argument(
                    "num_groups is required for early termination or truncation",
                ));
            }
            let (matches, union) = self.scan(other, 0, self.len());
            return Ok(ratio(matches, union));
        };

        if groups == 0 {
            return Err(Error::invalid_argument("num_groups must be positive"));
        }
        if self.len() % groups as usize != 0 {
            return Err(Error::invalid_argument(
                "signature length must be divisible by num_groups",
            )
            .with_context("length", self.len())
            .with_context("num_groups", groups));
        }
        if let Some(threshold) = threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::invalid_argument("threshold must be within [0, 1]")
                    .with_context("threshold", threshold));
            }
        }
        if let Some(tolerance) = tolerance {
            if tolerance <= 0.0 || tolerance >= 1.0 {
                return Err(Error::invalid_argument("tolerance must be within (0, 1)")
                    .with_context("tolerance", tolerance));
            }
        }
        let effective_groups = match max_groups {
            None => groups as usize,
            Some(cap) if cap >= 1 && cap <= groups => cap as usize,
            Some(cap) => {
                return Err(
                    Error::invalid_argument("max_groups must be within [1, num_groups]")
                        .with_context("max_groups", cap)
                        .with_context("num_groups", groups),
                );
            }
        };

        let slots_per_group = self.len() / groups as usize;
        let early = threshold.zip(tolerance);
        // One tail evaluator serves every group test of this call
        let tail = early.map(|(threshold, _)| BinomialTail::new(slots_per_group as u64, threshold));

        let mut matches = 0u64;
        let mut union = 0u64;

        for group in 0..effective_groups {
            let start = group * slots_per_group;
            let (group_matches, group_union) = self.scan(other, start, start + slots_per_group);
            matches += group_matches;
            union += group_union;

            if group + 1 == effective_groups {
                break;
            }
            let (Some((threshold, tolerance)), Some(tail)) = (early, tail) else {
                continue;
            };

            // Average matches per remaining group needed to reach the
            // threshold over the whole scan
            let per_group = slots_per_group as f64 * threshold;
            let remaining = (effective_groups - group - 1) as f64;
            let required = (effective_groups as f64 * per_group - matches as f64) / remaining;

            if required < per_group {
                // Trending similar: can the remaining groups still fall
                // below the required rate?
                let q = tail.at_most((required - TIE_BREAK).floor() as i64);
                if q <= tolerance {
                    // Extrapolating matches and union to the full length
                    // scales both by the same factor, so the prefix ratio
                    // already is the extrapolated estimate
                    return Ok(ratio(matches, union));
                }
            } else {
                // Trending dissimilar: can the remaining groups still reach
                // the required rate?
                let q = tail.at_least((required - TIE_BREAK).ceil() as i64);
                if q <= tolerance {
                    return Ok(0.0);
                }
            }
        }

        Ok(ratio(matches, union))
    }

    fn check_comparable(&self, other: &GophSketch) -> Result<(), Error> {
        if self.len() != other.len() {
            return Err(Error::invalid_argument("signature lengths differ")
                .with_context("left", self.len())
                .with_context("right", other.len()));
        }
        Ok(())
    }

    /// Count (matching, union) slots over `start..end`.
    fn scan(&self, other: &GophSketch, start: usize, end: usize) -> (u64, u64) {
        let mut matches = 0u64;
        let mut union = 0u64;
        for i in start..end {
            let a = self.slot(i);
            let b = other.slot(i);
            if a != SLOT_EMPTY || b != SLOT_EMPTY {
                union += 1;
                if a == b {
                    matches += 1;
                }
            }
        }
        (matches, union)
    }
}

fn ratio(matches: u64, union: u64) -> f64 {
    if union == 0 {
        1.0
    } else {
        matches as f64 / union as f64
    }
}
