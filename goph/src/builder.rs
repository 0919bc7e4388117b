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

//! Grouped one-permutation hashing sketch construction.

use crate::error::Error;
use crate::hash::fmix32;
use crate::hash::murmur3_32_u32;
use crate::sketch::BitDepth;
use crate::sketch::GophSketch;

/// A validated sketch configuration that turns element-hash sets into
/// signatures.
///
/// The signature has `num_hashes` slots partitioned into `num_groups`
/// contiguous equal-size groups. Each group corresponds to one hash seed, so
/// the construction interpolates between one-permutation hashing (one group,
/// one hash per element) and classical k-permutation MinHash (many groups,
/// many independent permutations) at the cost of one hash evaluation per
/// element per group.
///
/// Two sketches admit Jaccard estimation iff they were produced by the same
/// configuration from element hashes of the same hash function.
///
/// # Examples
///
/// ```
/// # use goph::GophHasher;
/// let hasher = GophHasher::try_new(128, 4).unwrap();
/// let left = hasher.sketch([1u32, 2, 3, 4]);
/// let right = hasher.sketch([1u32, 2, 3, 4]);
/// assert_eq!(left.jaccard(&right).unwrap(), 1.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct GophHasher {
    num_hashes: u32,
    num_groups: u32,
    bit_depth: BitDepth,
}

impl GophHasher {
    /// Create a hasher producing 32-bit signatures of `num_hashes` slots in
    /// `num_groups` groups.
    ///
    /// The fallible version of this method is [`GophHasher::try_new`].
    ///
    /// # Panics
    ///
    /// Panics if `num_hashes` or `num_groups` is zero or `num_hashes` is not
    /// divisible by `num_groups`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::GophHasher;
    /// let hasher = GophHasher::new(128, 4);
    /// assert_eq!(hasher.slots_per_group(), 32);
    /// ```
    pub fn new(num_hashes: u32, num_groups: u32) -> Self {
        Self::try_new(num_hashes, num_groups).expect("invalid sketch configuration")
    }

    /// Create a hasher producing 32-bit signatures of `num_hashes` slots in
    /// `num_groups` groups.
    ///
    /// The panicking version of this method is [`GophHasher::new`].
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind) if
    /// `num_hashes` or `num_groups` is zero or `num_hashes` is not divisible
    /// by `num_groups`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::GophHasher;
    /// assert!(GophHasher::try_new(128, 4).is_ok());
    /// assert!(GophHasher::try_new(128, 0).is_err());
    /// assert!(GophHasher::try_new(8, 3).is_err());
    /// ```
    pub fn try_new(num_hashes: u32, num_groups: u32) -> Result<Self, Error> {
        if num_hashes == 0 {
            return Err(Error::invalid_argument("num_hashes must be positive"));
        }
        if num_groups == 0 {
            return Err(Error::invalid_argument("num_groups must be positive"));
        }
        if num_hashes % num_groups != 0 {
            return Err(Error::invalid_argument(
                "num_hashes must be divisible by num_groups",
            )
            .with_context("num_hashes", num_hashes)
            .with_context("num_groups", num_groups));
        }

        Ok(Self {
            num_hashes,
            num_groups,
            bit_depth: BitDepth::B32,
        })
    }

    /// Set the bits-per-slot of produced sketches (default 32).
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::BitDepth;
    /// # use goph::GophHasher;
    /// let hasher = GophHasher::try_new(128, 4).unwrap().bit_depth(BitDepth::B8);
    /// assert_eq!(hasher.sketch([7u32]).bit_depth(), BitDepth::B8);
    /// ```
    pub fn bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    /// Signature length N.
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }

    /// Number of groups g (equivalently, hash seeds) per signature.
    pub fn num_groups(&self) -> u32 {
        self.num_groups
    }

    /// Number of slots per group, N / g.
    pub fn slots_per_group(&self) -> u32 {
        self.num_hashes / self.num_groups
    }

    /// Build the signature of a set of element hashes.
    ///
    /// Duplicate elements are tolerated; the minimum update makes them
    /// no-ops. An empty input yields the all-zero sketch.
    ///
    /// Each element is hashed once per group, with the group index as the
    /// seed: the base hash selects a bin within the group, and its
    /// finalizer-mixed value (masked to the configured depth, never zero)
    /// competes for the slot minimum.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::GophHasher;
    /// let hasher = GophHasher::try_new(128, 4).unwrap();
    /// let sketch = hasher.sketch([10u32, 20, 30]);
    /// assert_eq!(sketch.len(), 128);
    /// assert!(!sketch.is_empty());
    ///
    /// let nothing = hasher.sketch(std::iter::empty());
    /// assert!(nothing.is_empty());
    /// ```
    pub fn sketch<I>(&self, elements: I) -> GophSketch
    where
        I: IntoIterator<Item = u32>,
    {
        let slots_per_group = self.slots_per_group();

        // The working buffer is wider than any slot value, so u64::MAX is an
        // unobservable "untouched" sentinel at every depth: a real minimum
        // can never collide with it and be lost at finalization.
        let mut working = vec![u64::MAX; self.num_hashes as usize];

        for element in elements {
            for group in 0..self.num_groups {
                let base = murmur3_32_u32(element, group);
                let bin = base % slots_per_group;
                let slot = (group * slots_per_group + bin) as usize;
                let candidate = u64::from(secondary_hash(base, self.bit_depth));
                if candidate < working[slot] {
                    working[slot] = candidate;
                }
            }
        }

        GophSketch::from_working(&working, self.bit_depth)
    }
}

/// Finalize a base hash into a slot value: avalanche, mask to the depth, and
/// substitute 1 for 0 so the result never collides with the empty marker.
#[inline]
fn secondary_hash(x: u32, bit_depth: BitDepth) -> u32 {
    let mixed = fmix32(x) & bit_depth.mask();
    if mixed == 0 { 1 } else { mixed }
}
