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

//! Grouped one-permutation hashing (GOPH) sketches for Jaccard similarity.
//!
//! This crate provides a probabilistic data structure for estimating the
//! Jaccard similarity of large sets with small, fixed-size signatures. It is
//! built for near-duplicate detection: hash the features of each document
//! down to a set of 32-bit integers, sketch each set once, and compare
//! sketches instead of sets.
//!
//! # Overview
//!
//! A [`GophHasher`] turns a set of element hashes into a [`GophSketch`] of
//! `num_hashes` slots split into `num_groups` equal groups. Each group is
//! one MinHash-style permutation: every element is hashed once per group
//! with the group index as the seed, lands in one bin of that group, and the
//! slot keeps the minimum finalized value seen. A slot that no element ever
//! reached stays 0, the reserved empty marker, which keeps estimates
//! unbiased for sets too small to fill the signature.
//!
//! The grouped layout interpolates between one-permutation hashing (one
//! group, cheapest) and classical k-permutation MinHash (one group per
//! slot, most precise) while paying only `num_groups` hash evaluations per
//! element.
//!
//! # Bit depth
//!
//! Sketches can be built at 2, 4, 8, 16 or 32 bits per slot ([`BitDepth`]),
//! and a wide sketch can be [`downgraded`](GophSketch::downgrade) to any
//! narrower depth later. Because slot values are avalanche-mixed before
//! masking, the downgraded sketch is distributed exactly like a native
//! narrow build, with the wide bits having served as tiebreakers: build
//! wide, store narrow.
//!
//! # Estimation
//!
//! [`GophSketch::jaccard`] scans two equal-length signatures and returns
//! the matched fraction of occupied slots. [`GophSketch::jaccard_with`]
//! additionally understands the group structure: given a similarity
//! threshold and an error tolerance it stops scanning as soon as a binomial
//! tail bound decides the comparison, and given a group cap it estimates
//! from a prefix of the signature only.
//!
//! # Usage
//!
//! ```rust
//! # use goph::GophHasher;
//! # use goph::JaccardOptions;
//! let hasher = GophHasher::try_new(256, 8).unwrap();
//!
//! let doc_a = hasher.sketch((0..600u32).map(|f| f * 31));
//! let doc_b = hasher.sketch((200..800u32).map(|f| f * 31));
//!
//! let exact = doc_a.jaccard(&doc_b).unwrap();
//! assert!(exact > 0.0 && exact < 1.0);
//!
//! // stop early when the sketches are clearly on one side of 0.9
//! let options = JaccardOptions::new()
//!     .num_groups(8)
//!     .threshold(0.9)
//!     .tolerance(0.01);
//! let decided = doc_a.jaccard_with(&doc_b, &options).unwrap();
//! assert!(decided < 0.9);
//! ```

pub mod error;
pub mod hash;

mod builder;
mod estimator;
mod sketch;

pub(crate) mod common;

pub use self::builder::GophHasher;
pub use self::estimator::JaccardOptions;
pub use self::sketch::BitDepth;
pub use self::sketch::GophSketch;
pub use self::sketch::SLOT_EMPTY;
