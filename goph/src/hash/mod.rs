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

//! Hash functions used by the sketch builder and exposed as conveniences.
//!
//! The sketch core only requires that element hashes are well-mixed 32-bit
//! unsigned integers; it does not care how the caller produced them. The
//! functions here cover the common case of hashing raw features (byte
//! sequences) down to that domain.
//!
//! In order to compare two sketches it is critical that both were built from
//! element hashes produced by the same hash function: the estimator assumes a
//! 1:1 relationship between an original feature and its hashed value, and
//! mixing hash functions across sketches silently breaks that relationship.
//! Once you have a corpus of stored sketches you are stuck with the function
//! that produced it.

mod fnv;
mod murmurhash;

pub use self::fnv::fnv1a_32;
pub use self::murmurhash::fmix32;
pub use self::murmurhash::murmur3_32;
pub use self::murmurhash::murmur3_32_u32;
