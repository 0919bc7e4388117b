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

//! The sketch container and its bit-depth operations.

use crate::error::Error;

/// Sentinel value indicating an empty signature slot
pub const SLOT_EMPTY: u32 = 0;

/// Bits per signature slot.
///
/// Narrower depths shrink the sketch at the cost of more accidental slot
/// collisions between unrelated sets. Downgrading a wide sketch to a narrow
/// depth gives estimates at least as good as building at the narrow depth
/// natively, because the wide values act as tiebreakers during minimum
/// selection before the extra bits are masked away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDepth {
    /// 2 bits per slot. Four slots per byte of payload, but only three
    /// distinguishable non-empty values.
    B2,
    /// 4 bits per slot.
    B4,
    /// 8 bits per slot.
    B8,
    /// 16 bits per slot.
    B16,
    /// 32 bits per slot. The default; loses nothing from the secondary hash.
    B32,
}

impl BitDepth {
    /// Number of bits per slot.
    pub const fn bits(self) -> u32 {
        match self {
            BitDepth::B2 => 2,
            BitDepth::B4 => 4,
            BitDepth::B8 => 8,
            BitDepth::B16 => 16,
            BitDepth::B32 => 32,
        }
    }

    /// The depth for a given bit count, if supported.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::BitDepth;
    /// assert_eq!(BitDepth::from_bits(8), Some(BitDepth::B8));
    /// assert_eq!(BitDepth::from_bits(12), None);
    /// ```
    pub const fn from_bits(bits: u32) -> Option<Self> {
        match bits {
            2 => Some(BitDepth::B2),
            4 => Some(BitDepth::B4),
            8 => Some(BitDepth::B8),
            16 => Some(BitDepth::B16),
            32 => Some(BitDepth::B32),
            _ => None,
        }
    }

    /// Mask selecting the low `bits()` bits of a slot value.
    pub(crate) const fn mask(self) -> u32 {
        match self {
            BitDepth::B32 => u32::MAX,
            _ => (1 << self.bits()) - 1,
        }
    }
}

/// Width-tagged slot storage.
///
/// Depths 2, 4 and 8 share the byte array, with values constrained to the
/// low bits of each element; depths 16 and 32 use their natural word size.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SlotArray {
    U8(Box<[u8]>),
    U16(Box<[u16]>),
    U32(Box<[u32]>),
}

/// A GOPH signature: a fixed-length array of fixed-width minima summarizing
/// a set of 32-bit element hashes.
///
/// A slot value of 0 is reserved to mean "empty" (no element of the set
/// landed in that slot); every nonzero slot holds the minimum secondary hash
/// of the elements that did. Sketches are immutable after construction and
/// safe to share across threads.
///
/// Build sketches with [`GophHasher`](crate::GophHasher), compare them with
/// [`jaccard`](Self::jaccard) or [`jaccard_with`](Self::jaccard_with), and
/// shrink them with [`downgrade`](Self::downgrade).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GophSketch {
    bit_depth: BitDepth,
    slots: SlotArray,
}

impl GophSketch {
    /// Number of slots in the signature.
    pub fn len(&self) -> usize {
        match &self.slots {
            SlotArray::U8(slots) => slots.len(),
            SlotArray::U16(slots) => slots.len(),
            SlotArray::U32(slots) => slots.len(),
        }
    }

    /// Whether the sketch holds no observations (every slot is empty).
    ///
    /// A zero-length sketch is empty as well.
    pub fn is_empty(&self) -> bool {
        self.iter().all(|slot| slot == SLOT_EMPTY)
    }

    /// The declared bits-per-slot of this sketch.
    ///
    /// The depth is carried alongside the buffer, so the probe is O(1) and
    /// distinguishes the three byte-backed depths from one another.
    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// The slot value at `index`, widened to u32.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn slot(&self, index: usize) -> u32 {
        match &self.slots {
            SlotArray::U8(slots) => u32::from(slots[index]),
            SlotArray::U16(slots) => u32::from(slots[index]),
            SlotArray::U32(slots) => slots[index],
        }
    }

    /// Iterate over all slot values (empty slots included), widened to u32.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::GophHasher;
    /// let hasher = GophHasher::try_new(16, 4).unwrap();
    /// let sketch = hasher.sketch([1u32, 2, 3]);
    /// assert_eq!(sketch.iter().count(), 16);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len()).map(move |i| self.slot(i))
    }

    /// Create a sketch from raw byte-backed slots at depth 2, 4 or 8.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind) if
    /// `bit_depth` is not byte-backed or any value does not fit it.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::BitDepth;
    /// # use goph::GophSketch;
    /// let sketch = GophSketch::from_slots_u8(vec![10, 20, 30, 40], BitDepth::B8).unwrap();
    /// assert_eq!(sketch.len(), 4);
    /// assert_eq!(sketch.slot(1), 20);
    /// ```
    pub fn from_slots_u8(slots: Vec<u8>, bit_depth: BitDepth) -> Result<Self, Error> {
        match bit_depth {
            BitDepth::B2 | BitDepth::B4 | BitDepth::B8 => {}
            _ => {
                return Err(Error::invalid_argument(
                    "byte-backed slots require a depth of 2, 4 or 8 bits",
                )
                .with_context("bit_depth", bit_depth.bits()));
            }
        }

        let mask = bit_depth.mask();
        if let Some(value) = slots.iter().find(|&&v| u32::from(v) & !mask != 0) {
            return Err(
                Error::invalid_argument("slot value does not fit the declared depth")
                    .with_context("value", value)
                    .with_context("bit_depth", bit_depth.bits()),
            );
        }

        Ok(Self {
            bit_depth,
            slots: SlotArray::U8(slots.into_boxed_slice()),
        })
    }

    /// Create a 16-bit sketch from raw slots.
    pub fn from_slots_u16(slots: Vec<u16>) -> Self {
        Self {
            bit_depth: BitDepth::B16,
            slots: SlotArray::U16(slots.into_boxed_slice()),
        }
    }

    /// Create a 32-bit sketch from raw slots.
    pub fn from_slots_u32(slots: Vec<u32>) -> Self {
        Self {
            bit_depth: BitDepth::B32,
            slots: SlotArray::U32(slots.into_boxed_slice()),
        }
    }

    /// Materialize a sketch from the builder's widened working buffer.
    ///
    /// Slots still holding `u64::MAX` were never touched by any element and
    /// become the empty marker; everything else fits the depth by
    /// construction.
    pub(crate) fn from_working(working: &[u64], bit_depth: BitDepth) -> Self {
        fn narrowed(slot: u64) -> u32 {
            if slot == u64::MAX {
                SLOT_EMPTY
            } else {
                slot as u32
            }
        }

        let slots = match bit_depth {
            BitDepth::B2 | BitDepth::B4 | BitDepth::B8 => {
                SlotArray::U8(working.iter().map(|&v| narrowed(v) as u8).collect())
            }
            BitDepth::B16 => SlotArray::U16(working.iter().map(|&v| narrowed(v) as u16).collect()),
            BitDepth::B32 => SlotArray::U32(working.iter().map(|&v| narrowed(v)).collect()),
        };

        Self { bit_depth, slots }
    }

    /// Rebuild a container of the same shape from widened slot values.
    fn from_widened(values: impl Iterator<Item = u32>, bit_depth: BitDepth) -> Self {
        let slots = match bit_depth {
            BitDepth::B2 | BitDepth::B4 | BitDepth::B8 => {
                SlotArray::U8(values.map(|v| v as u8).collect())
            }
            BitDepth::B16 => SlotArray::U16(values.map(|v| v as u16).collect()),
            BitDepth::B32 => SlotArray::U32(values.collect()),
        };

        Self { bit_depth, slots }
    }

    /// Produce a copy of this sketch at a lower bit depth.
    ///
    /// Empty slots stay empty. Every other slot keeps the low `target` bits
    /// of its value, with a masked-to-zero result promoted to 1 so it cannot
    /// be mistaken for an empty slot. Because slot values were finalizer-
    /// mixed before masking at build time, the low bits are themselves well
    /// mixed and the downgraded sketch estimates as well as a native build
    /// at the target depth.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind) if
    /// `target` is 32 bits or not strictly below this sketch's depth.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::BitDepth;
    /// # use goph::GophHasher;
    /// let hasher = GophHasher::try_new(128, 4).unwrap();
    /// let wide = hasher.sketch(1..=100u32);
    /// let narrow = wide.downgrade(BitDepth::B8).unwrap();
    /// assert_eq!(narrow.len(), wide.len());
    /// assert_eq!(narrow.bit_depth(), BitDepth::B8);
    /// ```
    pub fn downgrade(&self, target: BitDepth) -> Result<Self, Error> {
        if target == BitDepth::B32 {
            return Err(Error::invalid_argument(
                "downgrade target must be one of 2, 4, 8 or 16 bits",
            ));
        }
        if target.bits() >= self.bit_depth.bits() {
            return Err(
                Error::invalid_argument("downgrade target must be below the source depth")
                    .with_context("source", self.bit_depth.bits())
                    .with_context("target", target.bits()),
            );
        }

        let mask = target.mask();
        let narrowed = self.iter().map(|slot| {
            if slot == SLOT_EMPTY {
                SLOT_EMPTY
            } else {
                match slot & mask {
                    0 => 1,
                    masked => masked,
                }
            }
        });

        Ok(Self::from_widened(narrowed, target))
    }

    /// Merge two sketches built from the same hasher configuration.
    ///
    /// The result is exactly the sketch of the union of the two input sets:
    /// empty slots defer to the other side and doubly-occupied slots keep
    /// the smaller minimum.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::InvalidArgument`](crate::error::ErrorKind) if
    /// the sketches differ in length or bit depth.
    ///
    /// # Examples
    ///
    /// ```
    /// # use goph::GophHasher;
    /// let hasher = GophHasher::try_new(64, 4).unwrap();
    /// let left = hasher.sketch([1u32, 2, 3]);
    /// let right = hasher.sketch([3u32, 4, 5]);
    /// let both = hasher.sketch([1u32, 2, 3, 4, 5]);
    /// assert_eq!(left.union(&right).unwrap(), both);
    /// ```
    pub fn union(&self, other: &GophSketch) -> Result<Self, Error> {
        if self.len() != other.len() {
            return Err(Error::invalid_argument("sketch lengths differ")
                .with_context("left", self.len())
                .with_context("right", other.len()));
        }
        if self.bit_depth != other.bit_depth {
            return Err(Error::invalid_argument("sketch bit depths differ")
                .with_context("left", self.bit_depth.bits())
                .with_context("right", other.bit_depth.bits()));
        }

        let merged = self.iter().zip(other.iter()).map(|(a, b)| match (a, b) {
            (SLOT_EMPTY, b) => b,
            (a, SLOT_EMPTY) => a,
            (a, b) => a.min(b),
        });

        Ok(Self::from_widened(merged, self.bit_depth))
    }
}
