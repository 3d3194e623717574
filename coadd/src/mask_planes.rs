//! Named quality flags and their bit assignments in the mask plane.

use std::collections::BTreeMap;

use common::bits::{lowest_clear_bit, set_bit_indices};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::masked_image::MaskPixel;

/// Number of flag bits available in a mask pixel.
pub const MASK_BITS: u32 = MaskPixel::BITS;

/// Bad pixel (known sensor defect).
pub const BAD: &str = "BAD";
/// Saturated pixel.
pub const SAT: &str = "SAT";
/// Value was interpolated from neighbours.
pub const INTRP: &str = "INTRP";
/// Cosmic ray hit.
pub const CR: &str = "CR";
/// No contributing exposure covered this coadd pixel.
pub const EDGE: &str = "EDGE";
/// Part of a detected source.
pub const DETECTED: &str = "DETECTED";
/// Part of a detected negative source.
pub const DETECTED_NEGATIVE: &str = "DETECTED_NEGATIVE";

const DEFAULT_PLANES: [&str; 7] = [BAD, SAT, INTRP, CR, EDGE, DETECTED, DETECTED_NEGATIVE];

/// Dictionary from flag name to bit index.
///
/// Serialized as a plain `name: bit` map. Deserialization rejects bits that do
/// not fit in a [`MaskPixel`] and two names sharing a bit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct MaskPlanes {
    planes: BTreeMap<String, u32>,
}

impl Default for MaskPlanes {
    /// `BAD`=0, `SAT`=1, `INTRP`=2, `CR`=3, `EDGE`=4, `DETECTED`=5,
    /// `DETECTED_NEGATIVE`=6.
    fn default() -> Self {
        let planes = DEFAULT_PLANES
            .iter()
            .zip(0u32..)
            .map(|(name, bit)| (name.to_string(), bit))
            .collect();
        Self { planes }
    }
}

impl MaskPlanes {
    /// A dictionary with no planes defined.
    pub fn empty() -> Self {
        Self {
            planes: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.planes.contains_key(name)
    }

    /// Bit index of the named plane.
    pub fn plane_bit(&self, name: &str) -> Result<u32> {
        self.planes
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownMaskPlane {
                name: name.to_string(),
            })
    }

    /// Mask value with only the named plane's bit set.
    pub fn plane_bit_mask(&self, name: &str) -> Result<MaskPixel> {
        Ok(1 << self.plane_bit(name)?)
    }

    /// OR of the bit masks of all `names`. An empty list yields `0`.
    pub fn bit_mask_of<I, S>(&self, names: I) -> Result<MaskPixel>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .try_fold(0, |acc, name| Ok(acc | self.plane_bit_mask(name.as_ref())?))
    }

    /// Define a plane, returning its bit.
    ///
    /// An existing name keeps its bit. A new name gets the lowest unused bit.
    pub fn add_plane(&mut self, name: &str) -> Result<u32> {
        if let Some(&bit) = self.planes.get(name) {
            return Ok(bit);
        }
        let bit = lowest_clear_bit(self.used_bits(), MASK_BITS).ok_or_else(|| {
            Error::MaskPlanesExhausted {
                name: name.to_string(),
            }
        })?;
        self.planes.insert(name.to_string(), bit);
        tracing::debug!(plane = name, bit, "Added mask plane");
        Ok(bit)
    }

    /// Plane names ordered by bit index.
    pub fn plane_names(&self) -> Vec<&str> {
        let mut names: Vec<(&str, u32)> = self
            .planes
            .iter()
            .map(|(name, &bit)| (name.as_str(), bit))
            .collect();
        names.sort_by_key(|&(_, bit)| bit);
        names.into_iter().map(|(name, _)| name).collect()
    }

    /// Names of the defined planes whose bits are set in `value`, ordered by bit.
    /// Bits without a name are skipped.
    pub fn describe(&self, value: MaskPixel) -> Vec<&str> {
        set_bit_indices(u64::from(value))
            .filter_map(|bit| {
                self.planes
                    .iter()
                    .find(|&(_, &b)| b == bit)
                    .map(|(name, _)| name.as_str())
            })
            .collect()
    }

    fn used_bits(&self) -> u64 {
        self.planes.values().fold(0u64, |acc, &bit| acc | (1 << bit))
    }
}

impl TryFrom<BTreeMap<String, u32>> for MaskPlanes {
    type Error = Error;

    fn try_from(planes: BTreeMap<String, u32>) -> Result<Self> {
        let mut owners: BTreeMap<u32, &str> = BTreeMap::new();
        for (name, &bit) in &planes {
            if bit >= MASK_BITS {
                return Err(Error::MaskBitOutOfRange {
                    name: name.clone(),
                    bit,
                });
            }
            if let Some(first) = owners.insert(bit, name.as_str()) {
                return Err(Error::DuplicateMaskBit {
                    first: first.to_string(),
                    second: name.clone(),
                    bit,
                });
            }
        }
        Ok(Self { planes })
    }
}

impl From<MaskPlanes> for BTreeMap<String, u32> {
    fn from(planes: MaskPlanes) -> Self {
        planes.planes
    }
}
