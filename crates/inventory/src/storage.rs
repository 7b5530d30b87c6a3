//! Where things live and what they live in.

use serde::{Deserialize, Serialize};

/// Storage location of a list item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Counter,
    Pantry,
    Fridge,
    Freezer,
    Closet,
}

impl Location {
    pub fn as_str(self) -> &'static str {
        match self {
            Location::Counter => "counter",
            Location::Pantry => "pantry",
            Location::Fridge => "fridge",
            Location::Freezer => "freezer",
            Location::Closet => "closet",
        }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nominal volume of a liquid container.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageSize {
    Pint,
    Quart,
    HalfGallon,
    Gallon,
}

/// One allowed way of dividing a container.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SplitOption {
    pub target: StorageSize,
    pub count: u32,
}

const GALLON_SPLITS: [SplitOption; 3] = [
    SplitOption { target: StorageSize::HalfGallon, count: 2 },
    SplitOption { target: StorageSize::Quart, count: 4 },
    SplitOption { target: StorageSize::Pint, count: 8 },
];

const HALF_GALLON_SPLITS: [SplitOption; 2] = [
    SplitOption { target: StorageSize::Quart, count: 2 },
    SplitOption { target: StorageSize::Pint, count: 4 },
];

const QUART_SPLITS: [SplitOption; 1] = [SplitOption { target: StorageSize::Pint, count: 2 }];

impl StorageSize {
    pub fn as_str(self) -> &'static str {
        match self {
            StorageSize::Pint => "pint",
            StorageSize::Quart => "quart",
            StorageSize::HalfGallon => "half_gallon",
            StorageSize::Gallon => "gallon",
        }
    }

    /// Volume in pints.
    pub fn pints(self) -> u32 {
        match self {
            StorageSize::Pint => 1,
            StorageSize::Quart => 2,
            StorageSize::HalfGallon => 4,
            StorageSize::Gallon => 8,
        }
    }

    /// The fixed conversion table. A pint cannot be split.
    pub fn split_options(self) -> &'static [SplitOption] {
        match self {
            StorageSize::Gallon => &GALLON_SPLITS,
            StorageSize::HalfGallon => &HALF_GALLON_SPLITS,
            StorageSize::Quart => &QUART_SPLITS,
            StorageSize::Pint => &[],
        }
    }

    /// Number of `target` containers this one divides into, if allowed.
    pub fn split_count(self, target: StorageSize) -> Option<u32> {
        self.split_options()
            .iter()
            .find(|option| option.target == target)
            .map(|option| option.count)
    }
}

impl core::fmt::Display for StorageSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Divide `total` uses across `count` portions.
///
/// Floor division; the remainder goes one use each to the first portions, so the
/// portions always sum to `total`. Returns an empty vector for `count == 0`.
pub fn divide_uses(total: u32, count: u32) -> Vec<u32> {
    if count == 0 {
        return Vec::new();
    }
    let base = total / count;
    let remainder = total % count;
    (0..count)
        .map(|idx| if idx < remainder { base + 1 } else { base })
        .collect()
}
