//! Connected components and per-label statistics

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use medvis_core::volume::{step, Neighborhood, Offset};
use medvis_core::{Error, LabelVolume, Mask, Result};

/// Which neighbors count as touching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Connectivity {
    /// 6 face neighbors
    #[default]
    Face,
    /// 26 face, edge and corner neighbors
    Full,
}

impl Connectivity {
    pub fn offsets(&self) -> Vec<Offset> {
        match self {
            Connectivity::Face => Neighborhood::Face.offsets_no_center(),
            Connectivity::Full => Neighborhood::Full.offsets_no_center(),
        }
    }
}

impl fmt::Display for Connectivity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connectivity::Face => f.write_str("face"),
            Connectivity::Full => f.write_str("full"),
        }
    }
}

impl FromStr for Connectivity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "face" | "6" => Ok(Connectivity::Face),
            "full" | "26" => Ok(Connectivity::Full),
            _ => Err(Error::UnsupportedMethod {
                kind: "connectivity",
                name: s.to_string(),
            }),
        }
    }
}

/// Label the connected foreground regions of `mask`.
///
/// Labels start at 1 and follow scan order of each region's first voxel.
/// Returns the label volume and the number of regions.
pub fn label_components(mask: &Mask, connectivity: Connectivity) -> Result<(LabelVolume, usize)> {
    let dims = mask.dims();
    let offsets = connectivity.offsets();
    let src = mask.data();
    let mut labels = Array3::<i32>::zeros(mask.shape());
    let mut queue = VecDeque::new();
    let mut count = 0usize;

    for (pos, &set) in src.indexed_iter() {
        if !set || labels[pos] != 0 {
            continue;
        }
        count += 1;
        let label = i32::try_from(count)
            .map_err(|_| Error::Other("too many connected components for i32 labels".into()))?;
        labels[pos] = label;
        queue.push_back(pos);

        while let Some(p) = queue.pop_front() {
            for &o in &offsets {
                if let Some(n) = step(p, o, dims) {
                    if src[n] && labels[n] == 0 {
                        labels[n] = label;
                        queue.push_back(n);
                    }
                }
            }
        }
    }

    Ok((mask.derive(labels)?, count))
}

/// Size of one labeled region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelStats {
    pub label: i32,
    pub voxel_count: usize,
    /// Share of all voxels in the volume, in [0, 1]
    pub fraction: f64,
}

/// Voxel count and volume fraction of every label >= 1, ascending by label
pub fn label_statistics(labels: &LabelVolume) -> Vec<LabelStats> {
    let total = labels.len() as f64;
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for label in labels.values().filter(|&l| l > 0) {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(label, voxel_count)| LabelStats {
            label,
            voxel_count,
            fraction: voxel_count as f64 / total,
        })
        .collect()
}
