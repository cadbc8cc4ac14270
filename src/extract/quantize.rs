//! Palette reduction.
//!
//! Distinct colours are counted first. When there are no more of them than
//! requested they are reported as they are; otherwise the pixels are
//! clustered with k-means in sRGB from a fixed seed. Each swatch carries the
//! exact integer mean of its member pixels, so a flat region reduces to its
//! literal colour.

use std::collections::BTreeMap;

use kmeans_colors::get_kmeans;
use palette::Srgb;

use crate::types::Colour;

const MAX_ITERATIONS: usize = 20;
const CONVERGENCE: f32 = 1e-5;
const SEED: u64 = 0x5EED;

/// Cluster indices are stored as `u8`.
const MAX_CLUSTERS: usize = u8::MAX as usize + 1;

/// A reduced colour and the number of sampled pixels it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub colour: Colour,
    pub population: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    count: u32,
    sum: [u64; 3],
}

impl Accumulator {
    fn add(&mut self, px: &[u8; 3]) {
        self.count += 1;
        for (s, &v) in self.sum.iter_mut().zip(px) {
            *s += v as u64;
        }
    }

    fn swatch(&self) -> Option<Swatch> {
        if self.count == 0 {
            return None;
        }
        let n = self.count as u64;
        let mean = |s: u64| ((s + n / 2) / n) as u8;
        Some(Swatch {
            colour: Colour::rgb(mean(self.sum[0]), mean(self.sum[1]), mean(self.sum[2])),
            population: self.count,
        })
    }
}

/// Reduce `pixels` to at most `max_colours` swatches, most populous first.
///
/// Returns an empty list when there are no pixels or `max_colours` is zero.
pub fn quantize(pixels: &[[u8; 3]], max_colours: usize) -> Vec<Swatch> {
    if pixels.is_empty() || max_colours == 0 {
        return Vec::new();
    }

    let mut distinct: BTreeMap<[u8; 3], u32> = BTreeMap::new();
    for px in pixels {
        *distinct.entry(*px).or_default() += 1;
    }

    let swatches = if distinct.len() <= max_colours {
        distinct
            .into_iter()
            .map(|(rgb, population)| Swatch {
                colour: Colour::from(rgb),
                population,
            })
            .collect()
    } else {
        cluster(pixels, max_colours.min(MAX_CLUSTERS))
    };
    by_dominance(swatches)
}

fn cluster(pixels: &[[u8; 3]], k: usize) -> Vec<Swatch> {
    let buf: Vec<Srgb<f32>> = pixels
        .iter()
        .map(|&[r, g, b]| Srgb::new(r, g, b).into_format::<f32>())
        .collect();
    let result = get_kmeans(k, MAX_ITERATIONS, CONVERGENCE, false, &buf, SEED);

    let mut groups = vec![Accumulator::default(); result.centroids.len()];
    for (px, &index) in pixels.iter().zip(&result.indices) {
        if let Some(group) = groups.get_mut(index as usize) {
            group.add(px);
        }
    }
    groups.iter().filter_map(Accumulator::swatch).collect()
}

/// Most populous first; ties by RGB value.
fn by_dominance(mut swatches: Vec<Swatch>) -> Vec<Swatch> {
    swatches.sort_by(|a, b| {
        b.population
            .cmp(&a.population)
            .then_with(|| a.colour.to_rgb().cmp(&b.colour.to_rgb()))
    });
    swatches
}
