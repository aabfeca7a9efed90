//! Vertical projection of a lead region into a 1-D trace

use image::GrayImage;

use super::layout::LeadRegion;

/// Column-wise summed intensity of one lead region
///
/// One value per raster column of the region. After [`ProfileBuilder::build`]
/// the values lie in `[0, 1]`, or are all zero for a blank region.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SignalProfile {
    values: Vec<f64>,
}

impl SignalProfile {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Largest value, or 0.0 for an empty profile
    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(0.0, f64::max)
    }

    /// Profile has no ink at all
    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }
}

/// Builds normalized signal profiles from raster regions
#[derive(Debug, Clone, Default)]
pub struct ProfileBuilder;

impl ProfileBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Sum each column of `region` and scale by the largest column sum
    ///
    /// Regions reaching past the raster edge are clipped to it. A region
    /// without ink yields an all-zero profile of the region's width.
    pub fn build(&self, raster: &GrayImage, region: &LeadRegion) -> SignalProfile {
        let right = region.right.min(raster.width());
        let bottom = region.bottom.min(raster.height());
        let left = region.left.min(right);
        let top = region.top.min(bottom);

        let mut values: Vec<f64> = (left..right)
            .map(|x| {
                (top..bottom)
                    .map(|y| f64::from(raster.get_pixel(x, y)[0]))
                    .sum::<f64>()
            })
            .collect();

        let peak = values.iter().copied().fold(0.0, f64::max);
        if peak > 0.0 {
            for value in &mut values {
                *value /= peak;
            }
        }

        SignalProfile { values }
    }
}
