//! Scaling chromosomes so each species fits the drawing width.
//!
//! Chromosomes are drawn centred on their centromere, so what has to fit in
//! the available width is not a whole chromosome but its longer arm. All
//! chromosomes of a species share one scale factor, chosen so that the
//! longest arm among them exactly fills the available width minus a margin.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::ChromosomeRecord;
use crate::numeric::max_float;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("no chromosome records to scale")]
    EmptyRecordSet,
    #[error("longest chromosome arm has zero length, cannot derive a scale")]
    DegenerateScale,
    #[error("available width {available_width} leaves no room after a margin of {margin}")]
    InsufficientWidth { available_width: f64, margin: f64 },
}

/// The on-canvas lengths of the two arms of a chromosome, either side of
/// its centromere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmGeometry {
    /// Drawn from the centromere towards the start of the chromosome.
    pub left: f64,
    /// Drawn from the centromere towards the end of the chromosome.
    pub right: f64,
}

impl ArmGeometry {
    pub fn total(&self) -> f64 {
        self.left + self.right
    }
}

/// The longer of the two arms of a chromosome, in basepairs.
pub fn longest_arm(record: &ChromosomeRecord) -> f64 {
    let centromere = record.centromere_position();
    centromere.max(record.length as f64 - centromere)
}

/// Compute the pixels-per-basepair scale for a set of chromosomes.
///
/// # Arguments
///  * `records`: the chromosomes of one species; their order does not matter.
///  * `available_width`: the space on one side of the centromere, typically
///     half the canvas width.
///  * `margin`: space kept free at the end of the longest arm.
pub fn species_scale<'a, I>(
    records: I,
    available_width: f64,
    margin: f64,
) -> Result<f64, LayoutError>
where
    I: IntoIterator<Item = &'a ChromosomeRecord>,
{
    let max_arm = max_float(records.into_iter().map(longest_arm))
        .ok_or(LayoutError::EmptyRecordSet)?;
    if max_arm <= 0.0 {
        return Err(LayoutError::DegenerateScale);
    }
    let usable = available_width - margin;
    if !usable.is_finite() || usable <= 0.0 {
        return Err(LayoutError::InsufficientWidth {
            available_width,
            margin,
        });
    }
    Ok(usable / max_arm)
}

/// Scale a chromosome's arms into canvas lengths.
pub fn draw_geometry(record: &ChromosomeRecord, scale: f64) -> ArmGeometry {
    let centromere = record.centromere_position();
    ArmGeometry {
        left: scale * centromere,
        right: scale * (record.length as f64 - centromere),
    }
}
