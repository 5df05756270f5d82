//! Placing every species and chromosome on a page.
//!
//! The page is a single column: each species gets a centred heading, then
//! one row per chromosome with its name at the left and the chromosome
//! itself centred on its centromere in the middle of the page.
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::canvas::{Color, HorizontalAlign, TextStyle, VerticalAlign};
use crate::dataset::{ChromosomeRecord, Dataset};
use crate::layout::{draw_geometry, species_scale, ArmGeometry, LayoutError};
use crate::numeric::format_float;

/// Sizes, spacing and colours of a plot, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotStyle {
    pub width: f64,
    /// Space kept free between the end of a species' longest arm and the
    /// page edge.
    pub margin: f64,
    /// Space above each species heading.
    pub species_gap: f64,
    /// Space between a species heading and its first chromosome.
    pub title_gap: f64,
    pub row_height: f64,
    pub label_x: f64,
    pub title_size: f64,
    pub label_size: f64,
    pub chromosome_width: f64,
    pub centromere_diameter: f64,
    pub bottom_padding: f64,
    pub background: Color,
    pub arm_color: Color,
    pub centromere_color: Color,
    pub text_color: Color,
}

impl Default for PlotStyle {
    fn default() -> Self {
        PlotStyle {
            width: 1200.0,
            margin: 50.0,
            species_gap: 50.0,
            title_gap: 10.0,
            row_height: 30.0,
            label_x: 20.0,
            title_size: 32.0,
            label_size: 20.0,
            chromosome_width: 17.0,
            centromere_diameter: 18.0,
            bottom_padding: 20.0,
            background: Color::gray(220),
            arm_color: Color::gray(150),
            centromere_color: Color::gray(100),
            text_color: Color::BLACK,
        }
    }
}

impl PlotStyle {
    /// Space on each side of the centromere that arms may fill.
    pub fn available_width(&self) -> f64 {
        self.width / 2.0
    }

    pub fn title_style(&self) -> TextStyle {
        TextStyle {
            size: self.title_size,
            align: HorizontalAlign::Center,
            baseline: VerticalAlign::Bottom,
            color: self.text_color,
        }
    }

    pub fn label_style(&self) -> TextStyle {
        TextStyle {
            size: self.label_size,
            align: HorizontalAlign::Left,
            baseline: VerticalAlign::Middle,
            color: self.text_color,
        }
    }
}

/// A chromosome placed on the page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChromosomeRow {
    pub record: ChromosomeRecord,
    /// Where the centromere is drawn.
    pub anchor: (f64, f64),
    pub label_position: (f64, f64),
    pub geometry: ArmGeometry,
}

/// A species heading and its chromosomes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeciesBlock {
    pub name: String,
    pub scale: f64,
    pub title_position: (f64, f64),
    pub rows: Vec<ChromosomeRow>,
}

/// A species left off the page because it could not be scaled.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedSpecies {
    pub name: String,
    pub reason: LayoutError,
}

/// Everything needed to draw a page, with all coordinates resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    pub width: f64,
    pub height: f64,
    pub species: Vec<SpeciesBlock>,
    pub skipped: Vec<SkippedSpecies>,
}

impl PageLayout {
    /// Lay out every species in `dataset`, in table order.
    ///
    /// A species that cannot be scaled is left off the page entirely and
    /// listed in [`PageLayout::skipped`]; the remaining species are still
    /// placed.
    pub fn plan(dataset: &Dataset, style: &PlotStyle) -> PageLayout {
        let center_x = style.width / 2.0;
        let mut y = 0.0;
        let mut species = Vec::with_capacity(dataset.len());
        let mut skipped = Vec::new();

        for (name, chromosomes) in dataset.iter() {
            let scale =
                match species_scale(chromosomes.records(), style.available_width(), style.margin) {
                    Ok(scale) => scale,
                    Err(reason) => {
                        error!("skipping species '{}': {}", name, reason);
                        skipped.push(SkippedSpecies {
                            name: name.clone(),
                            reason,
                        });
                        continue;
                    }
                };
            debug!("species '{}' drawn at {:e} px/bp", name, scale);

            y += style.species_gap;
            let title_position = (center_x, y);
            y += style.title_gap;

            let mut rows = Vec::with_capacity(chromosomes.len());
            for record in chromosomes.records() {
                rows.push(ChromosomeRow {
                    record: record.clone(),
                    anchor: (center_x, y),
                    label_position: (style.label_x, y),
                    geometry: draw_geometry(record, scale),
                });
                y += style.row_height;
            }

            species.push(SpeciesBlock {
                name: name.clone(),
                scale,
                title_position,
                rows,
            });
        }

        PageLayout {
            width: style.width,
            height: y + style.bottom_padding,
            species,
            skipped,
        }
    }

    /// Write the placed chromosomes as a TSV, one row per chromosome.
    ///
    /// The columns are:
    ///
    ///  - species name
    ///  - chromosome name
    ///  - chromosome length          (bp)
    ///  - centromere position        (bp, midpoint of its region)
    ///  - species scale              (pixels per bp)
    ///  - left arm length            (pixels)
    ///  - right arm length           (pixels)
    ///
    /// Skipped species are not written.
    pub fn write_scales<W: Write>(&self, writer: &mut W, header: bool) -> io::Result<()> {
        if header {
            writeln!(
                writer,
                "species\tchromosome\tlength\tcentromere\tscale\tleft_arm\tright_arm"
            )?;
        }
        for block in &self.species {
            for row in &block.rows {
                writeln!(
                    writer,
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    block.name,
                    row.record.id,
                    row.record.length,
                    format_float(row.record.centromere_position()),
                    format_float(block.scale),
                    format_float(row.geometry.left),
                    format_float(row.geometry.right)
                )?;
            }
        }
        Ok(())
    }
}
