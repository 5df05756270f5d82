//! Reading centromere tables and drawing chromosome ideograms.
//!
//! A [`Dataset`] is loaded from a tab-separated table of chromosome lengths
//! and centromeric regions for one or more species. Each species gets its own
//! scale factor so that its longest chromosome arm fills the available width,
//! and every chromosome is drawn as a horizontal bar centred on its
//! centromere.
//!
//! Here is an example which loads a table and prints each species' scale
//! and the drawn arm lengths of its chromosomes.
//!
//! ```no_run
//! use karyoplot::prelude::*;
//! let dataset = Dataset::from_tsv("centromeric-regions.tsv")
//!                   .expect("could not read table");
//!
//! for (species, chromosomes) in dataset.iter() {
//!     let scale = species_scale(chromosomes.records(), 500.0, 50.0)
//!                     .expect("cannot scale species");
//!     for record in chromosomes.records() {
//!         let arms = draw_geometry(record, scale);
//!         println!("{}\t{}\t{}\t{}", species, record.id, arms.left, arms.right);
//!     }
//! }
//! ```
//!
//! Drawing a whole page goes through [`PageLayout`] and any [`Canvas`]:
//!
//! ```no_run
//! use karyoplot::prelude::*;
//! let dataset = Dataset::from_tsv("centromeric-regions.tsv")
//!                   .expect("could not read table");
//! let style = PlotStyle::default();
//! let page = PageLayout::plan(&dataset, &style);
//! write_svg(&page, &style, "chromosomes.svg").expect("could not write SVG");
//! ```

pub mod canvas;
pub mod dataset;
pub mod file;
pub mod layout;
pub mod numeric;
pub mod plot;
pub mod render;

pub use canvas::{Canvas, SvgCanvas};
pub use dataset::{ChromosomeRecord, Dataset, DatasetError, Position, SpeciesChromosomes};
pub use layout::{draw_geometry, longest_arm, species_scale, ArmGeometry, LayoutError};
pub use plot::{PageLayout, PlotStyle};
pub use render::{render, write_svg, RenderError};

pub mod prelude {
    pub use crate::canvas::{Canvas, Color, SvgCanvas};
    pub use crate::dataset::{ChromosomeRecord, Dataset, DatasetError};
    pub use crate::layout::{draw_geometry, species_scale, ArmGeometry, LayoutError};
    pub use crate::plot::{PageLayout, PlotStyle};
    pub use crate::render::{render, render_svg, write_svg, RenderError};
}
