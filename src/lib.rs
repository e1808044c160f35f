//! # emx-split
//!
//! Split line-oriented text files into chunks of at most N data lines,
//! repeating a fixed-size header block at the top of every chunk.
//!
//! ## Example
//!
//! ```no_run
//! use emx_split::{SplitConfig, Splitter};
//!
//! let config = SplitConfig::new(["exports/*.csv"], 10_000).with_header_lines(1);
//! let report = Splitter::new(config).split()?;
//! println!("{} files split into {} chunks", report.files_processed(), report.output_count());
//! # Ok::<(), emx_split::SplitError>(())
//! ```
//!
//! ## Output Naming
//!
//! A 105-line `orders.csv` with one header line, split by 50, produces:
//!
//! ```text
//! orders_1.csv    header + data lines 1-50
//! orders_2.csv    header + data lines 51-100
//! orders_3.csv    header + data lines 101-104
//! ```
//!
//! Batch numbers are zero-padded to the width of the largest one. With
//! [`BatchNaming::LineRange`] the suffix is the covered range instead
//! (`orders_1-50.csv`, `orders_51-100.csv`, `orders_101-104.csv`).
//!
//! ## Encodings
//!
//! When no encoding is given, it is guessed from the byte-order mark of the
//! first input (see [`sniff_encoding`]). Use [`DetectionMode::PerFile`] to
//! sniff every input separately. Outputs are written in the input's encoding,
//! including its signature bytes.

pub mod config;
pub mod encoding;
pub mod error;
pub mod lines;
pub mod plan;
pub mod sniffer;
pub mod splitter;
pub mod utf7;

pub use config::{DetectionMode, ErrorPolicy, SplitConfig};
pub use encoding::TextEncoding;
pub use error::SplitError;
pub use plan::{Batch, BatchNaming, BatchPlan};
pub use sniffer::{detect_bom, sniff_encoding};
pub use splitter::{FailedInput, FileSplit, OutputFile, SplitReport, Splitter};
