//! # ixn_assembler
//!
//! ixn_assembler turns the per-timepoint image folders written by an ImageXpress Micro
//! (IXN) microscope into one multi-page TIFF stack per well, site and wavelength. Each
//! stack holds one 16-bit frame per timepoint, in acquisition order.
//!
//! ## Installation
//!
//! The only method of install is from source.
//!
//! ### Rust
//!
//! If you have not used Rust before, you will most likely need to install the Rust tool
//! chain. See the [Rust docs](https://www.rust-lang.org/tools/install) for installation
//! instructions.
//!
//! ### Building & Install
//!
//! To build and install the GUI assembler use `cargo install --path ./ixn_assembler` from
//! the top level repository.
//!
//! To build and install the CLI assembler use `cargo install --path ./ixn_assembler_cli`
//! from the top level repository.
//!
//! These binaries will be installed to your cargo install location (typically something
//! like `~/.cargo/bin/`).
//!
//! ## Experiment Layout
//!
//! The assembler expects the folder that the acquisition software writes:
//!
//! ```text
//! my_experiment/
//! |---- TimePoint_1/
//! |    |---- Plate_A01_s1_w1.TIF
//! |    |---- Plate_A01_s1_w1_thumb.TIF
//! |    |---- Plate_A01_s1_w2.TIF
//! |---- TimePoint_2/
//! |    |---- ...
//! ```
//!
//! Image file names follow `<experiment>_<well>_<site>_w<index>...`. Thumbnails (any name
//! containing `thumb`, in any case) are never read. The MetaSeries XML block in the
//! ImageDescription tag of the first image supplies the filter cube of each wavelength.
//!
//! ## Configuration
//!
//! The following controls are available in the GUI:
//!
//! - Experiment directory: the top level folder containing the `TimePoint_*` directories
//! - Channel names: the suffix of each wavelength's output file. The first slot defaults
//! to `phs`; the others are filled with the filter cube names found in the images.
//! - Write list: one position stub per line (e.g. `Plate_A01_s1_w`). The text can be
//! edited directly; whatever it contains when Write All is pressed is what gets written.
//!
//! Configurations can be saved using File->Save and loaded using File->Open. A
//! configuration file saved using the UI is compatible with the CLI and vice-versa. The
//! YAML format of a configuration file is as follows:
//!
//! ```yml
//! data_path: /path/to/my_experiment
//! channel_names:
//! - phs
//! - ''
//! - ''
//! - ''
//! targets:
//! - well: A01
//!   position: s1
//! all_positions: false
//! ```
//!
//! Blank channel names take the filter cube found in the images.
//!
//! ## Output
//!
//! Stacks are written into the experiment directory as
//! `<date>_<experiment>_<well>_<site>_<channel>.tif`, where the date is the acquisition
//! date of the first image. The first page carries a JSON description of the stack shape,
//! `{"shape": [timepoints, height, width]}`. Stacks that already exist are skipped, so a
//! run can be restarted safely. For each wavelength a `<date>_w<index>_metadata.txt`
//! file records the acquisition settings read from the images.
//!
//! The applications also write a log file which records what was written and why a
//! position failed.
pub mod assembler;
pub mod channel_names;
pub mod config;
pub mod constants;
pub mod error;
pub mod experiment;
pub mod filename;
pub mod frame;
pub mod metadata;
pub mod position_loader;
pub mod session;
pub mod stack_status;
pub mod stack_writer;
pub mod write_list;

#[cfg(test)]
mod test_support;
