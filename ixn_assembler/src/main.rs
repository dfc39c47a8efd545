//! # ixn_assembler
//!
//! Part of the ixn_assembler crate family.
//!
//! This is the application to assemble IXN timelapse stacks with a GUI using [egui](https://github.com/emilk/egui).
//!
//! ## Install
//!
//! Use `cargo install --path ./ixn_assembler`
//!
//! ## Use
//!
//! To launch the application simply invoke it after it is installed
//!
//! ```bash
//! ixn_assembler
//! ```
//!
//! Open an experiment directory, pick a well and position, and click Load position to
//! preview the first timepoint of each wavelength. Add the positions you want to the
//! write list, check the channel names, then click Write all.
//!
//! ## Configuration
//!
//! The following controls are available in the GUI:
//!
//! - Experiment directory: the folder containing the `TimePoint_*` directories
//! - Well / Position: the selection to preview
//! - Channel name w1..w4: the output suffix for each wavelength
//! - Write list: one position stub per line, freely editable
//!
//! Configurations can be saved using File->Save and loaded using File->Open

mod app;
use app::AssemblerApp;
use std::fs::File;

/// The program entry point
fn main() {
    // Setup logging to a file
    match File::create("./ixn_assembler.log") {
        Ok(log_file) => {
            if let Err(e) = simplelog::WriteLogger::init(
                simplelog::LevelFilter::Info,
                simplelog::ConfigBuilder::new()
                    .set_thread_level(simplelog::LevelFilter::Error)
                    .build(),
                log_file,
            ) {
                eprintln!("Could not initialize logging: {e}");
            }
        }
        Err(e) => eprintln!("Could not create log file: {e}"),
    }
    log::info!("Starting IXN Assembler UI");

    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("IXN Assembler")
            .with_inner_size(eframe::epaint::vec2(900.0, 600.0))
            .with_min_inner_size(eframe::epaint::vec2(700.0, 400.0)),
        ..Default::default()
    };
    match eframe::run_native(
        "ixn_assembler",
        native_options,
        Box::new(|cc| Ok(Box::new(AssemblerApp::new(cc)))),
    ) {
        Ok(()) => (),
        Err(e) => log::error!("Eframe error: {}", e),
    }
}
