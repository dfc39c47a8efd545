use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread::JoinHandle;

use eframe::egui::{
    load::SizedTexture, Color32, ColorImage, ComboBox, Context, ProgressBar, RichText,
    ScrollArea, TextureHandle, TextureOptions,
};
use ndarray::Array2;
use rfd::FileDialog;

use libixn_assembler::assembler::{write_all_stacks, AssemblyReport, StackOutcome};
use libixn_assembler::config::Config;
use libixn_assembler::frame::Frame;
use libixn_assembler::position_loader::PreviewSink;
use libixn_assembler::session::Session;
use libixn_assembler::stack_status::StackStatus;

const PREVIEW_WIDTH: f32 = 256.0;

fn render_error_dialog(show: &mut bool, ctx: &Context) {
    eframe::egui::Window::new("Error")
        .open(show)
        .show(ctx, |ui| {
            ui.label(
                "There was an error! Check the log file ixn_assembler.log for more information.",
            )
        });
}

fn runtime_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

/// Scale a 16 bit frame onto 8 bit grey using its own min and max
fn to_color_image(frame: &Array2<u16>) -> ColorImage {
    let (height, width) = frame.dim();
    let min = frame.iter().copied().min().unwrap_or(0);
    let max = frame.iter().copied().max().unwrap_or(0);
    let range = (max - min).max(1) as f32;
    let pixels: Vec<u8> = frame
        .iter()
        .map(|v| ((v - min) as f32 / range * 255.0) as u8)
        .collect();
    ColorImage::from_gray([width, height], &pixels)
}

/// One wavelength of the loaded position
struct PreviewLayer {
    name: String,
    texture: TextureHandle,
    visible: bool,
}

/// The preview panel's layers, filled by the position loader
struct PreviewLayers {
    ctx: Context,
    layers: Vec<PreviewLayer>,
}

impl PreviewSink for PreviewLayers {
    fn clear(&mut self) {
        self.layers.clear();
    }

    fn add_image(&mut self, name: &str, image: Frame, visible: bool) {
        let texture = self
            .ctx
            .load_texture(name, to_color_image(&image), TextureOptions::default());
        self.layers.push(PreviewLayer {
            name: name.to_string(),
            texture,
            visible,
        });
    }
}

/// The UI app which inherits the eframe::App trait.
///
/// Discovery and previews run on the UI thread; writing the stacks runs on a
/// single worker thread which reports back through a channel.
pub struct AssemblerApp {
    session: Session,
    selected_well: String,
    selected_position: String,
    preview: PreviewLayers,
    worker: Option<JoinHandle<AssemblyReport>>,
    status: StackStatus,
    show_error_window: bool,
    worker_rx: mpsc::Receiver<StackStatus>,
    worker_tx: mpsc::Sender<StackStatus>,
}

impl AssemblerApp {
    /// Create the application
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let mut visuals = eframe::egui::Visuals::dark();
        visuals.override_text_color = Some(Color32::LIGHT_GRAY);
        cc.egui_ctx.set_visuals(visuals);
        let (tx, rx) = mpsc::channel::<StackStatus>();
        AssemblerApp {
            session: Session::new(),
            selected_well: String::new(),
            selected_position: String::new(),
            preview: PreviewLayers {
                ctx: cc.egui_ctx.clone(),
                layers: vec![],
            },
            worker: None,
            status: StackStatus::default(),
            show_error_window: false,
            worker_rx: rx,
            worker_tx: tx,
        }
    }

    /// Discover a new experiment and reset the selection widgets
    fn select_directory(&mut self, path: &Path) {
        match self.session.select_directory(path) {
            Ok(descriptor) => {
                self.selected_well = descriptor.wells().first().cloned().unwrap_or_default();
                self.selected_position =
                    descriptor.positions().first().cloned().unwrap_or_default();
            }
            Err(e) => {
                self.show_error_window = true;
                log::error!("Could not open experiment {}: {e}", path.display());
            }
        }
        self.preview.layers.clear();
    }

    fn load_position(&mut self) {
        if let Err(e) = self.session.load_position(
            &self.selected_well,
            &self.selected_position,
            &mut self.preview,
        ) {
            self.show_error_window = true;
            log::error!("Could not load position: {e}");
        }
    }

    fn add_to_write_list(&mut self) {
        if let Err(e) = self.session.add_to_write_list() {
            self.show_error_window = true;
            log::error!("{e}");
        }
    }

    /// Start the worker thread on a snapshot of the queue
    fn start_worker(&mut self) {
        // Safety first
        if self.worker.is_some() {
            return;
        }
        let Some(descriptor) = self.session.descriptor().cloned() else {
            self.show_error_window = true;
            log::error!("Select an experiment directory before writing");
            return;
        };
        let targets = self.session.write_list().targets();
        let channels = self.session.channel_names().clone();
        let tx = self.worker_tx.clone();
        self.status = StackStatus::new(0, targets.len(), "");
        log::info!("Starting assembly of {} positions...", targets.len());
        self.worker = Some(std::thread::spawn(move || {
            write_all_stacks(&descriptor, &targets, &channels, |status| {
                // The UI may have closed; nothing to report to then
                let _ = tx.send(status);
            })
        }));
    }

    /// Collect the worker once it has finished
    fn stop_worker(&mut self) {
        if let Some(worker) = self.worker.take() {
            match worker.join() {
                Ok(report) => {
                    for outcome in report.outcomes.iter() {
                        match outcome {
                            StackOutcome::Written { path, frames } => {
                                log::info!("Wrote {} ({frames} frames)", path.display())
                            }
                            StackOutcome::AlreadyWritten(path) => {
                                log::info!("Skipped {}, it already exists", path.display())
                            }
                        }
                    }
                    for (target, e) in report.failures.iter() {
                        log::error!("Failed to assemble {target}: {e}");
                    }
                    if !report.is_success() {
                        self.show_error_window = true;
                    }
                    log::info!(
                        "Assembly complete: {} written, {} skipped, {} failed",
                        report.n_written(),
                        report.n_skipped(),
                        report.failures.len()
                    );
                }
                Err(_) => {
                    self.show_error_window = true;
                    log::error!("An error occured joining the worker!")
                }
            }
        }
    }

    fn is_worker_alive(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    fn poll_messages(&mut self) {
        loop {
            match self.worker_rx.try_recv() {
                Ok(status) => self.status = status,
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    log::error!("Channels became disconnected!");
                    self.show_error_window = true;
                    break;
                }
            }
        }
    }

    /// Write the current session to a config file
    fn write_config(&mut self, path: &Path) {
        if let Err(e) = self.session.to_config().write_config_file(path) {
            self.show_error_window = true;
            log::error!("Could not write config to {}: {e}", path.display());
        }
    }

    /// Read a config file and set the session up from it
    fn read_config(&mut self, path: &Path) {
        let config = match Config::read_config_file(path) {
            Ok(conf) => conf,
            Err(e) => {
                self.show_error_window = true;
                log::error!("{e}");
                return;
            }
        };
        self.session = Session::new();
        self.preview.layers.clear();
        match self.session.apply_config(&config) {
            Ok(()) => {
                self.selected_well = self.session.wells().first().cloned().unwrap_or_default();
                self.selected_position = self
                    .session
                    .positions()
                    .first()
                    .cloned()
                    .unwrap_or_default();
            }
            Err(e) => {
                self.show_error_window = true;
                log::error!("Could not apply config {}: {e}", path.display());
            }
        }
    }

    fn render_experiment(&mut self, ui: &mut eframe::egui::Ui) {
        let data_path = self
            .session
            .descriptor()
            .map(|d| d.root_directory().display().to_string())
            .unwrap_or(String::from("None"));

        eframe::egui::Grid::new("ExperimentGrid").show(ui, |ui| {
            ui.label(format!("Experiment directory: {data_path}"));
            if ui.button("Open...").clicked() {
                if let Some(path) = FileDialog::new()
                    .set_directory(runtime_directory())
                    .pick_folder()
                {
                    self.select_directory(&path);
                }
            }
            ui.end_row();

            if let Some(descriptor) = self.session.descriptor() {
                ui.label(format!(
                    "{} acquired {}: {} timepoints of {}x{} images",
                    descriptor.experiment_name(),
                    descriptor.acquisition_date(),
                    descriptor.n_timepoints(),
                    descriptor.image_width(),
                    descriptor.image_height()
                ));
                ui.end_row();
            }

            ui.label("Well");
            ComboBox::from_id_source("WellCombo")
                .selected_text(self.selected_well.as_str())
                .show_ui(ui, |ui| {
                    for well in self.session.wells() {
                        ui.selectable_value(&mut self.selected_well, well.clone(), well.as_str());
                    }
                });
            ui.end_row();

            ui.label("Position");
            ComboBox::from_id_source("PositionCombo")
                .selected_text(self.selected_position.as_str())
                .show_ui(ui, |ui| {
                    for position in self.session.positions() {
                        ui.selectable_value(
                            &mut self.selected_position,
                            position.clone(),
                            position.as_str(),
                        );
                    }
                });
            ui.end_row();

            for (idx, slot) in self
                .session
                .channel_names_mut()
                .slots_mut()
                .iter_mut()
                .enumerate()
            {
                ui.label(format!("Channel name w{}", idx + 1));
                ui.text_edit_singleline(slot);
                ui.end_row();
            }
        });
    }
}

impl eframe::App for AssemblerApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_messages();
        render_error_dialog(&mut self.show_error_window, ctx);

        eframe::egui::SidePanel::right("PreviewPanel")
            .min_width(PREVIEW_WIDTH + 16.0)
            .show(ctx, |ui| {
                ui.label(RichText::new("Preview").color(Color32::LIGHT_BLUE).size(18.0));
                ScrollArea::vertical().show(ui, |ui| {
                    for layer in self.preview.layers.iter_mut() {
                        ui.checkbox(&mut layer.visible, layer.name.as_str());
                        if layer.visible {
                            ui.add(
                                eframe::egui::Image::new(SizedTexture::from_handle(&layer.texture))
                                    .max_width(PREVIEW_WIDTH),
                            );
                        }
                    }
                });
            });

        eframe::egui::CentralPanel::default().show(ctx, |ui| {
            //Menus
            ui.menu_button("File", |ui| {
                if ui.button("Open...").clicked() {
                    if let Some(path) = FileDialog::new()
                        .set_directory(runtime_directory())
                        .add_filter("YAML file", &["yaml", "yml"])
                        .pick_file()
                    {
                        self.read_config(&path);
                    }
                }
                if ui.button("Save...").clicked() {
                    if let Some(path) = FileDialog::new()
                        .set_directory(runtime_directory())
                        .add_filter("YAML file", &["yaml", "yml"])
                        .save_file()
                    {
                        self.write_config(&path);
                    }
                }
            });

            ui.separator();
            ui.label(
                RichText::new("Experiment")
                    .color(Color32::LIGHT_BLUE)
                    .size(18.0),
            );
            self.render_experiment(ui);

            let has_experiment = self.session.descriptor().is_some();
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(has_experiment, eframe::egui::Button::new("Load position"))
                    .clicked()
                {
                    self.load_position();
                }
                if ui
                    .add_enabled(
                        self.session.current_position().is_some(),
                        eframe::egui::Button::new("Add to write list"),
                    )
                    .clicked()
                {
                    self.add_to_write_list();
                }
            });

            ui.separator();
            ui.label(
                RichText::new("Write List")
                    .color(Color32::LIGHT_BLUE)
                    .size(18.0),
            );
            ScrollArea::vertical().max_height(160.0).show(ui, |ui| {
                ui.text_edit_multiline(self.session.write_list_mut().buffer_mut());
            });

            // You can only write if there isn't already a worker
            if ui
                .add_enabled(
                    self.worker.is_none() && has_experiment,
                    eframe::egui::Button::new("Write all"),
                )
                .clicked()
            {
                self.start_worker();
            } else if !self.is_worker_alive() {
                self.stop_worker();
            }

            ui.separator();
            ui.add(
                ProgressBar::new(self.status.progress)
                    .text(format!(
                        "{} of {} positions {} - {}%",
                        self.status.targets_done,
                        self.status.n_targets,
                        self.status.stub,
                        self.status.percent()
                    ))
                    .fill(Color32::BLUE),
            );

            ctx.request_repaint_after(std::time::Duration::from_secs(1));
        });
    }
}
