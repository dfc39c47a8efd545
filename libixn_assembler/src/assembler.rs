use ndarray::{Array3, Axis};
use std::path::{Path, PathBuf};

use super::channel_names::ChannelNames;
use super::error::{AssemblerError, FrameError};
use super::experiment::ExperimentDescriptor;
use super::filename::{is_thumbnail, PositionStub};
use super::frame::read_frame;
use super::stack_status::StackStatus;
use super::stack_writer::write_stack;

/// What happened to one output stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackOutcome {
    Written { path: PathBuf, frames: usize },
    AlreadyWritten(PathBuf),
}

/// The result of a write-all run. Failed targets do not stop later targets.
#[derive(Debug, Default)]
pub struct AssemblyReport {
    pub outcomes: Vec<StackOutcome>,
    pub failures: Vec<(String, AssemblerError)>,
}

impl AssemblyReport {
    pub fn n_written(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, StackOutcome::Written { .. }))
            .count()
    }

    pub fn n_skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, StackOutcome::AlreadyWritten(_)))
            .count()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Timepoint number at the end of a timepoint directory name, e.g. 12 for `TimePoint_12`
fn timepoint_number(source: &Path) -> Result<u32, AssemblerError> {
    source
        .parent()
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
        .and_then(|name| name.rsplit('_').next())
        .and_then(|number| number.parse().ok())
        .ok_or_else(|| AssemblerError::BadTimepointDirectory(source.to_path_buf()))
}

/// Every non-thumbnail image of one wavelength of a stub anywhere under `root`,
/// in timepoint order.
///
/// The order comes from the number in each image's timepoint directory, never from
/// directory name order: `TimePoint_10` sorts after `TimePoint_9`.
pub fn find_sources(
    root: &Path,
    stub: &PositionStub,
    index: u32,
) -> Result<Vec<PathBuf>, AssemblerError> {
    let pattern = format!(
        "{}/**/{}{}*",
        glob::Pattern::escape(&root.to_string_lossy()),
        glob::Pattern::escape(stub.as_str()),
        index
    );

    let mut sources: Vec<(u32, PathBuf)> = Vec::new();
    for entry in glob::glob(&pattern)? {
        let path = entry?;
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().to_string()) else {
            continue;
        };
        if is_thumbnail(&file_name) || !stub.matches(&file_name, index) {
            continue;
        }
        sources.push((timepoint_number(&path)?, path));
    }
    sources.sort_by_key(|(timepoint, _)| *timepoint);
    Ok(sources.into_iter().map(|(_, path)| path).collect())
}

/// Assemble one wavelength of one target into `[timepoint, row, column]` and write it.
///
/// Skips without touching anything if the output already exists.
fn assemble_channel(
    descriptor: &ExperimentDescriptor,
    stub: &PositionStub,
    index: u32,
    channel_name: &str,
) -> Result<StackOutcome, AssemblerError> {
    let output_name = stub.output_file_name(descriptor.acquisition_date(), channel_name);
    let output_path = descriptor.root_directory().join(&output_name);
    if output_path.exists() {
        log::info!("A file named {output_name} already exists, skipping");
        return Ok(StackOutcome::AlreadyWritten(output_path));
    }

    let sources = find_sources(descriptor.root_directory(), stub, index)?;
    let n_frames = descriptor.n_timepoints();
    if sources.len() > n_frames {
        return Err(AssemblerError::TooManyFrames(
            format!("{stub}{index}"),
            sources.len(),
            n_frames,
        ));
    }
    if sources.len() < n_frames {
        log::warn!(
            "Only {} of {} timepoints found for {stub}{index}; trailing frames of {output_name} stay blank",
            sources.len(),
            n_frames
        );
    }

    let height = descriptor.image_height() as usize;
    let width = descriptor.image_width() as usize;
    let mut stack = Array3::<u16>::zeros((n_frames, height, width));
    log::info!(
        "Assembling {output_name} from {} images ({})",
        sources.len(),
        human_bytes::human_bytes((stack.len() * std::mem::size_of::<u16>()) as f64)
    );

    for (k, source) in sources.iter().enumerate() {
        let frame = read_frame(source)?;
        let (frame_height, frame_width) = frame.dim();
        if (frame_height, frame_width) != (height, width) {
            return Err(FrameError::ShapeMismatch(
                source.clone(),
                frame_width,
                frame_height,
                width,
                height,
            )
            .into());
        }
        log::debug!("Frame {k} of {output_name}: {}", source.display());
        stack.index_axis_mut(Axis(0), k).assign(&frame);
    }

    write_stack(&output_path, &stack)?;
    log::info!("Finished writing {output_name}");
    Ok(StackOutcome::Written {
        path: output_path,
        frames: sources.len(),
    })
}

/// Assemble every wavelength of one target, in ascending wavelength order.
///
/// Stops at the first failure; stacks already written for this target are kept.
pub fn assemble_target(
    descriptor: &ExperimentDescriptor,
    stub: &PositionStub,
    channels: &ChannelNames,
) -> Result<Vec<StackOutcome>, AssemblerError> {
    let mut outcomes = Vec::new();
    for index in descriptor.wavelength_indices() {
        let channel_name = channels
            .for_wavelength(index)
            .ok_or(AssemblerError::MissingChannelName(index))?;
        outcomes.push(assemble_channel(descriptor, stub, index, channel_name)?);
    }
    Ok(outcomes)
}

/// Assemble every queued target, sequentially and in queue order.
///
/// `progress` is called after each target, whether it was written, skipped or failed,
/// so a run over finished targets still reaches 100%.
pub fn write_all_stacks(
    descriptor: &ExperimentDescriptor,
    targets: &[String],
    channels: &ChannelNames,
    mut progress: impl FnMut(StackStatus),
) -> AssemblyReport {
    let mut report = AssemblyReport::default();
    let n_targets = targets.len();
    for (n, target) in targets.iter().enumerate() {
        let result = PositionStub::parse(target)
            .map_err(AssemblerError::from)
            .and_then(|stub| assemble_target(descriptor, &stub, channels));
        match result {
            Ok(mut outcomes) => report.outcomes.append(&mut outcomes),
            Err(e) => {
                log::error!("Assembly of {target} failed: {e}");
                report.failures.push((target.clone(), e));
            }
        }
        log::info!("Finished position {} out of {}", n + 1, n_targets);
        progress(StackStatus::new(n + 1, n_targets, target));
    }
    report
}
