use std::path::Path;

use super::assembler::{write_all_stacks, AssemblyReport};
use super::channel_names::ChannelNames;
use super::config::{Config, Target};
use super::error::{DiscoveryError, LoaderError, SessionError};
use super::filename::PositionStub;
use super::experiment::{list_image_names, ExperimentDescriptor};
use super::position_loader::{load_position, LoadedPosition, PreviewSink};
use super::stack_status::StackStatus;
use super::write_list::WriteList;

/// The state a front-end keeps between operator actions.
///
/// Holds the current experiment, the channel-name slots, the last loaded position
/// and the write list. Every operation takes the session explicitly; nothing is global.
#[derive(Debug, Default)]
pub struct Session {
    descriptor: Option<ExperimentDescriptor>,
    channel_names: ChannelNames,
    current: Option<LoadedPosition>,
    write_list: WriteList,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discover the experiment under `root`, replacing any previous one.
    ///
    /// Channel slots 2 and up are filled with the discovered filter cubes. The write
    /// list is kept.
    pub fn select_directory(&mut self, root: &Path) -> Result<&ExperimentDescriptor, SessionError> {
        let descriptor = ExperimentDescriptor::discover(root)?;
        self.channel_names
            .apply_discovered(descriptor.channel_names());
        self.current = None;
        Ok(self.descriptor.insert(descriptor))
    }

    pub fn descriptor(&self) -> Option<&ExperimentDescriptor> {
        self.descriptor.as_ref()
    }

    fn require_descriptor(&self) -> Result<&ExperimentDescriptor, SessionError> {
        self.descriptor.as_ref().ok_or(SessionError::NoExperiment)
    }

    /// Wells for selection widgets; empty before discovery
    pub fn wells(&self) -> &[String] {
        self.descriptor.as_ref().map_or(&[], |d| d.wells())
    }

    pub fn positions(&self) -> &[String] {
        self.descriptor.as_ref().map_or(&[], |d| d.positions())
    }

    pub fn wavelengths(&self) -> &[String] {
        self.descriptor.as_ref().map_or(&[], |d| d.wavelengths())
    }

    /// Preview a well/position and remember it as the current selection
    pub fn load_position<S: PreviewSink + ?Sized>(
        &mut self,
        well: &str,
        position: &str,
        sink: &mut S,
    ) -> Result<&LoadedPosition, SessionError> {
        let loaded = load_position(self.require_descriptor()?, well, position, sink)?;
        Ok(self.current.insert(loaded))
    }

    pub fn current_position(&self) -> Option<&LoadedPosition> {
        self.current.as_ref()
    }

    /// Queue the currently loaded position
    pub fn add_to_write_list(&mut self) -> Result<(), SessionError> {
        let current = self.current.as_ref().ok_or(SessionError::NoSelection)?;
        self.write_list.append(&current.stub);
        Ok(())
    }

    /// Queue a well/position without previewing it
    pub fn queue(&mut self, well: &str, position: &str) -> Result<(), SessionError> {
        let descriptor = self.require_descriptor()?;
        if !descriptor.has_well(well) {
            return Err(LoaderError::UnknownWell(well.to_string()).into());
        }
        if !descriptor.has_position(position) {
            return Err(LoaderError::UnknownPosition(position.to_string()).into());
        }
        let stub = descriptor.stub(well, position);
        self.write_list.append(&stub);
        Ok(())
    }

    pub fn write_list(&self) -> &WriteList {
        &self.write_list
    }

    pub fn write_list_mut(&mut self) -> &mut WriteList {
        &mut self.write_list
    }

    pub fn channel_names(&self) -> &ChannelNames {
        &self.channel_names
    }

    pub fn channel_names_mut(&mut self) -> &mut ChannelNames {
        &mut self.channel_names
    }

    /// Set the session up from a saved configuration.
    ///
    /// Discovers the configured experiment, then lays the non-blank configured channel
    /// names over the discovered ones and queues the configured targets. With
    /// `all_positions` set, every well/position imaged at the first timepoint is queued.
    pub fn apply_config(&mut self, config: &Config) -> Result<(), SessionError> {
        if !config.is_data_path_valid() {
            return Err(SessionError::BadDataPath(config.data_path.clone()));
        }
        self.select_directory(&config.data_path)?;
        self.channel_names.overlay(&config.channel_names);

        if config.all_positions {
            let descriptor = self.require_descriptor()?;
            let file_names = list_image_names(&descriptor.first_timepoint_directory())
                .map_err(DiscoveryError::from)?;
            let stubs: Vec<PositionStub> = descriptor
                .wells()
                .iter()
                .flat_map(|well| {
                    descriptor
                        .positions()
                        .iter()
                        .map(move |position| descriptor.stub(well, position))
                })
                .filter(|stub| file_names.iter().any(|name| name.starts_with(stub.as_str())))
                .collect();
            for stub in stubs.iter() {
                self.write_list.append(stub);
            }
        } else {
            for target in config.targets.iter() {
                self.queue(&target.well, &target.position)?;
            }
        }
        Ok(())
    }

    /// The queued stubs as well/position pairs. Lines that are not valid stubs are dropped.
    pub fn queued_targets(&self) -> Vec<Target> {
        self.write_list
            .targets()
            .iter()
            .filter_map(|line| match PositionStub::parse(line) {
                Ok(stub) => stub.well_and_position().map(|(well, position)| Target {
                    well: well.to_string(),
                    position: position.to_string(),
                }),
                Err(e) => {
                    log::warn!("Not saving write list entry: {e}");
                    None
                }
            })
            .collect()
    }

    /// Capture the session as a configuration that can be written to disk
    pub fn to_config(&self) -> Config {
        let mut config = Config {
            channel_names: self.channel_names.clone(),
            targets: self.queued_targets(),
            ..Default::default()
        };
        if let Some(descriptor) = self.descriptor.as_ref() {
            config.data_path = descriptor.root_directory().to_path_buf();
        }
        config
    }

    /// Assemble every queued target on the calling thread
    pub fn write_all(
        &self,
        progress: impl FnMut(StackStatus),
    ) -> Result<AssemblyReport, SessionError> {
        let descriptor = self.require_descriptor()?;
        let targets = self.write_list.targets();
        log::info!("Writing {} queued positions...", targets.len());
        Ok(write_all_stacks(
            descriptor,
            &targets,
            &self.channel_names,
            progress,
        ))
    }
}
