use serde::{Deserialize, Serialize};

use super::constants::{DEFAULT_PHASE_NAME, MAX_CHANNELS};

/// The channel-name slots used as output suffixes, slot `i` for wavelength `w{i+1}`.
///
/// Slot 1 defaults to the phase label; the others start empty and are normally
/// filled with the filter cubes found by discovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelNames {
    slots: [String; MAX_CHANNELS],
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self {
            slots: [
                String::from(DEFAULT_PHASE_NAME),
                String::new(),
                String::new(),
                String::new(),
            ],
        }
    }
}

impl ChannelNames {
    pub fn new(slots: [String; MAX_CHANNELS]) -> Self {
        Self { slots }
    }

    /// Name for a 1-based wavelength index, None if out of range or blank
    pub fn for_wavelength(&self, index: u32) -> Option<&str> {
        let slot = (index as usize).checked_sub(1)?;
        self.slots
            .get(slot)
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
    }

    pub fn slots(&self) -> &[String; MAX_CHANNELS] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [String; MAX_CHANNELS] {
        &mut self.slots
    }

    /// Put discovered filter cubes into slots 2 and up. Slot 1 keeps the phase label.
    pub fn apply_discovered(&mut self, discovered: &[String]) {
        for (slot, name) in self.slots.iter_mut().zip(discovered.iter()).skip(1) {
            *slot = name.clone();
        }
    }

    /// Replace slots with every non-blank slot of `other`
    pub fn overlay(&mut self, other: &ChannelNames) {
        for (slot, name) in self.slots.iter_mut().zip(other.slots.iter()) {
            if !name.trim().is_empty() {
                *slot = name.clone();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults() {
        let channels = ChannelNames::default();
        assert_eq!(channels.for_wavelength(1), Some("phs"));
        assert_eq!(channels.for_wavelength(2), None);
        assert_eq!(channels.for_wavelength(0), None);
        assert_eq!(channels.for_wavelength(5), None);
    }

    #[test]
    fn test_apply_discovered_keeps_phase() {
        let mut channels = ChannelNames::default();
        channels.apply_discovered(&names(&["Phase", "FITC", "TxRed"]));
        assert_eq!(channels.slots(), &names(&["phs", "FITC", "TxRed", ""])[..]);
    }

    #[test]
    fn test_overlay() {
        let mut channels = ChannelNames::default();
        channels.apply_discovered(&names(&["Phase", "FITC", "TxRed", "DAPI"]));
        let configured = ChannelNames::new([
            String::from("bf"),
            String::from("gfp"),
            String::new(),
            String::from(" "),
        ]);
        channels.overlay(&configured);
        assert_eq!(channels.slots(), &names(&["bf", "gfp", "TxRed", "DAPI"])[..]);
    }
}
