/// Progress of a write-all run, reported after each target
#[derive(Debug, Clone, Default)]
pub struct StackStatus {
    /// Fraction of targets processed, 0.0 to 1.0
    pub progress: f32,
    /// Number of targets processed so far
    pub targets_done: usize,
    pub n_targets: usize,
    /// The target that was just processed
    pub stub: String,
}

impl StackStatus {
    pub fn new(targets_done: usize, n_targets: usize, stub: &str) -> Self {
        let progress = if n_targets == 0 {
            1.0
        } else {
            targets_done as f32 / n_targets as f32
        };
        Self {
            progress,
            targets_done,
            n_targets,
            stub: stub.to_string(),
        }
    }

    /// Whole percent, as shown on a progress bar
    pub fn percent(&self) -> u32 {
        if self.n_targets == 0 {
            100
        } else {
            (100 * self.targets_done / self.n_targets) as u32
        }
    }
}
