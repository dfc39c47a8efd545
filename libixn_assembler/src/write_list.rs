use super::filename::PositionStub;

/// The queue of stubs waiting to be assembled.
///
/// The queue lives in a plain text buffer, one stub per line, which the operator
/// may edit freely. The targets are always derived from the buffer's current text,
/// so edits made between appends are honored. Duplicates are kept; the assembler
/// skips stacks that already exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteList {
    buffer: String,
}

impl WriteList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stub as a new line of the buffer
    pub fn append(&mut self, stub: &PositionStub) {
        if !self.buffer.is_empty() && !self.buffer.ends_with('\n') {
            self.buffer.push('\n');
        }
        self.buffer.push_str(stub.as_str());
    }

    /// The ordered targets, one per non-blank line
    pub fn targets(&self) -> Vec<String> {
        self.buffer
            .split('\n')
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Mutable access for text widgets
    pub fn buffer_mut(&mut self) -> &mut String {
        &mut self.buffer
    }

    pub fn set_buffer(&mut self, text: &str) {
        self.buffer = text.to_string();
    }

    pub fn is_empty(&self) -> bool {
        self.targets().is_empty()
    }
}
