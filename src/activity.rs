use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Ordered log of everything the tool did, shown in the terminal pane and
/// persisted verbatim inside the workflow snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    lines: Vec<String>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn as_text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn from_text(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }
}

// Snapshots store the pane as one block of text, not a line array.
impl Serialize for ActivityLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_text())
    }
}

impl<'de> Deserialize<'de> for ActivityLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Ok(Self::from_text(&text))
    }
}
