//! Label table mapping model class ids to sign classes

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{SignClass, TrafficObjectError};

/// One entry of the label table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    /// Human-readable name as written in the label file
    pub name: String,

    /// Sign class the name resolves to
    pub class: SignClass,
}

/// Class id to label mapping, loaded once at startup.
///
/// File format is one `<class_id> <name>` pair per line. Blank lines and
/// lines starting with `#` are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelTable {
    labels: BTreeMap<u32, Label>,
}

impl LabelTable {
    /// Parse a label table from its text form
    pub fn parse(text: &str) -> Result<Self, TrafficObjectError> {
        let mut labels = BTreeMap::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = || TrafficObjectError::MalformedLabel {
                line: idx + 1,
                content: raw.to_string(),
            };

            let (id, name) = line.split_once(char::is_whitespace).ok_or_else(malformed)?;
            let id: u32 = id.parse().map_err(|_| malformed())?;
            let name = name.trim();
            let class: SignClass = name.parse()?;

            debug!("Label {} -> {} ({:?})", id, name, class);
            let label = Label {
                name: name.to_string(),
                class,
            };
            if labels.insert(id, label).is_some() {
                return Err(TrafficObjectError::DuplicateClassId(id));
            }
        }

        Ok(Self { labels })
    }

    /// Load a label table from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TrafficObjectError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let table = Self::parse(&text)?;
        info!("Loaded {} labels from {}", table.len(), path.display());
        Ok(table)
    }

    /// Look up a class id
    pub fn get(&self, class_id: u32) -> Option<&Label> {
        self.labels.get(&class_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &Label)> {
        self.labels.iter().map(|(id, label)| (*id, label))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl Default for LabelTable {
    /// Labels of the stock road sign model
    fn default() -> Self {
        let labels = [
            (0, "Green Light", SignClass::GreenLight),
            (1, "Person", SignClass::Person),
            (2, "Red Light", SignClass::RedLight),
            (3, "Speed Limit 25", SignClass::SpeedLimit(25)),
            (4, "Speed Limit 40", SignClass::SpeedLimit(40)),
            (5, "Stop", SignClass::StopSign),
        ]
        .into_iter()
        .map(|(id, name, class)| {
            (
                id,
                Label {
                    name: name.to_string(),
                    class,
                },
            )
        })
        .collect();

        Self { labels }
    }
}
