use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolRecord {
    pub name: String,
    pub link: String,
    pub description: String,
}

impl ToolRecord {
    pub fn new(
        name: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self { name: name.into(), link: link.into(), description: description.into() }
    }

    pub fn has_web_link(&self) -> bool {
        is_web_link(&self.link)
    }
}

pub fn is_web_link(link: &str) -> bool {
    link.starts_with("http://") || link.starts_with("https://")
}
