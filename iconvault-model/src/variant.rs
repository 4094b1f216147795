use std::fmt;

/// Which of the two mutually exclusive cache variants an icon was stored as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Tintability {
    /// Colors are baked into the document.
    Plain,
    /// The document references `currentColor` and accepts a runtime tint.
    Tintable,
}

impl Tintability {
    pub fn is_tintable(self) -> bool {
        matches!(self, Tintability::Tintable)
    }
}

impl From<bool> for Tintability {
    fn from(tintable: bool) -> Self {
        if tintable {
            Tintability::Tintable
        } else {
            Tintability::Plain
        }
    }
}

impl fmt::Display for Tintability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tintability::Plain => f.write_str("plain"),
            Tintability::Tintable => f.write_str("tintable"),
        }
    }
}
