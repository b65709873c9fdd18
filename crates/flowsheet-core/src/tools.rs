//! Tool palette tags.

use crate::shapes::ShapeKind;
use serde::{Deserialize, Serialize};

/// The active tool: the selection pointer, or a creation tool for one of the
/// shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolKind {
    #[default]
    Select,
    Draw(ShapeKind),
}

impl ToolKind {
    /// Resolve a palette tag. Tag 0 is the selection pointer; other tags
    /// name shape kinds. Unknown tags resolve to `None`.
    pub fn from_tag(tag: u8) -> Option<Self> {
        if tag == 0 {
            Some(ToolKind::Select)
        } else {
            ShapeKind::from_tag(tag).map(ToolKind::Draw)
        }
    }

    pub fn tag(self) -> u8 {
        match self {
            ToolKind::Select => 0,
            ToolKind::Draw(kind) => kind.tag(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        assert_eq!(ToolKind::from_tag(0), Some(ToolKind::Select));
        assert_eq!(
            ToolKind::from_tag(5),
            Some(ToolKind::Draw(ShapeKind::Connector))
        );
        assert_eq!(ToolKind::from_tag(99), None);
        assert_eq!(ToolKind::Draw(ShapeKind::Text).tag(), 6);
    }
}
