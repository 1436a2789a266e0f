//! Page-wide record of injected skin assets

use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssetKind {
    Style,
    Behavior,
}

impl AssetKind {
    pub fn tag(self) -> &'static str {
        match self {
            Self::Style => "link",
            Self::Behavior => "script",
        }
    }

    /// Attribute that carries the asset path on its element.
    pub fn locator_attr(self) -> &'static str {
        match self {
            Self::Style => "href",
            Self::Behavior => "src",
        }
    }

    pub fn attributes(self, path: &str) -> [(&'static str, String); 2] {
        match self {
            Self::Style => [("rel", "stylesheet".to_string()), ("href", path.to_string())],
            Self::Behavior => [("src", path.to_string()), ("type", "text/javascript".to_string())],
        }
    }
}

/// Asset paths already present on the page. Entries are never removed.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry {
    injected: HashSet<String>,
}

impl AssetRegistry {
    pub fn contains(&self, path: &str) -> bool {
        self.injected.contains(path)
    }

    /// Records `path`; returns `false` if it was already recorded.
    pub fn claim(&mut self, path: &str) -> bool {
        self.injected.insert(path.to_string())
    }

    pub fn len(&self) -> usize {
        self.injected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.injected.is_empty()
    }
}
