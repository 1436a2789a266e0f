//! Skin bundles and their loading
//!
//! - `assets`: page-wide registry of injected style/behavior assets
//! - `fetch`: where markup comes from (HTTP, a local directory, memory)
//! - `loader`: fetch, normalize, parse and graft a skin into the page

mod assets;
mod fetch;
mod loader;

pub use assets::{AssetKind, AssetRegistry};
pub use fetch::{DirectoryFetcher, FetchResponse, HttpFetcher, MemoryFetcher, SkinFetcher};
pub use loader::{normalize_markup, LoadedSkin, SkinLoader, NO_WRAPPER_ATTR};

pub const STYLE_FILE: &str = "skin.css";
pub const MARKUP_FILE: &str = "skin.html";
pub const BEHAVIOR_FILE: &str = "skin.js";

/// A skin addressed by its base path; the three assets are siblings under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SkinBundle {
    pub path: String,
    pub markup_loaded: bool,
}

impl SkinBundle {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            markup_loaded: false,
        }
    }

    fn asset(&self, file: &str) -> String {
        format!("{}/{}", self.path.trim_end_matches('/'), file)
    }

    pub fn style_path(&self) -> String {
        self.asset(STYLE_FILE)
    }

    pub fn markup_path(&self) -> String {
        self.asset(MARKUP_FILE)
    }

    pub fn behavior_path(&self) -> String {
        self.asset(BEHAVIOR_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_are_siblings_under_the_base_path() {
        let bundle = SkinBundle::new("/skins/basic/");
        assert_eq!(bundle.style_path(), "/skins/basic/skin.css");
        assert_eq!(bundle.markup_path(), "/skins/basic/skin.html");
        assert_eq!(bundle.behavior_path(), "/skins/basic/skin.js");
    }
}
