//! Fetching a skin and grafting it into the host page

use std::sync::Arc;

use anyhow::Result;
use indextree::NodeId;

use super::fetch::SkinFetcher;
use super::{AssetKind, SkinBundle};
use crate::error::SkinError;
use crate::page::SharedPage;

/// Marker attribute on the markup root asking to mount the root itself.
/// Only a non-empty value counts; a bare `data-no-wrapper` still wraps.
pub const NO_WRAPPER_ATTR: &str = "data-no-wrapper";

/// Result of a successful load.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedSkin {
    /// Element that replaced the placeholder; the widget's scope root.
    pub mount: NodeId,
    /// The detached placeholder, still holding the host's original content.
    /// The caller frees it once the slots are filled.
    pub content: NodeId,
}

pub struct SkinLoader {
    fetcher: Arc<dyn SkinFetcher>,
    mount_class: String,
}

impl SkinLoader {
    pub fn new(fetcher: Arc<dyn SkinFetcher>, mount_class: impl Into<String>) -> Self {
        Self {
            fetcher,
            mount_class: mount_class.into(),
        }
    }

    /// Style first, then the markup graft, then the behavior script: skin
    /// scripts may assume their markup is already live.
    pub async fn load(
        &self,
        page: &SharedPage,
        bundle: &mut SkinBundle,
        placeholder: NodeId,
        instance_id: &str,
    ) -> Result<LoadedSkin> {
        page.lock()
            .await
            .ensure_asset(AssetKind::Style, &bundle.style_path())?;

        let markup = self.fetch_markup(bundle).await?;

        let mut page = page.lock().await;
        let doc = page.document_mut();
        if !doc.is_attached(placeholder) {
            return Err(SkinError::PlaceholderMissing {
                id: instance_id.to_string(),
            }
            .into());
        }

        let mut nodes = doc.parse_fragment(&markup)?.into_iter();
        let Some(first) = nodes.next() else {
            return Err(SkinError::MalformedMarkup {
                path: bundle.path.clone(),
                reason: "markup has no root node".to_string(),
            }
            .into());
        };

        let mount = if doc.attr(first, NO_WRAPPER_ATTR).is_some_and(|value| !value.is_empty()) {
            doc.remove_attr(first, NO_WRAPPER_ATTR);
            for extra in nodes {
                doc.remove_node(extra);
            }
            first
        } else {
            let wrapper = doc.create_element("div");
            doc.append_child(wrapper, first)?;
            for node in nodes {
                doc.append_child(wrapper, node)?;
            }
            wrapper
        };

        doc.add_class(mount, &self.mount_class);
        doc.set_attr(mount, "id", instance_id);
        doc.replace_node(placeholder, mount)?;
        bundle.markup_loaded = true;

        page.ensure_asset(AssetKind::Behavior, &bundle.behavior_path())?;

        tracing::info!(path = %bundle.path, instance = %instance_id, "Skin mounted");
        Ok(LoadedSkin {
            mount,
            content: placeholder,
        })
    }

    async fn fetch_markup(&self, bundle: &SkinBundle) -> Result<String> {
        let markup_path = bundle.markup_path();
        let response = match self.fetcher.fetch(&markup_path).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(path = %bundle.path, error = %e, "Skin markup fetch failed");
                return Err(SkinError::not_found(bundle.path.as_str()).into());
            }
        };

        if !response.is_success() {
            tracing::error!(path = %bundle.path, status = response.status, "Skin markup not found");
            return Err(SkinError::not_found(bundle.path.as_str()).into());
        }

        Ok(normalize_markup(&response.body))
    }
}

/// Drops newlines and collapses space runs so templated elements do not end
/// up separated by stray text nodes.
///
/// Space pairs are removed outright, so a run of `n` spaces leaves `n % 2`.
pub fn normalize_markup(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut run = 0usize;
    for c in html.trim().chars().filter(|c| *c != '\n' && *c != '\r') {
        if c == ' ' {
            run += 1;
            continue;
        }
        if run % 2 == 1 {
            out.push(' ');
        }
        run = 0;
        out.push(c);
    }
    if run % 2 == 1 {
        out.push(' ');
    }
    out
}
