//! Static tab catalog
//!
//! Tab count and order are fixed at startup; only the content bound to a
//! resource-backed tab changes afterwards (wholesale, on refresh).

use crate::infrastructure::cloudrun::ResourceKind;

/// What a tab displays
#[derive(Debug, Clone)]
pub enum ContentSource {
    /// Fixed text rendered as-is
    StaticText(String),
    /// A mutable resource list owned by the app, keyed by kind
    ResourceList(ResourceKind),
}

#[derive(Debug, Clone)]
pub struct TabSpec {
    pub title: &'static str,
    pub content: ContentSource,
    pub preview: &'static str,
}

/// Ordered, read-only catalog of tabs and their content bindings
#[derive(Debug, Clone)]
pub struct TabRegistry {
    tabs: Vec<TabSpec>,
}

impl TabRegistry {
    /// The dashboard's fixed tab set: Services, Jobs, Info.
    pub fn cloud_run(info_text: String) -> Self {
        Self {
            tabs: vec![
                TabSpec {
                    title: "Services",
                    content: ContentSource::ResourceList(ResourceKind::Services),
                    preview: "Cloud Run services in the selected project and region. \
                              Use up/down to select, r to refresh.",
                },
                TabSpec {
                    title: "Jobs",
                    content: ContentSource::ResourceList(ResourceKind::Jobs),
                    preview: "Cloud Run jobs in the selected project and region. \
                              Use up/down to select, r to refresh.",
                },
                TabSpec {
                    title: "Info",
                    content: ContentSource::StaticText(info_text),
                    preview: "Session details: project, region, data mode and the \
                              loaded configuration file.",
                },
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn titles(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.tabs.iter().map(|t| t.title)
    }

    /// Content binding for a tab. The controller keeps `active_tab` in
    /// bounds, so an out-of-range index is a bug and panics.
    pub fn content_for(&self, index: usize) -> &ContentSource {
        &self.tabs[index].content
    }

    pub fn preview_for(&self, index: usize) -> &'static str {
        self.tabs[index].preview
    }

    /// Resource kind backing a tab, if it is list-backed.
    pub fn resource_kind(&self, index: usize) -> Option<ResourceKind> {
        match self.content_for(index) {
            ContentSource::ResourceList(kind) => Some(*kind),
            ContentSource::StaticText(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_tab_order() {
        let registry = TabRegistry::cloud_run(String::new());
        let titles: Vec<_> = registry.titles().collect();
        assert_eq!(titles, vec!["Services", "Jobs", "Info"]);
    }

    #[test]
    fn resource_bindings() {
        let registry = TabRegistry::cloud_run(String::new());
        assert_eq!(registry.resource_kind(0), Some(ResourceKind::Services));
        assert_eq!(registry.resource_kind(1), Some(ResourceKind::Jobs));
        assert_eq!(registry.resource_kind(2), None);
    }

    #[test]
    #[should_panic]
    fn out_of_range_is_a_bug() {
        let registry = TabRegistry::cloud_run(String::new());
        registry.content_for(3);
    }
}
