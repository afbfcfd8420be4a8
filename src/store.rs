//! The content store: every section template, in load order.

use crate::content::Node;
use crate::error::{Error, Result};
use crate::formats::Format;
use crate::input;
use crate::section::Section;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Clone, Debug, PartialEq, Eq)]
/// A parsed section ready to be mounted into the display.
pub struct Template {
    /// Unique section key.
    pub id: String,
    /// Pristine content tree; the display always mounts a clone.
    pub root: Node,
}

#[derive(Debug, Default)]
/// Section templates and their searchable records, keyed by id.
///
/// Iteration order is load order, which is what search results and the navigation list follow.
pub struct ContentStore {
    templates: Vec<Template>,
    sections: Vec<Section>,
    index: HashMap<String, usize>,
}

impl ContentStore {
    #[must_use]
    /// Builds a store from templates, extracting a section record from each.
    ///
    /// A later template with an id already present is dropped with a warning.
    pub fn new(templates: Vec<Template>) -> Self {
        let mut store = Self::default();
        for template in templates {
            if store.index.contains_key(&template.id) {
                tracing::warn!(id = %template.id, "duplicate section id, keeping the first");
                continue;
            }
            store
                .index
                .insert(template.id.clone(), store.templates.len());
            store
                .sections
                .push(Section::extract(&template.id, &template.root));
            store.templates.push(template);
        }
        store
    }

    /// Loads every template from the given files.
    ///
    /// A file that fails to parse is logged and skipped so the rest of the documentation stays
    /// browsable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoSections`] if no file produced a template.
    pub fn load(documents: &[PathBuf], format: &impl Format) -> Result<Self> {
        let mut templates = Vec::new();
        for doc in documents {
            match input::load_templates(doc, format) {
                Ok(loaded) => templates.extend(loaded),
                Err(e) => tracing::error!(path = %doc.display(), error = %e, "failed to load"),
            }
        }
        if templates.is_empty() {
            return Err(Error::NoSections);
        }
        let store = Self::new(templates);
        tracing::info!(sections = store.len(), "loaded content store");
        Ok(store)
    }

    #[must_use]
    /// Template for a section id.
    pub fn template(&self, id: &str) -> Option<&Template> {
        self.index.get(id).map(|&i| &self.templates[i])
    }

    #[must_use]
    /// Searchable records in load order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    /// Searchable record for a section id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.index.get(id).map(|&i| &self.sections[i])
    }

    #[must_use]
    /// Number of sections.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    #[must_use]
    /// Whether the store has no sections.
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
