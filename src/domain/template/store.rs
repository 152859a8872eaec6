//! Template registry for a single run

use dashmap::DashMap;

use super::types::{Template, TemplateError, TemplateResult};

/// In-memory template registry.
///
/// Owned by the run orchestrator; templates are registered when loaded and
/// removed once all of their targets have been dispatched.
pub struct TemplateStore {
    templates: DashMap<String, Template>,
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateStore {
    /// Create a new template store
    pub fn new() -> Self {
        Self {
            templates: DashMap::new(),
        }
    }

    /// Register a new template
    pub fn create(&self, template: Template) -> TemplateResult<()> {
        template.validate()?;

        if self.templates.contains_key(&template.id) {
            return Err(TemplateError::AlreadyExists(template.id));
        }

        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    /// Get a template by ID
    pub fn get(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .get(id)
            .map(|t| t.clone())
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Replace a registered template (e.g. after token resolution)
    pub fn replace(&self, template: Template) -> TemplateResult<()> {
        if !self.templates.contains_key(&template.id) {
            return Err(TemplateError::NotFound(template.id));
        }

        self.templates.insert(template.id.clone(), template);
        Ok(())
    }

    /// Registered template IDs, sorted
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.templates.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Remove a template by ID
    pub fn remove(&self, id: &str) -> TemplateResult<Template> {
        self.templates
            .remove(id)
            .map(|(_, template)| template)
            .ok_or_else(|| TemplateError::NotFound(id.to_string()))
    }

    /// Check if a template exists
    pub fn exists(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Get the number of templates
    pub fn count(&self) -> usize {
        self.templates.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_create_and_get() {
        let store = TemplateStore::new();
        store
            .create(Template::new("intro", "Hi", "Body").with_targets(["Jane Doe"]))
            .unwrap();

        let retrieved = store.get("intro").unwrap();
        assert_eq!(retrieved.subject, "Hi");
        assert_eq!(retrieved.targets, vec!["Jane Doe".to_string()]);
    }

    #[test]
    fn test_store_create_duplicate() {
        let store = TemplateStore::new();
        let template = Template::new("duplicate", "Hi", "Body");

        store.create(template.clone()).unwrap();
        assert!(matches!(
            store.create(template),
            Err(TemplateError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_store_rejects_invalid_id() {
        let store = TemplateStore::new();
        assert!(matches!(
            store.create(Template::new("", "", "")),
            Err(TemplateError::InvalidId(_))
        ));
    }

    #[test]
    fn test_store_replace() {
        let store = TemplateStore::new();
        store.create(Template::new("intro", "Hi", "$Company$")).unwrap();

        let mut template = store.get("intro").unwrap();
        template.set_resolved("Company", "Acme".to_string());
        store.replace(template).unwrap();

        assert_eq!(store.get("intro").unwrap().value("Company"), Some("Acme"));
        assert!(matches!(
            store.replace(Template::new("missing", "", "")),
            Err(TemplateError::NotFound(_))
        ));
    }

    #[test]
    fn test_store_ids_sorted_and_remove() {
        let store = TemplateStore::new();
        for id in ["zeta", "alpha", "mid"] {
            store.create(Template::new(id, "", "")).unwrap();
        }

        assert_eq!(store.ids(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(store.count(), 3);

        store.remove("mid").unwrap();
        assert!(!store.exists("mid"));
        assert!(matches!(store.remove("mid"), Err(TemplateError::NotFound(_))));
    }
}
