use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::notion::properties::{PropertyKind, RecordProperties};
use crate::submission::Submission;

/// One Notion property and the form fields that can fill it.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FieldMapping {
    /// Exact property name in the Notion database, accents and case included.
    pub property: String,
    pub kind: PropertyKind,
    /// Input keys to try, highest priority first.
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl FieldMapping {
    pub fn new(property: &str, kind: PropertyKind, aliases: &[&str]) -> Self {
        Self {
            property: property.to_string(),
            kind,
            aliases: aliases.iter().map(|a| a.to_string()).collect(),
        }
    }

    fn candidates(&self) -> &[String] {
        if self.aliases.is_empty() {
            std::slice::from_ref(&self.property)
        } else {
            &self.aliases
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct PropertySchema {
    pub fields: Vec<FieldMapping>,
}

impl PropertySchema {
    pub fn new(fields: Vec<FieldMapping>) -> Self {
        Self { fields }
    }

    /// Build the Notion properties for a submission.
    ///
    /// Every mapped property is always emitted, with its default when no
    /// alias supplies a value. No I/O, and the output depends only on the
    /// submission.
    pub fn map(&self, submission: &Submission) -> RecordProperties {
        self.fields
            .iter()
            .map(|field| {
                let value = submission.lookup(field.candidates());
                (field.property.clone(), field.kind.encode(value))
            })
            .collect()
    }

    /// Lead form: first/last name, company, email and French phone column.
    pub fn register() -> Self {
        use PropertyKind::*;
        Self::new(vec![
            FieldMapping::new("First name", Title, &["First name", "firstName", "FirstName"]),
            FieldMapping::new("Last name", RichText, &["Last name", "lastName", "LastName"]),
            FieldMapping::new("Company name", RichText, &["Company name", "company", "Company"]),
            FieldMapping::new("Email", Email, &["Email", "email"]),
            FieldMapping::new("Téléphone", Phone, &["Téléphone", "Phone", "phone"]),
        ])
    }

    /// Contact form with English column names.
    pub fn variant() -> Self {
        use PropertyKind::*;
        Self::new(vec![
            FieldMapping::new("Name", Title, &["Name", "name", "fullName", "FullName"]),
            FieldMapping::new("Email", Email, &["Email", "email"]),
            FieldMapping::new("Phone", Phone, &["Phone", "phone", "Téléphone"]),
            FieldMapping::new("Company", RichText, &["Company", "company", "Company name"]),
            FieldMapping::new("Country", Select, &["Country", "country"]),
            FieldMapping::new("Team size", Number, &["Team size", "teamSize", "team_size"]),
            FieldMapping::new("Message", RichText, &["Message", "message"]),
            FieldMapping::new("Newsletter", Checkbox, &["Newsletter", "newsletter", "optIn"]),
        ])
    }
}

/// Form name (the request path segment) to its property schema.
#[derive(Debug, Clone, Default)]
pub struct FormRegistry {
    forms: HashMap<String, PropertySchema>,
}

impl FormRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `register` and `variant` forms.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.insert("register", PropertySchema::register());
        registry.insert("variant", PropertySchema::variant());
        registry
    }

    pub fn insert(&mut self, name: &str, schema: PropertySchema) {
        self.forms.insert(name.to_string(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&PropertySchema> {
        self.forms.get(name)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.forms.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Add or replace forms from a JSON document of the form
    /// `{"<form>": [{"property": "...", "kind": "...", "aliases": [...]}]}`.
    pub fn merge_json(&mut self, json: &str) -> Result<(), String> {
        let forms: HashMap<String, PropertySchema> =
            serde_json::from_str(json).map_err(|e| format!("Invalid forms file: {e}"))?;

        for (name, schema) in forms {
            if name.is_empty() || name.contains('/') {
                return Err(format!("Invalid form name '{name}'"));
            }
            if schema.fields.iter().any(|f| f.property.is_empty()) {
                return Err(format!("Form '{name}' has a field with no property name"));
            }
            self.forms.insert(name, schema);
        }
        Ok(())
    }

    pub fn merge_file(&mut self, path: &Path) -> Result<(), String> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read forms file {}: {e}", path.display()))?;
        self.merge_json(&json)
    }
}
