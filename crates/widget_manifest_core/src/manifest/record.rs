//! Extracted manifest record.

use serde::Serialize;

/// Raw field values in extraction order, before the record is shaped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub package: String,
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub version: String,
    pub icons: Vec<String>,
    pub api_version: String,
    pub privileges: Vec<String>,
}

/// Immutable snapshot of the fields exposed to callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestRecord {
    pub package: String,
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub version: String,
    /// First declared icon, or empty when none is declared.
    pub icon: String,
    pub api_version: String,
    pub privileges: Vec<String>,
}

impl ManifestRecord {
    /// Shapes extracted fields into the exposed record.
    ///
    /// Only the first icon is kept.
    pub fn from_fields(fields: ExtractedFields) -> Self {
        let icon = fields.icons.into_iter().next().unwrap_or_default();
        Self {
            package: fields.package,
            id: fields.id,
            name: fields.name,
            short_name: fields.short_name,
            version: fields.version,
            icon,
            api_version: fields.api_version,
            privileges: fields.privileges,
        }
    }

    pub fn privilege_count(&self) -> usize {
        self.privileges.len()
    }
}

#[cfg(test)]
mod tests {
    use super::{ExtractedFields, ManifestRecord};

    #[test]
    fn keeps_first_icon_only() {
        let record = ManifestRecord::from_fields(ExtractedFields {
            icons: vec!["icon.png".to_string(), "icon-large.png".to_string()],
            ..ExtractedFields::default()
        });
        assert_eq!(record.icon, "icon.png");
    }

    #[test]
    fn empty_icon_list_gives_empty_icon() {
        let record = ManifestRecord::from_fields(ExtractedFields {
            name: "MyApp".to_string(),
            privileges: vec!["p".to_string()],
            ..ExtractedFields::default()
        });
        assert_eq!(record.icon, "");
        assert_eq!(record.name, "MyApp");
        assert_eq!(record.privilege_count(), 1);
    }
}
