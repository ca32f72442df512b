//! Mount and shapeshift table loader.

use std::collections::BTreeSet;
use std::path::Path;

use crate::bundle::ContentTables;
use crate::loaders::{LoadResult, read_file};

/// Loader for [`ContentTables`] from RON files.
pub struct ContentTablesLoader;

impl ContentTablesLoader {
    pub fn load(path: &Path) -> LoadResult<ContentTables> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ContentTables> {
        let tables: ContentTables = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse content tables RON: {}", e))?;

        let mut forms = BTreeSet::new();
        for form in &tables.shapeshift_forms {
            if !forms.insert(form.id) {
                anyhow::bail!("Duplicate shapeshift form {}", form.id);
            }
        }
        Ok(tables)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tables_parse() {
        let tables = ContentTablesLoader::parse("()").unwrap();
        assert_eq!(tables, ContentTables::default());
    }

    #[test]
    fn duplicate_forms_rejected() {
        let content = r#"(
            shapeshift_forms: [
                (id: 1, display: None),
                (id: 1, display: Some(5)),
            ],
        )"#;
        let err = ContentTablesLoader::parse(content).unwrap_err();
        assert!(err.to_string().contains("Duplicate shapeshift form 1"));
    }
}
