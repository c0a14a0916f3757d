#[path = "../common/mod.rs"]
mod common;

#[cfg(test)]
mod tests {
    use std::io::Write;

    use netprofiler::catalog::{CatalogError, ColumnCatalog, ColumnCatalogExt, StaticCatalog};
    use netprofiler::model::{ColumnRef, ColumnType};

    use super::common::CATALOG;

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = StaticCatalog::from_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 15);
        let column = catalog
            .resolve_column(&ColumnRef::from("avg_util"), None)
            .unwrap();
        assert_eq!(column.id, 40);
        assert_eq!(column.column_type, ColumnType::Float);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            StaticCatalog::from_file("/definitely/not/here/columns.json"),
            Err(CatalogError::Io(_))
        ));
    }

    #[test]
    fn test_bad_json() {
        assert!(matches!(
            StaticCatalog::from_json(r#"[{"id": "six"}]"#),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_identity_realm_search() {
        let catalog = StaticCatalog::from_json(CATALOG).unwrap();
        let keys: Vec<String> = catalog
            .search_columns(&["identity_list"], &["hos"], &["thu"])
            .unwrap()
            .into_iter()
            .map(|c| c.key)
            .collect();

        assert!(keys.contains(&"username".to_string()));
        assert!(keys.contains(&"time".to_string()));
        assert!(!keys.contains(&"in_bytes".to_string()));
        assert!(!keys.contains(&"host".to_string()));
    }
}
