use super::defaults;
use std::path::Path;
use std::sync::Arc;
use toml_edit::{Array, DocumentMut, Item, Table, Value};

/// Migrates config file to latest format if needed
pub async fn migrate_config_if_needed<P: AsRef<Path>>(
    path: P,
    events: Option<&Arc<netweather_events::EventBus>>,
) -> anyhow::Result<()> {
    let content = tokio::fs::read_to_string(path.as_ref()).await?;
    let mut doc = content.parse::<DocumentMut>()?;

    let added_fields = migrate_document(&mut doc)?;

    // Only write if we added fields
    if !added_fields.is_empty() {
        tokio::fs::write(path.as_ref(), doc.to_string()).await?;

        if let Some(event_bus) = events {
            event_bus.emit(netweather_events::AppEvent::ConfigMigrated {
                added_fields: added_fields.clone(),
            });
        }
    }

    Ok(())
}

/// Adds every missing section and field, returning what was added
pub(crate) fn migrate_document(doc: &mut DocumentMut) -> anyhow::Result<Vec<String>> {
    let mut added_fields = Vec::new();

    migrate_scanner_section(doc, &mut added_fields)?;

    let http = ensure_section(doc, "http", &mut added_fields)?;
    ensure_field(
        http,
        "http.user_agent",
        Value::from(defaults::user_agent()),
        &mut added_fields,
    );
    ensure_field(
        http,
        "http.request_timeout_secs",
        integer(defaults::request_timeout_secs()),
        &mut added_fields,
    );

    let reachability = ensure_section(doc, "reachability", &mut added_fields)?;
    ensure_field(
        reachability,
        "reachability.timeout_secs",
        integer(defaults::reachability_timeout_secs()),
        &mut added_fields,
    );
    ensure_field(
        reachability,
        "reachability.max_redirects",
        integer(defaults::max_redirects() as u64),
        &mut added_fields,
    );

    migrate_identifier_section(doc, &mut added_fields)?;

    let storage = ensure_section(doc, "storage", &mut added_fields)?;
    ensure_field(
        storage,
        "storage.backend",
        Value::from(defaults::storage_backend().as_str()),
        &mut added_fields,
    );
    ensure_field(storage, "storage.path", Value::from(defaults::storage_path()), &mut added_fields);

    Ok(added_fields)
}

fn migrate_scanner_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> anyhow::Result<()> {
    let scanner = ensure_section(doc, "scanner", added_fields)?;
    ensure_field(scanner, "scanner.max_workers", integer(defaults::max_workers() as u64), added_fields);
    ensure_field(scanner, "scanner.request_delay_ms", integer(defaults::request_delay_ms()), added_fields);
    ensure_field(scanner, "scanner.batch_size", integer(defaults::batch_size() as u64), added_fields);
    ensure_field(scanner, "scanner.use_db", Value::from(false), added_fields);
    ensure_field(scanner, "scanner.verbose", Value::from(false), added_fields);

    if !scanner.contains_key("exclude_domains") {
        let mut arr = Array::new();
        for domain in defaults::exclude_domains() {
            arr.push(domain);
        }
        scanner["exclude_domains"] = Item::Value(Value::Array(arr));
        added_fields.push("scanner.exclude_domains".to_string());
    }

    Ok(())
}

fn migrate_identifier_section(
    doc: &mut DocumentMut,
    added_fields: &mut Vec<String>,
) -> anyhow::Result<()> {
    let identifier = ensure_section(doc, "identifier", added_fields)?;
    ensure_field(
        identifier,
        "identifier.lookup_timeout_secs",
        integer(defaults::lookup_timeout_secs()),
        added_fields,
    );
    ensure_field(identifier, "identifier.api_enabled", Value::from(defaults::api_enabled()), added_fields);
    ensure_field(
        identifier,
        "identifier.api_base_url",
        Value::from(defaults::api_base_url()),
        added_fields,
    );
    ensure_field(
        identifier,
        "identifier.api_timeout_secs",
        integer(defaults::api_timeout_secs()),
        added_fields,
    );
    ensure_field(
        identifier,
        "identifier.entries_db_path",
        Value::from(defaults::entries_db_path()),
        added_fields,
    );
    ensure_field(identifier, "identifier.use_remote_db", Value::from(false), added_fields);
    ensure_field(
        identifier,
        "identifier.remote_db_url",
        Value::from(defaults::remote_db_url()),
        added_fields,
    );

    Ok(())
}

/// TOML integers are signed
fn integer(value: u64) -> Value {
    Value::from(i64::try_from(value).unwrap_or(i64::MAX))
}

fn ensure_section<'a>(
    doc: &'a mut DocumentMut,
    name: &str,
    added_fields: &mut Vec<String>,
) -> anyhow::Result<&'a mut Table> {
    if !doc.contains_key(name) {
        let mut table = Table::new();
        table.set_implicit(true);
        doc[name] = Item::Table(table);
        added_fields.push(name.to_string());
    }

    doc[name]
        .as_table_mut()
        .ok_or_else(|| anyhow::anyhow!("Invalid [{}] section in config", name))
}

/// `path` is `section.key`; only the key part is written
fn ensure_field(
    table: &mut Table,
    path: &str,
    default_value: Value,
    added_fields: &mut Vec<String>,
) {
    let key = path.rsplit('.').next().unwrap_or(path);
    if !table.contains_key(key) {
        table[key] = Item::Value(default_value);
        added_fields.push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, DEFAULT_CONFIG_TEMPLATE};

    #[test]
    fn test_complete_document_is_untouched() {
        let mut doc = DEFAULT_CONFIG_TEMPLATE.parse::<DocumentMut>().unwrap();
        let added = migrate_document(&mut doc).unwrap();
        assert!(added.is_empty(), "unexpected additions: {:?}", added);
    }

    #[test]
    fn test_missing_fields_are_added_and_values_kept() {
        let mut doc = "[scanner]\nmax_workers = 4\n".parse::<DocumentMut>().unwrap();
        let added = migrate_document(&mut doc).unwrap();

        assert!(added.contains(&"scanner.exclude_domains".to_string()));
        assert!(added.contains(&"identifier".to_string()));
        assert!(!added.contains(&"scanner.max_workers".to_string()));

        let config = Config::parse(&doc.to_string()).unwrap();
        assert_eq!(config.scanner.max_workers, 4);
        assert_eq!(config.scanner.exclude_domains.len(), 3);
    }

    #[test]
    fn test_migrated_empty_document_matches_defaults() {
        let mut doc = DocumentMut::new();
        migrate_document(&mut doc).unwrap();

        let migrated = Config::parse(&doc.to_string()).unwrap();
        assert_eq!(
            toml::to_string(&migrated).unwrap(),
            toml::to_string(&Config::default()).unwrap()
        );
    }

    #[test]
    fn test_non_table_section_is_an_error() {
        let mut doc = "scanner = 3\n".parse::<DocumentMut>().unwrap();
        assert!(migrate_document(&mut doc).is_err());
    }
}
