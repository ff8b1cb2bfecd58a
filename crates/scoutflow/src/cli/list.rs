//! `scoutflow list`: stored codes in the collection.

use crate::cli::config::ResolvedConfig;
use crate::cli::error::HelpfulError;
use crate::cli::output::{plural, print_table, truncate};
use crate::cli::runtime;
use anyhow::Result;
use scoutflow_store::{DocumentStore, SqliteStore, StoredDocument};

pub fn run(limit: usize, json: bool, config: &ResolvedConfig) -> Result<()> {
    let documents = if config.db_path.exists() {
        let rt = runtime()?;
        rt.block_on(async {
            let store = SqliteStore::open(&config.db_path)
                .await
                .map_err(|err| HelpfulError::store_unavailable(&config.db_path, err))?;
            let found = store.find(&config.collection).await;
            store.close().await;
            Ok::<_, anyhow::Error>(found?)
        })?
    } else {
        Vec::new()
    };

    let total = documents.len();
    let shown = tail(&documents, limit);

    if json {
        let value = serde_json::json!({
            "collection": config.collection,
            "total": total,
            "documents": shown,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    if total == 0 {
        println!("No codes stored in '{}'.", config.collection);
        return Ok(());
    }

    let rows = shown
        .iter()
        .map(|doc| {
            vec![
                doc.id.clone(),
                doc.readable_time.clone(),
                if doc.blocklisted { "yes" } else { "" }.to_string(),
                truncate(&doc.data, 60),
            ]
        })
        .collect();
    print_table(&["ID", "TIME", "BLOCKED", "CODE"], rows);
    println!(
        "Showing {} of {} in '{}'.",
        shown.len(),
        plural(total, "code"),
        config.collection
    );
    Ok(())
}

/// The last `limit` documents, oldest first.
fn tail(documents: &[StoredDocument], limit: usize) -> &[StoredDocument] {
    &documents[documents.len().saturating_sub(limit)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail() {
        let docs: Vec<StoredDocument> = (0..5)
            .map(|i| StoredDocument::new(format!("*{}", i), format!("id{}", i), "t"))
            .collect();
        let shown = tail(&docs, 2);
        assert_eq!(shown.len(), 2);
        assert_eq!(shown[0].data, "*3");
        assert_eq!(tail(&docs, 50).len(), 5);
        assert!(tail(&docs, 0).is_empty());
    }
}
