use anyhow::Context;
use bookshop_catalog::{CatalogStore, StoreConfig};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // An explicit path wins over $BOOKSHOP_CONFIG and the default file.
    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => StoreConfig::from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => StoreConfig::load_default().context("loading store configuration")?,
    };

    let store = CatalogStore::open(&config)
        .await
        .context("opening catalog store")?;

    let counts = store.table_counts().await?;
    tracing::info!(
        authors = counts.authors,
        genres = counts.genres,
        books = counts.books,
        publishing_houses = counts.publishing_houses,
        editions = counts.editions,
        prices = counts.prices,
        "Catalog summary"
    );
    println!("{}", serde_json::to_string_pretty(&counts)?);

    store.close().await;
    Ok(())
}
