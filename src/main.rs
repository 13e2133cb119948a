use anyhow::Result;
use theographic_export::{run, Config};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "theographic_export=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let summary = run(&config).await?;

    println!("Generated {} people", summary.people);
    println!("Generated {} children entries", summary.children_entries);
    println!("Generated {} alias entries", summary.alias_entries);
    println!("Root children count {}", summary.root_children);
    Ok(())
}
