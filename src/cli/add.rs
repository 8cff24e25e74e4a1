use crate::agent::Message;
use crate::cli::client;
use crate::core::models::NewCompany;
use anyhow::Result;

pub async fn run(name: String, platform: String, slug: String) -> Result<()> {
    let request = NewCompany {
        name,
        platform,
        slug,
    };
    let label = format!("{} ({}/{})", request.name, request.platform, request.slug);

    client::request(&Message::AddToJobgo(request)).await?;

    println!("Added {label} to the JobGo cart");
    Ok(())
}
