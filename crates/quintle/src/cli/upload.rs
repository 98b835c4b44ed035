use crate::cli::context::Context;
use anyhow::{anyhow, Context as _, Result};
use ipfs::{ipfs_uri, IpfsClient, UploadWithMetadataParams};
use std::path::Path;

pub async fn handle_upload_command(
    ctx: Context,
    file: String,
    metadata: Option<String>,
    jwt: Option<String>,
) -> Result<()> {
    let client = IpfsClient::new(ctx.config.ipfs_config(jwt))?;

    let data = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file))?;
    let file_name = Path::new(&file)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("Invalid file name: {}", file))?
        .to_string();

    println!("📤 Uploading {} ({} bytes)", file_name, data.len());

    match metadata {
        Some(metadata) => {
            let metadata: serde_json::Value =
                serde_json::from_str(&metadata).context("--metadata must be valid JSON")?;
            let uploaded = client
                .upload_with_metadata(UploadWithMetadataParams {
                    data,
                    file_name,
                    metadata,
                })
                .await?;

            println!("✅ File:     {}", ipfs_uri(&uploaded.file_cid));
            println!("   Gateway:  {}", client.gateway_url(&uploaded.file_cid)?);
            println!("✅ Metadata: {}", ipfs_uri(&uploaded.metadata_cid));
            println!("   Gateway:  {}", client.gateway_url(&uploaded.metadata_cid)?);
        }
        None => {
            let cid = client.upload_file(data, &file_name).await?;
            println!("✅ File:     {}", ipfs_uri(&cid));
            println!("   Gateway:  {}", client.gateway_url(&cid)?);
        }
    }
    Ok(())
}

pub async fn handle_fetch_command(ctx: Context, cid: String) -> Result<()> {
    let client = IpfsClient::new(ctx.config.ipfs_config(None))?;

    match client.fetch_json(&cid).await? {
        Some(document) => println!("{}", serde_json::to_string_pretty(&document)?),
        None => println!("⚠️  {} is not available from {}", cid, client.config().gateway),
    }
    Ok(())
}
