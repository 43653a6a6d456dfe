mod common;

use anyhow::Result;
use serde_json::{json, Value};

async fn create(server: &common::TestServer, path: &str, body: Value) -> Result<i64> {
    let created = server
        .client
        .post(server.url(path))
        .json(&body)
        .send()
        .await?
        .json::<Value>()
        .await?;
    Ok(created["id"].as_i64().expect("created record has an id"))
}

async fn ids(server: &common::TestServer, path: &str) -> Result<Vec<i64>> {
    let items = server
        .client
        .get(server.url(path))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    Ok(items.iter().filter_map(|v| v["id"].as_i64()).collect())
}

#[tokio::test]
async fn unattached_contents_are_listed() -> Result<()> {
    let server = common::spawn_app().await?;

    let linked = create(&server, "/api/protocol-contents", json!({ "content": "<p>a</p>" })).await?;
    let loose = create(&server, "/api/protocol-contents", json!({ "content": "<p>b</p>" })).await?;
    create(&server, "/api/protocols", json!({ "protocolContent": { "id": linked } })).await?;

    assert_eq!(ids(&server, "/api/protocol-contents?filter=protocol-is-null").await?, vec![loose]);
    assert_eq!(ids(&server, "/api/protocol-contents").await?, vec![linked, loose]);
    // Unrecognized filters list everything
    assert_eq!(ids(&server, "/api/protocol-contents?filter=bogus").await?, vec![linked, loose]);
    Ok(())
}

#[tokio::test]
async fn pdf_filter_ignores_content_links() -> Result<()> {
    let server = common::spawn_app().await?;

    let content = create(&server, "/api/protocol-contents", json!({ "content": "<p>a</p>" })).await?;
    let pdf = create(
        &server,
        "/api/protocol-pdf-files",
        json!({ "content": "JVBERi0xLjQK", "mimeType": "application/pdf" }),
    )
    .await?;
    create(&server, "/api/protocols", json!({ "protocolContent": { "id": content } })).await?;

    assert_eq!(ids(&server, "/api/protocol-pdf-files?filter=protocol-is-null").await?, vec![pdf]);
    assert!(ids(&server, "/api/protocol-contents?filter=protocol-is-null").await?.is_empty());
    Ok(())
}
