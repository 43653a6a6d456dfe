mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn create_then_get_role() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .client
        .post(server.url("/api/roles"))
        .json(&json!({ "name": "AUTHOR", "description": "Writes protocols" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let id = {
        let location = res.headers()["location"].to_str()?.to_string();
        let body = res.json::<Value>().await?;
        let id = body["id"].as_i64().expect("created role has an id");
        assert_eq!(location, format!("/api/roles/{}", id));
        assert_eq!(body["name"], "AUTHOR");
        id
    };

    let res = server.client.get(server.url(&format!("/api/roles/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["description"], "Writes protocols");

    Ok(())
}

#[tokio::test]
async fn create_with_id_is_rejected() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .client
        .post(server.url("/api/organizations"))
        .json(&json!({ "id": 5, "name": "Ortsverein Mitte" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body = res.json::<Value>().await?;
    assert_eq!(body["message"], "A new organization cannot already have an ID");

    let list = server.client.get(server.url("/api/organizations")).send().await?;
    assert_eq!(list.json::<Vec<Value>>().await?.len(), 0);
    Ok(())
}

#[tokio::test]
async fn write_alerts_are_attached() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .client
        .post(server.url("/api/protocols"))
        .json(&json!({ "isDraft": true }))
        .send()
        .await?;
    let id = res.headers()["x-protocoladmin-params"].to_str()?.parse::<i64>()?;
    assert_eq!(
        res.headers()["x-protocoladmin-alert"],
        format!("A new protocol is created with identifier {}", id).as_str()
    );

    let res = server
        .client
        .delete(server.url(&format!("/api/protocols/{}", id)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        res.headers()["x-protocoladmin-alert"],
        format!("A protocol is deleted with identifier {}", id).as_str()
    );
    Ok(())
}

#[tokio::test]
async fn update_checks_identity() -> Result<()> {
    let server = common::spawn_app().await?;

    let created = server
        .client
        .post(server.url("/api/roles"))
        .json(&json!({ "name": "ADMIN" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_i64().expect("id");

    // Path and payload disagree
    let res = server
        .client
        .put(server.url(&format!("/api/roles/{}", id)))
        .json(&json!({ "id": id + 1, "name": "ADMIN" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Invalid ID");

    // Payload without identity
    let res = server
        .client
        .put(server.url(&format!("/api/roles/{}", id)))
        .json(&json!({ "name": "ADMIN" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Unknown identity
    let res = server
        .client
        .put(server.url("/api/roles/999999"))
        .json(&json!({ "id": 999999, "name": "GHOST" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["message"], "Entity not found");

    // Full replacement clears omitted attributes
    let res = server
        .client
        .put(server.url(&format!("/api/roles/{}", id)))
        .json(&json!({ "id": id, "name": "OWNER" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["x-protocoladmin-alert"],
        format!("A role is updated with identifier {}", id).as_str()
    );
    assert_eq!(res.json::<Value>().await?["name"], "OWNER");
    Ok(())
}

#[tokio::test]
async fn patch_merges_non_null_attributes() -> Result<()> {
    let server = common::spawn_app().await?;

    let created = server
        .client
        .post(server.url("/api/organizations"))
        .json(&json!({ "name": "Kreisverband Nord", "city": "Kiel", "type": "district" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_i64().expect("id");

    let res = server
        .client
        .patch(server.url(&format!("/api/organizations/{}", id)))
        .header("content-type", "application/merge-patch+json")
        .body(json!({ "id": id, "city": null, "name": "Kreisverband Sued" }).to_string())
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let body = res.json::<Value>().await?;
    assert_eq!(body["name"], "Kreisverband Sued");
    assert_eq!(body["city"], "Kiel");
    assert_eq!(body["type"], "district");
    Ok(())
}

#[tokio::test]
async fn patch_of_unknown_record_is_not_found() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server
        .client
        .patch(server.url("/api/roles/424242"))
        .json(&json!({ "id": 424242, "name": "GHOST" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn missing_records() -> Result<()> {
    let server = common::spawn_app().await?;

    let res = server.client.get(server.url("/api/protocol-templates/31337")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.json::<Value>().await?["code"], "NOT_FOUND");

    // Deleting a missing identity still succeeds
    let res = server.client.delete(server.url("/api/protocol-templates/31337")).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn platform_user_password_is_write_only() -> Result<()> {
    let server = common::spawn_app().await?;

    let org = server
        .client
        .post(server.url("/api/organizations"))
        .json(&json!({ "name": "Ortsverein Gaarden" }))
        .send()
        .await?
        .json::<Value>()
        .await?;

    let res = server
        .client
        .post(server.url("/api/platform-users"))
        .json(&json!({
            "userName": "a.petersen",
            "password": "s3cret",
            "organization": { "id": org["id"] }
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body = res.json::<Value>().await?;
    assert!(body.get("password").is_none(), "password echoed: {}", body);
    assert_eq!(body["organization"]["id"], org["id"]);
    Ok(())
}

#[tokio::test]
async fn create_with_id_is_rejected_for_every_kind() -> Result<()> {
    let server = common::spawn_app().await?;

    for (path, name) in [
        ("organizations", "organization"),
        ("platform-users", "platformUser"),
        ("protocols", "protocol"),
        ("protocol-contents", "protocolContent"),
        ("protocol-pdf-files", "protocolPdfFile"),
        ("additional-users", "additionalUser"),
        ("protocol-templates", "protocolTemplate"),
        ("template-organizations", "templateOrganization"),
        ("roles", "role"),
        ("user-roles", "userRole"),
        ("user-sessions", "userSessions"),
    ] {
        let res = server
            .client
            .post(server.url(&format!("/api/{}", path)))
            .json(&json!({ "id": 5 }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", path);
        assert_eq!(
            res.json::<Value>().await?["message"],
            format!("A new {} cannot already have an ID", name).as_str()
        );

        let list = server.client.get(server.url(&format!("/api/{}", path))).send().await?;
        assert!(list.json::<Vec<Value>>().await?.is_empty(), "{} stored a record", path);
    }
    Ok(())
}

#[tokio::test]
async fn patch_checks_identity() -> Result<()> {
    let server = common::spawn_app().await?;

    let created = server
        .client
        .post(server.url("/api/roles"))
        .json(&json!({ "name": "ADMIN" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = created["id"].as_i64().expect("id");

    for body in [json!({ "id": id + 1, "name": "OWNER" }), json!({ "name": "OWNER" })] {
        let res = server
            .client
            .patch(server.url(&format!("/api/roles/{}", id)))
            .json(&body)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.json::<Value>().await?["message"], "Invalid ID");
    }

    let unchanged = server
        .client
        .get(server.url(&format!("/api/roles/{}", id)))
        .send()
        .await?
        .json::<Value>()
        .await?;
    assert_eq!(unchanged["name"], "ADMIN");
    Ok(())
}

#[tokio::test]
async fn patch_of_join_record_resaves_it() -> Result<()> {
    let server = common::spawn_app().await?;

    let role = server
        .client
        .post(server.url("/api/roles"))
        .json(&json!({ "name": "AUTHOR" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let grant = server
        .client
        .post(server.url("/api/user-roles"))
        .json(&json!({ "role": { "id": role["id"] } }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let id = grant["id"].as_i64().expect("id");

    // Associations are not merged by a patch
    let res = server
        .client
        .patch(server.url(&format!("/api/user-roles/{}", id)))
        .json(&json!({ "id": id, "role": null }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers()["x-protocoladmin-alert"],
        format!("A userRole is updated with identifier {}", id).as_str()
    );
    assert_eq!(res.json::<Value>().await?["role"]["id"], role["id"]);
    Ok(())
}

#[tokio::test]
async fn protocol_content_belongs_to_one_protocol() -> Result<()> {
    let server = common::spawn_app().await?;

    let content = server
        .client
        .post(server.url("/api/protocol-contents"))
        .json(&json!({ "content": "<p>Einsatz</p>" }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let link = json!({ "protocolContent": { "id": content["id"] } });

    let first = server.client.post(server.url("/api/protocols")).json(&link).send().await?;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = server.client.post(server.url("/api/protocols")).json(&link).send().await?;
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(second.json::<Value>().await?["code"], "CONFLICT");

    // An existing protocol cannot take it over either
    let other = server
        .client
        .post(server.url("/api/protocols"))
        .json(&json!({ "isDraft": true }))
        .send()
        .await?
        .json::<Value>()
        .await?;
    let takeover = server
        .client
        .put(server.url(&format!("/api/protocols/{}", other["id"])))
        .json(&json!({ "id": other["id"], "protocolContent": { "id": content["id"] } }))
        .send()
        .await?;
    assert_eq!(takeover.status(), StatusCode::CONFLICT);

    let protocols = server
        .client
        .get(server.url("/api/protocols"))
        .send()
        .await?
        .json::<Vec<Value>>()
        .await?;
    let holders = protocols
        .iter()
        .filter(|p| p["protocolContent"]["id"] == content["id"])
        .count();
    assert_eq!(holders, 1);
    Ok(())
}
