mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};
use serial_test::serial;

#[tokio::test]
async fn token_routes_require_bearer_header() -> Result<()> {
    let server = common::spawn_offline().await?;

    for path in ["/me", "/logout", "/quizzes", "/posts", "/quizzes/1"] {
        let res = server.client.get(server.url(path)).send().await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{}", path);
        assert_eq!(res.json::<Value>().await?["code"], "UNAUTHORIZED");
    }

    let res = server
        .client
        .get(server.url("/me"))
        .basic_auth("ada@example.com", Some("secret"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn login_requires_basic_credentials() -> Result<()> {
    let server = common::spawn_offline().await?;

    let res = server.client.post(server.url("/login")).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .post(server.url("/login"))
        .bearer_auth("abc123")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn register_login_me_logout_flow() -> Result<()> {
    let server = common::spawn_with_database().await?;
    let email = common::unique_email("ada");

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Ada", "email": email, "password": "analytical" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user: Value = res.json().await?;
    assert_eq!(user["name"], "Ada");
    assert_eq!(user["email"], email.as_str());
    assert!(user.get("password").is_none());

    let res = server
        .client
        .post(server.url("/login"))
        .basic_auth(&email, Some("wrong"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = server
        .client
        .post(server.url("/login"))
        .basic_auth(&email, Some("analytical"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let login: Value = res.json().await?;
    assert_eq!(login["userId"], user["id"]);
    let token = login["token"].as_str().unwrap_or_default().to_string();
    assert_eq!(token.len(), 64);

    let res = server.client.get(server.url("/me")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "Hello, Ada");

    let res = server.client.get(server.url("/logout")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "Goodbye, Ada");

    let res = server.client.get(server.url("/me")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn tokens_are_independent_per_login() -> Result<()> {
    let server = common::spawn_with_database().await?;
    let email = common::unique_email("grace");
    server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Grace", "email": email, "password": "cobol" }))
        .send()
        .await?;

    let mut tokens = Vec::new();
    for _ in 0..2 {
        let res = server
            .client
            .post(server.url("/login"))
            .basic_auth(&email, Some("cobol"))
            .send()
            .await?;
        let body: Value = res.json().await?;
        tokens.push(body["token"].as_str().unwrap_or_default().to_string());
    }
    assert_ne!(tokens[0], tokens[1]);

    server.client.get(server.url("/logout")).bearer_auth(&tokens[0]).send().await?;

    let res = server.client.get(server.url("/me")).bearer_auth(&tokens[1]).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
#[serial]
#[ignore = "requires DATABASE_URL"]
async fn registration_rejects_duplicates_and_missing_password() -> Result<()> {
    let server = common::spawn_with_database().await?;
    let email = common::unique_email("linus");

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Linus", "email": email }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?["field_errors"]["password"], "This field is required");

    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Linus", "email": email, "password": "kernel" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Duplicate email is reported before the missing password
    let res = server
        .client
        .post(server.url("/users"))
        .json(&json!({ "name": "Other", "email": email }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        res.json::<Value>().await?["message"],
        "A user with that email already exists."
    );

    // The original account still logs in with its own password and name
    let res = server
        .client
        .post(server.url("/login"))
        .basic_auth(&email, Some("kernel"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let token = res.json::<Value>().await?["token"].as_str().unwrap_or_default().to_string();

    let res = server.client.get(server.url("/me")).bearer_auth(&token).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.text().await?, "Hello, Linus");
    Ok(())
}
