//! API Integration Tests
//!
//! Each test starts its own server over the in-memory store, so nothing external
//! is required.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    artwork_form, assert_error, assert_json, assert_status, png_bytes, post_form, Account,
    TestServer, PASSWORD,
};
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn server() -> TestServer {
    TestServer::start().await.expect("Failed to start server")
}

/// Admin, creator, and a community the admin has approved
async fn approved_community(server: &TestServer, name: &str) -> (Account, Account, String) {
    let admin = server.sign_up("Root", "admin", None).await.unwrap();
    let creator = server.sign_up("Carla", "buyer", None).await.unwrap();

    let body = json!({ "name": name, "description": "Weekly critique circle" });
    let created: Value = assert_json(
        server
            .post_auth("/api/v1/communities", &creator.token, &body)
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let id = created["data"]["id"].as_str().unwrap().to_string();

    assert_status(
        server
            .patch_auth(
                &format!("/api/v1/admin/communities/{id}/approve"),
                &admin.token,
                &(),
            )
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    (admin, creator, id)
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let server = server().await;

    let health: Value = assert_json(server.get("/health").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");

    let ready: Value = assert_json(server.get("/health/ready").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(ready["database"], "up");

    let doc: Value = assert_json(
        server.get("/api-docs/openapi.json").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(doc["paths"]["/api/v1/products"].is_object());
}

// ============================================================================
// Accounts
// ============================================================================

#[tokio::test]
async fn test_register_login_and_profile() {
    let server = server().await;
    let account = server.sign_up("Bea", "buyer", None).await.unwrap();

    let me: Value = assert_json(
        server.get_auth("/api/v1/users/me", &account.token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(me["status"], "success");
    assert_eq!(me["data"]["email"], "bea@example.com");
    assert_eq!(me["data"]["role"], "buyer");
    assert_eq!(me["data"]["id"], account.id.as_str());

    // Same address in another case is still a duplicate
    let duplicate = json!({
        "name": "Bea Again",
        "email": "BEA@example.com",
        "password": PASSWORD,
        "type": "buyer",
    });
    let code = assert_error(
        server.post("/api/v1/users/register", &duplicate).await.unwrap(),
        StatusCode::CONFLICT,
    )
    .await
    .unwrap();
    assert_eq!(code, "EMAIL_ALREADY_EXISTS");
}

#[tokio::test]
async fn test_authentication_failures() {
    let server = server().await;
    server.sign_up("Dan", "buyer", None).await.unwrap();

    let code = assert_error(
        server.get("/api/v1/users/me").await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();
    assert_eq!(code, "MISSING_AUTH");

    let wrong = json!({ "email": "dan@example.com", "password": "not-the-password" });
    assert_status(
        server.post("/api/v1/users/login", &wrong).await.unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();

    assert_status(
        server
            .get_auth("/api/v1/users/me", "not.a.token")
            .await
            .unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();

    let missing_fields = json!({ "email": "dan@example.com" });
    assert_status(
        server.post("/api/v1/users/login", &missing_fields).await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_session_cookie() {
    let server = server().await;
    server.sign_up("Cora", "buyer", None).await.unwrap();

    let client = reqwest::Client::builder().cookie_store(true).build().unwrap();
    let login = client
        .post(format!("{}/api/v1/users/login", server.base_url()))
        .json(&json!({ "email": "cora@example.com", "password": PASSWORD }))
        .send()
        .await
        .unwrap();
    let cookie = login
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("jwt="));
    assert!(cookie.contains("HttpOnly"));
    assert_status(login, StatusCode::OK).await.unwrap();

    // The cookie alone authenticates
    let me = client
        .get(format!("{}/api/v1/users/me", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_status(me, StatusCode::OK).await.unwrap();

    let logout = client
        .post(format!("{}/api/v1/users/logout", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_status(logout, StatusCode::OK).await.unwrap();

    let after = client
        .get(format!("{}/api/v1/users/me", server.base_url()))
        .send()
        .await
        .unwrap();
    assert_status(after, StatusCode::UNAUTHORIZED).await.unwrap();
}

#[tokio::test]
async fn test_artist_waits_for_approval() {
    let server = server().await;
    let admin = server.sign_up("Root", "admin", None).await.unwrap();

    let payload = json!({
        "name": "Ines",
        "email": "ines@example.com",
        "password": PASSWORD,
        "type": "artist",
        "specialization": "Watercolour",
        "bio": "Coastal scenes",
    });
    let registered: Value = assert_json(
        server.post("/api/v1/users/register", &payload).await.unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(registered["user"]["status"], "pending");
    let id = registered["user"]["id"].as_str().unwrap().to_string();

    let login = json!({ "email": "ines@example.com", "password": PASSWORD });
    assert_status(
        server.post("/api/v1/users/login", &login).await.unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();

    let pending: Value = assert_json(
        server
            .get_auth("/api/v1/admin/artists/pending", &admin.token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(pending["data"][0]["id"], id.as_str());

    assert_status(
        server
            .patch_auth(&format!("/api/v1/admin/artists/{id}/approve"), &admin.token, &())
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert_status(
        server.post("/api/v1/users/login", &login).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_change_password_issues_new_session() {
    let server = server().await;
    let account = server.sign_up("Eve", "buyer", None).await.unwrap();

    let wrong = json!({ "currentPassword": "nope-nope", "newPassword": "brand-new-pass" });
    assert_status(
        server
            .patch_auth("/api/v1/users/me/password", &account.token, &wrong)
            .await
            .unwrap(),
        StatusCode::UNAUTHORIZED,
    )
    .await
    .unwrap();

    let change = json!({ "currentPassword": PASSWORD, "newPassword": "brand-new-pass" });
    let session: Value = assert_json(
        server
            .patch_auth("/api/v1/users/me/password", &account.token, &change)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let token = session["token"].as_str().unwrap();

    assert_status(
        server.get_auth("/api/v1/users/me", token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    server.login("eve@example.com", "brand-new-pass").await.unwrap();
}

// ============================================================================
// Communities
// ============================================================================

#[tokio::test]
async fn test_pending_community_is_hidden() {
    let server = server().await;
    let creator = server.sign_up("Carla", "buyer", None).await.unwrap();

    let body = json!({ "name": "Quiet Room", "description": "Still life" });
    let created: Value = assert_json(
        server
            .post_auth("/api/v1/communities", &creator.token, &body)
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(created["data"]["status"], "pending");
    assert_eq!(created["data"]["memberCount"], 1);
    let id = created["data"]["id"].as_str().unwrap();

    // Not found even for its creator until approved
    assert_status(
        server
            .get_auth(&format!("/api/v1/communities/{id}"), &creator.token)
            .await
            .unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();

    let listed: Value = assert_json(
        server
            .get_auth("/api/v1/communities", &creator.token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(listed["data"].as_array().unwrap().is_empty());

    let duplicate = json!({ "name": "Quiet Room", "description": "Another" });
    assert_status(
        server
            .post_auth("/api/v1/communities", &creator.token, &duplicate)
            .await
            .unwrap(),
        StatusCode::CONFLICT,
    )
    .await
    .unwrap();

    let blank = json!({ "name": "  ", "description": "Nothing" });
    assert_status(
        server
            .post_auth("/api/v1/communities", &creator.token, &blank)
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_membership_workflow_and_feed() {
    let server = server().await;
    let (_admin, creator, id) = approved_community(&server, "Ink Club").await;
    let member = server.sign_up("Milo", "buyer", None).await.unwrap();
    let outsider = server.sign_up("Otto", "buyer", None).await.unwrap();
    let base = format!("/api/v1/communities/{id}");

    // Search is case-insensitive on name or description
    let found: Value = assert_json(
        server
            .get_auth("/api/v1/communities?search=ink", &outsider.token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(found["data"][0]["creator"]["name"], "Carla");

    assert_status(
        server
            .post_auth(&format!("{base}/request-join"), &member.token, &())
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    // Pending users cannot read the feed
    assert_status(
        server
            .get_auth(&format!("{base}/messages"), &member.token)
            .await
            .unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();

    // Only the creator moderates
    let approve = json!({ "memberId": member.id });
    assert_status(
        server
            .post_auth(&format!("{base}/approve-member"), &outsider.token, &approve)
            .await
            .unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();

    let pending: Value = assert_json(
        server
            .get_auth(&format!("{base}/pending-requests"), &creator.token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(pending["data"][0]["email"], "milo@example.com");

    let approved: Value = assert_json(
        server
            .post_auth(&format!("{base}/approve-member"), &creator.token, &approve)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(approved["memberCount"], 2);

    let missing_member = json!({});
    assert_status(
        server
            .post_auth(&format!("{base}/approve-member"), &creator.token, &missing_member)
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();

    // Feed
    let first: Value = assert_json(
        server
            .post_auth(&format!("{base}/messages"), &member.token, &json!({ "content": "Hi all" }))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    assert_eq!(first["data"]["author"]["name"], "Milo");
    let first_id = first["data"]["id"].as_str().unwrap().to_string();

    server
        .post_auth(&format!("{base}/messages"), &creator.token, &json!({ "content": "Welcome" }))
        .await
        .unwrap();

    assert_status(
        server
            .post_auth(&format!("{base}/messages"), &member.token, &json!({ "content": "   " }))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_status(
        server
            .post_auth(&format!("{base}/messages"), &outsider.token, &json!({ "content": "Hey" }))
            .await
            .unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();

    let all: Value = assert_json(
        server
            .get_auth(&format!("{base}/messages"), &member.token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let contents: Vec<&str> = all["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["content"].as_str().unwrap())
        .collect();
    assert_eq!(contents, vec!["Hi all", "Welcome"]);

    let newer: Value = assert_json(
        server
            .get_auth(&format!("{base}/messages?after={first_id}"), &creator.token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(newer["data"].as_array().unwrap().len(), 1);
    assert_eq!(newer["data"][0]["content"], "Welcome");

    // Leaving
    assert_status(
        server
            .post_auth(&format!("{base}/leave"), &creator.token, &())
            .await
            .unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    let left: Value = assert_json(
        server
            .post_auth(&format!("{base}/leave"), &member.token, &())
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(left["memberCount"], 1);

    let detail: Value = assert_json(
        server.get_auth(&base, &creator.token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(detail["data"]["access"], "creator");
    assert_eq!(detail["data"]["members"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_community_id() {
    let server = server().await;
    let account = server.sign_up("Pia", "buyer", None).await.unwrap();

    let code = assert_error(
        server
            .get_auth("/api/v1/communities/not-an-id", &account.token)
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(code, "INVALID_PATH_PARAMETER");

    assert_status(
        server
            .get_auth("/api/v1/communities/12345/messages", &account.token)
            .await
            .unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
}

// ============================================================================
// Artworks
// ============================================================================

#[tokio::test]
async fn test_upload_watermarks_and_awards_badges() {
    let server = server().await;
    let admin = server.sign_up("Root", "admin", None).await.unwrap();
    let artist = server.sign_up("Vera", "artist", Some(&admin)).await.unwrap();

    let mut last = Value::Null;
    for n in 0..3 {
        let form = artwork_form(&format!("Study {n}"), r#"["oil","portrait"]"#, Some(png_bytes()));
        last = assert_json(
            server
                .post_multipart_auth("/api/v1/products", &artist.token, form)
                .await
                .unwrap(),
            StatusCode::CREATED,
        )
        .await
        .unwrap();
    }
    assert_eq!(last["data"]["artworkCount"], 3);
    assert_eq!(last["data"]["newBadges"], json!(["Novice Artist"]));
    assert_eq!(server.staged_uploads().unwrap(), 0);

    let photo = last["data"]["artwork"]["photo"].as_str().unwrap().to_string();
    assert!(photo.starts_with("/artworks/watermarked-"));
    assert!(photo.ends_with(".png"));
    assert!(last["data"]["artwork"]["biddingEndTime"].is_string());

    let served = server.get(&photo).await.unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    let bytes = served.bytes().await.unwrap();
    assert_eq!(&bytes[1..4], b"PNG");

    let badges: Value = assert_json(
        server
            .get_auth("/api/v1/users/my-badges", &artist.token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(badges["data"]["artworkCount"], 3);
    assert_eq!(badges["data"]["badges"][0]["earnedAt"], "3 Artworks");

    let listed: Value = assert_json(server.get("/api/v1/products").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(listed["data"].as_array().unwrap().len(), 3);
    assert_eq!(listed["data"][0]["title"], "Study 2");
    assert_eq!(listed["data"][0]["artist"]["name"], "Vera");
}

#[tokio::test]
async fn test_upload_rejections() {
    let server = server().await;
    let admin = server.sign_up("Root", "admin", None).await.unwrap();
    let artist = server.sign_up("Vera", "artist", Some(&admin)).await.unwrap();
    let buyer = server.sign_up("Bo", "buyer", None).await.unwrap();

    let code = assert_error(
        server
            .post_multipart_auth("/api/v1/products", &buyer.token, artwork_form("X", "[]", Some(png_bytes())))
            .await
            .unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    assert_eq!(code, "ROLE_NOT_ALLOWED");

    assert_status(
        server
            .post_multipart_auth("/api/v1/products", &artist.token, artwork_form("X", "[]", None))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();

    assert_status(
        server
            .post_multipart_auth("/api/v1/products", &artist.token, artwork_form("X", "oil", Some(png_bytes())))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();

    let code = assert_error(
        server
            .post_multipart_auth(
                "/api/v1/products",
                &artist.token,
                artwork_form("X", "[]", Some(b"definitely not an image".to_vec())),
            )
            .await
            .unwrap(),
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await
    .unwrap();
    assert_eq!(code, "PROCESSING_ERROR");
    // The undecodable upload stays in scratch
    assert_eq!(server.staged_uploads().unwrap(), 1);
}

#[tokio::test]
async fn test_photo_board() {
    let server = server().await;

    let empty: Value = assert_json(server.get("/api/v1/posts").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert!(empty["data"].as_array().unwrap().is_empty());

    let photo = png_bytes();
    let mut ids = Vec::new();
    for title in ["Morning sketch", "Evening sketch"] {
        let form = post_form(title, "Drawn from the balcony", r##"["#pencil","#city"]"##, Some(photo.clone()));
        let created: Value = assert_json(
            server.post_multipart("/api/v1/posts", form).await.unwrap(),
            StatusCode::CREATED,
        )
        .await
        .unwrap();
        assert_eq!(created["message"], "Post created successfully!");
        assert_eq!(created["data"]["tags"], json!(["#pencil", "#city"]));
        ids.push(created["data"]["id"].as_str().unwrap().to_string());
    }

    let listed: Value = assert_json(server.get("/api/v1/posts").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(listed["data"].as_array().unwrap().len(), 2);
    assert_eq!(listed["data"][0]["title"], "Evening sketch");

    let single: Value = assert_json(
        server.get(&format!("/api/v1/posts/{}", ids[0])).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(single["data"]["story"], "Drawn from the balcony");

    // Served exactly as uploaded
    let url = single["data"]["photoUrl"].as_str().unwrap().to_string();
    assert!(url.starts_with("/artworks/post-"));
    let served = server.get(&url).await.unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await.unwrap().to_vec(), photo);

    let code = assert_error(server.get("/api/v1/posts/987654321").await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
    assert_eq!(code, "UNKNOWN_POST");

    let code = assert_error(
        server
            .post_multipart("/api/v1/posts", post_form("No photo", "Lost it", "[]", None))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(code, "VALIDATION_ERROR");

    assert_status(
        server
            .post_multipart("/api/v1/posts", post_form("Blank", "   ", "[]", Some(png_bytes())))
            .await
            .unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn test_purchase_inquiry() {
    let server = server().await;
    let admin = server.sign_up("Root", "admin", None).await.unwrap();
    let artist = server.sign_up("Vera", "artist", Some(&admin)).await.unwrap();
    let buyer = server.sign_up("Bo", "buyer", None).await.unwrap();

    let created: Value = assert_json(
        server
            .post_multipart_auth("/api/v1/products", &artist.token, artwork_form("Dune", "[]", Some(png_bytes())))
            .await
            .unwrap(),
        StatusCode::CREATED,
    )
    .await
    .unwrap();
    let id = created["data"]["artwork"]["id"].as_str().unwrap().to_string();
    let path = format!("/api/v1/products/{id}/buy-request");

    let own = assert_error(
        server.post_auth(&path, &artist.token, &json!({})).await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(own, "CANNOT_BUY_OWN_ARTWORK");

    let ok: Value = assert_json(
        server
            .post_auth(&path, &buyer.token, &json!({ "message": "Is it framed?" }))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(ok["status"], "success");

    assert_status(
        server
            .post_auth("/api/v1/products/999/buy-request", &buyer.token, &json!({}))
            .await
            .unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
}

// ============================================================================
// Admin
// ============================================================================

#[tokio::test]
async fn test_admin_routes_require_admin() {
    let server = server().await;
    let buyer = server.sign_up("Bo", "buyer", None).await.unwrap();

    for path in ["/api/v1/admin/stats", "/api/v1/admin/analytics", "/api/v1/admin/communities/pending"] {
        assert_status(
            server.get_auth(path, &buyer.token).await.unwrap(),
            StatusCode::FORBIDDEN,
        )
        .await
        .unwrap();
    }
}

#[tokio::test]
async fn test_admin_dashboard() {
    let server = server().await;
    let (admin, _creator, id) = approved_community(&server, "Sculptors").await;
    let member = server.sign_up("Milo", "buyer", None).await.unwrap();
    let base = format!("/api/v1/communities/{id}");

    server
        .post_auth(&format!("{base}/request-join"), &member.token, &())
        .await
        .unwrap();

    let stats: Value = assert_json(
        server.get_auth("/api/v1/admin/stats", &admin.token).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(stats["data"]["totalBuyers"], 2);
    assert_eq!(stats["data"]["totalCommunities"], 1);

    let analytics: Value = assert_json(
        server
            .get_auth("/api/v1/admin/analytics", &admin.token)
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(analytics["data"]["topCommunities"][0]["name"], "Sculptors");
    assert!(analytics["data"]["messagesOverTime"].as_array().unwrap().is_empty());

    assert_status(
        server
            .patch_auth("/api/v1/admin/communities/424242/reject", &admin.token, &())
            .await
            .unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
}
