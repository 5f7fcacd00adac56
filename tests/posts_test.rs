mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn test_upload_creates_post_with_retrievable_image() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let post_id = app.upload(alice, "sunset", "over the bay").await;

    let post = app.json(&format!("/api/posts/{post_id}")).await;
    assert_eq!(post["title"], "sunset");
    assert_eq!(post["description"], "over the bay");
    assert_eq!(post["user_id"], alice);
    assert_eq!(post["likes"], 0);

    let image_url = post["imageUrl"].as_str().unwrap();
    assert!(image_url.starts_with("/uploads/"));
    assert!(image_url.ends_with(".jpg"));

    let res = app.get(image_url).await;
    assert_eq!(res.status(), 200);
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"\xff\xd8\xff fake jpeg");
}

#[tokio::test]
async fn test_upload_without_title_is_500_and_leaves_file_behind() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    assert_eq!(app.upload_count(), 0);

    let res = app
        .upload_raw(alice, None, "orphan.jpg", b"\xff\xd8\xff".to_vec())
        .await;
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Error creating post");

    // The image is written before the insert fails and is not cleaned up
    assert_eq!(app.upload_count(), 1);
    let rows: i64 = app
        .db
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM posts", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 0);
}

#[tokio::test]
async fn test_upload_larger_than_two_megabytes_is_accepted() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let photo = vec![0xA5u8; 3 * 1024 * 1024];

    let res = app
        .upload_raw(alice, Some("big"), "phone.jpg", photo.clone())
        .await;
    assert_eq!(res.status(), 201);
    let body: Value = res.json().await.unwrap();
    let post = app
        .json(&format!("/api/posts/{}", body["postId"].as_i64().unwrap()))
        .await;

    let served = app.get(post["imageUrl"].as_str().unwrap()).await;
    assert_eq!(served.status(), 200);
    assert_eq!(served.bytes().await.unwrap().len(), photo.len());
}

#[tokio::test]
async fn test_upload_over_configured_limit_is_413() {
    let app = TestApp::spawn_with(|config| config.server.max_upload_bytes = 1024).await;
    let alice = app.register("alice").await;

    let res = app
        .upload_raw(alice, Some("big"), "phone.jpg", vec![0u8; 8 * 1024])
        .await;
    assert_eq!(res.status(), 413);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
    assert!(app.json("/api/posts").await.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_upload_with_non_numeric_user_id_is_400() {
    let app = TestApp::spawn().await;
    let form = reqwest::multipart::Form::new()
        .text("title", "t")
        .text("userId", "abc");
    let res = app
        .client
        .post(app.url("/api/posts"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn test_feed_is_newest_first_and_capped_at_ten() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    for i in 0..12 {
        app.upload(alice, &format!("post {i}"), "").await;
    }

    let feed = app.json("/api/posts").await;
    let titles: Vec<_> = feed
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles.len(), 10);
    assert_eq!(titles[0], "post 11");
    assert_eq!(titles[9], "post 2");
}

#[tokio::test]
async fn test_get_missing_post_is_404() {
    let app = TestApp::spawn().await;
    let res = app.get("/api/posts/42").await;
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Post not found");
}

#[tokio::test]
async fn test_search_matches_title_and_description() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    app.upload(alice, "Golden Gate", "fog").await;
    app.upload(alice, "breakfast", "a golden pancake").await;
    app.upload(alice, "cat", "asleep").await;

    let found = app.json("/api/posts/search?term=GOLDEN").await;
    assert_eq!(found.as_array().unwrap().len(), 2);

    let none = app.json("/api/posts/search?term=zebra").await;
    assert!(none.as_array().unwrap().is_empty());

    let everything = app.json("/api/posts/search").await;
    assert_eq!(everything.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_search_folds_non_ascii_case() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    app.upload(alice, "Été à Paris", "").await;
    app.upload(alice, "winter", "snow").await;

    let found = app.json("/api/posts/search?term=%C3%A9t%C3%A9").await;
    let found = found.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "Été à Paris");
}

#[tokio::test]
async fn test_liking_n_times_adds_n_likes() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let post_id = app.upload(alice, "sunset", "").await;

    for _ in 0..3 {
        let res = app
            .client
            .post(app.url(&format!("/api/posts/{post_id}/like")))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Post liked successfully");
    }

    let post = app.json(&format!("/api/posts/{post_id}")).await;
    assert_eq!(post["likes"], 3);
}

#[tokio::test]
async fn test_created_and_user_routes_list_own_posts() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    app.upload(alice, "a1", "").await;
    app.upload(bob, "b1", "").await;
    app.upload(alice, "a2", "").await;

    for path in [
        format!("/api/posts/created/{alice}"),
        format!("/api/posts/user/{alice}"),
    ] {
        let posts = app.json(&path).await;
        let titles: Vec<_> = posts
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(titles, vec!["a2", "a1"]);
    }
}

#[tokio::test]
async fn test_save_is_idempotent_and_listed() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let first = app.upload(alice, "first", "").await;
    let second = app.upload(alice, "second", "").await;

    for post_id in [first, second, first] {
        let res = app
            .post_json(&format!("/api/posts/{post_id}/save"), json!({ "userId": bob }))
            .await;
        assert_eq!(res.status(), 200);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["message"], "Post saved successfully");
    }

    let saved = app.json(&format!("/api/posts/saved/{bob}")).await;
    let ids: Vec<_> = saved
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![second, first]);
}

#[tokio::test]
async fn test_save_accepts_string_user_id() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let post_id = app.upload(alice, "sunset", "").await;

    let res = app
        .post_json(
            &format!("/api/posts/{post_id}/save"),
            json!({ "userId": alice.to_string() }),
        )
        .await;
    assert_eq!(res.status(), 200);
    let saved = app.json(&format!("/api/posts/saved/{alice}")).await;
    assert_eq!(saved.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_save_of_missing_post_is_500() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let res = app
        .post_json("/api/posts/999/save", json!({ "userId": alice }))
        .await;
    assert_eq!(res.status(), 500);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Error saving post");
}

#[tokio::test]
async fn test_unsave_removes_save_then_404s() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post_id = app.upload(alice, "sunset", "").await;
    app.post_json(&format!("/api/posts/{post_id}/save"), json!({ "userId": bob }))
        .await;

    let path = format!("/api/posts/{post_id}?action=unsave");
    let res = app.delete_json(&path, json!({ "userId": bob })).await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Post unsaved successfully");

    let res = app.delete_json(&path, json!({ "userId": bob })).await;
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Post not found in saved posts");

    // The post itself is untouched
    assert_eq!(app.get(&format!("/api/posts/{post_id}")).await.status(), 200);
}

#[tokio::test]
async fn test_delete_by_non_owner_is_forbidden() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post_id = app.upload(alice, "sunset", "").await;
    app.post_json(&format!("/api/posts/{post_id}/save"), json!({ "userId": bob }))
        .await;

    let res = app
        .delete_json(&format!("/api/posts/{post_id}"), json!({ "userId": bob }))
        .await;
    assert_eq!(res.status(), 403);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized to delete this post");

    assert_eq!(app.get(&format!("/api/posts/{post_id}")).await.status(), 200);
    let saved = app.json(&format!("/api/posts/saved/{bob}")).await;
    assert_eq!(saved.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_delete_by_owner_removes_post_and_saves() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let bob = app.register("bob").await;
    let post_id = app.upload(alice, "sunset", "").await;
    app.post_json(&format!("/api/posts/{post_id}/save"), json!({ "userId": bob }))
        .await;

    let res = app
        .delete_json(
            &format!("/api/posts/{post_id}?action=delete"),
            json!({ "userId": alice }),
        )
        .await;
    assert_eq!(res.status(), 200);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["message"], "Post deleted and unsaved successfully");

    assert_eq!(app.get(&format!("/api/posts/{post_id}")).await.status(), 404);
    let saved = app.json(&format!("/api/posts/saved/{bob}")).await;
    assert!(saved.as_array().unwrap().is_empty());
    let remaining: i64 = app
        .db
        .get()
        .unwrap()
        .query_row("SELECT COUNT(*) FROM saves WHERE post_id = ?1", [post_id], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn test_delete_and_save_without_body_use_empty_user() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let post_id = app.upload(alice, "sunset", "").await;

    let unsave = app
        .client
        .delete(app.url(&format!("/api/posts/{post_id}?action=unsave")))
        .send()
        .await
        .unwrap();
    assert_eq!(unsave.status(), 404);
    let body: Value = unsave.json().await.unwrap();
    assert_eq!(body["error"], "Post not found in saved posts");

    let delete = app
        .client
        .delete(app.url(&format!("/api/posts/{post_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(delete.status(), 403);
    let body: Value = delete.json().await.unwrap();
    assert_eq!(body["error"], "Unauthorized to delete this post");

    let save = app
        .client
        .post(app.url(&format!("/api/posts/{post_id}/save")))
        .send()
        .await
        .unwrap();
    assert_eq!(save.status(), 500);
    let body: Value = save.json().await.unwrap();
    assert_eq!(body["error"], "Error saving post");

    assert_eq!(app.get(&format!("/api/posts/{post_id}")).await.status(), 200);
}

#[tokio::test]
async fn test_malformed_json_body_is_400() {
    let app = TestApp::spawn().await;
    let res = app
        .client
        .delete(app.url("/api/posts/1"))
        .header("Content-Type", "application/json")
        .body("{oops")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_delete_missing_post_is_404() {
    let app = TestApp::spawn().await;
    let alice = app.register("alice").await;
    let res = app
        .delete_json("/api/posts/777", json!({ "userId": alice }))
        .await;
    assert_eq!(res.status(), 404);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Post not found");
}
