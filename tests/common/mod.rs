#![allow(dead_code)]

use std::net::SocketAddr;

use flickcraze::config::Config;
use flickcraze::db;
use flickcraze::routes;
use flickcraze::state::{AppState, DbPool};
use flickcraze::uploads::UploadStore;
use serde_json::{json, Value};
use tempfile::TempDir;

/// A running server on an ephemeral port, backed by a throwaway data dir.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub db: DbPool,
    pub config: Config,
    _data_dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(configure: impl FnOnce(&mut Config)) -> Self {
        let data_dir = TempDir::new().unwrap();
        let mut config = Config::with_data_dir(data_dir.path());
        configure(&mut config);

        let pool = db::create_pool(&config.db_path()).expect("Failed to create test database");
        db::run_migrations(&pool).expect("Failed to run migrations");

        let state = AppState {
            db: pool.clone(),
            uploads: UploadStore::new(config.uploads_path()),
            config: config.clone(),
        };
        let app = routes::app(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestApp {
            addr,
            client: reqwest::Client::new(),
            db: pool,
            config,
            _data_dir: data_dir,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn post_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.post(self.url(path)).json(&body).send().await.unwrap()
    }

    pub async fn delete_json(&self, path: &str, body: Value) -> reqwest::Response {
        self.client.delete(self.url(path)).json(&body).send().await.unwrap()
    }

    /// Registers `name` with contact `<name>@example.com` and password `secret`.
    pub async fn register(&self, name: &str) -> i64 {
        let res = self
            .post_json(
                "/api/users",
                json!({
                    "contact": format!("{name}@example.com"),
                    "username": name,
                    "password": "secret",
                    "fullname": format!("{name} tester"),
                }),
            )
            .await;
        assert_eq!(res.status(), 201);
        let body: Value = res.json().await.unwrap();
        body["userId"].as_i64().unwrap()
    }

    pub async fn upload(&self, user_id: i64, title: &str, description: &str) -> i64 {
        let image = reqwest::multipart::Part::bytes(b"\xff\xd8\xff fake jpeg".to_vec())
            .file_name("beach.jpg")
            .mime_str("image/jpeg")
            .unwrap();
        let form = reqwest::multipart::Form::new()
            .text("title", title.to_string())
            .text("description", description.to_string())
            .text("userId", user_id.to_string())
            .part("image", image);
        let res = self
            .client
            .post(self.url("/api/posts"))
            .multipart(form)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 201);
        let body: Value = res.json().await.unwrap();
        body["postId"].as_i64().unwrap()
    }

    /// Multipart upload with an explicit image; `title` is left out when `None`.
    pub async fn upload_raw(
        &self,
        user_id: i64,
        title: Option<&str>,
        file_name: &str,
        data: Vec<u8>,
    ) -> reqwest::Response {
        let image = reqwest::multipart::Part::bytes(data)
            .file_name(file_name.to_string())
            .mime_str("image/jpeg")
            .unwrap();
        let mut form = reqwest::multipart::Form::new().text("userId", user_id.to_string());
        if let Some(title) = title {
            form = form.text("title", title.to_string());
        }
        self.client
            .post(self.url("/api/posts"))
            .multipart(form.part("image", image))
            .send()
            .await
            .unwrap()
    }

    pub fn upload_count(&self) -> usize {
        match std::fs::read_dir(self.config.uploads_path()) {
            Ok(entries) => entries.count(),
            Err(_) => 0,
        }
    }

    pub async fn json(&self, path: &str) -> Value {
        let res = self.get(path).await;
        assert!(res.status().is_success(), "GET {path} -> {}", res.status());
        res.json().await.unwrap()
    }
}
