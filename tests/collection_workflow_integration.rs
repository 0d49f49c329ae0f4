use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tokio::time::{sleep, Duration};

// Test client wrapper for making API calls
struct TestClient {
    client: Client,
    base_url: String,
}

impl TestClient {
    fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .post(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn put(&self, path: &str, json: Value) -> reqwest::Result<reqwest::Response> {
        self.client
            .put(&format!("{}{}", self.base_url, path))
            .json(&json)
            .send()
            .await
    }

    async fn get(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .get(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }

    async fn delete(&self, path: &str) -> reqwest::Result<reqwest::Response> {
        self.client
            .delete(&format!("{}{}", self.base_url, path))
            .send()
            .await
    }
}

#[tokio::test]
async fn test_collection_workflow_against_running_server() {
    // Runs against a live server (PostgreSQL storage). Start it with
    // `cargo run` and set TEST_API_BASE_URL, e.g. http://localhost:8000
    let Ok(base_url) = std::env::var("TEST_API_BASE_URL") else {
        println!("TEST_API_BASE_URL not set, skipping live integration test");
        return;
    };

    let client = TestClient::new(base_url);

    // Wait for API server to be ready
    let mut retries = 0;
    let max_retries = 30;
    loop {
        match client.get("/health").await {
            Ok(resp) if resp.status().is_success() => break,
            _ => {
                if retries >= max_retries {
                    panic!("API server is not responding after {} attempts", max_retries);
                }
                sleep(Duration::from_secs(2)).await;
                retries += 1;
            }
        }
    }

    let count_before: Value = client
        .get("/request_count/")
        .await
        .expect("Failed to read request count")
        .json()
        .await
        .expect("Invalid request count body");
    let count_before = count_before["total_requests"].as_u64().unwrap();

    // Unique external id so repeated runs do not collide
    let external_id = chrono::Utc::now().timestamp_millis();
    let movie_response = client
        .post(
            "/movies/",
            json!({
                "external_id": external_id,
                "title": "Integration Movie",
                "description": "Created by the integration test",
                "genre": "Test"
            }),
        )
        .await
        .expect("Failed to create movie");
    assert_eq!(movie_response.status(), StatusCode::CREATED);

    let create_response = client
        .post(
            "/collections/create/",
            json!({"name": "Integration", "movies": [{"external_id": external_id}]}),
        )
        .await
        .expect("Failed to create collection");
    assert_eq!(create_response.status(), StatusCode::CREATED);
    let created: Value = create_response.json().await.unwrap();
    let collection_id = created["collection_id"].as_i64().unwrap();

    let detail: Value = client
        .get(&format!("/collections/{}/", collection_id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["name"], "Integration");
    assert_eq!(detail["movies"], json!([{"external_id": external_id}]));

    // Replacing membership with an unknown movie clears it
    let update_response = client
        .put(
            &format!("/collections/update/{}/", collection_id),
            json!({"movies": [{"external_id": -1}]}),
        )
        .await
        .unwrap();
    assert_eq!(update_response.status(), StatusCode::NOT_FOUND);

    let detail: Value = client
        .get(&format!("/collections/{}/", collection_id))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(detail["movies"], json!([]));

    let delete_response = client
        .delete(&format!("/collections/delete/{}/", collection_id))
        .await
        .unwrap();
    assert_eq!(delete_response.status(), StatusCode::NO_CONTENT);

    let missing = client
        .get(&format!("/collections/{}/", collection_id))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let count_after: Value = client.get("/request_count/").await.unwrap().json().await.unwrap();
    assert!(count_after["total_requests"].as_u64().unwrap() >= count_before + 8);
}
