use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use agrisage_core::Preferences;
use agrisage_hub::telemetry::{Drift, Roster};
use agrisage_hub::{
    AppState, ContractLedger, DisabledGenerator, Generator, HttpGenerator, MemoryPreferences,
    RosterState,
};
use axum::{Json, Router, routing::post};
use serde_json::{Value, json};
use tokio::net::TcpListener;

async fn spawn(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

/// A stand-in generation service that answers per flow and echoes the
/// prompt so tests can see what was sent.
async fn fake_generate(Json(request): Json<Value>) -> Json<Value> {
    let prompt = request["prompt"].as_str().unwrap_or_default().to_owned();
    let output = match request["flow"].as_str() {
        Some("price-prediction") => json!({
            "priceForecast": "₹3,800/quintal",
            "recommendations": prompt,
        }),
        Some("fertilizer-recommendation") => json!({
            "recommendation": prompt,
            "sustainabilityScore": 140,
            "carbonFootprintEstimate": "Low",
        }),
        _ => return Json(json!({})),
    };
    Json(json!({ "output": output }))
}

async fn hub(generator: Arc<dyn Generator>, preferences: Preferences) -> SocketAddr {
    let state = AppState {
        telemetry: RosterState::new(Roster::seed(), Drift::default(), Some(42)),
        preferences: MemoryPreferences::new(preferences),
        generator,
        contracts: ContractLedger::default(),
    };
    spawn(agrisage_hub::app(state)).await
}

async fn hub_with_fake_service(preferences: Preferences) -> SocketAddr {
    let service = spawn(Router::new().route("/generate", post(fake_generate))).await;
    let generator = HttpGenerator::new(
        format!("http://{service}/generate"),
        Duration::from_secs(5),
    )
    .unwrap();
    hub(Arc::new(generator), preferences).await
}

#[tokio::test]
async fn health_and_devices() {
    let addr = hub(Arc::new(DisabledGenerator), Preferences::default()).await;
    let client = reqwest::Client::new();

    let health = client.get(format!("http://{addr}/health")).send().await.unwrap();
    assert_eq!(health.text().await.unwrap(), "OK");

    let body: Value = client
        .get(format!("http://{addr}/api/devices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(true));
    let devices = body["data"].as_array().unwrap();
    let ids: Vec<_> = devices.iter().map(|d| d["id"].as_str().unwrap()).collect();
    assert_eq!(ids, ["SS-PLOT-A-001", "WS-MAIN-001", "DR-NF-001"]);

    let drone = &devices[2];
    assert_eq!(drone["status"], json!("Offline"));
    assert_eq!(drone["signal"], json!(0));
    assert_eq!(drone["battery"], json!(11.0));
    assert_eq!(drone["data"], json!([]));
}

#[tokio::test]
async fn advisory_prefills_from_settings() {
    let preferences = Preferences {
        default_location: Some("Karnal, Haryana".into()),
        default_crop: Some("Basmati Rice".into()),
        ..Default::default()
    };
    let addr = hub_with_fake_service(preferences).await;

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/api/advisory/price"))
        .json(&json!({ "cropType": "", "location": "" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["priceForecast"], json!("₹3,800/quintal"));
    let prompt = body["data"]["recommendations"].as_str().unwrap();
    assert!(prompt.contains("Basmati Rice"));
    assert!(prompt.contains("Karnal, Haryana"));
}

#[tokio::test]
async fn advisory_clamps_scores() {
    let addr = hub_with_fake_service(Preferences::default()).await;

    let body: Value = reqwest::Client::new()
        .post(format!("http://{addr}/api/advisory/fertilizer"))
        .json(&json!({
            "soilHealthParameters": "pH 6.5, N 240 kg/ha, P 18 kg/ha, K 210 kg/ha",
            "cropType": "Wheat",
            "weatherData": "Mild winter, 40mm rain expected",
            "region": "Punjab",
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["sustainabilityScore"], json!(100.0));
}

#[tokio::test]
async fn advisory_validation_and_failures() {
    let addr = hub_with_fake_service(Preferences::default()).await;
    let client = reqwest::Client::new();

    let invalid = client
        .post(format!("http://{addr}/api/advisory/price"))
        .json(&json!({ "cropType": "R", "location": "Karnal" }))
        .send()
        .await
        .unwrap();
    assert_eq!(invalid.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = invalid.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Crop type is required."));

    // The fake service returns no output for this flow.
    let failed = client
        .post(format!("http://{addr}/api/advisory/crop"))
        .json(&json!({
            "microclimate": "Humid, frequent morning fog",
            "weatherForecast": "Heavy monsoon expected",
            "pollutionLevels": "Low AQI, occasional stubble smoke",
            "soilType": "Alluvial",
            "region": "Bihar",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(failed.status(), reqwest::StatusCode::BAD_GATEWAY);
    let body: Value = failed.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Failed to get crop suggestions."));
}

#[tokio::test]
async fn settings_round_trip() {
    let addr = hub(Arc::new(DisabledGenerator), Preferences::default()).await;
    let client = reqwest::Client::new();

    let saved: Value = client
        .put(format!("http://{addr}/api/settings"))
        .json(&json!({ "defaultRegion": "Punjab" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(saved["success"], json!(true));

    let loaded: Value = client
        .get(format!("http://{addr}/api/settings"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(loaded["data"]["defaultRegion"], json!("Punjab"));
}

#[tokio::test]
async fn contracts_create_and_list() {
    let addr = hub(Arc::new(DisabledGenerator), Preferences::default()).await;
    let client = reqwest::Client::new();

    let created = client
        .post(format!("http://{addr}/api/contracts"))
        .json(&json!({
            "buyerName": "Global Food Corp",
            "cropName": "Basmati Rice",
            "quantity": "100",
            "price": "3800",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(created.status(), reqwest::StatusCode::CREATED);
    let body: Value = created.json().await.unwrap();
    assert_eq!(
        body["message"],
        json!("Your digital contract with Global Food Corp has been recorded on the blockchain.")
    );
    let hash = body["data"]["transactionHash"].as_str().unwrap();
    assert_eq!(hash.len(), 42);

    let rejected = client
        .post(format!("http://{addr}/api/contracts"))
        .json(&json!({ "buyerName": "G", "cropName": "Rice", "quantity": "1", "price": "1" }))
        .send()
        .await
        .unwrap();
    assert_eq!(rejected.status(), reqwest::StatusCode::BAD_REQUEST);
    let body: Value = rejected.json().await.unwrap();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Buyer name is required."));
    assert!(body.get("message").is_none());

    let listed: Value = client
        .get(format!("http://{addr}/api/contracts"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed["data"]["total"], json!(1));
    assert_eq!(listed["data"]["items"][0]["transactionHash"], json!(hash));
}
