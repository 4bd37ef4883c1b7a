// Integration tests for Food Match

use actix_web::{test, web, App};
use async_trait::async_trait;
use food_match::core::Matcher;
use food_match::error::handle_json_payload_error;
use food_match::models::{Coordinates, Document};
use food_match::routes::{self, AppState};
use food_match::services::{
    Collection, FixedGeocoder, Geocoder, MemoryStore, RecordStore, SampleStore, SheetsStore, StoreError,
};
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Geocoder that records every location it is asked about
struct CountingGeocoder {
    inner: FixedGeocoder,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl CountingGeocoder {
    fn new() -> Self {
        Self {
            inner: FixedGeocoder::with_sample_places(),
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Geocoder for CountingGeocoder {
    async fn resolve(&self, location: &str) -> Option<Coordinates> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(location.to_string());
        self.inner.resolve(location).await
    }

    fn name(&self) -> &'static str {
        "Counting"
    }
}

/// Store whose every call fails
struct BrokenStore;

#[async_trait]
impl RecordStore for BrokenStore {
    async fn list(&self, _collection: Collection) -> Result<Vec<Document>, StoreError> {
        Err(StoreError::ApiError("backend unavailable".into()))
    }

    async fn insert(&self, _collection: Collection, _fields: Map<String, Value>) -> Result<String, StoreError> {
        Err(StoreError::Unauthorized)
    }

    fn name(&self) -> &'static str {
        "Broken"
    }
}

fn state_with(store: Arc<dyn RecordStore>, geocoder: Arc<dyn Geocoder>) -> AppState {
    AppState::new(store, geocoder, Matcher::default())
}

fn memory_state() -> AppState {
    state_with(Arc::new(MemoryStore::new()), Arc::new(FixedGeocoder::with_sample_places()))
}

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

async fn seed(store: &MemoryStore, collection: Collection, record: Value) {
    let fields = match record {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    store.insert(collection, fields).await.unwrap();
}

#[actix_web::test]
async fn test_health_reports_store() {
    let app = init_app!(memory_state());

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["service"], "Food Donation Matching Service");
    assert_eq!(body["database"], "In-Memory");
    assert!(body["timestamp"].is_string());
}

#[actix_web::test]
async fn test_index_lists_endpoints() {
    let app = init_app!(memory_state());

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["message"], "Food Donation Matching API");
    assert!(body["endpoints"]["GET /api/matches"].is_string());
    assert!(body["endpoints"]["POST /api/ngos"].is_string());
    assert!(body.get("sheets").is_none());
}

#[actix_web::test]
async fn test_index_lists_sheet_names_for_sheets_backend() {
    // never contacted: the index only reads the configured names
    let sheets = SheetsStore::new(
        "http://127.0.0.1:9".to_string(),
        "sheet123".to_string(),
        "token".to_string(),
        "Donors".to_string(),
        "NGO Requests".to_string(),
    )
    .unwrap();
    let app = init_app!(state_with(Arc::new(sheets), Arc::new(FixedGeocoder::new())));

    let req = test::TestRequest::get().uri("/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["database"], "Google Sheets");
    assert_eq!(body["sheets"]["donors_sheet"], "Donors");
    assert_eq!(body["sheets"]["ngos_sheet"], "NGO Requests");
}

#[actix_web::test]
async fn test_end_to_end_nearest_ngo() {
    let store = Arc::new(MemoryStore::new());
    seed(
        &store,
        Collection::Donations,
        json!({ "foodType": "Rice", "quantity": "10 kg", "expiryTime": 48, "location": "New York, NY" }),
    )
    .await;
    seed(
        &store,
        Collection::NgoRequests,
        json!({ "ngoName": "Shelter", "foodNeeded": "Anything", "location": "Staten Island, NY" }),
    )
    .await;
    seed(
        &store,
        Collection::NgoRequests,
        json!({ "ngoName": "Food Bank NYC", "foodNeeded": "Rice", "location": "Manhattan, NY" }),
    )
    .await;

    let app = init_app!(state_with(store, Arc::new(FixedGeocoder::with_sample_places())));

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["total_donors"], 1);
    assert_eq!(body["total_ngos"], 2);
    assert_eq!(body["successful_matches"], 1);

    let matched = &body["matches"][0];
    assert_eq!(matched["donor"]["food_type"], "Rice");
    assert_eq!(matched["donor"]["expiry_time_hours"], 48);
    assert_eq!(matched["matched_ngo"]["ngo_name"], "Food Bank NYC");

    let distance = matched["matched_ngo"]["distance_km"].as_f64().unwrap();
    assert!(distance > 5.0 && distance < 15.0, "got {}", distance);
    assert!(matched["donor"]["coordinates"].is_array());
}

#[actix_web::test]
async fn test_unresolvable_donor_is_counted_not_matched() {
    let store = Arc::new(MemoryStore::new());
    seed(
        &store,
        Collection::Donations,
        json!({ "foodType": "Bread", "quantity": "5", "expiryTime": 4, "location": "" }),
    )
    .await;
    seed(
        &store,
        Collection::Donations,
        json!({ "foodType": "Soup", "quantity": "2", "expiryTime": 4, "location": "Atlantis" }),
    )
    .await;
    seed(
        &store,
        Collection::NgoRequests,
        json!({ "ngoName": "Community Kitchen", "foodNeeded": "Bread", "location": "Bronx, NY" }),
    )
    .await;

    let app = init_app!(state_with(store, Arc::new(FixedGeocoder::with_sample_places())));

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_donors"], 2);
    assert_eq!(body["successful_matches"], 0);
    assert_eq!(body["unresolved_donors"], 2);
    assert_eq!(body["matches"], json!([]));
}

#[actix_web::test]
async fn test_no_ngos_yields_no_matches() {
    let store = Arc::new(MemoryStore::new());
    seed(
        &store,
        Collection::Donations,
        json!({ "foodType": "Rice", "quantity": "1", "expiryTime": 1, "location": "Queens, NY" }),
    )
    .await;

    let app = init_app!(state_with(store, Arc::new(FixedGeocoder::with_sample_places())));

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_ngos"], 0);
    assert_eq!(body["successful_matches"], 0);
    assert_eq!(body["matches"], json!([]));
}

#[actix_web::test]
async fn test_each_location_geocoded_once_per_pass() {
    let store = Arc::new(MemoryStore::new());
    for food in ["Rice", "Bread", "Milk"] {
        seed(
            &store,
            Collection::Donations,
            json!({ "foodType": food, "quantity": "1", "expiryTime": 3, "location": "Queens, NY" }),
        )
        .await;
    }
    seed(
        &store,
        Collection::NgoRequests,
        json!({ "ngoName": "A", "foodNeeded": "Any", "location": "Bronx, NY" }),
    )
    .await;
    seed(
        &store,
        Collection::NgoRequests,
        json!({ "ngoName": "B", "foodNeeded": "Any", "location": "Bronx, NY" }),
    )
    .await;

    let geocoder = Arc::new(CountingGeocoder::new());
    let app = init_app!(state_with(store, geocoder.clone()));

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["successful_matches"], 3);
    assert_eq!(geocoder.calls.load(Ordering::SeqCst), 2);

    let mut seen = geocoder.seen.lock().unwrap().clone();
    seen.sort();
    assert_eq!(seen, vec!["Bronx, NY".to_string(), "Queens, NY".to_string()]);
}

#[actix_web::test]
async fn test_create_then_list_donor() {
    let app = init_app!(memory_state());

    let req = test::TestRequest::post()
        .uri("/api/donors")
        .set_json(json!({
            "foodType": "Vegetables",
            "quantity": "15 kg",
            "expiryTime": 12,
            "location": "Queens, NY"
        }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(created["success"], true);
    assert_eq!(created["message"], "Donor added successfully");
    let id = created["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("donor_"));

    let req = test::TestRequest::get().uri("/api/donors").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(listed["count"], 1);
    assert_eq!(listed["donors"][0]["id"], id.as_str());
    assert_eq!(listed["donors"][0]["foodType"], "Vegetables");
    assert_eq!(listed["donors"][0]["expiryTime"], 12);
    assert!(listed["donors"][0]["timestamp"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_web::test]
async fn test_create_then_list_ngo() {
    let app = init_app!(memory_state());

    let req = test::TestRequest::post()
        .uri("/api/ngos")
        .set_json(json!({ "ngoName": "Food Bank NYC", "foodNeeded": "Rice", "location": "Manhattan, NY" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(created["message"], "NGO added successfully");
    assert!(created["id"].as_str().unwrap().starts_with("ngo_"));

    let req = test::TestRequest::get().uri("/api/ngos").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(listed["count"], 1);
    assert_eq!(listed["ngos"][0]["ngoName"], "Food Bank NYC");
}

#[actix_web::test]
async fn test_create_donor_missing_location() {
    let app = init_app!(memory_state());

    let req = test::TestRequest::post()
        .uri("/api/donors")
        .set_json(json!({ "foodType": "Rice", "quantity": "1 kg", "expiryTime": 5 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Missing required field: location");

    let req = test::TestRequest::get().uri("/api/donors").to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed["count"], 0);
}

#[actix_web::test]
async fn test_create_donor_rejects_negative_expiry() {
    let app = init_app!(memory_state());

    let req = test::TestRequest::post()
        .uri("/api/donors")
        .set_json(json!({ "foodType": "Rice", "quantity": "1 kg", "expiryTime": -3, "location": "Queens, NY" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Invalid value for field: expiryTime");
}

#[actix_web::test]
async fn test_create_ngo_blank_name() {
    let app = init_app!(memory_state());

    let req = test::TestRequest::post()
        .uri("/api/ngos")
        .set_json(json!({ "ngoName": "", "foodNeeded": "Rice", "location": "Bronx, NY" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Missing required field: ngoName");
}

#[actix_web::test]
async fn test_create_without_json_body() {
    let app = init_app!(memory_state());

    let req = test::TestRequest::post().uri("/api/ngos").set_payload("ngoName=x").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "No data provided");
}

#[actix_web::test]
async fn test_store_failure_is_500() {
    let app = init_app!(state_with(Arc::new(BrokenStore), Arc::new(FixedGeocoder::new())));

    for uri in ["/api/matches", "/api/donors", "/api/ngos"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }
}

#[actix_web::test]
async fn test_sample_dataset_matches_and_is_read_only() {
    let app = init_app!(state_with(
        Arc::new(SampleStore::new()),
        Arc::new(FixedGeocoder::with_sample_places())
    ));

    let req = test::TestRequest::get().uri("/api/matches").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["total_donors"], 3);
    assert_eq!(body["total_ngos"], 3);
    assert_eq!(body["successful_matches"], 3);

    let req = test::TestRequest::post()
        .uri("/api/ngos")
        .set_json(json!({ "ngoName": "New", "foodNeeded": "Rice", "location": "Bronx, NY" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 500);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Sample dataset store is read-only");
}
