use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crips_transport::{
    config::EnvironmentConfig,
    create_app,
    dto::auth_dto::CreateUserRequest,
    models::Role,
    repositories::MemoryDocumentStore,
    services::AuthService,
    state::AppState,
};

const ADMIN_EMAIL: &str = "admin@crips.lk";
const ADMIN_PASSWORD: &str = "admin-password";

struct TestResponse {
    status: StatusCode,
    body: Value,
}

impl TestResponse {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn json(&self) -> &Value {
        &self.body
    }
}

struct TestApp {
    router: Router,
    state: AppState,
}

impl TestApp {
    async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        TestResponse { status, body }
    }

    async fn get(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    async fn post(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    async fn put(&self, uri: &str, token: &str, body: Value) -> TestResponse {
        self.request(Method::PUT, uri, Some(token), Some(body)).await
    }

    async fn delete(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::DELETE, uri, Some(token), None).await
    }

    async fn login(&self, email: &str, password: &str) -> String {
        let response = self
            .request(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
        response.json()["data"]["token"].as_str().unwrap().to_string()
    }

    async fn user_token(&self, email: &str, role: Role) -> String {
        AuthService::new(&self.state)
            .create_user(&CreateUserRequest {
                name: "Test User".to_string(),
                email: email.to_string(),
                password: "user-password".to_string(),
                role,
            })
            .await
            .unwrap();
        self.login(email, "user-password").await
    }
}

async fn create_test_app() -> TestApp {
    let config = EnvironmentConfig {
        bcrypt_cost: 4,
        scheduling_reference_date: NaiveDate::from_ymd_opt(2025, 5, 20),
        admin_email: Some(ADMIN_EMAIL.to_string()),
        admin_password: Some(ADMIN_PASSWORD.to_string()),
        ..EnvironmentConfig::default()
    };
    let state = AppState::new(Arc::new(MemoryDocumentStore::new()), config.clone());
    AuthService::new(&state).ensure_admin(&config).await.unwrap();

    TestApp {
        router: create_app(state.clone()),
        state,
    }
}

/// Vehículo V1, conductor D1 y la orden O1 confirmada
async fn seed_fleet_and_order(app: &TestApp, token: &str) {
    let response = app
        .post(
            "/api/vehicles",
            token,
            json!({
                "vehicleId": "V1",
                "type": "Refrigerated Truck",
                "capacity": 500,
                "temperatureControl": true,
                "humidityControl": true,
                "registrationNumber": "WP CAB-1234"
            }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());

    let response = app
        .post(
            "/api/drivers",
            token,
            json!({
                "driverId": "D1",
                "name": "Nimal Perera",
                "contactNumber": "0771234567",
                "licenseNumber": "B1234567"
            }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());

    let response = app
        .post(
            "/api/orders",
            token,
            json!({
                "orderId": "O1",
                "customerName": "Green Leaf Gardens",
                "shippingInfo": { "city": "Colombo", "country": "Sri Lanka" },
                "total": 125.5
            }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
    assert_eq!(response.json()["data"]["status"], "Pending");

    let response = app
        .put("/api/orders/O1/status", token, json!({ "status": "confirmed" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
}

fn schedule_body(orders: Value, departure: &str, arrival: &str) -> Value {
    json!({
        "orderIds": orders,
        "vehicleId": "V1",
        "driverId": "D1",
        "departureDate": departure,
        "expectedArrivalDate": arrival,
        "location": "Colombo"
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app.request(Method::GET, "/api/health", None, None).await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["status"], "ok");
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = create_test_app().await;
    let response = app.request(Method::GET, "/api/schedules", None, None).await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_invalid_credentials() {
    let app = create_test_app().await;
    let response = app
        .request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": ADMIN_EMAIL, "password": "not-the-password" })),
        )
        .await;

    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(response.json()["error"], "Invalid email or password");
}

#[tokio::test]
async fn test_role_access() {
    let app = create_test_app().await;
    let inventory = app.user_token("inventory@crips.lk", Role::InventoryManager).await;

    let response = app.get("/api/schedules", &inventory).await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);

    let response = app.get("/api/reports/shipments/monthly", &inventory).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app
        .post(
            "/api/users",
            &inventory,
            json!({
                "name": "Someone",
                "email": "someone@crips.lk",
                "password": "long-enough",
                "role": "Customer"
            }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_logout_revokes_the_session() {
    let app = create_test_app().await;
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app.get("/api/auth/me", &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["data"]["role"], "System Manager");

    let response = app.post("/api/auth/logout", &token, json!({})).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.get("/api/auth/me", &token).await;
    assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);

    // Un login nuevo sigue funcionando
    let fresh = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    assert_eq!(app.get("/api/auth/me", &fresh).await.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_schedule_validation_messages() {
    let app = create_test_app().await;
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    seed_fleet_and_order(&app, &token).await;

    let response = app
        .post("/api/schedules", &token, schedule_body(json!([]), "2025-06-01", "2025-06-05"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "At least one order must be selected.");

    let response = app
        .post("/api/schedules", &token, schedule_body(json!(["O1"]), "2025-06-05", "2025-06-05"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "Expected arrival date must be after departure date"
    );

    let response = app
        .post("/api/schedules", &token, schedule_body(json!(["O1"]), "2025-05-01", "2025-05-05"))
        .await;
    assert_eq!(response.json()["error"], "Departure date cannot be in the past.");

    // Nada se escribió
    let response = app.get("/api/schedules", &token).await;
    assert_eq!(response.json()["data"], json!([]));
}

#[tokio::test]
async fn test_schedule_start_deliver_flow() {
    let app = create_test_app().await;
    let admin = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let token = app.user_token("transport@crips.lk", Role::TransportManager).await;
    seed_fleet_and_order(&app, &admin).await;

    let response = app.get("/api/schedules/orders/ready", &token).await;
    assert_eq!(response.json()["data"][0]["id"], "O1");

    let response = app
        .post("/api/schedules", &token, schedule_body(json!(["O1"]), "2025-06-01", "2025-06-05"))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
    let schedule = response.json()["data"].clone();
    assert_eq!(schedule["status"], "Scheduled");
    let id = schedule["id"].as_str().unwrap().to_string();
    let shipment_id = schedule["shipmentId"].as_str().unwrap().to_string();

    let response = app.get("/api/schedules/orders/ready", &token).await;
    assert_eq!(response.json()["data"], json!([]));

    let response = app
        .post(&format!("/api/shipments/{}/start", id), &token, json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
    assert_eq!(response.json()["data"]["status"], "In Progress");

    let response = app
        .post(&format!("/api/shipments/{}/delay", id), &token, json!({ "reason": " " }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["error"], "Delay reason is required.");

    let response = app
        .post(&format!("/api/shipments/{}/deliver", id), &token, json!({}))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json()["data"]["status"], "Delivered");
    assert_eq!(response.json()["data"]["locationEditable"], false);

    let response = app
        .put(
            &format!("/api/shipments/{}/location", id),
            &token,
            json!({ "location": "Kandy" }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.json()["error"],
        "Location cannot be updated for a delivered shipment"
    );

    let response = app.get("/api/orders", &token).await;
    assert_eq!(response.json()["data"][0]["status"], "Delivered");

    let response = app.get("/api/shipments/delivered", &token).await;
    assert_eq!(response.json()["data"][0]["shipmentId"], shipment_id.as_str());

    let response = app.get("/api/drivers/D1", &token).await;
    assert_eq!(response.json()["data"]["status"], "Available");

    let response = app.get("/api/notifications", &token).await;
    let messages: Vec<&str> = response.json()["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["message"].as_str().unwrap())
        .collect();
    assert_eq!(messages.len(), 3);
    assert!(messages[2].ends_with("is now Delivered"));
}

#[tokio::test]
async fn test_shipment_update_with_location_and_status() {
    let app = create_test_app().await;
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    seed_fleet_and_order(&app, &token).await;

    let response = app
        .post("/api/schedules", &token, schedule_body(json!(["O1"]), "2025-06-01", "2025-06-05"))
        .await;
    let id = response.json()["data"]["id"].as_str().unwrap().to_string();
    let shipment_id = response.json()["data"]["shipmentId"].as_str().unwrap().to_string();
    let uri = format!("/api/shipments/{}", id);

    let response = app.post(&format!("{}/start", uri), &token, json!({})).await;
    assert_eq!(response.json()["data"]["status"], "In Progress");

    // Solo ubicación: el estado actual se conserva
    let response = app.put(&uri, &token, json!({ "location": "Kandy" })).await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
    assert_eq!(response.json()["data"]["location"], "Kandy");
    assert_eq!(response.json()["data"]["status"], "In Progress");

    let response = app
        .put(&uri, &token, json!({ "location": "Galle", "status": "In Transit" }))
        .await;
    assert_eq!(response.json()["data"]["location"], "Galle");
    assert_eq!(response.json()["data"]["status"], "In Transit");

    let response = app
        .put(&uri, &token, json!({ "location": "Matara", "status": "Delivered" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
    assert_eq!(response.json()["data"]["location"], "Matara");
    assert_eq!(response.json()["data"]["status"], "Delivered");
    assert_eq!(response.json()["data"]["locationEditable"], false);

    let response = app.put(&uri, &token, json!({ "location": "Colombo" })).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.json()["error"],
        "Location cannot be updated for a delivered shipment"
    );

    let response = app.put(&uri, &token, json!({ "status": "In Transit" })).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(
        response.json()["error"],
        format!("Shipment {} has already been delivered", shipment_id)
    );

    let response = app.get("/api/shipments/delivered", &token).await;
    assert_eq!(response.json()["data"][0]["location"], "Matara");
}

#[tokio::test]
async fn test_malformed_body_uses_error_envelope() {
    let app = create_test_app().await;
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let response = app
        .post(
            "/api/quality",
            &token,
            json!({ "shipmentId": "SHP-0001", "condition": "Broken" }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "BAD_REQUEST");
    assert!(response.json()["error"].as_str().is_some());

    let response = app
        .post(
            "/api/vehicles",
            &token,
            json!({
                "vehicleId": "V1",
                "type": "Van",
                "capacity": "x",
                "registrationNumber": "AB-1234"
            }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "BAD_REQUEST");

    let response = app
        .post(
            "/api/vehicles",
            &token,
            json!({
                "vehicleId": "  ",
                "type": "Van",
                "capacity": 10,
                "registrationNumber": "AB-1234"
            }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json()["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_quality_checks_require_delivered_shipment() {
    let app = create_test_app().await;
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    seed_fleet_and_order(&app, &token).await;

    let response = app
        .post("/api/quality", &token, json!({ "condition": "Intact" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json()["error"],
        "Shipment ID is required to log a quality check."
    );

    let response = app
        .post("/api/schedules", &token, schedule_body(json!(["O1"]), "2025-06-01", "2025-06-05"))
        .await;
    let shipment_id = response.json()["data"]["shipmentId"].as_str().unwrap().to_string();
    let id = response.json()["data"]["id"].as_str().unwrap().to_string();

    let check = json!({ "shipmentId": shipment_id, "condition": "Damaged", "remarks": "Two trays crushed" });
    let response = app.post("/api/quality", &token, check.clone()).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    app.post(&format!("/api/shipments/{}/start", id), &token, json!({})).await;
    app.post(&format!("/api/shipments/{}/deliver", id), &token, json!({})).await;

    let response = app.post("/api/quality", &token, check).await;
    assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
    assert_eq!(response.json()["data"]["condition"], "Damaged");

    let response = app.get("/api/quality", &token).await;
    assert_eq!(response.json()["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_availability_and_double_booking() {
    let app = create_test_app().await;
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    seed_fleet_and_order(&app, &token).await;

    let response = app
        .post("/api/schedules", &token, schedule_body(json!(["O1"]), "2025-06-01", "2025-06-05"))
        .await;
    let id = response.json()["data"]["id"].as_str().unwrap().to_string();

    // Sin fecha: lista completa
    let response = app.get("/api/schedules/vehicles/available", &token).await;
    assert_eq!(response.json()["data"].as_array().unwrap().len(), 1);

    let response = app
        .get("/api/schedules/vehicles/available?departureDate=2025-06-03", &token)
        .await;
    assert_eq!(response.json()["data"], json!([]));
    assert_eq!(response.json()["message"], "no available vehicles for this date");

    let response = app
        .get(
            &format!("/api/schedules/drivers-available?departureDate=2025-06-03&excludeScheduleId={}", id),
            &token,
        )
        .await;
    assert_eq!(response.json()["data"][0]["driverId"], "D1");

    let response = app
        .get("/api/schedules/vehicles/available?departureDate=2025-06-06", &token)
        .await;
    assert_eq!(response.json()["data"][0]["vehicleId"], "V1");

    // Segunda orden confirmada, mismas fechas
    app.post(
        "/api/orders",
        &token,
        json!({
            "orderId": "O2",
            "customerName": "Orchid House",
            "shippingInfo": { "city": "Kandy", "country": "Sri Lanka" },
            "total": 80
        }),
    )
    .await;
    app.put("/api/orders/O2/status", &token, json!({ "status": "confirmed" }))
        .await;

    let response = app
        .post("/api/schedules", &token, schedule_body(json!(["O2"]), "2025-06-04", "2025-06-08"))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    assert_eq!(response.json()["details"]["resource"], "vehicle");

    // La orden programada no se puede tocar a mano
    let response = app
        .put("/api/orders/O1/status", &token, json!({ "status": "Cancelled" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    // Borrar el schedule devuelve la orden a confirmed
    let response = app.delete(&format!("/api/schedules/{}", id), &token).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let response = app.get("/api/schedules/orders/ready", &token).await;
    assert_eq!(response.json()["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_fleet_rules_and_fuel_reports() {
    let app = create_test_app().await;
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    seed_fleet_and_order(&app, &token).await;

    let response = app
        .post(
            "/api/vehicles",
            &token,
            json!({
                "vehicleId": "V2",
                "type": "Van",
                "capacity": 120,
                "registrationNumber": "WP-CAB 1234"
            }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);

    let response = app
        .post(
            "/api/fuel",
            &token,
            json!({ "vehicleId": "V9", "liters": 10, "cost": 3000, "distance": 80 }),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    for (date, liters, cost, distance) in [
        ("2025-06-03", 40, 12000, 300),
        ("2025-06-20", 10, 3000, 150),
        ("2025-07-01", 5, 1500, 50),
    ] {
        let response = app
            .post(
                "/api/fuel",
                &token,
                json!({ "vehicleId": "V1", "liters": liters, "cost": cost, "distance": distance, "date": date }),
            )
            .await;
        assert_eq!(response.status_code(), StatusCode::OK, "{}", response.json());
    }

    let response = app.get("/api/reports/fuel/monthly", &token).await;
    let months = response.json()["data"].as_array().unwrap().clone();
    assert_eq!(months.len(), 2);
    assert_eq!(months[0]["month"], "2025-06");
    assert_eq!(months[0]["entries"], 2);

    let response = app.get("/api/fuel/summary", &token).await;
    assert_eq!(response.json()["data"][0]["entries"], 3);
    let cost_per_km: f64 = response.json()["data"][0]["costPerKm"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();
    assert_eq!(cost_per_km, 33.0);

    let response = app
        .post(
            "/api/schedules",
            &token,
            schedule_body(json!(["O1"]), "2025-06-01", "2025-06-05"),
        )
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let response = app.delete("/api/vehicles/V1", &token).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let response = app.delete("/api/drivers/D1", &token).await;
    assert_eq!(response.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_notifications_dismiss_and_clear() {
    let app = create_test_app().await;
    let token = app.login(ADMIN_EMAIL, ADMIN_PASSWORD).await;
    seed_fleet_and_order(&app, &token).await;

    app.post("/api/schedules", &token, schedule_body(json!(["O1"]), "2025-06-01", "2025-06-05"))
        .await;

    let response = app.get("/api/notifications", &token).await;
    let notification_id = response.json()["data"][0]["id"].as_str().unwrap().to_string();
    assert_eq!(response.json()["data"][0]["type"], "success");

    let response = app
        .delete(&format!("/api/notifications/{}", notification_id), &token)
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let response = app
        .delete(&format!("/api/notifications/{}", notification_id), &token)
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app.delete("/api/notifications", &token).await;
    assert_eq!(response.json()["data"]["cleared"], 0);
}
