use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use booking_cell::{BookingApi, BookingController, FixedClock, SlotApply, SlotState};
use shared_config::ApiConfig;
use shared_http::{ApiClient, SessionStore};
use shared_models::Role;

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock {
        today: "2026-08-06".parse().unwrap(),
        minutes: 10 * 60 + 5,
    })
}

async fn controller_for(mock_server: &MockServer) -> (BookingController, Arc<ApiClient>) {
    let config = ApiConfig {
        api_base_url: mock_server.uri(),
        request_timeout_secs: 5,
    };
    let session = Arc::new(SessionStore::new());
    session.open(Role::Patient, "tok-patient".to_string());
    let api = Arc::new(ApiClient::new(&config, session));
    (BookingController::new(api.clone(), clock()), api)
}

async fn mount_doctors(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/patients/doctors"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "d1", "name": "Dr. Mehta", "specialization": "Cardiology"},
            {"_id": "d2", "name": "Dr. Iyer", "specialization": "Dermatology"}
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn fetches_slots_for_the_selected_pair() {
    let mock_server = MockServer::start().await;
    let (mut ctl, _api) = controller_for(&mock_server).await;
    mount_doctors(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/appointments/slots"))
        .and(query_param("doctorId", "d1"))
        .and(query_param("date", "2026-08-20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "slots": ["09:00", "09:30", "10:00"]
        })))
        .mount(&mock_server)
        .await;

    ctl.load_doctors().await.unwrap();
    ctl.select_date("2026-08-20".parse().unwrap());
    let request = ctl.select_doctor("d1").unwrap().unwrap();

    assert!(ctl.slot_state().is_loading());
    assert_eq!(ctl.refresh_slots(request).await, SlotApply::Applied);

    // A future date is never filtered by the clock.
    assert_eq!(
        ctl.slot_state().slots(),
        ["09:00".to_string(), "09:30".to_string(), "10:00".to_string()]
    );
}

#[tokio::test]
async fn switching_doctor_mid_flight_discards_the_first_response() {
    let mock_server = MockServer::start().await;
    let (mut ctl, api) = controller_for(&mock_server).await;
    mount_doctors(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/appointments/slots"))
        .and(query_param("doctorId", "d1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slots": ["09:00"]})))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/appointments/slots"))
        .and(query_param("doctorId", "d2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slots": ["14:00"]})))
        .mount(&mock_server)
        .await;

    ctl.load_doctors().await.unwrap();
    ctl.select_date("2026-08-20".parse().unwrap());

    // Doctor A is selected and the fetch goes out; the user switches to
    // doctor B before A's response is applied.
    let request_a = ctl.select_doctor("d1").unwrap().unwrap();
    let result_a = api.fetch_slots(&request_a.doctor_id, request_a.date).await;

    let request_b = ctl.select_doctor("d2").unwrap().unwrap();

    assert_eq!(ctl.apply_slots(&request_a, result_a), SlotApply::Stale);
    assert!(ctl.slot_state().is_loading());

    assert_eq!(ctl.refresh_slots(request_b).await, SlotApply::Applied);
    assert_eq!(ctl.slot_state().slots(), ["14:00".to_string()]);
}

#[tokio::test]
async fn booking_posts_the_exact_payload_and_resets() {
    let mock_server = MockServer::start().await;
    let (mut ctl, _api) = controller_for(&mock_server).await;
    mount_doctors(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/appointments/slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slots": ["10:30", "11:00"]})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_json(json!({
            "doctorId": "d1",
            "date": "2026-08-06",
            "time": "10:30",
            "symptoms": "chest pain",
            "department": "Cardiology"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Appointment booked successfully!"
        })))
        .mount(&mock_server)
        .await;

    ctl.load_doctors().await.unwrap();
    // Today at 10:05: "10:30" survives the filter and is bookable.
    ctl.select_date("2026-08-06".parse().unwrap());
    let request = ctl.select_doctor("d1").unwrap().unwrap();
    assert_eq!(ctl.refresh_slots(request).await, SlotApply::Applied);

    ctl.select_time("10:30").unwrap();
    ctl.set_symptoms("chest pain");

    let response = ctl.submit().await.unwrap();
    assert_eq!(response["message"], "Appointment booked successfully!");
    assert_eq!(ctl.slot_state(), &SlotState::Idle);
    assert_eq!(ctl.form().doctor_id, "");
}

#[tokio::test]
async fn slot_taken_between_fetch_and_submit_is_a_retryable_conflict() {
    let mock_server = MockServer::start().await;
    let (mut ctl, _api) = controller_for(&mock_server).await;
    mount_doctors(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/appointments/slots"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"slots": ["11:00"]})))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(json!({"error": "Slot is no longer available"})),
        )
        .mount(&mock_server)
        .await;

    ctl.load_doctors().await.unwrap();
    ctl.select_date("2026-08-20".parse().unwrap());
    let request = ctl.select_doctor("d1").unwrap().unwrap();
    ctl.refresh_slots(request).await;
    ctl.select_time("11:00").unwrap();
    ctl.set_symptoms("rash");

    let err = ctl.submit().await.unwrap_err();
    assert_eq!(err.user_message(), "Slot is no longer available");

    // The form survives for a retry after re-fetching slots.
    assert_eq!(ctl.form().symptoms, "rash");
}
