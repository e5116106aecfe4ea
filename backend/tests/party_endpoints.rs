//! REST surface coverage for party operations over the in-memory adapters.

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use partyline::Trace;
use partyline::inbound::http::health::HealthState;
use partyline::server::{build_services, configure_app, seed_demo_users};

async fn init_app(
    seeds: &[&str],
) -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error> {
    let services = build_services();
    let seed_handles: Vec<String> = seeds.iter().map(|handle| (*handle).to_owned()).collect();
    seed_demo_users(&services.directory, &seed_handles);

    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();

    test::init_service(App::new().wrap(Trace).configure(configure_app(
        services.http,
        services.ws,
        health_state,
    )))
    .await
}

fn create_party_body(host: &str) -> Value {
    json!({
        "name": "Solstice",
        "hostHandle": host,
        "requirements": [{ "item": "ice", "quantity": 2 }],
        "location": { "lat": 51.5, "lng": -0.1 },
        "startTime": "2026-06-20T18:00:00Z",
        "endTime": "2026-06-21T02:00:00Z",
        "budget": 100.0
    })
}

async fn create_party<S>(app: &S, host: &str) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/v1/parties")
        .set_json(create_party_body(host))
        .to_request();
    let res = test::call_service(app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    test::read_body_json(res).await
}

async fn post_json<S>(app: &S, uri: &str, body: Value) -> ServiceResponse
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .set_json(body)
        .to_request();
    test::call_service(app, req).await
}

#[actix_web::test]
async fn create_party_returns_the_created_record() {
    let app = init_app(&["ada"]).await;
    let party = create_party(&app, "ada").await;

    assert_eq!(party["host"], "ada");
    assert_eq!(party["participants"], json!(["ada"]));
    assert_eq!(party["status"], "active");
    assert_eq!(party["budget"], 100.0);
    assert_eq!(party["requirements"][0]["item"], "ice");
    assert!(party["requirements"][0]["id"].is_string());
}

#[actix_web::test]
async fn create_party_with_unknown_host_is_404() {
    let app = init_app(&[]).await;
    let res = post_json(&app, "/api/v1/parties", create_party_body("nobody")).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "not_found");
    assert!(body["traceId"].is_string());
}

#[actix_web::test]
async fn create_party_with_negative_budget_is_400() {
    let app = init_app(&["ada"]).await;
    let mut body = create_party_body("ada");
    body["budget"] = json!(-10.0);
    let res = post_json(&app, "/api/v1/parties", body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn create_party_with_malformed_start_time_is_400() {
    let app = init_app(&["ada"]).await;
    let mut body = create_party_body("ada");
    body["startTime"] = json!("whenever");
    let res = post_json(&app, "/api/v1/parties", body).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let payload: Value = test::read_body_json(res).await;
    assert_eq!(payload["details"]["field"], "startTime");
}

#[actix_web::test]
async fn join_is_idempotent_over_the_wire() {
    let app = init_app(&["ada", "grace"]).await;
    let party = create_party(&app, "ada").await;
    let uri = format!("/api/v1/parties/{}/join", party["id"].as_str().unwrap());

    let first = post_json(&app, &uri, json!({ "handle": "grace" })).await;
    assert_eq!(first.status(), StatusCode::OK);
    let second = post_json(&app, &uri, json!({ "handle": "grace" })).await;
    assert_eq!(second.status(), StatusCode::OK);

    let body: Value = test::read_body_json(second).await;
    assert_eq!(body["participants"], json!(["ada", "grace"]));
}

#[actix_web::test]
async fn leave_by_non_participant_is_400() {
    let app = init_app(&["ada", "grace"]).await;
    let party = create_party(&app, "ada").await;
    let uri = format!("/api/v1/parties/{}/leave", party["id"].as_str().unwrap());

    let res = post_json(&app, &uri, json!({ "handle": "grace" })).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn sunk_cost_scenario_over_the_wire() {
    let app = init_app(&["ada", "grace", "lin"]).await;
    let party = create_party(&app, "ada").await;
    let party_id = party["id"].as_str().unwrap().to_owned();
    let requirement_id = party["requirements"][0]["id"].as_str().unwrap().to_owned();

    post_json(
        &app,
        &format!("/api/v1/parties/{party_id}/join"),
        json!({ "handle": "grace" }),
    )
    .await;

    let fulfil_uri =
        format!("/api/v1/parties/{party_id}/requirements/{requirement_id}/fulfill");
    let fulfilled = post_json(&app, &fulfil_uri, json!({ "user": "grace", "price": 30.0 })).await;
    assert_eq!(fulfilled.status(), StatusCode::OK);
    let body: Value = test::read_body_json(fulfilled).await;
    assert_eq!(body["budget"], 70.0);
    assert_eq!(body["requirements"][0]["fulfilledBy"], json!(["grace"]));

    let left = post_json(
        &app,
        &format!("/api/v1/parties/{party_id}/leave"),
        json!({ "handle": "grace" }),
    )
    .await;
    assert_eq!(left.status(), StatusCode::OK);
    let body: Value = test::read_body_json(left).await;
    assert_eq!(body["budget"], 70.0);
    assert_eq!(body["requirements"][0]["fulfilledBy"], json!([]));

    let refulfilled = post_json(&app, &fulfil_uri, json!({ "user": "lin", "price": 20.0 })).await;
    assert_eq!(refulfilled.status(), StatusCode::OK);
    let body: Value = test::read_body_json(refulfilled).await;
    assert_eq!(body["budget"], 50.0);
    assert_eq!(body["requirements"][0]["fulfilledBy"], json!(["lin"]));
}

#[actix_web::test]
async fn duplicate_fulfilment_is_409() {
    let app = init_app(&["ada", "grace"]).await;
    let party = create_party(&app, "ada").await;
    let party_id = party["id"].as_str().unwrap();
    let requirement_id = party["requirements"][0]["id"].as_str().unwrap();
    let uri = format!("/api/v1/parties/{party_id}/requirements/{requirement_id}/fulfill");

    post_json(&app, &uri, json!({ "user": "grace", "price": 30.0 })).await;
    let res = post_json(&app, &uri, json!({ "user": "grace", "price": 30.0 })).await;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "conflict");
}

#[actix_web::test]
async fn unknown_requirement_is_404() {
    let app = init_app(&["ada"]).await;
    let party = create_party(&app, "ada").await;
    let uri = format!(
        "/api/v1/parties/{}/requirements/00000000-0000-0000-0000-000000000000/fulfill",
        party["id"].as_str().unwrap()
    );

    let res = post_json(&app, &uri, json!({ "user": "ada", "price": 5.0 })).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn add_requirement_allows_duplicate_items() {
    let app = init_app(&["ada"]).await;
    let party = create_party(&app, "ada").await;
    let uri = format!(
        "/api/v1/parties/{}/requirements",
        party["id"].as_str().unwrap()
    );

    let res = post_json(&app, &uri, json!({ "item": "ice", "quantity": 1 })).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["requirements"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn host_only_operations_reject_other_actors() {
    let app = init_app(&["ada", "grace"]).await;
    let party = create_party(&app, "ada").await;
    let party_id = party["id"].as_str().unwrap();

    let cancel = post_json(
        &app,
        &format!("/api/v1/parties/{party_id}/cancel"),
        json!({ "handle": "grace" }),
    )
    .await;
    assert_eq!(cancel.status(), StatusCode::FORBIDDEN);

    let edit = test::TestRequest::put()
        .uri(&format!("/api/v1/parties/{party_id}"))
        .set_json(json!({ "handle": "grace", "startTime": "2026-06-20T19:00:00Z" }))
        .to_request();
    let edit_res = test::call_service(&app, edit).await;
    assert_eq!(edit_res.status(), StatusCode::FORBIDDEN);

    let invite = post_json(
        &app,
        &format!("/api/v1/parties/{party_id}/invite"),
        json!({ "handle": "grace", "invitees": ["lin"] }),
    )
    .await;
    assert_eq!(invite.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn host_edits_replace_the_provided_fields() {
    let app = init_app(&["ada"]).await;
    let party = create_party(&app, "ada").await;
    let party_id = party["id"].as_str().unwrap();

    let edit = test::TestRequest::put()
        .uri(&format!("/api/v1/parties/{party_id}"))
        .set_json(json!({
            "handle": "ada",
            "requirements": [{ "item": "lanterns", "quantity": 4 }],
            "endTime": "2026-06-21T03:00:00Z"
        }))
        .to_request();
    let res = test::call_service(&app, edit).await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["requirements"][0]["item"], "lanterns");
    assert_eq!(body["startTime"], "2026-06-20T18:00:00Z");
    assert_eq!(body["endTime"], "2026-06-21T03:00:00Z");
}

#[actix_web::test]
async fn invite_adds_known_handles_and_skips_the_rest() {
    let app = init_app(&["ada", "grace", "lin"]).await;
    let party = create_party(&app, "ada").await;
    let party_id = party["id"].as_str().unwrap();

    let res = post_json(
        &app,
        &format!("/api/v1/parties/{party_id}/invite"),
        json!({ "handle": "ada", "invitees": ["grace", "ghost", "lin"] }),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["participants"], json!(["ada", "grace", "lin"]));
}

#[actix_web::test]
async fn cancelled_parties_leave_the_active_listing() {
    let app = init_app(&["ada"]).await;
    let first = create_party(&app, "ada").await;
    let _second = create_party(&app, "ada").await;

    let cancel = post_json(
        &app,
        &format!("/api/v1/parties/{}/cancel", first["id"].as_str().unwrap()),
        json!({ "handle": "ada" }),
    )
    .await;
    assert_eq!(cancel.status(), StatusCode::OK);
    let cancelled: Value = test::read_body_json(cancel).await;
    assert_eq!(cancelled["status"], "cancelled");

    let req = test::TestRequest::get()
        .uri("/api/v1/parties/active")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let listing: Value = test::read_body_json(res).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn user_party_listings_scope_by_participation_and_hosting() {
    let app = init_app(&["ada", "grace"]).await;
    let party = create_party(&app, "ada").await;
    post_json(
        &app,
        &format!("/api/v1/parties/{}/join", party["id"].as_str().unwrap()),
        json!({ "handle": "grace" }),
    )
    .await;

    let participant_req = test::TestRequest::get()
        .uri("/api/v1/users/grace/parties")
        .to_request();
    let participant_res = test::call_service(&app, participant_req).await;
    assert_eq!(participant_res.status(), StatusCode::OK);
    let listing: Value = test::read_body_json(participant_res).await;
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let hosted_req = test::TestRequest::get()
        .uri("/api/v1/users/grace/hosted-parties")
        .to_request();
    let hosted_res = test::call_service(&app, hosted_req).await;
    let hosted: Value = test::read_body_json(hosted_res).await;
    assert!(hosted.as_array().unwrap().is_empty());

    let unknown_req = test::TestRequest::get()
        .uri("/api/v1/users/ghost/parties")
        .to_request();
    let unknown_res = test::call_service(&app, unknown_req).await;
    assert_eq!(unknown_res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn unknown_party_lookup_is_404() {
    let app = init_app(&[]).await;
    let req = test::TestRequest::get()
        .uri("/api/v1/parties/00000000-0000-0000-0000-000000000000")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn health_probes_report_readiness() {
    let app = init_app(&[]).await;
    let req = test::TestRequest::get().uri("/health/ready").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let live_req = test::TestRequest::get().uri("/health/live").to_request();
    let live_res = test::call_service(&app, live_req).await;
    assert_eq!(live_res.status(), StatusCode::OK);
}
