use super::ApiClient;
use crate::model::{CandidateFilter, ElectionCreate, ElectionStatus, PositionCreate};
use crate::utils::ClientError;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::with_client(reqwest::Client::new(), &format!("{}/api", server.uri()))
}

fn user_json() -> serde_json::Value {
    json!({
        "_id": "u1",
        "corporateId": "EMP-7",
        "name": "Ada",
        "email": "ada@example.com",
        "role": "voter",
        "department": "Engineering",
        "hasVoted": false
    })
}

#[tokio::test]
async fn login_installs_token_for_later_requests() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({ "corporateId": "EMP-7", "pin": "1234" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "user": user_json(), "token": "tok-1" },
            "message": "Login successful"
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": user_json() })))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let (login, message) = api.login("EMP-7", "1234").await.unwrap();
    assert_eq!(login.token, "tok-1");
    assert_eq!(message, "Login successful");
    assert_eq!(api.token().as_deref(), Some("tok-1"));

    let me = api.me().await.unwrap();
    assert_eq!(me.corporate_id, "EMP-7");
}

#[tokio::test]
async fn unauthorized_clears_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/auth/me"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "error": "expired" })))
        .mount(&server)
        .await;

    let api = client_for(&server);
    api.set_token(Some("stale".to_string()));

    let err = api.me().await.unwrap_err();
    assert!(matches!(err, ClientError::Unauthorized));
    assert!(api.token().is_none());
}

#[tokio::test]
async fn positions_filter_by_election() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/positions"))
        .and(query_param("electionId", "e1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "_id": "p1", "title": "Chair", "electionId": "e1", "isActive": true },
                { "_id": "p2", "title": "Treasurer", "electionId": "e1", "isActive": true }
            ]
        })))
        .mount(&server)
        .await;

    let positions = client_for(&server).positions(Some("e1")).await.unwrap();
    let ids: Vec<_> = positions.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
}

#[tokio::test]
async fn candidates_pass_query_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/candidates"))
        .and(query_param("positionId", "p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{
                "_id": "c1",
                "name": "Ada",
                "department": "Engineering",
                "corporateId": "EMP-1",
                "positionId": "p1",
                "electionId": "e1",
                "photo": { "imageUrl": "https://img/1.png", "publicId": null },
                "qualifications": ["MSc"],
                "manifesto": "More coffee",
                "votes": 3
            }]
        })))
        .mount(&server)
        .await;

    let candidates = client_for(&server)
        .candidates(&CandidateFilter::position("p1"))
        .await
        .unwrap();
    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].position_id.id(), "p1");
    assert_eq!(candidates[0].photo.image_url.as_deref(), Some("https://img/1.png"));
}

#[tokio::test]
async fn cast_vote_ignores_body_and_surfaces_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/votes/cast"))
        .and(body_json(json!({ "positionId": "p1", "candidateId": "c1" })))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/votes/cast"))
        .and(body_json(json!({ "positionId": "p2", "candidateId": "c9" })))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(json!({ "error": "Already voted" })),
        )
        .mount(&server)
        .await;

    let api = client_for(&server);
    api.cast_vote("p1", "c1").await.unwrap();

    match api.cast_vote("p2", "c9").await.unwrap_err() {
        ClientError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Already voted");
        }
        other => panic!("Expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn results_and_status_updates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/votes/p1/results"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "_id": "c1", "name": "Ada", "department": "Eng", "photo": {}, "votes": 3, "percentage": 75.0 },
                { "_id": "c2", "name": "Grace", "department": "Ops", "photo": {}, "votes": 1, "percentage": 25.0 }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/elections/e1/status"))
        .and(body_json(json!({ "status": "completed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "_id": "e1",
                "title": "Board 2026",
                "startDate": "2026-01-01T00:00:00Z",
                "endDate": "2026-01-31T00:00:00Z",
                "status": "completed",
                "createdBy": "u1"
            }
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/positions/p9/delete"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let api = client_for(&server);
    let results = api.results("p1").await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].votes, 3);

    let election = api
        .update_election_status("e1", ElectionStatus::Completed)
        .await
        .unwrap();
    assert_eq!(election.status, ElectionStatus::Completed);

    let err = api.delete_position("p9").await.unwrap_err();
    assert!(matches!(err, ClientError::NotFound));
}

#[test]
fn new_rejects_malformed_base_url() {
    let mut settings = crate::config::Settings::default().api;
    settings.base_url = "not a url".to_string();
    assert!(matches!(ApiClient::new(&settings), Err(ClientError::Url(_))));

    let settings = crate::config::Settings::default().api;
    assert!(ApiClient::new(&settings).is_ok());
}

#[tokio::test]
async fn election_admin_operations_hit_their_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/elections/create"))
        .and(header("authorization", "Bearer admin-token"))
        .and(body_json(json!({
            "title": "Board 2026",
            "description": "Annual board election",
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-01-31T00:00:00Z",
            "status": "inactive"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "_id": "e1",
                "title": "Board 2026",
                "description": "Annual board election",
                "startDate": "2026-01-01T00:00:00Z",
                "endDate": "2026-01-31T00:00:00Z",
                "status": "inactive",
                "createdBy": "u1"
            },
            "message": "Election created"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/elections/e1/delete"))
        .and(header("authorization", "Bearer admin-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Election deleted"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server);
    api.set_token(Some("admin-token".to_string()));

    let dto = ElectionCreate {
        title: "Board 2026".to_string(),
        description: "Annual board election".to_string(),
        start_date: "2026-01-01T00:00:00Z".parse().unwrap(),
        end_date: "2026-01-31T00:00:00Z".parse().unwrap(),
        status: Some(ElectionStatus::Inactive),
    };
    let election = api.create_election(&dto).await.unwrap();
    assert_eq!(election.id, "e1");
    assert_eq!(election.status, ElectionStatus::Inactive);

    api.delete_election("e1").await.unwrap();
}

#[tokio::test]
async fn position_admin_operations_hit_their_routes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/positions"))
        .and(body_json(json!({
            "title": "Chair",
            "description": "Runs the board",
            "electionId": "e1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {
                "_id": "p1",
                "title": "Chair",
                "description": "Runs the board",
                "electionId": "e1",
                "isActive": true
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/api/positions/p1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "_id": "p1",
                "title": "Chair",
                "electionId": "e1",
                "isActive": false
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let api = client_for(&server);
    let dto = PositionCreate {
        title: "Chair".to_string(),
        description: "Runs the board".to_string(),
        election_id: "e1".to_string(),
        is_active: None,
    };
    let created = api.create_position(&dto).await.unwrap();
    assert_eq!(created.id, "p1");
    assert!(created.is_active);

    let toggled = api.toggle_position("p1").await.unwrap();
    assert!(!toggled.is_active);
}

#[test]
fn token_survives_a_poisoned_lock() {
    let api = ApiClient::with_client(reqwest::Client::new(), "http://127.0.0.1:1/api");
    api.set_token(Some("stale".to_string()));

    let shared = api.token.clone();
    let _ = std::thread::spawn(move || {
        let _guard = shared.write().unwrap();
        panic!("poison the token lock");
    })
    .join();
    assert!(api.token.is_poisoned());

    api.set_token(None);
    assert_eq!(api.token(), None);
    api.set_token(Some("fresh".to_string()));
    assert_eq!(api.token().as_deref(), Some("fresh"));
}
