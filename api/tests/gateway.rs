use arena_api::{
    ApiConfig, ApiError, ArenaApi, EntityKind, MutationError, MutationPipeline, Record,
    TagRegistry,
};
use mockito::{Matcher, Server};
use serde_json::{Map, Value, json};
use std::time::Duration;

fn api_for(url: String) -> ArenaApi {
    let config = ApiConfig::new(url).unwrap().with_timeout(Duration::from_secs(2));
    ArenaApi::with_registry(config, TagRegistry::new())
}

fn pipeline_for(api: &ArenaApi) -> MutationPipeline<ArenaApi> {
    MutationPipeline::new(api.clone(), api.registry().clone())
}

fn payload(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[tokio::test]
async fn create_referee_posts_to_collection_and_invalidates() {
    let mut server = Server::new_async().await;
    let post = server
        .mock("POST", "/referee/")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(json!({
            "name": "João Silva",
            "nationalityId": "n1",
            "dateOfBirth": "2000-01-01"
        })))
        .with_status(201)
        .with_body("{\"whatever\": true}")
        .expect(1)
        .create_async()
        .await;

    let api = api_for(server.url());
    api.registry().mark_fresh(EntityKind::Referee.tag());
    let raw = payload(json!({"name": "João Silva", "nationalityId": "n1", "dateOfBirth": "2000-01-01"}));

    pipeline_for(&api).create(EntityKind::Referee, &raw).await.unwrap();

    post.assert_async().await;
    assert!(api.registry().is_stale(EntityKind::Referee.tag()));
}

#[tokio::test]
async fn rejected_referee_sends_nothing() {
    let mut server = Server::new_async().await;
    let post = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let api = api_for(server.url());
    api.registry().mark_fresh(EntityKind::Referee.tag());
    let raw = payload(json!({"name": "Jo", "nationalityId": "n1", "dateOfBirth": "2000-01-01"}));

    let err = pipeline_for(&api).create(EntityKind::Referee, &raw).await.unwrap_err();

    assert!(matches!(err, MutationError::Invalid(_)));
    post.assert_async().await;
    assert!(!api.registry().is_stale(EntityKind::Referee.tag()));
}

#[tokio::test]
async fn delete_sport_hits_item_url() {
    let mut server = Server::new_async().await;
    let delete = server
        .mock("DELETE", "/sports/s1")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let api = api_for(server.url());
    api.registry().mark_fresh(EntityKind::Sport.tag());

    let outcome = pipeline_for(&api).delete(EntityKind::Sport, "s1").await.unwrap();

    delete.assert_async().await;
    assert_eq!(outcome.invalidated.as_str(), "get-sports");
    assert!(api.registry().is_stale(EntityKind::Sport.tag()));
}

#[tokio::test]
async fn server_error_on_delete_is_not_success() {
    let mut server = Server::new_async().await;
    server
        .mock("DELETE", "/sports/s1")
        .with_status(500)
        .create_async()
        .await;

    let api = api_for(server.url());
    api.registry().mark_fresh(EntityKind::Sport.tag());

    let err = pipeline_for(&api).delete(EntityKind::Sport, "s1").await.unwrap_err();

    match err {
        MutationError::Gateway(ApiError::UnexpectedResponse(status, url)) => {
            assert_eq!(status.as_u16(), 500);
            assert!(url.ends_with("/sports/s1"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!api.registry().is_stale(EntityKind::Sport.tag()));
}

#[tokio::test]
async fn network_failure_on_create_keeps_tag() {
    // Nothing listens on the discard port.
    let api = api_for("http://127.0.0.1:9".to_string());
    api.registry().mark_fresh(EntityKind::Sport.tag());
    let raw = payload(json!({"name": "Vôlei", "icon": "volley", "description": "Voleibol de quadra"}));

    let err = pipeline_for(&api).create(EntityKind::Sport, &raw).await.unwrap_err();

    assert!(matches!(err, MutationError::Gateway(ApiError::Network(..))));
    assert!(!api.registry().is_stale(EntityKind::Sport.tag()));
}

#[tokio::test]
async fn list_is_cached_until_a_mutation_invalidates_it() {
    let mut server = Server::new_async().await;
    let list = server
        .mock("GET", "/sports/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([
                {"id": "s1", "name": "Futebol", "icon": "ball", "description": "Futebol de campo"},
                {"id": "s2", "name": "Basquete", "icon": "hoop", "description": "Basquetebol"}
            ])
            .to_string(),
        )
        .expect(2)
        .create_async()
        .await;
    server
        .mock("DELETE", "/sports/s2")
        .with_status(200)
        .create_async()
        .await;

    let api = api_for(server.url());
    let first = api.fetch_list(EntityKind::Sport).await.unwrap();
    let cached = api.fetch_list(EntityKind::Sport).await.unwrap();
    assert_eq!(first, cached);
    assert_eq!(first.len(), 2);
    assert_eq!(first[0].id(), "s1");
    assert!(matches!(&first[1], Record::Sport(s) if s.name == "Basquete"));

    pipeline_for(&api).delete(EntityKind::Sport, "s2").await.unwrap();
    api.fetch_list(EntityKind::Sport).await.unwrap();
    api.fetch_list(EntityKind::Sport).await.unwrap();

    list.assert_async().await;
}

#[tokio::test]
async fn nested_references_are_mapped() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/players/")
        .with_status(200)
        .with_body(
            json!([{
                "id": "p1",
                "name": "Marta Vieira",
                "dateOfBirth": "1986-02-19T00:00:00.000Z",
                "nationality": {"id": "br", "name": "Brasil"},
                "club": {"id": "c9", "name": "Orlando Pride"}
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let api = api_for(server.url());
    let players = api.fetch_list(EntityKind::Player).await.unwrap();

    assert_eq!(players.len(), 1);
    assert_eq!(
        players[0].cells(),
        vec!["Marta Vieira", "19/02/1986", "Brasil", "Orlando Pride"]
    );
}

#[tokio::test]
async fn list_errors_are_typed() {
    let mut server = Server::new_async().await;
    server.mock("GET", "/clubs/").with_status(404).create_async().await;
    server
        .mock("GET", "/teams/")
        .with_status(200)
        .with_body("{\"not\": \"a list\"}")
        .create_async()
        .await;

    let api = api_for(server.url());

    let missing = api.fetch_list(EntityKind::Club).await.unwrap_err();
    assert!(matches!(missing, ApiError::UnexpectedResponse(status, _) if status.as_u16() == 404));
    assert!(api.registry().is_stale(EntityKind::Club.tag()));

    let garbled = api.fetch_list(EntityKind::Team).await.unwrap_err();
    assert!(matches!(garbled, ApiError::Parsing(..)));
}

#[tokio::test]
async fn rows_without_id_are_not_listed() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/sports/")
        .with_status(200)
        .with_body(
            json!([
                {"name": "Sem id", "icon": "x", "description": "Registro sem identificador"},
                {"id": "", "name": "Id vazio"},
                {"id": "s1", "name": "Futebol", "icon": "ball", "description": "Futebol de campo"}
            ])
            .to_string(),
        )
        .create_async()
        .await;

    let api = api_for(server.url());
    let sports = api.fetch_list(EntityKind::Sport).await.unwrap();

    assert_eq!(sports.len(), 1);
    assert_eq!(sports[0].id(), "s1");
}

#[tokio::test]
async fn blank_id_delete_sends_nothing() {
    let mut server = Server::new_async().await;
    let any = server.mock("DELETE", Matcher::Any).expect(0).create_async().await;

    let api = api_for(server.url());
    api.registry().mark_fresh(EntityKind::Sport.tag());

    for id in ["", "   "] {
        let err = pipeline_for(&api).delete(EntityKind::Sport, id).await.unwrap_err();
        assert!(matches!(err, MutationError::Gateway(ApiError::InvalidRequest(_))));
    }

    any.assert_async().await;
    assert!(!api.registry().is_stale(EntityKind::Sport.tag()));
}

#[tokio::test]
async fn delete_id_is_a_single_encoded_segment() {
    let mut server = Server::new_async().await;
    let encoded = server
        .mock("DELETE", "/sports/a%2Fb%3Fx=1")
        .with_status(204)
        .expect(1)
        .create_async()
        .await;

    let api = api_for(server.url());
    pipeline_for(&api).delete(EntityKind::Sport, "a/b?x=1").await.unwrap();

    encoded.assert_async().await;
}

#[tokio::test]
async fn every_kind_refetches_its_list_after_a_delete() {
    let mut server = Server::new_async().await;
    let api = api_for(server.url());
    let pipeline = pipeline_for(&api);

    for kind in EntityKind::ALL {
        let list = server
            .mock("GET", format!("/{}/", kind.path()).as_str())
            .with_status(200)
            .with_body("[]")
            .expect(2)
            .create_async()
            .await;
        server
            .mock("DELETE", format!("/{}/x1", kind.path()).as_str())
            .with_status(200)
            .create_async()
            .await;

        api.fetch_list(kind).await.unwrap();
        api.fetch_list(kind).await.unwrap();
        pipeline.delete(kind, "x1").await.unwrap();
        api.fetch_list(kind).await.unwrap();
        api.fetch_list(kind).await.unwrap();

        list.assert_async().await;
    }
}
