use jsonapi_graph::binding::{ClientRelationship, ModelError, Record, RelatedModel};
use jsonapi_graph::model::Immybox;
use jsonapi_graph::resolve::{parse_document, IncludedPool, MaterializeOptions, Parsed};
use jsonapi_graph::runtime::{LoadError, ResourceLoader};
use jsonapi_graph::transport::mock::MockTransport;
use jsonapi_graph::transport::{Method, Request, RequestError, Transport};
use serde_json::{json, Value};
use std::any::Any;
use std::sync::Arc;

#[derive(Debug)]
struct Author {
    name: String,
}

impl RelatedModel for Author {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn author(_parent: &Arc<Record>, data: Value) -> Result<Arc<dyn RelatedModel>, ModelError> {
    let name = data["name"].as_str().unwrap_or("anonymous").to_owned();
    Ok(Arc::new(Author { name }))
}

fn named_author(_parent: &Arc<Record>, data: Value) -> Result<Arc<dyn RelatedModel>, ModelError> {
    let name = data["name"].as_str().ok_or("author without a name")?.to_owned();
    Ok(Arc::new(Author { name }))
}

fn post_document() -> Value {
    json!({
        "data": [
            {
                "id": "1",
                "type": "post",
                "attributes": {"title": "Hi"},
                "relationships": {
                    "author": {"data": {"id": "2", "type": "user"}},
                    "comments": {"data": [{"id": "10", "type": "comment"}, {"id": "11", "type": "comment"}]}
                }
            },
            {
                "id": "5",
                "type": "post",
                "attributes": {"title": "Second"},
                "relationships": {
                    "author": {"data": null},
                    "comments": {"data": []}
                }
            }
        ],
        "included": [
            {"id": "2", "type": "user", "attributes": {"name": "Ann"}},
            {"id": "10", "type": "comment", "attributes": {"body": "one", "marked_for_deletion": true}},
            {"id": "11", "type": "comment", "attributes": {"body": "two"}}
        ]
    })
}

#[test]
fn parse_resolves_included_references() {
    let document = json!({
        "data": {
            "id": "1",
            "type": "post",
            "attributes": {"title": "Hi"},
            "relationships": {"author": {"data": {"id": "2", "type": "user"}}}
        },
        "included": [{"id": "2", "type": "user", "attributes": {"name": "Ann"}}]
    });

    let parsed = parse_document(document, MaterializeOptions::new()).expect("document has data");
    assert_eq!(
        parsed,
        Parsed::Single(json!({"id": 1, "type": "post", "title": "Hi", "author": {"id": 2, "type": "user", "name": "Ann"}}))
    );
}

#[test]
fn parse_of_falsy_response_is_empty() {
    assert!(parse_document(Value::Null, MaterializeOptions::new()).is_none());
    assert!(parse_document(json!(""), MaterializeOptions::new()).is_none());
}

#[tokio::test]
async fn loader_hydrates_records_with_bound_relationships() {
    let mock = MockTransport::new();
    mock.expect_get("/posts").return_ok(post_document());

    let loader = ResourceLoader::new(mock.clone())
        .with_declaration(ClientRelationship::new("author").with_model(author))
        .with_declaration(ClientRelationship::new("comments").allow_destroy());

    let records = loader.load("/posts".into()).await.expect("load failed");
    mock.verify();
    assert_eq!(records.len(), 2);

    let first = &records[0];
    assert_eq!(first.id(), Some(1));
    assert_eq!(first.attribute("title"), Some(json!("Hi")));
    assert_eq!(first.attribute("author"), None);
    assert_eq!(first.attribute("comments"), None);

    let author = first.relationship("author").unwrap().get();
    assert_eq!(author.as_one().unwrap().downcast::<Author>().unwrap().name, "Ann");

    let comments = first.relationship("comments").unwrap().get();
    assert_eq!(comments.as_many().unwrap().len(), 2);
    let live = first.non_deleted("comments").unwrap().get();
    assert_eq!(live.len(), 1);
    assert_eq!(live[0].as_record().unwrap()["body"], "two");

    let second = &records[1];
    assert_eq!(second.id(), Some(5));
    assert!(second.non_deleted("comments").unwrap().is_empty());
    let blank = second.relationship("author").unwrap().get();
    assert_eq!(blank.as_one().unwrap().downcast::<Author>().unwrap().name, "anonymous");
}

#[tokio::test]
async fn loader_surfaces_construction_failures() {
    let mock = MockTransport::new();
    mock.expect_get("/posts").return_ok(json!({
        "data": {
            "id": "1",
            "type": "post",
            "relationships": {"author": {"data": {"id": "2", "type": "user"}}}
        }
    }));

    let loader =
        ResourceLoader::new(mock.clone()).with_declaration(ClientRelationship::new("author").with_model(named_author));
    let err = loader.load("/posts".into()).await.unwrap_err();
    assert!(matches!(err, LoadError::Bind(_)));
    assert!(err.to_string().contains("author without a name"));
    mock.verify();
}

#[tokio::test]
async fn loader_propagates_request_errors() {
    let mock = MockTransport::new();
    mock.expect_get("/posts/404").return_err(RequestError::from_response(
        404,
        Some("Not Found"),
        r#"{"errors":[{"title":"Not found"}]}"#,
    ));

    let loader = ResourceLoader::new(mock.clone());
    match loader.load("/posts/404".into()).await {
        Err(LoadError::Request(err)) => {
            assert_eq!(err.status, 404);
            assert_eq!(err.message, "Not found");
        }
        other => panic!("expected a request error, got {other:?}"),
    }
    mock.verify();
}

#[tokio::test]
async fn empty_response_loads_nothing() {
    let mock = MockTransport::new();
    mock.expect_get("/posts").return_empty();
    let loader = ResourceLoader::new(mock.clone());
    assert!(loader.load("/posts".into()).await.unwrap().is_empty());
    mock.verify();
}

#[tokio::test]
async fn loader_applies_the_immybox_projection() {
    let loader = ResourceLoader::new(MockTransport::new())
        .with_materialize_options(MaterializeOptions::new().with_immybox(Immybox::new("id", "title")));

    let records = loader
        .hydrate(json!({"data": {"id": "3", "type": "post", "attributes": {"title": "Hi"}}}))
        .await
        .unwrap();
    assert_eq!(records[0].attribute("value"), Some(json!(3)));
    assert_eq!(records[0].attribute("text"), Some(json!("Hi")));
}

#[tokio::test]
async fn hydrate_shares_the_document_rules_of_parse() {
    let loader = ResourceLoader::new(MockTransport::new());
    for document in [Value::Null, json!(""), json!([{"id": "1", "type": "post"}]), json!({"data": null})] {
        assert!(parse_document(document.clone(), MaterializeOptions::new())
            .map_or(true, |parsed| parsed.into_records().is_empty()));
        assert!(loader.hydrate(document).await.unwrap().is_empty());
    }
}

#[tokio::test]
async fn caller_pool_is_used_when_the_document_has_none() {
    let pool = Arc::new(IncludedPool::new(vec![json!({"id": "2", "type": "user", "attributes": {"name": "Ann"}})]));
    let loader = ResourceLoader::new(MockTransport::new())
        .with_materialize_options(MaterializeOptions::new().with_included(pool))
        .with_declaration(ClientRelationship::new("author").with_model(author));

    let records = loader
        .hydrate(json!({
            "data": {"id": "1", "type": "post", "relationships": {"author": {"data": {"id": "2", "type": "user"}}}}
        }))
        .await
        .unwrap();
    let author = records[0].relationship("author").unwrap().get();
    assert_eq!(author.as_one().unwrap().downcast::<Author>().unwrap().name, "Ann");
}

#[tokio::test]
async fn query_data_reaches_the_transport() {
    let mock = MockTransport::new();
    mock.expect_get("/posts").return_empty();

    let request = Request::new("/posts").with_data(json!({"page": 2}));
    mock.get(request.clone()).await.unwrap();

    assert_eq!(mock.requests(), vec![(Method::Get, request)]);
}
