use laundry_studio::config::{ClientOptions, StoreConfig};
use laundry_studio::error::Error;
use laundry_studio::models::{NewProviderRecord, RecordId, Service, ServiceArea, ServiceKind};
use laundry_studio::store::{PostgrestProviderStore, ProviderStore};
use laundry_studio::Supabase;
use serde_json::json;
use wiremock::{
    matchers::{body_json, header, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const ANON_KEY: &str = "mock_anon_key";
const TABLE_PATH: &str = "/rest/v1/laundryShops";

fn store_for(server: &MockServer) -> PostgrestProviderStore {
    let config = StoreConfig::new(&server.uri(), ANON_KEY).unwrap();
    let supabase = Supabase::new_with_options(config, ClientOptions::default()).unwrap();
    PostgrestProviderStore::from_client(&supabase)
}

fn clean_co() -> NewProviderRecord {
    NewProviderRecord {
        name: "Clean Co".into(),
        email: Some("hello@clean.co".into()),
        phone: "9876543210".into(),
        address: ServiceArea::Hebbal,
        services: vec![Service::new(ServiceKind::WashOnly, 50.0)],
    }
}

#[tokio::test]
async fn insert_posts_one_row_and_returns_its_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .and(header("apikey", ANON_KEY))
        .and(header("Authorization", "Bearer mock_anon_key"))
        .and(header("Prefer", "return=representation"))
        .and(body_json(json!([{
            "name": "Clean Co",
            "email": "hello@clean.co",
            "phone": "9876543210",
            "address": "Hebbal",
            "services": [{ "name": "washOnly", "price": 50.0 }]
        }])))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([{
            "id": 17,
            "name": "Clean Co",
            "email": "hello@clean.co",
            "phone": "9876543210",
            "address": "Hebbal",
            "services": [{ "name": "washOnly", "price": 50 }]
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let id = store_for(&server).insert(&clean_co()).await.unwrap();
    assert_eq!(id, RecordId::Int(17));
}

#[tokio::test]
async fn insert_failure_carries_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("{\"message\":\"Invalid API key\"}"))
        .expect(1)
        .mount(&server)
        .await;

    match store_for(&server).insert(&clean_co()).await {
        Err(Error::Database(msg)) => {
            assert!(msg.contains("401"), "{}", msg);
            assert!(msg.contains("Invalid API key"), "{}", msg);
        }
        other => panic!("expected database error, got {:?}", other),
    }
}

#[tokio::test]
async fn insert_with_empty_representation_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(matches!(
        store_for(&server).insert(&clean_co()).await,
        Err(Error::Database(_))
    ));
}

#[tokio::test]
async fn select_all_normalizes_every_services_shape() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .and(query_param("select", "*"))
        .and(header("apikey", ANON_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1, "name": "Structured", "email": "", "phone": "9876543210",
                "address": "Hebbal", "services": [{ "name": "ironOnly", "price": 15 }]
            },
            {
                "id": 2, "name": "Encoded", "email": null, "phone": "9876543211",
                "address": "Whitefield", "services": "[{\"name\":\"dryClean\",\"price\":99.5}]"
            },
            {
                "id": 3, "name": "Empty Text", "phone": "9876543212",
                "address": "HBR Layout", "services": "[]"
            },
            {
                "id": 4, "name": "Broken", "email": "x@y.z", "phone": "9876543213",
                "address": "Hebbal", "services": "[{\"name\":\"washOnly\""
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = store_for(&server).select_all().await.unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0].services, vec![Service::new(ServiceKind::IronOnly, 15.0)]);
    assert_eq!(rows[1].services, vec![Service::new(ServiceKind::DryClean, 99.5)]);
    assert!(rows[2].services.is_empty());
    assert!(rows[3].services.is_empty());
    assert_eq!(rows[3].email.as_deref(), Some("x@y.z"));
}

#[tokio::test]
async fn select_all_keeps_good_rows_next_to_rows_with_null_columns() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "id": 1, "name": "Clean Co", "email": "hello@clean.co", "phone": "9876543210",
                "address": "Hebbal", "services": [{ "name": "washOnly", "price": "50" }]
            },
            {
                "id": 2, "name": "Legacy Shop", "email": null, "phone": null,
                "address": null, "services": [{ "name": "ironOnly" }]
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let rows = store_for(&server).select_all().await.unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].services, vec![Service::new(ServiceKind::WashOnly, 50.0)]);
    assert_eq!(rows[1].name, "Legacy Shop");
    assert_eq!(rows[1].phone, "");
    assert_eq!(rows[1].address, "");
    assert_eq!(rows[1].services.len(), 1);
    assert_eq!(rows[1].services[0].price, None);
}

#[tokio::test]
async fn select_all_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    assert!(store_for(&server).select_all().await.is_err());
}

#[tokio::test]
async fn delete_filters_on_id() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TABLE_PATH))
        .and(query_param("id", "eq.42"))
        .and(header("Prefer", "return=minimal"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    store_for(&server)
        .delete_by_id(&RecordId::Int(42))
        .await
        .unwrap();
}

#[tokio::test]
async fn delete_with_text_id() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TABLE_PATH))
        .and(query_param("id", "eq.6f1c0c1e-7d1a-4f6b-9a77-1b2c3d4e5f60"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let id: RecordId = "6f1c0c1e-7d1a-4f6b-9a77-1b2c3d4e5f60".parse().unwrap();
    store_for(&server).delete_by_id(&id).await.unwrap();
}

#[tokio::test]
async fn delete_failure_is_reported() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(TABLE_PATH))
        .respond_with(ResponseTemplate::new(403).set_body_string("permission denied"))
        .expect(1)
        .mount(&server)
        .await;

    assert!(store_for(&server)
        .delete_by_id(&RecordId::Int(1))
        .await
        .is_err());
}
