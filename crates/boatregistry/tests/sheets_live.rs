//! End-to-end tests for the live spreadsheet source against a mock Sheets API.

use boatregistry::config::Config;
use boatregistry::{BoatQuery, BoatRegistry, Error, SourceKind};
use openssl::pkey::PKey;
use openssl::rsa::Rsa;
use serde_json::json;
use wiremock::matchers::{header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOC_ID: &str = "doc-registry";
const TOKEN: &str = "ya29.integration";

fn private_key_pem() -> String {
    let key = PKey::from_rsa(Rsa::generate(2048).unwrap()).unwrap();
    String::from_utf8(key.private_key_to_pem_pkcs8().unwrap()).unwrap()
}

fn live_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.sheets.service_account_email = Some("registry@boats.iam.gserviceaccount.com".into());
    // Deployments usually pass the key with escaped newlines.
    config.sheets.private_key = Some(private_key_pem().replace('\n', "\\n"));
    config.sheets.sheet_id = Some(DOC_ID.into());
    config.sheets.api_base_url = format!("{}/v4", server.uri());
    config.sheets.token_url = format!("{}/token", server.uri());
    config
}

async fn mount_token(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": TOKEN,
            "expires_in": 3599,
            "token_type": "Bearer"
        })))
        .mount(server)
        .await;
}

async fn mount_metadata(server: &MockServer, titles: &[&str], expected_calls: u64) {
    let sheets: Vec<_> = titles
        .iter()
        .enumerate()
        .map(|(index, title)| {
            json!({
                "properties": {
                    "sheetId": index,
                    "title": title,
                    "index": index,
                    "gridProperties": { "rowCount": 1000, "columnCount": 26 }
                }
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path(format!("/v4/spreadsheets/{DOC_ID}")))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "properties": { "title": "Sổ đăng ký tàu cá" },
            "sheets": sheets
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn registry_rows() -> serde_json::Value {
    json!({
        "range": "Boats!A2:P1000",
        "majorDimension": "ROWS",
        "values": [
            ["1", "Sơn Trà", "ĐNa-90001-TS", "15/03/2021", "Câu", "Đánh bắt cá ngừ",
             "Đánh bắt mực", "8", "Nguyễn Văn Hùng", "048081234567", "0905123456",
             "12 Lê Duẩn", "ĐN-ĐK-0001", "15/03/2024", "14.50", "420"],
            [" 2 ", "Thanh Khê", "ĐN-90002", "01/06/2022", "Rê", "Đánh bắt cá cơm"],
            [],
            [3, "Liên Chiểu", "ĐNa-90003-TS", null, "Lưới kéo", "", "", 12, "Trần Thị Mai"]
        ]
    })
}

#[tokio::test]
async fn test_live_registry_reads_and_caches_rows() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_metadata(&server, &["Archive", "Boats"], 1).await;

    Mock::given(method("GET"))
        .and(path_regex(format!(r"^/v4/spreadsheets/{DOC_ID}/values/.*A2:P$")))
        .and(query_param("majorDimension", "ROWS"))
        .and(query_param("valueRenderOption", "FORMATTED_VALUE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(registry_rows()))
        .expect(1)
        .mount(&server)
        .await;

    let registry = BoatRegistry::from_config(&live_config(&server)).unwrap();
    assert_eq!(registry.source_kind(), SourceKind::Live);

    let boat = registry.get_boat_by_id("1").await.unwrap().unwrap();
    assert_eq!(boat.boat_number, "ĐNa-90001-TS");
    assert_eq!(boat.owner_name, "Nguyễn Văn Hùng");
    assert_eq!(boat.total_power, "420");

    let short = registry.get_boat_by_id("2").await.unwrap().unwrap();
    assert_eq!(short.district, "Thanh Khê");
    assert_eq!(short.owner_name, "");

    let numeric = registry.get_boat_by_id("3").await.unwrap().unwrap();
    assert_eq!(numeric.boat_members, "12");
    assert_eq!(numeric.registration_date, "");

    assert_eq!(registry.total_count().await.unwrap(), 4);

    let page = registry
        .get_boats(&BoatQuery::default().with_search("ĐNA"))
        .await
        .unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.boats[0].id, "1");
    assert_eq!(page.boats[1].id, "3");
}

async fn mount_custom_header_sheet(server: &MockServer, header_calls: u64) {
    mount_token(server).await;
    mount_metadata(server, &["Boats"], 1).await;

    Mock::given(method("GET"))
        .and(path_regex(r"A3:P3$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["Số TT", "Quận/huyện", "Số ĐK"]]
        })))
        .expect(header_calls)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"A4:P$"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "values": [["7", "Hải Châu", "ĐN-90007"]]
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_custom_header_row_shifts_data_range() {
    let server = MockServer::start().await;
    // Header values are only read for debug logging.
    mount_custom_header_sheet(&server, 0).await;

    let mut config = live_config(&server);
    config.sheets.header_row = 3;
    let registry = BoatRegistry::from_config(&config).unwrap();

    let boat = registry.get_boat_by_id("7").await.unwrap().unwrap();
    assert_eq!(boat.district, "Hải Châu");
}

#[tokio::test]
async fn test_custom_header_row_read_when_debug_enabled() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();
    let _guard = tracing::subscriber::set_default(subscriber);

    let server = MockServer::start().await;
    mount_custom_header_sheet(&server, 1).await;

    let mut config = live_config(&server);
    config.sheets.header_row = 3;
    let registry = BoatRegistry::from_config(&config).unwrap();

    let boat = registry.get_boat_by_id("7").await.unwrap().unwrap();
    assert_eq!(boat.boat_number, "ĐN-90007");
}

#[tokio::test]
async fn test_missing_sheet_lists_available_titles() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_metadata(&server, &["Sheet1", "Archive"], 1).await;

    let registry = BoatRegistry::from_config(&live_config(&server)).unwrap();
    let err = registry.total_count().await.unwrap_err();

    assert!(err.is_fetch_error());
    match err.fetch_cause() {
        Some(Error::SheetNotFound { name, available }) => {
            assert_eq!(name, "Boats");
            assert_eq!(available, &["Sheet1".to_string(), "Archive".to_string()]);
        }
        other => panic!("expected SheetNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_api_error_propagates_and_is_retried() {
    let server = MockServer::start().await;
    mount_token(&server).await;
    mount_metadata(&server, &["Boats"], 2).await;

    Mock::given(method("GET"))
        .and(path_regex(r"/values/"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": 403,
                "message": "The caller does not have permission",
                "status": "PERMISSION_DENIED"
            }
        })))
        .expect(2)
        .mount(&server)
        .await;

    let registry = BoatRegistry::from_config(&live_config(&server)).unwrap();

    for _ in 0..2 {
        let err = registry.get_boats(&BoatQuery::default()).await.unwrap_err();
        match err.fetch_cause() {
            Some(Error::Api { status, message }) => {
                assert_eq!(*status, 403);
                assert_eq!(message, "The caller does not have permission");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_rejected_credentials_surface_as_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid JWT Signature."
        })))
        .mount(&server)
        .await;

    let registry = BoatRegistry::from_config(&live_config(&server)).unwrap();
    let err = registry.get_boat_by_id("1").await.unwrap_err();

    assert!(matches!(err.fetch_cause(), Some(Error::Auth { .. })));
}

#[tokio::test]
async fn test_placeholder_id_never_contacts_the_api() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let registry = BoatRegistry::from_config(&live_config(&server)).unwrap();
    let boat = registry
        .get_boat_by_id(boatregistry::BUILD_PLACEHOLDER_ID)
        .await
        .unwrap();
    assert!(boat.is_none());
}
