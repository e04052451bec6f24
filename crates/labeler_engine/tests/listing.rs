use labeler_engine::{
    parse_listing, DocumentSource, FetchSettings, HttpDocumentSource, ListingError, ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PAGE: &str = r#"
<html><body>
<table>
  <tr><th>#</th><th>Title</th><th>Created</th><th>Template</th></tr>
  <tr>
    <td>1</td>
    <td><a href="/document/1">Label One</a></td>
    <td>2024-01-01 10:00:00</td>
    <td>ShippingLabelA6</td>
  </tr>
  <tr>
    <td>2</td>
    <td><a href="https://portal.example.com/document/2">Label Two</a></td>
    <td>2024-01-01 11:00:00</td>
    <td>Invoice</td>
  </tr>
  <tr>
    <td>3</td>
    <td>No link here</td>
    <td>2024-01-01 12:00:00</td>
    <td>ShippingLabelA6</td>
  </tr>
  <tr>
    <td>4</td>
    <td>Too short</td>
  </tr>
</table>
</body></html>
"#;

#[test]
fn listing_rows_come_from_fixed_columns() {
    let rows = parse_listing(LISTING_PAGE);
    assert_eq!(rows.len(), 3, "header and short rows are dropped");

    assert_eq!(rows[0].title, "Label One");
    assert_eq!(rows[0].link.as_deref(), Some("/document/1"));
    assert_eq!(rows[0].time_created, "2024-01-01 10:00:00");
    assert_eq!(rows[0].template_code, "ShippingLabelA6");

    assert_eq!(rows[1].link.as_deref(), Some("https://portal.example.com/document/2"));
    assert_eq!(rows[1].template_code, "Invoice");

    assert_eq!(rows[2].title, "No link here");
    assert_eq!(rows[2].link, None);
}

#[test]
fn page_without_table_yields_empty_listing() {
    assert_eq!(parse_listing("<html><body><p>maintenance</p></body></html>"), vec![]);
}

#[tokio::test]
async fn http_source_fetches_and_parses() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/document-list"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(LISTING_PAGE, "text/html; charset=utf-8"))
        .mount(&server)
        .await;

    let source = HttpDocumentSource::new(
        format!("{}/document-list", server.uri()),
        ReqwestFetcher::new(FetchSettings::default()),
    );

    let rows = source.rows().await.expect("listing ok");
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].title, "Label One");
}

#[tokio::test]
async fn http_source_surfaces_fetch_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/document-list"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let source = HttpDocumentSource::new(
        format!("{}/document-list", server.uri()),
        ReqwestFetcher::new(FetchSettings::default()),
    );

    let err = source.rows().await.unwrap_err();
    assert!(matches!(err, ListingError::Fetch(_)));
}
