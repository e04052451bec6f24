use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use labeler_engine::{FetchSettings, HttpImageResolver, ImageResolver, ResolveError};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn resolver() -> HttpImageResolver {
    HttpImageResolver::new(FetchSettings::default())
}

async fn mount_detail(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/document/1"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn data_uri_payload_is_returned_directly() {
    let server = MockServer::start().await;
    mount_detail(
        &server,
        r#"<html><body><img src="data:image/png;base64,aGVsbG8="></body></html>"#,
    )
    .await;

    let payload = resolver()
        .resolve(&format!("{}/document/1", server.uri()))
        .await
        .expect("resolve ok");
    assert_eq!(payload, "aGVsbG8=");
}

#[tokio::test]
async fn relative_src_is_fetched_and_encoded() {
    let server = MockServer::start().await;
    mount_detail(
        &server,
        r#"<html><body><img src="/images/label.png"></body></html>"#,
    )
    .await;
    let image_bytes = b"\x89PNG\r\n\x1a\nfake image data";
    Mock::given(method("GET"))
        .and(path("/images/label.png"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(&image_bytes[..], "image/png"))
        .mount(&server)
        .await;

    let payload = resolver()
        .resolve(&format!("{}/document/1", server.uri()))
        .await
        .expect("resolve ok");
    assert_eq!(payload, BASE64.encode(image_bytes));
}

#[tokio::test]
async fn first_of_several_images_wins() {
    let server = MockServer::start().await;
    mount_detail(
        &server,
        r#"<html><body>
            <img src="data:image/png;base64,Zmlyc3Q=">
            <img src="data:image/png;base64,c2Vjb25k">
        </body></html>"#,
    )
    .await;

    let payload = resolver()
        .resolve(&format!("{}/document/1", server.uri()))
        .await
        .expect("resolve ok");
    assert_eq!(payload, "Zmlyc3Q=");
}

#[tokio::test]
async fn page_without_image_fails() {
    let server = MockServer::start().await;
    mount_detail(&server, "<html><body><p>nothing</p></body></html>").await;

    let err = resolver()
        .resolve(&format!("{}/document/1", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::MissingImage));
}

#[tokio::test]
async fn image_without_src_fails() {
    let server = MockServer::start().await;
    mount_detail(&server, r#"<html><body><img alt="no src"></body></html>"#).await;

    let err = resolver()
        .resolve(&format!("{}/document/1", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::MissingSrc));
}

#[tokio::test]
async fn failed_image_download_fails_resolution() {
    let server = MockServer::start().await;
    mount_detail(
        &server,
        r#"<html><body><img src="/images/gone.png"></body></html>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/images/gone.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = resolver()
        .resolve(&format!("{}/document/1", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Image(_)));
}

#[tokio::test]
async fn unreachable_detail_page_fails_resolution() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/document/1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = resolver()
        .resolve(&format!("{}/document/1", server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, ResolveError::Page(_)));
}
