//! Upload API integration tests: image ingestion, document upload and static serving.
//!
//! Run with: `cargo test -p atrium-api --test uploads_test`

mod helpers;

use axum_test::multipart::{MultipartForm, Part};
use helpers::fixtures::{create_test_gif, create_test_jpeg, create_test_pdf, create_test_png};
use helpers::{create_test_config, setup_test_app, setup_test_app_with};
use serde_json::{json, Value};
use std::path::Path;

fn part(bytes: Vec<u8>, filename: &str, mime: &str) -> Part {
    Part::bytes(bytes).file_name(filename).mime_type(mime)
}

fn file_paths(response: &axum_test::TestResponse) -> Vec<String> {
    response.json::<Value>()["filePaths"]
        .as_array()
        .expect("filePaths missing")
        .iter()
        .map(|p| p.as_str().unwrap().to_string())
        .collect()
}

fn stored_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// On-disk location of a public path such as `/uploads/x.webp`.
fn on_disk(root: &Path, public_path: &str) -> std::path::PathBuf {
    root.join(public_path.trim_start_matches('/'))
}

fn is_webp(bytes: &[u8]) -> bool {
    bytes.len() > 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
}

#[tokio::test]
async fn test_gif_is_stored_verbatim_and_served() {
    let app = setup_test_app().await;
    let gif = create_test_gif(4, 4);

    let form = MultipartForm::new().add_part("images", part(gif.clone(), "anim.gif", "image/gif"));
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let paths = file_paths(&response);
    assert_eq!(paths.len(), 1);
    assert!(paths[0].starts_with("/uploads/"));
    assert!(paths[0].ends_with("-anim.gif"));

    let stored = std::fs::read(on_disk(app.storage_root(), &paths[0])).unwrap();
    assert_eq!(stored, gif);

    let served = app.client().get(&paths[0]).await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(served.as_bytes().as_ref(), gif.as_slice());
}

#[tokio::test]
async fn test_png_is_transcoded_to_webp() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_part(
        "images",
        part(create_test_png(16, 16), "Holiday Photo.PNG", "image/png"),
    );
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let paths = file_paths(&response);
    assert!(paths[0].ends_with("-Holiday_Photo.webp"));

    let stored = std::fs::read(on_disk(app.storage_root(), &paths[0])).unwrap();
    assert!(is_webp(&stored));

    let served = app.client().get(&paths[0]).await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(served.header("content-type"), "image/webp");
}

#[tokio::test]
async fn test_batch_preserves_input_order() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_text("caption", "ignored")
        .add_part("images", part(create_test_png(8, 8), "one.png", "image/png"))
        .add_part("images", part(create_test_gif(8, 8), "two.gif", "image/gif"))
        .add_part("images", part(create_test_jpeg(8, 8), "three.jpg", "image/jpeg"))
        .add_part("images", part(create_test_png(8, 8), "four.png", "image/png"))
        .add_part("images", part(create_test_gif(8, 8), "five.gif", "image/gif"));
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let paths = file_paths(&response);
    let suffixes = ["-one.webp", "-two.gif", "-three.webp", "-four.webp", "-five.gif"];
    assert_eq!(paths.len(), suffixes.len());
    for (path, suffix) in paths.iter().zip(suffixes) {
        assert!(path.ends_with(suffix), "{} should end with {}", path, suffix);
    }
}

#[tokio::test]
async fn test_request_without_files_returns_empty_list() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_text("note", "nothing attached");
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(response.json::<Value>(), json!({ "filePaths": [] }));
}

#[tokio::test]
async fn test_disallowed_type_rejects_whole_batch() {
    let app = setup_test_app().await;
    let uploads = app.storage_root().join("uploads");

    let form = MultipartForm::new()
        .add_part("images", part(create_test_png(8, 8), "ok.png", "image/png"))
        .add_part("images", part(b"<svg/>".to_vec(), "logo.svg", "image/svg+xml"));
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 415);
    assert_eq!(response.json::<Value>()["code"], "UNSUPPORTED_MEDIA_TYPE");
    assert_eq!(stored_files(&uploads), 0);
}

#[tokio::test]
async fn test_extension_and_mime_must_both_be_allowed() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_part(
        "images",
        part(create_test_png(8, 8), "disguised.png", "application/x-msdownload"),
    );
    let response = app.client().post("/uploads").multipart(form).await;
    assert_eq!(response.status_code(), 415);

    let form = MultipartForm::new().add_part(
        "images",
        part(create_test_png(8, 8), "disguised.exe", "image/png"),
    );
    let response = app.client().post("/uploads").multipart(form).await;
    assert_eq!(response.status_code(), 415);
}

#[tokio::test]
async fn test_unexpected_file_field_is_bad_request() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("file", part(create_test_png(8, 8), "a.png", "image/png"));
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_non_multipart_body_is_bad_request() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/uploads")
        .json(&json!({ "images": ["a.png"] }))
        .await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(response.json::<Value>()["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_file_names_with_dot_runs_are_accepted() {
    let app = setup_test_app().await;
    let gif = create_test_gif(2, 2);

    let form = MultipartForm::new()
        .add_part("images", part(gif.clone(), "final..gif", "image/gif"))
        .add_part("images", part(create_test_png(8, 8), "photo..png", "image/png"));
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let paths = file_paths(&response);
    assert_eq!(paths.len(), 2);
    assert!(paths[0].ends_with("-final.gif"), "{}", paths[0]);
    assert!(paths[1].ends_with("-photo.webp"), "{}", paths[1]);
    assert_eq!(std::fs::read(on_disk(app.storage_root(), &paths[0])).unwrap(), gif);
}

#[tokio::test]
async fn test_too_many_files_is_bad_request() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(temp_dir.path());
    config.media.images.max_files = 2;
    let app = setup_test_app_with(config, temp_dir).await;

    let mut form = MultipartForm::new();
    for name in ["a.gif", "b.gif", "c.gif"] {
        form = form.add_part("images", part(create_test_gif(2, 2), name, "image/gif"));
    }
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 400);
    assert_eq!(stored_files(&app.storage_root().join("uploads")), 0);
}

#[tokio::test]
async fn test_oversize_file_is_payload_too_large() {
    let temp_dir = tempfile::tempdir().unwrap();
    let mut config = create_test_config(temp_dir.path());
    config.media.documents.max_file_size_bytes = 1000;
    let app = setup_test_app_with(config, temp_dir).await;

    let form = MultipartForm::new().add_part("docs", part(vec![b'a'; 4000], "big.txt", "text/plain"));
    let response = app.client().post("/docs").multipart(form).await;

    assert_eq!(response.status_code(), 413);
}

#[tokio::test]
async fn test_undecodable_image_is_processing_failure() {
    let app = setup_test_app().await;

    let form = MultipartForm::new()
        .add_part("images", part(create_test_gif(2, 2), "fine.gif", "image/gif"))
        .add_part("images", part(b"not really a png".to_vec(), "broken.png", "image/png"));
    let response = app.client().post("/uploads").multipart(form).await;

    assert_eq!(response.status_code(), 500);
    let body = response.json::<Value>();
    assert_eq!(body["code"], "PROCESSING_FAILED");
    assert!(body["details"].as_str().unwrap().contains("broken.png"));
    assert_eq!(stored_files(&app.storage_root().join("uploads")), 0);
}

#[tokio::test]
async fn test_document_upload_is_stored_verbatim_and_served() {
    let app = setup_test_app().await;
    let pdf = create_test_pdf();

    let form = MultipartForm::new().add_part("docs", part(pdf.clone(), "Annual Report.pdf", "application/pdf"));
    let response = app.client().post("/docs").multipart(form).await;

    assert_eq!(response.status_code(), 200, "{}", response.text());
    let paths = file_paths(&response);
    assert!(paths[0].starts_with("/docs/"));
    assert!(paths[0].ends_with("-Annual_Report.pdf"));

    let served = app.client().get(&paths[0]).await;
    assert_eq!(served.status_code(), 200);
    assert_eq!(served.as_bytes().as_ref(), pdf.as_slice());
}

#[tokio::test]
async fn test_document_upload_checks_allow_list() {
    let app = setup_test_app().await;

    let form = MultipartForm::new().add_part(
        "docs",
        part(b"MZ".to_vec(), "installer.exe", "application/octet-stream"),
    );
    let response = app.client().post("/docs").multipart(form).await;
    assert_eq!(response.status_code(), 415);

    let form = MultipartForm::new()
        .add_part("images", part(create_test_pdf(), "a.pdf", "application/pdf"));
    let response = app.client().post("/docs").multipart(form).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_missing_static_file_is_not_found() {
    let app = setup_test_app().await;

    let response = app.client().get("/uploads/does-not-exist.webp").await;

    assert_eq!(response.status_code(), 404);
}
