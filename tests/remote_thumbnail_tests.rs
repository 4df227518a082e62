mod common;

use common::{files_in, png_bytes, remote_config};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vidgallery::{FailureKind, FsMediaStore, GalleryConfig, RemoteThumbnailResolver};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const VIDEO_ID: &str = "dQw4w9WgXcQ";

fn resolver(config: &GalleryConfig) -> RemoteThumbnailResolver<FsMediaStore> {
    let store = Arc::new(FsMediaStore::from_config(config));
    RemoteThumbnailResolver::new(config.clone(), store).unwrap()
}

async fn mount_candidate(server: &MockServer, quality: &str, response: ResponseTemplate, calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/vi/{}/{}.jpg", VIDEO_ID, quality)))
        .respond_with(response)
        .expect(calls)
        .mount(server)
        .await;
}

async fn mount_title(server: &MockServer, title: &str) {
    Mock::given(method("GET"))
        .and(path("/oembed"))
        .and(query_param("format", "json"))
        .and(query_param("url", format!("https://www.youtube.com/watch?v={}", VIDEO_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "title": title,
            "author_name": "Rick Astley",
            "type": "video",
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_best_quality_wins() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir, &server.uri());

    mount_candidate(&server, "maxresdefault", ResponseTemplate::new(200).set_body_bytes(png_bytes(64, 36)), 1).await;
    for quality in ["sddefault", "hqdefault", "mqdefault", "default"] {
        mount_candidate(&server, quality, ResponseTemplate::new(200), 0).await;
    }
    mount_title(&server, "Never Gonna Give You Up").await;

    let remote = resolver(&config)
        .resolve(&format!("https://www.youtube.com/watch?v={}&t=10s", VIDEO_ID))
        .await
        .unwrap();

    assert_eq!(remote.video_id, VIDEO_ID);
    assert_eq!(remote.title, "Never Gonna Give You Up");
    assert!(remote.filename.starts_with(&format!("yt_{}_", VIDEO_ID)));
    assert!(remote.filename.ends_with(".jpg"));

    let bytes = std::fs::read(config.thumbnail_dir.join(&remote.filename)).unwrap();
    assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    let stored = image::load_from_memory(&bytes).unwrap();
    assert_eq!((stored.width(), stored.height()), (64, 36));
}

#[tokio::test]
async fn test_falls_back_in_descending_quality() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir, &server.uri());

    mount_candidate(&server, "maxresdefault", ResponseTemplate::new(404), 1).await;
    mount_candidate(&server, "sddefault", ResponseTemplate::new(500), 1).await;
    mount_candidate(
        &server,
        "hqdefault",
        ResponseTemplate::new(200).set_body_string("<html>placeholder</html>"),
        1,
    )
    .await;
    mount_candidate(&server, "mqdefault", ResponseTemplate::new(200).set_body_bytes(png_bytes(32, 18)), 1).await;
    mount_candidate(&server, "default", ResponseTemplate::new(200), 0).await;
    mount_title(&server, "Fallback order").await;

    let remote = resolver(&config)
        .resolve(&format!("https://youtu.be/{}", VIDEO_ID))
        .await
        .unwrap();

    // Rejected candidates leave nothing behind
    assert_eq!(files_in(&config.thumbnail_dir), vec![remote.filename.clone()]);
    let stored = image::open(config.thumbnail_dir.join(&remote.filename)).unwrap();
    assert_eq!((stored.width(), stored.height()), (32, 18));
}

#[tokio::test]
async fn test_slow_candidate_is_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir, &server.uri());

    mount_candidate(
        &server,
        "maxresdefault",
        ResponseTemplate::new(200)
            .set_body_bytes(png_bytes(8, 8))
            .set_delay(Duration::from_secs(3)),
        1,
    )
    .await;
    mount_candidate(&server, "sddefault", ResponseTemplate::new(200).set_body_bytes(png_bytes(16, 9)), 1).await;

    let remote = resolver(&config)
        .resolve(&format!("https://www.youtube.com/shorts/{}", VIDEO_ID))
        .await
        .unwrap();
    let stored = image::open(config.thumbnail_dir.join(&remote.filename)).unwrap();
    assert_eq!((stored.width(), stored.height()), (16, 9));
}

#[tokio::test]
async fn test_all_candidates_missing_is_remote_unavailable() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir, &server.uri());

    for quality in ["maxresdefault", "sddefault", "hqdefault", "mqdefault", "default"] {
        mount_candidate(&server, quality, ResponseTemplate::new(404), 1).await;
    }

    let err = resolver(&config)
        .resolve(&format!("https://www.youtube.com/embed/{}", VIDEO_ID))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::RemoteUnavailable);
    assert!(files_in(&config.thumbnail_dir).is_empty());
}

#[tokio::test]
async fn test_non_image_bodies_are_decode_failures() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir, &server.uri());

    mount_candidate(&server, "maxresdefault", ResponseTemplate::new(404), 1).await;
    for quality in ["sddefault", "hqdefault", "mqdefault", "default"] {
        mount_candidate(&server, quality, ResponseTemplate::new(200).set_body_string("nope"), 1).await;
    }

    let err = resolver(&config)
        .resolve(&format!("https://youtu.be/{}", VIDEO_ID))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), FailureKind::DecodeFailure);
    assert!(files_in(&config.thumbnail_dir).is_empty());
}

#[tokio::test]
async fn test_unrecognized_url_makes_no_request() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir, &server.uri());

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let resolver = resolver(&config);
    for url in ["https://vimeo.com/76979871", "https://www.youtube.com/feed/trending", ""] {
        let err = resolver.resolve(url).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::MalformedSource, "url: {}", url);
    }
    assert!(files_in(&config.thumbnail_dir).is_empty());
}

#[tokio::test]
async fn test_title_falls_back_when_lookup_fails() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir, &server.uri());

    mount_candidate(&server, "maxresdefault", ResponseTemplate::new(200).set_body_bytes(png_bytes(8, 8)), 1).await;
    Mock::given(method("GET"))
        .and(path("/oembed"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let remote = resolver(&config)
        .resolve(&format!("https://youtu.be/{}", VIDEO_ID))
        .await
        .unwrap();
    assert_eq!(remote.title, "YouTube Video");
}

#[tokio::test]
async fn test_concurrent_resolutions_get_distinct_files() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = remote_config(&dir, &server.uri());

    mount_candidate(&server, "maxresdefault", ResponseTemplate::new(200).set_body_bytes(png_bytes(8, 8)), 8).await;
    mount_title(&server, "Same video").await;

    let resolver = Arc::new(resolver(&config));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            tokio::spawn(async move {
                resolver
                    .resolve(&format!("https://youtu.be/{}", VIDEO_ID))
                    .await
                    .unwrap()
                    .filename
            })
        })
        .collect();

    let mut names = Vec::new();
    for handle in handles {
        names.push(handle.await.unwrap());
    }
    names.sort();
    names.dedup();
    assert_eq!(names.len(), 8);
    assert_eq!(files_in(&config.thumbnail_dir), names);
}

#[tokio::test]
async fn test_oversized_candidate_is_skipped() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();
    let config = GalleryConfig {
        max_remote_image_bytes: 4096,
        ..remote_config(&dir, &server.uri())
    };

    mount_candidate(
        &server,
        "maxresdefault",
        ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64 * 1024]),
        1,
    )
    .await;
    mount_candidate(&server, "sddefault", ResponseTemplate::new(200).set_body_bytes(png_bytes(8, 8)), 1).await;

    let remote = resolver(&config)
        .resolve(&format!("https://youtu.be/{}", VIDEO_ID))
        .await
        .unwrap();
    assert_eq!(files_in(&config.thumbnail_dir), vec![remote.filename.clone()]);
    let stored = image::open(config.thumbnail_dir.join(&remote.filename)).unwrap();
    assert_eq!((stored.width(), stored.height()), (8, 8));
}
