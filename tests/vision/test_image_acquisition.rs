// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Image acquisition tests against a local HTTP server

use assis_detect::{
    config::FetchConfig,
    vision::{AcquisitionError, FetchError, ImageAcquirer, ImageError},
};
use assis_detect::vision::image_utils::MAX_IMAGE_SIZE;
use image::{DynamicImage, ImageFormat, RgbImage};
use std::io::Cursor;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn encoded(format: ImageFormat, width: u32, height: u32) -> Vec<u8> {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([1, 2, 3])));
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, format).unwrap();
    buffer.into_inner()
}

fn acquirer(timeout_secs: u64) -> ImageAcquirer {
    ImageAcquirer::new(&FetchConfig {
        timeout_secs,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_fetch_png() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bus.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(encoded(ImageFormat::Png, 40, 30)))
        .mount(&server)
        .await;

    let image = acquirer(5)
        .from_url(&format!("{}/bus.png", server.uri()))
        .await
        .unwrap();

    assert_eq!(image.width(), 40);
    assert_eq!(image.height(), 30);
    assert_eq!(image.info.format, ImageFormat::Png);
}

#[tokio::test]
async fn test_fetch_jpeg() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/bus.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(encoded(ImageFormat::Jpeg, 16, 16)))
        .mount(&server)
        .await;

    let image = acquirer(5)
        .from_url(&format!("{}/bus.jpg", server.uri()))
        .await
        .unwrap();

    assert_eq!(image.info.format, ImageFormat::Jpeg);
}

#[tokio::test]
async fn test_fetch_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = acquirer(5)
        .from_url(&format!("{}/missing.png", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(AcquisitionError::Fetch(FetchError::HttpStatus(404, _)))
    ));
}

#[tokio::test]
async fn test_fetch_non_image() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not an image at all"))
        .mount(&server)
        .await;

    let result = acquirer(5)
        .from_url(&format!("{}/page", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(AcquisitionError::Decode(ImageError::UnsupportedFormat))
    ));
}

#[tokio::test]
async fn test_fetch_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let result = acquirer(5)
        .from_url(&format!("{}/empty.png", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(AcquisitionError::Decode(ImageError::EmptyData))
    ));
}

#[tokio::test]
async fn test_fetch_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(encoded(ImageFormat::Png, 4, 4))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let result = acquirer(1)
        .from_url(&format!("{}/slow.png", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(AcquisitionError::Fetch(FetchError::Timeout(_)))
    ));
}

#[tokio::test]
async fn test_fetch_unreachable_host() {
    // Nothing listens on port 9 locally
    let result = acquirer(2).from_url("http://127.0.0.1:9/image.png").await;

    assert!(matches!(
        result,
        Err(AcquisitionError::Fetch(FetchError::Http(_)))
            | Err(AcquisitionError::Fetch(FetchError::Timeout(_)))
    ));
}

#[tokio::test]
async fn test_fetch_rejects_oversized_content_length() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; MAX_IMAGE_SIZE + 1]))
        .mount(&server)
        .await;

    let result = acquirer(10)
        .from_url(&format!("{}/huge.png", server.uri()))
        .await;

    assert!(matches!(
        result,
        Err(AcquisitionError::Decode(ImageError::TooLarge(_, MAX_IMAGE_SIZE)))
    ));
}

/// Serve a chunked body of `chunks` x 1 MiB with no Content-Length, returning
/// how many body bytes the peer accepted before hanging up
async fn serve_chunked(listener: TcpListener, chunks: usize) -> usize {
    let (mut socket, _) = listener.accept().await.unwrap();

    let mut request = Vec::new();
    let mut buf = [0u8; 1024];
    while !request.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = socket.read(&mut buf).await.unwrap();
        if n == 0 {
            return 0;
        }
        request.extend_from_slice(&buf[..n]);
    }

    let head = "HTTP/1.1 200 OK\r\nContent-Type: image/png\r\nTransfer-Encoding: chunked\r\n\r\n";
    if socket.write_all(head.as_bytes()).await.is_err() {
        return 0;
    }

    let chunk = vec![0u8; 1024 * 1024];
    let mut written = 0;
    for _ in 0..chunks {
        let frame_start = format!("{:x}\r\n", chunk.len());
        let ok = socket.write_all(frame_start.as_bytes()).await.is_ok()
            && socket.write_all(&chunk).await.is_ok()
            && socket.write_all(b"\r\n").await.is_ok();
        if !ok {
            return written;
        }
        written += chunk.len();
    }
    let _ = socket.write_all(b"0\r\n\r\n").await;
    written
}

#[tokio::test]
async fn test_fetch_stops_reading_chunked_body_at_cap() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(serve_chunked(listener, 40));

    let result = acquirer(30)
        .from_url(&format!("http://{}/stream.png", addr))
        .await;

    assert!(matches!(
        result,
        Err(AcquisitionError::Decode(ImageError::TooLarge(_, MAX_IMAGE_SIZE)))
    ));

    // The client hung up; the server must not have pushed the whole body
    let written = tokio::time::timeout(Duration::from_secs(10), server)
        .await
        .expect("server finished")
        .unwrap();
    assert!(written < 40 * 1024 * 1024, "server wrote {} bytes", written);
}
