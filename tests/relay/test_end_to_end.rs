// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! End-to-end delivery against a real TCP listener
//!
//! Each test plays the consumer: accept one connection, read the framed
//! message, check the length prefix, and parse the envelope JSON.

use anyhow::Result;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use fabstir_checkpoint_relay::{
    CheckpointRelay, CheckpointValue, ContentKind, RelayConfig, SelfSerializingArchive, Table,
    FRAME_LEN_WIDTH,
};
use serde_json::json;
use std::io::Write;
use std::path::Path;
use tokio::io::AsyncReadExt;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// Bind a throwaway consumer; returns its config and the bytes of the first
/// connection once it closes
async fn spawn_consumer() -> Result<(RelayConfig, JoinHandle<Vec<u8>>)> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.unwrap();
        received
    });
    Ok((RelayConfig::new("127.0.0.1", port), handle))
}

/// Split a framed message into its declared length and envelope JSON
fn unframe(received: &[u8]) -> (usize, serde_json::Value) {
    let prefix = std::str::from_utf8(&received[..FRAME_LEN_WIDTH]).unwrap();
    let declared: usize = prefix.trim_end().parse().unwrap();
    let envelope = serde_json::from_slice(&received[FRAME_LEN_WIDTH..]).unwrap();
    (declared, envelope)
}

// ==================== Inline Payloads ====================

#[tokio::test]
async fn test_plain_text_checkpoint() -> Result<()> {
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);

    let receipt = relay
        .checkpoint("hello world", json!({"k": "v"}), json!("id-1"), None)
        .await?;
    assert_eq!(receipt.kind, ContentKind::PlainText);

    let received = consumer.await?;
    let (declared, envelope) = unframe(&received);

    assert_eq!(declared, received.len() - FRAME_LEN_WIDTH);
    assert_eq!(envelope["dataType"], "text/plain");
    assert_eq!(envelope["data"], "hello world");
    assert_eq!(envelope["localPath"], serde_json::Value::Null);
    assert_eq!(envelope["localIsTemp"], false);
    assert_eq!(envelope["metadata"], json!({"k": "v"}));
    assert_eq!(envelope["identifier"], "id-1");
    Ok(())
}

#[tokio::test]
async fn test_record_checkpoint_inlines_canonical_json() -> Result<()> {
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);

    relay
        .checkpoint(
            json!({"zebra": 1, "apple": {"nested": true}}),
            json!({}),
            json!("id-2"),
            None,
        )
        .await?;

    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["dataType"], "application/json");
    // Inline data is itself canonical JSON text, key-sorted and compact
    assert_eq!(
        envelope["data"],
        r#"{"apple":{"nested":true},"zebra":1}"#
    );
    assert_eq!(envelope["localIsTemp"], false);
    Ok(())
}

#[tokio::test]
async fn test_binary_checkpoint_round_trips_through_base64() -> Result<()> {
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);

    let payload: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    relay
        .checkpoint(payload.clone(), json!({}), json!("id-3"), None)
        .await?;

    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["dataType"], "application/octet-stream");

    let decoded = BASE64.decode(envelope["data"].as_str().unwrap())?;
    assert_eq!(decoded, payload);
    Ok(())
}

#[tokio::test]
async fn test_json_string_classified_by_reparse() -> Result<()> {
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);

    let receipt = relay
        .checkpoint(r#"{"x": 1}"#, json!({}), json!("id-4"), None)
        .await?;
    assert_eq!(receipt.kind, ContentKind::Json);

    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["dataType"], "application/json");
    Ok(())
}

#[tokio::test]
async fn test_csv_rules() -> Result<()> {
    // Multi-line, every line delimited: CSV
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);
    relay
        .checkpoint("a,b\n1,2\n3,4", json!({}), json!("id-5"), None)
        .await?;
    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["dataType"], "text/csv");

    // Single line with commas: plain text
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);
    relay
        .checkpoint("a,b,c", json!({}), json!("id-6"), None)
        .await?;
    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["dataType"], "text/plain");
    Ok(())
}

#[tokio::test]
async fn test_table_checkpoint_delivers_csv() -> Result<()> {
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);

    let mut table = Table::new(vec!["city".to_string(), "pop".to_string()]);
    table.push_row(vec!["lisbon".to_string(), "545923".to_string()]);
    table.push_row(vec!["porto".to_string(), "231800".to_string()]);

    relay.checkpoint(table, json!({}), json!("id-7"), None).await?;

    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["dataType"], "text/csv");
    assert_eq!(envelope["data"], "city,pop\nlisbon,545923\nporto,231800\n");
    Ok(())
}

// ==================== File References ====================

#[tokio::test]
async fn test_existing_file_path_sent_as_reference() -> Result<()> {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile()?;
    // File content is valid JSON; the path reading must still win
    file.write_all(br#"{"contents": "ignored"}"#)?;
    file.flush()?;
    let path_string = file.path().to_string_lossy().to_string();

    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);
    let receipt = relay
        .checkpoint(path_string.as_str(), json!({}), json!("id-8"), None)
        .await?;
    assert_eq!(receipt.kind, ContentKind::FileReference);

    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["data"], path_string.as_str());
    assert_eq!(
        envelope["localPath"].as_str().unwrap(),
        std::path::absolute(file.path())?.to_string_lossy()
    );
    assert_eq!(envelope["localIsTemp"], false);
    assert_eq!(envelope["dataType"], "application/json");
    Ok(())
}

// ==================== Archive Datasets ====================

struct FakeGrid {
    payload: &'static [u8],
}

impl SelfSerializingArchive for FakeGrid {
    fn write_archive(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.payload)?;
        Ok(())
    }
}

#[tokio::test]
async fn test_archive_dataset_always_spools() -> Result<()> {
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);

    // A handful of bytes, far below the inline threshold, spooled anyway
    let grid: Box<dyn SelfSerializingArchive> = Box::new(FakeGrid {
        payload: b"CDF\x01gridded-data",
    });
    let receipt = relay.checkpoint(grid, json!({}), json!("id-9"), None).await?;

    assert_eq!(receipt.kind, ContentKind::ArchiveBinary);
    assert!(receipt.local_is_temp);
    assert!(receipt.content_hash.is_some());

    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["data"], serde_json::Value::Null);
    assert_eq!(envelope["dataType"], "application/x-netcdf");
    assert_eq!(envelope["localIsTemp"], true);

    let local_path = envelope["localPath"].as_str().unwrap();
    assert!(local_path.ends_with(".nc"));
    assert_eq!(std::fs::read(local_path)?, b"CDF\x01gridded-data");

    // Consumer's cleanup duty
    std::fs::remove_file(local_path)?;
    Ok(())
}

// ==================== Unknown Values ====================

#[tokio::test]
async fn test_unknown_value_still_delivers_envelope() -> Result<()> {
    let (config, consumer) = spawn_consumer().await?;
    let relay = CheckpointRelay::new(config);

    relay
        .checkpoint(
            CheckpointValue::Unknown,
            json!({"reason": "unrepresentable"}),
            json!("id-10"),
            None,
        )
        .await?;

    let (_, envelope) = unframe(&consumer.await?);
    assert_eq!(envelope["data"], serde_json::Value::Null);
    assert_eq!(envelope["dataType"], serde_json::Value::Null);
    assert_eq!(envelope["localPath"], serde_json::Value::Null);
    // Metadata and identifier still reach the consumer
    assert_eq!(envelope["metadata"], json!({"reason": "unrepresentable"}));
    assert_eq!(envelope["identifier"], "id-10");
    Ok(())
}
