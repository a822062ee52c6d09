use carstate_ingest::{IngestionPipeline, PipelineConfig};
use carstate_relay::{BrokerConfig, StreamError, StreamSubscriber};
use carstate_store::SnapshotStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const CONNACK_ACCEPTED: [u8; 4] = [0x20, 0x02, 0x00, 0x00];
const DISCONNECT: [u8; 2] = [0xe0, 0x00];

fn subscriber(port: u16) -> StreamSubscriber {
    let broker = BrokerConfig {
        host: "127.0.0.1".to_string(),
        port,
        client_id: "carstate-test".to_string(),
    };
    let pipeline = IngestionPipeline::new(PipelineConfig::default(), Arc::new(SnapshotStore::new()));
    StreamSubscriber::new(&broker, Arc::new(pipeline))
}

/// Accepts one client, acknowledges its CONNECT, and returns every byte it
/// sends afterwards until it closes the connection.
async fn spawn_broker() -> (u16, tokio::task::JoinHandle<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();
        let mut connect = [0u8; 256];
        let n = socket.read(&mut connect).await.unwrap();
        assert!(n > 0);
        assert_eq!(connect[0] >> 4, 1, "first packet must be CONNECT");
        socket.write_all(&CONNACK_ACCEPTED).await.unwrap();

        let mut received = Vec::new();
        let _ = tokio::time::timeout(Duration::from_secs(10), socket.read_to_end(&mut received)).await;
        received
    });
    (port, handle)
}

// ── Startup ──────────────────────────────────────────────────────

#[tokio::test]
async fn connect_to_refused_port_is_fatal() {
    let mut stream = subscriber(1);
    let err = stream.connect().await.unwrap_err();

    match err {
        StreamError::Connect { broker, .. } => assert_eq!(broker, "127.0.0.1:1"),
        other => panic!("expected connect error, got {other:?}"),
    }
}

#[tokio::test]
async fn connect_subscribes_after_connack() {
    let (port, broker) = spawn_broker().await;
    let mut stream = subscriber(port);
    stream.connect().await.unwrap();
    stream.run(async {}).await.unwrap();

    let received = broker.await.unwrap();
    assert_eq!(received.first(), Some(&0x82), "SUBSCRIBE is sent first");
    let filter = b"teslamate/cars/#";
    assert!(received.windows(filter.len()).any(|w| w == filter));
}

// ── Shutdown ─────────────────────────────────────────────────────

#[tokio::test]
async fn shutdown_sends_disconnect_to_broker() {
    let (port, broker) = spawn_broker().await;
    let mut stream = subscriber(port);
    stream.connect().await.unwrap();

    tokio::time::timeout(Duration::from_secs(10), stream.run(async {}))
        .await
        .expect("shutdown completes")
        .expect("disconnect request accepted");

    let received = broker.await.unwrap();
    assert!(received.ends_with(&DISCONNECT), "got {received:02x?}");
}

#[tokio::test]
async fn shutdown_without_connection_still_completes() {
    let stream = subscriber(1);

    let result = tokio::time::timeout(Duration::from_secs(10), stream.run(async {}))
        .await
        .expect("shutdown completes");
    assert!(result.is_ok());
}

#[tokio::test]
async fn run_processes_until_shutdown_fires() {
    let (port, broker) = spawn_broker().await;
    let mut stream = subscriber(port);
    stream.connect().await.unwrap();

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let run = tokio::spawn(stream.run(async move {
        let _ = rx.await;
    }));
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(!run.is_finished());

    tx.send(()).unwrap();
    run.await.unwrap().unwrap();
    assert!(broker.await.unwrap().ends_with(&DISCONNECT));
}
