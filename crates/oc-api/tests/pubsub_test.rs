#![allow(clippy::unwrap_used)]
// Integration tests for `PubSubClient` against a scripted MQTT 3.1.1 broker.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use oc_api::{Error, Message, PubSubClient, PubSubOptions};

const CONNACK_ACCEPTED: [u8; 4] = [0x20, 0x02, 0x00, 0x00];
const CONNACK_NOT_AUTHORIZED: [u8; 4] = [0x20, 0x02, 0x00, 0x05];
const SUBACK_FAILURE: u8 = 0x80;
const SUBACK_QOS2: u8 = 0x02;

// ── Scripted broker ─────────────────────────────────────────────────

/// Read one control packet: first header byte and body.
async fn read_packet(stream: &mut TcpStream) -> (u8, Vec<u8>) {
    let kind = stream.read_u8().await.unwrap();
    let mut len = 0usize;
    let mut shift = 0;
    loop {
        let byte = stream.read_u8().await.unwrap();
        len |= usize::from(byte & 0x7f) << shift;
        if byte & 0x80 == 0 {
            break;
        }
        shift += 7;
    }
    let mut body = vec![0; len];
    stream.read_exact(&mut body).await.unwrap();
    (kind, body)
}

/// Read a SUBSCRIBE and return its packet id and first topic filter.
async fn read_subscribe(stream: &mut TcpStream) -> (u16, String) {
    let (kind, body) = read_packet(stream).await;
    assert_eq!(kind, 0x82, "expected SUBSCRIBE");
    let pkid = u16::from_be_bytes([body[0], body[1]]);
    let len = usize::from(u16::from_be_bytes([body[2], body[3]]));
    let topic = String::from_utf8(body[4..4 + len].to_vec()).unwrap();
    (pkid, topic)
}

fn suback(pkid: u16, code: u8) -> Vec<u8> {
    let [hi, lo] = pkid.to_be_bytes();
    vec![0x90, 0x03, hi, lo, code]
}

/// QoS 0 PUBLISH; small enough for a one-byte remaining length.
fn publish(topic: &str, payload: &str) -> Vec<u8> {
    let remaining = 2 + topic.len() + payload.len();
    let mut packet = vec![0x30, u8::try_from(remaining).unwrap()];
    packet.extend_from_slice(&u16::try_from(topic.len()).unwrap().to_be_bytes());
    packet.extend_from_slice(topic.as_bytes());
    packet.extend_from_slice(payload.as_bytes());
    packet
}

/// Accept one client, check its CONNECT, then hand the socket to `script`.
async fn broker<F, Fut>(script: F) -> (String, JoinHandle<()>)
where
    F: FnOnce(TcpStream) -> Fut + Send + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let uri = format!("tcp://{}", listener.local_addr().unwrap());
    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let (kind, _) = read_packet(&mut stream).await;
        assert_eq!(kind, 0x10, "expected CONNECT");
        script(stream).await;
    });
    (uri, handle)
}

fn options(uri: &str) -> PubSubOptions {
    let mut opts = PubSubOptions::new(uri);
    opts.client_id = Some("oc-test".into());
    opts.connect_timeout = Duration::from_secs(5);
    opts
}

// ── Connect ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refused_connack_is_connect_error() {
    let (uri, broker) = broker(|mut stream| async move {
        stream.write_all(&CONNACK_NOT_AUTHORIZED).await.unwrap();
    })
    .await;

    let Err(err) = PubSubClient::connect(&options(&uri)).await else {
        panic!("broker refused the session but connect succeeded");
    };
    assert!(matches!(err, Error::PubSubConnect(_)), "got: {err:?}");
    broker.await.unwrap();
}

#[tokio::test]
async fn test_unreachable_broker_is_connect_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let uri = format!("tcp://{}", listener.local_addr().unwrap());
    drop(listener);

    let Err(err) = PubSubClient::connect(&options(&uri)).await else {
        panic!("nothing listens on {uri} but connect succeeded");
    };
    assert!(matches!(err, Error::PubSubConnect(_)), "got: {err:?}");
}

// ── Streaming ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_publish_reaches_channel() {
    let (uri, broker) = broker(|mut stream| async move {
        stream.write_all(&CONNACK_ACCEPTED).await.unwrap();
        let (pkid, topic) = read_subscribe(&mut stream).await;
        assert_eq!(topic, "openchirp/device/d1/#");
        stream.write_all(&suback(pkid, SUBACK_QOS2)).await.unwrap();
        stream
            .write_all(&publish("openchirp/device/d1/temp", "21.5"))
            .await
            .unwrap();
        // DISCONNECT from the client
        let (kind, _) = read_packet(&mut stream).await;
        assert_eq!(kind, 0xe0, "expected DISCONNECT");
    })
    .await;

    let mut client = PubSubClient::connect(&options(&uri)).await.unwrap();
    client.subscribe("openchirp/device/d1/#").await.unwrap();
    let mut rx = client.take_messages().unwrap();

    let item = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.unwrap(), Message::new("openchirp/device/d1/temp", "21.5"));

    client.disconnect().await.unwrap();
    broker.await.unwrap();
}

#[tokio::test]
async fn test_refused_subscription_is_reported() {
    let (uri, broker) = broker(|mut stream| async move {
        stream.write_all(&CONNACK_ACCEPTED).await.unwrap();
        let (pkid, _) = read_subscribe(&mut stream).await;
        stream.write_all(&suback(pkid, SUBACK_FAILURE)).await.unwrap();
        let _ = read_packet(&mut stream).await;
    })
    .await;

    let mut client = PubSubClient::connect(&options(&uri)).await.unwrap();
    client.subscribe("openchirp/private/#").await.unwrap();
    let mut rx = client.take_messages().unwrap();

    let item = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    match item {
        Err(Error::PubSubSubscribe { topic, reason }) => {
            assert_eq!(topic, "openchirp/private/#");
            assert_eq!(reason, "refused by broker");
        }
        other => panic!("expected a refused subscription, got: {other:?}"),
    }

    client.disconnect().await.unwrap();
    broker.await.unwrap();
}

#[tokio::test]
async fn test_broker_hangup_ends_stream_with_error() {
    let (uri, broker) = broker(|mut stream| async move {
        stream.write_all(&CONNACK_ACCEPTED).await.unwrap();
        let (pkid, _) = read_subscribe(&mut stream).await;
        stream.write_all(&suback(pkid, SUBACK_QOS2)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    })
    .await;

    let mut client = PubSubClient::connect(&options(&uri)).await.unwrap();
    client.subscribe("a/#").await.unwrap();
    let mut rx = client.take_messages().unwrap();

    let item = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .unwrap()
        .unwrap();
    assert!(
        matches!(item, Err(Error::PubSubDisconnected(_))),
        "got: {item:?}"
    );
    // No reconnection: the channel closes after the error.
    assert!(rx.recv().await.is_none());
    broker.await.unwrap();
}
