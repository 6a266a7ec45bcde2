use crate::integration::{init_tracing, spawn_server, test_config};
use crate::utils::TestClient;
use beacon_core::{event, Opcode};

#[tokio::test]
async fn closing_the_transport_broadcasts_peer_disconnect() {
    init_tracing();
    let addr = spawn_server(test_config()).await;

    let mut a = TestClient::connect(addr).await.expect("connect a");
    a.open_channel("lobby:room1").await.expect("handshake a");
    let (id_a, _) = a.join_lobby("room1").await.expect("join a");

    let mut b = TestClient::connect(addr).await.expect("connect b");
    b.open_channel("lobby:room1").await.expect("handshake b");
    b.join_lobby("room1").await.expect("join b");
    b.expect_push(event::PEER_CONNECT).await.expect("b roster");

    a.expect_push(event::PEER_CONNECT).await.expect("a sees b");
    a.close().await.expect("close a");

    let gone = b.expect_push(event::PEER_DISCONNECT).await.expect("b hears");
    assert_eq!(gone.kind, Opcode::PeerDisconnect);
    assert_eq!(gone.id, id_a);
    assert_eq!(gone.data, "");

    // The lobby survives with B in it; a newcomer only sees B in the roster.
    let mut c = TestClient::connect(addr).await.expect("connect c");
    c.open_channel("lobby:room1").await.expect("handshake c");
    c.join_lobby("room1").await.expect("join c");
    let roster = c.expect_push(event::PEER_CONNECT).await.expect("c roster");
    assert_ne!(roster.id, id_a);
    c.expect_silence(200).await.expect("only b in the roster");
}

#[tokio::test]
async fn explicit_channel_leave_behaves_like_a_disconnect() {
    init_tracing();
    let addr = spawn_server(test_config()).await;

    let mut a = TestClient::connect(addr).await.expect("connect a");
    a.open_channel("lobby:room1").await.expect("handshake a");
    let (id_a, _) = a.join_lobby("room1").await.expect("join a");

    let mut b = TestClient::connect(addr).await.expect("connect b");
    b.open_channel("lobby:room1").await.expect("handshake b");
    b.join_lobby("room1").await.expect("join b");
    b.expect_push(event::PEER_CONNECT).await.expect("b roster");
    a.expect_push(event::PEER_CONNECT).await.expect("a sees b");

    let reference = a
        .send_event(event::PHX_LEAVE, serde_json::json!({}))
        .await
        .expect("send leave");
    a.expect_reply(reference).await.expect("leave reply");

    let gone = b.expect_push(event::PEER_DISCONNECT).await.expect("b hears");
    assert_eq!(gone.id, id_a);
}
