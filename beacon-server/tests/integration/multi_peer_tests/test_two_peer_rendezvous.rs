use crate::integration::{init_tracing, spawn_server, test_config};
use crate::utils::TestClient;
use beacon_core::{event, Opcode};

#[tokio::test]
async fn second_joiner_is_announced_and_learns_the_roster() {
    init_tracing();
    let addr = spawn_server(test_config()).await;

    let mut a = TestClient::connect(addr).await.expect("connect a");
    a.open_channel("lobby:room1").await.expect("handshake a");
    let (id_a, _) = a.join_lobby("room1").await.expect("join a");

    let mut b = TestClient::connect(addr).await.expect("connect b");
    b.open_channel("lobby:room1").await.expect("handshake b");
    let (id_b, _) = b.join_lobby("room1").await.expect("join b");
    assert_ne!(id_a, id_b);

    // B learns the present roster: exactly one peer_connect, for A.
    let roster = b.expect_push(event::PEER_CONNECT).await.expect("roster");
    assert_eq!(roster.kind, Opcode::PeerConnect);
    assert_eq!(roster.id, id_a);
    assert_eq!(roster.data, "");
    b.expect_silence(200).await.expect("roster is exactly once");

    // A is told about B: exactly one peer_connect, for B.
    let announce = a.expect_push(event::PEER_CONNECT).await.expect("announce");
    assert_eq!(announce.id, id_b);
    a.expect_silence(200).await.expect("announce is exactly once");
}

#[tokio::test]
async fn three_peers_each_learn_of_every_other_exactly_once() {
    init_tracing();
    let addr = spawn_server(test_config()).await;

    let mut a = TestClient::connect(addr).await.expect("connect a");
    a.open_channel("lobby:trio").await.expect("handshake a");
    let (id_a, _) = a.join_lobby("trio").await.expect("join a");

    let mut b = TestClient::connect(addr).await.expect("connect b");
    b.open_channel("lobby:trio").await.expect("handshake b");
    let (id_b, _) = b.join_lobby("trio").await.expect("join b");
    assert_eq!(b.expect_push(event::PEER_CONNECT).await.expect("b roster").id, id_a);

    let mut c = TestClient::connect(addr).await.expect("connect c");
    c.open_channel("lobby:trio").await.expect("handshake c");
    let (id_c, _) = c.join_lobby("trio").await.expect("join c");

    // C's roster lists A then B, in join order.
    let first = c.expect_push(event::PEER_CONNECT).await.expect("c roster 1");
    let second = c.expect_push(event::PEER_CONNECT).await.expect("c roster 2");
    assert_eq!((first.id, second.id), (id_a, id_b));
    c.expect_silence(200).await.expect("c roster complete");

    // A heard about B and C once each; B heard about C once.
    assert_eq!(a.expect_push(event::PEER_CONNECT).await.expect("a sees b").id, id_b);
    assert_eq!(a.expect_push(event::PEER_CONNECT).await.expect("a sees c").id, id_c);
    a.expect_silence(200).await.expect("a heard exactly two");
    assert_eq!(b.expect_push(event::PEER_CONNECT).await.expect("b sees c").id, id_c);
    b.expect_silence(200).await.expect("b heard exactly one");
}
