use crate::integration::{init_tracing, spawn_server, test_config};
use crate::utils::TestClient;
use beacon_core::{event, Opcode, PeerId};
use serde_json::json;
use std::net::SocketAddr;

async fn rendezvous(addr: SocketAddr) -> (TestClient, PeerId, TestClient, PeerId) {
    let mut a = TestClient::connect(addr).await.expect("connect a");
    a.open_channel("lobby:room1").await.expect("handshake a");
    let (id_a, _) = a.join_lobby("room1").await.expect("join a");

    let mut b = TestClient::connect(addr).await.expect("connect b");
    b.open_channel("lobby:room1").await.expect("handshake b");
    let (id_b, _) = b.join_lobby("room1").await.expect("join b");
    b.expect_push(event::PEER_CONNECT).await.expect("b roster");
    a.expect_push(event::PEER_CONNECT).await.expect("a sees b");

    (a, id_a, b, id_b)
}

#[tokio::test]
async fn offer_is_unicast_with_the_sender_id_written_in() {
    init_tracing();
    let addr = spawn_server(test_config()).await;
    let (mut a, id_a, mut b, id_b) = rendezvous(addr).await;

    a.send_event(event::OFFER, json!({ "id": id_b.0, "data": "SDP_A" }))
        .await
        .expect("send offer");

    let offer = b.expect_push(event::OFFER).await.expect("offer push");
    assert_eq!(offer.kind, Opcode::Offer);
    assert_eq!(offer.id, id_a, "outbound id must carry the sender");
    assert_eq!(offer.data, "SDP_A");

    // No echo and no reply for the sender.
    a.expect_silence(200).await.expect("relay has no reply");
}

#[tokio::test]
async fn answer_and_candidate_keep_their_opcodes() {
    init_tracing();
    let addr = spawn_server(test_config()).await;
    let (mut a, id_a, mut b, id_b) = rendezvous(addr).await;

    b.send_event(event::ANSWER, json!({ "id": id_a.0, "data": "SDP_B" }))
        .await
        .expect("send answer");
    let answer = a.expect_push(event::ANSWER).await.expect("answer push");
    assert_eq!(answer.kind, Opcode::Answer);
    assert_eq!(answer.id, id_b);
    assert_eq!(answer.data, "SDP_B");

    a.send_event(event::CANDIDATE, json!({ "id": id_b.0, "data": "candidate:0 1 UDP" }))
        .await
        .expect("send candidate");
    let candidate = b.expect_push(event::CANDIDATE).await.expect("candidate push");
    assert_eq!(candidate.kind, Opcode::Candidate);
    assert_eq!(candidate.id, id_a);
    assert_eq!(candidate.data, "candidate:0 1 UDP");
}
