use crate::integration::{init_tracing, spawn_server, test_config};
use crate::utils::TestClient;
use beacon_core::PeerId;

#[tokio::test]
async fn solo_join_gets_reply_then_id_and_nothing_else() {
    init_tracing();
    let addr = spawn_server(test_config()).await;

    let mut client = TestClient::connect(addr).await.expect("connect");
    client.open_channel("lobby:room1").await.expect("handshake");

    let (user_id, name) = client.join_lobby("room1").await.expect("join");
    assert_eq!(name, "room1");
    assert_ne!(user_id, PeerId::NONE);

    // Alone in the lobby: no roster, no announcements.
    client.expect_silence(200).await.expect("unexpected push");

    client.close().await.expect("close");
}
