use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use desk_agent::core::{AskError, ConnectedClient};
use std::path::Path;

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path)
        .expect("Failed to read scratch dir")
        .next()
        .is_none()
}

pub async fn async_test_capture(client: &mut ConnectedClient, scratch: &Path) {
    let reply = client
        .ask_screenshot(80)
        .await
        .expect("Failed to capture");
    let image = BASE64.decode(reply.image).expect("Image not base64");
    assert_eq!(image, b"fake-png");
    assert!(is_empty_dir(scratch), "Scratch files left behind");
}

pub async fn async_test_capture_failure(
    client: &mut ConnectedClient,
    scratch: &Path,
) {
    match client.ask_screenshot(80).await {
        Err(AskError::Failure { msg }) => {
            assert!(msg.starts_with("Capture failed"), "{}", msg)
        }
        x => panic!("Unexpected result: {:?}", x),
    }
    assert!(is_empty_dir(scratch), "Scratch files left behind");
}
