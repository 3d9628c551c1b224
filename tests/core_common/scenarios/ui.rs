use desk_agent::core::{AskError, ConnectedClient};

pub async fn async_test_click_and_keys(client: &mut ConnectedClient) {
    client.ask_click(100, 200).await.expect("Failed to click");
    client.ask_keys("hello world").await.expect("Failed to type");
}

pub async fn async_test_automation_failure(client: &mut ConnectedClient) {
    match client.ask_click(1, 1).await {
        Err(AskError::Failure { msg }) => {
            assert!(msg.starts_with("Automation failed"), "{}", msg)
        }
        x => panic!("Unexpected result: {:?}", x),
    }

    match client.ask_keys("abc").await {
        Err(AskError::Failure { msg }) => {
            assert!(msg.starts_with("Automation failed"), "{}", msg)
        }
        x => panic!("Unexpected result: {:?}", x),
    }
}
