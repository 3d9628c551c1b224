use desk_agent::core::{msg::ExecReply, AskError, ConnectedClient};
use std::time::{Duration, Instant};

pub async fn async_test_output_and_exit_code(client: &mut ConnectedClient) {
    let reply = client
        .ask_exec("echo hi", 0)
        .await
        .expect("Failed to exec");
    assert_eq!(
        reply,
        ExecReply {
            exit_code: 0,
            output: String::from("hi\n"),
        }
    );

    let reply = client
        .ask_exec("exit 7", 0)
        .await
        .expect("Failed to exec");
    assert_eq!(reply.exit_code, 7);
    assert_eq!(reply.output, "");

    let reply = client
        .ask_exec("echo out; echo err 1>&2; exit 2", 0)
        .await
        .expect("Failed to exec");
    assert_eq!(reply.exit_code, 2);
    assert!(reply.output.contains("out\n"), "{:?}", reply.output);
    assert!(reply.output.contains("err\n"), "{:?}", reply.output);
}

pub async fn async_test_signal_exit(client: &mut ConnectedClient) {
    let reply = client
        .ask_exec("kill -9 $$", 0)
        .await
        .expect("Failed to exec");
    assert_eq!(reply.exit_code, -1);
}

pub async fn async_test_empty_command(client: &mut ConnectedClient) {
    match client.ask_exec("", 0).await {
        Err(AskError::Failure { msg }) => {
            assert_eq!(msg, "Invalid request: cmd required")
        }
        x => panic!("Unexpected result: {:?}", x),
    }

    // Connection remains usable afterwards
    let reply = client
        .ask_exec("echo still here", 0)
        .await
        .expect("Failed to exec");
    assert_eq!(reply.output, "still here\n");
}

pub async fn async_test_timeout(client: &mut ConnectedClient) {
    let before = Instant::now();
    match client.ask_exec("sleep 30 & sleep 30; wait", 1).await {
        Err(AskError::Failure { msg }) => {
            assert!(msg.contains("Timed out"), "{}", msg)
        }
        x => panic!("Unexpected result: {:?}", x),
    }
    assert!(
        before.elapsed() < Duration::from_secs(8),
        "Took {:?}",
        before.elapsed()
    );
}

pub async fn async_test_repeatable(client: &mut ConnectedClient) {
    let first = client
        .ask_exec("printf 'a\\nb'; exit 3", 0)
        .await
        .expect("Failed to exec");
    for _ in 0..3 {
        let next = client
            .ask_exec("printf 'a\\nb'; exit 3", 0)
            .await
            .expect("Failed to exec");
        assert_eq!(next, first);
    }
}
