use desk_agent::core::HttpExecReply;
use serde_json::json;
use std::net::SocketAddr;

async fn post_exec(
    addr: SocketAddr,
    body: serde_json::Value,
) -> reqwest::Response {
    reqwest::Client::new()
        .post(format!("http://{}/agent/exec", addr))
        .json(&body)
        .send()
        .await
        .expect("Failed to send request")
}

pub async fn async_test_exec(addr: SocketAddr) {
    let response =
        post_exec(addr, json!({"cmd": "echo hi; exit 4", "timeout": 5})).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let reply: HttpExecReply = response.json().await.expect("Bad reply");
    assert_eq!(
        reply,
        HttpExecReply {
            exit: 4,
            output: String::from("hi\n"),
        }
    );
}

pub async fn async_test_cmd_required(addr: SocketAddr) {
    for body in vec![json!({}), json!({"cmd": ""})] {
        let response = post_exec(addr, body).await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
        assert_eq!(response.text().await.unwrap(), "cmd required");
    }
}

pub async fn async_test_timeout(addr: SocketAddr) {
    let response =
        post_exec(addr, json!({"cmd": "sleep 30", "timeout": 1})).await;
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let reply: HttpExecReply = response.json().await.expect("Bad reply");
    assert_eq!(reply.exit, 1);
    assert!(reply.output.contains("Timed out"), "{}", reply.output);
}
