use crate::core_common::setup::TestBench;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use std::time::Duration;

/// Many clients at once against a server limited to `limit` processes
pub async fn async_test_bounded_in_flight(bench: &TestBench, limit: usize) {
    let mut handles = Vec::new();
    for i in 0..(limit * 3) {
        let mut client = bench.connect().await;
        handles.push(tokio::spawn(async move {
            client
                .ask_exec(format!("sleep 0.2; echo {}", i), 0)
                .await
                .map(|reply| (i, reply))
        }));
    }

    let state = bench.server.state();
    let mut peak = 0;
    while handles.iter().any(|h| !h.is_finished()) {
        peak = peak.max(state.in_flight());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    for handle in handles {
        let (i, reply) = handle
            .await
            .expect("Task failed")
            .expect("Failed to exec");
        assert_eq!(reply.exit_code, 0);
        assert_eq!(reply.output, format!("{}\n", i));
    }

    assert!(peak <= limit, "Peak in-flight {} exceeded {}", peak, limit);
    assert!(peak > 0, "Never observed a running process");
    assert_eq!(state.in_flight(), 0);
}

enum Outcome {
    Exec(usize, String),
    Screenshot(String),
    Keys,
}

/// Exec, screenshot, and keys requests interleaved across many clients
pub async fn async_test_mixed_operations(bench: &TestBench, limit: usize) {
    let mut handles = Vec::new();
    for i in 0..(limit * 2) {
        let mut exec = bench.connect().await;
        handles.push(tokio::spawn(async move {
            let reply = exec
                .ask_exec(format!("sleep 0.1; echo {}", i), 0)
                .await
                .expect("Failed to exec");
            assert_eq!(reply.exit_code, 0);
            Outcome::Exec(i, reply.output)
        }));

        let mut screenshot = bench.connect().await;
        handles.push(tokio::spawn(async move {
            let reply = screenshot
                .ask_screenshot(50)
                .await
                .expect("Failed to capture");
            Outcome::Screenshot(reply.image)
        }));

        let mut keys = bench.connect().await;
        handles.push(tokio::spawn(async move {
            keys.ask_keys(format!("text {}", i))
                .await
                .expect("Failed to type");
            Outcome::Keys
        }));
    }

    let state = bench.server.state();
    let mut peak = 0;
    while handles.iter().any(|h| !h.is_finished()) {
        peak = peak.max(state.in_flight());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let (mut execs, mut screenshots, mut keys) = (0, 0, 0);
    for handle in handles {
        match handle.await.expect("Task failed") {
            Outcome::Exec(i, output) => {
                assert_eq!(output, format!("{}\n", i));
                execs += 1;
            }
            Outcome::Screenshot(image) => {
                let image = BASE64.decode(image).expect("Image not base64");
                assert_eq!(image, b"fake-png");
                screenshots += 1;
            }
            Outcome::Keys => keys += 1,
        }
    }

    assert_eq!((execs, screenshots, keys), (limit * 2, limit * 2, limit * 2));
    assert!(peak <= limit, "Peak in-flight {} exceeded {}", peak, limit);
    assert_eq!(state.in_flight(), 0);
    assert!(
        std::fs::read_dir(&bench.scratch_dir)
            .expect("Failed to read scratch dir")
            .next()
            .is_none(),
        "Scratch files left behind"
    );
}
