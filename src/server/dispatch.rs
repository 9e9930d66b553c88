use serde_json::Value;

use crate::pools::PoolEntry;
use crate::providers::UpstreamClient;
use crate::server::chat_request::ChatProxyRequest;

/// Terminal state of one failover pass over a pool.
#[derive(Debug)]
pub enum DispatchOutcome {
    /// Upstream body of the first successful attempt, returned verbatim.
    Success(Value),
    /// Every entry was skipped or failed. `last_error` is the detail of the
    /// last recorded failure; `None` when no usable credential existed.
    Exhausted { last_error: Option<String> },
}

/// Try pool entries strictly in declared order, one upstream call in flight
/// at a time, stopping at the first success. Entries without a usable
/// credential are skipped and leave no failure record.
pub async fn run_failover(
    upstream: &UpstreamClient,
    entries: &[PoolEntry],
    request: &ChatProxyRequest,
) -> DispatchOutcome {
    let mut last_error: Option<String> = None;

    for entry in entries {
        let Some(credential) = entry.credential() else {
            tracing::debug!(slot = entry.slot, "skipping entry without credential");
            continue;
        };

        match upstream
            .chat_completions(
                credential,
                entry.system_prompt,
                &request.messages,
                request.temperature,
                request.max_tokens,
            )
            .await
        {
            Ok(body) => {
                tracing::debug!(slot = entry.slot, "upstream attempt succeeded");
                return DispatchOutcome::Success(body);
            }
            Err(err) => {
                tracing::warn!(slot = entry.slot, "upstream attempt failed: {}", err);
                last_error = Some(err.detail().to_string());
            }
        }
    }

    DispatchOutcome::Exhausted { last_error }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credentials, UpstreamConfig};
    use crate::pools::PoolTable;
    use crate::providers::ChatMessage;

    fn request() -> ChatProxyRequest {
        ChatProxyRequest {
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: Value::String("hi".to_string()),
            }],
            model: None,
            temperature: 0.7,
            max_tokens: 1024,
        }
    }

    fn upstream_for(server: &mockito::ServerGuard) -> UpstreamClient {
        UpstreamClient::new(&UpstreamConfig {
            base_url: server.url(),
            model: "test-model".to_string(),
            request_timeout_secs: 5,
        })
        .unwrap()
    }

    fn table(main: Option<&str>, backup: Option<&str>) -> PoolTable {
        PoolTable::from_credentials(&Credentials {
            main: main.map(str::to_string),
            backup: backup.map(str::to_string),
            research: None,
            study: None,
        })
    }

    #[tokio::test]
    async fn first_success_stops_the_pass() {
        let mut server = mockito::Server::new_async().await;
        let first = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key-a")
            .with_status(200)
            .with_body(r#"{"id":"from-a"}"#)
            .expect(1)
            .create_async()
            .await;
        let second = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key-b")
            .expect(0)
            .create_async()
            .await;

        let pools = table(Some("key-a"), Some("key-b"));
        let outcome =
            run_failover(&upstream_for(&server), pools.entries_for("general"), &request()).await;

        first.assert_async().await;
        second.assert_async().await;
        match outcome {
            DispatchOutcome::Success(body) => assert_eq!(body["id"], "from-a"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn missing_credential_is_skipped_without_a_call() {
        let mut server = mockito::Server::new_async().await;
        let backup_only = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key-b")
            .with_status(200)
            .with_body(r#"{"id":"from-b"}"#)
            .expect(1)
            .create_async()
            .await;

        let pools = table(None, Some("key-b"));
        let outcome =
            run_failover(&upstream_for(&server), pools.entries_for("general"), &request()).await;

        backup_only.assert_async().await;
        assert!(matches!(outcome, DispatchOutcome::Success(_)));
    }

    #[tokio::test]
    async fn timed_out_attempt_is_a_transport_fault_and_the_pass_continues() {
        use std::io::Write;

        let mut server = mockito::Server::new_async().await;
        let stalled = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key-a")
            .with_status(200)
            .with_chunked_body(|writer| {
                // Stall well past the client timeout before sending the body.
                std::thread::sleep(std::time::Duration::from_millis(1500));
                writer.write_all(br#"{"id":"too-late"}"#)
            })
            .expect(1)
            .create_async()
            .await;
        let healthy = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key-b")
            .with_status(200)
            .with_body(r#"{"id":"from-b"}"#)
            .expect(1)
            .create_async()
            .await;

        let upstream = UpstreamClient::new(&UpstreamConfig {
            base_url: server.url(),
            model: "test-model".to_string(),
            request_timeout_secs: 1,
        })
        .unwrap();

        let pools = table(Some("key-a"), Some("key-b"));
        let outcome = run_failover(&upstream, pools.entries_for("general"), &request()).await;

        stalled.assert_async().await;
        healthy.assert_async().await;
        match outcome {
            DispatchOutcome::Success(body) => assert_eq!(body["id"], "from-b"),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn all_failures_keep_the_last_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key-a")
            .with_status(500)
            .with_body("first failure")
            .expect(1)
            .create_async()
            .await;
        server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key-b")
            .with_status(429)
            .with_body("second failure")
            .expect(1)
            .create_async()
            .await;

        let pools = table(Some("key-a"), Some("key-b"));
        let outcome =
            run_failover(&upstream_for(&server), pools.entries_for("general"), &request()).await;

        match outcome {
            DispatchOutcome::Exhausted { last_error } => {
                assert_eq!(last_error.as_deref(), Some("second failure"));
            }
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn no_usable_credential_means_no_call_and_no_detail() {
        let mut server = mockito::Server::new_async().await;
        let never = server
            .mock("POST", "/chat/completions")
            .expect(0)
            .create_async()
            .await;

        let pools = table(None, None);
        let outcome =
            run_failover(&upstream_for(&server), pools.entries_for("general"), &request()).await;

        never.assert_async().await;
        match outcome {
            DispatchOutcome::Exhausted { last_error } => assert_eq!(last_error, None),
            other => panic!("expected exhaustion, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn research_mode_with_only_backup_credential_uses_backup() {
        let mut server = mockito::Server::new_async().await;
        let backup = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer key-backup")
            .with_status(200)
            .with_body(r#"{"id":"research-reply"}"#)
            .expect(1)
            .create_async()
            .await;

        let pools = PoolTable::from_credentials(&Credentials {
            main: None,
            backup: Some("key-backup".to_string()),
            research: None,
            study: None,
        });
        let outcome = run_failover(
            &upstream_for(&server),
            pools.entries_for("research"),
            &request(),
        )
        .await;

        backup.assert_async().await;
        match outcome {
            DispatchOutcome::Success(body) => assert_eq!(body["id"], "research-reply"),
            other => panic!("expected success, got {:?}", other),
        }
    }
}
