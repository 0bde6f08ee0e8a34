//! # Integration Tests
//!
//! Cross-crate and end-to-end tests.
//!
//! Covers:
//! - The shipped sample configuration
//! - UDP datagrams landing in per-host files
//! - Ordering and failure policies across the whole chain

#[cfg(test)]
mod contract_tests {
    use config_loader::{ConfigFormat, ConfigLoader};
    use contracts::{BackpressurePolicy, RecordFormat, WriteFailurePolicy};

    #[test]
    fn test_sample_config_is_valid() {
        let config = ConfigLoader::load_from_str(
            include_str!("../../../config.yml"),
            ConfigFormat::Yaml,
        )
        .unwrap();

        assert_eq!(config.server.port, 514);
        assert_eq!(config.log_folder, "/var/log/%HOSTNAME%/");
        assert_eq!(config.queue.policy, BackpressurePolicy::Block);
        assert_eq!(config.output.record_format, RecordFormat::Json);
        assert_eq!(config.output.on_write_error, WriteFailurePolicy::Exit);
    }

    #[test]
    fn test_config_survives_yaml_round_trip() {
        let config = ConfigLoader::load_from_str(
            include_str!("../../../config.yml"),
            ConfigFormat::Yaml,
        )
        .unwrap();
        let yaml = ConfigLoader::to_yaml(&config).unwrap();
        let reloaded = ConfigLoader::load_from_str(&yaml, ConfigFormat::Yaml).unwrap();
        assert_eq!(reloaded.server.bind_address(), config.server.bind_address());
        assert_eq!(reloaded.log_folder, config.log_folder);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::net::SocketAddr;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;
    use std::time::Duration;

    use contracts::{
        BackpressurePolicy, OutputConfig, QueueConfig, RecordFormat, ServerConfig,
        WriteFailurePolicy,
    };
    use dispatcher::{
        DispatchError, DispatchMetrics, DispatchSummary, Dispatcher, HostFileSink, PathError,
    };
    use ingestion::{message_queue, IngestionMetrics, UdpReceiver};
    use tempfile::{tempdir, TempDir};
    use tokio::net::UdpSocket;
    use tokio::task::JoinHandle;

    /// Receiver + dispatcher wired the way the binary wires them
    struct Harness {
        root: TempDir,
        addr: SocketAddr,
        ingestion: Arc<IngestionMetrics>,
        dispatch: Arc<DispatchMetrics>,
        receiver: JoinHandle<ingestion::Result<()>>,
        dispatcher: JoinHandle<Result<DispatchSummary, DispatchError>>,
    }

    impl Harness {
        async fn start(output: OutputConfig) -> Self {
            let root = tempdir().unwrap();
            let template = format!("{}/%HOSTNAME%/", root.path().display());

            let server = ServerConfig {
                port: 0,
                address: "127.0.0.1".to_string(),
                max_datagram_size: 65535,
            };
            let queue = QueueConfig {
                capacity: 64,
                policy: BackpressurePolicy::Block,
            };

            let ingestion = Arc::new(IngestionMetrics::new());
            let (tx, rx) = message_queue(&queue, Arc::clone(&ingestion));
            let receiver = UdpReceiver::bind(&server, tx, Arc::clone(&ingestion))
                .await
                .unwrap();
            let addr = receiver.local_addr();

            let sink = HostFileSink::from_config(&template, &output);
            let dispatcher = Dispatcher::new(sink, rx, output.on_write_error);
            let dispatch = dispatcher.metrics();

            Self {
                root,
                addr,
                ingestion,
                dispatch,
                receiver: tokio::spawn(receiver.run()),
                dispatcher: dispatcher.spawn(),
            }
        }

        async fn send(&self, datagrams: &[&[u8]]) {
            let client = UdpSocket::bind("127.0.0.1:0").await.unwrap();
            for datagram in datagrams {
                client.send_to(datagram, self.addr).await.unwrap();
                // Loopback keeps order, the pause keeps the socket buffer small
                tokio::time::sleep(Duration::from_millis(2)).await;
            }
        }

        /// Wait until `count` writes were attempted
        async fn settle(&self, count: u64) {
            for _ in 0..250 {
                let snap = self.dispatch.snapshot();
                if snap.write_count + snap.failure_count >= count {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(20)).await;
            }
            panic!("timed out waiting for {count} writes");
        }

        fn log_file(&self, hostname: &str) -> PathBuf {
            self.root.path().join(hostname).join("syslog.log")
        }

        fn lines(&self, hostname: &str) -> Vec<serde_json::Value> {
            read_lines(&self.log_file(hostname))
                .iter()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }

        fn stop(self) {
            self.receiver.abort();
            self.dispatcher.abort();
        }
    }

    fn read_lines(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }

    #[tokio::test]
    async fn test_e2e_legacy_message() {
        let harness = Harness::start(OutputConfig::default()).await;
        harness
            .send(&[b"<34>Oct 11 22:14:15 mymachine su: 'su root' failed for lonvick on /dev/pts/8"])
            .await;
        harness.settle(1).await;

        let lines = harness.lines("mymachine");
        assert_eq!(lines.len(), 1);
        let record = &lines[0];
        assert_eq!(record["hostname"], "mymachine");
        assert_eq!(record["severity"], 2);
        assert_eq!(record["facility"], 4);
        assert_eq!(record["tag"], "su");
        assert_eq!(record["dialect"], "rfc3164");
        assert_eq!(
            record["content"],
            "'su root' failed for lonvick on /dev/pts/8"
        );
        assert!(record["client"].as_str().unwrap().starts_with("127.0.0.1:"));

        harness.stop();
    }

    #[tokio::test]
    async fn test_e2e_structured_message() {
        let harness = Harness::start(OutputConfig::default()).await;
        harness
            .send(&[b"<165>1 2003-10-11T22:14:15.003Z mymachine.example.com evntslog - ID47 - BOM'su root' failed"])
            .await;
        harness.settle(1).await;

        let lines = harness.lines("mymachine.example.com");
        assert_eq!(lines.len(), 1);
        let record = &lines[0];
        assert_eq!(record["facility"], 20);
        assert_eq!(record["severity"], 5);
        assert_eq!(record["version"], 1);
        assert_eq!(record["app_name"], "evntslog");
        assert_eq!(record["msg_id"], "ID47");
        assert_eq!(record["timestamp"], "2003-10-11T22:14:15.003Z");
        assert_eq!(record["message"], "BOM'su root' failed");

        harness.stop();
    }

    #[tokio::test]
    async fn test_e2e_same_host_appends_in_order() {
        let harness = Harness::start(OutputConfig::default()).await;
        harness
            .send(&[
                b"<13>Feb  5 17:32:18 10.0.0.99 app: first",
                b"<13>Feb  5 17:32:19 10.0.0.99 app: second",
            ])
            .await;
        harness.settle(2).await;

        let lines = harness.lines("10.0.0.99");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["content"], "first");
        assert_eq!(lines[1]["content"], "second");

        harness.stop();
    }

    #[tokio::test]
    async fn test_e2e_hosts_are_separated_and_garbage_skipped() {
        let harness = Harness::start(OutputConfig::default()).await;
        harness
            .send(&[
                b"<13>Feb  5 17:32:18 alpha app: a1",
                b"hello world",
                b"<13>Feb  5 17:32:18 beta app: b1",
                b"",
                b"<13>Feb  5 17:32:19 alpha app: a2",
            ])
            .await;
        harness.settle(3).await;

        let alpha: Vec<_> = harness
            .lines("alpha")
            .iter()
            .map(|r| r["content"].as_str().unwrap().to_string())
            .collect();
        let beta: Vec<_> = harness
            .lines("beta")
            .iter()
            .map(|r| r["content"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(alpha, vec!["a1", "a2"]);
        assert_eq!(beta, vec!["b1"]);

        let snap = harness.ingestion.snapshot();
        assert_eq!(snap.datagrams_received, 5);
        assert_eq!(snap.parse_errors, 2);
        assert_eq!(snap.messages_queued, 3);

        harness.stop();
    }

    #[tokio::test]
    async fn test_e2e_text_records() {
        let output = OutputConfig {
            record_format: RecordFormat::Text,
            on_write_error: WriteFailurePolicy::Exit,
        };
        let harness = Harness::start(output).await;
        harness.send(&[b"<13>Feb  5 17:32:18 host app: hi"]).await;
        harness.settle(1).await;

        let lines = read_lines(&harness.log_file("host"));
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("map[client:127.0.0.1:"));
        assert!(lines[0].ends_with("content:hi dialect:rfc3164 facility:1 hostname:host priority:13 severity:5 tag:app timestamp:Feb  5 17:32:18]"));

        harness.stop();
    }

    #[tokio::test]
    async fn test_e2e_unroutable_hostname_is_dropped_under_exit_policy() {
        let harness = Harness::start(OutputConfig::default()).await;
        harness
            .send(&[
                b"<13>Feb  5 17:32:18 a/b app: escape",
                b"<14>1 - .. app - - - escape",
                b"<13>Feb  5 17:32:18 safe app: kept",
            ])
            .await;
        harness.settle(1).await;

        assert_eq!(harness.lines("safe")[0]["content"], "kept");
        assert!(!harness.dispatcher.is_finished());

        let ingestion = harness.ingestion.snapshot();
        assert_eq!(ingestion.parse_errors, 2);
        assert_eq!(ingestion.messages_queued, 1);
        assert_eq!(harness.dispatch.snapshot().failure_count, 0);

        harness.stop();
    }

    #[tokio::test]
    async fn test_e2e_write_failure_under_continue_policy() {
        let output = OutputConfig {
            record_format: RecordFormat::Json,
            on_write_error: WriteFailurePolicy::Continue,
        };
        let harness = Harness::start(output).await;
        // A regular file where the host directory should go
        std::fs::write(harness.root.path().join("blocked"), b"").unwrap();
        harness
            .send(&[
                b"<13>Feb  5 17:32:18 blocked app: lost",
                b"<13>Feb  5 17:32:18 safe app: kept",
            ])
            .await;
        harness.settle(2).await;

        let snap = harness.dispatch.snapshot();
        assert_eq!(snap.failure_count, 1);
        assert_eq!(snap.write_count, 1);
        assert_eq!(harness.lines("safe")[0]["content"], "kept");

        harness.stop();
    }

    #[tokio::test]
    async fn test_e2e_exit_policy_stops_dispatcher() {
        let harness = Harness::start(OutputConfig::default()).await;
        std::fs::write(harness.root.path().join("blocked"), b"").unwrap();
        harness
            .send(&[b"<13>Feb  5 17:32:18 blocked app: lost"])
            .await;

        let Harness {
            dispatcher,
            receiver,
            root: _root,
            ..
        } = harness;
        let result = tokio::time::timeout(Duration::from_secs(5), dispatcher)
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(
            result,
            Err(DispatchError::Path(PathError::CreateDir { .. }))
        ));
        receiver.abort();
    }
}
