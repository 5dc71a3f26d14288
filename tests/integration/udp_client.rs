use statsd_queue::{increment, timing, Client, ConfigProvider, IniConfig, Metric, ShutdownHooks};
use std::collections::HashSet;
use std::net::UdpSocket;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

// ============================================================================
// Helper functions to reduce test code duplication
// ============================================================================

/// Binds a receiver on an ephemeral port and returns it with the port number
fn bind_receiver() -> (UdpSocket, u16) {
    let socket = UdpSocket::bind("127.0.0.1:0").expect("couldn't bind to address");
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set_read_timeout failed");
    let port = socket.local_addr().unwrap().port();
    (socket, port)
}

/// Collects datagrams until `expected_count` arrived or the read times out
fn spawn_udp_receiver(socket: UdpSocket, expected_count: usize) -> JoinHandle<Vec<String>> {
    std::thread::spawn(move || {
        let mut buf = [0; 10000];
        let mut received = Vec::<String>::new();
        while received.len() < expected_count {
            let Ok((number_of_bytes, _)) = socket.recv_from(&mut buf) else {
                break;
            };
            let text = String::from_utf8(buf[..number_of_bytes].to_vec()).unwrap();
            received.push(text);
        }
        received
    })
}

fn create_client(port: u16, extra: &[(&str, &str)]) -> Client {
    let mut config = IniConfig::new()
        .with_value("statsd", "host", "127.0.0.1")
        .with_value("statsd", "port", port.to_string());
    for (key, value) in extra {
        config = config.with_value("statsd", key, *value);
    }
    Client::new(Arc::new(config))
}

// ============================================================================
// UDP round trips
// ============================================================================

#[test]
fn test_immediate_send_reaches_aggregator() {
    let (socket, port) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);
    let client = create_client(port, &[]);

    client.send_immediate(
        [("pageviews", Metric::Count(1)), ("render_time", Metric::Timing(320))],
        1.0,
    );

    let received = receiver.join().unwrap();
    assert_eq!(vec!["pageviews:1|c\nrender_time:320|ms".to_string()], received);
}

#[test]
fn test_deferred_send_waits_for_flush() {
    let (socket, port) = bind_receiver();
    let client = create_client(port, &[]);

    client.send_deferred([("hits", Metric::Count(1))], 1.0);
    client.send_deferred([("hits", Metric::Count(9))], 1.0);
    client.send_deferred([("active_users", Metric::gauge(12))], 1.0);

    socket
        .set_read_timeout(Some(Duration::from_millis(100)))
        .unwrap();
    let mut buf = [0; 1500];
    assert!(socket.recv_from(&mut buf).is_err(), "nothing sent before flush");

    client.flush();
    socket
        .set_read_timeout(Some(Duration::from_secs(2)))
        .unwrap();
    let (size, _) = socket.recv_from(&mut buf).unwrap();
    assert_eq!(
        "hits:9|c\nactive_users:12|g",
        std::str::from_utf8(&buf[..size]).unwrap()
    );
}

#[test]
fn test_prefix_and_packet_size_from_config() {
    let (socket, port) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 3);
    let client = create_client(port, &[("prefix", "myapp."), ("max_packet_size", "24")]);

    client.send_flush(
        [
            ("a", Metric::Count(1)),
            ("b", Metric::Count(2)),
            ("c", Metric::Count(3)),
            ("d", Metric::Count(4)),
            ("e", Metric::Count(5)),
        ],
        1.0,
    );

    // lines are 11 bytes, a third one does not fit in 24
    let received = receiver.join().unwrap();
    let expected: HashSet<String> = [
        "myapp.a:1|c\nmyapp.b:2|c",
        "myapp.c:3|c\nmyapp.d:4|c",
        "myapp.e:5|c",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(expected, received.into_iter().collect::<HashSet<_>>());
}

#[test]
fn test_ini_file_configuration() {
    let (socket, port) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);

    let path = std::env::temp_dir().join(format!("statsd-queue-{port}.ini"));
    std::fs::write(
        &path,
        format!("[statsd]\nhost = 127.0.0.1\nport = {port}\nsend_mode = immediate\n"),
    )
    .unwrap();
    let config = IniConfig::from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    let client = Client::new(Arc::new(config));
    assert!(client.config().is_enabled("statsd"));
    increment!(client, "logins");

    assert_eq!(vec!["logins:1|c".to_string()], receiver.join().unwrap());
}

#[test]
fn test_shutdown_hooks_flush_remaining() {
    let (socket, port) = bind_receiver();
    let receiver = spawn_udp_receiver(socket, 1);
    let client = Arc::new(create_client(port, &[]));

    {
        let hooks = ShutdownHooks::new();
        assert!(client.enable_auto_flush_on_shutdown(&hooks));
        timing!(client, "request.duration" => 87);
        assert_eq!(1, client.pending_len());
        // dropping the registry runs its hooks
    }

    assert_eq!(0, client.pending_len());
    assert_eq!(vec!["request.duration:87|ms".to_string()], receiver.join().unwrap());
}

#[test]
fn test_unreachable_host_is_silent() {
    let config = IniConfig::new()
        .with_value("statsd", "host", "definitely-not-a-host.invalid")
        .with_value("statsd", "port", "8125");
    let client = Client::new(Arc::new(config));

    client.send_immediate([("a", Metric::Count(1))], 1.0);
    client.send_flush([("b", Metric::Count(1))], 1.0);
    assert_eq!(0, client.pending_len());
}
