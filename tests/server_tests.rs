//! Server Tests
//!
//! End-to-end tests over real TCP sockets: fragmentation, framing-error
//! recovery, sequential clients, and shutdown.

use std::io::Write;
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use strand::network::Server;
use strand::protocol::{encode_batch, Command};
use strand::render::RenderBridge;
use strand::{Color, Config, Result};

/// Records rendered frames behind a shared handle the test keeps.
#[derive(Clone, Default)]
struct SharedBridge {
    frames: Arc<Mutex<Vec<Vec<Color>>>>,
}

impl SharedBridge {
    fn frames(&self) -> Vec<Vec<Color>> {
        self.frames.lock().unwrap().clone()
    }

    fn wait_for_frames(&self, count: usize) -> Vec<Vec<Color>> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            let frames = self.frames();
            if frames.len() >= count {
                return frames;
            }
            assert!(Instant::now() < deadline, "timed out waiting for {count} renders");
            thread::sleep(Duration::from_millis(10));
        }
    }
}

impl RenderBridge for SharedBridge {
    fn render(&mut self, colors: &[Color]) -> Result<()> {
        self.frames.lock().unwrap().push(colors.to_vec());
        Ok(())
    }
}

struct TestServer {
    addr: SocketAddr,
    bridge: SharedBridge,
    shutdown: Arc<AtomicBool>,
    handle: thread::JoinHandle<Result<()>>,
}

impl TestServer {
    fn start(led_count: usize) -> Self {
        let config = Config::builder()
            .listen_addr("127.0.0.1:0")
            .led_count(led_count)
            .read_timeout_ms(50)
            .build();

        let bridge = SharedBridge::default();
        let mut server = Server::bind(config, bridge.clone()).unwrap();
        let addr = server.local_addr().unwrap();
        let shutdown = server.shutdown_handle();
        let handle = thread::spawn(move || server.run());

        Self { addr, bridge, shutdown, handle }
    }

    fn connect(&self) -> TcpStream {
        TcpStream::connect(self.addr).unwrap()
    }

    fn stop(self) {
        self.shutdown.store(true, Ordering::SeqCst);
        self.handle.join().unwrap().unwrap();
    }
}

// =============================================================================
// End-to-end Scenarios
// =============================================================================

#[test]
fn test_fill_then_show_renders_whole_strip() {
    let server = TestServer::start(189);

    let mut client = server.connect();
    client
        .write_all(&encode_batch(&[
            Command::Clear,
            Command::FillAll { red: 255, green: 0, blue: 0 },
        ]))
        .unwrap();
    client.write_all(&encode_batch(&[Command::Show])).unwrap();

    let frames = server.bridge.wait_for_frames(1);
    let expected = Color::from_rgb(255, 0, 0);
    assert_eq!(frames[0].len(), 189);
    assert!(frames[0].iter().all(|&c| c == expected));

    drop(client);
    server.stop();
}

#[test]
fn test_out_of_range_set_renders_nothing_and_survives() {
    let server = TestServer::start(189);

    let mut client = server.connect();
    client
        .write_all(&encode_batch(&[Command::SetPixel {
            index: 200,
            red: 1,
            green: 2,
            blue: 3,
        }]))
        .unwrap();

    thread::sleep(Duration::from_millis(100));
    assert!(server.bridge.frames().is_empty());

    // The connection is still healthy; a Show renders an untouched strip.
    client.write_all(&encode_batch(&[Command::Show])).unwrap();
    let frames = server.bridge.wait_for_frames(1);
    assert!(frames[0].iter().all(|&c| c == Color::OFF));

    drop(client);
    server.stop();
}

// =============================================================================
// Fragmentation Tests
// =============================================================================

#[test]
fn test_batch_split_across_tcp_segments() {
    let server = TestServer::start(16);

    let encoded = encode_batch(&[
        Command::FillAll { red: 0, green: 255, blue: 0 },
        Command::Show,
    ]);

    // Deliver the count in one segment and the commands in another; the
    // carry-over buffer must stitch them back together.
    let mut client = server.connect();
    client.write_all(&encoded[..2]).unwrap();
    client.flush().unwrap();
    thread::sleep(Duration::from_millis(100));
    client.write_all(&encoded[2..]).unwrap();

    let frames = server.bridge.wait_for_frames(1);
    let expected = Color::from_rgb(0, 255, 0);
    assert!(frames[0].iter().all(|&c| c == expected));

    drop(client);
    server.stop();
}

// =============================================================================
// Error Recovery Tests
// =============================================================================

#[test]
fn test_unknown_tag_does_not_kill_the_connection() {
    let server = TestServer::start(8);

    let mut client = server.connect();
    // count=1, unknown tag 0xAB
    client.write_all(&[0x01, 0x00, 0xAB]).unwrap();
    thread::sleep(Duration::from_millis(100));

    // Same connection, next read: a well-formed batch decodes normally.
    client
        .write_all(&encode_batch(&[
            Command::FillAll { red: 1, green: 2, blue: 3 },
            Command::Show,
        ]))
        .unwrap();

    let frames = server.bridge.wait_for_frames(1);
    let expected = Color::from_rgb(1, 2, 3);
    assert!(frames[0].iter().all(|&c| c == expected));

    drop(client);
    server.stop();
}

// =============================================================================
// Connection Lifecycle Tests
// =============================================================================

#[test]
fn test_clients_are_served_sequentially() {
    let server = TestServer::start(4);

    {
        let mut first = server.connect();
        first
            .write_all(&encode_batch(&[
                Command::FillAll { red: 10, green: 0, blue: 0 },
                Command::Show,
            ]))
            .unwrap();
        server.bridge.wait_for_frames(1);
    } // first client disconnects; the accept loop moves on

    {
        let mut second = server.connect();
        second.write_all(&encode_batch(&[Command::Show])).unwrap();
        let frames = server.bridge.wait_for_frames(2);

        // Strip state persists across connections.
        let expected = Color::from_rgb(10, 0, 0);
        assert!(frames[1].iter().all(|&c| c == expected));
    }

    server.stop();
}

#[test]
fn test_shutdown_stops_an_idle_server() {
    let server = TestServer::start(4);
    server.stop();
}
