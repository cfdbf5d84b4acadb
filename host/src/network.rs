//! Host session: drains the inbound queue, advances the authoritative
//! simulation, relays chat, and paces State broadcasts.

use crate::game::Simulation;
use crate::registry::ClientRegistry;
use log::{debug, info};
use shared::transport::Transport;
use shared::{
    ChatDisplay, InputAxis, Message, DEFAULT_BALL_SPEED, DEFAULT_BROADCAST_INTERVAL,
    DEFAULT_PADDLE_SPEED, DEFAULT_PORT,
};
use std::io;
use std::net::SocketAddr;
use std::time::Instant;
use tokio::io::AsyncBufReadExt;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Startup configuration, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct HostConfig {
    pub port: u16,
    pub ball_speed: f32,
    pub paddle_speed: f32,
    /// Minimum spacing between State broadcasts, in seconds.
    pub broadcast_interval: f32,
    /// Chat author name for locally typed messages.
    pub name: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            ball_speed: DEFAULT_BALL_SPEED,
            paddle_speed: DEFAULT_PADDLE_SPEED,
            broadcast_interval: DEFAULT_BROADCAST_INTERVAL,
            name: "Player 1".to_string(),
        }
    }
}

/// Fires once each time the configured interval of tick time has
/// accumulated, then starts over.
#[derive(Debug)]
pub struct BroadcastPacer {
    interval: f32,
    elapsed: f32,
}

impl BroadcastPacer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            elapsed: 0.0,
        }
    }

    pub fn ready(&mut self, dt: f32) -> bool {
        self.elapsed += dt;
        if self.elapsed >= self.interval {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}

/// The host session context: socket, inbound queue, registry, simulation
/// and collaborators, all owned by one value and mutated only from the
/// tick. The transport's receive task is the only other activity in the
/// process.
pub struct Host {
    transport: Transport,
    registry: ClientRegistry,
    sim: Simulation,
    pacer: BroadcastPacer,
    paddle_speed: f32,
    name: String,
    chat: Box<dyn ChatDisplay>,
    input: Box<dyn InputAxis>,
}

impl Host {
    /// Binds the UDP socket and assembles the session. A bind failure is
    /// fatal; there is nothing to retry at startup.
    pub async fn bind(
        config: HostConfig,
        chat: Box<dyn ChatDisplay>,
        input: Box<dyn InputAxis>,
    ) -> io::Result<Self> {
        let transport = Transport::bind(config.port).await?;
        info!("host listening on {}", transport.local_addr()?);

        Ok(Self {
            transport,
            registry: ClientRegistry::new(),
            sim: Simulation::new(config.ball_speed),
            pacer: BroadcastPacer::new(config.broadcast_interval),
            paddle_speed: config.paddle_speed,
            name: config.name,
            chat,
            input,
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.transport.local_addr()
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn sim(&self) -> &Simulation {
        &self.sim
    }

    /// One simulation tick: apply everything buffered in the queue, step
    /// the ball, move the host paddle, then broadcast when the pacer fires.
    pub fn tick(&mut self, dt: f32) {
        while let Some((text, addr)) = self.transport.try_recv() {
            self.dispatch(&text, addr);
        }

        self.sim.step(dt);

        let axis = self.input.axis();
        self.sim.apply_local_input(axis, self.paddle_speed, dt);

        if self.pacer.ready(dt) {
            self.broadcast_state();
        }
    }

    fn dispatch(&mut self, text: &str, addr: SocketAddr) {
        match Message::decode(text) {
            Some(Message::Input { slot, paddle_y }) => {
                // First Input from an unseen address claims the next free
                // slot. The named slot is driven regardless of whether the
                // sender got (or already holds) a slot.
                self.registry.register(addr);
                self.sim.apply_remote_input(slot, paddle_y);
            }
            Some(Message::Chat { author, text: body }) => {
                self.chat.append_line(&format!("{}: {}", author, body));
                // Relay the wire text verbatim to every registered client,
                // the sender included if it is registered.
                let targets: Vec<SocketAddr> = self.registry.addrs().collect();
                for dest in targets {
                    self.transport.send_text(text, dest);
                }
            }
            Some(Message::State { .. }) => {
                debug!("ignoring State message from {}", addr);
            }
            None => {
                debug!("dropping undecodable datagram from {}", addr);
            }
        }
    }

    fn broadcast_state(&self) {
        let (score_a, score_b) = self.sim.scoreboard.current();
        let state = Message::State {
            paddles_y: self.sim.paddles_y(),
            ball_x: self.sim.ball.x,
            ball_y: self.sim.ball.y,
            score_a,
            score_b,
        };

        for dest in self.registry.addrs() {
            self.transport.send(&state, dest);
        }
    }

    /// Displays locally authored chat immediately and fans it out to every
    /// registered client through the same send path the relay uses.
    pub fn send_chat(&mut self, text: &str) {
        self.chat.append_line(&format!("{}: {}", self.name, text));

        let message = Message::Chat {
            author: self.name.clone(),
            text: text.to_string(),
        };
        for dest in self.registry.addrs() {
            self.transport.send(&message, dest);
        }
    }

    /// Runs the fixed-rate tick loop until the process exits. Lines typed
    /// on stdin become host chat.
    pub async fn run(mut self, tick_rate: u32) -> io::Result<()> {
        let mut ticker = interval(Duration::from_secs_f32(1.0 / tick_rate as f32));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
        let mut stdin_open = true;
        let mut last_tick = Instant::now();

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Instant::now();
                    let dt = now.duration_since(last_tick).as_secs_f32();
                    last_tick = now;
                    self.tick(dt);
                }

                line = lines.next_line(), if stdin_open => {
                    match line {
                        Ok(Some(text)) if !text.trim().is_empty() => {
                            self.send_chat(text.trim());
                        }
                        Ok(Some(_)) => {}
                        Ok(None) | Err(_) => {
                            info!("stdin closed; chat input disabled");
                            stdin_open = false;
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::IdleAxis;
    use std::sync::{Arc, Mutex};
    use tokio::time::sleep;

    /// Chat display that records lines for assertions.
    struct RecordingChat(Arc<Mutex<Vec<String>>>);

    impl ChatDisplay for RecordingChat {
        fn append_line(&mut self, line: &str) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    async fn test_host() -> (Host, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let host = Host::bind(
            HostConfig {
                port: 0,
                ..HostConfig::default()
            },
            Box::new(RecordingChat(Arc::clone(&lines))),
            Box::new(IdleAxis),
        )
        .await
        .unwrap();
        (host, lines)
    }

    #[test]
    fn test_pacer_fires_once_per_interval() {
        let mut pacer = BroadcastPacer::new(0.03);

        // 0.01s increments: nothing before 0.03s cumulative, then one fire.
        assert!(!pacer.ready(0.01));
        assert!(!pacer.ready(0.01));
        assert!(pacer.ready(0.01));

        // Accumulation restarts after a fire.
        assert!(!pacer.ready(0.01));
        assert!(!pacer.ready(0.01));
        assert!(pacer.ready(0.01));
    }

    #[test]
    fn test_pacer_fires_immediately_on_large_dt() {
        let mut pacer = BroadcastPacer::new(0.03);
        assert!(pacer.ready(0.05));
        assert!(!pacer.ready(0.0));
    }

    #[tokio::test]
    async fn test_input_registers_sender_and_drives_slot() {
        let (mut host, _) = test_host().await;
        let addr: SocketAddr = "203.0.113.9:5000".parse().unwrap();

        host.dispatch(r#"{"type":"input","slot":2,"paddleY":1.5}"#, addr);

        assert_eq!(host.registry().slot_of(addr), Some(2));
        assert_approx_eq::assert_approx_eq!(host.sim().paddles[1].y, 1.5);
    }

    #[tokio::test]
    async fn test_unregistered_fourth_sender_still_drives_named_slot() {
        let (mut host, _) = test_host().await;
        for port in 5001..=5003 {
            let addr: SocketAddr = format!("203.0.113.9:{}", port).parse().unwrap();
            host.dispatch(r#"{"type":"input","slot":2,"paddleY":0.0}"#, addr);
        }

        let fourth: SocketAddr = "203.0.113.9:5004".parse().unwrap();
        host.dispatch(r#"{"type":"input","slot":3,"paddleY":-2.5}"#, fourth);

        assert_eq!(host.registry().slot_of(fourth), None);
        assert_approx_eq::assert_approx_eq!(host.sim().paddles[2].y, -2.5);
    }

    #[tokio::test]
    async fn test_malformed_datagram_changes_nothing() {
        let (mut host, chat) = test_host().await;
        let addr: SocketAddr = "203.0.113.9:5000".parse().unwrap();

        host.dispatch("garbage", addr);
        host.dispatch(r#"{"type":"input","slot":2}"#, addr);

        assert!(host.registry().is_empty());
        assert!(chat.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_is_displayed_and_relayed() {
        let (mut host, chat) = test_host().await;
        let host_addr = {
            let port = host.local_addr().unwrap().port();
            format!("127.0.0.1:{}", port)
        };

        // A registered client that will receive the relay.
        let mut client = Transport::bind_ephemeral().await.unwrap();
        client.send_text(
            r#"{"type":"input","slot":2,"paddleY":0.0}"#,
            host_addr.parse().unwrap(),
        );
        sleep(Duration::from_millis(50)).await;
        host.tick(0.0);
        assert_eq!(host.registry().len(), 1);

        let wire = r#"{"type":"chat","author":"Player 2","text":"gg"}"#;
        client.send_text(wire, host_addr.parse().unwrap());
        sleep(Duration::from_millis(50)).await;
        host.tick(0.0);

        assert_eq!(chat.lock().unwrap().as_slice(), ["Player 2: gg"]);

        // The relayed datagram is byte-identical to what was sent.
        let mut relayed = None;
        for _ in 0..50 {
            if let Some((text, _)) = client.try_recv() {
                relayed = Some(text);
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(relayed.as_deref(), Some(wire));
    }

    #[tokio::test]
    async fn test_local_chat_displayed_immediately() {
        let (mut host, chat) = test_host().await;
        host.send_chat("hello");
        assert_eq!(chat.lock().unwrap().as_slice(), ["Player 1: hello"]);
    }
}
