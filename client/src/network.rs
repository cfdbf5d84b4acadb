//! Client session: receives snapshots and chat, sends input every tick.

use crate::game::ClientGameState;
use log::{debug, info};
use shared::transport::Transport;
use shared::{ChatDisplay, InputAxis, Message, DEFAULT_PADDLE_SPEED};
use std::net::SocketAddr;
use std::time::Instant;
use tokio::io::AsyncBufReadExt;
use tokio::time::{interval, Duration, MissedTickBehavior};

/// Startup configuration, fixed for the process lifetime.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Host address as `ip:port`.
    pub server: String,
    /// This client's paddle slot, 2..=4.
    pub slot: u8,
    pub paddle_speed: f32,
    /// Chat author name for locally typed messages.
    pub name: String,
}

impl ClientConfig {
    pub fn new(server: String, slot: u8) -> Self {
        Self {
            server,
            slot,
            paddle_speed: DEFAULT_PADDLE_SPEED,
            name: format!("Player {}", slot),
        }
    }
}

/// The client session context: socket, inbound queue, game view and
/// collaborators, owned by one value and driven from the tick.
pub struct Client {
    transport: Transport,
    server_addr: SocketAddr,
    game: ClientGameState,
    paddle_speed: f32,
    name: String,
    chat: Box<dyn ChatDisplay>,
    input: Box<dyn InputAxis>,
}

impl Client {
    /// Parses the host address, binds an ephemeral socket and assembles
    /// the session. Failures here are fatal configuration errors.
    pub async fn connect(
        config: ClientConfig,
        chat: Box<dyn ChatDisplay>,
        input: Box<dyn InputAxis>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        if !(2..=4).contains(&config.slot) {
            return Err(format!("slot must be 2..=4, got {}", config.slot).into());
        }

        let server_addr: SocketAddr = config.server.parse()?;
        let transport = Transport::bind_ephemeral().await?;
        info!(
            "client bound on {}, syncing with host {}",
            transport.local_addr()?,
            server_addr
        );

        Ok(Self {
            transport,
            server_addr,
            game: ClientGameState::new(config.slot),
            paddle_speed: config.paddle_speed,
            name: config.name,
            chat,
            input,
        })
    }

    pub fn game(&self) -> &ClientGameState {
        &self.game
    }

    /// One local tick: apply everything buffered in the queue, move the
    /// local paddle, and send this tick's Input. Unlike the host's
    /// broadcast, input sends are not rate-limited.
    pub fn tick(&mut self, dt: f32) {
        while let Some((text, addr)) = self.transport.try_recv() {
            self.dispatch(&text, addr);
        }

        let axis = self.input.axis();
        let paddle_y = self.game.apply_local_input(axis, self.paddle_speed, dt);

        self.transport.send(
            &Message::Input {
                slot: self.game.slot(),
                paddle_y,
            },
            self.server_addr,
        );
    }

    fn dispatch(&mut self, text: &str, addr: SocketAddr) {
        match Message::decode(text) {
            Some(Message::State {
                paddles_y,
                ball_x,
                ball_y,
                score_a,
                score_b,
            }) => {
                self.game
                    .apply_server_state(paddles_y, ball_x, ball_y, score_a, score_b);
            }
            Some(Message::Chat { author, text }) => {
                self.chat.append_line(&format!("{}: {}", author, text));
            }
            Some(Message::Input { .. }) => {
                debug!("ignoring Input message from {}", addr);
            }
            None => {
                debug!("dropping undecodable datagram from {}", addr);
            }
        }
    }

    /// Forwards locally authored chat to the host. It is not displayed
    /// here; the host relays to every registered client, so it comes back
    /// on the echo if this client is registered.
    pub fn send_chat(&self, text: &str) {
        self.transport.send(
            &Message::Chat {
                author: self.name.clone(),
                text: text.to_string(),
            },
            self.server_addr,
        );
    }

    /// Runs the fixed-rate tick loop until the process exits. Lines typed
    /// on stdin become chat messages to the host.
    pub async fn run(mut self, tick_rate: u32) -> Result<(), Box<dyn std::error::Error>> {
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

    struct RecordingChat(Arc<Mutex<Vec<String>>>);

    impl ChatDisplay for RecordingChat {
        fn append_line(&mut self, line: &str) {
            self.0.lock().unwrap().push(line.to_string());
        }
    }

    async fn test_client(server: SocketAddr) -> (Client, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let client = Client::connect(
            ClientConfig::new(server.to_string(), 2),
            Box::new(RecordingChat(Arc::clone(&lines))),
            Box::new(IdleAxis),
        )
        .await
        .unwrap();
        (client, lines)
    }

    #[tokio::test]
    async fn test_slot_out_of_range_is_rejected() {
        for slot in [0, 1, 5] {
            let result = Client::connect(
                ClientConfig::new("127.0.0.1:7777".to_string(), slot),
                Box::new(shared::LogChatDisplay),
                Box::new(IdleAxis),
            )
            .await;
            assert!(result.is_err(), "slot {} should be rejected", slot);
        }
    }

    #[tokio::test]
    async fn test_state_overwrites_view() {
        let sink: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let (mut client, _) = test_client(sink).await;

        client.dispatch(
            r#"{"type":"state","paddlesY":[0.5,1.5,2.5,3.5],"ballX":-2.0,"ballY":1.0,"scoreA":3,"scoreB":1}"#,
            sink,
        );

        assert_eq!(client.game().paddles_y, [0.5, 1.5, 2.5, 3.5]);
        assert_eq!(client.game().scoreboard.current(), (3, 1));
    }

    #[tokio::test]
    async fn test_received_chat_is_displayed() {
        let sink: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let (mut client, chat) = test_client(sink).await;

        client.dispatch(r#"{"type":"chat","author":"Player 1","text":"hi"}"#, sink);

        assert_eq!(chat.lock().unwrap().as_slice(), ["Player 1: hi"]);
    }

    #[tokio::test]
    async fn test_malformed_state_is_not_partially_applied() {
        let sink: SocketAddr = "127.0.0.1:9".parse().unwrap();
        let (mut client, _) = test_client(sink).await;

        client.dispatch(
            r#"{"type":"state","paddlesY":[0.5,1.5,2.5,3.5],"ballX":-2.0}"#,
            sink,
        );

        assert_eq!(client.game().paddles_y, [0.0; 4]);
        assert_eq!(client.game().scoreboard.current(), (0, 0));
    }

    #[tokio::test]
    async fn test_tick_sends_input_every_tick() {
        let mut host_side = Transport::bind_ephemeral().await.unwrap();
        let host_port = host_side.local_addr().unwrap().port();
        let host_addr: SocketAddr = format!("127.0.0.1:{}", host_port).parse().unwrap();
        let (mut client, _) = test_client(host_addr).await;

        client.tick(0.016);
        client.tick(0.016);

        let mut received = Vec::new();
        for _ in 0..50 {
            while let Some((text, _)) = host_side.try_recv() {
                received.push(text);
            }
            if received.len() >= 2 {
                break;
            }
            sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(received.len(), 2);
        for text in received {
            match Message::decode(&text) {
                Some(Message::Input { slot, .. }) => assert_eq!(slot, 2),
                other => panic!("expected Input, got {:?}", other),
            }
        }
    }
}
