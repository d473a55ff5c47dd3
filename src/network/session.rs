//! One game connection
//!
//! A session owns the codec and a fresh reconciler. It runs strictly
//! sequentially: read a tick, let the strategy decide, write exactly one
//! Move, repeat until the server says the game is over.

use tokio::io::{AsyncRead, AsyncWrite};

use crate::model::{Game, Move};
use crate::protocol::{Codec, CodecResult, CodecStats, Incoming, PROTOCOL_VERSION};
use crate::reconcile::Reconciler;
use crate::strategy::Strategy;

/// State of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Transport open, handshake not yet sent
    Connected,
    /// Handshake complete, ticks flowing
    Playing,
    /// GameOver received
    Finished,
}

/// What a finished session did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// PlayerContext messages answered with a Move
    pub ticks_played: u64,
    pub team_size: i32,
    /// Tick index of the last world record seen
    pub last_tick_index: i32,
    pub bytes_sent: u64,
    pub bytes_received: u64,
}

/// Drives the protocol over one reader/writer pair
pub struct Session<R, W> {
    codec: Codec<R, W>,
    reconciler: Reconciler,
    token: String,
    state: SessionState,
    team_size: i32,
    game: Option<Game>,
    ticks_played: u64,
}

impl<R, W> Session<R, W> {
    pub fn new(reader: R, writer: W, token: impl Into<String>) -> Self {
        Self {
            codec: Codec::new(reader, writer),
            reconciler: Reconciler::new(),
            token: token.into(),
            state: SessionState::Connected,
            team_size: 0,
            game: None,
            ticks_played: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Team size announced by the server (0 before the handshake)
    pub fn team_size(&self) -> i32 {
        self.team_size
    }

    pub fn game(&self) -> Option<&Game> {
        self.game.as_ref()
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn stats(&self) -> &CodecStats {
        self.codec.stats()
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            ticks_played: self.ticks_played,
            team_size: self.team_size,
            last_tick_index: self.reconciler.world().tick_index,
            bytes_sent: self.codec.bytes_sent(),
            bytes_received: self.codec.bytes_received(),
        }
    }
}

impl<R, W> Session<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin,
{
    /// Token, protocol version, then team size and game context from the server
    pub async fn handshake(&mut self) -> CodecResult<()> {
        self.codec.write_token(&self.token).await?;
        self.codec.write_protocol_version(PROTOCOL_VERSION).await?;

        self.team_size = self.codec.read_team_size().await?;
        self.game = self.codec.read_game_context().await?;
        self.state = SessionState::Playing;

        match &self.game {
            Some(game) => tracing::info!(
                "Game started: team size {}, {} ticks, world {}x{}, seed {}",
                self.team_size,
                game.tick_count,
                game.world_width,
                game.world_height,
                game.random_seed
            ),
            None => tracing::info!(
                "Game started: team size {}, no game context",
                self.team_size
            ),
        }
        Ok(())
    }

    /// Run the tick loop until GameOver. Performs the handshake first if needed.
    pub async fn play<S>(&mut self, strategy: &mut S) -> CodecResult<SessionSummary>
    where
        S: Strategy + ?Sized,
    {
        if self.state == SessionState::Connected {
            self.handshake().await?;
        }
        if self.state == SessionState::Playing {
            strategy.on_game_start(self.game.as_ref(), self.team_size);
        }

        while self.state == SessionState::Playing {
            match self.codec.next_message().await? {
                Incoming::GameOver => {
                    self.state = SessionState::Finished;
                }
                Incoming::PlayerContext => {
                    self.reconciler
                        .apply_player_context(self.codec.reader_mut())
                        .await?;

                    let mut action = Move::default();
                    let snapshot = self.reconciler.snapshot(self.game.as_ref());
                    strategy.act(&snapshot, &mut action);

                    self.codec.write_move(&action).await?;
                    self.ticks_played += 1;
                }
            }
        }

        let summary = self.summary();
        tracing::info!(
            "Game over after {} ticks (last tick {})",
            summary.ticks_played,
            summary.last_tick_index
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionType, VehicleType};
    use crate::protocol::{CodecError, MessageType, WireWriter};
    use crate::strategy::{IdleStrategy, Snapshot};
    use crate::testing::{
        player, scripted_server, vehicle, write_session_start, SlotRecord, TickFrame,
    };
    use tokio::io::{duplex, split, DuplexStream, ReadHalf, WriteHalf};

    type ClientSession = Session<ReadHalf<DuplexStream>, WriteHalf<DuplexStream>>;

    fn session_pair(token: &str) -> (ClientSession, DuplexStream) {
        let (client, server) = duplex(64 * 1024);
        let (read, write) = split(client);
        (Session::new(read, write, token), server)
    }

    fn opening_tick() -> TickFrame {
        let mut tick = TickFrame::new(0).with_plain_grid();
        tick.me = SlotRecord::Full(player(7, 0));
        tick.players = vec![SlotRecord::Full(player(7, 0))];
        tick.new_vehicles = vec![SlotRecord::Full(vehicle(
            1,
            7,
            VehicleType::Tank,
            16.0,
            16.0,
        ))];
        tick
    }

    /// Selects everything on the first tick, then records what it saw
    #[derive(Default)]
    struct Recorder {
        team_size: i32,
        seen_ticks: Vec<i32>,
        vehicle_counts: Vec<usize>,
    }

    impl Strategy for Recorder {
        fn on_game_start(&mut self, _game: Option<&Game>, team_size: i32) {
            self.team_size = team_size;
        }

        fn act(&mut self, snapshot: &Snapshot<'_>, action: &mut Move) {
            self.seen_ticks.push(snapshot.tick_index());
            self.vehicle_counts.push(snapshot.world.vehicles().len());
            if snapshot.tick_index() == 0 {
                *action = Move::clear_and_select(0.0, 0.0, 64.0, 64.0);
            }
        }
    }

    #[tokio::test]
    async fn test_full_session() {
        let (mut session, server) = session_pair("secret-token");
        let server = tokio::spawn(scripted_server(
            server,
            vec![opening_tick(), TickFrame::new(1), TickFrame::new(2)],
        ));

        let mut strategy = Recorder::default();
        let summary = session.play(&mut strategy).await.unwrap();
        let log = server.await.unwrap();

        assert_eq!(log.token.as_deref(), Some("secret-token"));
        assert_eq!(log.version, PROTOCOL_VERSION);
        assert_eq!(log.moves.len(), 3);
        assert_eq!(log.moves[0].action, ActionType::ClearAndSelect);
        assert_eq!(log.moves[0].right, 64.0);
        assert_eq!(log.moves[1], Move::default());

        assert_eq!(strategy.team_size, 2);
        assert_eq!(strategy.seen_ticks, vec![0, 1, 2]);
        assert_eq!(strategy.vehicle_counts, vec![1, 1, 1]);

        assert_eq!(summary.ticks_played, 3);
        assert_eq!(summary.team_size, 2);
        assert_eq!(summary.last_tick_index, 2);
        assert_eq!(session.state(), SessionState::Finished);
        assert_eq!(session.game().map(|g| g.random_seed), Some(42));
    }

    #[tokio::test]
    async fn test_immediate_game_over() {
        let (mut session, server) = session_pair("t");
        let server = tokio::spawn(scripted_server(server, Vec::new()));

        let summary = session.play(&mut IdleStrategy).await.unwrap();
        assert!(server.await.unwrap().moves.is_empty());
        assert_eq!(summary.ticks_played, 0);
    }

    #[tokio::test]
    async fn test_unexpected_opcode_ends_session() {
        let (mut session, server) = session_pair("t");
        let server = tokio::spawn(async move {
            let (_read, write) = split(server);
            let mut writer = WireWriter::new(write);
            write_session_start(&mut writer, 1, None);
            writer.write_u8(MessageType::TeamSize.type_id());
            writer.flush().await.unwrap();
            // Hold the stream open until the client gives up
            writer
        });

        let err = session.play(&mut IdleStrategy).await.unwrap_err();
        assert!(matches!(
            err,
            CodecError::ProtocolViolation {
                opcode: 3,
                ..
            }
        ));
        assert!(session.game().is_none());
        drop(server.await.unwrap());
    }

    #[tokio::test]
    async fn test_server_hangup_is_transient() {
        let (mut session, server) = session_pair("t");
        drop(server);

        // Writing the token to a closed peer fails with a broken pipe
        let err = session.play(&mut IdleStrategy).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(session.state(), SessionState::Connected);
    }
}
