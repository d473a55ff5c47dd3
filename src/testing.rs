//! Wire fixtures for unit tests (server side of the protocol)

use tokio::io::{split, AsyncRead, AsyncWrite};

use crate::model::{
    Facility, FacilityType, Game, Move, Player, Vehicle, VehicleType, VehicleUpdate,
};
use crate::protocol::{decode_move, MessageType, Slot, WireReader, WireWriter};
use crate::registry::{write_vehicle_update, Record};

pub(crate) fn player(id: i64, score: i32) -> Player {
    Player {
        id,
        me: id == 7,
        strategy_crashed: false,
        score,
        remaining_action_cooldown_ticks: 0,
    }
}

pub(crate) fn vehicle(id: i64, owner: i64, vehicle_type: VehicleType, x: f64, y: f64) -> Vehicle {
    Vehicle {
        id,
        x,
        y,
        radius: 2.0,
        player_id: owner,
        durability: 100,
        max_durability: 100,
        max_speed: 0.4,
        vision_range: 60.0,
        squared_vision_range: 3600.0,
        ground_attack_range: 20.0,
        squared_ground_attack_range: 400.0,
        aerial_attack_range: 20.0,
        squared_aerial_attack_range: 400.0,
        ground_damage: 90,
        aerial_damage: 80,
        ground_defence: 60,
        aerial_defence: 40,
        attack_cooldown_ticks: 60,
        remaining_attack_cooldown_ticks: 0,
        vehicle_type,
        aerial: vehicle_type.is_aerial(),
        selected: false,
        groups: Vec::new(),
    }
}

pub(crate) fn facility(id: i64, facility_type: FacilityType, owner: i64) -> Facility {
    Facility {
        id,
        facility_type,
        owner_player_id: owner,
        left: 32.0,
        top: 0.0,
        capture_points: 0.0,
        vehicle_type: Some(VehicleType::Tank),
        production_progress: 0,
    }
}

pub(crate) fn write_player_slot<W>(writer: &mut WireWriter<W>, slot: Slot, player: &Player) {
    slot.write(writer);
    if let Slot::Present(_) = slot {
        player.write_body(writer);
    }
}

/// One entity slot as the server would send it
#[derive(Debug, Clone)]
pub(crate) enum SlotRecord<T> {
    Absent,
    Reference(i64),
    Full(T),
}

impl<T: Record> SlotRecord<T> {
    fn write<W>(&self, writer: &mut WireWriter<W>) {
        match self {
            SlotRecord::Absent => Slot::Absent.write(writer),
            SlotRecord::Reference(id) => Slot::Reference(*id).write(writer),
            SlotRecord::Full(record) => {
                Slot::Present(record.id()).write(writer);
                record.write_body(writer);
            }
        }
    }
}

fn write_batch<T: Record, W>(writer: &mut WireWriter<W>, slots: &[SlotRecord<T>]) {
    writer.write_i32(slots.len() as i32);
    for slot in slots {
        slot.write(writer);
    }
}

/// Rows of tile bytes for one grid layer
pub(crate) fn uniform_layer(rows: usize, columns: usize, value: u8) -> Vec<Vec<u8>> {
    vec![vec![value; columns]; rows]
}

fn write_layer<W>(writer: &mut WireWriter<W>, layer: &[Vec<u8>]) {
    writer.write_i32(layer.len() as i32);
    for row in layer {
        writer.write_i32(row.len() as i32);
        for tile in row {
            writer.write_u8(*tile);
        }
    }
}

/// A PlayerContext message for one tick. The default world is 64x64 (2x2 tiles).
#[derive(Debug, Clone)]
pub(crate) struct TickFrame {
    pub tick_index: i32,
    pub tick_count: i32,
    pub width: f64,
    pub height: f64,
    pub me: SlotRecord<Player>,
    pub players: Vec<SlotRecord<Player>>,
    pub new_vehicles: Vec<SlotRecord<Vehicle>>,
    pub updates: Vec<VehicleUpdate>,
    /// Terrain rows and weather rows
    pub grid: Option<(Vec<Vec<u8>>, Vec<Vec<u8>>)>,
    pub facilities: Vec<SlotRecord<Facility>>,
}

impl TickFrame {
    pub fn new(tick_index: i32) -> Self {
        Self {
            tick_index,
            tick_count: 100,
            width: 64.0,
            height: 64.0,
            me: SlotRecord::Absent,
            players: Vec::new(),
            new_vehicles: Vec::new(),
            updates: Vec::new(),
            grid: None,
            facilities: Vec::new(),
        }
    }

    /// Plain terrain and clear weather over the whole default world
    pub fn with_plain_grid(mut self) -> Self {
        self.grid = Some((uniform_layer(2, 2, 0), uniform_layer(2, 2, 0)));
        self
    }

    /// Body after the PlayerContext opcode
    pub fn write_body<W>(&self, writer: &mut WireWriter<W>) {
        writer.write_bool(true);
        self.me.write(writer);

        writer.write_bool(true);
        writer.write_i32(self.tick_index);
        writer.write_i32(self.tick_count);
        writer.write_f64(self.width);
        writer.write_f64(self.height);

        write_batch(writer, &self.players);
        write_batch(writer, &self.new_vehicles);

        writer.write_i32(self.updates.len() as i32);
        for update in &self.updates {
            write_vehicle_update(writer, Some(update));
        }

        if let Some((terrain, weather)) = &self.grid {
            write_layer(writer, terrain);
            write_layer(writer, weather);
        }

        write_batch(writer, &self.facilities);
    }

    pub fn write_message<W>(&self, writer: &mut WireWriter<W>) {
        writer.write_u8(MessageType::PlayerContext.type_id());
        self.write_body(writer);
    }

    pub async fn body_bytes(&self) -> Vec<u8> {
        let mut writer = WireWriter::new(Vec::new());
        self.write_body(&mut writer);
        writer.flush().await.unwrap();
        writer.into_inner()
    }
}

pub(crate) fn small_game() -> Game {
    Game {
        random_seed: 42,
        tick_count: 100,
        world_width: 64.0,
        world_height: 64.0,
        max_unit_group: 100,
        terrain_weather_map_column_count: 2,
        terrain_weather_map_row_count: 2,
        ..Game::default()
    }
}

/// TeamSize and GameContext as the server sends them after the handshake
pub(crate) fn write_session_start<W>(writer: &mut WireWriter<W>, team_size: i32, game: Option<&Game>) {
    writer.write_u8(MessageType::TeamSize.type_id());
    writer.write_i32(team_size);

    writer.write_u8(MessageType::GameContext.type_id());
    writer.write_bool(game.is_some());
    if let Some(game) = game {
        game.encode(writer);
    }
}

/// What the scripted server received from the client
pub(crate) struct ServerLog {
    pub token: Option<String>,
    pub version: i32,
    pub moves: Vec<Move>,
}

/// Plays the server side: handshake, each tick followed by one Move, then GameOver
pub(crate) async fn scripted_server<S>(stream: S, ticks: Vec<TickFrame>) -> ServerLog
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (read, write) = split(stream);
    let mut reader = WireReader::new(read);
    let mut writer = WireWriter::new(write);

    assert_eq!(
        reader.read_u8().await.unwrap(),
        MessageType::AuthenticationToken.type_id()
    );
    let token = reader.read_string().await.unwrap();
    assert_eq!(
        reader.read_u8().await.unwrap(),
        MessageType::ProtocolVersion.type_id()
    );
    let version = reader.read_i32().await.unwrap();

    write_session_start(&mut writer, 2, Some(&small_game()));
    writer.flush().await.unwrap();

    let mut moves = Vec::new();
    for tick in ticks {
        tick.write_message(&mut writer);
        writer.flush().await.unwrap();
        moves.push(decode_move(&mut reader).await.unwrap().unwrap());
    }

    writer.write_u8(MessageType::GameOver.type_id());
    writer.flush().await.unwrap();

    ServerLog {
        token,
        version,
        moves,
    }
}
