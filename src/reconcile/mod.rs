//! World reconciler - Applies one tick of server records to the local mirror
//!
//! Per tick the server sends, in this exact order:
//! 1. players (discriminated slots)
//! 2. vehicles, "new" batch (discriminated slots, full records)
//! 3. vehicles, "update" batch (existing ids only)
//! 4. the terrain and weather grid, only until a grid has been loaded
//! 5. facilities (discriminated slots)
//!
//! Decoding out of order, or expecting the grid on every tick, silently
//! desynchronizes the stream.

use tokio::io::AsyncRead;

use crate::model::{
    tiles_along, Game, Land, LandGrid, Player, TerrainType, WeatherType, World,
};
use crate::protocol::{CodecError, CodecResult, WireReader, MAX_PAYLOAD_SIZE};
use crate::registry::{read_batch, read_slot, read_vehicle_update, SlotOutcome};
use crate::strategy::Snapshot;

/// Tiles reserved up front; larger grids grow as bytes actually arrive
const PREALLOCATED_TILES: usize = 64 * 1024;

/// Counts of what a single tick changed
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TickReport {
    /// The PlayerContext carried a payload
    pub context_present: bool,
    /// The world record was present
    pub world_present: bool,
    pub players: usize,
    pub vehicles_created: usize,
    pub vehicles_updated: usize,
    pub facilities: usize,
    /// The static grid was decoded on this tick
    pub grid_loaded: bool,
}

/// Owns the reconciled world for one session
#[derive(Debug, Default)]
pub struct Reconciler {
    world: World,
    /// Id of the player sent in the PlayerContext header
    me: Option<i64>,
    ticks_applied: u64,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// The player this client controls
    pub fn me(&self) -> Option<&Player> {
        self.me.and_then(|id| self.world.player(id))
    }

    /// Number of PlayerContext messages applied so far
    pub fn ticks_applied(&self) -> u64 {
        self.ticks_applied
    }

    /// View handed to the strategy for the current tick
    pub fn snapshot<'a>(&'a self, game: Option<&'a Game>) -> Snapshot<'a> {
        Snapshot {
            me: self.me(),
            world: &self.world,
            game,
        }
    }

    /// Forget everything; required before reusing the reconciler on a new connection
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Apply the body of a PlayerContext message (the opcode is already consumed)
    pub async fn apply_player_context<R>(
        &mut self,
        reader: &mut WireReader<R>,
    ) -> CodecResult<TickReport>
    where
        R: AsyncRead + Unpin + Send,
    {
        let mut report = TickReport::default();
        self.ticks_applied += 1;

        if !reader.read_bool().await? {
            return Ok(report);
        }
        report.context_present = true;

        match read_slot(reader, &mut self.world.players).await? {
            SlotOutcome::Absent => {}
            SlotOutcome::Referenced(id) | SlotOutcome::Created(id) | SlotOutcome::Updated(id) => {
                self.me = Some(id);
            }
        }

        if reader.read_bool().await? {
            report.world_present = true;
            self.apply_world(reader, &mut report).await?;
        }

        tracing::debug!(
            "Tick {}: {} players, {} new vehicles, {} updated vehicles, {} facilities{}",
            self.world.tick_index,
            report.players,
            report.vehicles_created,
            report.vehicles_updated,
            report.facilities,
            if report.grid_loaded { ", grid loaded" } else { "" }
        );

        Ok(report)
    }

    async fn apply_world<R>(
        &mut self,
        reader: &mut WireReader<R>,
        report: &mut TickReport,
    ) -> CodecResult<()>
    where
        R: AsyncRead + Unpin + Send,
    {
        let tick_index = reader.read_i32().await?;
        let tick_count = reader.read_i32().await?;
        let width = reader.read_f64().await?;
        let height = reader.read_f64().await?;

        let world = &mut self.world;
        world.tick_index = tick_index;
        world.tick_count = tick_count;
        world.width = width;
        world.height = height;

        report.players = read_batch(reader, &mut world.players).await?.len();

        world.new_vehicles.clear();
        for outcome in read_batch(reader, &mut world.vehicles).await? {
            if let SlotOutcome::Created(id) = outcome {
                world.new_vehicles.push(id);
            }
        }
        report.vehicles_created = world.new_vehicles.len();

        world.updated_vehicles.clear();
        let updates = reader.read_i32().await?.max(0);
        for _ in 0..updates {
            let Some(update) = read_vehicle_update(reader).await? else {
                continue;
            };
            let id = update.id;
            world.vehicles.update(id, |vehicle| vehicle.apply(update))?;
            world.updated_vehicles.push(id);
        }
        report.vehicles_updated = world.updated_vehicles.len();

        if !world.land.is_populated() {
            let grid = read_land(reader, width, height).await?;
            report.grid_loaded = world.land.commit(grid);
            tracing::info!(
                "Loaded {}x{} terrain/weather grid",
                world.land.columns(),
                world.land.rows()
            );
        }

        report.facilities = read_batch(reader, &mut world.facilities).await?.len();
        Ok(())
    }
}

/// Read one grid layer: outer count of rows, each with its own column count
async fn read_layer<R>(reader: &mut WireReader<R>, expected: usize) -> CodecResult<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut tiles = Vec::with_capacity(expected.min(PREALLOCATED_TILES));

    let rows = reader.read_i32().await?;
    for _ in 0..rows.max(0) {
        let columns = reader.read_i32().await?;
        for _ in 0..columns.max(0) {
            if tiles.len() == expected {
                // Stop before running past the declared world size
                return Err(CodecError::GridSizeMismatch {
                    expected,
                    actual: expected + 1,
                });
            }
            tiles.push(reader.read_u8().await?);
        }
    }

    if tiles.len() != expected {
        return Err(CodecError::GridSizeMismatch {
            expected,
            actual: tiles.len(),
        });
    }
    Ok(tiles)
}

/// Decode the one-time grid block into a fresh grid (terrain layer, then weather)
async fn read_land<R>(reader: &mut WireReader<R>, width: f64, height: f64) -> CodecResult<LandGrid>
where
    R: AsyncRead + Unpin,
{
    let columns = tiles_along(width);
    let rows = tiles_along(height);
    // One byte per tile and layer, so no valid grid exceeds the payload cap
    let expected = columns
        .checked_mul(rows)
        .filter(|tiles| *tiles <= MAX_PAYLOAD_SIZE)
        .ok_or(CodecError::GridSizeMismatch {
            expected: columns.saturating_mul(rows),
            actual: 0,
        })?;

    let terrain = read_layer(reader, expected).await?;
    let weather = read_layer(reader, expected).await?;

    let tiles = terrain
        .into_iter()
        .zip(weather)
        .map(|(terrain, weather)| {
            let terrain = TerrainType::try_from(terrain).map_err(|value| {
                CodecError::InvalidValue {
                    field: "terrain type",
                    value,
                }
            })?;
            let weather = WeatherType::try_from(weather).map_err(|value| {
                CodecError::InvalidValue {
                    field: "weather type",
                    value,
                }
            })?;
            Ok(Land::from_parts(terrain, weather))
        })
        .collect::<CodecResult<Vec<_>>>()?;

    Ok(LandGrid::new(columns, rows, tiles))
}
