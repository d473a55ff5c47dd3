//! Wire records for registry entities
//!
//! A record body follows the slot header (discriminator + id). Bodies are
//! decoded into a fresh value; the caller commits it to the registry.

use async_trait::async_trait;
use tokio::io::AsyncRead;

use super::Entity;
use crate::model::{
    EntityKind, Facility, FacilityType, Player, Vehicle, VehicleType, VehicleUpdate,
};
use crate::protocol::{
    vehicle_type_from_wire, vehicle_type_to_wire, CodecError, CodecResult, WireReader, WireWriter,
};

/// An entity with a full wire record
#[async_trait]
pub trait Record: Entity + Sized + Send {
    /// Decode the body that follows the slot header
    async fn read_body<R>(id: i64, reader: &mut WireReader<R>) -> CodecResult<Self>
    where
        R: AsyncRead + Unpin + Send;

    /// Encode the body (the slot header is written separately)
    fn write_body<W>(&self, writer: &mut WireWriter<W>);
}

fn invalid(field: &'static str) -> impl FnOnce(u8) -> CodecError {
    move |value| CodecError::InvalidValue { field, value }
}

impl Entity for Player {
    const KIND: EntityKind = EntityKind::Player;

    fn id(&self) -> i64 {
        self.id
    }
}

#[async_trait]
impl Record for Player {
    async fn read_body<R>(id: i64, reader: &mut WireReader<R>) -> CodecResult<Self>
    where
        R: AsyncRead + Unpin + Send,
    {
        Ok(Player {
            id,
            me: reader.read_bool().await?,
            strategy_crashed: reader.read_bool().await?,
            score: reader.read_i32().await?,
            remaining_action_cooldown_ticks: reader.read_i32().await?,
        })
    }

    fn write_body<W>(&self, writer: &mut WireWriter<W>) {
        writer.write_bool(self.me);
        writer.write_bool(self.strategy_crashed);
        writer.write_i32(self.score);
        writer.write_i32(self.remaining_action_cooldown_ticks);
    }
}

impl Entity for Vehicle {
    const KIND: EntityKind = EntityKind::Vehicle;

    fn id(&self) -> i64 {
        self.id
    }
}

#[async_trait]
impl Record for Vehicle {
    async fn read_body<R>(id: i64, reader: &mut WireReader<R>) -> CodecResult<Self>
    where
        R: AsyncRead + Unpin + Send,
    {
        let x = reader.read_f64().await?;
        let y = reader.read_f64().await?;
        let radius = reader.read_f64().await?;
        let player_id = reader.read_i64().await?;
        let durability = reader.read_i32().await?;
        let max_durability = reader.read_i32().await?;
        let max_speed = reader.read_f64().await?;
        let vision_range = reader.read_f64().await?;
        let squared_vision_range = reader.read_f64().await?;
        let ground_attack_range = reader.read_f64().await?;
        let squared_ground_attack_range = reader.read_f64().await?;
        let aerial_attack_range = reader.read_f64().await?;
        let squared_aerial_attack_range = reader.read_f64().await?;
        let ground_damage = reader.read_i32().await?;
        let aerial_damage = reader.read_i32().await?;
        let ground_defence = reader.read_i32().await?;
        let aerial_defence = reader.read_i32().await?;
        let attack_cooldown_ticks = reader.read_i32().await?;
        let remaining_attack_cooldown_ticks = reader.read_i32().await?;
        let vehicle_type =
            VehicleType::try_from(reader.read_u8().await?).map_err(invalid("vehicle type"))?;

        Ok(Vehicle {
            id,
            x,
            y,
            radius,
            player_id,
            durability,
            max_durability,
            max_speed,
            vision_range,
            squared_vision_range,
            ground_attack_range,
            squared_ground_attack_range,
            aerial_attack_range,
            squared_aerial_attack_range,
            ground_damage,
            aerial_damage,
            ground_defence,
            aerial_defence,
            attack_cooldown_ticks,
            remaining_attack_cooldown_ticks,
            vehicle_type,
            aerial: reader.read_bool().await?,
            selected: reader.read_bool().await?,
            groups: reader.read_i32_array().await?,
        })
    }

    fn write_body<W>(&self, writer: &mut WireWriter<W>) {
        writer.write_f64(self.x);
        writer.write_f64(self.y);
        writer.write_f64(self.radius);
        writer.write_i64(self.player_id);
        writer.write_i32(self.durability);
        writer.write_i32(self.max_durability);
        writer.write_f64(self.max_speed);
        writer.write_f64(self.vision_range);
        writer.write_f64(self.squared_vision_range);
        writer.write_f64(self.ground_attack_range);
        writer.write_f64(self.squared_ground_attack_range);
        writer.write_f64(self.aerial_attack_range);
        writer.write_f64(self.squared_aerial_attack_range);
        writer.write_i32(self.ground_damage);
        writer.write_i32(self.aerial_damage);
        writer.write_i32(self.ground_defence);
        writer.write_i32(self.aerial_defence);
        writer.write_i32(self.attack_cooldown_ticks);
        writer.write_i32(self.remaining_attack_cooldown_ticks);
        writer.write_u8(self.vehicle_type.type_id());
        writer.write_bool(self.aerial);
        writer.write_bool(self.selected);
        writer.write_i32_array(&self.groups);
    }
}

impl Entity for Facility {
    const KIND: EntityKind = EntityKind::Facility;

    fn id(&self) -> i64 {
        self.id
    }
}

#[async_trait]
impl Record for Facility {
    async fn read_body<R>(id: i64, reader: &mut WireReader<R>) -> CodecResult<Self>
    where
        R: AsyncRead + Unpin + Send,
    {
        let facility_type =
            FacilityType::try_from(reader.read_u8().await?).map_err(invalid("facility type"))?;
        let owner_player_id = reader.read_i64().await?;
        let left = reader.read_f64().await?;
        let top = reader.read_f64().await?;
        let capture_points = reader.read_f64().await?;
        let vehicle_type =
            vehicle_type_from_wire(reader.read_u8().await?).map_err(invalid("vehicle type"))?;

        Ok(Facility {
            id,
            facility_type,
            owner_player_id,
            left,
            top,
            capture_points,
            vehicle_type,
            production_progress: reader.read_i32().await?,
        })
    }

    fn write_body<W>(&self, writer: &mut WireWriter<W>) {
        writer.write_u8(self.facility_type.type_id());
        writer.write_i64(self.owner_player_id);
        writer.write_f64(self.left);
        writer.write_f64(self.top);
        writer.write_f64(self.capture_points);
        writer.write_u8(vehicle_type_to_wire(self.vehicle_type));
        writer.write_i32(self.production_progress);
    }
}

/// Read one vehicle update record: presence byte, then id and the mutable fields
pub async fn read_vehicle_update<R>(reader: &mut WireReader<R>) -> CodecResult<Option<VehicleUpdate>>
where
    R: AsyncRead + Unpin,
{
    if !reader.read_bool().await? {
        return Ok(None);
    }

    Ok(Some(VehicleUpdate {
        id: reader.read_i64().await?,
        x: reader.read_f64().await?,
        y: reader.read_f64().await?,
        durability: reader.read_i32().await?,
        remaining_attack_cooldown_ticks: reader.read_i32().await?,
        selected: reader.read_bool().await?,
        groups: reader.read_i32_array().await?,
    }))
}

pub fn write_vehicle_update<W>(writer: &mut WireWriter<W>, update: Option<&VehicleUpdate>) {
    let Some(update) = update else {
        writer.write_bool(false);
        return;
    };

    writer.write_bool(true);
    writer.write_i64(update.id);
    writer.write_f64(update.x);
    writer.write_f64(update.y);
    writer.write_i32(update.durability);
    writer.write_i32(update.remaining_attack_cooldown_ticks);
    writer.write_bool(update.selected);
    writer.write_i32_array(&update.groups);
}
