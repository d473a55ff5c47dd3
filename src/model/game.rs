//! Per-match game constants
//!
//! The field list below is the wire order of the GameContext record. Decode
//! and encode are generated from the same list, so the two cannot drift apart.

use tokio::io::AsyncRead;

use crate::protocol::{FramingResult, WireReader, WireWriter};

macro_rules! game_record {
    ($($(#[$meta:meta])* $field:ident: $ty:ident,)*) => {
        /// Constants fixed for the whole match. Received once, never mutated.
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct Game {
            $($(#[$meta])* pub $field: $ty,)*
        }

        impl Game {
            /// Decode the record body (after the presence flag)
            pub async fn decode<R>(reader: &mut WireReader<R>) -> FramingResult<Self>
            where
                R: AsyncRead + Unpin,
            {
                // Struct expression fields are evaluated in the order written
                Ok(Self {
                    $($field: game_record!(@read reader, $ty),)*
                })
            }

            /// Encode the record body (without the presence flag)
            pub fn encode<W>(&self, writer: &mut WireWriter<W>) {
                $(game_record!(@write writer, self.$field, $ty);)*
            }
        }
    };

    (@read $reader:ident, i64) => { $reader.read_i64().await? };
    (@read $reader:ident, i32) => { $reader.read_i32().await? };
    (@read $reader:ident, f64) => { $reader.read_f64().await? };
    (@read $reader:ident, bool) => { $reader.read_bool().await? };

    (@write $writer:ident, $value:expr, i64) => { $writer.write_i64($value) };
    (@write $writer:ident, $value:expr, i32) => { $writer.write_i32($value) };
    (@write $writer:ident, $value:expr, f64) => { $writer.write_f64($value) };
    (@write $writer:ident, $value:expr, bool) => { $writer.write_bool($value) };
}

game_record! {
    random_seed: i64,
    tick_count: i32,
    world_width: f64,
    world_height: f64,
    fog_of_war_enabled: bool,
    victory_score: i32,
    facility_capture_score: i32,
    vehicle_elimination_score: i32,
    /// Window (in ticks) over which the action limit is counted
    action_detection_interval: i32,
    base_action_count: i32,
    additional_action_count_per_control_center: i32,
    max_unit_group: i32,
    terrain_weather_map_column_count: i32,
    terrain_weather_map_row_count: i32,

    plain_terrain_vision_factor: f64,
    plain_terrain_stealth_factor: f64,
    plain_terrain_speed_factor: f64,
    swamp_terrain_vision_factor: f64,
    swamp_terrain_stealth_factor: f64,
    swamp_terrain_speed_factor: f64,
    forest_terrain_vision_factor: f64,
    forest_terrain_stealth_factor: f64,
    forest_terrain_speed_factor: f64,

    clear_weather_vision_factor: f64,
    clear_weather_stealth_factor: f64,
    clear_weather_speed_factor: f64,
    cloud_weather_vision_factor: f64,
    cloud_weather_stealth_factor: f64,
    cloud_weather_speed_factor: f64,
    rain_weather_vision_factor: f64,
    rain_weather_stealth_factor: f64,
    rain_weather_speed_factor: f64,

    vehicle_radius: f64,

    tank_durability: i32,
    tank_speed: f64,
    tank_vision_range: f64,
    tank_ground_attack_range: f64,
    tank_aerial_attack_range: f64,
    tank_ground_damage: i32,
    tank_aerial_damage: i32,
    tank_ground_defence: i32,
    tank_aerial_defence: i32,
    tank_attack_cooldown_ticks: i32,
    tank_production_cost: i32,

    ifv_durability: i32,
    ifv_speed: f64,
    ifv_vision_range: f64,
    ifv_ground_attack_range: f64,
    ifv_aerial_attack_range: f64,
    ifv_ground_damage: i32,
    ifv_aerial_damage: i32,
    ifv_ground_defence: i32,
    ifv_aerial_defence: i32,
    ifv_attack_cooldown_ticks: i32,
    ifv_production_cost: i32,

    arrv_durability: i32,
    arrv_speed: f64,
    arrv_vision_range: f64,
    arrv_ground_defence: i32,
    arrv_aerial_defence: i32,
    arrv_production_cost: i32,
    arrv_repair_range: f64,
    arrv_repair_speed: f64,

    helicopter_durability: i32,
    helicopter_speed: f64,
    helicopter_vision_range: f64,
    helicopter_ground_attack_range: f64,
    helicopter_aerial_attack_range: f64,
    helicopter_ground_damage: i32,
    helicopter_aerial_damage: i32,
    helicopter_ground_defence: i32,
    helicopter_aerial_defence: i32,
    helicopter_attack_cooldown_ticks: i32,
    helicopter_production_cost: i32,

    fighter_durability: i32,
    fighter_speed: f64,
    fighter_vision_range: f64,
    fighter_ground_attack_range: f64,
    fighter_aerial_attack_range: f64,
    fighter_ground_damage: i32,
    fighter_aerial_damage: i32,
    fighter_ground_defence: i32,
    fighter_aerial_defence: i32,
    fighter_attack_cooldown_ticks: i32,
    fighter_production_cost: i32,

    max_facility_capture_points: f64,
    facility_capture_points_per_vehicle_per_tick: f64,
    facility_width: f64,
    facility_height: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_decode_leading_fields() {
        let mut writer = WireWriter::new(Vec::new());
        writer.write_i64(42);
        writer.write_i32(100);
        writer.write_f64(1024.0);
        writer.write_f64(1024.0);
        writer.write_bool(true);
        // Remaining fields stay zeroed
        let mut tail = WireWriter::new(Vec::new());
        Game::default().encode(&mut tail);
        let head_len = 8 + 4 + 8 + 8 + 1;
        writer.flush().await.unwrap();
        tail.flush().await.unwrap();

        let mut bytes = writer.into_inner();
        bytes.extend_from_slice(&tail.into_inner()[head_len..]);

        let mut reader = WireReader::new(bytes.as_slice());
        let game = Game::decode(&mut reader).await.unwrap();
        assert_eq!(game.random_seed, 42);
        assert_eq!(game.tick_count, 100);
        assert_eq!(game.world_width, 1024.0);
        assert_eq!(game.world_height, 1024.0);
        assert!(game.fog_of_war_enabled);
        assert_eq!(reader.buffered(), 0);
    }

    #[tokio::test]
    async fn test_encode_matches_decode_order() {
        let game = Game {
            random_seed: -7,
            max_unit_group: 100,
            rain_weather_speed_factor: 0.8,
            arrv_repair_speed: 0.05,
            fighter_production_cost: 60,
            facility_height: 64.0,
            ..Game::default()
        };

        let mut writer = WireWriter::new(Vec::new());
        game.encode(&mut writer);
        writer.flush().await.unwrap();
        let bytes = writer.into_inner();

        let decoded = Game::decode(&mut WireReader::new(bytes.as_slice())).await.unwrap();
        assert_eq!(decoded, game);
    }

    #[tokio::test]
    async fn test_truncated_game_fails() {
        let mut writer = WireWriter::new(Vec::new());
        Game::default().encode(&mut writer);
        writer.flush().await.unwrap();
        let bytes = writer.into_inner();

        let result = Game::decode(&mut WireReader::new(&bytes[..bytes.len() - 1])).await;
        assert!(result.is_err());
    }
}
