//! Move record encoding
//!
//! Layout: opcode, presence flag (always true), action byte, group i32,
//! left/top/right/bottom f64, x/y f64, angle f64, max speed f64,
//! max angular speed f64, vehicle type byte, facility id i64.

use tokio::io::AsyncRead;

use super::codec::{CodecError, CodecResult};
use super::message::{vehicle_type_from_wire, vehicle_type_to_wire};
use super::{MessageType, WireReader, WireWriter};
use crate::model::{ActionType, Move};

/// Serialize one Move message into the writer's buffer. The caller flushes.
///
/// Inaction is sent as `ActionType::None`; there is no empty Move on the wire.
/// The value is not cleared afterwards.
pub fn encode_move<W>(writer: &mut WireWriter<W>, action: &Move) {
    writer.write_u8(MessageType::Move.type_id());
    writer.write_bool(true);

    writer.write_u8(action.action.type_id());
    writer.write_i32(action.group);
    writer.write_f64(action.left);
    writer.write_f64(action.top);
    writer.write_f64(action.right);
    writer.write_f64(action.bottom);
    writer.write_f64(action.x);
    writer.write_f64(action.y);
    writer.write_f64(action.angle);
    writer.write_f64(action.max_speed);
    writer.write_f64(action.max_angular_speed);
    writer.write_u8(vehicle_type_to_wire(action.vehicle_type));
    writer.write_i64(action.facility_id);
}

/// Read one Move message, opcode included. A cleared presence flag yields `None`.
pub async fn decode_move<R>(reader: &mut WireReader<R>) -> CodecResult<Option<Move>>
where
    R: AsyncRead + Unpin,
{
    let opcode = reader.read_u8().await?;
    if opcode != MessageType::Move.type_id() {
        return Err(CodecError::ProtocolViolation {
            expected: "Move",
            opcode,
        });
    }

    if !reader.read_bool().await? {
        return Ok(None);
    }

    let action_byte = reader.read_u8().await?;
    let action = ActionType::try_from(action_byte).map_err(|value| CodecError::InvalidValue {
        field: "action type",
        value,
    })?;

    let mut decoded = Move {
        action,
        group: reader.read_i32().await?,
        left: reader.read_f64().await?,
        top: reader.read_f64().await?,
        right: reader.read_f64().await?,
        bottom: reader.read_f64().await?,
        x: reader.read_f64().await?,
        y: reader.read_f64().await?,
        angle: reader.read_f64().await?,
        max_speed: reader.read_f64().await?,
        max_angular_speed: reader.read_f64().await?,
        ..Move::default()
    };

    let type_byte = reader.read_u8().await?;
    decoded.vehicle_type =
        vehicle_type_from_wire(type_byte).map_err(|value| CodecError::InvalidValue {
            field: "vehicle type",
            value,
        })?;
    decoded.facility_id = reader.read_i64().await?;

    Ok(Some(decoded))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VehicleType;

    async fn encoded(action: &Move) -> Vec<u8> {
        let mut writer = WireWriter::new(Vec::new());
        encode_move(&mut writer, action);
        writer.flush().await.unwrap();
        writer.into_inner()
    }

    #[tokio::test]
    async fn test_move_roundtrip_all_fields() {
        let original = Move {
            action: ActionType::Rotate,
            group: 3,
            left: 1.5,
            top: 2.5,
            right: 300.0,
            bottom: 400.25,
            x: -12.0,
            y: 64.0,
            angle: std::f64::consts::FRAC_PI_4,
            max_speed: 0.3,
            max_angular_speed: 0.01,
            vehicle_type: Some(VehicleType::Helicopter),
            facility_id: 77,
        };

        let bytes = encoded(&original).await;
        let decoded = decode_move(&mut WireReader::new(bytes.as_slice()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(decoded, original);
    }

    #[tokio::test]
    async fn test_default_move_layout() {
        let bytes = encoded(&Move::default()).await;

        // opcode + presence + action + group + 9 doubles + type + facility id
        assert_eq!(bytes.len(), 1 + 1 + 1 + 4 + 9 * 8 + 1 + 8);
        assert_eq!(bytes[0], 7);
        assert_eq!(bytes[1], 1);
        assert_eq!(bytes[2], 0);
        assert_eq!(bytes[bytes.len() - 9], 255);
        assert!(bytes[bytes.len() - 8..].iter().all(|b| *b == 0));
    }

    #[tokio::test]
    async fn test_encoder_does_not_clear() {
        let action = Move::move_by(10.0, -5.0, 0.0);
        let _ = encoded(&action).await;
        assert_eq!(action.x, 10.0);
        assert!(!action.is_none());
    }

    #[tokio::test]
    async fn test_decode_rejects_other_opcode() {
        let bytes = [MessageType::GameOver.type_id()];
        let result = decode_move(&mut WireReader::new(&bytes[..])).await;
        assert!(matches!(
            result,
            Err(CodecError::ProtocolViolation { opcode: 1, .. })
        ));
    }
}
