pub mod json;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::warn;

use crate::domain::{DataAccessError, Entity};

impl From<std::io::Error> for DataAccessError {
    fn from(value: std::io::Error) -> Self {
        DataAccessError::ReadError(Box::new(value))
    }
}

impl From<serde_json::Error> for DataAccessError {
    fn from(value: serde_json::Error) -> Self {
        DataAccessError::DecodeError(Box::new(value))
    }
}

/// APIの応答と同じ形の文書からエンティティを取り出す
///
/// `{"rooms": [...]}` のようにエンティティ名の複数形をキーに持つ文書と、
/// 配列だけの文書の両方を受け付ける。壊れたレコードは警告を出して読み飛ばす。
fn decode_records<E>(bytes: &[u8]) -> Result<Vec<E>, DataAccessError>
where
    E: Entity + DeserializeOwned,
{
    let key = collection_key::<E>();
    let items = match serde_json::from_slice::<Value>(bytes)? {
        Value::Array(items) => items,
        Value::Object(mut root) => match root.remove(&key) {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(DataAccessError::DecodeError(
                    format!("document has no `{}` array", key).into(),
                ))
            }
        },
        _ => {
            return Err(DataAccessError::DecodeError(
                "document must be an object or an array".into(),
            ))
        }
    };
    Ok(items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<E>(item) {
            Ok(entity) => Some(entity),
            Err(error) => {
                warn!(entity = E::ENTITY_NAME, index, "レコードを読み飛ばしました: {}", error);
                None
            }
        })
        .collect())
}

fn collection_key<E: Entity>() -> String {
    E::ENTITY_NAME.to_owned() + "s"
}

#[cfg(test)]
mod tests {
    use crate::domain::core::{Reservation, Room, RoomId};

    use super::*;

    #[test]
    fn test_decode_wrapped_document() {
        let rooms = decode_records::<Room>(
            br#"{"rooms": [{"id": 1, "number_of_beds": 2, "price_per_night": 90.0, "amenities": "WiFi"}]}"#,
        )
        .unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].id(), RoomId::from(1));
    }

    #[test]
    fn test_decode_bare_array_skips_broken() {
        let reservations = decode_records::<Reservation>(
            br#"[
                {"id": 1, "room_id": 1, "start_date": "2024-01-01", "end_date": "2024-01-02"},
                {"room_id": 1},
                "garbage",
                {"id": 3, "room_id": 2}
            ]"#,
        )
        .unwrap();
        let ids = reservations.iter().map(|r| *r.id()).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_decode_wrong_shape() {
        assert!(matches!(
            decode_records::<Room>(br#"{"reservations": []}"#),
            Err(DataAccessError::DecodeError(_))
        ));
        assert!(matches!(
            decode_records::<Room>(b"42"),
            Err(DataAccessError::DecodeError(_))
        ));
        assert!(matches!(
            decode_records::<Room>(b"{not json"),
            Err(DataAccessError::DecodeError(_))
        ));
    }

    #[test]
    fn test_io_error_mapping() {
        for kind in [
            std::io::ErrorKind::NotFound,
            std::io::ErrorKind::PermissionDenied,
            std::io::ErrorKind::ConnectionRefused,
        ] {
            assert!(matches!(
                DataAccessError::from(std::io::Error::new(kind, "io")),
                DataAccessError::ReadError(_)
            ));
        }
    }
}
