use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng as _;
use serde::Serialize;
use serde_json::Value;

use crate::Result;
use crate::error::Error;

/// Identifier injected into every application message as its `id` field.
pub type MessageId = u32;

/// Ids live in the non-negative range of a signed 32-bit integer.
const ID_MODULUS: u64 = 1 << 31;

/// Key under which the [`MessageId`] is injected.
pub const ID_FIELD: &str = "id";

/// Generate a message id from the current time and a random low-order digit.
///
/// Ids are practically distinct within a session but not unique across processes.
#[must_use]
pub fn generate_id() -> MessageId {
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs();

    message_id(seconds, rand::rng().random_range(0..10))
}

/// `(seconds * 10 + digit) mod 2^31`. Wrapping in `u64` does not change the result because
/// 2^31 divides 2^64.
pub(crate) fn message_id(seconds: u64, digit: u64) -> MessageId {
    let id = seconds.wrapping_mul(10).wrapping_add(digit) % ID_MODULUS;
    MessageId::try_from(id).unwrap_or_default()
}

/// Serialize `payload` with `id` injected, ready for the outbound queue.
///
/// The payload has to serialize to a JSON object. An existing `id` key is overwritten.
pub fn stamp<P: Serialize + ?Sized>(payload: &P, id: MessageId) -> Result<String> {
    let mut value = serde_json::to_value(payload)?;
    let Value::Object(object) = &mut value else {
        return Err(Error::validation(
            "outbound payload must serialize to a JSON object",
        ));
    };
    object.insert(ID_FIELD.to_owned(), Value::from(id));

    Ok(serde_json::to_string(&value)?)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::error::Kind;

    #[test]
    fn generated_id_is_in_31_bit_range() {
        for _ in 0..100 {
            assert!(u64::from(generate_id()) < ID_MODULUS);
        }
    }

    #[test]
    fn message_id_combines_time_and_digit() {
        assert_eq!(
            u64::from(message_id(1_700_000_000, 7)),
            17_000_000_007_u64 % (1 << 31)
        );
        assert_eq!(message_id(0, 9), 9);
    }

    #[test]
    fn message_id_wraps_like_unbounded_arithmetic() {
        let seconds = u64::MAX / 3;
        let expected = (u128::from(seconds) * 10 + 4) % (1 << 31);
        assert_eq!(u128::from(message_id(seconds, 4)), expected);
    }

    #[test]
    fn stamp_injects_id() {
        let text = stamp(&json!({"type": "message", "text": "hi"}), 42).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value, json!({"type": "message", "text": "hi", "id": 42}));
    }

    #[test]
    fn stamp_overwrites_existing_id() {
        let text = stamp(&json!({"id": "caller", "text": "hi"}), 7).unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["id"], json!(7));
    }

    #[test]
    fn stamp_accepts_serializable_structs() {
        #[derive(Serialize)]
        struct Typing<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
            channel: &'a str,
        }

        let text = stamp(
            &Typing {
                kind: "typing",
                channel: "C024BE91L",
            },
            1,
        )
        .unwrap();
        let value: Value = serde_json::from_str(&text).unwrap();

        assert_eq!(
            value,
            json!({"type": "typing", "channel": "C024BE91L", "id": 1})
        );
    }

    #[test]
    fn stamp_rejects_non_objects() {
        let error = stamp(&json!(["not", "an", "object"]), 1).unwrap_err();
        assert_eq!(error.kind(), Kind::Validation);
    }
}
