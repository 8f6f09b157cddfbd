// Redaction of secrets in payloads before they reach the debug log.

use serde_json::Value;

const MASK: &str = "********";

/// Keys whose values never appear in logs (compared case-insensitively).
const SENSITIVE_KEYS: &[&str] = &[
    "password",
    "newpassword",
    "oldpassword",
    "passcode",
    "newpasscode",
    "oldpasscode",
    "token",
    "authorization",
];

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Return a copy of `value` with every sensitive field masked, at any depth.
pub fn sanitise(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, inner)| {
                    let masked = if is_sensitive(key) {
                        Value::String(MASK.into())
                    } else {
                        sanitise(inner)
                    };
                    (key.clone(), masked)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(sanitise).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn masks_nested_secrets() {
        let payload = json!({
            "username": "admin",
            "password": "hunter2",
            "users": [{ "userId": "u1", "Passcode": "1234" }],
            "session": { "token": "abc" }
        });
        assert_eq!(
            sanitise(&payload),
            json!({
                "username": "admin",
                "password": "********",
                "users": [{ "userId": "u1", "Passcode": "********" }],
                "session": { "token": "********" }
            })
        );
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(sanitise(&json!("plain")), json!("plain"));
        assert_eq!(sanitise(&Value::Null), Value::Null);
    }
}
