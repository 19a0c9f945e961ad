use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Claims decoded from a verified access token, kept exactly as issued.
///
/// No claim is required to have a particular type; `sub`, `email` and `name`
/// are read as strings only when they are strings. Serializing gives back the
/// same object, `null` values included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(pub Map<String, Value>);

impl Claims {
    pub fn get(&self, claim: &str) -> Option<&Value> {
        self.0.get(claim)
    }

    fn string(&self, claim: &str) -> Option<&str> {
        self.get(claim).and_then(Value::as_str)
    }

    pub fn sub(&self) -> Option<&str> {
        self.string("sub")
    }

    pub fn email(&self) -> Option<&str> {
        self.string("email")
    }

    pub fn name(&self) -> Option<&str> {
        self.string("name")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_non_string_claims_are_kept_but_not_lifted() {
        let raw = json!({
            "sub": "usr_1",
            "name": {"given": "Jane", "family": "Doe"},
            "email": null,
        });
        let claims: Claims = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(claims.sub(), Some("usr_1"));
        assert_eq!(claims.name(), None);
        assert_eq!(claims.email(), None);
        assert_eq!(serde_json::to_value(&claims).unwrap(), raw);
    }
}
