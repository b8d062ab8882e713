use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(pub u64);

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shop owner profile. The backend also returns the password hash; it is
/// never decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(rename = "ID")]
    pub id: OwnerId,
    #[serde(rename = "FirstName", default)]
    pub first_name: String,
    #[serde(rename = "LastName", default)]
    pub last_name: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "ProfilePath", default, skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<String>,
}

impl Owner {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct OwnerDraft {
    #[serde(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    pub last_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password", serialize_with = "expose")]
    pub password: SecretString,
    #[serde(rename = "ProfilePath", skip_serializing_if = "Option::is_none")]
    pub profile_path: Option<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SignInCredentials {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Password", serialize_with = "expose")]
    pub password: SecretString,
}

/// Successful `/signin` response.
#[derive(Clone, Debug, Deserialize)]
pub struct SignInGrant {
    pub token_type: String,
    #[serde(deserialize_with = "secret")]
    pub token: SecretString,
    pub id: OwnerId,
}

fn expose<S: Serializer>(value: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(value.expose_secret())
}

fn secret<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use secrecy::{ExposeSecret, SecretString};

    use super::{Owner, OwnerId, SignInCredentials, SignInGrant};

    #[test]
    fn credentials_serialize_password_but_debug_redacts_it() {
        let credentials = SignInCredentials {
            email: "owner@example.com".to_string(),
            password: SecretString::from("hunter22"),
        };

        let body = serde_json::to_string(&credentials).expect("credentials should serialize");
        assert!(body.contains("\"Password\":\"hunter22\""));
        assert!(!format!("{credentials:?}").contains("hunter22"));
    }

    #[test]
    fn grant_decodes_signin_response() {
        let grant: SignInGrant =
            serde_json::from_str(r#"{"token_type":"Bearer","token":"abc.def","id":5}"#)
                .expect("grant should decode");
        assert_eq!(grant.id, OwnerId(5));
        assert_eq!(grant.token.expose_secret(), "abc.def");
    }

    #[test]
    fn owner_ignores_password_hash() {
        let owner: Owner = serde_json::from_str(
            r#"{"ID":1,"FirstName":"Ada","LastName":"Lovelace","Email":"ada@example.com","Password":"$2a$14$x"}"#,
        )
        .expect("owner should decode");
        assert_eq!(owner.display_name(), "Ada Lovelace");
        assert!(!serde_json::to_string(&owner).expect("owner should serialize").contains("$2a$"));
    }
}
