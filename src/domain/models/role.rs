use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Anything other than `assistant` is treated as the user, so clients
    /// sending stray roles such as `system` never get rejected.
    pub fn coerce(role: &str) -> Role {
        if role.trim().eq_ignore_ascii_case("assistant") {
            return Role::Assistant;
        }

        return Role::User;
    }
}
