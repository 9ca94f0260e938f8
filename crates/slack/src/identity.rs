use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Caller {
    pub id: String,
    pub name: String,
    pub team: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub team: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub caller: Caller,
    pub channel: Channel,
}

/// Identity as sent by outgoing webhooks and slash commands: top-level keys.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FlatIdentity {
    pub user_id: String,
    pub user_name: String,
    pub team_id: String,
    pub channel_id: String,
    pub channel_name: String,
}

/// Identity as sent inside interactive action payloads: `user`, `channel` and
/// `team` objects.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NestedIdentity {
    pub user: NestedUser,
    pub channel: NestedChannel,
    pub team: NestedTeam,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NestedUser {
    pub id: String,
    pub name: String,
    pub username: String,
    pub team_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NestedChannel {
    pub id: String,
    pub name: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NestedTeam {
    pub id: String,
    pub domain: String,
}

#[derive(Clone, Copy, Debug)]
pub enum IdentitySource<'a> {
    Flat(&'a FlatIdentity),
    Nested(&'a NestedIdentity),
}

pub fn normalize(source: IdentitySource<'_>) -> Identity {
    match source {
        IdentitySource::Flat(flat) => Identity {
            caller: Caller {
                id: flat.user_id.clone(),
                name: flat.user_name.clone(),
                team: flat.team_id.clone(),
            },
            channel: Channel {
                id: flat.channel_id.clone(),
                name: flat.channel_name.clone(),
                team: flat.team_id.clone(),
            },
        },
        IdentitySource::Nested(nested) => {
            // Newer payloads carry `user.username` and `user.team_id`; older
            // ones only `user.name` and the outer team.
            let name = first_non_empty(&nested.user.name, &nested.user.username);
            let caller_team = first_non_empty(&nested.user.team_id, &nested.team.id);

            Identity {
                caller: Caller { id: nested.user.id.clone(), name, team: caller_team },
                channel: Channel {
                    id: nested.channel.id.clone(),
                    name: nested.channel.name.clone(),
                    team: nested.team.id.clone(),
                },
            }
        }
    }
}

fn first_non_empty(preferred: &str, fallback: &str) -> String {
    if preferred.is_empty() {
        fallback.to_owned()
    } else {
        preferred.to_owned()
    }
}
