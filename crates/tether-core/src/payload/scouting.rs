//! Discovery results.

use crate::handle::{Resource, self_loaned};
use crate::payload::PeerId;

/// The role a discovered peer plays in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WhatAmI {
    /// A routing node.
    Router,
    /// A mesh peer.
    Peer,
    /// A leaf client.
    Client,
}

impl WhatAmI {
    /// Returns the canonical lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Router => "router",
            Self::Peer => "peer",
            Self::Client => "client",
        }
    }
}

impl std::fmt::Display for WhatAmI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WhatAmI {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "router" => Ok(Self::Router),
            "peer" => Ok(Self::Peer),
            "client" => Ok(Self::Client),
            other => Err(format!("unknown role {other:?}")),
        }
    }
}

/// A scouting response: one peer announcing itself.
///
/// Hellos are handed over to the registered
/// [`HelloConsumer`](crate::callback::HelloConsumer) — the callback owns
/// each one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hello {
    zid: PeerId,
    whatami: WhatAmI,
    locators: Vec<String>,
}

impl Hello {
    /// Builds a hello.
    pub fn new(zid: PeerId, whatami: WhatAmI, locators: Vec<String>) -> Self {
        Self {
            zid,
            whatami,
            locators,
        }
    }

    /// Returns the announcing peer's id.
    pub fn zid(&self) -> PeerId {
        self.zid
    }

    /// Returns the announcing peer's role.
    pub fn whatami(&self) -> WhatAmI {
        self.whatami
    }

    /// Returns the locators the peer is reachable at.
    pub fn locators(&self) -> &[String] {
        &self.locators
    }
}

impl Resource for Hello {
    const KIND: &'static str = "hello";
}

self_loaned!(Hello);

impl std::fmt::Display for Hello {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} [{}]",
            self.whatami,
            self.zid,
            self.locators.join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [WhatAmI::Router, WhatAmI::Peer, WhatAmI::Client] {
            assert_eq!(role.as_str().parse::<WhatAmI>().unwrap(), role);
        }
        assert!("gateway".parse::<WhatAmI>().is_err());
    }

    #[test]
    fn hello_display_lists_locators() {
        let hello = Hello::new(
            PeerId::default(),
            WhatAmI::Peer,
            vec!["tcp/10.0.0.1:7447".into()],
        );
        assert!(hello.to_string().starts_with("peer "));
        assert!(hello.to_string().contains("tcp/10.0.0.1:7447"));
    }
}
