//! ICE server (STUN/TURN) configuration handed to WebRTC peers.

/// Static ICE settings supplied at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceSettings {
    pub stun_urls: Vec<String>,
    pub turn_urls: Vec<String>,
    pub turn_username: String,
    pub turn_credential: String,
    /// Lifetime of an issued TURN username, in seconds
    pub turn_ttl_secs: i64,
    pub ice_candidate_pool_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceServer {
    pub urls: Vec<String>,
    pub username: Option<String>,
    pub credential: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IceServerSet {
    pub ice_servers: Vec<IceServer>,
    pub ice_candidate_pool_size: u32,
}

impl IceSettings {
    /// Build the ICE server list as of `now_unix_secs`.
    ///
    /// TURN entries get a username of the form `"{expires_at}:{turn_username}"`,
    /// which TURN servers using time-limited credentials reject after expiry.
    pub fn issue(&self, now_unix_secs: i64) -> IceServerSet {
        let mut ice_servers = Vec::new();

        if !self.stun_urls.is_empty() {
            ice_servers.push(IceServer {
                urls: self.stun_urls.clone(),
                username: None,
                credential: None,
            });
        }

        if !self.turn_urls.is_empty() {
            let expires_at = now_unix_secs.saturating_add(self.turn_ttl_secs);
            ice_servers.push(IceServer {
                urls: self.turn_urls.clone(),
                username: Some(format!("{}:{}", expires_at, self.turn_username)),
                credential: Some(self.turn_credential.clone()),
            });
        }

        IceServerSet {
            ice_servers,
            ice_candidate_pool_size: self.ice_candidate_pool_size,
        }
    }
}
