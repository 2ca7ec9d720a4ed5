//! UseCase: ICE サーバー設定の発行

use std::sync::Arc;

use easel_shared::time::Clock;

use crate::domain::{IceServerSet, IceSettings};

/// ICE サーバー設定発行のユースケース
pub struct GetIceServersUseCase {
    settings: IceSettings,
    clock: Arc<dyn Clock>,
}

impl GetIceServersUseCase {
    pub fn new(settings: IceSettings, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    /// 現在時刻を基準に TURN の有効期限を付けて発行
    pub fn execute(&self) -> IceServerSet {
        self.settings.issue(self.clock.now_unix_secs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use easel_shared::time::FixedClock;

    fn settings() -> IceSettings {
        IceSettings {
            stun_urls: vec!["stun:stun1.l.google.com:19302".to_string()],
            turn_urls: vec!["turn:turn.example.com:3478".to_string()],
            turn_username: "webrtc".to_string(),
            turn_credential: "secret".to_string(),
            turn_ttl_secs: 3_600,
            ice_candidate_pool_size: 10,
        }
    }

    #[test]
    fn test_turn_username_carries_expiry() {
        // テスト項目: TURN のユーザー名は「有効期限:ユーザー名」になる
        // given (前提条件):
        let usecase = GetIceServersUseCase::new(settings(), Arc::new(FixedClock::new(1_000_000)));

        // when (操作):
        let set = usecase.execute();

        // then (期待する結果):
        assert_eq!(set.ice_servers.len(), 2);
        assert_eq!(set.ice_servers[0].username, None);
        assert_eq!(set.ice_servers[1].username.as_deref(), Some("4600:webrtc"));
        assert_eq!(set.ice_servers[1].credential.as_deref(), Some("secret"));
        assert_eq!(set.ice_candidate_pool_size, 10);
    }
}
