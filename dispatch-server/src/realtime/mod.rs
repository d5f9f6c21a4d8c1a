//! socket.io 实时推送桥
//!
//! ```text
//! client ──emit("join", partyId | {partyId, role})──► RealtimeBridge
//!                                                       │ hub.subscribe
//!                                                       ▼
//!                                               forwarding task
//!                                                       │ socket.emit(kind, ride)
//!                                                       ▼
//!                                                    client
//! ```
//!
//! 每次 join 一个订阅 + 一个转发任务；断开时取消 socket 的令牌，
//! 转发任务退出并 drop 订阅，不触碰 RideStore。

use dashmap::DashMap;
use serde::Deserialize;
use shared::ride::PartyRole;
use socketioxide::SocketIo;
use socketioxide::extract::{Data, SocketRef};
use socketioxide::layer::SocketIoLayer;
use socketioxide::socket::Sid;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::notify::{NotificationHub, Subscription};

/// `join` 事件负载
///
/// 老客户端只发送字符串 id，乘客端和司机端都这样 join，
/// 所以裸 id 同时订阅乘客和司机两个角色。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum JoinPayload {
    PartyId(String),
    #[serde(rename_all = "camelCase")]
    Party {
        party_id: String,
        #[serde(default)]
        role: PartyRole,
    },
}

impl JoinPayload {
    pub fn into_parts(self) -> (String, Vec<PartyRole>) {
        match self {
            Self::PartyId(party_id) => (party_id, vec![PartyRole::Rider, PartyRole::Driver]),
            Self::Party { party_id, role } => (party_id, vec![role]),
        }
    }
}

/// socket → hub 订阅桥
#[derive(Clone)]
pub struct RealtimeBridge {
    hub: NotificationHub,
    /// 每个连接一个令牌，断开时取消
    sessions: Arc<DashMap<Sid, CancellationToken>>,
}

impl RealtimeBridge {
    pub fn new(hub: NotificationHub) -> Self {
        Self {
            hub,
            sessions: Arc::new(DashMap::new()),
        }
    }

    /// 构建 socket.io layer 并挂载默认命名空间
    pub fn layer(self) -> (SocketIoLayer, SocketIo) {
        let (layer, io) = SocketIo::new_layer();
        let bridge = self;
        io.ns("/", move |socket: SocketRef| {
            let bridge = bridge.clone();
            async move { bridge.on_connect(socket) }
        });
        (layer, io)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    fn on_connect(&self, socket: SocketRef) {
        tracing::debug!(sid = %socket.id, "Socket connected");
        let token = CancellationToken::new();
        self.sessions.insert(socket.id, token);

        let bridge = self.clone();
        socket.on("join", move |socket: SocketRef, Data(payload): Data<JoinPayload>| {
            let bridge = bridge.clone();
            async move { bridge.on_join(socket, payload) }
        });

        let bridge = self.clone();
        socket.on_disconnect(move |socket: SocketRef| {
            let bridge = bridge.clone();
            async move { bridge.on_disconnect(&socket) }
        });
    }

    fn on_join(&self, socket: SocketRef, payload: JoinPayload) {
        let (party_id, roles) = payload.into_parts();
        if party_id.trim().is_empty() {
            tracing::debug!(sid = %socket.id, "Ignoring join with empty party id");
            return;
        }
        let Some(token) = self.sessions.get(&socket.id).map(|t| t.clone()) else {
            return;
        };

        let subscription = self.hub.subscribe_roles(party_id, &roles);
        tracing::info!(
            sid = %socket.id,
            party_id = %subscription.party_id(),
            roles = ?roles,
            subscription_id = subscription.id(),
            "Socket joined"
        );
        tokio::spawn(forward(socket, subscription, token));
    }

    fn on_disconnect(&self, socket: &SocketRef) {
        if let Some((_, token)) = self.sessions.remove(&socket.id) {
            token.cancel();
        }
        tracing::debug!(sid = %socket.id, "Socket disconnected");
    }
}

/// 把订阅里的事件逐个推给 socket，直到断开
async fn forward(socket: SocketRef, mut subscription: Subscription, token: CancellationToken) {
    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            event = subscription.recv() => {
                let Some(event) = event else { break };
                if let Err(e) = socket.emit(event.kind.event_name(), &event.ride) {
                    tracing::warn!(
                        sid = %socket.id,
                        ride_id = %event.ride_id(),
                        event = event.kind.event_name(),
                        error = %e,
                        "Notification delivery failed: socket emit error"
                    );
                }
            }
        }
    }
    tracing::debug!(sid = %socket.id, subscription_id = subscription.id(), "Forwarding stopped");
}
