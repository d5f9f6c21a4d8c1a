//! NotificationHub — 行程事件实时分发
//!
//! ```text
//! DispatchEngine (commit 之后)
//!       │ RideEvent
//!       ▼
//! NotificationHub
//!   └── subscribers: subscription_id → (party_id, roles, mpsc::Sender)
//!           │  broadcast_to_role / notify_party
//!           ▼
//!       Subscription (每个连接/设备一个)
//! ```
//!
//! 投递最多一次：通道满或已关闭时丢弃该事件并记 warn，不重试，
//! 也不会让调用方失败。

use dashmap::DashMap;
use shared::ride::{PartyRole, RideEvent};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

/// 单个订阅通道的默认容量
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Outcome of one fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: usize,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.delivered + self.failed
    }
}

struct Subscriber {
    party_id: String,
    roles: Vec<PartyRole>,
    tx: mpsc::Sender<RideEvent>,
}

struct HubInner {
    subscribers: DashMap<u64, Subscriber>,
    next_id: AtomicU64,
    capacity: usize,
}

/// 订阅句柄，drop 时自动退订
pub struct Subscription {
    id: u64,
    party_id: String,
    roles: Vec<PartyRole>,
    rx: mpsc::Receiver<RideEvent>,
    hub: Weak<HubInner>,
}

impl Subscription {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn party_id(&self) -> &str {
        &self.party_id
    }

    pub fn roles(&self) -> &[PartyRole] {
        &self.roles
    }

    /// 等待下一个事件；退订后返回 `None`
    pub async fn recv(&mut self) -> Option<RideEvent> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<RideEvent> {
        self.rx.try_recv().ok()
    }

    /// 关闭接收端但保留订阅表条目，模拟连接已断开但尚未退订
    #[cfg(test)]
    pub(crate) fn close(&mut self) {
        self.rx.close();
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.subscribers.remove(&self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("party_id", &self.party_id)
            .field("roles", &self.roles)
            .finish()
    }
}

/// 订阅表 + 扇出
#[derive(Clone)]
pub struct NotificationHub {
    inner: Arc<HubInner>,
}

impl std::fmt::Debug for NotificationHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationHub")
            .field("subscribers", &self.inner.subscribers.len())
            .field("capacity", &self.inner.capacity)
            .finish()
    }
}

impl Default for NotificationHub {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_CAPACITY)
    }
}

impl NotificationHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(HubInner {
                subscribers: DashMap::new(),
                next_id: AtomicU64::new(1),
                capacity: capacity.max(1),
            }),
        }
    }

    /// 注册订阅
    ///
    /// 同一 party 可以有多个订阅（多设备），每个都会收到事件。
    pub fn subscribe(&self, party_id: impl Into<String>, role: PartyRole) -> Subscription {
        self.subscribe_roles(party_id, &[role])
    }

    /// 以多个角色注册一个订阅
    ///
    /// 角色广播只要命中其中之一就投递，每个事件最多投递一次。
    pub fn subscribe_roles(
        &self,
        party_id: impl Into<String>,
        roles: &[PartyRole],
    ) -> Subscription {
        let party_id = party_id.into();
        let roles = roles.to_vec();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::channel(self.inner.capacity);

        self.inner.subscribers.insert(
            id,
            Subscriber {
                party_id: party_id.clone(),
                roles: roles.clone(),
                tx,
            },
        );
        tracing::debug!(
            subscription_id = id,
            party_id = %party_id,
            roles = ?roles,
            "Subscribed"
        );

        Subscription {
            id,
            party_id,
            roles,
            rx,
            hub: Arc::downgrade(&self.inner),
        }
    }

    /// 显式退订；返回是否存在该订阅
    pub fn unsubscribe(&self, subscription_id: u64) -> bool {
        self.inner.subscribers.remove(&subscription_id).is_some()
    }

    /// 发给某角色的全部订阅者
    pub fn broadcast_to_role(&self, role: PartyRole, event: &RideEvent) -> DeliveryReport {
        self.fan_out(event, |sub| sub.roles.contains(&role))
    }

    /// 发给某 party 的全部订阅（不区分角色）
    pub fn notify_party(&self, party_id: &str, event: &RideEvent) -> DeliveryReport {
        self.fan_out(event, |sub| sub.party_id == party_id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.len()
    }

    pub fn party_subscriptions(&self, party_id: &str) -> usize {
        self.inner
            .subscribers
            .iter()
            .filter(|entry| entry.party_id == party_id)
            .count()
    }

    fn fan_out(&self, event: &RideEvent, matches: impl Fn(&Subscriber) -> bool) -> DeliveryReport {
        // 先收集目标再发送，避免持有分片锁时删除条目
        let targets: Vec<(u64, String, mpsc::Sender<RideEvent>)> = self
            .inner
            .subscribers
            .iter()
            .filter(|entry| matches(entry.value()))
            .map(|entry| (*entry.key(), entry.party_id.clone(), entry.tx.clone()))
            .collect();

        let mut report = DeliveryReport::default();
        for (id, party_id, tx) in targets {
            match tx.try_send(event.clone()) {
                Ok(()) => report.delivered += 1,
                Err(TrySendError::Full(_)) => {
                    report.failed += 1;
                    tracing::warn!(
                        subscription_id = id,
                        party_id = %party_id,
                        ride_id = %event.ride_id(),
                        event = event.kind.event_name(),
                        "Notification delivery failed: subscriber channel full"
                    );
                }
                Err(TrySendError::Closed(_)) => {
                    report.failed += 1;
                    self.inner.subscribers.remove(&id);
                    tracing::warn!(
                        subscription_id = id,
                        party_id = %party_id,
                        ride_id = %event.ride_id(),
                        event = event.kind.event_name(),
                        "Notification delivery failed: subscriber gone, removed"
                    );
                }
            }
        }
        report
    }
}
