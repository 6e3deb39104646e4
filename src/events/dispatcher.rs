use async_trait::async_trait;
use tracing::info;

use crate::error::Result;
use crate::events::VacancyEvent;

/// Publishes domain events to interested subscribers. The transport behind
/// this trait (message broker, webhook, log) is an external concern; callers
/// only rely on `dispatch` returning once the event is handed off.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    async fn dispatch(&self, event: VacancyEvent) -> Result<()>;
}

/// Dispatcher that emits events to the tracing pipeline. Stands in for a
/// broker-backed implementation in deployments without one.
#[derive(Debug, Default)]
pub struct TracingEventDispatcher;

impl TracingEventDispatcher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EventDispatcher for TracingEventDispatcher {
    async fn dispatch(&self, event: VacancyEvent) -> Result<()> {
        let payload = serde_json::to_string(&event)?;
        info!(
            target: "vacancy_backend::events",
            event_type = event.event_type(),
            vacancy_id = event.aggregate_id(),
            %payload,
            "domain event dispatched"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracing_dispatcher_accepts_events() {
        let dispatcher = TracingEventDispatcher::new();
        let result = dispatcher.dispatch(VacancyEvent::created(1)).await;
        assert!(result.is_ok());
    }
}
