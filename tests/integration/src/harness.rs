//! Test harness wiring the mocks to a real store, coordinator, and
//! scheduler

use std::sync::Arc;

use warden_db::{create_memory_pool, init_schema, SqliteActionStore};
use warden_service::{ActionCoordinator, ExpirationScheduler, ModContext, SchedulerConfig};

use crate::mocks::{MockPlatform, MockResolver, RecordingSink};

/// A fully wired moderation stack over an in-memory database
pub struct TestHarness {
    pub store: Arc<SqliteActionStore>,
    pub platform: Arc<MockPlatform>,
    pub resolver: Arc<MockResolver>,
    pub sink: Arc<RecordingSink>,
    pub scheduler: Arc<ExpirationScheduler>,
    pub coordinator: ActionCoordinator,
}

/// Build a harness with default scheduler timing
pub async fn harness() -> TestHarness {
    harness_with_config(SchedulerConfig::default()).await
}

/// Build a harness with custom scheduler timing
pub async fn harness_with_config(config: SchedulerConfig) -> TestHarness {
    // keep RUST_LOG-driven output available when debugging tests
    let _ = warden_common::try_init_tracing();

    let pool = create_memory_pool().await.expect("pool");
    init_schema(&pool).await.expect("schema");

    let store = Arc::new(SqliteActionStore::new(pool));
    let platform = Arc::new(MockPlatform::new());
    let resolver = Arc::new(MockResolver::new());
    let sink = Arc::new(RecordingSink::new());

    let ctx = Arc::new(ModContext::new(
        store.clone(),
        platform.clone(),
        resolver.clone(),
        sink.clone(),
    ));
    let scheduler = Arc::new(ExpirationScheduler::new(ctx.clone(), config));
    let coordinator = ActionCoordinator::new(ctx, scheduler.clone());

    TestHarness {
        store,
        platform,
        resolver,
        sink,
        scheduler,
        coordinator,
    }
}
