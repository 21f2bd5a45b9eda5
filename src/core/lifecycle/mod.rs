use anyhow::{Context, Result};
use chrono::FixedOffset;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Init,
    ConnectChannels,
    Ready,
    Shutdown,
}

#[async_trait::async_trait]
pub trait LifecycleComponent {
    async fn on_init(&mut self) -> Result<()> {
        Ok(())
    }
    async fn on_start(&mut self) -> Result<()> {
        Ok(())
    }
    async fn on_shutdown(&mut self) -> Result<()> {
        Ok(())
    }
}

type SharedComponent = Arc<Mutex<dyn LifecycleComponent + Send + Sync>>;

/// Owns the long-running pieces of the bot: channel components, started in
/// attach order, and the cron jobs, which only fire once the manager is
/// `Ready`.
pub struct LifecycleManager {
    state: LifecycleState,
    components: Vec<SharedComponent>,
    scheduler: JobScheduler,
    jobs: Vec<String>,
}

impl LifecycleManager {
    pub async fn new() -> Result<Self> {
        let scheduler = JobScheduler::new()
            .await
            .context("failed to create job scheduler")?;
        Ok(Self {
            state: LifecycleState::Init,
            components: Vec::new(),
            scheduler,
            jobs: Vec::new(),
        })
    }

    #[cfg(test)]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Names of the registered cron jobs, in registration order.
    pub fn jobs(&self) -> &[String] {
        &self.jobs
    }

    pub fn attach(&mut self, component: SharedComponent) {
        self.components.push(component);
    }

    /// Runs `task` every time the six-field `cron` expression fires, with
    /// hours and minutes read at `offset`.
    pub async fn schedule<F, Fut>(
        &mut self,
        name: &str,
        cron: &str,
        offset: FixedOffset,
        task: F,
    ) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let task = Arc::new(task);
        let job = Job::new_async_tz(cron, offset, move |_id, _scheduler| {
            let task = task.clone();
            Box::pin(async move { task().await })
        })
        .with_context(|| format!("invalid cron '{}' for job '{}'", cron, name))?;
        self.scheduler.add(job).await?;
        self.jobs.push(name.to_string());
        info!("Job '{}' scheduled with cron '{}' at UTC{}", name, cron, offset);
        Ok(())
    }

    pub async fn start(&mut self) -> Result<()> {
        info!("Lifecycle Phase: Init");
        self.state = LifecycleState::Init;
        for comp in &self.components {
            comp.lock().await.on_init().await?;
        }

        info!("Lifecycle Phase: Connect Channels");
        self.state = LifecycleState::ConnectChannels;
        for comp in &self.components {
            comp.lock().await.on_start().await?;
        }

        info!("Lifecycle Phase: Ready ({} scheduled job(s))", self.jobs.len());
        self.scheduler.start().await?;
        self.state = LifecycleState::Ready;

        Ok(())
    }

    /// Stops the scheduler first so no job fires into a stopped channel.
    pub async fn shutdown(&mut self) -> Result<()> {
        if self.state == LifecycleState::Shutdown {
            return Ok(());
        }
        info!("Lifecycle Phase: Shutdown");
        self.state = LifecycleState::Shutdown;

        if let Err(e) = self.scheduler.shutdown().await {
            warn!("Scheduler shutdown error: {}", e);
        }
        for comp in &self.components {
            if let Err(e) = comp.lock().await.on_shutdown().await {
                warn!("Component shutdown error: {}", e);
            }
        }

        Ok(())
    }
}
