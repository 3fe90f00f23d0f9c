//! Interrupt handling
//!
//! The first interrupt asks every worker to stop at its next iteration
//! boundary so the run still prints its summary. A second one exits at once.

use crate::exit::EXIT_INTERRUPTED;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::thread;
use tracing::{debug, error, warn};
use vecadd_harness::RunState;

/// Listens for interrupts on a dedicated thread for the rest of the process.
///
/// The OS handlers are registered before this returns, so an interrupt that
/// arrives while the run is starting is already routed to `state`.
pub fn install_interrupt_handler(state: Arc<RunState>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to build signal runtime")?;

    let interrupts = {
        let _guard = runtime.enter();
        Interrupts::register().context("Failed to install interrupt handler")?
    };

    thread::Builder::new()
        .name("vecadd-signal".into())
        .spawn(move || runtime.block_on(listen(state, interrupts)))
        .context("Failed to spawn signal thread")?;

    debug!("interrupt handler installed");
    Ok(())
}

async fn listen(state: Arc<RunState>, mut interrupts: Interrupts) {
    let mut received = 0u32;
    while interrupts.recv().await.is_some() {
        received += 1;

        if received == 1 {
            warn!("interrupt received, stopping after the current iteration");
            state.request_stop();
        } else {
            warn!("second interrupt, exiting immediately");
            println!("exitCode={EXIT_INTERRUPTED}");
            std::process::exit(EXIT_INTERRUPTED);
        }
    }
    error!("interrupt stream closed, no longer listening");
}

/// Registered interrupt streams. SIGTERM counts as an interrupt on Unix.
struct Interrupts {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
    #[cfg(windows)]
    ctrl_c: tokio::signal::windows::CtrlC,
}

impl Interrupts {
    /// Must run inside the runtime context.
    #[cfg(unix)]
    fn register() -> std::io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
        })
    }

    #[cfg(windows)]
    fn register() -> std::io::Result<Self> {
        Ok(Self { ctrl_c: tokio::signal::windows::ctrl_c()? })
    }

    #[cfg(unix)]
    async fn recv(&mut self) -> Option<()> {
        tokio::select! {
            received = self.interrupt.recv() => received,
            received = self.terminate.recv() => received,
        }
    }

    #[cfg(windows)]
    async fn recv(&mut self) -> Option<()> {
        self.ctrl_c.recv().await
    }
}
