//! Kiosk lockdown agent entry point.
//!
//! Wires the controller together with the platform layer implementations and
//! parks on the Tokio runtime until a shutdown signal arrives.  The
//! request/response relay that the host application drives calls into
//! [`infrastructure::bridge::dispatch_method`]; the headless variant built
//! here simply holds the controller so the teardown contracts are honoured.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ load_config()            -- TOML config, defaults on first run
//!  └─ build_controller()       -- Windows layers (or mocks off-Windows)
//!  └─ force_teardown()         -- clears crash residue proactively
//!  └─ wait for Ctrl-C          -- then force_teardown() again and exit
//! ```

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use kiosk_agent::application::lockdown::LockdownController;
use kiosk_agent::infrastructure::monitor::EscapeProcessMonitor;
use kiosk_agent::infrastructure::storage::config::{
    config_file_path, load_config, save_config, AgentConfig,
};

/// Assembles the controller from the platform's layer implementations.
#[cfg(target_os = "windows")]
fn build_controller(config: &AgentConfig) -> LockdownController {
    use kiosk_agent::infrastructure::input_hook::windows::WindowsKeyboardFilter;
    use kiosk_agent::infrastructure::monitor::windows::WindowsEscapeProbe;
    use kiosk_agent::infrastructure::privilege::windows::WindowsPrivilegeProbe;
    use kiosk_agent::infrastructure::shell::windows::WindowsShellSurface;
    use kiosk_agent::infrastructure::task_policy::windows::WindowsTaskManagerPolicy;
    use kiosk_core::EscapeKeyPolicy;

    let active = Arc::new(AtomicBool::new(false));
    let monitor = EscapeProcessMonitor::new(
        Arc::new(WindowsEscapeProbe::new(&config.monitor.escape_window_class)),
        Duration::from_millis(config.monitor.poll_interval_ms),
    );
    LockdownController::new(
        Arc::clone(&active),
        Box::new(WindowsShellSurface::new(config.shell.window_class.clone())),
        Box::new(WindowsKeyboardFilter::new(active, EscapeKeyPolicy::default())),
        Box::new(WindowsTaskManagerPolicy::new()),
        monitor,
        Box::new(WindowsPrivilegeProbe::new()),
    )
}

/// Headless development build: mock layers stand in for the Windows APIs.
#[cfg(not(target_os = "windows"))]
fn build_controller(config: &AgentConfig) -> LockdownController {
    use kiosk_agent::infrastructure::input_hook::mock::MockKeyboardFilter;
    use kiosk_agent::infrastructure::monitor::mock::MockEscapeProbe;
    use kiosk_agent::infrastructure::privilege::mock::MockPrivilegeProbe;
    use kiosk_agent::infrastructure::shell::mock::MockShellSurface;
    use kiosk_agent::infrastructure::task_policy::mock::MockTaskManagerPolicy;

    let active = Arc::new(AtomicBool::new(false));
    let monitor = EscapeProcessMonitor::new(
        Arc::new(MockEscapeProbe::new()),
        Duration::from_millis(config.monitor.poll_interval_ms),
    );
    LockdownController::new(
        Arc::clone(&active),
        Box::new(MockShellSurface::new()),
        Box::new(MockKeyboardFilter::new(active)),
        Box::new(MockTaskManagerPolicy::new()),
        monitor,
        Box::new(MockPrivilegeProbe::new(false)),
    )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first so its log level can seed the filter.
    let config = load_config().unwrap_or_default();

    // Initialise structured logging.  Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.agent.log_level.clone())),
        )
        .init();

    info!("kiosk lockdown agent starting");

    // First run: persist the defaults so operators have a file to edit.
    if let Ok(path) = config_file_path() {
        if !path.exists() {
            if let Err(e) = save_config(&config) {
                warn!("could not write default config: {e}");
            }
        }
    }

    let mut controller = build_controller(&config);

    // A prior instance may have crashed with the task-manager policy still
    // written; recorded state does not survive restarts but that value does.
    controller.force_teardown();

    if !controller.has_elevated_privileges() {
        info!("running without elevation; task-manager policy writes may fail");
    }

    // ── Ctrl-C / SIGTERM handler ──────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown signal received");
            running_clone.store(false, Ordering::Relaxed);
        }
    });

    info!("kiosk lockdown agent ready.  Press Ctrl-C to exit.");

    // The host application's relay drives dispatch_method() from its own
    // message context; the headless variant blocks until shutdown.
    loop {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if !running.load(Ordering::Relaxed) {
            break;
        }
    }

    // Leave no restriction behind on exit, whatever state the host left us in.
    controller.force_teardown();

    info!("kiosk lockdown agent stopped");
    Ok(())
}
