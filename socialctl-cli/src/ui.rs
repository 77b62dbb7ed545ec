//! Progress feedback for socialctl
//!
//! Spinners are suppressed when:
//! - `--quiet` is passed
//! - `SOCIALCTL_QUIET=1` is set
//! - stderr is not a TTY (piped output)

use std::io::IsTerminal;
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

static QUIET_MODE: OnceLock<bool> = OnceLock::new();

/// Decide quiet mode once at startup.
pub fn init_quiet_mode(quiet_flag: bool) {
    let env_quiet = std::env::var("SOCIALCTL_QUIET")
        .map(|v| v == "1")
        .unwrap_or(false);
    QUIET_MODE
        .set(resolve_quiet(quiet_flag, env_quiet, std::io::stderr().is_terminal()))
        .ok();
}

fn resolve_quiet(flag: bool, env: bool, stderr_tty: bool) -> bool {
    flag || env || !stderr_tty
}

pub fn is_quiet() -> bool {
    *QUIET_MODE.get().unwrap_or(&false)
}

/// Spinner on stderr, or `None` in quiet mode.
pub fn spinner(msg: impl Into<String>) -> Option<ProgressBar> {
    if is_quiet() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    // Static template; parsing cannot fail
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(msg.into());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

fn finish(pb: Option<ProgressBar>, mark: &str, msg: String) {
    if let Some(pb) = pb {
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            pb.set_style(style);
        }
        pb.finish_with_message(format!("{} {}", mark, msg));
    }
}

pub fn finish_success(pb: Option<ProgressBar>, msg: impl Into<String>) {
    finish(pb, "✓", msg.into());
}

pub fn finish_error(pb: Option<ProgressBar>, msg: impl Into<String>) {
    finish(pb, "✗", msg.into());
}

/// Await `f` behind a spinner, reporting success or failure when it settles.
pub async fn with_spinner_async<T, E: std::fmt::Display>(
    msg: impl Into<String>,
    success_msg: impl Into<String>,
    f: impl std::future::Future<Output = Result<T, E>>,
) -> Result<T, E> {
    let msg = msg.into();
    let pb = spinner(&msg);

    match f.await {
        Ok(result) => {
            finish_success(pb, success_msg);
            Ok(result)
        }
        Err(e) => {
            finish_error(pb, format!("{}: {}", msg, e));
            Err(e)
        }
    }
}
