//! venv 스크립트 러너 바이너리
//!
//! `launchpad-run <script.py> [args...]` — 스크립트와 인자는 셸 해석
//! 없이 개별 토큰으로 venv 인터프리터에 전달된다.

use anyhow::Context;
use launchpad::config::GlobalConfig;
use launchpad::platform::Platform;
use launchpad::{process, python_env};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let script = args
        .next()
        .context("usage: launchpad-run <script> [args...]")?;
    let script_args: Vec<String> = args.collect();

    let config = GlobalConfig::load();
    match python_env::run_script_plan(
        Platform::current(),
        &config.resolve_venv_dir(),
        &script,
        &script_args,
    ) {
        Some(spec) => process::run_sequence(std::slice::from_ref(&spec)).await?,
        // 미지원 플랫폼: 진단만 남기고 정상 종료
        None => tracing::error!("failed to use Python, OS not supported"),
    }
    Ok(())
}
