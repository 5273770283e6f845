//! CA 신뢰 등록 바이너리
//!
//! `launchpad-trust-ca <ca.cer>` — Windows에서는 인증서 저장소에
//! 등록하고(관리자 권한 필요), 그 외 플랫폼에서는 건너뛴다.

use std::path::Path;

use anyhow::Context;
use launchpad::certgen;
use launchpad::platform::Platform;
use launchpad::process;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let ca_path = std::env::args()
        .nth(1)
        .context("usage: launchpad-trust-ca <ca-certificate-path>")?;

    tracing::info!("marking TLS CA certificate as trusted");
    match certgen::trust_plan(Platform::current(), Path::new(&ca_path)) {
        Some(spec) => {
            process::run_sequence(std::slice::from_ref(&spec)).await?;
            tracing::info!("marked {} as trusted", ca_path);
        }
        None => tracing::info!("non-Windows OS detected, trust step skipped for {}", ca_path),
    }
    Ok(())
}
