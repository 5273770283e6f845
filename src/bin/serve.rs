//! 정적 HTTPS 서버 바이너리
//!
//! `launchpad-serve -ip <addr> -server_key_path <key> -server_cer_path <cer>`

use launchpad::config::{GlobalConfig, ServerArgs};
use launchpad::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // 필수 플래그가 빠지면 여기서 Err → 비정상 종료 코드로 끝난다
    let args = ServerArgs::from_env()?;
    tracing::info!(
        "starting HTTPS server (ip: {}, cert: {})",
        args.ip,
        args.cert_path.display()
    );

    let config = GlobalConfig::load();
    server::serve(&args, config.resolve_public_dir()).await
}
