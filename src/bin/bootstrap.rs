//! venv 부트스트랩 바이너리
//!
//! 인자는 그대로 `pip install -r` 뒤에 전달된다. 보통 requirements
//! 파일 경로 하나다:
//! `launchpad-bootstrap requirements.txt`

use launchpad::config::GlobalConfig;
use launchpad::platform::Platform;
use launchpad::python_env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let install_args: Vec<String> = std::env::args().skip(1).collect();
    let config = GlobalConfig::load();
    let platform = Platform::current();

    // 실패한 단계가 있으면 나머지는 건너뛰고 비정상 종료
    python_env::bootstrap(platform, &config.resolve_venv_dir(), &install_args).await?;
    Ok(())
}
