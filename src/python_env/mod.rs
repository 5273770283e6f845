//! Python 가상환경 부트스트랩과 스크립트 실행
//!
//! 두 헬퍼(부트스트래퍼, 스크립트 러너)의 플랫폼별 동작은 전부 여기의
//! 순수 계획 함수로 결정된다: 플랫폼 변형 → 순서 있는 `CommandSpec`
//! 목록. 실행은 `process::run_sequence`에 위임하고, 한 단계가 실패하면
//! 이후 단계(예: venv 생성 실패 후의 pip install)는 실행되지 않는다.
//!
//! ## 부트스트랩 순서
//! 1. (Linux만) `sudo apt install -y python3-venv` — venv 모듈 확보
//! 2. 시스템 인터프리터로 `python -m venv <venv>`
//! 3. venv 인터프리터로 `python -m pip install -r <전달받은 인자...>`

use std::path::Path;

use crate::platform::Platform;
use crate::process::{self, CommandSpec};

/// venv 생성 + 의존성 설치 단계 목록.
/// 지원되지 않는 플랫폼이면 빈 목록이고 아무 프로세스도 뜨지 않는다.
pub fn bootstrap_plan(
    platform: Platform,
    venv_dir: &Path,
    install_args: &[String],
) -> Vec<CommandSpec> {
    let (base_python, venv_python) = match (platform.base_python(), platform.venv_python(venv_dir))
    {
        (Some(base), Some(venv)) => (base, venv),
        _ => return Vec::new(),
    };

    let venv_path = venv_dir.to_string_lossy();
    let mut plan = Vec::new();

    if platform == Platform::Linux {
        // 데비안 계열은 venv 모듈이 별도 패키지라 먼저 설치한다
        plan.push(CommandSpec::new(
            "sudo",
            ["apt", "install", "-y", "python3-venv"],
        ));
    }

    plan.push(CommandSpec::new(
        base_python,
        ["-m", "venv", venv_path.as_ref()],
    ));

    let mut pip_args: Vec<String> = ["-m", "pip", "install", "-r"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    pip_args.extend(install_args.iter().cloned());
    plan.push(CommandSpec::new(venv_python.to_string_lossy(), pip_args));

    plan
}

/// 부트스트랩 계획을 실행한다. 빈 계획(미지원 플랫폼)은 조용히 성공.
pub async fn bootstrap(
    platform: Platform,
    venv_dir: &Path,
    install_args: &[String],
) -> Result<(), process::Error> {
    let plan = bootstrap_plan(platform, venv_dir, install_args);
    if plan.is_empty() {
        tracing::debug!("unsupported platform, venv bootstrap skipped");
        return Ok(());
    }
    process::run_sequence(&plan).await
}

/// venv 인터프리터로 스크립트를 실행하는 사양. 스크립트 경로가 첫
/// 인자, 호출자가 넘긴 토큰은 각각 개별 인자로 전달된다 — 셸 해석 없음.
pub fn run_script_plan(
    platform: Platform,
    venv_dir: &Path,
    script: &str,
    script_args: &[String],
) -> Option<CommandSpec> {
    let venv_python = platform.venv_python(venv_dir)?;

    let mut argv = Vec::with_capacity(script_args.len() + 1);
    argv.push(script.to_string());
    argv.extend(script_args.iter().cloned());

    Some(CommandSpec::new(venv_python.to_string_lossy(), argv))
}
