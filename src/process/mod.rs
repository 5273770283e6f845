//! 서브프로세스 실행 — 명시적 인자 벡터, 명시적 종료 코드 전파
//!
//! 각 단계는 셸 해석 없이 개별 토큰으로 전달되고, 표준 입출력을 그대로
//! 물려받아 동기적으로 완료까지 실행된다. 한 단계가 실패하면 남은
//! 단계는 실행하지 않는다.

use std::process::ExitStatus;
use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("'{program}' exited with {status}")]
    StepFailed { program: String, status: ExitStatus },
}

/// 한 번의 서브프로세스 호출 사양
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<P, I, S>(program: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// 로그 출력용 한 줄 표현
    pub fn display_line(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// 단계 목록을 순서대로 실행한다. 스폰 실패 또는 0이 아닌 종료 코드가
/// 나오면 그 단계에서 중단하고 에러를 반환한다.
pub async fn run_sequence(specs: &[CommandSpec]) -> Result<(), Error> {
    for spec in specs {
        let status = run_step(spec).await?;
        if !status.success() {
            return Err(Error::StepFailed {
                program: spec.program.clone(),
                status,
            });
        }
    }
    Ok(())
}

/// stdio는 부모 것을 그대로 상속한다 — 설치 진행 상황이나 프롬프트가
/// 사용자에게 바로 보여야 한다.
async fn run_step(spec: &CommandSpec) -> Result<ExitStatus, Error> {
    tracing::info!("running: {}", spec.display_line());
    Command::new(&spec.program)
        .args(&spec.args)
        .status()
        .await
        .map_err(|e| Error::Spawn {
            program: spec.program.clone(),
            source: e,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_keeps_discrete_tokens() {
        let spec = CommandSpec::new("python", ["foo.py", "--x", "1 2"]);
        assert_eq!(spec.program, "python");
        // 공백이 든 인자도 하나의 토큰으로 남는다
        assert_eq!(spec.args, vec!["foo.py", "--x", "1 2"]);
    }

    #[test]
    fn test_display_line() {
        let spec = CommandSpec::new("sudo", ["apt", "install", "-y", "python3-venv"]);
        assert_eq!(spec.display_line(), "sudo apt install -y python3-venv");
    }

    #[tokio::test]
    async fn test_empty_sequence_is_ok() {
        assert!(run_sequence(&[]).await.is_ok());
    }

    #[tokio::test]
    async fn test_spawn_failure_reported() {
        let spec = CommandSpec::new("launchpad-no-such-binary", Vec::<String>::new());
        let err = run_sequence(std::slice::from_ref(&spec)).await.unwrap_err();
        assert!(matches!(err, Error::Spawn { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_step_aborts_chain() {
        // `false`가 실패하면 뒤의 단계는 실행되지 않아야 한다. 두 번째
        // 단계가 실행됐다면 에러는 Spawn이었을 것이다.
        let specs = vec![
            CommandSpec::new("false", Vec::<String>::new()),
            CommandSpec::new("launchpad-no-such-binary", Vec::<String>::new()),
        ];
        let err = run_sequence(&specs).await.unwrap_err();
        match err {
            Error::StepFailed { program, status } => {
                assert_eq!(program, "false");
                assert!(!status.success());
            }
            other => panic!("expected StepFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_successful_sequence() {
        let specs = vec![
            CommandSpec::new("true", Vec::<String>::new()),
            CommandSpec::new("true", Vec::<String>::new()),
        ];
        assert!(run_sequence(&specs).await.is_ok());
    }
}
