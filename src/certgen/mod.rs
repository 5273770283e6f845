//! 로컬 CA와 서버 인증서 생성 (EC P-256, PEM)
//!
//! 출력 디렉토리에 네 파일을 만든다: `ca.cer`/`ca.key`(자체 서명 CA)와
//! 그 CA가 서명한 `server.cer`/`server.key`(IP SAN 포함). CA 쌍이 이미
//! 있으면 재사용하므로, 한 번 신뢰 등록한 CA로 서버 인증서만 계속
//! 갱신할 수 있다. 만들어진 쌍은 서버의 `RustlsConfig` 로더로 바로
//! 읽을 수 있다.

use std::fs;
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use rcgen::{
    BasicConstraints, Certificate, CertificateParams, DistinguishedName, DnType, IsCa, KeyPair,
    KeyUsagePurpose,
};
use time::{Duration as Validity, OffsetDateTime};

use crate::config::{flag_value, optional_flag_value};
use crate::platform::Platform;
use crate::process::CommandSpec;

const CA_CER_NAME: &str = "ca.cer";
const CA_KEY_NAME: &str = "ca.key";
const SERVER_CER_NAME: &str = "server.cer";
const SERVER_KEY_NAME: &str = "server.key";

/// CA는 사실상 만료되지 않는다
const CA_VALIDITY_DAYS: i64 = 36_500;

const PUBLIC_IP_ENDPOINT: &str = "https://api.ipify.org";

#[derive(Debug, Clone)]
pub struct CertOptions {
    pub output_dir: PathBuf,
    pub ip: IpAddr,
    pub expiration_days: i64,
    /// 지정하지 않으면 `<output>/ca.cer`, `<output>/ca.key`
    pub ca_cert_path: Option<PathBuf>,
    pub ca_key_path: Option<PathBuf>,
}

impl CertOptions {
    /// `--output_path`, `--ip`, `--expiration_days` 필수,
    /// `--ca_cer_path`/`--ca_key_path` 선택.
    pub fn parse(args: &[String]) -> Result<Self> {
        let output_dir = PathBuf::from(flag_value(args, "--output_path")?);
        let ip = resolve_ip(&flag_value(args, "--ip")?)?;
        let expiration_days: i64 = flag_value(args, "--expiration_days")?
            .parse()
            .context("--expiration_days must be an integer")?;

        Ok(Self {
            output_dir,
            ip,
            expiration_days,
            ca_cert_path: optional_flag_value(args, "--ca_cer_path").map(PathBuf::from),
            ca_key_path: optional_flag_value(args, "--ca_key_path").map(PathBuf::from),
        })
    }
}

#[derive(Debug)]
pub struct GeneratedCerts {
    pub ca_cert: PathBuf,
    pub ca_key: PathBuf,
    pub server_cert: PathBuf,
    pub server_key: PathBuf,
}

/// `auto`면 공인 IP를 조회해서 쓴다
pub fn resolve_ip(arg: &str) -> Result<IpAddr> {
    let text = if arg == "auto" {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(10))
            .build();
        let body = agent
            .get(PUBLIC_IP_ENDPOINT)
            .call()
            .context("failed to look up public IP")?
            .into_string()
            .context("failed to read public IP response")?;
        tracing::info!("resolved public IP: {}", body.trim());
        body
    } else {
        arg.to_string()
    };

    text.trim()
        .parse()
        .with_context(|| format!("invalid IP address '{}'", text.trim()))
}

/// CA(필요 시)와 서버 인증서를 생성해서 PEM으로 기록한다.
pub fn generate(opts: &CertOptions) -> Result<GeneratedCerts> {
    fs::create_dir_all(&opts.output_dir).with_context(|| {
        format!("failed to create output dir {}", opts.output_dir.display())
    })?;

    // CA 경로를 직접 지정했다면 새로 만들지 않고 반드시 로드한다
    let ca_paths_defaulted = opts.ca_cert_path.is_none() || opts.ca_key_path.is_none();
    let ca_cert_path = opts
        .ca_cert_path
        .clone()
        .unwrap_or_else(|| opts.output_dir.join(CA_CER_NAME));
    let ca_key_path = opts
        .ca_key_path
        .clone()
        .unwrap_or_else(|| opts.output_dir.join(CA_KEY_NAME));

    let ca_pair_exists = ca_cert_path.exists() && ca_key_path.exists();
    let (ca_cert, ca_key) = if ca_paths_defaulted && !ca_pair_exists {
        tracing::info!("generating CA certificate: {}", ca_cert_path.display());
        let (cert, key) = new_ca()?;
        fs::write(&ca_cert_path, cert.pem())?;
        fs::write(&ca_key_path, key.serialize_pem())?;
        (cert, key)
    } else {
        tracing::info!("reusing CA certificate: {}", ca_cert_path.display());
        load_ca(&ca_cert_path, &ca_key_path)?
    };

    tracing::info!(
        "generating server certificate for {}, expires in {} days",
        opts.ip,
        opts.expiration_days
    );
    let (server_cert, server_key) = new_server_cert(opts.ip, opts.expiration_days, &ca_cert, &ca_key)?;

    let server_cert_path = opts.output_dir.join(SERVER_CER_NAME);
    let server_key_path = opts.output_dir.join(SERVER_KEY_NAME);
    fs::write(&server_cert_path, server_cert.pem())?;
    fs::write(&server_key_path, server_key.serialize_pem())?;

    Ok(GeneratedCerts {
        ca_cert: ca_cert_path,
        ca_key: ca_key_path,
        server_cert: server_cert_path,
        server_key: server_key_path,
    })
}

fn new_ca() -> Result<(Certificate, KeyPair)> {
    let key = KeyPair::generate().context("failed to generate CA key")?;

    let mut params = CertificateParams::default();
    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "I'm my own authority");
    params.distinguished_name = dn;
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![KeyUsagePurpose::KeyCertSign, KeyUsagePurpose::CrlSign];
    params.not_before = OffsetDateTime::now_utc();
    params.not_after = OffsetDateTime::now_utc() + Validity::days(CA_VALIDITY_DAYS);

    let cert = params.self_signed(&key).context("failed to sign CA certificate")?;
    Ok((cert, key))
}

fn load_ca(cert_path: &Path, key_path: &Path) -> Result<(Certificate, KeyPair)> {
    let key_pem = fs::read_to_string(key_path)
        .with_context(|| format!("unable to read {}", key_path.display()))?;
    let key = KeyPair::from_pem(&key_pem).context("invalid CA key PEM")?;

    let cert_pem = fs::read_to_string(cert_path)
        .with_context(|| format!("unable to read {}", cert_path.display()))?;
    let params =
        CertificateParams::from_ca_cert_pem(&cert_pem).context("invalid CA certificate PEM")?;
    // 동일 파라미터 + 동일 키로 재구성한 발급자 인증서 — 서명용으로 충분
    let cert = params.self_signed(&key).context("failed to rebuild CA certificate")?;
    Ok((cert, key))
}

fn new_server_cert(
    ip: IpAddr,
    expiration_days: i64,
    ca_cert: &Certificate,
    ca_key: &KeyPair,
) -> Result<(Certificate, KeyPair)> {
    let key = KeyPair::generate().context("failed to generate server key")?;

    let mut params = CertificateParams::new(vec![ip.to_string()])
        .context("failed to build server certificate params")?;
    params
        .distinguished_name
        .push(DnType::CommonName, ip.to_string());
    params.not_before = OffsetDateTime::now_utc();
    params.not_after = OffsetDateTime::now_utc() + Validity::days(expiration_days);

    let cert = params
        .signed_by(&key, ca_cert, ca_key)
        .context("failed to sign server certificate")?;
    Ok((cert, key))
}

/// CA 인증서를 OS 신뢰 저장소에 등록하는 단계. Windows에서만 정의되고
/// 그 외 플랫폼은 `None`(호출자가 건너뛰었음을 알린다).
pub fn trust_plan(platform: Platform, ca_cert_path: &Path) -> Option<CommandSpec> {
    match platform {
        Platform::Windows => {
            let script = format!(
                "Import-Certificate -FilePath \"{}\" -CertStoreLocation Cert:\\LocalMachine\\Root",
                ca_cert_path.display()
            );
            Some(CommandSpec::new(
                "powershell",
                [
                    "-NoProfile",
                    "-NonInteractive",
                    "-ExecutionPolicy",
                    "Bypass",
                    "-Command",
                    script.as_str(),
                ],
            ))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    fn options(dir: &Path) -> CertOptions {
        CertOptions {
            output_dir: dir.to_path_buf(),
            ip: "127.0.0.1".parse().unwrap(),
            expiration_days: 30,
            ca_cert_path: None,
            ca_key_path: None,
        }
    }

    #[test]
    fn test_generate_writes_four_pem_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = generate(&options(dir.path())).unwrap();

        for path in [&out.ca_cert, &out.ca_key, &out.server_cert, &out.server_key] {
            assert!(path.exists(), "missing {}", path.display());
        }

        let ca_pem = fs::read_to_string(&out.ca_cert).unwrap();
        assert!(ca_pem.contains("BEGIN CERTIFICATE"));
        let key_pem = fs::read_to_string(&out.server_key).unwrap();
        assert!(key_pem.contains("PRIVATE KEY"));
    }

    #[test]
    fn test_existing_ca_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let first = generate(&options(dir.path())).unwrap();
        let ca_before = fs::read(&first.ca_cert).unwrap();

        let second = generate(&options(dir.path())).unwrap();
        let ca_after = fs::read(&second.ca_cert).unwrap();

        // CA는 그대로, 서버 인증서만 새로 발급
        assert_eq!(ca_before, ca_after);
        assert!(second.server_cert.exists());
    }

    #[test]
    fn test_explicit_ca_paths_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let mut opts = options(dir.path());
        opts.ca_cert_path = Some(dir.path().join("nope.cer"));
        opts.ca_key_path = Some(dir.path().join("nope.key"));
        // 직접 지정한 CA가 없으면 새로 만들지 않고 실패한다
        assert!(generate(&opts).is_err());
    }

    #[test]
    fn test_resolve_ip_literal() {
        assert_eq!(
            resolve_ip("10.1.2.3").unwrap(),
            "10.1.2.3".parse::<IpAddr>().unwrap()
        );
        assert!(resolve_ip("not-an-ip").is_err());
    }

    #[test]
    fn test_cert_options_parse() {
        let args = strings(&[
            "--output_path",
            "certs",
            "--ip",
            "192.168.1.5",
            "--expiration_days",
            "90",
        ]);
        let opts = CertOptions::parse(&args).unwrap();
        assert_eq!(opts.output_dir, PathBuf::from("certs"));
        assert_eq!(opts.ip, "192.168.1.5".parse::<IpAddr>().unwrap());
        assert_eq!(opts.expiration_days, 90);
        assert!(opts.ca_cert_path.is_none());
    }

    #[test]
    fn test_cert_options_parse_missing_flag() {
        let args = strings(&["--output_path", "certs"]);
        assert!(CertOptions::parse(&args).is_err());
    }

    #[test]
    fn test_trust_plan_windows_only() {
        let plan = trust_plan(Platform::Windows, Path::new("certs/ca.cer")).unwrap();
        assert_eq!(plan.program, "powershell");
        let script = plan.args.last().unwrap();
        assert!(script.contains("Import-Certificate"));
        assert!(script.contains("certs/ca.cer"));
        assert!(script.contains("Cert:\\LocalMachine\\Root"));

        assert!(trust_plan(Platform::Linux, Path::new("ca.cer")).is_none());
        assert!(trust_plan(Platform::Unsupported, Path::new("ca.cer")).is_none());
    }
}
