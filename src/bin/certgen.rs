//! TLS 인증서 생성 바이너리
//!
//! `launchpad-certgen --output_path certs --ip 203.0.113.7 --expiration_days 90`
//! `--ip auto`를 주면 공인 IP를 조회해서 쓴다. CA 쌍이 이미 있으면
//! 재사용하고 서버 인증서만 새로 발급한다.

use launchpad::certgen::{self, CertOptions};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let opts = CertOptions::parse(&args)?;

    tracing::info!("TLS certificate generation started");
    let out = certgen::generate(&opts)?;
    tracing::info!(
        "TLS certificate generation completed (cert: {}, key: {})",
        out.server_cert.display(),
        out.server_key.display()
    );
    Ok(())
}
