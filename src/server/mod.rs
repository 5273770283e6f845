//! 정적 HTTPS 서버 — TLS 종단 + public 디렉토리 서빙
//!
//! 상태는 두 개뿐이다: 기동(인자 파싱, 자격 증명 로드)과 서빙(리스너
//! 활성). 서빙에 들어가면 프로세스가 끝날 때까지 돌고, 우아한 종료
//! 경로는 없다. 포트 재시도도 없다 — 바인드 실패는 그대로 기동 실패.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::config::ServerArgs;

/// 고정 서비스 포트
pub const SERVE_PORT: u16 = 443;

/// 정적 라우터: public 디렉토리 전체를 마운트하고, 루트(`/`)는 같은
/// 디렉토리의 `index.html`을 돌려주는 고정 라우트를 하나 더 둔다.
/// 루트 라우트는 정적 마운트와 겹치지만 의도된 중복이다.
pub fn build_router(public_dir: &Path) -> Router {
    let index = public_dir.join("index.html");
    Router::new()
        .route_service("/", ServeFile::new(index))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
}

/// TLS 자격 증명 쌍 로드. 둘 중 하나라도 읽지 못하면 기동 실패로
/// 이어지는 에러를 돌려준다.
pub async fn load_tls(cert_path: &Path, key_path: &Path) -> Result<RustlsConfig> {
    RustlsConfig::from_pem_file(cert_path, key_path)
        .await
        .with_context(|| {
            format!(
                "failed to load TLS credentials (cert: {}, key: {})",
                cert_path.display(),
                key_path.display()
            )
        })
}

/// 단일 TLS 리스너를 띄운다. 정상적으로는 반환하지 않는다.
pub async fn serve(args: &ServerArgs, public_dir: PathBuf) -> Result<()> {
    let ip: IpAddr = args
        .ip
        .parse()
        .with_context(|| format!("invalid bind address '{}'", args.ip))?;
    let addr = SocketAddr::new(ip, SERVE_PORT);

    let tls = load_tls(&args.cert_path, &args.key_path).await?;
    let router = build_router(&public_dir);

    tracing::info!("HTTPS server running on https://{}", addr);
    axum_server::bind_rustls(addr, tls)
        .serve(router.into_make_service())
        .await
        .context("HTTPS listener failed")?;
    Ok(())
}
