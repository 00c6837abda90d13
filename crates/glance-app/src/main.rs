//! # glance-app
//!
//! GLANCE 바이너리 진입점.
//! 설정 로드, 어댑터 조립, 서브커맨드 실행(HTTP 서버 / 1회 분석 / 모니터링).

mod lifecycle;
mod report;
mod wiring;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use glance_analysis::analyzer::ScreenAnalyzer;
use glance_analysis::factory::AnalyzerFactory;
use glance_analysis::monitor::ScreenMonitor;
use glance_core::config::{AiProviderType, AppConfig};
use glance_core::config_manager::ConfigManager;
use glance_core::credentials;
use glance_web::slot::AnalyzerSession;
use glance_web::{AppState, WebServer};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::lifecycle::LifecycleManager;
use crate::wiring::DefaultAnalyzerFactory;

/// GLANCE 화면 이해 도우미
///
/// 화면을 캡처해 OCR과 멀티모달 모델로 무엇이 보이는지 설명한다.
#[derive(Parser, Debug)]
#[command(name = "glance")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼 설정 디렉토리의 config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// 멀티모달 제공자 (gemini, openai, anthropic)
    #[arg(long, global = true)]
    provider: Option<AiProviderType>,

    /// 모델 이름
    #[arg(long, global = true)]
    model: Option<String>,

    /// API 키 (없으면 환경 변수 또는 .env)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// HTTP API 서버 실행
    Serve {
        /// 바인드 호스트
        #[arg(long)]
        host: Option<String>,
        /// 포트 (사용 중이면 다음 포트 시도)
        #[arg(long)]
        port: Option<u16>,
    },
    /// 현재 화면 1회 분석
    Analyze {
        /// 사용자 의도 힌트
        #[arg(long)]
        intent: Option<String>,
        /// 리포트 대신 JSON 출력
        #[arg(long)]
        json: bool,
    },
    /// 사용자 의도 중심 화면 설명 (OCR 생략)
    Explain {
        /// 사용자 의도
        #[arg(long, default_value = "")]
        intent: String,
    },
    /// 주기적 백그라운드 분석
    Monitor {
        /// 분석 간격 (초)
        #[arg(long)]
        interval: Option<f64>,
        /// 이 시간(초)이 지나면 종료 (없으면 Ctrl+C까지)
        #[arg(long)]
        duration: Option<f64>,
    },
}

fn log_filter(level: &str) -> String {
    [
        "glance",
        "glance_app",
        "glance_core",
        "glance_vision",
        "glance_network",
        "glance_analysis",
        "glance_web",
    ]
    .iter()
    .map(|target| format!("{target}={level}"))
    .collect::<Vec<_>>()
    .join(",")
}

/// 설정 파일 로드 후 CLI 인자 적용
fn load_config(cli: &Cli) -> AppConfig {
    let manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = match manager {
        Ok(manager) => manager.get(),
        Err(e) => {
            warn!("설정 로드 실패, 기본값 사용: {e}");
            AppConfig::default()
        }
    };

    if let Some(provider) = cli.provider {
        config.llm.provider = provider;
    }
    if let Some(model) = &cli.model {
        config.llm.model = Some(model.clone());
    }
    config
}

/// API 키 해석: CLI → 환경 변수 → .env → 설정 파일
fn resolve_api_key(cli: &Cli, config: &AppConfig) -> Option<String> {
    credentials::resolve_api_key(cli.api_key.as_deref(), Path::new(".env")).or_else(|| {
        let key = config.llm.api_key.trim();
        (!key.is_empty()).then(|| key.to_string())
    })
}

fn build_analyzer(config: &AppConfig, api_key: Option<&str>) -> Result<ScreenAnalyzer> {
    let key = api_key.ok_or_else(|| {
        anyhow!("API 키가 없습니다. --api-key, GLANCE_API_KEY/GOOGLE_API_KEY 또는 .env로 지정하세요")
    })?;
    Ok(DefaultAnalyzerFactory::new(config.clone()).build(key)?)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(log_filter(&cli.log_level))),
        )
        .init();

    let config = load_config(&cli);
    let api_key = resolve_api_key(&cli, &config);
    info!(
        provider = ?config.llm.provider,
        model = config.llm.resolved_model(),
        "GLANCE 시작"
    );

    match &cli.command {
        Command::Serve { host, port } => serve(config, api_key, host.clone(), *port).await,
        Command::Analyze { intent, json } => {
            let analyzer = build_analyzer(&config, api_key.as_deref())?;
            let result = analyzer.analyze_once(intent.as_deref()).await?;
            if *json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print!("{}", report::render_analysis(&result));
            }
            Ok(())
        }
        Command::Explain { intent } => {
            let analyzer = build_analyzer(&config, api_key.as_deref())?;
            let explanation = analyzer.explain(intent).await?;
            println!("{}", serde_json::to_string_pretty(&explanation)?);
            Ok(())
        }
        Command::Monitor { interval, duration } => {
            let interval = interval.unwrap_or(config.monitor.default_interval_secs);
            let analyzer = build_analyzer(&config, api_key.as_deref())?;
            monitor(analyzer, interval, *duration).await
        }
    }
}

async fn serve(
    config: AppConfig,
    api_key: Option<String>,
    host: Option<String>,
    port: Option<u16>,
) -> Result<()> {
    let factory = Arc::new(DefaultAnalyzerFactory::new(config.clone()));
    let state = AppState::new(factory.clone(), config);

    // 키가 이미 있으면 /api/initialize 없이 바로 분석 가능
    if let Some(key) = api_key.as_deref() {
        match factory.build(key) {
            Ok(analyzer) => {
                state.slot.install(AnalyzerSession::new(analyzer)).await;
                info!("저장된 API 키로 분석기 초기화");
            }
            Err(e) => warn!("분석기 사전 초기화 실패 (initialize 요청 필요): {e}"),
        }
    }

    let mut server = WebServer::new(state);
    if let Some(host) = host {
        server = server.with_host(host);
    }
    if let Some(port) = port {
        server = server.with_port(port);
    }
    info!("API 주소: {}", server.url());

    let lifecycle = LifecycleManager::new();
    let mut handle = tokio::spawn(server.run(lifecycle.subscribe()));

    tokio::select! {
        joined = &mut handle => {
            return match joined {
                Ok(result) => result.map_err(Into::into),
                Err(e) => Err(anyhow!("웹 서버 태스크 실패: {e}")),
            };
        }
        _ = lifecycle.wait_for_signal() => {}
    }

    match handle.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => {
            error!("웹 서버 종료 중 오류: {e}");
            Err(e.into())
        }
        Err(e) => Err(anyhow!("웹 서버 태스크 실패: {e}")),
    }
}

/// `--duration` 해석: 없으면 무기한, 유한한 양수만 허용
fn monitor_duration(duration: Option<f64>) -> Result<Option<Duration>> {
    let Some(secs) = duration else {
        return Ok(None);
    };
    if !secs.is_finite() || secs <= 0.0 {
        return Err(anyhow!("--duration은 0보다 큰 유한한 초 단위 값이어야 합니다 (입력: {secs})"));
    }
    Duration::try_from_secs_f64(secs)
        .map(Some)
        .map_err(|e| anyhow!("--duration 값이 너무 큽니다 ({secs}): {e}"))
}

async fn monitor(analyzer: ScreenAnalyzer, interval: f64, duration: Option<f64>) -> Result<()> {
    let duration = monitor_duration(duration)?;
    let monitor = ScreenMonitor::new(Arc::new(analyzer));
    monitor.start(interval).await?;
    info!(interval, "모니터링 시작 (Ctrl+C로 종료)");

    let lifecycle = LifecycleManager::new();
    let deadline = async {
        match duration {
            Some(duration) => tokio::time::sleep(duration).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = lifecycle.wait_for_signal() => {}
        _ = deadline => info!("모니터링 시간 종료"),
    }

    monitor.stop().await;
    println!("{}", report::render_stats(&monitor.analyzer().stats()));
    Ok(())
}
