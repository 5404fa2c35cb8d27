use clap::Parser;
use pricing_engine::app::render::{OutputFormat, Renderer};
use pricing_engine::app::session::Session;
use pricing_engine::core::estimator::feature_importance;
use pricing_engine::core::features::derive_features;
use pricing_engine::utils::error::ErrorSeverity;
use pricing_engine::utils::monitor::ResourceMonitor;
use pricing_engine::utils::{logger, validation::Validate};
use pricing_engine::{CliConfig, ModelHandle, PriceEstimator, PricingError};
use std::io::IsTerminal;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 設定檔要先讀，日誌格式取決於它
    let file_config = cli.load_file_config();
    let settings = cli
        .settings(file_config.as_ref().ok().and_then(|c| c.as_ref()))
        .for_terminal(std::io::stdout().is_terminal());

    if settings.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting pricing-engine");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
        tracing::debug!("Effective settings: {:?}", settings);
    }

    // 驗證配置
    let file_config = file_config.unwrap_or_else(|e| exit_with(&e));
    if let Some(file_config) = &file_config {
        file_config.validate().unwrap_or_else(|e| exit_with(&e));
    }
    settings.validate().unwrap_or_else(|e| exit_with(&e));

    let raw = cli.raw_inputs();
    raw.validate().unwrap_or_else(|e| exit_with(&e));

    let renderer = Renderer::new(&settings);

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - the model will not be loaded");
        print!("{}", renderer.render_dry_run(&raw, &derive_features(&raw), &settings));
        return Ok(());
    }

    let monitor = ResourceMonitor::new(settings.monitoring);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    // 模型只在啟動時載入一次，失敗就不接受任何輸入
    let handle = ModelHandle::load(&settings.model_path).unwrap_or_else(|e| exit_with(&e));
    monitor.log_phase("Model load");

    let estimator = PriceEstimator::new(handle);

    if cli.interactive {
        let stdin = std::io::stdin();
        let summary = Session::new(
            &estimator,
            &renderer,
            &monitor,
            cli.format,
            stdin.lock(),
            std::io::stdout(),
        )
        .run(raw)
        .unwrap_or_else(|e| exit_with(&e));
        println!(
            "👋 {} prediction(s), {} failed",
            summary.predictions, summary.failures
        );
    } else {
        let estimate = estimator.estimate(&raw).unwrap_or_else(|e| {
            if cli.format == OutputFormat::Text {
                let importance = feature_importance(estimator.handle().model()).ok();
                print!("{}", renderer.render_failure(&e, importance.as_ref()));
            }
            exit_with(&e)
        });
        monitor.log_phase("Prediction");

        let rendered = renderer
            .render(&estimate, cli.format)
            .unwrap_or_else(|e| exit_with(&e));
        match cli.format {
            OutputFormat::Text => print!("{}", rendered),
            OutputFormat::Json => println!("{}", rendered),
        }
    }

    monitor.log_final();
    Ok(())
}

fn exit_with(e: &PricingError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
