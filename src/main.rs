use clap::Parser;
use preflight_a11y::core::ConfigProvider;
use preflight_a11y::domain::model::ResultTable;
use preflight_a11y::utils::error::{AuditError, ErrorSeverity};
use preflight_a11y::utils::{logger, validation::Validate};
use preflight_a11y::{AuditEngine, AuditPipeline, CliConfig, LocalStorage, PolicyConfig};

fn exit_with(e: &AuditError) -> ! {
    tracing::error!(
        "❌ Pre-flight check failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}

fn print_table(table: &ResultTable) {
    let width = table
        .records()
        .iter()
        .map(|record| record.filename().chars().count())
        .chain(std::iter::once("File".len()))
        .max()
        .unwrap_or(0);

    println!("{:<width$}  Issues", "File", width = width);
    for record in table.records() {
        println!("{:<width$}  {}", record.filename(), record.issues(), width = width);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting preflight-a11y");

    let policy_file = match config.config.as_deref() {
        Some(path) => {
            tracing::info!("📄 Loading policy file: {}", path);
            let file = PolicyConfig::from_file(path).and_then(|file| {
                file.validate()?;
                Ok(file)
            });
            match file {
                Ok(file) => Some(file),
                Err(e) => exit_with(&e),
            }
        }
        None => None,
    };
    config.resolve(policy_file.as_ref());

    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
        tracing::debug!("Heuristic policy: {:?}", config.policy());
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        exit_with(&e);
    }

    let output_path = config.output_path().to_string();
    let reader = LocalStorage::new(".".to_string());
    let writer = LocalStorage::new(output_path);
    let pipeline = AuditPipeline::new(reader, writer, config);
    let engine = AuditEngine::new(pipeline);

    match engine.run().await {
        Ok(outcome) => {
            print_table(&outcome.table);
            println!();
            for path in &outcome.written {
                println!("📁 Report saved to: {}", path);
            }
            tracing::info!("✅ Checked {} document(s)", outcome.table.len());
        }
        Err(e) => exit_with(&e),
    }

    Ok(())
}
