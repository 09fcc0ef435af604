use anyhow::Result;

use crate::cli::Settings;
use crate::runtime::Runtime;

pub async fn run_status(settings: &Settings) -> Result<()> {
    let runtime = Runtime::from_settings(settings).await?;

    println!("colabhub {}", env!("CARGO_PKG_VERSION"));
    for (service, configured) in runtime.services() {
        if configured {
            println!("✅ {}", service);
        } else {
            println!("❌ {} (not configured)", service);
        }
    }
    if let Some(model) = &runtime.generator_model {
        println!("   Gemini model: {}", model);
    }
    println!(
        "   Google token file: {}",
        settings.google_token_path().display()
    );

    Ok(())
}
