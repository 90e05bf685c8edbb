use std::path::PathBuf;

use anyhow::Result;
use script2video::config::Config;
use script2video::wizard::Wizard;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let config = match Config::load() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Error loading config: {}", e);
            eprintln!("Please fix 'config.yml' or remove it to use defaults.");
            return Err(e);
        }
    };

    // Optional script file argument; without one the wizard opens an editor
    let script_file = std::env::args().nth(1).map(PathBuf::from);

    let mut wizard = Wizard::new(&config, script_file);
    wizard.run().await
}
