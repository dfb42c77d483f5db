use anyhow::Result;
use codemend::app::App;
use codemend::config::Config;
use codemend::intake;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    config.validate()?;

    let source = intake::resolve_source(std::env::args().skip(1));
    let snippet = intake::read_snippet(&source)?;

    let mut app = App::new(config, snippet)?;
    app.run().await
}
