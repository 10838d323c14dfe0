mod app;
mod input;
mod render;

use anyhow::Result;

fn main() -> Result<()> {
    env_logger::init();
    app::run()
}
