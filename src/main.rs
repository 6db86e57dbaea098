mod app;
mod config;
mod input;
mod render;
mod storage;

use anyhow::Result;

fn main() -> Result<()> {
    app::run()
}
