mod command;
mod logging;
mod observer;
mod schema;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
