use clap::Parser;

fn main() -> anyhow::Result<()> {
    antfriend_cui::run(antfriend_cui::LaunchOptions::parse())
}
