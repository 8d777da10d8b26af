use fxchain_cli::{init_tracing, run, Config};

fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_tracing(&config.log_format);
    let output = run(&config)?;
    println!("{}", output);
    Ok(())
}
