use clap::Parser;
use pyrolysis_twin::app::{self, Cli};
use tracing_subscriber::EnvFilter;

/// 프로그램의 엔트리 포인트. 로그는 stderr, JSON 결과는 stdout으로 낸다.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match app::run(&cli) {
        Ok(output) => println!("{output}"),
        Err(err) => {
            eprintln!("오류: {err}");
            std::process::exit(1);
        }
    }
}
