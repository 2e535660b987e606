use clap::Parser;
use taskboard::cli::commands::Cli;
use taskboard::cli::handlers;
use taskboard::store::StoreError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = handlers::dispatch(cli) {
        eprintln!("error: {}", e);
        if matches!(e.downcast_ref::<StoreError>(), Some(StoreError::Unauthenticated)) {
            eprintln!("hint: sign in with `tb login <user>`");
        }
        std::process::exit(1);
    }
}
