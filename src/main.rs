use smallsh::error::ShellError;
use smallsh::flags::Flags;
use smallsh::shell::Shell;
use std::env;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut flags = Flags::new();
    let args: Vec<String> = env::args().skip(1).collect();
    if let Err(e) = flags.parse(&args) {
        println!("{}", e);
        return ExitCode::FAILURE;
    }

    let level = if flags.is_set("debug") { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if flags.is_set("help") {
        flags.print_help();
        return ExitCode::SUCCESS;
    }

    if flags.is_set("version") {
        println!("smallsh {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    match run(flags) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("smallsh: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(flags: Flags) -> Result<(), ShellError> {
    let mut shell = Shell::new(flags)?;
    shell.run()
}
