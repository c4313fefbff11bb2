use std::process::ExitCode;

use phorg::output as out;
use phorg::{PhorgError, cli};

mod app;

fn main() -> ExitCode {
    let args = cli::parse();
    match app::run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            out::print_error(&format!("{e:#}"));
            let code = e.downcast_ref::<PhorgError>().map_or(1, PhorgError::code);
            ExitCode::from(u8::try_from(code).unwrap_or(1))
        }
    }
}
