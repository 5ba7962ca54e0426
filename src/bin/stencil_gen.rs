use std::process::ExitCode;

fn main() -> ExitCode {
    match swagger_stencil::cli::run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "generation failed");
            eprintln!("❌ {err:#}");
            ExitCode::FAILURE
        }
    }
}
