fn main() -> std::process::ExitCode {
    daily_dock_lib::run()
}
