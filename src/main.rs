fn main() -> std::process::ExitCode {
    doctor_dashboard_lib::run()
}
