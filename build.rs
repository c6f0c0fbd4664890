fn main() {
    // Forward the ESP-IDF link environment when building for the device.
    // Host builds (tests, simulation) have no IDF toolchain env to forward.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
