fn main() {
    // ESP-IDF sysenv wiring is only meaningful when building the firmware
    // binary; host builds (lib + tests) skip it.
    if std::env::var_os("CARGO_FEATURE_ESPIDF").is_some() {
        embuild::espidf::sysenv::output();
    }
}
