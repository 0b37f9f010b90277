fn main() {
    // Host builds (tests, tank-sim) need no ESP-IDF environment.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
