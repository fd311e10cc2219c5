fn main() {
    // Host builds need nothing; ESP-IDF builds pick up the toolchain env.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
