// Bake build metadata into `packetwire version --extended`.
fn main() {
    for (var, key) in [
        ("TARGET", "PACKETWIRE_BUILD_TARGET"),
        ("PROFILE", "PACKETWIRE_BUILD_PROFILE"),
    ] {
        if let Ok(value) = std::env::var(var) {
            println!("cargo:rustc-env={key}={value}");
        }
        println!("cargo:rerun-if-env-changed={var}");
    }
}
