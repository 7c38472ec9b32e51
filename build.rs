fn main() {
    // Stamped into `mapsketch::BUILD_DATE` and logged by the replay binary
    let build_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
    println!("cargo:rustc-env=BUILD_DATE={build_date}");
    println!("cargo:rerun-if-changed=build.rs");
}
