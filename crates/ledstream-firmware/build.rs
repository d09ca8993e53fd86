fn main() {
    // WIFI_SSID, WIFI_PASSWORD and LEDSTREAM_HOSTNAME may come from a `.env` file
    dotenv_build::output(dotenv_build::Config::default()).ok();

    println!(
        "cargo:rustc-env=BUILD_VERSION={}",
        chrono::Utc::now().format("%Y.%m.%d-%H%M")
    );
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}
