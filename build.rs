fn main() {
    tauri_plugin::Builder::new(&["start_casting", "stop_casting", "refresh_status", "get_status"])
        .build();
}
