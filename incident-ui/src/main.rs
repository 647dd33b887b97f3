mod app;
mod bridge;

pub mod components {
    pub mod evidence_viewer;
    pub mod incident_detail;
    pub mod incident_list;
    pub mod rca_report;
}

fn main() {
    console_error_panic_hook::set_once();
    // routes `tracing` events, such as the client's unauthorized warning, to the browser console
    tracing_wasm::set_as_global_default();

    tracing::info!("incident dashboard mounting");
    leptos::mount_to_body(app::App);
}
