use crate::bridge;
use crate::components::incident_detail::IncidentDetailPage;
use crate::components::incident_list::IncidentsPage;
use leptos::*;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Route {
    Incidents,
    Incident(String),
}

fn route_for(path: &str) -> Route {
    match path.trim_end_matches('/').strip_prefix("/incidents/") {
        Some(id) if !id.is_empty() && !id.contains('/') => Route::Incident(id.to_string()),
        _ => Route::Incidents,
    }
}

#[component]
pub fn App() -> impl IntoView {
    match route_for(&bridge::location_path()) {
        Route::Incidents => view! { <IncidentsPage/> }.into_view(),
        Route::Incident(id) => view! { <IncidentDetailPage id=id/> }.into_view(),
    }
}
