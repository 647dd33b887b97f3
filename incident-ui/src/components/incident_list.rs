use crate::bridge;
use incident_core::model::{IncidentStatus, IncidentType};
use incident_core::view::{incident_rows, IncidentRow, ViewState, LOADING_INCIDENTS};
use incident_core::IncidentFilter;
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn IncidentsPage() -> impl IntoView {
    let filter = create_rw_signal(IncidentFilter::from_query(&bridge::location_search()));
    let state = create_rw_signal(ViewState::<Vec<IncidentRow>>::Loading);

    create_effect(move |_| {
        let current = filter.get();
        state.set(ViewState::Loading);
        bridge::push_query(&current.to_query());
        spawn_local(async move {
            let result = bridge::fetch_incidents(current).await;
            // a newer filter may have been picked while this one was in flight
            if filter.get_untracked() == current {
                state.set(ViewState::from_result(result.map(|list| incident_rows(&list))));
            }
        });
    });

    move || match state.get() {
        ViewState::Loading => view! {
            <div class="flex justify-center items-center h-screen text-lg">{LOADING_INCIDENTS}</div>
        }
        .into_view(),
        ViewState::Failed(msg) => view! {
            <div class="flex justify-center items-center h-screen text-lg text-red-600">
                {format!("Error: {msg}")}
            </div>
        }
        .into_view(),
        ViewState::Loaded(rows) => view! {
            <div class="container mx-auto p-4">
              <h1 class="text-3xl font-bold mb-6">"Incidents Dashboard"</h1>
              <div class="mb-4 flex space-x-4">
                <select
                  class="p-2 border rounded-md"
                  on:change=move |ev| {
                      let value = event_target_value(&ev);
                      filter.update(|f| *f = f.with_status_value(&value));
                  }
                >
                  <option value="" selected=move || filter.get().status.is_none()>"All Statuses"</option>
                  {IncidentStatus::ALL
                      .into_iter()
                      .map(|s| view! {
                          <option value=s.as_str() selected=move || filter.get().status == Some(s)>
                            {s.as_str()}
                          </option>
                      })
                      .collect_view()}
                </select>
                <select
                  class="p-2 border rounded-md"
                  on:change=move |ev| {
                      let value = event_target_value(&ev);
                      filter.update(|f| *f = f.with_type_value(&value));
                  }
                >
                  <option value="" selected=move || filter.get().kind.is_none()>"All Types"</option>
                  {IncidentType::ALL
                      .into_iter()
                      .map(|t| view! {
                          <option value=t.as_str() selected=move || filter.get().kind == Some(t)>
                            {t.as_str()}
                          </option>
                      })
                      .collect_view()}
                </select>
              </div>
              <IncidentTable rows=rows/>
            </div>
        }
        .into_view(),
    }
}

#[component]
fn IncidentTable(rows: Vec<IncidentRow>) -> impl IntoView {
    view! {
      <div class="overflow-x-auto">
        <table class="min-w-full bg-white border border-gray-200">
          <thead>
            <tr>
              <th class="py-2 px-4 border-b text-left">"ID"</th>
              <th class="py-2 px-4 border-b text-left">"Endpoint"</th>
              <th class="py-2 px-4 border-b text-left">"Type"</th>
              <th class="py-2 px-4 border-b text-left">"Status"</th>
              <th class="py-2 px-4 border-b text-left">"Severity"</th>
              <th class="py-2 px-4 border-b text-left">"Detected At"</th>
              <th class="py-2 px-4 border-b text-left">"Actions"</th>
            </tr>
          </thead>
          <tbody>
            {rows
                .into_iter()
                .map(|row| view! {
                    <tr class="hover:bg-gray-50">
                      <td class="py-2 px-4 border-b">{row.short_id}</td>
                      <td class="py-2 px-4 border-b">{row.endpoint}</td>
                      <td class="py-2 px-4 border-b">{row.kind}</td>
                      <td class="py-2 px-4 border-b">{row.status}</td>
                      <td class="py-2 px-4 border-b">
                        <span class=format!(
                            "px-2 inline-flex text-xs leading-5 font-semibold rounded-full {}",
                            row.severity_class
                        )>{row.severity}</span>
                      </td>
                      <td class="py-2 px-4 border-b">{row.detected_at}</td>
                      <td class="py-2 px-4 border-b">
                        <a href=row.href class="text-blue-600 hover:underline">"View"</a>
                      </td>
                    </tr>
                })
                .collect_view()}
          </tbody>
        </table>
      </div>
    }
}
