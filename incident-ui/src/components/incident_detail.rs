use crate::bridge;
use crate::components::evidence_viewer::EvidenceEntry;
use crate::components::rca_report::RcaReportCard;
use incident_core::model::{IncidentAction, IncidentDetail};
use incident_core::view::{
    available_actions, overview_lines, short_id, timeline_entries, ViewState, LOADING_DETAIL,
    NOT_FOUND, NO_EVIDENCE,
};
use leptos::*;
use wasm_bindgen_futures::spawn_local;

#[component]
pub fn IncidentDetailPage(id: String) -> impl IntoView {
    let id = store_value(id);
    let state = create_rw_signal(ViewState::<Option<IncidentDetail>>::Loading);

    let load = move || {
        let id = id.get_value();
        if id.is_empty() {
            state.set(ViewState::Loaded(None));
            return;
        }
        spawn_local(async move {
            let result = bridge::fetch_detail(&id).await;
            state.set(ViewState::from_result(result.map(Some)));
        });
    };

    // keeps the current detail on screen while the action runs
    let act = move |action: IncidentAction| {
        let id = id.get_value();
        spawn_local(async move {
            let result = bridge::run_action(&id, action).await;
            state.set(ViewState::from_result(result.map(Some)));
        });
    };

    load();

    move || match state.get() {
        ViewState::Loading => centered(LOADING_DETAIL.to_string(), ""),
        ViewState::Failed(msg) => centered(format!("Error: {msg}"), "text-red-600"),
        ViewState::Loaded(None) => centered(NOT_FOUND.to_string(), ""),
        ViewState::Loaded(Some(detail)) => detail_view(detail, act),
    }
}

fn centered(text: String, extra: &'static str) -> View {
    view! {
        <div class=format!("flex justify-center items-center h-screen text-lg {extra}")>{text}</div>
    }
    .into_view()
}

fn detail_view(detail: IncidentDetail, act: impl Fn(IncidentAction) + Copy + 'static) -> View {
    let IncidentDetail {
        incident,
        evidence,
        rca,
    } = detail;
    let actions = available_actions(incident.status);

    view! {
      <div class="container mx-auto p-4">
        <h1 class="text-3xl font-bold mb-6">{format!("Incident Details: {}", short_id(&incident.id))}</h1>

        <div class="grid grid-cols-1 md:grid-cols-2 gap-6 mb-6">
          <div class="bg-white shadow rounded-lg p-4">
            <h2 class="text-xl font-semibold mb-4">"Incident Overview"</h2>
            {overview_lines(&incident)
                .into_iter()
                .map(|(label, value)| view! { <p><strong>{format!("{label}:")}</strong>" "{value}</p> })
                .collect_view()}
          </div>

          <div class="bg-white shadow rounded-lg p-4">
            <h2 class="text-xl font-semibold mb-4">"Incident Timeline"</h2>
            <ul class="list-disc pl-5">
              {timeline_entries(&incident)
                  .into_iter()
                  .map(|entry| view! { <li>{entry}</li> })
                  .collect_view()}
            </ul>
          </div>

          <RcaReportCard report=rca/>
        </div>

        <div class="bg-white shadow rounded-lg p-4 mb-6">
          <h2 class="text-xl font-semibold mb-4">"Evidence"</h2>
          {if evidence.is_empty() {
              view! { <p>{NO_EVIDENCE}</p> }.into_view()
          } else {
              view! {
                <For
                  each=move || evidence.clone()
                  key=|ev| ev.id.clone()
                  children=move |ev| view! { <EvidenceEntry evidence=ev/> }
                />
              }
              .into_view()
          }}
        </div>

        <div class="flex space-x-4">
          {actions.acknowledge.then(|| view! {
              <button
                class="bg-yellow-500 hover:bg-yellow-600 text-white font-bold py-2 px-4 rounded"
                on:click=move |_| act(IncidentAction::Acknowledge)
              >
                {IncidentAction::Acknowledge.label()}
              </button>
          })}
          {actions.resolve.then(|| view! {
              <button
                class="bg-green-500 hover:bg-green-600 text-white font-bold py-2 px-4 rounded"
                on:click=move |_| act(IncidentAction::Resolve)
              >
                {IncidentAction::Resolve.label()}
              </button>
          })}
        </div>
      </div>
    }
    .into_view()
}
