use incident_core::evidence::{render_evidence, EvidenceBody, NO_DATA};
use incident_core::model::Evidence;
use incident_core::view::{evidence_heading, toggle_label};
use leptos::*;

#[component]
pub fn EvidenceEntry(evidence: Evidence) -> impl IntoView {
    let expanded = create_rw_signal(false);
    let heading = evidence_heading(&evidence);
    let body = store_value(render_evidence(&evidence));

    view! {
      <div class="mb-4 p-3 border rounded-md">
        <div
          class="flex justify-between items-center cursor-pointer"
          on:click=move |_| expanded.update(|open| *open = !*open)
        >
          <p class="font-semibold">{heading}</p>
          <button class="text-blue-500 hover:text-blue-700">
            {move || toggle_label(expanded.get())}
          </button>
        </div>
        <Show when=move || expanded.get() fallback=|| ()>
          {move || body_view(body.get_value())}
        </Show>
      </div>
    }
}

fn json_block(text: String) -> View {
    view! { <pre class="bg-gray-100 p-2 rounded text-sm overflow-x-auto">{text}</pre> }.into_view()
}

fn labelled_block(label: &'static str, text: String) -> View {
    view! {
      <div>
        <h4 class="font-semibold mb-2">{label}</h4>
        {json_block(text)}
      </div>
    }
    .into_view()
}

fn body_view(body: EvidenceBody) -> View {
    match body {
        EvidenceBody::Empty => {
            view! { <div class="mt-2 text-gray-500">{NO_DATA}</div> }.into_view()
        }
        EvidenceBody::Raw(text) => view! { <div class="mt-2">{json_block(text)}</div> }.into_view(),
        EvidenceBody::Metrics { current, baseline } => view! {
            <div class="mt-2 grid grid-cols-1 md:grid-cols-2 gap-4">
              {labelled_block("Current Metrics (5min)", current)}
              {labelled_block("Baseline Metrics (24h)", baseline)}
            </div>
        }
        .into_view(),
        EvidenceBody::SchemaDiff {
            old_schema,
            new_schema,
            changes,
        } => view! {
            <div class="mt-2 grid grid-cols-1 md:grid-cols-2 gap-4">
              {labelled_block("Old Schema", old_schema)}
              {labelled_block("New Schema", new_schema)}
              {(!changes.is_empty()).then(|| view! {
                  <div class="md:col-span-2 mt-4">
                    <h4 class="font-semibold mb-2">"Detected Changes"</h4>
                    <ul class="list-disc pl-5 bg-gray-100 p-2 rounded text-sm">
                      {changes.into_iter().map(|line| view! { <li>{line}</li> }).collect_view()}
                    </ul>
                  </div>
              })}
            </div>
        }
        .into_view(),
    }
}
